use lilc::codegen::CodegenError;
use lilc::lexer::LexError;
use lilc::parser::ParseError;
use lilc::semantic_analysis::SemAnalysisError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("file {0} does not exist")]
    InputFileDoesNotExist(String),
    #[error("failed to run assembler")]
    AssemblerFailed,
    #[error("lex error: {0}")]
    Lexer(#[from] LexError),
    #[error("parse error: {0}")]
    Parser(#[from] ParseError),
    #[error("{0}")]
    Semantic(#[from] SemAnalysisError),
    #[error("codegen error: {0}")]
    Codegen(#[from] CodegenError),
}

impl DriverError {
    /// Process exit status: 2 for unusable input, 3 for lexical or syntax errors,
    /// 4 for semantic errors and 1 for everything else.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::InputFileDoesNotExist(_) => 2,
            Self::Lexer(_) | Self::Parser(_) => 3,
            Self::Semantic(_) => 4,
            Self::AssemblerFailed | Self::Codegen(_) => 1,
        }
    }
}
