use clap::Parser;
use std::path::PathBuf;

/// Compiler for a small typed imperative language, emitting x86-64 assembly
#[allow(clippy::struct_excessive_bools)]
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Stop after lexing and print the tokens
    #[arg(long)]
    pub lex: bool,

    /// Stop after parsing
    #[arg(long)]
    pub parse: bool,

    /// Stop after semantic analysis
    #[arg(long)]
    pub validate: bool,

    /// Stop after producing three-address code and print it
    #[arg(long)]
    pub tacky: bool,

    /// Stop after code generation
    #[arg(long)]
    pub codegen: bool,

    /// Compile and assemble, but do not link (output object file)
    #[arg(short = 'c', long = "no-link")]
    pub no_link: bool,

    /// Compile only; do not assemble or link (output assembly file)
    #[arg(short = 'S', long = "no-assemble")]
    pub no_assemble: bool,

    /// Write the final artifact to this path
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Print the symbol table after semantic analysis
    #[arg(long)]
    pub print_symbol_table: bool,

    /// Print the program decompiled from its syntax tree
    #[arg(long)]
    pub print_syntax_tree: bool,

    pub input: PathBuf,
}
