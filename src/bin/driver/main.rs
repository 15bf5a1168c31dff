mod args;
mod driver_error;

use anyhow::Context;
use args::Args;
use clap::Parser;
use driver_error::DriverError;
use lilc::ast::Ast;
use lilc::codegen::AsmProgram;
use lilc::lexer::LinedToken;
use lilc::semantic_analysis::WriterSink;
use lilc::symtab::SymbolTable;
use lilc::tacky::{Listing, TInstructions};
use lilc::*;

use std::fs;
use std::io;
use std::process::{Command, ExitCode};

fn read_source(args: &Args) -> anyhow::Result<String> {
    if !args.input.exists() {
        let filename = args.input.to_string_lossy().to_string();
        return Err(DriverError::InputFileDoesNotExist(filename).into());
    }
    fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))
}

fn tokenize(source: &str, args: &Args) -> Result<Vec<LinedToken>, DriverError> {
    let tokens = lexer::lex(source)?;
    if args.lex {
        for token in &tokens {
            println!("{}: {}", token.get_line(), token.get_inner());
        }
    }
    Ok(tokens)
}

fn parse(tokens: &[LinedToken], table: &mut SymbolTable, args: &Args) -> Result<Ast, DriverError> {
    let ast = parser::parse(tokens, table)?;
    if args.parse {
        dbg!(&ast);
    }
    if args.print_syntax_tree {
        print!("{}", ast.decompile(table));
    }
    Ok(ast)
}

fn validate(ast: &mut Ast, table: &mut SymbolTable, args: &Args) -> anyhow::Result<()> {
    let mut sink = WriterSink::new(io::stderr().lock());
    let result = semantic_analysis::validate(ast, table, &mut sink);
    sink.finish().context("failed to write diagnostics")?;
    if args.print_symbol_table {
        print!("{table}");
    }
    result.map_err(DriverError::from)?;
    Ok(())
}

fn gen_tacky(ast: &Ast, table: &mut SymbolTable, args: &Args) -> TInstructions {
    let tacky = tacky::emit_tacky(ast, table);
    if args.tacky {
        print!("{}", Listing::new(&tacky, table));
    }
    tacky
}

fn gen_asm(tacky: &TInstructions, table: &SymbolTable, args: &Args) -> Result<AsmProgram, DriverError> {
    let asm = codegen::codegen(tacky, table)?;
    if args.codegen {
        dbg!(&asm);
    }
    Ok(asm)
}

fn emit_asm(asm: &AsmProgram, args: &Args) -> anyhow::Result<()> {
    let asm_file = match &args.output {
        Some(output) if args.no_assemble => output.clone(),
        _ => args.input.with_extension("s"),
    };
    fs::write(&asm_file, asm.to_string())
        .with_context(|| format!("failed to write {}", asm_file.display()))?;

    if args.no_assemble {
        return Ok(());
    }

    let out_extension = if args.no_link { "o" } else { "" };
    let mut out_file = args
        .output
        .clone()
        .unwrap_or_else(|| args.input.with_extension(out_extension));
    if out_file == args.input {
        out_file.set_extension("out");
    }

    let mut gcc = Command::new("gcc");
    gcc.arg(&asm_file);
    if args.no_link {
        gcc.arg("-c");
    }
    let status = gcc
        .arg("-o")
        .arg(&out_file)
        .status()
        .context("failed to run gcc")?;
    if !status.success() {
        return Err(DriverError::AssemblerFailed.into());
    }
    fs::remove_file(&asm_file)
        .with_context(|| format!("failed to remove {}", asm_file.display()))?;

    Ok(())
}

fn run(args: &Args) -> anyhow::Result<()> {
    let source = read_source(args)?;
    let tokens = tokenize(&source, args)?;
    if args.lex {
        return Ok(());
    }

    let mut table = SymbolTable::new();
    let mut ast = parse(&tokens, &mut table, args)?;
    if args.parse {
        return Ok(());
    }

    validate(&mut ast, &mut table, args)?;
    if args.validate {
        return Ok(());
    }

    let tacky = gen_tacky(&ast, &mut table, args);
    if args.tacky {
        return Ok(());
    }

    let asm = gen_asm(&tacky, &table, args)?;
    if args.codegen {
        return Ok(());
    }

    emit_asm(&asm, args)
}

fn exit_code(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<DriverError>() {
        Some(err) => err.exit_code(),
        None if err.root_cause().is::<io::Error>() => 2,
        None => 1,
    }
}

pub fn main() -> ExitCode {
    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}: {err:#}", args.input.display());
            ExitCode::from(exit_code(&err))
        }
    }
}
