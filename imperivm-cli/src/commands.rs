//! CLI command implementations.

use std::fs;
use std::io;

use imperivm_common::{Program, Value};
use imperivm_parser::ParseError;
use imperivm_vm::{Config, Exit};

/// Parse and execute a program.
pub fn run(args: &[String]) -> Result<(), i32> {
    if args.is_empty() {
        eprintln!("error: run requires an input file");
        eprintln!(
            "Usage: imperivm run <input.imp> [--max-call-depth N] [--max-heap-cells N] \
             [--max-string-bytes N]"
        );
        return Err(1);
    }

    let input = &args[0];
    let config = parse_run_options(&args[1..])?;
    let program = load_program(input)?;

    match imperivm_vm::run_with(&program, config, io::stdout()) {
        Ok(Exit::Completed) => Ok(()),
        Ok(Exit::Halted(code)) => {
            tracing::debug!(%code, "program halted");
            if !matches!(code, Value::Integer(_)) {
                eprintln!("exit: {code}");
            }
            match Exit::Halted(code).status() {
                0 => Ok(()),
                status => Err(status),
            }
        }
        Err(e) => {
            eprintln!("runtime error: {e}");
            Err(3)
        }
    }
}

/// Parse a program and report what it defines.
pub fn check(args: &[String]) -> Result<(), i32> {
    if args.is_empty() {
        eprintln!("error: check requires an input file");
        eprintln!("Usage: imperivm check <input.imp>");
        return Err(1);
    }

    let input = &args[0];
    let program = load_program(input)?;

    println!("OK: {input} ({} subroutines)", program.len());
    for (name, body) in program.subroutines() {
        println!("  {name}: {} instructions", body.len());
    }
    Ok(())
}

/// Print the parsed instruction tree.
pub fn parse(args: &[String]) -> Result<(), i32> {
    if args.is_empty() {
        eprintln!("error: parse requires an input file");
        eprintln!("Usage: imperivm parse <input.imp>");
        return Err(1);
    }

    let program = load_program(&args[0])?;
    for (name, body) in program.subroutines() {
        println!("{name} {body:#?}");
    }
    Ok(())
}

// ---- Helpers ----

fn load_program(path: &str) -> Result<Program, i32> {
    let text = fs::read_to_string(path).map_err(|e| {
        eprintln!("error: cannot read '{path}': {e}");
        1
    })?;

    imperivm_parser::parse(&text).map_err(|e| {
        eprintln!("error: {path}: {e}");
        match e {
            ParseError::Program(_) => 2,
            _ => 1,
        }
    })
}

fn parse_run_options(args: &[String]) -> Result<Config, i32> {
    let mut config = Config::default();
    let mut rest = args.iter();

    while let Some(flag) = rest.next() {
        let slot = match flag.as_str() {
            "--max-call-depth" => &mut config.max_call_depth,
            "--max-heap-cells" => &mut config.max_heap_cells,
            "--max-string-bytes" => &mut config.max_string_bytes,
            other => {
                eprintln!("error: unknown option '{other}'");
                return Err(1);
            }
        };
        let value = rest.next().ok_or_else(|| {
            eprintln!("error: {flag} requires a value");
            1
        })?;
        *slot = value.parse().map_err(|_| {
            eprintln!("error: {flag} expects a non-negative integer, got '{value}'");
            1
        })?;
    }

    Ok(config)
}
