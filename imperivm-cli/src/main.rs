//! Imperivm CLI: parse, check and run programs.
//!
//! Exit codes:
//! - 0: Success
//! - 1: Usage, input or syntax error
//! - 2: Program construction error (missing `main`, duplicate subroutine)
//! - 3: Runtime error
//! - n: The program ran `exit n`

mod commands;

use std::process;

fn main() {
    init_tracing();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let result = match args[1].as_str() {
        "run" => commands::run(&args[2..]),
        "check" => commands::check(&args[2..]),
        "parse" => commands::parse(&args[2..]),
        "--help" | "-h" | "help" => {
            print_usage();
            process::exit(0);
        }
        other if other.starts_with('-') => {
            eprintln!("error: unknown option '{other}'");
            eprintln!();
            print_usage();
            process::exit(1);
        }
        // A bare path runs the file.
        _ => commands::run(&args[1..]),
    };

    if let Err(code) = result {
        process::exit(code);
    }
}

/// Install a stderr log subscriber when `RUST_LOG` is set.
fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_level(true),
            )
            .with(EnvFilter::from_default_env())
            .init();
    }
}

fn print_usage() {
    eprintln!("Usage: imperivm <command> [args]");
    eprintln!("       imperivm <input.imp>");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  run <input.imp> [options]   Parse and execute a program");
    eprintln!("  check <input.imp>           Parse a program and report its subroutines");
    eprintln!("  parse <input.imp>           Print the parsed instruction tree");
    eprintln!();
    eprintln!("Run options:");
    eprintln!("  --max-call-depth N          Nested subroutine call limit (default 1024)");
    eprintln!("  --max-heap-cells N          Heap size limit (default 16777216)");
    eprintln!("  --max-string-bytes N        Longest string add/multiply may build (default 67108864)");
    eprintln!();
    eprintln!("Set RUST_LOG=imperivm_vm=trace to log every executed instruction.");
}
