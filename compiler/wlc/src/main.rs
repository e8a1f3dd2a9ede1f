//! WL front-end CLI.

use std::io::IsTerminal;

use wlc::commands::{check_files, explain_error, lex_file, parse_file, parse_options, Options};
use wlc::{demo_config, FrontendConfig};

fn main() {
    wlc::init_tracing();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    let command = &args[1];

    let ok = match command.as_str() {
        "lex" => {
            let (options, paths) = options_or_exit(&args[2..]);
            let [path] = paths.as_slice() else {
                eprintln!("Usage: wl lex <file> [--trivia] [--format=human|json]");
                std::process::exit(1);
            };
            lex_file(&config_or_exit(), path, &options)
        }
        "parse" => {
            let (options, paths) = options_or_exit(&args[2..]);
            let [path] = paths.as_slice() else {
                eprintln!("Usage: wl parse <file> [--format=human|json]");
                std::process::exit(1);
            };
            parse_file(&config_or_exit(), path, &options)
        }
        "check" => {
            let (options, paths) = options_or_exit(&args[2..]);
            if paths.is_empty() {
                eprintln!("Usage: wl check <file>... [--format=human|json]");
                std::process::exit(1);
            }
            check_files(&config_or_exit(), &paths, &options)
        }
        "--explain" | "explain" => {
            if args.len() < 3 {
                eprintln!("Usage: wl explain <ERROR_CODE>");
                eprintln!("Example: wl explain E1001");
                std::process::exit(1);
            }
            explain_error(&args[2])
        }
        "help" | "--help" | "-h" => {
            print_usage();
            true
        }
        "version" | "--version" | "-V" => {
            println!("wl {}", env!("CARGO_PKG_VERSION"));
            true
        }
        _ => {
            eprintln!("Unknown command: {command}");
            eprintln!();
            print_usage();
            false
        }
    };

    if !ok {
        std::process::exit(1);
    }
}

fn options_or_exit(args: &[String]) -> (Options, Vec<String>) {
    match parse_options(args) {
        Ok((mut options, positional)) => {
            options.tty = std::io::stderr().is_terminal();
            (options, positional)
        }
        Err(message) => {
            eprintln!("error: {message}");
            std::process::exit(1);
        }
    }
}

fn config_or_exit() -> FrontendConfig {
    match demo_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("internal error: invalid built-in language: {e}");
            std::process::exit(2);
        }
    }
}

fn print_usage() {
    println!("WL compiler front end");
    println!();
    println!("Usage: wl <command> [options]");
    println!();
    println!("Commands:");
    println!("  lex <file>           Tokenize and list tokens");
    println!("  parse <file>         Parse and dump the syntax tree");
    println!("  check <file>...      Report diagnostics for one or more files");
    println!("  explain <code>       Explain an error code (e.g., E1001)");
    println!("  help                 Show this help message");
    println!("  version              Show version information");
    println!();
    println!("Options:");
    println!("  --format=<fmt>       Diagnostic format: human (default), json");
    println!("  --color=<when>       Colored diagnostics: auto (default), always, never");
    println!("  --trivia             lex: also list whitespace and comments");
    println!();
    println!("Set RUST_LOG (e.g. RUST_LOG=wl_parse=trace) for tracing output.");
}
