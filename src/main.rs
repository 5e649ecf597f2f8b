//! Fekal CLI
//!
//! Command-line interface for checking and inspecting policy files.

use std::env;
use std::fs;
use std::io::{self, IsTerminal, Read, Write};
use std::process;

use colored::Colorize;
use env_logger::{Builder, Env};
use log::Level;
use fekal::printer::{to_source, to_tree};
use fekal::{parse_source_with, Diagnostic, FekalError, Lexer, ParserOptions, Recovery, VERSION};

/// Command-line settings
struct Options {
    show_tokens: bool,
    format: bool,
    no_color: bool,
    verbosity: u8,
    parser: ParserOptions,
    filename: String,
}

fn main() {
    let args: Vec<String> = env::args().skip(1).collect();

    let options = match parse_args(&args) {
        Ok(Some(options)) => options,
        Ok(None) => {
            print_help();
            return;
        }
        Err(message) => {
            eprintln!("Error: {}", message);
            print_usage();
            process::exit(1);
        }
    };

    if options.no_color || !io::stdout().is_terminal() {
        colored::control::set_override(false);
    }
    init_logging(options.verbosity);

    let source = match read_input(&options.filename) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("{} {}", "error:".red().bold(), e);
            process::exit(1);
        }
    };

    let ok = if options.show_tokens {
        show_tokens(&source, &options.filename)
    } else {
        check_file(&source, &options)
    };

    if !ok {
        process::exit(1);
    }
}

/// Parse command-line flags; `Ok(None)` means help was requested
fn parse_args(args: &[String]) -> Result<Option<Options>, String> {
    let mut options = Options {
        show_tokens: false,
        format: false,
        no_color: false,
        verbosity: 0,
        parser: ParserOptions::default(),
        filename: String::new(),
    };
    let mut filename: Option<&String> = None;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--tokens" | "-t" => options.show_tokens = true,
            "--format" | "-f" => options.format = true,
            "--recover" | "-r" => {
                options.parser = options.parser.with_recovery(Recovery::Resynchronize)
            }
            "--no-color" => options.no_color = true,
            "--verbose" | "-v" => options.verbosity += 1,
            "-vv" => options.verbosity += 2,
            "--help" | "-h" => return Ok(None),
            "--max-depth" => {
                let value = iter
                    .next()
                    .ok_or_else(|| "--max-depth requires a value".to_string())?;
                let depth = value
                    .parse::<usize>()
                    .map_err(|_| format!("invalid --max-depth value '{}'", value))?;
                options.parser = options.parser.with_max_depth(depth);
            }
            "-" => filename = Some(arg),
            _ if arg.starts_with('-') => return Err(format!("Unknown flag: {}", arg)),
            _ => {
                if filename.is_some() {
                    return Err(format!("unexpected argument '{}'", arg));
                }
                filename = Some(arg)
            }
        }
    }

    match filename {
        Some(file) => {
            options.filename = file.clone();
            Ok(Some(options))
        }
        None => Err("No input file specified".to_string()),
    }
}

fn print_usage() {
    eprintln!("Usage: fekal [OPTIONS] <file>");
    eprintln!("       fekal --help");
}

fn print_help() {
    println!("fekal v{} - seccomp policy parser", VERSION);
    println!();
    println!("USAGE:");
    println!("    fekal [OPTIONS] <file>");
    println!();
    println!("OPTIONS:");
    println!("    -t, --tokens        Show tokenization output (lexer only)");
    println!("    -f, --format        Print canonical source instead of the tree");
    println!("    -r, --recover       Keep parsing after errors and report them all");
    println!(
        "        --max-depth N   Expression nesting limit (default {})",
        ParserOptions::DEFAULT_MAX_DEPTH
    );
    println!("        --no-color      Disable colored output");
    println!("    -v, --verbose       Log to stderr (-vv for token trace)");
    println!("    -h, --help          Show this help message");
    println!();
    println!("EXAMPLES:");
    println!("    fekal net.policy            Print the syntax tree");
    println!("    fekal --format net.policy   Reformat a policy file");
    println!("    cat net.policy | fekal -    Read from stdin");
}

fn read_input(filename: &str) -> Result<String, String> {
    if filename == "-" {
        let mut source = String::new();
        io::stdin()
            .read_to_string(&mut source)
            .map_err(|e| format!("Failed to read stdin: {}", e))?;
        return Ok(source);
    }

    fs::read_to_string(filename).map_err(|e| format!("Failed to read file '{}': {}", filename, e))
}

fn display_name(filename: &str) -> &str {
    if filename == "-" {
        "<stdin>"
    } else {
        filename
    }
}

/// Parse a policy and print it; returns false if any error was reported
fn check_file(source: &str, options: &Options) -> bool {
    match parse_source_with(source, Some(display_name(&options.filename)), &options.parser) {
        Ok(ast) => {
            if options.format {
                print!("{}", to_source(&ast));
            } else {
                print!("{}", to_tree(&ast));
            }
            true
        }
        Err(errors) => {
            report(&errors, source);
            false
        }
    }
}

fn report(errors: &[FekalError], source: &str) {
    for error in errors {
        eprintln!("{}", Diagnostic::with_source(error, source));
    }

    let noun = if errors.len() == 1 { "error" } else { "errors" };
    eprintln!(
        "{}",
        format!("{} {} generated", errors.len(), noun).red().bold()
    );
}

/// Show tokens from lexing a file
fn show_tokens(source: &str, filename: &str) -> bool {
    let name = display_name(filename);
    println!("Tokens for '{}':", name);
    println!("{}", "=".repeat(60));

    let mut count = 0;
    for (i, token) in Lexer::new(source, Some(name)).enumerate() {
        match token {
            Ok(token) => {
                println!(
                    "{:4}: {:20} | {:?} @ {}:{}",
                    i,
                    token.kind.to_string(),
                    token.lexeme,
                    token.location.line,
                    token.location.column
                );
                count += 1;
            }
            Err(e) => {
                println!("{}", "=".repeat(60));
                report(&[FekalError::from(e)], source);
                return false;
            }
        }
    }

    println!("{}", "=".repeat(60));
    println!("Total tokens: {}", count);
    true
}

/// Install the stderr logger; `RUST_LOG` overrides the `-v` level
fn init_logging(verbosity: u8) {
    let default = match verbosity {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let env = Env::default().filter_or("RUST_LOG", default);

    Builder::from_env(env)
        .format(|buf, record| {
            let level = match record.level() {
                Level::Error => "ERROR".red().bold(),
                Level::Warn => "WARN ".yellow().bold(),
                Level::Info => "INFO ".green(),
                Level::Debug => "DEBUG".cyan(),
                Level::Trace => "TRACE".dimmed(),
            };
            writeln!(buf, "{} {}", level, record.args())
        })
        .init();
}
