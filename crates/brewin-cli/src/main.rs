//! Brewin CLI
//!
//! Main entry point for the `brewin` command.

use brewin_eval::{BufferedConsole, Console, EvalError, Interpreter, StdConsole};
use brewin_types::{CompileErrors, SourceFile};
use clap::{ArgAction, Parser};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const EXIT_RUNTIME_ERROR: u8 = 1;
const EXIT_SYNTAX_ERROR: u8 = 2;
const EXIT_UNREADABLE: u8 = 3;

#[derive(Parser)]
#[command(name = "brewin")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Run Brewin programs", long_about = None)]
struct Cli {
    /// Source file
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Input line for `inputi`, used instead of stdin (repeatable)
    #[arg(long = "input", value_name = "LINE")]
    inputs: Vec<String>,

    /// Print the parsed AST as JSON instead of running
    #[arg(long)]
    dump_ast: bool,

    /// Report diagnostics as JSON
    #[arg(long)]
    json_errors: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let source = match std::fs::read_to_string(&cli.file) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("error: cannot read {}: {e}", cli.file.display());
            return ExitCode::from(EXIT_UNREADABLE);
        }
    };
    let source_file = SourceFile::new(cli.file.display().to_string(), source);

    let parsed = brewin_parser::parse_source(&source_file);
    let program = match parsed.program {
        Some(program) if !parsed.errors.has_errors() => program,
        _ => {
            report_syntax_errors(&parsed.errors, cli.json_errors);
            return ExitCode::from(EXIT_SYNTAX_ERROR);
        }
    };
    tracing::info!(functions = program.functions.len(), "parsed {}", source_file.name);

    if cli.dump_ast {
        return match serde_json::to_string_pretty(&program) {
            Ok(json) => {
                println!("{json}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("error: cannot serialize AST: {e}");
                ExitCode::FAILURE
            }
        };
    }

    let result = if cli.inputs.is_empty() {
        Interpreter::new(StdConsole::new()).run(&program)
    } else {
        let mut console = BufferedConsole::new(cli.inputs);
        let result = Interpreter::new(&mut console).run(&program);
        let mut stdout = StdConsole::new();
        for line in console.output() {
            if let Err(e) = stdout.write_line(line) {
                eprintln!("error: cannot write output: {e}");
                return ExitCode::FAILURE;
            }
        }
        result
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report_runtime_error(&source_file, &e, cli.json_errors);
            ExitCode::from(EXIT_RUNTIME_ERROR)
        }
    }
}

/// Install the stderr subscriber. `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn report_syntax_errors(errors: &CompileErrors, json: bool) {
    if json {
        match serde_json::to_string_pretty(errors) {
            Ok(out) => eprintln!("{out}"),
            Err(e) => eprintln!("error: cannot serialize diagnostics: {e}"),
        }
        return;
    }
    for err in &errors.errors {
        eprintln!("{err}");
        if !err.source_line.is_empty() {
            eprintln!("  | {}", err.source_line);
        }
        if let Some(suggestion) = &err.suggestion {
            eprintln!("  = help: {suggestion}");
        }
    }
    let dropped = errors.total_errors.saturating_sub(errors.errors.len());
    if dropped > 0 {
        eprintln!("... and {dropped} more errors");
    }
}

fn report_runtime_error(source_file: &SourceFile, err: &EvalError, json: bool) {
    if json {
        let value = serde_json::json!({
            "file": source_file.name,
            "type": err.error_type(),
            "message": err.message(),
            "span": err.span(),
        });
        eprintln!("{value}");
        return;
    }
    eprintln!("{}: {err}", source_file.name);
    if let Some(line) = source_file.line(err.span().start_line) {
        eprintln!("  | {line}");
    }
}
