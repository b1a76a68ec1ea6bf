//! scam command-line interpreter
//!
//! Reads one program from FILE (or standard input), evaluates it in a fresh
//! root environment and prints the result.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use clap::builder::RangedU64ValueParser;
use scam::debug::{EvalReport, TokensSection};
use scam::{
    EvalConfig, Error, MAX_EVAL_DEPTH, MAX_PARSE_DEPTH, ParseConfig, RunConfig, eval_with_config,
    make_root_env, parse_program_with_config, tokenize,
};

/// A small interpreter for a Lisp-family expression language.
#[derive(Parser, Debug)]
#[command(
    version,
    about,
    long_about = None,
    after_help = "Set RUST_LOG (e.g. RUST_LOG=scam=debug) to trace evaluation on stderr."
)]
struct Args {
    /// Print tokens, AST, global bindings and result.
    #[arg(long)]
    debug: bool,

    /// Maximum parenthesis nesting.
    #[arg(
        long,
        value_name = "N",
        default_value_t = MAX_PARSE_DEPTH,
        value_parser = RangedU64ValueParser::<usize>::new().range(1..)
    )]
    max_parse_depth: usize,

    /// Maximum evaluation depth.
    #[arg(
        long,
        value_name = "N",
        default_value_t = MAX_EVAL_DEPTH,
        value_parser = RangedU64ValueParser::<usize>::new().range(1..)
    )]
    max_eval_depth: usize,

    /// Program to run; standard input when omitted or `-`.
    file: Option<PathBuf>,
}

impl Args {
    fn run_config(&self) -> RunConfig {
        RunConfig {
            parse: ParseConfig {
                max_depth: self.max_parse_depth,
            },
            eval: EvalConfig {
                max_depth: self.max_eval_depth,
            },
        }
    }
}

/// Install a stderr subscriber, but only when `RUST_LOG` asks for one.
fn init_tracing() {
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::{EnvFilter, fmt};

    if std::env::var("RUST_LOG").is_err() {
        return;
    }

    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .try_init();
}

fn read_source(file: Option<&Path>) -> Result<String, String> {
    match file {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .map_err(|e| format!("cannot read '{}': {e}", path.display())),
        _ => {
            let mut source = String::new();
            std::io::stdin()
                .read_to_string(&mut source)
                .map_err(|e| format!("cannot read standard input: {e}"))?;
            Ok(source)
        }
    }
}

/// Run `source`, appending what should go to stdout to `out`.
///
/// In debug mode the token list is written before parsing, so it is there
/// even when the parser rejects the program.
fn execute(source: &str, args: &Args, out: &mut String) -> Result<(), Error> {
    let config = args.run_config();

    let tokens = tokenize(source)?;
    if args.debug {
        out.push_str(&TokensSection(&tokens).to_string());
    }

    let ast = parse_program_with_config(&tokens, config.parse)?;
    let env = make_root_env();
    let result = eval_with_config(&ast, &env, config.eval);

    if args.debug {
        let report = EvalReport {
            ast: &ast,
            env: &env,
            result: &result,
        };
        out.push_str(&report.to_string());
    } else if let Ok(value) = &result {
        out.push_str(&format!("{value}\n"));
    }

    result.map(|_| ()).map_err(Error::from)
}

fn main() -> ExitCode {
    let args = Args::parse();

    init_tracing();

    let source = match read_source(args.file.as_deref()) {
        Ok(source) => source,
        Err(message) => {
            eprintln!("error: {message}");
            return ExitCode::FAILURE;
        }
    };

    let mut output = String::new();
    let result = execute(&source, &args, &mut output);
    print!("{output}");

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
