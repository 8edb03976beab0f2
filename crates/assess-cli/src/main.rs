//! `assess` - candidate screening from the command line.
//!
//! Prompts for each parameter of the screening questionnaire, grades the
//! answers and prints whether the candidate passes. With `--answers` the
//! questionnaire is read from a YAML or JSON file instead.

mod screening;
mod session;

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use screening::Thresholds;
use session::{Format, Presenter};

#[derive(Parser, Debug)]
#[command(
    name = "assess",
    about = "Screen candidates against a graded questionnaire",
    version
)]
struct Cli {
    /// YAML or JSON file mapping parameter names to answers
    #[arg(long)]
    answers: Option<PathBuf>,

    /// Output format for the verdict
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Most Conditional grades a passing candidate may have
    #[arg(long, default_value_t = Thresholds::default().max_conditional)]
    max_conditional: usize,

    /// Most Fail grades a passing candidate may have
    #[arg(long, default_value_t = Thresholds::default().max_fail)]
    max_fail: usize,

    /// Evaluate a single candidate without asking to repeat
    #[arg(long)]
    once: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Log engine activity at debug level
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::from(2)
        }
    }
}

/// Returns whether the last evaluated candidate passed.
fn run(cli: Cli) -> Result<bool> {
    let thresholds = Thresholds {
        max_conditional: cli.max_conditional,
        max_fail: cli.max_fail,
    };
    let mut engine = screening::engine(thresholds).context("Invalid screening configuration")?;

    let presenter = Presenter {
        format: cli.format,
        color: !cli.no_color,
    };

    let outcome = match cli.answers {
        Some(path) => {
            let answers = session::load_answers(&path)?;
            let outcome = session::run_answers(&mut engine, &answers)?;
            presenter.outcome(&mut io::stdout().lock(), &outcome)?;
            outcome
        }
        None => {
            let stdin = io::stdin();
            let stdout = io::stdout();
            session::run_interactive(
                &mut engine,
                &mut stdin.lock(),
                &mut stdout.lock(),
                presenter,
                cli.once,
            )?
        }
    };

    tracing::info!(subject = %outcome.subject, success = outcome.success, "Session finished");
    Ok(outcome.success)
}

/// RUST_LOG wins; otherwise warn, or debug with `--verbose`. Logs go to stderr.
fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}
