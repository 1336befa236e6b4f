//! Promo Depth CLI
//!
//! - `convert`: add a `Promo Depth` column to a CSV price list
//! - `depth`: compute the depth of individual cells
//! - `check`: run the YAML regression fixtures

use std::{
    io::{self, Write},
    path::PathBuf,
    process::ExitCode,
    time::Instant,
};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use promo_depth::{
    batch::DepthSheet,
    engine::{Evaluation, evaluate},
    fixtures::RegressionSet,
    report::{DEFAULT_PREVIEW_ROWS, write_preview, write_summary},
};

/// Log output format.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Args)]
struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "RUST_LOG", default_value = "warn")]
    log_level: String,

    /// Log format (compact, json)
    #[arg(long, global = true, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    log_format: LogFormat,
}

#[derive(Debug, Parser)]
#[command(name = "promo-depth", about = "Infer discount depth from promo text", long_about = None)]
struct Cli {
    #[command(flatten)]
    logging: LoggingConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Convert a CSV price list
    Convert(ConvertArgs),

    /// Compute the depth of promo cells
    Depth(DepthArgs),

    /// Run regression fixtures
    Check(CheckArgs),
}

#[derive(Debug, Args)]
struct ConvertArgs {
    /// CSV export with a `Price & Promo` or `Price & Promo Details` column
    input: PathBuf,

    /// Output CSV file
    #[arg(short, long, default_value = "Promo_Depth_Calculated.csv")]
    output: PathBuf,

    /// Number of rows to preview
    #[arg(long, default_value_t = DEFAULT_PREVIEW_ROWS)]
    preview: usize,
}

#[derive(Debug, Args)]
struct DepthArgs {
    /// Cells such as `400 - Save 33%`
    #[arg(required = true)]
    cells: Vec<String>,

    /// Show which rules fired
    #[arg(long)]
    explain: bool,
}

#[derive(Debug, Args)]
struct CheckArgs {
    /// Regression fixture file
    #[arg(default_value = "fixtures/cases.yml")]
    fixture: PathBuf,
}

/// Promo Depth CLI entry point
pub fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(&cli.logging);

    match run(cli.command) {
        Ok(code) => code,
        Err(error) => {
            #[expect(clippy::print_stderr, reason = "fatal error reported to the user")]
            {
                eprintln!("Error: {error:#}");
            }

            ExitCode::FAILURE
        }
    }
}

fn init_logging(config: &LoggingConfig) {
    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr);

    match config.log_format {
        LogFormat::Compact => builder.compact().with_target(true).init(),
        LogFormat::Json => builder.json().with_current_span(true).init(),
    }
}

fn run(command: Commands) -> Result<ExitCode> {
    match command {
        Commands::Convert(args) => convert(&args),
        Commands::Depth(args) => depth(&args),
        Commands::Check(args) => check(&args),
    }
}

fn convert(args: &ConvertArgs) -> Result<ExitCode> {
    let start = Instant::now();

    let sheet = DepthSheet::from_path(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;

    sheet
        .write_path(&args.output)
        .with_context(|| format!("writing {}", args.output.display()))?;

    let elapsed = start.elapsed();

    info!(output = %args.output.display(), rows = sheet.len(), "wrote promo depths");

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    write_preview(&mut handle, &sheet, args.preview)?;
    write_summary(&mut handle, &sheet, elapsed)?;

    writeln!(handle, " Written to: {}", args.output.display())?;

    Ok(ExitCode::SUCCESS)
}

fn depth(args: &DepthArgs) -> Result<ExitCode> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();

    for cell in &args.cells {
        let evaluation = evaluate(cell.as_str());

        writeln!(handle, "{:>7.2}  {cell}", evaluation.depth())?;

        if args.explain {
            explain(&mut handle, &evaluation)?;
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn explain(mut out: impl Write, evaluation: &Evaluation) -> io::Result<()> {
    match evaluation {
        Evaluation::NoPromo => writeln!(out, "         no promo text"),
        Evaluation::Decided { rule, depth } => writeln!(out, "         {rule}: {depth:.2}"),
        Evaluation::Aggregated(pool) if pool.is_empty() => {
            writeln!(out, "         no rule matched")
        }
        Evaluation::Aggregated(pool) => {
            for candidate in pool {
                writeln!(out, "         {}: {:.2}", candidate.rule, candidate.percent)?;
            }

            Ok(())
        }
    }
}

fn check(args: &CheckArgs) -> Result<ExitCode> {
    let set = RegressionSet::load(&args.fixture)
        .with_context(|| format!("loading {}", args.fixture.display()))?;

    let mismatches = set.run();

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    for mismatch in &mismatches {
        let cell = mismatch.case.cell.as_deref().unwrap_or("~");

        warn!(cell, expected = mismatch.case.depth, actual = mismatch.actual, "regression");

        writeln!(
            handle,
            " FAIL {cell:?}: expected {:.2}, got {:.2}",
            mismatch.case.depth, mismatch.actual
        )?;
    }

    writeln!(handle, " {} cases, {} failed", set.len(), mismatches.len())?;

    Ok(if mismatches.is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
