//! fixedcsv CLI - parse a fixed-arity CSV file and print one row

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use fixedcsv::{memory, parse_path, MalformedPolicy, ParseConfig, Strategy, DEFAULT_ARITY};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "fixedcsv")]
#[command(version, about, long_about = None)]
struct Args {
    /// CSV file; first line is the header
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Fields per line
    #[arg(short, long, env = "FIXEDCSV_ARITY", default_value_t = DEFAULT_ARITY)]
    arity: usize,

    /// Row scan: scalar or vectorized
    #[arg(short, long, env = "FIXEDCSV_STRATEGY", default_value_t = Strategy::default())]
    strategy: Strategy,

    /// Data row to print (0-based)
    #[arg(short, long, default_value_t = 1)]
    row: usize,

    /// Malformed data lines: abort or skip
    #[arg(long, env = "FIXEDCSV_ON_MALFORMED", default_value_t = MalformedPolicy::default())]
    on_malformed: MalformedPolicy,

    /// Scan every line with both strategies and fail if they disagree
    #[arg(long)]
    verify: bool,

    /// Debug logging (overridden by RUST_LOG)
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: &Args) -> Result<()> {
    let config = ParseConfig::new(args.arity)?
        .with_strategy(args.strategy)
        .with_on_malformed(args.on_malformed)
        .with_verify(args.verify);

    let report = parse_path(&args.input, &config)
        .with_context(|| format!("parsing {}", args.input.display()))?;

    let row = report.table.get_row(args.row)?;
    print!("{row}");

    if !report.skipped.is_empty() {
        eprintln!("Skipped {} malformed line(s)", report.skipped.len());
    }
    println!("Execution Time = {}s", report.elapsed.as_secs_f32());
    if memory::is_tracking() {
        println!("Peak heap = {} bytes", memory::peak());
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
