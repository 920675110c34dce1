use anyhow::Result;
use clap::Parser;
use sheetkit::{config::Config, matrix::Padding, pipeline};
use std::{path::PathBuf, process::ExitCode};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(
    name = "sheetkit",
    version,
    about = "Normalize, intern and encode header-less CSV files"
)]
struct Args {
    /// Glob of input CSV files, e.g. "data/*.csv"
    input: String,
    /// Output directory (overrides config and SHEETKIT_* env)
    output_dir: Option<PathBuf>,
    /// Padding for jagged rows: `holes` or `fill`
    #[arg(long)]
    padding: Option<Padding>,
    /// Write the padded values instead of a code matrix + code table
    #[arg(long)]
    plain: bool,
}

impl Args {
    fn apply(&self, config: &mut Config) {
        if let Some(out) = &self.output_dir {
            config.output_dir = out.clone();
        }
        if let Some(padding) = self.padding {
            config.padding = padding;
        }
        if self.plain {
            config.intern = false;
        }
    }
}

fn main() -> ExitCode {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Returns whether every input succeeded.
fn run(args: &Args) -> Result<bool> {
    // ─── 2) config: file → env → args ────────────────────────────────
    let mut config = Config::load()?;
    args.apply(&mut config);
    info!(?config, "startup");

    // ─── 3) discover inputs ──────────────────────────────────────────
    let inputs = pipeline::expand_inputs(&args.input)?;
    if inputs.is_empty() {
        info!(pattern = %args.input, "no input files; exit");
        return Ok(true);
    }
    info!("{} files to process", inputs.len());

    // ─── 4) process one at a time ────────────────────────────────────
    let report = pipeline::process_all(&inputs, &config);
    if !report.all_succeeded() {
        error!(
            failed = report.failed.len(),
            attempted = report.attempted(),
            "some inputs failed"
        );
    }
    info!("all done");
    Ok(report.all_succeeded())
}
