//! earlyout
//!
//! Reads a file through carrier-returning frames and reports either its
//! content or the numeric error that stopped it.

use anyhow::{Context, Result};
use clap::Parser;
use earlyout::files::read_from_file_with;
use earlyout::{FaultPolicy, FrameConfig};
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

#[derive(Debug, Parser)]
#[command(version, about = "Read a file through early-return frames")]
struct Cli {
    /// File to read
    #[arg(default_value = "existing_file.txt")]
    path: PathBuf,

    /// What a frame does when its body panics
    #[arg(long, value_enum, env = "EARLYOUT_FAULT_POLICY", default_value_t = FaultPolicy::Propagate)]
    fault_policy: FaultPolicy,
}

fn main() -> ExitCode {
    let log_level = std::env::var("EARLYOUT_LOG").unwrap_or_else(|_| "info".to_string());

    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(exit_code) => exit_code,
        Err(e) => {
            error!("earlyout failed: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<ExitCode> {
    let config = FrameConfig::new().with_fault_policy(cli.fault_policy);
    info!("Reading {}", cli.path.display());

    let result = read_from_file_with(&config, &cli.path);
    let mut stdout = std::io::stdout().lock();
    if result.is_ok() {
        stdout
            .write_all(&result.value())
            .and_then(|_| writeln!(stdout))
            .context("Failed to write file content")?;
        Ok(ExitCode::SUCCESS)
    } else {
        writeln!(stdout, "Failed to read file with error {}", result.error())
            .context("Failed to write error report")?;
        Ok(ExitCode::FAILURE)
    }
}
