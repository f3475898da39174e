//! block-builder: assemble a block from a mempool directory and mine its header

use anyhow::{Context, Result};
use block_builder::{BuildConfig, BuilderError};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

/// Assemble a block from pending transactions and mine its header
#[derive(Parser, Debug)]
#[command(name = "block-builder")]
#[command(about = "Minimal proof-of-work block builder")]
struct Args {
    /// JSON configuration file; absent keys keep their defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory of transaction records (overrides the configuration)
    #[arg(short, long)]
    mempool: Option<PathBuf>,

    /// Output artifact path (overrides the configuration)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Mining worker threads
    #[arg(short, long)]
    threads: Option<usize>,

    /// Abort mining after this many seconds
    #[arg(long)]
    timeout: Option<u64>,
}

impl Args {
    fn into_config(self) -> Result<BuildConfig> {
        let mut config = match &self.config {
            Some(path) => BuildConfig::from_file(path)
                .with_context(|| format!("loading configuration from {}", path.display()))?,
            None => BuildConfig::default(),
        };
        if let Some(mempool) = self.mempool {
            config.mempool_dir = mempool;
        }
        if let Some(output) = self.output {
            config.output_file = output;
        }
        if let Some(threads) = self.threads {
            config.threads = threads;
        }
        if self.timeout.is_some() {
            config.timeout_secs = self.timeout;
        }
        Ok(config)
    }
}

fn main() -> ExitCode {
    env_logger::init();

    let config = match Args::parse().into_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    match block_builder::run(config) {
        Ok(report) => {
            println!("Mining completed. Block hash: {}", report.mined.hash);
            ExitCode::SUCCESS
        }
        Err(BuilderError::MiningAborted { attempts }) => {
            eprintln!("Mining aborted after {} attempts without a solution", attempts);
            ExitCode::from(2)
        }
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
