//! Portico - Main entry point
//!
//! Resolves the effective configuration and reports it.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use portico_proxy::{init_logging, startup, LogFormat};

/// Portico - reverse proxy with automatic certificates
#[derive(Parser, Debug)]
#[command(name = "portico")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long = "config", env = "PORTICO_CONFIG")]
    config: Option<PathBuf>,

    /// Test configuration and exit
    #[arg(short = 't', long = "test")]
    test: bool,

    /// Enable verbose logging (debug level)
    #[arg(long = "verbose")]
    verbose: bool,

    /// Log output format
    #[arg(long = "log-format", value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    /// Print the effective configuration as JSON
    #[arg(long = "print")]
    print: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.log_format)?;

    if cli.test {
        return test_config(&cli);
    }

    run(&cli)
}

/// Test configuration file and exit
fn test_config(cli: &Cli) -> Result<()> {
    let result = startup::check(cli.config.as_deref())?;

    info!(
        warnings = result.warnings.len(),
        "Configuration test successful"
    );
    println!(
        "portico: configuration file {} test is successful",
        cli.config
            .as_deref()
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| "(defaults)".to_string())
    );

    Ok(())
}

fn run(cli: &Cli) -> Result<()> {
    let started = startup::bootstrap(cli.config.as_deref())?;

    if cli.print {
        let json = serde_json::to_string_pretty(&*started.config)
            .context("Failed to serialize effective configuration")?;
        println!("{}", json);
    }

    info!(
        entry_points = started.config.entry_points.len(),
        acme = started.acme.is_some(),
        "Portico configuration ready"
    );

    Ok(())
}
