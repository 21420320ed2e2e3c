//! Breadbox command-line driver
//!
//! Usage:
//!   breadbox --resources resources.json upsert posts request.json
//!   breadbox upsert posts request.json --id 5
//!   breadbox delete posts 5
//!   breadbox reorder-menu tree.json
//!   breadbox validate posts request.json
//!
//! Set RUST_LOG to filter log output; -v switches to debug level.

use std::process::ExitCode;

use anyhow::Result;
use breadbox_cli::{Cli, execute};
use clap::Parser;
use tracing::Level;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let outcome = execute(&cli)?;
    if outcome.success {
        println!("{}", outcome.output);
        Ok(ExitCode::SUCCESS)
    } else {
        eprintln!("{}", outcome.output);
        Ok(ExitCode::FAILURE)
    }
}

fn init_logging(verbose: bool) {
    if std::env::var_os("RUST_LOG").is_some() {
        FmtSubscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .with_target(false)
            .compact()
            .with_writer(std::io::stderr)
            .init();
        return;
    }
    let log_level = if verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .compact()
        .with_writer(std::io::stderr)
        .init();
}
