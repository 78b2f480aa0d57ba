//! sqlprobe - SQL injection scanner and prober
//!
//! Detects SQL-injection-style vulnerabilities two ways: a static pattern
//! scanner that walks source trees, and a dynamic prober that sends crafted
//! payloads to live HTTP endpoints.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    // Parse CLI args and run
    let cli = sqlprobe::cli::Cli::parse();
    let exit_code = sqlprobe::cli::run(cli)?;
    std::process::exit(exit_code);
}
