//! CLI command definitions and handlers

mod fix;
mod predict;
mod probe;
mod remediate;
mod scan;

pub use fix::FixArgs;
pub use predict::PredictArgs;
pub use probe::ProbeArgs;
pub use remediate::RemediateArgs;
pub use scan::ScanArgs;

use anyhow::Result;
use clap::{Parser, Subcommand};

/// Parse and validate workers count (1-64)
pub(crate) fn parse_workers(s: &str) -> Result<usize, String> {
    let n: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if n == 0 {
        Err("workers must be at least 1".to_string())
    } else if n > 64 {
        Err("workers cannot exceed 64".to_string())
    } else {
        Ok(n)
    }
}

/// Parse `key=value` into a pair
pub(crate) fn parse_key_val(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("'{}' is not in key=value form", s)),
    }
}

/// Parse `Name: value` into a header pair
pub(crate) fn parse_header(s: &str) -> Result<(String, String), String> {
    match s.split_once(':') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(format!("'{}' is not in name:value form", s)),
    }
}

/// sqlprobe - SQL injection scanner and prober
#[derive(Parser, Debug)]
#[command(name = "sqlprobe")]
#[command(
    version,
    about = "SQL injection detection — static pattern scanning and live endpoint probing",
    long_about = "sqlprobe gives a fast signal about SQL injection risk before deeper review:\n\
the static scanner matches an ordered corpus of risky code patterns across source \
trees, and the dynamic prober sweeps live HTTP endpoints with attack payloads and \
classifies responses for leaked database errors.\n\n\
WARNING: `probe` sends destructive SQL payloads (including table drops) verbatim. \
Only run it against targets you are authorized to test and can restore.",
    after_help = "\
Examples:
  sqlprobe scan .                              Scan current directory, JSON to stdout
  sqlprobe scan src --fail-on-findings         CI gate: exit 1 on any finding
  sqlprobe scan . -o report.json               Write the report to a file
  sqlprobe probe http://127.0.0.1:8000/login --param user=bob --param pass=x
  sqlprobe predict src/                        Heuristic risk score for a tree
  sqlprobe remediate SQL_INJECTION python      Remediation guidance
  sqlprobe fix src/db.py python                Print a parameterized rewrite"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan a file or directory tree for SQL injection patterns
    Scan(ScanArgs),

    /// Probe a live HTTP endpoint with attack payloads (DESTRUCTIVE: sends
    /// DROP TABLE and stacked-query payloads verbatim)
    Probe(ProbeArgs),

    /// Predict vulnerability likelihood for a path or snippet
    Predict(PredictArgs),

    /// Look up remediation guidance for a vulnerability type and language
    Remediate(RemediateArgs),

    /// Rewrite SQL concatenation in a source file into parameterized form
    Fix(FixArgs),
}

/// Dispatch a parsed CLI invocation; returns the process exit code.
pub fn run(cli: Cli) -> Result<i32> {
    match &cli.command {
        Commands::Scan(args) => scan::run(args),
        Commands::Probe(args) => probe::run(args),
        Commands::Predict(args) => predict::run(args),
        Commands::Remediate(args) => remediate::run(args),
        Commands::Fix(args) => fix::run(args),
    }
}

/// Write a rendered report to a file (with a stderr summary) or stdout.
pub(crate) fn emit_report(
    rendered: &str,
    output: Option<&std::path::Path>,
    finding_count: usize,
) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, rendered)?;
            eprintln!("Wrote {} findings to {}", finding_count, path.display());
        }
        None => println!("{}", rendered),
    }
    Ok(())
}
