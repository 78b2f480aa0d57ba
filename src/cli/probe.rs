//! `probe` command: dynamic payload sweep against a live endpoint

use crate::corpus::Corpus;
use crate::prober::{Method, ProbeConfig, Prober};
use crate::reporters;
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

#[derive(clap::Args, Debug)]
pub struct ProbeArgs {
    /// Target endpoint URL
    pub url: String,

    /// Baseline request parameter (repeatable): --param name=value
    #[arg(long = "param", value_name = "KEY=VALUE", value_parser = super::parse_key_val)]
    pub params: Vec<(String, String)>,

    /// HTTP method for probe requests
    #[arg(long, default_value = "POST", value_parser = ["GET", "POST", "get", "post"])]
    pub method: String,

    /// Extra request header (repeatable): --header 'Name: value'
    #[arg(long = "header", value_name = "NAME:VALUE", value_parser = super::parse_header)]
    pub headers: Vec<(String, String)>,

    /// Per-request timeout in seconds
    #[arg(long, default_value = "10")]
    pub timeout: u64,

    /// Skip TLS certificate verification
    #[arg(long)]
    pub insecure: bool,

    /// Load payloads and signatures from a TOML corpus file
    #[arg(long, value_name = "FILE")]
    pub rules: Option<PathBuf>,

    /// Concurrent probe requests (1 = strictly sequential sweep)
    #[arg(long, default_value = "1", value_parser = super::parse_workers)]
    pub concurrency: usize,

    /// Overall sweep deadline in seconds; pairs not started in time are skipped
    #[arg(long, value_name = "SECS")]
    pub deadline: Option<u64>,

    /// Output format: text, json
    #[arg(long, short = 'f', default_value = "json", value_parser = ["text", "json"])]
    pub format: String,

    /// Write the report to FILE instead of stdout
    #[arg(long, short = 'o', value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Exit with code 1 if any finding is produced (CI gate)
    #[arg(long)]
    pub fail_on_findings: bool,
}

pub(crate) fn run(args: &ProbeArgs) -> Result<i32> {
    let corpus = match &args.rules {
        Some(path) => Corpus::load(path)
            .with_context(|| format!("failed to load corpus from {}", path.display()))?,
        None => Corpus::default(),
    };
    let method = Method::from_str(&args.method)?;

    if args.params.is_empty() {
        warn!("no --param given; nothing to substitute payloads into");
    }

    let config = ProbeConfig {
        timeout: Duration::from_secs(args.timeout),
        verify_tls: !args.insecure,
        concurrency: args.concurrency,
        deadline: args.deadline.map(Duration::from_secs),
    };
    let prober = Prober::with_config(&args.url, &corpus, config);
    let findings = prober.test_endpoint(&args.url, &args.params, method, &args.headers);

    let rendered = reporters::report(&findings, &args.format)?;
    super::emit_report(&rendered, args.output.as_deref(), findings.len())?;

    Ok(if args.fail_on_findings && !findings.is_empty() {
        1
    } else {
        0
    })
}
