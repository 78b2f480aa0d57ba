//! `scan` command: static scanning of a file or directory tree

use crate::corpus::Corpus;
use crate::reporters;
use crate::scanner::Scanner;
use anyhow::{Context, Result};
use std::path::PathBuf;

#[derive(clap::Args, Debug)]
pub struct ScanArgs {
    /// File or directory to scan
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Output format: text, json
    #[arg(long, short = 'f', default_value = "json", value_parser = ["text", "json"])]
    pub format: String,

    /// Write the report to FILE instead of stdout
    #[arg(long, short = 'o', value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Exit with code 1 if any finding is produced (CI gate)
    #[arg(long)]
    pub fail_on_findings: bool,

    /// File extensions to scan (default: py java js ts php rb go cs)
    #[arg(long, num_args = 1..)]
    pub extensions: Vec<String>,

    /// Load pattern rules from a TOML corpus file instead of the built-ins
    #[arg(long, value_name = "FILE")]
    pub rules: Option<PathBuf>,

    /// Number of parallel workers (1-64)
    #[arg(long, default_value = "8", value_parser = super::parse_workers)]
    pub workers: usize,
}

pub(crate) fn run(args: &ScanArgs) -> Result<i32> {
    let corpus = match &args.rules {
        Some(path) => Corpus::load(path)
            .with_context(|| format!("failed to load corpus from {}", path.display()))?,
        None => Corpus::default(),
    };

    // First caller wins; later invocations in-process keep the existing pool.
    let _ = rayon::ThreadPoolBuilder::new()
        .num_threads(args.workers)
        .build_global();

    let scanner = Scanner::from_corpus(&corpus)?;
    let findings = scanner.scan_path(&args.path, &args.extensions);

    let rendered = reporters::report(&findings, &args.format)?;
    super::emit_report(&rendered, args.output.as_deref(), findings.len())?;

    Ok(if args.fail_on_findings && !findings.is_empty() {
        1
    } else {
        0
    })
}
