//! Static pattern scanner
//!
//! Walks a file or directory tree and matches the pattern corpus against
//! each source line. Deliberately shallow: no parsing, no AST, just ordered
//! regex rules applied line by line. The trade-off is false negatives for
//! multi-line constructs and false positives for benign look-alikes, both
//! accepted to stay fast and language-agnostic.
//!
//! Precedence is part of the contract: rules are tried in table order and
//! the first match wins, so a line yields at most one finding.

use crate::corpus::{Corpus, CorpusError, PatternRule};
use crate::models::{Category, Finding};
use rayon::prelude::*;
use regex::{Regex, RegexBuilder};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Extensions scanned when the caller does not supply a list.
pub const DEFAULT_EXTENSIONS: &[&str] = &["py", "java", "js", "ts", "php", "rb", "go", "cs"];

struct CompiledRule {
    regex: Regex,
    description: String,
    category: Category,
}

/// Line-oriented static scanner over an ordered pattern corpus.
pub struct Scanner {
    rules: Vec<CompiledRule>,
    stop: Option<Arc<AtomicBool>>,
}

impl Scanner {
    /// Scanner over the built-in pattern corpus.
    pub fn new() -> Self {
        Self::from_rules(&crate::corpus::default_patterns()).expect("built-in patterns compile")
    }

    /// Scanner over a loaded corpus.
    pub fn from_corpus(corpus: &Corpus) -> Result<Self, CorpusError> {
        Self::from_rules(&corpus.patterns)
    }

    /// Compile an ordered rule table. Order is preserved: it defines match
    /// precedence.
    pub fn from_rules(rules: &[PatternRule]) -> Result<Self, CorpusError> {
        let compiled = rules
            .iter()
            .map(|rule| {
                RegexBuilder::new(&rule.pattern)
                    .case_insensitive(true)
                    .dot_matches_new_line(true)
                    .build()
                    .map(|regex| CompiledRule {
                        regex,
                        description: rule.description.clone(),
                        category: rule.category,
                    })
                    .map_err(|source| CorpusError::InvalidPattern {
                        pattern: rule.pattern.clone(),
                        source: Box::new(source),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            rules: compiled,
            stop: None,
        })
    }

    /// Attach a cooperative stop flag. When set, in-progress directory scans
    /// stop picking up new files; findings already produced remain valid.
    pub fn with_stop_flag(mut self, stop: Arc<AtomicBool>) -> Self {
        self.stop = Some(stop);
        self
    }

    fn stopped(&self) -> bool {
        self.stop
            .as_ref()
            .map(|s| s.load(Ordering::Relaxed))
            .unwrap_or(false)
    }

    /// Scan a single file.
    ///
    /// A missing path is an empty result, not an error; so is an unreadable
    /// file (logged at debug level). Undecodable bytes are replaced rather
    /// than failing the file.
    pub fn scan_file(&self, path: &Path) -> Vec<Finding> {
        let mut findings = Vec::new();
        if self.stopped() || !path.exists() {
            return findings;
        }
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(err) => {
                debug!("skipping unreadable file {}: {}", path.display(), err);
                return findings;
            }
        };
        let text = String::from_utf8_lossy(&bytes);

        for (idx, line) in text.lines().enumerate() {
            // First matching rule wins; at most one finding per line.
            for rule in &self.rules {
                if rule.regex.is_match(line) {
                    findings.push(Finding::static_match(
                        rule.category,
                        rule.description.clone(),
                        path,
                        idx as u32 + 1,
                        line.trim(),
                    ));
                    break;
                }
            }
        }
        findings
    }

    /// Scan a file or directory tree.
    ///
    /// A file delegates to [`scan_file`](Self::scan_file). A directory is
    /// walked once in sorted order; files are bucketed per extension and the
    /// buckets scanned in the order extensions were given, fanning per-file
    /// work across the rayon pool. Per-file read failures are skipped; I/O
    /// never aborts the walk.
    pub fn scan_path(&self, root: &Path, extensions: &[String]) -> Vec<Finding> {
        if root.is_file() {
            return self.scan_file(root);
        }

        let exts: Vec<String> = if extensions.is_empty() {
            DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect()
        } else {
            extensions
                .iter()
                .map(|e| e.trim_start_matches('.').to_ascii_lowercase())
                .collect()
        };

        let mut buckets: Vec<Vec<PathBuf>> = vec![Vec::new(); exts.len()];
        let walker = ignore::WalkBuilder::new(root)
            .hidden(false)
            .ignore(false)
            .git_ignore(false)
            .git_global(false)
            .git_exclude(false)
            .parents(false)
            .sort_by_file_path(|a, b| a.cmp(b))
            .build();

        for entry in walker.filter_map(|e| e.ok()) {
            if self.stopped() {
                break;
            }
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
                continue;
            };
            if let Some(i) = exts.iter().position(|e| ext.eq_ignore_ascii_case(e)) {
                buckets[i].push(path.to_path_buf());
            }
        }

        let mut findings = Vec::new();
        for files in &buckets {
            // Ordered map: rayon preserves input order in the collected output.
            let per_file: Vec<Vec<Finding>> =
                files.par_iter().map(|file| self.scan_file(file)).collect();
            findings.extend(per_file.into_iter().flatten());
        }
        findings
    }
}

impl Default for Scanner {
    fn default() -> Self {
        Self::new()
    }
}
