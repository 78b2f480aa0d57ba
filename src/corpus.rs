//! Detection corpus: pattern rules, attack payloads, and error signatures
//!
//! All three tables are configuration, not compiled logic. The built-in
//! defaults can be replaced wholesale by loading a TOML corpus file, which
//! lets users extend or localize detection without touching engine code.
//! Table order is significant: the scanner applies pattern rules in order
//! and stops at the first match per line, and the prober sends payloads in
//! order.

use crate::models::Category;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// One static-scanner rule: a regular expression with the finding it emits.
///
/// Rules are evaluated in table order; the first match on a line wins and
/// suppresses the rest, so broader rules belong later in the table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternRule {
    #[serde(rename = "regex")]
    pub pattern: String,
    pub description: String,
    pub category: Category,
}

/// Injection technique a payload exercises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Technique {
    BooleanBased,
    StackedQuery,
    UnionBased,
    CommentTruncation,
    TimeDelay,
}

/// One literal attack string for the dynamic prober.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payload {
    pub value: String,
    pub technique: Technique,
}

/// Errors raised while loading or validating a corpus file.
#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("failed to read corpus file {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse corpus file {path:?}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid pattern rule `{pattern}`")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: Box<regex::Error>,
    },
}

/// The full detection corpus consumed by both engines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Corpus {
    /// Ordered pattern rules for the static scanner.
    #[serde(default = "default_patterns")]
    pub patterns: Vec<PatternRule>,
    /// Ordered attack payloads for the dynamic prober.
    ///
    /// The defaults include destructive SQL (table drops, stacked queries)
    /// sent verbatim by the prober. That is inherited detection behavior,
    /// not an accident; see the prober docs before pointing this at
    /// anything you cannot restore.
    #[serde(default = "default_payloads")]
    pub payloads: Vec<Payload>,
    /// Lowercase substrings that mark a response as leaking a database error.
    #[serde(default = "default_signatures")]
    pub signatures: Vec<String>,
}

impl Default for Corpus {
    fn default() -> Self {
        Self {
            patterns: default_patterns(),
            payloads: default_payloads(),
            signatures: default_signatures(),
        }
    }
}

impl Corpus {
    /// Load a corpus from a TOML file. Missing tables fall back to the
    /// built-in defaults; present tables replace them entirely.
    pub fn load(path: &Path) -> Result<Self, CorpusError> {
        let text = std::fs::read_to_string(path).map_err(|source| CorpusError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let corpus: Corpus = toml::from_str(&text).map_err(|source| CorpusError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        corpus.validate()?;
        Ok(corpus)
    }

    /// Check that every pattern rule compiles as a regular expression.
    pub fn validate(&self) -> Result<(), CorpusError> {
        for rule in &self.patterns {
            regex::RegexBuilder::new(&rule.pattern)
                .case_insensitive(true)
                .dot_matches_new_line(true)
                .build()
                .map_err(|source| CorpusError::InvalidPattern {
                    pattern: rule.pattern.clone(),
                    source: Box::new(source),
                })?;
        }
        Ok(())
    }
}

fn rule(pattern: &str, description: &str) -> PatternRule {
    PatternRule {
        pattern: pattern.to_string(),
        description: description.to_string(),
        category: Category::SqlInjection,
    }
}

/// Built-in pattern rules, in precedence order.
pub fn default_patterns() -> Vec<PatternRule> {
    vec![
        rule(r"execute\s*\([^)]*\+[^)]*\)", "String concatenation in execute"),
        rule(r"\.(execute|executemany)\s*\([^)]*%\s*s", "%-format in query"),
        rule(
            r"\.(execute|executemany)\s*\([^)]*\.format\s*\(",
            "str.format in query",
        ),
        rule(
            r#""(?:SELECT|INSERT|UPDATE|DELETE)\s+[^"]*\{[^}]*\}"#,
            "F-string in SQL",
        ),
        rule(
            r"'(?:SELECT|INSERT|UPDATE|DELETE)\s+[^']*\{[^}]*\}",
            "F-string in SQL",
        ),
        rule(r"query\s*=\s*[^;]+;\s*query\s*\+=", "Query built with +="),
        rule(
            r"Statement\.execute\s*\([^)]*\+",
            "Java statement concatenation",
        ),
        rule(
            r"createStatement\s*\(\s*\)\s*\.\s*execute\s*\([^)]*\+",
            "Statement + string",
        ),
        rule(r"raw\s*\(\s*[^)]*\+", "Raw query concatenation"),
        rule(
            r"\.format\s*\([^)]*\)\s*\)\s*\.(execute|query)",
            "Format then execute",
        ),
    ]
}

fn payload(value: &str, technique: Technique) -> Payload {
    Payload {
        value: value.to_string(),
        technique,
    }
}

/// Built-in attack payloads, in sweep order.
pub fn default_payloads() -> Vec<Payload> {
    vec![
        payload("' OR '1'='1", Technique::BooleanBased),
        payload("'; DROP TABLE users; --", Technique::StackedQuery),
        payload("' UNION SELECT NULL --", Technique::UnionBased),
        payload("1' OR '1'='1' --", Technique::BooleanBased),
        payload("1 OR 1=1", Technique::BooleanBased),
        payload("admin'--", Technique::CommentTruncation),
        payload("' OR 1=1--", Technique::BooleanBased),
        payload("1; SELECT pg_sleep(5)--", Technique::TimeDelay),
    ]
}

/// Built-in response signatures: lowercase substrings of common database
/// error messages across MySQL, PostgreSQL, SQLite, Oracle, and SQL Server.
pub fn default_signatures() -> Vec<String> {
    [
        "sql syntax",
        "syntax error",
        "mysql_fetch",
        "pg_query",
        "sqlite_",
        "ora-01",
        "unclosed quotation",
        "quoted string not properly terminated",
        "unexpected end of sql",
        "warning: mysql",
        "valid mysql result",
        "myisam",
        "mysqli",
        "postgresql",
        "sqlstate",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}
