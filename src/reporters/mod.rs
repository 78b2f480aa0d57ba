//! Output reporters for findings
//!
//! Supports:
//! - `text` - Terminal output with colors
//! - `json` - Machine-readable JSON (the report contract for CI and piping)

mod json;
mod text;

use crate::models::Finding;
use anyhow::{anyhow, Result};
use std::str::FromStr;

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" | "terminal" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(anyhow!("Unknown format '{}'. Valid formats: text, json", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Render findings in the specified format
pub fn report(findings: &[Finding], format: &str) -> Result<String> {
    let fmt = OutputFormat::from_str(format)?;
    report_with_format(findings, fmt)
}

/// Render findings using an OutputFormat enum
pub fn report_with_format(findings: &[Finding], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => text::render(findings),
        OutputFormat::Json => json::render(findings),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::{Category, Finding};

    /// Findings covering both location shapes, for reporter tests.
    pub(crate) fn test_findings() -> Vec<Finding> {
        vec![
            Finding::static_match(
                Category::SqlInjection,
                "String concatenation in execute",
                "src/db.py",
                12,
                r#"cursor.execute("SELECT * FROM t WHERE id=" + uid)"#,
            ),
            Finding::dynamic_match(
                Category::SqlInjection,
                "Database error signature in response: \"sql syntax\"",
                "http://target.example/login",
                "id",
                "' OR '1'='1",
                500,
            ),
        ]
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!(OutputFormat::from_str("text").unwrap(), OutputFormat::Text);
        assert_eq!(OutputFormat::from_str("JSON").unwrap(), OutputFormat::Json);
        assert!(OutputFormat::from_str("sarif").is_err());
    }
}
