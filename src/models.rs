//! Core data models for sqlprobe
//!
//! The `Finding` record is the shared output of both detection engines and
//! the input to everything downstream (reporters, remediation lookup, exit
//! code policy).

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

/// Vulnerability classes this tool can report.
///
/// Closed set: extending coverage means adding pattern or payload table
/// entries, not new record shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "SQL_INJECTION")]
    SqlInjection,
    #[serde(rename = "XSS")]
    Xss,
    #[serde(rename = "COMMAND_INJECTION")]
    CommandInjection,
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::SqlInjection => write!(f, "SQL_INJECTION"),
            Category::Xss => write!(f, "XSS"),
            Category::CommandInjection => write!(f, "COMMAND_INJECTION"),
        }
    }
}

impl FromStr for Category {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "SQL_INJECTION" | "SQLI" => Ok(Category::SqlInjection),
            "XSS" => Ok(Category::Xss),
            "COMMAND_INJECTION" => Ok(Category::CommandInjection),
            _ => Err(anyhow::anyhow!(
                "Unknown vulnerability type '{}'. Valid types: SQL_INJECTION, XSS, COMMAND_INJECTION",
                s
            )),
        }
    }
}

/// Where a finding was detected, plus its verbatim evidence.
///
/// Static findings point at a source line; dynamic findings point at an
/// endpoint parameter and carry the payload that triggered the signature.
/// Serialized flat into the finding record so JSON reports read as
/// `{file, line, code, ...}` or `{endpoint, parameter, payload, status_code, ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Location {
    Static {
        file: PathBuf,
        /// 1-indexed line number
        line: u32,
        /// Matched source line, trimmed
        code: String,
    },
    Dynamic {
        endpoint: String,
        parameter: String,
        /// Attack string sent, verbatim
        payload: String,
        status_code: u16,
    },
}

/// One detected (or suspected) vulnerability instance.
///
/// Findings are created once and never mutated or deduplicated; repeated
/// scans produce fresh independent sequences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    #[serde(rename = "type")]
    pub category: Category,
    pub description: String,
    #[serde(flatten)]
    pub location: Location,
}

impl Finding {
    /// A static-scanner finding on one source line.
    pub fn static_match(
        category: Category,
        description: impl Into<String>,
        file: impl Into<PathBuf>,
        line: u32,
        code: impl Into<String>,
    ) -> Self {
        Self {
            category,
            description: description.into(),
            location: Location::Static {
                file: file.into(),
                line,
                code: code.into(),
            },
        }
    }

    /// A dynamic-prober finding for one (parameter, payload) pair.
    pub fn dynamic_match(
        category: Category,
        description: impl Into<String>,
        endpoint: impl Into<String>,
        parameter: impl Into<String>,
        payload: impl Into<String>,
        status_code: u16,
    ) -> Self {
        Self {
            category,
            description: description.into(),
            location: Location::Dynamic {
                endpoint: endpoint.into(),
                parameter: parameter.into(),
                payload: payload.into(),
                status_code,
            },
        }
    }

    /// The verbatim evidence: the matched source line or the payload string.
    pub fn evidence(&self) -> &str {
        match &self.location {
            Location::Static { code, .. } => code,
            Location::Dynamic { payload, .. } => payload,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parsing() {
        assert_eq!(
            Category::from_str("SQL_INJECTION").unwrap(),
            Category::SqlInjection
        );
        assert_eq!(Category::from_str("xss").unwrap(), Category::Xss);
        assert_eq!(
            Category::from_str("command_injection").unwrap(),
            Category::CommandInjection
        );
        assert!(Category::from_str("CSRF").is_err());
    }

    #[test]
    fn test_static_finding_serialization() {
        let finding = Finding::static_match(
            Category::SqlInjection,
            "String concatenation in execute",
            "src/db.py",
            42,
            r#"cursor.execute("SELECT * FROM t WHERE id=" + uid)"#,
        );
        let json = serde_json::to_value(&finding).unwrap();
        assert_eq!(json["type"], "SQL_INJECTION");
        assert_eq!(json["file"], "src/db.py");
        assert_eq!(json["line"], 42);
        assert!(json["code"].as_str().unwrap().contains("execute"));
        assert!(json.get("endpoint").is_none());
    }

    #[test]
    fn test_dynamic_finding_serialization() {
        let finding = Finding::dynamic_match(
            Category::SqlInjection,
            "Error-based SQL injection",
            "http://target/login",
            "id",
            "' OR '1'='1",
            500,
        );
        let json = serde_json::to_value(&finding).unwrap();
        assert_eq!(json["endpoint"], "http://target/login");
        assert_eq!(json["parameter"], "id");
        assert_eq!(json["payload"], "' OR '1'='1");
        assert_eq!(json["status_code"], 500);
        assert!(json.get("file").is_none());
    }

    #[test]
    fn test_finding_roundtrip() {
        let finding = Finding::static_match(Category::Xss, "desc", "a.js", 1, "code");
        let json = serde_json::to_string(&finding).unwrap();
        let back: Finding = serde_json::from_str(&json).unwrap();
        assert_eq!(back, finding);
    }

    #[test]
    fn test_evidence_accessor() {
        let s = Finding::static_match(Category::SqlInjection, "d", "f.py", 1, "the line");
        assert_eq!(s.evidence(), "the line");
        let d = Finding::dynamic_match(Category::SqlInjection, "d", "http://t", "p", "payload", 200);
        assert_eq!(d.evidence(), "payload");
    }
}
