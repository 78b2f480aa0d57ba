//! JSON reporter
//!
//! Outputs the findings sequence as pretty-printed JSON. This is the stable
//! machine contract: static findings carry `file`/`line`/`code`, dynamic
//! findings carry `endpoint`/`parameter`/`payload`/`status_code`, both carry
//! `type` and `description`.

use crate::models::Finding;
use anyhow::Result;

/// Render findings as JSON
pub fn render(findings: &[Finding]) -> Result<String> {
    Ok(serde_json::to_string_pretty(findings)?)
}
