//! Text (terminal) reporter with colors

use crate::models::{Category, Finding, Location};
use anyhow::Result;

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";

fn category_tag(category: Category) -> &'static str {
    match category {
        Category::SqlInjection => "SQLI",
        Category::Xss => "XSS ",
        Category::CommandInjection => "CMDI",
    }
}

/// Render findings as formatted terminal output
pub fn render(findings: &[Finding]) -> Result<String> {
    let mut out = String::new();

    out.push_str(&format!("\n{BOLD}sqlprobe findings{RESET}\n"));
    out.push_str(&format!(
        "{DIM}──────────────────────────────────────{RESET}\n"
    ));

    if findings.is_empty() {
        out.push_str(&format!("{GREEN}No findings.{RESET}\n"));
        return Ok(out);
    }

    out.push_str(&format!(
        "{RED}{BOLD}{}{RESET} finding{}\n\n",
        findings.len(),
        if findings.len() == 1 { "" } else { "s" }
    ));

    for (i, finding) in findings.iter().enumerate() {
        let tag = category_tag(finding.category);
        match &finding.location {
            Location::Static { file, line, code } => {
                out.push_str(&format!(
                    "  {DIM}{:>3}{RESET}  {RED}[{tag}]{RESET}  {}  {DIM}{}:{}{RESET}\n",
                    i + 1,
                    finding.description,
                    file.display(),
                    line
                ));
                out.push_str(&format!("       {DIM}{}{RESET}\n", truncate(code, 90)));
            }
            Location::Dynamic {
                endpoint,
                parameter,
                payload,
                status_code,
            } => {
                out.push_str(&format!(
                    "  {DIM}{:>3}{RESET}  {RED}[{tag}]{RESET}  {}  {DIM}{} param={} ({}){RESET}\n",
                    i + 1,
                    finding.description,
                    endpoint,
                    parameter,
                    status_code
                ));
                out.push_str(&format!("       {DIM}payload: {}{RESET}\n", payload));
            }
        }
    }

    Ok(out)
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max).collect();
        format!("{}...", cut)
    }
}
