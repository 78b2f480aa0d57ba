//! Integration tests for the sqlprobe CLI
//!
//! These run the actual binary against tempdir fixtures to verify:
//! - Scanning produces findings with the documented JSON shape
//! - Exit-code policy (--fail-on-findings)
//! - Probing an unreachable host degrades to an empty report
//! - Probing a live (stub) endpoint reports parameter/payload/status
//! - remediate / fix / predict output contracts

use std::io::{Read, Write};
use std::net::TcpListener;
use std::process::Command;
use tempfile::TempDir;

fn binary_path() -> &'static str {
    env!("CARGO_BIN_EXE_sqlprobe")
}

/// Run sqlprobe with args and return (stdout, stderr, exit_code)
fn run_sqlprobe(args: &[&str]) -> (String, String, i32) {
    let output = Command::new(binary_path())
        .args(args)
        .output()
        .expect("Failed to execute sqlprobe binary");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let exit_code = output.status.code().unwrap_or(-1);

    (stdout, stderr, exit_code)
}

/// A workspace with one vulnerable and one clean Python file
fn create_test_workspace() -> TempDir {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    std::fs::write(
        dir.path().join("vulnerable.py"),
        r#"cursor.execute("SELECT * FROM users WHERE id=" + user_id)"#,
    )
    .expect("write fixture");
    std::fs::write(dir.path().join("clean.py"), "def add(a, b):\n    return a + b\n")
        .expect("write fixture");
    dir
}

fn parse_findings(stdout: &str) -> Vec<serde_json::Value> {
    let parsed: serde_json::Value =
        serde_json::from_str(stdout).unwrap_or_else(|e| panic!("invalid JSON ({}): {}", e, stdout));
    parsed.as_array().expect("findings array").clone()
}

// ============================================================================
// scan
// ============================================================================

#[test]
fn test_scan_reports_vulnerable_file_only() {
    let workspace = create_test_workspace();

    let (stdout, stderr, exit_code) =
        run_sqlprobe(&["scan", workspace.path().to_str().unwrap()]);
    assert_eq!(exit_code, 0, "stderr: {}", stderr);

    let findings = parse_findings(&stdout);
    assert_eq!(findings.len(), 1, "only the vulnerable file should match");

    let finding = &findings[0];
    assert_eq!(finding["type"], "SQL_INJECTION");
    assert_eq!(finding["description"], "String concatenation in execute");
    assert_eq!(finding["line"], 1);
    assert!(finding["file"]
        .as_str()
        .expect("file field")
        .ends_with("vulnerable.py"));
    assert!(finding["code"].as_str().expect("code field").contains("execute"));
}

#[test]
fn test_scan_fail_on_findings_exit_codes() {
    let workspace = create_test_workspace();

    let (_, _, exit_code) = run_sqlprobe(&[
        "scan",
        workspace.path().to_str().unwrap(),
        "--fail-on-findings",
    ]);
    assert_eq!(exit_code, 1, "findings + flag should exit 1");

    // Without the flag, findings exit 0.
    let (_, _, exit_code) = run_sqlprobe(&["scan", workspace.path().to_str().unwrap()]);
    assert_eq!(exit_code, 0);

    // Clean tree + flag exits 0.
    let clean = tempfile::tempdir().unwrap();
    std::fs::write(clean.path().join("ok.py"), "x = 1\n").unwrap();
    let (stdout, _, exit_code) = run_sqlprobe(&[
        "scan",
        clean.path().to_str().unwrap(),
        "--fail-on-findings",
    ]);
    assert_eq!(exit_code, 0);
    assert!(parse_findings(&stdout).is_empty());
}

#[test]
fn test_scan_nonexistent_path_is_empty() {
    let (stdout, _, exit_code) = run_sqlprobe(&["scan", "/no/such/path/anywhere"]);
    assert_eq!(exit_code, 0);
    assert!(parse_findings(&stdout).is_empty());
}

#[test]
fn test_scan_writes_output_file() {
    let workspace = create_test_workspace();
    let report_path = workspace.path().join("report.json");

    let (stdout, stderr, exit_code) = run_sqlprobe(&[
        "scan",
        workspace.path().to_str().unwrap(),
        "-o",
        report_path.to_str().unwrap(),
    ]);
    assert_eq!(exit_code, 0);
    assert!(stdout.trim().is_empty(), "report goes to the file");
    assert!(stderr.contains("Wrote 1 findings"));

    let content = std::fs::read_to_string(&report_path).expect("report file");
    assert_eq!(parse_findings(&content).len(), 1);
}

#[test]
fn test_scan_respects_extension_flag() {
    let workspace = create_test_workspace();
    // Same vulnerable line, but in an extension outside the scan list.
    std::fs::write(
        workspace.path().join("other.rb"),
        r#"cursor.execute("SELECT * FROM users WHERE id=" + user_id)"#,
    )
    .unwrap();

    let (stdout, _, _) = run_sqlprobe(&[
        "scan",
        workspace.path().to_str().unwrap(),
        "--extensions",
        "rb",
    ]);
    let findings = parse_findings(&stdout);
    assert_eq!(findings.len(), 1);
    assert!(findings[0]["file"].as_str().unwrap().ends_with("other.rb"));
}

#[test]
fn test_scan_text_format() {
    let workspace = create_test_workspace();
    let (stdout, _, exit_code) = run_sqlprobe(&[
        "scan",
        workspace.path().to_str().unwrap(),
        "--format",
        "text",
    ]);
    assert_eq!(exit_code, 0);
    assert!(stdout.contains("String concatenation in execute"));
    assert!(stdout.contains("vulnerable.py"));
}

// ============================================================================
// probe
// ============================================================================

#[test]
fn test_probe_unreachable_host_is_empty() {
    // Grab a port with nothing listening.
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let url = format!("http://127.0.0.1:{}/login", port);

    let (stdout, stderr, exit_code) = run_sqlprobe(&[
        "probe",
        &url,
        "--param",
        "id=1",
        "--timeout",
        "2",
    ]);
    assert_eq!(exit_code, 0, "stderr: {}", stderr);
    assert!(parse_findings(&stdout).is_empty());
}

/// Minimal HTTP stub answering `count` requests with the given body.
fn spawn_stub_server(body: &'static str, count: usize) -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    std::thread::spawn(move || {
        for _ in 0..count {
            let Ok((mut stream, _)) = listener.accept() else {
                return;
            };
            let mut buf = Vec::new();
            let mut chunk = [0u8; 1024];
            let mut content_length = 0usize;
            let mut head_end = None;
            while head_end.is_none() {
                let Ok(n) = stream.read(&mut chunk) else { return };
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);
                if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                    head_end = Some(pos + 4);
                    let head = String::from_utf8_lossy(&buf[..pos]);
                    for line in head.lines() {
                        if let Some(value) = line
                            .to_ascii_lowercase()
                            .strip_prefix("content-length:")
                            .map(|v| v.trim().to_string())
                        {
                            content_length = value.parse().unwrap_or(0);
                        }
                    }
                }
            }
            if let Some(end) = head_end {
                while buf.len() < end + content_length {
                    let Ok(n) = stream.read(&mut chunk) else { break };
                    if n == 0 {
                        break;
                    }
                    buf.extend_from_slice(&chunk[..n]);
                }
            }
            let response = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                body.len(),
                body
            );
            let _ = stream.write_all(response.as_bytes());
        }
    });
    port
}

#[test]
fn test_probe_reports_leaked_database_error() {
    let body = "<html>You have an error in your SQL syntax near ''1'='1'</html>";
    let port = spawn_stub_server(body, 8); // 1 param x 8 payloads
    let url = format!("http://127.0.0.1:{}/search", port);

    let (stdout, stderr, exit_code) =
        run_sqlprobe(&["probe", &url, "--param", "id=1", "--fail-on-findings"]);
    assert_eq!(exit_code, 1, "stderr: {}", stderr);

    let findings = parse_findings(&stdout);
    assert_eq!(findings.len(), 8);
    let first = &findings[0];
    assert_eq!(first["type"], "SQL_INJECTION");
    assert_eq!(first["parameter"], "id");
    assert_eq!(first["payload"], "' OR '1'='1");
    assert_eq!(first["status_code"], 200);
    assert!(first["endpoint"].as_str().unwrap().ends_with("/search"));
}

// ============================================================================
// remediate / fix / predict
// ============================================================================

#[test]
fn test_remediate_known_pair() {
    let (stdout, _, exit_code) = run_sqlprobe(&["remediate", "SQL_INJECTION", "python"]);
    assert_eq!(exit_code, 0);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).expect("valid JSON");
    assert_eq!(parsed["solution"], "Use parameterized queries");
    assert!(parsed["libraries"].as_array().unwrap().len() > 1);
}

#[test]
fn test_remediate_unknown_pair_prints_empty_object() {
    let (stdout, _, exit_code) = run_sqlprobe(&["remediate", "SQL_INJECTION", "cobol"]);
    assert_eq!(exit_code, 0);
    assert_eq!(stdout.trim(), "{}");
}

#[test]
fn test_remediate_unknown_type_fails() {
    let (_, _, exit_code) = run_sqlprobe(&["remediate", "CSRF", "python"]);
    assert_ne!(exit_code, 0);
}

#[test]
fn test_fix_rewrites_python_concat() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("db.py");
    std::fs::write(
        &file,
        r#"cursor.execute("SELECT * FROM users WHERE id = " + user_id)"#,
    )
    .unwrap();

    let (stdout, _, exit_code) = run_sqlprobe(&["fix", file.to_str().unwrap(), "python"]);
    assert_eq!(exit_code, 0);
    assert!(stdout.contains(r#"%s", (user_id,)"#), "got: {}", stdout);
}

#[test]
fn test_predict_outputs_risk_report() {
    let workspace = create_test_workspace();
    let (stdout, _, exit_code) =
        run_sqlprobe(&["predict", workspace.path().to_str().unwrap()]);
    assert_eq!(exit_code, 0);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).expect("valid JSON");
    assert!(parsed["sql_injection_risk"].is_number());
    assert!(parsed["xss_risk"].is_number());
    assert!(parsed["recommended_fixes"].as_array().unwrap().len() >= 1);
    assert!(parsed["features"]["code_complexity"].is_number());
}

// ============================================================================
// custom corpus
// ============================================================================

#[test]
fn test_scan_with_custom_rules_file() {
    let workspace = create_test_workspace();
    std::fs::write(
        workspace.path().join("gets.py"),
        "value = gets_user_input()\n",
    )
    .unwrap();

    let rules = workspace.path().join("corpus.toml");
    std::fs::write(
        &rules,
        r#"
[[patterns]]
regex = "gets_user_input"
description = "Custom tainted source"
category = "COMMAND_INJECTION"
"#,
    )
    .unwrap();

    let (stdout, stderr, exit_code) = run_sqlprobe(&[
        "scan",
        workspace.path().to_str().unwrap(),
        "--rules",
        rules.to_str().unwrap(),
    ]);
    assert_eq!(exit_code, 0, "stderr: {}", stderr);

    // The custom corpus replaces the built-ins: only the custom rule fires.
    let findings = parse_findings(&stdout);
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0]["type"], "COMMAND_INJECTION");
    assert_eq!(findings[0]["description"], "Custom tainted source");
}
