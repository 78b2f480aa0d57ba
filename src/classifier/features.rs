//! Feature extraction for risk scoring
//!
//! Turns a file, directory, or raw code snippet into the four normalized
//! features the scorer consumes. Counting is regex-based over raw text,
//! consistent with the rest of the tool: fast, language-agnostic, shallow.

use regex::RegexBuilder;
use serde::Serialize;
use std::path::Path;
use tracing::debug;

/// Extensions aggregated when extracting features from a directory.
const FEATURE_EXTENSIONS: &[&str] = &["py", "java", "js", "ts", "php"];

/// Normalized feature vector, each value in [0, 1].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Features {
    pub code_complexity: f32,
    pub input_sources_count: f32,
    pub database_interactions: f32,
    pub authentication_points: f32,
}

impl Features {
    pub fn as_vec(&self) -> Vec<f32> {
        vec![
            self.code_complexity,
            self.input_sources_count,
            self.database_interactions,
            self.authentication_points,
        ]
    }
}

/// Extracts risk features from code text.
pub struct FeatureExtractor {
    input_sources: regex::Regex,
    db_interactions: regex::Regex,
    auth_points: regex::Regex,
}

impl FeatureExtractor {
    pub fn new() -> Self {
        let ci = |pattern: &str| {
            RegexBuilder::new(pattern)
                .case_insensitive(true)
                .build()
                .unwrap()
        };
        Self {
            input_sources: ci(r"(input|request\.(get|post)|argv|getParameter)"),
            db_interactions: ci(r"(execute|query|raw|prepareStatement|SELECT|INSERT|UPDATE|DELETE)"),
            auth_points: ci(r"(password|login|auth|session|token|credential)"),
        }
    }

    /// Extract features from a path or a raw code snippet.
    ///
    /// A path to a file reads that file; a directory aggregates common
    /// server-side sources beneath it; anything else is treated as literal
    /// code text.
    pub fn extract(&self, path_or_text: &str) -> Features {
        let path = Path::new(path_or_text);
        let text = if path.is_file() {
            read_lossy(path).unwrap_or_default()
        } else if path.is_dir() {
            self.gather_directory(path)
        } else {
            path_or_text.to_string()
        };
        self.extract_text(&text)
    }

    /// Extract features from already-loaded text.
    pub fn extract_text(&self, text: &str) -> Features {
        let line_count = text.matches('\n').count() as f32;
        let code_complexity =
            (text.len() as f32 / 10_000.0 + (line_count / 500.0) * 0.1).min(1.0);

        let input_sources = self.input_sources.find_iter(text).count() as f32;
        let db_interactions = self.db_interactions.find_iter(text).count() as f32;
        let auth_points = self.auth_points.find_iter(text).count() as f32;

        Features {
            code_complexity,
            input_sources_count: (input_sources / 20.0).min(1.0),
            database_interactions: (db_interactions / 30.0).min(1.0),
            authentication_points: (auth_points / 15.0).min(1.0),
        }
    }

    fn gather_directory(&self, root: &Path) -> String {
        let mut text = String::new();
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
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
                continue;
            };
            if !FEATURE_EXTENSIONS.iter().any(|e| ext.eq_ignore_ascii_case(e)) {
                continue;
            }
            match read_lossy(path) {
                Some(content) => {
                    text.push_str(&content);
                    text.push('\n');
                }
                None => debug!("skipping unreadable file {}", path.display()),
            }
        }
        text
    }
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        Self::new()
    }
}

fn read_lossy(path: &Path) -> Option<String> {
    std::fs::read(path)
        .ok()
        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
}
