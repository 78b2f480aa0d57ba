//! Vulnerability risk scoring
//!
//! Consumes text features and emits 0-1 risk scores for SQL injection and
//! XSS. The scorer variant is chosen explicitly at construction: either the
//! pure heuristic (a fixed function of the features) or an externally
//! supplied model loaded from JSON. There is no runtime capability probe;
//! callers always know which variant they are running.

mod features;
mod model;

pub use features::{FeatureExtractor, Features};
pub use model::RiskModel;

use serde::Serialize;
use std::path::Path;

/// Risk report for a scanned path or snippet.
#[derive(Debug, Clone, Serialize)]
pub struct RiskReport {
    pub sql_injection_risk: f64,
    pub xss_risk: f64,
    pub recommended_fixes: Vec<String>,
    pub features: Features,
}

/// Scoring strategy, fixed at construction.
pub enum Scorer {
    /// Fixed weighting of input-source and sink features.
    Heuristic,
    /// Externally supplied classifier.
    Model(RiskModel),
}

impl Scorer {
    /// Load the model variant from a JSON file.
    pub fn from_model_file(path: &Path) -> Result<Self, std::io::Error> {
        Ok(Scorer::Model(RiskModel::load(path)?))
    }

    /// Score features as (sqli_risk, xss_risk).
    pub fn score(&self, features: &Features) -> (f64, f64) {
        match self {
            Scorer::Heuristic => {
                let sqli = 0.3
                    * (features.input_sources_count + features.database_interactions) as f64;
                let xss = 0.3
                    * (features.input_sources_count + features.authentication_points) as f64;
                (sqli.min(1.0), xss.min(1.0))
            }
            Scorer::Model(model) => {
                let p = model.predict(features) as f64;
                (p, p * 0.8)
            }
        }
    }
}

/// Feature extraction plus scoring, producing the CLI-facing report.
pub struct Predictor {
    extractor: FeatureExtractor,
    scorer: Scorer,
}

impl Predictor {
    pub fn new(scorer: Scorer) -> Self {
        Self {
            extractor: FeatureExtractor::new(),
            scorer,
        }
    }

    /// Predict vulnerability likelihood for a path or raw snippet.
    pub fn predict(&self, path_or_text: &str) -> RiskReport {
        let features = self.extractor.extract(path_or_text);
        let (sqli, xss) = self.scorer.score(&features);
        RiskReport {
            sql_injection_risk: round4(sqli),
            xss_risk: round4(xss),
            recommended_fixes: recommendations(sqli, xss),
            features,
        }
    }
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

fn recommendations(sqli: f64, xss: f64) -> Vec<String> {
    let mut recs = Vec::new();
    if sqli > 0.5 {
        recs.push("Use parameterized queries / PreparedStatement for all DB access.".to_string());
    }
    if xss > 0.5 {
        recs.push(
            "Escape user-controlled output; consider CSP and encoding libraries.".to_string(),
        );
    }
    if recs.is_empty() {
        recs.push("Review input validation and output encoding.".to_string());
    }
    recs
}
