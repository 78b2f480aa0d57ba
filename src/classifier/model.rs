//! Externally supplied risk model
//!
//! A small 2-layer MLP in pure Rust (Linear → ReLU → Linear → Softmax),
//! loaded from JSON. Inference runs in well under a millisecond for the
//! four-feature input, so the model variant costs nothing over the
//! heuristic at scoring time.

use super::features::Features;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 2-layer MLP over the extracted feature vector. Output is the probability
/// that the input looks vulnerable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskModel {
    /// First layer weights [hidden_size x input_size]
    w1: Vec<Vec<f32>>,
    /// First layer bias [hidden_size]
    b1: Vec<f32>,
    /// Second layer weights [2 x hidden_size]
    w2: Vec<Vec<f32>>,
    /// Second layer bias [2]
    b2: Vec<f32>,
}

impl RiskModel {
    /// Build from explicit weights.
    pub fn with_weights(
        w1: Vec<Vec<f32>>,
        b1: Vec<f32>,
        w2: Vec<Vec<f32>>,
        b2: Vec<f32>,
    ) -> Self {
        Self { w1, b1, w2, b2 }
    }

    /// Load a serialized model from JSON.
    pub fn load(path: &Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }

    /// Save the model to JSON.
    pub fn save(&self, path: &Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)
    }

    /// Probability that the features describe vulnerable code.
    pub fn predict(&self, features: &Features) -> f32 {
        let input = features.as_vec();

        // Layer 1: Linear + ReLU
        let mut hidden = vec![0.0f32; self.w1.len()];
        for (i, h) in hidden.iter_mut().enumerate() {
            let mut sum = self.b1.get(i).copied().unwrap_or(0.0);
            for (j, &x) in input.iter().enumerate() {
                if j < self.w1[i].len() {
                    sum += self.w1[i][j] * x;
                }
            }
            *h = sum.max(0.0);
        }

        // Layer 2: Linear
        let mut logits = [0.0f32; 2];
        for (i, logit) in logits.iter_mut().enumerate() {
            let mut sum = self.b2.get(i).copied().unwrap_or(0.0);
            if let Some(row) = self.w2.get(i) {
                for (j, &h) in hidden.iter().enumerate() {
                    if j < row.len() {
                        sum += row[j] * h;
                    }
                }
            }
            *logit = sum;
        }

        // Softmax; index 1 is the vulnerable class
        let max_logit = logits[0].max(logits[1]);
        let exp0 = (logits[0] - max_logit).exp();
        let exp1 = (logits[1] - max_logit).exp();
        exp1 / (exp0 + exp1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn biased_model(bias_vulnerable: f32) -> RiskModel {
        RiskModel::with_weights(
            vec![vec![0.0; 4]; 3],
            vec![0.0; 3],
            vec![vec![0.0; 3], vec![0.0; 3]],
            vec![0.0, bias_vulnerable],
        )
    }

    fn zero_features() -> Features {
        Features {
            code_complexity: 0.0,
            input_sources_count: 0.0,
            database_interactions: 0.0,
            authentication_points: 0.0,
        }
    }

    #[test]
    fn test_prediction_is_probability() {
        let model = biased_model(0.0);
        let p = model.predict(&zero_features());
        assert!((p - 0.5).abs() < 1e-6, "symmetric logits give 0.5, got {}", p);
    }

    #[test]
    fn test_bias_shifts_prediction() {
        let high = biased_model(4.0).predict(&zero_features());
        let low = biased_model(-4.0).predict(&zero_features());
        assert!(high > 0.9);
        assert!(low < 0.1);
    }

    #[test]
    fn test_json_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        let model = biased_model(1.5);
        model.save(&path).unwrap();

        let loaded = RiskModel::load(&path).unwrap();
        let p_original = model.predict(&zero_features());
        let p_loaded = loaded.predict(&zero_features());
        assert!((p_original - p_loaded).abs() < 1e-6);
    }

    #[test]
    fn test_load_missing_file_errors() {
        assert!(RiskModel::load(Path::new("/no/such/model.json")).is_err());
    }
}
