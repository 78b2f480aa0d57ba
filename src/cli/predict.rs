//! `predict` command: risk scoring for a path or snippet

use crate::classifier::{Predictor, Scorer};
use anyhow::{Context, Result};
use std::path::PathBuf;

#[derive(clap::Args, Debug)]
pub struct PredictArgs {
    /// File, directory, or literal code snippet
    #[arg(default_value = ".")]
    pub path: String,

    /// Use a JSON model file instead of the built-in heuristic
    #[arg(long, value_name = "FILE")]
    pub model: Option<PathBuf>,
}

pub(crate) fn run(args: &PredictArgs) -> Result<i32> {
    let scorer = match &args.model {
        Some(path) => Scorer::from_model_file(path)
            .with_context(|| format!("failed to load model from {}", path.display()))?,
        None => Scorer::Heuristic,
    };
    let report = Predictor::new(scorer).predict(&args.path);
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(0)
}
