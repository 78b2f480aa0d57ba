//! `fix` command: parameterized rewrite of SQL concatenation

use crate::fixes;
use anyhow::{Context, Result};
use std::path::PathBuf;

#[derive(clap::Args, Debug)]
pub struct FixArgs {
    /// Source file to rewrite
    pub file: PathBuf,

    /// Language of the file: java or python
    pub language: String,
}

pub(crate) fn run(args: &FixArgs) -> Result<i32> {
    let code = std::fs::read_to_string(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;
    print!("{}", fixes::rewrite_concatenation(&code, &args.language));
    Ok(0)
}
