//! `remediate` command: knowledge-base lookup

use crate::models::Category;
use crate::remediation;
use anyhow::Result;
use std::str::FromStr;

#[derive(clap::Args, Debug)]
pub struct RemediateArgs {
    /// Vulnerability type, e.g. SQL_INJECTION
    #[arg(value_name = "TYPE")]
    pub vulnerability_type: String,

    /// Language, e.g. python, java
    pub language: String,
}

pub(crate) fn run(args: &RemediateArgs) -> Result<i32> {
    let category = Category::from_str(&args.vulnerability_type)?;
    match remediation::get(category, &args.language) {
        Some(remediation) => println!("{}", serde_json::to_string_pretty(remediation)?),
        None => println!("{{}}"),
    }
    Ok(0)
}
