//! sqlprobe - SQL injection detection library
//!
//! Two independent detection engines that share a common [`models::Finding`]
//! record:
//!
//! - [`scanner::Scanner`] walks a file or directory tree and matches an
//!   ordered corpus of known-risky code patterns line by line.
//! - [`prober::Prober`] substitutes attack payloads into the parameters of a
//!   live HTTP endpoint and classifies responses for leaked database errors.
//!
//! Around them: a risk [`classifier`], a [`remediation`] knowledge base, a
//! sanitizing [`filters`] pipeline, and a concatenation [`fixes`] rewriter,
//! all composed by the [`cli`] layer.

pub mod classifier;
pub mod cli;
pub mod corpus;
pub mod filters;
pub mod fixes;
pub mod models;
pub mod prober;
pub mod remediation;
pub mod reporters;
pub mod scanner;
