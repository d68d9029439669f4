//! Output formats for the `--output` flag.
//!
//! Text prints the tree as a query string; the structured formats serialize
//! the compiled tree together with the inputs that produced it.

use clap::ValueEnum;
use geobox_query::{BoundingBox, ConstraintTree, Predicate};
use serde::Serialize;
use thiserror::Error;

/// How a compiled tree is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputMode {
    /// Lucene-style query string
    #[default]
    Text,
    /// Pretty-printed JSON
    Json,
    /// YAML
    Yaml,
}

/// Errors that can occur during serialization.
#[derive(Debug, Error)]
pub enum SerializeError {
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML serialization failed: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// The document printed in structured modes.
#[derive(Debug, Serialize)]
pub struct Compiled<'a> {
    pub predicate: Predicate,
    pub bbox: &'a BoundingBox,
    pub clauses: usize,
    pub tree: &'a ConstraintTree,
}

/// Formats a compiled query in the requested mode.
pub fn render(compiled: &Compiled<'_>, mode: OutputMode) -> Result<String, SerializeError> {
    match mode {
        OutputMode::Text => Ok(compiled.tree.to_string()),
        OutputMode::Json => Ok(serde_json::to_string_pretty(compiled)?),
        OutputMode::Yaml => Ok(serde_yaml::to_string(compiled)?),
    }
}
