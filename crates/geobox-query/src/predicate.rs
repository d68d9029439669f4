//! Spatial predicates.
//!
//! A [`Predicate`] names the relation a matching document's footprint must
//! have to the query box.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Required relation between a document footprint and the query box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Predicate {
    /// Footprint contains the query box.
    Contains,
    /// Footprint and query box share at least one point on both axes.
    Overlaps,
    /// Footprint lies inside the query box.
    Within,
}

impl Predicate {
    /// All predicates, in a stable order.
    pub const ALL: [Predicate; 3] = [Predicate::Contains, Predicate::Overlaps, Predicate::Within];

    /// Returns the literal used on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Predicate::Contains => "contains",
            Predicate::Overlaps => "overlaps",
            Predicate::Within => "within",
        }
    }
}

impl std::fmt::Display for Predicate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Predicate {
    type Err = ValidationError;

    /// Accepts exactly `contains`, `overlaps`, or `within`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "contains" => Ok(Predicate::Contains),
            "overlaps" => Ok(Predicate::Overlaps),
            "within" => Ok(Predicate::Within),
            other => Err(ValidationError::UnknownPredicate(other.to_string())),
        }
    }
}
