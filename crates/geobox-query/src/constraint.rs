//! Leaf constraints over encoded coordinate fields.
//!
//! A [`Constraint`] tests one stored field against already-encoded values. It
//! is the unit a text index can answer natively: a term lookup or an inclusive
//! term range.

use serde::Serialize;

/// A single test against one indexed field.
///
/// # Example
///
/// ```
/// use geobox_query::Constraint;
///
/// let c = Constraint::range("northCoord", "y100d0000000000", "y180d0000000000");
/// assert!(c.matches(Some("y135d0000000000")));
/// assert!(!c.matches(Some("y099d9999000000")));
/// assert!(!c.matches(None));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Constraint {
    /// `low <= field <= high`, compared byte-wise.
    Range {
        field: String,
        low: String,
        high: String,
    },
    /// `field == value`.
    Equality { field: String, value: String },
}

impl Constraint {
    /// Creates an inclusive range constraint.
    pub fn range(
        field: impl Into<String>,
        low: impl Into<String>,
        high: impl Into<String>,
    ) -> Self {
        Constraint::Range {
            field: field.into(),
            low: low.into(),
            high: high.into(),
        }
    }

    /// Creates an equality constraint.
    pub fn equality(field: impl Into<String>, value: impl Into<String>) -> Self {
        Constraint::Equality {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Returns the field this constraint tests.
    pub fn field(&self) -> &str {
        match self {
            Constraint::Range { field, .. } | Constraint::Equality { field, .. } => field,
        }
    }

    /// Evaluates this constraint against a stored field value.
    ///
    /// A document without the field never matches.
    pub fn matches(&self, stored: Option<&str>) -> bool {
        let Some(stored) = stored else {
            return false;
        };
        match self {
            Constraint::Range { low, high, .. } => low.as_str() <= stored && stored <= high.as_str(),
            Constraint::Equality { value, .. } => stored == value,
        }
    }
}

impl std::fmt::Display for Constraint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Constraint::Range { field, low, high } => write!(f, "{field}:[{low} TO {high}]"),
            Constraint::Equality { field, value } => write!(f, "{field}:{value}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_is_inclusive() {
        let c = Constraint::range("f", "x010d0000000000", "x020d0000000000");
        assert!(c.matches(Some("x010d0000000000")));
        assert!(c.matches(Some("x015d5000000000")));
        assert!(c.matches(Some("x020d0000000000")));
        assert!(!c.matches(Some("x020d0001000000")));
        assert!(!c.matches(Some("x009d9999000000")));
    }

    #[test]
    fn equality_is_exact() {
        let c = Constraint::equality("f", "y000d0000000000");
        assert!(c.matches(Some("y000d0000000000")));
        assert!(!c.matches(Some("y000d0010000000")));
    }

    #[test]
    fn missing_field_never_matches() {
        assert!(!Constraint::equality("f", "y000d0000000000").matches(None));
        assert!(!Constraint::range("f", "", "zzz").matches(None));
    }

    #[test]
    fn field_accessor() {
        assert_eq!(Constraint::equality("eastCoord", "v").field(), "eastCoord");
        assert_eq!(Constraint::range("westCoord", "a", "b").field(), "westCoord");
    }

    #[test]
    fn display() {
        assert_eq!(
            Constraint::range("northCoord", "y100d0000000000", "y180d0000000000").to_string(),
            "northCoord:[y100d0000000000 TO y180d0000000000]"
        );
        assert_eq!(
            Constraint::equality("southCoord", "y000d0000000000").to_string(),
            "southCoord:y000d0000000000"
        );
    }

    #[test]
    fn serializes_with_kind_tag() {
        let json = serde_json::to_value(Constraint::equality("f", "v")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"kind": "equality", "field": "f", "value": "v"})
        );
    }
}
