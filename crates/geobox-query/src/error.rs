//! Error types for the geobox-query crate.
//!
//! Two kinds only: a bound that is not a decimal number ([`GeoQueryError::Parse`])
//! and input that parses but is semantically invalid ([`ValidationError`]).

use std::num::ParseFloatError;

use thiserror::Error;

/// Errors that can occur when encoding coordinates or compiling a query.
#[derive(Debug, Error)]
pub enum GeoQueryError {
    /// A bound was not parseable as a decimal number.
    #[error("illegal {bound} coordinate '{input}': {source}")]
    Parse {
        bound: &'static str,
        input: String,
        #[source]
        source: ParseFloatError,
    },

    /// Predicate or bounds were rejected.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl GeoQueryError {
    /// Returns `true` if this is a malformed-number error.
    pub fn is_parse(&self) -> bool {
        matches!(self, GeoQueryError::Parse { .. })
    }

    /// Returns `true` if this is a predicate or range violation.
    pub fn is_validation(&self) -> bool {
        matches!(self, GeoQueryError::Validation(_))
    }

    /// Returns the validation error, if this is one.
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            GeoQueryError::Validation(err) => Some(err),
            GeoQueryError::Parse { .. } => None,
        }
    }
}

/// Semantic problems with an otherwise well-formed query.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Predicate literal is not `contains`, `overlaps`, or `within`.
    #[error("illegal or missing spatial predicate '{0}'; must be one of [within|contains|overlaps]")]
    UnknownPredicate(String),

    /// A latitude is outside `[-90, 90]` (or not finite).
    #[error("{bound} out of range: {value} is not within [-90, 90]")]
    LatitudeOutOfRange { bound: &'static str, value: f64 },

    /// A longitude is outside `[-180, 180]` (or not finite).
    #[error("{bound} out of range: {value} is not within [-180, 180]")]
    LongitudeOutOfRange { bound: &'static str, value: f64 },

    /// The north bound lies below the south bound.
    #[error("north ({north}) cannot be less than south ({south})")]
    NorthBelowSouth { north: f64, south: f64 },
}

/// Result type for geobox-query operations.
pub type Result<T> = std::result::Result<T, GeoQueryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_names_bound() {
        let source = "abc".parse::<f64>().unwrap_err();
        let err = GeoQueryError::Parse {
            bound: "north",
            input: "abc".to_string(),
            source,
        };
        assert!(err.is_parse());
        assert!(!err.is_validation());
        assert!(err.to_string().starts_with("illegal north coordinate 'abc'"));
    }

    #[test]
    fn validation_error_is_transparent() {
        let err: GeoQueryError = ValidationError::NorthBelowSouth {
            north: 5.0,
            south: 10.0,
        }
        .into();
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "north (5) cannot be less than south (10)");
        assert_eq!(
            err.as_validation(),
            Some(&ValidationError::NorthBelowSouth {
                north: 5.0,
                south: 10.0
            })
        );
    }
}
