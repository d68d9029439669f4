//! Order-preserving text encoding for coordinates.
//!
//! A text index compares terms byte-wise, so numeric range questions only work
//! if the stored strings sort the same way the numbers do. Each coordinate is
//! shifted to a non-negative domain, formatted with a fixed number of integer
//! and fraction digits, and the decimal point is replaced by a letter:
//!
//! ```text
//! latitude  -90     -> y000d0000000000
//! latitude   12.5   -> y102d5000000000
//! longitude -180    -> x000d0000000000
//! longitude  180    -> x360d0000000000
//! ```
//!
//! Every encoded value has the same width, and the sentinel always sits at the
//! same offset, so lexicographic order equals numeric order down to ten
//! fraction digits, finer than an `f64` shifted into `[0, 360]` can resolve
//! reliably.
//!
//! The indexer that stores document footprints must use these exact functions.
//! A second copy of the scheme with different parameters breaks every range
//! comparison silently.

use crate::error::{GeoQueryError, Result, ValidationError};

/// Prefix of every encoded latitude.
pub const LATITUDE_PREFIX: char = 'y';

/// Prefix of every encoded longitude.
pub const LONGITUDE_PREFIX: char = 'x';

/// Stands in for the decimal point.
pub const DECIMAL_SENTINEL: char = 'd';

/// Length of every encoded coordinate: prefix, three integer digits,
/// sentinel, ten fraction digits.
pub const ENCODED_WIDTH: usize = 15;

/// Encodes a latitude in `[-90, 90]`.
///
/// # Example
///
/// ```
/// use geobox_query::encode_latitude;
///
/// assert_eq!(encode_latitude(-90.0).unwrap(), "y000d0000000000");
/// assert_eq!(encode_latitude(45.25).unwrap(), "y135d2500000000");
/// assert!(encode_latitude(90.5).is_err());
/// ```
pub fn encode_latitude(latitude: f64) -> Result<String> {
    check_latitude("latitude", latitude)?;
    Ok(latitude_key(latitude))
}

/// Encodes a longitude in `[-180, 180]`.
///
/// # Example
///
/// ```
/// use geobox_query::encode_longitude;
///
/// assert_eq!(encode_longitude(180.0).unwrap(), "x360d0000000000");
/// assert_eq!(encode_longitude(-0.5).unwrap(), "x179d5000000000");
/// ```
pub fn encode_longitude(longitude: f64) -> Result<String> {
    check_longitude("longitude", longitude)?;
    Ok(longitude_key(longitude))
}

/// Parses a decimal literal, then encodes it as a latitude.
pub fn encode_latitude_str(latitude: &str) -> Result<String> {
    encode_latitude(parse_coordinate("latitude", latitude)?)
}

/// Parses a decimal literal, then encodes it as a longitude.
pub fn encode_longitude_str(longitude: &str) -> Result<String> {
    encode_longitude(parse_coordinate("longitude", longitude)?)
}

/// Encodes a latitude already known to be in range.
pub(crate) fn latitude_key(latitude: f64) -> String {
    format_shifted(LATITUDE_PREFIX, latitude + 90.0)
}

/// Encodes a longitude already known to be in range.
pub(crate) fn longitude_key(longitude: f64) -> String {
    format_shifted(LONGITUDE_PREFIX, longitude + 180.0)
}

fn format_shifted(prefix: char, shifted: f64) -> String {
    let digits = format!("{shifted:014.10}");
    let mut out = String::with_capacity(ENCODED_WIDTH);
    out.push(prefix);
    out.extend(
        digits
            .chars()
            .map(|c| if c == '.' { DECIMAL_SENTINEL } else { c }),
    );
    out
}

pub(crate) fn parse_coordinate(bound: &'static str, input: &str) -> Result<f64> {
    input
        .trim()
        .parse::<f64>()
        .map_err(|source| GeoQueryError::Parse {
            bound,
            input: input.to_string(),
            source,
        })
}

pub(crate) fn check_latitude(
    bound: &'static str,
    value: f64,
) -> std::result::Result<(), ValidationError> {
    if (-90.0..=90.0).contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::LatitudeOutOfRange { bound, value })
    }
}

pub(crate) fn check_longitude(
    bound: &'static str,
    value: f64,
) -> std::result::Result<(), ValidationError> {
    if (-180.0..=180.0).contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::LongitudeOutOfRange { bound, value })
    }
}
