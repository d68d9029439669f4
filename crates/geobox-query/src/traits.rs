//! Field access for evaluating constraint trees in memory.
//!
//! The compiler's output is meant for an external search engine, but the
//! [`Footprinted`] trait lets any struct that stores encoded coordinates be
//! filtered directly with [`ConstraintTree::matches`](crate::ConstraintTree::matches).

use std::collections::{BTreeMap, HashMap};

/// Types that expose encoded footprint coordinates by field name.
///
/// # Example
///
/// ```
/// use geobox_query::{encode_latitude, Footprinted};
///
/// struct Record {
///     north: String,
/// }
///
/// impl Footprinted for Record {
///     fn encoded_coordinate(&self, field: &str) -> Option<&str> {
///         match field {
///             "northCoord" => Some(&self.north),
///             _ => None,
///         }
///     }
/// }
///
/// let record = Record { north: encode_latitude(12.0).unwrap() };
/// assert_eq!(record.encoded_coordinate("northCoord"), Some("y102d0000000000"));
/// assert_eq!(record.encoded_coordinate("eastCoord"), None);
/// ```
pub trait Footprinted {
    /// Returns the stored, encoded value of a coordinate field.
    ///
    /// Returns `None` if the item has no footprint or no such field.
    fn encoded_coordinate(&self, field: &str) -> Option<&str>;

    /// Returns a function pointer compatible with the tree's filtering methods.
    fn accessor<'a>(item: &'a Self, field: &str) -> Option<&'a str>
    where
        Self: Sized,
    {
        item.encoded_coordinate(field)
    }
}

impl Footprinted for HashMap<String, String> {
    fn encoded_coordinate(&self, field: &str) -> Option<&str> {
        self.get(field).map(String::as_str)
    }
}

impl Footprinted for BTreeMap<String, String> {
    fn encoded_coordinate(&self, field: &str) -> Option<&str> {
        self.get(field).map(String::as_str)
    }
}
