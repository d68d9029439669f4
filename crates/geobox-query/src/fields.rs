//! Names of the four indexed coordinate fields.

use serde::{Deserialize, Serialize};

/// Default field holding each document's north bound.
pub const DEFAULT_NORTH_FIELD: &str = "northCoord";
/// Default field holding each document's south bound.
pub const DEFAULT_SOUTH_FIELD: &str = "southCoord";
/// Default field holding each document's east bound.
pub const DEFAULT_EAST_FIELD: &str = "eastCoord";
/// Default field holding each document's west bound.
pub const DEFAULT_WEST_FIELD: &str = "westCoord";

/// The index fields under which a document's encoded footprint is stored.
///
/// Names carry no meaning to the compiler; they only have to agree with the
/// schema the indexer wrote. Deserializing a partial map keeps the defaults
/// for any field it leaves out.
///
/// ```
/// use geobox_query::FieldNames;
///
/// let fields = FieldNames::default().with_north("bbox_n");
/// assert_eq!(fields.north, "bbox_n");
/// assert_eq!(fields.south, "southCoord");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldNames {
    pub north: String,
    pub south: String,
    pub east: String,
    pub west: String,
}

impl FieldNames {
    /// Creates a set of field names.
    pub fn new(
        north: impl Into<String>,
        south: impl Into<String>,
        east: impl Into<String>,
        west: impl Into<String>,
    ) -> Self {
        FieldNames {
            north: north.into(),
            south: south.into(),
            east: east.into(),
            west: west.into(),
        }
    }

    /// Replaces the north field name.
    pub fn with_north(mut self, name: impl Into<String>) -> Self {
        self.north = name.into();
        self
    }

    /// Replaces the south field name.
    pub fn with_south(mut self, name: impl Into<String>) -> Self {
        self.south = name.into();
        self
    }

    /// Replaces the east field name.
    pub fn with_east(mut self, name: impl Into<String>) -> Self {
        self.east = name.into();
        self
    }

    /// Replaces the west field name.
    pub fn with_west(mut self, name: impl Into<String>) -> Self {
        self.west = name.into();
        self
    }
}

impl Default for FieldNames {
    fn default() -> Self {
        FieldNames::new(
            DEFAULT_NORTH_FIELD,
            DEFAULT_SOUTH_FIELD,
            DEFAULT_EAST_FIELD,
            DEFAULT_WEST_FIELD,
        )
    }
}
