//! The indexing side: encoding document footprints.
//!
//! Documents store their footprint as four non-tokenized fields encoded with
//! the same functions the compiler uses. [`MemoryIndex`] is a small in-memory
//! stand-in for a text index, enough to run compiled trees end to end.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, warn};

use crate::bbox::BoundingBox;
use crate::encode::{latitude_key, longitude_key};
use crate::error::Result;
use crate::fields::FieldNames;
use crate::traits::Footprinted;
use crate::tree::ConstraintTree;

/// Validates a document footprint and removes any antimeridian crossing.
///
/// The compiler assumes footprints never cross ±180°. A crossing footprint is
/// clipped to the wider of its two pieces, `[west, 180]` or `[-180, east]`;
/// on a tie the western piece is kept.
///
/// ```
/// use geobox_query::{prepare_footprint, BoundingBox};
///
/// let clipped = prepare_footprint(BoundingBox::new(10.0, 0.0, -175.0, 150.0)).unwrap();
/// assert_eq!((clipped.west, clipped.east), (150.0, 180.0));
/// ```
pub fn prepare_footprint(bbox: BoundingBox) -> Result<BoundingBox> {
    bbox.validate()?;
    if !bbox.crosses_antimeridian() {
        return Ok(bbox);
    }

    let western = 180.0 - bbox.west;
    let eastern = bbox.east + 180.0;
    let clipped = if western >= eastern {
        BoundingBox { east: 180.0, ..bbox }
    } else {
        BoundingBox { west: -180.0, ..bbox }
    };
    debug!(original = %bbox, clipped = %clipped, "clipped footprint crossing the antimeridian");
    Ok(clipped)
}

/// A footprint's four bounds, encoded for storage.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct IndexedFootprint {
    pub north: String,
    pub south: String,
    pub east: String,
    pub west: String,
}

impl IndexedFootprint {
    /// Prepares and encodes a footprint. See [`prepare_footprint`].
    pub fn encode(bbox: BoundingBox) -> Result<Self> {
        let bbox = prepare_footprint(bbox)?;
        Ok(IndexedFootprint {
            north: latitude_key(bbox.north),
            south: latitude_key(bbox.south),
            east: longitude_key(bbox.east),
            west: longitude_key(bbox.west),
        })
    }

    /// Returns the stored fields under the given names.
    pub fn into_fields(self, fields: &FieldNames) -> BTreeMap<String, String> {
        BTreeMap::from([
            (fields.north.clone(), self.north),
            (fields.south.clone(), self.south),
            (fields.east.clone(), self.east),
            (fields.west.clone(), self.west),
        ])
    }
}

/// An in-memory document store that evaluates constraint trees.
///
/// Each document is a map of stored fields. Documents without a footprint
/// are kept but never match a spatial constraint.
///
/// ```
/// use geobox_query::{BoundingBox, BoxQuery, MemoryIndex, Predicate};
///
/// let mut index = MemoryIndex::new();
/// index.insert("boulder", Some(BoundingBox::new(40.1, 39.9, -105.1, -105.3)));
/// index.insert("no-footprint", None);
///
/// let tree = BoxQuery::new(Predicate::Within)
///     .with_bounds(41.0, 37.0, -102.0, -109.0)
///     .compile()
///     .unwrap();
/// assert_eq!(index.search(&tree), vec!["boulder"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryIndex {
    fields: FieldNames,
    docs: BTreeMap<String, BTreeMap<String, String>>,
}

impl MemoryIndex {
    /// Creates an empty index using the default field names.
    pub fn new() -> Self {
        MemoryIndex::default()
    }

    /// Creates an empty index storing footprints under custom field names.
    pub fn with_fields(fields: FieldNames) -> Self {
        MemoryIndex {
            fields,
            docs: BTreeMap::new(),
        }
    }

    /// Returns the field names footprints are stored under.
    pub fn fields(&self) -> &FieldNames {
        &self.fields
    }

    /// Adds or replaces a document.
    ///
    /// Returns `true` if a footprint was indexed. A footprint that fails
    /// validation is logged and dropped; the document is kept without one.
    pub fn insert(&mut self, id: impl Into<String>, footprint: Option<BoundingBox>) -> bool {
        let id = id.into();
        let stored = match footprint.map(IndexedFootprint::encode).transpose() {
            Ok(encoded) => encoded.map(|f| f.into_fields(&self.fields)),
            Err(err) => {
                warn!(%id, error = %err, "unable to index bounding box; dropping footprint");
                None
            }
        };
        let indexed = stored.is_some();
        self.docs.insert(id, stored.unwrap_or_default());
        indexed
    }

    /// Adds a document whose bounds are decimal literals.
    pub fn insert_raw(
        &mut self,
        id: impl Into<String>,
        north: &str,
        south: &str,
        east: &str,
        west: &str,
    ) -> bool {
        let id = id.into();
        match BoundingBox::parse(north, south, east, west) {
            Ok(bbox) => self.insert(id, Some(bbox)),
            Err(err) => {
                warn!(%id, error = %err, "unable to index bounding box; dropping footprint");
                self.docs.insert(id, BTreeMap::new());
                false
            }
        }
    }

    /// Returns `Some(true)` if the document was stored with a footprint.
    pub fn has_footprint(&self, id: &str) -> Option<bool> {
        self.docs.get(id).map(|doc| !doc.is_empty())
    }

    /// Returns a document's stored fields.
    pub fn get(&self, id: &str) -> Option<&BTreeMap<String, String>> {
        self.docs.get(id)
    }

    /// Removes a document, returning whether it existed.
    pub fn remove(&mut self, id: &str) -> bool {
        self.docs.remove(id).is_some()
    }

    /// Returns the ids of matching documents, in id order.
    pub fn search(&self, tree: &ConstraintTree) -> Vec<&str> {
        let accessor = <BTreeMap<String, String> as Footprinted>::accessor;
        self.docs
            .iter()
            .filter(|(_, doc)| tree.matches(*doc, accessor))
            .map(|(id, _)| id.as_str())
            .collect()
    }

    /// Returns the number of documents, with or without a footprint.
    pub fn len(&self) -> usize {
        self.docs.len()
    }

    /// Returns `true` if no document has been inserted.
    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }
}
