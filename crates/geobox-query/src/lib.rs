//! Geobox - compiles geospatial bounding-box queries for text indexes.
//!
//! Each document in an index carries at most one rectangular *footprint*,
//! stored as four encoded coordinate fields. Given a query box and a spatial
//! predicate, this crate builds a boolean tree of term-range and term-equality
//! constraints over those fields that any inverted text index can evaluate.
//!
//! - **Encoding**: coordinates become fixed-width strings whose byte order is
//!   their numeric order ([`encode_latitude`], [`encode_longitude`])
//! - **Compilation**: interval algebra over latitude and circular longitude,
//!   with special cases at the poles and the ±180° meridian ([`compile`])
//! - **Trees**: `And`/`Or` combinators that flatten instead of nesting
//!   ([`ConstraintTree`])
//!
//! # Quick Start
//!
//! ```rust
//! use geobox_query::{BoundingBox, BoxQuery, MemoryIndex, Predicate};
//!
//! // Index side: footprints are encoded with the same functions the
//! // compiler uses.
//! let mut index = MemoryIndex::new();
//! index.insert("fiji", Some(BoundingBox::new(-15.0, -20.0, 180.0, 176.0)));
//! index.insert("samoa", Some(BoundingBox::new(-13.0, -15.0, -168.0, -173.0)));
//! index.insert("peru", Some(BoundingBox::new(0.0, -18.0, -68.0, -81.0)));
//!
//! // Query side: a box that wraps through the antimeridian.
//! let tree = BoxQuery::new(Predicate::Overlaps)
//!     .with_bounds(-10.0, -25.0, -165.0, 170.0)
//!     .compile()
//!     .unwrap();
//!
//! assert_eq!(index.search(&tree), vec!["fiji", "samoa"]);
//! ```
//!
//! # Predicates
//!
//! | Predicate | Footprint must |
//! |-----------|----------------|
//! | `contains` | contain the query box |
//! | `overlaps` | intersect the query box on both axes |
//! | `within` | lie inside the query box |
//!
//! # Limitations
//!
//! Footprints must not cross the antimeridian; [`prepare_footprint`] clips
//! them to their wider side before encoding. No geodesic computation is done:
//! boxes are plain latitude/longitude rectangles.

mod bbox;
mod compile;
mod constraint;
mod encode;
mod error;
mod fields;
mod index;
mod predicate;
mod traits;
mod tree;

// Re-export public API
pub use bbox::BoundingBox;
pub use compile::{compile, compile_str, BoxQuery};
pub use constraint::Constraint;
pub use encode::{
    encode_latitude, encode_latitude_str, encode_longitude, encode_longitude_str,
    DECIMAL_SENTINEL, ENCODED_WIDTH, LATITUDE_PREFIX, LONGITUDE_PREFIX,
};
pub use error::{GeoQueryError, Result, ValidationError};
pub use fields::{
    FieldNames, DEFAULT_EAST_FIELD, DEFAULT_NORTH_FIELD, DEFAULT_SOUTH_FIELD, DEFAULT_WEST_FIELD,
};
pub use index::{prepare_footprint, IndexedFootprint, MemoryIndex};
pub use predicate::Predicate;
pub use traits::Footprinted;
pub use tree::{and, or, ConstraintTree};
