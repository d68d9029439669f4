//! Geographic bounding boxes.

use serde::{Deserialize, Serialize};

use crate::encode::{check_latitude, check_longitude, parse_coordinate};
use crate::error::{Result, ValidationError};

/// A rectangle on the globe, in degrees.
///
/// `north` and `south` are latitudes in `[-90, 90]` with `north >= south`.
/// `east` and `west` are longitudes in `[-180, 180]`. A box whose `west` is
/// greater than its `east` crosses the ±180° meridian: its longitude extent is
/// `[west, 180] ∪ [-180, east]`. `west = -180, east = 180` is the whole circle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

impl BoundingBox {
    /// Creates a box without checking it. See [`BoundingBox::validate`].
    pub fn new(north: f64, south: f64, east: f64, west: f64) -> Self {
        BoundingBox {
            north,
            south,
            east,
            west,
        }
    }

    /// Parses four decimal literals.
    ///
    /// Fails with [`GeoQueryError::Parse`](crate::GeoQueryError::Parse) naming
    /// the first bound that is not a number. Range checks are left to
    /// [`BoundingBox::validate`].
    pub fn parse(north: &str, south: &str, east: &str, west: &str) -> Result<Self> {
        Ok(BoundingBox {
            north: parse_coordinate("north", north)?,
            south: parse_coordinate("south", south)?,
            east: parse_coordinate("east", east)?,
            west: parse_coordinate("west", west)?,
        })
    }

    /// Checks every range rule, reporting the first violation.
    ///
    /// Order: north range, south range, `north >= south`, east range, west
    /// range.
    pub fn validate(&self) -> std::result::Result<(), ValidationError> {
        check_latitude("north", self.north)?;
        check_latitude("south", self.south)?;
        if self.north < self.south {
            return Err(ValidationError::NorthBelowSouth {
                north: self.north,
                south: self.south,
            });
        }
        check_longitude("east", self.east)?;
        check_longitude("west", self.west)?;
        Ok(())
    }

    /// Returns `true` if the longitude extent wraps through ±180°.
    pub fn crosses_antimeridian(&self) -> bool {
        self.west > self.east
    }

    /// Returns `true` if the box spans every longitude.
    pub fn is_full_longitude(&self) -> bool {
        self.west == -180.0 && self.east == 180.0
    }

    /// Returns `true` if the box is the south pole (a point, any longitude).
    pub fn is_south_pole_point(&self) -> bool {
        self.north == -90.0
    }

    /// Returns `true` if the box is the north pole.
    pub fn is_north_pole_point(&self) -> bool {
        self.south == 90.0
    }

    /// Moves a crossing box's edge off the seam when it sits exactly on it.
    ///
    /// A `west` of 180 is rewritten to -180; otherwise an `east` of -180 is
    /// rewritten to 180. Non-crossing boxes are returned unchanged.
    pub fn canonicalize_seam(self) -> Self {
        let mut canonical = self;
        if canonical.crosses_antimeridian() {
            if canonical.west == 180.0 {
                canonical.west = -180.0;
            } else if canonical.east == -180.0 {
                canonical.east = 180.0;
            }
        }
        canonical
    }
}

impl std::fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[north={}, south={}, east={}, west={}]",
            self.north, self.south, self.east, self.west
        )
    }
}
