//! The predicate compiler.
//!
//! Turns a spatial predicate and a query box into a [`ConstraintTree`] over
//! the four encoded footprint fields. Latitude is an ordinary interval.
//! Longitude is circular, so a query box may wrap through ±180°; document
//! footprints are assumed not to (the indexer clips them, see
//! [`prepare_footprint`](crate::prepare_footprint)).
//!
//! Case analysis, in order:
//!
//! 1. A query that is the south or north pole point collapses to one
//!    equality test; longitude is meaningless at a pole.
//! 2. A crossing box with an edge exactly on the seam is rewritten so it no
//!    longer crosses.
//! 3. Non-crossing and crossing boxes each get their own interval algebra.
//!    When the query touches a pole, footprints that are that pole point are
//!    admitted by an extra disjunct regardless of their longitude.

use tracing::{debug, trace};

use crate::bbox::BoundingBox;
use crate::encode::{latitude_key, longitude_key};
use crate::error::Result;
use crate::fields::FieldNames;
use crate::predicate::Predicate;
use crate::tree::{and, or, ConstraintTree};

/// Compiles a spatial query.
///
/// Validation runs to completion before any node is built, so an error never
/// leaves a partial tree behind.
///
/// # Example
///
/// ```
/// use geobox_query::{compile, BoundingBox, FieldNames, Predicate};
///
/// let fields = FieldNames::default();
/// let tree = compile(&fields, Predicate::Contains, BoundingBox::new(-90.0, -90.0, 0.0, 0.0)).unwrap();
/// assert_eq!(tree.to_string(), "southCoord:y000d0000000000");
/// ```
pub fn compile(
    fields: &FieldNames,
    predicate: Predicate,
    bbox: BoundingBox,
) -> Result<ConstraintTree> {
    bbox.validate()?;

    let tree = if bbox.is_south_pole_point() {
        debug!(%predicate, %bbox, branch = "south_pole", "compiling bounding-box query");
        match predicate {
            Predicate::Contains | Predicate::Overlaps => eq_lat(&fields.south, -90.0),
            Predicate::Within => eq_lat(&fields.north, -90.0),
        }
    } else if bbox.is_north_pole_point() {
        debug!(%predicate, %bbox, branch = "north_pole", "compiling bounding-box query");
        match predicate {
            Predicate::Contains | Predicate::Overlaps => eq_lat(&fields.north, 90.0),
            Predicate::Within => eq_lat(&fields.south, 90.0),
        }
    } else {
        let bbox = bbox.canonicalize_seam();
        if bbox.crosses_antimeridian() {
            debug!(%predicate, %bbox, branch = "crossing", "compiling bounding-box query");
            crossing(fields, predicate, &bbox)
        } else {
            debug!(%predicate, %bbox, branch = "non_crossing", "compiling bounding-box query");
            non_crossing(fields, predicate, &bbox)
        }
    };

    trace!(clauses = tree.leaf_count(), depth = tree.depth(), %tree, "compiled");
    Ok(tree)
}

/// Compiles a query given as literals.
///
/// Bounds are parsed first (a malformed number is a
/// [`GeoQueryError::Parse`](crate::GeoQueryError::Parse)), then the predicate
/// and ranges are validated.
pub fn compile_str(
    fields: &FieldNames,
    predicate: &str,
    north: &str,
    south: &str,
    east: &str,
    west: &str,
) -> Result<ConstraintTree> {
    let bbox = BoundingBox::parse(north, south, east, west)?;
    let predicate: Predicate = predicate.parse()?;
    compile(fields, predicate, bbox)
}

/// Builder for a single spatial query.
///
/// ```
/// use geobox_query::{BoxQuery, FieldNames, Predicate};
///
/// let tree = BoxQuery::new(Predicate::Overlaps)
///     .with_bounds(10.0, -10.0, -170.0, 170.0)
///     .with_fields(FieldNames::default().with_east("e").with_west("w"))
///     .compile()
///     .unwrap();
/// assert!(tree.leaves().iter().any(|c| c.field() == "w"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct BoxQuery {
    fields: FieldNames,
    predicate: Predicate,
    bbox: BoundingBox,
}

impl BoxQuery {
    /// Starts a query over the whole globe with the default field names.
    pub fn new(predicate: Predicate) -> Self {
        BoxQuery {
            fields: FieldNames::default(),
            predicate,
            bbox: BoundingBox::new(90.0, -90.0, 180.0, -180.0),
        }
    }

    /// Sets the query box.
    pub fn with_bounds(mut self, north: f64, south: f64, east: f64, west: f64) -> Self {
        self.bbox = BoundingBox::new(north, south, east, west);
        self
    }

    /// Sets the query box from an existing [`BoundingBox`].
    pub fn with_bbox(mut self, bbox: BoundingBox) -> Self {
        self.bbox = bbox;
        self
    }

    /// Sets the indexed field names.
    pub fn with_fields(mut self, fields: FieldNames) -> Self {
        self.fields = fields;
        self
    }

    /// Returns the spatial predicate.
    pub fn predicate(&self) -> Predicate {
        self.predicate
    }

    /// Returns the query box, unvalidated.
    pub fn bbox(&self) -> &BoundingBox {
        &self.bbox
    }

    /// Returns the field names the tree will reference.
    pub fn fields(&self) -> &FieldNames {
        &self.fields
    }

    /// Compiles the query. See [`compile`].
    pub fn compile(&self) -> Result<ConstraintTree> {
        compile(&self.fields, self.predicate, self.bbox)
    }
}

/// Within and overlaps share their structure and differ only in which
/// footprint edge is compared against which query edge.
#[derive(Debug, Clone, Copy)]
enum Relation {
    Within,
    Overlaps,
}

impl Relation {
    /// Fields compared against the query's (north, south) edges.
    fn latitude_fields(self, fields: &FieldNames) -> (&str, &str) {
        match self {
            // footprint inside: its north below ours, its south above ours
            Relation::Within => (fields.north.as_str(), fields.south.as_str()),
            // intersect: its south below our north, its north above our south
            Relation::Overlaps => (fields.south.as_str(), fields.north.as_str()),
        }
    }

    /// Fields compared against the query's (east, west) edges.
    fn longitude_fields(self, fields: &FieldNames) -> (&str, &str) {
        match self {
            Relation::Within => (fields.east.as_str(), fields.west.as_str()),
            Relation::Overlaps => (fields.west.as_str(), fields.east.as_str()),
        }
    }
}

fn non_crossing(fields: &FieldNames, predicate: Predicate, bbox: &BoundingBox) -> ConstraintTree {
    let relation = match predicate {
        Predicate::Contains => {
            let latitude =
                ge_lat(&fields.north, bbox.north).and(le_lat(&fields.south, bbox.south));
            let longitude = if bbox.west == bbox.east && bbox.west.abs() == 180.0 {
                // a zero-width box on the seam: any footprint touching the seam holds it
                eq_lon(&fields.east, 180.0).or(eq_lon(&fields.west, -180.0))
            } else {
                ge_lon(&fields.east, bbox.east).and(le_lon(&fields.west, bbox.west))
            };
            return latitude.and(longitude);
        }
        Predicate::Within => Relation::Within,
        Predicate::Overlaps => Relation::Overlaps,
    };

    let (inner, outer) = latitude_terms(fields, relation, bbox);
    match longitude_terms(fields, relation, bbox) {
        Some(longitude) => join(inner, longitude, outer),
        // full circle: latitude alone decides, and every pole-point footprint
        // already satisfies it
        None => inner.unwrap_or_else(|| match_all(fields)),
    }
}

fn crossing(fields: &FieldNames, predicate: Predicate, bbox: &BoundingBox) -> ConstraintTree {
    let relation = match predicate {
        Predicate::Contains => {
            // a single-interval footprint covers both pieces only if it is
            // the whole circle
            return ge_lat(&fields.north, bbox.north)
                .and(le_lat(&fields.south, bbox.south))
                .and(eq_lon(&fields.east, 180.0))
                .and(eq_lon(&fields.west, -180.0));
        }
        Predicate::Within => Relation::Within,
        Predicate::Overlaps => Relation::Overlaps,
    };

    let (inner, outer) = latitude_terms(fields, relation, bbox);
    let (east_side, west_side) = relation.longitude_fields(fields);
    // [west, 180] and [-180, east]: the footprint must fall in (within) or
    // touch (overlaps) one of the two pieces
    let longitude = le_lon(east_side, bbox.east).or(ge_lon(west_side, bbox.west));
    join(inner, longitude, outer)
}

/// Returns the latitude conjunction and the pole-point disjunct.
///
/// A query edge on a pole drops its inner test; footprints that are that pole
/// point are admitted through the outer disjunct instead.
fn latitude_terms(
    fields: &FieldNames,
    relation: Relation,
    bbox: &BoundingBox,
) -> (Option<ConstraintTree>, Option<ConstraintTree>) {
    let (upper, lower) = relation.latitude_fields(fields);
    let mut inner = None;
    let mut outer = None;

    if bbox.north == 90.0 {
        outer = Some(eq_lat(&fields.south, 90.0));
    } else {
        inner = Some(le_lat(upper, bbox.north));
    }

    if bbox.south == -90.0 {
        outer = or(outer, Some(eq_lat(&fields.north, -90.0)));
    } else {
        inner = and(inner, Some(ge_lat(lower, bbox.south)));
    }

    (inner, outer)
}

/// Longitude terms for a non-crossing query; `None` for the full circle.
fn longitude_terms(
    fields: &FieldNames,
    relation: Relation,
    bbox: &BoundingBox,
) -> Option<ConstraintTree> {
    if bbox.is_full_longitude() {
        return None;
    }

    let (east_side, west_side) = relation.longitude_fields(fields);
    let mut inner = None;
    let mut outer = None;

    if bbox.east.abs() == 180.0 {
        outer = Some(eq_lon(east_side, -180.0));
    } else {
        inner = Some(le_lon(east_side, bbox.east));
    }

    if bbox.west.abs() == 180.0 {
        outer = or(outer, Some(eq_lon(west_side, 180.0)));
    } else {
        inner = and(inner, Some(ge_lon(west_side, bbox.west)));
    }

    or(inner, outer)
}

fn join(
    inner: Option<ConstraintTree>,
    longitude: ConstraintTree,
    outer: Option<ConstraintTree>,
) -> ConstraintTree {
    let body = match inner {
        Some(inner) => inner.and(longitude),
        None => longitude,
    };
    match outer {
        Some(outer) => body.or(outer),
        None => body,
    }
}

/// A range every stored footprint satisfies.
fn match_all(fields: &FieldNames) -> ConstraintTree {
    ge_lat(&fields.north, -90.0)
}

fn eq_lat(field: &str, value: f64) -> ConstraintTree {
    ConstraintTree::equality(field, latitude_key(value))
}

fn ge_lat(field: &str, value: f64) -> ConstraintTree {
    if value == 90.0 {
        eq_lat(field, value)
    } else {
        ConstraintTree::range(field, latitude_key(value), latitude_key(90.0))
    }
}

fn le_lat(field: &str, value: f64) -> ConstraintTree {
    if value == -90.0 {
        eq_lat(field, value)
    } else {
        ConstraintTree::range(field, latitude_key(-90.0), latitude_key(value))
    }
}

fn eq_lon(field: &str, value: f64) -> ConstraintTree {
    ConstraintTree::equality(field, longitude_key(value))
}

fn ge_lon(field: &str, value: f64) -> ConstraintTree {
    if value == 180.0 {
        eq_lon(field, value)
    } else {
        ConstraintTree::range(field, longitude_key(value), longitude_key(180.0))
    }
}

fn le_lon(field: &str, value: f64) -> ConstraintTree {
    if value == -180.0 {
        eq_lon(field, value)
    } else {
        ConstraintTree::range(field, longitude_key(-180.0), longitude_key(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{GeoQueryError, ValidationError};

    fn run(predicate: Predicate, north: f64, south: f64, east: f64, west: f64) -> ConstraintTree {
        compile(
            &FieldNames::default(),
            predicate,
            BoundingBox::new(north, south, east, west),
        )
        .unwrap()
    }

    fn range(field: &str, low: &str, high: &str) -> ConstraintTree {
        ConstraintTree::range(field, low, high)
    }

    fn eq(field: &str, value: &str) -> ConstraintTree {
        ConstraintTree::equality(field, value)
    }

    #[test]
    fn south_pole_collapses_to_one_equality() {
        for (east, west) in [(0.0, 0.0), (170.0, -20.0), (-170.0, 170.0)] {
            assert_eq!(
                run(Predicate::Contains, -90.0, -90.0, east, west),
                eq("southCoord", "y000d0000000000")
            );
            assert_eq!(
                run(Predicate::Overlaps, -90.0, -90.0, east, west),
                eq("southCoord", "y000d0000000000")
            );
            assert_eq!(
                run(Predicate::Within, -90.0, -90.0, east, west),
                eq("northCoord", "y000d0000000000")
            );
        }
    }

    #[test]
    fn north_pole_collapses_to_one_equality() {
        assert_eq!(
            run(Predicate::Contains, 90.0, 90.0, 10.0, 0.0),
            eq("northCoord", "y180d0000000000")
        );
        assert_eq!(
            run(Predicate::Overlaps, 90.0, 90.0, 10.0, 0.0),
            eq("northCoord", "y180d0000000000")
        );
        assert_eq!(
            run(Predicate::Within, 90.0, 90.0, 10.0, 0.0),
            eq("southCoord", "y180d0000000000")
        );
    }

    #[test]
    fn contains_non_crossing() {
        assert_eq!(
            run(Predicate::Contains, 10.0, -10.0, 20.0, -20.0),
            ConstraintTree::And(vec![
                range("northCoord", "y100d0000000000", "y180d0000000000"),
                range("southCoord", "y000d0000000000", "y080d0000000000"),
                range("eastCoord", "x200d0000000000", "x360d0000000000"),
                range("westCoord", "x000d0000000000", "x160d0000000000"),
            ])
        );
    }

    #[test]
    fn contains_full_circle_uses_equalities() {
        assert_eq!(
            run(Predicate::Contains, 5.0, -5.0, 180.0, -180.0),
            ConstraintTree::And(vec![
                range("northCoord", "y095d0000000000", "y180d0000000000"),
                range("southCoord", "y000d0000000000", "y085d0000000000"),
                eq("eastCoord", "x360d0000000000"),
                eq("westCoord", "x000d0000000000"),
            ])
        );
    }

    #[test]
    fn contains_zero_width_seam_box() {
        assert_eq!(
            run(Predicate::Contains, 5.0, -5.0, 180.0, 180.0),
            ConstraintTree::And(vec![
                range("northCoord", "y095d0000000000", "y180d0000000000"),
                range("southCoord", "y000d0000000000", "y085d0000000000"),
                ConstraintTree::Or(vec![eq("eastCoord", "x360d0000000000"), eq("westCoord", "x000d0000000000")]),
            ])
        );
    }

    #[test]
    fn within_non_crossing() {
        assert_eq!(
            run(Predicate::Within, 10.0, -10.0, 20.0, -20.0),
            ConstraintTree::And(vec![
                range("northCoord", "y000d0000000000", "y100d0000000000"),
                range("southCoord", "y080d0000000000", "y180d0000000000"),
                range("eastCoord", "x000d0000000000", "x200d0000000000"),
                range("westCoord", "x160d0000000000", "x360d0000000000"),
            ])
        );
    }

    #[test]
    fn overlaps_non_crossing_swaps_fields() {
        assert_eq!(
            run(Predicate::Overlaps, 10.0, -10.0, 20.0, -20.0),
            ConstraintTree::And(vec![
                range("southCoord", "y000d0000000000", "y100d0000000000"),
                range("northCoord", "y080d0000000000", "y180d0000000000"),
                range("westCoord", "x000d0000000000", "x200d0000000000"),
                range("eastCoord", "x160d0000000000", "x360d0000000000"),
            ])
        );
    }

    #[test]
    fn within_touching_north_pole_adds_pole_disjunct() {
        assert_eq!(
            run(Predicate::Within, 90.0, 10.0, 20.0, -20.0),
            ConstraintTree::Or(vec![
                ConstraintTree::And(vec![
                    range("southCoord", "y100d0000000000", "y180d0000000000"),
                    range("eastCoord", "x000d0000000000", "x200d0000000000"),
                    range("westCoord", "x160d0000000000", "x360d0000000000"),
                ]),
                eq("southCoord", "y180d0000000000"),
            ])
        );
    }

    #[test]
    fn within_whole_globe_matches_everything() {
        assert_eq!(
            run(Predicate::Within, 90.0, -90.0, 180.0, -180.0),
            range("northCoord", "y000d0000000000", "y180d0000000000")
        );
        assert_eq!(
            run(Predicate::Overlaps, 90.0, -90.0, 180.0, -180.0),
            range("northCoord", "y000d0000000000", "y180d0000000000")
        );
    }

    #[test]
    fn full_circle_band_is_latitude_only() {
        assert_eq!(
            run(Predicate::Within, 10.0, -10.0, 180.0, -180.0),
            ConstraintTree::And(vec![
                range("northCoord", "y000d0000000000", "y100d0000000000"),
                range("southCoord", "y080d0000000000", "y180d0000000000"),
            ])
        );
    }

    #[test]
    fn seam_edge_is_not_crossing() {
        // west on 180 becomes -180
        assert_eq!(
            run(Predicate::Overlaps, 10.0, -10.0, 20.0, 180.0),
            ConstraintTree::And(vec![
                range("southCoord", "y000d0000000000", "y100d0000000000"),
                range("northCoord", "y080d0000000000", "y180d0000000000"),
                ConstraintTree::Or(vec![
                    range("westCoord", "x000d0000000000", "x200d0000000000"),
                    eq("eastCoord", "x360d0000000000"),
                ]),
            ])
        );
    }

    #[test]
    fn contains_crossing_requires_full_circle_footprint() {
        assert_eq!(
            run(Predicate::Contains, 10.0, -10.0, -170.0, 170.0),
            ConstraintTree::And(vec![
                range("northCoord", "y100d0000000000", "y180d0000000000"),
                range("southCoord", "y000d0000000000", "y080d0000000000"),
                eq("eastCoord", "x360d0000000000"),
                eq("westCoord", "x000d0000000000"),
            ])
        );
    }

    #[test]
    fn within_crossing() {
        assert_eq!(
            run(Predicate::Within, 10.0, -10.0, -170.0, 170.0),
            ConstraintTree::And(vec![
                range("northCoord", "y000d0000000000", "y100d0000000000"),
                range("southCoord", "y080d0000000000", "y180d0000000000"),
                ConstraintTree::Or(vec![
                    range("eastCoord", "x000d0000000000", "x010d0000000000"),
                    range("westCoord", "x350d0000000000", "x360d0000000000"),
                ]),
            ])
        );
    }

    #[test]
    fn overlaps_crossing() {
        assert_eq!(
            run(Predicate::Overlaps, 10.0, -10.0, -170.0, 170.0),
            ConstraintTree::And(vec![
                range("southCoord", "y000d0000000000", "y100d0000000000"),
                range("northCoord", "y080d0000000000", "y180d0000000000"),
                ConstraintTree::Or(vec![
                    range("westCoord", "x000d0000000000", "x010d0000000000"),
                    range("eastCoord", "x350d0000000000", "x360d0000000000"),
                ]),
            ])
        );
    }

    #[test]
    fn crossing_touching_both_poles() {
        assert_eq!(
            run(Predicate::Overlaps, 90.0, -90.0, -170.0, 170.0),
            ConstraintTree::Or(vec![
                range("westCoord", "x000d0000000000", "x010d0000000000"),
                range("eastCoord", "x350d0000000000", "x360d0000000000"),
                eq("southCoord", "y180d0000000000"),
                eq("northCoord", "y000d0000000000"),
            ])
        );
    }

    #[test]
    fn custom_field_names_flow_through() {
        let fields = FieldNames::new("n", "s", "e", "w");
        let tree = compile(
            &fields,
            Predicate::Within,
            BoundingBox::new(10.0, -10.0, 20.0, -20.0),
        )
        .unwrap();
        let names: Vec<&str> = tree.leaves().iter().map(|c| c.field()).collect();
        assert_eq!(names, vec!["n", "s", "e", "w"]);
    }

    #[test]
    fn validation_precedes_construction() {
        let fields = FieldNames::default();
        let err = compile(&fields, Predicate::Within, BoundingBox::new(91.0, 0.0, 0.0, 0.0))
            .unwrap_err();
        assert!(matches!(
            err,
            GeoQueryError::Validation(ValidationError::LatitudeOutOfRange { bound: "north", .. })
        ));
    }

    #[test]
    fn compile_str_parses_before_validating() {
        let fields = FieldNames::default();
        // bad predicate and bad number: the number is reported
        let err = compile_str(&fields, "touches", "abc", "0", "0", "0").unwrap_err();
        assert!(err.is_parse());

        let err = compile_str(&fields, "touches", "10", "0", "0", "0").unwrap_err();
        assert_eq!(
            err.as_validation(),
            Some(&ValidationError::UnknownPredicate("touches".to_string()))
        );

        let tree = compile_str(&fields, "within", "10", "-10", "20", "-20").unwrap();
        assert_eq!(tree, run(Predicate::Within, 10.0, -10.0, 20.0, -20.0));
    }

    #[test]
    fn builder_defaults_to_whole_globe() {
        let query = BoxQuery::new(Predicate::Within);
        assert!(query.bbox().is_full_longitude());
        assert_eq!(query.fields(), &FieldNames::default());
        assert_eq!(query.predicate(), Predicate::Within);
        assert_eq!(
            query.compile().unwrap(),
            range("northCoord", "y000d0000000000", "y180d0000000000")
        );
    }

    #[test]
    fn builder_setters_are_read_back() {
        let bbox = BoundingBox::new(10.0, -10.0, -170.0, 170.0);
        let fields = FieldNames::new("n", "s", "e", "w");
        let query = BoxQuery::new(Predicate::Overlaps)
            .with_bbox(bbox)
            .with_fields(fields.clone());
        assert_eq!(query.bbox(), &bbox);
        assert_eq!(query.fields(), &fields);
        assert_eq!(query.compile().unwrap(), compile(&fields, Predicate::Overlaps, bbox).unwrap());

        let query = query.with_bounds(5.0, -5.0, 20.0, -20.0);
        assert!(!query.bbox().crosses_antimeridian());
    }

    #[test]
    fn compilation_is_deterministic() {
        let a = run(Predicate::Overlaps, 45.0, -45.0, -100.0, 100.0);
        let b = run(Predicate::Overlaps, 45.0, -45.0, -100.0, 100.0);
        assert_eq!(a, b);
    }
}
