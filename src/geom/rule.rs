use geo::algorithm::line_intersection::line_intersection;
use geo::line_measures::Distance;
use geo::{BoundingRect, Coord, Euclidean, LineString, MultiPoint, Point, Rect};

use crate::config::CorridorConfig;
use crate::error::ComputationError;
use crate::geom::algorithm::{dissolve_lines, member_hull, nearest_neighbor_chain};
use crate::geom::geom::coord_distance;
use crate::geom::CorridorGeometry;
use crate::record::{GeometryKind, PriorityRecord};

/// The capability set shared by both geometry kinds. The graph builder and
/// the aggregator are generic over this trait and never look at the kind.
pub trait AdjacencyRule: Sync {
    type Geometry: Sync;

    const KIND: GeometryKind;

    /// The record's geometry, if it is of this rule's kind.
    fn geometry(record: &PriorityRecord) -> Option<&Self::Geometry>;

    /// Envelope used for candidate pruning.
    fn bounds(&self, geometry: &Self::Geometry) -> Option<Rect<f64>>;

    /// Distance by which envelopes are grown when searching for candidates.
    /// Any adjacent pair must have envelopes within this reach.
    fn reach(&self) -> f64;

    /// Symmetric adjacency predicate.
    fn is_adjacent(&self, a: &Self::Geometry, b: &Self::Geometry) -> bool;

    /// Whether a component of this size may become a corridor at all.
    fn admits(&self, _member_count: usize) -> bool { true }

    /// Merge member geometries into the corridor geometry.
    fn merge(&self, members: &[&Self::Geometry]) -> Result<CorridorGeometry, ComputationError>;

    /// Corridor length of a merged geometry.
    fn length(&self, merged: &CorridorGeometry) -> Result<f64, ComputationError> {
        let length = merged.length_m();
        if length.is_finite() { Ok(length) } else { Err(ComputationError::NonFiniteLength(length)) }
    }

    /// Whether a merged corridor of this length survives the noise filter.
    fn keeps(&self, _length_m: f64) -> bool { true }
}

/// How two segments were found to be connected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentContact {
    /// An endpoint of one equals an endpoint of the other exactly.
    SharedEndpoint,
    /// Some endpoint pair lies within the tolerance (inclusive).
    WithinTolerance,
    /// A segment of one crosses or overlaps a segment of the other.
    Crossing,
}

#[inline]
fn endpoints(line: &LineString<f64>) -> [Coord<f64>; 2] {
    [line.0[0], line.0[line.0.len() - 1]]
}

/// Classify the contact between two road segments, cheapest test first.
///
/// The three tests are OR'd: a shared endpoint, the minimum endpoint-to-endpoint
/// distance being at most `tolerance`, or any pair of line segments
/// intersecting (proper crossing, touching interior, or collinear overlap).
pub fn segment_contact(a: &LineString<f64>, b: &LineString<f64>, tolerance: f64) -> Option<SegmentContact> {
    if a.0.len() < 2 || b.0.len() < 2 { return None }

    let (ea, eb) = (endpoints(a), endpoints(b));
    if ea.iter().any(|p| eb.contains(p)) { return Some(SegmentContact::SharedEndpoint) }

    let min_gap = ea.iter()
        .flat_map(|&p| eb.iter().map(move |&q| coord_distance(p, q)))
        .fold(f64::INFINITY, f64::min);
    if min_gap <= tolerance { return Some(SegmentContact::WithinTolerance) }

    let crosses = a.lines().any(|la| b.lines().any(|lb| line_intersection(la, lb).is_some()));
    crosses.then_some(SegmentContact::Crossing)
}

/// Adjacency for road segments (LineStrings).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentRule {
    pub tolerance: f64,
    pub min_length_m: f64,
}

impl SegmentRule {
    pub fn from_config(config: &CorridorConfig) -> Self {
        Self { tolerance: config.adjacency_tolerance, min_length_m: config.min_length_m }
    }
}

impl AdjacencyRule for SegmentRule {
    type Geometry = LineString<f64>;

    const KIND: GeometryKind = GeometryKind::Segment;

    #[inline]
    fn geometry(record: &PriorityRecord) -> Option<&LineString<f64>> { record.as_segment() }

    #[inline]
    fn bounds(&self, geometry: &LineString<f64>) -> Option<Rect<f64>> { geometry.bounding_rect() }

    #[inline]
    fn reach(&self) -> f64 { self.tolerance }

    fn is_adjacent(&self, a: &LineString<f64>, b: &LineString<f64>) -> bool {
        segment_contact(a, b, self.tolerance).is_some()
    }

    fn merge(&self, members: &[&LineString<f64>]) -> Result<CorridorGeometry, ComputationError> {
        dissolve_lines(members).map(CorridorGeometry::Lines)
    }

    #[inline]
    fn keeps(&self, length_m: f64) -> bool { length_m >= self.min_length_m }
}

/// Adjacency for point samples.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointRule {
    pub d_max: f64,
    pub n_min: usize,
}

impl PointRule {
    pub fn from_config(config: &CorridorConfig) -> Self {
        Self { d_max: config.d_max, n_min: config.n_min }
    }
}

impl AdjacencyRule for PointRule {
    type Geometry = Point<f64>;

    const KIND: GeometryKind = GeometryKind::Point;

    #[inline]
    fn geometry(record: &PriorityRecord) -> Option<&Point<f64>> { record.as_point() }

    #[inline]
    fn bounds(&self, geometry: &Point<f64>) -> Option<Rect<f64>> { Some(geometry.bounding_rect()) }

    #[inline]
    fn reach(&self) -> f64 { self.d_max }

    #[inline]
    fn is_adjacent(&self, a: &Point<f64>, b: &Point<f64>) -> bool {
        Euclidean.distance(a, b) <= self.d_max
    }

    #[inline]
    fn admits(&self, member_count: usize) -> bool { member_count >= self.n_min }

    fn merge(&self, members: &[&Point<f64>]) -> Result<CorridorGeometry, ComputationError> {
        if members.is_empty() { return Err(ComputationError::EmptyMerge) }

        let points = members.iter().map(|&&p| p).collect::<Vec<_>>();
        let path = nearest_neighbor_chain(&points);
        let members = MultiPoint::new(points);
        let hull = member_hull(&members);
        Ok(CorridorGeometry::Points { members, path, hull })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{line_string, point};

    #[test]
    fn shared_endpoint_touch() {
        let a = line_string![(x: 0.0, y: 0.0), (x: 100.0, y: 0.0)];
        let b = line_string![(x: 100.0, y: 0.0), (x: 100.0, y: 100.0)];
        assert_eq!(segment_contact(&a, &b, 0.0), Some(SegmentContact::SharedEndpoint));
    }

    #[test]
    fn interior_crossing_connects_without_nearby_endpoints() {
        let a = line_string![(x: 0.0, y: 0.0), (x: 100.0, y: 0.0)];
        let b = line_string![(x: 50.0, y: -50.0), (x: 50.0, y: 50.0)];
        assert_eq!(segment_contact(&a, &b, 10.0), Some(SegmentContact::Crossing));
    }

    #[test]
    fn t_junction_touching_interior_connects() {
        let a = line_string![(x: 0.0, y: 0.0), (x: 100.0, y: 0.0)];
        let b = line_string![(x: 50.0, y: 0.0), (x: 50.0, y: 80.0)];
        assert_eq!(segment_contact(&a, &b, 0.0), Some(SegmentContact::Crossing));
    }

    #[test]
    fn tolerance_boundary_is_inclusive() {
        let rule = SegmentRule { tolerance: 10.0, min_length_m: 200.0 };
        let a = line_string![(x: 0.0, y: 0.0), (x: 100.0, y: 0.0)];
        let at = line_string![(x: 110.0, y: 0.0), (x: 300.0, y: 0.0)];
        let beyond = line_string![(x: 110.000001, y: 0.0), (x: 300.0, y: 0.0)];

        assert!(rule.is_adjacent(&a, &at));
        assert!(rule.is_adjacent(&at, &a));
        assert!(!rule.is_adjacent(&a, &beyond));
        assert!(!rule.is_adjacent(&beyond, &a));
    }

    #[test]
    fn parallel_lines_with_distant_endpoints_do_not_connect() {
        // Interior points are 5 m apart, endpoints are not.
        let a = line_string![(x: 0.0, y: 0.0), (x: 100.0, y: 0.0)];
        let b = line_string![(x: 30.0, y: 5.0), (x: 70.0, y: 5.0)];
        assert_eq!(segment_contact(&a, &b, 10.0), None);
    }

    #[test]
    fn point_rule_uses_inclusive_distance() {
        let rule = PointRule { d_max: 30.0, n_min: 5 };
        assert!(rule.is_adjacent(&point!(x: 0.0, y: 0.0), &point!(x: 30.0, y: 0.0)));
        assert!(rule.is_adjacent(&point!(x: 0.0, y: 0.0), &point!(x: 18.0, y: 24.0)));
        assert!(!rule.is_adjacent(&point!(x: 0.0, y: 0.0), &point!(x: 30.0001, y: 0.0)));
        assert!(!rule.admits(4));
        assert!(rule.admits(5));
    }

    #[test]
    fn segment_merge_reports_non_finite_length() {
        let rule = SegmentRule { tolerance: 10.0, min_length_m: 0.0 };
        let a = line_string![(x: -1.0e308, y: 0.0), (x: 1.0e308, y: 0.0)];
        let merged = rule.merge(&[&a]).unwrap();
        assert!(matches!(rule.length(&merged), Err(ComputationError::NonFiniteLength(_))));
    }
}
