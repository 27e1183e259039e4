use geo::{BoundingRect, Coord, LineString, MultiLineString, MultiPoint, Point, Polygon, Rect};
use geo::line_measures::Distance;
use geo::Euclidean;

/// The merged geometry of one corridor.
#[derive(Debug, Clone, PartialEq)]
pub enum CorridorGeometry {
    /// Dissolved road segments. A single part renders as a LineString; more
    /// than one part (tolerance-bridged gaps) stays a MultiLineString.
    Lines(MultiLineString<f64>),

    /// Point samples. `members` and `hull` are authoritative; `path` is a
    /// nearest-neighbour chain kept only as a rendering aid.
    Points {
        members: MultiPoint<f64>,
        path: LineString<f64>,
        hull: Polygon<f64>,
    },
}

impl CorridorGeometry {
    /// Number of line parts, or zero for point corridors.
    pub fn num_parts(&self) -> usize {
        match self {
            CorridorGeometry::Lines(lines) => lines.0.len(),
            CorridorGeometry::Points { .. } => 0,
        }
    }

    /// Summed length of the line parts, or of the chain for point corridors.
    /// Gaps between disjoint line parts are not included.
    pub fn length_m(&self) -> f64 {
        match self {
            CorridorGeometry::Lines(lines) => lines.0.iter().map(line_length).sum(),
            CorridorGeometry::Points { path, .. } => line_length(path),
        }
    }

    /// Axis-aligned bounds of the merged geometry.
    pub fn bounds(&self) -> Option<Rect<f64>> {
        match self {
            CorridorGeometry::Lines(lines) => lines.bounding_rect(),
            CorridorGeometry::Points { members, .. } => members.bounding_rect(),
        }
    }
}

/// Planar length of a LineString, in CRS units.
#[inline]
pub(crate) fn line_length(line: &LineString<f64>) -> f64 {
    line.lines()
        .map(|segment| coord_distance(segment.start, segment.end))
        .sum()
}

/// Planar distance between two coordinates.
#[inline]
pub(crate) fn coord_distance(a: Coord<f64>, b: Coord<f64>) -> f64 {
    Euclidean.distance(&Point::from(a), &Point::from(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{line_string, point};

    #[test]
    fn length_of_multiline_excludes_gap() {
        let geometry = CorridorGeometry::Lines(MultiLineString::new(vec![
            line_string![(x: 0.0, y: 0.0), (x: 100.0, y: 0.0)],
            line_string![(x: 108.0, y: 0.0), (x: 208.0, y: 0.0)],
        ]));
        assert_eq!(geometry.num_parts(), 2);
        assert_eq!(geometry.length_m(), 200.0);
    }

    #[test]
    fn bounds_cover_every_part() {
        let geometry = CorridorGeometry::Lines(MultiLineString::new(vec![
            line_string![(x: 0.0, y: 0.0), (x: 3.0, y: 4.0)],
            line_string![(x: -2.0, y: 1.0), (x: 1.0, y: 9.0)],
        ]));
        let bounds = geometry.bounds().unwrap();
        assert_eq!(bounds.min(), Coord { x: -2.0, y: 0.0 });
        assert_eq!(bounds.max(), Coord { x: 3.0, y: 9.0 });
    }

    #[test]
    fn point_corridor_length_follows_path() {
        let members = MultiPoint::new(vec![point!(x: 0.0, y: 0.0), point!(x: 3.0, y: 4.0)]);
        let geometry = CorridorGeometry::Points {
            path: line_string![(x: 0.0, y: 0.0), (x: 3.0, y: 4.0)],
            hull: Polygon::new(LineString::new(vec![]), vec![]),
            members,
        };
        assert_eq!(geometry.num_parts(), 0);
        assert_eq!(geometry.length_m(), 5.0);
    }
}
