use std::{cmp::Ordering, collections::BinaryHeap};

use geo::{ConvexHull, Coord, CoordsIter, MultiPoint, Polygon};

/// Convex hull of a point corridor's members.
#[inline]
pub(crate) fn member_hull(members: &MultiPoint<f64>) -> Polygon<f64> {
    members.convex_hull()
}

/// Reduce a hull to at most `max_points` vertices for export, dropping the
/// vertex whose removal loses the least area first (Visvalingam-Whyatt).
pub(crate) fn simplify_hull(hull: &Polygon<f64>, max_points: usize) -> Polygon<f64> {
    debug_assert!(max_points >= 3, "max_points must be at least 3");

    if hull.exterior().coords_count().saturating_sub(1) <= max_points { return hull.clone() }

    let mut points = hull.exterior().coords_iter().collect::<Vec<_>>();
    points.pop(); // closing coord

    #[inline]
    fn triangle_area(a: Coord<f64>, b: Coord<f64>, c: Coord<f64>) -> f64 {
        ((b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)).abs() * 0.5
    }

    let n = points.len();
    let mut prev = (0..n).map(|i| (i + n - 1) % n).collect::<Vec<_>>();
    let mut next = (0..n).map(|i| (i + 1) % n).collect::<Vec<_>>();
    let mut alive = vec![true; n];
    let mut version = vec![0u32; n];

    #[derive(Copy, Clone, Eq, PartialEq)]
    struct Candidate {
        area_bits: u64, // to_bits() is monotone for non-negative floats
        i: usize,
        version: u32,
    }

    impl Ord for Candidate {
        fn cmp(&self, other: &Self) -> Ordering {
            // Min-heap on area, then index.
            other.area_bits.cmp(&self.area_bits)
                .then_with(|| other.i.cmp(&self.i))
                .then_with(|| other.version.cmp(&self.version))
        }
    }

    impl PartialOrd for Candidate {
        fn partial_cmp(&self, other: &Self) -> Option<Ordering> { Some(self.cmp(other)) }
    }

    let mut heap = (0..n)
        .map(|i| Candidate {
            area_bits: triangle_area(points[prev[i]], points[i], points[next[i]]).to_bits(),
            i,
            version: 0,
        })
        .collect::<BinaryHeap<_>>();

    let mut remaining = n;
    while remaining > max_points {
        let Some(Candidate { i, version: v, .. }) = heap.pop() else { break };
        if !alive[i] || version[i] != v { continue }

        alive[i] = false;
        remaining -= 1;
        next[prev[i]] = next[i];
        prev[next[i]] = prev[i];

        for j in [prev[i], next[i]] {
            version[j] = version[j].wrapping_add(1);
            heap.push(Candidate {
                area_bits: triangle_area(points[prev[j]], points[j], points[next[j]]).to_bits(),
                i: j,
                version: version[j],
            });
        }
    }

    let Some(mut i) = (0..n).find(|&i| alive[i]) else { return hull.clone() };
    let mut ring = Vec::with_capacity(remaining + 1);
    for _ in 0..=remaining {
        ring.push(points[i]);
        i = next[i];
    }

    Polygon::new(ring.into(), vec![])
}
