use geo::{Coord, LineString, Point};
use rstar::primitives::GeomWithData;
use rstar::RTree;

type Member = GeomWithData<[f64; 2], usize>;

/// Order points into a greedy nearest-neighbour chain.
///
/// Starts at the lowest-x (then lowest-y) point and repeatedly steps to the
/// closest unvisited point, breaking ties by input order. Unvisited points
/// live in an R-tree and are removed as the chain reaches them. The result
/// is an illustrative path only.
pub(crate) fn nearest_neighbor_chain(points: &[Point<f64>]) -> LineString<f64> {
    let Some(start) = (0..points.len()).min_by(|&a, &b| {
        points[a].x().total_cmp(&points[b].x())
            .then_with(|| points[a].y().total_cmp(&points[b].y()))
    }) else { return LineString::new(vec![]) };

    let mut unvisited = RTree::bulk_load(
        points.iter().enumerate()
            .filter(|&(i, _)| i != start)
            .map(|(i, p)| Member::new([p.x(), p.y()], i))
            .collect()
    );

    let mut order = Vec::with_capacity(points.len());
    let mut current = [points[start].x(), points[start].y()];
    order.push(points[start].0);

    while let Some((next, position)) = closest(&unvisited, &current) {
        if unvisited.remove(&Member::new(position, next)).is_none() { break }
        order.push(Coord { x: position[0], y: position[1] });
        current = position;
    }

    LineString::new(order)
}

/// Index and position of the unvisited point closest to `query`; the lowest
/// index among equally close points.
fn closest(unvisited: &RTree<Member>, query: &[f64; 2]) -> Option<(usize, [f64; 2])> {
    let mut candidates = unvisited.nearest_neighbor_iter_with_distance_2(query);
    let (first, best) = candidates.next()?;
    let chosen = candidates
        .take_while(|&(_, d)| d == best)
        .map(|(member, _)| member)
        .fold(first, |a, b| if b.data < a.data { b } else { a });
    Some((chosen.data, *chosen.geom()))
}
