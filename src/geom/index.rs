use geo::Rect;
use rstar::RTree;

use crate::geom::bbox::{expanded, BoundingBox};

/// R-tree over record envelopes, used to prune adjacency candidate pairs.
#[derive(Debug)]
pub(crate) struct SpatialIndex {
    rtree: RTree<BoundingBox>,
}

impl SpatialIndex {
    /// Bulk-load the index. Vertices without an envelope are left out and can
    /// never be returned as candidates.
    pub(crate) fn new(bounds: &[Option<Rect<f64>>]) -> Self {
        Self {
            rtree: RTree::bulk_load(
                bounds.iter().enumerate()
                    .filter_map(|(i, rect)| rect.map(|rect| BoundingBox::new(i, rect)))
                    .collect()
            ),
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize { self.rtree.size() }

    /// Indices of envelopes within `reach` of `rect`, in ascending order.
    pub(crate) fn within(&self, rect: &Rect<f64>, reach: f64) -> Vec<usize> {
        let mut found = self.rtree.locate_in_envelope_intersecting(&expanded(rect, reach))
            .map(|b| b.idx())
            .collect::<Vec<_>>();
        found.sort_unstable();
        found
    }
}
