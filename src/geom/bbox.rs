use geo::{Coord, Rect};
use rstar::{RTreeObject, AABB};

/// A record envelope in the R-tree, tied to its graph vertex by index.
#[derive(Debug, Clone)]
pub(crate) struct BoundingBox {
    idx: usize,
    bbox: Rect<f64>,
}

impl BoundingBox {
    pub(crate) fn new(idx: usize, bbox: Rect<f64>) -> Self {
        Self { idx, bbox }
    }

    /// Get the vertex index this envelope belongs to.
    pub(crate) fn idx(&self) -> usize { self.idx }
}

impl RTreeObject for BoundingBox {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(self.bbox.min().into(), self.bbox.max().into())
    }
}

/// Grow a rectangle by `reach` on every side, as an R-tree search envelope.
#[inline]
pub(crate) fn expanded(rect: &Rect<f64>, reach: f64) -> AABB<[f64; 2]> {
    let Coord { x: min_x, y: min_y } = rect.min();
    let Coord { x: max_x, y: max_y } = rect.max();
    AABB::from_corners([min_x - reach, min_y - reach], [max_x + reach, max_y + reach])
}
