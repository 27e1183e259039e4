pub(crate) mod algorithm;
mod bbox;
mod geom;
mod index;
mod rule;

pub use geom::CorridorGeometry;
pub(crate) use index::SpatialIndex;
pub use rule::{segment_contact, AdjacencyRule, PointRule, SegmentContact, SegmentRule};
