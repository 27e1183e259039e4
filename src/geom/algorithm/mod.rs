mod chain;
mod hull;
mod merge;

pub(crate) use chain::nearest_neighbor_chain;
pub(crate) use hull::{member_hull, simplify_hull};
pub(crate) use merge::dissolve_lines;
