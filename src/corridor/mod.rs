mod aggregate;
mod corridor;
mod summary;

pub use aggregate::CorridorAggregator;
pub use corridor::{Corridor, CorridorSet, Diagnostic};
pub(crate) use corridor::corridor_id;
pub use summary::{CorridorBrief, CorridorSummary};
