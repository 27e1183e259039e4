mod eligibility;
mod record;

pub use eligibility::{filter_eligible, validate_record, EligibilitySplit};
pub use record::{GeometryKind, Metric, PriorityRecord, RecordGeometry};
