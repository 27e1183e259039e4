use crate::config::CorridorConfig;
use crate::corridor::{CorridorAggregator, CorridorSet};
use crate::error::ConfigurationError;
use crate::record::{GeometryKind, PriorityRecord};

/// Aggregate `records` into corridors of the given geometry kind.
///
/// The configuration is validated before any work is done. Records of the
/// other geometry kind are reported as invalid.
pub fn aggregate(
    records: &[PriorityRecord],
    kind: GeometryKind,
    config: &CorridorConfig,
) -> Result<CorridorSet, ConfigurationError> {
    config.validate()?;
    Ok(aggregate_unchecked(records, kind, config))
}

/// Aggregate road segments into corridors.
pub fn aggregate_segments(records: &[PriorityRecord], config: &CorridorConfig) -> Result<CorridorSet, ConfigurationError> {
    aggregate(records, GeometryKind::Segment, config)
}

/// Aggregate point samples into corridors.
pub fn aggregate_points(records: &[PriorityRecord], config: &CorridorConfig) -> Result<CorridorSet, ConfigurationError> {
    aggregate(records, GeometryKind::Point, config)
}

/// Dispatch on kind with an already validated configuration.
pub(crate) fn aggregate_unchecked(records: &[PriorityRecord], kind: GeometryKind, config: &CorridorConfig) -> CorridorSet {
    match kind {
        GeometryKind::Segment => CorridorAggregator::segments(config).aggregate(records),
        GeometryKind::Point => CorridorAggregator::points(config).aggregate(records),
    }
}
