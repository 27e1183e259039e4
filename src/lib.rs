#![doc = "Vansetu: priority corridor aggregation"]
mod aggregate;
mod cache;
mod classify;
mod config;
mod corridor;
mod error;
mod geom;
mod graph;
mod io;
mod record;

#[doc(inline)]
pub use aggregate::{aggregate, aggregate_points, aggregate_segments};

#[doc(inline)]
pub use cache::{CacheKey, CorridorCache};

#[doc(inline)]
pub use classify::{
    classify, interventions, Classification, CorridorType, ExposureShares, Severity,
    GREEN_THRESHOLD, HEAT_THRESHOLD, POLLUTION_THRESHOLD,
};

#[doc(inline)]
pub use config::{CorridorConfig, EligibilityConfig};

#[doc(inline)]
pub use corridor::{Corridor, CorridorAggregator, CorridorBrief, CorridorSet, CorridorSummary, Diagnostic};

#[doc(inline)]
pub use error::{ComputationError, ConfigurationError, InvalidRecordError};

#[doc(inline)]
pub use geom::{segment_contact, AdjacencyRule, CorridorGeometry, PointRule, SegmentContact, SegmentRule};

#[doc(inline)]
pub use graph::ConnectivityGraph;

#[doc(inline)]
pub use io::{read_records_file, read_records_geojson};

#[doc(inline)]
pub use record::{filter_eligible, validate_record, EligibilitySplit, GeometryKind, Metric, PriorityRecord, RecordGeometry};
