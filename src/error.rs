use thiserror::Error;

/// A record that cannot take part in aggregation. Never fatal to a run.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InvalidRecordError {
    #[error("record has no geometry")]
    MissingGeometry,

    #[error("expected {expected} geometry, found {found}")]
    WrongGeometryKind { expected: &'static str, found: &'static str },

    #[error("malformed geometry: {0}")]
    MalformedGeometry(String),

    #[error("priority_score {0} is outside [0, 1]")]
    ScoreOutOfRange(f64),

    #[error("duplicate record id")]
    DuplicateId,
}

/// Rejected configuration. Returned before any processing begins.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    #[error("priority_threshold {0} must be within [0, 1]")]
    ThresholdOutOfRange(f64),

    #[error("{name} must be a finite, non-negative number (got {value})")]
    NegativeDistance { name: &'static str, value: f64 },

    #[error("n_min must be at least 1")]
    ZeroMinPoints,
}

/// A geometry operation failed for one component; the component is dropped.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ComputationError {
    #[error("merge produced an empty geometry")]
    EmptyMerge,

    #[error("length of merged geometry is not finite ({0})")]
    NonFiniteLength(f64),
}
