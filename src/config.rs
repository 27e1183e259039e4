use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;

pub const DEFAULT_PRIORITY_THRESHOLD: f64 = 0.70;
pub const DEFAULT_MIN_LENGTH_M: f64 = 200.0;
pub const DEFAULT_D_MAX_M: f64 = 30.0;
pub const DEFAULT_N_MIN: usize = 5;
pub const DEFAULT_ADJACENCY_TOLERANCE_M: f64 = 10.0;

/// Threshold deciding which records are corridor-eligible.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EligibilityConfig {
    pub priority_threshold: f64,
}

impl Default for EligibilityConfig {
    fn default() -> Self {
        Self { priority_threshold: DEFAULT_PRIORITY_THRESHOLD }
    }
}

/// Full per-invocation configuration surface. Distances are in the units of
/// the input CRS, which must be meters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorridorConfig {
    /// Minimum priority score for a record to be corridor-eligible.
    pub priority_threshold: f64,
    /// Segment mode: corridors shorter than this are discarded.
    pub min_length_m: f64,
    /// Point mode: maximum distance between adjacent points.
    pub d_max: f64,
    /// Point mode: minimum number of points per corridor.
    pub n_min: usize,
    /// Segment mode: maximum endpoint gap still counted as connected.
    pub adjacency_tolerance: f64,
    /// Whether AQI participates in the aggregated metrics.
    pub include_aqi: bool,
}

impl Default for CorridorConfig {
    fn default() -> Self {
        Self {
            priority_threshold: DEFAULT_PRIORITY_THRESHOLD,
            min_length_m: DEFAULT_MIN_LENGTH_M,
            d_max: DEFAULT_D_MAX_M,
            n_min: DEFAULT_N_MIN,
            adjacency_tolerance: DEFAULT_ADJACENCY_TOLERANCE_M,
            include_aqi: true,
        }
    }
}

impl CorridorConfig {
    /// Load a configuration from a JSON file; missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("[CorridorConfig::from_json_file] reading {}", path.display()))?;
        serde_json::from_slice(&bytes)
            .with_context(|| format!("[CorridorConfig::from_json_file] parsing {}", path.display()))
    }

    /// Check every field before any processing begins.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if !(0.0..=1.0).contains(&self.priority_threshold) {
            return Err(ConfigurationError::ThresholdOutOfRange(self.priority_threshold))
        }

        for (name, value) in [
            ("min_length_m", self.min_length_m),
            ("d_max", self.d_max),
            ("adjacency_tolerance", self.adjacency_tolerance),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigurationError::NegativeDistance { name, value })
            }
        }

        if self.n_min == 0 { return Err(ConfigurationError::ZeroMinPoints) }

        Ok(())
    }

    #[inline]
    pub fn eligibility(&self) -> EligibilityConfig {
        EligibilityConfig { priority_threshold: self.priority_threshold }
    }
}
