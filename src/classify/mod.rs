mod classifier;
mod interventions;

pub use classifier::{
    classify, Classification, CorridorType, ExposureShares, Severity,
    GREEN_THRESHOLD, HEAT_THRESHOLD, POLLUTION_THRESHOLD,
};
pub use interventions::interventions;
