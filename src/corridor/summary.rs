use serde::Serialize;

use crate::classify::{CorridorType, Severity};
use crate::corridor::{Corridor, CorridorSet};

/// Number of corridors listed in a summary.
const TOP_CORRIDORS: usize = 5;

/// A one-line view of a corridor for dashboards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorridorBrief {
    pub corridor_id: String,
    pub member_count: usize,
    pub length_m: f64,
    pub mean_priority: f64,
    pub corridor_type: Option<CorridorType>,
    pub severity: Option<Severity>,
}

impl From<&Corridor> for CorridorBrief {
    fn from(corridor: &Corridor) -> Self {
        let classification = corridor.classification.as_ref();
        Self {
            corridor_id: corridor.corridor_id.to_string(),
            member_count: corridor.member_count(),
            length_m: corridor.length_m,
            mean_priority: corridor.mean_priority,
            corridor_type: classification.map(|c| c.corridor_type),
            severity: classification.map(|c| c.severity),
        }
    }
}

/// Aggregate statistics over a corridor set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorridorSummary {
    pub corridor_count: usize,
    pub total_length_m: f64,
    pub total_members: usize,
    pub orphan_count: usize,
    pub excluded: usize,
    /// Priority statistics over corridors; None for an empty set.
    pub avg_priority: Option<f64>,
    pub min_priority: Option<f64>,
    pub max_priority: Option<f64>,
    /// The first corridors in output order.
    pub top_corridors: Vec<CorridorBrief>,
}

impl CorridorSet {
    pub fn summary(&self) -> CorridorSummary {
        let priorities = self.corridors.iter().map(|c| c.mean_priority);
        let (min_priority, max_priority) = priorities.clone()
            .fold(None, |acc: Option<(f64, f64)>, p| match acc {
                None => Some((p, p)),
                Some((lo, hi)) => Some((lo.min(p), hi.max(p))),
            })
            .unzip();

        CorridorSummary {
            corridor_count: self.len(),
            total_length_m: self.corridors.iter().map(|c| c.length_m).sum(),
            total_members: self.corridors.iter().map(Corridor::member_count).sum(),
            orphan_count: self.orphan_ids.len(),
            excluded: self.excluded,
            avg_priority: (!self.is_empty()).then(|| priorities.sum::<f64>() / self.len() as f64),
            min_priority,
            max_priority,
            top_corridors: self.corridors.iter().take(TOP_CORRIDORS).map(CorridorBrief::from).collect(),
        }
    }
}
