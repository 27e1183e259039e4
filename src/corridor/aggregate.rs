use chrono::{DateTime, Utc};
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::config::{CorridorConfig, EligibilityConfig};
use crate::corridor::{corridor_id, Corridor, CorridorSet, Diagnostic};
use crate::error::ComputationError;
use crate::geom::{AdjacencyRule, PointRule, SegmentRule};
use crate::graph::ConnectivityGraph;
use crate::record::{filter_eligible, Metric, PriorityRecord};

/// What became of one connected component.
enum ComponentOutcome {
    Corridor(Corridor),
    /// Failed the size or length filter; members are orphans.
    Filtered(Vec<String>),
    /// Geometry failed; members are orphans and a diagnostic is recorded.
    Dropped(Vec<String>, ComputationError),
}

/// Turns eligible records into corridors under one adjacency rule.
#[derive(Debug, Clone)]
pub struct CorridorAggregator<R: AdjacencyRule> {
    rule: R,
    eligibility: EligibilityConfig,
    include_aqi: bool,
}

impl CorridorAggregator<SegmentRule> {
    pub fn segments(config: &CorridorConfig) -> Self {
        Self::new(SegmentRule::from_config(config), config.eligibility(), config.include_aqi)
    }
}

impl CorridorAggregator<PointRule> {
    pub fn points(config: &CorridorConfig) -> Self {
        Self::new(PointRule::from_config(config), config.eligibility(), config.include_aqi)
    }
}

impl<R: AdjacencyRule> CorridorAggregator<R> {
    pub fn new(rule: R, eligibility: EligibilityConfig, include_aqi: bool) -> Self {
        Self { rule, eligibility, include_aqi }
    }

    #[inline] pub fn rule(&self) -> &R { &self.rule }

    /// Run the full pipeline: screen records, build the connectivity graph,
    /// aggregate every component and order the result.
    ///
    /// Never fails. Invalid records and failed components are reported in
    /// the set's diagnostics; their records are counted as excluded or
    /// listed as orphans.
    pub fn aggregate(&self, records: &[PriorityRecord]) -> CorridorSet {
        let mut set = CorridorSet::empty(R::KIND);

        let split = filter_eligible(records, &self.eligibility, R::KIND);
        set.excluded = split.invalid.len();
        set.ineligible = split.ineligible;
        for (id, error) in split.invalid {
            warn!(record = %id, %error, "excluding invalid record");
            set.diagnostics.push(Diagnostic::InvalidRecord { id, error });
        }
        for (id, metric, value) in split.ignored_metrics {
            warn!(record = %id, field = metric.field(), value, "ignoring out-of-range metric");
            set.diagnostics.push(Diagnostic::MetricIgnored { id, field: metric.field(), value });
        }
        debug!(
            total = records.len(),
            eligible = split.eligible.len(),
            excluded = set.excluded,
            ineligible = set.ineligible,
            "screened records",
        );

        // Validation guarantees each eligible record has geometry of this kind.
        let members = split.eligible.iter()
            .filter_map(|&record| R::geometry(record).map(|geometry| (record, geometry)))
            .collect::<Vec<_>>();
        if members.is_empty() { return set }

        let geometries = members.iter().map(|&(_, g)| g).collect::<Vec<_>>();
        let graph = ConnectivityGraph::build(&self.rule, &geometries);
        let components = graph.find_connected_components();
        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count() / 2,
            components = components.len(),
            "built connectivity graph",
        );

        let created_at = Utc::now();
        let outcomes = components.par_iter()
            .map(|component| {
                let records = component.iter().map(|&v| members[v].0).collect::<Vec<_>>();
                let geometries = component.iter().map(|&v| members[v].1).collect::<Vec<_>>();
                self.aggregate_component(&records, &geometries, created_at)
            })
            .collect::<Vec<_>>();

        for outcome in outcomes {
            match outcome {
                ComponentOutcome::Corridor(corridor) => set.corridors.push(corridor),
                ComponentOutcome::Filtered(member_ids) => set.orphan_ids.extend(member_ids),
                ComponentOutcome::Dropped(member_ids, error) => {
                    warn!(members = member_ids.len(), %error, "dropping component");
                    set.orphan_ids.extend(member_ids.iter().cloned());
                    set.diagnostics.push(Diagnostic::ComponentDropped { member_ids, error });
                }
            }
        }

        set.corridors.sort_by(|a, b| {
            b.mean_priority.total_cmp(&a.mean_priority)
                .then_with(|| a.corridor_id.cmp(&b.corridor_id))
        });
        set.orphan_ids.sort_unstable();

        info!(
            kind = R::KIND.as_str(),
            corridors = set.corridors.len(),
            orphans = set.orphan_ids.len(),
            excluded = set.excluded,
            "aggregated corridors",
        );

        set
    }

    /// Aggregate one component. `records` and `geometries` are parallel and
    /// sorted by record id.
    fn aggregate_component(
        &self,
        records: &[&PriorityRecord],
        geometries: &[&R::Geometry],
        created_at: DateTime<Utc>,
    ) -> ComponentOutcome {
        let member_ids = records.iter().map(|r| r.id.clone()).collect::<Vec<_>>();

        if !self.rule.admits(records.len()) { return ComponentOutcome::Filtered(member_ids) }

        let merged = self.rule.merge(geometries)
            .and_then(|geometry| self.rule.length(&geometry).map(|length_m| (geometry, length_m)));
        let (geometry, length_m) = match merged {
            Ok(merged) => merged,
            Err(error) => return ComponentOutcome::Dropped(member_ids, error),
        };

        if !self.rule.keeps(length_m) { return ComponentOutcome::Filtered(member_ids) }

        let mean_priority = records.iter().map(|r| r.priority_score).sum::<f64>() / records.len() as f64;
        let mean_aqi = if self.include_aqi { mean_metric(records, Metric::Aqi) } else { None };

        let ids = member_ids.iter().map(String::as_str).collect::<Vec<_>>();
        ComponentOutcome::Corridor(Corridor {
            corridor_id: corridor_id(R::KIND, &ids),
            kind: R::KIND,
            geometry,
            length_m,
            mean_priority,
            mean_heat: mean_metric(records, Metric::Heat),
            mean_ndvi: mean_metric(records, Metric::Ndvi),
            mean_aqi,
            created_at,
            classification: None,
            member_ids,
        })
    }
}

/// Mean of a metric over the members that carry it.
fn mean_metric(records: &[&PriorityRecord], metric: Metric) -> Option<f64> {
    let (sum, count) = records.iter()
        .filter_map(|r| r.metric(metric))
        .fold((0.0, 0usize), |(sum, count), value| (sum + value, count + 1));
    (count > 0).then(|| sum / count as f64)
}
