use std::fmt;

use chrono::{DateTime, Utc};
use geo::Rect;
use uuid::Uuid;

use crate::classify::Classification;
use crate::error::{ComputationError, InvalidRecordError};
use crate::geom::CorridorGeometry;
use crate::record::GeometryKind;

/// Namespace for corridor ids; an id is the v5 UUID of the member set.
const CORRIDOR_NAMESPACE: Uuid = Uuid::from_u128(0x5f0c_e2a4_7d1b_4c83_9a6e_31d2_b8f4_0e97);

/// Deterministic corridor id over a sorted member list.
pub(crate) fn corridor_id(kind: GeometryKind, member_ids: &[&str]) -> Uuid {
    let mut name = String::from(kind.as_str());
    for id in member_ids {
        name.push('\u{1f}');
        name.push_str(id);
    }
    Uuid::new_v5(&CORRIDOR_NAMESPACE, name.as_bytes())
}

/// One aggregated corridor.
#[derive(Debug, Clone, PartialEq)]
pub struct Corridor {
    pub corridor_id: Uuid,
    pub kind: GeometryKind,
    /// Member record ids, sorted.
    pub member_ids: Vec<String>,
    pub geometry: CorridorGeometry,
    pub length_m: f64,
    pub mean_priority: f64,
    pub mean_heat: Option<f64>,
    pub mean_ndvi: Option<f64>,
    pub mean_aqi: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub classification: Option<Classification>,
}

impl Corridor {
    #[inline] pub fn member_count(&self) -> usize { self.member_ids.len() }

    /// Number of point samples, for point corridors.
    #[inline]
    pub fn num_points(&self) -> Option<usize> {
        (self.kind == GeometryKind::Point).then_some(self.member_ids.len())
    }

    /// Bounds of the merged geometry.
    #[inline] pub fn bounds(&self) -> Option<Rect<f64>> { self.geometry.bounds() }
}

/// A non-fatal problem recorded during a run.
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// A record was excluded before graph construction.
    InvalidRecord { id: String, error: InvalidRecordError },
    /// A metric outside [0, 1] was read as absent. The record was kept.
    MetricIgnored { id: String, field: &'static str, value: f64 },
    /// A component failed to aggregate; its members were reported as orphans.
    ComponentDropped { member_ids: Vec<String>, error: ComputationError },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::InvalidRecord { id, error } => write!(f, "record {id} excluded: {error}"),
            Diagnostic::MetricIgnored { id, field, value } => {
                write!(f, "record {id}: ignoring {field} value {value} outside [0, 1]")
            }
            Diagnostic::ComponentDropped { member_ids, error } => {
                write!(f, "component of {} records dropped ({}): {error}", member_ids.len(), member_ids.join(", "))
            }
        }
    }
}

/// The output of one aggregation run.
#[derive(Debug, Clone, PartialEq)]
pub struct CorridorSet {
    pub kind: GeometryKind,
    /// Corridors by descending mean priority, ties by corridor id.
    pub corridors: Vec<Corridor>,
    /// Eligible records that are not part of any corridor, sorted.
    pub orphan_ids: Vec<String>,
    /// Number of input records excluded as invalid.
    pub excluded: usize,
    /// Number of valid records below the priority threshold.
    pub ineligible: usize,
    pub diagnostics: Vec<Diagnostic>,
}

impl CorridorSet {
    pub(crate) fn empty(kind: GeometryKind) -> Self {
        Self {
            kind,
            corridors: Vec::new(),
            orphan_ids: Vec::new(),
            excluded: 0,
            ineligible: 0,
            diagnostics: Vec::new(),
        }
    }

    #[inline] pub fn len(&self) -> usize { self.corridors.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.corridors.is_empty() }

    #[inline] pub fn iter(&self) -> impl Iterator<Item = &Corridor> { self.corridors.iter() }

    /// Number of eligible records: corridor members plus orphans.
    pub fn eligible_count(&self) -> usize {
        self.corridors.iter().map(Corridor::member_count).sum::<usize>() + self.orphan_ids.len()
    }

    /// Look up a corridor by id.
    pub fn get(&self, corridor_id: &Uuid) -> Option<&Corridor> {
        self.corridors.iter().find(|c| &c.corridor_id == corridor_id)
    }

    /// Look up a corridor by its textual id.
    pub fn get_str(&self, corridor_id: &str) -> Option<&Corridor> {
        Uuid::parse_str(corridor_id).ok().and_then(|id| self.get(&id))
    }

    /// Attach a rule-based classification to every corridor.
    pub fn classify(&mut self) {
        for corridor in &mut self.corridors {
            corridor.classification = Some(corridor.classify());
        }
    }
}
