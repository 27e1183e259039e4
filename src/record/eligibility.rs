use ahash::AHashSet;
use geo::CoordsIter;

use crate::config::EligibilityConfig;
use crate::error::InvalidRecordError;
use crate::record::{GeometryKind, Metric, PriorityRecord, RecordGeometry};

/// Result of screening the full record set against a threshold.
#[derive(Debug, Default)]
pub struct EligibilitySplit<'a> {
    /// Valid records with `priority_score >= threshold`, sorted by id.
    pub eligible: Vec<&'a PriorityRecord>,
    /// Records excluded as invalid, in input order.
    pub invalid: Vec<(String, InvalidRecordError)>,
    /// Valid records below the threshold.
    pub ineligible: usize,
    /// Out-of-range metrics on usable records, read as absent. In input order.
    pub ignored_metrics: Vec<(String, Metric, f64)>,
}

/// Check that a record is usable for the given geometry kind.
/// Optional metrics never invalidate a record.
pub fn validate_record(record: &PriorityRecord, kind: GeometryKind) -> Result<(), InvalidRecordError> {
    let geometry = record.geometry.as_ref().ok_or_else(|| match &record.geometry_issue {
        Some(issue) => InvalidRecordError::MalformedGeometry(issue.clone()),
        None => InvalidRecordError::MissingGeometry,
    })?;
    if geometry.kind() != kind {
        return Err(InvalidRecordError::WrongGeometryKind {
            expected: kind.as_str(),
            found: geometry.kind().as_str(),
        })
    }

    match geometry {
        RecordGeometry::Segment(line) => {
            if line.coords_count() < 2 {
                return Err(InvalidRecordError::MalformedGeometry(
                    format!("LineString needs at least 2 coordinates, found {}", line.coords_count())
                ))
            }
            if line.coords_iter().any(|c| !c.x.is_finite() || !c.y.is_finite()) {
                return Err(InvalidRecordError::MalformedGeometry("non-finite coordinate".to_string()))
            }
            if line.0.iter().all(|c| *c == line.0[0]) {
                return Err(InvalidRecordError::MalformedGeometry("LineString has zero length".to_string()))
            }
        }
        RecordGeometry::Point(point) => {
            if !point.x().is_finite() || !point.y().is_finite() {
                return Err(InvalidRecordError::MalformedGeometry("non-finite coordinate".to_string()))
            }
        }
    }

    if !(0.0..=1.0).contains(&record.priority_score) {
        return Err(InvalidRecordError::ScoreOutOfRange(record.priority_score))
    }

    Ok(())
}

/// Split records into eligible, invalid and below-threshold. Pure: never
/// fails, invalid records are reported rather than raised.
pub fn filter_eligible<'a>(
    records: &'a [PriorityRecord],
    config: &EligibilityConfig,
    kind: GeometryKind,
) -> EligibilitySplit<'a> {
    let mut split = EligibilitySplit::default();
    let mut seen = AHashSet::with_capacity(records.len());

    for record in records {
        if let Err(error) = validate_record(record, kind) {
            split.invalid.push((record.id.clone(), error));
            continue
        }

        // First occurrence of an id wins.
        if !seen.insert(record.id.as_str()) {
            split.invalid.push((record.id.clone(), InvalidRecordError::DuplicateId));
            continue
        }

        split.ignored_metrics.extend(
            record.ignored_metrics().map(|(metric, value)| (record.id.clone(), metric, value))
        );

        if record.priority_score >= config.priority_threshold {
            split.eligible.push(record);
        } else {
            split.ineligible += 1;
        }
    }

    split.eligible.sort_unstable_by(|a, b| a.id.cmp(&b.id));
    split
}
