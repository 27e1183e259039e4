use std::path::Path;

use anyhow::{bail, Context, Result};
use geo::{Coord, LineString, Point};
use serde_json::Value;
use tracing::{debug, warn};

use crate::record::{PriorityRecord, RecordGeometry};

/// Read priority records from a GeoJSON file.
pub fn read_records_file(path: &Path) -> Result<Vec<PriorityRecord>> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("[read_records_file] reading {}", path.display()))?;
    read_records_geojson(&bytes)
        .with_context(|| format!("[read_records_file] loading {}", path.display()))
}

/// Read priority records from GeoJSON FeatureCollection bytes.
///
/// Record-level problems never fail the read: a geometry that cannot be
/// parsed is left as `None` with the reason in `geometry_issue`, and a
/// missing score reads as NaN, so both surface later as invalid records.
pub fn read_records_geojson(bytes: &[u8]) -> Result<Vec<PriorityRecord>> {
    let value: Value = serde_json::from_slice(bytes).context("[read_records_geojson] parsing JSON")?;

    if value["type"].as_str() != Some("FeatureCollection") {
        bail!("[read_records_geojson] expected a FeatureCollection, found {}", value["type"]);
    }
    let Some(features) = value["features"].as_array() else {
        bail!("[read_records_geojson] FeatureCollection has no features array");
    };

    let records = features.iter().enumerate()
        .map(|(index, feature)| parse_feature(index, feature))
        .collect::<Vec<_>>();

    debug!(records = records.len(), "read GeoJSON records");
    Ok(records)
}

fn parse_feature(index: usize, feature: &Value) -> PriorityRecord {
    let properties = &feature["properties"];

    let id = id_string(&properties["id"])
        .or_else(|| id_string(&feature["id"]))
        .unwrap_or_else(|| index.to_string());

    let priority_score = properties["priority_score"].as_f64()
        .or_else(|| properties["priority"].as_f64())
        .unwrap_or(f64::NAN);

    let (geometry, geometry_issue) = match parse_geometry(&feature["geometry"]) {
        Ok(geometry) => (geometry, None),
        Err(issue) => {
            warn!(record = %id, %issue, "unreadable geometry");
            (None, Some(issue))
        }
    };

    PriorityRecord {
        heat_norm: properties["heat_norm"].as_f64(),
        ndvi_norm: properties["ndvi_norm"].as_f64(),
        aqi_norm: properties["aqi_norm"].as_f64(),
        geometry_issue,
        ..PriorityRecord::new(id, geometry, priority_score)
    }
}

fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Parse a LineString, single-part MultiLineString, or Point. `Ok(None)`
/// for a null geometry, `Err` describing anything else that cannot be used.
fn parse_geometry(geometry: &Value) -> Result<Option<RecordGeometry>, String> {
    if geometry.is_null() { return Ok(None) }

    let kind = geometry["type"].as_str().ok_or("geometry has no type")?;
    let coordinates = geometry["coordinates"].as_array()
        .ok_or_else(|| format!("{kind} has no coordinates array"))?;
    let invalid = || format!("{kind} has invalid coordinates");

    let parsed = match kind {
        "LineString" => parse_line(coordinates).map(RecordGeometry::Segment).ok_or_else(invalid),
        "MultiLineString" => match coordinates.as_slice() {
            [line] => line.as_array()
                .and_then(|line| parse_line(line))
                .map(RecordGeometry::Segment)
                .ok_or_else(invalid),
            parts => Err(format!("MultiLineString with {} parts", parts.len())),
        },
        "Point" => parse_coord(coordinates)
            .map(|c| RecordGeometry::Point(Point::from(c)))
            .ok_or_else(invalid),
        other => Err(format!("unsupported geometry type {other}")),
    };
    parsed.map(Some)
}

fn parse_line(coordinates: &[Value]) -> Option<LineString<f64>> {
    coordinates.iter()
        .map(|c| parse_coord(c.as_array()?))
        .collect::<Option<Vec<_>>>()
        .map(LineString::new)
}

fn parse_coord(pair: &[Value]) -> Option<Coord<f64>> {
    match pair {
        [x, y, ..] => Some(Coord { x: x.as_f64()?, y: y.as_f64()? }),
        _ => None,
    }
}
