use geo::{Coord, LineString, Polygon, Rect};
use serde_json::{json, Map, Value};

use crate::corridor::{Corridor, CorridorSet};
use crate::geom::algorithm::simplify_hull;
use crate::geom::CorridorGeometry;
use crate::record::GeometryKind;

/// Maximum hull vertices written for a point corridor.
const MAX_HULL_POINTS: usize = 32;

impl CorridorSet {
    /// Export corridors as a GeoJSON FeatureCollection in output order, with
    /// run-level counts under `metadata`.
    pub fn to_geojson(&self) -> Value {
        let features = self.corridors.iter()
            .map(Corridor::to_geojson_feature)
            .collect::<Vec<_>>();

        json!({
            "type": "FeatureCollection",
            "features": features,
            "metadata": {
                "count": self.corridors.len(),
                "orphan_ids": self.orphan_ids,
                "excluded": self.excluded,
                "ineligible": self.ineligible,
                "warnings": self.diagnostics.iter().map(|d| d.to_string()).collect::<Vec<_>>(),
            },
        })
    }
}

impl Corridor {
    /// Export this corridor as a GeoJSON Feature keyed by its corridor id.
    pub fn to_geojson_feature(&self) -> Value {
        let id = self.corridor_id.to_string();
        let mut properties = Map::new();

        properties.insert("corridor_id".to_string(), json!(id));
        match self.kind {
            GeometryKind::Segment => {
                properties.insert("segment_ids".to_string(), json!(self.member_ids));
                properties.insert("segment_count".to_string(), json!(self.member_count()));
            }
            GeometryKind::Point => {
                properties.insert("point_ids".to_string(), json!(self.member_ids));
            }
        }
        properties.insert("length_m".to_string(), json!(round_to(self.length_m, 1)));
        if let Some(num_points) = self.num_points() {
            properties.insert("num_points".to_string(), json!(num_points));
        }

        properties.insert("mean_priority".to_string(), json!(round_to(self.mean_priority, 4)));
        properties.insert("mean_heat".to_string(), json!(self.mean_heat.map(|v| round_to(v, 4))));
        properties.insert("mean_ndvi".to_string(), json!(self.mean_ndvi.map(|v| round_to(v, 4))));
        properties.insert("mean_aqi".to_string(), json!(self.mean_aqi.map(|v| round_to(v, 4))));

        if let Some(classification) = &self.classification {
            properties.insert("corridor_type".to_string(), json!(classification.corridor_type.as_str()));
            properties.insert("corridor_type_secondary".to_string(), json!(classification.secondary_type.as_str()));
            properties.insert("severity_tier".to_string(), json!(classification.severity.as_str()));
            properties.insert("corridor_type_icon".to_string(), json!(classification.corridor_type.icon()));
            properties.insert("corridor_type_color".to_string(), json!(classification.corridor_type.color()));
            properties.insert("recommended_interventions".to_string(), json!(classification.interventions));
            properties.insert("intervention_rationale".to_string(), json!(classification.rationale));
        }

        if let Some(bounds) = self.bounds() {
            properties.insert("bounds".to_string(), bounds_to_json(&bounds));
        }
        if let CorridorGeometry::Points { hull, .. } = &self.geometry {
            properties.insert("hull".to_string(), polygon_to_geojson(&simplify_hull(hull, MAX_HULL_POINTS)));
        }
        properties.insert("created_at".to_string(), json!(self.created_at.to_rfc3339()));

        json!({
            "type": "Feature",
            "id": id,
            "geometry": geometry_to_geojson(&self.geometry),
            "properties": properties,
        })
    }
}

fn round_to(value: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    (value * scale).round() / scale
}

fn coords_to_json(line: &LineString<f64>) -> Vec<[f64; 2]> {
    line.coords().map(|c| [c.x, c.y]).collect()
}

/// A single dissolved part is written as a LineString, several parts stay a
/// MultiLineString. Point corridors are drawn by their chain.
fn geometry_to_geojson(geometry: &CorridorGeometry) -> Value {
    match geometry {
        CorridorGeometry::Lines(lines) => match lines.0.as_slice() {
            [line] => json!({ "type": "LineString", "coordinates": coords_to_json(line) }),
            parts => json!({
                "type": "MultiLineString",
                "coordinates": parts.iter().map(coords_to_json).collect::<Vec<_>>(),
            }),
        },
        CorridorGeometry::Points { path, .. } => match path.0.as_slice() {
            [Coord { x, y }] => json!({ "type": "Point", "coordinates": [x, y] }),
            _ => json!({ "type": "LineString", "coordinates": coords_to_json(path) }),
        },
    }
}

fn polygon_to_geojson(polygon: &Polygon<f64>) -> Value {
    let mut rings = vec![coords_to_json(polygon.exterior())];
    rings.extend(polygon.interiors().iter().map(coords_to_json));
    json!({ "type": "Polygon", "coordinates": rings })
}

fn bounds_to_json(bounds: &Rect<f64>) -> Value {
    json!({
        "west": bounds.min().x,
        "south": bounds.min().y,
        "east": bounds.max().x,
        "north": bounds.max().y,
    })
}
