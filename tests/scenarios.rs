// End-to-end aggregation scenarios: the worked segment, point and
// classification examples plus adjacency and failure edge cases.

use std::collections::BTreeMap;
use std::io::Write;

use vansetu::{
    aggregate, aggregate_points, aggregate_segments, read_records_file, ComputationError, CorridorConfig,
    CorridorGeometry, CorridorType, Diagnostic, GeometryKind, InvalidRecordError, PriorityRecord,
    GREEN_THRESHOLD, HEAT_THRESHOLD, POLLUTION_THRESHOLD,
};

fn segment_scenario() -> Vec<PriorityRecord> {
    vec![
        PriorityRecord::segment("1", &[(0.0, 0.0), (120.0, 0.0)], 0.90),
        PriorityRecord::segment("2", &[(120.0, 0.0), (120.0, 130.0)], 0.85),
        PriorityRecord::segment("3", &[(2000.0, 2000.0), (2500.0, 2000.0)], 0.30),
        PriorityRecord::segment("4", &[(0.0, 900.0), (60.0, 900.0)], 0.72),
        PriorityRecord::segment("5", &[(68.0, 900.0), (120.0, 900.0)], 0.71),
    ]
}

#[test]
fn segment_scenario_yields_one_corridor() {
    let set = aggregate_segments(&segment_scenario(), &CorridorConfig::default()).unwrap();

    assert_eq!(set.len(), 1);
    assert_eq!(set.corridors[0].member_ids, vec!["1", "2"]);
    assert!(set.corridors[0].length_m >= 200.0);
    assert_eq!(set.orphan_ids, vec!["4", "5"]);
    assert_eq!(set.eligible_count(), 4);
    assert!(!set.orphan_ids.contains(&"3".to_string()));
}

#[test]
fn point_scenario_yields_one_corridor_and_one_orphan() {
    let records = vec![
        PriorityRecord::point("a", 0.0, 0.0, 0.8),
        PriorityRecord::point("b", 20.0, 0.0, 0.8),
        PriorityRecord::point("c", 45.0, 0.0, 0.8),
        PriorityRecord::point("d", 1000.0, 1000.0, 0.8),
    ];
    let config = CorridorConfig { d_max: 30.0, n_min: 3, ..Default::default() };
    let set = aggregate_points(&records, &config).unwrap();

    assert_eq!(set.len(), 1);
    assert_eq!(set.corridors[0].member_ids, vec!["a", "b", "c"]);
    assert_eq!(set.corridors[0].num_points(), Some(3));
    assert_eq!(set.orphan_ids, vec!["d"]);

    let CorridorGeometry::Points { members, path, .. } = &set.corridors[0].geometry else {
        panic!("expected a point corridor");
    };
    assert_eq!(members.0.len(), 3);
    assert_eq!(path.0.first().map(|c| c.x), Some(0.0));
}

#[test]
fn classification_scenario_is_heat_dominated() {
    let records = (0..5)
        .map(|i| {
            PriorityRecord::point(format!("p{i}"), i as f64 * 10.0, 0.0, 0.8)
                .with_heat(0.6)
                .with_aqi(0.2)
                .with_ndvi(0.8)
        })
        .collect::<Vec<_>>();
    let mut set = aggregate_points(&records, &CorridorConfig::default()).unwrap();
    set.classify();

    let classification = set.corridors[0].classification.as_ref().unwrap();
    assert_eq!(classification.corridor_type, CorridorType::HeatDominated);
    assert!((classification.shares.heat - 0.6).abs() < 1e-9);
    assert!(classification.shares.heat >= HEAT_THRESHOLD);
    assert!(classification.shares.pollution < POLLUTION_THRESHOLD);
    assert!(classification.shares.green < GREEN_THRESHOLD);
}

#[test]
fn tolerance_boundary_is_inclusive() {
    let config = CorridorConfig { adjacency_tolerance: 10.0, min_length_m: 200.0, ..Default::default() };

    let at = vec![
        PriorityRecord::segment("a", &[(0.0, 0.0), (150.0, 0.0)], 0.9),
        PriorityRecord::segment("b", &[(160.0, 0.0), (300.0, 0.0)], 0.9),
    ];
    let set = aggregate_segments(&at, &config).unwrap();
    assert_eq!(set.len(), 1);
    assert_eq!(set.corridors[0].member_ids, vec!["a", "b"]);

    let beyond = vec![
        PriorityRecord::segment("a", &[(0.0, 0.0), (150.0, 0.0)], 0.9),
        PriorityRecord::segment("b", &[(160.000001, 0.0), (300.0, 0.0)], 0.9),
    ];
    let set = aggregate_segments(&beyond, &config).unwrap();
    assert!(set.is_empty());
    assert_eq!(set.orphan_ids, vec!["a", "b"]);
}

#[test]
fn tolerance_gap_is_kept_as_multilinestring_and_not_counted() {
    let records = vec![
        PriorityRecord::segment("a", &[(0.0, 0.0), (150.0, 0.0)], 0.9),
        PriorityRecord::segment("b", &[(158.0, 0.0), (308.0, 0.0)], 0.9),
    ];
    let set = aggregate_segments(&records, &CorridorConfig::default()).unwrap();

    let corridor = &set.corridors[0];
    let CorridorGeometry::Lines(lines) = &corridor.geometry else { panic!("expected lines") };
    assert_eq!(lines.0.len(), 2);
    assert!((corridor.length_m - 300.0).abs() < 1e-9);
}

#[test]
fn gap_exclusion_can_filter_a_corridor() {
    // 95 + 100 = 195 m of road; the 5 m gap would lift it over 200 m.
    let records = vec![
        PriorityRecord::segment("a", &[(0.0, 0.0), (95.0, 0.0)], 0.9),
        PriorityRecord::segment("b", &[(100.0, 0.0), (200.0, 0.0)], 0.9),
    ];
    let set = aggregate_segments(&records, &CorridorConfig::default()).unwrap();
    assert!(set.is_empty());
    assert_eq!(set.orphan_ids, vec!["a", "b"]);
}

#[test]
fn failed_component_is_isolated() {
    let records = vec![
        PriorityRecord::segment("huge", &[(-1e308, 0.0), (1e308, 0.0)], 0.9),
        PriorityRecord::segment("ok-1", &[(0.0, 1000.0), (150.0, 1000.0)], 0.9),
        PriorityRecord::segment("ok-2", &[(150.0, 1000.0), (300.0, 1000.0)], 0.9),
    ];
    let set = aggregate_segments(&records, &CorridorConfig::default()).unwrap();

    assert_eq!(set.len(), 1);
    assert_eq!(set.corridors[0].member_ids, vec!["ok-1", "ok-2"]);
    assert_eq!(set.orphan_ids, vec!["huge"]);
    assert!(matches!(
        set.diagnostics.as_slice(),
        [Diagnostic::ComponentDropped { error: ComputationError::NonFiniteLength(_), .. }]
    ));
}

#[test]
fn duplicate_and_malformed_records_are_excluded() {
    let records = vec![
        PriorityRecord::segment("a", &[(0.0, 0.0), (150.0, 0.0)], 0.9),
        PriorityRecord::segment("a", &[(150.0, 0.0), (300.0, 0.0)], 0.9),
        PriorityRecord::segment("short", &[(0.0, 0.0)], 0.9),
        PriorityRecord::segment("nan", &[(0.0, 0.0), (10.0, 0.0)], f64::NAN),
        PriorityRecord::segment("z", &[(5.0, 5.0), (5.0, 5.0)], 0.9),
        PriorityRecord::segment("hot", &[(0.0, 50.0), (10.0, 50.0)], 0.9).with_heat(1.5),
    ];
    let set = aggregate_segments(&records, &CorridorConfig::default()).unwrap();

    assert_eq!(set.excluded, 4);
    let errors = set.diagnostics.iter()
        .filter_map(|d| match d {
            Diagnostic::InvalidRecord { error, .. } => Some(error.clone()),
            _ => None,
        })
        .collect::<Vec<_>>();
    assert_eq!(errors.len(), 4);
    assert_eq!(errors[0], InvalidRecordError::DuplicateId);
    assert!(matches!(errors[1], InvalidRecordError::MalformedGeometry(_)));
    assert!(matches!(errors[2], InvalidRecordError::ScoreOutOfRange(_)));
    assert_eq!(errors[3], InvalidRecordError::MalformedGeometry("LineString has zero length".into()));
    assert!(set.diagnostics.contains(
        &Diagnostic::MetricIgnored { id: "hot".into(), field: "heat_norm", value: 1.5 }
    ));
    assert!(!set.diagnostics.iter().any(|d| matches!(d, Diagnostic::ComponentDropped { .. })));
    assert_eq!(set.orphan_ids, vec!["a", "hot"]);
}

#[test]
fn repeated_runs_are_identical() {
    let config = CorridorConfig { min_length_m: 0.0, ..Default::default() };
    let records = segment_scenario();

    let mapping = |kind| {
        let set = aggregate(&records, kind, &config).unwrap();
        set.iter().map(|c| (c.corridor_id, c.member_ids.clone())).collect::<Vec<_>>()
    };
    let first = mapping(GeometryKind::Segment);
    assert_eq!(first.len(), 2);
    assert_eq!(first, mapping(GeometryKind::Segment));
}

#[test]
fn geojson_file_to_corridor_collection() {
    let features = segment_scenario().iter()
        .map(|r| {
            let line = r.as_segment().unwrap();
            serde_json::json!({
                "type": "Feature",
                "geometry": {
                    "type": "LineString",
                    "coordinates": line.0.iter().map(|c| [c.x, c.y]).collect::<Vec<_>>(),
                },
                "properties": { "id": r.id, "priority_score": r.priority_score, "heat_norm": 0.7 },
            })
        })
        .collect::<Vec<_>>();
    let collection = serde_json::json!({ "type": "FeatureCollection", "features": features });

    let mut file = tempfile::NamedTempFile::new().unwrap();
    serde_json::to_writer(&mut file, &collection).unwrap();
    file.flush().unwrap();

    let records = read_records_file(file.path()).unwrap();
    let mut set = aggregate_segments(&records, &CorridorConfig::default()).unwrap();
    set.classify();

    let output = set.to_geojson();
    let properties = &output["features"][0]["properties"];
    assert_eq!(properties["segment_ids"], serde_json::json!(["1", "2"]));
    assert_eq!(properties["mean_heat"], 0.7);
    assert_eq!(output["metadata"]["orphan_ids"], serde_json::json!(["4", "5"]));
    assert_eq!(output["metadata"]["ineligible"], 1);

    let by_id = set.iter().map(|c| (c.corridor_id.to_string(), c.member_count())).collect::<BTreeMap<_, _>>();
    let id = output["features"][0]["id"].as_str().unwrap();
    assert_eq!(by_id[id], 2);
    assert!(set.get_str(id).is_some());
}
