//! Test d'intégration : ingestion → agrégation → couleurs

use paddock_geojson::ingest;
use paddock_stats::aggregate::{assign_colors, recompute_project_stats, summarize, PALETTE};
use serde_json::{json, Value};

fn feature(id: u64, owner: &str, project: &str, acres: f64, offset: f64) -> Value {
    json!({
        "type": "Feature",
        "properties": {
            "id": id,
            "name": format!("Paddock {id}"),
            "owner": owner,
            "Project__Name": project,
            "area_acres": acres,
        },
        "geometry": {
            "type": "Polygon",
            "coordinates": [[
                [146.0 + offset, -36.0],
                [146.01 + offset, -36.0],
                [146.01 + offset, -35.99],
                [146.0 + offset, -35.99],
                [146.0 + offset, -36.0],
            ]]
        }
    })
}

#[test]
fn test_ingest_then_aggregate() {
    let collection = json!({
        "type": "FeatureCollection",
        "features": [
            feature(1, "Bob", "Alpha", 10.0, 0.0),
            feature(2, "Alice", "Alpha", 20.0, 0.1),
            feature(3, "Carol", "Beta", 5.0, 0.2),
            {
                // Rejetée : owner manquant
                "type": "Feature",
                "properties": {"id": 4, "name": "Bad", "project_name": "Beta", "area_acres": 1},
                "geometry": feature(4, "x", "x", 1.0, 0.3)["geometry"],
            },
        ]
    });

    let result = ingest(&collection, "batch_it").unwrap();
    assert_eq!(result.total, 4);
    assert_eq!(result.successful, 3);
    assert_eq!(result.failed, 1);

    let mut projects = recompute_project_stats(&result.records);
    assert_eq!(projects.len(), 2);

    // Ordre de première apparition : Alpha puis Beta
    assert_eq!(projects[0].project_name, "Alpha");
    assert_eq!(projects[0].total_records, 2);
    assert_eq!(projects[0].valid_records, 2);
    assert_eq!(projects[0].total_area_acres, 30.0);
    assert_eq!(projects[0].owners.len(), 2);
    assert!(projects[0].calculated_area_hectares > 0.0);

    assert_eq!(projects[1].project_name, "Beta");
    assert_eq!(projects[1].total_records, 1);

    // Les bounds d'Alpha couvrent ses deux paddocks
    let bounds = projects[0].bounds;
    assert_eq!(bounds.west, 146.0);
    assert!((bounds.east - 146.11).abs() < 1e-9);
    assert_eq!(bounds.south, -36.0);
    assert_eq!(bounds.north, -35.99);

    // Couleurs : Alpha palette[0], Beta palette[1], idempotent
    assign_colors(&mut projects);
    assert_eq!(projects[0].color, PALETTE[0]);
    assert_eq!(projects[1].color, PALETTE[1]);
    let before: Vec<_> = projects.iter().map(|p| p.color.clone()).collect();
    assign_colors(&mut projects);
    let after: Vec<_> = projects.iter().map(|p| p.color.clone()).collect();
    assert_eq!(before, after);

    // Cohérence du groupement et du résumé global
    let grouped: usize = projects.iter().map(|p| p.total_records).sum();
    assert_eq!(grouped, result.records.len());

    let global = summarize(&result.records);
    assert_eq!(global.total_projects, 2);
    assert_eq!(global.total_records, 3);
    assert_eq!(global.total_area_acres, 35.0);
}

#[test]
fn test_deleting_project_records_drops_project() {
    let collection = json!({
        "type": "FeatureCollection",
        "features": [
            feature(1, "Bob", "Alpha", 10.0, 0.0),
            feature(2, "Alice", "Beta", 20.0, 0.1),
        ]
    });

    let result = ingest(&collection, "batch_it").unwrap();

    // Suppression en masse des records d'Alpha puis recalcul complet
    let remaining: Vec<_> = result
        .records
        .into_iter()
        .filter(|r| r.project_name != "Alpha")
        .collect();

    let projects = recompute_project_stats(&remaining);
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0].project_name, "Beta");
}

#[test]
fn test_records_roundtrip_through_json() {
    let collection = json!({
        "type": "FeatureCollection",
        "features": [feature(1, "Bob", "Alpha", 10.0, 0.0)]
    });

    let result = ingest(&collection, "batch_it").unwrap();
    let json = serde_json::to_string(&result.records).unwrap();
    let restored: Vec<paddock_geojson::Paddock> = serde_json::from_str(&json).unwrap();

    let projects = recompute_project_stats(&restored);
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0].total_area_acres, 10.0);
}
