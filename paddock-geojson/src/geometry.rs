//! Validation et calculs géométriques sur les polygones WGS84
//!
//! Toutes les fonctions de calcul sont best-effort : une géométrie
//! dégénérée produit 0 ou `None`, jamais une erreur.

use geo::{ChamberlainDuquetteArea, Coord, LineString, Point, Polygon};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

/// Boîte englobante lat/lon alignée sur les axes.
///
/// La valeur par défaut est inversée (`north=-90, south=90, east=-180,
/// west=180`) : les folds min/max partent des extrêmes opposés, une
/// collection vide reste donc une boîte vide plutôt qu'un crash.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            north: -90.0,
            south: 90.0,
            east: -180.0,
            west: 180.0,
        }
    }
}

/// Valide un polygone GeoJSON brut.
///
/// Règles : `type == "Polygon"`, `coordinates` tableau, ring extérieur
/// d'au moins 4 positions et fermé (première == dernière), chaque position
/// de chaque ring est une paire de nombres finis avec longitude ∈ [-180, 180]
/// et latitude ∈ [-90, 90].
pub fn validate_geometry(geometry: &Value) -> bool {
    if geometry.get("type").and_then(Value::as_str) != Some("Polygon") {
        return false;
    }

    let Some(rings) = geometry.get("coordinates").and_then(Value::as_array) else {
        return false;
    };

    let Some(outer) = rings.first().and_then(Value::as_array) else {
        return false;
    };

    if outer.len() < 4 {
        return false;
    }

    for ring in rings {
        let Some(positions) = ring.as_array() else {
            return false;
        };
        if !positions.iter().all(valid_position) {
            return false;
        }
    }

    // Fermeture du ring extérieur (égalité de coordonnées stricte)
    positions_equal(&outer[0], &outer[outer.len() - 1])
}

/// Une position valide : exactement 2 nombres finis, dans les bornes WGS84
fn valid_position(position: &Value) -> bool {
    let Some(pair) = position.as_array() else {
        return false;
    };
    if pair.len() != 2 {
        return false;
    }

    let (Some(lon), Some(lat)) = (pair[0].as_f64(), pair[1].as_f64()) else {
        return false;
    };

    lon.is_finite() && lat.is_finite() && (-180.0..=180.0).contains(&lon) && (-90.0..=90.0).contains(&lat)
}

fn positions_equal(a: &Value, b: &Value) -> bool {
    let (Some(a), Some(b)) = (a.as_array(), b.as_array()) else {
        return false;
    };
    a.len() == b.len()
        && a.iter()
            .zip(b.iter())
            .all(|(x, y)| x.as_f64() == y.as_f64() && x.as_f64().is_some())
}

/// Calcule la surface d'un polygone en hectares.
///
/// Excès sphérique (algorithme Chamberlain–Duquette, non signé) sur les
/// sommets des rings, en m² puis divisé par 10 000. Retourne 0.0 pour une
/// géométrie invalide ou dégénérée : la surface calculée est une quantité
/// dérivée, jamais un chemin d'échec.
pub fn compute_area(geometry: &Value) -> f64 {
    if !validate_geometry(geometry) {
        return 0.0;
    }

    let Some(polygon) = polygon_from_value(geometry) else {
        return 0.0;
    };

    polygon.chamberlain_duquette_unsigned_area() / 10_000.0
}

/// Calcule le centroïde approché d'un polygone GeoJSON brut.
///
/// Moyenne arithmétique non pondérée des positions du ring extérieur, y
/// compris le sommet de fermeture dupliqué. Ce n'est PAS un centroïde
/// pondéré par la surface : approximation connue, héritée du système
/// source, que les consommateurs avals attendent telle quelle.
pub fn compute_centroid(geometry: &Value) -> Option<Point<f64>> {
    let outer = geometry
        .get("coordinates")?
        .as_array()?
        .first()?
        .as_array()?;

    let mut count = 0usize;
    let mut sum_lon = 0.0;
    let mut sum_lat = 0.0;

    for position in outer {
        let pair = position.as_array()?;
        if pair.len() < 2 {
            return None;
        }
        sum_lon += pair[0].as_f64()?;
        sum_lat += pair[1].as_f64()?;
        count += 1;
    }

    if count == 0 {
        return None;
    }

    Some(Point::new(sum_lon / count as f64, sum_lat / count as f64))
}

/// Calcule la boîte englobante d'un ensemble de polygones.
///
/// Folds min/max sur chaque sommet des rings extérieurs, amorcés aux
/// extrêmes opposés (voir [`Bounds::default`]).
pub fn compute_bounds<'a, I>(polygons: I) -> Bounds
where
    I: IntoIterator<Item = &'a Polygon<f64>>,
{
    let mut bounds = Bounds::default();

    for polygon in polygons {
        for coord in polygon.exterior().coords() {
            bounds.north = bounds.north.max(coord.y);
            bounds.south = bounds.south.min(coord.y);
            bounds.east = bounds.east.max(coord.x);
            bounds.west = bounds.west.min(coord.x);
        }
    }

    bounds
}

/// Ferme un ring non fermé en dupliquant la première position.
///
/// Les géométries validées sont déjà fermées ; ce cas ne se produit que
/// sur des entrées réparées, d'où le log.
pub fn close_ring(ring: &mut Vec<Vec<f64>>) {
    if ring.len() < 2 {
        return;
    }

    let first = ring[0].clone();
    let last = &ring[ring.len() - 1];

    if first.len() >= 2 && last.len() >= 2 && (first[0] != last[0] || first[1] != last[1]) {
        let gap = ((first[0] - last[0]).powi(2) + (first[1] - last[1]).powi(2)).sqrt();
        warn!(points = ring.len(), gap_degrees = gap, "Auto-closing unclosed ring");
        ring.push(first);
    }
}

/// Construit un `geo::Polygon` depuis un polygone GeoJSON brut.
///
/// Extraction pure, sans validation : les positions malformées sont
/// ignorées. Retourne `None` si `coordinates` n'est pas un tableau de rings
/// ou s'il est vide.
pub fn polygon_from_value(geometry: &Value) -> Option<Polygon<f64>> {
    let rings: Vec<Vec<Vec<f64>>> =
        serde_json::from_value(geometry.get("coordinates")?.clone()).ok()?;

    let mut lines = rings.iter().map(|ring| {
        LineString::new(
            ring.iter()
                .filter(|position| position.len() >= 2)
                .map(|position| Coord {
                    x: position[0],
                    y: position[1],
                })
                .collect(),
        )
    });

    let exterior = lines.next()?;
    Some(Polygon::new(exterior, lines.collect()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn square(size: f64) -> Value {
        json!({
            "type": "Polygon",
            "coordinates": [[
                [0.0, 0.0],
                [size, 0.0],
                [size, size],
                [0.0, size],
                [0.0, 0.0],
            ]]
        })
    }

    #[test]
    fn test_validate_closed_square() {
        assert!(validate_geometry(&square(1.0)));
    }

    #[test]
    fn test_validate_rejects_unclosed_ring() {
        let geom = json!({
            "type": "Polygon",
            "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]]
        });
        assert!(!validate_geometry(&geom));
    }

    #[test]
    fn test_validate_rejects_short_ring() {
        let geom = json!({
            "type": "Polygon",
            "coordinates": [[[0.0, 0.0], [1.0, 0.0], [0.0, 0.0]]]
        });
        assert!(!validate_geometry(&geom));
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let geom = json!({
            "type": "Polygon",
            "coordinates": [[[181.0, 0.0], [1.0, 0.0], [1.0, 1.0], [181.0, 0.0]]]
        });
        assert!(!validate_geometry(&geom));
        let geom = json!({
            "type": "Polygon",
            "coordinates": [[[0.0, 91.0], [1.0, 0.0], [1.0, 1.0], [0.0, 91.0]]]
        });
        assert!(!validate_geometry(&geom));
    }

    #[test]
    fn test_validate_rejects_bad_positions() {
        // 3 éléments (altitude)
        let geom = json!({
            "type": "Polygon",
            "coordinates": [[[0.0, 0.0, 5.0], [1.0, 0.0, 5.0], [1.0, 1.0, 5.0], [0.0, 0.0, 5.0]]]
        });
        assert!(!validate_geometry(&geom));
        // Non numérique
        let geom = json!({
            "type": "Polygon",
            "coordinates": [[["a", 0.0], [1.0, 0.0], [1.0, 1.0], ["a", 0.0]]]
        });
        assert!(!validate_geometry(&geom));
    }

    #[test]
    fn test_validate_rejects_non_polygon() {
        assert!(!validate_geometry(&json!({"type": "Point", "coordinates": [1.0, 2.0]})));
        assert!(!validate_geometry(&json!({"type": "Polygon", "coordinates": {}})));
        assert!(!validate_geometry(&json!(null)));
    }

    #[test]
    fn test_compute_area_equator_square() {
        // Carré de 0.01° à l'équateur : ~1113 m de côté, ~123.6 ha
        let area = compute_area(&square(0.01));
        assert!((area / 123.65 - 1.0).abs() < 0.02, "area = {area}");
    }

    #[test]
    fn test_compute_area_invalid_is_zero() {
        assert_eq!(compute_area(&json!(null)), 0.0);
        assert_eq!(
            compute_area(&json!({"type": "Polygon", "coordinates": []})),
            0.0
        );
    }

    #[test]
    fn test_compute_area_degenerate_is_zero() {
        // Ring fermé de surface nulle (aller-retour sur un segment)
        let geom = json!({
            "type": "Polygon",
            "coordinates": [[[0.0, 0.0], [1.0, 0.0], [0.5, 0.0], [0.0, 0.0]]]
        });
        let area = compute_area(&geom);
        assert!(area.abs() < 1e-6);
        assert!(area >= 0.0);
    }

    #[test]
    fn test_compute_centroid_vertex_mean() {
        // Moyenne sur les 5 positions, fermeture incluse
        let centroid = compute_centroid(&square(0.01)).unwrap();
        assert!((centroid.x() - 0.004).abs() < 1e-12);
        assert!((centroid.y() - 0.004).abs() < 1e-12);
    }

    #[test]
    fn test_compute_centroid_empty_is_none() {
        assert!(compute_centroid(&json!({"type": "Polygon", "coordinates": []})).is_none());
        assert!(compute_centroid(&json!({"type": "Polygon", "coordinates": [[]]})).is_none());
        assert!(compute_centroid(&json!(null)).is_none());
    }

    #[test]
    fn test_compute_bounds() {
        let a = polygon_from_value(&square(1.0)).unwrap();
        let b = polygon_from_value(&json!({
            "type": "Polygon",
            "coordinates": [[[-3.0, -2.0], [2.0, -2.0], [2.0, 4.0], [-3.0, -2.0]]]
        }))
        .unwrap();

        let bounds = compute_bounds([&a, &b]);
        assert_eq!(bounds.north, 4.0);
        assert_eq!(bounds.south, -2.0);
        assert_eq!(bounds.east, 2.0);
        assert_eq!(bounds.west, -3.0);
    }

    #[test]
    fn test_compute_bounds_empty_is_inverted() {
        let bounds = compute_bounds(std::iter::empty::<&Polygon<f64>>());
        assert_eq!(bounds, Bounds::default());
        assert!(bounds.north < bounds.south);
        assert!(bounds.east < bounds.west);
    }

    #[test]
    fn test_close_ring() {
        let mut ring = vec![vec![0.0, 0.0], vec![1.0, 0.0], vec![1.0, 1.0]];
        close_ring(&mut ring);
        assert_eq!(ring.len(), 4);
        assert_eq!(ring[0], ring[3]);

        // Déjà fermé : inchangé
        let mut closed = ring.clone();
        close_ring(&mut closed);
        assert_eq!(closed.len(), 4);
    }
}
