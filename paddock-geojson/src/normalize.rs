//! Normalisation d'une feature validée vers un [`Paddock`] canonique
//!
//! Les propriétés d'entrée sont nommées de façon lâche (`id` ou `paddockId`,
//! `name` ou `paddock_name`...). Plutôt que des conditionnels éparpillés,
//! chaque champ canonique déclare sa liste ordonnée de clés candidates,
//! consultée par un unique helper [`lookup`].

use std::time::{SystemTime, UNIX_EPOCH};

use geojson::Geometry;
use serde_json::{Map, Value};

use crate::geometry;
use crate::types::Paddock;

/// Clés candidates pour l'identifiant, par ordre de précédence
pub const ID_KEYS: &[&str] = &["id", "paddockId"];

/// Clés candidates pour le nom d'affichage
pub const NAME_KEYS: &[&str] = &["name", "paddock_name"];

/// Clés candidates pour le propriétaire
pub const OWNER_KEYS: &[&str] = &["owner"];

/// Clés candidates pour le projet de rattachement
pub const PROJECT_KEYS: &[&str] = &["Project__Name", "project_name"];

/// Clés candidates pour la surface déclarée en acres
pub const ACRES_KEYS: &[&str] = &["area_acres"];

/// Clés candidates pour une surface en hectares fournie explicitement
pub const HECTARES_KEYS: &[&str] = &["area_hectares", "areaHectares"];

/// Facteur de conversion acres → hectares
pub const ACRES_TO_HECTARES: f64 = 0.404686;

const DEFAULT_NAME: &str = "Unnamed Paddock";
const DEFAULT_OWNER: &str = "Unknown Owner";
const DEFAULT_PROJECT: &str = "Unknown Project";

/// Retourne la première valeur présente parmi les clés candidates.
///
/// Une valeur est présente si elle est non nulle et, pour une chaîne,
/// non vide (le système source utilisait la truthiness JS ; un 0 numérique
/// est accepté comme identifiant).
pub fn lookup<'a>(properties: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| properties.get(*key))
        .find(|value| has_value(value))
}

fn has_value(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

/// Convertit une valeur en chaîne d'identifiant/nom (String ou Number)
fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Parse une surface déclarée (nombre JSON ou chaîne).
///
/// `None` si non parseable ou non finie ; les valeurs négatives sont
/// ramenées à 0 (les surfaces dérivées sont toujours ≥ 0).
fn parse_area(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => fast_float::parse::<f64, _>(s.trim()).ok(),
        _ => None,
    };

    parsed.filter(|a| a.is_finite()).map(|a| a.max(0.0))
}

fn epoch_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0)
}

/// Normalise une feature en [`Paddock`] canonique.
///
/// Jamais faillible : les champs absents reçoivent leur valeur par défaut,
/// les surfaces non parseables valent 0, et le ring extérieur de la
/// géométrie copiée est fermé si nécessaire. `index` sert à synthétiser un
/// identifiant quand ni `id` ni `paddockId` n'est fourni.
pub fn normalize(feature: &Value, index: usize, upload_batch: &str) -> Paddock {
    let empty = Map::new();
    let properties = feature
        .get("properties")
        .and_then(Value::as_object)
        .unwrap_or(&empty);

    let id = lookup(properties, ID_KEYS)
        .and_then(value_to_string)
        .unwrap_or_else(|| format!("paddock_{}_{}", index, epoch_millis()));

    let name = lookup(properties, NAME_KEYS)
        .and_then(value_to_string)
        .unwrap_or_else(|| DEFAULT_NAME.to_string());

    let owner = lookup(properties, OWNER_KEYS)
        .and_then(value_to_string)
        .unwrap_or_else(|| DEFAULT_OWNER.to_string());

    let project_name = lookup(properties, PROJECT_KEYS)
        .and_then(value_to_string)
        .unwrap_or_else(|| DEFAULT_PROJECT.to_string());

    let area_acres = lookup(properties, ACRES_KEYS)
        .and_then(parse_area)
        .unwrap_or(0.0);

    // Une surface en hectares fournie explicitement n'est jamais écrasée ;
    // la conversion ne comble que les absences.
    let area_hectares = lookup(properties, HECTARES_KEYS)
        .and_then(parse_area)
        .unwrap_or(area_acres * ACRES_TO_HECTARES);

    let geometry_value = feature.get("geometry").cloned().unwrap_or(Value::Null);

    let calculated_area_hectares = geometry::compute_area(&geometry_value);
    let is_valid = geometry::validate_geometry(&geometry_value);

    let centroid = geometry::compute_centroid(&geometry_value)
        .map(|point| Geometry::new(geojson::Value::Point(vec![point.x(), point.y()])));

    // Copie de la géométrie d'entrée, ring extérieur fermé
    let mut rings: Vec<Vec<Vec<f64>>> = geometry_value
        .get("coordinates")
        .and_then(|coordinates| serde_json::from_value(coordinates.clone()).ok())
        .unwrap_or_default();
    if let Some(outer) = rings.first_mut() {
        geometry::close_ring(outer);
    }

    Paddock {
        id,
        name,
        owner,
        project_name,
        area_acres,
        area_hectares,
        calculated_area_hectares,
        centroid,
        geometry: Geometry::new(geojson::Value::Polygon(rings)),
        upload_batch: upload_batch.to_string(),
        is_valid,
        original_properties: properties.clone(),
    }
}
