//! Validation des champs d'une feature individuelle
//!
//! Le rejet d'une feature est un résultat attendu et fréquent : les checks
//! retournent une liste de messages, pas des exceptions. Tous les checks
//! s'exécutent, une feature peut donc cumuler plusieurs erreurs.

use serde_json::Value;

use crate::normalize::{lookup, ACRES_KEYS, ID_KEYS, NAME_KEYS, OWNER_KEYS, PROJECT_KEYS};

/// Vérifie les champs requis d'une feature.
///
/// Liste vide = normalisable. La présence seule de `area_acres` est exigée :
/// une valeur non parseable n'est pas un rejet, elle vaudra 0 à la
/// normalisation. Les plages de coordonnées et la fermeture du ring sont
/// vérifiées séparément par le moteur géométrique.
pub fn check_feature(feature: &Value) -> Vec<String> {
    let mut errors = Vec::new();

    if feature.get("type").and_then(Value::as_str) != Some("Feature") {
        errors.push("Feature type must be \"Feature\"".to_string());
    }

    match feature.get("properties").and_then(Value::as_object) {
        None => errors.push("Missing properties object".to_string()),
        Some(properties) => {
            if lookup(properties, ID_KEYS).is_none() {
                errors.push("Missing required field: id or paddockId".to_string());
            }
            if lookup(properties, NAME_KEYS).is_none() {
                errors.push("Missing required field: name or paddock_name".to_string());
            }
            if lookup(properties, OWNER_KEYS).is_none() {
                errors.push("Missing required field: owner".to_string());
            }
            if lookup(properties, PROJECT_KEYS).is_none() {
                errors.push("Missing required field: Project__Name or project_name".to_string());
            }
            if lookup(properties, ACRES_KEYS).is_none() {
                errors.push("Missing required field: area_acres".to_string());
            }
        }
    }

    match feature.get("geometry") {
        None | Some(Value::Null) => errors.push("Missing geometry".to_string()),
        Some(geometry) => {
            if geometry.get("type").and_then(Value::as_str) != Some("Polygon") {
                errors.push("Geometry type must be \"Polygon\"".to_string());
            }
            if !geometry.get("coordinates").is_some_and(Value::is_array) {
                errors.push("Geometry coordinates must be an array".to_string());
            }
        }
    }

    errors
}
