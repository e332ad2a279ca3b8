//! Validation structurelle d'un payload GeoJSON (règles RFC 7946)

use serde_json::Value;

use crate::IngestError;

/// Nombre maximum de features par batch.
///
/// Borne dure de protection des ressources (et de latence pire-cas),
/// non négociable par appel.
pub const MAX_BATCH_FEATURES: usize = 10_000;

/// Valide la structure d'un payload et retourne ses features.
///
/// Une `"Feature"` seule est enveloppée en collection à un élément pour un
/// traitement aval uniforme. Les features individuelles ne sont pas encore
/// inspectées ici.
pub fn normalize_collection(raw: &Value) -> Result<Vec<&Value>, IngestError> {
    let object = raw.as_object().ok_or(IngestError::NotAnObject)?;

    match object.get("type").and_then(Value::as_str) {
        Some("Feature") => Ok(vec![raw]),
        Some("FeatureCollection") => {
            let features = object
                .get("features")
                .and_then(Value::as_array)
                .ok_or(IngestError::FeaturesNotArray)?;

            if features.is_empty() {
                return Err(IngestError::EmptyFeatures);
            }
            if features.len() > MAX_BATCH_FEATURES {
                return Err(IngestError::TooManyFeatures {
                    count: features.len(),
                    max: MAX_BATCH_FEATURES,
                });
            }

            Ok(features.iter().collect())
        }
        Some(other) => Err(IngestError::UnknownType(other.to_string())),
        None => Err(IngestError::UnknownType(
            object
                .get("type")
                .map(|value| value.to_string())
                .unwrap_or_else(|| "missing".to_string()),
        )),
    }
}
