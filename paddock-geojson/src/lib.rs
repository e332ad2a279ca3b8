//! # paddock-geojson
//!
//! Pipeline de validation, normalisation et calcul de surface pour des
//! paddocks (parcelles) fournis en GeoJSON.
//!
//! ## Features
//!
//! - Validation structurelle Feature/FeatureCollection (règles RFC 7946)
//! - Validation par feature avec accumulation des erreurs (succès partiel)
//! - Surface sphérique (Chamberlain–Duquette) via les types `geo`
//! - Normalisation des propriétés lâches vers un record canonique
//!
//! ## Usage
//!
//! ```rust,ignore
//! use paddock_geojson::ingest_bytes;
//!
//! let result = ingest_bytes(&bytes, "batch_42")?;
//! println!("{}/{} features acceptées", result.successful, result.total);
//!
//! for error in &result.errors {
//!     println!("feature {}: {:?}", error.feature_index, error.errors);
//! }
//! ```

pub mod error;
pub mod geometry;
pub mod normalize;
pub mod types;
pub mod validate;

pub use error::IngestError;
pub use geometry::Bounds;
pub use types::{BatchResult, FeatureError, Paddock};
pub use validate::structural::MAX_BATCH_FEATURES;

use serde_json::Value;
use tracing::{debug, info};

/// Ingère un payload GeoJSON déjà parsé et retourne le résultat du batch.
///
/// Les erreurs structurelles (payload entier invalide, cap de features
/// dépassé) interrompent l'appel sans produire de record. Les erreurs par
/// feature n'interrompent rien : la feature fautive est ignorée, consignée
/// avec son index, et le traitement continue — le succès partiel est le cas
/// courant.
///
/// Les features sont traitées séquentiellement, dans l'ordre d'entrée.
/// Aucune ne dépend du résultat d'une autre ; le parallélisme éventuel est
/// laissé à l'appelant, au niveau des batches.
///
/// # Errors
///
/// Retourne [`IngestError`] pour toute violation structurelle (§ taxonomie
/// des erreurs dans [`error`]).
pub fn ingest(raw: &Value, upload_batch: &str) -> Result<BatchResult, IngestError> {
    let features = validate::structural::normalize_collection(raw)?;
    let total = features.len();

    let mut records = Vec::new();
    let mut errors = Vec::new();

    for (index, feature) in features.iter().enumerate() {
        let messages = validate::feature::check_feature(feature);

        if !messages.is_empty() {
            debug!(feature_index = index, count = messages.len(), "Feature rejected");
            errors.push(FeatureError {
                feature_index: index,
                errors: messages,
            });
            continue;
        }

        let geometry = feature.get("geometry").unwrap_or(&Value::Null);
        if !geometry::validate_geometry(geometry) {
            debug!(feature_index = index, "Invalid polygon geometry");
            errors.push(FeatureError {
                feature_index: index,
                errors: vec![
                    "Invalid polygon geometry: expected a closed ring of valid WGS84 positions"
                        .to_string(),
                ],
            });
            continue;
        }

        records.push(normalize::normalize(feature, index, upload_batch));
    }

    info!(
        batch = upload_batch,
        total,
        successful = records.len(),
        failed = errors.len(),
        "Batch ingested"
    );

    Ok(BatchResult {
        total,
        successful: records.len(),
        failed: errors.len(),
        errors,
        records,
    })
}

/// Parse des bytes JSON puis ingère le payload.
///
/// # Errors
///
/// `IngestError::InvalidJson` si les bytes ne sont pas du JSON, sinon les
/// mêmes erreurs que [`ingest`].
pub fn ingest_bytes(bytes: &[u8], upload_batch: &str) -> Result<BatchResult, IngestError> {
    let raw: Value = serde_json::from_slice(bytes)?;
    ingest(&raw, upload_batch)
}
