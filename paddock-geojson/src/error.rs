//! Types d'erreurs pour le crate paddock-geojson

use thiserror::Error;

/// Erreurs structurelles, fatales pour le batch entier.
///
/// Une erreur de ce type interrompt l'ingestion avant tout traitement
/// par feature : aucun record partiel n'est produit.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Le payload n'est pas du JSON valide
    #[error("Invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// Le payload n'est pas un objet JSON (null, tableau, scalaire...)
    #[error("Input must be a JSON object (Feature or FeatureCollection)")]
    NotAnObject,

    /// Le champ `type` n'est ni "Feature" ni "FeatureCollection"
    #[error("Unknown GeoJSON type: {0} (expected \"Feature\" or \"FeatureCollection\")")]
    UnknownType(String),

    /// Le champ `features` n'est pas un tableau
    #[error("FeatureCollection \"features\" must be an array")]
    FeaturesNotArray,

    /// La collection ne contient aucune feature
    #[error("FeatureCollection contains no features")]
    EmptyFeatures,

    /// La collection dépasse la limite de features par batch
    #[error("Too many features: {count} (maximum {max} per batch)")]
    TooManyFeatures { count: usize, max: usize },
}
