//! Types de données pour le crate paddock-geojson

use geo::{Coord, LineString, Polygon};
use geojson::Geometry;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Un paddock validé et normalisé, dérivé d'une Feature GeoJSON.
///
/// Les noms de champs sérialisés sont en camelCase pour rester compatibles
/// avec le store de documents et l'UI existants.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paddock {
    /// Identifiant dérivé de `id`/`paddockId`, ou synthétisé
    /// (`paddock_<index>_<epochMillis>`) quand absent
    pub id: String,

    /// Nom d'affichage (`name` ou `paddock_name`)
    pub name: String,

    /// Propriétaire déclaré
    pub owner: String,

    /// Projet de rattachement (`Project__Name` ou `project_name`)
    pub project_name: String,

    /// Surface déclarée en acres (0 si absente ou non parseable)
    pub area_acres: f64,

    /// Surface en hectares : valeur fournie, sinon `area_acres × 0.404686`
    pub area_hectares: f64,

    /// Surface en hectares dérivée de la géométrie (excès sphérique),
    /// indépendante de la surface déclarée. Toujours ≥ 0.
    pub calculated_area_hectares: f64,

    /// Moyenne arithmétique des sommets du ring extérieur (Point GeoJSON).
    /// Absent quand la géométrie n'a aucune coordonnée.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub centroid: Option<Geometry>,

    /// Polygone copié de l'entrée, ring extérieur toujours fermé
    pub geometry: Geometry,

    /// Identifiant opaque du batch d'ingestion, fourni par l'appelant
    pub upload_batch: String,

    /// True si la feature a passé la validation structurelle et géométrique
    pub is_valid: bool,

    /// Passthrough complet des propriétés d'entrée (forward compatibility)
    pub original_properties: Map<String, Value>,
}

impl Paddock {
    /// Convertit la géométrie stockée en `geo::Polygon` pour les calculs.
    ///
    /// Retourne `None` si la géométrie n'est pas un Polygon ou n'a aucun ring.
    pub fn polygon(&self) -> Option<Polygon<f64>> {
        let geojson::Value::Polygon(rings) = &self.geometry.value else {
            return None;
        };

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
}

/// Erreurs de validation d'une feature rejetée.
///
/// Jamais mutée après création : une entrée par feature rejetée,
/// triée par `feature_index` croissant dans le `BatchResult`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureError {
    /// Index de la feature dans le batch d'entrée
    pub feature_index: usize,

    /// Messages d'erreur au niveau des champs, dans l'ordre des checks
    pub errors: Vec<String>,
}

/// Résultat d'un appel d'ingestion.
///
/// Invariant : `successful + failed == total == nombre de features en entrée`.
/// Une feature est soit un `Paddock` complet, soit une entrée d'erreur,
/// jamais un record à moitié rempli.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResult {
    /// Nombre de features en entrée
    pub total: usize,

    /// Nombre de records produits
    pub successful: usize,

    /// Nombre de features rejetées
    pub failed: usize,

    /// Erreurs par feature, triées par index croissant
    pub errors: Vec<FeatureError>,

    /// Records produits, dans l'ordre d'entrée
    pub records: Vec<Paddock>,
}
