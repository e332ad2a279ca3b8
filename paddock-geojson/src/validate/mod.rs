//! Validation du GeoJSON entrant
//!
//! Deux niveaux : structurel (fatal pour le batch, [`structural`]) et par
//! feature (non fatal, [`feature`]). Les plages de coordonnées et la
//! fermeture des rings relèvent du moteur géométrique, pas d'ici.

pub mod feature;
pub mod structural;
