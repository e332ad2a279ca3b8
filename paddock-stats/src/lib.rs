//! # paddock-stats
//!
//! Agrégation de paddocks GeoJSON en statistiques par projet, avec rapport
//! d'ingestion et CLI.
//!
//! ## Features
//!
//! - Statistiques par projet recalculées en entier (pas de dérive)
//! - Assignation de couleurs idempotente depuis une palette fixe
//! - Rapport d'ingestion affichable et exportable en JSON
//!
//! ## Usage CLI
//!
//! ```bash
//! # Ingestion d'un fichier ou d'un répertoire
//! paddock-stats ingest --path ./paddocks.geojson --stats
//! paddock-stats ingest --path ./uploads/ --records ./records.json
//!
//! # Statistiques depuis des records sauvegardés
//! paddock-stats stats --path ./records.json --global
//! ```

pub mod aggregate;
pub mod cli;
pub mod report;

pub use aggregate::{GlobalStats, ProjectStats};
pub use report::{IngestReport, IngestStatus};
