//! Rapport d'ingestion avec graceful degradation
//!
//! Ce module collecte les résultats de batch par fichier et produit un
//! rapport affichable et sérialisable : compteurs, rejets par feature,
//! échecs structurels par fichier.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use serde::Serialize;

use paddock_geojson::BatchResult;

/// Statut global de l'ingestion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IngestStatus {
    /// Ingestion réussie sans rejet
    Success,
    /// Des records produits, mais des rejets ou des fichiers en échec
    PartialSuccess,
    /// Aucun record produit
    Failed,
}

/// Feature rejetée par la validation, avec son contexte
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectedFeature {
    /// Fichier source
    pub file: String,
    /// Index de la feature dans son batch
    pub feature_index: usize,
    /// Messages de validation
    pub messages: Vec<String>,
}

/// Fichier entier en échec (erreur structurelle ou I/O)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileFailure {
    pub file: String,
    pub message: String,
}

/// Rapport complet d'une ingestion
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestReport {
    /// Identifiant du batch d'upload
    pub upload_batch: String,
    /// Durée de l'ingestion
    pub duration_secs: f64,
    /// Statut global
    pub status: IngestStatus,

    // Compteurs globaux
    /// Nombre de fichiers traités
    pub files_processed: usize,
    /// Nombre de fichiers en échec
    pub files_failed: usize,
    /// Nombre de features en entrée
    pub features_total: usize,
    /// Nombre de records produits
    pub features_imported: usize,
    /// Nombre de features rejetées
    pub features_rejected: usize,

    /// Nombre de records par projet
    pub by_project: HashMap<String, usize>,

    /// Rejets par feature
    pub rejections: Vec<RejectedFeature>,
    /// Échecs par fichier
    pub failures: Vec<FileFailure>,
}

impl IngestReport {
    /// Crée un rapport vide pour un batch
    pub fn new(upload_batch: &str) -> Self {
        Self {
            upload_batch: upload_batch.to_string(),
            duration_secs: 0.0,
            status: IngestStatus::Success,
            files_processed: 0,
            files_failed: 0,
            features_total: 0,
            features_imported: 0,
            features_rejected: 0,
            by_project: HashMap::new(),
            rejections: Vec::new(),
            failures: Vec::new(),
        }
    }

    /// Enregistre le résultat d'un batch de fichier
    pub fn record_batch(&mut self, file: &str, batch: &BatchResult) {
        self.files_processed += 1;
        self.features_total += batch.total;
        self.features_imported += batch.successful;
        self.features_rejected += batch.failed;

        for record in &batch.records {
            *self.by_project.entry(record.project_name.clone()).or_default() += 1;
        }

        for error in &batch.errors {
            self.rejections.push(RejectedFeature {
                file: file.to_string(),
                feature_index: error.feature_index,
                messages: error.errors.clone(),
            });
        }
    }

    /// Enregistre un fichier en échec complet
    pub fn record_file_failure(&mut self, file: &str, message: &str) {
        self.files_processed += 1;
        self.files_failed += 1;
        self.failures.push(FileFailure {
            file: file.to_string(),
            message: message.to_string(),
        });
    }

    /// Définit la durée de l'ingestion
    pub fn set_duration(&mut self, duration: Duration) {
        self.duration_secs = duration.as_secs_f64();
    }

    /// Détermine le statut final depuis les compteurs
    pub fn finalize(&mut self) {
        let has_errors = !self.rejections.is_empty() || !self.failures.is_empty();
        let has_success = self.features_imported > 0;

        self.status = if has_errors && has_success {
            IngestStatus::PartialSuccess
        } else if has_errors {
            IngestStatus::Failed
        } else {
            IngestStatus::Success
        };
    }

    /// Affiche le rapport sur la console
    pub fn display(&self) {
        println!("\n{}", "=".repeat(60));
        println!("INGEST REPORT - Batch {}", self.upload_batch);
        println!("{}", "=".repeat(60));

        println!("\nStatus: {:?}", self.status);
        println!("Duration: {:.2}s", self.duration_secs);

        println!("\n--- SUMMARY ---");
        println!(
            "Files: {} processed, {} failed",
            self.files_processed, self.files_failed
        );
        println!(
            "Features: {} total, {} imported, {} rejected",
            self.features_total, self.features_imported, self.features_rejected
        );

        if !self.by_project.is_empty() {
            println!("\n--- BY PROJECT ---");
            let mut projects: Vec<_> = self.by_project.iter().collect();
            projects.sort_by_key(|(name, _)| name.as_str());
            for (name, count) in projects {
                println!("  {}: {} records", name, count);
            }
        }

        if !self.failures.is_empty() {
            println!("\n--- FILE FAILURES ({}) ---", self.failures.len());
            for failure in self.failures.iter().take(10) {
                println!("  [{}] {}", failure.file, failure.message);
            }
            if self.failures.len() > 10 {
                println!("  ... and {} more", self.failures.len() - 10);
            }
        }

        if !self.rejections.is_empty() {
            println!("\n--- REJECTED FEATURES ({}) ---", self.rejections.len());
            for rejection in self.rejections.iter().take(20) {
                println!(
                    "  [{}:{}] {}",
                    rejection.file,
                    rejection.feature_index,
                    rejection.messages.join("; ")
                );
            }
            if self.rejections.len() > 20 {
                println!("  ... and {} more", self.rejections.len() - 20);
            }
        }

        println!("\n{}", "=".repeat(60));
    }

    /// Sauvegarde le rapport en JSON
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Affichage compact pour les logs
    pub fn summary(&self) -> String {
        format!(
            "{}: {} imported, {} rejected, {} file(s) failed",
            self.upload_batch, self.features_imported, self.features_rejected, self.files_failed
        )
    }
}
