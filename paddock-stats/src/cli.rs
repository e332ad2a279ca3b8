//! Définition et implémentation des commandes CLI
//!
//! - `ingest` : fichiers GeoJSON → records + rapport d'ingestion
//! - `stats`  : records JSON → statistiques par projet

use std::path::{Path, PathBuf};
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use clap::Subcommand;
use rayon::prelude::*;
use tracing::info;

use paddock_geojson::{BatchResult, Paddock};

use crate::aggregate::{assign_colors, recompute_project_stats, summarize, ProjectStats};
use crate::report::IngestReport;

#[derive(Subcommand)]
pub enum Commands {
    /// Ingest paddock GeoJSON files and produce a batch report
    Ingest {
        /// Path to a .geojson/.json file or a directory of them
        #[arg(short, long)]
        path: PathBuf,

        /// Upload batch identifier (default: generated batch_<epochMillis>)
        #[arg(long)]
        batch: Option<String>,

        /// Write the full ingest report as JSON
        #[arg(long)]
        report: Option<PathBuf>,

        /// Write the accepted records as JSON
        #[arg(long)]
        records: Option<PathBuf>,

        /// Print per-project statistics after ingest
        #[arg(long)]
        stats: bool,

        /// Maximum number of files processed concurrently
        #[arg(long, alias = "threads")]
        jobs: Option<usize>,
    },

    /// Recompute project statistics from a records JSON file
    Stats {
        /// Path to a records JSON file (array of paddocks)
        #[arg(short, long)]
        path: PathBuf,

        /// Also print the global summary
        #[arg(long)]
        global: bool,
    },
}

/// Exécute la commande ingest
pub fn cmd_ingest(
    path: &Path,
    batch: Option<String>,
    report_path: Option<&Path>,
    records_path: Option<&Path>,
    stats: bool,
    jobs: Option<usize>,
) -> Result<()> {
    let files = collect_geojson_files(path)?;
    if files.is_empty() {
        anyhow::bail!(
            "No GeoJSON files (.geojson/.json) found in {}",
            path.display()
        );
    }

    // L'identifiant de batch est opaque pour le pipeline ; on en génère un
    // seulement quand l'appelant n'en fournit pas
    let batch = batch.unwrap_or_else(default_batch_id);

    let jobs = jobs.unwrap_or_else(|| {
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(4)
    });

    info!(
        path = %path.display(),
        files = files.len(),
        batch = %batch,
        jobs,
        "Starting ingest"
    );

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(jobs)
        .build()
        .context("Failed to build thread pool")?;

    let started = Instant::now();

    // Parallélisme au niveau des fichiers ; chaque batch reste séquentiel
    let results: Vec<(PathBuf, Result<BatchResult>)> = pool.install(|| {
        files
            .par_iter()
            .map(|file| (file.clone(), ingest_file(file, &batch)))
            .collect()
    });

    let mut report = IngestReport::new(&batch);
    let mut all_records: Vec<Paddock> = Vec::new();

    for (file, result) in results {
        let label = file.display().to_string();
        match result {
            Ok(batch_result) => {
                report.record_batch(&label, &batch_result);
                all_records.extend(batch_result.records);
            }
            Err(error) => report.record_file_failure(&label, &format!("{error:#}")),
        }
    }

    report.set_duration(started.elapsed());
    report.finalize();
    report.display();
    info!("{}", report.summary());

    if let Some(path) = report_path {
        report
            .save_to_file(path)
            .context(format!("Failed to write report: {}", path.display()))?;
        info!(path = %path.display(), "Report saved");
    }

    if let Some(path) = records_path {
        let json = serde_json::to_string_pretty(&all_records)?;
        std::fs::write(path, json)
            .context(format!("Failed to write records: {}", path.display()))?;
        info!(path = %path.display(), records = all_records.len(), "Records saved");
    }

    if stats {
        let mut projects = recompute_project_stats(&all_records);
        assign_colors(&mut projects);
        print_project_stats(&projects);
    }

    Ok(())
}

/// Exécute la commande stats
pub fn cmd_stats(path: &Path, global: bool) -> Result<()> {
    let content = std::fs::read_to_string(path)
        .context(format!("Failed to read records file: {}", path.display()))?;
    let records: Vec<Paddock> =
        serde_json::from_str(&content).context("Failed to parse records JSON")?;

    info!(records = records.len(), "Recomputing project statistics");

    let mut projects = recompute_project_stats(&records);
    assign_colors(&mut projects);
    print_project_stats(&projects);

    if global {
        let summary = summarize(&records);
        println!("\n--- GLOBAL ---");
        println!("Projects: {}", summary.total_projects);
        println!(
            "Records: {} total, {} valid",
            summary.total_records, summary.valid_records
        );
        println!(
            "Area: {:.2} acres declared, {:.2} ha declared, {:.2} ha calculated",
            summary.total_area_acres,
            summary.total_area_hectares,
            summary.calculated_area_hectares
        );
    }

    Ok(())
}

fn print_project_stats(projects: &[ProjectStats]) {
    println!("\n--- PROJECTS ({}) ---", projects.len());
    for project in projects {
        println!(
            "  {} [{}]: {} records ({} valid), {:.2} acres, {:.2} ha declared, {:.2} ha calculated, {} owner(s)",
            project.project_name,
            project.color,
            project.total_records,
            project.valid_records,
            project.total_area_acres,
            project.total_area_hectares,
            project.calculated_area_hectares,
            project.owners.len()
        );
        println!(
            "      bounds: N {:.5} / S {:.5} / E {:.5} / W {:.5}",
            project.bounds.north, project.bounds.south, project.bounds.east, project.bounds.west
        );
    }
}

fn ingest_file(path: &Path, batch: &str) -> Result<BatchResult> {
    let bytes =
        std::fs::read(path).context(format!("Failed to read file: {}", path.display()))?;
    let result = paddock_geojson::ingest_bytes(&bytes, batch)?;
    Ok(result)
}

fn default_batch_id() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    format!("batch_{millis}")
}

/// Collecte les fichiers GeoJSON depuis un fichier ou un répertoire
fn collect_geojson_files(path: &Path) -> Result<Vec<PathBuf>> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }

    if !path.is_dir() {
        anyhow::bail!("Path does not exist: {}", path.display());
    }

    let mut files: Vec<PathBuf> = std::fs::read_dir(path)
        .context(format!("Failed to read directory: {}", path.display()))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|p| {
            p.extension()
                .map_or(false, |ext| ext == "geojson" || ext == "json")
        })
        .collect();

    // Ordre déterministe pour les rapports
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_batch_id_format() {
        let id = default_batch_id();
        assert!(id.starts_with("batch_"));
        assert!(id["batch_".len()..].chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_collect_single_file() {
        let dir = std::env::temp_dir().join("paddock_cli_test_single");
        std::fs::create_dir_all(&dir).unwrap();
        let file = dir.join("one.geojson");
        std::fs::write(&file, "{}").unwrap();

        let files = collect_geojson_files(&file).unwrap();
        assert_eq!(files, vec![file.clone()]);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_collect_directory_sorted_and_filtered() {
        let dir = std::env::temp_dir().join("paddock_cli_test_dir");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("b.geojson"), "{}").unwrap();
        std::fs::write(dir.join("a.json"), "{}").unwrap();
        std::fs::write(dir.join("notes.txt"), "x").unwrap();

        let files = collect_geojson_files(&dir).unwrap();
        assert_eq!(files.len(), 2);
        assert!(files[0].ends_with("a.json"));
        assert!(files[1].ends_with("b.geojson"));

        std::fs::remove_dir_all(&dir).ok();
    }
}
