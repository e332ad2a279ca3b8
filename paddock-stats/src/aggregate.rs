//! Agrégation des paddocks par projet
//!
//! Les statistiques sont recalculées en entier depuis l'ensemble de records
//! courant, jamais patchées incrémentalement : pas de dérive possible entre
//! records et rollups. Un projet sans record n'existe pas.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use paddock_geojson::{geometry, Bounds, Paddock};

/// Palette fixe de 12 couleurs assignées aux projets, en cycle
pub const PALETTE: [&str; 12] = [
    "#3b82f6", "#ef4444", "#10b981", "#f59e0b", "#8b5cf6", "#ec4899", "#14b8a6", "#f97316",
    "#6366f1", "#84cc16", "#06b6d4", "#a855f7",
];

/// Couleur par défaut de la carte, considérée comme "non personnalisée"
pub const DEFAULT_COLOR: &str = "#3388ff";

/// Statistiques agrégées d'un projet
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectStats {
    /// Nom du projet (clé de groupement, sensible à la casse)
    pub project_name: String,

    /// Nombre total de records du projet
    pub total_records: usize,

    /// Nombre de records valides (`is_valid`)
    pub valid_records: usize,

    /// Somme des surfaces déclarées en acres
    pub total_area_acres: f64,

    /// Somme des surfaces en hectares (déclarées ou converties)
    pub total_area_hectares: f64,

    /// Somme des surfaces dérivées de la géométrie
    pub calculated_area_hectares: f64,

    /// Propriétaires distincts, triés
    pub owners: BTreeSet<String>,

    /// Boîte englobante des géométries du projet
    pub bounds: Bounds,

    /// Couleur d'affichage (vide tant que non assignée)
    pub color: String,
}

/// Résumé global, agrégé depuis les stats par projet.
///
/// Dérivé des rollups (et non recalculé depuis les records bruts) pour
/// garantir la cohérence entre "somme des totaux par projet" et "total
/// global".
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalStats {
    pub total_projects: usize,
    pub total_records: usize,
    pub valid_records: usize,
    pub total_area_acres: f64,
    pub total_area_hectares: f64,
    pub calculated_area_hectares: f64,
}

/// Recalcule les statistiques de tous les projets depuis les records.
///
/// Groupement par égalité stricte de `project_name`, projets retournés dans
/// l'ordre de première apparition (l'ordre de création côté store). Les
/// couleurs repartent vides : voir [`assign_colors`].
pub fn recompute_project_stats(records: &[Paddock]) -> Vec<ProjectStats> {
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<Vec<&Paddock>> = Vec::new();

    for record in records {
        match positions.get(record.project_name.as_str()) {
            Some(&index) => groups[index].push(record),
            None => {
                positions.insert(&record.project_name, groups.len());
                groups.push(vec![record]);
            }
        }
    }

    groups
        .into_iter()
        .map(|members| {
            let polygons: Vec<_> = members.iter().filter_map(|r| r.polygon()).collect();

            ProjectStats {
                project_name: members[0].project_name.clone(),
                total_records: members.len(),
                valid_records: members.iter().filter(|r| r.is_valid).count(),
                total_area_acres: members.iter().map(|r| r.area_acres).sum(),
                total_area_hectares: members.iter().map(|r| r.area_hectares).sum(),
                calculated_area_hectares: members
                    .iter()
                    .map(|r| r.calculated_area_hectares)
                    .sum(),
                owners: members.iter().map(|r| r.owner.clone()).collect(),
                bounds: geometry::compute_bounds(&polygons),
                color: String::new(),
            }
        })
        .collect()
}

/// Assigne les couleurs de palette aux projets non personnalisés.
///
/// Fonction pure de la liste ordonnée : le projet en position `i` dont la
/// couleur est vide ou encore la couleur par défaut reçoit `PALETTE[i % 12]`.
/// Une couleur personnalisée n'est jamais écrasée, et la réexécution sans
/// nouveau projet est un no-op (idempotence).
pub fn assign_colors(projects: &mut [ProjectStats]) {
    for (index, project) in projects.iter_mut().enumerate() {
        if project.color.is_empty() || project.color == DEFAULT_COLOR {
            project.color = PALETTE[index % PALETTE.len()].to_string();
        }
    }
}

/// Agrège le résumé global depuis les stats par projet
pub fn summarize(records: &[Paddock]) -> GlobalStats {
    let projects = recompute_project_stats(records);

    let mut global = GlobalStats {
        total_projects: projects.len(),
        total_records: 0,
        valid_records: 0,
        total_area_acres: 0.0,
        total_area_hectares: 0.0,
        calculated_area_hectares: 0.0,
    };

    for project in &projects {
        global.total_records += project.total_records;
        global.valid_records += project.valid_records;
        global.total_area_acres += project.total_area_acres;
        global.total_area_hectares += project.total_area_hectares;
        global.calculated_area_hectares += project.calculated_area_hectares;
    }

    global
}
