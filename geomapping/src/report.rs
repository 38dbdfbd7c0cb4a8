//! Rapport d'intersections
//!
//! Structure du fichier JSON produit :
//!
//! ```json
//! {
//!   "metadata": { "timestamp": "...", "args": {...}, "target_crs": "EPSG:27700", ... },
//!   "properties": [[{...}, ...], [{...}, ...]],
//!   "areas": [[100.0, ...], [100.0, ...]],
//!   "intersections": [[0, 0, 25.0], ...]
//! }
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Serialize;

use geomapping_core::{IntersectionRecord, IntersectionStats, OverlayResult, Properties};

use crate::loader::LoadedCollection;

/// Arguments de l'invocation, reproduits dans le rapport
#[derive(Debug, Clone, Serialize)]
pub struct RunArgs {
    pub filename1: PathBuf,
    pub filename2: PathBuf,
    pub output: PathBuf,
    pub crs: String,
    pub crs1: Option<String>,
    pub crs2: Option<String>,
    pub catalog: Option<String>,
}

/// Provenance d'une collection d'entrée
#[derive(Debug, Clone, Serialize)]
pub struct InputMetadata {
    pub path: PathBuf,
    /// Checksum blake3 (hex)
    pub checksum: String,
    /// CRS source effectivement utilisé
    pub crs: String,
    pub features: usize,
    /// Géométries réparées par buffer nul
    pub repaired: usize,
}

/// Métadonnées du rapport
#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    /// Horodatage RFC 3339
    pub timestamp: String,
    pub args: RunArgs,
    pub target_crs: String,
    pub inputs: [InputMetadata; 2],
    pub stats: IntersectionStats,
    pub duration_secs: f64,
}

/// Rapport complet
#[derive(Debug, Clone, Serialize)]
pub struct IntersectionReport {
    pub metadata: ReportMetadata,

    /// Propriétés des features, par collection
    pub properties: [Vec<Properties>; 2],

    /// Aire de chaque forme dans le CRS cible, par collection
    pub areas: [Vec<f64>; 2],

    /// Triplets `[index première collection, index seconde collection, aire]`
    pub intersections: Vec<IntersectionRecord>,
}

impl IntersectionReport {
    /// Assemble le rapport à partir des entrées et du résultat
    pub fn new(
        args: RunArgs,
        inputs: [&LoadedCollection; 2],
        result: OverlayResult,
        duration: Duration,
    ) -> Self {
        let [first, second] = inputs;
        let [first_crs, second_crs] = result.source_crs;

        let input = |loaded: &LoadedCollection, crs: String, repaired: usize| InputMetadata {
            path: loaded.path.clone(),
            checksum: loaded.checksum.clone(),
            crs,
            features: loaded.collection.len(),
            repaired,
        };

        let properties = |loaded: &LoadedCollection| -> Vec<Properties> {
            loaded
                .collection
                .features
                .iter()
                .map(|f| f.properties.clone())
                .collect()
        };

        Self {
            metadata: ReportMetadata {
                timestamp: chrono::Local::now().to_rfc3339(),
                args,
                target_crs: result.target_crs,
                inputs: [
                    input(first, first_crs, result.repaired[0]),
                    input(second, second_crs, result.repaired[1]),
                ],
                stats: result.stats,
                duration_secs: duration.as_secs_f64(),
            },
            properties: [properties(first), properties(second)],
            areas: result.areas,
            intersections: result.records,
        }
    }

    /// Affiche le rapport sur la console
    pub fn display(&self) {
        let meta = &self.metadata;

        println!("\n{}", "=".repeat(60));
        println!("INTERSECTION REPORT - {}", meta.target_crs);
        println!("{}", "=".repeat(60));

        println!("\nDuration: {:.2}s", meta.duration_secs);

        println!("\n--- INPUTS ---");
        for input in &meta.inputs {
            println!(
                "  {} ({}): {} features, {} repaired",
                input.path.display(),
                input.crs,
                input.features,
                input.repaired
            );
        }

        println!("\n--- SUMMARY ---");
        println!(
            "Reference: {} shapes, query: {} shapes{}",
            meta.stats.reference_len,
            meta.stats.query_len,
            if meta.stats.swapped { " (swapped)" } else { "" }
        );
        println!(
            "Candidates: {}, intersections: {} of {} possible ({:.2}%)",
            meta.stats.candidates,
            meta.stats.intersecting,
            meta.stats.possible,
            meta.stats.percentage()
        );
        println!("Total overlap area: {:.2}", self.total_area());

        if !self.intersections.is_empty() {
            println!("\n--- LARGEST OVERLAPS ---");
            let mut largest: Vec<&IntersectionRecord> = self.intersections.iter().collect();
            largest.sort_by(|a, b| b.area.total_cmp(&a.area));
            for r in largest.iter().take(10) {
                println!("  [{} x {}] {:.2}", r.reference_index, r.query_index, r.area);
            }
            if largest.len() > 10 {
                println!("  ... and {} more", largest.len() - 10);
            }
        }

        println!("\n{}", "=".repeat(60));
    }

    /// Somme des aires d'intersection
    pub fn total_area(&self) -> f64 {
        self.intersections.iter().map(|r| r.area).sum()
    }

    /// Sauvegarde le rapport en JSON, en créant le répertoire parent si besoin
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .context(format!("Failed to create directory: {}", parent.display()))?;
        }

        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).context(format!("Failed to write report: {}", path.display()))?;
        Ok(())
    }

    /// Affichage compact pour le résumé
    pub fn summary(&self) -> String {
        format!(
            "{}: {} of {} possible intersections, total area {:.2}",
            self.metadata.target_crs,
            self.metadata.stats.intersecting,
            self.metadata.stats.possible,
            self.total_area()
        )
    }
}
