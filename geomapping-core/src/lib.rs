//! # geomapping-core
//!
//! Recherche des zones de recouvrement entre deux collections de polygones.
//!
//! ## Étapes
//!
//! - Normalisation : chaque collection est reprojetée vers un CRS cible commun
//!   puis réparée si la reprojection a produit une géométrie invalide
//! - Index spatial : R*-tree (`rstar`) sur les boîtes englobantes de la plus
//!   grande collection
//! - Intersections : une requête par forme de l'autre collection, puis
//!   intersection booléenne exacte (`geo`) ; seules les aires > 0 sont gardées
//!
//! Aucune entrée/sortie ici : la lecture des fichiers et l'écriture du rapport
//! sont faites par l'application.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use geomapping_core::{overlay, CrsCatalog, OverlayOptions};
//!
//! let catalog = CrsCatalog::builtin();
//! let result = overlay(&catalog, &first, &second, &OverlayOptions::new("EPSG:27700"))?;
//!
//! for record in &result.records {
//!     println!("{} x {}: {:.2}", record.reference_index, record.query_index, record.area);
//! }
//! ```

pub mod crs;
pub mod engine;
pub mod error;
pub mod index;
pub mod normalize;
pub mod repair;
pub mod types;

pub use crs::{Crs, CrsCatalog, CrsDefinition};
pub use engine::{find_intersections, find_intersections_with, shape_areas, IntersectionSet, IntersectionStats};
pub use error::GeomappingError;
pub use index::{BoundingBox, RTreeIndex, SpatialIndex};
pub use normalize::normalize;
pub use types::{Collection, Feature, IntersectionRecord, NormalizedCollection, Properties};

use tracing::info;

/// Paramètres d'un calcul de recouvrement
#[derive(Debug, Clone)]
pub struct OverlayOptions {
    /// CRS dans lequel les aires sont calculées
    pub target_crs: String,

    /// CRS imposé pour la première collection (prioritaire sur ses métadonnées)
    pub first_crs: Option<String>,

    /// CRS imposé pour la seconde collection
    pub second_crs: Option<String>,
}

impl OverlayOptions {
    pub fn new(target_crs: impl Into<String>) -> Self {
        Self {
            target_crs: target_crs.into(),
            first_crs: None,
            second_crs: None,
        }
    }

    pub fn with_first_crs(mut self, crs: impl Into<String>) -> Self {
        self.first_crs = Some(crs.into());
        self
    }

    pub fn with_second_crs(mut self, crs: impl Into<String>) -> Self {
        self.second_crs = Some(crs.into());
        self
    }
}

/// Résultat d'un calcul de recouvrement
#[derive(Debug, Clone)]
pub struct OverlayResult {
    /// CRS cible résolu (ex: "EPSG:27700")
    pub target_crs: String,

    /// CRS source effectivement utilisé pour chaque collection
    pub source_crs: [String; 2],

    /// Nombre de géométries réparées par collection
    pub repaired: [usize; 2],

    /// Aire de chaque forme dans le CRS cible
    pub areas: [Vec<f64>; 2],

    /// Intersections d'aire non nulle, triées
    pub records: Vec<IntersectionRecord>,

    pub stats: IntersectionStats,
}

/// Calcule les recouvrements entre deux collections
///
/// Les deux collections sont normalisées en parallèle. Toute erreur est fatale.
pub fn overlay(
    catalog: &CrsCatalog,
    first: &Collection,
    second: &Collection,
    options: &OverlayOptions,
) -> Result<OverlayResult, GeomappingError> {
    let target = catalog.resolve(&options.target_crs)?;

    let (first_norm, second_norm) = rayon::join(
        || normalize(catalog, first, options.first_crs.as_deref(), &target),
        || normalize(catalog, second, options.second_crs.as_deref(), &target),
    );
    let first_norm = first_norm?;
    let second_norm = second_norm?;

    info!(
        target = %target,
        first = %first_norm.source_crs,
        second = %second_norm.source_crs,
        "Collections normalized"
    );

    let areas = [
        shape_areas(&first_norm.shapes),
        shape_areas(&second_norm.shapes),
    ];
    let set = find_intersections(&first_norm.shapes, &second_norm.shapes)?;

    Ok(OverlayResult {
        target_crs: target.identifier(),
        source_crs: [first_norm.source_crs, second_norm.source_crs],
        repaired: [first_norm.repaired, second_norm.repaired],
        areas,
        records: set.records,
        stats: set.stats,
    })
}
