//! # geomapping
//!
//! Recouvrements entre deux fichiers de formes (GeoJSON) avec calcul des aires.
//!
//! ## Features
//!
//! - Reprojection vers un CRS cible commun (pure Rust, PROJ en option)
//! - Réparation des géométries invalides
//! - Recherche accélérée par R-tree
//! - Rapport JSON : propriétés, aires et intersections
//!
//! ## Usage CLI
//!
//! ```bash
//! # Recouvrements en British National Grid (défaut)
//! geomapping intersect parcels.geojson zones.geojson out/report.json
//!
//! # CRS cible et CRS source imposés
//! geomapping intersect a.geojson b.geojson report.json --crs EPSG:2154 --crs2 EPSG:4326
//!
//! # Catalogue des CRS connus
//! geomapping crs
//! geomapping crs bng
//! ```

pub mod config;
pub mod loader;
pub mod pipeline;
pub mod report;

pub use config::CatalogConfig;
pub use loader::{load_collection, LoadedCollection};
pub use pipeline::run;
pub use report::{IntersectionReport, RunArgs};
