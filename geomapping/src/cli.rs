//! Définition et implémentation des commandes CLI
//!
//! - `intersect` : deux fichiers GeoJSON → rapport JSON des recouvrements
//! - `crs` : catalogue des CRS connus

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Subcommand};
use tracing::info;

use geomapping::config::build_catalog;
use geomapping::RunArgs;

#[derive(Subcommand)]
pub enum Commands {
    /// Compute the overlap areas between the shapes of two GeoJSON files
    Intersect(IntersectArgs),

    /// List the known coordinate reference systems, or resolve one identifier
    Crs {
        /// Identifier to resolve (e.g. EPSG:27700, urn:ogc:def:crs:EPSG::2154, bng)
        identifier: Option<String>,

        /// Catalog preset (france-cc, ireland) or path to a JSON catalog file
        #[arg(long, env = "GEOMAPPING_CATALOG")]
        catalog: Option<String>,
    },
}

#[derive(Args)]
pub struct IntersectArgs {
    /// First GeoJSON file
    pub filename1: PathBuf,

    /// Second GeoJSON file
    pub filename2: PathBuf,

    /// Output JSON report (parent directories are created)
    pub output: PathBuf,

    /// Target CRS in which areas are computed
    #[arg(long, default_value = "epsg:27700", env = "GEOMAPPING_CRS")]
    pub crs: String,

    /// CRS of the first file (overrides its metadata)
    #[arg(long)]
    pub crs1: Option<String>,

    /// CRS of the second file (overrides its metadata)
    #[arg(long)]
    pub crs2: Option<String>,

    /// Catalog preset (france-cc, ireland) or path to a JSON catalog file
    #[arg(long, env = "GEOMAPPING_CATALOG")]
    pub catalog: Option<String>,

    /// Do not print the report summary
    #[arg(long)]
    pub no_display: bool,
}

impl IntersectArgs {
    fn run_args(&self) -> RunArgs {
        RunArgs {
            filename1: self.filename1.clone(),
            filename2: self.filename2.clone(),
            output: self.output.clone(),
            crs: self.crs.clone(),
            crs1: self.crs1.clone(),
            crs2: self.crs2.clone(),
            catalog: self.catalog.clone(),
        }
    }
}

/// Exécute la commande intersect
pub fn cmd_intersect(args: &IntersectArgs) -> Result<()> {
    let report = geomapping::run(args.run_args())?;

    report.save_to_file(&args.output)?;
    info!(output = %args.output.display(), "Report written");

    if !args.no_display {
        report.display();
    }
    println!("{}", report.summary());

    Ok(())
}

/// Exécute la commande crs
pub fn cmd_crs(identifier: Option<&str>, catalog_source: Option<&str>) -> Result<()> {
    let catalog = build_catalog(catalog_source)?;

    if let Some(identifier) = identifier {
        let crs = catalog.resolve(identifier)?;
        println!("{} - {}", crs.identifier(), crs.name());

        match &crs.definition {
            Some(definition) => {
                println!("Datum: {:?}", definition.datum);
                println!("{}", serde_json::to_string_pretty(&definition.projection)?);
            }
            None => println!("Delegated to PROJ"),
        }
        return Ok(());
    }

    println!("=== CRS catalog ({} definitions) ===", catalog.len());
    for definition in catalog.definitions() {
        println!("  EPSG:{:<6} {}", definition.code, definition.name);
    }

    println!("\n=== Aliases ===");
    for (alias, code) in catalog.aliases() {
        println!("  {:<32} EPSG:{}", alias, code);
    }

    Ok(())
}
