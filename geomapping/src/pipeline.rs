//! Chaîne complète : lecture, recouvrements, rapport

use std::time::Instant;

use anyhow::{Context, Result};
use tracing::info;

use geomapping_core::{overlay, OverlayOptions};

use crate::config::build_catalog;
use crate::loader::load_collection;
use crate::report::{IntersectionReport, RunArgs};

/// Calcule le rapport d'intersections pour deux fichiers GeoJSON
///
/// Le rapport n'est pas écrit : voir [`IntersectionReport::save_to_file`].
pub fn run(args: RunArgs) -> Result<IntersectionReport> {
    let start = Instant::now();

    let catalog = build_catalog(args.catalog.as_deref())?;
    let first = load_collection(&args.filename1)?;
    let second = load_collection(&args.filename2)?;

    let options = OverlayOptions {
        target_crs: args.crs.clone(),
        first_crs: args.crs1.clone(),
        second_crs: args.crs2.clone(),
    };

    let result = overlay(&catalog, &first.collection, &second.collection, &options)
        .context("Overlay computation failed")?;

    info!(
        target = %result.target_crs,
        intersections = result.records.len(),
        "Overlay complete"
    );

    Ok(IntersectionReport::new(
        args,
        [&first, &second],
        result,
        start.elapsed(),
    ))
}
