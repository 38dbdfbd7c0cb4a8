//! Normalisation d'une collection : CRS source → CRS cible, puis réparation
//!
//! Les géométries d'entrée ne sont jamais modifiées, de nouveaux tableaux de
//! coordonnées sont produits.

mod areal;

pub use areal::to_multi_polygon;

use geo::{LineString, MultiPolygon, Polygon};
use tracing::{debug, warn};

use crate::crs::{CoordTransform, Crs, CrsCatalog};
use crate::repair;
use crate::types::{Collection, NormalizedCollection};
use crate::GeomappingError;

/// Reprojette et répare toutes les géométries d'une collection
///
/// Le CRS déclaré l'emporte sur celui des métadonnées de la source.
pub fn normalize(
    catalog: &CrsCatalog,
    collection: &Collection,
    declared: Option<&str>,
    target: &Crs,
) -> Result<NormalizedCollection, GeomappingError> {
    let source = catalog.resolve_source(declared, collection.crs.as_deref())?;
    let transform = catalog.transformer(&source, target)?;

    debug!(
        collection = %collection.name,
        source = %source,
        target = %target,
        transform = transform.description(),
        features = collection.len(),
        "Normalizing collection"
    );

    let mut shapes = Vec::with_capacity(collection.len());
    let mut repaired = 0;

    for (i, feature) in collection.features.iter().enumerate() {
        let shape = to_multi_polygon(&feature.geometry)
            .and_then(|mp| transform_shape(&transform, &mp))
            .and_then(repair::ensure_valid)
            .map_err(|e| e.at_feature(i))?;

        if shape.was_repaired() {
            warn!(collection = %collection.name, feature = i, "Invalid geometry repaired with zero buffer");
            repaired += 1;
        }

        shapes.push(shape.into_inner());
    }

    if repaired > 0 {
        warn!(collection = %collection.name, repaired, "Geometries repaired");
    }

    Ok(NormalizedCollection {
        source_crs: source.identifier(),
        shapes,
        repaired,
    })
}

/// Applique la transformation à chaque ring de chaque polygone
pub fn transform_shape(
    transform: &CoordTransform,
    shape: &MultiPolygon,
) -> Result<MultiPolygon, GeomappingError> {
    shape
        .iter()
        .map(|polygon| {
            let exterior = transform_ring(transform, polygon.exterior())?;
            let interiors = polygon
                .interiors()
                .iter()
                .map(|ring| transform_ring(transform, ring))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Polygon::new(exterior, interiors))
        })
        .collect::<Result<Vec<_>, _>>()
        .map(MultiPolygon::new)
}

fn transform_ring(
    transform: &CoordTransform,
    ring: &LineString,
) -> Result<LineString, GeomappingError> {
    transform.transform_coords(&ring.0).map(LineString::new)
}
