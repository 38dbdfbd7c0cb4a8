//! Lecture GeoJSON avec le crate `geojson`
//!
//! Le CRS vient du membre `crs` historique (GeoJSON 2008) :
//! `{"type":"name","properties":{"name":"urn:ogc:def:crs:EPSG::27700"}}`.
//! Sans ce membre, on suppose `OGC:CRS84` (RFC 7946).

use std::path::Path;

use ::geojson::{GeoJson, JsonObject, JsonValue};
use anyhow::{anyhow, bail, Context, Result};
use tracing::{info, warn};

use geomapping_core::{Collection, Feature, Properties};

use super::{compute_file_checksum, LoadedCollection};

/// CRS implicite d'un fichier GeoJSON sans membre `crs`
pub const DEFAULT_CRS: &str = "OGC:CRS84";

/// Lit un fichier GeoJSON (FeatureCollection ou Feature)
pub fn load_collection(path: &Path) -> Result<LoadedCollection> {
    let content = std::fs::read_to_string(path)
        .context(format!("Failed to read GeoJSON file: {}", path.display()))?;

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let collection = parse_collection(&name, &content)
        .with_context(|| format!("Failed to load {}", path.display()))?;
    let checksum = compute_file_checksum(path)?;

    info!(
        path = %path.display(),
        features = collection.len(),
        crs = ?collection.crs,
        "Collection loaded"
    );

    Ok(LoadedCollection {
        path: path.to_path_buf(),
        checksum,
        collection,
    })
}

/// Construit une collection depuis un texte GeoJSON
pub fn parse_collection(name: &str, content: &str) -> Result<Collection> {
    let geojson: GeoJson = content.parse().context("Failed to parse GeoJSON")?;

    let (features, foreign_members) = match geojson {
        GeoJson::FeatureCollection(fc) => (fc.features, fc.foreign_members),
        GeoJson::Feature(f) => {
            let foreign_members = f.foreign_members.clone();
            (vec![f], foreign_members)
        }
        GeoJson::Geometry(_) => {
            bail!("Expected a FeatureCollection or a Feature, found a bare geometry")
        }
    };

    let crs = match foreign_members.as_ref().and_then(|m| m.get("crs")) {
        None | Some(JsonValue::Null) => Some(DEFAULT_CRS.to_string()),
        Some(member) => {
            let crs = parse_crs_member(member);
            if crs.is_none() {
                warn!(collection = name, crs = %member, "Unsupported crs member, a CRS must be declared");
            }
            crs
        }
    };

    let features = features
        .into_iter()
        .enumerate()
        .map(|(i, f)| convert_feature(i, f))
        .collect::<Result<Vec<_>>>()?;

    Ok(Collection::new(name, crs, features))
}

/// Identifiant du membre `crs` (types `name` et `EPSG`)
fn parse_crs_member(member: &JsonValue) -> Option<String> {
    let properties = member.get("properties")?;

    match member.get("type")?.as_str()? {
        "name" => properties.get("name")?.as_str().map(String::from),
        "EPSG" | "epsg" => {
            let code = properties.get("code")?;
            code.as_u64()
                .map(|c| c.to_string())
                .or_else(|| code.as_str().map(String::from))
                .map(|c| format!("EPSG:{}", c))
        }
        _ => None,
    }
}

fn convert_feature(index: usize, feature: ::geojson::Feature) -> Result<Feature> {
    let geometry = feature
        .geometry
        .ok_or_else(|| anyhow!("Feature {} has no geometry", index))?;

    let geometry: geo::Geometry = geometry
        .try_into()
        .context(format!("Feature {}: cannot convert geometry", index))?;

    Ok(Feature::new(geometry, flatten_properties(feature.properties)))
}

/// Garde les scalaires ; tableaux et objets deviennent leur texte JSON
fn flatten_properties(properties: Option<JsonObject>) -> Properties {
    properties
        .unwrap_or_default()
        .into_iter()
        .map(|(key, value)| {
            let value = match value {
                JsonValue::Array(_) | JsonValue::Object(_) => JsonValue::String(value.to_string()),
                scalar => scalar,
            };
            (key, value)
        })
        .collect()
}
