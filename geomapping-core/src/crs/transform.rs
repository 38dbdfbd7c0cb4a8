//! Transformation de coordonnées : pure Rust en priorité, repli sur PROJ
//!
//! Utilise automatiquement la meilleure option disponible.

use geo::Coord;

use super::{datum, Crs, CrsDefinition};
use crate::GeomappingError;

/// Transformation de coordonnées source → cible
///
/// L'ordre des axes est toujours x = est/longitude, y = nord/latitude,
/// quel que soit l'ordre déclaré par l'autorité.
pub enum CoordTransform {
    /// Pas de reprojection (source == cible)
    Identity,
    /// Chaîne pure Rust
    Lite {
        source: CrsDefinition,
        target: CrsDefinition,
    },
    /// Reprojection via PROJ (si feature activée)
    #[cfg(feature = "reproject")]
    Proj(super::proj_backend::ProjTransform),
}

impl CoordTransform {
    /// Crée la transformation entre deux CRS résolus
    pub fn new(source: &Crs, target: &Crs) -> Result<Self, GeomappingError> {
        // Pas de reprojection nécessaire
        if source.code == target.code {
            return Ok(Self::Identity);
        }

        // Chaîne pure Rust d'abord
        if let (Some(s), Some(t)) = (&source.definition, &target.definition) {
            return Ok(Self::Lite {
                source: s.clone(),
                target: t.clone(),
            });
        }

        // Repli sur PROJ si disponible
        Self::fallback(source, target)
    }

    #[cfg(feature = "reproject")]
    fn fallback(source: &Crs, target: &Crs) -> Result<Self, GeomappingError> {
        let proj = super::proj_backend::ProjTransform::new(source.code, target.code)?;
        Ok(Self::Proj(proj))
    }

    /// Aucune option disponible sans PROJ
    #[cfg(not(feature = "reproject"))]
    fn fallback(source: &Crs, target: &Crs) -> Result<Self, GeomappingError> {
        Err(GeomappingError::transform(format!(
            "no transform available from {} to {}; build with the 'reproject' feature",
            source, target
        )))
    }

    /// Transforme une coordonnée unique
    pub fn transform_coord(&self, coord: Coord) -> Result<Coord, GeomappingError> {
        let out = match self {
            Self::Identity => coord,
            Self::Lite { source, target } => {
                let geo = source.projection.to_geographic(coord);
                let geo = datum::shift(geo, source.datum, target.datum);
                target.projection.from_geographic(geo)
            }
            #[cfg(feature = "reproject")]
            Self::Proj(proj) => proj.transform_coord(coord)?,
        };

        check_finite(coord, out)
    }

    /// Transforme une suite de coordonnées (un ring)
    pub fn transform_coords(&self, coords: &[Coord]) -> Result<Vec<Coord>, GeomappingError> {
        match self {
            Self::Identity => coords.iter().map(|&c| check_finite(c, c)).collect(),
            #[cfg(feature = "reproject")]
            Self::Proj(proj) => {
                let out = proj.transform_coords(coords)?;
                coords
                    .iter()
                    .zip(out)
                    .map(|(&input, output)| check_finite(input, output))
                    .collect()
            }
            _ => coords.iter().map(|&c| self.transform_coord(c)).collect(),
        }
    }

    pub fn is_identity(&self) -> bool {
        matches!(self, Self::Identity)
    }

    /// Retourne une description de la transformation utilisée
    pub fn description(&self) -> &'static str {
        match self {
            Self::Identity => "identity (no reprojection)",
            Self::Lite { .. } => "lite (pure Rust)",
            #[cfg(feature = "reproject")]
            Self::Proj(_) => "proj (PROJ library)",
        }
    }
}

fn check_finite(input: Coord, output: Coord) -> Result<Coord, GeomappingError> {
    if output.x.is_finite() && output.y.is_finite() {
        Ok(output)
    } else {
        Err(GeomappingError::transform(format!(
            "coordinate ({}, {}) has no finite image",
            input.x, input.y
        )))
    }
}
