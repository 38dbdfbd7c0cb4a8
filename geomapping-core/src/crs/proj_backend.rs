//! Reprojection de coordonnées avec PROJ
//!
//! Ce module est disponible uniquement avec le feature `reproject`.

use geo::Coord;
use proj::Proj;

use crate::GeomappingError;

/// Transformation entre deux codes EPSG déléguée à PROJ
///
/// `Proj::new_known_crs` normalise l'ordre des axes pour la visualisation :
/// x = longitude/est, y = latitude/nord, comme la chaîne pure Rust.
pub struct ProjTransform {
    proj: Proj,
}

impl ProjTransform {
    /// Crée une transformation entre deux EPSG
    pub fn new(source_epsg: u32, target_epsg: u32) -> Result<Self, GeomappingError> {
        let source = format!("EPSG:{}", source_epsg);
        let target = format!("EPSG:{}", target_epsg);

        let proj = Proj::new_known_crs(&source, &target, None).map_err(|e| {
            GeomappingError::transform(format!(
                "Failed to create projection from {} to {}: {}",
                source, target, e
            ))
        })?;

        Ok(Self { proj })
    }

    /// Transforme une coordonnée unique
    pub fn transform_coord(&self, coord: Coord) -> Result<Coord, GeomappingError> {
        let (x, y) = self
            .proj
            .convert((coord.x, coord.y))
            .map_err(|e| GeomappingError::transform(format!("Coordinate transformation failed: {}", e)))?;
        Ok(Coord { x, y })
    }

    /// Transforme un ring (batch conversion)
    pub fn transform_coords(&self, coords: &[Coord]) -> Result<Vec<Coord>, GeomappingError> {
        // Copier les coordonnées pour transformation in-place
        let mut points: Vec<(f64, f64)> = coords.iter().map(|c| (c.x, c.y)).collect();

        // Transformation batch - beaucoup plus rapide que point par point
        self.proj.convert_array(&mut points).map_err(|e| {
            GeomappingError::transform(format!("Batch coordinate transformation failed: {}", e))
        })?;

        Ok(points.into_iter().map(|(x, y)| Coord { x, y }).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lambert93_to_wgs84() {
        // Point connu: Paris (environ)
        // Lambert-93: X=652381, Y=6862047
        let t = ProjTransform::new(2154, 4326).unwrap();
        let c = t
            .transform_coord(Coord {
                x: 652381.0,
                y: 6862047.0,
            })
            .unwrap();

        assert!(c.x > 2.0 && c.x < 3.0, "Longitude should be around 2.35, got {}", c.x);
        assert!(c.y > 48.0 && c.y < 49.0, "Latitude should be around 48.85, got {}", c.y);
    }

    #[test]
    fn test_invalid_epsg() {
        assert!(ProjTransform::new(99999, 4326).is_err());
    }
}
