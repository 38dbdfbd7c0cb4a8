//! Réparation des géométries invalides après reprojection
//!
//! Équivalent d'un buffer de distance nulle : une union booléenne de la forme
//! avec l'ensemble vide reconstruit les rings et couvre la même surface.
//! Les pointes dégénérées et les parties d'aire nulle disparaissent.

use geo::{BooleanOps, MultiPolygon, Validation};

use crate::GeomappingError;

/// Issue de la vérification d'une géométrie
#[derive(Debug)]
pub enum Repair {
    /// Géométrie déjà valide, inchangée
    Valid(MultiPolygon),
    /// Géométrie reconstruite par union
    Repaired(MultiPolygon),
}

impl Repair {
    pub fn was_repaired(&self) -> bool {
        matches!(self, Self::Repaired(_))
    }

    pub fn into_inner(self) -> MultiPolygon {
        match self {
            Self::Valid(mp) | Self::Repaired(mp) => mp,
        }
    }
}

/// Vérifie la validité et répare si nécessaire
///
/// Retourne `GeometryInvalid` si la forme reconstruite reste invalide.
pub fn ensure_valid(shape: MultiPolygon) -> Result<Repair, GeomappingError> {
    if shape.is_valid() {
        return Ok(Repair::Valid(shape));
    }

    let repaired = zero_buffer(&shape);

    if !repaired.is_valid() {
        return Err(GeomappingError::GeometryInvalid {
            feature: None,
            reason: "still invalid after zero buffer repair".to_string(),
        });
    }

    Ok(Repair::Repaired(repaired))
}

/// Union avec l'ensemble vide (buffer nul)
pub fn zero_buffer(shape: &MultiPolygon) -> MultiPolygon {
    shape.union(&MultiPolygon::new(vec![]))
}
