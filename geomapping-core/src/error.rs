//! Types d'erreurs pour le crate geomapping-core

use thiserror::Error;

/// Erreurs fatales d'un calcul d'intersections
///
/// Aucune n'est récupérée localement : elles remontent telles quelles à l'appelant.
#[derive(Debug, Error)]
pub enum GeomappingError {
    /// Le CRS d'une collection ne peut pas être déterminé
    #[error("Cannot resolve coordinate reference system: {0}")]
    CrsResolution(String),

    /// Une coordonnée ne se transforme pas, ou la géométrie est vide / mal formée
    #[error("Transform failed{}: {reason}", feature_suffix(.feature))]
    Transform {
        feature: Option<usize>,
        reason: String,
    },

    /// La géométrie reste invalide après la réparation par buffer nul
    #[error("Invalid geometry{}: {reason}", feature_suffix(.feature))]
    GeometryInvalid {
        feature: Option<usize>,
        reason: String,
    },
}

impl GeomappingError {
    /// Crée une erreur de résolution de CRS
    pub fn crs_resolution(identifier: impl Into<String>) -> Self {
        Self::CrsResolution(identifier.into())
    }

    /// Crée une erreur de transformation sans feature associée
    pub fn transform(reason: impl Into<String>) -> Self {
        Self::Transform {
            feature: None,
            reason: reason.into(),
        }
    }

    /// Crée une erreur de géométrie invalide pour la feature `feature`
    pub fn invalid_geometry(feature: usize, reason: impl Into<String>) -> Self {
        Self::GeometryInvalid {
            feature: Some(feature),
            reason: reason.into(),
        }
    }

    /// Rattache l'erreur à la position d'une feature si elle n'en a pas encore
    pub fn at_feature(self, index: usize) -> Self {
        match self {
            Self::Transform {
                feature: None,
                reason,
            } => Self::Transform {
                feature: Some(index),
                reason,
            },
            Self::GeometryInvalid {
                feature: None,
                reason,
            } => Self::GeometryInvalid {
                feature: Some(index),
                reason,
            },
            other => other,
        }
    }
}

fn feature_suffix(feature: &Option<usize>) -> String {
    feature
        .map(|i| format!(" for feature {}", i))
        .unwrap_or_default()
}
