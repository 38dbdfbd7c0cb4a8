//! Définitions des ellipsoïdes

use serde::{Deserialize, Serialize};

/// Ellipsoïdes de référence connus du catalogue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ellipsoid {
    /// WGS 84 (GPS, Web Mercator, UTM)
    Wgs84,
    /// GRS 80 (ETRS89, RGF93 / Lambert 93)
    /// Note: quasi identique à WGS84, différence < 0.1mm
    Grs80,
    /// Airy 1830 (OSGB36 / British National Grid)
    Airy1830,
}

impl Ellipsoid {
    /// Demi-grand axe (rayon équatorial) en mètres
    pub fn semi_major(self) -> f64 {
        match self {
            Self::Wgs84 | Self::Grs80 => 6378137.0,
            Self::Airy1830 => 6377563.396,
        }
    }

    /// Aplatissement
    pub fn flattening(self) -> f64 {
        match self {
            Self::Wgs84 => 1.0 / 298.257223563,
            Self::Grs80 => 1.0 / 298.257222101,
            Self::Airy1830 => 1.0 / 299.3249646,
        }
    }

    /// Demi-petit axe (rayon polaire) en mètres
    pub fn semi_minor(self) -> f64 {
        self.semi_major() * (1.0 - self.flattening())
    }

    /// Première excentricité au carré
    pub fn e2(self) -> f64 {
        let f = self.flattening();
        2.0 * f - f * f
    }

    /// Première excentricité
    pub fn e(self) -> f64 {
        self.e2().sqrt()
    }

    /// Deuxième excentricité au carré
    pub fn ep2(self) -> f64 {
        let e2 = self.e2();
        e2 / (1.0 - e2)
    }
}
