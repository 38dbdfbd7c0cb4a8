//! Projection conique conforme de Lambert à deux parallèles standards
//!
//! Lambert 93 (EPSG:2154) est l'instance du catalogue intégré.

use geo::Coord;
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

use super::ellipsoid::Ellipsoid;
use super::Geographic;

/// Paramètres d'une projection Lambert 2SP (angles en degrés)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LambertConformalConic {
    pub ellipsoid: Ellipsoid,
    /// Latitude origine
    pub latitude_of_origin: f64,
    /// Longitude origine
    pub central_meridian: f64,
    /// Premier parallèle standard
    pub standard_parallel_1: f64,
    /// Deuxième parallèle standard
    pub standard_parallel_2: f64,
    pub false_easting: f64,
    pub false_northing: f64,
}

/// Constantes dérivées du cône
struct Cone {
    /// Exposant de la projection
    n: f64,
    /// Constante C
    c: f64,
    /// Rayon à l'origine
    r0: f64,
}

impl LambertConformalConic {
    /// RGF93 / Lambert-93
    pub fn lambert93() -> Self {
        Self {
            ellipsoid: Ellipsoid::Grs80,
            latitude_of_origin: 46.5,
            central_meridian: 3.0,
            standard_parallel_1: 44.0,
            standard_parallel_2: 49.0,
            false_easting: 700000.0,
            false_northing: 6600000.0,
        }
    }

    fn cone(&self) -> Cone {
        let a = self.ellipsoid.semi_major();
        let e = self.ellipsoid.e();
        let e2 = self.ellipsoid.e2();
        let lat0 = self.latitude_of_origin.to_radians();
        let lat1 = self.standard_parallel_1.to_radians();
        let lat2 = self.standard_parallel_2.to_radians();

        let n1 = grande_normale(lat1, a, e2);
        let n2 = grande_normale(lat2, a, e2);

        let iso_lat1 = isometric_latitude(lat1, e);
        let iso_lat2 = isometric_latitude(lat2, e);
        let iso_lat0 = isometric_latitude(lat0, e);

        let n = ((n1 * lat1.cos()).ln() - (n2 * lat2.cos()).ln()) / (iso_lat2 - iso_lat1);
        let c = (n1 * lat1.cos() / n) * (n * iso_lat1).exp();
        let r0 = c * (-n * iso_lat0).exp();

        Cone { n, c, r0 }
    }

    /// Géographique → projeté
    pub fn forward(&self, geo: Geographic) -> Coord {
        let Cone { n, c, r0 } = self.cone();
        let r = c * (-n * isometric_latitude(geo.lat, self.ellipsoid.e())).exp();
        let gamma = n * (geo.lon - self.central_meridian.to_radians());

        Coord {
            x: self.false_easting + r * gamma.sin(),
            y: self.false_northing + r0 - r * gamma.cos(),
        }
    }

    /// Projeté → géographique
    pub fn inverse(&self, coord: Coord) -> Geographic {
        let Cone { n, c, r0 } = self.cone();

        // Coordonnées centrées
        let dx = coord.x - self.false_easting;
        let dy = coord.y - self.false_northing;

        // Rayon et angle
        let r = (dx.powi(2) + (r0 - dy).powi(2)).sqrt();
        let r = if n < 0.0 { -r } else { r };
        let gamma = (dx / (r0 - dy)).atan();

        let iso_lat = -(r / c).ln() / n;
        let lat = latitude_from_isometric(iso_lat, self.ellipsoid.e());
        let lon = self.central_meridian.to_radians() + gamma / n;

        Geographic::new(lon, lat)
    }
}

/// Calcule la latitude isométrique
fn isometric_latitude(lat: f64, e: f64) -> f64 {
    let sin_lat = lat.sin();
    let term = ((1.0 - e * sin_lat) / (1.0 + e * sin_lat)).powf(e / 2.0);
    ((FRAC_PI_4 + lat / 2.0).tan() * term).ln()
}

/// Calcule la latitude depuis la latitude isométrique (itératif)
fn latitude_from_isometric(iso_lat: f64, e: f64) -> f64 {
    let mut lat = 2.0 * iso_lat.exp().atan() - FRAC_PI_2;

    for _ in 0..10 {
        let sin_lat = lat.sin();
        let term = ((1.0 + e * sin_lat) / (1.0 - e * sin_lat)).powf(e / 2.0);
        let new_lat = 2.0 * (iso_lat.exp() * term).atan() - FRAC_PI_2;

        if (new_lat - lat).abs() < 1e-12 {
            return new_lat;
        }
        lat = new_lat;
    }
    lat
}

/// Calcule la grande normale (rayon de courbure dans le plan vertical)
fn grande_normale(lat: f64, a: f64, e2: f64) -> f64 {
    a / (1.0 - e2 * lat.sin().powi(2)).sqrt()
}
