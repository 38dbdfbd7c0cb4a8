//! Projection Transverse Mercator (séries de Redfearn, formulation Ordnance Survey)
//!
//! Couvre:
//! - UTM (EPSG:326xx / 327xx, EPSG:258xx)
//! - British National Grid (EPSG:27700)

use geo::Coord;
use serde::{Deserialize, Serialize};

use super::ellipsoid::Ellipsoid;
use super::Geographic;

/// Paramètres d'une projection Transverse Mercator (angles en degrés)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransverseMercator {
    pub ellipsoid: Ellipsoid,
    /// Facteur d'échelle sur le méridien central
    pub scale_factor: f64,
    /// Latitude d'origine
    pub latitude_of_origin: f64,
    /// Méridien central
    pub central_meridian: f64,
    pub false_easting: f64,
    pub false_northing: f64,
}

impl TransverseMercator {
    /// Zone UTM (1..=60), hémisphère nord ou sud
    pub fn utm(zone: u32, south: bool, ellipsoid: Ellipsoid) -> Self {
        Self {
            ellipsoid,
            scale_factor: 0.9996,
            latitude_of_origin: 0.0,
            central_meridian: (zone as f64 - 1.0) * 6.0 - 180.0 + 3.0,
            false_easting: 500000.0,
            false_northing: if south { 10000000.0 } else { 0.0 },
        }
    }

    /// British National Grid (OSGB36, Airy 1830)
    pub fn british_national_grid() -> Self {
        Self {
            ellipsoid: Ellipsoid::Airy1830,
            scale_factor: 0.9996012717,
            latitude_of_origin: 49.0,
            central_meridian: -2.0,
            false_easting: 400000.0,
            false_northing: -100000.0,
        }
    }

    /// Arc de méridien depuis la latitude d'origine, mis à l'échelle
    fn meridional_arc(&self, lat: f64) -> f64 {
        let a = self.ellipsoid.semi_major();
        let b = self.ellipsoid.semi_minor();
        let n = (a - b) / (a + b);
        let (n2, n3) = (n * n, n * n * n);
        let lat0 = self.latitude_of_origin.to_radians();

        let d = lat - lat0;
        let s = lat + lat0;

        b * self.scale_factor
            * ((1.0 + n + 1.25 * n2 + 1.25 * n3) * d
                - (3.0 * n + 3.0 * n2 + 2.625 * n3) * d.sin() * s.cos()
                + (1.875 * n2 + 1.875 * n3) * (2.0 * d).sin() * (2.0 * s).cos()
                - (35.0 / 24.0) * n3 * (3.0 * d).sin() * (3.0 * s).cos())
    }

    /// Rayons de courbure (nu, rho) à la latitude donnée, mis à l'échelle
    fn radii(&self, lat: f64) -> (f64, f64) {
        let af0 = self.ellipsoid.semi_major() * self.scale_factor;
        let e2 = self.ellipsoid.e2();
        let w = 1.0 - e2 * lat.sin().powi(2);

        let nu = af0 / w.sqrt();
        let rho = af0 * (1.0 - e2) / w.powf(1.5);
        (nu, rho)
    }

    /// Géographique → projeté
    pub fn forward(&self, geo: Geographic) -> Coord {
        let lat = geo.lat;
        let (sin_lat, cos_lat) = lat.sin_cos();
        let tan2 = lat.tan().powi(2);
        let tan4 = tan2 * tan2;

        let (nu, rho) = self.radii(lat);
        let eta2 = nu / rho - 1.0;
        let m = self.meridional_arc(lat);

        let i = m + self.false_northing;
        let ii = nu / 2.0 * sin_lat * cos_lat;
        let iii = nu / 24.0 * sin_lat * cos_lat.powi(3) * (5.0 - tan2 + 9.0 * eta2);
        let iiia = nu / 720.0 * sin_lat * cos_lat.powi(5) * (61.0 - 58.0 * tan2 + tan4);
        let iv = nu * cos_lat;
        let v = nu / 6.0 * cos_lat.powi(3) * (nu / rho - tan2);
        let vi = nu / 120.0
            * cos_lat.powi(5)
            * (5.0 - 18.0 * tan2 + tan4 + 14.0 * eta2 - 58.0 * tan2 * eta2);

        let dl = geo.lon - self.central_meridian.to_radians();

        Coord {
            x: self.false_easting + iv * dl + v * dl.powi(3) + vi * dl.powi(5),
            y: i + ii * dl.powi(2) + iii * dl.powi(4) + iiia * dl.powi(6),
        }
    }

    /// Projeté → géographique
    pub fn inverse(&self, coord: Coord) -> Geographic {
        let af0 = self.ellipsoid.semi_major() * self.scale_factor;
        let dn = coord.y - self.false_northing;

        // Latitude du pied de la perpendiculaire (itératif, tolérance 0.01 mm)
        let mut lat = dn / af0 + self.latitude_of_origin.to_radians();
        let mut m = self.meridional_arc(lat);
        for _ in 0..20 {
            if (dn - m).abs() < 1e-5 {
                break;
            }
            lat += (dn - m) / af0;
            m = self.meridional_arc(lat);
        }

        let (nu, rho) = self.radii(lat);
        let eta2 = nu / rho - 1.0;
        let tan = lat.tan();
        let (tan2, tan4, tan6) = (tan * tan, tan.powi(4), tan.powi(6));
        let sec = 1.0 / lat.cos();

        let vii = tan / (2.0 * rho * nu);
        let viii =
            tan / (24.0 * rho * nu.powi(3)) * (5.0 + 3.0 * tan2 + eta2 - 9.0 * tan2 * eta2);
        let ix = tan / (720.0 * rho * nu.powi(5)) * (61.0 + 90.0 * tan2 + 45.0 * tan4);
        let x = sec / nu;
        let xi = sec / (6.0 * nu.powi(3)) * (nu / rho + 2.0 * tan2);
        let xii = sec / (120.0 * nu.powi(5)) * (5.0 + 28.0 * tan2 + 24.0 * tan4);
        let xiia =
            sec / (5040.0 * nu.powi(7)) * (61.0 + 662.0 * tan2 + 1320.0 * tan4 + 720.0 * tan6);

        let de = coord.x - self.false_easting;

        let lat = lat - vii * de.powi(2) + viii * de.powi(4) - ix * de.powi(6);
        let lon = self.central_meridian.to_radians() + x * de - xi * de.powi(3)
            + xii * de.powi(5)
            - xiia * de.powi(7);

        Geographic::new(lon, lat)
    }
}
