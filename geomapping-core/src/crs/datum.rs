//! Changement de datum par similitude de Helmert (7 paramètres)
//!
//! Les datums basés sur GRS80 (ETRS89, RGF93) sont assimilés à WGS84 :
//! l'écart est inférieur au mètre, sans effet sur le calcul d'aires.

use serde::{Deserialize, Serialize};

use super::ellipsoid::Ellipsoid;
use super::Geographic;

/// Datums géodésiques connus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Datum {
    /// WGS84 et datums équivalents (ETRS89, RGF93)
    #[default]
    Wgs84,
    /// OSGB36 (Ordnance Survey, Grande-Bretagne)
    Osgb36,
}

impl Datum {
    /// Ellipsoïde sur lequel sont exprimées les coordonnées géographiques du datum
    pub fn ellipsoid(self) -> Ellipsoid {
        match self {
            Self::Wgs84 => Ellipsoid::Wgs84,
            Self::Osgb36 => Ellipsoid::Airy1830,
        }
    }

    /// Similitude WGS84 → datum (`None` pour WGS84 lui-même)
    fn from_wgs84(self) -> Option<Helmert> {
        match self {
            Self::Wgs84 => None,
            Self::Osgb36 => Some(Helmert::WGS84_TO_OSGB36),
        }
    }
}

/// Paramètres de Helmert (convention "position vector")
#[derive(Debug, Clone, Copy)]
struct Helmert {
    /// Translations en mètres
    tx: f64,
    ty: f64,
    tz: f64,
    /// Facteur d'échelle en ppm
    s: f64,
    /// Rotations en secondes d'arc
    rx: f64,
    ry: f64,
    rz: f64,
}

impl Helmert {
    /// Source: Ordnance Survey, "A guide to coordinate systems in Great Britain"
    const WGS84_TO_OSGB36: Self = Self {
        tx: -446.448,
        ty: 125.157,
        tz: -542.060,
        s: 20.4894,
        rx: -0.1502,
        ry: -0.2470,
        rz: -0.8421,
    };

    /// Inverse approchée (précision centimétrique pour ces ordres de grandeur)
    fn inverse(self) -> Self {
        Self {
            tx: -self.tx,
            ty: -self.ty,
            tz: -self.tz,
            s: -self.s,
            rx: -self.rx,
            ry: -self.ry,
            rz: -self.rz,
        }
    }

    fn apply(&self, [x, y, z]: [f64; 3]) -> [f64; 3] {
        let s1 = 1.0 + self.s * 1e-6;
        let rx = (self.rx / 3600.0).to_radians();
        let ry = (self.ry / 3600.0).to_radians();
        let rz = (self.rz / 3600.0).to_radians();

        [
            self.tx + s1 * x - rz * y + ry * z,
            self.ty + rz * x + s1 * y - rx * z,
            self.tz - ry * x + rx * y + s1 * z,
        ]
    }
}

/// Convertit des coordonnées géographiques (hauteur nulle) en géocentriques
fn to_geocentric(geo: Geographic, ellipsoid: Ellipsoid) -> [f64; 3] {
    let a = ellipsoid.semi_major();
    let e2 = ellipsoid.e2();
    let (sin_lat, cos_lat) = geo.lat.sin_cos();
    let nu = a / (1.0 - e2 * sin_lat * sin_lat).sqrt();

    [
        nu * cos_lat * geo.lon.cos(),
        nu * cos_lat * geo.lon.sin(),
        nu * (1.0 - e2) * sin_lat,
    ]
}

/// Convertit des coordonnées géocentriques en géographiques (itératif)
fn from_geocentric([x, y, z]: [f64; 3], ellipsoid: Ellipsoid) -> Geographic {
    let a = ellipsoid.semi_major();
    let e2 = ellipsoid.e2();
    let p = (x * x + y * y).sqrt();

    let mut lat = z.atan2(p * (1.0 - e2));
    for _ in 0..10 {
        let sin_lat = lat.sin();
        let nu = a / (1.0 - e2 * sin_lat * sin_lat).sqrt();
        let new_lat = (z + e2 * nu * sin_lat).atan2(p);

        if (new_lat - lat).abs() < 1e-12 {
            lat = new_lat;
            break;
        }
        lat = new_lat;
    }

    Geographic::new(y.atan2(x), lat)
}

/// Change le datum d'une position géographique, en passant par WGS84
pub fn shift(geo: Geographic, from: Datum, to: Datum) -> Geographic {
    if from == to {
        return geo;
    }

    let mut xyz = to_geocentric(geo, from.ellipsoid());
    if let Some(helmert) = from.from_wgs84() {
        xyz = helmert.inverse().apply(xyz);
    }
    if let Some(helmert) = to.from_wgs84() {
        xyz = helmert.apply(xyz);
    }
    from_geocentric(xyz, to.ellipsoid())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geocentric_roundtrip() {
        let geo = Geographic::from_degrees(-1.5, 52.25);
        let back = from_geocentric(to_geocentric(geo, Ellipsoid::Airy1830), Ellipsoid::Airy1830);
        let (lon, lat) = back.to_degrees();

        assert!((lon - (-1.5)).abs() < 1e-9, "lon={}", lon);
        assert!((lat - 52.25).abs() < 1e-9, "lat={}", lat);
    }

    #[test]
    fn test_osgb36_shift_magnitude() {
        // Le décalage WGS84 → OSGB36 est d'une centaine de mètres en Angleterre
        let wgs84 = Geographic::from_degrees(-0.1276, 51.5072);
        let osgb = shift(wgs84, Datum::Wgs84, Datum::Osgb36);
        let (lon, lat) = osgb.to_degrees();

        assert!((lon - (-0.1276)).abs() > 1e-4, "lon={}", lon);
        assert!((lon - (-0.1276)).abs() < 3e-3, "lon={}", lon);
        assert!((lat - 51.5072).abs() < 3e-3, "lat={}", lat);
    }

    #[test]
    fn test_shift_roundtrip() {
        let wgs84 = Geographic::from_degrees(-3.19, 55.95);
        let there = shift(wgs84, Datum::Wgs84, Datum::Osgb36);
        let back = shift(there, Datum::Osgb36, Datum::Wgs84);
        let (lon, lat) = back.to_degrees();

        assert!((lon - (-3.19)).abs() < 1e-5, "lon={}", lon);
        assert!((lat - 55.95).abs() < 1e-5, "lat={}", lat);
    }

    #[test]
    fn test_same_datum_is_identity() {
        let geo = Geographic::from_degrees(2.35, 48.85);
        let same = shift(geo, Datum::Wgs84, Datum::Wgs84);
        assert_eq!(same.lon, geo.lon);
        assert_eq!(same.lat, geo.lat);
    }
}
