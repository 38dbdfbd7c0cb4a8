//! Projection Web Mercator (EPSG:3857)
//!
//! Aussi connu sous le nom de Pseudo-Mercator ou Spherical Mercator.
//! Utilisé par Google Maps, OpenStreetMap, etc.

use geo::Coord;
use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

use super::ellipsoid::Ellipsoid;
use super::Geographic;

/// Latitude limite de la projection (tuiles carrées)
const MAX_LATITUDE: f64 = 85.051_128_779_806_59;

/// Convertit coordonnées géographiques vers Web Mercator (EPSG:3857)
pub fn geographic_to_web_mercator(geo: Geographic) -> Coord {
    // Web Mercator utilise un modèle sphérique avec le rayon équatorial
    let r = Ellipsoid::Wgs84.semi_major();

    // Limiter la latitude pour éviter l'infini
    let lat = geo
        .lat
        .clamp(-MAX_LATITUDE.to_radians(), MAX_LATITUDE.to_radians());

    Coord {
        x: r * geo.lon,
        y: r * (FRAC_PI_4 + lat / 2.0).tan().ln(),
    }
}

/// Convertit Web Mercator vers coordonnées géographiques
pub fn web_mercator_to_geographic(coord: Coord) -> Geographic {
    let r = Ellipsoid::Wgs84.semi_major();

    let lon = coord.x / r;
    let lat = 2.0 * (coord.y / r).exp().atan() - FRAC_PI_2;

    Geographic::new(lon, lat)
}
