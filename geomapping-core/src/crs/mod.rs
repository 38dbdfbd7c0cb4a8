//! Systèmes de coordonnées de référence (CRS)
//!
//! - `catalog` : catalogue explicite des CRS connus et résolution des identifiants
//! - `transform` : fonction de transformation pure source → cible
//!
//! La chaîne pure Rust passe toujours par les coordonnées géographiques :
//! source projetée → géographique (datum source) → Helmert si besoin →
//! géographique (datum cible) → cible projetée.
//!
//! Projections supportées sans PROJ :
//! - Géographique (degrés, ordre lon/lat)
//! - Web Mercator (EPSG:3857)
//! - Transverse Mercator (UTM, British National Grid)
//! - Lambert conique conforme 2SP (Lambert 93)

mod catalog;
mod datum;
mod ellipsoid;
mod lambert;
mod mercator;
#[cfg(feature = "reproject")]
mod proj_backend;
mod transform;
mod transverse_mercator;

pub use catalog::{parse_identifier, CrsCatalog};
pub use datum::Datum;
pub use ellipsoid::Ellipsoid;
pub use lambert::LambertConformalConic;
pub use transform::CoordTransform;
pub use transverse_mercator::TransverseMercator;

use geo::Coord;
use serde::{Deserialize, Serialize};

/// Point en coordonnées géographiques (radians)
#[derive(Debug, Clone, Copy)]
pub struct Geographic {
    /// Longitude en radians
    pub lon: f64,
    /// Latitude en radians
    pub lat: f64,
}

impl Geographic {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Convertit en degrés
    pub fn to_degrees(self) -> (f64, f64) {
        (self.lon.to_degrees(), self.lat.to_degrees())
    }

    /// Crée depuis des degrés
    pub fn from_degrees(lon_deg: f64, lat_deg: f64) -> Self {
        Self {
            lon: lon_deg.to_radians(),
            lat: lat_deg.to_radians(),
        }
    }
}

/// Projection cartographique d'un CRS
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Projection {
    /// Coordonnées géographiques en degrés (x = longitude, y = latitude)
    Geographic,
    WebMercator,
    TransverseMercator(TransverseMercator),
    LambertConformalConic(LambertConformalConic),
}

impl Projection {
    /// Coordonnée projetée → géographique
    pub fn to_geographic(&self, coord: Coord) -> Geographic {
        match self {
            Self::Geographic => Geographic::from_degrees(coord.x, coord.y),
            Self::WebMercator => mercator::web_mercator_to_geographic(coord),
            Self::TransverseMercator(tm) => tm.inverse(coord),
            Self::LambertConformalConic(lcc) => lcc.inverse(coord),
        }
    }

    /// Géographique → coordonnée projetée
    pub fn from_geographic(&self, geo: Geographic) -> Coord {
        match self {
            Self::Geographic => {
                let (x, y) = geo.to_degrees();
                Coord { x, y }
            }
            Self::WebMercator => mercator::geographic_to_web_mercator(geo),
            Self::TransverseMercator(tm) => tm.forward(geo),
            Self::LambertConformalConic(lcc) => lcc.forward(geo),
        }
    }
}

/// Définition d'un CRS du catalogue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrsDefinition {
    /// Code EPSG
    pub code: u32,

    /// Nom lisible
    pub name: String,

    /// Datum des coordonnées géographiques sous-jacentes
    #[serde(default)]
    pub datum: Datum,

    pub projection: Projection,
}

impl CrsDefinition {
    pub fn new(code: u32, name: impl Into<String>, datum: Datum, projection: Projection) -> Self {
        Self {
            code,
            name: name.into(),
            datum,
            projection,
        }
    }
}

/// CRS résolu par le catalogue
#[derive(Debug, Clone, PartialEq)]
pub struct Crs {
    /// Code EPSG
    pub code: u32,

    /// Définition pure Rust, absente si le CRS est délégué à PROJ
    pub definition: Option<CrsDefinition>,
}

impl Crs {
    /// Identifiant canonique (ex: "EPSG:27700")
    pub fn identifier(&self) -> String {
        format!("EPSG:{}", self.code)
    }

    /// Nom lisible, ou l'identifiant pour un CRS externe
    pub fn name(&self) -> String {
        self.definition
            .as_ref()
            .map(|d| d.name.clone())
            .unwrap_or_else(|| self.identifier())
    }
}

impl std::fmt::Display for Crs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.identifier())
    }
}
