//! Catalogue explicite des CRS
//!
//! Résolution d'un identifiant en deux étapes :
//! 1. recherche primaire : identifiant autorité:code (`EPSG:27700`, URN OGC, URL opengis)
//! 2. repli documenté : table d'alias insensible à la casse (`bng`, `wgs84`, ...),
//!    puis code EPSG numérique nu (`27700`)
//!
//! Un code EPSG absent du catalogue n'est accepté qu'avec la feature `reproject`,
//! qui délègue alors la transformation à PROJ.

use std::collections::{BTreeMap, HashMap};
use std::sync::OnceLock;

use regex::Regex;

use super::transform::CoordTransform;
use super::{
    Crs, CrsDefinition, Datum, Ellipsoid, LambertConformalConic, Projection, TransverseMercator,
};
use crate::GeomappingError;

/// Alias intégrés (nom normalisé → code EPSG)
const BUILTIN_ALIASES: &[(&str, u32)] = &[
    ("wgs84", 4326),
    ("wgs 84", 4326),
    ("etrs89", 4258),
    ("rgf93", 4171),
    ("osgb36", 4277),
    ("web mercator", 3857),
    ("pseudo mercator", 3857),
    ("google", 3857),
    ("lambert93", 2154),
    ("lambert 93", 2154),
    ("lamb93", 2154),
    ("bng", 27700),
    ("british national grid", 27700),
    ("osgb36 british national grid", 27700),
];

fn identifier_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            r"^(?i)epsg:(\d+)$",
            r"^(?i)urn:ogc:def:crs:epsg:[^:]*:(\d+)$",
            r"^(?i)https?://www\.opengis\.net/def/crs/epsg/[^/]+/(\d+)$",
        ]
        .iter()
        .filter_map(|p| Regex::new(p).ok())
        .collect()
    })
}

fn crs84_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| {
            Regex::new(
                r"^(?i)(ogc:crs84|urn:ogc:def:crs:ogc:1\.3:crs84|https?://www\.opengis\.net/def/crs/ogc/1\.3/crs84)$",
            )
            .ok()
        })
        .as_ref()
}

/// Extrait le code EPSG d'un identifiant autorité:code
///
/// `OGC:CRS84` (ordre lon/lat) est rattaché à EPSG:4326, dont les axes sont
/// de toute façon manipulés en x = longitude, y = latitude.
pub fn parse_identifier(identifier: &str) -> Option<u32> {
    let identifier = identifier.trim();

    if crs84_pattern().is_some_and(|re| re.is_match(identifier)) {
        return Some(4326);
    }

    identifier_patterns()
        .iter()
        .find_map(|re| re.captures(identifier))
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Normalise un alias: minuscules, séparateurs `-`/`_` et espaces multiples réduits
fn normalize_alias(alias: &str) -> String {
    alias
        .to_lowercase()
        .replace(['-', '_', '/'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Catalogue des CRS connus
///
/// Valeur explicite passée au normaliseur : aucun état global.
#[derive(Debug, Clone, Default)]
pub struct CrsCatalog {
    definitions: BTreeMap<u32, CrsDefinition>,
    aliases: HashMap<String, u32>,
}

impl CrsCatalog {
    /// Catalogue vide (ni définitions ni alias)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Catalogue intégré
    pub fn builtin() -> Self {
        let mut catalog = Self::empty();

        catalog.insert(CrsDefinition::new(
            4326,
            "WGS 84",
            Datum::Wgs84,
            Projection::Geographic,
        ));
        catalog.insert(CrsDefinition::new(
            4258,
            "ETRS89",
            Datum::Wgs84,
            Projection::Geographic,
        ));
        catalog.insert(CrsDefinition::new(
            4171,
            "RGF93",
            Datum::Wgs84,
            Projection::Geographic,
        ));
        catalog.insert(CrsDefinition::new(
            4277,
            "OSGB36",
            Datum::Osgb36,
            Projection::Geographic,
        ));
        catalog.insert(CrsDefinition::new(
            3857,
            "WGS 84 / Pseudo-Mercator",
            Datum::Wgs84,
            Projection::WebMercator,
        ));
        catalog.insert(CrsDefinition::new(
            2154,
            "RGF93 / Lambert-93",
            Datum::Wgs84,
            Projection::LambertConformalConic(LambertConformalConic::lambert93()),
        ));
        catalog.insert(CrsDefinition::new(
            27700,
            "OSGB36 / British National Grid",
            Datum::Osgb36,
            Projection::TransverseMercator(TransverseMercator::british_national_grid()),
        ));

        for zone in 1..=60 {
            catalog.insert(CrsDefinition::new(
                32600 + zone,
                format!("WGS 84 / UTM zone {}N", zone),
                Datum::Wgs84,
                Projection::TransverseMercator(TransverseMercator::utm(
                    zone,
                    false,
                    Ellipsoid::Wgs84,
                )),
            ));
            catalog.insert(CrsDefinition::new(
                32700 + zone,
                format!("WGS 84 / UTM zone {}S", zone),
                Datum::Wgs84,
                Projection::TransverseMercator(TransverseMercator::utm(
                    zone,
                    true,
                    Ellipsoid::Wgs84,
                )),
            ));
        }

        for zone in 28..=38 {
            catalog.insert(CrsDefinition::new(
                25800 + zone,
                format!("ETRS89 / UTM zone {}N", zone),
                Datum::Wgs84,
                Projection::TransverseMercator(TransverseMercator::utm(
                    zone,
                    false,
                    Ellipsoid::Grs80,
                )),
            ));
        }

        for &(alias, code) in BUILTIN_ALIASES {
            catalog.aliases.insert(alias.to_string(), code);
        }

        catalog
    }

    /// Ajoute ou remplace une définition
    pub fn insert(&mut self, definition: CrsDefinition) {
        self.definitions.insert(definition.code, definition);
    }

    /// Ajoute un alias vers un identifiant autorité:code
    pub fn add_alias(&mut self, alias: &str, identifier: &str) -> Result<(), GeomappingError> {
        let code = parse_identifier(identifier)
            .or_else(|| identifier.trim().parse().ok())
            .ok_or_else(|| {
                GeomappingError::crs_resolution(format!(
                    "alias '{}' points to an invalid identifier '{}'",
                    alias, identifier
                ))
            })?;
        self.aliases.insert(normalize_alias(alias), code);
        Ok(())
    }

    /// Définition d'un code EPSG
    pub fn get(&self, code: u32) -> Option<&CrsDefinition> {
        self.definitions.get(&code)
    }

    /// Définitions triées par code
    pub fn definitions(&self) -> impl Iterator<Item = &CrsDefinition> {
        self.definitions.values()
    }

    /// Alias triés par nom
    pub fn aliases(&self) -> Vec<(&str, u32)> {
        let mut aliases: Vec<_> = self
            .aliases
            .iter()
            .map(|(alias, &code)| (alias.as_str(), code))
            .collect();
        aliases.sort_unstable();
        aliases
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Résout un identifiant de CRS
    pub fn resolve(&self, identifier: &str) -> Result<Crs, GeomappingError> {
        // 1. Recherche primaire
        if let Some(code) = parse_identifier(identifier) {
            return self.lookup(code, identifier);
        }

        // 2. Repli: alias, puis code numérique nu
        let fallback = self
            .aliases
            .get(&normalize_alias(identifier))
            .copied()
            .or_else(|| identifier.trim().parse().ok());

        match fallback {
            Some(code) => {
                tracing::debug!(identifier, code, "CRS resolved through fallback lookup");
                self.lookup(code, identifier)
            }
            None => Err(GeomappingError::crs_resolution(format!(
                "unrecognized identifier '{}'",
                identifier
            ))),
        }
    }

    /// Résout le CRS d'une collection: le CRS déclaré prime sur celui de la source
    pub fn resolve_source(
        &self,
        declared: Option<&str>,
        source_metadata: Option<&str>,
    ) -> Result<Crs, GeomappingError> {
        match declared.or(source_metadata) {
            Some(identifier) => self.resolve(identifier),
            None => Err(GeomappingError::crs_resolution(
                "no CRS declared and none found in the source metadata",
            )),
        }
    }

    /// Construit la transformation source → cible
    pub fn transformer(&self, source: &Crs, target: &Crs) -> Result<CoordTransform, GeomappingError> {
        CoordTransform::new(source, target)
    }

    fn lookup(&self, code: u32, identifier: &str) -> Result<Crs, GeomappingError> {
        if let Some(definition) = self.definitions.get(&code) {
            return Ok(Crs {
                code,
                definition: Some(definition.clone()),
            });
        }

        if cfg!(feature = "reproject") {
            tracing::debug!(code, "CRS not in catalog, delegating to PROJ");
            return Ok(Crs {
                code,
                definition: None,
            });
        }

        Err(GeomappingError::crs_resolution(format!(
            "EPSG:{} ('{}') is not in the catalog. \
             Add it with a catalog file or build with the 'reproject' feature",
            code, identifier
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_identifier_forms() {
        assert_eq!(parse_identifier("EPSG:27700"), Some(27700));
        assert_eq!(parse_identifier("epsg:4326"), Some(4326));
        assert_eq!(parse_identifier(" EPSG:2154 "), Some(2154));
        assert_eq!(parse_identifier("urn:ogc:def:crs:EPSG::27700"), Some(27700));
        assert_eq!(parse_identifier("urn:ogc:def:crs:EPSG:6.18:3857"), Some(3857));
        assert_eq!(
            parse_identifier("http://www.opengis.net/def/crs/EPSG/0/32630"),
            Some(32630)
        );
        assert_eq!(parse_identifier("OGC:CRS84"), Some(4326));
        assert_eq!(parse_identifier("urn:ogc:def:crs:OGC:1.3:CRS84"), Some(4326));
        assert_eq!(parse_identifier("bng"), None);
        assert_eq!(parse_identifier("EPSG:"), None);
    }

    #[test]
    fn test_resolve_primary() {
        let catalog = CrsCatalog::builtin();
        let crs = catalog.resolve("epsg:27700").unwrap();

        assert_eq!(crs.code, 27700);
        assert_eq!(crs.identifier(), "EPSG:27700");
        assert_eq!(crs.name(), "OSGB36 / British National Grid");
    }

    #[test]
    fn test_resolve_fallback_alias() {
        let catalog = CrsCatalog::builtin();

        assert_eq!(catalog.resolve("British National Grid").unwrap().code, 27700);
        assert_eq!(catalog.resolve("Web-Mercator").unwrap().code, 3857);
        assert_eq!(catalog.resolve("LAMB93").unwrap().code, 2154);
        assert_eq!(catalog.resolve("32631").unwrap().code, 32631);
    }

    #[test]
    fn test_resolve_unknown() {
        let catalog = CrsCatalog::builtin();
        let err = catalog.resolve("not a crs").unwrap_err();
        assert!(matches!(err, GeomappingError::CrsResolution(_)));
    }

    #[cfg(not(feature = "reproject"))]
    #[test]
    fn test_unknown_code_without_proj() {
        let catalog = CrsCatalog::builtin();
        let err = catalog.resolve("EPSG:2157").unwrap_err();
        assert!(err.to_string().contains("EPSG:2157"));
    }

    #[test]
    fn test_resolve_source_prefers_declared() {
        let catalog = CrsCatalog::builtin();

        let crs = catalog
            .resolve_source(Some("EPSG:3857"), Some("EPSG:4326"))
            .unwrap();
        assert_eq!(crs.code, 3857);

        let crs = catalog.resolve_source(None, Some("EPSG:4326")).unwrap();
        assert_eq!(crs.code, 4326);

        let err = catalog.resolve_source(None, None).unwrap_err();
        assert!(matches!(err, GeomappingError::CrsResolution(_)));
    }

    #[test]
    fn test_user_alias() {
        let mut catalog = CrsCatalog::builtin();
        catalog.add_alias("Grille UK", "EPSG:27700").unwrap();

        assert_eq!(catalog.resolve("grille  uk").unwrap().code, 27700);
        assert!(catalog.add_alias("broken", "nope").is_err());
    }

    #[test]
    fn test_builtin_utm_zones() {
        let catalog = CrsCatalog::builtin();

        assert_eq!(catalog.get(32601).unwrap().name, "WGS 84 / UTM zone 1N");
        assert_eq!(catalog.get(32760).unwrap().name, "WGS 84 / UTM zone 60S");
        assert_eq!(catalog.get(25831).unwrap().name, "ETRS89 / UTM zone 31N");
        assert!(catalog.get(32661).is_none());
    }
}
