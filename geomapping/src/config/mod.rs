//! Configuration du catalogue de CRS
//!
//! Un fichier JSON (ou un preset embarqué) ajoute des définitions et des alias
//! au catalogue intégré :
//!
//! ```json
//! {
//!   "aliases": { "itm": "EPSG:2157" },
//!   "definitions": [
//!     { "code": 2157, "name": "IRENET95 / Irish Transverse Mercator", "datum": "wgs84",
//!       "projection": { "type": "transverse_mercator", "ellipsoid": "grs80", ... } }
//!   ]
//! }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use geomapping_core::{CrsCatalog, CrsDefinition};

/// Extension du catalogue de CRS
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct CatalogConfig {
    /// Alias (nom → identifiant autorité:code)
    #[serde(default)]
    pub aliases: BTreeMap<String, String>,

    /// Définitions supplémentaires (remplacent les intégrées de même code)
    #[serde(default)]
    pub definitions: Vec<CrsDefinition>,
}

impl CatalogConfig {
    /// Charge une configuration depuis un fichier
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read catalog file: {}", path.display()))?;

        serde_json::from_str(&content).context("Failed to parse catalog JSON")
    }

    /// Charge une configuration depuis un preset embarqué
    pub fn from_preset(preset: &str) -> Result<Self> {
        match preset {
            "france-cc" => Self::load_embedded(include_str!("presets/france-cc.json")),
            "ireland" => Self::load_embedded(include_str!("presets/ireland.json")),
            _ => anyhow::bail!("Unknown preset: {}. Use: france-cc, ireland", preset),
        }
    }

    /// Preset embarqué ou chemin vers un fichier JSON
    pub fn from_preset_or_path(source: &str) -> Result<Self> {
        let path = Path::new(source);
        if path.exists() {
            Self::load(path)
        } else {
            Self::from_preset(source)
        }
    }

    fn load_embedded(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse embedded catalog")
    }

    /// Ajoute définitions puis alias au catalogue
    pub fn apply(&self, catalog: &mut CrsCatalog) -> Result<()> {
        for definition in &self.definitions {
            debug!(code = definition.code, name = %definition.name, "Adding CRS definition");
            catalog.insert(definition.clone());
        }

        for (alias, identifier) in &self.aliases {
            catalog
                .add_alias(alias, identifier)
                .context(format!("Invalid alias '{}'", alias))?;
        }

        Ok(())
    }
}

/// Catalogue intégré, étendu par un fichier ou un preset si fourni
pub fn build_catalog(source: Option<&str>) -> Result<CrsCatalog> {
    let mut catalog = CrsCatalog::builtin();

    if let Some(source) = source {
        CatalogConfig::from_preset_or_path(source)?.apply(&mut catalog)?;
    }

    Ok(catalog)
}
