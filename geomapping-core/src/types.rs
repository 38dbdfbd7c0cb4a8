//! Types de données pour le crate geomapping-core

use geo::{Geometry, MultiPolygon};
use serde::{Deserialize, Serialize};

/// Propriétés d'une feature (ordre d'origine conservé)
///
/// Les valeurs sont des scalaires JSON ; le coeur ne les interprète jamais.
pub type Properties = serde_json::Map<String, serde_json::Value>;

/// Une feature : géométrie + attributs
#[derive(Debug, Clone)]
pub struct Feature {
    /// Géométrie surfacique dans le CRS de la collection
    pub geometry: Geometry,

    /// Attributs de la feature (clé -> valeur)
    pub properties: Properties,
}

impl Feature {
    pub fn new(geometry: impl Into<Geometry>, properties: Properties) -> Self {
        Self {
            geometry: geometry.into(),
            properties,
        }
    }
}

/// Suite ordonnée de features partageant un même CRS source
#[derive(Debug, Clone, Default)]
pub struct Collection {
    /// Identifiant de la source (nom de fichier, ...)
    pub name: String,

    /// CRS déclaré par les métadonnées de la source, s'il existe
    pub crs: Option<String>,

    /// Features dans l'ordre de lecture
    pub features: Vec<Feature>,
}

impl Collection {
    pub fn new(name: impl Into<String>, crs: Option<String>, features: Vec<Feature>) -> Self {
        Self {
            name: name.into(),
            crs,
            features,
        }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

/// Collection reprojetée dans le CRS cible et réparée
#[derive(Debug, Clone)]
pub struct NormalizedCollection {
    /// CRS source effectivement utilisé (forme canonique, ex: "EPSG:4326")
    pub source_crs: String,

    /// Géométries dans le CRS cible, même ordre que la collection d'entrée
    pub shapes: Vec<MultiPolygon>,

    /// Nombre de géométries réparées par buffer nul
    pub repaired: usize,
}

/// Intersection d'aire non nulle entre deux formes
///
/// `reference_index` désigne toujours une position dans la *première* collection
/// fournie par l'appelant et `query_index` une position dans la seconde, quel que
/// soit le rôle interne (indexée / requête) choisi par le moteur.
///
/// Sérialisé comme un triplet `[reference_index, query_index, area]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(usize, usize, f64)", into = "(usize, usize, f64)")]
pub struct IntersectionRecord {
    pub reference_index: usize,
    pub query_index: usize,
    /// Aire en unités du CRS cible au carré
    pub area: f64,
}

impl IntersectionRecord {
    pub fn new(reference_index: usize, query_index: usize, area: f64) -> Self {
        Self {
            reference_index,
            query_index,
            area,
        }
    }

    /// Même intersection vue depuis l'autre collection
    pub fn flipped(self) -> Self {
        Self::new(self.query_index, self.reference_index, self.area)
    }
}

impl From<(usize, usize, f64)> for IntersectionRecord {
    fn from((reference_index, query_index, area): (usize, usize, f64)) -> Self {
        Self::new(reference_index, query_index, area)
    }
}

impl From<IntersectionRecord> for (usize, usize, f64) {
    fn from(r: IntersectionRecord) -> Self {
        (r.reference_index, r.query_index, r.area)
    }
}
