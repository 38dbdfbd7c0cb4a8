//! Index spatial sur les boîtes englobantes
//!
//! Les candidats retournés peuvent contenir des faux positifs, jamais de faux
//! négatifs. Le filtrage exact est fait par le moteur d'intersection.

use geo::{BoundingRect, MultiPolygon};
use rstar::{RTree, RTreeObject, AABB};

/// Boîte englobante alignée sur les axes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Boîte vide : n'intersecte rien
    pub fn empty() -> Self {
        Self::new(f64::INFINITY, f64::INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY)
    }

    /// Boîte englobante d'une forme (vide si la forme est vide)
    pub fn of(shape: &MultiPolygon) -> Self {
        shape
            .bounding_rect()
            .map(|r| Self::new(r.min().x, r.min().y, r.max().x, r.max().y))
            .unwrap_or_else(Self::empty)
    }

    pub fn is_empty(&self) -> bool {
        !(self.min_x <= self.max_x && self.min_y <= self.max_y)
    }

    /// Intersection de rectangles fermés : un contact compte
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.min_x <= other.max_x
            && other.min_x <= self.max_x
            && self.min_y <= other.max_y
            && other.min_y <= self.max_y
    }

    fn envelope(&self) -> AABB<[f64; 2]> {
        AABB::from_corners([self.min_x, self.min_y], [self.max_x, self.max_y])
    }
}

/// Index spatial en lecture seule après construction
pub trait SpatialIndex {
    /// Construit l'index ; chaque boîte est identifiée par sa position
    fn build(boxes: &[BoundingBox]) -> Self
    where
        Self: Sized;

    /// Positions des boîtes stockées qui intersectent `query`, ordre quelconque
    fn query(&self, query: &BoundingBox) -> Vec<usize>;

    /// Nombre de boîtes fournies à la construction, vides comprises
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Entrée de l'arbre : boîte + position dans la collection
#[derive(Debug, Clone)]
struct IndexedBox {
    idx: usize,
    bbox: BoundingBox,
}

impl RTreeObject for IndexedBox {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.bbox.envelope()
    }
}

/// R*-tree chargé en bloc (`rstar`)
#[derive(Debug)]
pub struct RTreeIndex {
    rtree: RTree<IndexedBox>,
    len: usize,
}

impl SpatialIndex for RTreeIndex {
    fn build(boxes: &[BoundingBox]) -> Self {
        let entries = boxes
            .iter()
            .enumerate()
            .filter(|(_, b)| !b.is_empty())
            .map(|(idx, &bbox)| IndexedBox { idx, bbox })
            .collect();

        Self {
            rtree: RTree::bulk_load(entries),
            len: boxes.len(),
        }
    }

    fn query(&self, query: &BoundingBox) -> Vec<usize> {
        if query.is_empty() {
            return Vec::new();
        }

        self.rtree
            .locate_in_envelope_intersecting(&query.envelope())
            .map(|entry| entry.idx)
            .collect()
    }

    fn len(&self) -> usize {
        self.len
    }
}
