//! Moteur d'intersection
//!
//! La plus grande collection est indexée (référence), l'autre est parcourue
//! (requête) : une interrogation de l'index par forme de requête, puis un
//! filtrage exact par intersection booléenne. Seules les aires > 0 sont gardées.

use geo::{Area, BooleanOps, MultiPolygon};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

use crate::index::{BoundingBox, RTreeIndex, SpatialIndex};
use crate::types::IntersectionRecord;
use crate::GeomappingError;

/// Statistiques d'un calcul d'intersections
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct IntersectionStats {
    /// Taille de la collection indexée
    pub reference_len: usize,
    /// Taille de la collection parcourue
    pub query_len: usize,
    /// Vrai si la seconde collection a servi de référence
    pub swapped: bool,
    /// Paires candidates issues de l'index
    pub candidates: usize,
    /// Paires d'aire d'intersection non nulle
    pub intersecting: usize,
    /// Nombre total de paires possibles
    pub possible: usize,
}

impl IntersectionStats {
    /// Part des paires possibles qui s'intersectent, en pourcentage
    pub fn percentage(&self) -> f64 {
        if self.possible == 0 {
            0.0
        } else {
            100.0 * self.intersecting as f64 / self.possible as f64
        }
    }
}

/// Résultat du moteur
#[derive(Debug, Clone, Default)]
pub struct IntersectionSet {
    /// Triées par (reference_index, query_index), sans doublon
    pub records: Vec<IntersectionRecord>,
    pub stats: IntersectionStats,
}

/// Aire de chaque forme, dans l'ordre
pub fn shape_areas(shapes: &[MultiPolygon]) -> Vec<f64> {
    shapes.iter().map(|s| s.unsigned_area()).collect()
}

/// Intersections entre deux collections avec un `RTreeIndex`
pub fn find_intersections(
    first: &[MultiPolygon],
    second: &[MultiPolygon],
) -> Result<IntersectionSet, GeomappingError> {
    find_intersections_with::<RTreeIndex>(first, second)
}

/// Intersections entre deux collections avec l'index `I`
///
/// `reference_index` de chaque enregistrement désigne une position dans
/// `first`, `query_index` une position dans `second`.
pub fn find_intersections_with<I>(
    first: &[MultiPolygon],
    second: &[MultiPolygon],
) -> Result<IntersectionSet, GeomappingError>
where
    I: SpatialIndex + Sync,
{
    // À égalité, la première collection est la référence
    let swapped = second.len() > first.len();
    let (reference, query) = if swapped {
        (second, first)
    } else {
        (first, second)
    };

    let boxes: Vec<BoundingBox> = reference.iter().map(BoundingBox::of).collect();
    let index = I::build(&boxes);
    debug!(entries = index.len(), swapped, "Spatial index built");

    let per_query = query
        .par_iter()
        .enumerate()
        .map(|(q, shape)| {
            let candidates = index.query(&BoundingBox::of(shape));
            let mut found = Vec::new();

            for &r in &candidates {
                // Toujours first ∩ second, quel que soit le rôle
                let (a, b) = if swapped {
                    (shape, &reference[r])
                } else {
                    (&reference[r], shape)
                };
                let area = a.intersection(b).unsigned_area();

                if !area.is_finite() {
                    return Err(GeomappingError::GeometryInvalid {
                        feature: None,
                        reason: format!(
                            "non-finite intersection area between reference {} and query {}",
                            r, q
                        ),
                    });
                }

                if area > 0.0 {
                    let record = IntersectionRecord::new(r, q, area);
                    found.push(if swapped { record.flipped() } else { record });
                }
            }

            Ok((candidates.len(), found))
        })
        .collect::<Result<Vec<_>, GeomappingError>>()?;

    let candidates = per_query.iter().map(|(n, _)| n).sum();
    let mut records: Vec<IntersectionRecord> =
        per_query.into_iter().flat_map(|(_, found)| found).collect();

    records.sort_by_key(|r| (r.reference_index, r.query_index));
    records.dedup_by_key(|r| (r.reference_index, r.query_index));

    let stats = IntersectionStats {
        reference_len: reference.len(),
        query_len: query.len(),
        swapped,
        candidates,
        intersecting: records.len(),
        possible: first.len() * second.len(),
    };

    info!(
        candidates = stats.candidates,
        "identified {} of {} possible intersections ({:.2}%)",
        stats.intersecting,
        stats.possible,
        stats.percentage()
    );

    Ok(IntersectionSet { records, stats })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use geo::{polygon, Polygon};

    fn square(x: f64, y: f64, size: f64) -> MultiPolygon {
        let p: Polygon = polygon![
            (x: x, y: y),
            (x: x + size, y: y),
            (x: x + size, y: y + size),
            (x: x, y: y + size),
        ];
        MultiPolygon::new(vec![p])
    }

    #[test]
    fn test_overlapping_squares() {
        let first = vec![square(0.0, 0.0, 10.0)];
        let second = vec![square(5.0, 5.0, 10.0)];

        let set = find_intersections(&first, &second).unwrap();

        assert_eq!(set.records.len(), 1);
        assert_eq!(set.records[0].reference_index, 0);
        assert_eq!(set.records[0].query_index, 0);
        assert_relative_eq!(set.records[0].area, 25.0, epsilon = 1e-9);
    }

    #[test]
    fn test_swapped_roles_keep_caller_positions() {
        // La seconde collection est plus grande : elle devient la référence
        let first = vec![square(100.0, 100.0, 1.0)];
        let second = vec![
            square(0.0, 0.0, 1.0),
            square(50.0, 50.0, 1.0),
            square(99.5, 99.5, 1.0),
        ];

        let set = find_intersections(&first, &second).unwrap();

        assert!(set.stats.swapped);
        assert_eq!(set.stats.reference_len, 3);
        assert_eq!(set.records.len(), 1);
        assert_eq!(set.records[0].reference_index, 0);
        assert_eq!(set.records[0].query_index, 2);
        assert_relative_eq!(set.records[0].area, 0.25, epsilon = 1e-9);
    }

    #[test]
    fn test_tie_keeps_first_as_reference() {
        let first = vec![square(0.0, 0.0, 1.0)];
        let second = vec![square(0.5, 0.0, 1.0)];

        let set = find_intersections(&first, &second).unwrap();
        assert!(!set.stats.swapped);
        assert_eq!(set.stats.possible, 1);
    }

    #[test]
    fn test_touching_squares_are_excluded() {
        let first = vec![square(0.0, 0.0, 1.0)];
        // Arête commune puis sommet commun
        let second = vec![square(1.0, 0.0, 1.0), square(1.0, 1.0, 1.0)];

        let set = find_intersections(&first, &second).unwrap();

        assert_eq!(set.stats.candidates, 2);
        assert!(set.records.is_empty());
    }

    #[test]
    fn test_empty_collections() {
        let shapes = vec![square(0.0, 0.0, 1.0)];

        let set = find_intersections(&[], &shapes).unwrap();
        assert!(set.records.is_empty());
        assert_eq!(set.stats.candidates, 0);
        assert_eq!(set.stats.percentage(), 0.0);

        let set = find_intersections(&shapes, &[]).unwrap();
        assert!(set.records.is_empty());
    }

    #[test]
    fn test_records_sorted() {
        let first = vec![square(0.0, 0.0, 10.0), square(20.0, 0.0, 10.0)];
        let second = vec![square(25.0, 5.0, 1.0), square(5.0, 5.0, 1.0)];

        let set = find_intersections(&first, &second).unwrap();
        let keys: Vec<(usize, usize)> = set
            .records
            .iter()
            .map(|r| (r.reference_index, r.query_index))
            .collect();

        assert_eq!(keys, vec![(0, 1), (1, 0)]);
    }

    #[test]
    fn test_shape_areas() {
        let areas = shape_areas(&[square(0.0, 0.0, 10.0), square(0.0, 0.0, 2.0)]);
        assert_relative_eq!(areas[0], 100.0);
        assert_relative_eq!(areas[1], 4.0);
    }
}
