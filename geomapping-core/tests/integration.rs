//! Tests d'intégration du pipeline de recouvrement

use approx::assert_relative_eq;
use geo::{polygon, Area, BooleanOps, Geometry, MultiPolygon, Polygon};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use geomapping_core::{
    find_intersections, overlay, Collection, CrsCatalog, Feature, GeomappingError,
    IntersectionRecord, OverlayOptions,
};

fn rect(x: f64, y: f64, w: f64, h: f64) -> Polygon {
    polygon![
        (x: x, y: y),
        (x: x + w, y: y),
        (x: x + w, y: y + h),
        (x: x, y: y + h),
    ]
}

fn square(x: f64, y: f64, size: f64) -> Polygon {
    rect(x, y, size, size)
}

fn collection(name: &str, crs: &str, polygons: Vec<Polygon>) -> Collection {
    let features = polygons
        .into_iter()
        .enumerate()
        .map(|(i, p)| {
            let mut properties = geomapping_core::Properties::new();
            properties.insert("id".to_string(), i.into());
            Feature::new(p, properties)
        })
        .collect();
    Collection::new(name, Some(crs.to_string()), features)
}

fn shapes(polygons: Vec<Polygon>) -> Vec<MultiPolygon> {
    polygons
        .into_iter()
        .map(|p| MultiPolygon::new(vec![p]))
        .collect()
}

fn bng() -> OverlayOptions {
    OverlayOptions::new("epsg:27700")
}

fn keys(records: &[IntersectionRecord]) -> Vec<(usize, usize)> {
    records
        .iter()
        .map(|r| (r.reference_index, r.query_index))
        .collect()
}

#[test]
fn test_two_overlapping_squares() {
    let catalog = CrsCatalog::builtin();
    let first = collection("a", "EPSG:27700", vec![square(0.0, 0.0, 10.0)]);
    let second = collection("b", "EPSG:27700", vec![square(5.0, 5.0, 10.0)]);

    let result = overlay(&catalog, &first, &second, &bng()).unwrap();

    assert_eq!(result.target_crs, "EPSG:27700");
    assert_eq!(keys(&result.records), vec![(0, 0)]);
    assert_relative_eq!(result.records[0].area, 25.0, max_relative = 1e-9);
    assert_relative_eq!(result.areas[0][0], 100.0);
    assert_relative_eq!(result.areas[1][0], 100.0);
}

#[test]
fn test_disjoint_squares() {
    let catalog = CrsCatalog::builtin();
    let first = collection("a", "EPSG:27700", vec![square(0.0, 0.0, 10.0)]);
    let second = collection("b", "EPSG:27700", vec![square(20.0, 20.0, 10.0)]);

    let result = overlay(&catalog, &first, &second, &bng()).unwrap();

    assert!(result.records.is_empty());
    assert_eq!(result.stats.candidates, 0);
    assert_eq!(result.areas, [vec![100.0], vec![100.0]]);
}

#[test]
fn test_small_squares_inside_large_one() {
    let catalog = CrsCatalog::builtin();
    let first = collection("large", "EPSG:27700", vec![square(0.0, 0.0, 100.0)]);
    let second = collection(
        "small",
        "EPSG:27700",
        vec![
            square(10.0, 10.0, 10.0),
            square(40.0, 40.0, 10.0),
            square(70.0, 70.0, 10.0),
        ],
    );

    let result = overlay(&catalog, &first, &second, &bng()).unwrap();

    // La seconde collection est indexée, les positions restent celles de l'appelant
    assert!(result.stats.swapped);
    assert_eq!(keys(&result.records), vec![(0, 0), (0, 1), (0, 2)]);
    for record in &result.records {
        assert_relative_eq!(record.area, 100.0, max_relative = 1e-9);
    }
}

#[test]
fn test_identity_reprojection_keeps_area() {
    let catalog = CrsCatalog::builtin();
    let first = collection("a", "EPSG:27700", vec![rect(530000.0, 180000.0, 250.0, 40.0)]);
    let second = collection("b", "EPSG:27700", vec![]);

    let result = overlay(&catalog, &first, &second, &bng()).unwrap();
    assert_eq!(result.areas[0], vec![10000.0]);
}

#[test]
fn test_mixed_crs_inputs() {
    let catalog = CrsCatalog::builtin();
    // Carré de 1 km autour de Trafalgar Square, en BNG
    let first = collection("bng", "EPSG:27700", vec![square(530000.0, 180000.0, 1000.0)]);
    // Emprise large en WGS 84 (lon/lat)
    let second = collection("wgs84", "OGC:CRS84", vec![rect(-0.2, 51.45, 0.15, 0.1)]);

    let result = overlay(&catalog, &first, &second, &bng()).unwrap();

    assert_eq!(result.source_crs, ["EPSG:27700".to_string(), "EPSG:4326".to_string()]);
    assert_eq!(result.records.len(), 1);
    // Le carré est entièrement contenu
    assert_relative_eq!(result.records[0].area, 1.0e6, max_relative = 1e-6);
}

#[test]
fn test_declared_crs_overrides_metadata() {
    let catalog = CrsCatalog::builtin();
    let first = collection("a", "EPSG:4326", vec![square(0.0, 0.0, 10.0)]);
    let second = collection("b", "EPSG:4326", vec![square(5.0, 5.0, 10.0)]);

    let options = bng()
        .with_first_crs("bng")
        .with_second_crs("urn:ogc:def:crs:EPSG::27700");
    let result = overlay(&catalog, &first, &second, &options).unwrap();

    assert_relative_eq!(result.records[0].area, 25.0, max_relative = 1e-9);
}

#[test]
fn test_unknown_target_crs() {
    let catalog = CrsCatalog::builtin();
    let first = collection("a", "EPSG:27700", vec![square(0.0, 0.0, 1.0)]);

    let err = overlay(&catalog, &first, &first, &OverlayOptions::new("not a crs")).unwrap_err();
    assert!(matches!(err, GeomappingError::CrsResolution(_)));
}

#[test]
fn test_missing_source_crs() {
    let catalog = CrsCatalog::builtin();
    let first = collection("a", "EPSG:27700", vec![square(0.0, 0.0, 1.0)]);
    let mut second = collection("b", "EPSG:27700", vec![square(0.0, 0.0, 1.0)]);
    second.crs = None;

    let err = overlay(&catalog, &first, &second, &bng()).unwrap_err();
    assert!(matches!(err, GeomappingError::CrsResolution(_)));
}

#[test]
fn test_bow_tie_repaired_during_overlay() {
    let catalog = CrsCatalog::builtin();
    let bow_tie = polygon![
        (x: 0.0, y: 0.0),
        (x: 2.0, y: 2.0),
        (x: 2.0, y: 0.0),
        (x: 0.0, y: 2.0),
    ];
    let first = collection("a", "EPSG:27700", vec![bow_tie]);
    let second = collection("b", "EPSG:27700", vec![square(0.0, 0.0, 2.0)]);

    let result = overlay(&catalog, &first, &second, &bng()).unwrap();

    assert_eq!(result.repaired, [1, 0]);
    assert_relative_eq!(result.records[0].area, 2.0, max_relative = 1e-9);
}

#[test]
fn test_non_areal_geometry_is_rejected() {
    let catalog = CrsCatalog::builtin();
    let mut first = collection("a", "EPSG:27700", vec![square(0.0, 0.0, 1.0)]);
    first.features.push(Feature::new(
        Geometry::Point(geo::point!(x: 0.5, y: 0.5)),
        Default::default(),
    ));
    let second = collection("b", "EPSG:27700", vec![square(0.0, 0.0, 1.0)]);

    let err = overlay(&catalog, &first, &second, &bng()).unwrap_err();
    assert!(matches!(
        err,
        GeomappingError::Transform {
            feature: Some(1),
            ..
        }
    ));
}

#[test]
fn test_zero_area_contacts_excluded() {
    let first = shapes(vec![square(0.0, 0.0, 1.0)]);
    let second = shapes(vec![
        // Arête commune
        square(1.0, 0.0, 1.0),
        // Sommet commun
        square(-1.0, -1.0, 1.0),
    ]);

    let set = find_intersections(&first, &second).unwrap();
    assert!(set.records.is_empty());
}

#[test]
fn test_empty_and_single_collections() {
    let one = shapes(vec![square(0.0, 0.0, 1.0)]);

    let set = find_intersections(&[], &[]).unwrap();
    assert!(set.records.is_empty());
    assert_eq!(set.stats.candidates, 0);

    let set = find_intersections(&one, &[]).unwrap();
    assert_eq!(set.stats.candidates, 0);

    let set = find_intersections(&one, &one).unwrap();
    assert_eq!(keys(&set.records), vec![(0, 0)]);
}

fn random_rects(rng: &mut StdRng, n: usize) -> Vec<Polygon> {
    (0..n)
        .map(|_| {
            let x = rng.random_range(0..200) as f64;
            let y = rng.random_range(0..200) as f64;
            let w = rng.random_range(1..20) as f64;
            let h = rng.random_range(1..20) as f64;
            rect(x, y, w, h)
        })
        .collect()
}

#[test]
fn test_no_false_negatives() {
    let mut rng = StdRng::seed_from_u64(7);
    let first = random_rects(&mut rng, 150);
    let mut second = random_rects(&mut rng, 100);

    // Recouvrements forcés
    for p in first.iter().take(20) {
        let start = p.exterior().0[0];
        second.push(rect(start.x + 0.5, start.y + 0.5, 3.0, 3.0));
    }

    let first = shapes(first);
    let second = shapes(second);

    let set = find_intersections(&first, &second).unwrap();

    let mut expected = Vec::new();
    for (i, a) in first.iter().enumerate() {
        for (j, b) in second.iter().enumerate() {
            if a.intersection(b).unsigned_area() > 0.0 {
                expected.push((i, j));
            }
        }
    }

    assert!(expected.len() >= 20);
    assert_eq!(keys(&set.records), expected);
}

#[test]
fn test_symmetry() {
    let mut rng = StdRng::seed_from_u64(11);
    let a = shapes(random_rects(&mut rng, 80));
    let b = shapes(random_rects(&mut rng, 60));

    let forward = find_intersections(&a, &b).unwrap();
    let backward = find_intersections(&b, &a).unwrap();

    let mut flipped: Vec<IntersectionRecord> =
        backward.records.iter().map(|r| r.flipped()).collect();
    flipped.sort_by_key(|r| (r.reference_index, r.query_index));

    assert_eq!(keys(&forward.records), keys(&flipped));
    for (x, y) in forward.records.iter().zip(&flipped) {
        assert_relative_eq!(x.area, y.area, max_relative = 1e-9);
    }
}

#[test]
fn test_reorder_transparency() {
    let mut rng = StdRng::seed_from_u64(23);
    let first = shapes(random_rects(&mut rng, 50));
    let second = shapes(random_rects(&mut rng, 70));

    let mut permutation: Vec<usize> = (0..second.len()).collect();
    permutation.shuffle(&mut rng);
    let permuted: Vec<MultiPolygon> = permutation.iter().map(|&k| second[k].clone()).collect();

    let original = find_intersections(&first, &second).unwrap();
    let reordered = find_intersections(&first, &permuted).unwrap();

    let mut mapped: Vec<IntersectionRecord> = reordered
        .records
        .iter()
        .map(|r| IntersectionRecord::new(r.reference_index, permutation[r.query_index], r.area))
        .collect();
    mapped.sort_by_key(|r| (r.reference_index, r.query_index));

    assert_eq!(keys(&original.records), keys(&mapped));
    for (x, y) in original.records.iter().zip(&mapped) {
        assert_relative_eq!(x.area, y.area, max_relative = 1e-9);
    }
}

#[test]
fn test_area_conservation() {
    // Partition de [0, 100]² en 100 carrés de 10
    let grid: Vec<Polygon> = (0..10)
        .flat_map(|i| (0..10).map(move |j| square(i as f64 * 10.0, j as f64 * 10.0, 10.0)))
        .collect();

    let mut rng = StdRng::seed_from_u64(3);
    let queries: Vec<Polygon> = (0..30)
        .map(|_| {
            let x = rng.random_range(0.0..70.0);
            let y = rng.random_range(0.0..70.0);
            rect(x, y, rng.random_range(1.0..30.0), rng.random_range(1.0..30.0))
        })
        .collect();

    let grid = shapes(grid);
    let queries = shapes(queries);
    let set = find_intersections(&grid, &queries).unwrap();

    for (j, query) in queries.iter().enumerate() {
        let covered: f64 = set
            .records
            .iter()
            .filter(|r| r.query_index == j)
            .map(|r| r.area)
            .sum();
        assert_relative_eq!(covered, query.unsigned_area(), max_relative = 1e-6);
    }
}
