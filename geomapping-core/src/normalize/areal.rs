//! Conversion des géométries `geo` en multipolygones

use geo::{Geometry, MultiPolygon, Polygon};

use crate::GeomappingError;

/// Convertit une géométrie surfacique en `MultiPolygon`
///
/// Accepte Polygon, MultiPolygon, Rect, Triangle et les collections ne
/// contenant que des membres surfaciques. Points et lignes sont refusés.
pub fn to_multi_polygon(geometry: &Geometry) -> Result<MultiPolygon, GeomappingError> {
    let mut polygons = Vec::new();
    collect_polygons(geometry, &mut polygons)?;

    if polygons.iter().all(|p| p.exterior().0.is_empty()) {
        return Err(GeomappingError::transform("empty geometry"));
    }

    Ok(MultiPolygon::new(polygons))
}

fn collect_polygons(geometry: &Geometry, out: &mut Vec<Polygon>) -> Result<(), GeomappingError> {
    match geometry {
        Geometry::Polygon(p) => out.push(p.clone()),
        Geometry::MultiPolygon(mp) => out.extend(mp.0.iter().cloned()),
        Geometry::Rect(r) => out.push(r.to_polygon()),
        Geometry::Triangle(t) => out.push(t.to_polygon()),
        Geometry::GeometryCollection(gc) => {
            for member in gc.iter() {
                collect_polygons(member, out)?;
            }
        }
        other => {
            return Err(GeomappingError::transform(format!(
                "non-areal geometry: {}",
                geometry_type(other)
            )))
        }
    }
    Ok(())
}

fn geometry_type(geometry: &Geometry) -> &'static str {
    match geometry {
        Geometry::Point(_) => "Point",
        Geometry::Line(_) => "Line",
        Geometry::LineString(_) => "LineString",
        Geometry::Polygon(_) => "Polygon",
        Geometry::MultiPoint(_) => "MultiPoint",
        Geometry::MultiLineString(_) => "MultiLineString",
        Geometry::MultiPolygon(_) => "MultiPolygon",
        Geometry::GeometryCollection(_) => "GeometryCollection",
        Geometry::Rect(_) => "Rect",
        Geometry::Triangle(_) => "Triangle",
    }
}
