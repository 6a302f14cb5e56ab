//! Conversions to the `geo` crate, used for centroid computation.

use geo::algorithm::centroid::Centroid;
use geo::Geometry as GeoGeometry;

use crate::models::{Coord, CoordSeq, Geometry, Polygon, Shape};

fn to_geo_coords(seq: &CoordSeq) -> Vec<geo::Coord> {
    seq.iter().map(|c| geo::Coord { x: c.x, y: c.y }).collect()
}

fn to_geo_polygon(polygon: &Polygon) -> geo::Polygon {
    let exterior = geo::LineString::new(to_geo_coords(polygon.exterior()));
    let interiors = polygon
        .interiors()
        .iter()
        .map(|ring| geo::LineString::new(to_geo_coords(ring)))
        .collect();
    geo::Polygon::new(exterior, interiors)
}

/// Convert a shape to a 2D `geo::Geometry`; Z ordinates are dropped.
///
/// Empty points become empty multipoints since `geo` has no empty point.
pub fn to_geo_geometry(shape: &Shape) -> GeoGeometry {
    match shape {
        Shape::Point(seq) => match seq.get(0) {
            Some(c) => GeoGeometry::Point(geo::Point::new(c.x, c.y)),
            None => GeoGeometry::MultiPoint(geo::MultiPoint::new(vec![])),
        },
        Shape::LineString(seq) => GeoGeometry::LineString(geo::LineString::new(to_geo_coords(seq))),
        Shape::Polygon(polygon) => GeoGeometry::Polygon(to_geo_polygon(polygon)),
        Shape::MultiPoint(members) => {
            let points = members
                .iter()
                .filter_map(|seq| seq.get(0))
                .map(|c| geo::Point::new(c.x, c.y))
                .collect();
            GeoGeometry::MultiPoint(geo::MultiPoint::new(points))
        }
        Shape::MultiLineString(members) => {
            let lines = members.iter().map(|seq| geo::LineString::new(to_geo_coords(seq))).collect();
            GeoGeometry::MultiLineString(geo::MultiLineString::new(lines))
        }
        Shape::MultiPolygon(members) => {
            GeoGeometry::MultiPolygon(geo::MultiPolygon::new(members.iter().map(to_geo_polygon).collect()))
        }
        Shape::GeometryCollection(members) => {
            GeoGeometry::GeometryCollection(geo::GeometryCollection(
                members.iter().map(to_geo_geometry).collect(),
            ))
        }
    }
}

/// Extension trait for shapes with geo-crate operations
pub trait GeometryExt {
    /// Convert to geo::Geometry
    fn to_geo(&self) -> GeoGeometry;

    /// Get the 2D centroid; `None` for empty geometries
    fn centroid_coord(&self) -> Option<Coord> {
        self.to_geo().centroid().map(|p| Coord::xy(p.x(), p.y()))
    }
}

impl GeometryExt for Shape {
    fn to_geo(&self) -> GeoGeometry {
        to_geo_geometry(self)
    }
}

impl GeometryExt for Geometry {
    fn to_geo(&self) -> GeoGeometry {
        to_geo_geometry(self.shape())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centroid() {
        let geom = Shape::polygon(vec![vec![[0.0, 0.0], [2.0, 0.0], [2.0, 2.0], [0.0, 2.0], [0.0, 0.0]]]);
        let centroid = geom.centroid_coord().unwrap();
        assert!((centroid.x - 1.0).abs() < 1e-10);
        assert!((centroid.y - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_line_centroid() {
        let line = Shape::line_string([[0.0, 0.0], [1.0, 0.0]]);
        let centroid = line.centroid_coord().unwrap();
        assert!((centroid.x - 0.5).abs() < 1e-10);
        assert!(centroid.y.abs() < 1e-10);
    }

    #[test]
    fn test_empty_point_has_no_centroid() {
        assert!(Shape::empty_point().centroid_coord().is_none());
    }
}
