//! GeoJSON output built on the `geojson` crate.

use geojson::{Position, Value};

use crate::error::Result;
use crate::models::{CoordSeq, Geometry, Polygon, Shape};

/// GeoJSON output options
#[derive(Debug, Clone, Copy)]
pub struct GeoJsonOptions {
    /// Include polygon holes
    pub interior_rings: bool,
}

impl Default for GeoJsonOptions {
    fn default() -> Self {
        Self { interior_rings: true }
    }
}

fn positions(seq: &CoordSeq) -> Vec<Position> {
    seq.to_vec()
}

fn polygon_rings(polygon: &Polygon, options: &GeoJsonOptions) -> Vec<Vec<Position>> {
    if polygon.is_empty() {
        return Vec::new();
    }
    let mut rings = vec![positions(polygon.exterior())];
    if options.interior_rings {
        rings.extend(polygon.interiors().iter().map(positions));
    }
    rings
}

fn value_for(shape: &Shape, options: &GeoJsonOptions) -> Value {
    match shape {
        Shape::Point(seq) => Value::Point(seq.to_vec().into_iter().next().unwrap_or_default()),
        Shape::LineString(seq) => Value::LineString(positions(seq)),
        Shape::Polygon(polygon) => Value::Polygon(polygon_rings(polygon, options)),
        Shape::MultiPoint(members) => Value::MultiPoint(members.iter().flat_map(CoordSeq::to_vec).collect()),
        Shape::MultiLineString(members) => Value::MultiLineString(members.iter().map(positions).collect()),
        Shape::MultiPolygon(members) => {
            Value::MultiPolygon(members.iter().map(|p| polygon_rings(p, options)).collect())
        }
        Shape::GeometryCollection(members) => Value::GeometryCollection(
            members.iter().map(|m| geojson::Geometry::new(value_for(m, options))).collect(),
        ),
    }
}

/// Convert to a `geojson::Geometry`. The SRID is not carried.
pub fn to_geojson(geom: &Geometry, options: &GeoJsonOptions) -> geojson::Geometry {
    geojson::Geometry::new(value_for(geom.shape(), options))
}

/// Serialize as a GeoJSON string
pub fn to_geojson_string(geom: &Geometry, options: &GeoJsonOptions) -> Result<String> {
    serde_json::to_string(&to_geojson(geom, options)).map_err(|e| {
        crate::error::GeoextError::invalid_argument(format!("failed to serialize GeoJSON: {}", e))
    })
}
