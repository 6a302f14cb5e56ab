//! WKT reading (via the `wkt` crate) and WKT/EWKT writing.

use std::fmt::Write as _;
use std::str::FromStr;

use ::wkt::types::{Coord as WktCoord, LineString as WktLineString, Polygon as WktPolygon};
use ::wkt::Wkt;

use crate::error::{GeoextError, Result};
use crate::models::{Coord, CoordSeq, Geometry, Polygon, Shape};

const FORMAT: &str = "WKT";

/// WKT reader. Measures (M) are dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct WktReader;

impl WktReader {
    /// Parse a WKT body; any `SRID=<n>;` prefix must already be stripped
    pub fn read(&self, text: &str) -> Result<Shape> {
        let parsed = Wkt::<f64>::from_str(text.trim())
            .map_err(|e| GeoextError::unparseable(FORMAT, e.to_string()))?;
        Ok(shape_from_wkt(&parsed))
    }
}

fn seq_from_coords(coords: &[WktCoord<f64>]) -> CoordSeq {
    let has_z = coords.first().is_some_and(|c| c.z.is_some());
    let mut seq = CoordSeq::with_capacity(coords.len(), has_z);
    for c in coords {
        seq.push(Coord::xyz(c.x, c.y, c.z.unwrap_or(0.0)));
    }
    seq
}

fn seq_from_line(line: &WktLineString<f64>) -> CoordSeq {
    seq_from_coords(&line.0)
}

fn polygon_from_wkt(polygon: &WktPolygon<f64>) -> Polygon {
    let mut rings = polygon.0.iter().map(seq_from_line);
    match rings.next() {
        Some(exterior) => Polygon::new(exterior, rings.collect()),
        None => Polygon::empty(false),
    }
}

fn shape_from_wkt(parsed: &Wkt<f64>) -> Shape {
    match parsed {
        Wkt::Point(point) => Shape::Point(seq_from_coords(point.0.as_slice())),
        Wkt::LineString(line) => Shape::LineString(seq_from_line(line)),
        Wkt::Polygon(polygon) => Shape::Polygon(polygon_from_wkt(polygon)),
        Wkt::MultiPoint(points) => Shape::MultiPoint(
            points.0.iter().map(|p| seq_from_coords(p.0.as_slice())).collect(),
        ),
        Wkt::MultiLineString(lines) => {
            Shape::MultiLineString(lines.0.iter().map(seq_from_line).collect())
        }
        Wkt::MultiPolygon(polygons) => {
            Shape::MultiPolygon(polygons.0.iter().map(polygon_from_wkt).collect())
        }
        Wkt::GeometryCollection(members) => {
            Shape::GeometryCollection(members.0.iter().map(shape_from_wkt).collect())
        }
    }
}

/// WKT writer producing `POINT (10 10.01)` style output.
#[derive(Debug, Clone, Copy, Default)]
pub struct WktWriter {
    /// Round ordinates to this many decimals
    pub precision: Option<usize>,
    /// Prefix `SRID=<n>;` when the geometry has a non-zero SRID
    pub include_srid: bool,
}

impl WktWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = Some(precision);
        self
    }

    /// EWKT output
    pub fn extended(mut self) -> Self {
        self.include_srid = true;
        self
    }

    pub fn write(&self, geom: &Geometry) -> String {
        let mut out = String::new();
        if self.include_srid && geom.srid() != 0 {
            let _ = write!(out, "SRID={};", geom.srid());
        }
        self.write_shape(&mut out, geom.shape());
        out
    }

    pub fn write_shape(&self, out: &mut String, shape: &Shape) {
        out.push_str(&shape.type_name().to_uppercase());
        if shape.has_z() {
            out.push_str(" Z");
        }
        if shape.is_empty() {
            out.push_str(" EMPTY");
            return;
        }
        out.push(' ');

        match shape {
            Shape::Point(seq) | Shape::LineString(seq) => self.write_seq(out, seq),
            Shape::Polygon(polygon) => self.write_polygon(out, polygon),
            Shape::MultiPoint(members) | Shape::MultiLineString(members) => {
                self.write_list(out, members, |w, out, seq| w.write_seq(out, seq))
            }
            Shape::MultiPolygon(members) => {
                self.write_list(out, members, |w, out, polygon| w.write_polygon(out, polygon))
            }
            Shape::GeometryCollection(members) => {
                self.write_list(out, members, |w, out, member| w.write_shape(out, member))
            }
        }
    }

    fn write_list<T>(&self, out: &mut String, items: &[T], mut each: impl FnMut(&Self, &mut String, &T)) {
        out.push('(');
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            each(self, out, item);
        }
        out.push(')');
    }

    fn write_polygon(&self, out: &mut String, polygon: &Polygon) {
        if polygon.is_empty() {
            out.push_str("EMPTY");
            return;
        }
        let rings: Vec<&CoordSeq> = polygon.rings().collect();
        self.write_list(out, &rings, |w, out, ring| w.write_seq(out, ring));
    }

    fn write_seq(&self, out: &mut String, seq: &CoordSeq) {
        if seq.is_empty() {
            out.push_str("EMPTY");
            return;
        }
        self.write_list(out, seq.coords(), |w, out, coord| {
            let _ = write!(out, "{} {}", w.number(coord.x), w.number(coord.y));
            if seq.has_z() {
                let _ = write!(out, " {}", w.number(coord.z));
            }
        });
    }

    fn number(&self, value: f64) -> String {
        let value = match self.precision {
            Some(precision) => {
                let scale = 10f64.powi(precision as i32);
                (value * scale).round() / scale
            }
            None => value,
        };
        // Avoid printing "-0"
        let value = if value == 0.0 { 0.0 } else { value };
        value.to_string()
    }
}

/// Shorthand for `WktWriter::new().write(geom)`
pub fn to_wkt(geom: &Geometry) -> String {
    WktWriter::new().write(geom)
}

/// Shorthand for EWKT output
pub fn to_ewkt(geom: &Geometry) -> String {
    WktWriter::new().extended().write(geom)
}
