//! GeoRSS GML fragments (`<georss:where>`).
//!
//! Positions are written latitude first. The `georss` and `gml` namespaces
//! must be declared by the enclosing document. GeoRSS has no multi
//! geometries, so those are written as their envelope.

use crate::error::{GeoextError, Result};
use crate::formats::markup::Markup;
use crate::geo::extent::Extent;
use crate::models::{CoordSeq, Geometry, Shape};

/// `lat lng` pairs separated by spaces
fn pos_list(seq: &CoordSeq) -> String {
    seq.iter()
        .map(|c| format!("{} {}", c.y, c.x))
        .collect::<Vec<_>>()
        .join(" ")
}

fn write_simple(out: &mut Markup, shape: &Shape) -> Result<()> {
    match shape {
        Shape::Point(seq) => {
            out.start("gml:Point", None)?;
            out.element("gml:pos", &pos_list(seq))?;
            out.end("gml:Point")
        }
        Shape::LineString(seq) => {
            out.start("gml:LineString", None)?;
            out.element("gml:posList", &pos_list(seq))?;
            out.end("gml:LineString")
        }
        Shape::Polygon(polygon) => {
            out.start("gml:Polygon", None)?;
            out.start("gml:exterior", None)?;
            out.start("gml:LinearRing", None)?;
            out.element("gml:posList", &pos_list(polygon.exterior()))?;
            out.end("gml:LinearRing")?;
            out.end("gml:exterior")?;
            out.end("gml:Polygon")
        }
        multi => match multi.bounding_rect() {
            Some(rect) => write_simple(out, &rect.to_shape()),
            None => Err(empty_error(multi)),
        },
    }
}

fn empty_error(shape: &Shape) -> GeoextError {
    GeoextError::invalid_argument(format!("an empty {} has no GeoRSS form", shape.type_name()))
}

/// GeoRSS GML element for the geometry; empty geometries are rejected
pub fn to_georss(geom: &Geometry) -> Result<String> {
    if geom.is_empty() {
        return Err(empty_error(geom.shape()));
    }
    let mut out = Markup::new();
    out.start("georss:where", None)?;
    write_simple(&mut out, geom.shape())?;
    out.end("georss:where")?;
    out.finish()
}
