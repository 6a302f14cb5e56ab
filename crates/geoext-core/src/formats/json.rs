//! Google Maps flavoured JSON: points as `lat`/`lng`, lines and polygon
//! rings as encoded polylines.

use std::collections::BTreeMap;

use serde_json::{json, Map, Value};

use crate::error::Result;
use crate::formats::polyline::{self, DEFAULT_LEVEL};
use crate::geo::extent::Extent;
use crate::models::{CoordSeq, Geometry, Polygon, Shape};

/// Options for [`as_json`]
#[derive(Debug, Clone)]
pub struct JsonOptions {
    /// Polyline-encode lines and rings instead of listing their points
    pub encoded: bool,
    /// Zoom level written into encoded polylines
    pub level: u32,
    /// Include polygon holes
    pub interior_rings: bool,
    /// Polygon style options; keys are camelized on output
    pub style_options: BTreeMap<String, Value>,
}

impl Default for JsonOptions {
    fn default() -> Self {
        Self {
            encoded: true,
            level: DEFAULT_LEVEL,
            interior_rings: false,
            style_options: BTreeMap::new(),
        }
    }
}

/// `fill_color` -> `fillColor`
fn camelize(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut upper = false;
    for ch in key.chars() {
        if ch == '_' {
            upper = true;
        } else if upper {
            out.extend(ch.to_uppercase());
            upper = false;
        } else {
            out.push(ch);
        }
    }
    out
}

fn point_json(seq: &CoordSeq) -> Value {
    match seq.get(0) {
        Some(c) if seq.has_z() => json!({"type": "point", "lat": c.y, "lng": c.x, "z": c.z}),
        Some(c) => json!({"type": "point", "lat": c.y, "lng": c.x}),
        None => Value::Null,
    }
}

fn line_json(seq: &CoordSeq, options: &JsonOptions) -> Result<Value> {
    Ok(if options.encoded {
        let encoded = polyline::encode_seq(seq, options.level)?;
        json!({
            "type": "lineString",
            "encoded": true,
            "points": encoded.points,
            "levels": encoded.levels,
        })
    } else {
        json!({"type": "lineString", "encoded": false, "points": seq.to_vec()})
    })
}

fn ring_json(ring: &CoordSeq, options: &JsonOptions) -> Result<Map<String, Value>> {
    let mut out = Map::new();
    if options.encoded {
        let encoded = polyline::encode_seq(ring, options.level)?;
        out.insert("points".into(), Value::String(encoded.points));
        out.insert("levels".into(), Value::String(encoded.levels));
    } else {
        out.insert("points".into(), json!(ring.to_vec()));
    }
    Ok(out)
}

fn polygon_json(polygon: &Polygon, options: &JsonOptions) -> Result<Value> {
    let mut exterior = ring_json(polygon.exterior(), options)?;
    if let Some(rect) = polygon.exterior().bounding_rect() {
        exterior.insert("bounds".into(), json!({"sw": rect.lower_left(), "ne": rect.upper_right()}));
    }

    let mut polylines = vec![Value::Object(exterior)];
    if options.interior_rings {
        for ring in polygon.interiors() {
            polylines.push(Value::Object(ring_json(ring, options)?));
        }
    }

    let mut out = json!({
        "type": "polygon",
        "encoded": options.encoded,
        "polylines": polylines,
    });
    if options.encoded {
        let style: Map<String, Value> = options
            .style_options
            .iter()
            .map(|(k, v)| (camelize(k), v.clone()))
            .collect();
        out["options"] = Value::Object(style);
    }
    Ok(out)
}

fn shape_json(shape: &Shape, options: &JsonOptions) -> Result<Value> {
    Ok(match shape {
        Shape::Point(seq) => point_json(seq),
        Shape::LineString(seq) => line_json(seq, options)?,
        Shape::Polygon(polygon) => polygon_json(polygon, options)?,
        Shape::MultiPoint(members) => Value::Array(members.iter().map(point_json).collect()),
        Shape::MultiLineString(members) => Value::Array(
            members
                .iter()
                .map(|seq| line_json(seq, options))
                .collect::<Result<_>>()?,
        ),
        Shape::MultiPolygon(members) => Value::Array(
            members
                .iter()
                .map(|p| polygon_json(p, options))
                .collect::<Result<_>>()?,
        ),
        Shape::GeometryCollection(members) => Value::Array(
            members
                .iter()
                .map(|m| shape_json(m, options))
                .collect::<Result<_>>()?,
        ),
    })
}

/// JSON value for Google Maps clients; collections become arrays.
///
/// Fails when an encoded line has ordinates outside the polyline range.
pub fn as_json(geom: &Geometry, options: &JsonOptions) -> Result<Value> {
    shape_json(geom.shape(), options)
}
