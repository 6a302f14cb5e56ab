//! KML geometry fragments.
//!
//! The output is a bare geometry element (`<Point>`, `<LineString>`,
//! `<Polygon>`) ready to be placed inside a Placemark. Multi geometries and
//! collections become a `<MultiGeometry>` holding one element per member.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::formats::markup::Markup;
use crate::models::{CoordSeq, Geometry, Polygon, Shape};

/// How KML clients interpret Z values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AltitudeMode {
    ClampToGround,
    RelativeToGround,
    Absolute,
}

impl AltitudeMode {
    pub fn as_str(self) -> &'static str {
        match self {
            AltitudeMode::ClampToGround => "clampToGround",
            AltitudeMode::RelativeToGround => "relativeToGround",
            AltitudeMode::Absolute => "absolute",
        }
    }
}

/// Options for [`to_kml`]
#[derive(Debug, Clone, Default)]
pub struct KmlOptions {
    /// `id` attribute of the outermost element
    pub id: Option<String>,
    pub extrude: bool,
    /// Ignored for points
    pub tessellate: bool,
    pub altitude_mode: Option<AltitudeMode>,
    /// Write polygon holes as `innerBoundaryIs`
    pub interior_rings: bool,
}

/// `x,y[,z]` tuples separated by spaces
fn coordinates(seq: &CoordSeq) -> String {
    seq.iter()
        .map(|c| {
            if seq.has_z() {
                format!("{},{},{}", c.x, c.y, c.z)
            } else {
                format!("{},{}", c.x, c.y)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

struct KmlWriter<'a> {
    options: &'a KmlOptions,
    out: Markup,
}

impl KmlWriter<'_> {
    fn modifiers(&mut self, tessellate: bool) -> Result<()> {
        if self.options.extrude {
            self.out.element("extrude", "1")?;
        }
        if tessellate && self.options.tessellate {
            self.out.element("tessellate", "1")?;
        }
        if let Some(mode) = self.options.altitude_mode {
            self.out.element("altitudeMode", mode.as_str())?;
        }
        Ok(())
    }

    fn point(&mut self, seq: &CoordSeq, id: Option<&str>) -> Result<()> {
        self.out.start("Point", id)?;
        self.modifiers(false)?;
        self.out.element("coordinates", &coordinates(seq))?;
        self.out.end("Point")
    }

    fn line_string(&mut self, seq: &CoordSeq, id: Option<&str>) -> Result<()> {
        self.out.start("LineString", id)?;
        self.modifiers(true)?;
        self.out.element("coordinates", &coordinates(seq))?;
        self.out.end("LineString")
    }

    fn boundary(&mut self, name: &str, ring: &CoordSeq) -> Result<()> {
        self.out.start(name, None)?;
        self.out.start("LinearRing", None)?;
        self.out.element("coordinates", &coordinates(ring))?;
        self.out.end("LinearRing")?;
        self.out.end(name)
    }

    fn polygon(&mut self, polygon: &Polygon, id: Option<&str>) -> Result<()> {
        self.out.start("Polygon", id)?;
        self.modifiers(true)?;
        self.boundary("outerBoundaryIs", polygon.exterior())?;
        if self.options.interior_rings {
            for ring in polygon.interiors() {
                self.boundary("innerBoundaryIs", ring)?;
            }
        }
        self.out.end("Polygon")
    }

    fn shape(&mut self, shape: &Shape, id: Option<&str>) -> Result<()> {
        match shape {
            Shape::Point(seq) => self.point(seq, id),
            Shape::LineString(seq) => self.line_string(seq, id),
            Shape::Polygon(polygon) => self.polygon(polygon, id),
            Shape::MultiPoint(members) => {
                self.out.start("MultiGeometry", id)?;
                for seq in members {
                    self.point(seq, None)?;
                }
                self.out.end("MultiGeometry")
            }
            Shape::MultiLineString(members) => {
                self.out.start("MultiGeometry", id)?;
                for seq in members {
                    self.line_string(seq, None)?;
                }
                self.out.end("MultiGeometry")
            }
            Shape::MultiPolygon(members) => {
                self.out.start("MultiGeometry", id)?;
                for polygon in members {
                    self.polygon(polygon, None)?;
                }
                self.out.end("MultiGeometry")
            }
            Shape::GeometryCollection(members) => {
                self.out.start("MultiGeometry", id)?;
                for member in members {
                    self.shape(member, None)?;
                }
                self.out.end("MultiGeometry")
            }
        }
    }
}

/// KML element for the geometry
pub fn to_kml(geom: &Geometry, options: &KmlOptions) -> Result<String> {
    let mut writer = KmlWriter { options, out: Markup::new() };
    writer.shape(geom.shape(), options.id.as_deref())?;
    writer.out.finish()
}
