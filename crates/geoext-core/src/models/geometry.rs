//! Geometry model: shapes built from coordinate sequences, tagged with an SRID.

use serde::{Deserialize, Serialize};

use super::coord::{Coord, CoordSeq};

/// A polygon: one exterior ring and zero or more interior rings (holes).
///
/// An empty exterior ring means an empty polygon.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Polygon {
    exterior: CoordSeq,
    interiors: Vec<CoordSeq>,
}

impl Polygon {
    pub fn new(exterior: CoordSeq, interiors: Vec<CoordSeq>) -> Self {
        Self { exterior, interiors }
    }

    pub fn empty(has_z: bool) -> Self {
        Self { exterior: CoordSeq::new(has_z), interiors: Vec::new() }
    }

    pub fn exterior(&self) -> &CoordSeq {
        &self.exterior
    }

    pub fn interiors(&self) -> &[CoordSeq] {
        &self.interiors
    }

    pub fn num_interior_rings(&self) -> usize {
        self.interiors.len()
    }

    pub(crate) fn exterior_mut(&mut self) -> &mut CoordSeq {
        &mut self.exterior
    }

    pub(crate) fn interiors_mut(&mut self) -> &mut Vec<CoordSeq> {
        &mut self.interiors
    }

    pub fn is_empty(&self) -> bool {
        self.exterior.is_empty()
    }

    pub fn has_z(&self) -> bool {
        self.exterior.has_z()
    }

    /// All rings, exterior first
    pub fn rings(&self) -> impl Iterator<Item = &CoordSeq> {
        std::iter::once(&self.exterior).chain(self.interiors.iter())
    }
}

/// Geometry shapes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "coordinates")]
pub enum Shape {
    /// A point; an empty sequence is the empty point
    Point(CoordSeq),
    LineString(CoordSeq),
    Polygon(Polygon),
    /// Points of a multipoint, each a sequence of zero or one coordinate
    MultiPoint(Vec<CoordSeq>),
    MultiLineString(Vec<CoordSeq>),
    MultiPolygon(Vec<Polygon>),
    GeometryCollection(Vec<Shape>),
}

impl Shape {
    /// Create a 2D point
    pub fn point(x: f64, y: f64) -> Self {
        Shape::Point(CoordSeq::from_xy([[x, y]]))
    }

    /// Create a 3D point
    pub fn point_z(x: f64, y: f64, z: f64) -> Self {
        Shape::Point(CoordSeq::from_xyz([[x, y, z]]))
    }

    pub fn empty_point() -> Self {
        Shape::Point(CoordSeq::new(false))
    }

    /// Create a LineString from `[x, y]` pairs
    pub fn line_string(points: impl IntoIterator<Item = [f64; 2]>) -> Self {
        Shape::LineString(CoordSeq::from_xy(points))
    }

    /// Create a Polygon from rings of `[x, y]` pairs, exterior first
    pub fn polygon(rings: Vec<Vec<[f64; 2]>>) -> Self {
        let mut rings = rings.into_iter().map(CoordSeq::from_xy);
        let exterior = rings.next().unwrap_or_default();
        Shape::Polygon(Polygon::new(exterior, rings.collect()))
    }

    /// WKT-style type name, e.g. `"MultiPolygon"`
    pub fn type_name(&self) -> &'static str {
        match self {
            Shape::Point(_) => "Point",
            Shape::LineString(_) => "LineString",
            Shape::Polygon(_) => "Polygon",
            Shape::MultiPoint(_) => "MultiPoint",
            Shape::MultiLineString(_) => "MultiLineString",
            Shape::MultiPolygon(_) => "MultiPolygon",
            Shape::GeometryCollection(_) => "GeometryCollection",
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Shape::Point(seq) | Shape::LineString(seq) => seq.is_empty(),
            Shape::Polygon(polygon) => polygon.is_empty(),
            Shape::MultiPoint(members) | Shape::MultiLineString(members) => {
                members.iter().all(CoordSeq::is_empty)
            }
            Shape::MultiPolygon(members) => members.iter().all(Polygon::is_empty),
            Shape::GeometryCollection(members) => members.iter().all(Shape::is_empty),
        }
    }

    /// True if any coordinate sequence carries a Z dimension
    pub fn has_z(&self) -> bool {
        let mut has_z = false;
        self.visit_seqs(&mut |seq: &CoordSeq| has_z |= seq.has_z());
        has_z
    }

    /// The single coordinate of a non-empty Point
    pub fn as_coord(&self) -> Option<Coord> {
        match self {
            Shape::Point(seq) => seq.get(0).copied(),
            _ => None,
        }
    }

    /// Call `f` for every coordinate sequence in the shape, in order
    pub fn visit_seqs<F: FnMut(&CoordSeq)>(&self, f: &mut F) {
        match self {
            Shape::Point(seq) | Shape::LineString(seq) => f(seq),
            Shape::Polygon(polygon) => {
                for ring in polygon.rings() {
                    f(ring);
                }
            }
            Shape::MultiPoint(members) | Shape::MultiLineString(members) => {
                for seq in members {
                    f(seq);
                }
            }
            Shape::MultiPolygon(members) => {
                for ring in members.iter().flat_map(Polygon::rings) {
                    f(ring);
                }
            }
            Shape::GeometryCollection(members) => {
                for member in members {
                    member.visit_seqs(&mut *f);
                }
            }
        }
    }

    /// Mutable counterpart of [`Shape::visit_seqs`]
    pub fn visit_seqs_mut<F: FnMut(&mut CoordSeq)>(&mut self, f: &mut F) {
        match self {
            Shape::Point(seq) | Shape::LineString(seq) => f(seq),
            Shape::Polygon(polygon) => visit_polygon_mut(polygon, &mut *f),
            Shape::MultiPoint(members) | Shape::MultiLineString(members) => {
                for seq in members {
                    f(seq);
                }
            }
            Shape::MultiPolygon(members) => {
                for polygon in members {
                    visit_polygon_mut(polygon, &mut *f);
                }
            }
            Shape::GeometryCollection(members) => {
                for member in members {
                    member.visit_seqs_mut(&mut *f);
                }
            }
        }
    }
}

fn visit_polygon_mut<F: FnMut(&mut CoordSeq)>(polygon: &mut Polygon, f: &mut F) {
    f(polygon.exterior_mut());
    for ring in polygon.interiors_mut() {
        f(ring);
    }
}

/// A shape tagged with its spatial reference identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    shape: Shape,
    #[serde(default)]
    srid: i32,
}

impl Geometry {
    /// Wrap a shape with SRID 0
    pub fn new(shape: Shape) -> Self {
        Self { shape, srid: 0 }
    }

    pub fn with_srid(shape: Shape, srid: i32) -> Self {
        Self { shape, srid }
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn shape_mut(&mut self) -> &mut Shape {
        &mut self.shape
    }

    pub fn into_shape(self) -> Shape {
        self.shape
    }

    pub fn srid(&self) -> i32 {
        self.srid
    }

    pub fn set_srid(&mut self, srid: i32) {
        self.srid = srid;
    }

    pub fn is_empty(&self) -> bool {
        self.shape.is_empty()
    }

    pub fn has_z(&self) -> bool {
        self.shape.has_z()
    }

    pub fn type_name(&self) -> &'static str {
        self.shape.type_name()
    }

    /// Every coordinate as its own Point carrying this geometry's SRID, in
    /// the order the sequences are stored (polygon exteriors before holes)
    pub fn dump_points(&self) -> Vec<Geometry> {
        let mut points = Vec::new();
        self.shape.visit_seqs(&mut |seq: &CoordSeq| {
            for coord in seq {
                let mut point = CoordSeq::with_capacity(1, seq.has_z());
                point.push(*coord);
                points.push(Geometry::with_srid(Shape::Point(point), self.srid));
            }
        });
        points
    }
}

impl From<Shape> for Geometry {
    fn from(shape: Shape) -> Self {
        Geometry::new(shape)
    }
}
