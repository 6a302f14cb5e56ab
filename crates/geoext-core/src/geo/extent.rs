//! Per-axis extents, envelopes and envelope corners.

use crate::geo::convert::GeometryExt;
use crate::models::{Axis, Coord, CoordSeq, Geometry, Shape};

/// Axis-aligned bounding rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Rect {
    /// Build a rectangle from any two opposite corners
    pub fn from_corners(a: [f64; 2], b: [f64; 2]) -> Self {
        Self {
            min_x: a[0].min(b[0]),
            min_y: a[1].min(b[1]),
            max_x: a[0].max(b[0]),
            max_y: a[1].max(b[1]),
        }
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn lower_left(&self) -> [f64; 2] {
        [self.min_x, self.min_y]
    }

    pub fn lower_right(&self) -> [f64; 2] {
        [self.max_x, self.min_y]
    }

    pub fn upper_right(&self) -> [f64; 2] {
        [self.max_x, self.max_y]
    }

    pub fn upper_left(&self) -> [f64; 2] {
        [self.min_x, self.max_y]
    }

    /// The rectangle as a shape: a Point when it has no extent, a LineString
    /// when it is flat along one axis, otherwise a closed Polygon ring
    /// starting at the lower-left corner and running counter-clockwise.
    pub fn to_shape(&self) -> Shape {
        let flat_x = self.min_x == self.max_x;
        let flat_y = self.min_y == self.max_y;
        match (flat_x, flat_y) {
            (true, true) => Shape::point(self.min_x, self.min_y),
            (true, false) | (false, true) => {
                Shape::line_string([self.lower_left(), self.upper_right()])
            }
            (false, false) => Shape::polygon(vec![vec![
                self.lower_left(),
                self.lower_right(),
                self.upper_right(),
                self.upper_left(),
                self.lower_left(),
            ]]),
        }
    }
}

/// Min/max extraction per axis.
///
/// All accessors return `None` for empty input. The Z accessors also return
/// `None` when no coordinate sequence has a Z dimension.
pub trait Extent {
    /// Visit every coordinate sequence
    fn for_each_seq(&self, f: &mut dyn FnMut(&CoordSeq));

    fn axis_bound(&self, axis: Axis, pick: fn(f64, f64) -> f64) -> Option<f64> {
        let mut bound: Option<f64> = None;
        self.for_each_seq(&mut |seq| {
            if axis == Axis::Z && !seq.has_z() {
                return;
            }
            for coord in seq {
                let value = coord.get(axis);
                bound = Some(bound.map_or(value, |b| pick(b, value)));
            }
        });
        bound
    }

    fn x_min(&self) -> Option<f64> {
        self.axis_bound(Axis::X, f64::min)
    }

    fn x_max(&self) -> Option<f64> {
        self.axis_bound(Axis::X, f64::max)
    }

    fn y_min(&self) -> Option<f64> {
        self.axis_bound(Axis::Y, f64::min)
    }

    fn y_max(&self) -> Option<f64> {
        self.axis_bound(Axis::Y, f64::max)
    }

    fn z_min(&self) -> Option<f64> {
        self.axis_bound(Axis::Z, f64::min)
    }

    fn z_max(&self) -> Option<f64> {
        self.axis_bound(Axis::Z, f64::max)
    }

    /// 2D envelope
    fn bounding_rect(&self) -> Option<Rect> {
        Some(Rect {
            min_x: self.x_min()?,
            min_y: self.y_min()?,
            max_x: self.x_max()?,
            max_y: self.y_max()?,
        })
    }
}

impl Extent for CoordSeq {
    fn for_each_seq(&self, f: &mut dyn FnMut(&CoordSeq)) {
        f(self)
    }
}

impl Extent for Shape {
    fn for_each_seq(&self, f: &mut dyn FnMut(&CoordSeq)) {
        self.visit_seqs(&mut |seq: &CoordSeq| f(seq))
    }
}

impl Extent for Geometry {
    fn for_each_seq(&self, f: &mut dyn FnMut(&CoordSeq)) {
        self.shape().for_each_seq(f)
    }
}

impl Geometry {
    /// Envelope of the geometry as a geometry with the same SRID.
    ///
    /// Empty geometries yield an empty point.
    pub fn envelope_geometry(&self) -> Geometry {
        let shape = self.bounding_rect().map_or_else(Shape::empty_point, |rect| rect.to_shape());
        Geometry::with_srid(shape, self.srid())
    }

    /// Southwest corner of the envelope
    pub fn lower_left(&self) -> Option<[f64; 2]> {
        self.bounding_rect().map(|r| r.lower_left())
    }

    /// Southeast corner of the envelope
    pub fn lower_right(&self) -> Option<[f64; 2]> {
        self.bounding_rect().map(|r| r.lower_right())
    }

    /// Northeast corner of the envelope
    pub fn upper_right(&self) -> Option<[f64; 2]> {
        self.bounding_rect().map(|r| r.upper_right())
    }

    /// Northwest corner of the envelope
    pub fn upper_left(&self) -> Option<[f64; 2]> {
        self.bounding_rect().map(|r| r.upper_left())
    }

    /// Northern-most Y coordinate
    pub fn top(&self) -> Option<f64> {
        self.y_max()
    }

    /// Southern-most Y coordinate
    pub fn bottom(&self) -> Option<f64> {
        self.y_min()
    }

    /// Western-most X coordinate
    pub fn left(&self) -> Option<f64> {
        self.x_min()
    }

    /// Eastern-most X coordinate
    pub fn right(&self) -> Option<f64> {
        self.x_max()
    }

    /// Centroid as `[lat, lng]`
    pub fn lat_lng(&self) -> Option<[f64; 2]> {
        self.centroid_coord().map(|c| [c.y, c.x])
    }

    /// Centroid as `[lng, lat]`
    pub fn lng_lat(&self) -> Option<[f64; 2]> {
        self.centroid_coord().map(|c: Coord| [c.x, c.y])
    }

    /// Bounding box the way Flickr takes it: `west,south,east,north`.
    ///
    /// The southwest corner is floored and the northeast corner ceiled at
    /// `precision` decimals so the box never collapses to a point.
    pub fn to_flickr_bbox(&self, precision: i32) -> Option<String> {
        let rect = self.bounding_rect()?;
        let scale = 10f64.powi(precision);
        Some(format!(
            "{},{},{},{}",
            (rect.min_x * scale).floor() / scale,
            (rect.min_y * scale).floor() / scale,
            (rect.max_x * scale).ceil() / scale,
            (rect.max_y * scale).ceil() / scale,
        ))
    }
}
