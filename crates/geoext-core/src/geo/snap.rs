//! Grid snapping: quantize coordinates to a grid, then collapse adjacent
//! duplicate points.

use tracing::debug;

use crate::error::{GeoextError, Result};
use crate::geo::convert::GeometryExt;
use crate::models::{Coord, CoordSeq, Geometry, Polygon, Shape, SridCopyPolicy};

/// Minimum point count of a non-empty LineString
const MIN_LINE_POINTS: usize = 2;
/// Minimum point count of a non-empty Polygon ring
const MIN_RING_POINTS: usize = 4;

/// Per-axis grid sizes and offsets.
///
/// A size of 0 leaves that axis untouched, so the default grid only
/// collapses duplicate points.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GridSpec {
    pub size_x: f64,
    pub size_y: f64,
    pub size_z: f64,
    pub offset_x: f64,
    pub offset_y: f64,
    pub offset_z: f64,
    /// SRID of the geometry the offset was taken from
    pub reference_srid: Option<i32>,
}

impl GridSpec {
    /// Same grid size on every axis, no offset
    pub fn uniform(size: f64) -> Self {
        Self { size_x: size, size_y: size, size_z: size, ..Default::default() }
    }

    pub fn sizes(size_x: f64, size_y: f64, size_z: f64) -> Self {
        Self { size_x, size_y, size_z, ..Default::default() }
    }

    /// Shift the grid origin
    pub fn with_offset(mut self, offset: GridOffset<'_>) -> Result<Self> {
        let origin = offset.resolve()?;
        self.offset_x = origin.x;
        self.offset_y = origin.y;
        self.offset_z = origin.z;
        self.reference_srid = offset.reference_srid();
        Ok(self)
    }

    fn snap_coord(&self, coord: &mut Coord, has_z: bool) {
        coord.x = snap_value(coord.x, self.size_x, self.offset_x);
        coord.y = snap_value(coord.y, self.size_y, self.offset_y);
        if has_z {
            coord.z = snap_value(coord.z, self.size_z, self.offset_z);
        }
    }
}

fn snap_value(value: f64, size: f64, offset: f64) -> f64 {
    if size == 0.0 {
        value
    } else {
        ((value - offset) / size).round() * size + offset
    }
}

/// Where the grid origin comes from
#[derive(Debug, Clone, Copy)]
pub enum GridOffset<'a> {
    /// Explicit `[x, y, z]`
    Coord([f64; 3]),
    /// The centroid of another geometry; Z offset is 0
    Centroid(&'a Geometry),
}

impl GridOffset<'_> {
    pub fn resolve(&self) -> Result<Coord> {
        match self {
            GridOffset::Coord([x, y, z]) => Ok(Coord::xyz(*x, *y, *z)),
            GridOffset::Centroid(geom) => geom.centroid_coord().ok_or_else(|| {
                GeoextError::invalid_argument("cannot take a grid offset from an empty geometry")
            }),
        }
    }

    pub fn reference_srid(&self) -> Option<i32> {
        match self {
            GridOffset::Centroid(geom) => Some(geom.srid()),
            GridOffset::Coord(_) => None,
        }
    }
}

impl TryFrom<&[f64]> for GridOffset<'_> {
    type Error = GeoextError;

    fn try_from(args: &[f64]) -> Result<Self> {
        match *args {
            [x, y] => Ok(GridOffset::Coord([x, y, 0.0])),
            [x, y, z] => Ok(GridOffset::Coord([x, y, z])),
            _ => Err(GeoextError::invalid_argument(format!(
                "grid offset expects 2 or 3 ordinates, got {}",
                args.len()
            ))),
        }
    }
}

/// Snap to grid with in-place (`snap_to_grid_mut`) and copying variants.
pub trait SnapToGrid: Sized {
    /// Snap in place. On error `self` is left unchanged.
    fn snap_to_grid_mut(&mut self, spec: &GridSpec) -> Result<&mut Self>;

    /// Snap a copy, leaving `self` untouched
    fn snap_to_grid(&self, spec: &GridSpec, policy: SridCopyPolicy) -> Result<Self>;
}

impl SnapToGrid for CoordSeq {
    fn snap_to_grid_mut(&mut self, spec: &GridSpec) -> Result<&mut Self> {
        snap_in_place(self, spec);
        Ok(self)
    }

    fn snap_to_grid(&self, spec: &GridSpec, _policy: SridCopyPolicy) -> Result<Self> {
        Ok(snapped_seq(self, spec))
    }
}

fn snap_in_place(seq: &mut CoordSeq, spec: &GridSpec) {
    let has_z = seq.has_z();
    for coord in seq.coords_mut() {
        spec.snap_coord(coord, has_z);
    }
    seq.dedup_consecutive();
}

fn snapped_seq(seq: &CoordSeq, spec: &GridSpec) -> CoordSeq {
    let mut copy = seq.clone();
    snap_in_place(&mut copy, spec);
    copy
}

fn snapped_line(seq: &CoordSeq, spec: &GridSpec) -> Result<CoordSeq> {
    let line = snapped_seq(seq, spec);
    if line.len() == 1 {
        return Err(GeoextError::InvalidGeometryProduced {
            kind: "LineString",
            points: line.len(),
            minimum: MIN_LINE_POINTS,
        });
    }
    Ok(line)
}

fn snapped_polygon(polygon: &Polygon, spec: &GridSpec) -> Result<Polygon> {
    let exterior = snapped_seq(polygon.exterior(), spec);
    if exterior.is_empty() {
        return Ok(Polygon::empty(polygon.has_z()));
    }
    if exterior.len() < MIN_RING_POINTS {
        return Err(GeoextError::InvalidGeometryProduced {
            kind: "Polygon",
            points: exterior.len(),
            minimum: MIN_RING_POINTS,
        });
    }

    let mut interiors = Vec::with_capacity(polygon.num_interior_rings());
    for ring in polygon.interiors() {
        let ring = snapped_seq(ring, spec);
        if ring.len() < MIN_RING_POINTS {
            debug!(points = ring.len(), "Dropping collapsed interior ring");
            continue;
        }
        interiors.push(ring);
    }
    Ok(Polygon::new(exterior, interiors))
}

fn snapped_shape(shape: &Shape, spec: &GridSpec) -> Result<Shape> {
    Ok(match shape {
        Shape::Point(seq) => Shape::Point(snapped_seq(seq, spec)),
        Shape::LineString(seq) => Shape::LineString(snapped_line(seq, spec)?),
        Shape::Polygon(polygon) => Shape::Polygon(snapped_polygon(polygon, spec)?),
        Shape::MultiPoint(members) => {
            Shape::MultiPoint(members.iter().map(|seq| snapped_seq(seq, spec)).collect())
        }
        Shape::MultiLineString(members) => Shape::MultiLineString(
            members.iter().map(|seq| snapped_line(seq, spec)).collect::<Result<_>>()?,
        ),
        Shape::MultiPolygon(members) => Shape::MultiPolygon(
            members.iter().map(|p| snapped_polygon(p, spec)).collect::<Result<_>>()?,
        ),
        Shape::GeometryCollection(members) => Shape::GeometryCollection(
            members.iter().map(|m| snapped_shape(m, spec)).collect::<Result<_>>()?,
        ),
    })
}

impl SnapToGrid for Shape {
    fn snap_to_grid_mut(&mut self, spec: &GridSpec) -> Result<&mut Self> {
        *self = snapped_shape(self, spec)?;
        Ok(self)
    }

    fn snap_to_grid(&self, spec: &GridSpec, _policy: SridCopyPolicy) -> Result<Self> {
        snapped_shape(self, spec)
    }
}

impl SnapToGrid for Geometry {
    fn snap_to_grid_mut(&mut self, spec: &GridSpec) -> Result<&mut Self> {
        self.shape_mut().snap_to_grid_mut(spec)?;
        Ok(self)
    }

    fn snap_to_grid(&self, spec: &GridSpec, policy: SridCopyPolicy) -> Result<Self> {
        let srid = policy.resolve(self.srid(), spec.reference_srid)?;
        Ok(Geometry::with_srid(snapped_shape(self.shape(), spec)?, srid))
    }
}
