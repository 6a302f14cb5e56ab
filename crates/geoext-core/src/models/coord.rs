//! Coordinate tuples and fixed-dimension coordinate sequences.

use serde::{Deserialize, Serialize};

use crate::error::{GeoextError, Result};

/// Coordinate axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Ordinate index of the axis (0, 1 or 2)
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    /// Axis for an ordinate index
    pub fn from_index(index: usize) -> Result<Self> {
        match index {
            0 => Ok(Axis::X),
            1 => Ok(Axis::Y),
            2 => Ok(Axis::Z),
            _ => Err(GeoextError::invalid_argument(format!(
                "ordinate index {} out of range, expected 0..=2",
                index
            ))),
        }
    }
}

/// A single coordinate tuple.
///
/// `z` is only meaningful when the owning sequence has a Z dimension; 2D
/// sequences keep it at 0.0.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coord {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Coord {
    pub fn xy(x: f64, y: f64) -> Self {
        Self { x, y, z: 0.0 }
    }

    pub fn xyz(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn get(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    pub fn set(&mut self, axis: Axis, value: f64) {
        match axis {
            Axis::X => self.x = value,
            Axis::Y => self.y = value,
            Axis::Z => self.z = value,
        }
    }
}

/// An ordered list of coordinates sharing one dimensionality (2 or 3).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CoordSeq {
    coords: Vec<Coord>,
    has_z: bool,
}

impl CoordSeq {
    /// Create an empty sequence
    pub fn new(has_z: bool) -> Self {
        Self { coords: Vec::new(), has_z }
    }

    pub fn with_capacity(capacity: usize, has_z: bool) -> Self {
        Self { coords: Vec::with_capacity(capacity), has_z }
    }

    /// Build a 2D sequence from `[x, y]` pairs
    pub fn from_xy(points: impl IntoIterator<Item = [f64; 2]>) -> Self {
        Self {
            coords: points.into_iter().map(|[x, y]| Coord::xy(x, y)).collect(),
            has_z: false,
        }
    }

    /// Build a 3D sequence from `[x, y, z]` triples
    pub fn from_xyz(points: impl IntoIterator<Item = [f64; 3]>) -> Self {
        Self {
            coords: points.into_iter().map(|[x, y, z]| Coord::xyz(x, y, z)).collect(),
            has_z: true,
        }
    }

    /// Build a sequence from rows of 2 or 3 ordinates.
    ///
    /// Every row must have the same arity as the first one.
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self> {
        let arity = rows.first().map(|r| r.as_ref().len()).unwrap_or(2);
        if arity != 2 && arity != 3 {
            return Err(GeoextError::invalid_argument(format!(
                "coordinates must have 2 or 3 ordinates, got {}",
                arity
            )));
        }

        let mut seq = Self::with_capacity(rows.len(), arity == 3);
        for (i, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != arity {
                return Err(GeoextError::invalid_argument(format!(
                    "coordinate {} has {} ordinates, expected {}",
                    i,
                    row.len(),
                    arity
                )));
            }
            let z = if arity == 3 { row[2] } else { 0.0 };
            seq.coords.push(Coord::xyz(row[0], row[1], z));
        }
        Ok(seq)
    }

    pub fn len(&self) -> usize {
        self.coords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    pub fn has_z(&self) -> bool {
        self.has_z
    }

    /// Number of ordinates per coordinate
    pub fn dimensions(&self) -> usize {
        if self.has_z {
            3
        } else {
            2
        }
    }

    pub fn coords(&self) -> &[Coord] {
        &self.coords
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Coord> {
        self.coords.iter()
    }

    pub(crate) fn coords_mut(&mut self) -> &mut [Coord] {
        &mut self.coords
    }

    /// Append a coordinate; its Z is dropped on a 2D sequence.
    pub fn push(&mut self, mut coord: Coord) {
        if !self.has_z {
            coord.z = 0.0;
        }
        self.coords.push(coord);
    }

    pub fn get(&self, index: usize) -> Option<&Coord> {
        self.coords.get(index)
    }

    pub fn get_x(&self, index: usize) -> Option<f64> {
        self.get_ordinate(index, Axis::X)
    }

    pub fn get_y(&self, index: usize) -> Option<f64> {
        self.get_ordinate(index, Axis::Y)
    }

    pub fn get_z(&self, index: usize) -> Option<f64> {
        self.get_ordinate(index, Axis::Z)
    }

    /// Read one ordinate. Z reads return `None` on a 2D sequence.
    pub fn get_ordinate(&self, index: usize, axis: Axis) -> Option<f64> {
        if axis == Axis::Z && !self.has_z {
            return None;
        }
        self.coords.get(index).map(|c| c.get(axis))
    }

    /// Overwrite one ordinate
    pub fn set_ordinate(&mut self, index: usize, axis: Axis, value: f64) -> Result<()> {
        if axis == Axis::Z && !self.has_z {
            return Err(GeoextError::invalid_argument("cannot set Z on a 2D coordinate sequence"));
        }
        let len = self.coords.len();
        let coord = self.coords.get_mut(index).ok_or_else(|| {
            GeoextError::invalid_argument(format!("index {} out of range for length {}", index, len))
        })?;
        coord.set(axis, value);
        Ok(())
    }

    /// Coordinates as `[x, y]` or `[x, y, z]` rows
    pub fn to_vec(&self) -> Vec<Vec<f64>> {
        self.coords
            .iter()
            .map(|c| if self.has_z { vec![c.x, c.y, c.z] } else { vec![c.x, c.y] })
            .collect()
    }

    /// Collapse runs of identical adjacent coordinates into one.
    pub(crate) fn dedup_consecutive(&mut self) {
        self.coords.dedup();
    }
}

impl FromIterator<[f64; 2]> for CoordSeq {
    fn from_iter<I: IntoIterator<Item = [f64; 2]>>(iter: I) -> Self {
        Self::from_xy(iter)
    }
}

impl<'a> IntoIterator for &'a CoordSeq {
    type Item = &'a Coord;
    type IntoIter = std::slice::Iter<'a, Coord>;

    fn into_iter(self) -> Self::IntoIter {
        self.coords.iter()
    }
}
