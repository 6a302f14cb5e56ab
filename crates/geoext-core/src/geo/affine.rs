//! Affine transforms over coordinate sequences.
//!
//! Every named transform (rotate, scale, translate, ...) builds an
//! [`AffineCoefficients`] and hands it to [`AffineTransform::affine_mut`]:
//!
//! ```text
//! x' = afac*x + bfac*y + cfac*z + xoff
//! y' = dfac*x + efac*y + ffac*z + yoff
//! z' = gfac*x + hfac*y + ifac*z + zoff   (3D sequences only)
//! ```

use crate::error::{GeoextError, Result};
use crate::geo::convert::GeometryExt;
use crate::models::{Coord, CoordSeq, Geometry, Shape, SridCopyPolicy};

/// The nine factors and three offsets of a 3D affine map.
///
/// Unset factors are 0.0; use [`AffineCoefficients::identity`] as the base
/// for maps that should leave an axis alone.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AffineCoefficients {
    pub afac: f64,
    pub bfac: f64,
    pub cfac: f64,
    pub dfac: f64,
    pub efac: f64,
    pub ffac: f64,
    pub gfac: f64,
    pub hfac: f64,
    pub ifac: f64,
    pub xoff: f64,
    pub yoff: f64,
    pub zoff: f64,
}

impl AffineCoefficients {
    pub fn identity() -> Self {
        Self { afac: 1.0, efac: 1.0, ifac: 1.0, ..Default::default() }
    }

    /// 2D rotation by `radians` about `origin`
    pub fn rotate(radians: f64, origin: [f64; 2]) -> Self {
        let (sin, cos) = radians.sin_cos();
        let [ox, oy] = origin;
        Self {
            afac: cos,
            bfac: -sin,
            dfac: sin,
            efac: cos,
            ifac: 1.0,
            xoff: ox - cos * ox + sin * oy,
            yoff: oy - sin * ox - cos * oy,
            ..Default::default()
        }
    }

    /// Rotation about the X axis
    pub fn rotate_x(radians: f64) -> Self {
        let (sin, cos) = radians.sin_cos();
        Self { afac: 1.0, efac: cos, ffac: -sin, hfac: sin, ifac: cos, ..Default::default() }
    }

    /// Rotation about the Y axis
    pub fn rotate_y(radians: f64) -> Self {
        let (sin, cos) = radians.sin_cos();
        Self { afac: cos, cfac: sin, efac: 1.0, gfac: -sin, ifac: cos, ..Default::default() }
    }

    /// Rotation about the Z axis; the same as a 2D rotation about (0, 0)
    pub fn rotate_z(radians: f64) -> Self {
        Self::rotate(radians, [0.0, 0.0])
    }

    pub fn scale(scale: Scale) -> Self {
        Self { afac: scale.x, efac: scale.y, ifac: scale.z, ..Default::default() }
    }

    /// Scale X and Y after translating by the deltas; Z is untouched
    pub fn trans_scale(args: TransScale) -> Self {
        Self {
            afac: args.x_factor,
            efac: args.y_factor,
            ifac: 1.0,
            xoff: args.delta_x * args.x_factor,
            yoff: args.delta_y * args.y_factor,
            ..Default::default()
        }
    }

    pub fn translate(offset: Translate) -> Self {
        Self { xoff: offset.x, yoff: offset.y, zoff: offset.z, ..Self::identity() }
    }

    /// Apply to one coordinate. Z is read as 0 and left alone when `has_z` is false.
    pub fn apply(&self, coord: &mut Coord, has_z: bool) {
        let Coord { x, y, z } = *coord;
        let z = if has_z { z } else { 0.0 };
        coord.x = self.afac * x + self.bfac * y + self.cfac * z + self.xoff;
        coord.y = self.dfac * x + self.efac * y + self.ffac * z + self.yoff;
        if has_z {
            coord.z = self.gfac * x + self.hfac * y + self.ifac * z + self.zoff;
        }
    }
}

/// Split positional arguments, checking the arity
fn positional<'a>(name: &str, args: &'a [f64], min: usize, max: usize) -> Result<&'a [f64]> {
    if args.len() < min || args.len() > max {
        let expected = if min == max { min.to_string() } else { format!("{} to {}", min, max) };
        return Err(GeoextError::invalid_argument(format!(
            "{} expects {} numeric arguments, got {}",
            name,
            expected,
            args.len()
        )));
    }
    Ok(args)
}

fn unknown_key(name: &str, key: &str, known: &[&str]) -> GeoextError {
    GeoextError::invalid_argument(format!(
        "{} does not take '{}', expected one of: {}",
        name,
        key,
        known.join(", ")
    ))
}

/// Per-axis scale factors; unset factors are 1
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scale {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Default for Scale {
    fn default() -> Self {
        Self { x: 1.0, y: 1.0, z: 1.0 }
    }
}

impl Scale {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, ..Default::default() }
    }

    pub fn xyz(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Mapping form: any of `x`, `y`, `z`
    pub fn from_pairs<K: AsRef<str>>(pairs: impl IntoIterator<Item = (K, f64)>) -> Result<Self> {
        let mut scale = Self::default();
        for (key, value) in pairs {
            match key.as_ref() {
                "x" => scale.x = value,
                "y" => scale.y = value,
                "z" => scale.z = value,
                other => return Err(unknown_key("scale", other, &["x", "y", "z"])),
            }
        }
        Ok(scale)
    }
}

impl TryFrom<&[f64]> for Scale {
    type Error = GeoextError;

    fn try_from(args: &[f64]) -> Result<Self> {
        let args = positional("scale", args, 2, 3)?;
        Ok(Self { x: args[0], y: args[1], z: args.get(2).copied().unwrap_or(1.0) })
    }
}

/// Arguments of a translate-then-scale; factors default to 1
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransScale {
    pub delta_x: f64,
    pub delta_y: f64,
    pub x_factor: f64,
    pub y_factor: f64,
}

impl Default for TransScale {
    fn default() -> Self {
        Self { delta_x: 0.0, delta_y: 0.0, x_factor: 1.0, y_factor: 1.0 }
    }
}

impl TransScale {
    pub fn new(delta_x: f64, delta_y: f64, x_factor: f64, y_factor: f64) -> Self {
        Self { delta_x, delta_y, x_factor, y_factor }
    }

    /// Mapping form: any of `delta_x`, `delta_y`, `x_factor`, `y_factor`
    pub fn from_pairs<K: AsRef<str>>(pairs: impl IntoIterator<Item = (K, f64)>) -> Result<Self> {
        let mut args = Self::default();
        for (key, value) in pairs {
            match key.as_ref() {
                "delta_x" => args.delta_x = value,
                "delta_y" => args.delta_y = value,
                "x_factor" => args.x_factor = value,
                "y_factor" => args.y_factor = value,
                other => {
                    return Err(unknown_key(
                        "trans_scale",
                        other,
                        &["delta_x", "delta_y", "x_factor", "y_factor"],
                    ))
                }
            }
        }
        Ok(args)
    }
}

impl TryFrom<&[f64]> for TransScale {
    type Error = GeoextError;

    fn try_from(args: &[f64]) -> Result<Self> {
        let args = positional("trans_scale", args, 2, 4)?;
        Ok(Self {
            delta_x: args[0],
            delta_y: args[1],
            x_factor: args.get(2).copied().unwrap_or(1.0),
            y_factor: args.get(3).copied().unwrap_or(1.0),
        })
    }
}

/// Per-axis offsets; unset offsets are 0
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Translate {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Translate {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, z: 0.0 }
    }

    pub fn xyz(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Mapping form: any of `x`, `y`, `z`
    pub fn from_pairs<K: AsRef<str>>(pairs: impl IntoIterator<Item = (K, f64)>) -> Result<Self> {
        let mut offset = Self::default();
        for (key, value) in pairs {
            match key.as_ref() {
                "x" => offset.x = value,
                "y" => offset.y = value,
                "z" => offset.z = value,
                other => return Err(unknown_key("translate", other, &["x", "y", "z"])),
            }
        }
        Ok(offset)
    }
}

impl TryFrom<&[f64]> for Translate {
    type Error = GeoextError;

    fn try_from(args: &[f64]) -> Result<Self> {
        let args = positional("translate", args, 0, 3)?;
        let at = |i: usize| args.get(i).copied().unwrap_or(0.0);
        Ok(Self { x: at(0), y: at(1), z: at(2) })
    }
}

/// Rotation origin
#[derive(Debug, Clone, Copy, Default)]
pub enum Origin<'a> {
    /// (0, 0)
    #[default]
    Zero,
    /// An explicit `[x, y]`
    Coord([f64; 2]),
    /// The centroid of another geometry
    Centroid(&'a Geometry),
}

impl Origin<'_> {
    /// The origin as `[x, y]`
    pub fn resolve(&self) -> Result<[f64; 2]> {
        match self {
            Origin::Zero => Ok([0.0, 0.0]),
            Origin::Coord(xy) => Ok(*xy),
            Origin::Centroid(geom) => geom
                .centroid_coord()
                .map(|c| [c.x, c.y])
                .ok_or_else(|| GeoextError::invalid_argument("cannot rotate about an empty geometry")),
        }
    }

    /// SRID of the geometry the origin is taken from, if any
    pub fn reference_srid(&self) -> Option<i32> {
        match self {
            Origin::Centroid(geom) => Some(geom.srid()),
            _ => None,
        }
    }
}

impl TryFrom<&[f64]> for Origin<'_> {
    type Error = GeoextError;

    fn try_from(args: &[f64]) -> Result<Self> {
        let args = positional("rotation origin", args, 2, 2)?;
        Ok(Origin::Coord([args[0], args[1]]))
    }
}

/// Affine transforms with in-place (`*_mut`) and copying variants.
///
/// In-place variants mutate and return `self`. Copying variants leave
/// `self` untouched and run [`AffineTransform::transform_copy`] first, which
/// is where geometries apply their [`SridCopyPolicy`].
pub trait AffineTransform: Clone {
    /// Apply a general affine map in place
    fn affine_mut(&mut self, coeffs: &AffineCoefficients);

    /// Duplicate `self` as the target of a copying transform.
    ///
    /// `reference_srid` is the SRID of a geometry parameterising the
    /// transform, such as a rotation origin.
    fn transform_copy(&self, _policy: SridCopyPolicy, _reference_srid: Option<i32>) -> Result<Self> {
        Ok(self.clone())
    }

    fn affine(&self, coeffs: &AffineCoefficients, policy: SridCopyPolicy) -> Result<Self> {
        let mut copy = self.transform_copy(policy, None)?;
        copy.affine_mut(coeffs);
        Ok(copy)
    }

    fn rotate_mut(&mut self, radians: f64, origin: Origin<'_>) -> Result<&mut Self> {
        let coeffs = AffineCoefficients::rotate(radians, origin.resolve()?);
        self.affine_mut(&coeffs);
        Ok(self)
    }

    fn rotate(&self, radians: f64, origin: Origin<'_>, policy: SridCopyPolicy) -> Result<Self> {
        let coeffs = AffineCoefficients::rotate(radians, origin.resolve()?);
        let mut copy = self.transform_copy(policy, origin.reference_srid())?;
        copy.affine_mut(&coeffs);
        Ok(copy)
    }

    fn rotate_x_mut(&mut self, radians: f64) -> &mut Self {
        self.affine_mut(&AffineCoefficients::rotate_x(radians));
        self
    }

    fn rotate_x(&self, radians: f64, policy: SridCopyPolicy) -> Result<Self> {
        self.affine(&AffineCoefficients::rotate_x(radians), policy)
    }

    fn rotate_y_mut(&mut self, radians: f64) -> &mut Self {
        self.affine_mut(&AffineCoefficients::rotate_y(radians));
        self
    }

    fn rotate_y(&self, radians: f64, policy: SridCopyPolicy) -> Result<Self> {
        self.affine(&AffineCoefficients::rotate_y(radians), policy)
    }

    fn rotate_z_mut(&mut self, radians: f64) -> &mut Self {
        self.affine_mut(&AffineCoefficients::rotate_z(radians));
        self
    }

    fn rotate_z(&self, radians: f64, policy: SridCopyPolicy) -> Result<Self> {
        self.affine(&AffineCoefficients::rotate_z(radians), policy)
    }

    fn scale_mut(&mut self, scale: Scale) -> &mut Self {
        self.affine_mut(&AffineCoefficients::scale(scale));
        self
    }

    fn scale(&self, scale: Scale, policy: SridCopyPolicy) -> Result<Self> {
        self.affine(&AffineCoefficients::scale(scale), policy)
    }

    fn trans_scale_mut(&mut self, args: TransScale) -> &mut Self {
        self.affine_mut(&AffineCoefficients::trans_scale(args));
        self
    }

    fn trans_scale(&self, args: TransScale, policy: SridCopyPolicy) -> Result<Self> {
        self.affine(&AffineCoefficients::trans_scale(args), policy)
    }

    fn translate_mut(&mut self, offset: Translate) -> &mut Self {
        self.affine_mut(&AffineCoefficients::translate(offset));
        self
    }

    fn translate(&self, offset: Translate, policy: SridCopyPolicy) -> Result<Self> {
        self.affine(&AffineCoefficients::translate(offset), policy)
    }
}

impl AffineTransform for CoordSeq {
    fn affine_mut(&mut self, coeffs: &AffineCoefficients) {
        let has_z = self.has_z();
        for coord in self.coords_mut() {
            coeffs.apply(coord, has_z);
        }
    }
}

impl AffineTransform for Shape {
    fn affine_mut(&mut self, coeffs: &AffineCoefficients) {
        self.visit_seqs_mut(&mut |seq: &mut CoordSeq| seq.affine_mut(coeffs));
    }
}

impl AffineTransform for Geometry {
    fn affine_mut(&mut self, coeffs: &AffineCoefficients) {
        self.shape_mut().affine_mut(coeffs);
    }

    fn transform_copy(&self, policy: SridCopyPolicy, reference_srid: Option<i32>) -> Result<Self> {
        let srid = policy.resolve(self.srid(), reference_srid)?;
        Ok(Geometry::with_srid(self.shape().clone(), srid))
    }
}
