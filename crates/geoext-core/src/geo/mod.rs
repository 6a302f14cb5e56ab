//! Geo module for coordinate-sequence operations
//!
//! This module provides axis extents and envelopes, the bridge to the `geo`
//! crate (centroids), affine transforms and grid snapping.

pub mod affine;
pub mod convert;
pub mod extent;
pub mod snap;

// Re-export key types for convenience
pub use affine::{AffineCoefficients, AffineTransform, Origin, Scale, TransScale, Translate};
pub use convert::{to_geo_geometry, GeometryExt};
pub use extent::{Extent, Rect};
pub use snap::{GridOffset, GridSpec, SnapToGrid};
