//! Geoext Core - Geometry model, coordinate transforms and format codecs
//!
//! This crate contains the coordinate-sequence transforms (grid snapping and
//! the affine family), the Google polyline codec, and the multi-format
//! geometry reader together with the WKT/WKB/GeoJSON writers.

pub mod config;
pub mod error;
pub mod formats;
pub mod geo;
pub mod models;

pub use error::{GeoextError, Result};
pub use formats::reader::{read, InputKind, ReadInput, ReadOptions};
pub use models::{Coord, CoordSeq, Geometry, Polygon, Shape, SridCopyPolicy};
