//! Geometry formats
//!
//! Readers and writers for WKT/EWKT, WKB/EWKB, GeoJSON, Google Maps JSON and
//! encoded polylines, KML and GeoRSS writers, plus [`reader::read`], which
//! sniffs an untyped input and dispatches to the matching parser.

pub mod geojson;
pub mod georss;
pub mod json;
pub mod kml;
mod markup;
pub mod polyline;
pub mod reader;
pub mod wkb;
pub mod wkt;

pub use self::geojson::{to_geojson, to_geojson_string, GeoJsonOptions};
pub use self::georss::to_georss;
pub use self::json::{as_json, JsonOptions};
pub use self::kml::{to_kml, AltitudeMode, KmlOptions};
pub use self::polyline::EncodedPolyline;
pub use self::wkb::{WkbReader, WkbWriter};
pub use self::wkt::{to_ewkt, to_wkt, WktReader, WktWriter};
