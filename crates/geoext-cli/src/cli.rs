use clap::{Parser, Subcommand, ValueEnum};
use geoext_core::{InputKind, SridCopyPolicy};
use std::path::PathBuf;

/// Geoext - Geometry reading, snapping, transforms and polyline encoding
#[derive(Parser, Debug)]
#[command(name = "geoext")]
#[command(about = "Geometry reading, snapping, transforms and polyline encoding", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Path to a TOML configuration file
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// SRID handling for copy-producing operations
    #[arg(long, global = true, value_enum)]
    pub policy: Option<PolicyArg>,

    /// Decimal places used when writing WKT
    #[arg(long, global = true)]
    pub precision: Option<usize>,

    #[command(subcommand)]
    pub command: Commands,
}

/// SRID copy policy selection
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum PolicyArg {
    /// Results always get SRID 0
    Zero,
    /// Results keep the source SRID
    Lenient,
    /// Results keep the source SRID; mixed reference SRIDs are an error
    Strict,
}

impl From<PolicyArg> for SridCopyPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Zero => SridCopyPolicy::Zero,
            PolicyArg::Lenient => SridCopyPolicy::Lenient,
            PolicyArg::Strict => SridCopyPolicy::Strict,
        }
    }
}

/// Output notation for geometries
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GeometryFormat {
    Wkt,
    Ewkt,
    Wkb,
    Ewkb,
    Geojson,
    /// Google Maps flavoured JSON
    Json,
    /// KML geometry element
    Kml,
    /// GeoRSS GML element
    Georss,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Read a geometry in any supported notation and print it
    Read(ReadArgs),

    /// Snap a geometry to a regular grid
    Snap(SnapArgs),

    /// Apply an affine transform to a geometry
    Transform(TransformArgs),

    /// Encode or decode Google polylines
    Polyline(PolylineArgs),

    /// Show the effective configuration and where each value came from
    Config,
}

#[derive(Parser, Debug)]
pub struct ReadArgs {
    /// Geometry text (WKT, EWKT, hex WKB, lat/lng, bounds, BOX) or "-" for stdin,
    /// which also accepts binary WKB
    pub input: String,

    /// Force the SRID of the result
    #[arg(long, allow_hyphen_values = true)]
    pub srid: Option<i32>,

    /// Lat/lng input is already ordered as x,y
    #[arg(long)]
    pub points: bool,

    /// Only accept these input kinds
    #[arg(long, value_delimiter = ',')]
    pub allowed: Option<Vec<InputKind>>,

    /// Reject these input kinds
    #[arg(long, value_delimiter = ',')]
    pub excluded: Vec<InputKind>,

    /// Output notation
    #[arg(long, value_enum, default_value = "ewkt")]
    pub format: GeometryFormat,
}

#[derive(Parser, Debug)]
pub struct SnapArgs {
    /// Geometry text or "-" for stdin
    pub input: String,

    /// Grid size for every axis
    #[arg(long, default_value = "1")]
    pub size: f64,

    /// Grid size for the X axis (overrides --size)
    #[arg(long)]
    pub size_x: Option<f64>,

    /// Grid size for the Y axis (overrides --size)
    #[arg(long)]
    pub size_y: Option<f64>,

    /// Grid size for the Z axis (overrides --size)
    #[arg(long)]
    pub size_z: Option<f64>,

    /// Grid origin as X,Y or X,Y,Z
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true, conflicts_with = "offset_geometry")]
    pub offset: Option<Vec<f64>>,

    /// Use the centroid of this geometry as the grid origin
    #[arg(long, value_name = "GEOMETRY")]
    pub offset_geometry: Option<String>,

    /// Output notation
    #[arg(long, value_enum, default_value = "ewkt")]
    pub format: GeometryFormat,
}

/// Affine operation selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TransformOp {
    Rotate,
    RotateX,
    RotateY,
    RotateZ,
    Scale,
    TransScale,
    Translate,
}

#[derive(Parser, Debug)]
pub struct TransformArgs {
    /// Geometry text or "-" for stdin
    pub input: String,

    /// Operation to apply
    #[arg(value_enum)]
    pub op: TransformOp,

    /// Operation arguments, either positional numbers or key=value pairs
    /// Example: geoext transform 'POINT (1 1)' scale 2 3
    /// Example: geoext transform 'POINT (1 1)' translate x=5 z=1
    #[arg(allow_hyphen_values = true, num_args = 0..)]
    pub args: Vec<String>,

    /// Rotation origin as X,Y
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true, conflicts_with = "origin_geometry")]
    pub origin: Option<Vec<f64>>,

    /// Rotate about the centroid of this geometry
    #[arg(long, value_name = "GEOMETRY")]
    pub origin_geometry: Option<String>,

    /// Output notation
    #[arg(long, value_enum, default_value = "ewkt")]
    pub format: GeometryFormat,
}

#[derive(Parser, Debug)]
pub struct PolylineArgs {
    #[command(subcommand)]
    pub command: PolylineCommands,
}

#[derive(Subcommand, Debug)]
pub enum PolylineCommands {
    /// Encode a point or line string
    Encode {
        /// Geometry text or "-" for stdin
        input: String,

        /// Zoom level written for every point
        #[arg(long)]
        level: Option<u32>,
    },

    /// Decode an encoded points string into lng/lat pairs
    Decode {
        /// Encoded points string
        encoded: String,
    },
}
