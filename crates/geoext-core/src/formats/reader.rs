//! Multi-format reader.
//!
//! [`read`] classifies an untyped input against an ordered list of
//! detectors and hands it to the first matching parser. Order matters: WKT
//! is tried before hex WKB, the lat/lng notations before BOX, and raw binary
//! WKB is the fallback for anything else.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{GeoextError, Result};
use crate::formats::{wkb, wkt::WktReader};
use crate::geo::Rect;
use crate::models::{Geometry, Shape};

/// Classification of a [`ReadInput`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputKind {
    /// An already parsed geometry
    Geometry,
    /// WKT or EWKT text
    Wkt,
    /// Hex encoded WKB or EWKB
    WkbHex,
    /// `((lat, lng), (lat, lng))` or `lat,lng,lat,lng`
    LatLngBounds,
    /// `(lat, lng)` or `lat,lng`
    LatLng,
    /// PostGIS `BOX(x y, x y)`
    Box2d,
    /// Raw WKB or EWKB bytes
    WkbBinary,
    /// No input at all
    Null,
}

impl InputKind {
    pub const ALL: [InputKind; 8] = [
        InputKind::Geometry,
        InputKind::Wkt,
        InputKind::WkbHex,
        InputKind::LatLngBounds,
        InputKind::LatLng,
        InputKind::Box2d,
        InputKind::WkbBinary,
        InputKind::Null,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            InputKind::Geometry => "geometry",
            InputKind::Wkt => "wkt",
            InputKind::WkbHex => "wkb_hex",
            InputKind::LatLngBounds => "lat_lng_bounds",
            InputKind::LatLng => "lat_lng",
            InputKind::Box2d => "box2d",
            InputKind::WkbBinary => "wkb_binary",
            InputKind::Null => "null",
        }
    }
}

impl fmt::Display for InputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for InputKind {
    type Err = GeoextError;

    fn from_str(s: &str) -> Result<Self> {
        InputKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                let names: Vec<&str> = InputKind::ALL.iter().map(InputKind::name).collect();
                GeoextError::invalid_argument(format!(
                    "unknown input kind '{}', expected one of: {}",
                    s,
                    names.join(", ")
                ))
            })
    }
}

/// Untyped input to [`read`]
#[derive(Debug, Clone)]
pub enum ReadInput<'a> {
    Geometry(Geometry),
    Text(&'a str),
    /// Bytes are sniffed as text when they are valid UTF-8, otherwise read as binary WKB
    Bytes(&'a [u8]),
    Null,
}

impl<'a> From<&'a str> for ReadInput<'a> {
    fn from(text: &'a str) -> Self {
        ReadInput::Text(text)
    }
}

impl<'a> From<&'a String> for ReadInput<'a> {
    fn from(text: &'a String) -> Self {
        ReadInput::Text(text.as_str())
    }
}

impl<'a> From<&'a [u8]> for ReadInput<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        ReadInput::Bytes(bytes)
    }
}

impl From<Geometry> for ReadInput<'_> {
    fn from(geom: Geometry) -> Self {
        ReadInput::Geometry(geom)
    }
}

impl<'a, T: Into<ReadInput<'a>>> From<Option<T>> for ReadInput<'a> {
    fn from(input: Option<T>) -> Self {
        input.map_or(ReadInput::Null, Into::into)
    }
}

/// Options for [`read`]
#[derive(Debug, Clone, Default)]
pub struct ReadOptions {
    /// Kinds accepted; `None` accepts every kind
    pub allowed: Option<Vec<InputKind>>,
    /// Kinds rejected even when allowed
    pub excluded: Vec<InputKind>,
    /// Force this SRID onto the result
    pub srid: Option<i32>,
    /// Lat/lng notations are already `x,y` ordered
    pub points: bool,
}

impl ReadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allowed(mut self, kinds: impl IntoIterator<Item = InputKind>) -> Self {
        self.allowed = Some(kinds.into_iter().collect());
        self
    }

    pub fn excluded(mut self, kinds: impl IntoIterator<Item = InputKind>) -> Self {
        self.excluded = kinds.into_iter().collect();
        self
    }

    pub fn srid(mut self, srid: i32) -> Self {
        self.srid = Some(srid);
        self
    }

    pub fn points(mut self, points: bool) -> Self {
        self.points = points;
        self
    }

    /// Whether `kind` survives the allowed/excluded filters
    pub fn permits(&self, kind: InputKind) -> bool {
        let allowed = self.allowed.as_ref().is_none_or(|kinds| kinds.contains(&kind));
        allowed && !self.excluded.contains(&kind)
    }

    fn check(&self, kind: InputKind) -> Result<()> {
        if self.permits(kind) {
            Ok(())
        } else {
            Err(GeoextError::FilteredType { detected: kind.name().to_string() })
        }
    }
}

const FLOAT: &str = r"-?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][-+]?\d+)?";

/// Compile a built-in pattern; `{F}` stands for a floating point number
fn pattern(template: &str) -> Regex {
    Regex::new(&template.replace("{F}", FLOAT)).expect("built-in pattern is valid")
}

static WKT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"(?is)^\s*(?:SRID=(-?\d+);)?\s*([PLMCG].*)$"));

static HEX_PATTERN: LazyLock<Regex> = LazyLock::new(|| pattern(r"^[A-Fa-f0-9\s]+$"));

static BOUNDS_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    pattern(r"^\s*\(\s*\(\s*({F})\s*,\s*({F})\s*\)\s*,\s*\(\s*({F})\s*,\s*({F})\s*\)\s*\)\s*$")
});

static BOUNDS_URL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"^\s*({F})\s*,\s*({F})\s*,\s*({F})\s*,\s*({F})\s*$"));

static LAT_LNG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"^\s*\(\s*({F})\s*,\s*({F})\s*\)\s*$|^\s*({F})\s*,\s*({F})\s*$"));

static BOX_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"(?i)^\s*BOX\s*\(\s*({F})\s+({F})\s*,\s*({F})\s+({F})\s*\)\s*$"));

/// Every numeric capture of `caps`, in order
fn numbers(caps: &Captures<'_>) -> Result<Vec<f64>> {
    caps.iter()
        .skip(1)
        .flatten()
        .map(|m| {
            m.as_str()
                .parse::<f64>()
                .map_err(|e| GeoextError::unparseable("coordinates", format!("{}: {}", m.as_str(), e)))
        })
        .collect()
}

/// Order a `[lat, lng]` pair as `[x, y]` unless it already is
fn to_xy(pair: [f64; 2], options: &ReadOptions) -> [f64; 2] {
    if options.points {
        pair
    } else {
        [pair[1], pair[0]]
    }
}

fn parse_wkt(text: &str, _options: &ReadOptions) -> Result<Geometry> {
    let caps = WKT_PATTERN
        .captures(text)
        .ok_or_else(|| GeoextError::unparseable("WKT", "not a WKT string"))?;
    let srid = match caps.get(1) {
        Some(m) => m
            .as_str()
            .parse::<i32>()
            .map_err(|e| GeoextError::unparseable("WKT", format!("bad SRID: {}", e)))?,
        None => 0,
    };
    let body = caps.get(2).map_or("", |m| m.as_str());
    Ok(Geometry::with_srid(WktReader.read(body)?, srid))
}

fn parse_wkb_hex(text: &str, _options: &ReadOptions) -> Result<Geometry> {
    wkb::read_hex(text)
}

fn parse_corners(caps: Option<Captures<'_>>, options: &ReadOptions, flip: bool) -> Result<Geometry> {
    let caps = caps.ok_or_else(|| GeoextError::unparseable("bounds", "expected two corners"))?;
    let n = numbers(&caps)?;
    let (a, b) = if flip {
        (to_xy([n[0], n[1]], options), to_xy([n[2], n[3]], options))
    } else {
        ([n[0], n[1]], [n[2], n[3]])
    };
    Ok(Geometry::new(Rect::from_corners(a, b).to_shape()))
}

fn parse_lat_lng_bounds(text: &str, options: &ReadOptions) -> Result<Geometry> {
    let caps = BOUNDS_PATTERN.captures(text).or_else(|| BOUNDS_URL_PATTERN.captures(text));
    parse_corners(caps, options, true)
}

fn parse_lat_lng(text: &str, options: &ReadOptions) -> Result<Geometry> {
    let caps = LAT_LNG_PATTERN
        .captures(text)
        .ok_or_else(|| GeoextError::unparseable("lat/lng", "expected a coordinate pair"))?;
    let n = numbers(&caps)?;
    let [x, y] = to_xy([n[0], n[1]], options);
    Ok(Geometry::new(Shape::point(x, y)))
}

fn parse_box2d(text: &str, options: &ReadOptions) -> Result<Geometry> {
    parse_corners(BOX_PATTERN.captures(text), options, false)
}

fn parse_wkb_binary(text: &str, _options: &ReadOptions) -> Result<Geometry> {
    wkb::read_binary(text.as_bytes())
}

/// One entry of the detection cascade
struct Detector {
    kind: InputKind,
    detect: fn(&str) -> bool,
    parse: fn(&str, &ReadOptions) -> Result<Geometry>,
}

fn is_wkt(text: &str) -> bool {
    WKT_PATTERN.is_match(text)
}

fn is_wkb_hex(text: &str) -> bool {
    HEX_PATTERN.is_match(text)
}

fn is_lat_lng_bounds(text: &str) -> bool {
    BOUNDS_PATTERN.is_match(text) || BOUNDS_URL_PATTERN.is_match(text)
}

fn is_lat_lng(text: &str) -> bool {
    LAT_LNG_PATTERN.is_match(text)
}

fn is_box2d(text: &str) -> bool {
    BOX_PATTERN.is_match(text)
}

fn is_anything(_text: &str) -> bool {
    true
}

const DETECTORS: &[Detector] = &[
    Detector { kind: InputKind::Wkt, detect: is_wkt, parse: parse_wkt },
    Detector { kind: InputKind::WkbHex, detect: is_wkb_hex, parse: parse_wkb_hex },
    Detector { kind: InputKind::LatLngBounds, detect: is_lat_lng_bounds, parse: parse_lat_lng_bounds },
    Detector { kind: InputKind::LatLng, detect: is_lat_lng, parse: parse_lat_lng },
    Detector { kind: InputKind::Box2d, detect: is_box2d, parse: parse_box2d },
    Detector { kind: InputKind::WkbBinary, detect: is_anything, parse: parse_wkb_binary },
];

/// Classify text input; always succeeds since binary WKB is the fallback
pub fn sniff(text: &str) -> InputKind {
    DETECTORS
        .iter()
        .find(|d| (d.detect)(text))
        .map_or(InputKind::WkbBinary, |d| d.kind)
}

fn read_text(text: &str, options: &ReadOptions) -> Result<Geometry> {
    let detector = DETECTORS
        .iter()
        .find(|d| (d.detect)(text))
        .ok_or_else(|| GeoextError::unparseable("geometry", "unrecognised input"))?;
    debug!(kind = detector.kind.name(), len = text.len(), "Sniffed geometry input");
    options.check(detector.kind)?;
    (detector.parse)(text, options)
}

/// Read a geometry from any supported notation.
///
/// Null input yields `Ok(None)` unless `null` is filtered out. An explicit
/// `options.srid` replaces whatever SRID the input carried.
pub fn read<'a>(input: impl Into<ReadInput<'a>>, options: &ReadOptions) -> Result<Option<Geometry>> {
    let mut geom = match input.into() {
        ReadInput::Null => {
            options.check(InputKind::Null)?;
            return Ok(None);
        }
        ReadInput::Geometry(geom) => {
            options.check(InputKind::Geometry)?;
            geom
        }
        ReadInput::Text(text) => read_text(text, options)?,
        ReadInput::Bytes(bytes) => match std::str::from_utf8(bytes) {
            Ok(text) => read_text(text, options)?,
            Err(_) => {
                debug!(kind = InputKind::WkbBinary.name(), len = bytes.len(), "Sniffed geometry input");
                options.check(InputKind::WkbBinary)?;
                wkb::read_binary(bytes)?
            }
        },
    };

    if let Some(srid) = options.srid {
        geom.set_srid(srid);
    }
    Ok(Some(geom))
}
