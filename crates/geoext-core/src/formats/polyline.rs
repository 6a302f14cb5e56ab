//! Google encoded polyline codec.
//!
//! Each value is a delta against the previous point, scaled by 1e5, zigzag
//! signed and written as 5-bit groups offset by 63 (`'?'`). Points are
//! `[lng, lat]` pairs; the wire order is lat then lng.

use serde::{Deserialize, Serialize};

use crate::error::{GeoextError, Result};
use crate::models::{CoordSeq, Geometry, Shape};

const FORMAT: &str = "polyline";
const SCALE: f64 = 1e5;
const CHAR_OFFSET: u8 = 63;
const CONTINUATION: u64 = 0x20;
/// Scaled ordinates stay below 2^61 so deltas and their zigzag form fit in an i64
const MAX_SCALED: f64 = (1u64 << 61) as f64;

/// Zoom level written for every point unless told otherwise
pub const DEFAULT_LEVEL: u32 = 3;

/// Encoded points plus one encoded zoom level per point
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedPolyline {
    pub points: String,
    pub levels: String,
}

/// Encode `[lng, lat]` pairs at a fixed zoom `level`.
///
/// Non-finite ordinates, or ones too large to scale into an `i64`, fail with
/// InvalidArgument.
pub fn encode(points: &[[f64; 2]], level: u32) -> Result<EncodedPolyline> {
    encode_iter(points.iter().copied(), level)
}

/// Encode the X/Y ordinates of a sequence
pub fn encode_seq(seq: &CoordSeq, level: u32) -> Result<EncodedPolyline> {
    encode_iter(seq.iter().map(|c| [c.x, c.y]), level)
}

/// Encode a Point or LineString geometry
pub fn encode_geometry(geom: &Geometry, level: u32) -> Result<EncodedPolyline> {
    match geom.shape() {
        Shape::Point(seq) | Shape::LineString(seq) => encode_seq(seq, level),
        other => Err(GeoextError::invalid_argument(format!(
            "only points and line strings can be polyline encoded, got {}",
            other.type_name()
        ))),
    }
}

fn scaled(value: f64) -> Result<i64> {
    let scaled = (value * SCALE).floor();
    if !scaled.is_finite() || scaled.abs() >= MAX_SCALED {
        return Err(GeoextError::invalid_argument(format!(
            "ordinate {} is out of range for polyline encoding",
            value
        )));
    }
    Ok(scaled as i64)
}

fn encode_iter(points: impl Iterator<Item = [f64; 2]>, level: u32) -> Result<EncodedPolyline> {
    let mut encoded = EncodedPolyline { points: String::new(), levels: String::new() };
    let (mut prev_lat, mut prev_lng) = (0i64, 0i64);

    for [lng, lat] in points {
        let lat_e5 = scaled(lat)?;
        let lng_e5 = scaled(lng)?;

        encode_signed(lat_e5 - prev_lat, &mut encoded.points);
        encode_signed(lng_e5 - prev_lng, &mut encoded.points);
        encode_unsigned(u64::from(level), &mut encoded.levels);

        prev_lat = lat_e5;
        prev_lng = lng_e5;
    }
    Ok(encoded)
}

fn encode_signed(n: i64, out: &mut String) {
    let shifted = n << 1;
    let zigzag = if n < 0 { !shifted } else { shifted };
    encode_unsigned(zigzag as u64, out);
}

fn encode_unsigned(mut n: u64, out: &mut String) {
    while n >= CONTINUATION {
        out.push(char::from((CONTINUATION | (n & 0x1f)) as u8 + CHAR_OFFSET));
        n >>= 5;
    }
    out.push(char::from(n as u8 + CHAR_OFFSET));
}

/// Decode an encoded points string into `[lng, lat]` pairs
pub fn decode(encoded: &str) -> Result<Vec<[f64; 2]>> {
    let bytes = encoded.as_bytes();
    let mut index = 0;
    let (mut lat, mut lng) = (0i64, 0i64);
    let mut points = Vec::new();

    while index < bytes.len() {
        lat = accumulate(lat, decode_signed(bytes, &mut index)?)?;
        lng = accumulate(lng, decode_signed(bytes, &mut index)?)?;
        points.push([lng as f64 / SCALE, lat as f64 / SCALE]);
    }
    Ok(points)
}

fn accumulate(total: i64, delta: i64) -> Result<i64> {
    total
        .checked_add(delta)
        .ok_or_else(|| GeoextError::unparseable(FORMAT, "value out of range"))
}

fn decode_signed(bytes: &[u8], index: &mut usize) -> Result<i64> {
    let mut result: u64 = 0;
    let mut shift = 0u32;
    loop {
        let byte = *bytes
            .get(*index)
            .ok_or_else(|| GeoextError::unparseable(FORMAT, "input ends inside a value"))?;
        if !(CHAR_OFFSET..=0x7E).contains(&byte) {
            return Err(GeoextError::unparseable(
                FORMAT,
                format!("byte 0x{:02X} at offset {} is out of range", byte, index),
            ));
        }
        if shift >= 64 {
            return Err(GeoextError::unparseable(FORMAT, "value is too long"));
        }
        *index += 1;

        let chunk = u64::from(byte - CHAR_OFFSET);
        result |= (chunk & 0x1f) << shift;
        shift += 5;
        if chunk < CONTINUATION {
            break;
        }
    }

    let value = (result >> 1) as i64;
    Ok(if result & 1 != 0 { !value } else { value })
}

#[cfg(test)]
mod tests {
    use super::*;

    const POINTS: [[f64; 2]; 3] = [[-120.2, 38.5], [-120.95, 40.7], [-126.453, 43.252]];

    #[test]
    fn test_encode_known_vector() {
        let encoded = encode(&POINTS, DEFAULT_LEVEL).unwrap();
        assert_eq!(encoded.points, "_p~iF~ps|U_ulLnnqC_mqNvxq`@");
        assert_eq!(encoded.levels, "BBB");
    }

    #[test]
    fn test_decode_known_vector() {
        let decoded = decode("_p~iF~ps|U_ulLnnqC_mqNvxq`@").unwrap();
        assert_eq!(decoded.len(), 3);
        for (got, want) in decoded.iter().zip(POINTS.iter()) {
            assert!((got[0] - want[0]).abs() < 1e-6);
            assert!((got[1] - want[1]).abs() < 1e-6);
        }
    }

    #[test]
    fn test_encode_line_string() {
        let geom = Geometry::new(Shape::line_string(POINTS));
        assert_eq!(encode_geometry(&geom, 3).unwrap(), encode(&POINTS, 3).unwrap());

        let polygon = Geometry::new(Shape::polygon(vec![vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]]));
        assert!(encode_geometry(&polygon, 3).is_err());
    }

    #[test]
    fn test_decode_empty() {
        assert!(decode("").unwrap().is_empty());
    }

    #[test]
    fn test_decode_truncated() {
        // Continuation bit set on the last byte
        assert!(matches!(decode("_"), Err(GeoextError::UnparseableInput { .. })));
        // Latitude present, longitude missing
        assert!(decode("_p~iF").is_err());
    }

    #[test]
    fn test_decode_overflowing_sum() {
        // Each value is close to i64::MAX, so the running sum overflows
        let huge = format!("{}^", "~".repeat(12));
        assert!(matches!(decode(&huge.repeat(4)), Err(GeoextError::UnparseableInput { .. })));
    }

    #[test]
    fn test_encode_out_of_range() {
        assert!(matches!(
            encode(&[[0.0, -1e300], [0.0, 1e300]], 3),
            Err(GeoextError::InvalidArgument { .. })
        ));
        assert!(encode(&[[f64::NAN, 0.0]], 3).is_err());
        assert!(encode(&[[0.0, f64::INFINITY]], 3).is_err());
        // Large projected values still encode
        let far = [[2.0e7, -2.0e7], [-2.0e7, 2.0e7]];
        let decoded = decode(&encode(&far, 3).unwrap().points).unwrap();
        assert_eq!(decoded, far.to_vec());
    }

    #[test]
    fn test_decode_bad_byte() {
        assert!(decode("_p~iF~ps|U\n").is_err());
        assert!(decode("é").is_err());
    }
}
