//! Integration tests for polyline encoding and Google Maps JSON output

use geoext_core::formats::polyline::{decode, encode, encode_geometry, DEFAULT_LEVEL};
use geoext_core::formats::{as_json, EncodedPolyline, JsonOptions};
use geoext_core::{read, Geometry, ReadOptions, Shape};
use proptest::prelude::*;

fn geom(wkt: &str) -> Geometry {
    read(wkt, &ReadOptions::new()).unwrap().unwrap()
}

#[test]
fn test_encode_parsed_line() {
    let line = geom("LINESTRING (-120.2 38.5, -120.95 40.7, -126.453 43.252)");
    let encoded = encode_geometry(&line, DEFAULT_LEVEL).unwrap();
    assert_eq!(
        encoded,
        EncodedPolyline {
            points: "_p~iF~ps|U_ulLnnqC_mqNvxq`@".to_string(),
            levels: "BBB".to_string(),
        }
    );
}

#[test]
fn test_encode_point() {
    let point = geom("POINT (-120.2 38.5)");
    let encoded = encode_geometry(&point, DEFAULT_LEVEL).unwrap();
    assert_eq!(encoded.points, "_p~iF~ps|U");
    assert_eq!(encoded.levels, "B");
}

#[test]
fn test_encode_level() {
    let encoded = encode(&[[0.0, 0.0], [1.0, 1.0]], 0).unwrap();
    assert_eq!(encoded.levels, "??");
}

#[test]
fn test_encode_rejects_polygon() {
    let polygon = geom("POLYGON ((0 0, 0 1, 1 1, 0 0))");
    assert!(encode_geometry(&polygon, DEFAULT_LEVEL).is_err());
}

#[test]
fn test_json_for_wkb_input() {
    let point = geom("0101000000000000000000244085EB51B81E052440");
    let value = as_json(&point, &JsonOptions::default()).unwrap();
    assert_eq!(value["type"], "point");
    assert_eq!(value["lat"], 10.01);
    assert_eq!(value["lng"], 10.0);
}

#[test]
fn test_json_multi_line_is_array() {
    let lines = geom("MULTILINESTRING ((0 0, 1 1), (2 2, 3 3))");
    let value = as_json(&lines, &JsonOptions::default()).unwrap();
    let members = value.as_array().unwrap();
    assert_eq!(members.len(), 2);
    assert_eq!(members[0]["type"], "lineString");
}

#[test]
fn test_json_for_out_of_range_line_fails() {
    let line = Geometry::new(Shape::line_string([[0.0, -1e300], [0.0, 1e300]]));
    assert!(as_json(&line, &JsonOptions::default()).is_err());

    let raw = JsonOptions { encoded: false, ..Default::default() };
    assert!(as_json(&line, &raw).is_ok());
}

/// Floor truncation at 1e5 loses less than 1e-5; the slack covers rounding
/// in the scaling multiply
const TRUNCATION_SLACK: f64 = 1e-9;

proptest! {
    #[test]
    fn encode_decode_within_precision(
        points in prop::collection::vec((-180.0f64..180.0, -90.0f64..90.0), 1..20)
    ) {
        let points: Vec<[f64; 2]> = points.into_iter().map(|(lng, lat)| [lng, lat]).collect();
        let encoded = encode(&points, DEFAULT_LEVEL).unwrap();
        prop_assert_eq!(encoded.levels.len(), points.len());

        let decoded = decode(&encoded.points).unwrap();
        prop_assert_eq!(decoded.len(), points.len());
        for (got, want) in decoded.iter().zip(points.iter()) {
            for axis in 0..2 {
                let lost = want[axis] - got[axis];
                prop_assert!(lost > -TRUNCATION_SLACK, "decoded value above input: {}", lost);
                prop_assert!(lost < 1e-5 + TRUNCATION_SLACK, "truncation too large: {}", lost);
            }
        }
    }
}
