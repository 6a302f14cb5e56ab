//! Integration tests for the geoext binary
//!
//! These tests drive the built binary and check its stdout in both human and
//! JSON modes.

use std::io::Write;
use std::process::{Command, Output, Stdio};
use tempfile::NamedTempFile;

const ENV_VARS: [&str; 4] = [
    "GEOEXT_SRID_COPY_POLICY",
    "GEOEXT_POLYLINE_LEVEL",
    "GEOEXT_DEFAULT_SRID",
    "GEOEXT_WKT_PRECISION",
];

fn geoext() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_geoext"));
    for var in ENV_VARS {
        command.env_remove(var);
    }
    command
}

fn run(args: &[&str]) -> Output {
    geoext().args(args).output().expect("Failed to execute command")
}

fn stdout_of(args: &[&str]) -> String {
    let output = run(args);
    assert!(
        output.status.success(),
        "Command should succeed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

fn json_of(args: &[&str]) -> serde_json::Value {
    serde_json::from_str(&stdout_of(args)).expect("Output should be valid JSON")
}

#[test]
fn test_read_ewkt() {
    assert_eq!(stdout_of(&["read", "SRID=4326; POINT(10 10.01)"]), "SRID=4326;POINT (10 10.01)");
}

#[test]
fn test_read_hex_wkb_to_wkt() {
    assert_eq!(
        stdout_of(&["read", "0101000020E6100000000000000000244085EB51B81E052440", "--format", "wkt"]),
        "POINT (10 10.01)"
    );
}

#[test]
fn test_read_to_wkb() {
    assert_eq!(
        stdout_of(&["read", "POINT(10 10.01)", "--format", "wkb"]),
        "0101000000000000000000244085EB51B81E052440"
    );
}

#[test]
fn test_read_lat_lng_as_point() {
    assert_eq!(stdout_of(&["read", "10.01,10", "--format", "wkt"]), "POINT (10 10.01)");
    assert_eq!(stdout_of(&["read", "10.01,10", "--points", "--format", "wkt"]), "POINT (10.01 10)");
}

#[test]
fn test_read_geojson() {
    let parsed = json_of(&["read", "POINT(10 10.01)", "--format", "geojson"]);
    assert_eq!(parsed["type"], "Point");
    assert_eq!(parsed["coordinates"], serde_json::json!([10.0, 10.01]));
}

#[test]
fn test_json_output_is_valid() {
    let parsed = json_of(&["--json", "read", "POINT(10 10.01)", "--format", "wkt"]);
    assert_eq!(parsed["status"], "success");
    assert_eq!(parsed["data"], "POINT (10 10.01)");
}

#[test]
fn test_read_filtered_kind_fails() {
    let output = run(&["read", "POINT(10 10.01)", "--excluded", "wkt"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("filtered"));
}

#[test]
fn test_read_unknown_kind_is_rejected() {
    let output = run(&["read", "POINT(10 10.01)", "--allowed", "shapefile"]);
    assert!(!output.status.success());
}

#[test]
fn test_snap() {
    assert_eq!(
        stdout_of(&["snap", "LINESTRING (0.1 0.1, 3.2 3.2, 5.9 5.9)", "--size", "2", "--format", "wkt"]),
        "LINESTRING (0 0, 4 4, 6 6)"
    );
}

#[test]
fn test_snap_with_offset() {
    assert_eq!(
        stdout_of(&["snap", "POINT (10 10)", "--offset", "12.5,12.5", "--format", "wkt"]),
        "POINT (9.5 9.5)"
    );
}

#[test]
fn test_snap_invalid_result_fails() {
    let output = run(&["snap", "POLYGON ((0 1, 0 1, 0 6, 0 6, 0 1))"]);
    assert!(!output.status.success());
}

#[test]
fn test_transform_scale() {
    assert_eq!(
        stdout_of(&["transform", "--format", "wkt", "LINESTRING (1 0, 2 0)", "scale", "2", "3"]),
        "LINESTRING (2 0, 4 0)"
    );
}

#[test]
fn test_transform_translate_pairs() {
    assert_eq!(
        stdout_of(&["transform", "--format", "wkt", "POINT (1 1)", "translate", "x=5", "y=-1"]),
        "POINT (6 0)"
    );
}

#[test]
fn test_transform_rotate_about_origin() {
    assert_eq!(
        stdout_of(&[
            "--precision",
            "6",
            "transform",
            "--format",
            "wkt",
            "--origin",
            "10,10",
            "POINT (1 1)",
            "rotate",
            "3.141592653589793",
        ]),
        "POINT (19 19)"
    );
}

#[test]
fn test_transform_bad_arity_fails() {
    let output = run(&["transform", "POINT (1 1)", "scale", "2"]);
    assert!(!output.status.success());
}

#[test]
fn test_polyline_encode() {
    let output = stdout_of(&["polyline", "encode", "LINESTRING (-120.2 38.5, -120.95 40.7, -126.453 43.252)"]);
    assert!(output.contains("_p~iF~ps|U_ulLnnqC_mqNvxq`@"));
    assert!(output.contains("BBB"));
}

#[test]
fn test_polyline_encode_json_with_level() {
    let parsed = json_of(&["--json", "polyline", "encode", "POINT (-120.2 38.5)", "--level", "0"]);
    assert_eq!(parsed["data"]["points"], "_p~iF~ps|U");
    assert_eq!(parsed["data"]["levels"], "?");
}

#[test]
fn test_polyline_decode() {
    let parsed = json_of(&["polyline", "decode", "_p~iF~ps|U"]);
    let point = &parsed[0];
    assert!((point[0].as_f64().unwrap() + 120.2).abs() < 1e-6);
    assert!((point[1].as_f64().unwrap() - 38.5).abs() < 1e-6);
}

#[test]
fn test_default_srid_from_environment() {
    let output = geoext()
        .env("GEOEXT_DEFAULT_SRID", "4326")
        .args(["read", "POINT(1 2)"])
        .output()
        .expect("Failed to execute command");
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "SRID=4326;POINT (1 2)");
}

#[test]
fn test_explicit_srid_beats_default() {
    let output = geoext()
        .env("GEOEXT_DEFAULT_SRID", "4326")
        .args(["read", "POINT(1 2)", "--srid", "0"])
        .output()
        .expect("Failed to execute command");
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "POINT (1 2)");
}

#[test]
fn test_read_binary_wkb_from_stdin() {
    // Little-endian POINT (10 10.01); not valid UTF-8
    let wkb: [u8; 21] = [
        0x01, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x24, 0x40, 0x85, 0xEB,
        0x51, 0xB8, 0x1E, 0x05, 0x24, 0x40,
    ];

    let mut child = geoext()
        .args(["read", "-", "--format", "wkt"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn command");
    child.stdin.take().unwrap().write_all(&wkb).unwrap();
    let output = child.wait_with_output().unwrap();

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "POINT (10 10.01)");
}

#[test]
fn test_read_to_kml_and_georss() {
    assert_eq!(
        stdout_of(&["read", "POINT(10 10.01)", "--format", "kml"]),
        "<Point><coordinates>10,10.01</coordinates></Point>"
    );
    assert_eq!(
        stdout_of(&["read", "LINESTRING (0 1, 2 3)", "--format", "georss"]),
        "<georss:where><gml:LineString><gml:posList>1 0 3 2</gml:posList></gml:LineString></georss:where>"
    );
}

#[test]
fn test_polyline_decode_overflow_fails() {
    let encoded = format!("{}^", "~".repeat(12)).repeat(4);
    let output = run(&["polyline", "decode", &encoded]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("out of range"));
}

#[test]
fn test_config_file_and_sources() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "wkt_precision = 0\npolyline_level = 5").unwrap();
    let path = file.path().to_str().unwrap();

    assert_eq!(
        stdout_of(&["--config", path, "read", "POINT (1.4 2.6)", "--format", "wkt"]),
        "POINT (1 3)"
    );

    let parsed = json_of(&["--json", "--config", path, "--policy", "strict", "config"]);
    assert_eq!(parsed["data"]["polyline_level"]["value"], "5");
    assert_eq!(parsed["data"]["polyline_level"]["source"], "File");
    assert_eq!(parsed["data"]["srid_copy_policy"]["source"], "Cli");
    assert_eq!(parsed["data"]["default_srid"]["source"], "Default");
}
