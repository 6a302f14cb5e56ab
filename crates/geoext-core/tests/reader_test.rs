//! Integration tests for the multi-format reader
//!
//! Every notation the reader understands is exercised through `read`, along
//! with SRID handling and the allowed/excluded filters.

use geoext_core::formats::wkt::WktWriter;
use geoext_core::formats::{to_wkt, WkbWriter};
use geoext_core::geo::Extent;
use geoext_core::{read, GeoextError, Geometry, InputKind, ReadInput, ReadOptions, Shape};

const POINT_WKT: &str = "POINT(10 10.01)";
const POINT_EWKT: &str = "SRID=4326; POINT(10 10.01)";
const POINT_WKB: &str = "0101000000000000000000244085EB51B81E052440";
const POINT_WKB_BIN: &[u8] = b"\x01\x01\x00\x00\x00\x00\x00\x00\x00\x00\x00\x24\x40\x85\xEB\x51\xB8\x1E\x05\x24\x40";
const POINT_EWKB: &str = "0101000020E6100000000000000000244085EB51B81E052440";
const POINT_EWKB_BIN: &[u8] =
    b"\x01\x01\x00\x00\x20\xE6\x10\x00\x00\x00\x00\x00\x00\x00\x00\x24\x40\x85\xEB\x51\xB8\x1E\x05\x24\x40";
const POINT_G_LAT_LNG: &str = "(10.01, 10)";
const POINT_G_LAT_LNG_URL_VALUE: &str = "10.01,10";

const POLYGON_WKT: &str = "POLYGON((0 0, 0 1, 2.5 2.5, 5 2.5, 0 0))";
const POLYGON_EWKT: &str = "SRID=4326; POLYGON((0 0, 0 1, 2.5 2.5, 5 2.5, 0 0))";
const POLYGON_WKB: &str = "
    01030000000100000005000000000000000000000000000000000000000000000000000
    000000000000000F03F0000000000000440000000000000044000000000000014400000
    00000000044000000000000000000000000000000000
";
const POLYGON_EWKB: &str = "
    0103000020E610000001000000050000000000000000000000000000000000000000000
    00000000000000000000000F03F00000000000004400000000000000440000000000000
    1440000000000000044000000000000000000000000000000000
";

const BOUNDS_G_LAT_LNG: &str = "((0.1, 0.1), (5.2, 5.2))";
const BOUNDS_G_LAT_LNG_URL_VALUE: &str = "0.1,0.1,5.2,5.2";

fn read_ok<'a>(input: impl Into<ReadInput<'a>>) -> Geometry {
    read(input, &ReadOptions::new()).unwrap().expect("input should not be null")
}

fn assert_saneness_of_point(geom: &Geometry) {
    assert_eq!(geom.shape(), &Shape::point(10.0, 10.01));
}

fn assert_saneness_of_polygon(geom: &Geometry) {
    assert_eq!(
        geom.shape(),
        &Shape::polygon(vec![vec![[0.0, 0.0], [0.0, 1.0], [2.5, 2.5], [5.0, 2.5], [0.0, 0.0]]])
    );
}

#[test]
fn test_read_points() {
    for input in [POINT_WKT, POINT_EWKT, POINT_WKB, POINT_EWKB, POINT_G_LAT_LNG, POINT_G_LAT_LNG_URL_VALUE] {
        assert_saneness_of_point(&read_ok(input));
    }
    for input in [POINT_WKB_BIN, POINT_EWKB_BIN] {
        assert_saneness_of_point(&read_ok(input));
    }
}

#[test]
fn test_read_polygons() {
    for input in [POLYGON_WKT, POLYGON_EWKT, POLYGON_WKB, POLYGON_EWKB] {
        assert_saneness_of_polygon(&read_ok(input));
    }
}

#[test]
fn test_read_polygon_binary() {
    let geom = Geometry::with_srid(read_ok(POLYGON_WKT).into_shape(), 4326);
    let wkb = WkbWriter::new().write(&geom).unwrap();
    let ewkb = WkbWriter::extended().write(&geom).unwrap();

    let plain = read_ok(wkb.as_slice());
    assert_saneness_of_polygon(&plain);
    assert_eq!(plain.srid(), 0);

    let extended = read_ok(ewkb.as_slice());
    assert_saneness_of_polygon(&extended);
    assert_eq!(extended.srid(), 4326);
}

#[test]
fn test_srid_inference() {
    assert_eq!(read_ok(POINT_WKT).srid(), 0);
    assert_eq!(read_ok(POINT_EWKT).srid(), 4326);
    assert_eq!(read_ok(POINT_EWKB).srid(), 4326);
    assert_eq!(read_ok(POINT_EWKB_BIN).srid(), 4326);
    assert_eq!(read_ok(POLYGON_EWKT).srid(), 4326);
}

#[test]
fn test_srid_option_overrides() {
    let options = ReadOptions::new().srid(900913);
    for input in [POINT_EWKT, POINT_EWKB, POLYGON_EWKT, POLYGON_EWKB] {
        let geom = read(input, &options).unwrap().unwrap();
        assert_eq!(geom.srid(), 900913);
    }
    let geom = read(POINT_EWKB_BIN, &options).unwrap().unwrap();
    assert_eq!(geom.srid(), 900913);
}

#[test]
fn test_read_wkt_with_newlines() {
    let geom = read_ok(
        "
    POLYGON((
      0 0,
      10 10,
      0 10,
      0 0
    ))
    ",
    );
    assert_eq!(to_wkt(&geom), "POLYGON ((0 0, 10 10, 0 10, 0 0))");
}

#[test]
fn test_from_g_lat_lng_points() {
    let geom = read(POINT_G_LAT_LNG, &ReadOptions::new().points(true)).unwrap().unwrap();
    assert_eq!(geom.shape(), &Shape::point(10.01, 10.0));
}

#[test]
fn test_from_g_lat_lng_bounds() {
    for input in [BOUNDS_G_LAT_LNG, BOUNDS_G_LAT_LNG_URL_VALUE] {
        let bounds = read_ok(input);
        assert!(matches!(bounds.shape(), Shape::Polygon(_)));
        assert_eq!(bounds.lower_left(), Some([0.1, 0.1]));
        assert_eq!(bounds.upper_right(), Some([5.2, 5.2]));
        assert_eq!(bounds.upper_left(), Some([0.1, 5.2]));
        assert_eq!(bounds.lower_right(), Some([5.2, 0.1]));
    }
}

#[test]
fn test_read_e_notation() {
    assert_eq!(to_wkt(&read_ok("-8.58307e-04, 6.00815E+4")), "POINT (60081.5 -0.000858307)");
    assert_eq!(to_wkt(&read_ok("-8.58307e-04, 6.00815e4")), "POINT (60081.5 -0.000858307)");
}

#[test]
fn test_no_leading_digits() {
    assert_eq!(to_wkt(&read_ok(".02, .01")), "POINT (0.01 0.02)");
}

#[test]
fn test_from_box2d() {
    let geom = read_ok("BOX(123.456 78.9, 9.876 54.321)");
    assert_eq!(
        WktWriter::new().with_precision(0).write(&geom),
        "POLYGON ((10 54, 123 54, 123 79, 10 79, 10 54))"
    );

    assert_eq!(to_wkt(&read_ok("BOX(0 0, 0 0)")), "POINT (0 0)");

    let square = read_ok("BOX(0 0, 5 5)");
    let rect = square.bounding_rect().unwrap();
    assert_eq!((rect.width(), rect.height()), (5.0, 5.0));
}

#[test]
fn test_geometry_passes_through() {
    let geom = Geometry::with_srid(Shape::point(1.0, 2.0), 3857);
    assert_eq!(read_ok(geom.clone()), geom);

    let overridden = read(geom, &ReadOptions::new().srid(4326)).unwrap().unwrap();
    assert_eq!(overridden.srid(), 4326);
}

#[test]
fn test_allowed() {
    let geom = read_ok(POINT_WKT);
    let result = read(geom, &ReadOptions::new().allowed([]));
    assert!(matches!(result, Err(GeoextError::FilteredType { detected }) if detected == "geometry"));

    let geom = read(POINT_WKT, &ReadOptions::new().allowed([InputKind::Wkt])).unwrap().unwrap();
    assert_eq!(to_wkt(&geom), "POINT (10 10.01)");

    let result = read(POINT_WKT, &ReadOptions::new().allowed([InputKind::WkbHex]));
    assert!(matches!(result, Err(GeoextError::FilteredType { .. })));
}

#[test]
fn test_excluded() {
    let result = read(POINT_WKT, &ReadOptions::new().excluded([InputKind::Wkt]));
    assert!(matches!(result, Err(GeoextError::FilteredType { .. })));
}

#[test]
fn test_allowed_and_excluded() {
    let options = ReadOptions::new().allowed([InputKind::Wkt]).excluded([InputKind::Wkt]);
    let err = read(POINT_WKT, &options).unwrap_err();
    assert!(err.to_string().contains("wkt"));
}

#[test]
fn test_unparseable_input() {
    assert!(matches!(
        read("POINT(10", &ReadOptions::new()),
        Err(GeoextError::UnparseableInput { .. })
    ));
    assert!(matches!(
        read("definitely not a geometry", &ReadOptions::new()),
        Err(GeoextError::UnparseableInput { .. })
    ));
}

#[test]
fn test_null_input() {
    assert!(read(ReadInput::Null, &ReadOptions::new()).unwrap().is_none());
    assert!(read(None::<&str>, &ReadOptions::new().srid(4326)).unwrap().is_none());
}
