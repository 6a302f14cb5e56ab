//! WKB and EWKB, binary or hex encoded.
//!
//! The reader accepts either byte order, EWKB flag bits and ISO type codes.
//! The writer emits little-endian WKB, or EWKB when the SRID is included.

use std::borrow::Cow;
use std::cell::RefCell;
use std::io::Cursor;

use byteorder::{BigEndian, LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::error::{GeoextError, Result};
use crate::models::{Coord, CoordSeq, Geometry, Polygon, Shape};

const FORMAT: &str = "WKB";

const EWKB_Z_FLAG: u32 = 0x8000_0000;
const EWKB_M_FLAG: u32 = 0x4000_0000;
const EWKB_SRID_FLAG: u32 = 0x2000_0000;
const TYPE_MASK: u32 = 0x0FFF_FFFF;

/// Byte size of the smallest possible geometry: order, type and one count
const MIN_GEOMETRY_BYTES: usize = 9;

/// Deepest collection nesting accepted
const MAX_NESTING: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq)]
enum ByteOrder {
    Big,
    Little,
}

impl TryFrom<u8> for ByteOrder {
    type Error = GeoextError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(ByteOrder::Big),
            1 => Ok(ByteOrder::Little),
            other => Err(GeoextError::unparseable(FORMAT, format!("unknown byte order {}", other))),
        }
    }
}

fn io_error(err: std::io::Error) -> GeoextError {
    GeoextError::unparseable(FORMAT, err.to_string())
}

struct Parser<'a> {
    cursor: Cursor<&'a [u8]>,
    srid: Option<i32>,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { cursor: Cursor::new(bytes), srid: None, depth: 0 }
    }

    fn remaining(&self) -> usize {
        let len = self.cursor.get_ref().len();
        len.saturating_sub(self.cursor.position() as usize)
    }

    fn read_u32(&mut self, order: ByteOrder) -> Result<u32> {
        match order {
            ByteOrder::Big => self.cursor.read_u32::<BigEndian>(),
            ByteOrder::Little => self.cursor.read_u32::<LittleEndian>(),
        }
        .map_err(io_error)
    }

    fn read_f64(&mut self, order: ByteOrder) -> Result<f64> {
        match order {
            ByteOrder::Big => self.cursor.read_f64::<BigEndian>(),
            ByteOrder::Little => self.cursor.read_f64::<LittleEndian>(),
        }
        .map_err(io_error)
    }

    /// Read an element count, rejecting counts the remaining input cannot hold
    fn read_count(&mut self, order: ByteOrder, min_element_bytes: usize) -> Result<usize> {
        let count = self.read_u32(order)? as usize;
        if count.saturating_mul(min_element_bytes) > self.remaining() {
            return Err(GeoextError::unparseable(
                FORMAT,
                format!("count {} exceeds the remaining {} bytes", count, self.remaining()),
            ));
        }
        Ok(count)
    }

    fn read_coord(&mut self, order: ByteOrder, has_z: bool, has_m: bool) -> Result<Coord> {
        let x = self.read_f64(order)?;
        let y = self.read_f64(order)?;
        let z = if has_z { self.read_f64(order)? } else { 0.0 };
        if has_m {
            self.read_f64(order)?;
        }
        Ok(Coord::xyz(x, y, z))
    }

    fn read_seq(&mut self, order: ByteOrder, has_z: bool, has_m: bool) -> Result<CoordSeq> {
        let coord_bytes = 8 * (2 + has_z as usize + has_m as usize);
        let count = self.read_count(order, coord_bytes)?;
        let mut seq = CoordSeq::with_capacity(count, has_z);
        for _ in 0..count {
            seq.push(self.read_coord(order, has_z, has_m)?);
        }
        Ok(seq)
    }

    fn read_polygon(&mut self, order: ByteOrder, has_z: bool, has_m: bool) -> Result<Polygon> {
        let count = self.read_count(order, 4)?;
        let mut rings = Vec::with_capacity(count);
        for _ in 0..count {
            rings.push(self.read_seq(order, has_z, has_m)?);
        }
        let mut rings = rings.into_iter();
        Ok(match rings.next() {
            Some(exterior) => Polygon::new(exterior, rings.collect()),
            None => Polygon::empty(has_z),
        })
    }

    /// Read `count` members, each a full WKB geometry of its own
    fn read_members(&mut self, order: ByteOrder) -> Result<Vec<Shape>> {
        if self.depth >= MAX_NESTING {
            return Err(GeoextError::unparseable(
                FORMAT,
                format!("collections nested deeper than {} levels", MAX_NESTING),
            ));
        }
        let count = self.read_count(order, MIN_GEOMETRY_BYTES)?;

        self.depth += 1;
        let members = (0..count).map(|_| self.read_geometry()).collect();
        self.depth -= 1;
        members
    }

    fn read_geometry(&mut self) -> Result<Shape> {
        let order = ByteOrder::try_from(self.cursor.read_u8().map_err(io_error)?)?;
        let code = self.read_u32(order)?;

        let mut has_z = code & EWKB_Z_FLAG != 0;
        let mut has_m = code & EWKB_M_FLAG != 0;
        if code & EWKB_SRID_FLAG != 0 {
            let srid = self.read_u32(order)? as i32;
            self.srid.get_or_insert(srid);
        }

        let mut base = code & TYPE_MASK;
        if base >= 1000 {
            match base / 1000 {
                1 => has_z = true,
                2 => has_m = true,
                3 => {
                    has_z = true;
                    has_m = true;
                }
                _ => {}
            }
            base %= 1000;
        }

        let shape = match base {
            1 => {
                let coord = self.read_coord(order, has_z, has_m)?;
                let mut seq = CoordSeq::new(has_z);
                if !(coord.x.is_nan() && coord.y.is_nan()) {
                    seq.push(coord);
                }
                Shape::Point(seq)
            }
            2 => Shape::LineString(self.read_seq(order, has_z, has_m)?),
            3 => Shape::Polygon(self.read_polygon(order, has_z, has_m)?),
            4 => Shape::MultiPoint(
                self.read_members(order)?
                    .into_iter()
                    .map(|member| match member {
                        Shape::Point(seq) => Ok(seq),
                        other => Err(member_error("MultiPoint", &other)),
                    })
                    .collect::<Result<_>>()?,
            ),
            5 => Shape::MultiLineString(
                self.read_members(order)?
                    .into_iter()
                    .map(|member| match member {
                        Shape::LineString(seq) => Ok(seq),
                        other => Err(member_error("MultiLineString", &other)),
                    })
                    .collect::<Result<_>>()?,
            ),
            6 => Shape::MultiPolygon(
                self.read_members(order)?
                    .into_iter()
                    .map(|member| match member {
                        Shape::Polygon(polygon) => Ok(polygon),
                        other => Err(member_error("MultiPolygon", &other)),
                    })
                    .collect::<Result<_>>()?,
            ),
            7 => Shape::GeometryCollection(self.read_members(order)?),
            other => {
                return Err(GeoextError::unparseable(FORMAT, format!("unknown geometry type {}", other)))
            }
        };
        Ok(shape)
    }
}

fn member_error(container: &str, member: &Shape) -> GeoextError {
    GeoextError::unparseable(
        FORMAT,
        format!("{} cannot contain a {}", container, member.type_name()),
    )
}

/// WKB reader holding a reusable hex decoding buffer.
///
/// Not shareable across threads; [`read_hex`] and [`read_binary`] use one
/// lazily built instance per thread.
#[derive(Debug, Default)]
pub struct WkbReader {
    buffer: Vec<u8>,
}

impl WkbReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse binary WKB or EWKB. An embedded SRID becomes the geometry's SRID.
    pub fn read(&mut self, bytes: &[u8]) -> Result<Geometry> {
        let mut parser = Parser::new(bytes);
        let shape = parser.read_geometry()?;
        Ok(Geometry::with_srid(shape, parser.srid.unwrap_or(0)))
    }

    /// Parse hex-encoded WKB or EWKB; whitespace is ignored
    pub fn read_hex(&mut self, hex: &str) -> Result<Geometry> {
        let mut buffer = std::mem::take(&mut self.buffer);
        let result = decode_hex_into(hex, &mut buffer).and_then(|_| self.read(&buffer));
        self.buffer = buffer;
        result
    }
}

thread_local! {
    static READER: RefCell<WkbReader> = RefCell::new(WkbReader::new());
}

/// Parse hex WKB with this thread's reader
pub fn read_hex(hex: &str) -> Result<Geometry> {
    READER.with(|reader| reader.borrow_mut().read_hex(hex))
}

/// Parse binary WKB with this thread's reader
pub fn read_binary(bytes: &[u8]) -> Result<Geometry> {
    READER.with(|reader| reader.borrow_mut().read(bytes))
}

fn decode_hex_into(hex: &str, out: &mut Vec<u8>) -> Result<()> {
    let digits: Cow<'_, str> = if hex.bytes().any(|b| b.is_ascii_whitespace()) {
        Cow::Owned(hex.chars().filter(|c| !c.is_ascii_whitespace()).collect())
    } else {
        Cow::Borrowed(hex)
    };

    out.clear();
    out.resize(digits.len() / 2, 0);
    hex::decode_to_slice(digits.as_bytes(), out)
        .map_err(|err| GeoextError::unparseable(FORMAT, err.to_string()))
}

/// Little-endian WKB writer
#[derive(Debug, Clone, Copy, Default)]
pub struct WkbWriter {
    /// Write EWKB with the SRID flag when the geometry has a non-zero SRID
    pub include_srid: bool,
}

impl WkbWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extended() -> Self {
        Self { include_srid: true }
    }

    pub fn write(&self, geom: &Geometry) -> Result<Vec<u8>> {
        let srid = (self.include_srid && geom.srid() != 0).then(|| geom.srid());
        let mut out = Vec::new();
        write_shape(&mut out, geom.shape(), srid)?;
        Ok(out)
    }

    pub fn write_hex(&self, geom: &Geometry) -> Result<String> {
        Ok(hex::encode_upper(self.write(geom)?))
    }
}

fn write_header(out: &mut Vec<u8>, base: u32, has_z: bool, srid: Option<i32>) -> Result<()> {
    let mut code = base;
    if has_z {
        code |= EWKB_Z_FLAG;
    }
    if srid.is_some() {
        code |= EWKB_SRID_FLAG;
    }
    out.write_u8(1)?;
    out.write_u32::<LittleEndian>(code)?;
    if let Some(srid) = srid {
        out.write_i32::<LittleEndian>(srid)?;
    }
    Ok(())
}

fn write_count(out: &mut Vec<u8>, count: usize) -> Result<()> {
    let count = u32::try_from(count)
        .map_err(|_| GeoextError::invalid_argument(format!("{} elements do not fit in WKB", count)))?;
    out.write_u32::<LittleEndian>(count)?;
    Ok(())
}

fn write_coord(out: &mut Vec<u8>, coord: &Coord, has_z: bool) -> Result<()> {
    out.write_f64::<LittleEndian>(coord.x)?;
    out.write_f64::<LittleEndian>(coord.y)?;
    if has_z {
        out.write_f64::<LittleEndian>(coord.z)?;
    }
    Ok(())
}

fn write_seq(out: &mut Vec<u8>, seq: &CoordSeq) -> Result<()> {
    write_count(out, seq.len())?;
    for coord in seq {
        write_coord(out, coord, seq.has_z())?;
    }
    Ok(())
}

fn write_polygon_body(out: &mut Vec<u8>, polygon: &Polygon) -> Result<()> {
    if polygon.is_empty() {
        return write_count(out, 0);
    }
    write_count(out, 1 + polygon.num_interior_rings())?;
    for ring in polygon.rings() {
        write_seq(out, ring)?;
    }
    Ok(())
}

fn write_point(out: &mut Vec<u8>, seq: &CoordSeq, srid: Option<i32>) -> Result<()> {
    write_header(out, 1, seq.has_z(), srid)?;
    match seq.get(0) {
        Some(coord) => write_coord(out, coord, seq.has_z()),
        None => write_coord(out, &Coord::xyz(f64::NAN, f64::NAN, f64::NAN), seq.has_z()),
    }
}

fn write_shape(out: &mut Vec<u8>, shape: &Shape, srid: Option<i32>) -> Result<()> {
    let has_z = shape.has_z();
    match shape {
        Shape::Point(seq) => write_point(out, seq, srid)?,
        Shape::LineString(seq) => {
            write_header(out, 2, has_z, srid)?;
            write_seq(out, seq)?;
        }
        Shape::Polygon(polygon) => {
            write_header(out, 3, has_z, srid)?;
            write_polygon_body(out, polygon)?;
        }
        Shape::MultiPoint(members) => {
            write_header(out, 4, has_z, srid)?;
            write_count(out, members.len())?;
            for seq in members {
                write_point(out, seq, None)?;
            }
        }
        Shape::MultiLineString(members) => {
            write_header(out, 5, has_z, srid)?;
            write_count(out, members.len())?;
            for seq in members {
                write_header(out, 2, seq.has_z(), None)?;
                write_seq(out, seq)?;
            }
        }
        Shape::MultiPolygon(members) => {
            write_header(out, 6, has_z, srid)?;
            write_count(out, members.len())?;
            for polygon in members {
                write_header(out, 3, polygon.has_z(), None)?;
                write_polygon_body(out, polygon)?;
            }
        }
        Shape::GeometryCollection(members) => {
            write_header(out, 7, has_z, srid)?;
            write_count(out, members.len())?;
            for member in members {
                write_shape(out, member, None)?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const POINT_WKB: &str = "0101000000000000000000244085EB51B81E052440";
    const POINT_EWKB: &str = "0101000020E6100000000000000000244085EB51B81E052440";
    const POLYGON_WKB: &str = "
        01030000000100000005000000000000000000000000000000000000000000000000000
        000000000000000F03F0000000000000440000000000000044000000000000014400000
        00000000044000000000000000000000000000000000
    ";

    #[test]
    fn test_read_point() {
        let geom = read_hex(POINT_WKB).unwrap();
        assert_eq!(geom.shape(), &Shape::point(10.0, 10.01));
        assert_eq!(geom.srid(), 0);
    }

    #[test]
    fn test_read_ewkb_point() {
        let geom = read_hex(POINT_EWKB).unwrap();
        assert_eq!(geom.shape(), &Shape::point(10.0, 10.01));
        assert_eq!(geom.srid(), 4326);
    }

    #[test]
    fn test_read_polygon_with_whitespace() {
        let geom = read_hex(POLYGON_WKB).unwrap();
        assert_eq!(
            geom.shape(),
            &Shape::polygon(vec![vec![[0.0, 0.0], [0.0, 1.0], [2.5, 2.5], [5.0, 2.5], [0.0, 0.0]]])
        );
    }

    #[test]
    fn test_read_big_endian_iso_z() {
        let mut bytes = vec![0u8];
        bytes.extend_from_slice(&1001u32.to_be_bytes());
        for v in [1.0f64, 2.0, 3.0] {
            bytes.extend_from_slice(&v.to_be_bytes());
        }
        let geom = read_binary(&bytes).unwrap();
        assert_eq!(geom.shape(), &Shape::point_z(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_read_empty_point() {
        let mut bytes = vec![1u8];
        bytes.extend_from_slice(&1u32.to_le_bytes());
        bytes.extend_from_slice(&f64::NAN.to_le_bytes());
        bytes.extend_from_slice(&f64::NAN.to_le_bytes());
        assert!(read_binary(&bytes).unwrap().is_empty());
    }

    #[test]
    fn test_read_errors() {
        assert!(matches!(read_hex("0101"), Err(GeoextError::UnparseableInput { .. })));
        assert!(read_hex("010").is_err());
        assert!(read_hex("zz").is_err());
        // Absurd ring count must not allocate
        assert!(read_hex("0103000000FFFFFFFF").is_err());
    }

    #[test]
    fn test_read_deep_nesting_fails() {
        // Each level is a collection holding one member
        let nested = |levels: usize| format!("{}{}", "010700000001000000".repeat(levels), POINT_WKB);

        let shallow = read_hex(&nested(3)).unwrap();
        assert_eq!(shallow.shape().type_name(), "GeometryCollection");

        assert!(matches!(
            read_hex(&nested(200_000)),
            Err(GeoextError::UnparseableInput { .. })
        ));
        // The reader stays usable after the failure
        assert_eq!(read_hex(POINT_WKB).unwrap().shape(), &Shape::point(10.0, 10.01));
    }

    #[test]
    fn test_hex_digits() {
        assert_eq!(read_hex(&POINT_WKB.to_lowercase()).unwrap().shape(), &Shape::point(10.0, 10.01));
        assert!(matches!(read_hex("01010"), Err(GeoextError::UnparseableInput { .. })));
        assert!(matches!(read_hex("0g"), Err(GeoextError::UnparseableInput { .. })));
    }

    #[test]
    fn test_write_point() {
        let geom = Geometry::with_srid(Shape::point(10.0, 10.01), 4326);
        assert_eq!(WkbWriter::new().write_hex(&geom).unwrap(), POINT_WKB);
        assert_eq!(WkbWriter::extended().write_hex(&geom).unwrap(), POINT_EWKB);
    }

    #[test]
    fn test_write_polygon() {
        let geom = read_hex(POLYGON_WKB).unwrap();
        let expected: String = POLYGON_WKB.split_whitespace().collect();
        assert_eq!(WkbWriter::new().write_hex(&geom).unwrap(), expected);
    }

    #[test]
    fn test_collection_round_trip() {
        let shape = Shape::GeometryCollection(vec![
            Shape::point_z(1.0, 2.0, 3.0),
            Shape::line_string([[0.0, 0.0], [1.0, 1.0]]),
            Shape::MultiPoint(vec![CoordSeq::from_xy([[0.0, 0.0]]), CoordSeq::from_xy([[2.0, 3.0]])]),
        ]);
        let geom = Geometry::with_srid(shape, 3857);
        let bytes = WkbWriter::extended().write(&geom).unwrap();
        assert_eq!(read_binary(&bytes).unwrap(), geom);
    }
}
