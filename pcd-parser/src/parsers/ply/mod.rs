use std::{
    fs::File,
    io::{self, BufRead, BufReader, Read},
    path::PathBuf,
};

use byteorder::{BigEndian, ByteOrder, LittleEndian, ReadBytesExt as _};

use pcd_core::pointcloud::point::{Point, PointCloud};

use super::{AttributeNames, Parser, ParserProvider, MAX_PREALLOCATED_POINTS};
use crate::ParseError;

pub struct PlyParserProvider {
    pub filename: PathBuf,
    pub fields: AttributeNames,
}

impl ParserProvider for PlyParserProvider {
    fn get_parser(&self) -> Box<dyn Parser> {
        Box::new(PlyParser {
            filename: self.filename.clone(),
            fields: self.fields.clone(),
        })
    }
}

pub struct PlyParser {
    pub filename: PathBuf,
    pub fields: AttributeNames,
}

impl Parser for PlyParser {
    fn parse(&self) -> Result<PointCloud, ParseError> {
        let start = std::time::Instant::now();
        let file = File::open(&self.filename).map_err(|source| ParseError::Open {
            path: self.filename.clone(),
            source,
        })?;
        let points = read_ply(BufReader::new(file), &self.fields)?;
        log::info!(
            "Read PLY time: {:?} ({} points)",
            start.elapsed(),
            points.len()
        );

        Ok(PointCloud::new(points))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Ascii,
    BinaryLittleEndian,
    BinaryBigEndian,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScalarType {
    Char,
    UChar,
    Short,
    UShort,
    Int,
    UInt,
    Float,
    Double,
}

impl ScalarType {
    fn from_name(name: &str) -> Result<Self, ParseError> {
        Ok(match name {
            "char" | "int8" => Self::Char,
            "uchar" | "uint8" => Self::UChar,
            "short" | "int16" => Self::Short,
            "ushort" | "uint16" => Self::UShort,
            "int" | "int32" => Self::Int,
            "uint" | "uint32" => Self::UInt,
            "float" | "float32" => Self::Float,
            "double" | "float64" => Self::Double,
            other => return Err(ParseError::UnsupportedProperty(other.to_string())),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum PropertyKind {
    Scalar(ScalarType),
    List { count: ScalarType, item: ScalarType },
}

#[derive(Debug, Clone)]
struct Property {
    name: String,
    kind: PropertyKind,
}

#[derive(Debug, Clone)]
struct Element {
    name: String,
    count: usize,
    properties: Vec<Property>,
}

#[derive(Debug)]
struct Header {
    format: Format,
    elements: Vec<Element>,
}

/// Positions of the required properties inside a vertex record.
struct VertexLayout {
    x: usize,
    y: usize,
    z: usize,
    scan_angle: usize,
    label: usize,
}

impl VertexLayout {
    fn resolve(vertex: &Element, fields: &AttributeNames) -> Result<Self, ParseError> {
        let find = |name: &str| {
            vertex
                .properties
                .iter()
                .position(|p| p.name == name)
                .ok_or_else(|| ParseError::MissingProperty(name.to_string()))
                .and_then(|index| match vertex.properties[index].kind {
                    PropertyKind::Scalar(_) => Ok(index),
                    PropertyKind::List { .. } => Err(ParseError::UnsupportedProperty(format!(
                        "list property '{}' cannot be used as a coordinate or attribute",
                        name
                    ))),
                })
        };

        Ok(Self {
            x: find("x")?,
            y: find("y")?,
            z: find("z")?,
            scan_angle: find(fields.scan_angle.as_str())?,
            label: find(fields.label.as_str())?,
        })
    }

    fn to_point(&self, values: &[f64]) -> Point {
        Point::new(
            values[self.x],
            values[self.y],
            values[self.z],
            values[self.scan_angle],
            // Labels stored as float scalars are truncated, as a u8 cast would.
            values[self.label] as u8,
        )
    }
}

pub(crate) fn read_ply<R: BufRead>(
    mut reader: R,
    fields: &AttributeNames,
) -> Result<Vec<Point>, ParseError> {
    let header = read_header(&mut reader)?;

    let vertex_index = header
        .elements
        .iter()
        .position(|e| e.name == "vertex")
        .ok_or_else(|| ParseError::InvalidHeader("no vertex element".to_string()))?;
    let vertex = &header.elements[vertex_index];
    let layout = VertexLayout::resolve(vertex, fields)?;
    let preceding = &header.elements[..vertex_index];

    match header.format {
        Format::Ascii => read_ascii_body(reader, preceding, vertex, &layout),
        Format::BinaryLittleEndian => {
            read_binary_body::<LittleEndian, _>(reader, preceding, vertex, &layout)
        }
        Format::BinaryBigEndian => {
            read_binary_body::<BigEndian, _>(reader, preceding, vertex, &layout)
        }
    }
}

fn read_header<R: BufRead>(reader: &mut R) -> Result<Header, ParseError> {
    let mut line = String::new();
    reader.read_line(&mut line)?;
    if line.trim() != "ply" {
        return Err(ParseError::InvalidHeader(
            "file does not start with 'ply'".to_string(),
        ));
    }

    let mut format = None;
    let mut elements: Vec<Element> = Vec::new();

    loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            return Err(ParseError::InvalidHeader("missing end_header".to_string()));
        }
        let tokens: Vec<&str> = line.split_whitespace().collect();

        match tokens.as_slice() {
            [] => continue,
            ["end_header"] => break,
            ["comment", ..] | ["obj_info", ..] => continue,
            ["format", kind, _version] => {
                format = Some(match *kind {
                    "ascii" => Format::Ascii,
                    "binary_little_endian" => Format::BinaryLittleEndian,
                    "binary_big_endian" => Format::BinaryBigEndian,
                    other => {
                        return Err(ParseError::InvalidHeader(format!(
                            "unsupported PLY format: {}",
                            other
                        )))
                    }
                });
            }
            ["element", name, count] => {
                let count = count.parse::<usize>().map_err(|e| {
                    ParseError::InvalidHeader(format!("invalid element count '{}': {}", count, e))
                })?;
                elements.push(Element {
                    name: name.to_string(),
                    count,
                    properties: Vec::new(),
                });
            }
            ["property", "list", count, item, name] => {
                let element = elements.last_mut().ok_or_else(|| {
                    ParseError::InvalidHeader("property declared before any element".to_string())
                })?;
                element.properties.push(Property {
                    name: name.to_string(),
                    kind: PropertyKind::List {
                        count: ScalarType::from_name(count)?,
                        item: ScalarType::from_name(item)?,
                    },
                });
            }
            ["property", ty, name] => {
                let element = elements.last_mut().ok_or_else(|| {
                    ParseError::InvalidHeader("property declared before any element".to_string())
                })?;
                element.properties.push(Property {
                    name: name.to_string(),
                    kind: PropertyKind::Scalar(ScalarType::from_name(ty)?),
                });
            }
            _ => {
                return Err(ParseError::InvalidHeader(format!(
                    "unrecognized header line: {}",
                    line.trim()
                )))
            }
        }
    }

    let format =
        format.ok_or_else(|| ParseError::InvalidHeader("PLY format line missing".to_string()))?;

    Ok(Header { format, elements })
}

fn read_ascii_body<R: BufRead>(
    reader: R,
    preceding: &[Element],
    vertex: &Element,
    layout: &VertexLayout,
) -> Result<Vec<Point>, ParseError> {
    let skip = preceding
        .iter()
        .fold(0usize, |acc, e| acc.saturating_add(e.count));
    let mut lines = reader
        .lines()
        .enumerate()
        .filter(|(_, line)| line.as_ref().map_or(true, |l| !l.trim().is_empty()))
        .skip(skip);

    let mut points = Vec::with_capacity(vertex.count.min(MAX_PREALLOCATED_POINTS));
    let mut values = Vec::with_capacity(vertex.properties.len());

    for read in 0..vertex.count {
        let (line_index, line) = match lines.next() {
            Some((index, line)) => (index, line?),
            None => {
                return Err(ParseError::UnexpectedEof {
                    expected: vertex.count,
                    read,
                })
            }
        };
        // 1-based, counted from the first body line.
        let line_number = line_index + 1;
        let mut tokens = line.split_whitespace();

        values.clear();
        for property in &vertex.properties {
            match property.kind {
                PropertyKind::Scalar(_) => {
                    values.push(next_ascii_value(&mut tokens, line_number)?);
                }
                PropertyKind::List { .. } => {
                    let len = next_ascii_value(&mut tokens, line_number)? as usize;
                    for _ in 0..len {
                        next_ascii_value(&mut tokens, line_number)?;
                    }
                    // keeps indices aligned with the property list
                    values.push(f64::NAN);
                }
            }
        }

        points.push(layout.to_point(&values));
    }

    Ok(points)
}

fn next_ascii_value<'a>(
    tokens: &mut impl Iterator<Item = &'a str>,
    line: usize,
) -> Result<f64, ParseError> {
    let token = tokens.next().ok_or_else(|| ParseError::InvalidValue {
        line,
        value: "<missing>".to_string(),
    })?;
    token.parse::<f64>().map_err(|_| ParseError::InvalidValue {
        line,
        value: token.to_string(),
    })
}

fn read_binary_body<B: ByteOrder, R: Read>(
    mut reader: R,
    preceding: &[Element],
    vertex: &Element,
    layout: &VertexLayout,
) -> Result<Vec<Point>, ParseError> {
    for element in preceding {
        for _ in 0..element.count {
            for property in &element.properties {
                read_binary_property::<B, _>(&mut reader, &property.kind)?;
            }
        }
    }

    let mut points = Vec::with_capacity(vertex.count.min(MAX_PREALLOCATED_POINTS));
    let mut values = Vec::with_capacity(vertex.properties.len());

    for read in 0..vertex.count {
        values.clear();
        for property in &vertex.properties {
            match read_binary_property::<B, _>(&mut reader, &property.kind) {
                Ok(value) => values.push(value),
                Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                    return Err(ParseError::UnexpectedEof {
                        expected: vertex.count,
                        read,
                    })
                }
                Err(e) => return Err(e.into()),
            }
        }
        points.push(layout.to_point(&values));
    }

    Ok(points)
}

// Lists are consumed and reported as NaN.
fn read_binary_property<B: ByteOrder, R: Read>(
    reader: &mut R,
    kind: &PropertyKind,
) -> io::Result<f64> {
    match *kind {
        PropertyKind::Scalar(ty) => read_scalar::<B, _>(reader, ty),
        PropertyKind::List { count, item } => {
            let len = read_scalar::<B, _>(reader, count)? as usize;
            for _ in 0..len {
                read_scalar::<B, _>(reader, item)?;
            }
            Ok(f64::NAN)
        }
    }
}

fn read_scalar<B: ByteOrder, R: Read>(reader: &mut R, ty: ScalarType) -> io::Result<f64> {
    Ok(match ty {
        ScalarType::Char => reader.read_i8()? as f64,
        ScalarType::UChar => reader.read_u8()? as f64,
        ScalarType::Short => reader.read_i16::<B>()? as f64,
        ScalarType::UShort => reader.read_u16::<B>()? as f64,
        ScalarType::Int => reader.read_i32::<B>()? as f64,
        ScalarType::UInt => reader.read_u32::<B>()? as f64,
        ScalarType::Float => reader.read_f32::<B>()? as f64,
        ScalarType::Double => reader.read_f64::<B>()?,
    })
}
