use std::path::Path;

use pcd_core::pointcloud::point::PointCloud;
use serde::Deserialize;

use crate::ParseError;

pub mod csv;
pub mod las;
pub mod ply;

pub trait ParserProvider {
    fn get_parser(&self) -> Box<dyn Parser>;
}

pub trait Parser {
    fn parse(&self) -> Result<PointCloud, ParseError>;
}

/// Names of the per-vertex scalar properties holding the scan angle and
/// the classification label. LAS files carry both natively and ignore these.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AttributeNames {
    pub scan_angle: String,
    pub label: String,
}

impl Default for AttributeNames {
    fn default() -> Self {
        Self {
            scan_angle: "scalar_ScanAngleRank".to_string(),
            label: "scalar_Label".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extension {
    Ply,
    Las,
    Laz,
    Csv,
    Txt,
}

pub fn get_extension(extension: &str) -> Result<Extension, ParseError> {
    match extension.to_ascii_lowercase().as_str() {
        "ply" => Ok(Extension::Ply),
        "las" => Ok(Extension::Las),
        "laz" => Ok(Extension::Laz),
        "csv" => Ok(Extension::Csv),
        "txt" => Ok(Extension::Txt),
        other => Err(ParseError::UnsupportedExtension(other.to_string())),
    }
}

pub fn extension_of(path: &Path) -> Result<Extension, ParseError> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .ok_or_else(|| ParseError::MissingExtension(path.to_path_buf()))?;
    get_extension(extension)
}

/// Upper bound on up-front point allocation; header counts are not trusted.
pub(crate) const MAX_PREALLOCATED_POINTS: usize = 1 << 20;

/// Lowercase with `_` and `-` removed, so `Scan_Angle` matches `scanangle`.
pub(crate) fn normalize_name(name: &str) -> String {
    name.to_lowercase().replace(['_', '-'], "")
}
