use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use thiserror::Error;

use pcd_exporter::ExportOptions;
use pcd_filter::CurbParams;
use pcd_parser::parsers::AttributeNames;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Settings file layout. Every section and field is optional:
///
/// ```json
/// {
///   "filter": { "ground_label": 1, "offset": [627285.0, 4841948.0, 0.0],
///               "height_margin": 1.2, "min_angle": 15.0, "min_height_diff": 0.02 },
///   "fields": { "scan_angle": "scalar_ScanAngleRank", "label": "scalar_Label" },
///   "export": { "colorize": false, "color_baseline": 133.8 }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub filter: CurbParams,
    pub fields: AttributeNames,
    pub export: ExportOptions,
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use super::*;

    #[test]
    fn reads_partial_sections() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        write!(
            tmp,
            r#"{{ "filter": {{ "min_angle": 12.5 }}, "fields": {{ "label": "class" }} }}"#
        )
        .unwrap();

        let config = Config::from_file(tmp.path()).unwrap();
        assert_eq!(config.filter.min_angle, 12.5);
        assert_eq!(config.filter.height_margin, 1.2);
        assert_eq!(config.fields.label, "class");
        assert_eq!(config.fields.scan_angle, "scalar_ScanAngleRank");
        assert_eq!(config.export, ExportOptions::default());
    }

    #[test]
    fn malformed_json_is_an_error() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        write!(tmp, "{{ filter: ").unwrap();
        assert!(matches!(
            Config::from_file(tmp.path()),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(matches!(
            Config::from_file(Path::new("/nonexistent/curb_config_12345.json")),
            Err(ConfigError::Read { .. })
        ));
    }
}
