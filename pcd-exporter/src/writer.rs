use std::{
    fs,
    path::{Path, PathBuf},
};

use las::{point::Format, Builder, Color, Header, Transform, Vector, Writer};
use serde::Deserialize;

use pcd_core::pointcloud::point::PointCloud;

use crate::{color::height_ramp, ExportError};

pub const CURB_CLOUD_FILENAME: &str = "curb_cloud.las";

// 1 mm grid
const SCALE: f64 = 0.001;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    /// Write point format 2 with a red height ramp instead of bare xyz.
    pub colorize: bool,
    /// Height mapped to black by the ramp.
    pub color_baseline: f64,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            colorize: false,
            color_baseline: 133.8,
        }
    }
}

/// Writes `x, y, z` of every point to `<output_dir>/curb_cloud.las` and
/// returns the written path. The file only appears once every point has
/// been written.
pub fn write_las(
    point_cloud: &PointCloud,
    output_dir: &Path,
    options: &ExportOptions,
) -> Result<PathBuf, ExportError> {
    fs::create_dir_all(output_dir).map_err(|source| ExportError::CreateDir {
        path: output_dir.to_path_buf(),
        source,
    })?;
    let path = output_dir.join(CURB_CLOUD_FILENAME);

    let header = build_header(point_cloud, options)?;
    let partial = tempfile::Builder::new()
        .prefix(".curb_cloud")
        .suffix(".las")
        .tempfile_in(output_dir)?;
    let mut writer = Writer::from_path(partial.path(), header)?;

    for point in point_cloud.iter() {
        let mut las_point = las::Point {
            x: point.x,
            y: point.y,
            z: point.z,
            ..Default::default()
        };
        if options.colorize {
            let [red, green, blue] = height_ramp(point.z, options.color_baseline);
            las_point.color = Some(Color::new(red, green, blue));
        }
        writer.write_point(las_point)?;
    }
    writer.close()?;
    drop(writer);
    partial.persist(&path).map_err(|e| e.error)?;

    log::debug!("wrote {} points to {:?}", point_cloud.len(), path);
    Ok(path)
}

fn build_header(point_cloud: &PointCloud, options: &ExportOptions) -> Result<Header, ExportError> {
    let mut builder = Builder::from((1, 2));
    builder.point_format = Format::new(if options.colorize { 2 } else { 0 })?;
    builder.generating_software = "curb-extract".to_string();

    // Offsetting by the lower corner keeps absolute survey coordinates
    // inside the i32 range of the scaled grid.
    let volume = &point_cloud.metadata.bounding_volume;
    let origin = if volume.is_empty() {
        [0.0; 3]
    } else {
        volume.min.map(f64::floor)
    };
    builder.transforms = Vector {
        x: Transform {
            scale: SCALE,
            offset: origin[0],
        },
        y: Transform {
            scale: SCALE,
            offset: origin[1],
        },
        z: Transform {
            scale: SCALE,
            offset: origin[2],
        },
    };

    Ok(builder.into_header()?)
}
