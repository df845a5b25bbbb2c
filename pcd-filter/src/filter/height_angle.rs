use pcd_core::pointcloud::point::PointCloud;

use super::Filter;
use crate::FilterError;

/// Keeps index `i` iff `z[i] < max_height` and `scan_angle[i] > min_angle`.
pub fn filter_by_input_data(point_cloud: PointCloud, max_height: f64, min_angle: f64) -> PointCloud {
    let mask: Vec<bool> = point_cloud
        .iter()
        .map(|p| p.z < max_height && p.attributes.scan_angle > min_angle)
        .collect();

    point_cloud.select(&mask)
}

/// Keeps a slab of `height_margin` above the lowest point, seen at oblique
/// scan angles.
pub struct HeightAngleFilter {
    pub height_margin: f64,
    pub min_angle: f64,
}

impl HeightAngleFilter {
    pub fn new(height_margin: f64, min_angle: f64) -> Self {
        Self {
            height_margin,
            min_angle,
        }
    }

    pub fn max_height(&self, point_cloud: &PointCloud) -> Result<f64, FilterError> {
        point_cloud
            .min_z()
            .map(|min_z| min_z + self.height_margin)
            .ok_or(FilterError::EmptyCloud { stage: self.name() })
    }
}

impl Filter for HeightAngleFilter {
    fn name(&self) -> &'static str {
        "height/angle filter"
    }

    fn filter(&self, point_cloud: PointCloud) -> Result<PointCloud, FilterError> {
        let max_height = self.max_height(&point_cloud)?;
        log::info!(
            "height/angle thresholds: z < {:.3}, scan angle > {}",
            max_height,
            self.min_angle
        );

        Ok(filter_by_input_data(point_cloud, max_height, self.min_angle))
    }
}
