use pcd_core::pointcloud::point::PointCloud;

use super::Filter;
use crate::FilterError;

/// Keeps the points labelled `ground_label` and moves them into the local
/// frame by subtracting `offset`. Points without a finite planimetric
/// position are dropped. Returns an empty cloud when nothing carries the
/// label.
pub fn select_ground(point_cloud: PointCloud, ground_label: u8, offset: [f64; 3]) -> PointCloud {
    let points: Vec<_> = point_cloud
        .points
        .iter()
        .filter(|p| p.attributes.label == ground_label)
        .filter(|p| p.x.is_finite() && p.y.is_finite())
        .map(|p| p.translated(offset))
        .collect();

    let applied = point_cloud.metadata.offset;
    PointCloud::with_offset(
        points,
        [
            applied[0] + offset[0],
            applied[1] + offset[1],
            applied[2] + offset[2],
        ],
    )
}

pub struct GroundSelector {
    pub ground_label: u8,
    pub offset: [f64; 3],
}

impl GroundSelector {
    pub fn new(ground_label: u8, offset: [f64; 3]) -> Self {
        Self {
            ground_label,
            offset,
        }
    }
}

impl Filter for GroundSelector {
    fn name(&self) -> &'static str {
        "ground selector"
    }

    fn filter(&self, point_cloud: PointCloud) -> Result<PointCloud, FilterError> {
        let selected = select_ground(point_cloud, self.ground_label, self.offset);
        if selected.is_empty() {
            return Err(FilterError::NoGroundPoints {
                label: self.ground_label,
            });
        }
        Ok(selected)
    }
}
