use pcd_core::pointcloud::point::PointCloud;

use crate::{builder::FilterBuilder, filter::Filter, FilterError};

pub trait Runner {
    fn execute(&self, point_cloud: PointCloud) -> Result<PointCloud, FilterError>;
}

pub struct PointCloudFilterRunner {
    filter: Box<dyn Filter>,
}

impl PointCloudFilterRunner {
    pub fn new(filter: Box<dyn Filter>) -> Self {
        Self { filter }
    }

    pub fn from_builder(builder: &dyn FilterBuilder) -> Self {
        Self::new(builder.build())
    }
}

impl Runner for PointCloudFilterRunner {
    fn execute(&self, point_cloud: PointCloud) -> Result<PointCloud, FilterError> {
        let input_count = point_cloud.len();
        let filtered = self.filter.filter(point_cloud)?;
        log::info!(
            "{}: kept {} of {} points",
            self.filter.name(),
            filtered.len(),
            input_count
        );
        Ok(filtered)
    }
}
