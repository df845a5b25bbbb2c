use pcd_core::pointcloud::point::PointCloud;

use crate::FilterError;

pub mod ground;
pub mod height_angle;
pub mod height_diff;

pub use ground::{select_ground, GroundSelector};
pub use height_angle::{filter_by_input_data, HeightAngleFilter};
pub use height_diff::{filter_by_height_diff, HeightDiffFilter};

/// One stage of the pipeline. A stage consumes its input and returns a new,
/// narrowed cloud whose points keep their relative order.
pub trait Filter {
    fn name(&self) -> &'static str;

    fn filter(&self, point_cloud: PointCloud) -> Result<PointCloud, FilterError>;
}

/// Runs stages in sequence, feeding each output to the next stage.
pub struct CompositeFilter {
    filters: Vec<Box<dyn Filter>>,
}

impl CompositeFilter {
    pub fn new(filters: Vec<Box<dyn Filter>>) -> Self {
        Self { filters }
    }
}

impl Filter for CompositeFilter {
    fn name(&self) -> &'static str {
        "composite"
    }

    fn filter(&self, point_cloud: PointCloud) -> Result<PointCloud, FilterError> {
        let mut intermediate = point_cloud;

        for filter in &self.filters {
            let input_count = intermediate.len();
            intermediate = filter.filter(intermediate)?;
            log::debug!(
                "{}: {} -> {} points",
                filter.name(),
                input_count,
                intermediate.len()
            );
        }

        Ok(intermediate)
    }
}
