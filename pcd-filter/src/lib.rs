pub mod builder;
pub mod error;
pub mod filter;
pub mod params;
pub mod runner;

pub use builder::{CurbFilterBuilder, FilterBuilder};
pub use error::FilterError;
pub use filter::{filter_by_height_diff, filter_by_input_data, select_ground, Filter};
pub use params::CurbParams;
pub use runner::{PointCloudFilterRunner, Runner};

use pcd_core::pointcloud::point::PointCloud;

/// Extracts the curb cloud: ground selection and offset, height/angle slab,
/// then the consecutive height-difference scan.
///
/// Fails with [`FilterError::NoGroundPoints`] when no point carries the
/// ground label. A cloud emptied by a later stage is returned as `Ok`.
pub fn process_cloud(
    point_cloud: PointCloud,
    params: &CurbParams,
) -> Result<PointCloud, FilterError> {
    let builder = CurbFilterBuilder::new(params.clone());
    let runner = PointCloudFilterRunner::from_builder(&builder);
    runner.execute(point_cloud)
}
