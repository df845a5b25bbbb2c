use pcd_core::pointcloud::point::PointCloud;

use super::Filter;
use crate::FilterError;

/// Keeps index `i` iff `z[i] - z[i - 1] > min_diff`, with the difference of
/// the first record fixed at `0`.
///
/// Neighbours are consecutive records of the input (scan) order, not spatial
/// neighbours, so the result depends on that order.
pub fn filter_by_height_diff(point_cloud: PointCloud, min_diff: f64) -> PointCloud {
    let mut mask = Vec::with_capacity(point_cloud.len());
    let mut previous_z = None;

    for point in point_cloud.iter() {
        let diff = match previous_z {
            Some(previous) => point.z - previous,
            None => 0.0,
        };
        mask.push(diff > min_diff);
        previous_z = Some(point.z);
    }

    point_cloud.select(&mask)
}

pub struct HeightDiffFilter {
    pub min_diff: f64,
}

impl HeightDiffFilter {
    pub fn new(min_diff: f64) -> Self {
        Self { min_diff }
    }
}

impl Filter for HeightDiffFilter {
    fn name(&self) -> &'static str {
        "height-difference filter"
    }

    fn filter(&self, point_cloud: PointCloud) -> Result<PointCloud, FilterError> {
        Ok(filter_by_height_diff(point_cloud, self.min_diff))
    }
}

#[cfg(test)]
mod tests {
    use pcd_core::pointcloud::point::Point;
    use proptest::prelude::*;

    use super::*;

    fn cloud(zs: &[f64]) -> PointCloud {
        PointCloud::new(
            zs.iter()
                .enumerate()
                .map(|(i, &z)| Point::new(i as f64, 0.0, z, 20.0, 1))
                .collect(),
        )
    }

    fn kept_indices(cloud: &PointCloud) -> Vec<usize> {
        cloud.iter().map(|p| p.x as usize).collect()
    }

    #[test]
    fn keeps_upward_jumps_above_threshold() {
        let out = filter_by_height_diff(cloud(&[1.0, 1.01, 1.1, 1.0, 1.5, 1.5]), 0.02);
        assert_eq!(kept_indices(&out), vec![2, 4]);
    }

    #[test]
    fn difference_equal_to_threshold_is_dropped() {
        let out = filter_by_height_diff(cloud(&[0.0, 0.5, 1.0]), 0.5);
        assert!(out.is_empty());
    }

    #[test]
    fn first_record_needs_negative_threshold() {
        assert!(filter_by_height_diff(cloud(&[5.0]), 0.0).is_empty());
        assert_eq!(kept_indices(&filter_by_height_diff(cloud(&[5.0]), -0.1)), vec![0]);
    }

    #[test]
    fn first_record_does_not_wrap_to_last() {
        // A jump from the final record to the first must not count.
        let out = filter_by_height_diff(cloud(&[10.0, 1.0, 1.0]), 0.02);
        assert!(out.is_empty());
    }

    #[test]
    fn differences_follow_input_order_not_space() {
        // drop back to 8.5 after 9.0
        let out = filter_by_height_diff(cloud(&[9.0, 8.5]), 0.02);
        assert!(out.is_empty());
        // same heights in the other order give a jump
        let out = filter_by_height_diff(cloud(&[8.5, 9.0]), 0.02);
        assert_eq!(kept_indices(&out), vec![1]);
    }

    #[test]
    fn difference_uses_dropped_predecessors() {
        // 1.24 is compared with 1.23, not with the last kept record
        let out = filter_by_height_diff(cloud(&[1.2, 1.23, 1.24]), 0.02);
        assert_eq!(kept_indices(&out), vec![1]);
    }

    #[test]
    fn empty_input() {
        assert!(filter_by_height_diff(PointCloud::new(vec![]), 0.02).is_empty());
    }

    proptest! {
        #[test]
        fn retention_matches_consecutive_difference(
            zs in prop::collection::vec(-5.0f64..5.0, 0..300),
            min_diff in -1.0f64..1.0,
        ) {
            let out = filter_by_height_diff(cloud(&zs), min_diff);
            let expected: Vec<usize> = (0..zs.len())
                .filter(|&i| {
                    let diff = if i == 0 { 0.0 } else { zs[i] - zs[i - 1] };
                    diff > min_diff
                })
                .collect();
            prop_assert_eq!(kept_indices(&out), expected);
        }
    }
}
