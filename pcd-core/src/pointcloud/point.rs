#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointAttributes {
    /// Scan angle rank in degrees, signed (off-nadir angle of the scanner).
    pub scan_angle: f64,
    /// Classification code.
    pub label: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub attributes: PointAttributes,
}

impl Point {
    pub fn new(x: f64, y: f64, z: f64, scan_angle: f64, label: u8) -> Self {
        Self {
            x,
            y,
            z,
            attributes: PointAttributes { scan_angle, label },
        }
    }

    pub fn xyz(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    pub fn translated(&self, offset: [f64; 3]) -> Self {
        Self {
            x: self.x - offset[0],
            y: self.y - offset[1],
            z: self.z - offset[2],
            attributes: self.attributes,
        }
    }
}

/// Ordered point records. Order is the acquisition (file) order and is
/// never changed by filtering.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PointCloud {
    pub points: Vec<Point>,
    pub metadata: Metadata,
}

impl PointCloud {
    pub fn new(points: Vec<Point>) -> Self {
        Self::with_offset(points, [0.0; 3])
    }

    /// Builds a cloud whose coordinates already have `offset` subtracted.
    pub fn with_offset(points: Vec<Point>, offset: [f64; 3]) -> Self {
        let mut bounding_volume = BoundingVolume::empty();
        for point in &points {
            bounding_volume.expand(point.xyz());
        }

        let metadata = Metadata {
            point_count: points.len(),
            bounding_volume,
            offset,
        };

        PointCloud { points, metadata }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Point> {
        self.points.iter()
    }

    pub fn xyz(&self) -> impl Iterator<Item = [f64; 3]> + '_ {
        self.points.iter().map(Point::xyz)
    }

    /// Keeps the points whose mask entry is `true`, in their original order.
    ///
    /// # Panics
    ///
    /// Panics if `mask.len() != self.len()`.
    pub fn select(&self, mask: &[bool]) -> Self {
        assert_eq!(
            mask.len(),
            self.len(),
            "mask length must match the number of points"
        );

        let points = self
            .points
            .iter()
            .zip(mask)
            .filter(|(_, &keep)| keep)
            .map(|(point, _)| *point)
            .collect();

        Self::with_offset(points, self.metadata.offset)
    }

    /// Lowest finite z, or `None` when the cloud holds no finite z value.
    pub fn min_z(&self) -> Option<f64> {
        self.points
            .iter()
            .map(|p| p.z)
            .filter(|z| z.is_finite())
            .reduce(f64::min)
    }
}

// min/max of the finite coordinates; an empty volume has min > max.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingVolume {
    pub min: [f64; 3],
    pub max: [f64; 3],
}

impl BoundingVolume {
    pub fn empty() -> Self {
        Self {
            min: [f64::MAX, f64::MAX, f64::MAX],
            max: [f64::MIN, f64::MIN, f64::MIN],
        }
    }

    pub fn is_empty(&self) -> bool {
        (0..3).any(|axis| self.min[axis] > self.max[axis])
    }

    pub fn expand(&mut self, point: [f64; 3]) {
        if !point.iter().all(|v| v.is_finite()) {
            return;
        }
        for (axis, &value) in point.iter().enumerate() {
            self.min[axis] = self.min[axis].min(value);
            self.max[axis] = self.max[axis].max(value);
        }
    }

    pub fn extent(&self) -> [f64; 3] {
        if self.is_empty() {
            return [0.0; 3];
        }
        [
            self.max[0] - self.min[0],
            self.max[1] - self.min[1],
            self.max[2] - self.min[2],
        ]
    }
}

impl Default for BoundingVolume {
    fn default() -> Self {
        Self::empty()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Metadata {
    pub point_count: usize,
    pub bounding_volume: BoundingVolume,
    /// Translation already subtracted from the coordinates.
    pub offset: [f64; 3],
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn make_cloud(zs: &[f64]) -> PointCloud {
        let points = zs
            .iter()
            .enumerate()
            .map(|(i, &z)| Point::new(i as f64, -(i as f64), z, 20.0, 1))
            .collect();
        PointCloud::new(points)
    }

    #[test]
    fn new_builds_metadata() {
        let cloud = make_cloud(&[3.0, 1.0, 2.0]);
        assert_eq!(cloud.metadata.point_count, 3);
        assert_eq!(cloud.metadata.bounding_volume.min, [0.0, -2.0, 1.0]);
        assert_eq!(cloud.metadata.bounding_volume.max, [2.0, 0.0, 3.0]);
        assert_eq!(cloud.metadata.offset, [0.0; 3]);
    }

    #[test]
    fn empty_cloud_has_empty_volume() {
        let cloud = PointCloud::new(vec![]);
        assert!(cloud.is_empty());
        assert!(cloud.metadata.bounding_volume.is_empty());
        assert_eq!(cloud.metadata.bounding_volume.extent(), [0.0; 3]);
        assert_eq!(cloud.min_z(), None);
    }

    #[test]
    fn bounding_volume_ignores_non_finite() {
        let cloud = PointCloud::new(vec![
            Point::new(0.0, 0.0, 0.0, 0.0, 1),
            Point::new(f64::NAN, 5.0, 5.0, 0.0, 1),
            Point::new(1.0, 1.0, f64::INFINITY, 0.0, 1),
        ]);
        assert_eq!(cloud.metadata.bounding_volume.min, [0.0; 3]);
        assert_eq!(cloud.metadata.bounding_volume.max, [0.0; 3]);
    }

    #[test]
    fn select_keeps_masked_points_in_order() {
        let cloud = make_cloud(&[10.0, 11.0, 12.0, 13.0]);
        let selected = cloud.select(&[true, false, false, true]);
        let zs: Vec<f64> = selected.iter().map(|p| p.z).collect();
        assert_eq!(zs, vec![10.0, 13.0]);
        assert_eq!(selected.metadata.point_count, 2);
    }

    #[test]
    fn select_carries_offset() {
        let cloud = PointCloud::with_offset(vec![Point::default()], [1.0, 2.0, 0.0]);
        let selected = cloud.select(&[true]);
        assert_eq!(selected.metadata.offset, [1.0, 2.0, 0.0]);
    }

    #[test]
    #[should_panic]
    fn select_panics_on_mask_mismatch() {
        let cloud = make_cloud(&[1.0, 2.0]);
        let _ = cloud.select(&[true]);
    }

    #[test]
    fn min_z_skips_nan() {
        let cloud = make_cloud(&[f64::NAN, 4.0, 2.5, 3.0]);
        assert_eq!(cloud.min_z(), Some(2.5));

        let all_nan = make_cloud(&[f64::NAN, f64::NAN]);
        assert_eq!(all_nan.min_z(), None);
    }

    #[test]
    fn translated_subtracts_offset() {
        let p = Point::new(627290.5, 4841950.0, 134.0, 18.0, 1);
        let t = p.translated([627285.0, 4841948.0, 0.0]);
        assert_eq!(t.xyz(), [5.5, 2.0, 134.0]);
        assert_eq!(t.attributes, p.attributes);
    }

    proptest! {
        #[test]
        fn select_len_equals_true_count(
            zs in prop::collection::vec(-100.0f64..100.0, 0..200),
            seed in any::<u64>(),
        ) {
            let cloud = make_cloud(&zs);
            let mask: Vec<bool> = (0..zs.len()).map(|i| (seed >> (i % 64)) & 1 == 1).collect();
            let expected = mask.iter().filter(|&&m| m).count();
            prop_assert_eq!(cloud.select(&mask).len(), expected);
        }
    }
}
