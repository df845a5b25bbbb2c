use serde::Deserialize;

/// Thresholds of the curb extraction pipeline.
///
/// Every field may be omitted when deserializing; missing fields take the
/// defaults below.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CurbParams {
    /// Classification code of ground points. Default `1`.
    pub ground_label: u8,
    /// Translation subtracted from every selected point, `[x, y, z]`.
    /// Default `[627285.0, 4841948.0, 0.0]` (UTM easting/northing of the survey).
    pub offset: [f64; 3],
    /// Height of the slab kept above the lowest ground point. Default `1.2`.
    pub height_margin: f64,
    /// Points need a scan angle strictly above this. Default `15.0`.
    pub min_angle: f64,
    /// Minimum upward jump from the previous record. Default `0.02`.
    pub min_height_diff: f64,
}

impl Default for CurbParams {
    fn default() -> Self {
        Self {
            ground_label: 1,
            offset: [627285.0, 4841948.0, 0.0],
            height_margin: 1.2,
            min_angle: 15.0,
            min_height_diff: 0.02,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let params: CurbParams =
            serde_json::from_str(r#"{ "min_angle": 10.0, "offset": [1.0, 2.0, 3.0] }"#).unwrap();
        assert_eq!(params.min_angle, 10.0);
        assert_eq!(params.offset, [1.0, 2.0, 3.0]);
        assert_eq!(params.ground_label, 1);
        assert_eq!(params.height_margin, 1.2);
        assert_eq!(params.min_height_diff, 0.02);
    }

    #[test]
    fn empty_json_is_default() {
        let params: CurbParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params, CurbParams::default());
    }
}
