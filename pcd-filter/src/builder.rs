use crate::{
    filter::{CompositeFilter, Filter, GroundSelector, HeightAngleFilter, HeightDiffFilter},
    CurbParams,
};

pub trait FilterBuilder {
    fn build(&self) -> Box<dyn Filter>;
}

/// Ground selection, then the height/angle slab, then the height-difference scan.
pub struct CurbFilterBuilder {
    params: CurbParams,
}

impl CurbFilterBuilder {
    pub fn new(params: CurbParams) -> Self {
        Self { params }
    }
}

impl FilterBuilder for CurbFilterBuilder {
    fn build(&self) -> Box<dyn Filter> {
        let params = &self.params;
        let ground_selector: Box<dyn Filter> =
            Box::new(GroundSelector::new(params.ground_label, params.offset));
        let height_angle_filter: Box<dyn Filter> = Box::new(HeightAngleFilter::new(
            params.height_margin,
            params.min_angle,
        ));
        let height_diff_filter: Box<dyn Filter> =
            Box::new(HeightDiffFilter::new(params.min_height_diff));

        let composite = CompositeFilter::new(vec![
            ground_selector,
            height_angle_filter,
            height_diff_filter,
        ]);

        Box::new(composite)
    }
}
