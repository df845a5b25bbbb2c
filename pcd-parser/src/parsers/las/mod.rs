use std::path::PathBuf;

use las::Reader;

use pcd_core::pointcloud::point::{Point, PointCloud};

use super::{Parser, ParserProvider, MAX_PREALLOCATED_POINTS};
use crate::ParseError;

pub struct LasParserProvider {
    pub filename: PathBuf,
}

impl ParserProvider for LasParserProvider {
    fn get_parser(&self) -> Box<dyn Parser> {
        Box::new(LasParser {
            filename: self.filename.clone(),
        })
    }
}

pub struct LasParser {
    pub filename: PathBuf,
}

impl Parser for LasParser {
    fn parse(&self) -> Result<PointCloud, ParseError> {
        let start = std::time::Instant::now();
        let mut reader = Reader::from_path(&self.filename)?;
        log::info!("Open LAS time: {:?}", start.elapsed());

        let start = std::time::Instant::now();
        let mut points = Vec::with_capacity(
            usize::try_from(reader.header().number_of_points())
                .map_or(MAX_PREALLOCATED_POINTS, |n| n.min(MAX_PREALLOCATED_POINTS)),
        );
        for las_point in reader.points() {
            let las_point = las_point?;

            points.push(Point::new(
                las_point.x,
                las_point.y,
                las_point.z,
                las_point.scan_angle as f64,
                u8::from(las_point.classification),
            ));
        }
        log::info!(
            "Build PointCloud time: {:?} ({} points)",
            start.elapsed(),
            points.len()
        );

        Ok(PointCloud::new(points))
    }
}

#[cfg(test)]
mod tests {
    use las::{point::Classification, Builder, Writer};

    use super::*;

    fn write_fixture(path: &std::path::Path) {
        let mut builder = Builder::from((1, 2));
        builder.point_format = las::point::Format::new(1).unwrap();
        let header = builder.into_header().unwrap();
        let mut writer = Writer::from_path(path, header).unwrap();

        for (x, z, angle, classification) in [
            (1.0, 130.0, 18.0, Classification::new(1).unwrap()),
            (2.0, 131.0, -5.0, Classification::Ground),
        ] {
            let point = las::Point {
                x,
                y: 10.0,
                z,
                scan_angle: angle,
                classification,
                gps_time: Some(0.0),
                ..Default::default()
            };
            writer.write_point(point).unwrap();
        }
        writer.close().unwrap();
    }

    #[test]
    fn reads_scan_angle_and_raw_classification() {
        let tmp = tempfile::Builder::new().suffix(".las").tempfile().unwrap();
        write_fixture(tmp.path());

        let provider = LasParserProvider {
            filename: tmp.path().to_path_buf(),
        };
        let cloud = provider.get_parser().parse().unwrap();

        assert_eq!(cloud.len(), 2);
        assert!((cloud.points[0].x - 1.0).abs() < 1e-3);
        assert!((cloud.points[1].z - 131.0).abs() < 1e-3);
        assert_eq!(cloud.points[0].attributes.scan_angle, 18.0);
        assert_eq!(cloud.points[1].attributes.scan_angle, -5.0);
        assert_eq!(cloud.points[0].attributes.label, 1);
        // ASPRS ground
        assert_eq!(cloud.points[1].attributes.label, 2);
    }

    #[test]
    fn missing_file_is_an_error() {
        let provider = LasParserProvider {
            filename: PathBuf::from("/tmp/nonexistent_file_that_does_not_exist_12345.las"),
        };
        assert!(provider.get_parser().parse().is_err());
    }
}
