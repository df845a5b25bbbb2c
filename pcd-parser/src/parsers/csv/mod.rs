use std::{collections::HashMap, path::PathBuf};

use csv::ReaderBuilder;

use pcd_core::pointcloud::point::{Point, PointCloud};

use super::{normalize_name, AttributeNames, Parser, ParserProvider};
use crate::ParseError;

pub struct CsvParserProvider {
    pub filename: PathBuf,
    pub fields: AttributeNames,
}

impl ParserProvider for CsvParserProvider {
    fn get_parser(&self) -> Box<dyn Parser> {
        Box::new(CsvParser {
            filename: self.filename.clone(),
            fields: self.fields.clone(),
        })
    }
}

pub struct CsvParser {
    pub filename: PathBuf,
    pub fields: AttributeNames,
}

impl Parser for CsvParser {
    fn parse(&self) -> Result<PointCloud, ParseError> {
        let start = std::time::Instant::now();
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_path(&self.filename)?;

        let field_mapping = create_field_mapping(reader.headers()?, &self.fields)?;

        let mut points = Vec::new();
        for (index, record) in reader.records().enumerate() {
            let record = record?;
            // header is line 1
            let line = index + 2;

            let x = parse_field(&record, &field_mapping, "x", line)?;
            let y = parse_field(&record, &field_mapping, "y", line)?;
            let z = parse_field(&record, &field_mapping, "z", line)?;
            let scan_angle = parse_field(&record, &field_mapping, "scan_angle", line)?;
            let label = parse_field(&record, &field_mapping, "label", line)?;

            points.push(Point::new(x, y, z, scan_angle, label as u8));
        }
        log::info!(
            "Read CSV time: {:?} ({} points)",
            start.elapsed(),
            points.len()
        );

        Ok(PointCloud::new(points))
    }
}

fn create_field_mapping(
    headers: &csv::StringRecord,
    fields: &AttributeNames,
) -> Result<HashMap<&'static str, usize>, ParseError> {
    let candidates: [(&'static str, Vec<&str>); 5] = [
        ("x", vec!["x"]),
        ("y", vec!["y"]),
        ("z", vec!["z"]),
        (
            "scan_angle",
            vec![fields.scan_angle.as_str(), "scan_angle", "scan_angle_rank"],
        ),
        (
            "label",
            vec![fields.label.as_str(), "label", "classification"],
        ),
    ];

    let mut mapping = HashMap::new();
    for (attribute, names) in &candidates {
        let names: Vec<String> = names.iter().map(|n| normalize_name(n)).collect();
        let index = headers
            .iter()
            .position(|header| names.contains(&normalize_name(header)))
            .ok_or_else(|| ParseError::MissingProperty(attribute.to_string()))?;
        mapping.insert(*attribute, index);
    }

    Ok(mapping)
}

fn parse_field(
    record: &csv::StringRecord,
    field_mapping: &HashMap<&'static str, usize>,
    field_name: &str,
    line: usize,
) -> Result<f64, ParseError> {
    let value = field_mapping
        .get(field_name)
        .and_then(|&index| record.get(index))
        .ok_or_else(|| ParseError::InvalidValue {
            line,
            value: format!("<missing {}>", field_name),
        })?;

    value.parse::<f64>().map_err(|_| ParseError::InvalidValue {
        line,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use super::*;

    fn parse_text(text: &str, fields: AttributeNames) -> Result<PointCloud, ParseError> {
        let mut tmp = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        tmp.write_all(text.as_bytes()).unwrap();
        let provider = CsvParserProvider {
            filename: tmp.path().to_path_buf(),
            fields,
        };
        provider.get_parser().parse()
    }

    #[test]
    fn reads_default_column_names() {
        let text = "X,Y,Z,scalar_ScanAngleRank,scalar_Label\n\
                    1.0,2.0,3.0,18,1\n\
                    4.0,5.0,6.0,-20,2\n";
        let cloud = parse_text(text, AttributeNames::default()).unwrap();
        assert_eq!(cloud.len(), 2);
        assert_eq!(cloud.points[0].xyz(), [1.0, 2.0, 3.0]);
        assert_eq!(cloud.points[1].attributes.scan_angle, -20.0);
        assert_eq!(cloud.points[1].attributes.label, 2);
    }

    #[test]
    fn reads_alias_columns_in_any_order() {
        let text = "classification, z, Scan-Angle, y, x\n1, 9.5, 16, 2, 3\n";
        let cloud = parse_text(text, AttributeNames::default()).unwrap();
        assert_eq!(cloud.points[0].xyz(), [3.0, 2.0, 9.5]);
        assert_eq!(cloud.points[0].attributes.scan_angle, 16.0);
        assert_eq!(cloud.points[0].attributes.label, 1);
    }

    #[test]
    fn missing_label_column() {
        let text = "x,y,z,scan_angle\n1,2,3,4\n";
        let err = parse_text(text, AttributeNames::default()).unwrap_err();
        assert!(matches!(err, ParseError::MissingProperty(name) if name == "label"));
    }

    #[test]
    fn bad_number_reports_line() {
        let text = "x,y,z,scan_angle,label\n1,2,3,4,1\n1,oops,3,4,1\n";
        let err = parse_text(text, AttributeNames::default()).unwrap_err();
        assert!(matches!(
            err,
            ParseError::InvalidValue { line: 3, value } if value == "oops"
        ));
    }
}
