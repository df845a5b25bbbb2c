mod config;

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;
use clap::Parser;
use env_logger::Builder;
use log::LevelFilter;
use thiserror::Error;

use config::{Config, ConfigError};
use pcd_core::pointcloud::point::PointCloud;
use pcd_exporter::{write_las, ExportError};
use pcd_filter::{process_cloud, FilterError};
use pcd_parser::parsers::{
    csv::CsvParserProvider, extension_of, las::LasParserProvider, ply::PlyParserProvider,
    AttributeNames, Extension, Parser as _, ParserProvider as _,
};
use pcd_parser::ParseError;

#[derive(Parser, Debug)]
#[command(
    name = "Curb Extractor",
    about = "Road curb cloud segmentation from classified LiDAR point clouds",
    author = "MIERUNE Inc.",
    version = "0.0.1"
)]
struct Cli {
    /// path to .ply file (.las, .laz, .csv and .txt are also accepted)
    #[arg(value_name = "FILE")]
    input_file: PathBuf,

    /// path to output .las file
    #[arg(long = "output_dir", default_value = ".", value_name = "DIR")]
    output_dir: PathBuf,

    /// JSON settings file with "filter", "fields" and "export" sections
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    #[arg(long)]
    ground_label: Option<u8>,

    #[arg(long, allow_negative_numbers = true)]
    offset_x: Option<f64>,

    #[arg(long, allow_negative_numbers = true)]
    offset_y: Option<f64>,

    #[arg(long, allow_negative_numbers = true)]
    height_margin: Option<f64>,

    #[arg(long, allow_negative_numbers = true)]
    min_angle: Option<f64>,

    #[arg(long, allow_negative_numbers = true)]
    min_height_diff: Option<f64>,

    /// name of the scan angle property in PLY/CSV input
    #[arg(long)]
    scan_angle_field: Option<String>,

    /// name of the classification property in PLY/CSV input
    #[arg(long)]
    label_field: Option<String>,

    /// color points by height in the output
    #[arg(long)]
    colorize: bool,

    #[arg(long, allow_negative_numbers = true)]
    color_baseline: Option<f64>,
}

#[derive(Debug, Error)]
enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to parse point cloud: {0}")]
    Parse(#[from] ParseError),
    #[error("failed to filter point cloud: {0}")]
    Filter(#[from] FilterError),
    #[error("failed to export curb cloud: {0}")]
    Export(#[from] ExportError),
    #[error("no point survived the curb filters")]
    EmptyCurbCloud,
}

// defaults < config file < command line
fn resolve_config(args: &Cli) -> Result<Config, ConfigError> {
    let mut config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    let filter = &mut config.filter;
    if let Some(label) = args.ground_label {
        filter.ground_label = label;
    }
    if let Some(x) = args.offset_x {
        filter.offset[0] = x;
    }
    if let Some(y) = args.offset_y {
        filter.offset[1] = y;
    }
    if let Some(margin) = args.height_margin {
        filter.height_margin = margin;
    }
    if let Some(angle) = args.min_angle {
        filter.min_angle = angle;
    }
    if let Some(diff) = args.min_height_diff {
        filter.min_height_diff = diff;
    }

    if let Some(name) = &args.scan_angle_field {
        config.fields.scan_angle = name.clone();
    }
    if let Some(name) = &args.label_field {
        config.fields.label = name.clone();
    }

    if args.colorize {
        config.export.colorize = true;
    }
    if let Some(baseline) = args.color_baseline {
        config.export.color_baseline = baseline;
    }

    Ok(config)
}

fn get_parser(
    input_file: &Path,
    fields: &AttributeNames,
) -> Result<Box<dyn pcd_parser::parsers::Parser>, ParseError> {
    let filename = input_file.to_path_buf();
    let parser = match extension_of(input_file)? {
        Extension::Ply => PlyParserProvider {
            filename,
            fields: fields.clone(),
        }
        .get_parser(),
        Extension::Las | Extension::Laz => LasParserProvider { filename }.get_parser(),
        Extension::Csv | Extension::Txt => CsvParserProvider {
            filename,
            fields: fields.clone(),
        }
        .get_parser(),
    };
    Ok(parser)
}

fn log_summary(curb_cloud: &PointCloud) {
    let volume = &curb_cloud.metadata.bounding_volume;
    let extent = volume.extent();
    log::info!("curb points: {}", curb_cloud.len());
    log::info!(
        "curb bounds (local): min {:?}, max {:?}, extent [{:.3}, {:.3}, {:.3}]",
        volume.min,
        volume.max,
        extent[0],
        extent[1],
        extent[2]
    );
    log::info!("local frame offset: {:?}", curb_cloud.metadata.offset);
}

fn run(args: &Cli) -> Result<PathBuf, AppError> {
    let config = resolve_config(args)?;
    log::info!("filter parameters: {:?}", config.filter);

    let start = std::time::Instant::now();

    log::info!("start parsing...");
    let start_local = std::time::Instant::now();
    let parser = get_parser(&args.input_file, &config.fields)?;
    let point_cloud = parser.parse()?;
    log::info!(
        "finish parsing {} points in {:?}",
        point_cloud.len(),
        start_local.elapsed()
    );

    log::info!("start filtering...");
    let start_local = std::time::Instant::now();
    let curb_cloud = process_cloud(point_cloud, &config.filter)?;
    log::info!("finish filtering in {:?}", start_local.elapsed());

    if curb_cloud.is_empty() {
        return Err(AppError::EmptyCurbCloud);
    }
    log_summary(&curb_cloud);

    log::info!("start exporting...");
    let savepath = write_las(&curb_cloud, &args.output_dir, &config.export)?;

    log::info!("Elapsed: {:?}", start.elapsed());
    Ok(savepath)
}

fn main() {
    Builder::new()
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{}] - {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .filter(None, LevelFilter::Info)
        .parse_default_env()
        .init();

    let args = Cli::parse();

    log::info!("input file: {:?}", args.input_file);
    log::info!("output folder: {:?}", args.output_dir);

    match run(&args) {
        Ok(savepath) => {
            println!("Successfully save curb cloud to {}", savepath.display());
        }
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    }
}
