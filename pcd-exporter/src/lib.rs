pub mod color;
pub mod error;
pub mod writer;

pub use error::ExportError;
pub use writer::{write_las, ExportOptions, CURB_CLOUD_FILENAME};
