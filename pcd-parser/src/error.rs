use std::{io, path::PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("read error: {0}")]
    Io(#[from] io::Error),
    #[error("file extension is not found: {}", .0.display())]
    MissingExtension(PathBuf),
    #[error("unsupported extension: {0}")]
    UnsupportedExtension(String),
    #[error("invalid header: {0}")]
    InvalidHeader(String),
    #[error("required property '{0}' is missing")]
    MissingProperty(String),
    #[error("unsupported property: {0}")]
    UnsupportedProperty(String),
    #[error("invalid value '{value}' at line {line}")]
    InvalidValue { line: usize, value: String },
    #[error("file ended after {read} of {expected} points")]
    UnexpectedEof { expected: usize, read: usize },
    #[error("LAS error: {0}")]
    Las(#[from] las::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
