use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum FilterError {
    #[error("no point carries the ground label {label}")]
    NoGroundPoints { label: u8 },
    #[error("{stage}: input cloud has no finite height")]
    EmptyCloud { stage: &'static str },
}
