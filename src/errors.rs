use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("EMPTY_LAYOUT: at least one category is required")]
    EmptyLayout,
    #[error("DUPLICATE_CATEGORY: {0}")]
    DuplicateCategory(String),
    #[error("UNKNOWN_CATEGORY: {0}")]
    UnknownCategory(String),
    #[error("INVALID_VALUE: {0}")]
    InvalidValue(String),
    #[error("CONFIG_INVALID: {0}")]
    Config(String),
    #[error("IO_FAILURE: {0}")]
    Io(String),
    #[error("INTERNAL: {0}")]
    Internal(String),
}

impl From<std::io::Error> for ChartError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value.to_string())
    }
}

impl From<serde_json::Error> for ChartError {
    fn from(value: serde_json::Error) -> Self {
        Self::Internal(value.to_string())
    }
}

impl From<serde_yaml::Error> for ChartError {
    fn from(value: serde_yaml::Error) -> Self {
        Self::Config(value.to_string())
    }
}

pub type ChartResult<T> = Result<T, ChartError>;
