use thiserror::Error;
use http::StatusCode;
use http::header::InvalidHeaderValue;
use parquet::errors::ParquetError;
use arrow::error::ArrowError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP error: {0}")]
    Http(#[from] rquest::Error),

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: StatusCode },

    #[error("Invalid header value: {0}")]
    Header(#[from] InvalidHeaderValue),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Invalid selector `{0}`")]
    Selector(String),

    #[error("Cannot decode field `{field}` from {value:?}")]
    Decode { field: &'static str, value: String },

    #[error("Invalid table format: {0}")]
    Format(#[from] FormatError),

    #[error("Parquet error: {0}")]
    Parquet(#[from] ParquetError),

    #[error("Arrow error: {0}")]
    Arrow(#[from] ArrowError),
}

/// Schema drift between a table and the fixed column tuple.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("column {index} should be `{expected}`, got `{actual}`")]
pub struct FormatError {
    pub index: usize,
    pub expected: String,
    pub actual: String,
}

impl Error {
    pub(crate) fn decode(field: &'static str, value: impl Into<String>) -> Self {
        Error::Decode { field, value: value.into() }
    }
}
