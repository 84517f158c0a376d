/// Errors that can occur while loading market data.
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("Data not found: {0}")]
    NotFound(String),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
