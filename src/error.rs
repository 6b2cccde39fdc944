use thiserror::Error;

/// Main error type for Macscope
#[derive(Error, Debug)]
pub enum MacscopeError {
    /// A bounding-box coordinate is missing, non-numeric, or non-finite
    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),

    /// A required request parameter (e.g. the MAC address) is absent or empty
    #[error("Missing parameter: {0}")]
    MissingParameter(&'static str),

    /// Graph store connection or query round-trip failure
    #[error("Graph store error: {0}")]
    Store(#[from] neo4rs::Error),

    /// A result row did not decode into the expected shape
    #[error("Malformed store row: {0}")]
    Row(#[from] neo4rs::DeError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File system I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenient Result type using MacscopeError
pub type Result<T> = std::result::Result<T, MacscopeError>;
