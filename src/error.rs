use thiserror::Error;

/// Error types for graph construction and ancestral path queries
#[derive(Debug, Error)]
pub enum SapError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid graph: {0}")]
    InvalidGraph(String),

    #[error("Parse error at line {line}: {reason}")]
    Parse { line: usize, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SapError>;

impl SapError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        SapError::InvalidArgument(message.into())
    }

    pub fn invalid_graph(message: impl Into<String>) -> Self {
        SapError::InvalidGraph(message.into())
    }

    pub fn parse(line: usize, reason: impl Into<String>) -> Self {
        SapError::Parse {
            line,
            reason: reason.into(),
        }
    }
}
