use thiserror::Error;

/// contribgraph error types
#[derive(Error, Debug)]
pub enum ContribError {
    /// No account identifier available (routes to the configuration prompt)
    #[error("no GitHub username configured")]
    ConfigurationMissing,

    /// Fetch failed: non-success status or network error
    #[error("{0}")]
    Transport(String),

    /// Fetch succeeded but the markup held no day cells
    #[error("No contribution data found")]
    EmptyDataset,

    /// Settings could not be read or written
    #[error("config error: {0}")]
    Config(String),

    /// File I/O error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ContribError {
    /// Whether the UI should offer a retry control for this error
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::ConfigurationMissing)
    }
}

/// Result type alias for contribgraph
pub type Result<T> = std::result::Result<T, ContribError>;
