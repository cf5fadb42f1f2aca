//! Shared error types for the application

use thiserror::Error;

/// Main error type for sentimap operations
#[derive(Debug, Error)]
pub enum Error {
    /// Caller supplied something unusable (bad axis, limit, batch, platform, text or score)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The classifier or a comment source failed
    #[error("Upstream failure: {message}")]
    UpstreamFailure {
        message: String,
        /// Number of comments lost to the failure
        failed: usize,
    },

    /// Nothing has been analyzed yet for the requested key
    #[error("No data available: {0}")]
    NoDataAvailable(String),

    /// Unexpected fault. The message never carries raw fault detail.
    #[error("Internal error: {0}")]
    Internal(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn no_data(message: impl Into<String>) -> Self {
        Self::NoDataAvailable(message.into())
    }

    /// Create an upstream failure that cost `failed` comments
    pub fn upstream(message: impl Into<String>, failed: usize) -> Self {
        Self::UpstreamFailure {
            message: message.into(),
            failed,
        }
    }

    /// Stable short code for programmatic handling.
    ///
    /// - E01x: caller input
    /// - E02x: configuration and local files
    /// - E03x: upstream collaborators
    /// - E04x: data availability
    /// - E09x: internal
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "E010",
            Self::Config(_) => "E020",
            Self::Io(_) => "E021",
            Self::Json(_) => "E022",
            Self::UpstreamFailure { .. } => "E030",
            Self::NoDataAvailable(_) => "E040",
            Self::Internal(_) => "E090",
        }
    }

    /// Whether the caller can fix this by changing what they sent
    pub fn is_user_fixable(&self) -> bool {
        matches!(
            self,
            Self::InvalidInput(_) | Self::Config(_) | Self::NoDataAvailable(_)
        )
    }
}

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, Error>;
