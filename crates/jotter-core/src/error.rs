use thiserror::Error;

/// Failure of a call to the remote notes service
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Transport failure, no response received
    #[error("network error: {0}")]
    Network(String),

    /// Response with a non-2xx status
    #[error("server responded with status {status}: {message}")]
    Server { status: u16, message: String },

    /// Response body did not match the expected shape
    #[error("failed to decode response: {0}")]
    Decode(String),

    #[error("invalid request url: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::Server { status: 404, .. })
    }
}

impl From<url::ParseError> for ApiError {
    fn from(e: url::ParseError) -> Self {
        ApiError::InvalidUrl(e.to_string())
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else if let Some(status) = e.status() {
            ApiError::Server {
                status: status.as_u16(),
                message: e.to_string(),
            }
        } else {
            ApiError::Network(e.to_string())
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Rejections and failures of collection commands.
///
/// Remote failures have already been reported through the alert controller
/// by the time the caller sees them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollectionError {
    #[error("page {page} is outside 1..={total_pages}")]
    PageOutOfRange { page: u32, total_pages: u32 },

    #[error("'{0}' is not a page number")]
    InvalidPageInput(String),

    #[error(transparent)]
    Remote(#[from] ApiError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SaveError {
    #[error("no edit session is open")]
    NoSession,

    #[error("draft failed validation")]
    Invalid(crate::edit::ValidationErrors),

    #[error(transparent)]
    Remote(#[from] ApiError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BulkError {
    #[error("bulk generation is already running")]
    AlreadyRunning,

    #[error("{total_records} records do not fill a single batch of {batch_size}")]
    NoBatches { total_records: u32, batch_size: u32 },

    #[error("batch {batch} failed after {completed} completed batches: {source}")]
    BatchFailed {
        batch: u32,
        completed: u32,
        #[source]
        source: ApiError,
    },
}

