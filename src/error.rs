use thiserror::Error;

#[derive(Debug, Error)]
pub enum MeshBatchError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Submission error: {0}")]
    SubmissionError(String),

    #[error("Status error: {0}")]
    StatusError(String),

    #[error("Download error: {0}")]
    DownloadError(String),

    #[error("Staging error: {0}")]
    StagingError(String),

    #[error("Worker pool error: {0}")]
    PoolError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Generates factory methods for [`MeshBatchError`] variants that wrap a `String`.
macro_rules! error_constructors {
    ($(
        $(#[doc = $doc:expr])*
        $method:ident => $variant:ident
    ),* $(,)?) => {
        impl MeshBatchError {
            $(
                $(#[doc = $doc])*
                pub fn $method(msg: impl Into<String>) -> Self {
                    Self::$variant(msg.into())
                }
            )*
        }
    };
}

error_constructors! {
    /// Create a configuration error.
    config => ConfigError,
    /// Create a session submission error.
    submission => SubmissionError,
    /// Create a status request error.
    status => StatusError,
    /// Create an artifact download error.
    download => DownloadError,
    /// Create a staging error.
    staging => StagingError,
    /// Create a worker pool error.
    pool => PoolError,
}

impl From<serde_yml::Error> for MeshBatchError {
    fn from(e: serde_yml::Error) -> Self {
        Self::ConfigError(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, MeshBatchError>;
