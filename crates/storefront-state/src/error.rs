use thiserror::Error;

/// Errors returned by local state persistence.
#[derive(Debug, Error)]
pub enum StateError {
    /// Reading or writing a state file failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// State could not be encoded for storage.
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// A product cannot become a cart line item.
    #[error("invalid product: {0}")]
    InvalidProduct(String),

    /// The storage backend refused the write.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}
