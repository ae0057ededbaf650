use crate::errors::CatnapError;

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Failed to serialize cache: {source}")]
    SerializeFailed {
        #[from]
        source: serde_json::Error,
    },

    #[error("Failed to write cache file ({path}): {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl CatnapError for CacheError {
    fn error_code(&self) -> &'static str {
        match self {
            CacheError::SerializeFailed { .. } => "CACHE_SERIALIZE_FAILED",
            CacheError::WriteFailed { .. } => "CACHE_WRITE_FAILED",
        }
    }
}
