//! Store persistence error types.

/// Errors that can occur while reading or writing persisted store data.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Failed to read a key from storage
    #[error("Failed to read '{key}' from storage: {source}")]
    ReadFailed {
        key: String,
        source: std::io::Error,
    },

    /// Failed to write a key to storage
    #[error("Failed to write '{key}' to storage: {source}")]
    WriteFailed {
        key: String,
        source: std::io::Error,
    },

    /// Failed to serialize persisted state
    #[error("Failed to serialize store state: {0}")]
    Serialization(String),

    /// Failed to deserialize persisted state
    #[error("Failed to deserialize store state: {0}")]
    Deserialization(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_display() {
        let error = StoreError::Serialization("NaN".to_string());
        assert!(error.to_string().contains("serialize"));
        assert!(error.to_string().contains("NaN"));

        let error = StoreError::WriteFailed {
            key: "canvas-store".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
        };
        assert!(error.to_string().contains("canvas-store"));
        assert!(error.to_string().contains("disk full"));
    }
}
