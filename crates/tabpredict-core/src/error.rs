//! Error types for tabpredict

/// Result type alias using tabpredict's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for tabpredict operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Feature schema loading errors
    #[error("schema error: {0}")]
    Schema(String),

    /// Classifier loading or invocation errors
    #[error("classifier error: {0}")]
    Classifier(String),

    /// IO errors
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic internal errors
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new schema error
    pub fn schema(msg: impl Into<String>) -> Self {
        Self::Schema(msg.into())
    }

    /// Create a new classifier error
    pub fn classifier(msg: impl Into<String>) -> Self {
        Self::Classifier(msg.into())
    }

    /// Create a new internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            Error::classifier("boom").to_string(),
            "classifier error: boom"
        );
        assert_eq!(Error::schema("dup").to_string(), "schema error: dup");
    }
}
