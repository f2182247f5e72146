use thiserror::Error;

pub type Result<T> = std::result::Result<T, RecommenderError>;

#[derive(Debug, Error)]
pub enum RecommenderError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Malformed interaction log: {0}")]
    MalformedLog(String),

    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl RecommenderError {
    pub fn user_not_found(user_id: i64) -> Self {
        RecommenderError::NotFound(format!("user {} is not in the interaction matrix", user_id))
    }

    pub fn article_not_found(article_id: i64) -> Self {
        RecommenderError::NotFound(format!(
            "article {} is not in the interaction matrix",
            article_id
        ))
    }

    /// Lookup failures are reported to callers as bad input, not as internal faults.
    pub fn is_not_found(&self) -> bool {
        matches!(self, RecommenderError::NotFound(_))
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, RecommenderError::Configuration(_))
    }
}

// Implement conversions from other error types
impl From<serde_json::Error> for RecommenderError {
    fn from(err: serde_json::Error) -> Self {
        RecommenderError::Serialization(err.to_string())
    }
}
