/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid prompt template: {0}")]
    InvalidPrompt(String),

    #[error("External API error: {0}")]
    ExternalApi(String),

    #[error("Malformed model response: {0}")]
    MalformedResponse(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_converts() {
        let err: AppError = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "closed").into();
        assert!(matches!(err, AppError::Io(_)));
        assert_eq!(err.to_string(), "I/O error: closed");
    }

    #[test]
    fn test_not_found_message() {
        let err = AppError::NotFound("No recommendation files found in outputs".to_string());
        assert_eq!(
            err.to_string(),
            "Not found: No recommendation files found in outputs"
        );
    }
}
