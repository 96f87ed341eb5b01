use engine::EngineError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors from talking to the accounting service.
///
/// Messages sent by the service are kept verbatim so they can be shown as-is.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("UNAUTHORIZED")]
    Unauthorized,
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Server(String),
    #[error("http error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("invalid url: {0}")]
    Url(String),
    #[error(transparent)]
    Model(#[from] EngineError),
}

impl ClientError {
    /// Maps a non-success status and the service's message to an error.
    pub(crate) fn from_status(status: u16, message: String) -> Self {
        match status {
            401 => Self::Unauthorized,
            403 => Self::Forbidden(message),
            404 => Self::NotFound(message),
            409 => Self::Conflict(message),
            400 | 422 => Self::Validation(message),
            _ => Self::Server(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping_keeps_server_message() {
        assert!(matches!(
            ClientError::from_status(401, "expired".to_string()),
            ClientError::Unauthorized
        ));
        let err = ClientError::from_status(422, "Sum of shares must equal total_amount".to_string());
        assert!(matches!(err, ClientError::Validation(_)));
        assert_eq!(err.to_string(), "Sum of shares must equal total_amount");
        assert!(matches!(
            ClientError::from_status(503, "down".to_string()),
            ClientError::Server(_)
        ));
    }
}
