use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RelayError {
    /// Inbound body is not JSON or lacks a required record field.
    #[error("{0}")]
    InvalidPayload(String),

    #[error("Server configuration error")]
    MissingEndpoint,

    /// External endpoint answered with a non-2xx status.
    #[error("GCF call failed: {body}")]
    Downstream { status: u16, body: String },

    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
}

impl RelayError {
    /// Status code returned to the original caller.
    pub fn status_code(&self) -> StatusCode {
        match self {
            RelayError::Downstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Text placed in the `error` field of the response body.
    pub fn client_message(&self) -> String {
        self.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_endpoint_message() {
        let err = RelayError::MissingEndpoint;
        assert_eq!(err.client_message(), "Server configuration error");
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_downstream_keeps_status_and_wraps_body() {
        let err = RelayError::Downstream {
            status: 503,
            body: "overloaded".to_string(),
        };
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(err.client_message(), "GCF call failed: overloaded");
    }

    #[test]
    fn test_downstream_invalid_status_falls_back_to_500() {
        let err = RelayError::Downstream {
            status: 42,
            body: String::new(),
        };
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.client_message(), "GCF call failed: ");
    }

    #[test]
    fn test_invalid_payload_passes_message_through() {
        let err = RelayError::InvalidPayload("expected value at line 1 column 1".to_string());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.client_message(), "expected value at line 1 column 1");
    }
}
