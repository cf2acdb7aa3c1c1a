use std::time::Duration;

/// Typed error hierarchy for the completion boundary.
/// Completer failures are surfaced to the user as the reply text,
/// so every variant renders to a sensible message.
#[derive(Clone, Debug, thiserror::Error)]
pub enum CompleterError {
    #[error("no completion credential configured")]
    MissingCredential,
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("rate limited")]
    RateLimited,
    #[error("server error {status}: {body}")]
    ServerError { status: u16, body: String },
    #[error("network error: {0}")]
    NetworkError(String),
    #[error("empty completion response")]
    EmptyResponse,
    #[error("timeout after {0:?}")]
    Timeout(Duration),
}

impl CompleterError {
    /// Short classification string for logging.
    pub fn error_kind(&self) -> &'static str {
        match self {
            Self::MissingCredential => "missing_credential",
            Self::AuthenticationFailed(_) => "authentication_failed",
            Self::InvalidRequest(_) => "invalid_request",
            Self::RateLimited => "rate_limited",
            Self::ServerError { .. } => "server_error",
            Self::NetworkError(_) => "network_error",
            Self::EmptyResponse => "empty_response",
            Self::Timeout(_) => "timeout",
        }
    }

    /// Classify an HTTP status code into the appropriate error variant.
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            401 | 403 => Self::AuthenticationFailed(body),
            400 => Self::InvalidRequest(body),
            429 => Self::RateLimited,
            500..=599 => Self::ServerError { status, body },
            _ => Self::InvalidRequest(format!("unexpected status {status}: {body}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_status_mapping() {
        assert!(matches!(
            CompleterError::from_status(401, "unauthorized".into()),
            CompleterError::AuthenticationFailed(_)
        ));
        assert!(matches!(
            CompleterError::from_status(403, "forbidden".into()),
            CompleterError::AuthenticationFailed(_)
        ));
        assert!(matches!(
            CompleterError::from_status(400, "bad".into()),
            CompleterError::InvalidRequest(_)
        ));
        assert!(matches!(
            CompleterError::from_status(429, "slow down".into()),
            CompleterError::RateLimited
        ));
        assert!(matches!(
            CompleterError::from_status(502, "bad gateway".into()),
            CompleterError::ServerError { status: 502, .. }
        ));
        assert!(matches!(
            CompleterError::from_status(302, "found".into()),
            CompleterError::InvalidRequest(_)
        ));
    }

    #[test]
    fn error_kind_strings() {
        assert_eq!(CompleterError::MissingCredential.error_kind(), "missing_credential");
        assert_eq!(CompleterError::RateLimited.error_kind(), "rate_limited");
        assert_eq!(
            CompleterError::Timeout(Duration::from_secs(30)).error_kind(),
            "timeout"
        );
    }

    #[test]
    fn renders_user_visible_text() {
        let err = CompleterError::MissingCredential;
        assert_eq!(err.to_string(), "no completion credential configured");

        let err = CompleterError::ServerError { status: 500, body: "oops".into() };
        assert_eq!(err.to_string(), "server error 500: oops");
    }
}
