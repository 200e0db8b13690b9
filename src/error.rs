use thiserror::Error;

/// Every way a single call to the chat API can fail.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request to chat API failed: {0}")]
    Transport(String),

    #[error("chat API rejected the credentials (status {status})")]
    Auth { status: u16 },

    #[error("chat API is rate limiting this key")]
    RateLimited,

    #[error("chat API server error (status {status}): {body}")]
    ServerError { status: u16, body: String },

    #[error("unexpected chat API status {status}: {body}")]
    Unexpected { status: u16, body: String },

    #[error("invalid chat API response: {0}")]
    Parse(String),
}

impl ApiError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ApiError::Transport(_) => "Failed to connect to the chat API",
            ApiError::Auth { .. } => "The API key was rejected. Check GROK_API_KEY",
            ApiError::RateLimited => "The chat API is rate limiting requests. Try again later",
            ApiError::ServerError { .. } => "The chat API is having problems. Try again later",
            ApiError::Unexpected { .. } => "API request failed",
            ApiError::Parse(_) => "Failed to parse the API response",
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Auth { status }
            | ApiError::ServerError { status, .. }
            | ApiError::Unexpected { status, .. } => Some(*status),
            ApiError::RateLimited => Some(429),
            ApiError::Transport(_) | ApiError::Parse(_) => None,
        }
    }

    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            401 | 403 => ApiError::Auth { status },
            429 => ApiError::RateLimited,
            500..=599 => ApiError::ServerError { status, body },
            _ => ApiError::Unexpected { status, body },
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Transport(err.to_string())
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("API key not found. Set GROK_API_KEY or pass --api-key")]
    MissingApiKey,

    #[error("invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_map_to_kinds() {
        assert!(matches!(ApiError::from_status(401, String::new()), ApiError::Auth { status: 401 }));
        assert!(matches!(ApiError::from_status(403, String::new()), ApiError::Auth { status: 403 }));
        assert!(matches!(ApiError::from_status(429, String::new()), ApiError::RateLimited));
        assert!(matches!(ApiError::from_status(500, String::new()), ApiError::ServerError { .. }));
        assert!(matches!(ApiError::from_status(503, String::new()), ApiError::ServerError { .. }));
        assert!(matches!(ApiError::from_status(404, String::new()), ApiError::Unexpected { .. }));
        assert!(matches!(ApiError::from_status(302, String::new()), ApiError::Unexpected { .. }));
    }

    #[test]
    fn status_is_kept_for_display() {
        let err = ApiError::from_status(502, "bad gateway".into());
        assert_eq!(err.status(), Some(502));
        assert!(err.to_string().contains("bad gateway"));
        assert_eq!(ApiError::Parse("x".into()).status(), None);
    }
}
