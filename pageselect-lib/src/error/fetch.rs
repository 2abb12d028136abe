//! Page fetch error types

use std::time::Duration;

/// Errors that can occur while fetching a page.
///
/// The table controller recovers from every variant locally: loading ends and
/// the last good page stays on screen.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// HTTP error response from the page endpoint.
    #[error("HTTP {status}: {message}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Response body or reason phrase.
        message: String,
    },

    /// Network error during the request.
    #[error("Network error: {0}")]
    Network(reqwest::Error),

    /// Request timed out.
    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    /// The endpoint URL could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Page numbers are 1-based.
    #[error("Invalid page number: {0}")]
    InvalidPage(u32),

    /// The response body did not match the expected schema.
    #[error("Response parse error: {message}")]
    Parse {
        /// Description of the parse error.
        message: String,
        /// Raw response body, if available.
        body: Option<String>,
    },
}

impl FetchError {
    /// Creates a new HTTP error.
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
        }
    }

    /// Creates a new parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            body: None,
        }
    }

    /// Creates a new parse error with the raw response body.
    pub fn parse_with_body(message: impl Into<String>, body: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            body: Some(body.into()),
        }
    }

    /// Returns the HTTP status code if this is an HTTP error.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns `true` if repeating the same request could succeed.
    ///
    /// Nothing retries automatically; front-ends use this to phrase the
    /// failure for the user.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http { status, .. } => matches!(status, 429 | 500 | 502 | 503 | 504),
            Self::Network(_) => true,
            Self::Timeout(_) => true,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return Self::parse(err.to_string());
        }
        if let Some(status) = err.status() {
            return Self::http(status.as_u16(), err.to_string());
        }
        Self::Network(err)
    }
}

impl From<url::ParseError> for FetchError {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidUrl(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_statuses() {
        assert!(FetchError::http(503, "unavailable").is_retryable());
        assert!(FetchError::http(429, "slow down").is_retryable());
        assert!(!FetchError::http(404, "not found").is_retryable());
        assert!(!FetchError::parse("missing field `data`").is_retryable());
        assert!(FetchError::Timeout(Duration::from_secs(5)).is_retryable());
    }

    #[test]
    fn test_status_code() {
        assert_eq!(FetchError::http(500, "boom").status_code(), Some(500));
        assert_eq!(FetchError::InvalidPage(0).status_code(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(FetchError::http(404, "Not Found").to_string(), "HTTP 404: Not Found");
        assert_eq!(
            FetchError::parse_with_body("expected array", "{}").to_string(),
            "Response parse error: expected array"
        );
    }
}
