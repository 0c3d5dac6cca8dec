use reqwest::StatusCode;
use thiserror::Error;

/// Failure of a single request against one of the external services.
///
/// Every user-triggered flow catches these at its outer boundary and turns
/// them into an inline `ViewUpdate::Failed`; nothing here ends the session.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport-level failure (DNS, connect, timeout).
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status.
    #[error("HTTP {status} for {url}")]
    Status { status: StatusCode, url: String },

    /// The body was not the JSON shape we expected.
    #[error("invalid JSON from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl FetchError {
    /// HTTP status code, when the server answered at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            FetchError::Status { status, .. } => Some(*status),
            FetchError::Request { source, .. } | FetchError::Decode { source, .. } => {
                source.status()
            }
        }
    }

    /// URL of the failed request.
    pub fn url(&self) -> &str {
        match self {
            FetchError::Request { url, .. }
            | FetchError::Status { url, .. }
            | FetchError::Decode { url, .. } => url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_display() {
        let err = FetchError::Status {
            status: StatusCode::NOT_FOUND,
            url: "https://api.example.org/v1/taxa".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("404"));
        assert!(text.contains("https://api.example.org/v1/taxa"));
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
        assert_eq!(err.url(), "https://api.example.org/v1/taxa");
    }
}
