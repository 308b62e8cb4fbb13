use thiserror::Error;

/// Everything that can stop a reply operation from completing.
///
/// `Validation` is raised locally before any request goes out; every other
/// kind comes back from a dispatched request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReplyError {
    #[error("reply content cannot be empty")]
    Validation,
    #[error("permission denied: {0}")]
    PermissionDenied(String),
    #[error("reply or post not found: {0}")]
    NotFound(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("the server rejected the request")]
    OperationFailed,
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),
}

impl ReplyError {
    /// Whether the same request can reasonably be tried again.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ReplyError::Network(_) | ReplyError::OperationFailed)
    }
}

impl From<reqwest::Error> for ReplyError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return ReplyError::UnexpectedResponse(err.to_string());
        }
        if let Some(status) = err.status() {
            return ReplyError::from_status(status, err.url().map(|u| u.path()).unwrap_or(""));
        }
        if err.is_timeout() {
            ReplyError::Network(format!("request timed out: {err}"))
        } else {
            ReplyError::Network(err.to_string())
        }
    }
}

impl ReplyError {
    pub(crate) fn from_status(status: reqwest::StatusCode, path: &str) -> Self {
        match status.as_u16() {
            401 | 403 => ReplyError::PermissionDenied(format!("{status} for {path}")),
            404 => ReplyError::NotFound(path.to_string()),
            _ => ReplyError::Network(format!("server returned {status} for {path}")),
        }
    }
}
