use thiserror::Error;

/// What went wrong talking to the backend.
///
/// The split matters to callers: `Transport` and `Server` are worth a
/// retry, `Rejected` means the backend refused the request on its merits
/// (wrong admin code, unknown id, illegal transition) and retrying the
/// same call will refuse again.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("server error: {0}")]
    Server(reqwest::StatusCode),

    #[error("rejected by server: {0}")]
    Rejected(reqwest::StatusCode),

    /// Caller-side validation failure; nothing was sent.
    #[error("invalid request: {0}")]
    Invalid(&'static str),
}

impl GatewayError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, GatewayError::Transport(_) | GatewayError::Server(_))
    }
}
