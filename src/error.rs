/// Errors produced while talking to the wiki.
///
/// Messages are plain strings so a failure can sit in a result slot,
/// be cloned into a rendered row and compared in tests.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WikiError {
    /// The caller broke a contract: no identifier, both identifiers, or a zero count.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Network error, timeout or non-success HTTP status.
    #[error("transport failure: {0}")]
    Transport(String),

    /// Success status but the body was not what the API promises.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl From<reqwest::Error> for WikiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            WikiError::Transport(format!("request timed out: {err}"))
        } else if err.is_decode() {
            WikiError::MalformedResponse(err.to_string())
        } else {
            WikiError::Transport(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, WikiError>;
