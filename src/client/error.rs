// ABOUTME: Errors from talking to the deploy server.
// ABOUTME: Separates client setup, transport, authentication and HTTP status failures.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("failed to set up HTTP client: {0}")]
    Tls(String),

    #[error("could not reach {url}: {message}")]
    Transport { url: String, message: String },

    #[error("invalid user and/or password for {url}")]
    Unauthorized { url: String },

    #[error("server returned {status} for {url}: {body}")]
    Status {
        status: u16,
        url: String,
        body: String,
    },

    #[error("unexpected response from {url}: {message}")]
    Decode { url: String, message: String },
}

impl ClientError {
    /// Network-level failure that may succeed on a later attempt.
    pub fn is_transport(&self) -> bool {
        matches!(self, ClientError::Transport { .. })
    }

    /// The server answered, but not with success.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            ClientError::Unauthorized { .. }
                | ClientError::Status { .. }
                | ClientError::Decode { .. }
        )
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Unauthorized { .. } => Some(401),
            ClientError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
