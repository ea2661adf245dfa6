use matryx_client::HttpClientError;
use thiserror::Error;

/// Text shown when the server gives no reason for a failure
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// Why a sidebar operation did not complete
#[derive(Error, Debug)]
pub enum OperationError {
    /// The request never produced a usable answer: network failure, timeout
    /// or a body that is not the expected JSON
    #[error(transparent)]
    Transport(HttpClientError),

    /// The server answered, but with a failure
    #[error("{}", .message.as_deref().unwrap_or(UNKNOWN_ERROR))]
    Api {
        errcode: Option<String>,
        message: Option<String>,
    },
}

impl OperationError {
    /// API failure built from the optional fields of a 2xx body
    pub fn api(errcode: Option<String>, message: Option<String>) -> Self {
        Self::Api { errcode, message }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Message shown to the user, prefixed by the operation's failure or error
    /// label depending on the kind
    pub fn user_message(&self, failed_label: &str, error_label: &str) -> String {
        match self {
            Self::Api { .. } => format!("{failed_label}: {self}"),
            Self::Transport(_) => format!("{error_label}: {self}"),
        }
    }
}

impl From<HttpClientError> for OperationError {
    fn from(error: HttpClientError) -> Self {
        match error {
            HttpClientError::Matrix { errcode, error, .. } => Self::Api { errcode: Some(errcode), message: error },
            other => Self::Transport(other),
        }
    }
}

/// Result type for sidebar operations
pub type Result<T> = std::result::Result<T, OperationError>;
