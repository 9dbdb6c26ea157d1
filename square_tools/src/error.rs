use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SquareApiError {
    #[error("Could not initialize client: {0}")]
    Initialization(String),
    #[error("Could not reach Square: {0}")]
    RestRequestError(String),
    #[error("Invalid REST response: {0}")]
    RestResponseError(String),
    #[error("Could not deserialize JSON: {0}")]
    JsonError(String),
    /// Square answered with a JSON error payload, e.g. `{"errors": [...]}` or `{"type": "...", "message": "..."}`.
    /// The payload is kept verbatim so that it can be handed back to the caller as is.
    #[error("Square returned an error. Status {status}. {body}")]
    RemoteError { status: u16, body: Value },
    #[error("Query failed. Error {status}. {message}")]
    QueryError { status: u16, message: String },
}

impl SquareApiError {
    /// True for errors where the request never produced a usable response from Square.
    pub fn is_transport_error(&self) -> bool {
        matches!(self, Self::RestRequestError(_) | Self::RestResponseError(_))
    }

    /// The HTTP status Square reported, if it reported one.
    pub fn remote_status(&self) -> Option<u16> {
        match self {
            Self::RemoteError { status, .. } | Self::QueryError { status, .. } => Some(*status),
            _ => None,
        }
    }
}
