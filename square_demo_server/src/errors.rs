use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use serde_json::Value;
use square_demo_engine::ApiError;
use square_tools::SquareApiError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("Invalid request parameters. {0}")]
    InvalidRequestParams(String),
    #[error("Precondition failed. {0}")]
    PreconditionFailed(String),
    /// Square rejected the call. The body is Square's error payload, passed on untouched.
    #[error("Square returned an error. Status {status}. {body}")]
    RemoteError { status: u16, body: Value },
    #[error("Square could not be reached or gave an unusable response. {0}")]
    UpstreamError(String),
    #[error("The data was not found. {0}")]
    NoRecordFound(String),
    #[error("Could not render the page. {0}")]
    RenderError(String),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::InvalidRequestParams(_) => StatusCode::BAD_REQUEST,
            Self::PreconditionFailed(_) => StatusCode::PRECONDITION_FAILED,
            // Square sometimes reports errors in a 200 body. That is still a failure from our caller's point of view.
            Self::RemoteError { status, .. } => StatusCode::from_u16(*status)
                .ok()
                .filter(|s| s.is_client_error() || s.is_server_error())
                .unwrap_or(StatusCode::BAD_GATEWAY),
            Self::UpstreamError(_) => StatusCode::BAD_GATEWAY,
            Self::NoRecordFound(_) => StatusCode::NOT_FOUND,
            Self::RenderError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            Self::RemoteError { body, .. } => body.to_string(),
            _ => serde_json::json!({ "error": self.to_string() }).to_string(),
        };
        HttpResponse::build(self.status_code()).insert_header(ContentType::json()).body(body)
    }
}

impl From<SquareApiError> for ServerError {
    fn from(e: SquareApiError) -> Self {
        match e {
            SquareApiError::RemoteError { status, body } => Self::RemoteError { status, body },
            SquareApiError::Initialization(s) => Self::InitializeError(s),
            e if e.is_transport_error() => Self::UpstreamError(format!("Square could not be reached. {e}")),
            e => Self::UpstreamError(e.to_string()),
        }
    }
}

impl From<ApiError> for ServerError {
    fn from(e: ApiError) -> Self {
        match e {
            ApiError::TransactionLookup { source, .. } => source.into(),
            ApiError::Remote(e) => e.into(),
            e if e.is_precondition_failure() => match e {
                ApiError::MissingAuthorizationCode | ApiError::MissingTransactionId => {
                    Self::InvalidRequestParams(e.to_string())
                },
                e => Self::PreconditionFailed(e.to_string()),
            },
            e => Self::Unspecified(e.to_string()),
        }
    }
}
