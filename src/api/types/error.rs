//! HTTP error responses
//!
//! Client errors render as `{ "errors": [ { "msg", "param"? } ] }`. Server
//! errors render as the plain text body `Server Error` with no detail.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::domain::user::RegistrationValidationError;
use crate::infrastructure::user::RegistrationError;

const SERVER_ERROR_BODY: &str = "Server Error";

/// Single client-facing error entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorMessage {
    pub msg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub param: Option<String>,
}

impl ErrorMessage {
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            msg: msg.into(),
            param: None,
        }
    }

    pub fn with_param(mut self, param: impl Into<String>) -> Self {
        self.param = Some(param.into());
        self
    }
}

impl From<&RegistrationValidationError> for ErrorMessage {
    fn from(err: &RegistrationValidationError) -> Self {
        Self::new(err.to_string()).with_param(err.field())
    }
}

/// Error list body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    pub errors: Vec<ErrorMessage>,
}

/// API error with status code
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub errors: Vec<ErrorMessage>,
}

impl ApiError {
    pub fn new(status: StatusCode, errors: Vec<ErrorMessage>) -> Self {
        Self { status, errors }
    }

    /// Bad request with a single message
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, vec![ErrorMessage::new(message)])
    }

    /// Bad request listing every violated input rule
    pub fn validation(errors: &[RegistrationValidationError]) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            errors.iter().map(ErrorMessage::from).collect(),
        )
    }

    /// Duplicate account
    pub fn conflict() -> Self {
        Self::bad_request("User already exists")
    }

    /// Internal server error; detail must be logged by the caller
    pub fn server_error() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, Vec::new())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            return (self.status, SERVER_ERROR_BODY).into_response();
        }

        (
            self.status,
            Json(ApiErrorResponse {
                errors: self.errors,
            }),
        )
            .into_response()
    }
}

impl From<RegistrationError> for ApiError {
    fn from(err: RegistrationError) -> Self {
        match err {
            RegistrationError::Validation(errors) => Self::validation(&errors),
            RegistrationError::Conflict => Self::conflict(),
            RegistrationError::Infrastructure(_) => Self::server_error(),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let messages: Vec<&str> = self.errors.iter().map(|e| e.msg.as_str()).collect();
        write!(f, "{}: {}", self.status, messages.join("; "))
    }
}

impl std::error::Error for ApiError {}
