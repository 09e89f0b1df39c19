//! API request and response types

pub mod error;
pub mod json;

pub use error::{ApiError, ApiErrorResponse, ErrorMessage};
pub use json::Json;
