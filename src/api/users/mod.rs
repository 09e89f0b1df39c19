//! User registration endpoint

use axum::{extract::State, routing::post, Router};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::error;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::infrastructure::user::{RegisterUserRequest, RegistrationError};

/// Create the users router
pub fn create_users_router() -> Router<AppState> {
    Router::new().route("/", post(register))
}

/// Registration request
///
/// Absent or `null` fields read as empty strings so they fail validation
/// instead of deserialization.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RegisterRequest {
    #[serde(deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub email: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub password: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl From<RegisterRequest> for RegisterUserRequest {
    fn from(request: RegisterRequest) -> Self {
        Self {
            name: request.name,
            email: request.email,
            password: request.password,
        }
    }
}

/// Session token response
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Register a new user
///
/// POST /api/users
///
/// Returns a signed session token for the new account.
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let registered = state
        .user_service
        .register(request.into())
        .await
        .map_err(|e| {
            if let RegistrationError::Infrastructure(ref cause) = e {
                error!(error = %cause, "Registration failed");
            }
            ApiError::from(e)
        })?;

    Ok(Json(TokenResponse {
        token: registered.token,
    }))
}
