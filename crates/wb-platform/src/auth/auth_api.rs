//! Auth API Endpoints
//!
//! - POST /login/simple - Passwordless login by code
//! - POST /login/secure - Agent or supervisor code login, with roster
//! - POST /logout - Stateless logout

use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use utoipa::ToSchema;
use utoipa_axum::{router::OpenApiRouter, routes};

use crate::auth::auth_service::{AuthService, LoginData, SecureLoginData};
use crate::shared::api_common::{ApiResponse, SuccessResponse};
use crate::shared::error::{ErrorResponse, PlatformError};

/// Passwordless login request
#[derive(Debug, Deserialize, ToSchema)]
pub struct SimpleLoginRequest {
    /// Login code, e.g. `AG001`. Missing, `null` and non-string values
    /// fail the format check.
    #[serde(default)]
    #[schema(value_type = String)]
    pub username: Option<Value>,
}

impl SimpleLoginRequest {
    fn code(&self) -> Result<&str, PlatformError> {
        match &self.username {
            Some(Value::String(code)) => Ok(code.as_str()),
            Some(other) => Err(PlatformError::invalid_format(other.to_string())),
            None => Err(PlatformError::invalid_format("")),
        }
    }
}

/// Secure login request. The first non-empty code is used.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SecureLoginRequest {
    #[serde(default)]
    pub agent_code: Option<String>,

    #[serde(default)]
    pub supervisor_code: Option<String>,
}

/// Auth service state
#[derive(Clone)]
pub struct AuthState {
    pub auth_service: Arc<AuthService>,
}

impl AuthState {
    pub fn new(auth_service: Arc<AuthService>) -> Self {
        Self { auth_service }
    }
}

/// Login with a code only
///
/// Checks the code format and account status, stamps the last login time
/// and returns a session token.
#[utoipa::path(
    post,
    path = "/login/simple",
    tag = "auth",
    operation_id = "postAuthLoginSimple",
    request_body = SimpleLoginRequest,
    responses(
        (status = 200, description = "Login successful", body = ApiResponse<LoginData>),
        (status = 400, description = "Malformed code", body = ErrorResponse),
        (status = 401, description = "Unknown code", body = ErrorResponse),
        (status = 403, description = "Account inactive", body = ErrorResponse),
        (status = 500, description = "Internal error", body = ErrorResponse)
    )
)]
pub async fn login_simple(
    State(state): State<AuthState>,
    Json(req): Json<SimpleLoginRequest>,
) -> Result<Json<ApiResponse<LoginData>>, PlatformError> {
    let data = state.auth_service.login_simple(req.code()?).await?;
    Ok(Json(ApiResponse::ok(data)))
}

/// Login with an agent or supervisor code
///
/// Supervisors also receive their team roster in `teamData`.
#[utoipa::path(
    post,
    path = "/login/secure",
    tag = "auth",
    operation_id = "postAuthLoginSecure",
    request_body = SecureLoginRequest,
    responses(
        (status = 200, description = "Login successful", body = ApiResponse<SecureLoginData>),
        (status = 400, description = "No code supplied", body = ErrorResponse),
        (status = 401, description = "Unknown code", body = ErrorResponse),
        (status = 500, description = "Internal error", body = ErrorResponse)
    )
)]
pub async fn login_secure(
    State(state): State<AuthState>,
    Json(req): Json<SecureLoginRequest>,
) -> Result<Json<ApiResponse<SecureLoginData>>, PlatformError> {
    let data = state
        .auth_service
        .login_secure(req.agent_code.as_deref(), req.supervisor_code.as_deref())
        .await?;
    Ok(Json(ApiResponse::ok(data)))
}

/// Logout
///
/// Sessions are stateless; the client discards its token.
#[utoipa::path(
    post,
    path = "/logout",
    tag = "auth",
    operation_id = "postAuthLogout",
    responses(
        (status = 200, description = "Logout successful", body = SuccessResponse)
    )
)]
pub async fn logout() -> Json<SuccessResponse> {
    Json(SuccessResponse::with_message("Logged out successfully"))
}

/// Create the auth router
pub fn auth_router(state: AuthState) -> OpenApiRouter {
    OpenApiRouter::new()
        .routes(routes!(login_simple))
        .routes(routes!(login_secure))
        .routes(routes!(logout))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_login_request_code() {
        let req: SimpleLoginRequest = serde_json::from_str(r#"{"username": "AG001"}"#).unwrap();
        assert_eq!(req.code().unwrap(), "AG001");

        for body in ["{}", r#"{"username": null}"#, r#"{"username": 42}"#, r#"{"username": ["AG001"]}"#] {
            let req: SimpleLoginRequest = serde_json::from_str(body).unwrap();
            assert!(
                matches!(req.code(), Err(PlatformError::InvalidFormat { .. })),
                "{}",
                body
            );
        }
    }

    #[test]
    fn test_secure_login_request_deserialization() {
        let req: SecureLoginRequest =
            serde_json::from_str(r#"{"supervisorCode": "sp001"}"#).unwrap();
        assert!(req.agent_code.is_none());
        assert_eq!(req.supervisor_code.as_deref(), Some("sp001"));

        let req: SecureLoginRequest = serde_json::from_str(r#"{"agentCode": null}"#).unwrap();
        assert!(req.agent_code.is_none());
    }
}
