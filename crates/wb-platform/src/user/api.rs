//! User administration API
//!
//! - GET    /       - List live users, filterable by role, status and team
//! - GET    /{id}   - Fetch one user
//! - POST   /       - Create a user
//! - PUT    /{id}   - Partial update
//! - DELETE /{id}   - Soft delete

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;
use utoipa::{IntoParams, ToSchema};
use utoipa_axum::{router::OpenApiRouter, routes};

use crate::auth::code_validator::{is_valid_code, role_for_code};
use crate::shared::api_common::{nullable, ApiResponse, SuccessResponse};
use crate::shared::error::{ErrorResponse, PlatformError};
use crate::user::entity::{NewUser, Role, UserFilters, UserPatch, UserStatus};
use crate::user::repository::UserRepository;
use crate::user::transform::{transform_user, transform_users, UserResponse};

/// Query parameters for the user list
#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListUsersQuery {
    /// `agent`, `supervisor` or `admin`
    pub role: Option<String>,

    /// `Active` or `Inactive`
    pub status: Option<String>,

    pub team_id: Option<i64>,
}

impl ListUsersQuery {
    fn into_filters(self) -> Result<UserFilters, PlatformError> {
        Ok(UserFilters {
            role: self.role.as_deref().map(str::parse).transpose()?,
            status: self.status.as_deref().map(str::parse).transpose()?,
            team_id: self.team_id,
        })
    }
}

/// Create user request
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    /// Login code, e.g. `AG001`
    #[serde(default)]
    pub username: String,

    #[serde(default)]
    pub full_name: String,

    /// Defaults to the role implied by the code prefix
    pub role: Option<String>,

    pub team_id: Option<i64>,

    /// Defaults to `Active`
    pub status: Option<String>,
}

/// Update user request. Omitted fields are left unchanged.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub full_name: Option<String>,
    pub role: Option<String>,

    /// `null` removes the user from their team
    #[serde(default, with = "nullable")]
    #[schema(value_type = Option<i64>)]
    pub team_id: Option<Option<i64>>,

    pub status: Option<String>,
}

impl UpdateUserRequest {
    fn into_patch(self) -> Result<UserPatch, PlatformError> {
        if let Some(name) = &self.full_name {
            if name.trim().is_empty() {
                return Err(PlatformError::validation("fullName must not be empty"));
            }
        }
        Ok(UserPatch {
            full_name: self.full_name,
            role: self.role.as_deref().map(str::parse::<Role>).transpose()?,
            team_id: self.team_id,
            status: self.status.as_deref().map(str::parse::<UserStatus>).transpose()?,
        })
    }
}

/// Users service state
#[derive(Clone)]
pub struct UsersState {
    pub user_repo: Arc<dyn UserRepository>,
}

impl UsersState {
    pub fn new(user_repo: Arc<dyn UserRepository>) -> Self {
        Self { user_repo }
    }
}

/// List users
#[utoipa::path(
    get,
    path = "",
    tag = "users",
    operation_id = "getApiUsers",
    params(ListUsersQuery),
    responses(
        (status = 200, description = "Live users, newest first", body = ApiResponse<Vec<UserResponse>>),
        (status = 400, description = "Unknown role or status", body = ErrorResponse)
    )
)]
pub async fn list_users(
    State(state): State<UsersState>,
    Query(query): Query<ListUsersQuery>,
) -> Result<Json<ApiResponse<Vec<UserResponse>>>, PlatformError> {
    let filters = query.into_filters()?;
    let users = state.user_repo.find_all(&filters).await?;
    Ok(Json(ApiResponse::ok(transform_users(&users))))
}

/// Get user by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "users",
    operation_id = "getApiUser",
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "User found", body = ApiResponse<UserResponse>),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
pub async fn get_user(
    State(state): State<UsersState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<UserResponse>>, PlatformError> {
    let user = state
        .user_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| PlatformError::not_found("User", id.to_string()))?;
    Ok(Json(ApiResponse::ok(transform_user(&user))))
}

/// Create a user
#[utoipa::path(
    post,
    path = "",
    tag = "users",
    operation_id = "postApiUsers",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = ApiResponse<UserResponse>),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 409, description = "Code already in use", body = ErrorResponse)
    )
)]
pub async fn create_user(
    State(state): State<UsersState>,
    Json(req): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserResponse>>), PlatformError> {
    if !is_valid_code(&req.username) {
        return Err(PlatformError::invalid_format(&req.username));
    }
    if req.full_name.trim().is_empty() {
        return Err(PlatformError::validation("fullName is required"));
    }

    let role = match req.role.as_deref() {
        Some(r) => r.parse::<Role>()?,
        None => role_for_code(&req.username)
            .ok_or_else(|| PlatformError::invalid_format(&req.username))?,
    };

    if state.user_repo.code_exists(&req.username).await? {
        return Err(PlatformError::duplicate("User", "username", &req.username));
    }

    let mut new_user = NewUser::new(&req.username, &req.full_name, role);
    if let Some(team_id) = req.team_id {
        new_user = new_user.with_team(team_id);
    }
    if let Some(status) = req.status.as_deref() {
        new_user = new_user.with_status(status.parse()?);
    }

    let user = state.user_repo.create(new_user).await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(transform_user(&user)))))
}

/// Update a user
///
/// Only the supplied fields change. `updatedAt` is refreshed even when the
/// body is empty.
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "users",
    operation_id = "putApiUser",
    params(("id" = i64, Path, description = "User ID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = ApiResponse<UserResponse>),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
pub async fn update_user(
    State(state): State<UsersState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<ApiResponse<UserResponse>>, PlatformError> {
    let patch = req.into_patch()?;
    let user = state.user_repo.update(id, patch).await?;
    info!(user_id = id, "Updated user");
    Ok(Json(ApiResponse::ok(transform_user(&user))))
}

/// Delete a user (soft)
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "users",
    operation_id = "deleteApiUser",
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "User deleted", body = SuccessResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
pub async fn delete_user(
    State(state): State<UsersState>,
    Path(id): Path<i64>,
) -> Result<Json<SuccessResponse>, PlatformError> {
    state.user_repo.soft_delete(id).await?;
    Ok(Json(SuccessResponse::with_message("User deleted successfully")))
}

/// Create the users router
pub fn users_router(state: UsersState) -> OpenApiRouter {
    OpenApiRouter::new()
        .routes(routes!(list_users, create_user))
        .routes(routes!(get_user, update_user, delete_user))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_query_parses_filters() {
        let query = ListUsersQuery {
            role: Some("supervisor".to_string()),
            status: Some("Inactive".to_string()),
            team_id: Some(2),
        };
        let filters = query.into_filters().unwrap();
        assert_eq!(filters.role, Some(Role::Supervisor));
        assert_eq!(filters.status, Some(UserStatus::Inactive));
        assert_eq!(filters.team_id, Some(2));
    }

    #[test]
    fn test_list_query_rejects_unknown_role() {
        let query = ListUsersQuery {
            role: Some("manager".to_string()),
            ..Default::default()
        };
        assert!(matches!(query.into_filters(), Err(PlatformError::Validation { .. })));
    }

    #[test]
    fn test_update_request_team_id_tristate() {
        let absent: UpdateUserRequest = serde_json::from_str(r#"{"fullName": "B"}"#).unwrap();
        assert_eq!(absent.team_id, None);

        let cleared: UpdateUserRequest = serde_json::from_str(r#"{"teamId": null}"#).unwrap();
        assert_eq!(cleared.team_id, Some(None));

        let set: UpdateUserRequest = serde_json::from_str(r#"{"teamId": 4}"#).unwrap();
        assert_eq!(set.team_id, Some(Some(4)));
    }

    #[test]
    fn test_update_request_into_patch() {
        let req: UpdateUserRequest =
            serde_json::from_str(r#"{"role": "admin", "status": "Inactive"}"#).unwrap();
        let patch = req.into_patch().unwrap();
        assert_eq!(patch.role, Some(Role::Admin));
        assert_eq!(patch.status, Some(UserStatus::Inactive));
        assert!(patch.full_name.is_none());
        assert!(patch.team_id.is_none());

        let empty = UpdateUserRequest::default().into_patch().unwrap();
        assert!(empty.is_empty());

        let blank: UpdateUserRequest = serde_json::from_str(r#"{"fullName": "  "}"#).unwrap();
        assert!(matches!(blank.into_patch(), Err(PlatformError::Validation { .. })));
    }
}
