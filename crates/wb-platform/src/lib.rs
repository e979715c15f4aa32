//! Wallboard Platform
//!
//! Authentication core for the contact-centre wallboard:
//! - User/agent store with soft delete and partial updates
//! - Role-prefixed login codes (AG/SP/AD)
//! - Passwordless and secure login with signed session tokens
//! - Supervisor team rosters
//!
//! ## Module Organization
//!
//! - `user` - entity, repository, SQLite store, response shape, admin API
//! - `auth` - code validator, token issuer, login service, login API
//! - `seed` - dev roster

// Aggregates
pub mod user;

// Authentication
pub mod auth;

// Shared infrastructure
pub mod db;
pub mod shared;

pub mod seed;

// Re-export common types from shared
pub use shared::error::{PlatformError, Result};
pub use shared::api_common::{ApiResponse, SuccessResponse};

// Re-export main entity types for convenience
pub use user::entity::{NewUser, Role, Team, UserFilters, UserPatch, UserRecord, UserStatus};
pub use user::transform::{transform_user, transform_users, UserResponse};

// Re-export repositories
pub use user::repository::UserRepository;
pub use user::sqlite::SqliteUserRepository;

// Re-export services
pub use auth::auth_service::{AuthService, LoginData, SecureLoginData};
pub use auth::code_validator::is_valid_code;
pub use auth::session_token::{SessionClaims, SessionTokenIssuer, SESSION_TOKEN_TTL_SECS};

// Re-export routers and their state
pub use auth::auth_api::{auth_router, AuthState};
pub use user::api::{users_router, UsersState};

pub use seed::DevDataSeeder;
