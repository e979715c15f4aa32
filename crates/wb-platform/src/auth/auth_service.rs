//! Authentication Service
//!
//! Orchestrates the two login strategies:
//! - passwordless login by code (format check, active-status check, last-login stamp)
//! - secure login by agent or supervisor code (no status check, supervisor roster)
//!
//! Any unexpected store failure is reported as `Internal`, distinct from the
//! classified business failures.

use std::sync::Arc;

use serde::Serialize;
use tracing::{error, info, warn};
use utoipa::ToSchema;

use crate::auth::code_validator::is_valid_code;
use crate::auth::session_token::SessionTokenIssuer;
use crate::shared::error::{PlatformError, Result};
use crate::user::repository::UserRepository;
use crate::user::transform::{transform_user, transform_users, UserResponse};

/// Successful passwordless login
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LoginData {
    pub user: UserResponse,
    pub token: String,
}

/// Successful secure login
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SecureLoginData {
    pub user: UserResponse,

    /// Team roster; `null` unless the account is a supervisor
    pub team_data: Option<Vec<UserResponse>>,

    pub token: String,
}

pub struct AuthService {
    user_repo: Arc<dyn UserRepository>,
    token_issuer: Arc<SessionTokenIssuer>,
}

impl AuthService {
    pub fn new(user_repo: Arc<dyn UserRepository>, token_issuer: Arc<SessionTokenIssuer>) -> Self {
        Self {
            user_repo,
            token_issuer,
        }
    }

    /// Passwordless login with a role-prefixed code.
    pub async fn login_simple(&self, username: &str) -> Result<LoginData> {
        if !is_valid_code(username) {
            warn!(code = %username, "Rejected malformed login code");
            return Err(PlatformError::invalid_format(username));
        }

        let user = self
            .user_repo
            .find_by_code(username)
            .await
            .map_err(store_failure)?
            .ok_or_else(|| {
                warn!(code = %username, "Login for unknown code");
                PlatformError::InvalidCredentials
            })?;

        if !user.status.is_active() {
            warn!(code = %username, user_id = user.id, "Login for inactive account");
            return Err(PlatformError::AccountInactive);
        }

        // Best effort: the credential check above already stands
        if let Err(e) = self.user_repo.update_last_login(user.id).await {
            warn!(user_id = user.id, error = %e, "Failed to record last login");
        }

        let token = self.token_issuer.issue(&user)?;

        info!(code = %user.code, role = %user.role, "Simple login succeeded");
        Ok(LoginData {
            user: transform_user(&user),
            token,
        })
    }

    /// Secure login with an agent or supervisor code.
    ///
    /// The first non-empty code wins and is upper-cased. Account status is
    /// not consulted on this path.
    pub async fn login_secure(
        &self,
        agent_code: Option<&str>,
        supervisor_code: Option<&str>,
    ) -> Result<SecureLoginData> {
        let code = [agent_code, supervisor_code]
            .into_iter()
            .flatten()
            .find(|c| !c.is_empty())
            .map(str::to_uppercase)
            .ok_or(PlatformError::MissingCredentials)?;

        let user = self
            .user_repo
            .find_by_code(&code)
            .await
            .map_err(store_failure)?
            .ok_or_else(|| {
                warn!(code = %code, "Secure login for unknown code");
                PlatformError::InvalidCredentials
            })?;

        let team_data = if user.is_supervisor() {
            let members = match user.team_id {
                Some(team_id) => self
                    .user_repo
                    .find_by_team(team_id)
                    .await
                    .map_err(store_failure)?,
                None => Vec::new(),
            };
            Some(transform_users(&members))
        } else {
            None
        };

        let token = self.token_issuer.issue(&user)?;

        info!(
            code = %user.code,
            role = %user.role,
            roster = team_data.as_ref().map(Vec::len),
            "Secure login succeeded"
        );
        Ok(SecureLoginData {
            user: transform_user(&user),
            team_data,
            token,
        })
    }
}

fn store_failure(err: PlatformError) -> PlatformError {
    error!(error = %err, "User store failure during login");
    PlatformError::internal(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user::entity::{NewUser, Role, Team, UserFilters, UserPatch, UserRecord, UserStatus};
    use crate::user::sqlite::SqliteUserRepository;
    use async_trait::async_trait;

    /// Delegates to SQLite, with switchable failures
    struct FlakyRepo {
        inner: SqliteUserRepository,
        fail_lookups: bool,
        fail_last_login: bool,
        fail_team: bool,
    }

    fn boom() -> PlatformError {
        PlatformError::Database(sqlx::Error::PoolClosed)
    }

    #[async_trait]
    impl UserRepository for FlakyRepo {
        async fn find_all(&self, filters: &UserFilters) -> Result<Vec<UserRecord>> {
            self.inner.find_all(filters).await
        }
        async fn find_by_id(&self, id: i64) -> Result<Option<UserRecord>> {
            self.inner.find_by_id(id).await
        }
        async fn find_by_code(&self, code: &str) -> Result<Option<UserRecord>> {
            if self.fail_lookups {
                return Err(boom());
            }
            self.inner.find_by_code(code).await
        }
        async fn find_by_team(&self, team_id: i64) -> Result<Vec<UserRecord>> {
            if self.fail_team {
                return Err(boom());
            }
            self.inner.find_by_team(team_id).await
        }
        async fn create(&self, user: NewUser) -> Result<UserRecord> {
            self.inner.create(user).await
        }
        async fn update(&self, id: i64, patch: UserPatch) -> Result<UserRecord> {
            self.inner.update(id, patch).await
        }
        async fn soft_delete(&self, id: i64) -> Result<()> {
            self.inner.soft_delete(id).await
        }
        async fn update_last_login(&self, id: i64) -> Result<()> {
            if self.fail_last_login {
                return Err(boom());
            }
            self.inner.update_last_login(id).await
        }
        async fn code_exists(&self, code: &str) -> Result<bool> {
            self.inner.code_exists(code).await
        }
        async fn find_team(&self, team_id: i64) -> Result<Option<Team>> {
            self.inner.find_team(team_id).await
        }
    }

    struct Fixture {
        repo: Arc<FlakyRepo>,
        issuer: Arc<SessionTokenIssuer>,
        team: Team,
    }

    impl Fixture {
        fn service(&self) -> AuthService {
            AuthService::new(self.repo.clone(), self.issuer.clone())
        }
    }

    async fn fixture_with(fail_lookups: bool, fail_last_login: bool, fail_team: bool) -> Fixture {
        let pool = crate::db::connect("sqlite::memory:", 1).await.unwrap();
        let inner = SqliteUserRepository::new(pool);
        inner.init_schema().await.unwrap();

        let team = inner.insert_team("Alpha").await.unwrap();
        let other = inner.insert_team("Beta").await.unwrap();

        inner.create(NewUser::new("SP001", "Sue", Role::Supervisor).with_team(team.id)).await.unwrap();
        inner.create(NewUser::new("AG001", "Ann", Role::Agent).with_team(team.id)).await.unwrap();
        inner.create(NewUser::new("AG002", "Bob", Role::Agent).with_team(team.id)).await.unwrap();
        inner
            .create(
                NewUser::new("AG003", "Ivy", Role::Agent)
                    .with_team(team.id)
                    .with_status(UserStatus::Inactive),
            )
            .await
            .unwrap();
        inner.create(NewUser::new("AG009", "Zed", Role::Agent).with_team(other.id)).await.unwrap();
        let gone = inner
            .create(NewUser::new("AG004", "Gone", Role::Agent).with_team(team.id))
            .await
            .unwrap();
        inner.soft_delete(gone.id).await.unwrap();
        inner.create(NewUser::new("SP002", "Solo", Role::Supervisor)).await.unwrap();

        Fixture {
            repo: Arc::new(FlakyRepo {
                inner,
                fail_lookups,
                fail_last_login,
                fail_team,
            }),
            issuer: Arc::new(SessionTokenIssuer::new("test-secret", "wallboard").unwrap()),
            team,
        }
    }

    async fn fixture() -> Fixture {
        fixture_with(false, false, false).await
    }

    #[tokio::test]
    async fn test_simple_login_malformed_code() {
        let fx = fixture().await;
        for code in ["", "ag001", "AG000", "XX001", "AG1000"] {
            let err = fx.service().login_simple(code).await.unwrap_err();
            assert!(matches!(err, PlatformError::InvalidFormat { .. }), "{}", code);
        }
    }

    #[tokio::test]
    async fn test_simple_login_format_checked_before_store() {
        let fx = fixture_with(true, false, false).await;
        let err = fx.service().login_simple("bad").await.unwrap_err();
        assert!(matches!(err, PlatformError::InvalidFormat { .. }));
    }

    #[tokio::test]
    async fn test_simple_login_unknown_code() {
        let fx = fixture().await;
        let err = fx.service().login_simple("AG777").await.unwrap_err();
        assert!(matches!(err, PlatformError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_simple_login_soft_deleted_code_is_unknown() {
        let fx = fixture().await;
        let err = fx.service().login_simple("AG004").await.unwrap_err();
        assert!(matches!(err, PlatformError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_simple_login_inactive_account() {
        let fx = fixture().await;
        let err = fx.service().login_simple("AG003").await.unwrap_err();
        assert!(matches!(err, PlatformError::AccountInactive));
    }

    #[tokio::test]
    async fn test_simple_login_success() {
        let fx = fixture().await;
        let data = fx.service().login_simple("AG001").await.unwrap();

        assert_eq!(data.user.agent_code, "AG001");
        assert_eq!(data.user.team_name.as_deref(), Some("Alpha"));

        let claims = fx.issuer.verify(&data.token).unwrap();
        assert_eq!(claims.agent_code, "AG001");
        assert_eq!(claims.role, Role::Agent);
        assert_eq!(claims.team_id, Some(fx.team.id));

        let stored = fx.repo.find_by_code("AG001").await.unwrap().unwrap();
        assert!(stored.last_login_at.is_some());
    }

    #[tokio::test]
    async fn test_simple_login_survives_last_login_failure() {
        let fx = fixture_with(false, true, false).await;
        let data = fx.service().login_simple("AG001").await.unwrap();
        assert!(!data.token.is_empty());

        let stored = fx.repo.find_by_code("AG001").await.unwrap().unwrap();
        assert!(stored.last_login_at.is_none());
    }

    #[tokio::test]
    async fn test_simple_login_store_failure_is_internal() {
        let fx = fixture_with(true, false, false).await;
        let err = fx.service().login_simple("AG001").await.unwrap_err();
        assert!(matches!(err, PlatformError::Internal { .. }));
    }

    #[tokio::test]
    async fn test_secure_login_missing_code() {
        let fx = fixture().await;
        let service = fx.service();

        for (agent, supervisor) in [(None, None), (Some(""), None), (Some(""), Some(""))] {
            let err = service.login_secure(agent, supervisor).await.unwrap_err();
            assert!(matches!(err, PlatformError::MissingCredentials));
        }
    }

    #[tokio::test]
    async fn test_secure_login_unknown_code() {
        let fx = fixture().await;
        let err = fx.service().login_secure(Some("ag777"), None).await.unwrap_err();
        assert!(matches!(err, PlatformError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_secure_login_agent_has_no_roster() {
        let fx = fixture().await;
        let data = fx.service().login_secure(Some("ag001"), None).await.unwrap();

        assert_eq!(data.user.agent_code, "AG001");
        assert!(data.team_data.is_none());

        let claims = fx.issuer.verify(&data.token).unwrap();
        assert_eq!(claims.role, Role::Agent);
    }

    #[tokio::test]
    async fn test_secure_login_ignores_status() {
        let fx = fixture().await;
        let data = fx.service().login_secure(Some("AG003"), None).await.unwrap();
        assert_eq!(data.user.status, UserStatus::Inactive);
    }

    #[tokio::test]
    async fn test_secure_login_supervisor_roster() {
        let fx = fixture().await;
        let data = fx.service().login_secure(None, Some("sp001")).await.unwrap();

        let roster: Vec<String> = data
            .team_data
            .expect("supervisor gets a roster")
            .into_iter()
            .map(|u| u.agent_code)
            .collect();
        assert_eq!(roster, vec!["AG001", "AG002", "AG003", "SP001"]);

        let claims = fx.issuer.verify(&data.token).unwrap();
        assert_eq!(claims.role, Role::Supervisor);
        assert_eq!(claims.team_id, Some(fx.team.id));
    }

    #[tokio::test]
    async fn test_secure_login_empty_agent_code_falls_through() {
        let fx = fixture().await;
        let data = fx.service().login_secure(Some(""), Some("SP001")).await.unwrap();
        assert_eq!(data.user.agent_code, "SP001");
    }

    #[tokio::test]
    async fn test_secure_login_supervisor_without_team() {
        let fx = fixture().await;
        let data = fx.service().login_secure(None, Some("SP002")).await.unwrap();
        assert_eq!(data.team_data, Some(Vec::new()));
    }

    #[tokio::test]
    async fn test_secure_login_does_not_stamp_last_login() {
        let fx = fixture().await;
        fx.service().login_secure(Some("AG002"), None).await.unwrap();
        let stored = fx.repo.find_by_code("AG002").await.unwrap().unwrap();
        assert!(stored.last_login_at.is_none());
    }

    #[tokio::test]
    async fn test_secure_login_store_failures_are_internal() {
        let fx = fixture_with(true, false, false).await;
        let err = fx.service().login_secure(Some("AG001"), None).await.unwrap_err();
        assert!(matches!(err, PlatformError::Internal { .. }));

        let fx = fixture_with(false, false, true).await;
        let err = fx.service().login_secure(None, Some("SP001")).await.unwrap_err();
        assert!(matches!(err, PlatformError::Internal { .. }));
    }
}
