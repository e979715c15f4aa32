//! User Repository Trait
//!
//! Data-access interface consumed by the login flows and the user API.
//! Every lookup excludes soft-deleted rows.

use async_trait::async_trait;

use crate::shared::error::Result;
use crate::user::entity::{NewUser, Team, UserFilters, UserPatch, UserRecord};

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Live records matching the filters, newest first, with team name joined.
    async fn find_all(&self, filters: &UserFilters) -> Result<Vec<UserRecord>>;

    async fn find_by_id(&self, id: i64) -> Result<Option<UserRecord>>;

    /// Exact match on the login code. Callers normalize case.
    async fn find_by_code(&self, code: &str) -> Result<Option<UserRecord>>;

    /// Live members of a team, used for a supervisor's roster.
    async fn find_by_team(&self, team_id: i64) -> Result<Vec<UserRecord>>;

    /// Insert a record. Status defaults to `Active`.
    ///
    /// Does not check [`code_exists`](Self::code_exists) first; callers that
    /// want a friendly conflict check must do so themselves.
    async fn create(&self, user: NewUser) -> Result<UserRecord>;

    /// Apply a partial update and always refresh `updated_at`.
    /// `NotFound` when no live record has this id.
    async fn update(&self, id: i64, patch: UserPatch) -> Result<UserRecord>;

    /// Mark `Inactive` and stamp `deleted_at`. `NotFound` when no live record matched.
    async fn soft_delete(&self, id: i64) -> Result<()>;

    /// Stamp `last_login_at`. Succeeds even if the id does not exist.
    async fn update_last_login(&self, id: i64) -> Result<()>;

    /// True iff a live record uses this code.
    async fn code_exists(&self, code: &str) -> Result<bool>;

    async fn find_team(&self, team_id: i64) -> Result<Option<Team>>;
}
