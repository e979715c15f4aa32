//! User/Agent Entity
//!
//! One table backs agents, supervisors and admins. Records are never
//! physically removed: deletion stamps `deleted_at` and flips status to
//! `Inactive`.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::shared::error::PlatformError;

/// Account role, encoded in the code prefix (AG/SP/AD)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Agent,
    Supervisor,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Agent => "agent",
            Role::Supervisor => "supervisor",
            Role::Admin => "admin",
        }
    }

    /// Two-letter code prefix for this role
    pub fn code_prefix(&self) -> &'static str {
        match self {
            Role::Agent => "AG",
            Role::Supervisor => "SP",
            Role::Admin => "AD",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = PlatformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "agent" => Ok(Role::Agent),
            "supervisor" => Ok(Role::Supervisor),
            "admin" => Ok(Role::Admin),
            other => Err(PlatformError::validation(format!("Unknown role: {}", other))),
        }
    }
}

/// Lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
pub enum UserStatus {
    #[default]
    Active,
    Inactive,
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Active => "Active",
            UserStatus::Inactive => "Inactive",
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, UserStatus::Active)
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserStatus {
    type Err = PlatformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Active" => Ok(UserStatus::Active),
            "Inactive" => Ok(UserStatus::Inactive),
            other => Err(PlatformError::validation(format!("Unknown status: {}", other))),
        }
    }
}

/// Team (read-only from the auth core)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: i64,
    pub name: String,
}

/// Stored user/agent record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub id: i64,

    /// Login code, e.g. `AG001`
    pub code: String,

    pub full_name: String,
    pub role: Role,
    pub team_id: Option<i64>,

    /// Joined from `teams.team_name`
    pub team_name: Option<String>,

    pub status: UserStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl UserRecord {
    pub fn is_supervisor(&self) -> bool {
        self.role == Role::Supervisor
    }
}

/// Data for creating a record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub code: String,
    pub full_name: String,
    pub role: Role,
    pub team_id: Option<i64>,

    /// Defaults to `Active` when omitted
    pub status: Option<UserStatus>,
}

impl NewUser {
    pub fn new(code: impl Into<String>, full_name: impl Into<String>, role: Role) -> Self {
        Self {
            code: code.into(),
            full_name: full_name.into(),
            role,
            team_id: None,
            status: None,
        }
    }

    pub fn with_team(mut self, team_id: i64) -> Self {
        self.team_id = Some(team_id);
        self
    }

    pub fn with_status(mut self, status: UserStatus) -> Self {
        self.status = Some(status);
        self
    }
}

/// Partial update. Only `Some` fields are written; `team_id: Some(None)`
/// clears the team.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
    pub full_name: Option<String>,
    pub role: Option<Role>,
    pub team_id: Option<Option<i64>>,
    pub status: Option<UserStatus>,
}

impl UserPatch {
    pub fn is_empty(&self) -> bool {
        self.full_name.is_none()
            && self.role.is_none()
            && self.team_id.is_none()
            && self.status.is_none()
    }
}

/// Optional filters for listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserFilters {
    pub role: Option<Role>,
    pub status: Option<UserStatus>,
    pub team_id: Option<i64>,
}
