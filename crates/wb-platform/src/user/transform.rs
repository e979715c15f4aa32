//! Response Transformer
//!
//! Single mapping from stored records to the external user shape.
//! `deleted_at` never leaves the service.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::user::entity::{Role, UserRecord, UserStatus};

/// External-facing user/agent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i64,

    /// Login code, e.g. `AG001`
    pub agent_code: String,

    pub full_name: String,
    pub role: Role,
    pub team_id: Option<i64>,
    pub team_name: Option<String>,
    pub status: UserStatus,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&UserRecord> for UserResponse {
    fn from(u: &UserRecord) -> Self {
        Self {
            id: u.id,
            agent_code: u.code.clone(),
            full_name: u.full_name.clone(),
            role: u.role,
            team_id: u.team_id,
            team_name: u.team_name.clone(),
            status: u.status,
            last_login_at: u.last_login_at,
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}

impl From<UserRecord> for UserResponse {
    fn from(u: UserRecord) -> Self {
        Self::from(&u)
    }
}

pub fn transform_user(user: &UserRecord) -> UserResponse {
    UserResponse::from(user)
}

pub fn transform_users(users: &[UserRecord]) -> Vec<UserResponse> {
    users.iter().map(UserResponse::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> UserRecord {
        let now = Utc::now();
        UserRecord {
            id: 7,
            code: "SP001".to_string(),
            full_name: "Sam Supervisor".to_string(),
            role: Role::Supervisor,
            team_id: Some(1),
            team_name: Some("Alpha".to_string()),
            status: UserStatus::Active,
            created_at: now,
            updated_at: now,
            last_login_at: None,
            deleted_at: Some(now),
        }
    }

    #[test]
    fn test_transform_strips_internal_fields() {
        let json = serde_json::to_value(transform_user(&record())).unwrap();
        let obj = json.as_object().unwrap();

        assert_eq!(obj["agentCode"], "SP001");
        assert_eq!(obj["fullName"], "Sam Supervisor");
        assert_eq!(obj["role"], "supervisor");
        assert_eq!(obj["teamName"], "Alpha");
        assert_eq!(obj["status"], "Active");
        assert!(obj["lastLoginAt"].is_null());
        assert!(!obj.contains_key("deletedAt"));
        assert!(!obj.contains_key("code"));
    }

    #[test]
    fn test_transform_is_deterministic() {
        let user = record();
        assert_eq!(transform_user(&user), transform_user(&user));
        assert_eq!(UserResponse::from(user.clone()), transform_user(&user));
    }

    #[test]
    fn test_transform_users_preserves_order() {
        let mut second = record();
        second.id = 8;
        let out = transform_users(&[record(), second]);
        assert_eq!(out.iter().map(|u| u.id).collect::<Vec<_>>(), vec![7, 8]);
        assert!(transform_users(&[]).is_empty());
    }
}
