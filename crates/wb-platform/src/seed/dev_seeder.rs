//! Development Data Seeder
//!
//! Seeds a small roster on startup in dev mode.
//!
//! Default logins (simple login, code only):
//!   Admin:      AD001
//!   Supervisor: SP001 (Floor A)
//!   Agents:     AG001, AG002 (Floor A)
//!   Inactive:   AG003 (Floor B)

use tracing::info;

use crate::shared::error::Result;
use crate::user::entity::{NewUser, Role, UserStatus};
use crate::user::repository::UserRepository;
use crate::user::sqlite::SqliteUserRepository;

const TEAM_NAMES: [&str; 2] = ["Floor A", "Floor B"];

struct DevUser {
    code: &'static str,
    full_name: &'static str,
    role: Role,
    team: Option<usize>,
    status: UserStatus,
}

const DEV_USERS: &[DevUser] = &[
    DevUser { code: "AD001", full_name: "Dev Admin", role: Role::Admin, team: None, status: UserStatus::Active },
    DevUser { code: "SP001", full_name: "Sam Supervisor", role: Role::Supervisor, team: Some(0), status: UserStatus::Active },
    DevUser { code: "AG001", full_name: "Alice Agent", role: Role::Agent, team: Some(0), status: UserStatus::Active },
    DevUser { code: "AG002", full_name: "Bob Agent", role: Role::Agent, team: Some(0), status: UserStatus::Active },
    DevUser { code: "AG003", full_name: "Ivy Inactive", role: Role::Agent, team: Some(1), status: UserStatus::Inactive },
];

/// Development data seeder
pub struct DevDataSeeder {
    repo: SqliteUserRepository,
}

impl DevDataSeeder {
    pub fn new(repo: SqliteUserRepository) -> Self {
        Self { repo }
    }

    /// Seed the dev roster. Returns the number of users created.
    pub async fn seed(&self) -> Result<usize> {
        info!("=== DEV DATA SEEDER ===");

        let mut missing = Vec::new();
        for user in DEV_USERS {
            if !self.repo.code_exists(user.code).await? {
                missing.push(user);
            }
        }

        if missing.is_empty() {
            info!("Dev roster already present, nothing to seed");
            return Ok(0);
        }

        let mut team_ids = Vec::with_capacity(TEAM_NAMES.len());
        for name in TEAM_NAMES {
            let team = match self.repo.find_team_by_name(name).await? {
                Some(team) => team,
                None => {
                    let team = self.repo.insert_team(name).await?;
                    info!(team_id = team.id, "Created team: {}", team.name);
                    team
                }
            };
            team_ids.push(team.id);
        }

        for user in &missing {
            let mut new_user = NewUser::new(user.code, user.full_name, user.role)
                .with_status(user.status);
            if let Some(idx) = user.team {
                new_user = new_user.with_team(team_ids[idx]);
            }
            self.repo.create(new_user).await?;
            info!("Created {} {} ({})", user.role, user.code, user.status);
        }

        info!("Default logins: AD001, SP001, AG001, AG002 (AG003 is inactive)");
        info!("=======================");

        Ok(missing.len())
    }
}
