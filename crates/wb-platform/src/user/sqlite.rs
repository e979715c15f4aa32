//! SQLite User Repository Implementation
//!
//! Timestamps are Unix milliseconds. Multi-step operations (insert then
//! re-read, update then re-read) are not wrapped in a transaction.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};
use tracing::{debug, info};

use crate::shared::error::{PlatformError, Result};
use crate::user::entity::{NewUser, Team, UserFilters, UserPatch, UserRecord, UserStatus};
use crate::user::repository::UserRepository;

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS teams (
        team_id INTEGER PRIMARY KEY AUTOINCREMENT,
        team_name TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        username TEXT NOT NULL,
        fullName TEXT NOT NULL,
        role TEXT NOT NULL CHECK (role IN ('agent', 'supervisor', 'admin')),
        teamId INTEGER REFERENCES teams(team_id),
        status TEXT NOT NULL DEFAULT 'Active' CHECK (status IN ('Active', 'Inactive')),
        createdAt INTEGER NOT NULL,
        updatedAt INTEGER NOT NULL,
        lastLoginAt INTEGER,
        deletedAt INTEGER
    )
    "#,
    "CREATE UNIQUE INDEX IF NOT EXISTS idx_users_username_live ON users(username) WHERE deletedAt IS NULL",
    "CREATE INDEX IF NOT EXISTS idx_users_team_id ON users(teamId)",
    "CREATE INDEX IF NOT EXISTS idx_users_created_at ON users(createdAt)",
];

const SELECT_LIVE_USERS: &str = "SELECT u.id, u.username, u.fullName, u.role, u.teamId, \
     t.team_name AS teamName, u.status, u.createdAt, u.updatedAt, u.lastLoginAt, u.deletedAt \
     FROM users u LEFT JOIN teams t ON u.teamId = t.team_id \
     WHERE u.deletedAt IS NULL";

/// SQLite implementation of UserRepository
pub struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get the pool reference
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create tables and indexes if missing
    pub async fn init_schema(&self) -> Result<()> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        info!("User schema initialized");
        Ok(())
    }

    /// Insert a team. Teams are otherwise managed outside this service;
    /// used by the dev seeder and tests.
    pub async fn insert_team(&self, name: &str) -> Result<Team> {
        let result = sqlx::query("INSERT INTO teams (team_name) VALUES (?)")
            .bind(name)
            .execute(&self.pool)
            .await?;

        Ok(Team {
            id: result.last_insert_rowid(),
            name: name.to_string(),
        })
    }

    /// First team with the given name, if any
    pub async fn find_team_by_name(&self, name: &str) -> Result<Option<Team>> {
        let row = sqlx::query("SELECT team_id, team_name FROM teams WHERE team_name = ? ORDER BY team_id LIMIT 1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(Self::parse_team).transpose()
    }

    fn parse_team(row: &SqliteRow) -> Result<Team> {
        Ok(Team {
            id: row.try_get("team_id")?,
            name: row.try_get("team_name")?,
        })
    }

    fn parse_row(row: &SqliteRow) -> Result<UserRecord> {
        let role: String = row.try_get("role")?;
        let status: String = row.try_get("status")?;

        Ok(UserRecord {
            id: row.try_get("id")?,
            code: row.try_get("username")?,
            full_name: row.try_get("fullName")?,
            role: role
                .parse()
                .map_err(|_| PlatformError::internal(format!("Stored role is invalid: {}", role)))?,
            team_id: row.try_get("teamId")?,
            team_name: row.try_get("teamName")?,
            status: status
                .parse()
                .map_err(|_| PlatformError::internal(format!("Stored status is invalid: {}", status)))?,
            created_at: millis_to_datetime(row.try_get("createdAt")?)?,
            updated_at: millis_to_datetime(row.try_get("updatedAt")?)?,
            last_login_at: row
                .try_get::<Option<i64>, _>("lastLoginAt")?
                .map(millis_to_datetime)
                .transpose()?,
            deleted_at: row
                .try_get::<Option<i64>, _>("deletedAt")?
                .map(millis_to_datetime)
                .transpose()?,
        })
    }

    fn parse_rows(rows: &[SqliteRow]) -> Result<Vec<UserRecord>> {
        rows.iter().map(Self::parse_row).collect()
    }

    /// Translate constraint violations into domain errors
    fn map_write_error(err: sqlx::Error, code: Option<&str>) -> PlatformError {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return PlatformError::duplicate("User", "username", code.unwrap_or_default());
            }
            if db_err.is_foreign_key_violation() {
                return PlatformError::validation("teamId does not reference an existing team");
            }
            if db_err.is_check_violation() {
                return PlatformError::validation(db_err.message().to_string());
            }
        }
        PlatformError::Database(err)
    }
}

fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

fn millis_to_datetime(millis: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis)
        .ok_or_else(|| PlatformError::internal(format!("Invalid timestamp: {}", millis)))
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn find_all(&self, filters: &UserFilters) -> Result<Vec<UserRecord>> {
        let mut query = QueryBuilder::<Sqlite>::new(SELECT_LIVE_USERS);

        if let Some(role) = filters.role {
            query.push(" AND u.role = ").push_bind(role.as_str());
        }
        if let Some(status) = filters.status {
            query.push(" AND u.status = ").push_bind(status.as_str());
        }
        if let Some(team_id) = filters.team_id {
            query.push(" AND u.teamId = ").push_bind(team_id);
        }
        query.push(" ORDER BY u.createdAt DESC, u.id DESC");

        let rows = query.build().fetch_all(&self.pool).await?;
        let users = Self::parse_rows(&rows)?;

        debug!(count = users.len(), ?filters, "Listed users");
        Ok(users)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<UserRecord>> {
        let query = format!("{} AND u.id = ?", SELECT_LIVE_USERS);
        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(Self::parse_row).transpose()
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<UserRecord>> {
        let query = format!("{} AND u.username = ?", SELECT_LIVE_USERS);
        let row = sqlx::query(&query)
            .bind(code)
            .fetch_optional(&self.pool)
            .await?;

        let user = row.as_ref().map(Self::parse_row).transpose()?;
        debug!(code = %code, found = user.is_some(), "Looked up user by code");
        Ok(user)
    }

    async fn find_by_team(&self, team_id: i64) -> Result<Vec<UserRecord>> {
        let query = format!("{} AND u.teamId = ? ORDER BY u.username ASC", SELECT_LIVE_USERS);
        let rows = sqlx::query(&query)
            .bind(team_id)
            .fetch_all(&self.pool)
            .await?;

        Self::parse_rows(&rows)
    }

    async fn create(&self, user: NewUser) -> Result<UserRecord> {
        let now = now_millis();
        let status = user.status.unwrap_or_default();

        let result = sqlx::query(
            "INSERT INTO users (username, fullName, role, teamId, status, createdAt, updatedAt) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&user.code)
        .bind(&user.full_name)
        .bind(user.role.as_str())
        .bind(user.team_id)
        .bind(status.as_str())
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| Self::map_write_error(e, Some(&user.code)))?;

        let id = result.last_insert_rowid();
        info!(user_id = id, code = %user.code, role = %user.role, "Created user");

        self.find_by_id(id)
            .await?
            .ok_or_else(|| PlatformError::internal(format!("User {} vanished after insert", id)))
    }

    async fn update(&self, id: i64, patch: UserPatch) -> Result<UserRecord> {
        let mut query = QueryBuilder::<Sqlite>::new("UPDATE users SET updatedAt = MAX(");
        query.push_bind(now_millis()).push(", updatedAt + 1)");

        if let Some(full_name) = patch.full_name {
            query.push(", fullName = ").push_bind(full_name);
        }
        if let Some(role) = patch.role {
            query.push(", role = ").push_bind(role.as_str());
        }
        if let Some(team_id) = patch.team_id {
            query.push(", teamId = ").push_bind(team_id);
        }
        if let Some(status) = patch.status {
            query.push(", status = ").push_bind(status.as_str());
        }

        query
            .push(" WHERE id = ")
            .push_bind(id)
            .push(" AND deletedAt IS NULL");

        let result = query
            .build()
            .execute(&self.pool)
            .await
            .map_err(|e| Self::map_write_error(e, None))?;

        if result.rows_affected() == 0 {
            return Err(PlatformError::not_found("User", id.to_string()));
        }

        debug!(user_id = id, "Updated user");
        self.find_by_id(id)
            .await?
            .ok_or_else(|| PlatformError::not_found("User", id.to_string()))
    }

    async fn soft_delete(&self, id: i64) -> Result<()> {
        let now = now_millis();
        let result = sqlx::query(
            "UPDATE users SET status = ?, deletedAt = ?, updatedAt = MAX(?, updatedAt + 1) \
             WHERE id = ? AND deletedAt IS NULL",
        )
        .bind(UserStatus::Inactive.as_str())
        .bind(now)
        .bind(now)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(PlatformError::not_found("User", id.to_string()));
        }

        info!(user_id = id, "Soft-deleted user");
        Ok(())
    }

    async fn update_last_login(&self, id: i64) -> Result<()> {
        sqlx::query("UPDATE users SET lastLoginAt = ? WHERE id = ?")
            .bind(now_millis())
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn code_exists(&self, code: &str) -> Result<bool> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE username = ? AND deletedAt IS NULL")
                .bind(code)
                .fetch_one(&self.pool)
                .await?;
        Ok(count > 0)
    }

    async fn find_team(&self, team_id: i64) -> Result<Option<Team>> {
        let row = sqlx::query("SELECT team_id, team_name FROM teams WHERE team_id = ?")
            .bind(team_id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(Self::parse_team).transpose()
    }
}
