//! Session Token Issuer
//!
//! HS256 JWTs carrying `{agentCode, role, teamId}` with a fixed 8-hour
//! validity window. Tokens are not persisted and cannot be refreshed.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::shared::error::{PlatformError, Result};
use crate::user::entity::{Role, UserRecord};

/// Session validity window (8 hours)
pub const SESSION_TOKEN_TTL_SECS: i64 = 8 * 60 * 60;

/// JWT claims for session tokens
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionClaims {
    pub agent_code: String,
    pub role: Role,
    pub team_id: Option<i64>,

    /// Issuer
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

/// Mints and checks session tokens with a process-wide secret
pub struct SessionTokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
}

impl SessionTokenIssuer {
    /// Fails when the secret is empty; there is no fallback secret.
    pub fn new(secret: &str, issuer: impl Into<String>) -> Result<Self> {
        if secret.trim().is_empty() {
            return Err(PlatformError::internal("Session token secret is not configured"));
        }

        let issuer = issuer.into();
        info!(issuer = %issuer, "SessionTokenIssuer initialized with HS256");

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            issuer,
        })
    }

    /// Issue a token for the account, valid for [`SESSION_TOKEN_TTL_SECS`].
    pub fn issue(&self, user: &UserRecord) -> Result<String> {
        self.issue_at(user, Utc::now())
    }

    fn issue_at(&self, user: &UserRecord, now: DateTime<Utc>) -> Result<String> {
        let claims = SessionClaims {
            agent_code: user.code.clone(),
            role: user.role,
            team_id: user.team_id,
            iss: self.issuer.clone(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(SESSION_TOKEN_TTL_SECS)).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| PlatformError::internal(format!("Failed to encode JWT: {}", e)))
    }

    /// Validate signature, issuer and expiry.
    pub fn verify(&self, token: &str) -> Result<SessionClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);

        decode::<SessionClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => PlatformError::TokenExpired,
                _ => PlatformError::InvalidToken { message: format!("{}", e) },
            })
    }
}
