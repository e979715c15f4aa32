//! Common API types and utilities

use utoipa::ToSchema;
use serde::Serialize;

/// Deserializers for sparse update payloads.
pub(crate) mod nullable {
    use serde::{Deserialize, Deserializer};

    /// Distinguishes an absent field (`None`) from an explicit `null` (`Some(None)`).
    /// Pair with `#[serde(default)]`.
    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Some)
    }
}

/// Success envelope: `{ "success": true, "data": ... }`
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self { success: true, data }
    }
}

/// Success response with a message
#[derive(Debug, Serialize, ToSchema)]
pub struct SuccessResponse {
    pub success: bool,
    pub message: String,
}

impl SuccessResponse {
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "nullable::deserialize")]
        team_id: Option<Option<i64>>,
    }

    #[test]
    fn test_nullable_distinguishes_absent_and_null() {
        let absent: Patch = serde_json::from_str("{}").unwrap();
        assert_eq!(absent.team_id, None);

        let null: Patch = serde_json::from_str(r#"{"team_id":null}"#).unwrap();
        assert_eq!(null.team_id, Some(None));

        let set: Patch = serde_json::from_str(r#"{"team_id":4}"#).unwrap();
        assert_eq!(set.team_id, Some(Some(4)));
    }

    #[test]
    fn test_envelopes() {
        let json = serde_json::to_value(ApiResponse::ok(42)).unwrap();
        assert_eq!(json, serde_json::json!({"success": true, "data": 42}));

        let json = serde_json::to_value(SuccessResponse::with_message("Done")).unwrap();
        assert_eq!(json, serde_json::json!({"success": true, "message": "Done"}));
    }
}
