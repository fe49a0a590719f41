//! The signed-in user as cached in durable storage.

use movenpick_core::UserId;
use serde::{Deserialize, Deserializer, Serialize};

/// Name shown when the user record has no name.
pub const FALLBACK_DISPLAY_NAME: &str = "Account";

/// User record returned by the auth endpoints and cached under the `user` key.
///
/// Fields the client does not use are kept in `extra` so the cached copy
/// round-trips unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedUser {
    #[serde(default, deserialize_with = "lenient_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<UserId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl CachedUser {
    /// Name for the account button.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(FALLBACK_DISPLAY_NAME)
    }
}

/// PHP backends send numeric ids as strings about as often as numbers.
fn lenient_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<UserId>, D::Error> {
    Ok(
        match Option::<serde_json::Value>::deserialize(deserializer)? {
            Some(serde_json::Value::Number(n)) => n.as_i64().map(UserId::new),
            Some(serde_json::Value::String(s)) => s.trim().parse::<i64>().ok().map(UserId::new),
            _ => None,
        },
    )
}
