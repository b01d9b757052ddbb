use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::settings::TokenSettings;

/// Identity token claims.
///
/// Every field is required: a token missing any of them fails to
/// deserialize and is rejected, so there is no partially-populated claim set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (username)
    pub sub: String,

    /// Numeric user identifier assigned by the credential store
    pub user_id: u64,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Issuer
    pub iss: String,

    /// Audience
    pub aud: String,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Create claims for an authenticated user.
    ///
    /// # Arguments
    /// * `username` - Subject of the token
    /// * `user_id` - Numeric user identifier
    /// * `settings` - Issuer, audience and validity to apply
    /// * `now` - Issuance instant
    ///
    /// # Returns
    /// Claims with `exp = iat + validity`
    pub fn for_user(
        username: impl Into<String>,
        user_id: u64,
        settings: &TokenSettings,
        now: DateTime<Utc>,
    ) -> Self {
        let iat = now.timestamp();
        let validity = i64::try_from(settings.validity().as_secs()).unwrap_or(i64::MAX);

        Self {
            sub: username.into(),
            user_id,
            iat,
            iss: settings.issuer().to_string(),
            aud: settings.audience().to_string(),
            exp: iat.saturating_add(validity),
        }
    }

    /// Check if token is expired.
    ///
    /// A token is valid only while `current_timestamp < exp`.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        current_timestamp >= self.exp
    }
}
