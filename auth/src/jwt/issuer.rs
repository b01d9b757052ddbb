use chrono::DateTime;
use chrono::Utc;
use jsonwebtoken::encode;
use jsonwebtoken::Algorithm;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;

use super::claims::Claims;
use super::errors::JwtError;
use super::settings::TokenSettings;

/// Signs identity tokens for users whose credentials were already verified.
///
/// Uses HS256 (HMAC with SHA-256). Issuance never touches storage.
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    settings: TokenSettings,
}

impl TokenIssuer {
    pub const ALGORITHM: Algorithm = Algorithm::HS256;

    /// Create a new token issuer.
    ///
    /// # Security Notes
    /// - The secret should be at least 256 bits (32 bytes) for HS256
    /// - Store secrets in environment variables or secure vaults, never in code
    pub fn new(settings: &TokenSettings) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(settings.signing_key()),
            settings: settings.clone(),
        }
    }

    /// Issue a token for `username` / `user_id`, valid from now.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn issue(&self, username: &str, user_id: u64) -> Result<String, JwtError> {
        self.issue_at(username, user_id, Utc::now())
    }

    /// Issue a token as if the current time were `now`.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn issue_at(
        &self,
        username: &str,
        user_id: u64,
        now: DateTime<Utc>,
    ) -> Result<String, JwtError> {
        let claims = Claims::for_user(username, user_id, &self.settings, now);
        self.encode(&claims)
    }

    /// Sign an arbitrary claim set.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn encode(&self, claims: &Claims) -> Result<String, JwtError> {
        let header = Header::new(Self::ALGORITHM);

        encode(&header, claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use jsonwebtoken::decode_header;

    use super::*;

    #[test]
    fn test_issue_produces_hs256_token() {
        let settings = TokenSettings::new(
            "my_secret_key_at_least_32_bytes_long!",
            "auth-service",
            "task-manager",
            Duration::from_secs(60),
        );
        let issuer = TokenIssuer::new(&settings);

        let token = issuer.issue("alice", 1).expect("Failed to issue token");
        assert_eq!(token.split('.').count(), 3);

        let header = decode_header(&token).expect("Failed to decode header");
        assert_eq!(header.alg, Algorithm::HS256);
    }
}
