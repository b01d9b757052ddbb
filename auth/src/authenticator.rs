use crate::identity::RequestIdentity;
use crate::jwt::JwtError;
use crate::jwt::TokenIssuer;
use crate::jwt::TokenSettings;
use crate::jwt::TokenVerifier;
use crate::password::PasswordError;
use crate::password::PasswordHasher;

/// Single entry point for the credential and token halves of the library.
///
/// auth-service uses it to hash, check passwords and sign tokens; api-service
/// only ever calls [`Authenticator::verify_bearer`]. Both halves share one
/// `TokenSettings`, so whatever one service issues the other accepts.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    issuer: TokenIssuer,
    verifier: TokenVerifier,
}

/// Outcome of a successful login.
#[derive(Debug)]
pub struct AuthenticationResult {
    pub access_token: String,
}

#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    /// Password did not match the stored hash.
    #[error("Credentials rejected")]
    InvalidCredentials,

    #[error("Password check failed: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("Token signing failed: {0}")]
    JwtError(#[from] JwtError),
}

impl Authenticator {
    /// Authenticator using the production Argon2id cost.
    pub fn new(settings: &TokenSettings) -> Self {
        Self::with_password_hasher(settings, PasswordHasher::new())
    }

    pub fn with_password_hasher(settings: &TokenSettings, password_hasher: PasswordHasher) -> Self {
        Self {
            password_hasher,
            issuer: TokenIssuer::new(settings),
            verifier: TokenVerifier::new(settings),
        }
    }

    /// PHC string for a new password.
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Check `password` against `stored_hash` and, on a match, sign a token
    /// for `username` / `user_id`.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Hash does not match
    /// * `PasswordError` - Stored hash could not be read
    /// * `JwtError` - Signing failed
    pub fn authenticate(
        &self,
        password: &str,
        stored_hash: &str,
        username: &str,
        user_id: u64,
    ) -> Result<AuthenticationResult, AuthenticationError> {
        if !self.password_hasher.verify(password, stored_hash)? {
            return Err(AuthenticationError::InvalidCredentials);
        }

        Ok(AuthenticationResult {
            access_token: self.issuer.issue(username, user_id)?,
        })
    }

    pub fn issue_token(&self, username: &str, user_id: u64) -> Result<String, JwtError> {
        self.issuer.issue(username, user_id)
    }

    /// Resolve a raw `Authorization` header value into the caller's identity.
    pub fn verify_bearer(&self, authorization: Option<&str>) -> Result<RequestIdentity, JwtError> {
        self.verifier.verify(authorization)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::password::HashingParams;

    const KEY: &str = "authenticator-test-key-of-32-bytes!";

    fn settings() -> TokenSettings {
        TokenSettings::new(KEY, "auth-service", "task-manager", Duration::from_secs(600))
    }

    fn cheap_authenticator(settings: &TokenSettings) -> Authenticator {
        let params = HashingParams {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
            output_len: 32,
        };
        Authenticator::with_password_hasher(settings, PasswordHasher::with_params(params))
    }

    #[test]
    fn test_login_token_round_trips_to_identity() {
        let authenticator = cheap_authenticator(&settings());
        let stored = authenticator.hash_password("secret123").unwrap();

        let login = authenticator
            .authenticate("secret123", &stored, "alice", 3)
            .unwrap();
        let identity = authenticator
            .verify_bearer(Some(&format!("Bearer {}", login.access_token)))
            .unwrap();

        assert_eq!(identity.username(), "alice");
        assert_eq!(identity.user_id(), 3);
    }

    #[test]
    fn test_wrong_password_is_invalid_credentials() {
        let authenticator = cheap_authenticator(&settings());
        let stored = authenticator.hash_password("secret123").unwrap();

        assert!(matches!(
            authenticator.authenticate("secret124", &stored, "alice", 3),
            Err(AuthenticationError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_unreadable_stored_hash_is_password_error() {
        let authenticator = cheap_authenticator(&settings());

        assert!(matches!(
            authenticator.authenticate("secret123", "plaintext-in-db", "alice", 3),
            Err(AuthenticationError::PasswordError(_))
        ));
    }

    #[test]
    fn test_tokens_accepted_across_instances_sharing_settings() {
        let settings = settings();
        let issuing = cheap_authenticator(&settings);
        let verifying = Authenticator::new(&settings);

        let token = issuing.issue_token("bob", 9).unwrap();
        let identity = verifying
            .verify_bearer(Some(&format!("Bearer {}", token)))
            .unwrap();
        assert_eq!(identity.user_id(), 9);

        assert!(verifying.verify_bearer(None).is_err());
        assert!(verifying.verify_bearer(Some("Bearer a.b.c")).is_err());
    }
}
