use std::fmt;
use std::time::Duration;

/// Token signing configuration shared by the issuer and the verifier.
///
/// Built once at startup from service configuration and never mutated.
/// Both sides of the contract must be constructed from equal settings
/// for tokens to round-trip.
#[derive(Clone)]
pub struct TokenSettings {
    signing_key: Vec<u8>,
    issuer: String,
    audience: String,
    validity: Duration,
}

impl TokenSettings {
    /// Create token settings.
    ///
    /// # Arguments
    /// * `signing_key` - HMAC secret (should be at least 32 bytes for HS256)
    /// * `issuer` - Value written to and required in the `iss` claim
    /// * `audience` - Value written to and required in the `aud` claim
    /// * `validity` - Lifetime of issued tokens
    pub fn new(
        signing_key: impl Into<Vec<u8>>,
        issuer: impl Into<String>,
        audience: impl Into<String>,
        validity: Duration,
    ) -> Self {
        Self {
            signing_key: signing_key.into(),
            issuer: issuer.into(),
            audience: audience.into(),
            validity,
        }
    }

    pub fn signing_key(&self) -> &[u8] {
        &self.signing_key
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    pub fn audience(&self) -> &str {
        &self.audience
    }

    pub fn validity(&self) -> Duration {
        self.validity
    }
}

// The signing key never shows up in logs.
impl fmt::Debug for TokenSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenSettings")
            .field("signing_key", &"<redacted>")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("validity", &self.validity)
            .finish()
    }
}
