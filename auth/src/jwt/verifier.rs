use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::decode_header;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::Validation;

use super::claims::Claims;
use super::errors::JwtError;
use super::issuer::TokenIssuer;
use super::settings::TokenSettings;
use crate::identity::RequestIdentity;

/// Validates bearer credentials and produces the caller's identity.
///
/// Only HS256 tokens signed with the configured secret, carrying the
/// configured issuer and audience, and not yet expired are accepted.
/// Clock leeway is zero.
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    /// Literal prefix of the `Authorization` header value (case-sensitive, single space).
    pub const BEARER_PREFIX: &'static str = "Bearer ";

    pub fn new(settings: &TokenSettings) -> Self {
        let mut validation = Validation::new(TokenIssuer::ALGORITHM);
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.set_issuer(&[settings.issuer()]);
        validation.set_audience(&[settings.audience()]);
        validation.set_required_spec_claims(&["exp", "sub", "iss", "aud"]);

        Self {
            decoding_key: DecodingKey::from_secret(settings.signing_key()),
            validation,
        }
    }

    /// Verify an `Authorization` header value.
    ///
    /// # Arguments
    /// * `authorization` - Raw header value, `None` when the header is absent
    ///
    /// # Returns
    /// Identity of the caller
    ///
    /// # Errors
    /// * `MissingBearer` - Header absent or not starting with `Bearer `
    /// * any error of [`TokenVerifier::verify_token`]
    pub fn verify(&self, authorization: Option<&str>) -> Result<RequestIdentity, JwtError> {
        let token = authorization
            .and_then(|value| value.strip_prefix(Self::BEARER_PREFIX))
            .ok_or(JwtError::MissingBearer)?;

        let claims = self.verify_token(token)?;

        Ok(RequestIdentity::from_claims(claims))
    }

    /// Decode and validate a raw token.
    ///
    /// The declared algorithm is checked against HS256 before any
    /// signature work happens.
    ///
    /// # Errors
    /// * `Malformed` - Token structure or header cannot be parsed
    /// * `AlgorithmMismatch` - Header declares anything other than HS256
    /// * `InvalidSignature` - Signature does not match the configured secret
    /// * `TokenExpired` - `exp` is not in the future
    /// * `InvalidIssuer` / `InvalidAudience` - Claim differs from configuration
    /// * `InvalidClaims` - Required claim missing or of the wrong type
    pub fn verify_token(&self, token: &str) -> Result<Claims, JwtError> {
        let header = decode_header(token).map_err(|e| JwtError::Malformed(e.to_string()))?;
        if header.alg != TokenIssuer::ALGORITHM {
            return Err(JwtError::AlgorithmMismatch(format!("{:?}", header.alg)));
        }

        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(classify)?;

        if token_data.claims.is_expired(Utc::now().timestamp()) {
            return Err(JwtError::TokenExpired);
        }

        Ok(token_data.claims)
    }
}

fn classify(error: jsonwebtoken::errors::Error) -> JwtError {
    match error.kind() {
        ErrorKind::InvalidSignature => JwtError::InvalidSignature,
        ErrorKind::ExpiredSignature => JwtError::TokenExpired,
        ErrorKind::InvalidIssuer => JwtError::InvalidIssuer,
        ErrorKind::InvalidAudience => JwtError::InvalidAudience,
        ErrorKind::InvalidAlgorithm => JwtError::AlgorithmMismatch(error.to_string()),
        ErrorKind::MissingRequiredClaim(claim) => {
            JwtError::InvalidClaims(format!("missing claim '{}'", claim))
        }
        ErrorKind::Json(e) => JwtError::InvalidClaims(e.to_string()),
        _ => JwtError::Malformed(error.to_string()),
    }
}
