use thiserror::Error;

/// Error type for JWT operations.
///
/// Variants stay distinct so callers can log the precise reason; services
/// collapse all verification variants into a single unauthenticated response.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum JwtError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Missing or malformed bearer credential")]
    MissingBearer,

    #[error("Malformed token: {0}")]
    Malformed(String),

    #[error("Unexpected signing algorithm: {0}")]
    AlgorithmMismatch(String),

    #[error("Token signature is invalid")]
    InvalidSignature,

    #[error("Token is expired")]
    TokenExpired,

    #[error("Token issuer is invalid")]
    InvalidIssuer,

    #[error("Token audience is invalid")]
    InvalidAudience,

    #[error("Invalid token claims: {0}")]
    InvalidClaims(String),
}
