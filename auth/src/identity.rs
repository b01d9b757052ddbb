use crate::jwt::Claims;

/// Verified identity of the caller of a single request.
///
/// Produced only by [`crate::TokenVerifier`]; there is no public
/// constructor, so holding a value proves the bearer token was valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestIdentity {
    username: String,
    user_id: u64,
}

impl RequestIdentity {
    pub(crate) fn from_claims(claims: Claims) -> Self {
        Self {
            username: claims.sub,
            user_id: claims.user_id,
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn user_id(&self) -> u64 {
        self.user_id
    }
}
