//! Credentials and identity tokens shared by auth-service and api-service.
//!
//! [`PasswordHasher`] stores passwords as Argon2id PHC strings.
//! [`TokenIssuer`] signs HS256 tokens carrying `sub`, `user_id`, `iss`,
//! `aud`, `iat` and `exp`. [`TokenVerifier`] turns an `Authorization`
//! header back into a [`RequestIdentity`], which is the only way to obtain
//! one. [`Authenticator`] bundles all three behind one value.
//!
//! ```
//! use std::time::Duration;
//!
//! use auth::{HashingParams, PasswordHasher, TokenIssuer, TokenSettings, TokenVerifier};
//!
//! let hasher = PasswordHasher::with_params(HashingParams {
//!     memory_kib: 1024,
//!     iterations: 1,
//!     parallelism: 1,
//!     output_len: 32,
//! });
//! let stored = hasher.hash("secret123").unwrap();
//! assert!(hasher.verify("secret123", &stored).unwrap());
//!
//! let settings = TokenSettings::new(
//!     "a-signing-key-of-at-least-32-bytes",
//!     "auth-service",
//!     "task-manager",
//!     Duration::from_secs(3600),
//! );
//! let token = TokenIssuer::new(&settings).issue("alice", 1).unwrap();
//! let caller = TokenVerifier::new(&settings)
//!     .verify(Some(&format!("Bearer {}", token)))
//!     .unwrap();
//! assert_eq!((caller.username(), caller.user_id()), ("alice", 1));
//! ```

pub mod authenticator;
pub mod identity;
pub mod jwt;
pub mod password;

pub use authenticator::AuthenticationError;
pub use authenticator::AuthenticationResult;
pub use authenticator::Authenticator;
pub use identity::RequestIdentity;
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::TokenIssuer;
pub use jwt::TokenSettings;
pub use jwt::TokenVerifier;
pub use password::HashingParams;
pub use password::PasswordError;
pub use password::PasswordHasher;
