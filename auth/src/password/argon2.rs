use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::Error as PasswordHashError;
use argon2::password_hash::PasswordHash;
use argon2::password_hash::PasswordHasher as Argon2PasswordHasher;
use argon2::password_hash::PasswordVerifier;
use argon2::password_hash::SaltString;
use argon2::Algorithm;
use argon2::Argon2;
use argon2::Params;
use argon2::Version;

use super::errors::PasswordError;

/// Argon2id cost parameters applied to newly created hashes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashingParams {
    /// Memory cost in KiB
    pub memory_kib: u32,
    /// Number of passes
    pub iterations: u32,
    /// Degree of parallelism
    pub parallelism: u32,
    /// Digest length in bytes
    pub output_len: usize,
}

impl Default for HashingParams {
    /// 64 MiB, 3 passes, 4 lanes, 32-byte digest.
    fn default() -> Self {
        Self {
            memory_kib: 64 * 1024,
            iterations: 3,
            parallelism: 4,
            output_len: 32,
        }
    }
}

/// Argon2id hasher writing and reading PHC strings
/// (`$argon2id$v=19$m=..,t=..,p=..$salt$digest`).
///
/// Only new hashes use the configured cost. `verify` takes the cost from the
/// stored string, so raising the parameters never locks out existing users.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    params: HashingParams,
}

impl PasswordHasher {
    pub fn new() -> Self {
        Self::with_params(HashingParams::default())
    }

    pub fn with_params(params: HashingParams) -> Self {
        Self { params }
    }

    fn argon2(&self) -> Result<Argon2<'static>, PasswordError> {
        let HashingParams {
            memory_kib,
            iterations,
            parallelism,
            output_len,
        } = self.params;
        let params = Params::new(memory_kib, iterations, parallelism, Some(output_len))
            .map_err(|e| PasswordError::InvalidParameters(e.to_string()))?;

        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }

    /// Hash `password` under a fresh random salt.
    ///
    /// # Errors
    /// * `InvalidParameters` - Configured cost rejected by argon2
    /// * `HashingFailed` - Hash computation failed
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);

        let phc = self
            .argon2()?
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))?;

        Ok(phc.to_string())
    }

    /// `Ok(false)` on a mismatch; `Err` only when `stored` is not a usable
    /// PHC string.
    pub fn verify(&self, password: &str, stored: &str) -> Result<bool, PasswordError> {
        let phc = PasswordHash::new(stored)
            .map_err(|e| PasswordError::VerificationFailed(format!("unreadable stored hash: {}", e)))?;

        match Argon2::default().verify_password(password.as_bytes(), &phc) {
            Ok(()) => Ok(true),
            Err(PasswordHashError::Password) => Ok(false),
            Err(e) => Err(PasswordError::VerificationFailed(e.to_string())),
        }
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}
