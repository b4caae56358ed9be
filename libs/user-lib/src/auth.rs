//! Password hashing and session token generation.

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use rand_core::{OsRng, RngCore};

use crate::errors_service::UserServiceError;

pub const ARGON2_MEMORY_KIB: &str = "ARGON2_MEMORY_KIB";
pub const ARGON2_ITERATIONS: &str = "ARGON2_ITERATIONS";

const TOKEN_BYTES: usize = 32;
const TOKEN_PREFIX: &str = "tok_";

/// Argon2id cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashingConfig {
    pub memory_kib: u32,
    pub iterations: u32,
}

impl Default for HashingConfig {
    fn default() -> Self {
        Self {
            memory_kib: Params::DEFAULT_M_COST,
            iterations: Params::DEFAULT_T_COST,
        }
    }
}

impl HashingConfig {
    pub fn from_env() -> Self {
        let default = Self::default();

        let memory_kib = std::env::var(ARGON2_MEMORY_KIB)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default.memory_kib);

        let iterations = std::env::var(ARGON2_ITERATIONS)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default.iterations);

        Self {
            memory_kib,
            iterations,
        }
    }
}

#[derive(Clone)]
pub struct CredentialHasher {
    argon2: Argon2<'static>,
}

impl std::fmt::Debug for CredentialHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialHasher").finish_non_exhaustive()
    }
}

impl Default for CredentialHasher {
    fn default() -> Self {
        Self {
            argon2: Argon2::default(),
        }
    }
}

impl CredentialHasher {
    pub fn new(config: HashingConfig) -> Result<Self, UserServiceError> {
        let params = Params::new(
            config.memory_kib,
            config.iterations,
            Params::DEFAULT_P_COST,
            None,
        )
        .map_err(|e| UserServiceError::Validation(format!("invalid argon2 parameters: {e}")))?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    pub fn hash(&self, password: &str) -> Result<String, UserServiceError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| UserServiceError::Internal(anyhow::anyhow!("password hashing failed: {e}")))?;
        Ok(hash.to_string())
    }

    /// Returns `false` for a wrong password; malformed stored hashes are an internal error.
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, UserServiceError> {
        let parsed = PasswordHash::new(hash)
            .map_err(|e| UserServiceError::Internal(anyhow::anyhow!("stored hash is invalid: {e}")))?;
        Ok(self
            .argon2
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }
}

pub fn new_session_token() -> String {
    let mut buf = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut buf);
    format!("{TOKEN_PREFIX}{}", URL_SAFE_NO_PAD.encode(buf))
}
