//! Argon2id password hashing with an optional server-side pepper

use argon2::{
    password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString},
    Argon2,
};
use rand_core::OsRng;

use crate::core::config::PasswordConfig;
use crate::core::error::{AppError, Result};

#[derive(Clone, Default)]
pub struct PasswordHasher {
    pepper: Option<String>,
}

impl PasswordHasher {
    pub fn new(config: &PasswordConfig) -> Self {
        Self {
            pepper: config.pepper.clone(),
        }
    }

    fn peppered(&self, password: &str) -> String {
        match &self.pepper {
            Some(pepper) => format!("{}{}", password, pepper),
            None => password.to_string(),
        }
    }

    /// PHC-formatted hash with a fresh random salt
    pub fn hash(&self, password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(self.peppered(password).as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))
    }

    /// False on mismatch and on hashes that cannot be parsed
    pub fn verify(&self, password: &str, hash: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(hash) else {
            tracing::warn!("Stored password hash is malformed");
            return false;
        };

        Argon2::default()
            .verify_password(self.peppered(password).as_bytes(), &parsed)
            .is_ok()
    }

    /// `hash` on the blocking pool, keeping Argon2 off the async workers
    pub async fn hash_blocking(&self, password: &str) -> Result<String> {
        let hasher = self.clone();
        let password = password.to_string();
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AppError::Internal(format!("Password hashing task failed: {}", e)))?
    }

    /// `verify` on the blocking pool
    pub async fn verify_blocking(&self, password: &str, hash: &str) -> Result<bool> {
        let hasher = self.clone();
        let password = password.to_string();
        let hash = hash.to_string();
        tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|e| AppError::Internal(format!("Password verification task failed: {}", e)))
    }
}
