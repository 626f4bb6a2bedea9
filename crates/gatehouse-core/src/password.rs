//! Password hashing and verification.
//!
//! Hashes are bcrypt with a configurable cost. bcrypt is CPU bound, so async
//! callers should prefer [`spawn_hash_password`] and [`spawn_verify_password`],
//! which run on tokio's blocking pool instead of stalling a worker thread.

use anyhow::anyhow;
use bcrypt::{hash, verify};

use crate::errors::AppError;

pub fn hash_password(password: &str, cost: u32) -> Result<String, AppError> {
    hash(password, cost).map_err(|e| AppError::internal(anyhow!("Failed to hash password: {e}")))
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    verify(password, hash)
        .map_err(|e| AppError::internal(anyhow!("Failed to verify password: {e}")))
}

pub async fn spawn_hash_password(password: String, cost: u32) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || hash_password(&password, cost))
        .await
        .map_err(|e| AppError::internal(anyhow!("Password hashing task failed: {e}")))?
}

pub async fn spawn_verify_password(password: String, hash: String) -> Result<bool, AppError> {
    tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|e| AppError::internal(anyhow!("Password verification task failed: {e}")))?
}
