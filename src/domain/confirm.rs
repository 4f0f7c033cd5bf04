//! Client-side gates for destructive actions.
//!
//! Course removal requires retyping the course title and supplying the
//! shared removal secret; lesson removal requires retyping the lesson
//! title. All checks run before any store call is issued, and each
//! rejection carries a specific reason.

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfirmError {
    #[error("confirmation name does not match the stored title")]
    NameMismatch,
    #[error("removal credential is invalid")]
    InvalidCredential,
    #[error("removal target no longer exists")]
    NotFound,
}

/// Exact (trimmed, case-sensitive) retype-title check.
pub fn confirm_lesson_removal(expected_title: &str, typed_title: &str) -> Result<(), ConfirmError> {
    if expected_title.trim() != typed_title.trim() {
        return Err(ConfirmError::NameMismatch);
    }
    Ok(())
}

/// Two-factor confirmation for course removal: retyped title plus the
/// shared removal secret, compared in constant time against its
/// configured SHA-256 hash.
pub fn confirm_course_removal(
    expected_title: &str,
    typed_title: &str,
    secret_hash: &[u8],
    typed_secret: &str,
) -> Result<(), ConfirmError> {
    confirm_lesson_removal(expected_title, typed_title)?;

    let hashed_input = Sha256::digest(typed_secret.as_bytes());
    if secret_hash.len() != hashed_input.len()
        || secret_hash.ct_eq(hashed_input.as_slice()).unwrap_u8() == 0
    {
        return Err(ConfirmError::InvalidCredential);
    }

    Ok(())
}

/// Hash a removal secret the way the configuration stores it.
pub fn hash_removal_secret(secret: &str) -> Vec<u8> {
    Sha256::digest(secret.as_bytes()).to_vec()
}
