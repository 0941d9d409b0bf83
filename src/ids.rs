//! Opaque record identifiers
//!
//! Documents and comments use 24-hex-digit ids: four bytes of big-endian
//! creation seconds followed by eight random bytes. Share tokens are built
//! on top of document ids.

use chrono::Utc;
use uuid::Uuid;

use crate::error::{AppError, Result};

/// Length of a rendered id in hex digits
pub const ID_LEN: usize = 24;

/// Generate a new 24-hex-digit id
pub fn generate_id() -> String {
    let secs = Utc::now().timestamp() as u32;
    let random = Uuid::new_v4();

    let mut bytes = [0u8; 12];
    bytes[..4].copy_from_slice(&secs.to_be_bytes());
    bytes[4..].copy_from_slice(&random.as_bytes()[..8]);

    hex::encode(bytes)
}

/// Random lowercase hex string with `bytes * 2` digits
pub fn random_hex(bytes: usize) -> String {
    let mut out = String::with_capacity(bytes * 2);
    while out.len() < bytes * 2 {
        out.push_str(&Uuid::new_v4().simple().to_string());
    }
    out.truncate(bytes * 2);
    out
}

/// Whether `candidate` has the id shape (exactly 24 hex digits)
pub fn is_valid_id(candidate: &str) -> bool {
    candidate.len() == ID_LEN && candidate.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Validate and normalize an id supplied by a caller
pub fn parse_id(candidate: &str, what: &str) -> Result<String> {
    let trimmed = candidate.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("{} is required", what)));
    }
    if !is_valid_id(trimmed) {
        return Err(AppError::Validation(format!("Invalid {} format", what)));
    }
    Ok(trimmed.to_ascii_lowercase())
}
