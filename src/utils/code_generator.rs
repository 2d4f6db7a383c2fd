//! Short codes and the alias grammar they share.

use std::sync::LazyLock;

use crate::error::AppError;
use base64::Engine as _;
use regex::Regex;
use serde_json::json;

/// Random bytes per code; 9 bytes encode to exactly 12 base64 characters.
const CODE_LENGTH_BYTES: usize = 9;

/// Maximum alias length in characters.
pub const MAX_ALIAS_LENGTH: usize = 64;

/// Characters allowed in an alias: the URL-safe base64 alphabet.
pub static ALIAS_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("alias pattern is valid"));

/// Returns a fresh 12-character code from the OS random source.
///
/// Codes are URL-safe base64 without padding, so every code also passes
/// [`validate_alias`]. Uniqueness is checked by the caller against storage.
///
/// # Panics
///
/// Panics if the OS random source is unavailable.
pub fn generate_code() -> String {
    let mut bytes = [0u8; CODE_LENGTH_BYTES];
    getrandom::fill(&mut bytes).expect("OS random source unavailable");
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

/// Validates a user-chosen alias.
///
/// # Rules
///
/// - Length: 1-64 characters
/// - Allowed characters: ASCII letters, digits, `-` and `_`
///
/// The allowed set matches the generated code alphabet, so an alias is always a
/// valid path segment.
///
/// # Errors
///
/// Returns [`AppError::Validation`] if any rule is violated.
pub fn validate_alias(alias: &str) -> Result<(), AppError> {
    if alias.is_empty() || alias.len() > MAX_ALIAS_LENGTH {
        return Err(AppError::bad_request(
            format!("Alias must be 1-{MAX_ALIAS_LENGTH} characters"),
            json!({ "provided_length": alias.len() }),
        ));
    }

    if !ALIAS_PATTERN.is_match(alias) {
        return Err(AppError::bad_request(
            "Alias can only contain letters, digits, hyphens and underscores",
            json!({ "alias": alias }),
        ));
    }

    Ok(())
}
