//! DTOs for the shorten and alias update endpoints.

use serde::Deserialize;
use validator::Validate;

use crate::utils::code_generator::ALIAS_PATTERN;

/// Request body for `POST /api/v1/urls`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ShortenUrlRequest {
    /// The URL to shorten. A missing field is reported as an invalid URL.
    #[serde(default)]
    #[validate(url(message = "Invalid URL."))]
    pub original_url: String,
}

/// Request body for `PUT /api/v1/urls/{id}`.
///
/// `rateLimit` may also be sent under the legacy key `reateLimit`. Omitting it
/// clears the record's quota.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AliasRequest {
    #[serde(default)]
    #[validate(
        length(min = 1, max = 64, message = "Alias must be 1-64 characters"),
        regex(
            path = "*ALIAS_PATTERN",
            message = "Alias can only contain letters, digits, hyphens and underscores"
        )
    )]
    pub alias: String,

    #[serde(default, alias = "reateLimit")]
    #[validate(range(min = 0, message = "Rate limit must be a non-negative integer"))]
    pub rate_limit: Option<i64>,
}
