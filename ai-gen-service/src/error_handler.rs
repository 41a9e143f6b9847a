//! Unified error handling for `ai-gen-service`.
//!
//! This module exposes a single top-level error type [`GenAiError`] for the
//! whole library, and groups domain-specific errors in nested enums
//! ([`ConfigError`], [`ProviderError`]). Small helpers for reading/validating
//! environment variables are provided and return the unified [`Result<T>`]
//! alias.
//!
//! All messages include the prefix `[AI Gen Service]` to simplify attribution
//! in logs.

use reqwest::StatusCode;
use std::time::Duration;
use thiserror::Error;

/* ------------------------------------------------------------------------- */
/* Public result alias                                                       */
/* ------------------------------------------------------------------------- */

/// Unified result alias for the entire crate.
pub type Result<T> = std::result::Result<T, GenAiError>;

/* ------------------------------------------------------------------------- */
/* Top-level error                                                           */
/* ------------------------------------------------------------------------- */

/// Top-level error for the `ai-gen-service` crate.
///
/// Variants wrap domain-specific enums (config/provider) and a few common
/// cases (HTTP transport, timeouts). Prefer adding new sub-enums for distinct
/// domains instead of growing this type indefinitely.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum GenAiError {
    /// Configuration/validation errors (startup/readiness).
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Failures reported by or attributed to the Google AI backend.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// Underlying HTTP transport error (e.g., `reqwest::Error`).
    #[error("[AI Gen Service] transport error: {0}")]
    HttpTransport(#[from] reqwest::Error),

    /// Operation exceeded the configured timeout.
    #[error("[AI Gen Service] operation timed out after {0:?}")]
    Timeout(Duration),
}

/* ------------------------------------------------------------------------- */
/* Config errors                                                             */
/* ------------------------------------------------------------------------- */

/// Error enum for environment/config-driven setup.
///
/// Keep this focused: only errors that realistically happen at config
/// load/validation time.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A number failed to parse (like token limits or timeouts).
    #[error("[AI Gen Service] invalid number in {var}: {reason}")]
    InvalidNumber {
        /// Variable name (e.g., `GEN_MAX_OUTPUT_TOKENS`).
        var: &'static str,
        /// Human-readable reason (e.g., `expected u32`).
        reason: &'static str,
    },

    /// Value had the wrong format (e.g., invalid URL).
    #[error("[AI Gen Service] invalid format in {var}: {reason}")]
    InvalidFormat {
        /// Variable name (e.g., `GOOGLE_AI_ENDPOINT`).
        var: &'static str,
        /// Explanation (e.g., `must start with http:// or https://`).
        reason: &'static str,
    },

    /// A numeric field was outside of the allowed range.
    #[error("[AI Gen Service] {field} is out of range: {detail}")]
    OutOfRange {
        /// Field name (e.g., `temperature`).
        field: &'static str,
        /// Description of the expected range (e.g., `expected 0.0..=2.0`).
        detail: &'static str,
    },
}

/* ------------------------------------------------------------------------- */
/* Provider errors                                                           */
/* ------------------------------------------------------------------------- */

/// Error enum for Google AI call failures.
///
/// Non-2xx statuses are classified here from the HTTP status and the Google
/// error envelope so that callers can react without string matching:
/// quota exhaustion, rejected keys, and upstream outages each get their own
/// variant.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ProviderError {
    /// No key was supplied with the call and none is configured.
    #[error("[AI Gen Service] no API key: pass one with the request or set GOOGLE_AI_API_KEY")]
    MissingApiKey,

    /// The backend rejected the API key (expired, malformed, or unauthorized).
    #[error("[AI Gen Service] Google AI rejected the API key: {0}")]
    InvalidApiKey(String),

    /// Quota or rate limit exceeded (HTTP 429 / `RESOURCE_EXHAUSTED`).
    #[error("[AI Gen Service] Google AI rate limit exceeded{}", .retry_after_secs.map(|s| format!("; retry after {s}s")).unwrap_or_default())]
    RateLimited {
        /// Seconds from the `Retry-After` header, if the backend sent one.
        retry_after_secs: Option<u64>,
    },

    /// Upstream 5xx.
    #[error("[AI Gen Service] Google AI server error HTTP {status}: {snippet}")]
    Server {
        /// Numeric HTTP status code.
        status: StatusCode,
        /// Short snippet of the response body (trimmed).
        snippet: String,
    },

    /// Any other non-successful HTTP status.
    #[error("[AI Gen Service] HTTP {status} from {url}: {snippet}")]
    HttpStatus {
        /// Numeric HTTP status code.
        status: StatusCode,
        /// Request URL.
        url: String,
        /// Short snippet of the response body (trimmed).
        snippet: String,
    },

    /// Response payload could not be decoded as expected.
    #[error("[AI Gen Service] decode error: {0}")]
    Decode(String),

    /// 2xx response carrying no usable text (e.g., safety-blocked).
    #[error("[AI Gen Service] response contained no usable candidates")]
    EmptyCandidates,
}

/* ------------------------------------------------------------------------- */
/* Snippet helper                                                            */
/* ------------------------------------------------------------------------- */

/// Maximum length (bytes) of body snippets embedded in errors and logs.
const MAX_SNIPPET: usize = 240;

/// Trims a response body down to a short snippet for errors and logs.
///
/// Cuts at a UTF-8 character boundary so multi-byte payloads never panic.
pub fn make_snippet(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.len() <= MAX_SNIPPET {
        return trimmed.to_string();
    }
    let mut end = MAX_SNIPPET;
    while !trimmed.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &trimmed[..end])
}

/* ------------------------------------------------------------------------- */
/* Env helpers (return unified `Result<T>`)                                  */
/* ------------------------------------------------------------------------- */

/// Fetches an environment variable, falling back to `default` when the
/// variable is absent or empty.
pub fn env_or(name: &str, default: &str) -> String {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => v,
        _ => default.to_string(),
    }
}

/// Parses an optional `u32` from env (`Ok(None)` if unset/empty).
///
/// # Errors
/// Returns [`GenAiError::Config`] with [`ConfigError::InvalidNumber`] if the
/// variable is set but not a valid `u32`.
pub fn env_opt_u32(name: &'static str) -> Result<Option<u32>> {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => v.trim().parse::<u32>().map(Some).map_err(|_| {
            GenAiError::from(ConfigError::InvalidNumber {
                var: name,
                reason: "expected u32",
            })
        }),
        _ => Ok(None),
    }
}

/// Parses an optional `u64` from env (`Ok(None)` if unset/empty).
///
/// # Errors
/// Returns [`GenAiError::Config`] with [`ConfigError::InvalidNumber`] if the
/// variable is set but not a valid `u64`.
pub fn env_opt_u64(name: &'static str) -> Result<Option<u64>> {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => v.trim().parse::<u64>().map(Some).map_err(|_| {
            GenAiError::from(ConfigError::InvalidNumber {
                var: name,
                reason: "expected u64",
            })
        }),
        _ => Ok(None),
    }
}

/// Parses an optional `f32` from env (`Ok(None)` if unset/empty).
///
/// # Errors
/// Returns [`GenAiError::Config`] with [`ConfigError::InvalidNumber`] if the
/// variable is set but not a valid `f32`.
pub fn env_opt_f32(name: &'static str) -> Result<Option<f32>> {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => v.trim().parse::<f32>().map(Some).map_err(|_| {
            GenAiError::from(ConfigError::InvalidNumber {
                var: name,
                reason: "expected f32",
            })
        }),
        _ => Ok(None),
    }
}

/* ------------------------------------------------------------------------- */
/* Validation helpers (return unified `Result<T>`)                           */
/* ------------------------------------------------------------------------- */

/// Validates that an HTTP endpoint starts with `http://` or `https://`.
///
/// # Errors
/// Returns [`GenAiError::Config`] with [`ConfigError::InvalidFormat`] when
/// the string does not start with a valid HTTP scheme.
pub fn validate_http_endpoint(var: &'static str, value: &str) -> Result<()> {
    if value.starts_with("http://") || value.starts_with("https://") {
        Ok(())
    } else {
        Err(ConfigError::InvalidFormat {
            var,
            reason: "must start with http:// or https://",
        }
        .into())
    }
}

/// Validates that a floating-point value lies within an inclusive range.
///
/// Useful for parameters like `temperature` (e.g., `0.0..=2.0`) or `top_p`
/// (`0.0..=1.0`).
///
/// # Errors
/// Returns [`GenAiError::Config`] with [`ConfigError::OutOfRange`] if `value`
/// is outside `[min, max]`.
pub fn validate_range_f32(field: &'static str, value: f32, min: f32, max: f32) -> Result<()> {
    if value.is_finite() && value >= min && value <= max {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            detail: "expected value in inclusive range",
        }
        .into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_bodies_pass_through_trimmed() {
        assert_eq!(make_snippet("  hello \n"), "hello");
    }

    #[test]
    fn long_bodies_are_cut_at_a_char_boundary() {
        // One ASCII byte then three-byte characters: byte 240 falls mid-character.
        let body = format!("a{}", "€".repeat(90));
        let snippet = make_snippet(&body);
        assert!(snippet.ends_with("..."));
        assert!(snippet.len() <= MAX_SNIPPET + 3);
        assert!(snippet.starts_with('a'));
    }

    #[test]
    fn endpoint_validation_requires_http_scheme() {
        assert!(validate_http_endpoint("X", "https://example.com").is_ok());
        assert!(validate_http_endpoint("X", "example.com").is_err());
    }

    #[test]
    fn range_validation_rejects_non_finite() {
        assert!(validate_range_f32("temperature", 0.2, 0.0, 2.0).is_ok());
        assert!(validate_range_f32("temperature", f32::NAN, 0.0, 2.0).is_err());
        assert!(validate_range_f32("top_p", 1.5, 0.0, 1.0).is_err());
    }
}
