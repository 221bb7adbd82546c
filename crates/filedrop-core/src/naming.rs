//! Storage name generation
//!
//! Stored files are named `<epoch-millis>-<random>-<original-name>`. The
//! timestamp prefix gives directory listings a best-effort chronological
//! order, the random token separates uploads landing in the same millisecond,
//! and the original name keeps the extension and human readability.

use chrono::Utc;
use rand::Rng;

/// Exclusive upper bound of the random token.
pub const RANDOM_TOKEN_SPACE: u32 = 10_000;

const MAX_ORIGINAL_LENGTH: usize = 200;

/// Produces collision-resistant storage names for uploaded files.
///
/// Uniqueness is probabilistic; callers that need a hard guarantee check the
/// generated name against storage and regenerate on a hit.
#[derive(Debug, Clone, Copy, Default)]
pub struct NameGenerator;

impl NameGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Generate a storage name from the uploaded file's original name.
    pub fn generate(&self, original_filename: &str) -> String {
        let millis = Utc::now().timestamp_millis();
        let token = rand::rng().random_range(0..RANDOM_TOKEN_SPACE);
        compose(millis, token, original_filename)
    }
}

/// Deterministic composition of a storage name from its parts.
pub fn compose(epoch_millis: i64, token: u32, original_filename: &str) -> String {
    format!(
        "{}-{}-{}",
        epoch_millis,
        token,
        sanitize_original(original_filename)
    )
}

/// Reduce a client-supplied filename to something safe to embed in a storage
/// name: path components are stripped, anything outside `[A-Za-z0-9._-]` is
/// replaced, and overlong names are truncated. Falls back to "file" when
/// nothing usable remains.
pub fn sanitize_original(filename: &str) -> String {
    let name_only = std::path::Path::new(filename)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("");

    let sanitized: String = name_only
        .chars()
        .take(MAX_ORIGINAL_LENGTH)
        .map(|c| {
            if c.is_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if sanitized.chars().all(|c| c == '.' || c == '_') {
        return "file".to_string();
    }

    sanitized
}
