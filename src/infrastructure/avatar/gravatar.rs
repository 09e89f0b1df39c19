//! Gravatar URL construction

use sha2::{Digest, Sha256};
use std::fmt::Debug;

const GRAVATAR_BASE: &str = "//www.gravatar.com/avatar/";

/// Options applied to every generated avatar URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvatarOptions {
    /// Image size in pixels
    pub size: u32,
    /// Maximum content rating (g, pg, r, x)
    pub rating: String,
    /// Fallback image style when the address has no avatar
    pub default_style: String,
}

impl Default for AvatarOptions {
    fn default() -> Self {
        Self {
            size: 200,
            rating: "pg".to_string(),
            default_style: "mm".to_string(),
        }
    }
}

/// Derives an avatar URL from an email address
///
/// Must be a pure function of the address: no I/O, same input, same URL.
pub trait AvatarUrlProvider: Send + Sync + Debug {
    fn url_for(&self, email: &str) -> String;
}

/// Builds protocol-relative Gravatar URLs
#[derive(Debug, Clone, Default)]
pub struct GravatarUrlBuilder {
    options: AvatarOptions,
}

impl GravatarUrlBuilder {
    pub fn new(options: AvatarOptions) -> Self {
        Self { options }
    }
}

impl AvatarUrlProvider for GravatarUrlBuilder {
    fn url_for(&self, email: &str) -> String {
        format!(
            "{}{}?s={}&r={}&d={}",
            GRAVATAR_BASE,
            email_hash(email),
            self.options.size,
            self.options.rating,
            self.options.default_style
        )
    }
}

/// Hex SHA-256 of the trimmed, lowercased address
fn email_hash(email: &str) -> String {
    let normalized = email.trim().to_lowercase();
    hex::encode(Sha256::digest(normalized.as_bytes()))
}
