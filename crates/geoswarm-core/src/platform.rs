//! The closed set of content platforms and the mapping from free-text model
//! output onto it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The strategy stage names platforms in natural language ("Blog Agent",
/// "twitter"). An identifier that cannot be mapped onto the closed set is a
/// data-contract violation and must be surfaced, never silently skipped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown platform identifier: '{0}'")]
pub struct UnknownPlatform(pub String);

/// A platform with a content-generation profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Blog,
    Twitter,
    Linkedin,
}

impl Platform {
    pub const ALL: [Platform; 3] = [Platform::Blog, Platform::Twitter, Platform::Linkedin];

    /// Normalize a free-text platform identifier from model output: trim,
    /// lowercase, strip a trailing `agent` suffix ("Blog Agent" → blog).
    ///
    /// # Errors
    ///
    /// Returns [`UnknownPlatform`] if the normalized key is not in the closed
    /// set.
    pub fn parse(raw: &str) -> Result<Self, UnknownPlatform> {
        let mut key = raw.trim().to_lowercase();
        if let Some(stripped) = key.strip_suffix("agent") {
            key = stripped.trim_end().to_string();
        }
        match key.as_str() {
            "blog" => Ok(Self::Blog),
            "twitter" => Ok(Self::Twitter),
            "linkedin" => Ok(Self::Linkedin),
            _ => Err(UnknownPlatform(raw.to_string())),
        }
    }

    /// Canonical lowercase key: activity actor id and `platform` column value.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::Blog => "blog",
            Self::Twitter => "twitter",
            Self::Linkedin => "linkedin",
        }
    }

    /// Content-type label recorded on generated artifacts.
    #[must_use]
    pub fn content_type(self) -> &'static str {
        match self {
            Self::Blog => "article",
            Self::Twitter => "thread",
            Self::Linkedin => "post",
        }
    }

    /// Policy constant: estimated audience reach per generated artifact.
    /// These are fixed product numbers, not computed values.
    #[must_use]
    pub fn estimated_reach(self) -> i32 {
        match self {
            Self::Blog => 1000,
            Self::Twitter => 500,
            Self::Linkedin => 800,
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}
