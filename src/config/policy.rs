//! Validation policy: which optional book fields are required and what absent ones default to.

use crate::error::ConfigError;
use std::str::FromStr;

pub const DEFAULT_AUTHOR: &str = "Unknown Author";
pub const DEFAULT_DESCRIPTION: &str = "No description available";
pub const DEFAULT_GENRE: &str = "Unknown Genre";

/// Rule for one non-title field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldRule {
    /// Must be present and non-empty.
    Required,
    /// Filled with this value when absent or empty.
    Default(String),
}

impl FieldRule {
    pub fn default_to(s: &str) -> Self {
        FieldRule::Default(s.to_string())
    }
}

/// Named presets for the policy, selected by `BOOKS_VALIDATION`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PolicyPreset {
    /// Only title is required; the rest get sentinels. Titles unique.
    Lenient,
    /// All four fields required. Titles may repeat.
    Strict,
}

impl FromStr for PolicyPreset {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "lenient" => Ok(PolicyPreset::Lenient),
            "strict" => Ok(PolicyPreset::Strict),
            _ => Err(ConfigError::Invalid {
                key: "BOOKS_VALIDATION",
                value: s.to_string(),
                reason: "expected lenient or strict",
            }),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationPolicy {
    pub author: FieldRule,
    pub description: FieldRule,
    pub genre: FieldRule,
    /// Reject a create or title change that would duplicate an existing title.
    pub unique_titles: bool,
}

impl ValidationPolicy {
    pub fn lenient() -> Self {
        ValidationPolicy {
            author: FieldRule::default_to(DEFAULT_AUTHOR),
            description: FieldRule::default_to(DEFAULT_DESCRIPTION),
            genre: FieldRule::default_to(DEFAULT_GENRE),
            unique_titles: true,
        }
    }

    pub fn strict() -> Self {
        ValidationPolicy {
            author: FieldRule::Required,
            description: FieldRule::Required,
            genre: FieldRule::Required,
            unique_titles: false,
        }
    }

    pub fn from_preset(preset: PolicyPreset) -> Self {
        match preset {
            PolicyPreset::Lenient => Self::lenient(),
            PolicyPreset::Strict => Self::strict(),
        }
    }

    pub fn with_unique_titles(mut self, unique: bool) -> Self {
        self.unique_titles = unique;
        self
    }
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self::lenient()
    }
}
