use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::formats::FORMATS;
use crate::validator::{validate_all, ValidationResult};

/// Format key to post text. Ordered by key so exports are stable.
pub type PostSet = BTreeMap<String, String>;

/// Character limit of a single post on X.
pub const POST_CHAR_LIMIT: usize = 280;
/// Posts up to this length are shown as a warning rather than over the limit.
pub const POST_CHAR_WARNING: usize = 350;

/// How a post's length compares to the X character limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LengthStatus {
    Compliant,
    Warning,
    OverLimit,
}

impl LengthStatus {
    pub fn of(content: &str) -> Self {
        let count = content.chars().count();
        if count <= POST_CHAR_LIMIT {
            LengthStatus::Compliant
        } else if count <= POST_CHAR_WARNING {
            LengthStatus::Warning
        } else {
            LengthStatus::OverLimit
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            LengthStatus::Compliant => "✓",
            LengthStatus::Warning => "⚠",
            LengthStatus::OverLimit => "✗",
        }
    }
}

/// Whether the raw input was a link or free text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    Url,
    Text,
}

impl InputKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputKind::Url => "url",
            InputKind::Text => "text",
        }
    }
}

/// Result of one full generation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Generation {
    pub thesis: String,
    pub posts: PostSet,
}

impl Generation {
    pub fn validations(&self) -> BTreeMap<String, ValidationResult> {
        validate_all(&self.posts)
    }

    /// Registry formats the model left out.
    pub fn missing_formats(&self) -> Vec<&'static str> {
        FORMATS
            .iter()
            .map(|f| f.key)
            .filter(|key| !self.posts.contains_key(*key))
            .collect()
    }
}
