//! Newtype wrappers for recipe identifiers and the compiled name pattern.
//!
//! Names serialize/deserialize as plain strings so the index stays a flat JSON document.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Pattern every recipe name and dependency entry must match.
pub const DEFAULT_NAME_PATTERN: &str = "^[a-z0-9-]+$";

/// Canonical recipe name, also the stem of the manifest file that defines it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecipeName(String);

impl RecipeName {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecipeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RecipeName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<&str> for RecipeName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Compiled form of the recipe name pattern.
#[derive(Debug, Clone)]
pub struct NamePattern {
    regex: Regex,
}

impl NamePattern {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            regex: Regex::new(pattern)?,
        })
    }

    #[inline]
    pub fn is_match(&self, candidate: &str) -> bool {
        self.regex.is_match(candidate)
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// Human-readable rule quoted in charset errors.
    pub fn describe(&self) -> String {
        if self.as_str() == DEFAULT_NAME_PATTERN {
            "must be lowercase alphanumeric and hyphens".to_owned()
        } else {
            format!("must match {}", self.as_str())
        }
    }
}

impl Default for NamePattern {
    fn default() -> Self {
        Self {
            regex: Regex::new(DEFAULT_NAME_PATTERN).expect("default name pattern is valid"),
        }
    }
}
