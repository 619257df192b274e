use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A single diagnostic collected while building the registry.
///
/// `subject` is either the manifest path or a synthetic `recipe '<name>'`
/// label for cross-reference failures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    pub subject: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(subject: impl Into<String>, violation: &Violation) -> Self {
        Self {
            subject: subject.into(),
            message: violation.to_string(),
        }
    }

    /// Subject label used for errors that belong to a recipe rather than a file.
    pub fn recipe_subject(name: &str) -> String {
        format!("recipe '{name}'")
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.subject, self.message)
    }
}

/// Every way a manifest or the assembled registry can be rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    #[error("path does not match pattern {expected}")]
    PathShape { expected: String },
    #[error("path traversal detected")]
    PathTraversal,
    #[error("could not resolve path: {0}")]
    PathUnresolvable(String),

    #[error("file size {size} bytes exceeds limit of {limit} bytes")]
    FileSize { size: u64, limit: u64 },
    #[error("could not check file size: {0}")]
    FileStat(String),

    #[error("could not read file: {0}")]
    Unreadable(String),
    #[error("invalid TOML: {0}")]
    DecodeSyntax(String),
    #[error("missing [metadata] section")]
    MissingSection,
    #[error("[metadata] must be a table (got {0})")]
    SectionNotTable(&'static str),

    #[error("missing required field: {0}")]
    MissingField(&'static str),
    #[error("field '{field}' must be a string (got {found})")]
    FieldType {
        field: &'static str,
        found: &'static str,
    },
    #[error("name '{name}' does not match filename '{expected}'")]
    NameMismatch { name: String, expected: String },
    #[error("name '{name}' contains invalid characters ({rule})")]
    NameCharset { name: String, rule: String },
    #[error("description length {length} exceeds limit of {limit}")]
    DescriptionTooLong { length: usize, limit: usize },
    #[error("description contains control characters")]
    DescriptionControlChars,
    #[error("homepage must start with https:// (got: {0}...)")]
    HomepageScheme(String),
    #[error("homepage contains dangerous scheme: {0}")]
    DangerousScheme(String),

    #[error("{field} must be a list (got {found})")]
    DependencyNotList {
        field: &'static str,
        found: &'static str,
    },
    #[error("{field}[{index}] must be a string (got {found})")]
    DependencyNotString {
        field: &'static str,
        index: usize,
        found: &'static str,
    },
    #[error("{field}[{index}] '{entry}' contains invalid characters ({rule})")]
    DependencyCharset {
        field: &'static str,
        index: usize,
        entry: String,
        rule: String,
    },

    #[error("satisfies must be a table (got {0})")]
    SatisfiesNotTable(&'static str),
    #[error("satisfies.{ecosystem} must be a list (got {found})")]
    SatisfiesNotList {
        ecosystem: String,
        found: &'static str,
    },
    #[error("satisfies.{ecosystem}[{index}] must be a string (got {found})")]
    SatisfiesNotString {
        ecosystem: String,
        index: usize,
        found: &'static str,
    },
    #[error("satisfies.{ecosystem}[{index}] must not be empty")]
    SatisfiesEmpty { ecosystem: String, index: usize },

    #[error("duplicate recipe name: also defined by {0}")]
    DuplicateRecipe(String),
    #[error("{field} references unknown recipe '{dependency}'")]
    MissingDependency {
        field: &'static str,
        dependency: String,
    },
    #[error(
        "duplicate satisfies entry: '{alias}' is already claimed by recipe '{owner}' (in ecosystem '{ecosystem}')"
    )]
    DuplicateSatisfiesClaim {
        alias: String,
        owner: String,
        ecosystem: String,
    },
    #[error("satisfies entry '{0}' conflicts with existing recipe canonical name '{0}'")]
    CanonicalNameCollision(String),
}
