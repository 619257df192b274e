//! Validation and assembly pipeline for the recipedex registry.
//!
//! This crate discovers recipe manifests under the configured roots, runs the
//! per-file guards (path shape, traversal, size), decodes each manifest,
//! validates its `[metadata]` table, cross-checks the accepted records against
//! each other, and publishes the sorted `RegistrySnapshot` as `recipes.json`.
//! Everything is driven by an immutable [`IndexConfig`] handed to
//! [`RegistryBuilder`].

pub mod assemble;
pub mod config;
pub mod decode;
pub mod discovery;
pub mod metadata;
pub mod path_guard;
pub mod pipeline;
pub mod report;
pub mod size_guard;

pub use assemble::{assemble, cross_check, AcceptedRecipe};
pub use config::{IndexConfig, RecipeRoot, RootLayout};
pub use discovery::{discover, RecipeFile};
pub use metadata::{validate_metadata, MetadataRules};
pub use pipeline::{BuildReport, RegistryBuilder};
pub use report::{publish, write_errors, write_snapshot, Outcome, RunSummary};

use std::path::PathBuf;
use thiserror::Error;

/// Failures that abort a run outright, as opposed to the per-manifest
/// `ValidationError`s that are collected and reported together.
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to read recipe root {path}: {source}")]
    Root {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    ParseConfig(#[from] toml::de::Error),
    #[error("failed to serialize config: {0}")]
    SerializeConfig(#[from] toml::ser::Error),
    #[error("invalid name pattern: {0}")]
    Pattern(#[from] regex::Error),
    #[error("invalid config: {0}")]
    Config(String),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}
