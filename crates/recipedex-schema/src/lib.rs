//! Recipe records, registry snapshot, and validation error values for recipedex.
//!
//! This crate defines the schema layer: the validated `RecipeRecord`, the
//! serialized `RegistrySnapshot` written to `recipes.json`, the
//! `ValidationError` value collected by every pipeline stage, and the
//! `Violation` taxonomy that renders each error message.

pub mod record;
pub mod types;
pub mod violation;

pub use record::{sort_records, RecipeRecord, RegistrySnapshot, SCHEMA_VERSION};
pub use types::{NamePattern, RecipeName, DEFAULT_NAME_PATTERN};
pub use violation::{ValidationError, Violation};
