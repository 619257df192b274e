use crate::types::RecipeName;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Version of the `recipes.json` document layout.
pub const SCHEMA_VERSION: &str = "1.0.0";

/// A validated recipe, built from exactly one manifest.
///
/// Records are never mutated after validation; a manifest either produces a
/// complete record or none at all.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecipeRecord {
    pub name: RecipeName,
    pub description: String,
    pub homepage: String,
    #[serde(default)]
    pub dependencies: Vec<RecipeName>,
    #[serde(default)]
    pub runtime_dependencies: Vec<RecipeName>,
    /// Ecosystem tag -> aliases this recipe stands in for. Checked during
    /// assembly but not published in the index.
    #[serde(skip)]
    pub satisfies: BTreeMap<String, Vec<String>>,
}

impl RecipeRecord {
    /// Dependency edges paired with the manifest field they came from.
    pub fn dependency_edges(&self) -> impl Iterator<Item = (&'static str, &RecipeName)> {
        self.dependencies
            .iter()
            .map(|d| ("dependencies", d))
            .chain(
                self.runtime_dependencies
                    .iter()
                    .map(|d| ("runtime_dependencies", d)),
            )
    }
}

/// The document written to `recipes.json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RegistrySnapshot {
    pub schema_version: String,
    pub generated_at: String,
    pub recipes: Vec<RecipeRecord>,
}

impl RegistrySnapshot {
    pub fn new(
        schema_version: impl Into<String>,
        generated_at: DateTime<Utc>,
        mut recipes: Vec<RecipeRecord>,
    ) -> Self {
        sort_records(&mut recipes);
        Self {
            schema_version: schema_version.into(),
            generated_at: generated_at.to_rfc3339_opts(SecondsFormat::Secs, false),
            recipes,
        }
    }

    /// Pretty JSON with two-space indentation and a single trailing newline.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        let mut out = serde_json::to_string_pretty(self)?;
        out.push('\n');
        Ok(out)
    }
}

/// Order records by case-insensitive name, falling back to the exact name.
pub fn sort_records(records: &mut [RecipeRecord]) {
    records.sort_by(|a, b| {
        a.name
            .as_str()
            .to_lowercase()
            .cmp(&b.name.as_str().to_lowercase())
            .then_with(|| a.name.cmp(&b.name))
    });
}
