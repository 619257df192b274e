use crate::IndexError;
use recipedex_schema::{DEFAULT_NAME_PATTERN, SCHEMA_VERSION};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Largest manifest accepted before decoding, in bytes.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 100 * 1024;
pub const DEFAULT_MAX_DESCRIPTION_LENGTH: usize = 200;
pub const DEFAULT_EXTENSION: &str = "toml";
pub const DEFAULT_OUTPUT: &str = "_site/recipes.json";
pub const DEFAULT_DANGEROUS_SCHEMES: &[&str] = &["javascript:", "data:", "vbscript:"];

/// How manifests are laid out beneath a root directory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RootLayout {
    /// `<root>/<letter>/<name>.toml`
    #[default]
    Sharded,
    /// `<root>/<name>.toml`
    Flat,
}

impl fmt::Display for RootLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sharded => f.write_str("sharded"),
            Self::Flat => f.write_str("flat"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecipeRoot {
    pub path: PathBuf,
    #[serde(default)]
    pub layout: RootLayout,
}

impl RecipeRoot {
    pub fn sharded(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            layout: RootLayout::Sharded,
        }
    }

    pub fn flat(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            layout: RootLayout::Flat,
        }
    }
}

/// Immutable settings for one registry build.
///
/// Every threshold and pattern the pipeline checks against lives here, so a
/// test can shrink the size limit or swap the roots without touching any
/// process-wide state. All fields are optional in the TOML form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IndexConfig {
    #[serde(default = "default_output")]
    pub output: PathBuf,
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
    #[serde(default = "default_max_description_length")]
    pub max_description_length: usize,
    #[serde(default = "default_extension")]
    pub extension: String,
    #[serde(default = "default_name_pattern")]
    pub name_pattern: String,
    #[serde(default = "default_dangerous_schemes")]
    pub dangerous_schemes: Vec<String>,
    #[serde(default = "default_schema_version")]
    pub schema_version: String,
    // Kept last: arrays of tables must follow plain keys in TOML output.
    #[serde(default = "default_roots")]
    pub roots: Vec<RecipeRoot>,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            max_file_size: default_max_file_size(),
            max_description_length: default_max_description_length(),
            extension: default_extension(),
            name_pattern: default_name_pattern(),
            dangerous_schemes: default_dangerous_schemes(),
            schema_version: default_schema_version(),
            roots: default_roots(),
        }
    }
}

impl IndexConfig {
    /// Defaults with the given roots instead of the built-in pair.
    pub fn with_roots(roots: Vec<RecipeRoot>) -> Self {
        Self {
            roots,
            ..Self::default()
        }
    }

    pub fn from_toml_str(input: &str) -> Result<Self, IndexError> {
        let config: Self = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, IndexError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn save(&self, path: &Path) -> Result<(), IndexError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Reject settings that would make every manifest fail for reasons
    /// unrelated to its content.
    pub fn validate(&self) -> Result<(), IndexError> {
        if self.roots.is_empty() {
            return Err(IndexError::Config(
                "at least one recipe root is required".to_owned(),
            ));
        }
        let ext = self.extension.trim();
        if ext.is_empty() || ext.contains('.') || ext.contains('/') {
            return Err(IndexError::Config(format!(
                "extension must be a bare suffix like 'toml', got '{}'",
                self.extension
            )));
        }
        if self.schema_version.trim().is_empty() {
            return Err(IndexError::Config(
                "schema_version must not be empty".to_owned(),
            ));
        }
        if self.dangerous_schemes.iter().any(|s| s.trim().is_empty()) {
            return Err(IndexError::Config(
                "dangerous_schemes must not contain empty entries".to_owned(),
            ));
        }
        Ok(())
    }
}

fn default_output() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT)
}

fn default_max_file_size() -> u64 {
    DEFAULT_MAX_FILE_SIZE
}

fn default_max_description_length() -> usize {
    DEFAULT_MAX_DESCRIPTION_LENGTH
}

fn default_extension() -> String {
    DEFAULT_EXTENSION.to_owned()
}

fn default_name_pattern() -> String {
    DEFAULT_NAME_PATTERN.to_owned()
}

fn default_dangerous_schemes() -> Vec<String> {
    DEFAULT_DANGEROUS_SCHEMES
        .iter()
        .map(|s| (*s).to_owned())
        .collect()
}

fn default_schema_version() -> String {
    SCHEMA_VERSION.to_owned()
}

fn default_roots() -> Vec<RecipeRoot> {
    vec![RecipeRoot::sharded("recipes"), RecipeRoot::flat("embedded")]
}
