pub mod check;
pub mod completions;
pub mod generate;
pub mod init_config;
pub mod man_pages;

use clap::Args;
use recipedex_core::{publish, BuildReport, IndexConfig, Outcome, RecipeRoot, RunSummary};
use std::io;
use std::path::{Path, PathBuf};

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_VALIDATION_ERROR: u8 = 2;

/// Config file picked up from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "recipedex.toml";

/// Flags shared by `generate` and `check` that override the loaded config.
#[derive(Debug, Clone, Default, Args)]
pub struct RootArgs {
    /// Sharded recipe root (`<dir>/<letter>/<name>.toml`). Repeatable.
    #[arg(long = "root", value_name = "DIR")]
    pub roots: Vec<PathBuf>,
    /// Flat recipe root (`<dir>/<name>.toml`). Repeatable.
    #[arg(long = "flat-root", value_name = "DIR")]
    pub flat_roots: Vec<PathBuf>,
    /// Maximum manifest size in bytes.
    #[arg(long, value_name = "BYTES")]
    pub max_file_size: Option<u64>,
}

pub fn json_pretty(value: &impl serde::Serialize) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| format!("JSON serialization failed: {e}"))
}

/// Load the config (explicit file, or defaults) and apply flag overrides.
///
/// Any `--root`/`--flat-root` flag replaces the configured roots entirely.
pub fn resolve_config(
    config_path: Option<&Path>,
    args: &RootArgs,
    output: Option<&Path>,
) -> Result<IndexConfig, String> {
    let mut config = match config_path {
        Some(path) => IndexConfig::load(path)
            .map_err(|e| format!("failed to load config {}: {e}", path.display()))?,
        None => IndexConfig::default(),
    };

    if !args.roots.is_empty() || !args.flat_roots.is_empty() {
        config.roots = args
            .roots
            .iter()
            .map(RecipeRoot::sharded)
            .chain(args.flat_roots.iter().map(RecipeRoot::flat))
            .collect();
    }
    if let Some(limit) = args.max_file_size {
        config.max_file_size = limit;
    }
    if let Some(path) = output {
        config.output = path.to_path_buf();
    }
    config.validate().map_err(|e| e.to_string())?;
    Ok(config)
}

/// Hand `report` to the publisher and print the `--json` summary if asked.
///
/// Human-readable error listings go to stderr; with `--json` the summary on
/// stdout carries them instead.
pub fn finish(
    report: &BuildReport,
    output: Option<&Path>,
    json: bool,
) -> Result<(Outcome, u8), String> {
    if !json {
        println!("Found {} recipe files", report.files_checked);
    }
    let outcome = if json {
        publish(report, output, &mut io::sink())
    } else {
        publish(report, output, &mut io::stderr().lock())
    }
    .map_err(|e| e.to_string())?;

    if json {
        println!("{}", json_pretty(&RunSummary::new(report, &outcome))?);
    }
    let code = if outcome.is_success() {
        EXIT_SUCCESS
    } else {
        EXIT_VALIDATION_ERROR
    };
    Ok((outcome, code))
}

pub fn colorize_count(n: usize) -> String {
    console::Style::new().bold().apply_to(n).to_string()
}
