use super::{json_pretty, EXIT_SUCCESS};
use recipedex_core::IndexConfig;
use std::path::Path;

/// Write the default configuration to `path` as TOML.
pub fn run(path: &Path, force: bool, json: bool) -> Result<u8, String> {
    if path.exists() && !force {
        return Err(format!(
            "refusing to overwrite existing {} (pass --force)",
            path.display()
        ));
    }
    IndexConfig::default()
        .save(path)
        .map_err(|e| format!("failed to write {}: {e}", path.display()))?;

    if json {
        let payload = serde_json::json!({
            "status": "written",
            "path": path.display().to_string(),
        });
        println!("{}", json_pretty(&payload)?);
    } else {
        println!("wrote {}", path.display());
    }
    Ok(EXIT_SUCCESS)
}
