//! Reads a manifest and hands back its `[metadata]` table.

use recipedex_schema::Violation;
use std::fs;
use std::path::Path;

/// Read and decode the manifest at `path`.
pub fn read_manifest(path: &Path) -> Result<toml::Table, Violation> {
    let text = fs::read_to_string(path).map_err(|e| Violation::Unreadable(e.to_string()))?;
    decode(&text)
}

pub fn decode(text: &str) -> Result<toml::Table, Violation> {
    text.parse::<toml::Table>()
        .map_err(|e| Violation::DecodeSyntax(describe(&e, text)))
}

/// Extract the `[metadata]` table from a decoded manifest.
pub fn metadata_section(manifest: &toml::Table) -> Result<&toml::Table, Violation> {
    match manifest.get("metadata") {
        None => Err(Violation::MissingSection),
        Some(toml::Value::Table(table)) => Ok(table),
        Some(other) => Err(Violation::SectionNotTable(other.type_str())),
    }
}

// Single-line rendering; the decoder's own Display spans several lines.
fn describe(err: &toml::de::Error, text: &str) -> String {
    let message = err.message().trim_end();
    match err.span() {
        Some(span) => {
            let before = text.get(..span.start).unwrap_or(text);
            let line = before.matches('\n').count() + 1;
            format!("{message} (line {line})")
        }
        None => message.to_owned(),
    }
}
