use recipedex_schema::Violation;
use std::fs;
use std::path::Path;

/// Reject a manifest larger than `limit` bytes. Runs before the file is read.
pub fn check_size(path: &Path, limit: u64) -> Option<Violation> {
    match fs::metadata(path) {
        Ok(meta) if meta.len() > limit => Some(Violation::FileSize {
            size: meta.len(),
            limit,
        }),
        Ok(_) => None,
        Err(e) => Some(Violation::FileStat(e.to_string())),
    }
}
