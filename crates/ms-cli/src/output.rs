//! Report serialization.

use std::path::{Path, PathBuf};

use anyhow::Context;
use ms_core::report::Report;

/// Write `report` as pretty-printed JSON, creating parent directories.
///
/// Returns the absolute path written.
pub fn write_report(report: &Report, path: &Path) -> anyhow::Result<PathBuf> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(report).context("failed to serialize report")?;
    std::fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
    std::path::absolute(path).with_context(|| format!("failed to resolve {}", path.display()))
}
