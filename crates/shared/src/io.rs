use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::error::{AmplifyError, Result};
use crate::models::PostSet;

/// Directory used when no export path is given
pub fn get_default_export_dir() -> Result<PathBuf> {
    let base = dirs::download_dir()
        .or_else(dirs::data_local_dir)
        .ok_or_else(|| AmplifyError::Export("Could not determine a download directory".to_string()))?;

    Ok(base.join("x-amplify"))
}

pub fn default_export_filename(now: DateTime<Local>) -> String {
    format!("x_amplify_posts_{}.json", now.format("%Y%m%d-%H%M%S"))
}

/// Pretty-printed JSON with keys in stable order
pub fn posts_to_json(posts: &PostSet) -> Result<String> {
    serde_json::to_string_pretty(posts)
        .map_err(|e| AmplifyError::Export(format!("Failed to serialize posts: {}", e)))
}

/// Write the posts to `path`, creating parent directories as needed
pub fn export_posts(posts: &PostSet, path: &Path) -> Result<PathBuf> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            AmplifyError::Export(format!("Failed to create {}: {}", parent.display(), e))
        })?;
    }

    let json = posts_to_json(posts)?;
    fs::write(path, json)
        .map_err(|e| AmplifyError::Export(format!("Failed to write {}: {}", path.display(), e)))?;

    Ok(path.to_path_buf())
}

/// Load posts from a previous export
pub fn load_posts(path: &Path) -> Result<PostSet> {
    if !path.exists() {
        return Err(AmplifyError::Export(format!(
            "Export file not found: {}",
            path.display()
        )));
    }

    let content = fs::read_to_string(path)
        .map_err(|e| AmplifyError::Export(format!("Failed to read {}: {}", path.display(), e)))?;

    serde_json::from_str(&content).map_err(|e| {
        AmplifyError::Export(format!(
            "Failed to parse {}. The file may not be an x-amplify export: {}",
            path.display(),
            e
        ))
    })
}
