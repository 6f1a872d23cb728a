use colored::*;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use crate::{
    error::{OrganizerError, Result},
    models::FileRecord,
    move_log::LOG_DIR_NAME,
};

pub fn bytes_to_mb(bytes: u64) -> f64 {
    bytes as f64 / (1024.0 * 1024.0)
}

/// Expands `~`, makes the path absolute and checks it is an existing directory.
pub fn resolve_root(path: &str) -> Result<PathBuf> {
    let expanded = match path.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => dirs::home_dir()
            .map(|home| home.join(rest.trim_start_matches('/')))
            .unwrap_or_else(|| PathBuf::from(path)),
        _ => PathBuf::from(path),
    };

    let absolute = if expanded.is_absolute() {
        expanded
    } else {
        env::current_dir()
            .map_err(|e| OrganizerError::Config(format!("Cannot read current directory: {}", e)))?
            .join(expanded)
    };

    if !absolute.exists() {
        return Err(OrganizerError::PathNotFound(absolute));
    }
    if !absolute.is_dir() {
        return Err(OrganizerError::NotADirectory(absolute));
    }

    Ok(fs::canonicalize(&absolute).unwrap_or(absolute))
}

/// Lowercase extension with its leading dot.
///
/// `.tar.gz` is kept whole, and a dot-file without another dot (`.DS_Store`)
/// is its own extension.
pub fn extension_of(file_name: &str) -> String {
    let lower = file_name.to_lowercase();
    if lower.ends_with(".tar.gz") && lower.len() > ".tar.gz".len() {
        return ".tar.gz".to_string();
    }
    match lower.rfind('.') {
        Some(0) => lower,
        Some(idx) if idx + 1 < lower.len() => lower[idx..].to_string(),
        _ => String::new(),
    }
}

fn is_log_dir(entry: &DirEntry, root: &Path) -> bool {
    entry.file_type().is_dir()
        && entry.depth() == 1
        && entry.path().parent() == Some(root)
        && entry.file_name() == LOG_DIR_NAME
}

/// Lists every regular file under `root`, recursively.
pub fn walk_directory(root: &Path) -> Result<Vec<FileRecord>> {
    if !root.exists() {
        return Err(OrganizerError::PathNotFound(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(OrganizerError::NotADirectory(root.to_path_buf()));
    }

    let mut files = Vec::new();

    for entry in WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| !is_log_dir(e, root))
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        let metadata = match entry.metadata() {
            Ok(metadata) => metadata,
            Err(e) => {
                warn!("Skipping {}: {}", entry.path().display(), e);
                continue;
            }
        };

        let modified_time = metadata
            .modified()
            .ok()
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .map(|d| d.as_secs_f64())
            .unwrap_or(0.0);

        let file_name = entry.file_name().to_string_lossy().into_owned();
        files.push(FileRecord {
            extension: extension_of(&file_name),
            file_name,
            path: entry.path().to_path_buf(),
            size_bytes: metadata.len(),
            modified_time,
        });
    }

    if files.is_empty() {
        return Err(OrganizerError::NoFilesFound(root.to_path_buf()));
    }

    debug!("Found {} files under {}", files.len(), root.display());
    Ok(files)
}

pub fn print_tree(path: &Path, prefix: &str, is_last: bool) {
    let name = path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("");

    let connector = if is_last { "└── " } else { "├── " };
    println!("{}{}{}", prefix, connector, name.blue());

    if path.is_dir() {
        let new_prefix = if is_last {
            format!("{}    ", prefix)
        } else {
            format!("{}│   ", prefix)
        };

        if let Ok(entries) = fs::read_dir(path) {
            let mut entries: Vec<_> = entries
                .filter_map(|e| e.ok())
                .filter(|e| e.file_name() != LOG_DIR_NAME)
                .collect();
            entries.sort_by_key(|e| e.path());

            let count = entries.len();
            for (i, entry) in entries.iter().enumerate() {
                print_tree(&entry.path(), &new_prefix, i == count - 1);
            }
        }
    }
}
