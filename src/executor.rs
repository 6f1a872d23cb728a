use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::{
    error::{OrganizerError, Result},
    models::{Category, ClassifiedFile, MoveRecord, MoveStatus, PlanSummary},
    move_log::write_move_log,
};


/// Applies the plan, then writes the move log. Returns the per-file
/// outcomes and the log location.
pub fn apply_plan(plan: &PlanSummary, root_path: &Path) -> Result<(Vec<MoveRecord>, PathBuf)> {
    let records = Executor::new().execute(plan, root_path)?;
    let log_path = write_move_log(&records, root_path)?;
    Ok((records, log_path))
}

/// Moves files into `<root>/<category>/`, one attempt per file. A failure
/// on one file is recorded and never stops the run.
pub struct Executor {
    // Category directories that could not be created during this run.
    dir_failures: HashMap<Category, String>,
}

impl Executor {
    pub fn new() -> Self {
        Self {
            dir_failures: HashMap::new(),
        }
    }

    pub fn execute(mut self, plan: &PlanSummary, root_path: &Path) -> Result<Vec<MoveRecord>> {
        validate_plan(plan, root_path)?;

        let records: Vec<MoveRecord> = plan
            .files
            .iter()
            .map(|file| self.move_file(file, root_path))
            .collect();

        let moved = records.iter().filter(|r| r.status.is_success()).count();
        let failed = records.iter().filter(|r| r.status.is_failed()).count();
        info!(
            "Applied plan: {} moved, {} skipped, {} failed",
            moved,
            records.len() - moved - failed,
            failed
        );

        Ok(records)
    }

    fn move_file(&mut self, file: &ClassifiedFile, root_path: &Path) -> MoveRecord {
        let source = file.record.path.clone();
        let target_dir = root_path.join(file.category.label());
        let destination = match source.file_name() {
            Some(name) => target_dir.join(name),
            None => target_dir.join(&file.record.file_name),
        };

        let outcome = |destination: PathBuf, status: MoveStatus| {
            if let MoveStatus::Failed(reason) = &status {
                warn!("Failed to move '{}': {}", source.display(), reason);
            }
            MoveRecord {
                file_name: file.record.file_name.clone(),
                source: source.clone(),
                destination,
                category: file.category,
                classifier_type: file.classifier_type,
                confidence: file.confidence,
                status,
            }
        };

        if let Some(reason) = self.dir_failures.get(&file.category) {
            return outcome(destination, MoveStatus::Failed(reason.clone()));
        }

        if let Err(e) = fs::create_dir_all(&target_dir) {
            let reason = format!(
                "could not create target directory '{}': {}",
                target_dir.display(),
                e
            );
            self.dir_failures.insert(file.category, reason.clone());
            return outcome(destination, MoveStatus::Failed(reason));
        }

        if !source.exists() {
            return outcome(
                destination,
                MoveStatus::Failed("source file not found".to_string()),
            );
        }

        if same_location(&source, &destination) {
            return outcome(
                destination,
                MoveStatus::Skipped("already in target".to_string()),
            );
        }

        let destination = resolve_collision(&destination);
        match relocate(&source, &destination) {
            Ok(()) => outcome(destination, MoveStatus::Success),
            Err(e) => outcome(destination, MoveStatus::Failed(e.to_string())),
        }
    }
}

impl Default for Executor {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_plan(plan: &PlanSummary, root_path: &Path) -> Result<()> {
    if root_path.as_os_str().is_empty() || !root_path.is_absolute() {
        return Err(OrganizerError::FileMove(format!(
            "invalid root path '{}'",
            root_path.display()
        )));
    }
    if !root_path.is_dir() {
        return Err(OrganizerError::FileMove(format!(
            "root path '{}' is not a directory",
            root_path.display()
        )));
    }
    if plan.files.len() != plan.total_files {
        return Err(OrganizerError::FileMove(format!(
            "plan lists {} files but carries {} records",
            plan.total_files,
            plan.files.len()
        )));
    }
    for file in &plan.files {
        if file.record.file_name.is_empty() || file.record.path.as_os_str().is_empty() {
            return Err(OrganizerError::FileMove(format!(
                "plan record '{}' is missing a file name or path",
                file.record.path.display()
            )));
        }
    }
    Ok(())
}

fn same_location(source: &Path, destination: &Path) -> bool {
    match (fs::canonicalize(source), fs::canonicalize(destination)) {
        (Ok(source), Ok(destination)) => source == destination,
        _ => false,
    }
}

/// First free path among `name.ext`, `name (1).ext`, `name (2).ext`, ...
pub fn resolve_collision(path: &Path) -> PathBuf {
    if !path.exists() {
        return path.to_path_buf();
    }

    let parent = path.parent().unwrap_or_else(|| Path::new(""));
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let suffix = path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    let mut counter = 1;
    loop {
        let candidate = parent.join(format!("{} ({}){}", stem, counter, suffix));
        if !candidate.exists() {
            return candidate;
        }
        counter += 1;
    }
}

fn relocate(from: &Path, to: &Path) -> io::Result<()> {
    let rename_err = match fs::rename(from, to) {
        Ok(()) => return Ok(()),
        Err(e) => e,
    };

    // Different filesystems: copy, then drop the original.
    copy_then_remove(from, to).map_err(|fallback_err| {
        io::Error::new(
            rename_err.kind(),
            format!("{} (copy fallback failed: {})", rename_err, fallback_err),
        )
    })
}

/// Copies `from` to `to` keeping its modification time, then removes
/// `from`. On failure nothing is left at `to` that was not there before.
fn copy_then_remove(from: &Path, to: &Path) -> io::Result<()> {
    let existed = to.exists();
    if let Err(e) = copy_preserving_mtime(from, to) {
        if !existed {
            let _ = fs::remove_file(to);
        }
        return Err(e);
    }
    if let Err(e) = fs::remove_file(from) {
        let _ = fs::remove_file(to);
        return Err(e);
    }
    Ok(())
}

fn copy_preserving_mtime(from: &Path, to: &Path) -> io::Result<()> {
    fs::copy(from, to)?;
    let modified = fs::metadata(from)?.modified()?;
    fs::File::options().write(true).open(to)?.set_modified(modified)
}
