use std::path::PathBuf;
use tracing::info;

use crate::{
    classifier::Classifier,
    error::{OrganizerError, Result},
    executor::apply_plan,
    models::{MoveRecord, PlanSummary},
    planner::build_plan,
    providers::RemoteClassifier,
    utils::walk_directory,
};

/// What a run ended with. Each outcome maps to its own exit status.
#[derive(Debug)]
pub enum RunOutcome {
    /// Read-only run: the plan was built and shown, nothing moved.
    Planned,
    Applied(ApplyReport),
    /// The user answered "no" when asked to apply the plan.
    Declined,
    /// The root contains no files. Not an error, but it gets its own
    /// exit status so scripts can tell it apart from a completed run.
    NoFiles,
}

impl RunOutcome {
    pub fn exit_code(&self) -> u8 {
        match self {
            RunOutcome::Planned | RunOutcome::Applied(_) => 0,
            RunOutcome::Declined => 2,
            RunOutcome::NoFiles => 3,
        }
    }
}

#[derive(Debug)]
pub struct ApplyReport {
    pub moves: Vec<MoveRecord>,
    pub log_path: PathBuf,
}

impl ApplyReport {
    pub fn moved(&self) -> usize {
        self.moves.iter().filter(|m| m.status.is_success()).count()
    }

    pub fn skipped(&self) -> usize {
        self.moves.iter().filter(|m| m.status.is_skipped()).count()
    }

    pub fn failed(&self) -> impl Iterator<Item = &MoveRecord> {
        self.moves.iter().filter(|m| m.status.is_failed())
    }

    /// Number of distinct categories that received at least one file.
    pub fn categories_used(&self) -> usize {
        let mut categories: Vec<_> = self
            .moves
            .iter()
            .filter(|m| m.status.is_success())
            .map(|m| m.category)
            .collect();
        categories.sort();
        categories.dedup();
        categories.len()
    }
}

/// Runs the scan → classify → plan → apply pipeline for one root directory.
pub struct FileOrganizer<R> {
    classifier: Classifier<R>,
    base_path: PathBuf,
}

impl<R: RemoteClassifier> FileOrganizer<R> {
    pub fn new(classifier: Classifier<R>, base_path: PathBuf) -> Self {
        Self {
            classifier,
            base_path,
        }
    }

    /// Builds the plan, or returns `None` when there is nothing to organize.
    pub async fn plan(&self) -> Result<Option<PlanSummary>> {
        let files = match walk_directory(&self.base_path) {
            Ok(files) => files,
            Err(OrganizerError::NoFilesFound(_)) => return Ok(None),
            Err(e) => return Err(e),
        };

        info!("Classifying {} files under {}", files.len(), self.base_path.display());
        let classified = self.classifier.classify(files).await?;
        let plan = build_plan(&classified, &self.base_path)?;
        Ok(Some(plan))
    }

    pub fn apply(&self, plan: &PlanSummary) -> Result<ApplyReport> {
        let (moves, log_path) = apply_plan(plan, &self.base_path)?;
        Ok(ApplyReport { moves, log_path })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcomes_have_distinct_exit_codes() {
        let applied = RunOutcome::Applied(ApplyReport {
            moves: Vec::new(),
            log_path: PathBuf::from("/r/.organizer/logs/move_log.csv"),
        });

        assert_eq!(RunOutcome::Planned.exit_code(), 0);
        assert_eq!(applied.exit_code(), 0);
        assert_eq!(RunOutcome::Declined.exit_code(), 2);
        assert_eq!(RunOutcome::NoFiles.exit_code(), 3);
    }
}
