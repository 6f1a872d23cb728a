use anyhow::Result;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use fs_sorter::{
    ai_structs::{FileMetadata, RemoteVerdict},
    classifier::Classifier,
    models::{Category, ClassifierType},
    organizer::FileOrganizer,
    providers::RemoteClassifier,
    OrganizerError,
};

/// Answers with a fixed label per file name, or fails every call.
struct CannedClassifier {
    by_name: HashMap<String, (String, f64)>,
    fail: bool,
}

impl CannedClassifier {
    fn with(entries: &[(&str, &str, f64)]) -> Self {
        Self {
            by_name: entries
                .iter()
                .map(|(name, label, confidence)| (name.to_string(), (label.to_string(), *confidence)))
                .collect(),
            fail: false,
        }
    }

    fn failing() -> Self {
        Self {
            by_name: HashMap::new(),
            fail: true,
        }
    }
}

impl RemoteClassifier for CannedClassifier {
    async fn classify_batch(
        &self,
        files: &[FileMetadata],
    ) -> fs_sorter::Result<HashMap<String, RemoteVerdict>> {
        if self.fail {
            return Err(OrganizerError::ClassifierUnavailable(
                "connection refused".to_string(),
            ));
        }
        Ok(files
            .iter()
            .filter_map(|f| {
                self.by_name.get(&f.file_name).map(|(label, confidence)| {
                    (
                        f.full_path.clone(),
                        RemoteVerdict {
                            label: label.clone(),
                            confidence: *confidence,
                        },
                    )
                })
            })
            .collect())
    }
}

fn create_tree(root: &Path, files: &[&str]) -> Result<()> {
    for relative in files {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, relative.as_bytes())?;
    }
    Ok(())
}

fn canonical_root(temp_dir: &TempDir) -> Result<PathBuf> {
    Ok(fs::canonicalize(temp_dir.path())?)
}

#[tokio::test]
async fn test_plan_then_apply_organizes_tree() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let root = canonical_root(&temp_dir)?;
    create_tree(
        &root,
        &["report.PDF", "nested/song.mp3", "LICENSE", "mystery.dat"],
    )?;

    let remote = CannedClassifier::with(&[
        ("LICENSE", "documents_misc", 0.9),
        ("mystery.dat", "code_projects", 0.2),
    ]);
    let organizer = FileOrganizer::new(Classifier::new(remote, 0.65)?, root.clone());

    let plan = organizer.plan().await?.expect("tree has files");
    assert_eq!(plan.total_files, 4);
    assert_eq!(plan.num_uncertain, 1);

    let by_name: HashMap<_, _> = plan
        .files
        .iter()
        .map(|f| (f.record.file_name.as_str(), f))
        .collect();
    assert_eq!(by_name["report.PDF"].category, Category::DocumentsMisc);
    assert_eq!(by_name["report.PDF"].classifier_type, ClassifierType::Rule);
    assert_eq!(by_name["LICENSE"].classifier_type, ClassifierType::Llm);
    assert_eq!(by_name["mystery.dat"].category, Category::UncertainReview);
    assert_eq!(by_name["mystery.dat"].confidence, Some(0.2));

    let report = organizer.apply(&plan)?;

    assert_eq!(report.moved(), 4);
    assert_eq!(report.failed().count(), 0);
    assert!(root.join("documents_misc/report.PDF").exists());
    assert!(root.join("documents_misc/LICENSE").exists());
    assert!(root.join("music_audio/song.mp3").exists());
    assert!(root.join("uncertain_review/mystery.dat").exists());

    let log = fs::read_to_string(&report.log_path)?;
    let mut lines = log.lines();
    assert_eq!(
        lines.next(),
        Some("file_name,source_path,destination_path,category,classifier_type,confidence,status")
    );
    assert_eq!(lines.count(), 4);
    assert!(log.contains(",llm,0.2,success"));
    assert!(log.contains(",rule,1.0,success"));

    Ok(())
}

#[tokio::test]
async fn test_log_directory_is_not_rescanned() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let root = canonical_root(&temp_dir)?;
    create_tree(&root, &["a.txt"])?;

    let organizer = FileOrganizer::new(
        Classifier::new(CannedClassifier::failing(), 0.65)?,
        root.clone(),
    );
    let plan = organizer.plan().await?.expect("tree has files");
    organizer.apply(&plan)?;

    let plan = organizer.plan().await?.expect("tree still has files");
    assert_eq!(plan.total_files, 1);
    assert!(plan
        .files
        .iter()
        .all(|f| !f.record.path.starts_with(root.join(".organizer"))));

    Ok(())
}

#[tokio::test]
async fn test_unavailable_remote_moves_nothing() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let root = canonical_root(&temp_dir)?;
    create_tree(&root, &["photo.jpg", "notes"])?;

    let organizer = FileOrganizer::new(
        Classifier::new(CannedClassifier::failing(), 0.65)?,
        root.clone(),
    );
    let err = organizer.plan().await.unwrap_err();

    assert!(matches!(err, OrganizerError::ClassifierUnavailable(_)));
    assert!(root.join("photo.jpg").exists());
    assert!(root.join("notes").exists());
    assert!(!root.join(".organizer").exists());

    Ok(())
}

#[tokio::test]
async fn test_empty_root_has_no_plan() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let root = canonical_root(&temp_dir)?;
    fs::create_dir_all(root.join("empty/inner"))?;

    let organizer = FileOrganizer::new(
        Classifier::new(CannedClassifier::failing(), 0.65)?,
        root,
    );

    assert!(organizer.plan().await?.is_none());

    Ok(())
}

#[tokio::test]
async fn test_missing_root_is_path_error() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let organizer = FileOrganizer::new(
        Classifier::new(CannedClassifier::failing(), 0.65)?,
        temp_dir.path().join("does-not-exist"),
    );

    let err = organizer.plan().await.unwrap_err();
    assert!(err.is_path_error());

    Ok(())
}
