use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    SchoolWork,
    CodeProjects,
    PhotosImages,
    VideosMedia,
    MusicAudio,
    ArchivesInstallers,
    DocumentsMisc,
    TrashOrTemp,
    UncertainReview,
}

impl Category {
    /// Canonical order, also used for plan presentation.
    pub const ALL: [Category; 9] = [
        Category::SchoolWork,
        Category::CodeProjects,
        Category::PhotosImages,
        Category::VideosMedia,
        Category::MusicAudio,
        Category::ArchivesInstallers,
        Category::DocumentsMisc,
        Category::TrashOrTemp,
        Category::UncertainReview,
    ];

    /// Assigned when neither a rule nor a confident remote verdict applies.
    pub const FALLBACK: Category = Category::UncertainReview;

    pub fn label(self) -> &'static str {
        match self {
            Category::SchoolWork => "school_work",
            Category::CodeProjects => "code_projects",
            Category::PhotosImages => "photos_images",
            Category::VideosMedia => "videos_media",
            Category::MusicAudio => "music_audio",
            Category::ArchivesInstallers => "archives_installers",
            Category::DocumentsMisc => "documents_misc",
            Category::TrashOrTemp => "trash_or_temp",
            Category::UncertainReview => "uncertain_review",
        }
    }

    pub fn from_label(label: &str) -> Option<Category> {
        Category::ALL.into_iter().find(|c| c.label() == label)
    }

    pub fn is_fallback(self) -> bool {
        self == Category::FALLBACK
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassifierType {
    Rule,
    Llm,
}

impl fmt::Display for ClassifierType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassifierType::Rule => write!(f, "rule"),
            ClassifierType::Llm => write!(f, "llm"),
        }
    }
}

/// One file discovered under the root.
#[derive(Debug, Clone, PartialEq)]
pub struct FileRecord {
    pub file_name: String,
    /// Lowercase, with the leading dot; empty when the file has none.
    pub extension: String,
    pub path: PathBuf,
    pub size_bytes: u64,
    /// Seconds since the Unix epoch.
    pub modified_time: f64,
}

impl FileRecord {
    pub fn path_key(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedFile {
    pub record: FileRecord,
    pub category: Category,
    pub classifier_type: ClassifierType,
    pub confidence: Option<f64>,
}

impl ClassifiedFile {
    pub fn by_rule(record: FileRecord, category: Category) -> Self {
        Self {
            record,
            category,
            classifier_type: ClassifierType::Rule,
            confidence: Some(1.0),
        }
    }

    pub fn by_llm(record: FileRecord, category: Category, confidence: f64) -> Self {
        Self {
            record,
            category,
            classifier_type: ClassifierType::Llm,
            confidence: Some(confidence),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlanCategorySummary {
    pub category: Category,
    pub file_count: usize,
    pub total_size_mb: f64,
    /// `None` when no file in the category carries a confidence value.
    pub avg_confidence: Option<f64>,
    pub sample_files: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct PlanSummary {
    pub root_path: PathBuf,
    pub files: Vec<ClassifiedFile>,
    pub categories: Vec<PlanCategorySummary>,
    pub total_files: usize,
    pub total_size_mb: f64,
    pub num_uncertain: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveStatus {
    Success,
    Skipped(String),
    Failed(String),
}

impl MoveStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, MoveStatus::Success)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, MoveStatus::Failed(_))
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, MoveStatus::Skipped(_))
    }
}

impl fmt::Display for MoveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveStatus::Success => write!(f, "success"),
            MoveStatus::Skipped(reason) => write!(f, "skipped: {}", reason),
            MoveStatus::Failed(reason) => write!(f, "failed: {}", reason),
        }
    }
}

/// Outcome of relocating a single file.
#[derive(Debug, Clone, PartialEq)]
pub struct MoveRecord {
    pub file_name: String,
    pub source: PathBuf,
    /// Final destination, after collision resolution.
    pub destination: PathBuf,
    pub category: Category,
    pub classifier_type: ClassifierType,
    pub confidence: Option<f64>,
    pub status: MoveStatus,
}
