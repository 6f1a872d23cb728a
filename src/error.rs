use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, OrganizerError>;

/// Every failure a user can trigger through normal use of the organizer.
///
/// Anything that is not an `OrganizerError` is a defect and should surface
/// as a hard failure rather than a friendly message.
#[derive(Error, Debug)]
pub enum OrganizerError {
    #[error("Path not found: {}", .0.display())]
    PathNotFound(PathBuf),

    #[error("Provided path is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("No files found under '{}'", .0.display())]
    NoFilesFound(PathBuf),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0} not set. Please set it in your environment or in a .env file.")]
    MissingCredential(String),

    #[error("LLM classification service is unavailable: {0}")]
    ClassifierUnavailable(String),

    #[error("Failed to parse LLM response: {0}")]
    ResponseUnparseable(String),

    #[error("Malformed classification data: {0}")]
    Schema(String),

    #[error("Cannot apply plan: {0}")]
    FileMove(String),

    #[error("Failed to write move log to '{}': {source}", path.display())]
    Logging {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl OrganizerError {
    pub fn is_path_error(&self) -> bool {
        matches!(
            self,
            OrganizerError::PathNotFound(_)
                | OrganizerError::NotADirectory(_)
                | OrganizerError::NoFilesFound(_)
        )
    }

    /// True when the run stopped before anything on disk was touched.
    pub fn nothing_moved(&self) -> bool {
        !matches!(self, OrganizerError::Logging { .. })
    }
}
