use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::models::FileRecord;

/// Per-file metadata sent to the remote classifier.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FileMetadata {
    pub file_name: String,
    pub extension: String,
    pub full_path: String,
    pub size_bytes: u64,
    pub modified_time: f64,
}

impl From<&FileRecord> for FileMetadata {
    fn from(record: &FileRecord) -> Self {
        Self {
            file_name: record.file_name.clone(),
            extension: record.extension.clone(),
            full_path: record.path_key(),
            size_bytes: record.size_bytes,
            modified_time: record.modified_time,
        }
    }
}

/// Shape of each value in the response object; only used to describe the
/// expected format to the model. Parsing is done leniently on raw JSON.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[schemars(deny_unknown_fields)]
pub struct VerdictEntry {
    #[schemars(description = "Exactly one of the allowed category labels")]
    pub category: String,
    #[schemars(description = "Certainty of the assignment, a number between 0 and 1")]
    pub confidence: f64,
}

/// Category label and confidence as returned by the remote classifier.
/// The label is not validated here.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteVerdict {
    pub label: String,
    pub confidence: f64,
}

#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ResponseFormat {
    #[serde(rename = "type")]
    pub kind: String,
}

impl ResponseFormat {
    pub fn json_object() -> Self {
        Self {
            kind: "json_object".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    pub message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
pub struct AssistantMessage {
    #[serde(default)]
    pub content: Option<String>,
}
