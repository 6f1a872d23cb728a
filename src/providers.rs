use reqwest::Client;
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::{
    ai_structs::*,
    config::{self, Config, API_KEY_ENV_VAR},
    error::{OrganizerError, Result},
    models::Category,
};

/// An opaque oracle assigning category labels to files.
///
/// Implementations receive every pending file in a single call and return
/// verdicts keyed by full path. Missing entries are allowed; labels are
/// returned unvalidated.
#[allow(async_fn_in_trait)]
pub trait RemoteClassifier {
    async fn classify_batch(&self, files: &[FileMetadata]) -> Result<HashMap<String, RemoteVerdict>>;
}

/// Remote classifier backed by an OpenAI-compatible chat completions API.
pub struct OpenAiClassifier {
    client: Client,
    base_url: String,
    model_name: String,
    api_key: Option<String>,
}

impl OpenAiClassifier {
    pub fn new(config: &Config, api_key: Option<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| OrganizerError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            model_name: config.model_name.clone(),
            api_key,
        })
    }

    /// Uses the API key from the environment, if any. A missing key only
    /// becomes an error once a request actually has to be made.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config, config::api_key())
    }

    fn build_request(&self, files: &[FileMetadata]) -> Result<ChatCompletionRequest> {
        let categories = Category::ALL
            .iter()
            .map(|c| format!("\"{}\"", c.label()))
            .collect::<Vec<_>>()
            .join(", ");

        let entry_schema = serde_json::to_string_pretty(&schemars::schema_for!(VerdictEntry))
            .map_err(|e| OrganizerError::Schema(format!("Failed to render verdict schema: {}", e)))?;
        let files_json = serde_json::to_string_pretty(files)
            .map_err(|e| OrganizerError::Schema(format!("Failed to serialize file metadata: {}", e)))?;

        let prompt = format!(
            "For each file below, assign the most appropriate category from this list:\n\
            [{}]\n\n\
            Return a single JSON object mapping each file's full_path to an object \
            matching this schema:\n{}\n\n\
            Example format:\n\
            {{\n  \"/absolute/path/to/report.pdf\": {{\"category\": \"documents_misc\", \"confidence\": 0.92}},\n  \
            \"/absolute/path/to/photo.jpg\": {{\"category\": \"photos_images\", \"confidence\": 0.88}}\n}}\n\n\
            Here is the list of files (as JSON):\n{}\n",
            categories, entry_schema, files_json
        );

        Ok(ChatCompletionRequest {
            model: self.model_name.clone(),
            messages: vec![
                ChatMessage::system(
                    "You are helping to organize a user's filesystem. \
                    Respond only with a JSON object.",
                ),
                ChatMessage::user(prompt),
            ],
            response_format: ResponseFormat::json_object(),
        })
    }
}

impl RemoteClassifier for OpenAiClassifier {
    async fn classify_batch(&self, files: &[FileMetadata]) -> Result<HashMap<String, RemoteVerdict>> {
        if files.is_empty() {
            return Ok(HashMap::new());
        }

        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| OrganizerError::MissingCredential(API_KEY_ENV_VAR.to_string()))?;

        let request = self.build_request(files)?;
        let url = format!("{}/chat/completions", self.base_url);

        debug!("Sending {} files to {} (model={})", files.len(), url, self.model_name);

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    OrganizerError::ClassifierUnavailable(format!("request to {} timed out", url))
                } else {
                    OrganizerError::ClassifierUnavailable(format!("request to {} failed: {}", url, e))
                }
            })?;

        if !response.status().is_success() {
            return Err(OrganizerError::ClassifierUnavailable(format!(
                "service returned status {}",
                response.status()
            )));
        }

        let body = response.text().await.map_err(|e| {
            OrganizerError::ClassifierUnavailable(format!("failed to read response body: {}", e))
        })?;

        let completion: ChatCompletionResponse = serde_json::from_str(&body).map_err(|e| {
            OrganizerError::ResponseUnparseable(format!("unexpected response structure: {}", e))
        })?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                OrganizerError::ResponseUnparseable("response contained no message content".into())
            })?;

        parse_verdicts(&content)
    }
}

/// Parses the model's answer: a JSON object keyed by full path.
///
/// Entries whose value is not an object are dropped; labels are kept as-is;
/// confidences are coerced to a float and clamped to [0, 1].
pub fn parse_verdicts(content: &str) -> Result<HashMap<String, RemoteVerdict>> {
    let parsed: Value = serde_json::from_str(content.trim()).map_err(|e| {
        OrganizerError::ResponseUnparseable(format!("response is not valid JSON: {}", e))
    })?;

    let entries = match parsed {
        Value::Object(entries) => entries,
        other => {
            return Err(OrganizerError::ResponseUnparseable(format!(
                "expected an object keyed by full_path, got {}",
                json_kind(&other)
            )))
        }
    };

    let mut verdicts = HashMap::with_capacity(entries.len());
    for (path, info) in entries {
        let Value::Object(info) = info else {
            warn!("Dropping malformed classifier entry for {}", path);
            continue;
        };

        let label = match info.get("category") {
            Some(Value::String(label)) => label.clone(),
            Some(Value::Null) | None => Category::FALLBACK.label().to_string(),
            Some(other) => other.to_string(),
        };
        let confidence = info.get("confidence").map(coerce_confidence).unwrap_or(0.0);

        verdicts.insert(path, RemoteVerdict { label, confidence });
    }

    Ok(verdicts)
}

fn coerce_confidence(value: &Value) -> f64 {
    let raw = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    };

    match raw {
        Some(c) if c.is_nan() => 0.0,
        Some(c) => c.clamp(0.0, 1.0),
        None => 0.0,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
