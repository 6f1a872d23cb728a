use tracing::{debug, info};

use crate::{
    ai_structs::{FileMetadata, RemoteVerdict},
    config::validate_min_confidence,
    error::{OrganizerError, Result},
    models::{Category, ClassifiedFile, ClassifierType, FileRecord},
    providers::RemoteClassifier,
    rules,
};

#[cfg(test)]
mod tests;

enum Slot {
    Done(ClassifiedFile),
    Pending(FileRecord),
}

/// Hybrid classifier: extension rules first, one batched remote call for
/// everything left over, then a confidence threshold on remote verdicts.
pub struct Classifier<R> {
    remote: R,
    min_confidence: f64,
}

impl<R: RemoteClassifier> Classifier<R> {
    pub fn new(remote: R, min_confidence: f64) -> Result<Self> {
        validate_min_confidence(min_confidence)?;
        Ok(Self {
            remote,
            min_confidence,
        })
    }

    /// Classifies every record, preserving input order. Each returned file
    /// carries a category from the closed set.
    pub async fn classify(&self, records: Vec<FileRecord>) -> Result<Vec<ClassifiedFile>> {
        validate_records(&records)?;

        let slots: Vec<Slot> = records
            .into_iter()
            .map(|mut record| {
                record.extension = record.extension.to_lowercase();
                match rules::match_extension(&record.extension) {
                    Some(category) => Slot::Done(ClassifiedFile::by_rule(record, category)),
                    None => Slot::Pending(record),
                }
            })
            .collect();

        let pending: Vec<FileMetadata> = slots
            .iter()
            .filter_map(|slot| match slot {
                Slot::Pending(record) => Some(FileMetadata::from(record)),
                Slot::Done(_) => None,
            })
            .collect();

        info!(
            "{} files matched by extension rules, {} need the remote classifier",
            slots.len() - pending.len(),
            pending.len()
        );

        let verdicts = if pending.is_empty() {
            Default::default()
        } else {
            self.remote.classify_batch(&pending).await?
        };

        let mut classified: Vec<ClassifiedFile> = slots
            .into_iter()
            .map(|slot| match slot {
                Slot::Done(file) => file,
                Slot::Pending(record) => {
                    let verdict = verdicts.get(&record.path_key());
                    merge_verdict(record, verdict)
                }
            })
            .collect();

        apply_threshold(&mut classified, self.min_confidence);
        Ok(classified)
    }
}

fn validate_records(records: &[FileRecord]) -> Result<()> {
    for (idx, record) in records.iter().enumerate() {
        if record.file_name.is_empty() {
            return Err(OrganizerError::Schema(format!(
                "record {} is missing a file name",
                idx
            )));
        }
        if record.path.as_os_str().is_empty() {
            return Err(OrganizerError::Schema(format!(
                "record {} ('{}') is missing a path",
                idx, record.file_name
            )));
        }
    }
    Ok(())
}

/// Turns the remote answer for one file into a classification. A missing
/// verdict or an unknown label yields the fallback category.
pub fn merge_verdict(record: FileRecord, verdict: Option<&RemoteVerdict>) -> ClassifiedFile {
    match verdict {
        None => {
            debug!("No verdict returned for {}", record.path.display());
            ClassifiedFile::by_llm(record, Category::FALLBACK, 0.0)
        }
        Some(verdict) => {
            let category = Category::from_label(&verdict.label).unwrap_or_else(|| {
                debug!(
                    "Unknown category '{}' for {}, using {}",
                    verdict.label,
                    record.path.display(),
                    Category::FALLBACK
                );
                Category::FALLBACK
            });
            ClassifiedFile::by_llm(record, category, verdict.confidence)
        }
    }
}

/// Demotes remote verdicts below `min_confidence` to the fallback category.
/// The confidence value itself is kept.
pub fn apply_threshold(files: &mut [ClassifiedFile], min_confidence: f64) {
    for file in files.iter_mut() {
        match file.classifier_type {
            ClassifierType::Rule => {}
            ClassifierType::Llm => {
                let confidence = file.confidence.unwrap_or(0.0);
                if confidence < min_confidence {
                    file.category = Category::FALLBACK;
                }
            }
        }
    }
}
