use std::collections::BTreeMap;
use std::path::Path;

use crate::{
    error::{OrganizerError, Result},
    models::{Category, ClassifiedFile, PlanCategorySummary, PlanSummary},
    utils::bytes_to_mb,
};

const SAMPLE_FILE_COUNT: usize = 3;

/// Aggregates classified files into a reviewable plan. Never touches the
/// filesystem and never modifies `files`.
pub fn build_plan(files: &[ClassifiedFile], root_path: &Path) -> Result<PlanSummary> {
    validate_files(files)?;

    let total_files = files.len();
    let total_size_mb = bytes_to_mb(files.iter().map(|f| f.record.size_bytes).sum());
    let num_uncertain = files.iter().filter(|f| f.category.is_fallback()).count();

    let mut grouped: BTreeMap<Category, Vec<&ClassifiedFile>> = BTreeMap::new();
    for file in files {
        grouped.entry(file.category).or_default().push(file);
    }

    // Canonical order first. Categories outside it would be appended here,
    // but the closed `Category` set makes that list empty.
    let categories = Category::ALL
        .iter()
        .filter_map(|category| grouped.get(category).map(|group| summarize(*category, group)))
        .collect();

    Ok(PlanSummary {
        root_path: root_path.to_path_buf(),
        files: files.to_vec(),
        categories,
        total_files,
        total_size_mb,
        num_uncertain,
    })
}

fn summarize(category: Category, group: &[&ClassifiedFile]) -> PlanCategorySummary {
    let total_size_mb = bytes_to_mb(group.iter().map(|f| f.record.size_bytes).sum());

    let confidences: Vec<f64> = group.iter().filter_map(|f| f.confidence).collect();
    let avg_confidence = if confidences.is_empty() {
        None
    } else {
        Some(confidences.iter().sum::<f64>() / confidences.len() as f64)
    };

    let mut names: Vec<&str> = group.iter().map(|f| f.record.file_name.as_str()).collect();
    names.sort_unstable();
    let sample_files = names
        .into_iter()
        .take(SAMPLE_FILE_COUNT)
        .map(str::to_string)
        .collect();

    PlanCategorySummary {
        category,
        file_count: group.len(),
        total_size_mb,
        avg_confidence,
        sample_files,
    }
}

fn validate_files(files: &[ClassifiedFile]) -> Result<()> {
    for file in files {
        if file.record.file_name.is_empty() {
            return Err(OrganizerError::Schema(format!(
                "classified file at '{}' has no file name",
                file.record.path.display()
            )));
        }
        if let Some(confidence) = file.confidence {
            if !(0.0..=1.0).contains(&confidence) {
                return Err(OrganizerError::Schema(format!(
                    "confidence {} for '{}' is outside [0, 1]",
                    confidence, file.record.file_name
                )));
            }
        }
    }
    Ok(())
}
