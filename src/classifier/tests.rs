use super::*;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::path::PathBuf;

enum StubBehaviour {
    Answer(HashMap<String, RemoteVerdict>),
    Unavailable,
}

struct StubClassifier {
    behaviour: StubBehaviour,
    calls: Cell<usize>,
    received: RefCell<Vec<String>>,
}

impl StubClassifier {
    fn answering(entries: &[(&str, &str, f64)]) -> Self {
        let answers = entries
            .iter()
            .map(|(path, label, confidence)| {
                (
                    path.to_string(),
                    RemoteVerdict {
                        label: label.to_string(),
                        confidence: *confidence,
                    },
                )
            })
            .collect();
        Self {
            behaviour: StubBehaviour::Answer(answers),
            calls: Cell::new(0),
            received: RefCell::new(Vec::new()),
        }
    }

    fn unavailable() -> Self {
        Self {
            behaviour: StubBehaviour::Unavailable,
            calls: Cell::new(0),
            received: RefCell::new(Vec::new()),
        }
    }
}

impl RemoteClassifier for StubClassifier {
    async fn classify_batch(&self, files: &[FileMetadata]) -> Result<HashMap<String, RemoteVerdict>> {
        self.calls.set(self.calls.get() + 1);
        self.received
            .borrow_mut()
            .extend(files.iter().map(|f| f.full_path.clone()));
        match &self.behaviour {
            StubBehaviour::Answer(answers) => Ok(answers.clone()),
            StubBehaviour::Unavailable => Err(OrganizerError::ClassifierUnavailable(
                "request timed out".to_string(),
            )),
        }
    }
}

fn record(name: &str) -> FileRecord {
    let path = PathBuf::from("/data").join(name);
    let extension = path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    FileRecord {
        file_name: name.to_string(),
        extension,
        path,
        size_bytes: 1024,
        modified_time: 1_700_000_000.0,
    }
}

#[tokio::test]
async fn test_rule_only_run_makes_no_remote_call() {
    let classifier = Classifier::new(StubClassifier::unavailable(), 0.65).unwrap();

    let files = classifier
        .classify(vec![record("a.pdf"), record("b.jpg")])
        .await
        .unwrap();

    assert_eq!(classifier.remote.calls.get(), 0);
    assert_eq!(files[0].category, Category::DocumentsMisc);
    assert_eq!(files[1].category, Category::PhotosImages);
    for file in &files {
        assert_eq!(file.classifier_type, ClassifierType::Rule);
        assert_eq!(file.confidence, Some(1.0));
    }
}

#[tokio::test]
async fn test_extensions_are_lowercased_before_matching() {
    let classifier = Classifier::new(StubClassifier::unavailable(), 0.65).unwrap();
    let mut shouty = record("SCAN.PDF");
    shouty.extension = ".PDF".to_string();

    let files = classifier.classify(vec![shouty]).await.unwrap();

    assert_eq!(files[0].record.extension, ".pdf");
    assert_eq!(files[0].category, Category::DocumentsMisc);
    assert_eq!(classifier.remote.calls.get(), 0);
}

#[tokio::test]
async fn test_ambiguous_files_are_batched_into_one_call() {
    let stub = StubClassifier::answering(&[
        ("/data/essay.pages", "school_work", 0.9),
        ("/data/mix.opus", "music_audio", 0.8),
    ]);
    let classifier = Classifier::new(stub, 0.65).unwrap();

    let files = classifier
        .classify(vec![
            record("essay.pages"),
            record("main.py"),
            record("mix.opus"),
        ])
        .await
        .unwrap();

    assert_eq!(classifier.remote.calls.get(), 1);
    assert_eq!(
        *classifier.remote.received.borrow(),
        vec!["/data/essay.pages".to_string(), "/data/mix.opus".to_string()]
    );

    // Input order is preserved.
    assert_eq!(files[0].record.file_name, "essay.pages");
    assert_eq!(files[0].category, Category::SchoolWork);
    assert_eq!(files[0].classifier_type, ClassifierType::Llm);
    assert_eq!(files[0].confidence, Some(0.9));
    assert_eq!(files[1].category, Category::CodeProjects);
    assert_eq!(files[1].classifier_type, ClassifierType::Rule);
    assert_eq!(files[2].category, Category::MusicAudio);
}

#[tokio::test]
async fn test_missing_verdict_becomes_fallback_with_zero_confidence() {
    let stub = StubClassifier::answering(&[("/data/other.bin", "documents_misc", 0.9)]);
    let classifier = Classifier::new(stub, 0.65).unwrap();

    let files = classifier.classify(vec![record("mystery.xyz")]).await.unwrap();

    assert_eq!(files[0].category, Category::UncertainReview);
    assert_eq!(files[0].classifier_type, ClassifierType::Llm);
    assert_eq!(files[0].confidence, Some(0.0));
}

#[tokio::test]
async fn test_unknown_label_normalised_keeping_confidence() {
    let stub = StubClassifier::answering(&[("/data/deck.key", "presentations", 0.95)]);
    let classifier = Classifier::new(stub, 0.65).unwrap();

    let files = classifier.classify(vec![record("deck.key")]).await.unwrap();

    assert_eq!(files[0].category, Category::UncertainReview);
    assert_eq!(files[0].confidence, Some(0.95));
}

#[tokio::test]
async fn test_low_confidence_is_demoted_but_value_kept() {
    let stub = StubClassifier::answering(&[
        ("/data/low.dat", "documents_misc", 0.3),
        ("/data/edge.dat", "documents_misc", 0.65),
    ]);
    let classifier = Classifier::new(stub, 0.65).unwrap();

    let files = classifier
        .classify(vec![record("low.dat"), record("edge.dat")])
        .await
        .unwrap();

    assert_eq!(files[0].category, Category::UncertainReview);
    assert_eq!(files[0].confidence, Some(0.3));
    // Only strictly lower confidences are demoted.
    assert_eq!(files[1].category, Category::DocumentsMisc);
}

#[tokio::test]
async fn test_threshold_demotes_for_any_min_confidence() {
    for min_confidence in [0.0, 0.25, 0.5, 0.75, 1.0] {
        let stub = StubClassifier::answering(&[
            ("/data/a.dat", "videos_media", 0.1),
            ("/data/b.dat", "videos_media", 0.5),
            ("/data/c.dat", "videos_media", 0.99),
        ]);
        let classifier = Classifier::new(stub, min_confidence).unwrap();
        let files = classifier
            .classify(vec![record("a.dat"), record("b.dat"), record("c.dat"), record("d.mp4")])
            .await
            .unwrap();

        for file in &files {
            match file.classifier_type {
                ClassifierType::Llm if file.confidence.unwrap() < min_confidence => {
                    assert_eq!(file.category, Category::UncertainReview)
                }
                ClassifierType::Llm => assert_eq!(file.category, Category::VideosMedia),
                ClassifierType::Rule => assert_eq!(file.category, Category::VideosMedia),
            }
        }
    }
}

#[tokio::test]
async fn test_unavailable_remote_aborts_classification() {
    let classifier = Classifier::new(StubClassifier::unavailable(), 0.65).unwrap();

    let err = classifier
        .classify(vec![record("a.pdf"), record("unknown.qqq")])
        .await
        .unwrap_err();

    assert!(matches!(err, OrganizerError::ClassifierUnavailable(_)));
}

#[tokio::test]
async fn test_record_without_name_is_schema_error() {
    let classifier = Classifier::new(StubClassifier::unavailable(), 0.65).unwrap();
    let mut broken = record("a.pdf");
    broken.file_name.clear();

    let err = classifier.classify(vec![broken]).await.unwrap_err();

    assert!(matches!(err, OrganizerError::Schema(_)));
}

#[test]
fn test_invalid_threshold_rejected() {
    assert!(Classifier::new(StubClassifier::unavailable(), 1.2).is_err());
    assert!(Classifier::new(StubClassifier::unavailable(), -0.01).is_err());
}

#[test]
fn test_threshold_never_touches_rule_results() {
    let mut files = vec![ClassifiedFile::by_rule(record("a.pdf"), Category::DocumentsMisc)];
    apply_threshold(&mut files, 1.0);
    assert_eq!(files[0].category, Category::DocumentsMisc);
}
