//! Integration tests for the training and persistence workflow
//!
//! These exercise the full offline path: bundled dataset -> one-vs-one
//! training -> artifact on disk -> reconstructed classifier.

use clf_api::core::{OptimizerConfig, SparseVector};
use clf_api::data::{IrisDataset, N_FEATURES};
use clf_api::multiclass::OneVsOneSVM;
use clf_api::persistence::SerializableModel;
use tempfile::NamedTempFile;

fn train_default() -> (IrisDataset, OneVsOneSVM) {
    let dataset = IrisDataset::load().expect("bundled dataset should load");
    let classifier = OneVsOneSVM::train(dataset.samples(), &OptimizerConfig::default())
        .expect("training should succeed");
    (dataset, classifier)
}

/// The first reference record from the original client script
fn setosa_record() -> SparseVector {
    SparseVector::from_dense(&[5.1, 3.5, 1.4, 0.2])
}

/// The second reference record (corrected to carry all four features)
fn virginica_record() -> SparseVector {
    SparseVector::from_dense(&[5.9, 3.0, 5.1, 1.8])
}

#[test]
fn test_training_on_bundled_iris() {
    let (dataset, classifier) = train_default();

    assert_eq!(classifier.classes(), &[0, 1, 2]);
    assert_eq!(classifier.estimators().len(), 3);

    // Iris is nearly linearly separable; a linear SVM should fit it well
    let accuracy = classifier.evaluate(dataset.samples());
    assert!(
        accuracy >= 0.9,
        "training accuracy should be at least 90%, got {accuracy}"
    );
}

#[test]
fn test_reference_records_predictions() {
    let (_, classifier) = train_default();

    assert_eq!(classifier.predict(&setosa_record()).class, 0);
    assert_eq!(classifier.predict(&virginica_record()).class, 2);
}

#[test]
fn test_all_predictions_are_known_classes() {
    let (dataset, classifier) = train_default();

    for sample in dataset.samples() {
        let prediction = classifier.predict(&sample.features);
        assert!(classifier.classes().contains(&prediction.class));
    }
}

/// Restarting the serving process without retraining must reproduce identical
/// predictions: the artifact roundtrip preserves the model exactly.
#[test]
fn test_artifact_roundtrip_is_deterministic() {
    let (dataset, classifier) = train_default();
    let config = OptimizerConfig::default();

    let temp_file = NamedTempFile::new().expect("Failed to create temp file");
    SerializableModel::from_classifier(&classifier, &config, N_FEATURES)
        .save_to_file(temp_file.path())
        .expect("save should succeed");

    let restored = SerializableModel::load_from_file(temp_file.path())
        .expect("load should succeed")
        .to_classifier()
        .expect("reconstruction should succeed");

    for sample in dataset.samples() {
        assert_eq!(
            restored.predict(&sample.features).class,
            classifier.predict(&sample.features).class
        );
    }
}

/// The solver has no randomized choices, so retraining on the same data
/// yields the same model
#[test]
fn test_retraining_is_deterministic() {
    let dataset = IrisDataset::load().expect("bundled dataset should load");
    let config = OptimizerConfig::default();

    let first = OneVsOneSVM::train(dataset.samples(), &config).expect("training should succeed");
    let second = OneVsOneSVM::train(dataset.samples(), &config).expect("training should succeed");

    for (a, b) in first.estimators().iter().zip(second.estimators().iter()) {
        assert_eq!(a.positive_class(), b.positive_class());
        assert_eq!(a.model().bias(), b.model().bias());
        assert_eq!(a.model().alpha_values(), b.model().alpha_values());
    }

    for sample in dataset.samples() {
        assert_eq!(
            first.predict(&sample.features).class,
            second.predict(&sample.features).class
        );
    }
}

#[test]
fn test_artifact_metadata() {
    let (_, classifier) = train_default();
    let config = OptimizerConfig::default();

    let artifact = SerializableModel::from_classifier(&classifier, &config, N_FEATURES);

    assert_eq!(artifact.kernel_type, "linear");
    assert_eq!(artifact.classes, vec![0, 1, 2]);
    assert_eq!(artifact.metadata.n_features, N_FEATURES);
    assert_eq!(artifact.metadata.library_version, clf_api::VERSION);
}
