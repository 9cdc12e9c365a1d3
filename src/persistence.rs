//! Model serialization and persistence
//!
//! The training command writes the fitted classifier to a JSON artifact;
//! the serving process reads it back at startup. The artifact carries every
//! pairwise machine plus metadata for the `info` command.

use crate::core::{ClfError, OptimizerConfig, Result, Sample, SparseVector};
use crate::kernel::LinearKernel;
use crate::multiclass::{OneVsOneSVM, PairwiseModel};
use crate::optimizer::TrainedSVM;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use std::sync::Arc;

/// Serializable representation of a trained one-vs-one classifier
#[derive(Serialize, Deserialize)]
pub struct SerializableModel {
    /// Kernel type identifier
    pub kernel_type: String,
    /// Class codes seen during training, ascending
    pub classes: Vec<u32>,
    /// One binary machine per unordered class pair
    pub estimators: Vec<SerializableEstimator>,
    /// Model metadata
    pub metadata: ModelMetadata,
}

/// Serializable pairwise binary machine
#[derive(Serialize, Deserialize)]
pub struct SerializableEstimator {
    /// Class mapped to label +1
    pub positive_class: u32,
    /// Class mapped to label -1
    pub negative_class: u32,
    /// Support vectors with their binary labels
    pub support_vectors: Vec<SerializableSample>,
    /// Lagrange multipliers, one per support vector
    pub alpha: Vec<f64>,
    /// Bias term
    pub bias: f64,
}

/// Serializable sample representation
#[derive(Serialize, Deserialize, Clone)]
pub struct SerializableSample {
    pub indices: Vec<usize>,
    pub values: Vec<f64>,
    pub label: f64,
}

/// Model metadata for tracking and validation
#[derive(Serialize, Deserialize)]
pub struct ModelMetadata {
    /// Library version used to create the model
    pub library_version: String,
    /// Number of features the model was trained on
    pub n_features: usize,
    /// Training parameters used
    pub training_params: TrainingParams,
    /// Creation timestamp
    pub created_at: String,
}

/// Training parameters for reference
#[derive(Serialize, Deserialize)]
pub struct TrainingParams {
    pub c: f64,
    pub epsilon: f64,
    pub max_iterations: usize,
}

impl From<&Sample> for SerializableSample {
    fn from(sample: &Sample) -> Self {
        Self {
            indices: sample.features.indices.clone(),
            values: sample.features.values.clone(),
            label: sample.label,
        }
    }
}

impl From<&SerializableSample> for Sample {
    fn from(s: &SerializableSample) -> Self {
        Sample::new(
            SparseVector::new(s.indices.clone(), s.values.clone()),
            s.label,
        )
    }
}

impl SerializableModel {
    /// Capture a trained classifier together with its training parameters
    pub fn from_classifier(
        classifier: &OneVsOneSVM<LinearKernel>,
        config: &OptimizerConfig,
        n_features: usize,
    ) -> Self {
        let estimators = classifier
            .estimators()
            .iter()
            .map(|estimator| {
                let model = estimator.model();
                SerializableEstimator {
                    positive_class: estimator.positive_class(),
                    negative_class: estimator.negative_class(),
                    support_vectors: model
                        .support_vectors()
                        .iter()
                        .map(SerializableSample::from)
                        .collect(),
                    alpha: model.alpha_values().to_vec(),
                    bias: model.bias(),
                }
            })
            .collect();

        Self {
            kernel_type: "linear".to_string(),
            classes: classifier.classes().to_vec(),
            estimators,
            metadata: ModelMetadata {
                library_version: env!("CARGO_PKG_VERSION").to_string(),
                n_features,
                training_params: TrainingParams {
                    c: config.c,
                    epsilon: config.epsilon,
                    max_iterations: config.max_iterations,
                },
                created_at: chrono::Utc::now().to_rfc3339(),
            },
        }
    }

    /// Save the model to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path).map_err(ClfError::IoError)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)
            .map_err(|e| ClfError::SerializationError(e.to_string()))?;
        Ok(())
    }

    /// Load a model from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path).map_err(ClfError::IoError)?;
        let reader = BufReader::new(file);
        let model = serde_json::from_reader(reader)
            .map_err(|e| ClfError::SerializationError(e.to_string()))?;
        Ok(model)
    }

    /// Reconstruct a callable classifier (linear kernel only)
    pub fn to_classifier(&self) -> Result<OneVsOneSVM<LinearKernel>> {
        if self.kernel_type != "linear" {
            return Err(ClfError::InvalidParameter(format!(
                "Unsupported kernel type in artifact: {}",
                self.kernel_type
            )));
        }

        let mut estimators = Vec::with_capacity(self.estimators.len());
        for e in &self.estimators {
            if e.support_vectors.len() != e.alpha.len() {
                return Err(ClfError::SerializationError(format!(
                    "estimator {}v{}: {} support vectors but {} alpha values",
                    e.positive_class,
                    e.negative_class,
                    e.support_vectors.len(),
                    e.alpha.len()
                )));
            }
            let support_vectors: Vec<Sample> = e.support_vectors.iter().map(Sample::from).collect();
            let model = TrainedSVM::from_parts(
                Arc::new(LinearKernel::new()),
                support_vectors,
                e.alpha.clone(),
                e.bias,
            );
            estimators.push(PairwiseModel::new(e.positive_class, e.negative_class, model));
        }

        OneVsOneSVM::from_estimators(estimators)
    }

    /// Print a model summary to stdout
    pub fn print_summary(&self) {
        println!("=== Classifier Model Summary ===");
        println!("Kernel Type: {}", self.kernel_type);
        println!("Classes: {:?}", self.classes);
        println!("Pairwise Machines: {}", self.estimators.len());
        for e in &self.estimators {
            println!(
                "  {} vs {}: {} support vectors, bias {:.6}",
                e.positive_class,
                e.negative_class,
                e.support_vectors.len(),
                e.bias
            );
        }
        println!("Features: {}", self.metadata.n_features);
        println!("Library Version: {}", self.metadata.library_version);
        println!("Created: {}", self.metadata.created_at);
        println!("Training Parameters:");
        println!("  C: {}", self.metadata.training_params.c);
        println!("  Epsilon: {}", self.metadata.training_params.epsilon);
        println!(
            "  Max Iterations: {}",
            self.metadata.training_params.max_iterations
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ClassSample;
    use approx::assert_relative_eq;
    use tempfile::NamedTempFile;

    fn toy_samples() -> Vec<ClassSample> {
        vec![
            ClassSample::new(SparseVector::from_dense(&[-2.0]), 0),
            ClassSample::new(SparseVector::from_dense(&[-1.8]), 0),
            ClassSample::new(SparseVector::from_dense(&[0.1]), 1),
            ClassSample::new(SparseVector::from_dense(&[-0.1]), 1),
            ClassSample::new(SparseVector::from_dense(&[2.0]), 2),
            ClassSample::new(SparseVector::from_dense(&[1.8]), 2),
        ]
    }

    #[test]
    fn test_sample_conversion_roundtrip() {
        let sample = Sample::new(SparseVector::new(vec![0, 2, 5], vec![1.0, 2.0, 3.0]), 1.0);

        let serializable = SerializableSample::from(&sample);
        let converted = Sample::from(&serializable);

        assert_eq!(converted.features, sample.features);
        assert_eq!(converted.label, sample.label);
    }

    #[test]
    fn test_save_load_reconstruct() -> Result<()> {
        let config = OptimizerConfig::default();
        let samples = toy_samples();
        let classifier = OneVsOneSVM::train(&samples, &config)?;
        let serializable = SerializableModel::from_classifier(&classifier, &config, 1);

        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        serializable.save_to_file(temp_file.path())?;

        let loaded = SerializableModel::load_from_file(temp_file.path())?;
        assert_eq!(loaded.kernel_type, "linear");
        assert_eq!(loaded.classes, vec![0, 1, 2]);
        assert_eq!(loaded.estimators.len(), 3);

        let rebuilt = loaded.to_classifier()?;
        for sample in &samples {
            assert_eq!(
                rebuilt.predict(&sample.features).class,
                classifier.predict(&sample.features).class
            );
        }

        // Decision values survive the roundtrip, not just labels
        let probe = SparseVector::from_dense(&[0.7]);
        for (original, restored) in classifier
            .estimators()
            .iter()
            .zip(rebuilt.estimators().iter())
        {
            assert_relative_eq!(
                original.model().decision_function(&probe),
                restored.model().decision_function(&probe)
            );
        }

        Ok(())
    }

    #[test]
    fn test_rejects_unknown_kernel() {
        let config = OptimizerConfig::default();
        let classifier = OneVsOneSVM::train(&toy_samples(), &config).expect("training succeeds");
        let mut serializable = SerializableModel::from_classifier(&classifier, &config, 1);
        serializable.kernel_type = "rbf".to_string();

        assert!(matches!(
            serializable.to_classifier(),
            Err(ClfError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_load_missing_file_fails() {
        let result = SerializableModel::load_from_file("no/such/model.json");
        assert!(matches!(result, Err(ClfError::IoError(_))));
    }

    #[test]
    fn test_load_corrupt_file_fails() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        std::fs::write(temp_file.path(), b"not json").expect("write should succeed");

        let result = SerializableModel::load_from_file(temp_file.path());
        assert!(matches!(result, Err(ClfError::SerializationError(_))));
    }

    #[test]
    fn test_metadata_tracks_training_params() {
        let config = OptimizerConfig {
            c: 2.5,
            epsilon: 0.01,
            max_iterations: 500,
            ..OptimizerConfig::default()
        };
        let classifier = OneVsOneSVM::train(&toy_samples(), &config).expect("training succeeds");
        let serializable = SerializableModel::from_classifier(&classifier, &config, 1);

        assert_eq!(serializable.metadata.training_params.c, 2.5);
        assert_eq!(serializable.metadata.training_params.epsilon, 0.01);
        assert_eq!(serializable.metadata.training_params.max_iterations, 500);
        assert_eq!(serializable.metadata.n_features, 1);
    }
}
