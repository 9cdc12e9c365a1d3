//! One-vs-one multiclass classification over binary SVMs
//!
//! Trains one binary machine per unordered pair of classes and predicts by
//! majority vote. Ties are broken by the accumulated decision margin, then
//! by the smaller class code, keeping predictions deterministic.

use crate::core::{ClassSample, ClfError, OptimizerConfig, Result, Sample, SparseVector};
use crate::kernel::{Kernel, LinearKernel};
use crate::optimizer::{SVMOptimizer, TrainedSVM};
use log::{debug, info};
use std::collections::BTreeSet;

/// Binary machine for one pair of classes
///
/// The positive class maps to label +1, the negative class to -1.
pub struct PairwiseModel<K: Kernel> {
    positive_class: u32,
    negative_class: u32,
    model: TrainedSVM<K>,
}

impl<K: Kernel> PairwiseModel<K> {
    pub fn new(positive_class: u32, negative_class: u32, model: TrainedSVM<K>) -> Self {
        Self {
            positive_class,
            negative_class,
            model,
        }
    }

    pub fn positive_class(&self) -> u32 {
        self.positive_class
    }

    pub fn negative_class(&self) -> u32 {
        self.negative_class
    }

    pub fn model(&self) -> &TrainedSVM<K> {
        &self.model
    }
}

/// Multiclass prediction with the winning class and its vote count
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassPrediction {
    pub class: u32,
    pub votes: u32,
}

/// One-vs-one ensemble of binary SVMs
pub struct OneVsOneSVM<K: Kernel = LinearKernel> {
    estimators: Vec<PairwiseModel<K>>,
    classes: Vec<u32>,
}

impl OneVsOneSVM<LinearKernel> {
    /// Train a linear one-vs-one classifier on class-coded samples
    pub fn train(samples: &[ClassSample], config: &OptimizerConfig) -> Result<Self> {
        if samples.is_empty() {
            return Err(ClfError::EmptyDataset);
        }

        let classes: Vec<u32> = samples
            .iter()
            .map(|s| s.class)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        if classes.len() < 2 {
            return Err(ClfError::InvalidDataset(
                "Training data must contain at least 2 classes".to_string(),
            ));
        }

        info!(
            "Training one-vs-one linear SVM: {} samples, {} classes",
            samples.len(),
            classes.len()
        );

        let mut estimators = Vec::new();
        for (i, &positive) in classes.iter().enumerate() {
            for &negative in &classes[i + 1..] {
                let binary: Vec<Sample> = samples
                    .iter()
                    .filter(|s| s.class == positive || s.class == negative)
                    .map(|s| {
                        let label = if s.class == positive { 1.0 } else { -1.0 };
                        Sample::new(s.features.clone(), label)
                    })
                    .collect();

                let optimizer = SVMOptimizer::new(LinearKernel::new(), config.clone());
                let model = optimizer.train_samples(&binary)?;
                debug!(
                    "Pair {positive} vs {negative}: {} support vectors, bias {:.6}",
                    model.n_support_vectors(),
                    model.bias()
                );
                estimators.push(PairwiseModel::new(positive, negative, model));
            }
        }

        Ok(Self {
            estimators,
            classes,
        })
    }
}

impl<K: Kernel> OneVsOneSVM<K> {
    /// Assemble a classifier from already-trained pairwise machines
    ///
    /// Used when reconstructing a persisted model.
    pub fn from_estimators(estimators: Vec<PairwiseModel<K>>) -> Result<Self> {
        if estimators.is_empty() {
            return Err(ClfError::InvalidDataset(
                "Classifier requires at least one pairwise machine".to_string(),
            ));
        }

        let classes: Vec<u32> = estimators
            .iter()
            .flat_map(|e| [e.positive_class, e.negative_class])
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        Ok(Self {
            estimators,
            classes,
        })
    }

    /// Predict the class code for a feature vector
    pub fn predict(&self, features: &SparseVector) -> ClassPrediction {
        let mut votes: Vec<u32> = vec![0; self.classes.len()];
        let mut margins: Vec<f64> = vec![0.0; self.classes.len()];

        for estimator in &self.estimators {
            let decision = estimator.model.decision_function(features);
            let winner = if decision >= 0.0 {
                estimator.positive_class
            } else {
                estimator.negative_class
            };
            let idx = self.class_index(winner);
            votes[idx] += 1;
            margins[idx] += decision.abs();
        }

        // Classes are sorted ascending, so scanning with strict improvement
        // resolves final ties toward the smaller class code.
        let mut best = 0;
        for i in 1..self.classes.len() {
            if votes[i] > votes[best] || (votes[i] == votes[best] && margins[i] > margins[best]) {
                best = i;
            }
        }

        ClassPrediction {
            class: self.classes[best],
            votes: votes[best],
        }
    }

    /// Fraction of correctly classified samples
    pub fn evaluate(&self, samples: &[ClassSample]) -> f64 {
        if samples.is_empty() {
            return 0.0;
        }
        let correct = samples
            .iter()
            .filter(|s| self.predict(&s.features).class == s.class)
            .count();
        correct as f64 / samples.len() as f64
    }

    /// Class codes seen during training, ascending
    pub fn classes(&self) -> &[u32] {
        &self.classes
    }

    pub fn estimators(&self) -> &[PairwiseModel<K>] {
        &self.estimators
    }

    fn class_index(&self, class: u32) -> usize {
        self.classes
            .binary_search(&class)
            .expect("class came from this classifier's estimators")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Three well-separated clusters on a line
    fn three_class_samples() -> Vec<ClassSample> {
        let mut samples = Vec::new();
        for offset in [-0.2, -0.1, 0.0, 0.1, 0.2] {
            samples.push(ClassSample::new(
                SparseVector::from_dense(&[-3.0 + offset]),
                0,
            ));
            samples.push(ClassSample::new(SparseVector::from_dense(&[offset]), 1));
            samples.push(ClassSample::new(
                SparseVector::from_dense(&[3.0 + offset]),
                2,
            ));
        }
        samples
    }

    #[test]
    fn test_train_builds_all_pairs() {
        let model = OneVsOneSVM::train(&three_class_samples(), &OptimizerConfig::default())
            .expect("Training should succeed");

        assert_eq!(model.classes(), &[0, 1, 2]);
        // 3 classes -> 3 unordered pairs
        assert_eq!(model.estimators().len(), 3);
    }

    #[test]
    fn test_predicts_training_clusters() {
        let samples = three_class_samples();
        let model = OneVsOneSVM::train(&samples, &OptimizerConfig::default())
            .expect("Training should succeed");

        for sample in &samples {
            let prediction = model.predict(&sample.features);
            assert_eq!(prediction.class, sample.class);
        }
        assert_eq!(model.evaluate(&samples), 1.0);
    }

    #[test]
    fn test_unanimous_votes_in_clear_regions() {
        let model = OneVsOneSVM::train(&three_class_samples(), &OptimizerConfig::default())
            .expect("Training should succeed");

        let prediction = model.predict(&SparseVector::from_dense(&[-3.0]));
        assert_eq!(prediction.class, 0);
        // Class 0 wins both of its pairwise contests
        assert_eq!(prediction.votes, 2);
    }

    #[test]
    fn test_rejects_single_class() {
        let samples = vec![
            ClassSample::new(SparseVector::from_dense(&[1.0]), 0),
            ClassSample::new(SparseVector::from_dense(&[2.0]), 0),
        ];
        assert!(matches!(
            OneVsOneSVM::train(&samples, &OptimizerConfig::default()),
            Err(ClfError::InvalidDataset(_))
        ));
    }

    #[test]
    fn test_rejects_empty_training_set() {
        assert!(matches!(
            OneVsOneSVM::train(&[], &OptimizerConfig::default()),
            Err(ClfError::EmptyDataset)
        ));
    }

    #[test]
    fn test_from_estimators_rederives_classes() {
        let samples = three_class_samples();
        let trained = OneVsOneSVM::train(&samples, &OptimizerConfig::default())
            .expect("Training should succeed");

        let rebuilt =
            OneVsOneSVM::from_estimators(trained.estimators).expect("rebuild should succeed");

        assert_eq!(rebuilt.classes(), &[0, 1, 2]);
        assert_eq!(rebuilt.evaluate(&samples), 1.0);
    }
}
