//! Binary SVM training and the trained-model type

use crate::core::{OptimizationResult, OptimizerConfig, Prediction, Result, Sample, SparseVector};
use crate::kernel::Kernel;
use crate::solver::SMOSolver;
use std::sync::Arc;

/// Trains binary SVM models with a given kernel and configuration
pub struct SVMOptimizer<K: Kernel> {
    kernel: Arc<K>,
    config: OptimizerConfig,
}

impl<K: Kernel> SVMOptimizer<K> {
    pub fn new(kernel: K, config: OptimizerConfig) -> Self {
        Self {
            kernel: Arc::new(kernel),
            config,
        }
    }

    pub fn with_kernel(kernel: K) -> Self {
        Self::new(kernel, OptimizerConfig::default())
    }

    /// Train a binary model on labeled (+1/-1) samples
    pub fn train_samples(&self, samples: &[Sample]) -> Result<TrainedSVM<K>> {
        let solver = SMOSolver::new(Arc::clone(&self.kernel), self.config.clone());
        let result = solver.solve(samples)?;
        Ok(TrainedSVM::new(Arc::clone(&self.kernel), samples, result))
    }

    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }
}

/// A trained binary SVM model
pub struct TrainedSVM<K: Kernel> {
    kernel: Arc<K>,
    support_vectors: Vec<Sample>,
    alpha: Vec<f64>,
    bias: f64,
}

impl<K: Kernel> TrainedSVM<K> {
    fn new(kernel: Arc<K>, training_samples: &[Sample], result: OptimizationResult) -> Self {
        let mut support_vectors = Vec::with_capacity(result.support_vectors.len());
        let mut alpha = Vec::with_capacity(result.support_vectors.len());

        for &i in &result.support_vectors {
            support_vectors.push(training_samples[i].clone());
            alpha.push(result.alpha[i]);
        }

        Self {
            kernel,
            support_vectors,
            alpha,
            bias: result.b,
        }
    }

    /// Rebuild a model from its persisted parts
    pub fn from_parts(
        kernel: Arc<K>,
        support_vectors: Vec<Sample>,
        alpha: Vec<f64>,
        bias: f64,
    ) -> Self {
        assert_eq!(
            support_vectors.len(),
            alpha.len(),
            "Support vectors and alpha values must have same length"
        );
        Self {
            kernel,
            support_vectors,
            alpha,
            bias,
        }
    }

    /// Decision function value for a feature vector
    pub fn decision_function(&self, features: &SparseVector) -> f64 {
        let mut result = 0.0;
        for (i, sv) in self.support_vectors.iter().enumerate() {
            result += self.alpha[i] * sv.label * self.kernel.compute(features, &sv.features);
        }
        result + self.bias
    }

    /// Predict the binary label for a feature vector
    pub fn predict(&self, features: &SparseVector) -> Prediction {
        let decision_value = self.decision_function(features);
        let label = if decision_value >= 0.0 { 1.0 } else { -1.0 };
        Prediction::new(label, decision_value)
    }

    pub fn support_vectors(&self) -> &[Sample] {
        &self.support_vectors
    }

    pub fn alpha_values(&self) -> &[f64] {
        &self.alpha
    }

    pub fn n_support_vectors(&self) -> usize {
        self.support_vectors.len()
    }

    pub fn bias(&self) -> f64 {
        self.bias
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::LinearKernel;
    use approx::assert_relative_eq;

    fn separable_samples() -> Vec<Sample> {
        vec![
            Sample::new(SparseVector::from_dense(&[2.0]), 1.0),
            Sample::new(SparseVector::from_dense(&[1.5]), 1.0),
            Sample::new(SparseVector::from_dense(&[-2.0]), -1.0),
            Sample::new(SparseVector::from_dense(&[-1.5]), -1.0),
        ]
    }

    #[test]
    fn test_training_simple_case() {
        let optimizer = SVMOptimizer::with_kernel(LinearKernel::new());
        let samples = separable_samples();

        let model = optimizer
            .train_samples(&samples)
            .expect("Training should succeed");

        assert!(model.n_support_vectors() > 0);
        assert_eq!(model.alpha_values().len(), model.n_support_vectors());

        for sample in &samples {
            let prediction = model.predict(&sample.features);
            assert_eq!(prediction.label, sample.label);
        }
    }

    #[test]
    fn test_decision_function_ordering() {
        let optimizer = SVMOptimizer::with_kernel(LinearKernel::new());
        let model = optimizer
            .train_samples(&separable_samples())
            .expect("Training should succeed");

        let positive = model.decision_function(&SparseVector::from_dense(&[0.5]));
        let negative = model.decision_function(&SparseVector::from_dense(&[-0.5]));
        assert!(positive > negative);
    }

    #[test]
    fn test_from_parts_reproduces_model() {
        let optimizer = SVMOptimizer::with_kernel(LinearKernel::new());
        let samples = separable_samples();
        let model = optimizer
            .train_samples(&samples)
            .expect("Training should succeed");

        let rebuilt = TrainedSVM::from_parts(
            Arc::new(LinearKernel::new()),
            model.support_vectors().to_vec(),
            model.alpha_values().to_vec(),
            model.bias(),
        );

        for sample in &samples {
            assert_relative_eq!(
                model.decision_function(&sample.features),
                rebuilt.decision_function(&sample.features)
            );
        }
    }

    #[test]
    fn test_alpha_values_positive() {
        let optimizer = SVMOptimizer::with_kernel(LinearKernel::new());
        let model = optimizer
            .train_samples(&separable_samples())
            .expect("Training should succeed");

        for &alpha in model.alpha_values() {
            assert!(alpha > 0.0);
        }
    }
}
