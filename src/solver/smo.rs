//! Sequential Minimal Optimization (SMO) solver
//!
//! Solves the binary SVM dual problem by repeatedly optimizing pairs of
//! Lagrange multipliers. Working set selection is deterministic (second
//! choice heuristic with ordered fallback scans), so training the same data
//! with the same configuration always yields the same model.

use crate::cache::KernelCache;
use crate::core::{ClfError, OptimizationResult, OptimizerConfig, Result, Sample};
use crate::kernel::Kernel;
use log::debug;
use std::sync::Arc;

/// SMO solver for the binary SVM dual problem
pub struct SMOSolver<K: Kernel> {
    kernel: Arc<K>,
    config: OptimizerConfig,
}

impl<K: Kernel> SMOSolver<K> {
    pub fn new(kernel: Arc<K>, config: OptimizerConfig) -> Self {
        Self { kernel, config }
    }

    /// Solve the dual problem for the given binary samples
    pub fn solve(&self, samples: &[Sample]) -> Result<OptimizationResult> {
        if samples.is_empty() {
            return Err(ClfError::EmptyDataset);
        }
        for sample in samples {
            if sample.label != 1.0 && sample.label != -1.0 {
                return Err(ClfError::InvalidLabel(sample.label));
            }
        }

        let mut state = SolverState::new(&*self.kernel, samples, &self.config);

        let mut iterations = 0;
        let mut num_changed = 0;
        let mut examine_all = true;

        while (num_changed > 0 || examine_all) && iterations < self.config.max_iterations {
            num_changed = 0;

            if examine_all {
                for i in 0..samples.len() {
                    if state.examine(i) {
                        num_changed += 1;
                    }
                }
            } else {
                for i in 0..samples.len() {
                    if state.is_unbound(i) && state.examine(i) {
                        num_changed += 1;
                    }
                }
            }

            if examine_all {
                examine_all = false;
            } else if num_changed == 0 {
                examine_all = true;
            }

            iterations += 1;
        }

        let support_vectors: Vec<usize> = state
            .alpha
            .iter()
            .enumerate()
            .filter(|(_, &a)| a > 0.0)
            .map(|(i, _)| i)
            .collect();

        debug!(
            "SMO converged after {} iterations with {} support vectors",
            iterations,
            support_vectors.len()
        );

        Ok(OptimizationResult {
            alpha: state.alpha,
            b: state.b,
            support_vectors,
            iterations,
        })
    }
}

/// Mutable optimization state for one solve
struct SolverState<'a, K: Kernel> {
    kernel: &'a K,
    samples: &'a [Sample],
    c: f64,
    tolerance: f64,
    alpha: Vec<f64>,
    b: f64,
    /// Error cache: E_i = f(x_i) - y_i. All alphas start at zero, so E_i = -y_i.
    errors: Vec<f64>,
    cache: KernelCache,
}

impl<'a, K: Kernel> SolverState<'a, K> {
    fn new(kernel: &'a K, samples: &'a [Sample], config: &OptimizerConfig) -> Self {
        Self {
            kernel,
            samples,
            c: config.c,
            tolerance: config.epsilon,
            alpha: vec![0.0; samples.len()],
            b: 0.0,
            errors: samples.iter().map(|s| -s.label).collect(),
            cache: KernelCache::with_memory_limit(config.cache_size),
        }
    }

    fn is_unbound(&self, i: usize) -> bool {
        self.alpha[i] > 0.0 && self.alpha[i] < self.c
    }

    fn kernel_value(&mut self, i: usize, j: usize) -> f64 {
        if let Some(value) = self.cache.get(i, j) {
            return value;
        }
        let value = self
            .kernel
            .compute(&self.samples[i].features, &self.samples[j].features);
        self.cache.put(i, j, value);
        value
    }

    /// Examine one sample for a KKT violation and try to optimize it
    fn examine(&mut self, i2: usize) -> bool {
        let y2 = self.samples[i2].label;
        let alpha2 = self.alpha[i2];
        let e2 = self.errors[i2];
        let r2 = e2 * y2;

        let violates = (r2 < -self.tolerance && alpha2 < self.c)
            || (r2 > self.tolerance && alpha2 > 0.0);
        if !violates {
            return false;
        }

        // Second choice heuristic: the unbound partner with maximal |E1 - E2|
        if let Some(i1) = self.best_partner(i2, e2) {
            if self.take_step(i1, i2) {
                return true;
            }
        }

        // Fallback: scan unbound alphas, then everything, in index order
        for i1 in 0..self.samples.len() {
            if self.is_unbound(i1) && self.take_step(i1, i2) {
                return true;
            }
        }
        for i1 in 0..self.samples.len() {
            if self.take_step(i1, i2) {
                return true;
            }
        }

        false
    }

    fn best_partner(&self, i2: usize, e2: f64) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for i in 0..self.samples.len() {
            if i == i2 || !self.is_unbound(i) {
                continue;
            }
            let gap = (self.errors[i] - e2).abs();
            if best.map_or(true, |(_, g)| gap > g) {
                best = Some((i, gap));
            }
        }
        best.map(|(i, _)| i)
    }

    /// Jointly optimize the pair (i1, i2); returns true on progress
    fn take_step(&mut self, i1: usize, i2: usize) -> bool {
        if i1 == i2 {
            return false;
        }

        let alpha1 = self.alpha[i1];
        let alpha2 = self.alpha[i2];
        let y1 = self.samples[i1].label;
        let y2 = self.samples[i2].label;
        let e1 = self.errors[i1];
        let e2 = self.errors[i2];
        let s = y1 * y2;

        // Feasible segment for the new alpha2
        let (low, high) = if s < 0.0 {
            (
                (alpha2 - alpha1).max(0.0),
                (self.c + alpha2 - alpha1).min(self.c),
            )
        } else {
            (
                (alpha2 + alpha1 - self.c).max(0.0),
                (alpha2 + alpha1).min(self.c),
            )
        };
        if high - low < f64::EPSILON {
            return false;
        }

        let k11 = self.kernel_value(i1, i1);
        let k12 = self.kernel_value(i1, i2);
        let k22 = self.kernel_value(i2, i2);

        // Second derivative of the objective along the constraint line.
        // Non-positive eta only occurs for duplicate points under a linear
        // kernel; skipping the pair is safe there.
        let eta = k11 + k22 - 2.0 * k12;
        if eta <= 0.0 {
            return false;
        }

        let mut a2 = alpha2 + y2 * (e1 - e2) / eta;
        a2 = a2.clamp(low, high);

        if (a2 - alpha2).abs() < self.tolerance * (a2 + alpha2 + self.tolerance) {
            return false;
        }

        let a1 = alpha1 + s * (alpha2 - a2);
        let da1 = a1 - alpha1;
        let da2 = a2 - alpha2;

        // Bias update keeping the KKT conditions on the optimized pair
        let b1 = self.b - e1 - y1 * da1 * k11 - y2 * da2 * k12;
        let b2 = self.b - e2 - y1 * da1 * k12 - y2 * da2 * k22;
        let b_new = if a1 > 0.0 && a1 < self.c {
            b1
        } else if a2 > 0.0 && a2 < self.c {
            b2
        } else {
            (b1 + b2) / 2.0
        };
        let db = b_new - self.b;

        // Incremental error cache update for every sample
        for k in 0..self.samples.len() {
            let k1 = self.kernel_value(i1, k);
            let k2 = self.kernel_value(i2, k);
            self.errors[k] += y1 * da1 * k1 + y2 * da2 * k2 + db;
        }

        self.alpha[i1] = a1;
        self.alpha[i2] = a2;
        self.b = b_new;

        true
    }
}
