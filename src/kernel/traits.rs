//! Kernel trait definition

use crate::core::SparseVector;

/// Kernel function K(x, y)
///
/// Implementations must satisfy Mercer's condition to be valid for SVM
/// training. Only the linear kernel is shipped; the trait is the seam for
/// anything else.
pub trait Kernel: Send + Sync {
    /// Compute kernel value K(x, y)
    fn compute(&self, x: &SparseVector, y: &SparseVector) -> f64;

    /// Short identifier stored in serialized models
    fn name(&self) -> &'static str;
}
