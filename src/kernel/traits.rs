//! Kernel trait definition

use crate::core::SparseVector;

/// Kernel function on feature vectors
///
/// A kernel function K(x, y) must satisfy Mercer's condition to be valid for SVM.
/// [`FeatureKernel`](crate::kernel::FeatureKernel) lifts an implementation of this
/// trait into the index space the model works in.
pub trait Kernel: Send + Sync {
    /// Compute kernel value K(x, y)
    fn compute(&self, x: &SparseVector, y: &SparseVector) -> f64;

    /// Name recorded in saved model files
    fn name(&self) -> &'static str;
}
