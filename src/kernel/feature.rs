//! Kernels evaluated on training-set indices

use crate::core::{KernelFunction, Result, SVMError, SparseVector};
use crate::kernel::Kernel;

/// A [`Kernel`] bound to the feature vectors of a training set
///
/// Index `i` addresses `features[i]`, so the model's support-vector indices
/// are positions in this list.
#[derive(Debug, Clone)]
pub struct FeatureKernel<K: Kernel> {
    kernel: K,
    features: Vec<SparseVector>,
}

impl<K: Kernel> FeatureKernel<K> {
    /// Bind `kernel` to a list of feature vectors
    pub fn new(kernel: K, features: Vec<SparseVector>) -> Self {
        Self { kernel, features }
    }

    /// Number of feature vectors
    pub fn num_vectors(&self) -> usize {
        self.features.len()
    }

    /// The underlying vector kernel
    pub fn inner(&self) -> &K {
        &self.kernel
    }
}

impl<K: Kernel> KernelFunction for FeatureKernel<K> {
    fn kernel(&self, i: usize, j: usize) -> f64 {
        self.kernel.compute(&self.features[i], &self.features[j])
    }

    fn name(&self) -> &str {
        self.kernel.name()
    }
}

/// Precomputed kernel matrix stored row-major
#[derive(Debug, Clone, PartialEq)]
pub struct CustomKernel {
    matrix: Vec<f64>,
    n: usize,
}

impl CustomKernel {
    /// Build from square rows
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let n = rows.len();
        let mut matrix = Vec::with_capacity(n * n);
        for row in rows {
            if row.len() != n {
                return Err(SVMError::ShapeMismatch {
                    expected: n,
                    actual: row.len(),
                });
            }
            matrix.extend_from_slice(row);
        }
        Ok(Self { matrix, n })
    }

    /// Build a matrix with every entry set to `value`
    pub fn constant(n: usize, value: f64) -> Self {
        Self {
            matrix: vec![value; n * n],
            n,
        }
    }

    /// Side length of the matrix
    pub fn num_vectors(&self) -> usize {
        self.n
    }
}

impl KernelFunction for CustomKernel {
    /// # Panics
    ///
    /// Panics if `i` or `j` is not below [`CustomKernel::num_vectors`].
    fn kernel(&self, i: usize, j: usize) -> f64 {
        assert!(
            i < self.n && j < self.n,
            "kernel index ({}, {}) out of range for a {}x{} matrix",
            i,
            j,
            self.n,
            self.n
        );
        self.matrix[i * self.n + j]
    }

    fn name(&self) -> &str {
        "Custom"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::{LinearKernel, RBFKernel};

    #[test]
    fn test_feature_kernel_indexing() {
        let features = vec![
            SparseVector::from_dense(&[1.0, 2.0]),
            SparseVector::from_dense(&[3.0, 0.0]),
        ];
        let kernel = FeatureKernel::new(LinearKernel::new(), features);

        assert_eq!(kernel.num_vectors(), 2);
        assert_eq!(kernel.kernel(0, 0), 5.0);
        assert_eq!(kernel.kernel(0, 1), 3.0);
        assert_eq!(kernel.kernel(1, 0), 3.0);
        assert_eq!(KernelFunction::name(&kernel), "Linear");
    }

    #[test]
    fn test_feature_kernel_name_follows_inner() {
        let kernel = FeatureKernel::new(RBFKernel::new(0.5), Vec::new());
        assert_eq!(KernelFunction::name(&kernel), "Gaussian");
        assert_eq!(kernel.inner().gamma(), 0.5);
    }

    #[test]
    fn test_custom_kernel_lookup() {
        let kernel = CustomKernel::from_rows(&[vec![1.0, 0.5], vec![0.5, 2.0]]).unwrap();
        assert_eq!(kernel.num_vectors(), 2);
        assert_eq!(kernel.kernel(0, 1), 0.5);
        assert_eq!(kernel.kernel(1, 1), 2.0);
        assert_eq!(kernel.name(), "Custom");
    }

    #[test]
    fn test_custom_kernel_rejects_ragged_rows() {
        let err = CustomKernel::from_rows(&[vec![1.0, 0.5], vec![0.5]]).unwrap_err();
        assert!(matches!(
            err,
            SVMError::ShapeMismatch {
                expected: 2,
                actual: 1
            }
        ));
    }

    #[test]
    fn test_custom_kernel_constant() {
        let kernel = CustomKernel::constant(3, 1.0);
        assert_eq!(kernel.kernel(2, 0), 1.0);
    }

    #[test]
    #[should_panic(expected = "out of range for a 2x2 matrix")]
    fn test_custom_kernel_column_out_of_range() {
        let kernel = CustomKernel::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        kernel.kernel(0, 2);
    }
}
