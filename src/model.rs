//! Support-vector storage
//!
//! Support-vector indices and their dual coefficients live in two parallel
//! arrays. They are only ever allocated together, so position `i` in one
//! always refers to the same support vector as position `i` in the other.

use crate::core::{Result, SVMError};

/// Support-vector indices paired with their alphas
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SupportVectorSet {
    indices: Vec<i32>,
    alpha: Vec<f64>,
}

impl SupportVectorSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate `n` zero-initialized support vectors
    pub fn allocate(n: usize) -> Result<Self> {
        let mut indices = Vec::new();
        let mut alpha = Vec::new();
        indices
            .try_reserve_exact(n)
            .map_err(|_| SVMError::AllocationError(n))?;
        alpha
            .try_reserve_exact(n)
            .map_err(|_| SVMError::AllocationError(n))?;
        indices.resize(n, 0);
        alpha.resize(n, 0.0);
        Ok(Self { indices, alpha })
    }

    /// Number of support vectors
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Check if the set holds no support vectors
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Training-set index of support vector `i`
    pub fn support_vector(&self, i: usize) -> Result<i32> {
        self.check(i)?;
        Ok(self.indices[i])
    }

    /// Dual coefficient of support vector `i`
    pub fn alpha(&self, i: usize) -> Result<f64> {
        self.check(i)?;
        Ok(self.alpha[i])
    }

    pub fn set_support_vector(&mut self, i: usize, value: i32) -> Result<()> {
        self.check(i)?;
        self.indices[i] = value;
        Ok(())
    }

    pub fn set_alpha(&mut self, i: usize, value: f64) -> Result<()> {
        self.check(i)?;
        self.alpha[i] = value;
        Ok(())
    }

    /// All support-vector indices in order
    pub fn indices(&self) -> &[i32] {
        &self.indices
    }

    /// All alphas in support-vector order
    pub fn alphas(&self) -> &[f64] {
        &self.alpha
    }

    /// Iterate over `(alpha, index)` pairs in support-vector order
    pub fn iter(&self) -> impl Iterator<Item = (f64, i32)> + '_ {
        self.alpha.iter().copied().zip(self.indices.iter().copied())
    }

    fn check(&self, i: usize) -> Result<()> {
        if i < self.indices.len() {
            Ok(())
        } else {
            Err(SVMError::IndexOutOfRange {
                index: i as i64,
                len: self.indices.len(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocate_zero_initialized() {
        let set = SupportVectorSet::allocate(4).unwrap();
        assert_eq!(set.len(), 4);
        assert_eq!(set.indices(), &[0, 0, 0, 0]);
        assert_eq!(set.alphas(), &[0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_allocate_empty() {
        let set = SupportVectorSet::allocate(0).unwrap();
        assert!(set.is_empty());
        assert_eq!(set, SupportVectorSet::new());
    }

    #[test]
    fn test_set_and_get() {
        let mut set = SupportVectorSet::allocate(3).unwrap();
        set.set_support_vector(1, 42).unwrap();
        set.set_alpha(1, -0.25).unwrap();

        assert_eq!(set.support_vector(1).unwrap(), 42);
        assert_eq!(set.alpha(1).unwrap(), -0.25);
        assert_eq!(set.support_vector(0).unwrap(), 0);

        let pairs: Vec<_> = set.iter().collect();
        assert_eq!(pairs, vec![(0.0, 0), (-0.25, 42), (0.0, 0)]);
    }

    #[test]
    fn test_out_of_range() {
        let mut set = SupportVectorSet::allocate(2).unwrap();

        assert!(matches!(
            set.alpha(2),
            Err(SVMError::IndexOutOfRange { index: 2, len: 2 })
        ));
        assert!(set.support_vector(5).is_err());
        assert!(set.set_alpha(2, 1.0).is_err());
        assert!(set.set_support_vector(2, 1).is_err());
    }

    #[test]
    fn test_allocation_failure() {
        let err = SupportVectorSet::allocate(usize::MAX).unwrap_err();
        assert!(matches!(err, SVMError::AllocationError(_)));
    }
}
