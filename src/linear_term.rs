//! Linear term of the QP objective
//!
//! Cost-sensitive and custom-loss formulations replace the constant `-1`
//! linear term of the SVM dual with a per-example vector. The vector is
//! either empty or exactly as long as the attached label set.

use crate::core::{Labels, Result, SVMError};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinearTerm {
    values: Vec<f64>,
}

impl LinearTerm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the stored vector with a copy of `values`
    ///
    /// `None` or an empty slice clears the vector and always succeeds.
    /// Otherwise `labels` must be present and hold exactly `values.len()`
    /// labels.
    pub fn set(&mut self, values: Option<&[f64]>, labels: Option<&dyn Labels>) -> Result<()> {
        let values = match values {
            Some(v) if !v.is_empty() => v,
            _ => {
                self.values = Vec::new();
                return Ok(());
            }
        };

        let labels = labels
            .ok_or_else(|| SVMError::PreconditionError("labels not set".to_string()))?;

        let num_labels = labels.num_labels();
        if num_labels != values.len() {
            return Err(SVMError::ShapeMismatch {
                expected: num_labels,
                actual: values.len(),
            });
        }

        self.values = values.to_vec();
        Ok(())
    }

    /// Copy of the stored vector, `None` when empty
    pub fn to_array(&self) -> Option<Vec<f64>> {
        if self.values.is_empty() {
            None
        } else {
            Some(self.values.clone())
        }
    }

    /// Mutable view of the stored vector for the QP solver
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
