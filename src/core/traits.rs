//! Collaborator traits consumed by the SVM model core
//!
//! The model never owns training data. Everything it needs from the
//! outside world is pulled through these three interfaces, all of which
//! address training examples by their position in the training set.

/// Kernel evaluated on training-set indices
pub trait KernelFunction {
    /// Compute K(i, j) for training examples `i` and `j`
    fn kernel(&self, i: usize, j: usize) -> f64;

    /// Name written into the model file header
    ///
    /// Must not contain a single quote.
    fn name(&self) -> &str;
}

/// Label lookup for the training set
pub trait Labels {
    /// Label of training example `i`
    ///
    /// # Panics
    /// May panic if `i >= num_labels()`
    fn label(&self, i: usize) -> f64;

    /// Number of labels in the training set
    fn num_labels(&self) -> usize;
}

/// Decision function evaluated on training-set indices
pub trait Classifier {
    /// Raw decision value for training example `i`
    fn classify(&self, i: usize) -> f64;
}

impl Labels for Vec<f64> {
    fn label(&self, i: usize) -> f64 {
        self[i]
    }

    fn num_labels(&self) -> usize {
        self.len()
    }
}

impl<F> Classifier for F
where
    F: Fn(usize) -> f64,
{
    fn classify(&self, i: usize) -> f64 {
        self(i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec_labels() {
        let labels = vec![1.0, -1.0, 1.0];
        assert_eq!(labels.num_labels(), 3);
        assert_eq!(labels.label(1), -1.0);
    }

    #[test]
    fn test_closure_classifier() {
        let classifier = |i: usize| i as f64 * 0.5;
        assert_eq!(classifier.classify(4), 2.0);
    }
}
