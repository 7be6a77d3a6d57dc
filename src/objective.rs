//! Dual and primal SVM objectives
//!
//! Both routines sum in natural index order (support vector `i` outer,
//! `j` inner) into a single accumulator, so results are reproducible bit
//! for bit for a fixed kernel, label set and alpha vector. Kernel values
//! are requested on every use; caching belongs to the kernel.

use crate::core::{Classifier, KernelFunction, Labels, Result, SVMError};
use crate::svm::Svm;
use std::sync::Arc;

impl Svm {
    /// Compute the dual objective and store it as the current objective
    ///
    /// `Σ_i -α_i y_i + Σ_i Σ_j ½ α_i α_j K(i, j)` over the support vectors.
    pub fn compute_svm_dual_objective(&mut self) -> Result<f64> {
        let (kernel, labels) = self.collaborators()?;
        let positions = self.support_vector_positions(Some(labels.num_labels()))?;
        let alphas = self.model.alphas();

        let mut objective = 0.0;
        for (i, &ii) in positions.iter().enumerate() {
            objective -= alphas[i] * labels.label(ii);

            for (j, &jj) in positions.iter().enumerate() {
                objective += 0.5 * alphas[i] * alphas[j] * kernel.kernel(ii, jj);
            }
        }

        self.objective = objective;
        Ok(objective)
    }

    /// Compute the primal objective using this model's own decision function
    ///
    /// The stored objective is left untouched.
    pub fn compute_svm_primal_objective(&self) -> Result<f64> {
        let (kernel, labels) = self.collaborators()?;
        let positions = self.support_vector_positions(Some(labels.num_labels()))?;

        let classifier =
            |example: usize| self.decision_value(kernel.as_ref(), &positions, example);

        Ok(self.primal_objective(kernel.as_ref(), labels.as_ref(), &positions, &classifier))
    }

    /// Compute the primal objective with an external decision function
    ///
    /// `regularizer = Σ_i Σ_j -½ α_i α_j K(i, j)` and
    /// `loss = Σ_i -C1 max(0, 1 - y_i f(x_i))`; returns their sum without
    /// storing it.
    pub fn compute_svm_primal_objective_with<C>(&self, classifier: &C) -> Result<f64>
    where
        C: Classifier + ?Sized,
    {
        let (kernel, labels) = self.collaborators()?;
        let positions = self.support_vector_positions(Some(labels.num_labels()))?;

        Ok(self.primal_objective(kernel.as_ref(), labels.as_ref(), &positions, classifier))
    }

    /// Decision value `Σ_j α_j K(idx_j, i) + b` for training example `i`
    ///
    /// When labels are attached, `i` and every support-vector index must
    /// address one of them.
    pub fn classify_example(&self, i: usize) -> Result<f64> {
        let kernel = self
            .kernel
            .as_ref()
            .ok_or_else(|| SVMError::PreconditionError("no kernel defined".to_string()))?;
        let num_examples = self.labels.as_ref().map(|labels| labels.num_labels());

        if let Some(len) = num_examples {
            if i >= len {
                return Err(SVMError::IndexOutOfRange { index: i as i64, len });
            }
        }
        let positions = self.support_vector_positions(num_examples)?;

        Ok(self.decision_value(kernel.as_ref(), &positions, i))
    }

    fn primal_objective<C>(
        &self,
        kernel: &dyn KernelFunction,
        labels: &dyn Labels,
        positions: &[usize],
        classifier: &C,
    ) -> f64
    where
        C: Classifier + ?Sized,
    {
        let alphas = self.model.alphas();
        let c1 = self.params.c1;

        let mut regularizer = 0.0;
        let mut loss = 0.0;
        for (i, &ii) in positions.iter().enumerate() {
            for (j, &jj) in positions.iter().enumerate() {
                regularizer -= 0.5 * alphas[i] * alphas[j] * kernel.kernel(ii, jj);
            }

            loss -= c1 * (1.0 - labels.label(ii) * classifier.classify(ii)).max(0.0);
        }

        regularizer + loss
    }

    fn decision_value(
        &self,
        kernel: &dyn KernelFunction,
        positions: &[usize],
        example: usize,
    ) -> f64 {
        positions
            .iter()
            .zip(self.model.alphas())
            .map(|(&sv, &alpha)| alpha * kernel.kernel(sv, example))
            .sum::<f64>()
            + self.bias
    }

    fn collaborators(&self) -> Result<(Arc<dyn KernelFunction>, Arc<dyn Labels>)> {
        match (&self.kernel, &self.labels) {
            (Some(kernel), Some(labels)) => Ok((Arc::clone(kernel), Arc::clone(labels))),
            _ => Err(SVMError::PreconditionError(
                "cannot compute objective, labels or kernel not set".to_string(),
            )),
        }
    }

    /// Support-vector indices as training-set positions
    ///
    /// Every index must be non-negative and, when `num_examples` is known,
    /// below it.
    fn support_vector_positions(&self, num_examples: Option<usize>) -> Result<Vec<usize>> {
        let len = num_examples.unwrap_or(usize::MAX);
        self.model
            .indices()
            .iter()
            .map(|&idx| match usize::try_from(idx) {
                Ok(position) if position < len => Ok(position),
                _ => Err(SVMError::IndexOutOfRange {
                    index: i64::from(idx),
                    len: num_examples.unwrap_or(self.model.len()),
                }),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SparseVector;
    use crate::kernel::{CustomKernel, FeatureKernel, LinearKernel};
    use approx::assert_relative_eq;

    fn two_sv_model() -> Svm {
        let mut svm = Svm::with_c_kernel_labels(
            1.0,
            Arc::new(CustomKernel::constant(2, 1.0)),
            Arc::new(vec![1.0, -1.0]),
        );
        svm.create_new_model(2).unwrap();
        for i in 0..2 {
            svm.set_support_vector(i, i as i32).unwrap();
            svm.set_alpha(i, 1.0).unwrap();
        }
        svm
    }

    #[test]
    fn test_dual_objective_unit_kernel() {
        let mut svm = two_sv_model();
        let objective = svm.compute_svm_dual_objective().unwrap();
        assert_eq!(objective, 2.0);
        assert_eq!(svm.get_objective(), 2.0);
    }

    #[test]
    fn test_dual_objective_requires_collaborators() {
        let mut svm = Svm::with_num_sv(1).unwrap();
        assert!(matches!(
            svm.compute_svm_dual_objective(),
            Err(SVMError::PreconditionError(_))
        ));

        svm.set_labels(Arc::new(vec![1.0]));
        assert!(svm.compute_svm_dual_objective().is_err());
        assert!(svm.compute_svm_primal_objective().is_err());
    }

    #[test]
    fn test_dual_objective_empty_model() {
        let mut svm = two_sv_model();
        svm.create_new_model(0).unwrap();
        svm.set_objective(5.0);
        assert_eq!(svm.compute_svm_dual_objective().unwrap(), 0.0);
        assert_eq!(svm.get_objective(), 0.0);
    }

    #[test]
    fn test_primal_objective_external_classifier() {
        let svm = two_sv_model();
        // regularizer = -0.5 * 4 = -2; margins: 1*0.5 and -1*0.5
        // loss = -(0.5) - (1.5) = -2
        let classifier = |_: usize| 0.5;
        let objective = svm.compute_svm_primal_objective_with(&classifier).unwrap();
        assert_eq!(objective, -4.0);
    }

    #[test]
    fn test_primal_objective_does_not_store() {
        let mut svm = two_sv_model();
        svm.set_objective(7.0);
        svm.compute_svm_primal_objective().unwrap();
        assert_eq!(svm.get_objective(), 7.0);
    }

    #[test]
    fn test_primal_objective_scales_loss_with_c1() {
        let mut svm = two_sv_model();
        svm.set_c(3.0, 1.0);
        let classifier = |_: usize| 0.0;
        // regularizer -2, loss -3 * (1 + 1)
        let objective = svm.compute_svm_primal_objective_with(&classifier).unwrap();
        assert_eq!(objective, -8.0);
    }

    #[test]
    fn test_classify_example() {
        let features = vec![
            SparseVector::from_dense(&[1.0, 0.0]),
            SparseVector::from_dense(&[0.0, 2.0]),
            SparseVector::from_dense(&[1.0, 1.0]),
        ];
        let mut svm = Svm::with_c_kernel_labels(
            1.0,
            Arc::new(FeatureKernel::new(LinearKernel::new(), features)),
            Arc::new(vec![1.0, -1.0, 1.0]),
        );
        svm.create_new_model(2).unwrap();
        svm.set_support_vector(0, 0).unwrap();
        svm.set_alpha(0, 0.5).unwrap();
        svm.set_support_vector(1, 1).unwrap();
        svm.set_alpha(1, -0.25).unwrap();
        svm.set_bias(0.1);

        // 0.5 * 1 - 0.25 * 2 + 0.1
        assert_relative_eq!(svm.classify_example(2).unwrap(), 0.1, epsilon = 1e-12);
    }

    #[test]
    fn test_primal_matches_own_classifier() {
        let mut svm = two_sv_model();
        svm.set_bias(-0.5);

        let own = svm.compute_svm_primal_objective().unwrap();
        let external = |i: usize| svm.classify_example(i).unwrap();
        let with_external = svm.compute_svm_primal_objective_with(&external).unwrap();
        assert_relative_eq!(own, with_external);
    }

    #[test]
    fn test_negative_support_vector_index() {
        let mut svm = two_sv_model();
        svm.set_support_vector(1, -3).unwrap();
        assert!(matches!(
            svm.compute_svm_dual_objective(),
            Err(SVMError::IndexOutOfRange { index: -3, .. })
        ));
    }

    #[test]
    fn test_support_vector_index_beyond_labels() {
        let mut svm = two_sv_model();
        svm.set_support_vector(1, 7).unwrap();

        for result in [
            svm.compute_svm_primal_objective(),
            svm.compute_svm_primal_objective_with(&|_: usize| 0.0),
            svm.classify_example(0),
            svm.compute_svm_dual_objective(),
        ] {
            assert!(matches!(
                result,
                Err(SVMError::IndexOutOfRange { index: 7, len: 2 })
            ));
        }
        assert_eq!(svm.get_objective(), 0.0);
    }

    #[test]
    fn test_classify_example_beyond_labels() {
        let svm = two_sv_model();
        assert!(matches!(
            svm.classify_example(2),
            Err(SVMError::IndexOutOfRange { index: 2, len: 2 })
        ));
    }

    #[test]
    fn test_classify_example_without_labels() {
        let mut svm = Svm::with_num_sv(1).unwrap();
        svm.set_kernel(Arc::new(CustomKernel::constant(3, 2.0)));
        svm.set_alpha(0, 0.5).unwrap();
        svm.set_bias(1.0);
        assert_eq!(svm.classify_example(2).unwrap(), 2.0);
    }
}
