//! Trained kernel SVM
//!
//! [`Svm`] owns the support-vector arrays, the bias and the hyperparameters,
//! and holds shared handles to the kernel and label collaborators. Training
//! happens elsewhere: a solver fills the model through
//! [`Svm::create_new_model`] and the per-index setters, or a saved model is
//! restored with [`Svm::load`].
//!
//! ```rust
//! use std::sync::Arc;
//! use svmcore::{CustomKernel, Svm};
//!
//! # fn main() -> svmcore::Result<()> {
//! let mut svm = Svm::with_c_kernel_labels(
//!     1.0,
//!     Arc::new(CustomKernel::constant(2, 1.0)),
//!     Arc::new(vec![1.0, -1.0]),
//! );
//! svm.create_new_model(2)?;
//! for i in 0..2 {
//!     svm.set_support_vector(i, i as i32)?;
//!     svm.set_alpha(i, 1.0)?;
//! }
//! assert_eq!(svm.compute_svm_dual_objective()?, 2.0);
//! # Ok(())
//! # }
//! ```

use crate::core::{KernelFunction, Labels, Result, SVMError, SvmParams};
use crate::linear_term::LinearTerm;
use crate::mkl::{MklCallback, MklHook, MklOptimizer};
use crate::model::SupportVectorSet;
use log::debug;
use std::fmt;
use std::sync::Arc;

/// Kernel SVM model state
pub struct Svm {
    pub(crate) params: SvmParams,
    pub(crate) model: SupportVectorSet,
    pub(crate) bias: f64,
    pub(crate) objective: f64,
    pub(crate) loaded: bool,
    pub(crate) kernel: Option<Arc<dyn KernelFunction>>,
    pub(crate) labels: Option<Arc<dyn Labels>>,
    linear_term: LinearTerm,
    mkl: MklHook,
}

impl Svm {
    /// Create an empty SVM with default parameters
    pub fn new() -> Self {
        Self::with_params(SvmParams::default())
    }

    /// Create an empty SVM with the given parameters
    pub fn with_params(params: SvmParams) -> Self {
        Self {
            params,
            model: SupportVectorSet::new(),
            bias: 0.0,
            objective: 0.0,
            loaded: false,
            kernel: None,
            labels: None,
            linear_term: LinearTerm::new(),
            mkl: MklHook::new(),
        }
    }

    /// Create an SVM with room for `num_sv` support vectors
    pub fn with_num_sv(num_sv: usize) -> Result<Self> {
        let mut svm = Self::new();
        if num_sv > 0 {
            svm.create_new_model(num_sv)?;
        }
        Ok(svm)
    }

    /// Create an SVM with C1 = C2 = `c` and both collaborators attached
    pub fn with_c_kernel_labels(
        c: f64,
        kernel: Arc<dyn KernelFunction>,
        labels: Arc<dyn Labels>,
    ) -> Self {
        let mut svm = Self::new();
        svm.set_c(c, c);
        svm.set_labels(labels);
        svm.set_kernel(kernel);
        svm
    }

    // ----- support vectors -----

    /// Replace the model with `num_sv` zeroed support vectors
    pub fn create_new_model(&mut self, num_sv: usize) -> Result<()> {
        // release the old arrays before allocating the new ones
        self.model = SupportVectorSet::new();
        self.model = SupportVectorSet::allocate(num_sv)?;
        Ok(())
    }

    pub fn get_num_support_vectors(&self) -> usize {
        self.model.len()
    }

    pub fn get_support_vector(&self, i: usize) -> Result<i32> {
        self.model.support_vector(i)
    }

    pub fn get_alpha(&self, i: usize) -> Result<f64> {
        self.model.alpha(i)
    }

    pub fn set_support_vector(&mut self, i: usize, value: i32) -> Result<()> {
        self.model.set_support_vector(i, value)
    }

    pub fn set_alpha(&mut self, i: usize, value: f64) -> Result<()> {
        self.model.set_alpha(i, value)
    }

    /// Training-set indices of all support vectors
    pub fn support_vectors(&self) -> &[i32] {
        self.model.indices()
    }

    /// Alphas of all support vectors
    pub fn alphas(&self) -> &[f64] {
        self.model.alphas()
    }

    pub fn get_bias(&self) -> f64 {
        self.bias
    }

    pub fn set_bias(&mut self, bias: f64) {
        self.bias = bias;
    }

    // ----- hyperparameters -----

    pub fn params(&self) -> &SvmParams {
        &self.params
    }

    pub fn set_c(&mut self, c1: f64, c2: f64) {
        self.params.c1 = c1;
        self.params.c2 = c2;
    }

    pub fn get_c1(&self) -> f64 {
        self.params.c1
    }

    pub fn get_c2(&self) -> f64 {
        self.params.c2
    }

    pub fn set_epsilon(&mut self, epsilon: f64) {
        self.params.epsilon = epsilon;
    }

    pub fn get_epsilon(&self) -> f64 {
        self.params.epsilon
    }

    pub fn set_tube_epsilon(&mut self, tube_epsilon: f64) {
        self.params.tube_epsilon = tube_epsilon;
    }

    pub fn get_tube_epsilon(&self) -> f64 {
        self.params.tube_epsilon
    }

    pub fn set_nu(&mut self, nu: f64) {
        self.params.nu = nu;
    }

    pub fn get_nu(&self) -> f64 {
        self.params.nu
    }

    pub fn set_qpsize(&mut self, qpsize: i32) {
        self.params.qpsize = qpsize;
    }

    pub fn get_qpsize(&self) -> i32 {
        self.params.qpsize
    }

    pub fn set_bias_enabled(&mut self, enabled: bool) {
        self.params.use_bias = enabled;
    }

    pub fn get_bias_enabled(&self) -> bool {
        self.params.use_bias
    }

    pub fn set_shrinking_enabled(&mut self, enabled: bool) {
        self.params.use_shrinking = enabled;
    }

    pub fn get_shrinking_enabled(&self) -> bool {
        self.params.use_shrinking
    }

    pub fn set_batch_computation_enabled(&mut self, enabled: bool) {
        self.params.use_batch_computation = enabled;
    }

    pub fn get_batch_computation_enabled(&self) -> bool {
        self.params.use_batch_computation
    }

    pub fn set_linadd_enabled(&mut self, enabled: bool) {
        self.params.use_linadd = enabled;
    }

    pub fn get_linadd_enabled(&self) -> bool {
        self.params.use_linadd
    }

    /// Last value stored by [`Svm::compute_svm_dual_objective`] or a solver
    pub fn get_objective(&self) -> f64 {
        self.objective
    }

    pub fn set_objective(&mut self, objective: f64) {
        self.objective = objective;
    }

    /// Whether the model came from a successful [`Svm::load`]
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    // ----- collaborators -----

    pub fn set_kernel(&mut self, kernel: Arc<dyn KernelFunction>) {
        debug!("attaching kernel '{}'", kernel.name());
        self.kernel = Some(kernel);
    }

    pub fn kernel(&self) -> Option<&Arc<dyn KernelFunction>> {
        self.kernel.as_ref()
    }

    pub fn set_labels(&mut self, labels: Arc<dyn Labels>) {
        debug!("attaching {} labels", labels.num_labels());
        self.labels = Some(labels);
    }

    pub fn labels(&self) -> Option<&Arc<dyn Labels>> {
        self.labels.as_ref()
    }

    /// Label of training example `i`
    pub fn get_label(&self, i: usize) -> Result<f64> {
        let labels = self
            .labels
            .as_ref()
            .ok_or_else(|| SVMError::PreconditionError("labels not set".to_string()))?;
        if i >= labels.num_labels() {
            return Err(SVMError::IndexOutOfRange {
                index: i as i64,
                len: labels.num_labels(),
            });
        }
        Ok(labels.label(i))
    }

    // ----- linear term -----

    /// Set the QP linear term, or clear it with `None` / an empty slice
    pub fn set_linear_term(&mut self, values: Option<&[f64]>) -> Result<()> {
        self.linear_term.set(values, self.labels.as_deref())
    }

    /// Copy of the linear term, `None` when unset
    pub fn get_linear_term_array(&self) -> Option<Vec<f64>> {
        self.linear_term.to_array()
    }

    /// Mutable view of the linear term storage
    ///
    /// Meant for a QP solver that updates the term in place. The slice is
    /// empty when no linear term is set.
    pub fn get_linear_term_ptr(&mut self) -> &mut [f64] {
        self.linear_term.as_mut_slice()
    }

    // ----- MKL -----

    /// Register the MKL optimizer and the callback a solver loop should run
    pub fn set_callback_function(
        &mut self,
        mkl: Option<Arc<dyn MklOptimizer>>,
        callback: Option<MklCallback>,
    ) {
        debug!(
            "registering mkl callback (optimizer: {}, callback: {})",
            mkl.is_some(),
            callback.is_some()
        );
        self.mkl.register(mkl, callback);
    }

    pub fn mkl_hook(&self) -> &MklHook {
        &self.mkl
    }
}

impl Default for Svm {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Svm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Svm")
            .field("params", &self.params)
            .field("num_sv", &self.model.len())
            .field("bias", &self.bias)
            .field("objective", &self.objective)
            .field("loaded", &self.loaded)
            .field("kernel", &self.kernel.as_ref().map(|k| k.name().to_string()))
            .field("labels", &self.labels.as_ref().map(|l| l.num_labels()))
            .field("linear_term", &self.linear_term.len())
            .field("mkl", &self.mkl)
            .finish()
    }
}
