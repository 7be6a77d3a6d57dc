//! Kernel Support Vector Machine model core
//!
//! Holds a trained SVM (support vectors, alphas, bias, hyperparameters),
//! stores and restores it in a plain-text model format, and evaluates the
//! dual and primal objectives against externally supplied kernel, label and
//! classifier collaborators.

pub mod core;
pub mod kernel;
pub mod linear_term;
pub mod mkl;
pub mod model;
pub mod objective;
pub mod persistence;
pub mod svm;

// Re-export main types for convenience
pub use crate::core::traits::*;
pub use crate::core::types::*;
pub use crate::core::{Result, SVMError};
pub use crate::kernel::{CustomKernel, FeatureKernel, Kernel, LinearKernel, RBFKernel};
pub use crate::linear_term::LinearTerm;
pub use crate::mkl::{perform_mkl_step_callback, MklCallback, MklHook, MklOptimizer};
pub use crate::model::SupportVectorSet;
pub use crate::svm::Svm;

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
