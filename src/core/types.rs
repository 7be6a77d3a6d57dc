//! Core type definitions for the SVM model

use crate::core::{Result, SVMError};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Sparse vector representation with sorted indices
#[derive(Clone, Debug, PartialEq)]
pub struct SparseVector {
    /// Sorted indices of non-zero elements
    pub indices: Vec<usize>,
    /// Values corresponding to indices
    pub values: Vec<f64>,
}

impl SparseVector {
    /// Create a new sparse vector, sorting the entries by index
    pub fn new(indices: Vec<usize>, values: Vec<f64>) -> Self {
        assert_eq!(
            indices.len(),
            values.len(),
            "Indices and values must have same length"
        );

        let mut pairs: Vec<_> = indices.into_iter().zip(values).collect();
        pairs.sort_by_key(|&(idx, _)| idx);

        let (indices, values): (Vec<_>, Vec<_>) = pairs.into_iter().unzip();
        Self { indices, values }
    }

    /// Build from a dense slice, dropping zeros
    pub fn from_dense(dense: &[f64]) -> Self {
        let (indices, values) = dense
            .iter()
            .enumerate()
            .filter(|&(_, &v)| v != 0.0)
            .map(|(i, &v)| (i, v))
            .unzip();
        Self { indices, values }
    }

    /// Compute squared L2 norm
    pub fn norm_squared(&self) -> f64 {
        self.values.iter().map(|&v| v * v).sum()
    }

    /// Number of non-zero elements
    pub fn nnz(&self) -> usize {
        self.indices.len()
    }
}

/// SVM hyperparameters
///
/// Defaults follow the classic SVMlight-style settings. Missing fields in a
/// JSON configuration fall back to these defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SvmParams {
    /// Box constraint for positive examples
    pub c1: f64,
    /// Box constraint for negative examples
    pub c2: f64,
    /// Convergence tolerance
    pub epsilon: f64,
    /// Tube width for support vector regression
    pub tube_epsilon: f64,
    /// Nu parameter for nu-SVM variants
    pub nu: f64,
    /// Size of the QP subproblems (chunk size)
    pub qpsize: i32,
    /// Train with a bias term
    pub use_bias: bool,
    /// Enable shrinking heuristic
    pub use_shrinking: bool,
    /// Compute outputs in batch mode
    pub use_batch_computation: bool,
    /// Use linadd speedups in the kernel
    pub use_linadd: bool,
}

impl Default for SvmParams {
    fn default() -> Self {
        Self {
            c1: 1.0,
            c2: 1.0,
            epsilon: 1e-5,
            tube_epsilon: 1e-2,
            nu: 0.5,
            qpsize: 41,
            use_bias: true,
            use_shrinking: true,
            use_batch_computation: true,
            use_linadd: true,
        }
    }
}

impl SvmParams {
    /// Set both box constraints to the same value
    pub fn with_c(mut self, c: f64) -> Self {
        self.c1 = c;
        self.c2 = c;
        self
    }

    /// Set asymmetric box constraints
    pub fn with_c_pair(mut self, c1: f64, c2: f64) -> Self {
        self.c1 = c1;
        self.c2 = c2;
        self
    }

    /// Set convergence tolerance
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Set regression tube width
    pub fn with_tube_epsilon(mut self, tube_epsilon: f64) -> Self {
        self.tube_epsilon = tube_epsilon;
        self
    }

    /// Set nu
    pub fn with_nu(mut self, nu: f64) -> Self {
        self.nu = nu;
        self
    }

    /// Set QP chunk size
    pub fn with_qpsize(mut self, qpsize: i32) -> Self {
        self.qpsize = qpsize;
        self
    }

    /// Check that every value is usable by a solver
    pub fn validate(&self) -> Result<()> {
        if !(self.c1 > 0.0 && self.c2 > 0.0) {
            return Err(SVMError::InvalidParameter(format!(
                "C must be positive, got C1={} C2={}",
                self.c1, self.c2
            )));
        }
        if !(self.epsilon >= 0.0) || !(self.tube_epsilon >= 0.0) {
            return Err(SVMError::InvalidParameter(format!(
                "epsilon and tube_epsilon must be non-negative, got {} and {}",
                self.epsilon, self.tube_epsilon
            )));
        }
        if !(self.nu > 0.0 && self.nu <= 1.0) {
            return Err(SVMError::InvalidParameter(format!(
                "nu must be in (0, 1], got {}",
                self.nu
            )));
        }
        if self.qpsize < 2 {
            return Err(SVMError::InvalidParameter(format!(
                "qpsize must be at least 2, got {}",
                self.qpsize
            )));
        }
        Ok(())
    }

    /// Parse and validate parameters from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self> {
        let params: SvmParams = serde_json::from_str(json)?;
        params.validate()?;
        Ok(params)
    }

    /// Load and validate parameters from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path).map_err(SVMError::IoError)?;
        let params: SvmParams = serde_json::from_reader(BufReader::new(file))?;
        params.validate()?;
        Ok(params)
    }

    /// Write parameters to a JSON file
    pub fn to_json_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path).map_err(SVMError::IoError)?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        Ok(())
    }
}
