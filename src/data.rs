//! Contiguous dataset helpers.
//!
//! `Dataset` pairs an input matrix with a target matrix, one row per example.
//! Shuffling never reorders the storage: the training loop permutes an index
//! list and reads both matrices through it, so inputs and targets stay aligned.

use crate::error::ensure_len;
use crate::{Error, Matrix, Result};

/// A supervised dataset: inputs (X) and targets (Y).
#[derive(Debug, Clone)]
pub struct Dataset {
    inputs: Matrix,
    targets: Matrix,
}

impl Dataset {
    /// Build a dataset from per-example rows.
    ///
    /// `inputs.len()` must equal `targets.len()`, and rows within each side must
    /// all have the same length.
    pub fn from_rows(inputs: &[Vec<f64>], targets: &[Vec<f64>]) -> Result<Self> {
        ensure_len("dataset targets", inputs.len(), targets.len())?;
        if inputs.is_empty() {
            return Err(Error::InvalidData("dataset must not be empty".to_owned()));
        }

        Ok(Self {
            inputs: Matrix::from_rows(inputs)?,
            targets: Matrix::from_rows(targets)?,
        })
    }

    /// Build a dataset from flat row-major buffers.
    pub fn from_flat(
        inputs: Vec<f64>,
        targets: Vec<f64>,
        input_dim: usize,
        target_dim: usize,
    ) -> Result<Self> {
        Self::from_matrices(
            Matrix::from_flat(inputs, input_dim)?,
            Matrix::from_flat(targets, target_dim)?,
        )
    }

    pub fn from_matrices(inputs: Matrix, targets: Matrix) -> Result<Self> {
        ensure_len("dataset targets", inputs.rows(), targets.rows())?;
        if inputs.rows() == 0 {
            return Err(Error::InvalidData("dataset must not be empty".to_owned()));
        }
        Ok(Self { inputs, targets })
    }

    #[inline]
    /// Returns the number of examples.
    pub fn len(&self) -> usize {
        self.inputs.rows()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn input_dim(&self) -> usize {
        self.inputs.cols()
    }

    #[inline]
    pub fn target_dim(&self) -> usize {
        self.targets.cols()
    }

    #[inline]
    pub fn inputs(&self) -> &Matrix {
        &self.inputs
    }

    #[inline]
    pub fn targets(&self) -> &Matrix {
        &self.targets
    }

    /// Returns the `idx`-th input row.
    ///
    /// Panics if `idx >= len`.
    #[inline]
    pub fn input(&self, idx: usize) -> &[f64] {
        self.inputs.row(idx)
    }

    /// Returns the `idx`-th target row.
    ///
    /// Panics if `idx >= len`.
    #[inline]
    pub fn target(&self, idx: usize) -> &[f64] {
        self.targets.row(idx)
    }

    /// Copy the examples named by `indices`, in that order, into a batch.
    ///
    /// Panics if any index is out of bounds.
    pub fn gather(&self, indices: &[usize]) -> Result<(Matrix, Matrix)> {
        let mut xs = Vec::with_capacity(indices.len() * self.input_dim());
        let mut ys = Vec::with_capacity(indices.len() * self.target_dim());
        for &idx in indices {
            xs.extend_from_slice(self.input(idx));
            ys.extend_from_slice(self.target(idx));
        }
        Ok((
            Matrix::from_flat(xs, self.input_dim())?,
            Matrix::from_flat(ys, self.target_dim())?,
        ))
    }
}
