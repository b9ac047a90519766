//! Vector and matrix primitives.
//!
//! Everything here is a pure function over `f64` slices, apart from [`Matrix`],
//! a small row-major container used for batched forward/backward passes.
//!
//! Length checks return [`Error::DimensionMismatch`] rather than panicking: a
//! mismatch means the caller wired shapes incorrectly and should hear about it.

use crate::error::ensure_len;
use crate::{Error, Result};

/// Dot product `Σ a_i * b_i`.
#[inline]
pub fn dot(a: &[f64], b: &[f64]) -> Result<f64> {
    ensure_len("dot product", a.len(), b.len())?;
    let mut sum = 0.0;
    for (&x, &y) in a.iter().zip(b) {
        sum += x * y;
    }
    Ok(sum)
}

/// Element-wise `a + b`.
pub fn vector_add(a: &[f64], b: &[f64]) -> Result<Vec<f64>> {
    ensure_len("vector add", a.len(), b.len())?;
    Ok(a.iter().zip(b).map(|(&x, &y)| x + y).collect())
}

/// Element-wise `a - b`.
pub fn vector_subtract(a: &[f64], b: &[f64]) -> Result<Vec<f64>> {
    ensure_len("vector subtract", a.len(), b.len())?;
    Ok(a.iter().zip(b).map(|(&x, &y)| x - y).collect())
}

/// Euclidean distance between two points.
pub fn distance(a: &[f64], b: &[f64]) -> Result<f64> {
    ensure_len("distance", a.len(), b.len())?;
    let mut sum = 0.0;
    for (&x, &y) in a.iter().zip(b) {
        let diff = x - y;
        sum += diff * diff;
    }
    Ok(sum.sqrt())
}

/// Scale `v` to unit Euclidean length in place.
///
/// A zero vector has no direction and is left untouched.
pub fn normalize(v: &mut [f64]) {
    let magnitude = v.iter().map(|x| x * x).sum::<f64>().sqrt();
    if magnitude == 0.0 {
        return;
    }
    for x in v.iter_mut() {
        *x /= magnitude;
    }
}

/// Softmax over `scores`, returning a probability distribution.
///
/// The maximum is subtracted before exponentiating so large scores cannot overflow.
pub fn softmax(scores: &[f64]) -> Vec<f64> {
    let mut out = scores.to_vec();
    softmax_in_place(&mut out);
    out
}

/// In-place variant of [`softmax`].
pub fn softmax_in_place(scores: &mut [f64]) {
    if scores.is_empty() {
        return;
    }

    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mut sum = 0.0;
    for s in scores.iter_mut() {
        *s = (*s - max).exp();
        sum += *s;
    }
    for s in scores.iter_mut() {
        *s /= sum;
    }
}

/// Index of the largest value. Ties go to the earliest index.
///
/// Returns `None` for an empty slice.
pub fn arg_max(values: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &v) in values.iter().enumerate() {
        match best {
            Some((_, b)) if v <= b => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}

/// Dense row-major matrix of `f64`.
///
/// Batched APIs use one row per example, so a batch of `n` inputs for a layer with
/// `k` inputs is an `(n, k)` matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    data: Vec<f64>,
    rows: usize,
    cols: usize,
}

impl Matrix {
    /// An all-zero `(rows, cols)` matrix.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            data: vec![0.0; rows * cols],
            rows,
            cols,
        }
    }

    /// Build a matrix from a flat row-major buffer with `cols` columns.
    pub fn from_flat(data: Vec<f64>, cols: usize) -> Result<Self> {
        if cols == 0 {
            return Err(Error::InvalidData("matrix must have at least one column".to_owned()));
        }
        if data.len() % cols != 0 {
            return Err(Error::InvalidData(format!(
                "buffer length {} is not divisible by column count {cols}",
                data.len()
            )));
        }
        let rows = data.len() / cols;
        Ok(Self { data, rows, cols })
    }

    /// Build a matrix by copying per-row vectors.
    ///
    /// All rows must share the first row's length.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let Some(first) = rows.first() else {
            return Err(Error::InvalidData("matrix must have at least one row".to_owned()));
        };
        let cols = first.len();
        if cols == 0 {
            return Err(Error::InvalidData("matrix must have at least one column".to_owned()));
        }

        let mut data = Vec::with_capacity(rows.len() * cols);
        for row in rows {
            ensure_len("matrix row", cols, row.len())?;
            data.extend_from_slice(row);
        }
        Ok(Self {
            data,
            rows: rows.len(),
            cols,
        })
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Row `i` as a slice.
    ///
    /// Panics if `i >= rows`.
    #[inline]
    pub fn row(&self, i: usize) -> &[f64] {
        let start = i * self.cols;
        &self.data[start..start + self.cols]
    }

    #[inline]
    pub fn row_mut(&mut self, i: usize) -> &mut [f64] {
        let start = i * self.cols;
        &mut self.data[start..start + self.cols]
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.cols + col]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.data[row * self.cols + col] = value;
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[f64]> + '_ {
        (0..self.rows).map(move |i| self.row(i))
    }

    /// Flat row-major view of the data.
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.iter_rows().map(<[f64]>::to_vec).collect()
    }

    /// `self * other` by plain triple-loop accumulation.
    pub fn matmul(&self, other: &Matrix) -> Result<Matrix> {
        ensure_len("matrix multiply", self.cols, other.rows)?;

        let mut out = Matrix::zeros(self.rows, other.cols);
        for i in 0..self.rows {
            for j in 0..other.cols {
                let mut acc = 0.0;
                for k in 0..self.cols {
                    acc += self.get(i, k) * other.get(k, j);
                }
                out.set(i, j, acc);
            }
        }
        Ok(out)
    }

    pub fn transpose(&self) -> Matrix {
        let mut out = Matrix::zeros(self.cols, self.rows);
        for i in 0..self.rows {
            for j in 0..self.cols {
                out.set(j, i, self.get(i, j));
            }
        }
        out
    }
}
