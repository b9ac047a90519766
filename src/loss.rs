//! Loss functions.
//!
//! Each loss exposes a scalar value and a gradient with respect to the network's
//! (softmaxed) prediction, in single-example and batch form:
//!
//! - run `network.predict(...)`
//! - compute `errors = loss.derive(prediction, target)`
//! - thread `errors` backward through the layers
//!
//! Batch losses are *sums* of per-example losses. The training loop divides by
//! the example count when it reports an epoch loss.

use crate::error::ensure_len;
use crate::{Error, Matrix, Result};

/// Lower bound applied to probabilities before taking their logarithm.
pub const LOG_EPSILON: f64 = 1e-15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Supported loss functions.
pub enum Loss {
    /// Mean of squared differences. Gradient `2 * (pred - target)`.
    MeanSquaredError,
    /// `-Σ t_i ln(p_i)`.
    ///
    /// The gradient `pred - target` is the closed form for softmax outputs paired
    /// with one-hot (or probability) targets; no softmax Jacobian is applied here.
    CrossEntropy,
}

impl Loss {
    /// Loss for a single example.
    pub fn loss(self, predicted: &[f64], target: &[f64]) -> Result<f64> {
        check_example(predicted, target)?;
        Ok(match self {
            Loss::MeanSquaredError => mse(predicted, target),
            Loss::CrossEntropy => cross_entropy(predicted, target),
        })
    }

    /// Sum of per-example losses over a batch (one row per example).
    pub fn loss_batch(self, predicted: &Matrix, target: &Matrix) -> Result<f64> {
        check_batch(predicted, target)?;
        let mut total = 0.0;
        for (p, t) in predicted.iter_rows().zip(target.iter_rows()) {
            total += match self {
                Loss::MeanSquaredError => mse(p, t),
                Loss::CrossEntropy => cross_entropy(p, t),
            };
        }
        Ok(total)
    }

    /// Gradient of the loss with respect to `predicted`.
    pub fn derive(self, predicted: &[f64], target: &[f64]) -> Result<Vec<f64>> {
        check_example(predicted, target)?;
        let mut grad = vec![0.0; predicted.len()];
        self.derive_into(predicted, target, &mut grad);
        Ok(grad)
    }

    /// Per-example gradients for a batch, shaped like `predicted`.
    pub fn derive_batch(self, predicted: &Matrix, target: &Matrix) -> Result<Matrix> {
        check_batch(predicted, target)?;
        let mut grad = Matrix::zeros(predicted.rows(), predicted.cols());
        for i in 0..predicted.rows() {
            self.derive_into(predicted.row(i), target.row(i), grad.row_mut(i));
        }
        Ok(grad)
    }

    #[inline]
    fn derive_into(self, predicted: &[f64], target: &[f64], out: &mut [f64]) {
        for ((o, &p), &t) in out.iter_mut().zip(predicted).zip(target) {
            *o = match self {
                Loss::MeanSquaredError => 2.0 * (p - t),
                Loss::CrossEntropy => p - t,
            };
        }
    }
}

#[inline]
fn mse(predicted: &[f64], target: &[f64]) -> f64 {
    let mut sum = 0.0;
    for (&p, &t) in predicted.iter().zip(target) {
        let diff = p - t;
        sum += diff * diff;
    }
    sum / predicted.len() as f64
}

#[inline]
fn cross_entropy(predicted: &[f64], target: &[f64]) -> f64 {
    let mut loss = 0.0;
    for (&p, &t) in predicted.iter().zip(target) {
        loss -= t * p.max(LOG_EPSILON).ln();
    }
    loss
}

fn check_example(predicted: &[f64], target: &[f64]) -> Result<()> {
    ensure_len("loss target", predicted.len(), target.len())?;
    if predicted.is_empty() {
        return Err(Error::dims("loss input", 1, 0));
    }
    Ok(())
}

fn check_batch(predicted: &Matrix, target: &Matrix) -> Result<()> {
    ensure_len("batch loss rows", predicted.rows(), target.rows())?;
    ensure_len("batch loss columns", predicted.cols(), target.cols())?;
    if predicted.rows() == 0 || predicted.cols() == 0 {
        return Err(Error::dims("batch loss input", 1, 0));
    }
    Ok(())
}
