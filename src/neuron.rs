use rand::Rng;

use crate::error::ensure_len;
use crate::{Activation, Matrix, Result, math};

/// Half-width of the uniform range initial weights are drawn from.
pub const INIT_WEIGHT_RANGE: f64 = 0.05;

/// A single unit: a weight per input, a bias, and the output of its last forward pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Neuron {
    weights: Vec<f64>,
    bias: f64,
    activation: f64,
}

impl Neuron {
    /// A neuron with weights drawn from `Uniform(-0.05, 0.05)` and zero bias.
    pub fn new_with_rng<R: Rng + ?Sized>(input_size: usize, rng: &mut R) -> Self {
        let weights = (0..input_size)
            .map(|_| rng.gen_range(-INIT_WEIGHT_RANGE..INIT_WEIGHT_RANGE))
            .collect();
        Self {
            weights,
            bias: 0.0,
            activation: 0.0,
        }
    }

    /// A neuron with explicit parameters, e.g. restored from a saved model.
    pub fn from_parts(weights: Vec<f64>, bias: f64) -> Self {
        Self {
            weights,
            bias,
            activation: 0.0,
        }
    }

    #[inline]
    pub fn input_size(&self) -> usize {
        self.weights.len()
    }

    /// Forward pass for one example. The result is cached as [`Neuron::activation`].
    pub fn feed_forward(&mut self, inputs: &[f64], activation: Activation) -> Result<f64> {
        ensure_len("neuron input", self.weights.len(), inputs.len())?;
        let total = math::dot(&self.weights, inputs)? + self.bias;
        self.activation = activation.activate(total);
        Ok(self.activation)
    }

    /// Forward pass for every row of `batch`. Nothing is cached.
    pub fn feed_forward_batch(&self, batch: &Matrix, activation: Activation) -> Result<Vec<f64>> {
        ensure_len("neuron batch input", self.weights.len(), batch.cols())?;
        batch
            .iter_rows()
            .map(|row| -> Result<f64> {
                Ok(activation.activate(math::dot(&self.weights, row)? + self.bias))
            })
            .collect()
    }

    /// One SGD step for a single example: `w -= lr * delta * x`, `b -= lr * delta`.
    pub fn update_weights(&mut self, inputs: &[f64], delta: f64, learning_rate: f64) -> Result<()> {
        ensure_len("neuron update input", self.weights.len(), inputs.len())?;
        for (w, &x) in self.weights.iter_mut().zip(inputs) {
            *w -= learning_rate * delta * x;
        }
        self.bias -= learning_rate * delta;
        Ok(())
    }

    /// One SGD step using the mean gradient over a batch.
    ///
    /// `deltas[e]` is this neuron's delta for row `e` of `batch`.
    pub fn update_weights_batch(
        &mut self,
        batch: &Matrix,
        learning_rate: f64,
        deltas: &[f64],
    ) -> Result<()> {
        ensure_len("neuron update input", self.weights.len(), batch.cols())?;
        ensure_len("neuron update deltas", batch.rows(), deltas.len())?;
        if deltas.is_empty() {
            return Ok(());
        }

        let mut gradient_sum = vec![0.0; self.weights.len()];
        let mut delta_sum = 0.0;
        for (row, &delta) in batch.iter_rows().zip(deltas) {
            for (g, &x) in gradient_sum.iter_mut().zip(row) {
                *g += delta * x;
            }
            delta_sum += delta;
        }

        let n = deltas.len() as f64;
        for (w, g) in self.weights.iter_mut().zip(gradient_sum) {
            *w -= learning_rate * g / n;
        }
        self.bias -= learning_rate * delta_sum / n;
        Ok(())
    }

    #[inline]
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Replace the weights. The length must match the current input size.
    pub fn set_weights(&mut self, weights: Vec<f64>) -> Result<()> {
        ensure_len("neuron weights", self.weights.len(), weights.len())?;
        self.weights = weights;
        Ok(())
    }

    #[inline]
    pub fn bias(&self) -> f64 {
        self.bias
    }

    #[inline]
    pub fn set_bias(&mut self, bias: f64) {
        self.bias = bias;
    }

    /// Post-activation output of the most recent single-example forward pass.
    #[inline]
    pub fn activation(&self) -> f64 {
        self.activation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn init_weights_are_small_and_bias_is_zero() {
        let mut rng = StdRng::seed_from_u64(7);
        let n = Neuron::new_with_rng(64, &mut rng);
        assert_eq!(n.input_size(), 64);
        assert_eq!(n.bias(), 0.0);
        assert!(n.weights().iter().all(|w| w.abs() <= INIT_WEIGHT_RANGE));
    }

    #[test]
    fn feed_forward_caches_activation() {
        let mut n = Neuron::from_parts(vec![0.5, -1.0], 0.25);
        let y = n.feed_forward(&[2.0, 1.0], Activation::Linear).unwrap();
        assert_eq!(y, 0.25);
        assert_eq!(n.activation(), 0.25);

        let y = n.feed_forward(&[2.0, 1.0], Activation::ReLU).unwrap();
        assert_eq!(y, 0.25);
        let y = n.feed_forward(&[0.0, 1.0], Activation::ReLU).unwrap();
        assert_eq!(y, 0.0);
    }

    #[test]
    fn feed_forward_rejects_wrong_input_size() {
        let mut n = Neuron::from_parts(vec![0.5, -1.0], 0.0);
        assert!(n.feed_forward(&[1.0], Activation::Linear).is_err());
        let batch = Matrix::from_rows(&[vec![1.0, 2.0, 3.0]]).unwrap();
        assert!(n.feed_forward_batch(&batch, Activation::Linear).is_err());
    }

    #[test]
    fn batch_forward_matches_single_and_does_not_cache() {
        let mut n = Neuron::from_parts(vec![0.5, -1.0], 0.1);
        let batch = Matrix::from_rows(&[vec![1.0, 0.0], vec![0.0, 1.0]]).unwrap();
        let out = n.feed_forward_batch(&batch, Activation::Tanh).unwrap();
        assert_eq!(n.activation(), 0.0);

        let single = n.feed_forward(&[0.0, 1.0], Activation::Tanh).unwrap();
        assert_eq!(out[1], single);
    }

    #[test]
    fn single_update_moves_each_parameter_by_lr_times_delta() {
        let mut n = Neuron::from_parts(vec![0.3, -0.2], 0.05);
        n.update_weights(&[1.0, 1.0], 1.0, 0.1).unwrap();
        assert!((n.weights()[0] - 0.2).abs() < 1e-12);
        assert!((n.weights()[1] - (-0.3)).abs() < 1e-12);
        assert!((n.bias() - (-0.05)).abs() < 1e-12);
    }

    #[test]
    fn batch_update_uses_mean_gradient() {
        let mut n = Neuron::from_parts(vec![0.0, 0.0], 0.0);
        let batch = Matrix::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        n.update_weights_batch(&batch, 0.5, &[1.0, -1.0]).unwrap();
        // gradient sums: [1 - 3, 2 - 4] = [-2, -2]; delta sum 0; n = 2
        assert!((n.weights()[0] - 0.5).abs() < 1e-12);
        assert!((n.weights()[1] - 0.5).abs() < 1e-12);
        assert_eq!(n.bias(), 0.0);

        assert!(n.update_weights_batch(&batch, 0.5, &[1.0]).is_err());
    }

    #[test]
    fn set_weights_checks_length() {
        let mut n = Neuron::from_parts(vec![0.0; 3], 0.0);
        assert!(n.set_weights(vec![1.0; 2]).is_err());
        n.set_weights(vec![1.0, 2.0, 3.0]).unwrap();
        assert_eq!(n.weights(), &[1.0, 2.0, 3.0]);
    }
}
