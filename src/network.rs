use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::ensure_len;
use crate::{Activation, Error, Layer, Loss, Matrix, Result, math};

/// Activation used by the output layer. Predictions apply softmax on top of it.
pub const OUTPUT_ACTIVATION: Activation = Activation::Linear;

/// A dense feed-forward network.
///
/// Hidden layers share one activation; the output layer is always
/// [`OUTPUT_ACTIVATION`]. Topology is fixed at construction, only weights and
/// biases change during training.
#[derive(Debug, Clone)]
pub struct Network {
    layers: Vec<Layer>,
    activation: Activation,
    loss: Loss,
}

impl Network {
    /// Build a network with randomly initialized weights.
    ///
    /// `hidden_sizes` may be empty, giving a single linear layer.
    pub fn new(
        input_size: usize,
        hidden_sizes: &[usize],
        output_size: usize,
        activation: Activation,
        loss: Loss,
    ) -> Result<Self> {
        Self::new_with_rng(
            input_size,
            hidden_sizes,
            output_size,
            activation,
            loss,
            &mut rand::thread_rng(),
        )
    }

    /// Build a network whose initial weights are fully determined by `seed`.
    pub fn new_with_seed(
        input_size: usize,
        hidden_sizes: &[usize],
        output_size: usize,
        activation: Activation,
        loss: Loss,
        seed: u64,
    ) -> Result<Self> {
        let mut rng = StdRng::seed_from_u64(seed);
        Self::new_with_rng(
            input_size,
            hidden_sizes,
            output_size,
            activation,
            loss,
            &mut rng,
        )
    }

    pub fn new_with_rng<R: Rng + ?Sized>(
        input_size: usize,
        hidden_sizes: &[usize],
        output_size: usize,
        activation: Activation,
        loss: Loss,
        rng: &mut R,
    ) -> Result<Self> {
        if input_size == 0 {
            return Err(Error::InvalidConfig("input_size must be > 0".to_owned()));
        }
        if output_size == 0 {
            return Err(Error::InvalidConfig("output_size must be > 0".to_owned()));
        }
        if hidden_sizes.contains(&0) {
            return Err(Error::InvalidConfig(
                "all hidden layer sizes must be > 0".to_owned(),
            ));
        }

        let mut layers = Vec::with_capacity(hidden_sizes.len() + 1);
        let mut previous = input_size;
        for &size in hidden_sizes {
            layers.push(Layer::new_with_rng(size, previous, activation, rng));
            previous = size;
        }
        layers.push(Layer::new_with_rng(
            output_size,
            previous,
            OUTPUT_ACTIVATION,
            rng,
        ));

        Ok(Self {
            layers,
            activation,
            loss,
        })
    }

    /// Assemble a network from existing layers (e.g. restored parameters).
    ///
    /// Layer `i` must accept layer `i - 1`'s output, hidden layers must use
    /// `activation`, and the last layer must use [`OUTPUT_ACTIVATION`].
    pub fn from_layers(layers: Vec<Layer>, activation: Activation, loss: Loss) -> Result<Self> {
        let Some((output, hidden)) = layers.split_last() else {
            return Err(Error::InvalidConfig(
                "network must have at least one layer".to_owned(),
            ));
        };

        if output.activation() != OUTPUT_ACTIVATION {
            return Err(Error::InvalidConfig(format!(
                "output layer must use {OUTPUT_ACTIVATION:?}, got {:?}",
                output.activation()
            )));
        }
        for (i, layer) in hidden.iter().enumerate() {
            if layer.activation() != activation {
                return Err(Error::InvalidConfig(format!(
                    "hidden layer {i} uses {:?}, expected {activation:?}",
                    layer.activation()
                )));
            }
        }
        for pair in layers.windows(2) {
            ensure_len("layer chaining", pair[0].size(), pair[1].input_size())?;
        }

        Ok(Self {
            layers,
            activation,
            loss,
        })
    }

    #[inline]
    pub fn input_size(&self) -> usize {
        self.layers.first().map_or(0, Layer::input_size)
    }

    #[inline]
    pub fn output_size(&self) -> usize {
        self.layers.last().map_or(0, Layer::size)
    }

    #[inline]
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    #[inline]
    pub fn layer_mut(&mut self, idx: usize) -> Option<&mut Layer> {
        self.layers.get_mut(idx)
    }

    /// Activation shared by the hidden layers.
    #[inline]
    pub fn activation(&self) -> Activation {
        self.activation
    }

    #[inline]
    pub fn loss(&self) -> Loss {
        self.loss
    }

    /// Class probabilities for one example: forward through every layer, then softmax.
    ///
    /// Each neuron caches its output, which the next training step reads; the
    /// returned values depend only on the parameters and `input`.
    pub fn predict(&mut self, input: &[f64]) -> Result<Vec<f64>> {
        ensure_len("network input", self.input_size(), input.len())?;

        let mut outputs = input.to_vec();
        for layer in &mut self.layers {
            outputs = layer.feed_forward(&outputs)?;
        }
        math::softmax_in_place(&mut outputs);
        Ok(outputs)
    }

    /// Class probabilities for a batch, one row per example.
    pub fn predict_batch(&mut self, batch: &Matrix) -> Result<Matrix> {
        ensure_len("network batch input", self.input_size(), batch.cols())?;

        let mut outputs = batch.clone();
        for layer in &mut self.layers {
            outputs = layer.feed_forward_batch(&outputs)?;
        }
        for i in 0..outputs.rows() {
            math::softmax_in_place(outputs.row_mut(i));
        }
        Ok(outputs)
    }

    /// One gradient-descent step on a single example. Returns the example's loss
    /// before the update.
    pub fn train_step(&mut self, input: &[f64], target: &[f64], learning_rate: f64) -> Result<f64> {
        let output = self.predict(input)?;
        let loss = self.loss.loss(&output, target)?;
        self.back_propagate(target, &output, input, learning_rate)?;
        Ok(loss)
    }

    /// One mean-gradient step on a batch. Returns the summed loss of the batch
    /// before the update.
    pub fn train_batch_step(
        &mut self,
        inputs: &Matrix,
        targets: &Matrix,
        learning_rate: f64,
    ) -> Result<f64> {
        ensure_len("batch targets", inputs.rows(), targets.rows())?;
        let outputs = self.predict_batch(inputs)?;
        let loss = self.loss.loss_batch(&outputs, targets)?;
        self.back_propagate_batch(targets, &outputs, inputs, learning_rate)?;
        Ok(loss)
    }

    fn back_propagate(
        &mut self,
        expected: &[f64],
        output: &[f64],
        input: &[f64],
        learning_rate: f64,
    ) -> Result<()> {
        let mut errors = self.loss.derive(output, expected)?;
        for i in (1..self.layers.len()).rev() {
            let inputs = self.layers[i - 1].activations();
            errors = self.layers[i].back_propagate(&errors, &inputs, learning_rate)?;
        }
        // The first layer learns against the raw input.
        self.layers[0].back_propagate(&errors, input, learning_rate)?;
        Ok(())
    }

    fn back_propagate_batch(
        &mut self,
        expected: &Matrix,
        output: &Matrix,
        input: &Matrix,
        learning_rate: f64,
    ) -> Result<()> {
        let mut errors = self.loss.derive_batch(output, expected)?;
        for i in (1..self.layers.len()).rev() {
            // Borrow the previous layer's cache immutably and the current layer mutably.
            let (left, right) = self.layers.split_at_mut(i);
            let inputs = left[i - 1]
                .last_batch_activations()
                .ok_or(Error::MissingForwardPass("batch back-propagation"))?;
            errors = right[0].back_propagate_batch(&errors, inputs, learning_rate)?;
        }
        self.layers[0].back_propagate_batch(&errors, input, learning_rate)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::Neuron;

    fn xor_net(seed: u64) -> Network {
        Network::new_with_seed(2, &[4], 2, Activation::Tanh, Loss::CrossEntropy, seed).unwrap()
    }

    #[test]
    fn topology_matches_construction() {
        let net = Network::new_with_seed(
            3,
            &[5, 4],
            2,
            Activation::ReLU,
            Loss::MeanSquaredError,
            1,
        )
        .unwrap();
        let shapes: Vec<_> = net
            .layers()
            .iter()
            .map(|l| (l.input_size(), l.size(), l.activation()))
            .collect();
        assert_eq!(
            shapes,
            vec![
                (3, 5, Activation::ReLU),
                (5, 4, Activation::ReLU),
                (4, 2, Activation::Linear),
            ]
        );
        assert_eq!(net.input_size(), 3);
        assert_eq!(net.output_size(), 2);
    }

    #[test]
    fn zero_sizes_are_rejected() {
        let act = Activation::Tanh;
        let loss = Loss::CrossEntropy;
        assert!(Network::new(0, &[2], 2, act, loss).is_err());
        assert!(Network::new(2, &[2], 0, act, loss).is_err());
        assert!(Network::new(2, &[2, 0], 2, act, loss).is_err());
        assert!(Network::new(2, &[], 2, act, loss).is_ok());
    }

    #[test]
    fn seeded_init_is_deterministic() {
        let mut a = xor_net(123);
        let mut b = xor_net(123);
        let x = [0.3, -0.7];
        assert_eq!(a.predict(&x).unwrap(), b.predict(&x).unwrap());
    }

    #[test]
    fn predict_is_a_distribution_and_idempotent() {
        let mut net = xor_net(0);
        let x = [1.0, 0.0];
        let first = net.predict(&x).unwrap();
        let second = net.predict(&x).unwrap();
        assert_eq!(first, second);

        let sum: f64 = first.iter().sum();
        assert!((sum - 1.0).abs() < 1e-9);
        assert!(net.predict(&[1.0]).is_err());
    }

    #[test]
    fn predict_batch_matches_row_by_row() {
        let mut net = xor_net(4);
        let rows = vec![vec![0.0, 0.0], vec![0.0, 1.0], vec![1.0, 1.0]];
        let batch = Matrix::from_rows(&rows).unwrap();
        let out = net.predict_batch(&batch).unwrap();
        for (i, row) in rows.iter().enumerate() {
            assert_eq!(out.row(i), net.predict(row).unwrap().as_slice());
        }
    }

    #[test]
    fn repeated_steps_reduce_loss_on_one_example() {
        let mut net = xor_net(9);
        let x = [1.0, 0.0];
        let t = [1.0, 0.0];
        let first = net.train_step(&x, &t, 0.1).unwrap();
        let mut last = first;
        for _ in 0..50 {
            last = net.train_step(&x, &t, 0.1).unwrap();
        }
        assert!(last < first, "first={first} last={last}");
    }

    #[test]
    fn repeated_batch_steps_reduce_loss() {
        let mut net = xor_net(2);
        let xs = Matrix::from_rows(&[vec![1.0, 0.0], vec![0.0, 1.0]]).unwrap();
        let ts = Matrix::from_rows(&[vec![1.0, 0.0], vec![0.0, 1.0]]).unwrap();
        let first = net.train_batch_step(&xs, &ts, 0.1).unwrap();
        let mut last = first;
        for _ in 0..200 {
            last = net.train_batch_step(&xs, &ts, 0.1).unwrap();
        }
        assert!(last < first, "first={first} last={last}");
    }

    #[test]
    fn output_layer_step_follows_the_loss_gradient() {
        // Single linear layer: logits = W x + b, p = softmax(logits), dL/dz = p - t.
        let layer = Layer::from_parts(
            vec![
                Neuron::from_parts(vec![0.0, 0.0], 0.0),
                Neuron::from_parts(vec![0.0, 0.0], 0.0),
            ],
            OUTPUT_ACTIVATION,
        )
        .unwrap();
        let mut net =
            Network::from_layers(vec![layer], Activation::Tanh, Loss::CrossEntropy).unwrap();

        net.train_step(&[1.0, 2.0], &[1.0, 0.0], 0.5).unwrap();

        // p = [0.5, 0.5], so deltas are [-0.5, 0.5].
        let n = net.layers()[0].neurons();
        assert!((n[0].weights()[0] - 0.25).abs() < 1e-12);
        assert!((n[0].weights()[1] - 0.5).abs() < 1e-12);
        assert!((n[0].bias() - 0.25).abs() < 1e-12);
        assert!((n[1].weights()[0] + 0.25).abs() < 1e-12);
        assert!((n[1].bias() + 0.25).abs() < 1e-12);
    }

    #[test]
    fn from_layers_validates_topology() {
        let hidden = Layer::from_parts(vec![Neuron::from_parts(vec![0.1], 0.0)], Activation::ReLU)
            .unwrap();
        let bad_output = Layer::from_parts(
            vec![Neuron::from_parts(vec![0.1, 0.2], 0.0)],
            OUTPUT_ACTIVATION,
        )
        .unwrap();
        let tanh_output =
            Layer::from_parts(vec![Neuron::from_parts(vec![0.1], 0.0)], Activation::Tanh).unwrap();

        assert!(
            Network::from_layers(
                vec![hidden.clone(), bad_output],
                Activation::ReLU,
                Loss::CrossEntropy
            )
            .is_err()
        );
        assert!(
            Network::from_layers(vec![tanh_output], Activation::ReLU, Loss::CrossEntropy).is_err()
        );
        assert!(Network::from_layers(vec![hidden], Activation::Tanh, Loss::CrossEntropy).is_err());
        assert!(Network::from_layers(vec![], Activation::Tanh, Loss::CrossEntropy).is_err());
    }

    #[test]
    fn batch_targets_must_match_inputs() {
        let mut net = xor_net(0);
        let xs = Matrix::from_rows(&[vec![1.0, 0.0], vec![0.0, 1.0]]).unwrap();
        let ts = Matrix::from_rows(&[vec![1.0, 0.0]]).unwrap();
        assert!(net.train_batch_step(&xs, &ts, 0.1).is_err());
    }
}
