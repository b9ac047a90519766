use rand::Rng;

use crate::error::ensure_len;
use crate::{Activation, Error, Matrix, Neuron, Result};

/// A fully-connected layer: a set of neurons sharing one input size and one activation.
#[derive(Debug, Clone)]
pub struct Layer {
    neurons: Vec<Neuron>,
    activation: Activation,
    /// Output of the most recent batch forward pass, shape `(batch_size, size)`.
    last_batch_activations: Option<Matrix>,
}

impl Layer {
    /// A layer of `size` freshly initialized neurons, each taking `input_size` inputs.
    pub fn new_with_rng<R: Rng + ?Sized>(
        size: usize,
        input_size: usize,
        activation: Activation,
        rng: &mut R,
    ) -> Self {
        let neurons = (0..size)
            .map(|_| Neuron::new_with_rng(input_size, rng))
            .collect();
        Self {
            neurons,
            activation,
            last_batch_activations: None,
        }
    }

    /// Assemble a layer from existing neurons.
    ///
    /// All neurons must have the same, non-zero input size.
    pub fn from_parts(neurons: Vec<Neuron>, activation: Activation) -> Result<Self> {
        let Some(first) = neurons.first() else {
            return Err(Error::InvalidConfig(
                "layer must have at least one neuron".to_owned(),
            ));
        };
        let input_size = first.input_size();
        if input_size == 0 {
            return Err(Error::InvalidConfig(
                "layer input size must be > 0".to_owned(),
            ));
        }
        for neuron in &neurons {
            ensure_len("layer neuron input size", input_size, neuron.input_size())?;
        }

        Ok(Self {
            neurons,
            activation,
            last_batch_activations: None,
        })
    }

    /// Number of neurons (outputs).
    #[inline]
    pub fn size(&self) -> usize {
        self.neurons.len()
    }

    #[inline]
    pub fn input_size(&self) -> usize {
        self.neurons.first().map_or(0, Neuron::input_size)
    }

    #[inline]
    pub fn activation(&self) -> Activation {
        self.activation
    }

    #[inline]
    pub fn neurons(&self) -> &[Neuron] {
        &self.neurons
    }

    #[inline]
    pub fn neuron_mut(&mut self, idx: usize) -> Option<&mut Neuron> {
        self.neurons.get_mut(idx)
    }

    /// Forward pass for a single example.
    pub fn feed_forward(&mut self, inputs: &[f64]) -> Result<Vec<f64>> {
        ensure_len("layer input", self.input_size(), inputs.len())?;
        let activation = self.activation;
        self.neurons
            .iter_mut()
            .map(|n| n.feed_forward(inputs, activation))
            .collect()
    }

    /// Forward pass for a batch, one row per example.
    ///
    /// Returns a `(batch_size, size)` matrix and keeps a copy for the next
    /// [`Layer::back_propagate_batch`].
    pub fn feed_forward_batch(&mut self, batch: &Matrix) -> Result<Matrix> {
        ensure_len("layer batch input", self.input_size(), batch.cols())?;

        let mut outputs = Matrix::zeros(batch.rows(), self.size());
        for (j, neuron) in self.neurons.iter().enumerate() {
            let column = neuron.feed_forward_batch(batch, self.activation)?;
            for (e, value) in column.into_iter().enumerate() {
                outputs.set(e, j, value);
            }
        }

        self.last_batch_activations = Some(outputs.clone());
        Ok(outputs)
    }

    /// Backward pass for a single example.
    ///
    /// `errors` is dL/d(output) for this layer and `inputs` is what was fed to it on
    /// the forward pass. Each neuron is updated in place, and the returned vector is
    /// the error for the previous layer: `Σ_j w_j * delta_j`, using the weights as
    /// they stand after the update.
    pub fn back_propagate(
        &mut self,
        errors: &[f64],
        inputs: &[f64],
        learning_rate: f64,
    ) -> Result<Vec<f64>> {
        ensure_len("layer errors", self.size(), errors.len())?;
        ensure_len("layer input", self.input_size(), inputs.len())?;

        let mut previous_errors = vec![0.0; inputs.len()];
        for (neuron, &error) in self.neurons.iter_mut().zip(errors) {
            let delta = error * self.activation.derive(neuron.activation());
            neuron.update_weights(inputs, delta, learning_rate)?;

            for (p, &w) in previous_errors.iter_mut().zip(neuron.weights()) {
                *p += w * delta;
            }
        }

        Ok(previous_errors)
    }

    /// Backward pass for a batch.
    ///
    /// Deltas are computed per example from the activations cached by the last
    /// [`Layer::feed_forward_batch`]; each neuron then takes one mean-gradient step.
    pub fn back_propagate_batch(
        &mut self,
        errors: &Matrix,
        inputs: &Matrix,
        learning_rate: f64,
    ) -> Result<Matrix> {
        let cached = self
            .last_batch_activations
            .as_ref()
            .ok_or(Error::MissingForwardPass("batch back-propagation"))?;

        ensure_len("layer batch errors", self.neurons.len(), errors.cols())?;
        ensure_len("layer batch input", self.input_size(), inputs.cols())?;
        ensure_len("layer batch rows", inputs.rows(), errors.rows())?;
        ensure_len("layer cached batch rows", cached.rows(), errors.rows())?;

        let mut previous_errors = Matrix::zeros(inputs.rows(), inputs.cols());
        let mut deltas = vec![0.0; errors.rows()];

        for (k, neuron) in self.neurons.iter_mut().enumerate() {
            for (e, delta) in deltas.iter_mut().enumerate() {
                *delta = errors.get(e, k) * self.activation.derive(cached.get(e, k));
            }

            neuron.update_weights_batch(inputs, learning_rate, &deltas)?;

            for (e, &delta) in deltas.iter().enumerate() {
                let row = previous_errors.row_mut(e);
                for (p, &w) in row.iter_mut().zip(neuron.weights()) {
                    *p += w * delta;
                }
            }
        }

        Ok(previous_errors)
    }

    /// Outputs cached by each neuron's last single-example forward pass.
    pub fn activations(&self) -> Vec<f64> {
        self.neurons.iter().map(Neuron::activation).collect()
    }

    #[inline]
    pub fn last_batch_activations(&self) -> Option<&Matrix> {
        self.last_batch_activations.as_ref()
    }
}
