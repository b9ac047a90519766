//! Model serialization/deserialization (feature: `serde`).
//!
//! This module defines a versioned on-disk format for [`Network`]: topology,
//! activation/loss choice, and every neuron's weights and bias.
//!
//! Design notes:
//! - Internal `Network`/`Layer`/`Neuron` structs are not serialized directly, so
//!   the file format survives changes to their representation.
//! - Deserialization validates the version, layer chaining, and that all
//!   parameters are finite. Cached activations are not stored.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{Activation, Error, Layer, Loss, Network, Neuron, Result};

pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializedNetwork {
    pub format_version: u32,
    /// Hidden-layer activation.
    pub activation: SerializedActivation,
    pub loss: SerializedLoss,
    pub layers: Vec<SerializedLayer>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializedLayer {
    pub activation: SerializedActivation,
    pub neurons: Vec<SerializedNeuron>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializedNeuron {
    pub weights: Vec<f64>,
    pub bias: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SerializedActivation {
    Linear,
    Relu,
    LeakyRelu,
    Sigmoid,
    Tanh,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SerializedLoss {
    MeanSquaredError,
    CrossEntropy,
}

impl From<Activation> for SerializedActivation {
    fn from(value: Activation) -> Self {
        match value {
            Activation::Linear => SerializedActivation::Linear,
            Activation::ReLU => SerializedActivation::Relu,
            Activation::LeakyReLU => SerializedActivation::LeakyRelu,
            Activation::Sigmoid => SerializedActivation::Sigmoid,
            Activation::Tanh => SerializedActivation::Tanh,
        }
    }
}

impl From<SerializedActivation> for Activation {
    fn from(value: SerializedActivation) -> Self {
        match value {
            SerializedActivation::Linear => Activation::Linear,
            SerializedActivation::Relu => Activation::ReLU,
            SerializedActivation::LeakyRelu => Activation::LeakyReLU,
            SerializedActivation::Sigmoid => Activation::Sigmoid,
            SerializedActivation::Tanh => Activation::Tanh,
        }
    }
}

impl From<Loss> for SerializedLoss {
    fn from(value: Loss) -> Self {
        match value {
            Loss::MeanSquaredError => SerializedLoss::MeanSquaredError,
            Loss::CrossEntropy => SerializedLoss::CrossEntropy,
        }
    }
}

impl From<SerializedLoss> for Loss {
    fn from(value: SerializedLoss) -> Self {
        match value {
            SerializedLoss::MeanSquaredError => Loss::MeanSquaredError,
            SerializedLoss::CrossEntropy => Loss::CrossEntropy,
        }
    }
}

impl SerializedNetwork {
    /// Checks that do not need the layers to be assembled.
    ///
    /// Shape consistency is enforced by [`Layer::from_parts`] and
    /// [`Network::from_layers`] during conversion.
    pub fn validate(&self) -> Result<()> {
        if self.format_version != FORMAT_VERSION {
            return Err(Error::InvalidData(format!(
                "unsupported model format_version {}; expected {}",
                self.format_version, FORMAT_VERSION
            )));
        }
        if self.layers.is_empty() {
            return Err(Error::InvalidData(
                "serialized model must have at least one layer".to_owned(),
            ));
        }

        for (i, layer) in self.layers.iter().enumerate() {
            for (j, neuron) in layer.neurons.iter().enumerate() {
                if !neuron.bias.is_finite() || neuron.weights.iter().any(|w| !w.is_finite()) {
                    return Err(Error::InvalidData(format!(
                        "layer {i} neuron {j} has non-finite parameters"
                    )));
                }
            }
        }

        Ok(())
    }
}

impl From<&Network> for SerializedNetwork {
    fn from(network: &Network) -> Self {
        Self {
            format_version: FORMAT_VERSION,
            activation: network.activation().into(),
            loss: network.loss().into(),
            layers: network.layers().iter().map(SerializedLayer::from).collect(),
        }
    }
}

impl From<&Layer> for SerializedLayer {
    fn from(layer: &Layer) -> Self {
        Self {
            activation: layer.activation().into(),
            neurons: layer
                .neurons()
                .iter()
                .map(|n| SerializedNeuron {
                    weights: n.weights().to_vec(),
                    bias: n.bias(),
                })
                .collect(),
        }
    }
}

impl TryFrom<SerializedNetwork> for Network {
    type Error = Error;

    fn try_from(value: SerializedNetwork) -> std::result::Result<Self, Self::Error> {
        value.validate()?;

        let mut layers = Vec::with_capacity(value.layers.len());
        for (i, layer) in value.layers.into_iter().enumerate() {
            let neurons = layer
                .neurons
                .into_iter()
                .map(|n| Neuron::from_parts(n.weights, n.bias))
                .collect();
            let layer = Layer::from_parts(neurons, layer.activation.into())
                .map_err(|e| Error::InvalidData(format!("layer {i} invalid: {e}")))?;
            layers.push(layer);
        }

        Network::from_layers(layers, value.activation.into(), value.loss.into())
            .map_err(|e| Error::InvalidData(format!("invalid topology: {e}")))
    }
}

impl Network {
    /// Serialize the network to a pretty-printed JSON string.
    pub fn to_json_string_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&SerializedNetwork::from(self))?)
    }

    /// Serialize the network to a compact JSON string.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string(&SerializedNetwork::from(self))?)
    }

    /// Parse a network from a JSON string.
    pub fn from_json_str(s: &str) -> Result<Self> {
        let ser: SerializedNetwork = serde_json::from_str(s)?;
        ser.try_into()
    }

    /// Save the network to a JSON file (pretty-printed).
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let s = self.to_json_string_pretty()?;
        std::fs::write(path.as_ref(), s)?;
        log::debug!("saved network to {}", path.as_ref().display());
        Ok(())
    }

    /// Load a network from a JSON file.
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let s = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&s)
    }
}
