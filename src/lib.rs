//! A small, from-scratch dense multilayer perceptron.
//!
//! `dense-mlp` models a network the way it is usually drawn on a whiteboard: a
//! [`Network`] owns [`Layer`]s, a layer owns [`Neuron`]s, and every neuron owns its
//! weights, bias and last output. Training is plain gradient descent through
//! backpropagation, one example at a time or in mini-batches.
//!
//! # Shape of a network
//!
//! - Scalars are `f64`.
//! - Hidden layers share one [`Activation`]; the output layer is always
//!   [`Activation::Linear`], and [`Network::predict`] applies softmax to it.
//! - The [`Loss`] gradient is taken with respect to the softmaxed prediction.
//! - Batched APIs use a row-major [`Matrix`], one row per example.
//!
//! # Errors
//!
//! Shape mismatches (input width, inputs vs targets, ragged rows) are reported as
//! [`Error::DimensionMismatch`] and abort the call. Numerical edge cases such as
//! sigmoid saturation, softmax overflow or `ln(0)` are clamped instead.
//!
//! # Quick start
//!
//! ```rust
//! use dense_mlp::{Activation, Loss, Network};
//!
//! # fn main() -> dense_mlp::Result<()> {
//! let xs = vec![
//!     vec![0.0, 0.0],
//!     vec![0.0, 1.0],
//!     vec![1.0, 0.0],
//!     vec![1.0, 1.0],
//! ];
//! let ys = vec![
//!     vec![0.0, 1.0],
//!     vec![1.0, 0.0],
//!     vec![1.0, 0.0],
//!     vec![0.0, 1.0],
//! ];
//!
//! let mut net = Network::new(2, &[4], 2, Activation::Tanh, Loss::CrossEntropy)?;
//! let report = net.train(&xs, &ys, 100, 0.1)?;
//! assert_eq!(report.loss_history.len(), 100);
//!
//! let probs = net.predict(&[1.0, 0.0])?;
//! assert!((probs.iter().sum::<f64>() - 1.0).abs() < 1e-9);
//! # Ok(())
//! # }
//! ```
//!
//! # Custom loops
//!
//! [`Network::fit`] is a thin loop over [`Network::train_step`] and
//! [`Network::train_batch_step`]; call those directly to control ordering or
//! stopping yourself.

pub mod activation;
pub mod data;
pub mod error;
pub mod layer;
pub mod loss;
pub mod math;
pub mod metrics;
pub mod network;
pub mod neuron;
pub mod train;

#[cfg(feature = "serde")]
pub mod serde_model;

pub use activation::Activation;
pub use data::Dataset;
pub use error::{Error, Result};
pub use layer::Layer;
pub use loss::Loss;
pub use math::Matrix;
pub use metrics::EvalReport;
pub use network::Network;
pub use neuron::Neuron;
pub use train::{Shuffle, TrainConfig, TrainReport};
