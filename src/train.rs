//! Training loops.
//!
//! Every epoch draws one permutation of example indices (Fisher–Yates via
//! [`SliceRandom::shuffle`]) and visits inputs and targets through it, either one
//! example at a time or in consecutive batches of `batch_size` (the last batch may
//! be smaller).

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::error::ensure_len;
use crate::{Dataset, Error, Network, Result};

/// How examples are ordered within each epoch.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Shuffle {
    /// Fresh entropy for every `fit` call.
    #[default]
    Random,
    /// Deterministic permutations derived from a seed.
    Seeded(u64),
    /// Keep dataset order.
    None,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainConfig {
    pub epochs: usize,
    pub learning_rate: f64,
    /// `None` trains one example at a time; `Some(n)` averages gradients over `n`.
    pub batch_size: Option<usize>,
    pub shuffle: Shuffle,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            epochs: 10,
            learning_rate: 1e-2,
            batch_size: None,
            shuffle: Shuffle::Random,
        }
    }
}

impl TrainConfig {
    /// `epochs == 0` is allowed and trains nothing. The learning rate must be
    /// finite and positive, and `batch_size`, when set, non-zero.
    pub fn validate(&self) -> Result<()> {
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "learning rate must be finite and > 0, got {}",
                self.learning_rate
            )));
        }
        if self.batch_size == Some(0) {
            return Err(Error::InvalidConfig("batch_size must be > 0".to_owned()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct TrainReport {
    /// Mean per-example loss of each epoch, in order.
    pub loss_history: Vec<f64>,
    /// Loss of the last epoch, or `0.0` when no epoch ran.
    pub final_loss: f64,
}

impl Network {
    /// Train one example at a time for `epochs` epochs.
    pub fn train(
        &mut self,
        inputs: &[Vec<f64>],
        targets: &[Vec<f64>],
        epochs: usize,
        learning_rate: f64,
    ) -> Result<TrainReport> {
        let data = Dataset::from_rows(inputs, targets)?;
        self.fit(
            &data,
            &TrainConfig {
                epochs,
                learning_rate,
                batch_size: None,
                shuffle: Shuffle::Random,
            },
        )
    }

    /// Train with mini-batches of `batch_size` examples for `epochs` epochs.
    pub fn train_batched(
        &mut self,
        inputs: &[Vec<f64>],
        targets: &[Vec<f64>],
        epochs: usize,
        learning_rate: f64,
        batch_size: usize,
    ) -> Result<TrainReport> {
        let data = Dataset::from_rows(inputs, targets)?;
        self.fit(
            &data,
            &TrainConfig {
                epochs,
                learning_rate,
                batch_size: Some(batch_size),
                shuffle: Shuffle::Random,
            },
        )
    }

    /// Train on `data` according to `cfg`.
    ///
    /// The reported epoch loss is the epoch's total loss divided by the number of
    /// examples, in both single-example and batch mode.
    ///
    /// Besides shape mismatches, this fails with [`Error::InvalidConfig`] for a
    /// non-finite or non-positive learning rate and for `batch_size == Some(0)`.
    /// Zero epochs is a no-op that returns an empty `loss_history`.
    pub fn fit(&mut self, data: &Dataset, cfg: &TrainConfig) -> Result<TrainReport> {
        cfg.validate()?;
        if data.is_empty() {
            return Err(Error::InvalidData(
                "train dataset must not be empty".to_owned(),
            ));
        }
        ensure_len("train input", self.input_size(), data.input_dim())?;
        ensure_len("train target", self.output_size(), data.target_dim())?;

        let mut rng = match cfg.shuffle {
            Shuffle::Random => Some(StdRng::from_entropy()),
            Shuffle::Seeded(seed) => Some(StdRng::seed_from_u64(seed)),
            Shuffle::None => None,
        };

        let mut order: Vec<usize> = (0..data.len()).collect();
        let mut loss_history = Vec::with_capacity(cfg.epochs);

        for epoch in 0..cfg.epochs {
            if let Some(rng) = rng.as_mut() {
                order.shuffle(rng);
            }

            let mut total = 0.0;
            match cfg.batch_size {
                None => {
                    for &idx in &order {
                        total += self.train_step(
                            data.input(idx),
                            data.target(idx),
                            cfg.learning_rate,
                        )?;
                    }
                }
                Some(batch_size) => {
                    for chunk in order.chunks(batch_size) {
                        let (xs, ys) = data.gather(chunk)?;
                        total += self.train_batch_step(&xs, &ys, cfg.learning_rate)?;
                    }
                }
            }

            let epoch_loss = total / data.len() as f64;
            log::debug!("epoch {}/{}: loss = {:.6}", epoch + 1, cfg.epochs, epoch_loss);
            loss_history.push(epoch_loss);
        }

        let final_loss = loss_history.last().copied().unwrap_or(0.0);
        log::info!(
            "training finished after {} epochs ({} examples): loss = {:.6}",
            cfg.epochs,
            data.len(),
            final_loss
        );

        Ok(TrainReport {
            loss_history,
            final_loss,
        })
    }
}
