//! Metrics.
//!
//! Metrics are evaluation helpers; they do not participate in backprop.

use crate::error::ensure_len;
use crate::{Dataset, Error, Network, Result, math};

/// Loss and accuracy of a network over a dataset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvalReport {
    /// Mean per-example loss.
    pub loss: f64,
    /// Fraction of examples whose predicted class (argmax) matches the target's.
    pub accuracy: f64,
}

/// Fraction of examples where `arg_max(prediction) == arg_max(target)`.
pub fn accuracy(network: &mut Network, data: &Dataset) -> Result<f64> {
    Ok(network.evaluate(data)?.accuracy)
}

impl Network {
    /// Evaluate on `data` without updating any parameters.
    pub fn evaluate(&mut self, data: &Dataset) -> Result<EvalReport> {
        if data.is_empty() {
            return Err(Error::InvalidData("dataset must not be empty".to_owned()));
        }
        ensure_len("eval target", self.output_size(), data.target_dim())?;

        let mut total_loss = 0.0;
        let mut correct = 0usize;
        for idx in 0..data.len() {
            let target = data.target(idx);
            let prediction = self.predict(data.input(idx))?;
            total_loss += self.loss().loss(&prediction, target)?;
            if math::arg_max(&prediction) == math::arg_max(target) {
                correct += 1;
            }
        }

        let n = data.len() as f64;
        Ok(EvalReport {
            loss: total_loss / n,
            accuracy: correct as f64 / n,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::{Activation, Layer, Loss, Neuron};

    #[test]
    fn accuracy_counts_argmax_matches() {
        // Logits = [x0, x1]: the larger input coordinate wins.
        let layer = Layer::from_parts(
            vec![
                Neuron::from_parts(vec![1.0, 0.0], 0.0),
                Neuron::from_parts(vec![0.0, 1.0], 0.0),
            ],
            Activation::Linear,
        )
        .unwrap();
        let mut net =
            Network::from_layers(vec![layer], Activation::Tanh, Loss::CrossEntropy).unwrap();

        let data = Dataset::from_rows(
            &[vec![1.0, 0.0], vec![0.0, 1.0], vec![2.0, 1.0], vec![0.0, 3.0]],
            &[vec![1.0, 0.0], vec![0.0, 1.0], vec![0.0, 1.0], vec![0.0, 1.0]],
        )
        .unwrap();

        let report = net.evaluate(&data).unwrap();
        assert_eq!(report.accuracy, 0.75);
        assert!(report.loss > 0.0);
        assert_eq!(accuracy(&mut net, &data).unwrap(), 0.75);
    }
}
