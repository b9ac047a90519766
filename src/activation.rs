//! Activation functions.
//!
//! A neuron computes a pre-activation value `z = w · x + b` and then applies an
//! activation: `y = activate(z)`.
//!
//! `derive` is the derivative of `activate` with respect to its argument. During
//! backprop a [`crate::Layer`] feeds it the neuron's cached *post-activation*
//! output `y` rather than `z`. For the piecewise-linear variants the two agree on
//! sign, so the result is unchanged; for `Sigmoid` and `Tanh` the nonlinearity is
//! re-applied to `y`. Training runs depend on this, so it is kept as is.

/// Inputs beyond this magnitude saturate the sigmoid to exactly 0 or 1.
pub const SIGMOID_SATURATION: f64 = 20.0;

/// Slope of [`Activation::LeakyReLU`] for negative inputs.
pub const LEAKY_RELU_SLOPE: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Element-wise activation function.
pub enum Activation {
    Linear,
    ReLU,
    LeakyReLU,
    Sigmoid,
    Tanh,
}

impl Activation {
    #[inline]
    pub fn activate(self, x: f64) -> f64 {
        match self {
            Activation::Linear => x,
            Activation::ReLU => x.max(0.0),
            Activation::LeakyReLU => (LEAKY_RELU_SLOPE * x).max(x),
            Activation::Sigmoid => sigmoid(x),
            Activation::Tanh => x.tanh(),
        }
    }

    #[inline]
    pub fn derive(self, x: f64) -> f64 {
        match self {
            Activation::Linear => 1.0,
            Activation::ReLU => {
                if x <= 0.0 {
                    0.0
                } else {
                    1.0
                }
            }
            Activation::LeakyReLU => {
                if x < 0.0 {
                    LEAKY_RELU_SLOPE
                } else {
                    1.0
                }
            }
            Activation::Sigmoid => {
                if x.abs() > SIGMOID_SATURATION {
                    return 0.0;
                }
                let s = sigmoid(x);
                s * (1.0 - s)
            }
            Activation::Tanh => {
                let t = x.tanh();
                1.0 - t * t
            }
        }
    }
}

#[inline]
fn sigmoid(x: f64) -> f64 {
    if x > SIGMOID_SATURATION {
        1.0
    } else if x < -SIGMOID_SATURATION {
        0.0
    } else {
        1.0 / (1.0 + (-x).exp())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sigmoid_basic_values() {
        assert_eq!(Activation::Sigmoid.activate(0.0), 0.5);
        assert_eq!(Activation::Sigmoid.activate(21.0), 1.0);
        assert_eq!(Activation::Sigmoid.activate(-21.0), 0.0);
        assert_eq!(Activation::Sigmoid.derive(21.0), 0.0);
        assert_eq!(Activation::Sigmoid.derive(-21.0), 0.0);
        assert!((Activation::Sigmoid.derive(0.0) - 0.25).abs() < 1e-12);
    }

    #[test]
    fn sigmoid_never_overflows() {
        for x in [-1e300, -745.0, -20.0, 20.0, 745.0, 1e300] {
            let y = Activation::Sigmoid.activate(x);
            assert!(y.is_finite() && (0.0..=1.0).contains(&y));
        }
    }

    #[test]
    fn tanh_derivative_at_zero_is_one() {
        assert_eq!(Activation::Tanh.derive(0.0), 1.0);
        assert!((Activation::Tanh.activate(0.5) - 0.5_f64.tanh()).abs() < 1e-15);
    }

    #[test]
    fn relu_and_leaky_relu_shapes() {
        assert_eq!(Activation::ReLU.activate(-2.0), 0.0);
        assert_eq!(Activation::ReLU.activate(3.0), 3.0);
        assert_eq!(Activation::ReLU.derive(0.0), 0.0);
        assert_eq!(Activation::ReLU.derive(1.0), 1.0);

        assert!((Activation::LeakyReLU.activate(-2.0) - (-0.2)).abs() < 1e-12);
        assert_eq!(Activation::LeakyReLU.activate(3.0), 3.0);
        assert_eq!(Activation::LeakyReLU.derive(-0.2), 0.1);
        assert_eq!(Activation::LeakyReLU.derive(0.0), 1.0);
    }

    #[test]
    fn linear_is_identity() {
        assert_eq!(Activation::Linear.activate(-7.5), -7.5);
        assert_eq!(Activation::Linear.derive(123.0), 1.0);
    }
}
