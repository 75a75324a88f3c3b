use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::{math::matrix::Matrix, activation::activation::ActivationFunction};

/// Fully connected layer: `a = activation(x · W + b)`.
///
/// `weights` is `(input_size, size)` and `biases` is `(1, size)`. The layer
/// holds no per-call state, so a loaded network can be shared across threads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub size: usize,
    pub weights: Matrix,
    pub biases: Matrix,
    pub activator: ActivationFunction
}

impl Layer {
    /// He-initialized weights with zero biases.
    pub fn new<R: Rng + ?Sized>(
        size: usize,
        input_size: usize,
        activation: ActivationFunction,
        rng: &mut R,
    ) -> Layer {
        Layer {
            size,
            weights: Matrix::he(input_size, size, rng),
            biases: Matrix::zeros(1, size),
            activator: activation
        }
    }

    pub fn input_size(&self) -> usize {
        self.weights.rows
    }

    /// Forward pass for one sample. `None` if `input` has the wrong length.
    pub fn feed_from(&self, input: &[f64]) -> Option<Vec<f64>> {
        let mut z = self.weights.row_product(input)?;
        for (v, b) in z.iter_mut().zip(self.biases.data.first()?.iter()) {
            *v += b;
        }
        Some(self.activator.apply(z))
    }

    /// Checks that the stored shapes agree with `size` and with each other.
    pub fn check_shapes(&self) -> Result<(), String> {
        if !self.weights.is_well_formed() || !self.biases.is_well_formed() {
            return Err("weight or bias rows have inconsistent lengths".into());
        }
        if self.weights.cols != self.size {
            return Err(format!(
                "weights have {} columns but layer size is {}", self.weights.cols, self.size
            ));
        }
        if self.biases.rows != 1 || self.biases.cols != self.size {
            return Err(format!(
                "biases are {}x{} but layer size is {}", self.biases.rows, self.biases.cols, self.size
            ));
        }
        Ok(())
    }
}
