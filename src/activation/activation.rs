use serde::{Serialize, Deserialize};
use std::f64::consts::{E, PI};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ActivationFunction {
    Sigmoid,
    ReLU,
    Identity,
    /// Vector-valued; only meaningful through `apply()`.
    Softmax,
    Tanh,
    LeakyReLU { alpha: f64 },
    Elu { alpha: f64 },
    Gelu,
    Swish,
}

impl ActivationFunction {
    /// Element-wise activation. `Softmax` has no element-wise form and passes
    /// the value through; use `apply()` for whole layers.
    pub fn function(&self, x: f64) -> f64 {
        match self {
            ActivationFunction::Sigmoid => 1.0 / (1.0 + E.powf(-x)),
            ActivationFunction::ReLU => if x > 0.0 { x } else { 0.0 },
            ActivationFunction::Identity | ActivationFunction::Softmax => x,
            ActivationFunction::Tanh => x.tanh(),
            ActivationFunction::LeakyReLU { alpha } => if x > 0.0 { x } else { alpha * x },
            ActivationFunction::Elu { alpha } => {
                if x > 0.0 { x } else { alpha * (E.powf(x) - 1.0) }
            }
            ActivationFunction::Gelu => {
                let c = (2.0_f64 / PI).sqrt();
                0.5 * x * (1.0 + (c * (x + 0.044715 * x.powi(3))).tanh())
            }
            ActivationFunction::Swish => x / (1.0 + E.powf(-x)),
        }
    }

    /// Applies the activation to a full pre-activation row.
    pub fn apply(&self, z: Vec<f64>) -> Vec<f64> {
        match self {
            ActivationFunction::Softmax => softmax(z),
            _ => z.into_iter().map(|x| self.function(x)).collect(),
        }
    }
}

/// Max-shifted softmax so large logits do not overflow `exp`.
fn softmax(z: Vec<f64>) -> Vec<f64> {
    let max = z.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = z.iter().map(|x| (x - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn softmax_sums_to_one_and_keeps_order() {
        let out = ActivationFunction::Softmax.apply(vec![1.0, 3.0, 2.0, 0.5]);
        let sum: f64 = out.iter().sum();
        assert!((sum - 1.0).abs() < 1e-12);
        assert!(out[1] > out[2] && out[2] > out[0] && out[0] > out[3]);
    }

    #[test]
    fn softmax_survives_huge_logits() {
        let out = ActivationFunction::Softmax.apply(vec![1000.0, 1000.0]);
        assert!((out[0] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn relu_and_leaky_relu() {
        assert_eq!(ActivationFunction::ReLU.apply(vec![-2.0, 3.0]), vec![0.0, 3.0]);
        let leaky = ActivationFunction::LeakyReLU { alpha: 0.1 };
        assert!((leaky.function(-2.0) + 0.2).abs() < 1e-12);
    }

    #[test]
    fn activator_names_match_artifact_format() {
        let json = serde_json::to_string(&ActivationFunction::Softmax).unwrap();
        assert_eq!(json, "\"Softmax\"");
        let elu: ActivationFunction = serde_json::from_str(r#"{"Elu":{"alpha":1.0}}"#).unwrap();
        assert_eq!(elu, ActivationFunction::Elu { alpha: 1.0 });
    }
}
