use rand::Rng;
use serde::{Serialize, Deserialize};
use std::f64::consts::PI;

/// Row-major dense matrix as stored in model artifacts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix {
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<Vec<f64>>
}

impl Matrix {
    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix {
            rows,
            cols,
            data: vec![vec![0.0; cols]; rows]
        }
    }

    /// Builds a matrix from nested rows. Returns `None` for ragged input.
    pub fn from_data(data: Vec<Vec<f64>>) -> Option<Matrix> {
        let cols = data.first().map(|r| r.len()).unwrap_or(0);
        if data.iter().any(|r| r.len() != cols) {
            return None;
        }
        Some(Matrix { rows: data.len(), cols, data })
    }

    /// Samples a single value from N(0, 1) using the Box-Muller transform.
    fn sample_standard_normal<R: Rng + ?Sized>(rng: &mut R) -> f64 {
        // Both draws in (0, 1] to avoid log(0).
        let u1: f64 = 1.0 - rng.gen::<f64>();
        let u2: f64 = 1.0 - rng.gen::<f64>();
        (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
    }

    /// He initialization: samples from N(0, sqrt(2 / rows)).
    ///
    /// `rows` is the fan-in here because layer weights are stored as
    /// `(input_size, size)`. The caller owns the RNG so a seeded generator
    /// gives byte-identical artifacts.
    pub fn he<R: Rng + ?Sized>(rows: usize, cols: usize, rng: &mut R) -> Matrix {
        let std_dev = (2.0 / rows.max(1) as f64).sqrt();
        let mut res = Matrix::zeros(rows, cols);
        for i in 0..rows {
            for j in 0..cols {
                res.data[i][j] = Matrix::sample_standard_normal(rng) * std_dev;
            }
        }
        res
    }

    /// Whether every row has exactly `cols` entries and there are `rows` rows.
    pub fn is_well_formed(&self) -> bool {
        self.data.len() == self.rows && self.data.iter().all(|r| r.len() == self.cols)
    }

    /// Computes `input · self` for a single row vector `input` of length
    /// `self.rows`, without cloning the weights.
    ///
    /// Returns `None` when the lengths disagree.
    pub fn row_product(&self, input: &[f64]) -> Option<Vec<f64>> {
        if input.len() != self.rows {
            return None;
        }
        let mut out = vec![0.0; self.cols];
        for (x, row) in input.iter().zip(self.data.iter()) {
            for (acc, w) in out.iter_mut().zip(row.iter()) {
                *acc += x * w;
            }
        }
        Some(out)
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Matrix { rows: 0, cols: 0, data: vec![] }
    }
}
