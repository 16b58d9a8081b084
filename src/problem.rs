use std::{
    fs::File,
    io::{BufReader, BufWriter},
    path::Path,
};

use log::info;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    error::Result,
    loss::softmax::{Dims, Strategy, validate},
    math::matrix::Matrix,
};

/// Scale of randomly generated weights, small enough that initial scores sit near zero.
const WEIGHT_SCALE: f64 = 1e-3;

/// One evaluation of the softmax loss: weights, a minibatch, its labels and
/// the regularization strength.
///
/// Saved as JSON with matrices written row by row:
/// ```json
/// { "weights": [[1.0, 0.0], [0.0, 1.0]], "features": [[1.0, 0.0]], "labels": [0], "reg": 0.0 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoftmaxProblem {
    /// `D x C`.
    pub weights: Matrix,
    /// `N x D`.
    pub features: Matrix,
    /// `N` labels in `[0, C)`.
    pub labels: Vec<usize>,
    #[serde(default)]
    pub reg: f64,
}

impl SoftmaxProblem {
    /// Bundles the inputs after checking they fit together.
    pub fn new(weights: Matrix, features: Matrix, labels: Vec<usize>, reg: f64) -> Result<Self> {
        validate(weights.shape(), features.shape(), &labels, reg)?;

        Ok(Self {
            weights,
            features,
            labels,
            reg,
        })
    }

    /// A random problem: features in [-1, 1), tiny weights and uniform labels.
    pub fn random<R: Rng + ?Sized>(dims: Dims, reg: f64, rng: &mut R) -> Result<Self> {
        let Dims {
            num_train,
            dim,
            num_classes,
        } = dims;

        let weights = Matrix::random_scaled(dim, num_classes, WEIGHT_SCALE, rng);
        let features = Matrix::random_scaled(num_train, dim, 1.0, rng);
        let labels = (0..num_train)
            .map(|_| rng.gen_range(0..num_classes.max(1)))
            .collect();

        Self::new(weights, features, labels, reg)
    }

    /// Checks the stored inputs, e.g. after deserialization.
    pub fn dims(&self) -> Result<Dims> {
        validate(
            self.weights.shape(),
            self.features.shape(),
            &self.labels,
            self.reg,
        )
    }

    /// Runs the loss with the given strategy.
    pub fn evaluate(&self, strategy: Strategy) -> Result<(f64, Matrix)> {
        strategy.compute(&self.weights, &self.features, &self.labels, self.reg)
    }

    /// The loss alone at an arbitrary weight matrix, keeping the batch fixed.
    pub fn loss_at(&self, weights: &Matrix, strategy: Strategy) -> Result<f64> {
        let (loss, _) = strategy.compute(weights, &self.features, &self.labels, self.reg)?;
        Ok(loss)
    }

    /// Serializes the problem to a pretty-printed JSON file.
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path.as_ref())?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        info!("saved problem to {}", path.as_ref().display());
        Ok(())
    }

    /// Deserializes a problem written by `save_json` and validates it.
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let problem: SoftmaxProblem = serde_json::from_reader(BufReader::new(file))?;
        problem.dims()?;
        info!("loaded problem from {}", path.as_ref().display());
        Ok(problem)
    }
}
