use crate::error::{Error, Result};
use crate::vectorizer::{SparseVec, Vectorizer};
use serde::{Deserialize, Serialize};

/// Multiclass linear classifier over a fitted TF-IDF feature space.
///
/// Weights are one flat row per class, trained offline with logistic-loss
/// SGD; at serving time prediction is an argmax over per-class decision
/// scores, ties broken by ascending class index.
#[derive(Debug, Serialize, Deserialize)]
pub struct GenreModel {
    classes: Vec<String>,
    weights: Vec<f32>, // classes * num_features, row-major
    bias: Vec<f32>,
    num_features: usize,
}

impl GenreModel {
    pub fn new(classes: Vec<String>, num_features: usize) -> Self {
        let num_classes = classes.len();
        Self {
            classes,
            weights: vec![0.0; num_classes * num_features],
            bias: vec![0.0; num_classes],
            num_features,
        }
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn num_features(&self) -> usize {
        self.num_features
    }

    /// Per-class decision scores w·x + b.
    pub fn decision_scores(&self, x: &SparseVec) -> Vec<f32> {
        let mut scores = self.bias.clone();
        for (c, score) in scores.iter_mut().enumerate() {
            let row = &self.weights[c * self.num_features..(c + 1) * self.num_features];
            for &(tid, v) in x {
                *score += row[tid as usize] * v;
            }
        }
        scores
    }

    /// Predicted class label for a feature vector.
    pub fn predict(&self, x: &SparseVec) -> &str {
        let scores = self.decision_scores(x);
        let mut best = 0;
        for (c, &s) in scores.iter().enumerate() {
            if s > scores[best] {
                best = c;
            }
        }
        &self.classes[best]
    }

    /// One SGD step on a single labeled example: softmax over the decision
    /// scores, then a gradient update on every class row touched by `x`.
    pub fn train_step(&mut self, x: &SparseVec, label: usize, lr: f32) {
        let scores = self.decision_scores(x);
        let max = scores.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        let exp: Vec<f32> = scores.iter().map(|s| (s - max).exp()).collect();
        let sum: f32 = exp.iter().sum();

        for (c, e) in exp.into_iter().enumerate() {
            let p = e / sum;
            let grad = p - if c == label { 1.0 } else { 0.0 };
            self.bias[c] -= lr * grad;
            let row = &mut self.weights[c * self.num_features..(c + 1) * self.num_features];
            for &(tid, v) in x {
                row[tid as usize] -= lr * grad * v;
            }
        }
    }
}

/// Serving-side pairing of a fitted vectorizer and the model trained in
/// its feature space. The two are persisted together and must never be
/// mixed across training runs.
#[derive(Debug, Serialize, Deserialize)]
pub struct GenrePredictor {
    vectorizer: Vectorizer,
    model: GenreModel,
}

impl GenrePredictor {
    pub fn new(vectorizer: Vectorizer, model: GenreModel) -> Result<Self> {
        if vectorizer.num_features() != model.num_features() {
            return Err(Error::Artifact(format!(
                "vectorizer has {} features but model expects {}",
                vectorizer.num_features(),
                model.num_features()
            )));
        }
        Ok(Self { vectorizer, model })
    }

    pub fn predict(&self, summary: &str) -> String {
        let x = self.vectorizer.transform(summary);
        self.model.predict(&x).to_string()
    }

    pub fn vectorizer(&self) -> &Vectorizer {
        &self.vectorizer
    }

    pub fn model(&self) -> &GenreModel {
        &self.model
    }
}
