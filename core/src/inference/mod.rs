//! Classifier boundary
//!
//! The digitization and decision code depends only on the [`Classifier`]
//! trait. Any model that maps 12 canonical-order leads plus the lead graph to
//! 5 raw class scores can be plugged in.

mod linear;

pub use linear::{default_model_path, LinearGraphModel, ModelWeights, DEFAULT_MODEL_PATH};

use crate::error::{EcgError, Result};
use crate::graph::{LeadGraph, NodeFeatures};
use crate::types::{ProbabilityVector, CLASS_COUNT};
use log::debug;

/// A trained multi-label ECG classifier
///
/// Implementations must be deterministic for fixed weights and input
/// (no dropout or other stochastic layers at prediction time).
pub trait Classifier: Send + Sync {
    /// Returns raw (pre-sigmoid) scores in `TARGET_CLASSES` order
    ///
    /// # Errors
    ///
    /// Returns `EcgError::InferenceFailure` if the model cannot evaluate the input.
    fn predict(&self, features: &NodeFeatures, graph: &LeadGraph) -> Result<[f32; CLASS_COUNT]>;
}

/// Runs a classifier and converts its scores to probabilities
pub fn predict_probabilities<C>(
    classifier: &C,
    features: &NodeFeatures,
    graph: &LeadGraph,
) -> Result<ProbabilityVector>
where
    C: Classifier + ?Sized,
{
    let logits = classifier.predict(features, graph)?;
    debug!("Classifier scores: {:?}", logits);
    ProbabilityVector::from_logits(logits)
}

/// Classifier that returns the same scores for every input
///
/// Useful for exercising the decision path without a trained model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedScores {
    logits: [f32; CLASS_COUNT],
}

impl FixedScores {
    pub fn new(logits: [f32; CLASS_COUNT]) -> Self {
        Self { logits }
    }

    /// Builds the scores whose sigmoid equals the given probabilities
    ///
    /// # Errors
    ///
    /// Returns an error if any probability lies outside the open interval (0, 1).
    pub fn from_probabilities(probabilities: [f32; CLASS_COUNT]) -> Result<Self> {
        let mut logits = [0.0f32; CLASS_COUNT];
        for (logit, &p) in logits.iter_mut().zip(probabilities.iter()) {
            if !(p > 0.0 && p < 1.0) {
                return Err(EcgError::InferenceFailure(format!(
                    "probability {} has no finite logit",
                    p
                )));
            }
            *logit = (p / (1.0 - p)).ln();
        }
        Ok(Self { logits })
    }
}

impl Classifier for FixedScores {
    fn predict(&self, _features: &NodeFeatures, _graph: &LeadGraph) -> Result<[f32; CLASS_COUNT]> {
        Ok(self.logits)
    }
}
