use super::enums::{TargetClass, CLASS_COUNT, TARGET_CLASSES};
use crate::error::{EcgError, Result};

/// Per-class probabilities in classifier output order
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbabilityVector {
    values: [f32; CLASS_COUNT],
}

impl ProbabilityVector {
    /// Wraps probabilities, rejecting values outside [0, 1] or non-finite
    pub fn new(values: [f32; CLASS_COUNT]) -> Result<Self> {
        for (class, value) in TARGET_CLASSES.iter().zip(values.iter()) {
            if !value.is_finite() || !(0.0..=1.0).contains(value) {
                return Err(EcgError::InferenceFailure(format!(
                    "probability for {} out of range: {}",
                    class, value
                )));
            }
        }
        Ok(Self { values })
    }

    /// Converts raw classifier scores with an element-wise logistic sigmoid
    pub fn from_logits(logits: [f32; CLASS_COUNT]) -> Result<Self> {
        if let Some(pos) = logits.iter().position(|l| !l.is_finite()) {
            return Err(EcgError::InferenceFailure(format!(
                "classifier returned non-finite score for {}: {}",
                TARGET_CLASSES[pos], logits[pos]
            )));
        }
        Self::new(logits.map(sigmoid))
    }

    /// Probability for a class
    pub fn get(&self, class: TargetClass) -> f32 {
        self.values[class.index()]
    }

    pub fn values(&self) -> &[f32; CLASS_COUNT] {
        &self.values
    }

    /// Iterates (class, probability) in output order
    pub fn iter(&self) -> impl Iterator<Item = (TargetClass, f32)> + '_ {
        TARGET_CLASSES.iter().copied().zip(self.values.iter().copied())
    }
}

/// Logistic sigmoid, stable for large negative inputs
pub fn sigmoid(x: f32) -> f32 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}
