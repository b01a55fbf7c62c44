use crate::types::{ProbabilityVector, TargetClass, ThresholdTable, DISEASE_CLASSES};
use log::debug;
use serde::Serialize;

/// A disease class that met its calibrated threshold
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ThresholdDetail {
    pub class: TargetClass,
    pub probability: f64,
    pub threshold: f64,
}

impl ThresholdDetail {
    /// How far the probability clears the threshold
    pub fn margin(&self) -> f64 {
        self.probability - self.threshold
    }
}

/// Outcome of the calibrated decision
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    /// Selected class (NORM when nothing passed)
    pub class: TargetClass,

    /// Passed disease classes, widest margin first
    pub passed: Vec<ThresholdDetail>,
}

impl Decision {
    /// Whether no disease cleared its threshold
    pub fn is_fallback(&self) -> bool {
        self.passed.is_empty()
    }
}

/// Threshold-with-margin decision over the disease classes
///
/// # Algorithm
///
/// 1. Each disease class whose probability is `>=` its threshold passes
/// 2. No passes: the decision is NORM
/// 3. Otherwise the pass with the widest margin (probability - threshold)
///    wins; equal margins keep `DISEASE_CLASSES` order (MI, STTC, HYP, CD)
///
/// A class that clears a strict threshold by a wide margin therefore beats a
/// class with a higher raw probability but a narrower margin.
pub struct CalibratedDecisionEngine;

impl CalibratedDecisionEngine {
    /// Selects the final class for a probability vector
    ///
    /// # Example
    ///
    /// ```
    /// use ecgscan_core::{CalibratedDecisionEngine, ProbabilityVector, TargetClass, ThresholdTable};
    ///
    /// let probs = ProbabilityVector::new([0.1, 0.95, 0.2, 0.1, 0.1]).unwrap();
    /// let decision = CalibratedDecisionEngine::decide(&probs, &ThresholdTable::default());
    ///
    /// assert_eq!(decision.class, TargetClass::Mi);
    /// assert_eq!(decision.passed.len(), 1);
    /// ```
    pub fn decide(probabilities: &ProbabilityVector, thresholds: &ThresholdTable) -> Decision {
        let mut passed: Vec<ThresholdDetail> = DISEASE_CLASSES
            .iter()
            .filter_map(|&class| {
                let threshold = thresholds.get(class)?;
                let probability = probabilities.get(class) as f64;
                (probability >= threshold).then_some(ThresholdDetail {
                    class,
                    probability,
                    threshold,
                })
            })
            .collect();

        // sort_by is stable: equal margins keep DISEASE_CLASSES order
        passed.sort_by(|a, b| b.margin().total_cmp(&a.margin()));

        let class = passed.first().map_or(TargetClass::Norm, |d| d.class);
        debug!(
            "Decision {} ({} classes passed threshold)",
            class,
            passed.len()
        );

        Decision { class, passed }
    }
}
