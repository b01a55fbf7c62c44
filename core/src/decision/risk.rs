use super::engine::Decision;
use crate::types::{ProbabilityVector, RiskLevel, TargetClass};
use serde::Serialize;

/// Ceiling applied to NORM decisions: a normal finding never scores above 30
pub const NORM_RISK_CEILING: f32 = 30.0;

/// Bounded risk summary of a decision
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RiskAssessment {
    /// 0-100
    pub risk_score: u8,
    pub risk_level: RiskLevel,
    /// Probability of the selected class as a percentage, 2 decimals
    pub confidence: f64,
}

/// Maps a decision to a risk score and level
pub struct RiskAssessor;

impl RiskAssessor {
    /// Scores a decision
    ///
    /// - NORM: `floor(p_NORM * 30)`
    /// - disease: `floor(p_selected * 100)`
    ///
    /// # Example
    ///
    /// ```
    /// use ecgscan_core::{CalibratedDecisionEngine, ProbabilityVector, RiskAssessor, RiskLevel, ThresholdTable};
    ///
    /// let probs = ProbabilityVector::new([0.99, 0.0, 0.0, 0.0, 0.0]).unwrap();
    /// let decision = CalibratedDecisionEngine::decide(&probs, &ThresholdTable::default());
    /// let risk = RiskAssessor::assess(&decision, &probs);
    ///
    /// assert_eq!(risk.risk_score, 29);
    /// assert_eq!(risk.risk_level, RiskLevel::Low);
    /// ```
    pub fn assess(decision: &Decision, probabilities: &ProbabilityVector) -> RiskAssessment {
        let selected = probabilities.get(decision.class);
        let scale = match decision.class {
            TargetClass::Norm => NORM_RISK_CEILING,
            _ => 100.0,
        };

        RiskAssessment {
            risk_score: bounded_score(selected * scale),
            risk_level: RiskLevel::for_class(decision.class),
            confidence: to_percent(selected),
        }
    }
}

/// Probability as a percentage rounded to 2 decimal places
pub fn to_percent(probability: f32) -> f64 {
    round2((probability * 100.0) as f64)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn bounded_score(raw: f32) -> u8 {
    raw.floor().clamp(0.0, 100.0) as u8
}
