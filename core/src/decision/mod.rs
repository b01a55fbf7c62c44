pub mod engine;
pub mod risk;

pub use engine::{CalibratedDecisionEngine, Decision, ThresholdDetail};
pub use risk::{to_percent, RiskAssessment, RiskAssessor};
