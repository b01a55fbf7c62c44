use crate::api::EcgAnalysis;
use crate::decision::{to_percent, ThresholdDetail};
use crate::error::EcgError;
use crate::types::{ProbabilityVector, RiskLevel, TargetClass};
use serde::Serialize;
use std::fmt;

/// Per-class probabilities as percentages, in output order
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClassPercentages {
    #[serde(rename = "NORM")]
    pub norm: f64,
    #[serde(rename = "MI")]
    pub mi: f64,
    #[serde(rename = "STTC")]
    pub sttc: f64,
    #[serde(rename = "HYP")]
    pub hyp: f64,
    #[serde(rename = "CD")]
    pub cd: f64,
}

impl From<&ProbabilityVector> for ClassPercentages {
    fn from(probs: &ProbabilityVector) -> Self {
        Self {
            norm: to_percent(probs.get(TargetClass::Norm)),
            mi: to_percent(probs.get(TargetClass::Mi)),
            sttc: to_percent(probs.get(TargetClass::Sttc)),
            hyp: to_percent(probs.get(TargetClass::Hyp)),
            cd: to_percent(probs.get(TargetClass::Cd)),
        }
    }
}

/// JSON body for a successful analysis
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub success: bool,
    pub predicted_class: TargetClass,
    pub risk_score: u8,
    pub risk_level: RiskLevel,
    pub confidence: f64,
    pub probabilities: ClassPercentages,
    pub threshold_details: Vec<ThresholdDetail>,
}

impl From<&EcgAnalysis> for AnalysisReport {
    fn from(analysis: &EcgAnalysis) -> Self {
        Self {
            success: true,
            predicted_class: analysis.decision.class,
            risk_score: analysis.risk.risk_score,
            risk_level: analysis.risk.risk_level,
            confidence: analysis.risk.confidence,
            probabilities: ClassPercentages::from(&analysis.probabilities),
            threshold_details: analysis.decision.passed.clone(),
        }
    }
}

/// JSON body for any failure
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorReport {
    pub success: bool,
    pub error: String,
}

impl ErrorReport {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: message.into(),
        }
    }
}

impl From<&EcgError> for ErrorReport {
    fn from(e: &EcgError) -> Self {
        Self::new(e.to_string())
    }
}

/// Text report formatter for an analysis
pub struct TextReport<'a> {
    analysis: &'a EcgAnalysis,
}

impl<'a> TextReport<'a> {
    /// Creates a new text report
    pub fn new(analysis: &'a EcgAnalysis) -> Self {
        Self { analysis }
    }
}

impl<'a> fmt::Display for TextReport<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let class = self.analysis.predicted_class();
        writeln!(f, "ECG Analysis")?;
        writeln!(f, "============")?;
        writeln!(f)?;
        writeln!(f, "Prediction:  {} ({})", class, class.description())?;
        writeln!(f, "Risk Level:  {}", self.analysis.risk.risk_level)?;
        writeln!(f, "Risk Score:  {}/100", self.analysis.risk.risk_score)?;
        writeln!(f, "Confidence:  {:.2}%", self.analysis.risk.confidence)?;
        writeln!(f)?;

        writeln!(f, "Probabilities")?;
        writeln!(f, "-------------")?;
        for (class, p) in self.analysis.probabilities.iter() {
            writeln!(f, "{:<6} {:>6.2}%", class.code(), to_percent(p))?;
        }
        writeln!(f)?;

        writeln!(f, "Thresholds Passed")?;
        writeln!(f, "-----------------")?;
        if self.analysis.decision.passed.is_empty() {
            writeln!(f, "none")?;
        }
        for detail in &self.analysis.decision.passed {
            writeln!(
                f,
                "{:<6} p={:.4} threshold={:.2} margin={:+.4}",
                detail.class.code(),
                detail.probability,
                detail.threshold,
                detail.margin()
            )?;
        }

        Ok(())
    }
}
