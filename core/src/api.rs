use crate::decision::{CalibratedDecisionEngine, Decision, RiskAssessment, RiskAssessor};
use crate::error::Result;
use crate::extraction::GridDigitizer;
use crate::graph::GraphBuilder;
use crate::inference::{predict_probabilities, Classifier};
use crate::types::{ProbabilityVector, RiskLevel, SignalMatrix, TargetClass, ThresholdTable};
use image::RgbImage;
use log::info;
use std::path::Path;

/// End-to-end ECG image analysis
///
/// Digitizes a 6x2 printout, runs the classifier, applies the calibrated
/// thresholds and scores the risk. Every call is all-or-nothing: any error
/// aborts the analysis without a partial result.
///
/// # Example
///
/// ```
/// use ecgscan_core::inference::FixedScores;
/// use ecgscan_core::{EcgAnalyzer, RiskLevel, TargetClass, ThresholdTable};
/// use image::{Rgb, RgbImage};
///
/// // A blank printout digitizes to flat leads
/// let image = RgbImage::from_pixel(400, 120, Rgb([255, 255, 255]));
///
/// // Classifier that is 95% sure of MI and unsure of everything else
/// let classifier = FixedScores::from_probabilities([0.1, 0.95, 0.5, 0.5, 0.5]).unwrap();
/// let analyzer = EcgAnalyzer::new(classifier, ThresholdTable::default());
///
/// let analysis = analyzer.analyze_image(&image).unwrap();
/// assert_eq!(analysis.predicted_class(), TargetClass::Mi);
/// assert_eq!(analysis.risk.risk_level, RiskLevel::High);
/// ```
pub struct EcgAnalyzer<C: Classifier> {
    digitizer: GridDigitizer,
    classifier: C,
    thresholds: ThresholdTable,
}

impl<C: Classifier> EcgAnalyzer<C> {
    /// Creates an analyzer with the default extractor calibration
    pub fn new(classifier: C, thresholds: ThresholdTable) -> Self {
        Self::with_digitizer(GridDigitizer::default(), classifier, thresholds)
    }

    /// Creates an analyzer with a custom digitizer
    pub fn with_digitizer(
        digitizer: GridDigitizer,
        classifier: C,
        thresholds: ThresholdTable,
    ) -> Self {
        Self {
            digitizer,
            classifier,
            thresholds,
        }
    }

    pub fn thresholds(&self) -> &ThresholdTable {
        &self.thresholds
    }

    /// Analyzes an image file
    ///
    /// # Errors
    ///
    /// - `InputNotFound` / `ImageReadError` from digitization
    /// - `InferenceFailure` from the classifier
    pub fn analyze_path(&self, path: &Path) -> Result<EcgAnalysis> {
        info!("Analyzing {}", path.display());
        let signals = self.digitizer.digitize_path(path)?;
        self.analyze_signals(&signals)
    }

    /// Analyzes an in-memory image
    pub fn analyze_image(&self, image: &RgbImage) -> Result<EcgAnalysis> {
        let signals = self.digitizer.digitize(image)?;
        self.analyze_signals(&signals)
    }

    /// Classifies already-digitized signals
    pub fn analyze_signals(&self, signals: &SignalMatrix) -> Result<EcgAnalysis> {
        let (features, graph) = GraphBuilder::build(signals);
        let probabilities = predict_probabilities(&self.classifier, &features, graph)?;
        let decision = CalibratedDecisionEngine::decide(&probabilities, &self.thresholds);
        let risk = RiskAssessor::assess(&decision, &probabilities);

        info!(
            "Predicted {} (risk {} / {}, confidence {:.2}%)",
            decision.class, risk.risk_score, risk.risk_level, risk.confidence
        );

        Ok(EcgAnalysis {
            probabilities,
            decision,
            risk,
        })
    }
}

/// Result of analyzing one ECG image
#[derive(Debug, Clone, PartialEq)]
pub struct EcgAnalysis {
    /// Classifier probabilities in output order
    pub probabilities: ProbabilityVector,

    /// Calibrated decision with passed classes
    pub decision: Decision,

    /// Risk score, level and confidence
    pub risk: RiskAssessment,
}

impl EcgAnalysis {
    /// The selected class
    pub fn predicted_class(&self) -> TargetClass {
        self.decision.class
    }

    pub fn risk_level(&self) -> RiskLevel {
        self.risk.risk_level
    }

    /// Whether any disease cleared its threshold
    pub fn has_finding(&self) -> bool {
        !self.decision.is_fallback()
    }
}
