pub mod api;
pub mod cli;
pub mod decision;
pub mod error;
pub mod extraction;
pub mod graph;
pub mod inference;
pub mod types;

pub use api::{EcgAnalysis, EcgAnalyzer};
pub use cli::report::{AnalysisReport, ErrorReport, TextReport};
pub use decision::{CalibratedDecisionEngine, Decision, RiskAssessment, RiskAssessor, ThresholdDetail};
pub use error::{EcgError, Result};
pub use extraction::{ExtractorConfig, GridDigitizer, WaveformExtractor};
pub use graph::{GraphBuilder, LeadGraph, NodeFeatures};
pub use inference::{Classifier, LinearGraphModel};
pub use types::*;
