//! Core type definitions for ECG digitization and classification
//!
//! This module provides the fundamental types used throughout the ecgscan library:
//! - [`Lead`]: The 12 standard leads in canonical order
//! - [`TargetClass`]: Diagnostic superclasses predicted by the classifier
//! - [`RiskLevel`]: Risk categories attached to a decision
//! - [`WaveformSignal`] / [`SignalMatrix`]: Digitized lead traces
//! - [`ProbabilityVector`]: Per-class classifier probabilities
//! - [`ThresholdTable`]: Calibrated per-class decision thresholds

mod enums;
mod probability;
mod signal;
mod thresholds;

pub use enums::{
    Lead, RiskLevel, TargetClass, CANONICAL_LEADS, CLASS_COUNT, DISEASE_CLASSES, LEAD_COUNT,
    TARGET_CLASSES,
};
pub use probability::{sigmoid, ProbabilityVector};
pub use signal::{SignalMatrix, WaveformSignal, SAMPLES_PER_LEAD};
pub use thresholds::ThresholdTable;
