use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of standard ECG leads
pub const LEAD_COUNT: usize = 12;

/// Number of classifier output classes
pub const CLASS_COUNT: usize = 5;

/// Diagnostic superclass predicted by the classifier
///
/// Variant order is the classifier output order (NORM, MI, STTC, HYP, CD).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TargetClass {
    /// Normal ECG
    Norm,
    /// Myocardial infarction
    Mi,
    /// ST/T change
    Sttc,
    /// Hypertrophy
    Hyp,
    /// Conduction disturbance
    Cd,
}

/// All classifier outputs, in output-vector order
pub const TARGET_CLASSES: [TargetClass; CLASS_COUNT] = [
    TargetClass::Norm,
    TargetClass::Mi,
    TargetClass::Sttc,
    TargetClass::Hyp,
    TargetClass::Cd,
];

/// Classes that carry a calibrated threshold, in tie-break order
pub const DISEASE_CLASSES: [TargetClass; 4] = [
    TargetClass::Mi,
    TargetClass::Sttc,
    TargetClass::Hyp,
    TargetClass::Cd,
];

impl TargetClass {
    /// Position of this class in the classifier output vector
    pub fn index(&self) -> usize {
        match self {
            TargetClass::Norm => 0,
            TargetClass::Mi => 1,
            TargetClass::Sttc => 2,
            TargetClass::Hyp => 3,
            TargetClass::Cd => 4,
        }
    }

    /// Returns the class code used in reports
    pub fn code(&self) -> &'static str {
        match self {
            TargetClass::Norm => "NORM",
            TargetClass::Mi => "MI",
            TargetClass::Sttc => "STTC",
            TargetClass::Hyp => "HYP",
            TargetClass::Cd => "CD",
        }
    }

    /// Returns a human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            TargetClass::Norm => "Normal ECG",
            TargetClass::Mi => "Myocardial infarction",
            TargetClass::Sttc => "ST/T change",
            TargetClass::Hyp => "Hypertrophy",
            TargetClass::Cd => "Conduction disturbance",
        }
    }

    /// Whether this class is a disease finding (anything but NORM)
    pub fn is_disease(&self) -> bool {
        !matches!(self, TargetClass::Norm)
    }

    /// Parses a class code, case-insensitively
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "NORM" => Some(TargetClass::Norm),
            "MI" => Some(TargetClass::Mi),
            "STTC" => Some(TargetClass::Sttc),
            "HYP" => Some(TargetClass::Hyp),
            "CD" => Some(TargetClass::Cd),
            _ => None,
        }
    }
}

impl fmt::Display for TargetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Risk level attached to a decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
}

impl RiskLevel {
    /// Fixed lookup from the selected class to its risk level
    pub fn for_class(class: TargetClass) -> Self {
        match class {
            TargetClass::Norm => RiskLevel::Low,
            TargetClass::Mi | TargetClass::Sttc => RiskLevel::High,
            TargetClass::Hyp | TargetClass::Cd => RiskLevel::Moderate,
        }
    }

    /// Returns simple name for display
    pub fn simple_name(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Moderate => "Moderate",
            RiskLevel::High => "High",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.simple_name())
    }
}

/// Standard ECG lead, in canonical clinical order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Lead {
    I,
    II,
    III,
    AVr,
    AVl,
    AVf,
    V1,
    V2,
    V3,
    V4,
    V5,
    V6,
}

/// Leads in canonical order (I, II, III, aVR, aVL, aVF, V1-V6)
pub const CANONICAL_LEADS: [Lead; LEAD_COUNT] = [
    Lead::I,
    Lead::II,
    Lead::III,
    Lead::AVr,
    Lead::AVl,
    Lead::AVf,
    Lead::V1,
    Lead::V2,
    Lead::V3,
    Lead::V4,
    Lead::V5,
    Lead::V6,
];

impl Lead {
    /// Position of this lead in canonical order
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Returns the lead for a canonical index
    pub fn from_index(index: usize) -> Option<Self> {
        CANONICAL_LEADS.get(index).copied()
    }

    /// Returns the conventional lead label
    pub fn name(&self) -> &'static str {
        match self {
            Lead::I => "I",
            Lead::II => "II",
            Lead::III => "III",
            Lead::AVr => "aVR",
            Lead::AVl => "aVL",
            Lead::AVf => "aVF",
            Lead::V1 => "V1",
            Lead::V2 => "V2",
            Lead::V3 => "V3",
            Lead::V4 => "V4",
            Lead::V5 => "V5",
            Lead::V6 => "V6",
        }
    }

    /// Whether this is a limb lead (I-aVF)
    pub fn is_limb(&self) -> bool {
        self.index() < 6
    }

    /// Whether this is a precordial lead (V1-V6)
    pub fn is_precordial(&self) -> bool {
        !self.is_limb()
    }
}

impl fmt::Display for Lead {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
