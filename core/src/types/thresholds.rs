use super::enums::{TargetClass, DISEASE_CLASSES};
use crate::error::{EcgError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Calibrated decision thresholds for the four disease classes
///
/// NORM has no threshold: it is the fallback when no disease passes.
/// Built once at startup and shared by reference; never mutated afterwards.
///
/// # Example
///
/// ```
/// use ecgscan_core::{TargetClass, ThresholdTable};
///
/// let table = ThresholdTable::default().with_threshold(TargetClass::Sttc, 0.8).unwrap();
///
/// assert_eq!(table.get(TargetClass::Mi), Some(0.92));
/// assert_eq!(table.get(TargetClass::Sttc), Some(0.8));
/// assert_eq!(table.get(TargetClass::Norm), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ThresholdTable {
    #[serde(rename = "MI")]
    pub mi: f64,

    #[serde(rename = "STTC")]
    pub sttc: f64,

    #[serde(rename = "HYP")]
    pub hyp: f64,

    #[serde(rename = "CD")]
    pub cd: f64,
}

impl Default for ThresholdTable {
    fn default() -> Self {
        Self {
            mi: 0.92,
            sttc: 0.78,
            hyp: 0.92,
            cd: 0.91,
        }
    }
}

impl ThresholdTable {
    /// Threshold for a class, `None` for NORM
    pub fn get(&self, class: TargetClass) -> Option<f64> {
        match class {
            TargetClass::Norm => None,
            TargetClass::Mi => Some(self.mi),
            TargetClass::Sttc => Some(self.sttc),
            TargetClass::Hyp => Some(self.hyp),
            TargetClass::Cd => Some(self.cd),
        }
    }

    /// Builder: Override one disease threshold
    ///
    /// # Errors
    ///
    /// Returns an error for NORM or a threshold outside [0, 1]
    pub fn with_threshold(mut self, class: TargetClass, threshold: f64) -> Result<Self> {
        let slot = match class {
            TargetClass::Norm => {
                return Err(EcgError::InvalidConfig(
                    "NORM does not take a threshold".to_string(),
                ))
            }
            TargetClass::Mi => &mut self.mi,
            TargetClass::Sttc => &mut self.sttc,
            TargetClass::Hyp => &mut self.hyp,
            TargetClass::Cd => &mut self.cd,
        };
        *slot = threshold;
        self.validate()?;
        Ok(self)
    }

    /// Loads a threshold override file
    ///
    /// The file is a JSON object with exactly the keys MI, STTC, HYP and CD.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let table: ThresholdTable = serde_json::from_str(&text).map_err(|e| {
            EcgError::InvalidConfig(format!("{}: {}", path.display(), e))
        })?;
        table.validate()?;
        Ok(table)
    }

    /// Checks every threshold lies in [0, 1]
    pub fn validate(&self) -> Result<()> {
        for class in DISEASE_CLASSES {
            if let Some(t) = self.get(class) {
                if !(0.0..=1.0).contains(&t) {
                    return Err(EcgError::InvalidConfig(format!(
                        "threshold for {} must be within [0, 1], got {}",
                        class, t
                    )));
                }
            }
        }
        Ok(())
    }
}
