use super::enums::{Lead, LEAD_COUNT};
use crate::error::{EcgError, Result};

/// Number of samples in every digitized lead
pub const SAMPLES_PER_LEAD: usize = 1000;

/// One lead's digitized voltage trace
///
/// Always exactly [`SAMPLES_PER_LEAD`] samples, centered at zero.
#[derive(Debug, Clone, PartialEq)]
pub struct WaveformSignal {
    samples: Vec<f32>,
}

impl WaveformSignal {
    /// Wraps a sample vector, rejecting any length other than [`SAMPLES_PER_LEAD`]
    pub fn new(samples: Vec<f32>) -> Result<Self> {
        if samples.len() != SAMPLES_PER_LEAD {
            return Err(EcgError::ImageReadError(format!(
                "waveform has {} samples, expected {}",
                samples.len(),
                SAMPLES_PER_LEAD
            )));
        }
        Ok(Self { samples })
    }

    /// An all-zero trace
    pub fn flat() -> Self {
        Self {
            samples: vec![0.0; SAMPLES_PER_LEAD],
        }
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Largest absolute sample value
    pub fn peak_amplitude(&self) -> f32 {
        self.samples.iter().fold(0.0f32, |acc, v| acc.max(v.abs()))
    }

    /// Root-mean-square amplitude
    pub fn rms(&self) -> f32 {
        let sum_sq: f64 = self.samples.iter().map(|&v| (v as f64) * (v as f64)).sum();
        (sum_sq / self.samples.len() as f64).sqrt() as f32
    }
}

/// The 12 digitized leads in canonical order
///
/// Construction guarantees exactly one signal per lead.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalMatrix {
    leads: [WaveformSignal; LEAD_COUNT],
}

impl SignalMatrix {
    /// Builds a matrix from signals already in canonical order
    pub fn new(leads: [WaveformSignal; LEAD_COUNT]) -> Self {
        Self { leads }
    }

    /// Signal for a lead
    pub fn lead(&self, lead: Lead) -> &WaveformSignal {
        &self.leads[lead.index()]
    }

    /// All signals in canonical order
    pub fn leads(&self) -> &[WaveformSignal; LEAD_COUNT] {
        &self.leads
    }

    /// Sample-major view: `rows[t][lead]`, the (time, lead) layout of a 1000x12 array
    pub fn to_time_major(&self) -> Vec<[f32; LEAD_COUNT]> {
        (0..SAMPLES_PER_LEAD)
            .map(|t| {
                let mut row = [0.0f32; LEAD_COUNT];
                for (i, signal) in self.leads.iter().enumerate() {
                    row[i] = signal.samples()[t];
                }
                row
            })
            .collect()
    }
}
