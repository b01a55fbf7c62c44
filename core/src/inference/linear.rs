use super::Classifier;
use crate::error::{EcgError, Result};
use crate::graph::{LeadGraph, NodeFeatures};
use crate::types::{CLASS_COUNT, LEAD_COUNT};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default location of the classifier weight file, relative to the
/// executable's directory or else the working directory
pub const DEFAULT_MODEL_PATH: &str = "models/ecg_model.json";

/// Weight file format version understood by [`LinearGraphModel`]
pub const WEIGHTS_VERSION: u32 = 1;

/// On-disk weight file
///
/// ```json
/// { "version": 1, "weights": [[...12 floats...], ...5 rows...], "bias": [...5 floats...] }
/// ```
///
/// Hand-set weights that were never trained carry `"demo": true`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelWeights {
    pub version: u32,
    #[serde(default)]
    pub demo: bool,
    /// One row of 12 per-lead weights per class
    pub weights: Vec<Vec<f32>>,
    /// One bias per class
    pub bias: Vec<f32>,
}

/// Graph readout classifier over per-lead signal energy
///
/// Each lead's RMS amplitude is blended with the mean RMS of its graph
/// in-neighbours (one round of mean message passing), then a linear layer
/// maps the 12 node values to 5 class scores.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearGraphModel {
    weights: [[f32; LEAD_COUNT]; CLASS_COUNT],
    bias: [f32; CLASS_COUNT],
    demo: bool,
}

/// Resolves [`DEFAULT_MODEL_PATH`]
///
/// Prefers the copy next to the running executable; falls back to the path
/// relative to the working directory.
pub fn default_model_path() -> PathBuf {
    let beside_exe = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(DEFAULT_MODEL_PATH)));
    match beside_exe {
        Some(path) if path.is_file() => path,
        _ => PathBuf::from(DEFAULT_MODEL_PATH),
    }
}

impl LinearGraphModel {
    /// Loads weights from a JSON file
    ///
    /// # Errors
    ///
    /// - `ModelResourceMissing` if the file does not exist
    /// - `InferenceFailure` if the file is not a valid weight file
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(EcgError::ModelResourceMissing(path.to_path_buf()));
        }

        let text = std::fs::read_to_string(path)?;
        let weights: ModelWeights = serde_json::from_str(&text).map_err(|e| {
            EcgError::InferenceFailure(format!(
                "malformed model weights in {}: {}",
                path.display(),
                e
            ))
        })?;

        let model = Self::from_weights(weights)?;
        info!("Loaded classifier weights from {}", path.display());
        if model.is_demo() {
            warn!(
                "{} holds untrained demonstration weights; predictions are not clinically meaningful",
                path.display()
            );
        }
        Ok(model)
    }

    /// Validates and converts a parsed weight file
    pub fn from_weights(weights: ModelWeights) -> Result<Self> {
        if weights.version != WEIGHTS_VERSION {
            return Err(EcgError::InferenceFailure(format!(
                "unsupported weight file version {} (expected {})",
                weights.version, WEIGHTS_VERSION
            )));
        }
        if weights.weights.len() != CLASS_COUNT || weights.bias.len() != CLASS_COUNT {
            return Err(EcgError::InferenceFailure(format!(
                "expected {} weight rows and biases, got {} and {}",
                CLASS_COUNT,
                weights.weights.len(),
                weights.bias.len()
            )));
        }

        let mut matrix = [[0.0f32; LEAD_COUNT]; CLASS_COUNT];
        for (c, row) in weights.weights.iter().enumerate() {
            if row.len() != LEAD_COUNT {
                return Err(EcgError::InferenceFailure(format!(
                    "weight row {} has {} entries, expected {}",
                    c,
                    row.len(),
                    LEAD_COUNT
                )));
            }
            matrix[c].copy_from_slice(row);
        }

        let mut bias = [0.0f32; CLASS_COUNT];
        bias.copy_from_slice(&weights.bias);

        let all_finite = matrix.iter().flatten().chain(bias.iter()).all(|v| v.is_finite());
        if !all_finite {
            return Err(EcgError::InferenceFailure(
                "model weights contain non-finite values".to_string(),
            ));
        }

        Ok(Self {
            weights: matrix,
            bias,
            demo: weights.demo,
        })
    }

    /// Whether the weights are marked as an untrained demonstration set
    pub fn is_demo(&self) -> bool {
        self.demo
    }

    /// Per-node values after one round of mean aggregation
    fn node_values(features: &NodeFeatures, graph: &LeadGraph) -> [f32; LEAD_COUNT] {
        let mut rms = [0.0f32; LEAD_COUNT];
        for (i, value) in rms.iter_mut().enumerate() {
            let node = features.node(i);
            let sum_sq: f32 = node.iter().map(|v| v * v).sum();
            *value = (sum_sq / node.len() as f32).sqrt();
        }

        let mut aggregated = [0.0f32; LEAD_COUNT];
        for (i, value) in aggregated.iter_mut().enumerate() {
            let (sum, count) = graph
                .in_neighbors(i)
                .fold((0.0f32, 0usize), |(s, n), j| (s + rms[j], n + 1));
            *value = if count == 0 {
                rms[i]
            } else {
                0.5 * rms[i] + 0.5 * (sum / count as f32)
            };
        }
        aggregated
    }
}

impl Classifier for LinearGraphModel {
    fn predict(&self, features: &NodeFeatures, graph: &LeadGraph) -> Result<[f32; CLASS_COUNT]> {
        if features.num_nodes() != LEAD_COUNT {
            return Err(EcgError::InferenceFailure(format!(
                "expected {} lead nodes, got {}",
                LEAD_COUNT,
                features.num_nodes()
            )));
        }
        if let Some(&(s, t)) = graph
            .edges()
            .iter()
            .find(|&&(s, t)| s >= LEAD_COUNT || t >= LEAD_COUNT)
        {
            return Err(EcgError::InferenceFailure(format!(
                "edge ({}, {}) references a missing lead",
                s, t
            )));
        }

        let h = Self::node_values(features, graph);
        let mut logits = self.bias;
        for (logit, row) in logits.iter_mut().zip(self.weights.iter()) {
            *logit += row.iter().zip(h.iter()).map(|(w, x)| w * x).sum::<f32>();
        }
        Ok(logits)
    }
}
