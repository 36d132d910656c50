//! Layer weight expansion.
//!
//! Each discriminator layer ships a single neuron's weight vector plus a bias
//! file. The expander tiles that vector across every neuron of the layer and
//! truncates the biases to one per neuron. Tiling duplicates one neuron's
//! weights; it is a placeholder until real per-neuron weights exist.
use crate::config::{BiasPolicy, Expansion, ExpanderConfig, LayerShape};
use crate::error::{HexError, Result};
use crate::hex::{read_hex_tokens, write_hex_tokens};
use log::{error, info, warn};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayerWarning {
    /// A known legacy vector length was cut down to the layer's input count.
    LegacyTruncated { from: usize, to: usize },
    /// Pass-through layer got fewer weights than inputs and kept them all.
    ShortPassThrough { available: usize, needed: usize },
    /// Fewer biases than neurons; the output bias vector is shorter.
    BiasShortfall { available: usize, needed: usize },
}

impl fmt::Display for LayerWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayerWarning::LegacyTruncated { from, to } => write!(f, "{} weights truncated to {}", from, to),
            LayerWarning::ShortPassThrough { available, needed } => write!(f, "has {} weights, need {}", available, needed),
            LayerWarning::BiasShortfall { available, needed } => write!(f, "has {} biases, need {}", available, needed),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerReport {
    pub layer: u8,
    pub weights_written: usize,
    pub biases_written: usize,
    pub warnings: Vec<LayerWarning>,
}

#[derive(Debug)]
pub struct LayerOutcome {
    pub layer: u8,
    pub result: Result<LayerReport>,
}

#[derive(Debug, Default)]
pub struct ExpansionSummary {
    pub outcomes: Vec<LayerOutcome>,
}

impl ExpansionSummary {
    pub fn ok_count(&self) -> usize { self.outcomes.iter().filter(|o| o.result.is_ok()).count() }

    pub fn failed_layers(&self) -> Vec<u8> {
        self.outcomes.iter().filter(|o| o.result.is_err()).map(|o| o.layer).collect()
    }

    pub fn all_ok(&self) -> bool { self.outcomes.iter().all(|o| o.result.is_ok()) }

    pub fn outcome(&self, layer: u8) -> Option<&LayerOutcome> {
        self.outcomes.iter().find(|o| o.layer == layer)
    }
}

/// Build the layer's weight matrix from one neuron's weights.
///
/// Tiled layers accept either exactly `input_count` entries or one of the
/// layer's legacy lengths (truncated first). Anything else is a shape
/// mismatch. Pass-through layers keep the first `input_count` entries, or
/// all of them with a warning when fewer are available.
pub fn expand_weights<T: Clone>(shape: &LayerShape, neuron: &[T]) -> Result<(Vec<T>, Option<LayerWarning>)> {
    let n = shape.input_count;
    match shape.expansion {
        Expansion::Tile => {
            let (row, warning) = if neuron.len() == n {
                (neuron, None)
            } else if neuron.len() > n && shape.legacy_lengths.contains(&neuron.len()) {
                (&neuron[..n], Some(LayerWarning::LegacyTruncated { from: neuron.len(), to: n }))
            } else {
                return Err(HexError::ShapeMismatch {
                    layer: shape.index,
                    observed: neuron.len(),
                    expected: n,
                    accepted: shape.legacy_lengths.clone(),
                });
            };
            let mut out = Vec::with_capacity(shape.matrix_len());
            for _ in 0..shape.neuron_count { out.extend_from_slice(row); }
            Ok((out, warning))
        }
        Expansion::PassThrough => {
            if neuron.len() >= n {
                Ok((neuron[..n].to_vec(), None))
            } else {
                Ok((neuron.to_vec(), Some(LayerWarning::ShortPassThrough { available: neuron.len(), needed: n })))
            }
        }
    }
}

/// Keep the first `neuron_count` biases. Biases are never tiled or padded.
pub fn select_biases<T: Clone>(shape: &LayerShape, biases: &[T], policy: BiasPolicy) -> Result<(Vec<T>, Option<LayerWarning>)> {
    let needed = shape.neuron_count;
    if biases.len() >= needed {
        return Ok((biases[..needed].to_vec(), None));
    }
    match policy {
        BiasPolicy::Truncate => Ok((biases.to_vec(), Some(LayerWarning::BiasShortfall { available: biases.len(), needed }))),
        BiasPolicy::Strict => Err(HexError::BiasShortfall { layer: shape.index, available: biases.len(), needed }),
    }
}

/// Read, expand and write one layer.
///
/// Both outputs are staged next to their targets and renamed into place, so
/// a failed layer never leaves a weights file without its biases.
pub fn expand_layer(cfg: &ExpanderConfig, shape: &LayerShape) -> Result<LayerReport> {
    info!("Processing Layer {} ({} inputs -> {} neurons)...", shape.index, shape.input_count, shape.neuron_count);
    let dir = cfg.data_dir.as_path();
    let weights_path = shape.weights_in(dir);
    let biases_path = shape.biases_in(dir);
    let neuron = read_hex_tokens(&weights_path)?;
    let biases = read_hex_tokens(&biases_path)?;
    if neuron.is_empty() { return Err(HexError::EmptyInput { path: weights_path }); }
    if biases.is_empty() { return Err(HexError::EmptyInput { path: biases_path }); }

    let mut warnings = Vec::new();
    let (matrix, w) = expand_weights(shape, &neuron)?;
    warnings.extend(w);
    let (bias_out, w) = select_biases(shape, &biases, cfg.bias_policy)?;
    warnings.extend(w);
    for w in &warnings { warn!("  WARNING: Layer {} {}", shape.index, w); }

    match shape.expansion {
        Expansion::Tile => info!("  Layer {} weights: {} inputs x {} neurons", shape.index, shape.input_count, shape.neuron_count),
        Expansion::PassThrough => info!("  Layer {} weights: using first {} entries", shape.index, matrix.len()),
    }
    let (weights_out, biases_out) = (shape.weights_out(dir), shape.biases_out(dir));
    let (weights_tmp, biases_tmp) = (staging_path(&weights_out), staging_path(&biases_out));
    let staged = write_hex_tokens(&weights_tmp, &matrix)
        .and_then(|w| write_hex_tokens(&biases_tmp, &bias_out).map(|b| (w, b)))
        .and_then(|counts| commit(&biases_tmp, &biases_out).map(|_| counts))
        .and_then(|counts| match commit(&weights_tmp, &weights_out) {
            Ok(()) => Ok(counts),
            Err(e) => {
                let _ = fs::remove_file(&biases_out);
                Err(e)
            }
        });
    let (weights_written, biases_written) = match staged {
        Ok(counts) => counts,
        Err(e) => {
            let _ = fs::remove_file(&weights_tmp);
            let _ = fs::remove_file(&biases_tmp);
            return Err(e);
        }
    };
    Ok(LayerReport { layer: shape.index, weights_written, biases_written, warnings })
}

fn staging_path(target: &Path) -> PathBuf {
    let mut s = target.as_os_str().to_owned();
    s.push(".tmp");
    PathBuf::from(s)
}

fn commit(tmp: &Path, target: &Path) -> Result<()> {
    fs::rename(tmp, target).map_err(|e| HexError::io(target, e))
}

/// Run every configured layer; a failed layer never stops the ones after it.
pub fn expand_all(cfg: &ExpanderConfig) -> ExpansionSummary {
    let mut summary = ExpansionSummary::default();
    for shape in &cfg.layers {
        let result = expand_layer(cfg, shape);
        match &result {
            Ok(_) => info!("  Layer {}: OK", shape.index),
            Err(e) => error!("  Layer {}: FAILED ({})", shape.index, e),
        }
        summary.outcomes.push(LayerOutcome { layer: shape.index, result });
    }
    info!("Discriminator hex expansion complete ({}/{} layers OK).", summary.ok_count(), summary.outcomes.len());
    summary
}
