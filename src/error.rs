//! Error types shared by the expander and the golden-reference generator.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HexError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid hex token {token:?} (expected 4 hex digits)")]
    InvalidToken { token: String },

    #[error("could not read {path} (missing or empty)")]
    EmptyInput { path: PathBuf },

    #[error("layer {layer} weights count {observed}, expected {expected} or one of {accepted:?}")]
    ShapeMismatch {
        layer: u8,
        observed: usize,
        expected: usize,
        accepted: Vec<usize>,
    },

    #[error("layer {layer} has {available} biases, need {needed}")]
    BiasShortfall { layer: u8, available: usize, needed: usize },

    #[error("invalid {what} range {value} (must be finite and > 0)")]
    InvalidRange { what: &'static str, value: f64 },

    #[error("frac_bits {bits} out of range (max {max})")]
    InvalidFracBits { bits: u32, max: u32 },

    #[error("JSON error on {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("bad config {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl HexError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        HexError::Io { path: path.into(), source }
    }
}

pub type Result<T> = std::result::Result<T, HexError>;
