use crate::error::{HexError, Result};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Q8.8: 8 fractional bits, scale 256.
pub const DEFAULT_FRAC_BITS: u32 = 8;
pub const DEFAULT_INPUT_SIZE: usize = 256;
pub const DEFAULT_DATA_DIR: &str = "hex_data";

pub const WEIGHTS_FILE: &str = "layer1_disc_weights.hex";
pub const BIAS_FILE: &str = "layer1_disc_bias.hex";
pub const INPUT_FILE: &str = "disc_input_test.hex";

/// How a layer's single-neuron weight vector becomes its output matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expansion {
    /// Repeat the neuron vector once per neuron.
    Tile,
    /// Single-neuron layer: keep the first `input_count` entries as-is.
    PassThrough,
}

/// What to do when a bias file has fewer entries than the layer has neurons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BiasPolicy {
    /// Write the shorter vector and report a warning.
    #[default]
    Truncate,
    /// Reject the layer.
    Strict,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerShape {
    pub index: u8,
    pub input_count: usize,
    pub neuron_count: usize,
    pub expansion: Expansion,
    /// Longer vector lengths that are accepted and truncated to `input_count`.
    #[serde(default)]
    pub legacy_lengths: Vec<usize>,
}

impl LayerShape {
    pub fn tiled(index: u8, input_count: usize, neuron_count: usize, legacy_lengths: &[usize]) -> Self {
        Self { index, input_count, neuron_count, expansion: Expansion::Tile, legacy_lengths: legacy_lengths.to_vec() }
    }

    pub fn pass_through(index: u8, input_count: usize) -> Self {
        Self { index, input_count, neuron_count: 1, expansion: Expansion::PassThrough, legacy_lengths: Vec::new() }
    }

    /// Number of weight tokens a fully populated matrix holds.
    pub fn matrix_len(&self) -> usize { self.input_count * self.neuron_count }

    pub fn weights_in(&self, dir: &Path) -> PathBuf {
        dir.join(format!("Discriminator_Layer{}_Weights_Neuron1.hex", self.index))
    }

    pub fn biases_in(&self, dir: &Path) -> PathBuf {
        dir.join(format!("Discriminator_Layer{}_Biases.hex", self.index))
    }

    pub fn weights_out(&self, dir: &Path) -> PathBuf {
        dir.join(format!("Discriminator_Layer{}_Weights_All.hex", self.index))
    }

    pub fn biases_out(&self, dir: &Path) -> PathBuf {
        dir.join(format!("Discriminator_Layer{}_Biases_All.hex", self.index))
    }
}

/// The three discriminator layers: 256->128, 128->32, 32->1.
pub fn discriminator_layers() -> Vec<LayerShape> {
    vec![
        LayerShape::tiled(1, 256, 128, &[784]),
        LayerShape::tiled(2, 128, 32, &[256]),
        LayerShape::pass_through(3, 32),
    ]
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpanderConfig {
    pub data_dir: PathBuf,
    pub layers: Vec<LayerShape>,
    pub bias_policy: BiasPolicy,
}

impl Default for ExpanderConfig {
    fn default() -> Self {
        Self { data_dir: PathBuf::from(DEFAULT_DATA_DIR), layers: discriminator_layers(), bias_policy: BiasPolicy::Truncate }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub input_size: usize,
    pub frac_bits: u32,
    /// Weights and bias are drawn from [-weight_range, weight_range).
    pub weight_range: f64,
    /// Inputs are drawn from [-input_range, input_range).
    pub input_range: f64,
    pub seed: Option<u64>,
    pub out_dir: PathBuf,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            input_size: DEFAULT_INPUT_SIZE,
            frac_bits: DEFAULT_FRAC_BITS,
            weight_range: 0.5,
            input_range: 1.0,
            seed: None,
            out_dir: PathBuf::from("."),
        }
    }
}

impl GeneratorConfig {
    pub fn weights_path(&self) -> PathBuf { self.out_dir.join(WEIGHTS_FILE) }
    pub fn bias_path(&self) -> PathBuf { self.out_dir.join(BIAS_FILE) }
    pub fn input_path(&self) -> PathBuf { self.out_dir.join(INPUT_FILE) }
}

/// Load a JSON config; fields left out fall back to their defaults.
pub fn load_json<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<T> {
    let path = path.as_ref();
    let f = File::open(path).map_err(|e| HexError::io(path, e))?;
    serde_json::from_reader(BufReader::new(f)).map_err(|source| HexError::Config { path: path.to_path_buf(), source })
}
