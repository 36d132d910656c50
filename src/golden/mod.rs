//! Golden-reference generator for the discriminator dot-product unit.
//!
//! The same score `dot(inputs, weights) + bias` is computed twice: once in
//! f64 and once with the integer arithmetic the hardware performs (Q8.8
//! operands, Q16.16 accumulator, floor rescale, 16-bit clamp). A testbench
//! diffs its output against the fixed-point result.
use crate::config::GeneratorConfig;
use crate::error::{HexError, Result};
use crate::hex::quant::{clamp_i16, dequantize, dot_i128, mask_i16, quantize, rescale_floor, MAX_FRAC_BITS};
use crate::hex::{encode_token, to_hex_token, write_hex_tokens};
use log::info;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Uniform};
use serde::Serialize;
use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Decision {
    Real,
    Fake,
}

impl Decision {
    /// Strictly positive scores are REAL; zero is FAKE.
    pub fn from_score(score: f64) -> Self { if score > 0.0 { Decision::Real } else { Decision::Fake } }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self { Decision::Real => "REAL", Decision::Fake => "FAKE" })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GoldenBundle {
    pub weights: Vec<f64>,
    pub bias: f64,
    pub inputs: Vec<f64>,
}

impl GoldenBundle {
    /// Draw weights, then the bias, then inputs, all uniform on half-open ranges.
    pub fn random(cfg: &GeneratorConfig, rng: &mut SmallRng) -> Result<Self> {
        let w_dist = uniform_sym("weight", cfg.weight_range)?;
        let x_dist = uniform_sym("input", cfg.input_range)?;
        let weights: Vec<f64> = (0..cfg.input_size).map(|_| w_dist.sample(rng)).collect();
        let bias = w_dist.sample(rng);
        let inputs: Vec<f64> = (0..cfg.input_size).map(|_| x_dist.sample(rng)).collect();
        Ok(Self { weights, bias, inputs })
    }
}

fn uniform_sym(what: &'static str, range: f64) -> Result<Uniform<f64>> {
    if !range.is_finite() || range <= 0.0 {
        return Err(HexError::InvalidRange { what, value: range });
    }
    Ok(Uniform::new(-range, range))
}

pub fn check_frac_bits(bits: u32) -> Result<()> {
    if bits > MAX_FRAC_BITS {
        return Err(HexError::InvalidFracBits { bits, max: MAX_FRAC_BITS });
    }
    Ok(())
}

/// Seeded when the config names a seed, entropy otherwise.
pub fn make_rng(cfg: &GeneratorConfig) -> SmallRng {
    match cfg.seed {
        Some(s) => SmallRng::seed_from_u64(s),
        None => SmallRng::from_entropy(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FloatReference {
    pub score: f64,
    pub decision: Decision,
}

pub fn float_reference(b: &GoldenBundle) -> FloatReference {
    let mut score = 0f64;
    for (x, w) in b.inputs.iter().zip(&b.weights) { score += x * w; }
    score += b.bias;
    FloatReference { score, decision: Decision::from_score(score) }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FixedReference {
    /// Raw Q16.16 accumulator before rescaling, saturated at the i128 bounds.
    pub accumulator: i128,
    /// Rescaled and clamped Q8.8 score.
    pub score: i16,
    pub hex: String,
}

impl FixedReference {
    pub fn decision(&self) -> Decision { if self.score > 0 { Decision::Real } else { Decision::Fake } }
}

/// `frac_bits` must be at most [`MAX_FRAC_BITS`]; `generate` checks this.
pub fn fixed_reference(b: &GoldenBundle, frac_bits: u32) -> FixedReference {
    let xs: Vec<i64> = b.inputs.iter().map(|&x| quantize(x, frac_bits)).collect();
    let ws: Vec<i64> = b.weights.iter().map(|&w| quantize(w, frac_bits)).collect();
    // Bias is pre-shifted into the product scale.
    let mut acc = (quantize(b.bias, frac_bits) as i128).saturating_mul(1i128 << frac_bits);
    acc = acc.saturating_add(dot_i128(&xs, &ws));
    let score = clamp_i16(rescale_floor(acc, frac_bits));
    FixedReference { accumulator: acc, score, hex: to_hex_token(mask_i16(score)) }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoldenReport {
    pub frac_bits: u32,
    pub bias: f64,
    pub float: FloatReference,
    pub fixed: FixedReference,
}

impl GoldenReport {
    pub fn new(b: &GoldenBundle, frac_bits: u32) -> Self {
        Self { frac_bits, bias: b.bias, float: float_reference(b), fixed: fixed_reference(b, frac_bits) }
    }

    pub fn fixed_score_real(&self) -> f64 { dequantize(self.fixed.score as i64, self.frac_bits) }

    pub fn decisions_agree(&self) -> bool { self.float.decision == self.fixed.decision() }

    pub fn write_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self).map_err(|source| HexError::Json { path: path.to_path_buf(), source })?;
        let f = File::create(path).map_err(|e| HexError::io(path, e))?;
        let mut w = BufWriter::new(f);
        w.write_all(json.as_bytes()).map_err(|e| HexError::io(path, e))?;
        w.flush().map_err(|e| HexError::io(path, e))?;
        Ok(())
    }
}

/// Persist weights, bias and input vector as hex token files.
pub fn write_bundle(cfg: &GeneratorConfig, b: &GoldenBundle) -> Result<()> {
    let enc = |v: &[f64]| -> Vec<String> { v.iter().map(|&x| encode_token(x, cfg.frac_bits)).collect() };
    write_hex_tokens(cfg.weights_path(), &enc(b.weights.as_slice()))?;
    write_hex_tokens(cfg.bias_path(), &enc(std::slice::from_ref(&b.bias)))?;
    write_hex_tokens(cfg.input_path(), &enc(b.inputs.as_slice()))?;
    Ok(())
}

/// Generate a bundle, write its files and compute both references.
pub fn generate(cfg: &GeneratorConfig) -> Result<(GoldenBundle, GoldenReport)> {
    check_frac_bits(cfg.frac_bits)?;
    let mut rng = make_rng(cfg);
    let bundle = GoldenBundle::random(cfg, &mut rng)?;
    info!("Generated {} weights, 1 bias, {} inputs (Q{}.{})", bundle.weights.len(), bundle.inputs.len(), 16 - cfg.frac_bits, cfg.frac_bits);
    write_bundle(cfg, &bundle)?;
    let report = GoldenReport::new(&bundle, cfg.frac_bits);
    Ok((bundle, report))
}

impl fmt::Display for GoldenReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== GOLDEN REFERENCE ===")?;
        writeln!(f, "Bias Float: {:.4}", self.bias)?;
        writeln!(f, "Expected Score (Float): {:.4}", self.float.score)?;
        writeln!(f, "Expected Score (Q8.8 Int): {}", self.fixed.score)?;
        writeln!(f, "Expected Hex Output: {}", self.fixed.hex)?;
        write!(f, "Decision: {}", self.float.decision)
    }
}
