//! Fixed-point scalar kernels for the Q8.8 datapath.

/// Scale `x` by `2^frac_bits` and cast to an integer.
///
/// The cast truncates toward zero (it does not round to nearest). Floats
/// outside the i64 range saturate and NaN maps to 0. No clamping happens here.
#[inline]
pub fn quantize(x: f64, frac_bits: u32) -> i64 {
    (x * scale(frac_bits)) as i64
}

#[inline]
pub fn dequantize(raw: i64, frac_bits: u32) -> f64 {
    raw as f64 / scale(frac_bits)
}

/// Most fraction bits a 16-bit token can hold.
pub const MAX_FRAC_BITS: u32 = 15;

#[inline]
pub fn clamp_i16<T: Into<i128>>(v: T) -> i16 {
    let v: i128 = v.into();
    v.clamp(i16::MIN as i128, i16::MAX as i128) as i16
}

/// Two's-complement bit pattern of `v`, i.e. `v & 0xFFFF`.
#[inline]
pub fn mask_i16(v: i16) -> u16 { v as u16 }

/// Truncate, saturate to 16 bits, then reinterpret as unsigned.
#[inline]
pub fn encode_fixed(x: f64, frac_bits: u32) -> u16 {
    mask_i16(clamp_i16(quantize(x, frac_bits)))
}

/// Floor division by `2^frac_bits`. Differs from the truncating cast on negatives.
#[inline]
pub fn rescale_floor(acc: i128, frac_bits: u32) -> i128 {
    acc.div_euclid(1i128 << frac_bits)
}

/// Widened dot product; saturates instead of overflowing.
#[inline]
pub fn dot_i128(x: &[i64], w: &[i64]) -> i128 {
    let mut acc: i128 = 0;
    for i in 0..x.len().min(w.len()) {
        acc = acc.saturating_add((x[i] as i128).saturating_mul(w[i] as i128));
    }
    acc
}

#[inline]
fn scale(frac_bits: u32) -> f64 { f64::powi(2.0, frac_bits as i32) }
