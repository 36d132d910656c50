//! Q8.8 hex token codec.
//!
//! A token is exactly four lowercase hex digits holding the two's-complement
//! bit pattern of a signed 16-bit fixed-point value.
pub mod loader;
pub mod quant;

pub use loader::{read_hex_tokens, write_hex_tokens};
pub use quant::{clamp_i16, dequantize, encode_fixed, mask_i16, quantize, MAX_FRAC_BITS};

use crate::error::{HexError, Result};

pub const TOKEN_LEN: usize = 4;

pub fn to_hex_token(v: u16) -> String { format!("{:04x}", v) }

/// Encode a real value straight to its token.
pub fn encode_token(x: f64, frac_bits: u32) -> String { to_hex_token(encode_fixed(x, frac_bits)) }

/// Parse a token back to its signed value.
pub fn decode_hex_token(token: &str) -> Result<i16> {
    let t = token.trim();
    if t.len() != TOKEN_LEN || !t.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(HexError::InvalidToken { token: token.to_string() });
    }
    let raw = u16::from_str_radix(t, 16).map_err(|_| HexError::InvalidToken { token: token.to_string() })?;
    Ok(raw as i16)
}
