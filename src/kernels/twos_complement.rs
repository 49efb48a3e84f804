//! This module contains the pure, stateless kernels for packing decimal
//! unscaled values into big-endian two's-complement byte sequences.
//!
//! Parquet stores `FIXED_LEN_BYTE_ARRAY` and `BINARY` decimals as the
//! big-endian two's-complement form of the unscaled integer. Variable-length
//! columns use the minimal form; fixed-length columns sign-extend that form to
//! the declared width. This module is PURE RUST and panic-free.

use crate::error::{ColIndexError, Result};

//==================================================================================
// 1. Private Core Logic
//==================================================================================

/// Returns the index of the first byte of the minimal representation inside
/// `bytes`, a full-width big-endian two's-complement buffer.
fn minimal_start(bytes: &[u8]) -> usize {
    let mut start = 0;
    while start + 1 < bytes.len() {
        let (head, next) = (bytes[start], bytes[start + 1]);
        let redundant_zero = head == 0x00 && next & 0x80 == 0;
        let redundant_ones = head == 0xFF && next & 0x80 != 0;
        if !(redundant_zero || redundant_ones) {
            break;
        }
        start += 1;
    }
    start
}

//==================================================================================
// 2. Public API
//==================================================================================

/// Produces the minimal-length big-endian two's-complement bytes of `value`.
///
/// The result always contains at least one byte, and its most significant bit
/// is the sign bit of `value`.
pub fn to_minimal_bytes(value: i128) -> Vec<u8> {
    let full = value.to_be_bytes();
    full[minimal_start(&full)..].to_vec()
}

/// Sign-extends the minimal form of `value` to exactly `width` bytes.
///
/// Positive values are padded with `0x00`, negative values with `0xFF`, so the
/// fixed-width sequence remains a valid encoding of the same number.
pub fn to_fixed_bytes(value: i128, width: usize) -> Result<Vec<u8>> {
    let minimal = to_minimal_bytes(value);
    if minimal.len() > width {
        return Err(ColIndexError::DecimalOutOfRange(format!(
            "unscaled value {} needs {} bytes but the column is {} bytes wide",
            value,
            minimal.len(),
            width
        )));
    }
    let pad = if value < 0 { 0xFF } else { 0x00 };
    let mut out = vec![pad; width - minimal.len()];
    out.extend_from_slice(&minimal);
    Ok(out)
}

/// Decodes a big-endian two's-complement byte sequence of up to 16 bytes.
pub fn from_bytes(bytes: &[u8]) -> Result<i128> {
    if bytes.is_empty() || bytes.len() > 16 {
        return Err(ColIndexError::DecimalOutOfRange(format!(
            "cannot decode {} bytes as a 128-bit two's-complement value",
            bytes.len()
        )));
    }
    let pad = if bytes[0] & 0x80 != 0 { 0xFF } else { 0x00 };
    let mut full = [pad; 16];
    full[16 - bytes.len()..].copy_from_slice(bytes);
    Ok(i128::from_be_bytes(full))
}

//==================================================================================
// 3. Unit Tests
//==================================================================================
