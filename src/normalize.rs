//! Fixed-width path normalization.
//!
//! The command-line path is pushed through UTF-32 and back before use. For
//! any `&str` the round trip is the identity; it is not a validation step.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Utf32Error {
    #[error("UTF-32 input length {0} is not a multiple of 4")]
    TruncatedUnit(usize),
    #[error("invalid code point U+{code:X} at byte offset {offset}")]
    InvalidCodePoint { code: u32, offset: usize },
}

/// Encodes text as little-endian UTF-32 code units.
pub fn encode_utf32(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.chars().count() * 4);
    for c in text.chars() {
        out.extend_from_slice(&(c as u32).to_le_bytes());
    }
    out
}

/// Decodes little-endian UTF-32 code units.
pub fn decode_utf32(bytes: &[u8]) -> Result<String, Utf32Error> {
    if bytes.len() % 4 != 0 {
        return Err(Utf32Error::TruncatedUnit(bytes.len()));
    }

    bytes
        .chunks_exact(4)
        .enumerate()
        .map(|(i, unit)| {
            let code = u32::from_le_bytes([unit[0], unit[1], unit[2], unit[3]]);
            char::from_u32(code).ok_or(Utf32Error::InvalidCodePoint {
                code,
                offset: i * 4,
            })
        })
        .collect()
}

pub fn normalize_path(arg: &str) -> Result<String, Utf32Error> {
    let path = decode_utf32(&encode_utf32(arg))?;
    log::debug!("normalized image path: {path}");
    Ok(path)
}
