//! Hex text normalization and decoding into a [BitSequence].
//!
//! Validation happens in two steps so callers can tell "nothing to decode"
//! and "truncated byte" apart from "bad digit": [normalize] checks emptiness
//! and length, [HexInput::to_bits] checks the digits themselves.

use std::fmt;

use ::hex::FromHexError;

use crate::{bits::BitSequence, errors::DecodeError};

/// Hex text with spaces and line breaks removed, non-empty and of even length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HexInput(String);

/// Strips spaces, CR and LF anywhere in `raw`, then trims the remaining ends.
pub fn normalize(raw: &str) -> Result<HexInput, DecodeError> {
    let stripped: String = raw
        .chars()
        .filter(|c| !matches!(c, ' ' | '\r' | '\n'))
        .collect();
    let text = stripped.trim();

    if text.is_empty() {
        return Err(DecodeError::EmptyInput);
    }

    let len = text.chars().count();
    if len % 2 != 0 {
        return Err(DecodeError::OddLength { len });
    }

    Ok(HexInput(text.to_string()))
}

impl HexInput {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of bytes this input decodes to.
    pub fn byte_len(&self) -> usize {
        self.0.chars().count() / 2
    }

    /// Decodes the digit pairs (high nibble first) and expands every byte MSB-first.
    pub fn to_bits(&self) -> Result<BitSequence, DecodeError> {
        let bytes = ::hex::decode(&self.0).map_err(|err| self.map_hex_error(err))?;
        Ok(BitSequence::from_bytes(bytes))
    }

    fn map_hex_error(&self, err: FromHexError) -> DecodeError {
        // The hex crate works on bytes; report the offending character as the
        // user typed it, counted in characters.
        if let Some((index, ch)) = self
            .0
            .chars()
            .enumerate()
            .find(|(_, c)| !c.is_ascii_hexdigit())
        {
            return DecodeError::InvalidHexDigit { ch, index };
        }

        match err {
            FromHexError::InvalidHexCharacter { c, index } => {
                DecodeError::InvalidHexDigit { ch: c, index }
            }
            FromHexError::OddLength | FromHexError::InvalidStringLength => {
                DecodeError::OddLength {
                    len: self.0.chars().count(),
                }
            }
        }
    }
}

impl fmt::Display for HexInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
