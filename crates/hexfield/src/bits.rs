//! Bit addressing over decoded bytes.
//!
//! Bits are addressed in MSB-first order: bit 0 is the high bit of the first byte.

use std::fmt;

use crate::errors::ReadError;

/// Reads a single bit at `bit_pos` (0 = MSB of first byte). Returns 0 or 1.
pub fn read_bit_at(data: &[u8], bit_pos: usize) -> Result<u8, ReadError> {
    if bit_pos >= data.len() * 8 {
        return Err(ReadError::OutOfBounds);
    }

    let byte_index = bit_pos / 8;
    let bit_index = bit_pos % 8;

    Ok((data[byte_index] >> (7 - bit_index)) & 1)
}

/// Reads `n` bits starting at `bit_pos` as an unsigned value (max 64 bits). MSB-first.
pub fn read_bits_at(data: &[u8], bit_pos: usize, n: usize) -> Result<u64, ReadError> {
    if n > 64 {
        return Err(ReadError::TooManyBitsRead);
    }

    check_range(data, bit_pos, n)?;

    let mut value = 0u64;
    for pos in bit_pos..bit_pos + n {
        value = (value << 1) | read_bit_at(data, pos)? as u64;
    }

    Ok(value)
}

fn check_range(data: &[u8], bit_pos: usize, n: usize) -> Result<(), ReadError> {
    if bit_pos
        .checked_add(n)
        .is_none_or(|end| end > data.len() * 8)
    {
        return Err(ReadError::OutOfBounds);
    }

    Ok(())
}

/// The MSB-first bit expansion of a byte stream.
///
/// Backed by the decoded bytes; the `'0'`/`'1'` text form is produced on demand
/// by [BitSequence::bits] and the [fmt::Display] impl.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitSequence {
    bytes: Vec<u8>,
}

impl BitSequence {
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// Total number of bits, always `8 * byte count`.
    pub fn len(&self) -> usize {
        self.bytes.len() * 8
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Bit at zero-based `index`.
    pub fn bit(&self, index: usize) -> Result<u8, ReadError> {
        read_bit_at(&self.bytes, index)
    }

    /// `len` bits starting at zero-based `start` rendered as `'0'`/`'1'` characters.
    pub fn bits(&self, start: usize, len: usize) -> Result<String, ReadError> {
        check_range(&self.bytes, start, len)?;

        let mut out = String::with_capacity(len);
        for pos in start..start + len {
            out.push(if read_bit_at(&self.bytes, pos)? == 1 { '1' } else { '0' });
        }

        Ok(out)
    }

    /// `len` bits starting at zero-based `start` as an unsigned number (max 64 bits).
    pub fn read_u64(&self, start: usize, len: usize) -> Result<u64, ReadError> {
        read_bits_at(&self.bytes, start, len)
    }
}

impl fmt::Display for BitSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.bytes {
            write!(f, "{byte:08b}")?;
        }
        Ok(())
    }
}
