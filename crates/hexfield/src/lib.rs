//! # hexfield
//!
//! Extract named bit-fields from hexadecimal byte streams.
//!
//! Hex text is stripped of spaces and line breaks, decoded into bytes and
//! expanded MSB-first into a [bits::BitSequence]. Fields are described by a
//! name, a 1-based start bit and a length in bits; each one yields its bit
//! text and, when it is at most 64 bits wide, its unsigned value. Fields that
//! are malformed or reach past the end of the stream are skipped without
//! affecting the others.
//!
//! ## Example
//!
//! ```
//! use hexfield::decode::decode;
//! use hexfield::extract::FieldValue;
//! use hexfield::field::FieldRow;
//!
//! let rows = vec![
//!     FieldRow::new("flags", "1", "8"),
//!     FieldRow::new("nibble", "9", "4"),
//!     FieldRow::new("too_long", "1", "64"),
//! ];
//! let results = decode("FF 0A", &rows).unwrap();
//! assert_eq!(results.len(), 2);
//! assert_eq!(results[0].bits, "11111111");
//! assert_eq!(results[0].value, FieldValue::U64(255));
//! assert_eq!(results[1].value, FieldValue::U64(0));
//! ```

pub mod bits;
pub mod decode;
pub mod errors;
pub mod extract;
pub mod field;
pub mod hex;
#[cfg(feature = "serde")]
pub mod serde;
