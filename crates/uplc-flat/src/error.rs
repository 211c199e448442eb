//! Error types for FLAT encoding and decoding

use thiserror::Error;
use uplc_core::CoreError;

/// Result type for FLAT operations
pub type FlatResult<T> = Result<T, FlatError>;

/// Errors that can occur while reading or writing FLAT bytes
#[derive(Debug, Error)]
pub enum FlatError {
    /// A read ran past the end of the input
    #[error("out of bounds: needed {needed} bits at bit offset {offset}, input is {size} bytes")]
    OutOfBounds {
        offset: usize,
        needed: usize,
        size: usize,
    },

    /// A value does not fit in its fixed-width field
    #[error("value {value} does not fit in {width} bits")]
    TagOverflow { value: u64, width: u32 },

    /// Term tag with no assigned constructor
    #[error("unknown term tag {tag} at bit offset {offset}")]
    UnknownTermTag { tag: u8, offset: usize },

    /// Constant type tag with no assigned type
    #[error("unknown constant type tag {tag} at bit offset {offset}")]
    UnknownConstantTag { tag: u8, offset: usize },

    /// Type tag list that does not spell a complete type
    #[error("malformed constant type tags {tags:?} at bit offset {offset}")]
    MalformedTypeTags { tags: Vec<u8>, offset: usize },

    /// Constant type with no FLAT encoding
    #[error("constant type {0} has no FLAT encoding")]
    UnsupportedConstant(String),

    /// Constant value disagrees with its declared type
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    /// Variable-length word longer than 64 bits
    #[error("word overflows 64 bits at bit offset {offset}")]
    WordOverflow { offset: usize },

    /// De Bruijn index beyond the platform's index range
    #[error("de Bruijn index {value} is out of range at bit offset {offset}")]
    IndexOverflow { value: u64, offset: usize },

    /// Decoded number too large for its field
    #[error("{field} value {value} is out of range at bit offset {offset}")]
    FieldOverflow {
        field: &'static str,
        value: u64,
        offset: usize,
    },

    /// String constant is not valid UTF-8
    #[error("invalid UTF-8 in string at bit offset {offset}")]
    InvalidUtf8 { offset: usize },

    /// Filler bits that are not zeros followed by a one
    #[error("malformed filler at bit offset {offset}")]
    MisalignedFiller { offset: usize },

    /// Bytes left after the program's final filler
    #[error("{remaining} trailing bytes after program")]
    TrailingBytes { remaining: usize },

    /// Term nesting exceeds the configured limit
    #[error("term nesting exceeds limit of {limit}")]
    DepthLimit { limit: usize },

    /// Error from the term model or the Plutus Data codec
    #[error("core error: {0}")]
    Core(#[from] CoreError),

    /// Invalid hex input
    #[error("invalid hex: {0}")]
    Hex(#[from] hex::FromHexError),
}
