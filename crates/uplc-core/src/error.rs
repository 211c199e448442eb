//! Error types for the term model, binder conversion and Plutus Data codecs

use thiserror::Error;

/// Result type for core operations
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised while converting terms or decoding Plutus Data
#[derive(Debug, Error)]
pub enum CoreError {
    /// A variable's Unique is not bound by any enclosing lambda
    #[error("free variable '{text}' (unique {unique})")]
    FreeUnique { text: String, unique: u64 },

    /// A de Bruijn index points past the enclosing binders
    #[error("free de Bruijn index {index} under {depth} binders")]
    FreeIndex { index: usize, depth: usize },

    /// Nesting exceeded the configured limit
    #[error("nesting depth limit {limit} exceeded")]
    DepthLimit { limit: usize },

    /// A constant value disagrees with its declared type
    #[error("constant of type {found} does not match declared type {expected}")]
    TypeMismatch { expected: String, found: String },

    /// Input ended inside a CBOR item
    #[error("truncated CBOR: needed {needed} bytes at offset {offset}, input has {size}")]
    Truncated {
        offset: usize,
        needed: usize,
        size: usize,
    },

    /// A CBOR item of the wrong major type
    #[error("expected {expected} at offset {offset}, found CBOR major type {major}")]
    UnexpectedMajor {
        expected: &'static str,
        major: u8,
        offset: usize,
    },

    /// A CBOR tag that does not belong to the Plutus Data encoding
    #[error("unsupported CBOR tag {tag} at offset {offset}")]
    UnexpectedTag { tag: u64, offset: usize },

    /// Structurally invalid CBOR
    #[error("malformed CBOR at offset {offset}: {reason}")]
    MalformedCbor { offset: usize, reason: String },

    /// Bytes left over after a complete top-level item
    #[error("{remaining} trailing bytes after CBOR item ending at offset {offset}")]
    TrailingBytes { offset: usize, remaining: usize },

    /// Invalid hexadecimal input
    #[error("invalid hex: {0}")]
    Hex(#[from] hex::FromHexError),

    /// JSON syntax error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A configuration value outside its supported range
    #[error("invalid codec configuration: {0}")]
    InvalidConfig(String),

    /// JSON that is well-formed but not in the detailed schema
    #[error("invalid Plutus Data JSON: {0}")]
    InvalidJson(String),
}
