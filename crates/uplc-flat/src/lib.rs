//! FLAT encoding of Untyped Plutus Core programs
//!
//! FLAT is the bit-packed wire format in which UPLC programs are stored on
//! chain. This crate provides the bit-level [`Encoder`]/[`Decoder`], the
//! per-binder encodings ([`FlatBinder`]) and the program codec.
//!
//! ```
//! use uplc_core::{DeBruijn, Program, Term, Version};
//! use uplc_flat::FlatProgram;
//!
//! let program: Program<DeBruijn> = Program::new(Version::V1_0_0, Term::integer(42));
//! let hex = program.to_hex()?;
//! assert_eq!(hex, "01000048150001");
//! assert_eq!(Program::<DeBruijn>::from_hex(&hex)?, program);
//! # Ok::<(), uplc_flat::FlatError>(())
//! ```

pub mod binder;
pub mod constant;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod term;
pub mod zigzag;

pub use binder::FlatBinder;
pub use decoder::Decoder;
pub use encoder::Encoder;
pub use error::{FlatError, FlatResult};
pub use term::{
    decode_program, decode_program_with_config, decode_term, decode_term_with_config,
    encode_program, encode_program_with_config, encode_term, encode_term_with_config,
};

use uplc_core::{CodecConfig, Program};

/// FLAT serialization methods on programs
pub trait FlatProgram: Sized {
    fn to_flat(&self) -> FlatResult<Vec<u8>>;

    fn to_flat_with_config(&self, config: &CodecConfig) -> FlatResult<Vec<u8>>;

    fn from_flat(bytes: &[u8]) -> FlatResult<Self>;

    fn from_flat_with_config(bytes: &[u8], config: &CodecConfig) -> FlatResult<Self>;

    /// FLAT bytes as lowercase hex
    fn to_hex(&self) -> FlatResult<String> {
        Ok(hex::encode(self.to_flat()?))
    }

    fn from_hex(text: &str) -> FlatResult<Self> {
        Self::from_flat(&hex::decode(text.trim())?)
    }
}

impl<T: FlatBinder> FlatProgram for Program<T> {
    fn to_flat(&self) -> FlatResult<Vec<u8>> {
        encode_program(self)
    }

    fn to_flat_with_config(&self, config: &CodecConfig) -> FlatResult<Vec<u8>> {
        encode_program_with_config(self, config)
    }

    fn from_flat(bytes: &[u8]) -> FlatResult<Self> {
        decode_program(bytes)
    }

    fn from_flat_with_config(bytes: &[u8], config: &CodecConfig) -> FlatResult<Self> {
        decode_program_with_config(bytes, config)
    }
}
