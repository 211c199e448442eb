//! Untyped Plutus Core term model
//!
//! This crate holds the pieces shared by every UPLC codec:
//!
//! - [`Term`] and [`Program`], generic over the binder form
//! - the binder forms [`Name`], [`NamedDeBruijn`] and [`DeBruijn`]
//! - [`Constant`] values and their [`Type`]s
//! - [`PlutusData`] with its CBOR and JSON encodings
//! - name resolution ([`intern_program`]) and binder conversion
//!
//! The FLAT bit-level encoding of programs lives in `uplc-flat`.
//!
//! # Example
//!
//! ```
//! use uplc_core::{intern_term, Name, Term};
//!
//! let identity = intern_term(Term::lambda(Name::text("x"), Term::var(Name::text("x"))))?;
//! assert_eq!(identity.to_debruijn()?.to_string(), "(lam i_0 i_1)");
//! # Ok::<(), uplc_core::CoreError>(())
//! ```

pub mod config;
pub mod constant;
pub mod convert;
pub mod data;
pub mod error;
pub mod intern;
pub mod name;
pub mod pretty;
pub mod term;

pub use config::CodecConfig;
pub use constant::{check_type, Constant, Type};
pub use convert::{rebind, Rebind};
pub use data::{Framing, PlutusData};
pub use error::{CoreError, CoreResult};
pub use intern::{
    intern_program, intern_program_with_config, intern_term, intern_term_with_config, Interner,
};
pub use name::{Binder, DeBruijn, Name, NamedDeBruijn, Unique};
pub use term::{BuiltinId, Program, Term, Version};

/// Stack space kept free before a recursive walk allocates a new segment
pub const MIN_STACK_RED_ZONE: usize = config::MIN_STACK_RED_ZONE;

/// Size of each stack segment allocated by a recursive walk
pub const STACK_GROWTH_SIZE: usize = config::STACK_GROWTH_SIZE;
