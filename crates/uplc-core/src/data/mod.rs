//! Plutus Data
//!
//! The generic on-chain data algebra:
//!
//! ```text
//! PlutusData ::= Constr tag [PlutusData]
//!              | Map [(PlutusData, PlutusData)]   -- insertion order kept
//!              | List [PlutusData]
//!              | Integer bigint
//!              | ByteString bytes
//! ```
//!
//! `List` and `Constr` carry the CBOR array framing they were decoded with so
//! that re-encoding reproduces the original bytes. Values built through the
//! helpers on [`PlutusData`] get the canonical framing.

pub mod cbor;
pub mod json;

use num_bigint::BigInt;
use serde::{Deserialize, Serialize};

/// How a CBOR array is delimited on the wire
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Framing {
    /// Length-prefixed array
    Definite,
    /// `0x9f ... 0xff` array
    Indefinite,
}

impl Framing {
    /// Framing the canonical encoder picks for `len` items:
    /// definite when empty, indefinite otherwise
    pub fn canonical(len: usize) -> Self {
        if len == 0 {
            Framing::Definite
        } else {
            Framing::Indefinite
        }
    }

    pub fn is_indefinite(self) -> bool {
        matches!(self, Framing::Indefinite)
    }
}

/// A Plutus Data value
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlutusData {
    Constr {
        tag: u64,
        fields: Vec<PlutusData>,
        framing: Framing,
    },
    Map(Vec<(PlutusData, PlutusData)>),
    List {
        items: Vec<PlutusData>,
        framing: Framing,
    },
    Integer(BigInt),
    ByteString(Vec<u8>),
}

impl PlutusData {
    pub fn integer(value: impl Into<BigInt>) -> Self {
        PlutusData::Integer(value.into())
    }

    pub fn bytes(bytes: impl Into<Vec<u8>>) -> Self {
        PlutusData::ByteString(bytes.into())
    }

    /// List with canonical framing
    pub fn list(items: Vec<PlutusData>) -> Self {
        let framing = Framing::canonical(items.len());
        PlutusData::List { items, framing }
    }

    /// Constructor with canonical framing
    pub fn constr(tag: u64, fields: Vec<PlutusData>) -> Self {
        let framing = Framing::canonical(fields.len());
        PlutusData::Constr {
            tag,
            fields,
            framing,
        }
    }

    pub fn map(pairs: Vec<(PlutusData, PlutusData)>) -> Self {
        PlutusData::Map(pairs)
    }

    /// Get a short description of the variant
    pub fn kind(&self) -> &'static str {
        match self {
            PlutusData::Constr { .. } => "constr",
            PlutusData::Map(_) => "map",
            PlutusData::List { .. } => "list",
            PlutusData::Integer(_) => "integer",
            PlutusData::ByteString(_) => "bytestring",
        }
    }
}
