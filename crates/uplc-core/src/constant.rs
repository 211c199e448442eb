//! Constant values and their types
//!
//! ```text
//! Constant ::= integer | bytestring | string | unit | bool
//!            | list T [Constant]        -- every element has type T
//!            | pair A B Constant Constant
//!            | data PlutusData
//!            | bls12_381 group elements and pairing results
//! ```

use crate::config::{MIN_STACK_RED_ZONE, STACK_GROWTH_SIZE};
use crate::data::PlutusData;
use crate::error::{CoreError, CoreResult};
use num_bigint::BigInt;
use serde::{Deserialize, Serialize};

/// Type of a constant
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Type {
    Integer,
    ByteString,
    String,
    Unit,
    Bool,
    List(Box<Type>),
    Pair(Box<Type>, Box<Type>),
    Data,
    Bls12_381G1Element,
    Bls12_381G2Element,
    Bls12_381MlResult,
}

impl Type {
    pub fn list(element: Type) -> Self {
        Type::List(Box::new(element))
    }

    pub fn pair(first: Type, second: Type) -> Self {
        Type::Pair(Box::new(first), Box::new(second))
    }
}

/// A constant value
///
/// BLS12-381 values are kept as their compressed byte representation; this
/// layer never performs curve arithmetic on them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Constant {
    Integer(BigInt),
    ByteString(Vec<u8>),
    String(String),
    Unit,
    Bool(bool),
    /// Homogeneous list with its element type
    ProtoList(Type, Vec<Constant>),
    /// Pair with both component types
    ProtoPair(Type, Type, Box<Constant>, Box<Constant>),
    Data(PlutusData),
    Bls12_381G1Element(Vec<u8>),
    Bls12_381G2Element(Vec<u8>),
    Bls12_381MlResult(Vec<u8>),
}

impl Constant {
    pub fn integer(value: impl Into<BigInt>) -> Self {
        Constant::Integer(value.into())
    }

    pub fn byte_string(bytes: impl Into<Vec<u8>>) -> Self {
        Constant::ByteString(bytes.into())
    }

    pub fn string(text: impl Into<String>) -> Self {
        Constant::String(text.into())
    }

    /// Build a list, checking that every element has the declared type
    pub fn proto_list(element: Type, items: Vec<Constant>) -> CoreResult<Self> {
        for item in &items {
            check_type(&element, item)?;
        }
        Ok(Constant::ProtoList(element, items))
    }

    /// Build a pair whose component types are taken from the values
    pub fn proto_pair(first: Constant, second: Constant) -> Self {
        Constant::ProtoPair(
            first.type_of(),
            second.type_of(),
            Box::new(first),
            Box::new(second),
        )
    }

    /// The type of this constant as stored in its tags
    pub fn type_of(&self) -> Type {
        match self {
            Constant::Integer(_) => Type::Integer,
            Constant::ByteString(_) => Type::ByteString,
            Constant::String(_) => Type::String,
            Constant::Unit => Type::Unit,
            Constant::Bool(_) => Type::Bool,
            Constant::ProtoList(element, _) => Type::list(element.clone()),
            Constant::ProtoPair(a, b, _, _) => Type::pair(a.clone(), b.clone()),
            Constant::Data(_) => Type::Data,
            Constant::Bls12_381G1Element(_) => Type::Bls12_381G1Element,
            Constant::Bls12_381G2Element(_) => Type::Bls12_381G2Element,
            Constant::Bls12_381MlResult(_) => Type::Bls12_381MlResult,
        }
    }

    /// Check that list elements and pair components agree with their declared types
    pub fn check_well_typed(&self) -> CoreResult<()> {
        stacker::maybe_grow(MIN_STACK_RED_ZONE, STACK_GROWTH_SIZE, || {
            self.check_well_typed_impl()
        })
    }

    /// Implementation (called via stacker::maybe_grow)
    fn check_well_typed_impl(&self) -> CoreResult<()> {
        match self {
            Constant::ProtoList(element, items) => {
                for item in items {
                    check_type(element, item)?;
                    item.check_well_typed()?;
                }
                Ok(())
            }
            Constant::ProtoPair(a, b, first, second) => {
                check_type(a, first)?;
                check_type(b, second)?;
                first.check_well_typed()?;
                second.check_well_typed()
            }
            _ => Ok(()),
        }
    }
}

/// Fail with a type mismatch unless `value` has type `expected`
pub fn check_type(expected: &Type, value: &Constant) -> CoreResult<()> {
    let found = value.type_of();
    if &found == expected {
        Ok(())
    } else {
        Err(CoreError::TypeMismatch {
            expected: expected.to_string(),
            found: found.to_string(),
        })
    }
}

impl From<PlutusData> for Constant {
    fn from(data: PlutusData) -> Self {
        Constant::Data(data)
    }
}

impl From<bool> for Constant {
    fn from(value: bool) -> Self {
        Constant::Bool(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_of_nested() {
        let list = Constant::ProtoList(
            Type::list(Type::Integer),
            vec![Constant::ProtoList(Type::Integer, vec![Constant::integer(1)])],
        );
        assert_eq!(list.type_of(), Type::list(Type::list(Type::Integer)));
    }

    #[test]
    fn test_proto_list_rejects_mixed_elements() {
        let result = Constant::proto_list(
            Type::Integer,
            vec![Constant::integer(1), Constant::Bool(true)],
        );
        match result {
            Err(CoreError::TypeMismatch { expected, found }) => {
                assert_eq!(expected, "integer");
                assert_eq!(found, "bool");
            }
            other => panic!("expected type mismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_proto_pair_infers_types() {
        let pair = Constant::proto_pair(Constant::integer(1), Constant::string("a"));
        assert_eq!(pair.type_of(), Type::pair(Type::Integer, Type::String));
        assert!(pair.check_well_typed().is_ok());
    }

    #[test]
    fn test_check_well_typed_catches_bad_pair() {
        let pair = Constant::ProtoPair(
            Type::Integer,
            Type::Bool,
            Box::new(Constant::integer(1)),
            Box::new(Constant::Unit),
        );
        assert!(pair.check_well_typed().is_err());
    }
}
