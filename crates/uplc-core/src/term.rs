//! Term representation
//!
//! Untyped Plutus Core terms, generic over the binder form `T`:
//!
//! ```text
//! Term ::= Var T | Delay Term | Force Term | Lambda T Term | Apply Term Term
//!        | Constant | Builtin id | Error
//!        | Constr tag [Term] | Case Term [Term]
//! ```
//!
//! Every node owns its children; trees have no sharing and no cycles.

use crate::config::{MIN_STACK_RED_ZONE, STACK_GROWTH_SIZE};
use crate::constant::Constant;
use num_bigint::BigInt;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Builtin function, identified only by its catalog id
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BuiltinId(pub u8);

impl BuiltinId {
    pub fn to_int(self) -> u8 {
        let BuiltinId(result) = self;
        result
    }
}

/// Language version of a program
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl Version {
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Version {
            major,
            minor,
            patch,
        }
    }

    /// 1.0.0: the original language
    pub const V1_0_0: Version = Version::new(1, 0, 0);

    /// 1.1.0: adds `constr` and `case`
    pub const V1_1_0: Version = Version::new(1, 1, 0);
}

impl From<(u32, u32, u32)> for Version {
    fn from((major, minor, patch): (u32, u32, u32)) -> Self {
        Version::new(major, minor, patch)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// A term over binder form `T`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Term<T> {
    Var(T),
    Delay(Box<Term<T>>),
    Lambda {
        parameter: T,
        body: Box<Term<T>>,
    },
    Apply {
        function: Box<Term<T>>,
        argument: Box<Term<T>>,
    },
    Constant(Constant),
    Force(Box<Term<T>>),
    Error,
    Builtin(BuiltinId),
    /// Constructor application (since 1.1.0)
    Constr { tag: u64, fields: Vec<Term<T>> },
    /// Case analysis over a constructor value (since 1.1.0)
    Case {
        scrutinee: Box<Term<T>>,
        branches: Vec<Term<T>>,
    },
}

impl<T> Term<T> {
    pub fn var(binder: T) -> Self {
        Term::Var(binder)
    }

    pub fn lambda(parameter: T, body: Term<T>) -> Self {
        Term::Lambda {
            parameter,
            body: Box::new(body),
        }
    }

    pub fn apply(function: Term<T>, argument: Term<T>) -> Self {
        Term::Apply {
            function: Box::new(function),
            argument: Box::new(argument),
        }
    }

    pub fn delay(term: Term<T>) -> Self {
        Term::Delay(Box::new(term))
    }

    pub fn force(term: Term<T>) -> Self {
        Term::Force(Box::new(term))
    }

    pub fn constant(constant: Constant) -> Self {
        Term::Constant(constant)
    }

    pub fn integer(value: impl Into<BigInt>) -> Self {
        Term::Constant(Constant::Integer(value.into()))
    }

    pub fn byte_string(bytes: impl Into<Vec<u8>>) -> Self {
        Term::Constant(Constant::ByteString(bytes.into()))
    }

    pub fn string(text: impl Into<String>) -> Self {
        Term::Constant(Constant::String(text.into()))
    }

    pub fn unit() -> Self {
        Term::Constant(Constant::Unit)
    }

    pub fn bool(value: bool) -> Self {
        Term::Constant(Constant::Bool(value))
    }

    pub fn builtin(id: u8) -> Self {
        Term::Builtin(BuiltinId(id))
    }

    pub fn error() -> Self {
        Term::Error
    }

    pub fn constr(tag: u64, fields: Vec<Term<T>>) -> Self {
        Term::Constr { tag, fields }
    }

    pub fn case(scrutinee: Term<T>, branches: Vec<Term<T>>) -> Self {
        Term::Case {
            scrutinee: Box::new(scrutinee),
            branches,
        }
    }

    /// Apply this term to each argument in turn
    #[must_use]
    pub fn apply_all(self, arguments: impl IntoIterator<Item = Term<T>>) -> Self {
        arguments
            .into_iter()
            .fold(self, |function, argument| Term::apply(function, argument))
    }

    /// Get a short description of the term kind
    pub fn kind(&self) -> &'static str {
        match self {
            Term::Var(_) => "var",
            Term::Delay(_) => "delay",
            Term::Lambda { .. } => "lam",
            Term::Apply { .. } => "apply",
            Term::Constant(_) => "con",
            Term::Force(_) => "force",
            Term::Error => "error",
            Term::Builtin(_) => "builtin",
            Term::Constr { .. } => "constr",
            Term::Case { .. } => "case",
        }
    }

    /// Height of the term tree (leaves have depth 0)
    pub fn depth(&self) -> usize {
        stacker::maybe_grow(MIN_STACK_RED_ZONE, STACK_GROWTH_SIZE, || self.depth_impl())
    }

    /// Implementation (called via stacker::maybe_grow)
    fn depth_impl(&self) -> usize {
        match self {
            Term::Var(_) | Term::Constant(_) | Term::Error | Term::Builtin(_) => 0,
            Term::Delay(t) | Term::Force(t) | Term::Lambda { body: t, .. } => 1 + t.depth(),
            Term::Apply { function, argument } => 1 + function.depth().max(argument.depth()),
            Term::Constr { fields, .. } => {
                1 + fields.iter().map(Term::depth).max().unwrap_or(0)
            }
            Term::Case {
                scrutinee,
                branches,
            } => {
                let branch_depth = branches.iter().map(Term::depth).max().unwrap_or(0);
                1 + scrutinee.depth().max(branch_depth)
            }
        }
    }
}

/// A versioned program
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program<T> {
    pub version: Version,
    pub term: Term<T>,
}

impl<T> Program<T> {
    pub fn new(version: impl Into<Version>, term: Term<T>) -> Self {
        Program {
            version: version.into(),
            term,
        }
    }
}
