//! Binder forms
//!
//! A term is generic over how it refers to its variables. Three forms are
//! supported:
//!
//! - [`Name`]: surface spelling plus a [`Unique`] assigned by interning.
//! - [`NamedDeBruijn`]: surface spelling plus a de Bruijn index.
//! - [`DeBruijn`]: the index alone.
//!
//! De Bruijn indices are 1-based at use sites: the innermost enclosing lambda
//! is index 1. Lambda binder sites carry index 0.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity assigned to a name during interning
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Unique(pub u64);

impl Unique {
    pub fn new(value: u64) -> Self {
        Unique(value)
    }

    pub fn to_int(self) -> u64 {
        let Unique(result) = self;
        result
    }

    /// The Unique following this one
    #[must_use]
    pub fn next(self) -> Self {
        Unique(self.0 + 1)
    }
}

impl From<u64> for Unique {
    fn from(value: u64) -> Self {
        Unique(value)
    }
}

impl fmt::Display for Unique {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A de Bruijn index
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct DeBruijn(pub usize);

impl DeBruijn {
    /// Index stored at lambda binder sites
    pub const BINDER: DeBruijn = DeBruijn(0);

    pub fn new(index: usize) -> Self {
        DeBruijn(index)
    }

    pub fn to_int(self) -> usize {
        let DeBruijn(result) = self;
        result
    }
}

impl From<usize> for DeBruijn {
    fn from(index: usize) -> Self {
        DeBruijn(index)
    }
}

impl fmt::Display for DeBruijn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A textual name with its interned identity
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Name {
    pub text: String,
    pub unique: Unique,
}

impl Name {
    /// A name as produced by a parser, before interning
    pub fn text(text: impl Into<String>) -> Self {
        Name {
            text: text.into(),
            unique: Unique::default(),
        }
    }

    pub fn new(text: impl Into<String>, unique: impl Into<Unique>) -> Self {
        Name {
            text: text.into(),
            unique: unique.into(),
        }
    }
}

/// A textual name with its de Bruijn index
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NamedDeBruijn {
    pub text: String,
    pub index: DeBruijn,
}

impl NamedDeBruijn {
    pub fn new(text: impl Into<String>, index: impl Into<DeBruijn>) -> Self {
        NamedDeBruijn {
            text: text.into(),
            index: index.into(),
        }
    }
}

/// Capability shared by every binder form
pub trait Binder: Clone + fmt::Debug + PartialEq {
    /// Spelling used when rendering the binder as text
    fn text_name(&self) -> String;
}

impl Binder for Name {
    fn text_name(&self) -> String {
        self.text.clone()
    }
}

impl Binder for NamedDeBruijn {
    fn text_name(&self) -> String {
        self.text.clone()
    }
}

impl Binder for DeBruijn {
    fn text_name(&self) -> String {
        format!("i_{}", self.0)
    }
}

impl From<NamedDeBruijn> for DeBruijn {
    fn from(name: NamedDeBruijn) -> Self {
        name.index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_next() {
        assert_eq!(Unique::new(4).next(), Unique(5));
        assert_eq!(Unique::default().to_int(), 0);
    }

    #[test]
    fn test_text_names() {
        assert_eq!(Name::new("x", 3).text_name(), "x");
        assert_eq!(NamedDeBruijn::new("y", 2).text_name(), "y");
        assert_eq!(DeBruijn(7).text_name(), "i_7");
    }

    #[test]
    fn test_parser_name_has_zero_unique() {
        let name = Name::text("foo");
        assert_eq!(name.unique, Unique(0));
    }

    #[test]
    fn test_named_debruijn_drops_text() {
        let index: DeBruijn = NamedDeBruijn::new("x", 4).into();
        assert_eq!(index, DeBruijn(4));
    }
}
