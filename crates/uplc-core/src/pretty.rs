//! Textual rendering
//!
//! Programs, terms and constants print in UPLC surface syntax:
//!
//! ```text
//! (program 1.1.0 (lam x [(builtin #7) x (con integer 1)]))
//! (con (list integer) [1, 2])
//! (con data (Constr 0 [I 1, B #ab]))
//! ```
//!
//! Builtins print by catalog id since names live outside this crate.

use crate::config::{MIN_STACK_RED_ZONE, STACK_GROWTH_SIZE};
use crate::constant::{Constant, Type};
use crate::data::PlutusData;
use crate::name::Binder;
use crate::term::{Program, Term};
use std::fmt;

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        stacker::maybe_grow(MIN_STACK_RED_ZONE, STACK_GROWTH_SIZE, || match self {
            Type::Integer => write!(f, "integer"),
            Type::ByteString => write!(f, "bytestring"),
            Type::String => write!(f, "string"),
            Type::Unit => write!(f, "unit"),
            Type::Bool => write!(f, "bool"),
            Type::List(element) => write!(f, "(list {element})"),
            Type::Pair(a, b) => write!(f, "(pair {a} {b})"),
            Type::Data => write!(f, "data"),
            Type::Bls12_381G1Element => write!(f, "bls12_381_G1_element"),
            Type::Bls12_381G2Element => write!(f, "bls12_381_G2_element"),
            Type::Bls12_381MlResult => write!(f, "bls12_381_mlresult"),
        })
    }
}

/// The value part of a constant, without `con` and the type
struct ConstantValue<'a>(&'a Constant);

impl fmt::Display for ConstantValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        stacker::maybe_grow(MIN_STACK_RED_ZONE, STACK_GROWTH_SIZE, || match self.0 {
            Constant::Integer(n) => write!(f, "{n}"),
            Constant::ByteString(bytes) => write!(f, "#{}", hex::encode(bytes)),
            Constant::String(text) => write!(f, "{text:?}"),
            Constant::Unit => write!(f, "()"),
            Constant::Bool(true) => write!(f, "True"),
            Constant::Bool(false) => write!(f, "False"),
            Constant::ProtoList(_, items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", ConstantValue(item))?;
                }
                write!(f, "]")
            }
            Constant::ProtoPair(_, _, a, b) => {
                write!(f, "({}, {})", ConstantValue(a), ConstantValue(b))
            }
            Constant::Data(data) => write!(f, "({data})"),
            Constant::Bls12_381G1Element(bytes)
            | Constant::Bls12_381G2Element(bytes)
            | Constant::Bls12_381MlResult(bytes) => write!(f, "0x{}", hex::encode(bytes)),
        })
    }
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(con {} {})", self.type_of(), ConstantValue(self))
    }
}

impl fmt::Display for PlutusData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        stacker::maybe_grow(MIN_STACK_RED_ZONE, STACK_GROWTH_SIZE, || match self {
            PlutusData::Constr { tag, fields, .. } => {
                write!(f, "Constr {tag} ")?;
                write_data_list(f, fields)
            }
            PlutusData::Map(pairs) => {
                write!(f, "Map [")?;
                for (i, (key, value)) in pairs.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "({key}, {value})")?;
                }
                write!(f, "]")
            }
            PlutusData::List { items, .. } => {
                write!(f, "List ")?;
                write_data_list(f, items)
            }
            PlutusData::Integer(n) => write!(f, "I {n}"),
            PlutusData::ByteString(bytes) => write!(f, "B #{}", hex::encode(bytes)),
        })
    }
}

fn write_data_list(f: &mut fmt::Formatter<'_>, items: &[PlutusData]) -> fmt::Result {
    write!(f, "[")?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{item}")?;
    }
    write!(f, "]")
}

impl<T: Binder> fmt::Display for Term<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        stacker::maybe_grow(MIN_STACK_RED_ZONE, STACK_GROWTH_SIZE, || match self {
            Term::Var(name) => write!(f, "{}", name.text_name()),
            Term::Delay(term) => write!(f, "(delay {term})"),
            Term::Force(term) => write!(f, "(force {term})"),
            Term::Lambda { parameter, body } => {
                write!(f, "(lam {} {body})", parameter.text_name())
            }
            Term::Apply { function, argument } => write!(f, "[{function} {argument}]"),
            Term::Constant(constant) => write!(f, "{constant}"),
            Term::Error => write!(f, "(error)"),
            Term::Builtin(id) => write!(f, "(builtin #{})", id.0),
            Term::Constr { tag, fields } => {
                write!(f, "(constr {tag}")?;
                for field in fields {
                    write!(f, " {field}")?;
                }
                write!(f, ")")
            }
            Term::Case {
                scrutinee,
                branches,
            } => {
                write!(f, "(case {scrutinee}")?;
                for branch in branches {
                    write!(f, " {branch}")?;
                }
                write!(f, ")")
            }
        })
    }
}

impl<T: Binder> fmt::Display for Program<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(program {} {})", self.version, self.term)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::name::{DeBruijn, Name};
    use crate::term::Version;

    #[test]
    fn test_program_rendering() {
        let x = Name::new("x", 0);
        let program = Program::new(
            Version::V1_1_0,
            Term::lambda(
                x.clone(),
                Term::apply(Term::builtin(7), Term::var(x)),
            ),
        );
        assert_eq!(
            program.to_string(),
            "(program 1.1.0 (lam x [(builtin #7) x]))"
        );
    }

    #[test]
    fn test_debruijn_rendering() {
        let term: Term<DeBruijn> = Term::lambda(DeBruijn::BINDER, Term::var(DeBruijn(1)));
        assert_eq!(term.to_string(), "(lam i_0 i_1)");
    }

    #[test]
    fn test_constant_rendering() {
        assert_eq!(Constant::integer(-5).to_string(), "(con integer -5)");
        assert_eq!(
            Constant::byte_string(vec![0xab, 0x01]).to_string(),
            "(con bytestring #ab01)"
        );
        assert_eq!(Constant::string("hi").to_string(), "(con string \"hi\")");
        assert_eq!(Constant::Unit.to_string(), "(con unit ())");
        assert_eq!(Constant::Bool(true).to_string(), "(con bool True)");

        let list = Constant::ProtoList(
            Type::Integer,
            vec![Constant::integer(1), Constant::integer(2)],
        );
        assert_eq!(list.to_string(), "(con (list integer) [1, 2])");

        let pair = Constant::proto_pair(Constant::integer(1), Constant::Bool(false));
        assert_eq!(pair.to_string(), "(con (pair integer bool) (1, False))");
    }

    #[test]
    fn test_data_rendering() {
        let data = PlutusData::constr(
            0,
            vec![
                PlutusData::integer(1),
                PlutusData::bytes(vec![0xab]),
                PlutusData::map(vec![(PlutusData::integer(2), PlutusData::list(vec![]))]),
            ],
        );
        assert_eq!(
            Constant::Data(data).to_string(),
            "(con data (Constr 0 [I 1, B #ab, Map [(I 2, List [])]]))"
        );
    }

    #[test]
    fn test_constr_case_rendering() {
        let term: Term<DeBruijn> = Term::case(
            Term::constr(1, vec![Term::unit()]),
            vec![Term::error(), Term::lambda(DeBruijn::BINDER, Term::var(DeBruijn(1)))],
        );
        assert_eq!(
            term.to_string(),
            "(case (constr 1 (con unit ())) (error) (lam i_0 i_1))"
        );
    }
}
