//! Binder conversion
//!
//! Rewrites a term from one binder form to another. Every direction shares
//! one depth-bounded walk ([`rebind`]); a [`Rebind`] strategy decides what a
//! lambda parameter and a variable become.
//!
//! Name to de Bruijn keeps a stack of the Uniques bound by enclosing lambdas.
//! A variable's index is its distance from the top of that stack, with the
//! innermost binder at index 1. Lambda parameters become index 0. A Unique
//! missing from the stack is a free variable and fails the conversion.

use crate::config::{CodecConfig, MIN_STACK_RED_ZONE, STACK_GROWTH_SIZE};
use crate::error::{CoreError, CoreResult};
use crate::name::{DeBruijn, Name, NamedDeBruijn, Unique};
use crate::term::{Program, Term};
use tracing::debug;

/// Spelling given to binders that come from a bare index
const SYNTHETIC_TEXT: &str = "i";

/// What binders and variables become in the target form
pub trait Rebind<S, T> {
    /// Enter the scope of a lambda parameter
    fn bind(&mut self, parameter: &S) -> CoreResult<T>;
    /// Leave the scope opened by the matching `bind`
    fn unbind(&mut self);
    /// Translate a variable occurrence
    fn resolve(&mut self, var: &S) -> CoreResult<T>;
}

/// Rebuild `term` in a new binder form, failing past `limit` nesting levels
pub fn rebind<S, T, R>(strategy: &mut R, term: &Term<S>, limit: usize) -> CoreResult<Term<T>>
where
    R: Rebind<S, T>,
{
    Walk { strategy, limit }.term(term, 0)
}

struct Walk<'r, R> {
    strategy: &'r mut R,
    limit: usize,
}

impl<R> Walk<'_, R> {
    fn term<S, T>(&mut self, term: &Term<S>, depth: usize) -> CoreResult<Term<T>>
    where
        R: Rebind<S, T>,
    {
        if depth > self.limit {
            return Err(CoreError::DepthLimit { limit: self.limit });
        }
        stacker::maybe_grow(MIN_STACK_RED_ZONE, STACK_GROWTH_SIZE, || {
            self.term_impl(term, depth)
        })
    }

    /// Implementation (called via stacker::maybe_grow)
    fn term_impl<S, T>(&mut self, term: &Term<S>, depth: usize) -> CoreResult<Term<T>>
    where
        R: Rebind<S, T>,
    {
        let next = depth + 1;
        Ok(match term {
            Term::Var(var) => Term::Var(self.strategy.resolve(var)?),
            Term::Lambda { parameter, body } => {
                let parameter = self.strategy.bind(parameter)?;
                let body = self.term(body, next);
                self.strategy.unbind();
                Term::Lambda {
                    parameter,
                    body: Box::new(body?),
                }
            }
            Term::Delay(inner) => Term::Delay(Box::new(self.term(inner, next)?)),
            Term::Force(inner) => Term::Force(Box::new(self.term(inner, next)?)),
            Term::Apply { function, argument } => Term::Apply {
                function: Box::new(self.term(function, next)?),
                argument: Box::new(self.term(argument, next)?),
            },
            Term::Constr { tag, fields } => Term::Constr {
                tag: *tag,
                fields: fields
                    .iter()
                    .map(|field| self.term(field, next))
                    .collect::<CoreResult<_>>()?,
            },
            Term::Case {
                scrutinee,
                branches,
            } => Term::Case {
                scrutinee: Box::new(self.term(scrutinee, next)?),
                branches: branches
                    .iter()
                    .map(|branch| self.term(branch, next))
                    .collect::<CoreResult<_>>()?,
            },
            Term::Constant(constant) => Term::Constant(constant.clone()),
            Term::Builtin(id) => Term::Builtin(*id),
            Term::Error => Term::Error,
        })
    }
}

/// Name to index conversion over a stack of bound Uniques
#[derive(Debug, Default)]
pub struct NameToDeBruijn {
    bound: Vec<Unique>,
}

impl NameToDeBruijn {
    fn index_of(&self, name: &Name) -> CoreResult<DeBruijn> {
        self.bound
            .iter()
            .rev()
            .position(|unique| *unique == name.unique)
            .map(|distance| DeBruijn(distance + 1))
            .ok_or_else(|| CoreError::FreeUnique {
                text: name.text.clone(),
                unique: name.unique.to_int(),
            })
    }
}

impl Rebind<Name, DeBruijn> for NameToDeBruijn {
    fn bind(&mut self, parameter: &Name) -> CoreResult<DeBruijn> {
        self.bound.push(parameter.unique);
        Ok(DeBruijn::BINDER)
    }

    fn unbind(&mut self) {
        self.bound.pop();
    }

    fn resolve(&mut self, var: &Name) -> CoreResult<DeBruijn> {
        self.index_of(var)
    }
}

impl Rebind<Name, NamedDeBruijn> for NameToDeBruijn {
    fn bind(&mut self, parameter: &Name) -> CoreResult<NamedDeBruijn> {
        self.bound.push(parameter.unique);
        Ok(NamedDeBruijn::new(parameter.text.clone(), DeBruijn::BINDER))
    }

    fn unbind(&mut self) {
        self.bound.pop();
    }

    fn resolve(&mut self, var: &Name) -> CoreResult<NamedDeBruijn> {
        Ok(NamedDeBruijn::new(var.text.clone(), self.index_of(var)?))
    }
}

/// Index to Name conversion, allocating a fresh Unique per binder
#[derive(Debug, Default)]
pub struct DeBruijnToName {
    bound: Vec<Name>,
    next: Unique,
}

impl DeBruijnToName {
    fn push(&mut self, text: Option<&str>) -> Name {
        let unique = self.next;
        self.next = unique.next();
        let text = match text {
            Some(text) => text.to_string(),
            None => format!("{SYNTHETIC_TEXT}_{unique}"),
        };
        let name = Name::new(text, unique);
        self.bound.push(name.clone());
        name
    }

    fn lookup(&self, index: DeBruijn) -> CoreResult<Name> {
        let depth = self.bound.len();
        let slot = match index.to_int() {
            0 => None,
            i => depth.checked_sub(i),
        };
        slot.map(|slot| self.bound[slot].clone())
            .ok_or(CoreError::FreeIndex {
                index: index.to_int(),
                depth,
            })
    }
}

impl Rebind<DeBruijn, Name> for DeBruijnToName {
    fn bind(&mut self, _parameter: &DeBruijn) -> CoreResult<Name> {
        Ok(self.push(None))
    }

    fn unbind(&mut self) {
        self.bound.pop();
    }

    fn resolve(&mut self, var: &DeBruijn) -> CoreResult<Name> {
        self.lookup(*var)
    }
}

impl Rebind<NamedDeBruijn, Name> for DeBruijnToName {
    fn bind(&mut self, parameter: &NamedDeBruijn) -> CoreResult<Name> {
        Ok(self.push(Some(&parameter.text)))
    }

    fn unbind(&mut self) {
        self.bound.pop();
    }

    fn resolve(&mut self, var: &NamedDeBruijn) -> CoreResult<Name> {
        self.lookup(var.index)
    }
}

/// Conversions that only relabel binders
#[derive(Debug, Default)]
pub struct Relabel;

impl Rebind<NamedDeBruijn, DeBruijn> for Relabel {
    fn bind(&mut self, parameter: &NamedDeBruijn) -> CoreResult<DeBruijn> {
        Ok(parameter.index)
    }

    fn unbind(&mut self) {}

    fn resolve(&mut self, var: &NamedDeBruijn) -> CoreResult<DeBruijn> {
        Ok(var.index)
    }
}

impl Rebind<DeBruijn, NamedDeBruijn> for Relabel {
    fn bind(&mut self, parameter: &DeBruijn) -> CoreResult<NamedDeBruijn> {
        Ok(NamedDeBruijn::new(SYNTHETIC_TEXT, *parameter))
    }

    fn unbind(&mut self) {}

    fn resolve(&mut self, var: &DeBruijn) -> CoreResult<NamedDeBruijn> {
        Ok(NamedDeBruijn::new(SYNTHETIC_TEXT, *var))
    }
}

impl Term<Name> {
    /// Convert to de Bruijn indices; free variables are an error
    pub fn to_debruijn(&self) -> CoreResult<Term<DeBruijn>> {
        self.to_debruijn_with_config(&CodecConfig::default())
    }

    pub fn to_debruijn_with_config(&self, config: &CodecConfig) -> CoreResult<Term<DeBruijn>> {
        rebind(&mut NameToDeBruijn::default(), self, config.max_term_depth)
    }

    /// Convert to named de Bruijn indices; free variables are an error
    pub fn to_named_debruijn(&self) -> CoreResult<Term<NamedDeBruijn>> {
        self.to_named_debruijn_with_config(&CodecConfig::default())
    }

    pub fn to_named_debruijn_with_config(
        &self,
        config: &CodecConfig,
    ) -> CoreResult<Term<NamedDeBruijn>> {
        rebind(&mut NameToDeBruijn::default(), self, config.max_term_depth)
    }
}

impl Term<DeBruijn> {
    /// Give every binder a fresh Unique and a synthetic spelling
    pub fn to_name(&self) -> CoreResult<Term<Name>> {
        self.to_name_with_config(&CodecConfig::default())
    }

    pub fn to_name_with_config(&self, config: &CodecConfig) -> CoreResult<Term<Name>> {
        rebind(&mut DeBruijnToName::default(), self, config.max_term_depth)
    }

    pub fn to_named_debruijn(&self) -> CoreResult<Term<NamedDeBruijn>> {
        self.to_named_debruijn_with_config(&CodecConfig::default())
    }

    pub fn to_named_debruijn_with_config(
        &self,
        config: &CodecConfig,
    ) -> CoreResult<Term<NamedDeBruijn>> {
        rebind(&mut Relabel, self, config.max_term_depth)
    }
}

impl Term<NamedDeBruijn> {
    /// Give every binder a fresh Unique, keeping its spelling
    pub fn to_name(&self) -> CoreResult<Term<Name>> {
        self.to_name_with_config(&CodecConfig::default())
    }

    pub fn to_name_with_config(&self, config: &CodecConfig) -> CoreResult<Term<Name>> {
        rebind(&mut DeBruijnToName::default(), self, config.max_term_depth)
    }

    pub fn to_debruijn(&self) -> CoreResult<Term<DeBruijn>> {
        self.to_debruijn_with_config(&CodecConfig::default())
    }

    pub fn to_debruijn_with_config(&self, config: &CodecConfig) -> CoreResult<Term<DeBruijn>> {
        rebind(&mut Relabel, self, config.max_term_depth)
    }
}

impl Program<Name> {
    pub fn to_debruijn(&self) -> CoreResult<Program<DeBruijn>> {
        self.to_debruijn_with_config(&CodecConfig::default())
    }

    pub fn to_debruijn_with_config(&self, config: &CodecConfig) -> CoreResult<Program<DeBruijn>> {
        debug!(version = %self.version, "converting program to de Bruijn indices");
        Ok(Program::new(
            self.version,
            self.term.to_debruijn_with_config(config)?,
        ))
    }

    pub fn to_named_debruijn(&self) -> CoreResult<Program<NamedDeBruijn>> {
        self.to_named_debruijn_with_config(&CodecConfig::default())
    }

    pub fn to_named_debruijn_with_config(
        &self,
        config: &CodecConfig,
    ) -> CoreResult<Program<NamedDeBruijn>> {
        debug!(version = %self.version, "converting program to named de Bruijn indices");
        Ok(Program::new(
            self.version,
            self.term.to_named_debruijn_with_config(config)?,
        ))
    }
}

impl Program<DeBruijn> {
    pub fn to_name(&self) -> CoreResult<Program<Name>> {
        self.to_name_with_config(&CodecConfig::default())
    }

    pub fn to_name_with_config(&self, config: &CodecConfig) -> CoreResult<Program<Name>> {
        debug!(version = %self.version, "converting program to names");
        Ok(Program::new(self.version, self.term.to_name_with_config(config)?))
    }

    pub fn to_named_debruijn(&self) -> CoreResult<Program<NamedDeBruijn>> {
        self.to_named_debruijn_with_config(&CodecConfig::default())
    }

    pub fn to_named_debruijn_with_config(
        &self,
        config: &CodecConfig,
    ) -> CoreResult<Program<NamedDeBruijn>> {
        Ok(Program::new(
            self.version,
            self.term.to_named_debruijn_with_config(config)?,
        ))
    }
}

impl Program<NamedDeBruijn> {
    pub fn to_name(&self) -> CoreResult<Program<Name>> {
        self.to_name_with_config(&CodecConfig::default())
    }

    pub fn to_name_with_config(&self, config: &CodecConfig) -> CoreResult<Program<Name>> {
        debug!(version = %self.version, "converting program to names");
        Ok(Program::new(self.version, self.term.to_name_with_config(config)?))
    }

    pub fn to_debruijn(&self) -> CoreResult<Program<DeBruijn>> {
        self.to_debruijn_with_config(&CodecConfig::default())
    }

    pub fn to_debruijn_with_config(&self, config: &CodecConfig) -> CoreResult<Program<DeBruijn>> {
        Ok(Program::new(
            self.version,
            self.term.to_debruijn_with_config(config)?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intern::intern_term;

    fn var(text: &str) -> Term<Name> {
        Term::var(Name::text(text))
    }

    fn lam(text: &str, body: Term<Name>) -> Term<Name> {
        Term::lambda(Name::text(text), body)
    }

    #[test]
    fn test_innermost_binder_is_one() {
        // (lam x (lam y [x y]))
        let term = intern_term(lam("x", lam("y", Term::apply(var("x"), var("y"))))).unwrap();
        let expected = Term::lambda(
            DeBruijn(0),
            Term::lambda(
                DeBruijn(0),
                Term::apply(Term::var(DeBruijn(2)), Term::var(DeBruijn(1))),
            ),
        );
        assert_eq!(term.to_debruijn().unwrap(), expected);
    }

    #[test]
    fn test_named_debruijn_keeps_text() {
        let term = intern_term(lam("x", var("x"))).unwrap();
        assert_eq!(
            term.to_named_debruijn().unwrap(),
            Term::lambda(
                NamedDeBruijn::new("x", 0),
                Term::var(NamedDeBruijn::new("x", 1))
            )
        );
    }

    #[test]
    fn test_free_variable_is_rejected() {
        let term = intern_term(lam("x", var("y"))).unwrap();
        let err = term.to_debruijn().unwrap_err();
        assert!(matches!(err, CoreError::FreeUnique { ref text, .. } if text == "y"));
    }

    #[test]
    fn test_constr_and_case_introduce_no_binder() {
        let term = intern_term(lam(
            "x",
            Term::case(var("x"), vec![Term::constr(2, vec![var("x")])]),
        ))
        .unwrap();
        let expected = Term::lambda(
            DeBruijn(0),
            Term::case(
                Term::var(DeBruijn(1)),
                vec![Term::constr(2, vec![Term::var(DeBruijn(1))])],
            ),
        );
        assert_eq!(term.to_debruijn().unwrap(), expected);
    }

    #[test]
    fn test_alpha_equivalent_terms_convert_identically() {
        let a = intern_term(lam("x", lam("y", Term::apply(var("y"), var("x"))))).unwrap();
        let b = intern_term(lam("p", lam("q", Term::apply(var("q"), var("p"))))).unwrap();
        assert_eq!(a.to_debruijn().unwrap(), b.to_debruijn().unwrap());
    }

    #[test]
    fn test_debruijn_to_name_and_back() {
        let term = Term::lambda(
            DeBruijn(0),
            Term::lambda(
                DeBruijn(0),
                Term::apply(Term::var(DeBruijn(2)), Term::var(DeBruijn(1))),
            ),
        );
        let named = term.to_name().unwrap();
        assert_eq!(
            named,
            Term::lambda(
                Name::new("i_0", 0),
                Term::lambda(
                    Name::new("i_1", 1),
                    Term::apply(
                        Term::var(Name::new("i_0", 0)),
                        Term::var(Name::new("i_1", 1))
                    ),
                ),
            )
        );
        assert_eq!(named.to_debruijn().unwrap(), term);
    }

    #[test]
    fn test_free_index_is_rejected() {
        let term: Term<DeBruijn> = Term::lambda(DeBruijn(0), Term::var(DeBruijn(2)));
        let err = term.to_name().unwrap_err();
        assert!(matches!(err, CoreError::FreeIndex { index: 2, depth: 1 }));

        let zero: Term<DeBruijn> = Term::lambda(DeBruijn(0), Term::var(DeBruijn(0)));
        assert!(zero.to_name().is_err());
    }

    #[test]
    fn test_named_debruijn_to_name_keeps_binder_text() {
        let term = Term::lambda(
            NamedDeBruijn::new("f", 0),
            Term::var(NamedDeBruijn::new("f", 1)),
        );
        assert_eq!(
            term.to_name().unwrap(),
            Term::lambda(Name::new("f", 0), Term::var(Name::new("f", 0)))
        );
    }

    #[test]
    fn test_relabel_round_trip() {
        let term = Term::lambda(DeBruijn(0), Term::var(DeBruijn(1)));
        let named = term.to_named_debruijn().unwrap();
        assert_eq!(
            named,
            Term::lambda(NamedDeBruijn::new("i", 0), Term::var(NamedDeBruijn::new("i", 1)))
        );
        assert_eq!(named.to_debruijn().unwrap(), term);
    }

    #[test]
    fn test_depth_limit() {
        let mut term = lam("x", var("x"));
        for _ in 0..50 {
            term = Term::force(term);
        }
        let config = CodecConfig::default().with_max_term_depth(20);
        let err = term.to_debruijn_with_config(&config).unwrap_err();
        assert!(matches!(err, CoreError::DepthLimit { limit: 20 }));
    }

    #[test]
    fn test_program_conversions_honour_configured_depth() {
        let mut term: Term<DeBruijn> = Term::lambda(DeBruijn(0), Term::var(DeBruijn(1)));
        for _ in 0..30 {
            term = Term::delay(term);
        }
        let program = Program::new(crate::term::Version::V1_0_0, term);
        let config = CodecConfig::default().with_max_term_depth(10);

        assert!(program.to_name().is_ok());
        assert!(matches!(
            program.to_name_with_config(&config),
            Err(CoreError::DepthLimit { limit: 10 })
        ));
        assert!(matches!(
            program.to_named_debruijn_with_config(&config),
            Err(CoreError::DepthLimit { limit: 10 })
        ));

        let named = program.to_name().unwrap();
        assert!(matches!(
            named.to_debruijn_with_config(&config),
            Err(CoreError::DepthLimit { limit: 10 })
        ));
        let relabelled = program.to_named_debruijn().unwrap();
        assert!(matches!(
            relabelled.to_debruijn_with_config(&config),
            Err(CoreError::DepthLimit { limit: 10 })
        ));
        assert!(matches!(
            relabelled.to_name_with_config(&config),
            Err(CoreError::DepthLimit { limit: 10 })
        ));
    }
}
