//! Name resolution
//!
//! Assigns a [`Unique`] to every [`Name`] in a freshly parsed tree. The walk is
//! pre-order and depth-first, visiting a lambda's parameter before its body,
//! so Uniques are numbered in textual order.
//!
//! Resolution is scope-aware: each lambda binder gets a fresh Unique, and a
//! variable takes the Unique of the innermost enclosing binder with the same
//! spelling. Two lambdas that bind the same spelling therefore get distinct
//! Uniques. Free spellings get one Unique each, shared by all their
//! occurrences.
//!
//! All state lives in one [`Interner`]; nothing is shared between calls.

use crate::config::{CodecConfig, MIN_STACK_RED_ZONE, STACK_GROWTH_SIZE};
use crate::error::{CoreError, CoreResult};
use crate::name::{Name, Unique};
use crate::term::{Program, Term};
use hashbrown::HashMap;
use tracing::debug;

/// Unique assignment state for one resolution pass
#[derive(Debug)]
pub struct Interner {
    /// Binders in scope, innermost last
    scopes: Vec<(String, Unique)>,
    /// Uniques of spellings with no enclosing binder
    free: HashMap<String, Unique>,
    next: Unique,
    max_depth: usize,
}

impl Default for Interner {
    fn default() -> Self {
        Self::new()
    }
}

impl Interner {
    pub fn new() -> Self {
        Self::with_config(&CodecConfig::default())
    }

    pub fn with_config(config: &CodecConfig) -> Self {
        Self {
            scopes: Vec::new(),
            free: HashMap::new(),
            next: Unique::default(),
            max_depth: config.max_term_depth,
        }
    }

    /// Number of Uniques handed out so far
    pub fn assigned(&self) -> u64 {
        self.next.to_int()
    }

    fn fresh(&mut self) -> Unique {
        let unique = self.next;
        self.next = unique.next();
        unique
    }

    fn resolve(&mut self, text: &str) -> Unique {
        if let Some((_, unique)) = self.scopes.iter().rev().find(|(bound, _)| bound == text) {
            return *unique;
        }
        if let Some(unique) = self.free.get(text) {
            return *unique;
        }
        let unique = self.fresh();
        self.free.insert(text.to_string(), unique);
        unique
    }

    /// Fill in every Unique of a program, in place
    pub fn program(&mut self, program: &mut Program<Name>) -> CoreResult<()> {
        self.term(&mut program.term)?;
        debug!(
            version = %program.version,
            uniques = self.assigned(),
            free = self.free.len(),
            "interned program"
        );
        Ok(())
    }

    /// Fill in every Unique of a term, in place
    pub fn term(&mut self, term: &mut Term<Name>) -> CoreResult<()> {
        self.term_at(term, 0)
    }

    fn term_at(&mut self, term: &mut Term<Name>, depth: usize) -> CoreResult<()> {
        if depth > self.max_depth {
            return Err(CoreError::DepthLimit {
                limit: self.max_depth,
            });
        }
        stacker::maybe_grow(MIN_STACK_RED_ZONE, STACK_GROWTH_SIZE, || {
            self.term_at_impl(term, depth)
        })
    }

    /// Implementation (called via stacker::maybe_grow)
    fn term_at_impl(&mut self, term: &mut Term<Name>, depth: usize) -> CoreResult<()> {
        match term {
            Term::Var(name) => {
                name.unique = self.resolve(&name.text);
                Ok(())
            }
            Term::Lambda { parameter, body } => {
                parameter.unique = self.fresh();
                self.scopes.push((parameter.text.clone(), parameter.unique));
                let result = self.term_at(body, depth + 1);
                self.scopes.pop();
                result
            }
            Term::Delay(inner) | Term::Force(inner) => self.term_at(inner, depth + 1),
            Term::Apply { function, argument } => {
                self.term_at(function, depth + 1)?;
                self.term_at(argument, depth + 1)
            }
            Term::Constr { fields, .. } => {
                for field in fields {
                    self.term_at(field, depth + 1)?;
                }
                Ok(())
            }
            Term::Case {
                scrutinee,
                branches,
            } => {
                self.term_at(scrutinee, depth + 1)?;
                for branch in branches {
                    self.term_at(branch, depth + 1)?;
                }
                Ok(())
            }
            Term::Constant(_) | Term::Builtin(_) | Term::Error => Ok(()),
        }
    }
}

/// Resolve every name of a parsed program with a fresh [`Interner`]
pub fn intern_program(program: Program<Name>) -> CoreResult<Program<Name>> {
    intern_program_with_config(program, &CodecConfig::default())
}

pub fn intern_program_with_config(
    mut program: Program<Name>,
    config: &CodecConfig,
) -> CoreResult<Program<Name>> {
    Interner::with_config(config).program(&mut program)?;
    Ok(program)
}

/// Resolve every name of a parsed term with a fresh [`Interner`]
pub fn intern_term(term: Term<Name>) -> CoreResult<Term<Name>> {
    intern_term_with_config(term, &CodecConfig::default())
}

pub fn intern_term_with_config(mut term: Term<Name>, config: &CodecConfig) -> CoreResult<Term<Name>> {
    Interner::with_config(config).term(&mut term)?;
    Ok(term)
}
