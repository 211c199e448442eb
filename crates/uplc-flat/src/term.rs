//! FLAT encoding of terms and programs
//!
//! # Layout
//!
//! ```text
//! program  := word(major) word(minor) word(patch) term filler
//! term     := tag:4 payload
//! ```
//!
//! | Tag | Term     | Payload                                  |
//! |-----|----------|------------------------------------------|
//! | 0   | Var      | binder variable encoding                 |
//! | 1   | Delay    | term                                     |
//! | 2   | Lambda   | binder parameter encoding, body term     |
//! | 3   | Apply    | function term, argument term             |
//! | 4   | Constant | type tags, value                         |
//! | 5   | Force    | term                                     |
//! | 6   | Error    |                                          |
//! | 7   | Builtin  | fixed-width builtin id                   |
//! | 8   | Constr   | word(tag), flagged list of field terms   |
//! | 9   | Case     | scrutinee term, flagged list of branches |

use crate::binder::FlatBinder;
use crate::constant::{decode_constant, encode_constant};
use crate::decoder::Decoder;
use crate::encoder::Encoder;
use crate::error::{FlatError, FlatResult};
use tracing::{debug, trace};
use uplc_core::{
    BuiltinId, CodecConfig, Program, Term, Version, MIN_STACK_RED_ZONE, STACK_GROWTH_SIZE,
};

/// Term tags
pub mod term_tags {
    pub const TAG_WIDTH: u32 = 4;

    pub const VAR: u8 = 0;
    pub const DELAY: u8 = 1;
    pub const LAMBDA: u8 = 2;
    pub const APPLY: u8 = 3;
    pub const CONSTANT: u8 = 4;
    pub const FORCE: u8 = 5;
    pub const ERROR: u8 = 6;
    pub const BUILTIN: u8 = 7;
    pub const CONSTR: u8 = 8;
    pub const CASE: u8 = 9;
}

use term_tags as tags;

/// Writes terms with a fixed configuration
struct TermWriter<'c> {
    encoder: Encoder,
    config: &'c CodecConfig,
}

impl TermWriter<'_> {
    fn tag(&mut self, tag: u8) -> FlatResult<()> {
        self.encoder.bits(tags::TAG_WIDTH, u64::from(tag))
    }

    fn term<T: FlatBinder>(&mut self, term: &Term<T>, depth: usize) -> FlatResult<()> {
        if depth > self.config.max_term_depth {
            return Err(FlatError::DepthLimit {
                limit: self.config.max_term_depth,
            });
        }
        stacker::maybe_grow(MIN_STACK_RED_ZONE, STACK_GROWTH_SIZE, || {
            self.term_impl(term, depth)
        })
    }

    /// Implementation (called via stacker::maybe_grow)
    fn term_impl<T: FlatBinder>(&mut self, term: &Term<T>, depth: usize) -> FlatResult<()> {
        let next = depth + 1;
        match term {
            Term::Var(name) => {
                self.tag(tags::VAR)?;
                name.encode_var(&mut self.encoder)
            }
            Term::Delay(body) => {
                self.tag(tags::DELAY)?;
                self.term(body, next)
            }
            Term::Lambda { parameter, body } => {
                self.tag(tags::LAMBDA)?;
                parameter.encode_parameter(&mut self.encoder)?;
                self.term(body, next)
            }
            Term::Apply { function, argument } => {
                self.tag(tags::APPLY)?;
                self.term(function, next)?;
                self.term(argument, next)
            }
            Term::Constant(constant) => {
                self.tag(tags::CONSTANT)?;
                encode_constant(&mut self.encoder, constant, self.config)
            }
            Term::Force(body) => {
                self.tag(tags::FORCE)?;
                self.term(body, next)
            }
            Term::Error => self.tag(tags::ERROR),
            Term::Builtin(id) => {
                self.tag(tags::BUILTIN)?;
                self.encoder
                    .bits(self.config.builtin_tag_width, u64::from(id.to_int()))
            }
            Term::Constr { tag, fields } => {
                self.tag(tags::CONSTR)?;
                self.encoder.word(*tag);
                self.list(fields, next)
            }
            Term::Case {
                scrutinee,
                branches,
            } => {
                self.tag(tags::CASE)?;
                self.term(scrutinee, next)?;
                self.list(branches, next)
            }
        }
    }

    fn list<T: FlatBinder>(&mut self, terms: &[Term<T>], depth: usize) -> FlatResult<()> {
        for term in terms {
            self.encoder.bit(true);
            self.term(term, depth)?;
        }
        self.encoder.bit(false);
        Ok(())
    }
}

/// Reads terms with a fixed configuration
struct TermReader<'a, 'c> {
    decoder: Decoder<'a>,
    config: &'c CodecConfig,
}

impl TermReader<'_, '_> {
    fn term<T: FlatBinder>(&mut self, depth: usize) -> FlatResult<Term<T>> {
        if depth > self.config.max_term_depth {
            return Err(FlatError::DepthLimit {
                limit: self.config.max_term_depth,
            });
        }
        stacker::maybe_grow(MIN_STACK_RED_ZONE, STACK_GROWTH_SIZE, || {
            self.term_impl(depth)
        })
    }

    /// Implementation (called via stacker::maybe_grow)
    fn term_impl<T: FlatBinder>(&mut self, depth: usize) -> FlatResult<Term<T>> {
        let offset = self.decoder.offset();
        let tag = self.decoder.bits(tags::TAG_WIDTH)? as u8;
        trace!(tag, offset, "term");
        let next = depth + 1;
        Ok(match tag {
            tags::VAR => Term::Var(T::decode_var(&mut self.decoder)?),
            tags::DELAY => Term::Delay(Box::new(self.term(next)?)),
            tags::LAMBDA => {
                let parameter = T::decode_parameter(&mut self.decoder)?;
                Term::Lambda {
                    parameter,
                    body: Box::new(self.term(next)?),
                }
            }
            tags::APPLY => {
                let function = self.term(next)?;
                let argument = self.term(next)?;
                Term::apply(function, argument)
            }
            tags::CONSTANT => Term::Constant(decode_constant(&mut self.decoder, self.config)?),
            tags::FORCE => Term::Force(Box::new(self.term(next)?)),
            tags::ERROR => Term::Error,
            tags::BUILTIN => {
                let offset = self.decoder.offset();
                let value = self.decoder.bits(self.config.builtin_tag_width)?;
                let id = u8::try_from(value).map_err(|_| FlatError::FieldOverflow {
                    field: "builtin id",
                    value,
                    offset,
                })?;
                Term::Builtin(BuiltinId(id))
            }
            tags::CONSTR => {
                let tag = self.decoder.word()?;
                Term::Constr {
                    tag,
                    fields: self.list(next)?,
                }
            }
            tags::CASE => {
                let scrutinee = self.term(next)?;
                Term::Case {
                    scrutinee: Box::new(scrutinee),
                    branches: self.list(next)?,
                }
            }
            tag => return Err(FlatError::UnknownTermTag { tag, offset }),
        })
    }

    fn list<T: FlatBinder>(&mut self, depth: usize) -> FlatResult<Vec<Term<T>>> {
        let mut terms = Vec::new();
        while self.decoder.bit()? {
            terms.push(self.term(depth)?);
        }
        Ok(terms)
    }

    fn version_part(&mut self, field: &'static str) -> FlatResult<u32> {
        let offset = self.decoder.offset();
        let value = self.decoder.word()?;
        u32::try_from(value).map_err(|_| FlatError::FieldOverflow {
            field,
            value,
            offset,
        })
    }
}

/// Encode a bare term, padded with a filler
pub fn encode_term<T: FlatBinder>(term: &Term<T>) -> FlatResult<Vec<u8>> {
    encode_term_with_config(term, &CodecConfig::default())
}

pub fn encode_term_with_config<T: FlatBinder>(
    term: &Term<T>,
    config: &CodecConfig,
) -> FlatResult<Vec<u8>> {
    config.validate()?;
    let mut writer = TermWriter {
        encoder: Encoder::new(),
        config,
    };
    writer.term(term, 0)?;
    writer.encoder.filler();
    Ok(writer.encoder.finish())
}

/// Decode a bare term written by [`encode_term`]
pub fn decode_term<T: FlatBinder>(bytes: &[u8]) -> FlatResult<Term<T>> {
    decode_term_with_config(bytes, &CodecConfig::default())
}

pub fn decode_term_with_config<T: FlatBinder>(
    bytes: &[u8],
    config: &CodecConfig,
) -> FlatResult<Term<T>> {
    config.validate()?;
    let mut reader = TermReader {
        decoder: Decoder::new(bytes),
        config,
    };
    let term = reader.term(0)?;
    finish(&mut reader.decoder)?;
    Ok(term)
}

pub fn encode_program<T: FlatBinder>(program: &Program<T>) -> FlatResult<Vec<u8>> {
    encode_program_with_config(program, &CodecConfig::default())
}

pub fn encode_program_with_config<T: FlatBinder>(
    program: &Program<T>,
    config: &CodecConfig,
) -> FlatResult<Vec<u8>> {
    config.validate()?;
    let mut writer = TermWriter {
        encoder: Encoder::new(),
        config,
    };
    let Version {
        major,
        minor,
        patch,
    } = program.version;
    writer.encoder.word(u64::from(major));
    writer.encoder.word(u64::from(minor));
    writer.encoder.word(u64::from(patch));
    writer.term(&program.term, 0)?;
    writer.encoder.filler();
    let bytes = writer.encoder.finish();
    debug!(version = %program.version, len = bytes.len(), "encoded program");
    Ok(bytes)
}

pub fn decode_program<T: FlatBinder>(bytes: &[u8]) -> FlatResult<Program<T>> {
    decode_program_with_config(bytes, &CodecConfig::default())
}

pub fn decode_program_with_config<T: FlatBinder>(
    bytes: &[u8],
    config: &CodecConfig,
) -> FlatResult<Program<T>> {
    config.validate()?;
    let mut reader = TermReader {
        decoder: Decoder::new(bytes),
        config,
    };
    let major = reader.version_part("major version")?;
    let minor = reader.version_part("minor version")?;
    let patch = reader.version_part("patch version")?;
    let version = Version::new(major, minor, patch);
    let term = reader.term(0)?;
    finish(&mut reader.decoder)?;
    debug!(%version, len = bytes.len(), "decoded program");
    Ok(Program { version, term })
}

/// Consume the closing filler and require the input to end there
fn finish(decoder: &mut Decoder<'_>) -> FlatResult<()> {
    decoder.filler()?;
    match decoder.remaining_bytes() {
        0 => Ok(()),
        remaining => Err(FlatError::TrailingBytes { remaining }),
    }
}
