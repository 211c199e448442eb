//! FLAT encoding of constants
//!
//! A constant is written as a flagged list of 4-bit type tags followed by the
//! value. Compound types are spelled in prefix form:
//!
//! ```text
//! integer            [0]
//! (list bool)        [7, 5, 4]
//! (pair integer data) [7, 7, 6, 0, 8]
//! ```
//!
//! Values carry no per-element tags; the type directs decoding.

use crate::decoder::Decoder;
use crate::encoder::Encoder;
use crate::error::{FlatError, FlatResult};
use uplc_core::{CodecConfig, Constant, PlutusData, Type, MIN_STACK_RED_ZONE, STACK_GROWTH_SIZE};

/// Constant type tags
pub mod constant_tags {
    pub const TAG_WIDTH: u32 = 4;

    pub const INTEGER: u8 = 0;
    pub const BYTE_STRING: u8 = 1;
    pub const STRING: u8 = 2;
    pub const UNIT: u8 = 3;
    pub const BOOL: u8 = 4;
    pub const PROTO_LIST: u8 = 5;
    pub const PROTO_PAIR: u8 = 6;
    /// Type application marker
    pub const APPLY: u8 = 7;
    pub const DATA: u8 = 8;
    pub const BLS12_381_G1_ELEMENT: u8 = 9;
    pub const BLS12_381_G2_ELEMENT: u8 = 10;
    pub const BLS12_381_ML_RESULT: u8 = 11;
}

use constant_tags as tags;

/// Prefix tag spelling of a type
pub fn type_tags(ty: &Type) -> FlatResult<Vec<u8>> {
    type_tags_with_config(ty, &CodecConfig::default())
}

pub fn type_tags_with_config(ty: &Type, config: &CodecConfig) -> FlatResult<Vec<u8>> {
    let mut out = Vec::new();
    push_type_tags(ty, &mut out, 0, config.max_type_depth)?;
    Ok(out)
}

fn push_type_tags(ty: &Type, out: &mut Vec<u8>, depth: usize, limit: usize) -> FlatResult<()> {
    if depth > limit {
        return Err(FlatError::DepthLimit { limit });
    }
    stacker::maybe_grow(MIN_STACK_RED_ZONE, STACK_GROWTH_SIZE, || {
        push_type_tags_impl(ty, out, depth, limit)
    })
}

/// Implementation (called via stacker::maybe_grow)
fn push_type_tags_impl(
    ty: &Type,
    out: &mut Vec<u8>,
    depth: usize,
    limit: usize,
) -> FlatResult<()> {
    match ty {
        Type::Integer => out.push(tags::INTEGER),
        Type::ByteString => out.push(tags::BYTE_STRING),
        Type::String => out.push(tags::STRING),
        Type::Unit => out.push(tags::UNIT),
        Type::Bool => out.push(tags::BOOL),
        Type::Data => out.push(tags::DATA),
        Type::List(element) => {
            out.extend_from_slice(&[tags::APPLY, tags::PROTO_LIST]);
            push_type_tags(element, out, depth + 1, limit)?;
        }
        Type::Pair(first, second) => {
            out.extend_from_slice(&[tags::APPLY, tags::APPLY, tags::PROTO_PAIR]);
            push_type_tags(first, out, depth + 1, limit)?;
            push_type_tags(second, out, depth + 1, limit)?;
        }
        Type::Bls12_381G1Element | Type::Bls12_381G2Element | Type::Bls12_381MlResult => {
            return Err(FlatError::UnsupportedConstant(ty.to_string()));
        }
    }
    Ok(())
}

/// Reads one type from a tag list
struct TypeParser<'t> {
    tags: &'t [u8],
    pos: usize,
    /// Bit offset of the tag list, for errors
    offset: usize,
    max_depth: usize,
}

impl TypeParser<'_> {
    fn next(&mut self) -> FlatResult<u8> {
        let tag = self.tags.get(self.pos).copied().ok_or_else(|| self.malformed())?;
        self.pos += 1;
        Ok(tag)
    }

    fn malformed(&self) -> FlatError {
        FlatError::MalformedTypeTags {
            tags: self.tags.to_vec(),
            offset: self.offset,
        }
    }

    fn parse(&mut self, depth: usize) -> FlatResult<Type> {
        if depth > self.max_depth {
            return Err(FlatError::DepthLimit {
                limit: self.max_depth,
            });
        }
        stacker::maybe_grow(MIN_STACK_RED_ZONE, STACK_GROWTH_SIZE, || {
            self.parse_impl(depth)
        })
    }

    /// Implementation (called via stacker::maybe_grow)
    fn parse_impl(&mut self, depth: usize) -> FlatResult<Type> {
        let tag = self.next()?;
        match tag {
            tags::INTEGER => Ok(Type::Integer),
            tags::BYTE_STRING => Ok(Type::ByteString),
            tags::STRING => Ok(Type::String),
            tags::UNIT => Ok(Type::Unit),
            tags::BOOL => Ok(Type::Bool),
            tags::DATA => Ok(Type::Data),
            tags::APPLY => match self.next()? {
                tags::PROTO_LIST => Ok(Type::list(self.parse(depth + 1)?)),
                tags::APPLY => {
                    if self.next()? != tags::PROTO_PAIR {
                        return Err(self.malformed());
                    }
                    let first = self.parse(depth + 1)?;
                    let second = self.parse(depth + 1)?;
                    Ok(Type::pair(first, second))
                }
                _ => Err(self.malformed()),
            },
            tags::BLS12_381_G1_ELEMENT => Err(FlatError::UnsupportedConstant(
                Type::Bls12_381G1Element.to_string(),
            )),
            tags::BLS12_381_G2_ELEMENT => Err(FlatError::UnsupportedConstant(
                Type::Bls12_381G2Element.to_string(),
            )),
            tags::BLS12_381_ML_RESULT => Err(FlatError::UnsupportedConstant(
                Type::Bls12_381MlResult.to_string(),
            )),
            tags::PROTO_LIST | tags::PROTO_PAIR => Err(self.malformed()),
            tag => Err(FlatError::UnknownConstantTag {
                tag,
                offset: self.offset,
            }),
        }
    }
}

/// Parse a complete tag list into exactly one type
pub fn parse_type_tags(tags: &[u8], offset: usize, config: &CodecConfig) -> FlatResult<Type> {
    let mut parser = TypeParser {
        tags,
        pos: 0,
        offset,
        max_depth: config.max_type_depth,
    };
    let ty = parser.parse(0)?;
    if parser.pos != tags.len() {
        return Err(parser.malformed());
    }
    Ok(ty)
}

pub fn encode_constant(
    encoder: &mut Encoder,
    constant: &Constant,
    config: &CodecConfig,
) -> FlatResult<()> {
    let ty = constant.type_of();
    let spelling = type_tags_with_config(&ty, config)?;
    encoder.list_with(&spelling, |e, tag| e.bits(tags::TAG_WIDTH, u64::from(*tag)))?;
    ValueWriter {
        encoder,
        limit: config.max_type_depth,
    }
    .contents(constant, 0)
}

/// Writes constant values against their types
struct ValueWriter<'e> {
    encoder: &'e mut Encoder,
    limit: usize,
}

impl ValueWriter<'_> {
    /// Write `value` as an element of a container declared with type `ty`
    fn value(&mut self, ty: &Type, value: &Constant, depth: usize) -> FlatResult<()> {
        let annotated = match (ty, value) {
            (Type::List(element), Constant::ProtoList(declared, _)) => **element == *declared,
            (Type::Pair(a, b), Constant::ProtoPair(declared_a, declared_b, _, _)) => {
                **a == *declared_a && **b == *declared_b
            }
            (Type::Integer, Constant::Integer(_))
            | (Type::ByteString, Constant::ByteString(_))
            | (Type::String, Constant::String(_))
            | (Type::Unit, Constant::Unit)
            | (Type::Bool, Constant::Bool(_))
            | (Type::Data, Constant::Data(_)) => true,
            _ => false,
        };
        if !annotated {
            return Err(FlatError::TypeMismatch {
                expected: ty.to_string(),
                found: value.type_of().to_string(),
            });
        }
        self.contents(value, depth)
    }

    /// Write a value whose own annotations are trusted
    fn contents(&mut self, value: &Constant, depth: usize) -> FlatResult<()> {
        if depth > self.limit {
            return Err(FlatError::DepthLimit { limit: self.limit });
        }
        stacker::maybe_grow(MIN_STACK_RED_ZONE, STACK_GROWTH_SIZE, || {
            self.contents_impl(value, depth)
        })
    }

    /// Implementation (called via stacker::maybe_grow)
    fn contents_impl(&mut self, value: &Constant, depth: usize) -> FlatResult<()> {
        match value {
            Constant::Integer(n) => self.encoder.integer(n),
            Constant::ByteString(bytes) => self.encoder.bytes(bytes),
            Constant::String(text) => self.encoder.utf8(text),
            Constant::Unit => {}
            Constant::Bool(b) => self.encoder.bool(*b),
            Constant::Data(data) => self.encoder.bytes(&data.to_cbor()),
            Constant::ProtoList(element, items) => {
                for item in items {
                    self.encoder.bit(true);
                    self.value(element, item, depth + 1)?;
                }
                self.encoder.bit(false);
            }
            Constant::ProtoPair(a, b, first, second) => {
                self.value(a, first, depth + 1)?;
                self.value(b, second, depth + 1)?;
            }
            Constant::Bls12_381G1Element(_)
            | Constant::Bls12_381G2Element(_)
            | Constant::Bls12_381MlResult(_) => {
                return Err(FlatError::UnsupportedConstant(value.type_of().to_string()));
            }
        }
        Ok(())
    }
}

pub fn decode_constant(decoder: &mut Decoder<'_>, config: &CodecConfig) -> FlatResult<Constant> {
    let offset = decoder.offset();
    let spelling = decoder.list_with(|d| Ok(d.bits(tags::TAG_WIDTH)? as u8))?;
    let ty = parse_type_tags(&spelling, offset, config)?;
    ValueReader { decoder, config }.value(&ty, 0)
}

/// Reads constant values directed by a parsed type
struct ValueReader<'d, 'a, 'c> {
    decoder: &'d mut Decoder<'a>,
    config: &'c CodecConfig,
}

impl ValueReader<'_, '_, '_> {
    fn value(&mut self, ty: &Type, depth: usize) -> FlatResult<Constant> {
        let limit = self.config.max_type_depth;
        if depth > limit {
            return Err(FlatError::DepthLimit { limit });
        }
        stacker::maybe_grow(MIN_STACK_RED_ZONE, STACK_GROWTH_SIZE, || {
            self.value_impl(ty, depth)
        })
    }

    /// Implementation (called via stacker::maybe_grow)
    fn value_impl(&mut self, ty: &Type, depth: usize) -> FlatResult<Constant> {
        Ok(match ty {
            Type::Integer => Constant::Integer(self.decoder.integer()?),
            Type::ByteString => Constant::ByteString(self.decoder.bytes()?),
            Type::String => Constant::String(self.decoder.utf8()?),
            Type::Unit => Constant::Unit,
            Type::Bool => Constant::Bool(self.decoder.bool()?),
            Type::Data => {
                let bytes = self.decoder.bytes()?;
                Constant::Data(PlutusData::from_cbor_with_config(&bytes, self.config)?)
            }
            Type::List(element) => {
                let mut items = Vec::new();
                while self.decoder.bit()? {
                    items.push(self.value(element, depth + 1)?);
                }
                Constant::ProtoList((**element).clone(), items)
            }
            Type::Pair(a, b) => {
                let first = self.value(a, depth + 1)?;
                let second = self.value(b, depth + 1)?;
                Constant::ProtoPair(
                    (**a).clone(),
                    (**b).clone(),
                    Box::new(first),
                    Box::new(second),
                )
            }
            Type::Bls12_381G1Element | Type::Bls12_381G2Element | Type::Bls12_381MlResult => {
                return Err(FlatError::UnsupportedConstant(ty.to_string()));
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(constant: &Constant) -> Constant {
        let mut e = Encoder::new();
        encode_constant(&mut e, constant, &CodecConfig::default()).unwrap();
        e.filler();
        let bytes = e.finish();
        let mut d = Decoder::new(&bytes);
        let decoded = decode_constant(&mut d, &CodecConfig::default()).unwrap();
        d.filler().unwrap();
        decoded
    }

    #[test]
    fn test_type_tag_spelling() {
        assert_eq!(type_tags(&Type::Integer).unwrap(), vec![0]);
        assert_eq!(type_tags(&Type::list(Type::Bool)).unwrap(), vec![7, 5, 4]);
        assert_eq!(
            type_tags(&Type::pair(Type::Integer, Type::Data)).unwrap(),
            vec![7, 7, 6, 0, 8]
        );
        assert_eq!(
            type_tags(&Type::list(Type::pair(Type::String, Type::Unit))).unwrap(),
            vec![7, 5, 7, 7, 6, 2, 3]
        );
    }

    #[test]
    fn test_parse_rejects_leftover_and_unknown_tags() {
        let config = CodecConfig::default();
        assert!(matches!(
            parse_type_tags(&[0, 0], 0, &config),
            Err(FlatError::MalformedTypeTags { .. })
        ));
        assert!(matches!(
            parse_type_tags(&[12], 0, &config),
            Err(FlatError::UnknownConstantTag { tag: 12, .. })
        ));
        assert!(matches!(
            parse_type_tags(&[7, 6], 0, &config),
            Err(FlatError::MalformedTypeTags { .. })
        ));
        assert!(matches!(
            parse_type_tags(&[9], 0, &config),
            Err(FlatError::UnsupportedConstant(_))
        ));
        assert!(matches!(
            parse_type_tags(&[], 0, &config),
            Err(FlatError::MalformedTypeTags { .. })
        ));
    }

    #[test]
    fn test_integer_constant_bits() {
        let mut e = Encoder::new();
        let config = CodecConfig::default();
        encode_constant(&mut e, &Constant::integer(42), &config).unwrap();
        e.filler();
        // 1 0000 0, then word 84 (0101_0100), then filler
        assert_eq!(e.finish(), vec![0b1000_0001, 0b0101_0001]);
    }

    #[test]
    fn test_compound_constants_roundtrip() {
        let cases = vec![
            Constant::Unit,
            Constant::Bool(true),
            Constant::string("héllo"),
            Constant::byte_string(vec![0u8; 300]),
            Constant::ProtoList(Type::Integer, vec![]),
            Constant::ProtoList(
                Type::list(Type::Bool),
                vec![
                    Constant::ProtoList(Type::Bool, vec![Constant::Bool(false)]),
                    Constant::ProtoList(Type::Bool, vec![]),
                ],
            ),
            Constant::proto_pair(
                Constant::integer(-7),
                Constant::Data(PlutusData::constr(0, vec![PlutusData::integer(1)])),
            ),
        ];
        for constant in cases {
            assert_eq!(roundtrip(&constant), constant);
        }
    }

    #[test]
    fn test_heterogeneous_list_is_rejected() {
        let bad = Constant::ProtoList(
            Type::Integer,
            vec![Constant::integer(1), Constant::Bool(true)],
        );
        let err =
            encode_constant(&mut Encoder::new(), &bad, &CodecConfig::default()).unwrap_err();
        assert!(matches!(err, FlatError::TypeMismatch { .. }));
    }

    #[test]
    fn test_mistyped_pair_is_rejected() {
        let bad = Constant::ProtoPair(
            Type::Integer,
            Type::Integer,
            Box::new(Constant::integer(1)),
            Box::new(Constant::Unit),
        );
        let err =
            encode_constant(&mut Encoder::new(), &bad, &CodecConfig::default()).unwrap_err();
        assert!(matches!(err, FlatError::TypeMismatch { .. }));
    }

    #[test]
    fn test_bls_is_unsupported() {
        let err = encode_constant(
            &mut Encoder::new(),
            &Constant::Bls12_381G1Element(vec![0; 48]),
            &CodecConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, FlatError::UnsupportedConstant(_)));
    }

    fn nested_list_type(depth: usize) -> Type {
        let mut ty = Type::Integer;
        for _ in 0..depth {
            ty = Type::list(ty);
        }
        ty
    }

    #[test]
    fn test_type_nesting_is_bounded() {
        let config = CodecConfig::default().with_max_type_depth(8);
        assert!(type_tags_with_config(&nested_list_type(8), &config).is_ok());
        assert!(matches!(
            type_tags_with_config(&nested_list_type(9), &config),
            Err(FlatError::DepthLimit { limit: 8 })
        ));

        let spelling = type_tags(&nested_list_type(9)).unwrap();
        assert!(matches!(
            parse_type_tags(&spelling, 0, &config),
            Err(FlatError::DepthLimit { limit: 8 })
        ));
    }

    #[test]
    fn test_inner_annotation_must_match_element_type() {
        // Outer list of (list integer) holding an empty (list bool)
        let bad = Constant::ProtoList(
            Type::list(Type::Integer),
            vec![Constant::ProtoList(Type::Bool, vec![])],
        );
        let err =
            encode_constant(&mut Encoder::new(), &bad, &CodecConfig::default()).unwrap_err();
        assert!(matches!(err, FlatError::TypeMismatch { .. }));
    }
}
