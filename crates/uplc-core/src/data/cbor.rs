//! CBOR encoding of Plutus Data
//!
//! The encoding must agree byte for byte with the on-chain reference:
//!
//! | Variant    | Encoding |
//! |------------|----------|
//! | Integer    | major 0/1 when the value fits in an `i64`, otherwise tag 2/3 around the big-endian magnitude |
//! | ByteString | byte string; more than 64 bytes are written as indefinite 64-byte chunks |
//! | List       | empty: `0x80`; non-empty: `0x9f ... 0xff` |
//! | Map        | definite map, pairs in stored order |
//! | Constr     | alternatives 0-6: tags 121-127; 7-127: tags 1280-1400; otherwise tag 102 around `[alternative, fields]` |
//!
//! Decoding records the framing of every array under a `List` or `Constr` so
//! the original bytes can be reproduced, and keeps map pairs in wire order.
//!
//! Two choices are not recorded. The tag 102 wrapper must be a definite
//! 2-element array; an indefinite wrapper is rejected. An alternative that has
//! a compact tag but arrives under tag 102 decodes to the same value and is
//! re-encoded with its compact tag, so those bytes change on a round trip.

use super::{Framing, PlutusData};
use crate::config::{CodecConfig, MIN_STACK_RED_ZONE, STACK_GROWTH_SIZE};
use crate::error::{CoreError, CoreResult};
use num_bigint::{BigInt, Sign};
use num_traits::ToPrimitive;
use tracing::{debug, trace};

/// CBOR major types
pub mod major {
    pub const UNSIGNED: u8 = 0;
    pub const NEGATIVE: u8 = 1;
    pub const BYTES: u8 = 2;
    pub const TEXT: u8 = 3;
    pub const ARRAY: u8 = 4;
    pub const MAP: u8 = 5;
    pub const TAG: u8 = 6;
    pub const SIMPLE: u8 = 7;
}

/// CBOR tags used by Plutus Data
pub mod tags {
    pub const POSITIVE_BIGNUM: u64 = 2;
    pub const NEGATIVE_BIGNUM: u64 = 3;
    /// `[alternative, fields]` for alternatives outside the compact ranges
    pub const CONSTR_GENERAL: u64 = 102;
    /// Alternatives 0-6
    pub const CONSTR_COMPACT_BASE: u64 = 121;
    pub const CONSTR_COMPACT_LAST: u64 = 127;
    /// Alternatives 7-127
    pub const CONSTR_EXTENDED_BASE: u64 = 1280;
    pub const CONSTR_EXTENDED_LAST: u64 = 1400;
}

/// Additional-info value marking an indefinite-length item
const INDEFINITE: u8 = 31;

/// Terminator of indefinite-length items
const BREAK: u8 = 0xff;

/// Longest byte string written as a single chunk
pub const BYTES_CHUNK_SIZE: usize = 64;

/// CBOR tag for a constructor alternative, or `None` when the general form is needed
pub fn constr_tag(alternative: u64) -> Option<u64> {
    match alternative {
        0..=6 => Some(tags::CONSTR_COMPACT_BASE + alternative),
        7..=127 => Some(tags::CONSTR_EXTENDED_BASE + alternative - 7),
        _ => None,
    }
}

/// Constructor alternative carried by a compact CBOR tag
pub fn constr_alternative(tag: u64) -> Option<u64> {
    match tag {
        tags::CONSTR_COMPACT_BASE..=tags::CONSTR_COMPACT_LAST => {
            Some(tag - tags::CONSTR_COMPACT_BASE)
        }
        tags::CONSTR_EXTENDED_BASE..=tags::CONSTR_EXTENDED_LAST => {
            Some(tag - tags::CONSTR_EXTENDED_BASE + 7)
        }
        _ => None,
    }
}

impl PlutusData {
    /// Encode as CBOR
    pub fn to_cbor(&self) -> Vec<u8> {
        let mut writer = CborWriter::default();
        writer.data(self);
        writer.buf
    }

    /// Encode as hex-encoded CBOR
    pub fn to_cbor_hex(&self) -> String {
        hex::encode(self.to_cbor())
    }

    /// Decode a single CBOR item; trailing bytes are an error
    pub fn from_cbor(bytes: &[u8]) -> CoreResult<Self> {
        Self::from_cbor_with_config(bytes, &CodecConfig::default())
    }

    pub fn from_cbor_with_config(bytes: &[u8], config: &CodecConfig) -> CoreResult<Self> {
        debug!(len = bytes.len(), "decoding Plutus Data from CBOR");
        let mut reader = CborReader::new(bytes, config.max_data_depth);
        let data = reader.data(1)?;
        if reader.offset < bytes.len() {
            return Err(CoreError::TrailingBytes {
                offset: reader.offset,
                remaining: bytes.len() - reader.offset,
            });
        }
        Ok(data)
    }

    /// Decode hex-encoded CBOR
    pub fn from_cbor_hex(text: &str) -> CoreResult<Self> {
        Self::from_cbor_hex_with_config(text, &CodecConfig::default())
    }

    pub fn from_cbor_hex_with_config(text: &str, config: &CodecConfig) -> CoreResult<Self> {
        let bytes = hex::decode(text.trim())?;
        Self::from_cbor_with_config(&bytes, config)
    }
}

#[derive(Default)]
struct CborWriter {
    buf: Vec<u8>,
}

impl CborWriter {
    /// Write an item head using the shortest argument encoding
    fn head(&mut self, major: u8, arg: u64) {
        let major = major << 5;
        if arg < 24 {
            self.buf.push(major | arg as u8);
        } else if arg <= u64::from(u8::MAX) {
            self.buf.push(major | 24);
            self.buf.push(arg as u8);
        } else if arg <= u64::from(u16::MAX) {
            self.buf.push(major | 25);
            self.buf.extend_from_slice(&(arg as u16).to_be_bytes());
        } else if arg <= u64::from(u32::MAX) {
            self.buf.push(major | 26);
            self.buf.extend_from_slice(&(arg as u32).to_be_bytes());
        } else {
            self.buf.push(major | 27);
            self.buf.extend_from_slice(&arg.to_be_bytes());
        }
    }

    fn data(&mut self, data: &PlutusData) {
        stacker::maybe_grow(MIN_STACK_RED_ZONE, STACK_GROWTH_SIZE, || self.data_impl(data))
    }

    /// Implementation (called via stacker::maybe_grow)
    fn data_impl(&mut self, data: &PlutusData) {
        match data {
            PlutusData::Integer(n) => self.integer(n),
            PlutusData::ByteString(bytes) => self.bytes(bytes),
            PlutusData::List { items, framing } => self.array(items, *framing),
            PlutusData::Map(pairs) => {
                self.head(major::MAP, pairs.len() as u64);
                for (key, value) in pairs {
                    self.data(key);
                    self.data(value);
                }
            }
            PlutusData::Constr {
                tag,
                fields,
                framing,
            } => match constr_tag(*tag) {
                Some(cbor_tag) => {
                    self.head(major::TAG, cbor_tag);
                    self.array(fields, *framing);
                }
                None => {
                    self.head(major::TAG, tags::CONSTR_GENERAL);
                    self.head(major::ARRAY, 2);
                    self.head(major::UNSIGNED, *tag);
                    self.array(fields, *framing);
                }
            },
        }
    }

    fn integer(&mut self, n: &BigInt) {
        if let Some(value) = n.to_i64() {
            if value >= 0 {
                self.head(major::UNSIGNED, value as u64);
            } else {
                // -1 - value, which is the bitwise complement
                self.head(major::NEGATIVE, (!value) as u64);
            }
        } else if n.sign() == Sign::Minus {
            let magnitude = BigInt::from(-1) - n;
            self.head(major::TAG, tags::NEGATIVE_BIGNUM);
            self.bytes(&magnitude.magnitude().to_bytes_be());
        } else {
            self.head(major::TAG, tags::POSITIVE_BIGNUM);
            self.bytes(&n.magnitude().to_bytes_be());
        }
    }

    fn bytes(&mut self, bytes: &[u8]) {
        if bytes.len() <= BYTES_CHUNK_SIZE {
            self.head(major::BYTES, bytes.len() as u64);
            self.buf.extend_from_slice(bytes);
        } else {
            self.buf.push((major::BYTES << 5) | INDEFINITE);
            for chunk in bytes.chunks(BYTES_CHUNK_SIZE) {
                self.head(major::BYTES, chunk.len() as u64);
                self.buf.extend_from_slice(chunk);
            }
            self.buf.push(BREAK);
        }
    }

    fn array(&mut self, items: &[PlutusData], framing: Framing) {
        match framing {
            Framing::Definite => {
                self.head(major::ARRAY, items.len() as u64);
                for item in items {
                    self.data(item);
                }
            }
            Framing::Indefinite => {
                self.buf.push((major::ARRAY << 5) | INDEFINITE);
                for item in items {
                    self.data(item);
                }
                self.buf.push(BREAK);
            }
        }
    }
}

/// Head of a CBOR item
#[derive(Debug, Clone, Copy)]
struct Head {
    major: u8,
    /// Argument, or `None` for indefinite-length items
    arg: Option<u64>,
    /// Offset of the initial byte
    offset: usize,
}

struct CborReader<'a> {
    data: &'a [u8],
    offset: usize,
    max_depth: usize,
}

impl<'a> CborReader<'a> {
    fn new(data: &'a [u8], max_depth: usize) -> Self {
        Self {
            data,
            offset: 0,
            max_depth,
        }
    }

    fn truncated(&self, needed: usize) -> CoreError {
        CoreError::Truncated {
            offset: self.offset,
            needed,
            size: self.data.len(),
        }
    }

    fn peek_u8(&self) -> CoreResult<u8> {
        self.data
            .get(self.offset)
            .copied()
            .ok_or_else(|| self.truncated(1))
    }

    fn read_u8(&mut self) -> CoreResult<u8> {
        let byte = self.peek_u8()?;
        self.offset += 1;
        Ok(byte)
    }

    fn take(&mut self, len: usize) -> CoreResult<&'a [u8]> {
        let end = self
            .offset
            .checked_add(len)
            .filter(|end| *end <= self.data.len())
            .ok_or_else(|| self.truncated(len))?;
        let bytes = &self.data[self.offset..end];
        self.offset = end;
        Ok(bytes)
    }

    fn head(&mut self) -> CoreResult<Head> {
        let offset = self.offset;
        let initial = self.read_u8()?;
        let major = initial >> 5;
        let info = initial & 0x1f;
        let arg = match info {
            0..=23 => Some(u64::from(info)),
            24 => Some(u64::from(self.read_u8()?)),
            25 => Some(u64::from(u16::from_be_bytes(
                self.take(2)?.try_into().expect("slice length verified above"),
            ))),
            26 => Some(u64::from(u32::from_be_bytes(
                self.take(4)?.try_into().expect("slice length verified above"),
            ))),
            27 => Some(u64::from_be_bytes(
                self.take(8)?.try_into().expect("slice length verified above"),
            )),
            INDEFINITE => match major {
                major::BYTES | major::TEXT | major::ARRAY | major::MAP => None,
                _ => {
                    return Err(CoreError::MalformedCbor {
                        offset,
                        reason: format!("indefinite length is not allowed for major type {major}"),
                    })
                }
            },
            _ => {
                return Err(CoreError::MalformedCbor {
                    offset,
                    reason: format!("reserved additional info {info}"),
                })
            }
        };
        Ok(Head { major, arg, offset })
    }

    /// Argument of a head that must have a definite length
    fn definite(head: &Head) -> CoreResult<u64> {
        head.arg.ok_or_else(|| CoreError::MalformedCbor {
            offset: head.offset,
            reason: "unexpected indefinite length".into(),
        })
    }

    fn length(head: &Head, len: u64) -> CoreResult<usize> {
        usize::try_from(len).map_err(|_| CoreError::MalformedCbor {
            offset: head.offset,
            reason: format!("length {len} exceeds addressable memory"),
        })
    }

    /// Consume a break byte if one is next
    fn at_break(&mut self) -> CoreResult<bool> {
        if self.peek_u8()? == BREAK {
            self.offset += 1;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn data(&mut self, depth: usize) -> CoreResult<PlutusData> {
        if depth > self.max_depth {
            return Err(CoreError::DepthLimit {
                limit: self.max_depth,
            });
        }
        stacker::maybe_grow(MIN_STACK_RED_ZONE, STACK_GROWTH_SIZE, || self.data_impl(depth))
    }

    /// Implementation (called via stacker::maybe_grow)
    fn data_impl(&mut self, depth: usize) -> CoreResult<PlutusData> {
        let head = self.head()?;
        match head.major {
            major::UNSIGNED => Ok(PlutusData::Integer(BigInt::from(Self::definite(&head)?))),
            major::NEGATIVE => {
                let arg = Self::definite(&head)?;
                Ok(PlutusData::Integer(BigInt::from(-1) - BigInt::from(arg)))
            }
            major::BYTES => Ok(PlutusData::ByteString(self.byte_string_body(&head)?)),
            major::ARRAY => {
                let (items, framing) = self.array_body(&head, depth)?;
                Ok(PlutusData::List { items, framing })
            }
            major::MAP => Ok(PlutusData::Map(self.map_body(&head, depth)?)),
            major::TAG => self.tagged(&head, depth),
            major => Err(CoreError::UnexpectedMajor {
                expected: "Plutus Data item",
                major,
                offset: head.offset,
            }),
        }
    }

    fn byte_string_body(&mut self, head: &Head) -> CoreResult<Vec<u8>> {
        match head.arg {
            Some(len) => {
                let len = Self::length(head, len)?;
                Ok(self.take(len)?.to_vec())
            }
            None => {
                let mut bytes = Vec::new();
                while !self.at_break()? {
                    let chunk = self.head()?;
                    if chunk.major != major::BYTES || chunk.arg.is_none() {
                        return Err(CoreError::UnexpectedMajor {
                            expected: "definite byte string chunk",
                            major: chunk.major,
                            offset: chunk.offset,
                        });
                    }
                    let len = Self::length(&chunk, Self::definite(&chunk)?)?;
                    bytes.extend_from_slice(self.take(len)?);
                }
                Ok(bytes)
            }
        }
    }

    /// Items of an array whose head has been read; items live at `depth + 1`
    fn array_body(&mut self, head: &Head, depth: usize) -> CoreResult<(Vec<PlutusData>, Framing)> {
        match head.arg {
            Some(len) => {
                let len = Self::length(head, len)?;
                // Every item takes at least one byte
                let mut items = Vec::with_capacity(len.min(self.data.len() - self.offset));
                for _ in 0..len {
                    items.push(self.data(depth + 1)?);
                }
                Ok((items, Framing::Definite))
            }
            None => {
                let mut items = Vec::new();
                while !self.at_break()? {
                    items.push(self.data(depth + 1)?);
                }
                Ok((items, Framing::Indefinite))
            }
        }
    }

    /// Read an array head, then its items
    fn array(&mut self, depth: usize, context: &'static str) -> CoreResult<(Vec<PlutusData>, Framing)> {
        let head = self.head()?;
        if head.major != major::ARRAY {
            return Err(CoreError::UnexpectedMajor {
                expected: context,
                major: head.major,
                offset: head.offset,
            });
        }
        self.array_body(&head, depth)
    }

    fn map_body(&mut self, head: &Head, depth: usize) -> CoreResult<Vec<(PlutusData, PlutusData)>> {
        let mut pairs = Vec::new();
        match head.arg {
            Some(len) => {
                let len = Self::length(head, len)?;
                pairs.reserve(len.min(self.data.len() - self.offset));
                for _ in 0..len {
                    let key = self.data(depth + 1)?;
                    let value = self.data(depth + 1)?;
                    pairs.push((key, value));
                }
            }
            None => {
                while !self.at_break()? {
                    let key = self.data(depth + 1)?;
                    let value = self.data(depth + 1)?;
                    pairs.push((key, value));
                }
            }
        }
        Ok(pairs)
    }

    fn tagged(&mut self, head: &Head, depth: usize) -> CoreResult<PlutusData> {
        let tag = Self::definite(head)?;
        trace!(tag, offset = head.offset, "CBOR tag");

        if let Some(alternative) = constr_alternative(tag) {
            let (fields, framing) = self.array(depth, "constructor fields array")?;
            return Ok(PlutusData::Constr {
                tag: alternative,
                fields,
                framing,
            });
        }

        match tag {
            tags::POSITIVE_BIGNUM => {
                let magnitude = self.bignum_bytes()?;
                Ok(PlutusData::Integer(BigInt::from_bytes_be(
                    Sign::Plus,
                    &magnitude,
                )))
            }
            tags::NEGATIVE_BIGNUM => {
                let magnitude = self.bignum_bytes()?;
                Ok(PlutusData::Integer(
                    BigInt::from(-1) - BigInt::from_bytes_be(Sign::Plus, &magnitude),
                ))
            }
            tags::CONSTR_GENERAL => {
                let wrapper = self.head()?;
                if wrapper.major != major::ARRAY || wrapper.arg != Some(2) {
                    return Err(CoreError::MalformedCbor {
                        offset: wrapper.offset,
                        reason: "tag 102 must wrap a 2-element array".into(),
                    });
                }
                let alternative = self.head()?;
                if alternative.major != major::UNSIGNED {
                    return Err(CoreError::UnexpectedMajor {
                        expected: "constructor alternative",
                        major: alternative.major,
                        offset: alternative.offset,
                    });
                }
                let tag = Self::definite(&alternative)?;
                let (fields, framing) = self.array(depth, "constructor fields array")?;
                Ok(PlutusData::Constr {
                    tag,
                    fields,
                    framing,
                })
            }
            _ => Err(CoreError::UnexpectedTag {
                tag,
                offset: head.offset,
            }),
        }
    }

    fn bignum_bytes(&mut self) -> CoreResult<Vec<u8>> {
        let head = self.head()?;
        if head.major != major::BYTES {
            return Err(CoreError::UnexpectedMajor {
                expected: "bignum byte string",
                major: head.major,
                offset: head.offset,
            });
        }
        self.byte_string_body(&head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip_hex(data: &PlutusData, expected: &str) {
        assert_eq!(data.to_cbor_hex(), expected);
        assert_eq!(&PlutusData::from_cbor_hex(expected).unwrap(), data);
    }

    #[test]
    fn test_small_integers() {
        roundtrip_hex(&PlutusData::integer(7), "07");
        roundtrip_hex(&PlutusData::integer(999), "1903e7");
        roundtrip_hex(&PlutusData::integer(-1), "20");
        roundtrip_hex(&PlutusData::integer(-500), "3901f3");
    }

    #[test]
    fn test_i64_boundaries() {
        roundtrip_hex(&PlutusData::integer(i64::MAX), "1b7fffffffffffffff");
        roundtrip_hex(&PlutusData::integer(i64::MIN), "3b7fffffffffffffff");
    }

    #[test]
    fn test_bignums() {
        let two_pow_64: BigInt = BigInt::from(u64::MAX) + 1;
        roundtrip_hex(
            &PlutusData::Integer(two_pow_64.clone()),
            "c249010000000000000000",
        );
        roundtrip_hex(
            &PlutusData::Integer(-two_pow_64 - 1),
            "c349010000000000000000",
        );
        // Just above i64::MAX uses a bignum
        roundtrip_hex(
            &PlutusData::Integer(BigInt::from(i64::MAX) + 1),
            "c2488000000000000000",
        );
    }

    #[test]
    fn test_wide_major_integers_are_accepted() {
        let data = PlutusData::from_cbor_hex("1bffffffffffffffff").unwrap();
        assert_eq!(data, PlutusData::Integer(BigInt::from(u64::MAX)));
        let data = PlutusData::from_cbor_hex("3bffffffffffffffff").unwrap();
        assert_eq!(data, PlutusData::Integer(BigInt::from(-1) - BigInt::from(u64::MAX)));
    }

    #[test]
    fn test_lists() {
        roundtrip_hex(&PlutusData::list(vec![]), "80");
        roundtrip_hex(
            &PlutusData::list(vec![PlutusData::integer(123), PlutusData::integer(456)]),
            "9f187b1901c8ff",
        );
    }

    #[test]
    fn test_definite_list_framing_is_preserved() {
        let data = PlutusData::from_cbor_hex("820102").unwrap();
        assert_eq!(
            data,
            PlutusData::List {
                items: vec![PlutusData::integer(1), PlutusData::integer(2)],
                framing: Framing::Definite,
            }
        );
        assert_eq!(data.to_cbor_hex(), "820102");
    }

    #[test]
    fn test_indefinite_empty_list_is_preserved() {
        let data = PlutusData::from_cbor_hex("9fff").unwrap();
        assert_eq!(data.to_cbor_hex(), "9fff");
    }

    #[test]
    fn test_constr_compact_tags() {
        roundtrip_hex(
            &PlutusData::constr(1, vec![PlutusData::bytes(vec![0xab, 0xcd])]),
            "d87a9f42abcdff",
        );
        roundtrip_hex(&PlutusData::constr(0, vec![]), "d87980");
        roundtrip_hex(&PlutusData::constr(6, vec![]), "d87f80");
        roundtrip_hex(&PlutusData::constr(7, vec![]), "d9050080");
        roundtrip_hex(&PlutusData::constr(127, vec![]), "d9057880");
    }

    #[test]
    fn test_constr_general_form() {
        roundtrip_hex(
            &PlutusData::constr(999, vec![PlutusData::integer(6), PlutusData::integer(7)]),
            "d866821903e79f0607ff",
        );
        roundtrip_hex(&PlutusData::constr(128, vec![]), "d86682188080");
    }

    #[test]
    fn test_general_form_is_canonicalised() {
        let data = PlutusData::from_cbor_hex("d866820080").unwrap();
        assert_eq!(data, PlutusData::constr(0, vec![]));
        assert_eq!(data.to_cbor_hex(), "d87980");

        let err = PlutusData::from_cbor_hex("d8669f0080ff").unwrap_err();
        assert!(matches!(err, CoreError::MalformedCbor { offset: 2, .. }));
    }

    #[test]
    fn test_constr_definite_fields_are_preserved() {
        let data = PlutusData::from_cbor_hex("d8798101").unwrap();
        assert_eq!(
            data,
            PlutusData::Constr {
                tag: 0,
                fields: vec![PlutusData::integer(1)],
                framing: Framing::Definite,
            }
        );
        assert_eq!(data.to_cbor_hex(), "d8798101");
    }

    #[test]
    fn test_map_keeps_wire_order() {
        roundtrip_hex(
            &PlutusData::map(vec![(PlutusData::integer(1), PlutusData::integer(2))]),
            "a10102",
        );
        let data = PlutusData::from_cbor_hex("a203040102").unwrap();
        match data {
            PlutusData::Map(pairs) => {
                let keys: Vec<_> = pairs.iter().map(|(k, _)| k.clone()).collect();
                assert_eq!(keys, vec![PlutusData::integer(3), PlutusData::integer(1)]);
            }
            other => panic!("expected map, got {other:?}"),
        }
    }

    #[test]
    fn test_map_with_structured_keys() {
        let data = PlutusData::map(vec![(
            PlutusData::list(vec![PlutusData::integer(1)]),
            PlutusData::bytes(vec![]),
        )]);
        roundtrip_hex(&data, "a19f01ff40");
    }

    #[test]
    fn test_long_bytes_are_chunked() {
        let bytes = vec![0x11; 100];
        let encoded = PlutusData::bytes(bytes.clone()).to_cbor();
        assert_eq!(encoded[0], 0x5f);
        assert_eq!(&encoded[1..3], &[0x58, 0x40]);
        assert_eq!(&encoded[67..69], &[0x58, 0x24]);
        assert_eq!(*encoded.last().unwrap(), 0xff);
        assert_eq!(encoded.len(), 1 + 2 + 64 + 2 + 36 + 1);
        assert_eq!(
            PlutusData::from_cbor(&encoded).unwrap(),
            PlutusData::ByteString(bytes)
        );
    }

    #[test]
    fn test_exactly_64_bytes_is_one_chunk() {
        let encoded = PlutusData::bytes(vec![0; 64]).to_cbor();
        assert_eq!(&encoded[..2], &[0x58, 0x40]);
        assert_eq!(encoded.len(), 66);
    }

    #[test]
    fn test_truncated_input() {
        for hex in ["", "19", "1903", "9f01", "d87a9f42ab", "a101"] {
            let err = PlutusData::from_cbor_hex(hex).unwrap_err();
            assert!(
                matches!(err, CoreError::Truncated { .. }),
                "{hex}: unexpected {err:?}"
            );
        }
    }

    #[test]
    fn test_unknown_tag() {
        let err = PlutusData::from_cbor_hex("d9040080").unwrap_err();
        assert!(matches!(
            err,
            CoreError::UnexpectedTag {
                tag: 1024,
                offset: 0
            }
        ));
    }

    #[test]
    fn test_constr_requires_array() {
        let err = PlutusData::from_cbor_hex("d87901").unwrap_err();
        assert!(matches!(
            err,
            CoreError::UnexpectedMajor {
                major: 0,
                offset: 2,
                ..
            }
        ));
    }

    #[test]
    fn test_general_constr_requires_pair() {
        let err = PlutusData::from_cbor_hex("d866811903e7").unwrap_err();
        assert!(matches!(err, CoreError::MalformedCbor { offset: 2, .. }));
    }

    #[test]
    fn test_text_is_rejected() {
        let err = PlutusData::from_cbor_hex("6161").unwrap_err();
        assert!(matches!(err, CoreError::UnexpectedMajor { major: 3, .. }));
    }

    #[test]
    fn test_stray_break_is_rejected() {
        let err = PlutusData::from_cbor_hex("ff").unwrap_err();
        assert!(matches!(err, CoreError::MalformedCbor { .. }));
    }

    #[test]
    fn test_trailing_bytes() {
        let err = PlutusData::from_cbor_hex("0102").unwrap_err();
        assert!(matches!(
            err,
            CoreError::TrailingBytes {
                offset: 1,
                remaining: 1
            }
        ));
    }

    #[test]
    fn test_depth_limit() {
        let mut deep = vec![0x81; 300];
        deep.push(0x00);
        let err = PlutusData::from_cbor(&deep).unwrap_err();
        assert!(matches!(err, CoreError::DepthLimit { limit: 256 }));

        let mut shallow = vec![0x81; 100];
        shallow.push(0x00);
        assert!(PlutusData::from_cbor(&shallow).is_ok());
    }

    #[test]
    fn test_configured_depth_limit() {
        let config = CodecConfig::default().with_max_data_depth(2);
        assert!(PlutusData::from_cbor_with_config(&[0x81, 0x00], &config).is_ok());
        let err = PlutusData::from_cbor_with_config(&[0x81, 0x81, 0x00], &config).unwrap_err();
        assert!(matches!(err, CoreError::DepthLimit { limit: 2 }));
    }

    #[test]
    fn test_constr_tag_mapping() {
        for alternative in 0..200 {
            match constr_tag(alternative) {
                Some(tag) => assert_eq!(constr_alternative(tag), Some(alternative)),
                None => assert!(alternative >= 128),
            }
        }
        assert_eq!(constr_alternative(102), None);
    }
}
