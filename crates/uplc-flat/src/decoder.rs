//! Bit-level reader
//!
//! Mirrors [`crate::encoder::Encoder`]. Offsets in errors are bit offsets
//! from the start of the input.

use crate::error::{FlatError, FlatResult};
use crate::zigzag::unzigzag_big;
use num_bigint::{BigInt, BigUint};

/// Reads FLAT bits from a byte slice
#[derive(Debug)]
pub struct Decoder<'a> {
    data: &'a [u8],
    /// Index of the byte holding the next bit
    pos: usize,
    /// Bits already consumed from `data[pos]` (0..8)
    used_bits: u32,
}

impl<'a> Decoder<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            used_bits: 0,
        }
    }

    /// Bit offset of the next read
    pub fn offset(&self) -> usize {
        self.pos * 8 + self.used_bits as usize
    }

    /// Bytes not yet touched by any read
    pub fn remaining_bytes(&self) -> usize {
        let partial = usize::from(self.used_bits > 0);
        self.data.len().saturating_sub(self.pos + partial)
    }

    fn remaining_bits(&self) -> usize {
        (self.data.len() * 8).saturating_sub(self.offset())
    }

    fn need(&self, bits: usize) -> FlatResult<()> {
        if self.remaining_bits() < bits {
            return Err(FlatError::OutOfBounds {
                offset: self.offset(),
                needed: bits,
                size: self.data.len(),
            });
        }
        Ok(())
    }

    pub fn bit(&mut self) -> FlatResult<bool> {
        self.need(1)?;
        let value = self.data[self.pos] & (0x80 >> self.used_bits) != 0;
        self.used_bits += 1;
        if self.used_bits == 8 {
            self.pos += 1;
            self.used_bits = 0;
        }
        Ok(value)
    }

    /// Read a `width`-bit unsigned field
    pub fn bits(&mut self, width: u32) -> FlatResult<u64> {
        if width > 64 {
            return Err(FlatError::TagOverflow {
                value: u64::from(width),
                width: 64,
            });
        }
        self.need(width as usize)?;
        let mut value = 0u64;
        for _ in 0..width {
            value = (value << 1) | u64::from(self.bit()?);
        }
        Ok(value)
    }

    fn byte(&mut self) -> FlatResult<u8> {
        if self.used_bits == 0 {
            self.need(8)?;
            let value = self.data[self.pos];
            self.pos += 1;
            return Ok(value);
        }
        Ok(self.bits(8)? as u8)
    }

    /// Variable-length unsigned integer that must fit 64 bits
    pub fn word(&mut self) -> FlatResult<u64> {
        let start = self.offset();
        let mut value = 0u64;
        let mut shift = 0u32;
        loop {
            let byte = self.byte()?;
            let group = u64::from(byte & 0x7f);
            if shift >= 64 || (group << shift) >> shift != group {
                return Err(FlatError::WordOverflow { offset: start });
            }
            value |= group << shift;
            if byte & 0x80 == 0 {
                return Ok(value);
            }
            shift += 7;
        }
    }

    /// Arbitrary-precision form of [`Decoder::word`]
    pub fn big_word(&mut self) -> FlatResult<BigUint> {
        let start = self.offset();
        let mut groups = Vec::new();
        loop {
            let byte = self.byte()?;
            groups.push(byte & 0x7f);
            if byte & 0x80 == 0 {
                break;
            }
        }
        BigUint::from_radix_le(&groups, 128).ok_or(FlatError::WordOverflow { offset: start })
    }

    pub fn integer(&mut self) -> FlatResult<BigInt> {
        Ok(unzigzag_big(&self.big_word()?))
    }

    pub fn bool(&mut self) -> FlatResult<bool> {
        self.bit()
    }

    /// Skip zero bits through the closing one, which must end a byte
    pub fn filler(&mut self) -> FlatResult<()> {
        let start = self.offset();
        while !self.bit()? {}
        if self.used_bits != 0 {
            return Err(FlatError::MisalignedFiller { offset: start });
        }
        Ok(())
    }

    /// Aligned, chunked byte array
    pub fn bytes(&mut self) -> FlatResult<Vec<u8>> {
        self.filler()?;
        let mut out = Vec::new();
        loop {
            let len = self.byte()? as usize;
            if len == 0 {
                return Ok(out);
            }
            self.need(len * 8)?;
            out.extend_from_slice(&self.data[self.pos..self.pos + len]);
            self.pos += len;
        }
    }

    pub fn utf8(&mut self) -> FlatResult<String> {
        let offset = self.offset();
        String::from_utf8(self.bytes()?).map_err(|_| FlatError::InvalidUtf8 { offset })
    }

    /// Items behind 1 bits, up to the closing 0 bit
    pub fn list_with<T, F>(&mut self, mut decode: F) -> FlatResult<Vec<T>>
    where
        F: FnMut(&mut Self) -> FlatResult<T>,
    {
        let mut items = Vec::new();
        while self.bit()? {
            items.push(decode(self)?);
        }
        Ok(items)
    }
}
