//! Bit-level writer
//!
//! Bits are packed most significant first. The writer keeps the partially
//! filled byte apart from the finished buffer, so any number of independent
//! encoders can run at once.

use crate::error::{FlatError, FlatResult};
use crate::zigzag::zigzag_big;
use num_bigint::{BigInt, BigUint};

/// Largest chunk of a byte array
pub const MAX_CHUNK_LEN: usize = 255;

/// Accumulates FLAT bits into bytes
#[derive(Debug, Default)]
pub struct Encoder {
    buffer: Vec<u8>,
    current: u8,
    /// Bits already used in `current` (0..8)
    used_bits: u32,
}

impl Encoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of bits written so far
    pub fn bit_len(&self) -> usize {
        self.buffer.len() * 8 + self.used_bits as usize
    }

    pub fn bit(&mut self, value: bool) {
        if value {
            self.current |= 0x80 >> self.used_bits;
        }
        self.used_bits += 1;
        if self.used_bits == 8 {
            self.buffer.push(self.current);
            self.current = 0;
            self.used_bits = 0;
        }
    }

    /// Write the low `width` bits of `value`, failing if it has more
    pub fn bits(&mut self, width: u32, value: u64) -> FlatResult<()> {
        if width > 64 || (width < 64 && value >> width != 0) {
            return Err(FlatError::TagOverflow { value, width });
        }
        for shift in (0..width).rev() {
            self.bit((value >> shift) & 1 == 1);
        }
        Ok(())
    }

    fn byte(&mut self, value: u8) {
        if self.used_bits == 0 {
            self.buffer.push(value);
        } else {
            for shift in (0..8).rev() {
                self.bit((value >> shift) & 1 == 1);
            }
        }
    }

    /// Variable-length unsigned integer: 7-bit groups, low group first,
    /// high bit set on every group but the last
    pub fn word(&mut self, mut value: u64) {
        loop {
            let group = (value & 0x7f) as u8;
            value >>= 7;
            if value == 0 {
                self.byte(group);
                return;
            }
            self.byte(group | 0x80);
        }
    }

    /// Arbitrary-precision form of [`Encoder::word`]
    pub fn big_word(&mut self, value: &BigUint) {
        let mut groups = value.to_radix_le(128);
        if groups.is_empty() {
            groups.push(0);
        }
        let last = groups.len().saturating_sub(1);
        for (i, group) in groups.into_iter().enumerate() {
            if i < last {
                self.byte(group | 0x80);
            } else {
                self.byte(group);
            }
        }
    }

    /// Signed integer as a zigzagged [`Encoder::big_word`]
    pub fn integer(&mut self, value: &BigInt) {
        self.big_word(&zigzag_big(value));
    }

    pub fn bool(&mut self, value: bool) {
        self.bit(value);
    }

    /// Pad to the byte boundary with zeros ending in a one
    ///
    /// An already aligned writer emits a whole `0x01` byte.
    pub fn filler(&mut self) {
        self.current |= 1;
        self.buffer.push(self.current);
        self.current = 0;
        self.used_bits = 0;
    }

    /// Aligned byte array in length-prefixed chunks, ending with an empty chunk
    pub fn bytes(&mut self, bytes: &[u8]) {
        self.filler();
        for chunk in bytes.chunks(MAX_CHUNK_LEN) {
            self.buffer.push(chunk.len() as u8);
            self.buffer.extend_from_slice(chunk);
        }
        self.buffer.push(0);
    }

    pub fn utf8(&mut self, text: &str) {
        self.bytes(text.as_bytes());
    }

    /// Each item behind a 1 bit, then a closing 0 bit
    pub fn list_with<T, F>(&mut self, items: &[T], mut encode: F) -> FlatResult<()>
    where
        F: FnMut(&mut Self, &T) -> FlatResult<()>,
    {
        for item in items {
            self.bit(true);
            encode(self, item)?;
        }
        self.bit(false);
        Ok(())
    }

    /// Finished bytes; a partial final byte is zero-padded
    pub fn finish(mut self) -> Vec<u8> {
        if self.used_bits > 0 {
            self.buffer.push(self.current);
        }
        self.buffer
    }
}
