//! FLAT encoding of each binder form
//!
//! | Form            | Variable         | Lambda parameter |
//! |-----------------|------------------|------------------|
//! | `Name`          | text, unique     | text, unique     |
//! | `NamedDeBruijn` | text, index      | text, index      |
//! | `DeBruijn`      | index            | nothing          |
//!
//! A bare de Bruijn parameter carries no bits; decoding gives it index 0.

use crate::decoder::Decoder;
use crate::encoder::Encoder;
use crate::error::{FlatError, FlatResult};
use uplc_core::{Binder, DeBruijn, Name, NamedDeBruijn, Unique};

/// A binder form with a FLAT encoding
pub trait FlatBinder: Binder + Sized {
    fn encode_var(&self, encoder: &mut Encoder) -> FlatResult<()>;

    fn decode_var(decoder: &mut Decoder<'_>) -> FlatResult<Self>;

    fn encode_parameter(&self, encoder: &mut Encoder) -> FlatResult<()> {
        self.encode_var(encoder)
    }

    fn decode_parameter(decoder: &mut Decoder<'_>) -> FlatResult<Self> {
        Self::decode_var(decoder)
    }
}

fn decode_index(decoder: &mut Decoder<'_>) -> FlatResult<DeBruijn> {
    let offset = decoder.offset();
    let value = decoder.word()?;
    usize::try_from(value)
        .map(DeBruijn)
        .map_err(|_| FlatError::IndexOverflow { value, offset })
}

impl FlatBinder for Name {
    fn encode_var(&self, encoder: &mut Encoder) -> FlatResult<()> {
        encoder.utf8(&self.text);
        encoder.word(self.unique.to_int());
        Ok(())
    }

    fn decode_var(decoder: &mut Decoder<'_>) -> FlatResult<Self> {
        let text = decoder.utf8()?;
        let unique = Unique(decoder.word()?);
        Ok(Name { text, unique })
    }
}

impl FlatBinder for NamedDeBruijn {
    fn encode_var(&self, encoder: &mut Encoder) -> FlatResult<()> {
        encoder.utf8(&self.text);
        encoder.word(self.index.to_int() as u64);
        Ok(())
    }

    fn decode_var(decoder: &mut Decoder<'_>) -> FlatResult<Self> {
        let text = decoder.utf8()?;
        let index = decode_index(decoder)?;
        Ok(NamedDeBruijn { text, index })
    }
}

impl FlatBinder for DeBruijn {
    fn encode_var(&self, encoder: &mut Encoder) -> FlatResult<()> {
        encoder.word(self.to_int() as u64);
        Ok(())
    }

    fn decode_var(decoder: &mut Decoder<'_>) -> FlatResult<Self> {
        decode_index(decoder)
    }

    fn encode_parameter(&self, _encoder: &mut Encoder) -> FlatResult<()> {
        Ok(())
    }

    fn decode_parameter(_decoder: &mut Decoder<'_>) -> FlatResult<Self> {
        Ok(DeBruijn::BINDER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode_parameter<B: FlatBinder>(binder: &B) -> Vec<u8> {
        let mut e = Encoder::new();
        binder.encode_parameter(&mut e).unwrap();
        e.finish()
    }

    #[test]
    fn test_debruijn_parameter_is_empty() {
        assert!(encode_parameter(&DeBruijn(5)).is_empty());
        let mut d = Decoder::new(&[]);
        assert_eq!(DeBruijn::decode_parameter(&mut d).unwrap(), DeBruijn(0));
    }

    #[test]
    fn test_debruijn_var_is_a_word() {
        let mut e = Encoder::new();
        DeBruijn(130).encode_var(&mut e).unwrap();
        assert_eq!(e.finish(), vec![0x82, 0x01]);
    }

    #[test]
    fn test_name_parameter_matches_var() {
        let name = Name::new("x", 300);
        let mut e = Encoder::new();
        name.encode_var(&mut e).unwrap();
        let var = e.finish();
        assert_eq!(encode_parameter(&name), var);
        // Filler, one-byte chunk "x", terminator, word 300
        assert_eq!(var, vec![0x01, 0x01, b'x', 0x00, 0xac, 0x02]);

        let decoded = Name::decode_parameter(&mut Decoder::new(&var)).unwrap();
        assert_eq!(decoded, name);
    }

    #[test]
    fn test_named_debruijn_keeps_text_and_index() {
        let binder = NamedDeBruijn::new("acc", 3);
        let bytes = encode_parameter(&binder);
        let decoded = NamedDeBruijn::decode_parameter(&mut Decoder::new(&bytes)).unwrap();
        assert_eq!(decoded, binder);
    }
}
