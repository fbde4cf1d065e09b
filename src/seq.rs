//! SEQUENCE support
//!
//! SEQUENCE-OF encoding with size constraints, and the extension-additions
//! block that extensible SEQUENCE types carry when a later protocol version
//! appended fields. Unknown additions are retained byte-for-byte (including
//! their presence pattern) so a decoded message re-encodes losslessly.

use crate::open::OpenType;
use crate::per::{AperDecode, AperDecoder, AperEncode, AperEncoder, PerResult};

/// Encode a SEQUENCE-OF: size-constrained count, then each element
pub fn encode_seq_of<T: AperEncode>(
    encoder: &mut AperEncoder,
    items: &[T],
    min_len: Option<usize>,
    max_len: Option<usize>,
    extensible: bool,
) -> PerResult<()> {
    match (min_len, max_len) {
        (Some(min), Some(max)) => {
            if extensible {
                if items.len() < min || items.len() > max {
                    encoder.write_bit(true);
                    encoder.encode_length_determinant(items.len())?;
                    for item in items {
                        item.encode_aper(encoder)?;
                    }
                    return Ok(());
                }
                encoder.write_bit(false);
            }
            encoder.encode_constrained_length(items.len(), min, max)?;
        }
        _ => encoder.encode_length_determinant(items.len())?,
    }
    for item in items {
        item.encode_aper(encoder)?;
    }
    Ok(())
}

/// Decode a SEQUENCE-OF
pub fn decode_seq_of<T: AperDecode>(
    decoder: &mut AperDecoder,
    min_len: Option<usize>,
    max_len: Option<usize>,
    extensible: bool,
) -> PerResult<Vec<T>> {
    let count = match (min_len, max_len) {
        (Some(min), Some(max)) => {
            if extensible && decoder.read_bit()? {
                decoder.decode_length_determinant()?
            } else {
                decoder.decode_constrained_length(min, max)?
            }
        }
        _ => decoder.decode_length_determinant()?,
    };
    let mut items = Vec::with_capacity(count.min(1024));
    for _ in 0..count {
        items.push(T::decode_aper(decoder)?);
    }
    Ok(items)
}

/// Extension additions of an extensible SEQUENCE: the block that follows
/// the root fields when the extension marker bit is set. Each addition is
/// an open field; absent (declared but not sent) additions keep a slot so
/// the presence bitmap survives a decode/encode cycle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExtensionAdditions {
    groups: Vec<Option<OpenType>>,
}

impl ExtensionAdditions {
    pub fn new(groups: Vec<Option<OpenType>>) -> Self {
        Self { groups }
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn groups(&self) -> &[Option<OpenType>] {
        &self.groups
    }

    /// Encode the block: normally-small addition count, presence bitmap,
    /// then one open field per present addition. Only call with additions.
    pub fn encode(&self, encoder: &mut AperEncoder) -> PerResult<()> {
        encoder.encode_normally_small_number((self.groups.len() - 1) as u64)?;
        for group in &self.groups {
            encoder.write_bit(group.is_some());
        }
        for group in self.groups.iter().flatten() {
            group.encode_aper(encoder)?;
        }
        Ok(())
    }

    /// Decode the block after an extension marker bit was read as set
    pub fn decode(decoder: &mut AperDecoder) -> PerResult<Self> {
        let count = decoder.decode_normally_small_number()? as usize + 1;
        let mut present = Vec::with_capacity(count);
        for _ in 0..count {
            present.push(decoder.read_bit()?);
        }
        let mut groups = Vec::with_capacity(count);
        for is_present in present {
            if is_present {
                groups.push(Some(OpenType::decode_aper(decoder)?));
            } else {
                groups.push(None);
            }
        }
        Ok(Self { groups })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::per::Constraint;

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Small(u8);

    impl Small {
        const CONSTRAINT: Constraint = Constraint::new(0, 15);
    }

    impl AperEncode for Small {
        fn encode_aper(&self, encoder: &mut AperEncoder) -> PerResult<()> {
            encoder.encode_constrained_whole_number(self.0 as i64, &Self::CONSTRAINT)
        }
    }

    impl AperDecode for Small {
        fn decode_aper(decoder: &mut AperDecoder) -> PerResult<Self> {
            Ok(Small(decoder.decode_constrained_whole_number(&Self::CONSTRAINT)? as u8))
        }
    }

    #[test]
    fn test_seq_of_roundtrip() {
        let items = vec![Small(1), Small(7), Small(15)];
        let mut encoder = AperEncoder::new();
        encode_seq_of(&mut encoder, &items, Some(1), Some(12), false).unwrap();
        let bytes = encoder.into_bytes();
        let mut decoder = AperDecoder::new(&bytes);
        let decoded: Vec<Small> = decode_seq_of(&mut decoder, Some(1), Some(12), false).unwrap();
        assert_eq!(items, decoded);
    }

    #[test]
    fn test_seq_of_enforces_size() {
        let items = vec![Small(0); 13];
        let mut encoder = AperEncoder::new();
        assert!(encode_seq_of(&mut encoder, &items, Some(1), Some(12), false).is_err());
    }

    #[test]
    fn test_extension_additions_roundtrip() {
        let additions = ExtensionAdditions::new(vec![
            Some(OpenType::new(vec![0xDE, 0xAD])),
            None,
            Some(OpenType::new(vec![0x01])),
        ]);
        let mut encoder = AperEncoder::new();
        additions.encode(&mut encoder).unwrap();
        let bytes = encoder.into_bytes();

        let mut decoder = AperDecoder::new(&bytes);
        let decoded = ExtensionAdditions::decode(&mut decoder).unwrap();
        assert_eq!(additions, decoded);

        // Re-encode reproduces the original bytes exactly
        let mut encoder = AperEncoder::new();
        decoded.encode(&mut encoder).unwrap();
        assert_eq!(encoder.into_bytes(), bytes);
    }
}
