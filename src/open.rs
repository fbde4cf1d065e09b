//! Open type envelope
//!
//! A length-prefixed opaque octet span used wherever the concrete type is
//! not statically known at the current point of decoding: CHOICE extension
//! alternatives, SEQUENCE extension additions, and protocol IE values whose
//! type is selected by a separately carried numeric id. The span can be
//! re-decoded later with [`OpenType::reinterpret_as`] once the concrete
//! type is known.

use bytes::Bytes;

use crate::per::{AperDecode, AperDecoder, AperEncode, AperEncoder, PerError, PerResult};

/// An opaque, length-prefixed value whose concrete type is not (yet) known
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OpenType {
    octets: Bytes,
}

impl OpenType {
    pub fn new(octets: impl Into<Bytes>) -> Self {
        Self { octets: octets.into() }
    }

    /// Encode a typed value into an opaque span (the forward direction of
    /// [`Self::reinterpret_as`])
    pub fn wrap<T: AperEncode>(value: &T) -> PerResult<Self> {
        let mut encoder = AperEncoder::new();
        value.encode_aper(&mut encoder)?;
        Ok(Self { octets: encoder.into_bytes() })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.octets
    }

    pub fn len(&self) -> usize {
        self.octets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.octets.is_empty()
    }

    /// Decode the span as a now-known concrete type. The decode must
    /// consume the whole span (sub-byte alignment padding aside).
    pub fn reinterpret_as<T: AperDecode>(&self) -> PerResult<T> {
        let mut decoder = AperDecoder::new(&self.octets);
        let value = T::decode_aper(&mut decoder)?;
        if decoder.byte_position() != self.octets.len() {
            return Err(PerError::OpenTypeMismatch {
                expected: self.octets.len(),
                consumed: decoder.byte_position(),
            });
        }
        Ok(value)
    }
}

/// A CHOICE extension alternative this implementation does not recognize:
/// the discriminant ordinal beyond the root alternatives, plus the opaque
/// payload. Carrying both makes re-encoding lossless.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownAlternative {
    pub ordinal: u64,
    pub value: OpenType,
}

impl UnknownAlternative {
    /// Encode the extension discriminant and the opaque payload
    pub fn encode(&self, encoder: &mut AperEncoder) -> PerResult<()> {
        encoder.encode_choice_extension(self.ordinal)?;
        self.value.encode_aper(encoder)
    }

    /// Decode the opaque payload after the discriminant yielded `ordinal`
    pub fn decode(decoder: &mut AperDecoder, ordinal: u64) -> PerResult<Self> {
        Ok(Self { ordinal, value: OpenType::decode_aper(decoder)? })
    }
}

impl AperEncode for OpenType {
    fn encode_aper(&self, encoder: &mut AperEncoder) -> PerResult<()> {
        encoder.encode_open_field(&self.octets)
    }
}

impl AperDecode for OpenType {
    fn decode_aper(decoder: &mut AperDecoder) -> PerResult<Self> {
        let octets = decoder.decode_open_field()?;
        Ok(Self { octets: Bytes::from(octets) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Flag(bool);

    impl AperEncode for Flag {
        fn encode_aper(&self, encoder: &mut AperEncoder) -> PerResult<()> {
            encoder.write_bit(self.0);
            Ok(())
        }
    }

    impl AperDecode for Flag {
        fn decode_aper(decoder: &mut AperDecoder) -> PerResult<Self> {
            Ok(Flag(decoder.read_bit()?))
        }
    }

    #[test]
    fn test_wrap_and_reinterpret() {
        let wrapped = OpenType::wrap(&Flag(true)).unwrap();
        assert_eq!(wrapped.len(), 1);
        assert_eq!(wrapped.reinterpret_as::<Flag>().unwrap(), Flag(true));
    }

    #[test]
    fn test_reinterpret_must_consume_span() {
        // Two octets but a Flag consumes less than one
        let open = OpenType::new(vec![0x80, 0x00]);
        let err = open.reinterpret_as::<Flag>().unwrap_err();
        assert!(matches!(err, PerError::OpenTypeMismatch { expected: 2, consumed: 1 }));
    }

    #[test]
    fn test_open_field_roundtrip() {
        let open = OpenType::new(vec![0x01, 0x02, 0x03]);
        let mut encoder = AperEncoder::new();
        open.encode_aper(&mut encoder).unwrap();
        let bytes = encoder.into_bytes();
        assert_eq!(bytes.as_ref(), &[0x03, 0x01, 0x02, 0x03]);

        let mut decoder = AperDecoder::new(&bytes);
        assert_eq!(OpenType::decode_aper(&mut decoder).unwrap(), open);
    }
}
