//! PER (Packed Encoding Rules) encoding/decoding
//!
//! Implementation of the Aligned PER (APER) profile used by the NGAP
//! control-plane interface, per ITU-T X.691.

use bitvec::prelude::*;
use bytes::Bytes;
use thiserror::Error;

/// PER codec errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PerError {
    #[error("out of bits at bit {offset}: need {needed}, have {available}")]
    OutOfBits {
        needed: usize,
        available: usize,
        offset: usize,
    },
    #[error("value {value} outside range {min}..={max}")]
    ValueOutOfRange { value: i64, min: i64, max: i64 },
    #[error("size {size} violates constraint {min}..={max}")]
    SizeConstraintViolation { size: usize, min: usize, max: usize },
    #[error("invalid choice index: {index} (max {max})")]
    InvalidChoiceIndex { index: usize, max: usize },
    #[error("length {length} exceeds the supported maximum")]
    LengthTooLarge { length: usize },
    #[error("open type of {expected} octets, reinterpretation consumed {consumed}")]
    OpenTypeMismatch { expected: usize, consumed: usize },
    #[error("{remaining_bits} trailing bits after byte {offset}")]
    TrailingData { offset: usize, remaining_bits: usize },
}

pub type PerResult<T> = Result<T, PerError>;

/// Value constraint for constrained whole numbers and enumerations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Constraint {
    pub min: i64,
    pub max: i64,
    pub extensible: bool,
}

impl Constraint {
    pub const fn new(min: i64, max: i64) -> Self {
        Self { min, max, extensible: false }
    }

    pub const fn extensible(min: i64, max: i64) -> Self {
        Self { min, max, extensible: true }
    }

    /// Number of values in the root range
    pub fn range(&self) -> u128 {
        (self.max as i128 - self.min as i128 + 1) as u128
    }

    /// Bits needed for a minimal bit-field over the root range
    pub fn bits_needed(&self) -> usize {
        let range = self.range();
        if range <= 1 {
            0
        } else {
            128 - (range - 1).leading_zeros() as usize
        }
    }

    pub fn contains(&self, value: i64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Minimal number of octets holding `value` (at least one)
fn octets_needed(value: u128) -> usize {
    let bits = 128 - value.leading_zeros() as usize;
    core::cmp::max(bits.div_ceil(8), 1)
}

/// Decoded ENUMERATED value: either a root index or the ordinal of an
/// extension value added by a later protocol version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumValue {
    Root(i64),
    Extended(u64),
}

/// Decoded CHOICE discriminant: a root alternative index or the ordinal of
/// an extension alternative this implementation does not know.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoiceIndex {
    Root(usize),
    Extension(u64),
}

/// APER encoder over a growable bit buffer
pub struct AperEncoder {
    buffer: BitVec<u8, Msb0>,
}

impl AperEncoder {
    pub fn new() -> Self {
        Self { buffer: BitVec::new() }
    }

    pub fn with_capacity(bits: usize) -> Self {
        Self { buffer: BitVec::with_capacity(bits) }
    }

    /// Final encoded bytes, zero-padded to a byte boundary
    pub fn into_bytes(mut self) -> Bytes {
        self.align();
        Bytes::from(self.buffer.into_vec())
    }

    pub fn bit_position(&self) -> usize {
        self.buffer.len()
    }

    /// Pad with zero bits up to the next octet boundary
    pub fn align(&mut self) {
        let rem = self.buffer.len() % 8;
        if rem != 0 {
            for _ in 0..(8 - rem) {
                self.buffer.push(false);
            }
        }
    }

    pub fn write_bit(&mut self, bit: bool) {
        self.buffer.push(bit);
    }

    /// Write the low `num_bits` of `value`, most significant bit first
    pub fn write_bits(&mut self, value: u64, num_bits: usize) -> PerResult<()> {
        debug_assert!(num_bits <= 64);
        if num_bits < 64 && (value >> num_bits) != 0 {
            return Err(PerError::ValueOutOfRange {
                value: value as i64,
                min: 0,
                max: ((1u128 << num_bits) - 1) as i64,
            });
        }
        for i in (0..num_bits).rev() {
            self.buffer.push((value >> i) & 1 == 1);
        }
        Ok(())
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        for byte in bytes {
            for i in (0..8).rev() {
                self.buffer.push((byte >> i) & 1 == 1);
            }
        }
    }

    pub fn write_bitslice(&mut self, bits: &BitSlice<u8, Msb0>) {
        for bit in bits {
            self.buffer.push(*bit);
        }
    }

    /// Encode a constrained whole number (X.691 10.5 / 13.2)
    pub fn encode_constrained_whole_number(
        &mut self,
        value: i64,
        constraint: &Constraint,
    ) -> PerResult<()> {
        if !constraint.contains(value) {
            return Err(PerError::ValueOutOfRange {
                value,
                min: constraint.min,
                max: constraint.max,
            });
        }

        let range = constraint.range();
        let offset = (value as i128 - constraint.min as i128) as u128;

        if range == 1 {
            // Single-valued range carries no bits
        } else if range <= 255 {
            self.write_bits(offset as u64, constraint.bits_needed())?;
        } else if range == 256 {
            self.align();
            self.write_bits(offset as u64, 8)?;
        } else if range <= 65536 {
            self.align();
            self.write_bits(offset as u64, 16)?;
        } else {
            // Indefinite-length case: minimal-octet count field, then the
            // offset in that many aligned octets (X.691 13.2.6)
            let max_octets = octets_needed(range - 1);
            let count = octets_needed(offset);
            let count_constraint = Constraint::new(1, max_octets as i64);
            self.write_bits((count - 1) as u64, count_constraint.bits_needed())?;
            self.align();
            for i in (0..count).rev() {
                self.write_bits(((offset >> (8 * i)) & 0xFF) as u64, 8)?;
            }
        }
        Ok(())
    }

    /// Encode an unconstrained whole number (X.691 12.2.6): aligned length
    /// determinant, then a minimal two's-complement octet run
    pub fn encode_unconstrained_whole_number(&mut self, value: i64) -> PerResult<()> {
        let mut bytes = value.to_be_bytes().to_vec();
        // Strip redundant sign-extension octets
        while bytes.len() > 1 {
            let drop = (bytes[0] == 0x00 && bytes[1] & 0x80 == 0)
                || (bytes[0] == 0xFF && bytes[1] & 0x80 != 0);
            if !drop {
                break;
            }
            bytes.remove(0);
        }
        self.encode_length_determinant(bytes.len())?;
        self.write_bytes(&bytes);
        Ok(())
    }

    /// Encode a normally small non-negative whole number (X.691 11.6)
    pub fn encode_normally_small_number(&mut self, value: u64) -> PerResult<()> {
        if value <= 63 {
            self.write_bit(false);
            self.write_bits(value, 6)?;
        } else {
            self.write_bit(true);
            let count = octets_needed(value as u128);
            self.encode_length_determinant(count)?;
            for i in (0..count).rev() {
                self.write_bits((value >> (8 * i)) & 0xFF, 8)?;
            }
        }
        Ok(())
    }

    /// Encode a general length determinant (X.691 11.9): one octet up to
    /// 127, two octets up to 16383, 16K-unit fragment headers beyond
    pub fn encode_length_determinant(&mut self, length: usize) -> PerResult<()> {
        if length > 65535 {
            return Err(PerError::LengthTooLarge { length });
        }
        self.align();
        if length <= 127 {
            self.write_bits(length as u64, 8)?;
        } else if length <= 16383 {
            self.write_bits(0x8000 | length as u64, 16)?;
        } else {
            let units = length >> 14;
            self.write_bits(0xC0 | units as u64, 8)?;
            let rest = length & 0x3FFF;
            if rest <= 127 {
                self.write_bits(rest as u64, 8)?;
            } else {
                self.write_bits(0x8000 | rest as u64, 16)?;
            }
        }
        Ok(())
    }

    /// Encode a size-constrained length
    pub fn encode_constrained_length(
        &mut self,
        length: usize,
        min: usize,
        max: usize,
    ) -> PerResult<()> {
        if length < min || length > max {
            return Err(PerError::SizeConstraintViolation { size: length, min, max });
        }
        let constraint = Constraint::new(min as i64, max as i64);
        self.encode_constrained_whole_number(length as i64, &constraint)
    }

    /// Encode an ENUMERATED value (X.691 14)
    pub fn encode_enumerated(&mut self, value: EnumValue, constraint: &Constraint) -> PerResult<()> {
        match value {
            EnumValue::Root(v) => {
                if constraint.extensible {
                    self.write_bit(false);
                }
                self.encode_constrained_whole_number(v, constraint)
            }
            EnumValue::Extended(ordinal) => {
                if !constraint.extensible {
                    return Err(PerError::ValueOutOfRange {
                        value: ordinal as i64,
                        min: constraint.min,
                        max: constraint.max,
                    });
                }
                self.write_bit(true);
                self.encode_normally_small_number(ordinal)
            }
        }
    }

    /// Encode a CHOICE discriminant for a root alternative (X.691 23)
    pub fn encode_choice_index(
        &mut self,
        index: usize,
        num_alternatives: usize,
        extensible: bool,
    ) -> PerResult<()> {
        if index >= num_alternatives {
            return Err(PerError::InvalidChoiceIndex { index, max: num_alternatives - 1 });
        }
        if extensible {
            self.write_bit(false);
        }
        let constraint = Constraint::new(0, (num_alternatives - 1) as i64);
        self.encode_constrained_whole_number(index as i64, &constraint)
    }

    /// Encode a CHOICE discriminant selecting an extension alternative.
    /// The alternative's payload follows as a separate open field.
    pub fn encode_choice_extension(&mut self, ordinal: u64) -> PerResult<()> {
        self.write_bit(true);
        self.encode_normally_small_number(ordinal)
    }

    /// Encode an OCTET STRING (X.691 17)
    pub fn encode_octet_string(
        &mut self,
        data: &[u8],
        min_len: Option<usize>,
        max_len: Option<usize>,
        extensible: bool,
    ) -> PerResult<()> {
        let len = data.len();
        match (min_len, max_len) {
            (Some(min), Some(max)) => {
                if extensible {
                    if len < min || len > max {
                        self.write_bit(true);
                        self.encode_length_determinant(len)?;
                        self.write_bytes(data);
                        return Ok(());
                    }
                    self.write_bit(false);
                }
                if min == max {
                    if len != min {
                        return Err(PerError::SizeConstraintViolation { size: len, min, max });
                    }
                    if min > 2 {
                        self.align();
                    }
                } else {
                    self.encode_constrained_length(len, min, max)?;
                    if max > 2 {
                        self.align();
                    }
                }
                self.write_bytes(data);
            }
            _ => {
                self.encode_length_determinant(len)?;
                self.write_bytes(data);
            }
        }
        Ok(())
    }

    /// Encode a BIT STRING (X.691 16)
    pub fn encode_bit_string(
        &mut self,
        bits: &BitSlice<u8, Msb0>,
        min_len: Option<usize>,
        max_len: Option<usize>,
        extensible: bool,
    ) -> PerResult<()> {
        let len = bits.len();
        match (min_len, max_len) {
            (Some(min), Some(max)) => {
                if extensible {
                    if len < min || len > max {
                        self.write_bit(true);
                        self.encode_length_determinant(len)?;
                        self.write_bitslice(bits);
                        return Ok(());
                    }
                    self.write_bit(false);
                }
                if min == max {
                    if len != min {
                        return Err(PerError::SizeConstraintViolation { size: len, min, max });
                    }
                    if min > 16 {
                        self.align();
                    }
                } else {
                    self.encode_constrained_length(len, min, max)?;
                    if max > 16 {
                        self.align();
                    }
                }
                self.write_bitslice(bits);
            }
            _ => {
                self.encode_length_determinant(len)?;
                self.write_bitslice(bits);
            }
        }
        Ok(())
    }

    /// Encode a PrintableString (X.691 30): one octet per character, no
    /// character-set validation, contents aligned like an octet string
    pub fn encode_printable_string(
        &mut self,
        chars: &[u8],
        min_len: Option<usize>,
        max_len: Option<usize>,
        extensible: bool,
    ) -> PerResult<()> {
        self.encode_octet_string(chars, min_len, max_len, extensible)
    }

    /// Encode an already-encoded value as an open field: aligned length
    /// determinant followed by the raw octets
    pub fn encode_open_field(&mut self, octets: &[u8]) -> PerResult<()> {
        self.encode_length_determinant(octets.len())?;
        self.write_bytes(octets);
        Ok(())
    }
}

impl Default for AperEncoder {
    fn default() -> Self {
        Self::new()
    }
}

/// APER decoder over a borrowed byte buffer
pub struct AperDecoder<'a> {
    data: &'a BitSlice<u8, Msb0>,
    position: usize,
}

impl<'a> AperDecoder<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data: BitSlice::from_slice(data), position: 0 }
    }

    pub fn bit_position(&self) -> usize {
        self.position
    }

    /// Byte offset of the next unread bit, rounded up
    pub fn byte_position(&self) -> usize {
        self.position.div_ceil(8)
    }

    pub fn remaining_bits(&self) -> usize {
        self.data.len().saturating_sub(self.position)
    }

    pub fn align(&mut self) {
        let rem = self.position % 8;
        if rem != 0 {
            self.position += 8 - rem;
        }
    }

    fn out_of_bits(&self, needed: usize) -> PerError {
        PerError::OutOfBits {
            needed,
            available: self.remaining_bits(),
            offset: self.position,
        }
    }

    pub fn read_bit(&mut self) -> PerResult<bool> {
        if self.position >= self.data.len() {
            return Err(self.out_of_bits(1));
        }
        let bit = self.data[self.position];
        self.position += 1;
        Ok(bit)
    }

    /// Read `num_bits` as a value, most significant bit first
    pub fn read_bits(&mut self, num_bits: usize) -> PerResult<u64> {
        debug_assert!(num_bits <= 64);
        if self.position + num_bits > self.data.len() {
            return Err(self.out_of_bits(num_bits));
        }
        let mut value = 0u64;
        for _ in 0..num_bits {
            value = (value << 1) | (self.data[self.position] as u64);
            self.position += 1;
        }
        Ok(value)
    }

    pub fn read_bytes(&mut self, num_bytes: usize) -> PerResult<Vec<u8>> {
        if self.position + num_bytes * 8 > self.data.len() {
            return Err(self.out_of_bits(num_bytes * 8));
        }
        let mut bytes = Vec::with_capacity(num_bytes);
        for _ in 0..num_bytes {
            bytes.push(self.read_bits(8)? as u8);
        }
        Ok(bytes)
    }

    /// Decode a constrained whole number (X.691 10.5 / 13.2)
    pub fn decode_constrained_whole_number(&mut self, constraint: &Constraint) -> PerResult<i64> {
        let range = constraint.range();

        let offset = if range == 1 {
            return Ok(constraint.min);
        } else if range <= 255 {
            self.read_bits(constraint.bits_needed())? as u128
        } else if range == 256 {
            self.align();
            self.read_bits(8)? as u128
        } else if range <= 65536 {
            self.align();
            self.read_bits(16)? as u128
        } else {
            let max_octets = octets_needed(range - 1);
            let count_constraint = Constraint::new(1, max_octets as i64);
            let count = self.read_bits(count_constraint.bits_needed())? as usize + 1;
            self.align();
            let mut offset = 0u128;
            for _ in 0..count {
                offset = (offset << 8) | self.read_bits(8)? as u128;
            }
            offset
        };

        let value = constraint.min as i128 + offset as i128;
        if value > constraint.max as i128 {
            return Err(PerError::ValueOutOfRange {
                value: value as i64,
                min: constraint.min,
                max: constraint.max,
            });
        }
        Ok(value as i64)
    }

    /// Decode an unconstrained whole number (X.691 12.2.6)
    pub fn decode_unconstrained_whole_number(&mut self) -> PerResult<i64> {
        let len = self.decode_length_determinant()?;
        let bytes = self.read_bytes(len)?;
        if bytes.is_empty() {
            return Ok(0);
        }
        let mut value: i64 = if bytes[0] & 0x80 != 0 { -1 } else { 0 };
        for byte in bytes {
            value = (value << 8) | byte as i64;
        }
        Ok(value)
    }

    /// Decode a normally small non-negative whole number (X.691 11.6)
    pub fn decode_normally_small_number(&mut self) -> PerResult<u64> {
        if !self.read_bit()? {
            return self.read_bits(6);
        }
        let count = self.decode_length_determinant()?;
        if count > 8 {
            return Err(PerError::LengthTooLarge { length: count });
        }
        let mut value = 0u64;
        for _ in 0..count {
            value = (value << 8) | self.read_bits(8)?;
        }
        Ok(value)
    }

    /// Decode a general length determinant (X.691 11.9)
    pub fn decode_length_determinant(&mut self) -> PerResult<usize> {
        self.align();
        let mut total = 0usize;
        loop {
            let first = self.read_bits(8)? as u8;
            if first & 0x80 == 0 {
                return Ok(total + first as usize);
            }
            if first & 0x40 == 0 {
                let second = self.read_bits(8)? as u8;
                return Ok(total + ((((first & 0x3F) as usize) << 8) | second as usize));
            }
            let units = (first & 0x3F) as usize;
            if units == 0 || units > 4 {
                return Err(PerError::LengthTooLarge { length: units << 14 });
            }
            total += units << 14;
            if total > 65535 {
                return Err(PerError::LengthTooLarge { length: total });
            }
        }
    }

    /// Decode a size-constrained length
    pub fn decode_constrained_length(&mut self, min: usize, max: usize) -> PerResult<usize> {
        let constraint = Constraint::new(min as i64, max as i64);
        let len = self.decode_constrained_whole_number(&constraint)? as usize;
        if len < min || len > max {
            return Err(PerError::SizeConstraintViolation { size: len, min, max });
        }
        Ok(len)
    }

    /// Decode an ENUMERATED value (X.691 14). Extension values decode into
    /// their ordinal so the caller can carry them as a placeholder.
    pub fn decode_enumerated(&mut self, constraint: &Constraint) -> PerResult<EnumValue> {
        if constraint.extensible && self.read_bit()? {
            return Ok(EnumValue::Extended(self.decode_normally_small_number()?));
        }
        Ok(EnumValue::Root(self.decode_constrained_whole_number(constraint)?))
    }

    /// Decode a CHOICE discriminant (X.691 23)
    pub fn decode_choice_index(
        &mut self,
        num_alternatives: usize,
        extensible: bool,
    ) -> PerResult<ChoiceIndex> {
        if extensible && self.read_bit()? {
            return Ok(ChoiceIndex::Extension(self.decode_normally_small_number()?));
        }
        let constraint = Constraint::new(0, (num_alternatives - 1) as i64);
        Ok(ChoiceIndex::Root(self.decode_constrained_whole_number(&constraint)? as usize))
    }

    /// Decode an OCTET STRING (X.691 17)
    pub fn decode_octet_string(
        &mut self,
        min_len: Option<usize>,
        max_len: Option<usize>,
        extensible: bool,
    ) -> PerResult<Vec<u8>> {
        let len = match (min_len, max_len) {
            (Some(min), Some(max)) => {
                if extensible && self.read_bit()? {
                    self.decode_length_determinant()?
                } else if min == max {
                    if min > 2 {
                        self.align();
                    }
                    min
                } else {
                    let len = self.decode_constrained_length(min, max)?;
                    if max > 2 {
                        self.align();
                    }
                    len
                }
            }
            _ => self.decode_length_determinant()?,
        };
        self.read_bytes(len)
    }

    /// Decode a BIT STRING (X.691 16)
    pub fn decode_bit_string(
        &mut self,
        min_len: Option<usize>,
        max_len: Option<usize>,
        extensible: bool,
    ) -> PerResult<BitVec<u8, Msb0>> {
        let len = match (min_len, max_len) {
            (Some(min), Some(max)) => {
                if extensible && self.read_bit()? {
                    self.decode_length_determinant()?
                } else if min == max {
                    if min > 16 {
                        self.align();
                    }
                    min
                } else {
                    let len = self.decode_constrained_length(min, max)?;
                    if max > 16 {
                        self.align();
                    }
                    len
                }
            }
            _ => self.decode_length_determinant()?,
        };
        if self.position + len > self.data.len() {
            return Err(self.out_of_bits(len));
        }
        let mut bits = BitVec::with_capacity(len);
        for _ in 0..len {
            bits.push(self.read_bit()?);
        }
        Ok(bits)
    }

    /// Decode a PrintableString (X.691 30); bytes are passed through as-is
    pub fn decode_printable_string(
        &mut self,
        min_len: Option<usize>,
        max_len: Option<usize>,
        extensible: bool,
    ) -> PerResult<Vec<u8>> {
        self.decode_octet_string(min_len, max_len, extensible)
    }

    /// Decode an open field: aligned length determinant + raw octets
    pub fn decode_open_field(&mut self) -> PerResult<Vec<u8>> {
        let len = self.decode_length_determinant()?;
        self.read_bytes(len)
    }

    /// Verify nothing but byte-alignment padding remains
    pub fn expect_end(&self) -> PerResult<()> {
        if self.remaining_bits() >= 8 {
            return Err(PerError::TrailingData {
                offset: self.byte_position(),
                remaining_bits: self.remaining_bits(),
            });
        }
        Ok(())
    }
}

/// Trait for types that can be encoded with APER
pub trait AperEncode {
    fn encode_aper(&self, encoder: &mut AperEncoder) -> PerResult<()>;
}

/// Trait for types that can be decoded with APER
pub trait AperDecode: Sized {
    fn decode_aper(decoder: &mut AperDecoder) -> PerResult<Self>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constraint_bits_needed() {
        assert_eq!(Constraint::new(0, 0).bits_needed(), 0);
        assert_eq!(Constraint::new(0, 1).bits_needed(), 1);
        assert_eq!(Constraint::new(0, 2).bits_needed(), 2);
        assert_eq!(Constraint::new(0, 7).bits_needed(), 3);
        assert_eq!(Constraint::new(0, 255).bits_needed(), 8);
        assert_eq!(Constraint::new(10, 12).bits_needed(), 2);
    }

    #[test]
    fn test_one_bit_integer() {
        // Range [0,1] must occupy exactly one bit
        let constraint = Constraint::new(0, 1);
        let mut encoder = AperEncoder::new();
        encoder.encode_constrained_whole_number(1, &constraint).unwrap();
        assert_eq!(encoder.bit_position(), 1);
        assert_eq!(encoder.into_bytes().as_ref(), &[0x80]);
    }

    #[test]
    fn test_eight_bit_integer() {
        // Range [0,255] is exactly one octet
        let constraint = Constraint::new(0, 255);
        let mut encoder = AperEncoder::new();
        encoder.encode_constrained_whole_number(0xAB, &constraint).unwrap();
        assert_eq!(encoder.into_bytes().as_ref(), &[0xAB]);
    }

    #[test]
    fn test_large_range_integer_wire_format() {
        // INTEGER (0..4294967295) value 1: 2-bit octet count (0 => one
        // octet), aligned, then the octet. Matches captured RAN-UE-NGAP-ID.
        let constraint = Constraint::new(0, 4294967295);
        let mut encoder = AperEncoder::new();
        encoder.encode_constrained_whole_number(1, &constraint).unwrap();
        let bytes = encoder.into_bytes();
        assert_eq!(bytes.as_ref(), &[0x00, 0x01]);

        let mut decoder = AperDecoder::new(&bytes);
        assert_eq!(decoder.decode_constrained_whole_number(&constraint).unwrap(), 1);
    }

    #[test]
    fn test_forty_bit_integer_roundtrip() {
        let constraint = Constraint::new(0, 1099511627775);
        for value in [0i64, 1, 255, 256, 65536, 0xFF_FFFF_FFFF] {
            let mut encoder = AperEncoder::new();
            encoder.encode_constrained_whole_number(value, &constraint).unwrap();
            let bytes = encoder.into_bytes();
            let mut decoder = AperDecoder::new(&bytes);
            assert_eq!(decoder.decode_constrained_whole_number(&constraint).unwrap(), value);
        }
    }

    #[test]
    fn test_out_of_range_rejected() {
        let constraint = Constraint::new(0, 255);
        let mut encoder = AperEncoder::new();
        let err = encoder.encode_constrained_whole_number(256, &constraint).unwrap_err();
        assert!(matches!(err, PerError::ValueOutOfRange { value: 256, .. }));
    }

    #[test]
    fn test_length_determinant_roundtrip() {
        for len in [0usize, 1, 127, 128, 255, 1000, 16383, 16384, 30000, 65535] {
            let mut encoder = AperEncoder::new();
            encoder.encode_length_determinant(len).unwrap();
            let bytes = encoder.into_bytes();
            let mut decoder = AperDecoder::new(&bytes);
            assert_eq!(decoder.decode_length_determinant().unwrap(), len, "len {len}");
        }
    }

    #[test]
    fn test_length_determinant_too_large() {
        let mut encoder = AperEncoder::new();
        let err = encoder.encode_length_determinant(70000).unwrap_err();
        assert!(matches!(err, PerError::LengthTooLarge { length: 70000 }));
    }

    #[test]
    fn test_unconstrained_whole_number_roundtrip() {
        for value in [0i64, 1, -1, 127, 128, -128, -129, 32767, -32768, 1 << 40] {
            let mut encoder = AperEncoder::new();
            encoder.encode_unconstrained_whole_number(value).unwrap();
            let bytes = encoder.into_bytes();
            let mut decoder = AperDecoder::new(&bytes);
            assert_eq!(decoder.decode_unconstrained_whole_number().unwrap(), value, "value {value}");
        }
    }

    #[test]
    fn test_enumerated_extension_placeholder() {
        let constraint = Constraint::extensible(0, 5);
        let mut encoder = AperEncoder::new();
        encoder.encode_enumerated(EnumValue::Extended(2), &constraint).unwrap();
        let bytes = encoder.into_bytes();
        let mut decoder = AperDecoder::new(&bytes);
        assert_eq!(decoder.decode_enumerated(&constraint).unwrap(), EnumValue::Extended(2));
    }

    #[test]
    fn test_enumerated_extension_needs_extensible_type() {
        let constraint = Constraint::new(0, 5);
        let mut encoder = AperEncoder::new();
        let err = encoder.encode_enumerated(EnumValue::Extended(0), &constraint).unwrap_err();
        assert!(matches!(err, PerError::ValueOutOfRange { .. }));
    }

    #[test]
    fn test_choice_extension_roundtrip() {
        let mut encoder = AperEncoder::new();
        encoder.encode_choice_extension(3).unwrap();
        let bytes = encoder.into_bytes();
        let mut decoder = AperDecoder::new(&bytes);
        assert_eq!(decoder.decode_choice_index(5, true).unwrap(), ChoiceIndex::Extension(3));
    }

    #[test]
    fn test_fixed_octet_string_no_length() {
        // SIZE (3): contents only, no determinant
        let mut encoder = AperEncoder::new();
        encoder.encode_octet_string(&[0x21, 0xF3, 0x54], Some(3), Some(3), false).unwrap();
        assert_eq!(encoder.into_bytes().as_ref(), &[0x21, 0xF3, 0x54]);
    }

    #[test]
    fn test_fixed_bit_string_no_length() {
        // SIZE (8): exactly eight bits, no determinant
        let bits = bitvec![u8, Msb0; 1, 0, 1, 0, 1, 0, 1, 0];
        let mut encoder = AperEncoder::new();
        encoder.encode_bit_string(&bits, Some(8), Some(8), false).unwrap();
        assert_eq!(encoder.bit_position(), 8);
        assert_eq!(encoder.into_bytes().as_ref(), &[0xAA]);
    }

    #[test]
    fn test_bounded_octet_string_roundtrip() {
        let data = vec![0xDE, 0xAD, 0xBE, 0xEF];
        let mut encoder = AperEncoder::new();
        encoder.encode_octet_string(&data, Some(1), Some(16), false).unwrap();
        let bytes = encoder.into_bytes();
        let mut decoder = AperDecoder::new(&bytes);
        assert_eq!(decoder.decode_octet_string(Some(1), Some(16), false).unwrap(), data);
    }

    #[test]
    fn test_bounded_octet_string_size_violation() {
        let mut encoder = AperEncoder::new();
        let err = encoder.encode_octet_string(&[0; 20], Some(1), Some(16), false).unwrap_err();
        assert!(matches!(err, PerError::SizeConstraintViolation { size: 20, .. }));
    }

    #[test]
    fn test_extensible_printable_string_wire_format() {
        // PrintableString (SIZE (1..150, ...)) "gnb1": extension bit, 8-bit
        // length offset, aligned characters. Matches captured RANNodeName.
        let mut encoder = AperEncoder::new();
        encoder.encode_printable_string(b"gnb1", Some(1), Some(150), true).unwrap();
        let bytes = encoder.into_bytes();
        assert_eq!(bytes.as_ref(), &[0x01, 0x80, 0x67, 0x6E, 0x62, 0x31]);

        let mut decoder = AperDecoder::new(&bytes);
        let decoded = decoder.decode_printable_string(Some(1), Some(150), true).unwrap();
        assert_eq!(decoded, b"gnb1");
    }

    #[test]
    fn test_decode_past_end_is_error() {
        let mut decoder = AperDecoder::new(&[0xFF]);
        decoder.read_bits(8).unwrap();
        let err = decoder.read_bits(1).unwrap_err();
        assert!(matches!(err, PerError::OutOfBits { needed: 1, available: 0, .. }));
    }

    #[test]
    fn test_expect_end_reports_trailing_bytes() {
        let mut decoder = AperDecoder::new(&[0x00, 0x00]);
        decoder.read_bits(4).unwrap();
        let err = decoder.expect_end().unwrap_err();
        assert!(matches!(err, PerError::TrailingData { .. }));
    }
}
