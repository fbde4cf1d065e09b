//! Protocol IE containers
//!
//! The generic (id, criticality, value) triple collections that every NGAP
//! message body is built from. Decoding is driven by the enclosing
//! container kind's [`IeRegistry`]: ids are validated against the object
//! set, values dispatched to their registered decoders, and criticality
//! decides whether an unprocessable entry fails the message or is dropped.

use log::warn;

use crate::ngap::error::{NgapError, NgapResult};
use crate::ngap::registry::{IeRegistry, IeValue};
use crate::ngap::types::{Criticality, Presence, ProtocolIeId};
use crate::open::OpenType;
use crate::per::{AperDecode, AperDecoder, AperEncode, AperEncoder, PerResult};

/// ProtocolIE-Field - one (id, criticality, value) triple
/// ASN.1: ProtocolIE-Field ::= SEQUENCE { id, criticality, value }
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtocolIeField {
    pub id: ProtocolIeId,
    pub criticality: Criticality,
    pub value: IeValue,
}

impl ProtocolIeField {
    pub fn new(id: ProtocolIeId, criticality: Criticality, value: IeValue) -> Self {
        Self { id, criticality, value }
    }
}

impl AperEncode for ProtocolIeField {
    fn encode_aper(&self, encoder: &mut AperEncoder) -> PerResult<()> {
        self.id.encode_aper(encoder)?;
        self.criticality.encode_aper(encoder)?;
        let mut value_encoder = AperEncoder::new();
        self.value.encode_aper(&mut value_encoder)?;
        encoder.encode_open_field(&value_encoder.into_bytes())
    }
}

/// ProtocolIE-Container - the IEs of one message body, in declared order
/// ASN.1: ProtocolIE-Container ::= SEQUENCE (SIZE (0..65535)) OF ProtocolIE-Field
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProtocolIeContainer {
    pub fields: Vec<ProtocolIeField>,
}

impl ProtocolIeContainer {
    pub const SIZE_MAX: usize = 65535;

    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    pub fn push(&mut self, field: ProtocolIeField) {
        self.fields.push(field);
    }

    pub fn add(&mut self, id: ProtocolIeId, criticality: Criticality, value: IeValue) {
        self.fields.push(ProtocolIeField::new(id, criticality, value));
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// First value carried under `id`
    pub fn find(&self, id: ProtocolIeId) -> Option<&IeValue> {
        self.fields.iter().find(|field| field.id == id).map(|field| &field.value)
    }

    /// Decode against the enclosing container kind's object set.
    ///
    /// Entries must arrive in the registry's declared order: an entry
    /// matching a later declared field implicitly skips those in between,
    /// and skipping a mandatory field fails the decode at that point.
    /// Unknown or undecodable entries are recovered or rejected according
    /// to criticality.
    pub fn decode(decoder: &mut AperDecoder, registry: &IeRegistry) -> NgapResult<Self> {
        let count = decoder.decode_constrained_length(0, Self::SIZE_MAX)?;
        let mut fields = Vec::with_capacity(count.min(64));
        let mut cursor = 0usize;

        for _ in 0..count {
            let entry_offset = decoder.byte_position();
            let id = ProtocolIeId::decode_aper(decoder)?;
            let wire_criticality = Criticality::decode_aper(decoder)?;
            let octets = decoder.decode_open_field()?;

            let matched = registry
                .defs
                .iter()
                .enumerate()
                .skip(cursor)
                .find(|(_, def)| def.id == id);

            let Some((index, def)) = matched else {
                if registry.is_id_valid(id) {
                    // Declared before the cursor: out of order or duplicate
                    if registry.criticality_of(id) == Some(Criticality::Reject) {
                        return Err(NgapError::MisorderedIe {
                            container: registry.name,
                            ie_id: id.0,
                            offset: entry_offset,
                        });
                    }
                    warn!("{}: dropping out-of-order IE {}", registry.name, id.0);
                    continue;
                }
                if wire_criticality == Criticality::Reject {
                    return Err(NgapError::UnknownIeId {
                        container: registry.name,
                        ie_id: id.0,
                        offset: entry_offset,
                    });
                }
                warn!(
                    "{}: dropping unknown IE {} (criticality {:?})",
                    registry.name, id.0, wire_criticality
                );
                continue;
            };

            if let Some(skipped) =
                registry.defs[cursor..index].iter().find(|d| d.presence == Presence::Mandatory)
            {
                return Err(NgapError::MissingMandatoryIe {
                    container: registry.name,
                    ie_id: skipped.id.0,
                    offset: entry_offset,
                });
            }

            if wire_criticality != def.criticality {
                warn!(
                    "{}: IE {} carries criticality {:?}, object set says {:?}",
                    registry.name, id.0, wire_criticality, def.criticality
                );
            }

            match registry.decode_value(id, &octets) {
                Ok(value) => {
                    fields.push(ProtocolIeField { id, criticality: wire_criticality, value });
                }
                Err(source) => {
                    if def.criticality == Criticality::Reject {
                        return Err(NgapError::IeDecode {
                            container: registry.name,
                            ie_id: id.0,
                            offset: entry_offset,
                            source,
                        });
                    }
                    if def.presence == Presence::Mandatory {
                        return Err(NgapError::MissingMandatoryIe {
                            container: registry.name,
                            ie_id: id.0,
                            offset: entry_offset,
                        });
                    }
                    warn!("{}: dropping undecodable IE {}: {}", registry.name, id.0, source);
                }
            }
            cursor = index + 1;
        }

        if let Some(missing) =
            registry.defs[cursor..].iter().find(|d| d.presence == Presence::Mandatory)
        {
            return Err(NgapError::MissingMandatoryIe {
                container: registry.name,
                ie_id: missing.id.0,
                offset: decoder.byte_position(),
            });
        }

        Ok(Self { fields })
    }
}

impl AperEncode for ProtocolIeContainer {
    fn encode_aper(&self, encoder: &mut AperEncoder) -> PerResult<()> {
        encoder.encode_constrained_length(self.fields.len(), 0, Self::SIZE_MAX)?;
        for field in &self.fields {
            field.encode_aper(encoder)?;
        }
        Ok(())
    }
}

/// ProtocolExtensionField - one protocol extension triple
/// ASN.1: ProtocolExtensionField ::= SEQUENCE { id, criticality, extensionValue }
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtocolExtensionField {
    pub id: ProtocolIeId,
    pub criticality: Criticality,
    pub value: IeValue,
}

impl AperEncode for ProtocolExtensionField {
    fn encode_aper(&self, encoder: &mut AperEncoder) -> PerResult<()> {
        self.id.encode_aper(encoder)?;
        self.criticality.encode_aper(encoder)?;
        let mut value_encoder = AperEncoder::new();
        self.value.encode_aper(&mut value_encoder)?;
        encoder.encode_open_field(&value_encoder.into_bytes())
    }
}

/// ProtocolExtensionContainer - version-added extensions of a SEQUENCE.
/// Entries whose id the extension object set does not know are retained as
/// opaque octets, so re-encoding a decoded value is lossless.
/// ASN.1: ProtocolExtensionContainer ::= SEQUENCE (SIZE (1..65535)) OF ProtocolExtensionField
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProtocolExtensionContainer {
    pub fields: Vec<ProtocolExtensionField>,
}

impl ProtocolExtensionContainer {
    pub const SIZE_MIN: usize = 1;
    pub const SIZE_MAX: usize = 65535;

    pub fn find(&self, id: ProtocolIeId) -> Option<&IeValue> {
        self.fields.iter().find(|field| field.id == id).map(|field| &field.value)
    }

    /// Decode against an extension object set
    pub fn decode(decoder: &mut AperDecoder, registry: &IeRegistry) -> PerResult<Self> {
        let count = decoder.decode_constrained_length(Self::SIZE_MIN, Self::SIZE_MAX)?;
        let mut fields = Vec::with_capacity(count.min(64));
        for _ in 0..count {
            let id = ProtocolIeId::decode_aper(decoder)?;
            let criticality = Criticality::decode_aper(decoder)?;
            let octets = decoder.decode_open_field()?;
            let value = match registry.decode_value(id, &octets) {
                Ok(value) => value,
                Err(source) => {
                    if registry.criticality_of(id) == Some(Criticality::Reject) {
                        return Err(source);
                    }
                    warn!(
                        "{}: retaining undecodable extension {} opaquely: {}",
                        registry.name, id.0, source
                    );
                    IeValue::Unknown(OpenType::new(octets))
                }
            };
            fields.push(ProtocolExtensionField { id, criticality, value });
        }
        Ok(Self { fields })
    }
}

impl AperEncode for ProtocolExtensionContainer {
    fn encode_aper(&self, encoder: &mut AperEncoder) -> PerResult<()> {
        encoder.encode_constrained_length(self.fields.len(), Self::SIZE_MIN, Self::SIZE_MAX)?;
        for field in &self.fields {
            field.encode_aper(encoder)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ngap::ies::{AmfUeNgapId, NasPdu, RanUeNgapId};
    use crate::ngap::registry::{EMPTY_EXTENSIONS, UPLINK_NAS_TRANSPORT_IES};
    use crate::ngap::ies::UserLocationInformation;
    use crate::ngap::ies::{NrCgi, PlmnIdentity, Tac, Tai, UserLocationInformationNr};

    fn uplink_container() -> ProtocolIeContainer {
        let mut container = ProtocolIeContainer::new();
        container.add(
            ProtocolIeId::AMF_UE_NGAP_ID,
            Criticality::Reject,
            IeValue::AmfUeNgapId(AmfUeNgapId(42)),
        );
        container.add(
            ProtocolIeId::RAN_UE_NGAP_ID,
            Criticality::Reject,
            IeValue::RanUeNgapId(RanUeNgapId(7)),
        );
        container.add(
            ProtocolIeId::NAS_PDU,
            Criticality::Reject,
            IeValue::NasPdu(NasPdu::new(vec![0x7E, 0x00, 0x56])),
        );
        container.add(
            ProtocolIeId::USER_LOCATION_INFORMATION,
            Criticality::Ignore,
            IeValue::UserLocationInformation(UserLocationInformation::Nr(
                UserLocationInformationNr::new(
                    NrCgi::new(PlmnIdentity([0x00, 0xF1, 0x10]), 0x1234),
                    Tai::new(PlmnIdentity([0x00, 0xF1, 0x10]), Tac::from_u24(1)),
                ),
            )),
        );
        container
    }

    fn encode(container: &ProtocolIeContainer) -> Vec<u8> {
        let mut encoder = AperEncoder::new();
        container.encode_aper(&mut encoder).unwrap();
        encoder.into_bytes().to_vec()
    }

    #[test]
    fn test_container_roundtrip() {
        let container = uplink_container();
        let bytes = encode(&container);
        let mut decoder = AperDecoder::new(&bytes);
        let decoded =
            ProtocolIeContainer::decode(&mut decoder, &UPLINK_NAS_TRANSPORT_IES).unwrap();
        assert_eq!(decoded, container);
    }

    #[test]
    fn test_find() {
        let container = uplink_container();
        assert_eq!(
            container.find(ProtocolIeId::AMF_UE_NGAP_ID),
            Some(&IeValue::AmfUeNgapId(AmfUeNgapId(42)))
        );
        assert_eq!(container.find(ProtocolIeId(9999)), None);
    }

    #[test]
    fn test_missing_mandatory_ie() {
        let mut container = uplink_container();
        container.fields.remove(2); // drop NAS-PDU
        let bytes = encode(&container);
        let mut decoder = AperDecoder::new(&bytes);
        let err =
            ProtocolIeContainer::decode(&mut decoder, &UPLINK_NAS_TRANSPORT_IES).unwrap_err();
        assert!(matches!(
            err,
            NgapError::MissingMandatoryIe { ie_id: 38, .. }
        ));
    }

    #[test]
    fn test_out_of_order_mandatory_reported_missing() {
        // RAN-UE-NGAP-ID before AMF-UE-NGAP-ID: the declared-order walk
        // reports the skipped mandatory IE at its expected position
        let mut container = uplink_container();
        container.fields.swap(0, 1);
        let bytes = encode(&container);
        let mut decoder = AperDecoder::new(&bytes);
        let err =
            ProtocolIeContainer::decode(&mut decoder, &UPLINK_NAS_TRANSPORT_IES).unwrap_err();
        assert!(matches!(
            err,
            NgapError::MissingMandatoryIe { ie_id: 10, .. }
        ));
    }

    #[test]
    fn test_unknown_ie_reject_fails() {
        let mut container = uplink_container();
        container.add(ProtocolIeId(9999), Criticality::Reject, IeValue::Unknown(OpenType::new(vec![0x00])));
        let bytes = encode(&container);
        let mut decoder = AperDecoder::new(&bytes);
        let err =
            ProtocolIeContainer::decode(&mut decoder, &UPLINK_NAS_TRANSPORT_IES).unwrap_err();
        assert!(matches!(err, NgapError::UnknownIeId { ie_id: 9999, .. }));
    }

    #[test]
    fn test_unknown_ie_ignore_dropped() {
        let mut container = uplink_container();
        container.add(ProtocolIeId(9999), Criticality::Ignore, IeValue::Unknown(OpenType::new(vec![0x00])));
        let bytes = encode(&container);
        let mut decoder = AperDecoder::new(&bytes);
        let decoded =
            ProtocolIeContainer::decode(&mut decoder, &UPLINK_NAS_TRANSPORT_IES).unwrap();
        assert_eq!(decoded.len(), 4);
        assert_eq!(decoded.find(ProtocolIeId(9999)), None);
    }

    #[test]
    fn test_extension_container_retains_unknown_entries() {
        let container = ProtocolExtensionContainer {
            fields: vec![ProtocolExtensionField {
                id: ProtocolIeId(9999),
                criticality: Criticality::Ignore,
                value: IeValue::Unknown(OpenType::new(vec![0xCA, 0xFE])),
            }],
        };
        let mut encoder = AperEncoder::new();
        container.encode_aper(&mut encoder).unwrap();
        let bytes = encoder.into_bytes();

        let mut decoder = AperDecoder::new(&bytes);
        let decoded = ProtocolExtensionContainer::decode(&mut decoder, &EMPTY_EXTENSIONS).unwrap();
        assert_eq!(decoded, container);

        let mut encoder = AperEncoder::new();
        decoded.encode_aper(&mut encoder).unwrap();
        assert_eq!(encoder.into_bytes(), bytes);
    }
}
