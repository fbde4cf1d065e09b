//! NGAP Information Element payload types
//!
//! Concrete IE value types from NGAP-IEs (3GPP TS 38.413) referenced by the
//! IE registries. Extensible SEQUENCE types keep their extension-addition
//! block and an optional protocol extension container so that messages from
//! newer protocol versions survive a decode/encode cycle byte-for-byte.

use crate::ngap::container::ProtocolExtensionContainer;
use crate::ngap::registry::EMPTY_EXTENSIONS;
use crate::ngap::types::{Criticality, ProcedureCode, ProtocolIeId, TriggeringMessage};
use crate::open::UnknownAlternative;
use crate::per::{
    AperDecode, AperDecoder, AperEncode, AperEncoder, ChoiceIndex, Constraint, EnumValue,
    PerResult,
};
use crate::seq::{decode_seq_of, encode_seq_of, ExtensionAdditions};

/// Writes the extension-marker bit of an extensible SEQUENCE
fn encode_seq_preamble(encoder: &mut AperEncoder, additions: &ExtensionAdditions) {
    encoder.write_bit(!additions.is_empty());
}

/// Reads back the extension-addition block if the marker bit was set
fn decode_seq_additions(decoder: &mut AperDecoder, marker: bool) -> PerResult<ExtensionAdditions> {
    if marker {
        ExtensionAdditions::decode(decoder)
    } else {
        Ok(ExtensionAdditions::default())
    }
}

fn encode_ie_exts(
    encoder: &mut AperEncoder,
    ie_exts: &Option<ProtocolExtensionContainer>,
) -> PerResult<()> {
    if let Some(exts) = ie_exts {
        exts.encode_aper(encoder)?;
    }
    Ok(())
}

fn decode_ie_exts(
    decoder: &mut AperDecoder,
    present: bool,
) -> PerResult<Option<ProtocolExtensionContainer>> {
    if present {
        Ok(Some(ProtocolExtensionContainer::decode(decoder, &EMPTY_EXTENSIONS)?))
    } else {
        Ok(None)
    }
}

// ============================================================================
// Identifiers
// ============================================================================

/// AMF-UE-NGAP-ID - UE identifier on the AMF side
/// ASN.1: AMF-UE-NGAP-ID ::= INTEGER (0..1099511627775)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AmfUeNgapId(pub u64);

impl AmfUeNgapId {
    // 40-bit value
    pub const CONSTRAINT: Constraint = Constraint::new(0, 1099511627775);
}

impl AperEncode for AmfUeNgapId {
    fn encode_aper(&self, encoder: &mut AperEncoder) -> PerResult<()> {
        encoder.encode_constrained_whole_number(self.0 as i64, &Self::CONSTRAINT)
    }
}

impl AperDecode for AmfUeNgapId {
    fn decode_aper(decoder: &mut AperDecoder) -> PerResult<Self> {
        let value = decoder.decode_constrained_whole_number(&Self::CONSTRAINT)?;
        Ok(AmfUeNgapId(value as u64))
    }
}

/// RAN-UE-NGAP-ID - UE identifier on the RAN side
/// ASN.1: RAN-UE-NGAP-ID ::= INTEGER (0..4294967295)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RanUeNgapId(pub u32);

impl RanUeNgapId {
    pub const CONSTRAINT: Constraint = Constraint::new(0, 4294967295);
}

impl AperEncode for RanUeNgapId {
    fn encode_aper(&self, encoder: &mut AperEncoder) -> PerResult<()> {
        encoder.encode_constrained_whole_number(self.0 as i64, &Self::CONSTRAINT)
    }
}

impl AperDecode for RanUeNgapId {
    fn decode_aper(decoder: &mut AperDecoder) -> PerResult<Self> {
        let value = decoder.decode_constrained_whole_number(&Self::CONSTRAINT)?;
        Ok(RanUeNgapId(value as u32))
    }
}

/// UE-NGAP-IDs - one or both UE identifiers
/// ASN.1: UE-NGAP-IDs ::= CHOICE { uE-NGAP-ID-pair, aMF-UE-NGAP-ID, choice-Extensions }
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UeNgapIds {
    Pair(UeNgapIdPair),
    AmfUeNgapId(AmfUeNgapId),
    ChoiceExtension(UnknownAlternative),
}

impl UeNgapIds {
    pub const NUM_ALTERNATIVES: usize = 2;
    pub const EXTENSIBLE: bool = true;
}

/// ASN.1: UE-NGAP-ID-pair ::= SEQUENCE { aMF-UE-NGAP-ID, rAN-UE-NGAP-ID, iE-Extensions OPTIONAL, ... }
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UeNgapIdPair {
    pub amf_ue_ngap_id: AmfUeNgapId,
    pub ran_ue_ngap_id: RanUeNgapId,
    pub ie_exts: Option<ProtocolExtensionContainer>,
    pub ext_additions: ExtensionAdditions,
}

impl UeNgapIdPair {
    pub fn new(amf_ue_ngap_id: u64, ran_ue_ngap_id: u32) -> Self {
        Self {
            amf_ue_ngap_id: AmfUeNgapId(amf_ue_ngap_id),
            ran_ue_ngap_id: RanUeNgapId(ran_ue_ngap_id),
            ie_exts: None,
            ext_additions: ExtensionAdditions::default(),
        }
    }
}

impl AperEncode for UeNgapIdPair {
    fn encode_aper(&self, encoder: &mut AperEncoder) -> PerResult<()> {
        encode_seq_preamble(encoder, &self.ext_additions);
        encoder.write_bit(self.ie_exts.is_some());
        self.amf_ue_ngap_id.encode_aper(encoder)?;
        self.ran_ue_ngap_id.encode_aper(encoder)?;
        encode_ie_exts(encoder, &self.ie_exts)?;
        if !self.ext_additions.is_empty() {
            self.ext_additions.encode(encoder)?;
        }
        Ok(())
    }
}

impl AperDecode for UeNgapIdPair {
    fn decode_aper(decoder: &mut AperDecoder) -> PerResult<Self> {
        let marker = decoder.read_bit()?;
        let exts_present = decoder.read_bit()?;
        let amf_ue_ngap_id = AmfUeNgapId::decode_aper(decoder)?;
        let ran_ue_ngap_id = RanUeNgapId::decode_aper(decoder)?;
        let ie_exts = decode_ie_exts(decoder, exts_present)?;
        let ext_additions = decode_seq_additions(decoder, marker)?;
        Ok(Self { amf_ue_ngap_id, ran_ue_ngap_id, ie_exts, ext_additions })
    }
}

impl AperEncode for UeNgapIds {
    fn encode_aper(&self, encoder: &mut AperEncoder) -> PerResult<()> {
        match self {
            UeNgapIds::Pair(pair) => {
                encoder.encode_choice_index(0, Self::NUM_ALTERNATIVES, Self::EXTENSIBLE)?;
                pair.encode_aper(encoder)
            }
            UeNgapIds::AmfUeNgapId(id) => {
                encoder.encode_choice_index(1, Self::NUM_ALTERNATIVES, Self::EXTENSIBLE)?;
                id.encode_aper(encoder)
            }
            UeNgapIds::ChoiceExtension(unknown) => unknown.encode(encoder),
        }
    }
}

impl AperDecode for UeNgapIds {
    fn decode_aper(decoder: &mut AperDecoder) -> PerResult<Self> {
        match decoder.decode_choice_index(Self::NUM_ALTERNATIVES, Self::EXTENSIBLE)? {
            ChoiceIndex::Root(0) => Ok(UeNgapIds::Pair(UeNgapIdPair::decode_aper(decoder)?)),
            ChoiceIndex::Root(_) => Ok(UeNgapIds::AmfUeNgapId(AmfUeNgapId::decode_aper(decoder)?)),
            ChoiceIndex::Extension(ordinal) => {
                Ok(UeNgapIds::ChoiceExtension(UnknownAlternative::decode(decoder, ordinal)?))
            }
        }
    }
}

// ============================================================================
// Octet-string payloads
// ============================================================================

/// NAS-PDU - opaque NAS message container
/// ASN.1: NAS-PDU ::= OCTET STRING
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NasPdu(pub Vec<u8>);

impl NasPdu {
    pub fn new(data: Vec<u8>) -> Self {
        Self(data)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl AperEncode for NasPdu {
    fn encode_aper(&self, encoder: &mut AperEncoder) -> PerResult<()> {
        encoder.encode_octet_string(&self.0, None, None, false)
    }
}

impl AperDecode for NasPdu {
    fn decode_aper(decoder: &mut AperDecoder) -> PerResult<Self> {
        Ok(NasPdu(decoder.decode_octet_string(None, None, false)?))
    }
}

/// PLMNIdentity - MCC/MNC in BCD, 3 octets
/// ASN.1: PLMNIdentity ::= OCTET STRING (SIZE (3))
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlmnIdentity(pub [u8; 3]);

impl PlmnIdentity {
    pub fn new(plmn: [u8; 3]) -> Self {
        Self(plmn)
    }

    pub fn from_mcc_mnc(mcc: u16, mnc: u16, mnc_len: u8) -> Self {
        let mut plmn = [0u8; 3];
        let mcc1 = ((mcc / 100) % 10) as u8;
        let mcc2 = ((mcc / 10) % 10) as u8;
        let mcc3 = (mcc % 10) as u8;
        let mnc1 = ((mnc / 100) % 10) as u8;
        let mnc2 = ((mnc / 10) % 10) as u8;
        let mnc3 = (mnc % 10) as u8;

        plmn[0] = (mcc2 << 4) | mcc1;
        plmn[1] = if mnc_len == 2 { 0xF0 | mcc3 } else { (mnc3 << 4) | mcc3 };
        plmn[2] = (mnc2 << 4) | mnc1;
        Self(plmn)
    }
}

impl AperEncode for PlmnIdentity {
    fn encode_aper(&self, encoder: &mut AperEncoder) -> PerResult<()> {
        encoder.encode_octet_string(&self.0, Some(3), Some(3), false)
    }
}

impl AperDecode for PlmnIdentity {
    fn decode_aper(decoder: &mut AperDecoder) -> PerResult<Self> {
        let data = decoder.decode_octet_string(Some(3), Some(3), false)?;
        let mut arr = [0u8; 3];
        arr.copy_from_slice(&data);
        Ok(PlmnIdentity(arr))
    }
}

/// TAC - Tracking Area Code
/// ASN.1: TAC ::= OCTET STRING (SIZE (3))
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tac(pub [u8; 3]);

impl Tac {
    pub fn new(tac: [u8; 3]) -> Self {
        Self(tac)
    }

    pub fn from_u24(value: u32) -> Self {
        let bytes = value.to_be_bytes();
        Self([bytes[1], bytes[2], bytes[3]])
    }

    pub fn to_u24(&self) -> u32 {
        ((self.0[0] as u32) << 16) | ((self.0[1] as u32) << 8) | self.0[2] as u32
    }
}

impl AperEncode for Tac {
    fn encode_aper(&self, encoder: &mut AperEncoder) -> PerResult<()> {
        encoder.encode_octet_string(&self.0, Some(3), Some(3), false)
    }
}

impl AperDecode for Tac {
    fn decode_aper(decoder: &mut AperDecoder) -> PerResult<Self> {
        let data = decoder.decode_octet_string(Some(3), Some(3), false)?;
        let mut arr = [0u8; 3];
        arr.copy_from_slice(&data);
        Ok(Tac(arr))
    }
}

// ============================================================================
// Printable-string payloads
// ============================================================================

/// AMFName - human-readable AMF identifier
/// ASN.1: AMFName ::= PrintableString (SIZE (1..150, ...))
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AmfName(pub Vec<u8>);

impl AmfName {
    pub const SIZE_MIN: usize = 1;
    pub const SIZE_MAX: usize = 150;

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn as_str(&self) -> Option<&str> {
        core::str::from_utf8(&self.0).ok()
    }
}

impl From<&str> for AmfName {
    fn from(name: &str) -> Self {
        Self(name.as_bytes().to_vec())
    }
}

impl AperEncode for AmfName {
    fn encode_aper(&self, encoder: &mut AperEncoder) -> PerResult<()> {
        encoder.encode_printable_string(&self.0, Some(Self::SIZE_MIN), Some(Self::SIZE_MAX), true)
    }
}

impl AperDecode for AmfName {
    fn decode_aper(decoder: &mut AperDecoder) -> PerResult<Self> {
        let chars =
            decoder.decode_printable_string(Some(Self::SIZE_MIN), Some(Self::SIZE_MAX), true)?;
        Ok(AmfName(chars))
    }
}

/// RANNodeName - human-readable RAN node identifier
/// ASN.1: RANNodeName ::= PrintableString (SIZE (1..150, ...))
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RanNodeName(pub Vec<u8>);

impl RanNodeName {
    pub const SIZE_MIN: usize = 1;
    pub const SIZE_MAX: usize = 150;

    pub fn as_str(&self) -> Option<&str> {
        core::str::from_utf8(&self.0).ok()
    }
}

impl From<&str> for RanNodeName {
    fn from(name: &str) -> Self {
        Self(name.as_bytes().to_vec())
    }
}

impl AperEncode for RanNodeName {
    fn encode_aper(&self, encoder: &mut AperEncoder) -> PerResult<()> {
        encoder.encode_printable_string(&self.0, Some(Self::SIZE_MIN), Some(Self::SIZE_MAX), true)
    }
}

impl AperDecode for RanNodeName {
    fn decode_aper(decoder: &mut AperDecoder) -> PerResult<Self> {
        let chars =
            decoder.decode_printable_string(Some(Self::SIZE_MIN), Some(Self::SIZE_MAX), true)?;
        Ok(RanNodeName(chars))
    }
}

// ============================================================================
// Small enumerated payloads
// ============================================================================

/// TimeToWait - retry back-off hint
/// ASN.1: TimeToWait ::= ENUMERATED { v1s, v2s, v5s, v10s, v20s, v60s, ... }
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeToWait {
    V1s,
    V2s,
    V5s,
    V10s,
    V20s,
    V60s,
    Unrecognized(u64),
}

impl TimeToWait {
    pub const CONSTRAINT: Constraint = Constraint::extensible(0, 5);

    /// Wait time in seconds for the root values
    pub fn seconds(&self) -> Option<u32> {
        match self {
            TimeToWait::V1s => Some(1),
            TimeToWait::V2s => Some(2),
            TimeToWait::V5s => Some(5),
            TimeToWait::V10s => Some(10),
            TimeToWait::V20s => Some(20),
            TimeToWait::V60s => Some(60),
            TimeToWait::Unrecognized(_) => None,
        }
    }
}

impl AperEncode for TimeToWait {
    fn encode_aper(&self, encoder: &mut AperEncoder) -> PerResult<()> {
        let value = match self {
            TimeToWait::V1s => EnumValue::Root(0),
            TimeToWait::V2s => EnumValue::Root(1),
            TimeToWait::V5s => EnumValue::Root(2),
            TimeToWait::V10s => EnumValue::Root(3),
            TimeToWait::V20s => EnumValue::Root(4),
            TimeToWait::V60s => EnumValue::Root(5),
            TimeToWait::Unrecognized(n) => EnumValue::Extended(*n),
        };
        encoder.encode_enumerated(value, &Self::CONSTRAINT)
    }
}

impl AperDecode for TimeToWait {
    fn decode_aper(decoder: &mut AperDecoder) -> PerResult<Self> {
        Ok(match decoder.decode_enumerated(&Self::CONSTRAINT)? {
            EnumValue::Root(0) => TimeToWait::V1s,
            EnumValue::Root(1) => TimeToWait::V2s,
            EnumValue::Root(2) => TimeToWait::V5s,
            EnumValue::Root(3) => TimeToWait::V10s,
            EnumValue::Root(4) => TimeToWait::V20s,
            EnumValue::Root(_) => TimeToWait::V60s,
            EnumValue::Extended(n) => TimeToWait::Unrecognized(n),
        })
    }
}

/// PagingDRX - default paging DRX cycle length in radio frames
/// ASN.1: PagingDRX ::= ENUMERATED { v32, v64, v128, v256, ... }
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PagingDrx {
    V32,
    V64,
    V128,
    V256,
    Unrecognized(u64),
}

impl PagingDrx {
    pub const CONSTRAINT: Constraint = Constraint::extensible(0, 3);
}

impl AperEncode for PagingDrx {
    fn encode_aper(&self, encoder: &mut AperEncoder) -> PerResult<()> {
        let value = match self {
            PagingDrx::V32 => EnumValue::Root(0),
            PagingDrx::V64 => EnumValue::Root(1),
            PagingDrx::V128 => EnumValue::Root(2),
            PagingDrx::V256 => EnumValue::Root(3),
            PagingDrx::Unrecognized(n) => EnumValue::Extended(*n),
        };
        encoder.encode_enumerated(value, &Self::CONSTRAINT)
    }
}

impl AperDecode for PagingDrx {
    fn decode_aper(decoder: &mut AperDecoder) -> PerResult<Self> {
        Ok(match decoder.decode_enumerated(&Self::CONSTRAINT)? {
            EnumValue::Root(0) => PagingDrx::V32,
            EnumValue::Root(1) => PagingDrx::V64,
            EnumValue::Root(2) => PagingDrx::V128,
            EnumValue::Root(_) => PagingDrx::V256,
            EnumValue::Extended(n) => PagingDrx::Unrecognized(n),
        })
    }
}

/// RRCEstablishmentCause - why the UE established the RRC connection
/// ASN.1: RRCEstablishmentCause ::= ENUMERATED { emergency, ..., ... }
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RrcEstablishmentCause {
    Emergency,
    HighPriorityAccess,
    MtAccess,
    MoSignalling,
    MoData,
    MoVoiceCall,
    MoVideoCall,
    MoSms,
    MpsPriorityAccess,
    McsPriorityAccess,
    Unrecognized(u64),
}

impl RrcEstablishmentCause {
    pub const CONSTRAINT: Constraint = Constraint::extensible(0, 9);
}

impl AperEncode for RrcEstablishmentCause {
    fn encode_aper(&self, encoder: &mut AperEncoder) -> PerResult<()> {
        use RrcEstablishmentCause::*;
        let value = match self {
            Emergency => EnumValue::Root(0),
            HighPriorityAccess => EnumValue::Root(1),
            MtAccess => EnumValue::Root(2),
            MoSignalling => EnumValue::Root(3),
            MoData => EnumValue::Root(4),
            MoVoiceCall => EnumValue::Root(5),
            MoVideoCall => EnumValue::Root(6),
            MoSms => EnumValue::Root(7),
            MpsPriorityAccess => EnumValue::Root(8),
            McsPriorityAccess => EnumValue::Root(9),
            Unrecognized(n) => EnumValue::Extended(*n),
        };
        encoder.encode_enumerated(value, &Self::CONSTRAINT)
    }
}

impl AperDecode for RrcEstablishmentCause {
    fn decode_aper(decoder: &mut AperDecoder) -> PerResult<Self> {
        use RrcEstablishmentCause::*;
        Ok(match decoder.decode_enumerated(&Self::CONSTRAINT)? {
            EnumValue::Root(0) => Emergency,
            EnumValue::Root(1) => HighPriorityAccess,
            EnumValue::Root(2) => MtAccess,
            EnumValue::Root(3) => MoSignalling,
            EnumValue::Root(4) => MoData,
            EnumValue::Root(5) => MoVoiceCall,
            EnumValue::Root(6) => MoVideoCall,
            EnumValue::Root(7) => MoSms,
            EnumValue::Root(8) => MpsPriorityAccess,
            EnumValue::Root(_) => McsPriorityAccess,
            EnumValue::Extended(n) => Unrecognized(n),
        })
    }
}

/// UEContextRequest - the RAN asks the AMF to set up a UE context
/// ASN.1: UEContextRequest ::= ENUMERATED { requested, ... }
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UeContextRequest {
    Requested,
    Unrecognized(u64),
}

impl UeContextRequest {
    pub const CONSTRAINT: Constraint = Constraint::extensible(0, 0);
}

impl AperEncode for UeContextRequest {
    fn encode_aper(&self, encoder: &mut AperEncoder) -> PerResult<()> {
        let value = match self {
            UeContextRequest::Requested => EnumValue::Root(0),
            UeContextRequest::Unrecognized(n) => EnumValue::Extended(*n),
        };
        encoder.encode_enumerated(value, &Self::CONSTRAINT)
    }
}

impl AperDecode for UeContextRequest {
    fn decode_aper(decoder: &mut AperDecoder) -> PerResult<Self> {
        Ok(match decoder.decode_enumerated(&Self::CONSTRAINT)? {
            EnumValue::Root(_) => UeContextRequest::Requested,
            EnumValue::Extended(n) => UeContextRequest::Unrecognized(n),
        })
    }
}

/// RelativeAMFCapacity - load-balancing weight
/// ASN.1: RelativeAMFCapacity ::= INTEGER (0..255)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RelativeAmfCapacity(pub u8);

impl RelativeAmfCapacity {
    pub const CONSTRAINT: Constraint = Constraint::new(0, 255);
}

impl AperEncode for RelativeAmfCapacity {
    fn encode_aper(&self, encoder: &mut AperEncoder) -> PerResult<()> {
        encoder.encode_constrained_whole_number(self.0 as i64, &Self::CONSTRAINT)
    }
}

impl AperDecode for RelativeAmfCapacity {
    fn decode_aper(decoder: &mut AperDecoder) -> PerResult<Self> {
        let value = decoder.decode_constrained_whole_number(&Self::CONSTRAINT)?;
        Ok(RelativeAmfCapacity(value as u8))
    }
}

// ============================================================================
// GUAMI
// ============================================================================

/// GUAMI - Globally Unique AMF Identifier. All fields are fixed-width, so
/// the encoding is a fixed 48 bits of content with no length determinant.
/// ASN.1: GUAMI ::= SEQUENCE { pLMNIdentity, aMFRegionID BIT STRING (SIZE (8)),
///        aMFSetID BIT STRING (SIZE (10)), aMFPointer BIT STRING (SIZE (6)),
///        iE-Extensions OPTIONAL, ... }
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Guami {
    pub plmn_identity: PlmnIdentity,
    pub amf_region_id: u8,
    pub amf_set_id: u16,
    pub amf_pointer: u8,
    pub ie_exts: Option<ProtocolExtensionContainer>,
    pub ext_additions: ExtensionAdditions,
}

impl Guami {
    pub const REGION_ID_BITS: usize = 8;
    pub const SET_ID_BITS: usize = 10;
    pub const POINTER_BITS: usize = 6;

    pub fn new(plmn: [u8; 3], region_id: u8, set_id: u16, pointer: u8) -> Self {
        Self {
            plmn_identity: PlmnIdentity(plmn),
            amf_region_id: region_id,
            amf_set_id: set_id,
            amf_pointer: pointer,
            ie_exts: None,
            ext_additions: ExtensionAdditions::default(),
        }
    }
}

impl AperEncode for Guami {
    fn encode_aper(&self, encoder: &mut AperEncoder) -> PerResult<()> {
        encode_seq_preamble(encoder, &self.ext_additions);
        encoder.write_bit(self.ie_exts.is_some());
        self.plmn_identity.encode_aper(encoder)?;
        encoder.write_bits(self.amf_region_id as u64, Self::REGION_ID_BITS)?;
        encoder.write_bits(self.amf_set_id as u64, Self::SET_ID_BITS)?;
        encoder.write_bits(self.amf_pointer as u64, Self::POINTER_BITS)?;
        encode_ie_exts(encoder, &self.ie_exts)?;
        if !self.ext_additions.is_empty() {
            self.ext_additions.encode(encoder)?;
        }
        Ok(())
    }
}

impl AperDecode for Guami {
    fn decode_aper(decoder: &mut AperDecoder) -> PerResult<Self> {
        let marker = decoder.read_bit()?;
        let exts_present = decoder.read_bit()?;
        let plmn_identity = PlmnIdentity::decode_aper(decoder)?;
        let amf_region_id = decoder.read_bits(Self::REGION_ID_BITS)? as u8;
        let amf_set_id = decoder.read_bits(Self::SET_ID_BITS)? as u16;
        let amf_pointer = decoder.read_bits(Self::POINTER_BITS)? as u8;
        let ie_exts = decode_ie_exts(decoder, exts_present)?;
        let ext_additions = decode_seq_additions(decoder, marker)?;
        Ok(Self { plmn_identity, amf_region_id, amf_set_id, amf_pointer, ie_exts, ext_additions })
    }
}

/// ServedGUAMIItem - one GUAMI an AMF serves
/// ASN.1: ServedGUAMIItem ::= SEQUENCE { gUAMI, backupAMFName OPTIONAL, iE-Extensions OPTIONAL, ... }
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServedGuamiItem {
    pub guami: Guami,
    pub backup_amf_name: Option<AmfName>,
    pub ie_exts: Option<ProtocolExtensionContainer>,
    pub ext_additions: ExtensionAdditions,
}

impl ServedGuamiItem {
    pub const LIST_SIZE_MAX: usize = 256;

    pub fn new(guami: Guami) -> Self {
        Self {
            guami,
            backup_amf_name: None,
            ie_exts: None,
            ext_additions: ExtensionAdditions::default(),
        }
    }
}

impl AperEncode for ServedGuamiItem {
    fn encode_aper(&self, encoder: &mut AperEncoder) -> PerResult<()> {
        encode_seq_preamble(encoder, &self.ext_additions);
        encoder.write_bit(self.backup_amf_name.is_some());
        encoder.write_bit(self.ie_exts.is_some());
        self.guami.encode_aper(encoder)?;
        if let Some(name) = &self.backup_amf_name {
            name.encode_aper(encoder)?;
        }
        encode_ie_exts(encoder, &self.ie_exts)?;
        if !self.ext_additions.is_empty() {
            self.ext_additions.encode(encoder)?;
        }
        Ok(())
    }
}

impl AperDecode for ServedGuamiItem {
    fn decode_aper(decoder: &mut AperDecoder) -> PerResult<Self> {
        let marker = decoder.read_bit()?;
        let name_present = decoder.read_bit()?;
        let exts_present = decoder.read_bit()?;
        let guami = Guami::decode_aper(decoder)?;
        let backup_amf_name =
            if name_present { Some(AmfName::decode_aper(decoder)?) } else { None };
        let ie_exts = decode_ie_exts(decoder, exts_present)?;
        let ext_additions = decode_seq_additions(decoder, marker)?;
        Ok(Self { guami, backup_amf_name, ie_exts, ext_additions })
    }
}

// ============================================================================
// Slice support
// ============================================================================

/// S-NSSAI - network slice selector
/// ASN.1: S-NSSAI ::= SEQUENCE { sST OCTET STRING (SIZE (1)),
///        sD OCTET STRING (SIZE (3)) OPTIONAL, iE-Extensions OPTIONAL, ... }
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SNssai {
    pub sst: u8,
    pub sd: Option<[u8; 3]>,
    pub ie_exts: Option<ProtocolExtensionContainer>,
    pub ext_additions: ExtensionAdditions,
}

impl SNssai {
    pub fn new(sst: u8) -> Self {
        Self { sst, sd: None, ie_exts: None, ext_additions: ExtensionAdditions::default() }
    }

    pub fn with_sd(sst: u8, sd: [u8; 3]) -> Self {
        Self { sst, sd: Some(sd), ie_exts: None, ext_additions: ExtensionAdditions::default() }
    }
}

impl AperEncode for SNssai {
    fn encode_aper(&self, encoder: &mut AperEncoder) -> PerResult<()> {
        encode_seq_preamble(encoder, &self.ext_additions);
        encoder.write_bit(self.sd.is_some());
        encoder.write_bit(self.ie_exts.is_some());
        encoder.encode_octet_string(&[self.sst], Some(1), Some(1), false)?;
        if let Some(sd) = &self.sd {
            encoder.encode_octet_string(sd, Some(3), Some(3), false)?;
        }
        encode_ie_exts(encoder, &self.ie_exts)?;
        if !self.ext_additions.is_empty() {
            self.ext_additions.encode(encoder)?;
        }
        Ok(())
    }
}

impl AperDecode for SNssai {
    fn decode_aper(decoder: &mut AperDecoder) -> PerResult<Self> {
        let marker = decoder.read_bit()?;
        let sd_present = decoder.read_bit()?;
        let exts_present = decoder.read_bit()?;
        let sst = decoder.decode_octet_string(Some(1), Some(1), false)?[0];
        let sd = if sd_present {
            let data = decoder.decode_octet_string(Some(3), Some(3), false)?;
            let mut arr = [0u8; 3];
            arr.copy_from_slice(&data);
            Some(arr)
        } else {
            None
        };
        let ie_exts = decode_ie_exts(decoder, exts_present)?;
        let ext_additions = decode_seq_additions(decoder, marker)?;
        Ok(Self { sst, sd, ie_exts, ext_additions })
    }
}

/// SliceSupportItem - one supported S-NSSAI
/// ASN.1: SliceSupportItem ::= SEQUENCE { s-NSSAI, iE-Extensions OPTIONAL, ... }
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SliceSupportItem {
    pub s_nssai: SNssai,
    pub ie_exts: Option<ProtocolExtensionContainer>,
    pub ext_additions: ExtensionAdditions,
}

impl SliceSupportItem {
    pub const LIST_SIZE_MAX: usize = 1024;

    pub fn new(s_nssai: SNssai) -> Self {
        Self { s_nssai, ie_exts: None, ext_additions: ExtensionAdditions::default() }
    }
}

impl AperEncode for SliceSupportItem {
    fn encode_aper(&self, encoder: &mut AperEncoder) -> PerResult<()> {
        encode_seq_preamble(encoder, &self.ext_additions);
        encoder.write_bit(self.ie_exts.is_some());
        self.s_nssai.encode_aper(encoder)?;
        encode_ie_exts(encoder, &self.ie_exts)?;
        if !self.ext_additions.is_empty() {
            self.ext_additions.encode(encoder)?;
        }
        Ok(())
    }
}

impl AperDecode for SliceSupportItem {
    fn decode_aper(decoder: &mut AperDecoder) -> PerResult<Self> {
        let marker = decoder.read_bit()?;
        let exts_present = decoder.read_bit()?;
        let s_nssai = SNssai::decode_aper(decoder)?;
        let ie_exts = decode_ie_exts(decoder, exts_present)?;
        let ext_additions = decode_seq_additions(decoder, marker)?;
        Ok(Self { s_nssai, ie_exts, ext_additions })
    }
}

/// PLMNSupportItem - slices supported for one PLMN
/// ASN.1: PLMNSupportItem ::= SEQUENCE { pLMNIdentity, sliceSupportList, iE-Extensions OPTIONAL, ... }
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlmnSupportItem {
    pub plmn_identity: PlmnIdentity,
    pub slice_support_list: Vec<SliceSupportItem>,
    pub ie_exts: Option<ProtocolExtensionContainer>,
    pub ext_additions: ExtensionAdditions,
}

impl PlmnSupportItem {
    pub const LIST_SIZE_MAX: usize = 12;

    pub fn new(plmn_identity: PlmnIdentity, slices: Vec<SliceSupportItem>) -> Self {
        Self {
            plmn_identity,
            slice_support_list: slices,
            ie_exts: None,
            ext_additions: ExtensionAdditions::default(),
        }
    }
}

impl AperEncode for PlmnSupportItem {
    fn encode_aper(&self, encoder: &mut AperEncoder) -> PerResult<()> {
        encode_seq_preamble(encoder, &self.ext_additions);
        encoder.write_bit(self.ie_exts.is_some());
        self.plmn_identity.encode_aper(encoder)?;
        encode_seq_of(
            encoder,
            &self.slice_support_list,
            Some(1),
            Some(SliceSupportItem::LIST_SIZE_MAX),
            false,
        )?;
        encode_ie_exts(encoder, &self.ie_exts)?;
        if !self.ext_additions.is_empty() {
            self.ext_additions.encode(encoder)?;
        }
        Ok(())
    }
}

impl AperDecode for PlmnSupportItem {
    fn decode_aper(decoder: &mut AperDecoder) -> PerResult<Self> {
        let marker = decoder.read_bit()?;
        let exts_present = decoder.read_bit()?;
        let plmn_identity = PlmnIdentity::decode_aper(decoder)?;
        let slice_support_list =
            decode_seq_of(decoder, Some(1), Some(SliceSupportItem::LIST_SIZE_MAX), false)?;
        let ie_exts = decode_ie_exts(decoder, exts_present)?;
        let ext_additions = decode_seq_additions(decoder, marker)?;
        Ok(Self { plmn_identity, slice_support_list, ie_exts, ext_additions })
    }
}

// ============================================================================
// Supported TAs
// ============================================================================

/// BroadcastPLMNItem - slices broadcast for one PLMN in a tracking area
/// ASN.1: BroadcastPLMNItem ::= SEQUENCE { pLMNIdentity, tAISliceSupportList, iE-Extensions OPTIONAL, ... }
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BroadcastPlmnItem {
    pub plmn_identity: PlmnIdentity,
    pub tai_slice_support_list: Vec<SliceSupportItem>,
    pub ie_exts: Option<ProtocolExtensionContainer>,
    pub ext_additions: ExtensionAdditions,
}

impl BroadcastPlmnItem {
    pub const LIST_SIZE_MAX: usize = 12;

    pub fn new(plmn_identity: PlmnIdentity, slices: Vec<SliceSupportItem>) -> Self {
        Self {
            plmn_identity,
            tai_slice_support_list: slices,
            ie_exts: None,
            ext_additions: ExtensionAdditions::default(),
        }
    }
}

impl AperEncode for BroadcastPlmnItem {
    fn encode_aper(&self, encoder: &mut AperEncoder) -> PerResult<()> {
        encode_seq_preamble(encoder, &self.ext_additions);
        encoder.write_bit(self.ie_exts.is_some());
        self.plmn_identity.encode_aper(encoder)?;
        encode_seq_of(
            encoder,
            &self.tai_slice_support_list,
            Some(1),
            Some(SliceSupportItem::LIST_SIZE_MAX),
            false,
        )?;
        encode_ie_exts(encoder, &self.ie_exts)?;
        if !self.ext_additions.is_empty() {
            self.ext_additions.encode(encoder)?;
        }
        Ok(())
    }
}

impl AperDecode for BroadcastPlmnItem {
    fn decode_aper(decoder: &mut AperDecoder) -> PerResult<Self> {
        let marker = decoder.read_bit()?;
        let exts_present = decoder.read_bit()?;
        let plmn_identity = PlmnIdentity::decode_aper(decoder)?;
        let tai_slice_support_list =
            decode_seq_of(decoder, Some(1), Some(SliceSupportItem::LIST_SIZE_MAX), false)?;
        let ie_exts = decode_ie_exts(decoder, exts_present)?;
        let ext_additions = decode_seq_additions(decoder, marker)?;
        Ok(Self { plmn_identity, tai_slice_support_list, ie_exts, ext_additions })
    }
}

/// SupportedTAItem - one tracking area the RAN node serves
/// ASN.1: SupportedTAItem ::= SEQUENCE { tAC, broadcastPLMNList, iE-Extensions OPTIONAL, ... }
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupportedTaItem {
    pub tac: Tac,
    pub broadcast_plmn_list: Vec<BroadcastPlmnItem>,
    pub ie_exts: Option<ProtocolExtensionContainer>,
    pub ext_additions: ExtensionAdditions,
}

impl SupportedTaItem {
    pub const LIST_SIZE_MAX: usize = 256;

    pub fn new(tac: Tac, broadcast: Vec<BroadcastPlmnItem>) -> Self {
        Self {
            tac,
            broadcast_plmn_list: broadcast,
            ie_exts: None,
            ext_additions: ExtensionAdditions::default(),
        }
    }
}

impl AperEncode for SupportedTaItem {
    fn encode_aper(&self, encoder: &mut AperEncoder) -> PerResult<()> {
        encode_seq_preamble(encoder, &self.ext_additions);
        encoder.write_bit(self.ie_exts.is_some());
        self.tac.encode_aper(encoder)?;
        encode_seq_of(
            encoder,
            &self.broadcast_plmn_list,
            Some(1),
            Some(BroadcastPlmnItem::LIST_SIZE_MAX),
            false,
        )?;
        encode_ie_exts(encoder, &self.ie_exts)?;
        if !self.ext_additions.is_empty() {
            self.ext_additions.encode(encoder)?;
        }
        Ok(())
    }
}

impl AperDecode for SupportedTaItem {
    fn decode_aper(decoder: &mut AperDecoder) -> PerResult<Self> {
        let marker = decoder.read_bit()?;
        let exts_present = decoder.read_bit()?;
        let tac = Tac::decode_aper(decoder)?;
        let broadcast_plmn_list =
            decode_seq_of(decoder, Some(1), Some(BroadcastPlmnItem::LIST_SIZE_MAX), false)?;
        let ie_exts = decode_ie_exts(decoder, exts_present)?;
        let ext_additions = decode_seq_additions(decoder, marker)?;
        Ok(Self { tac, broadcast_plmn_list, ie_exts, ext_additions })
    }
}

// ============================================================================
// Global RAN node identity
// ============================================================================

/// gNB-ID - bounded bit string selecting 22..32 leading bits of the NCI space
/// ASN.1: GNB-ID ::= CHOICE { gNB-ID BIT STRING (SIZE (22..32)), choice-Extensions }
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GnbId {
    GnbId { value: u32, bit_length: u8 },
    ChoiceExtension(UnknownAlternative),
}

impl GnbId {
    pub const BITS_MIN: usize = 22;
    pub const BITS_MAX: usize = 32;

    pub fn new(value: u32, bit_length: u8) -> Self {
        GnbId::GnbId { value, bit_length }
    }
}

impl AperEncode for GnbId {
    fn encode_aper(&self, encoder: &mut AperEncoder) -> PerResult<()> {
        match self {
            GnbId::GnbId { value, bit_length } => {
                encoder.encode_choice_index(0, 1, true)?;
                let len = *bit_length as usize;
                encoder.encode_constrained_length(len, Self::BITS_MIN, Self::BITS_MAX)?;
                encoder.align();
                encoder.write_bits(*value as u64, len)
            }
            GnbId::ChoiceExtension(unknown) => unknown.encode(encoder),
        }
    }
}

impl AperDecode for GnbId {
    fn decode_aper(decoder: &mut AperDecoder) -> PerResult<Self> {
        match decoder.decode_choice_index(1, true)? {
            ChoiceIndex::Root(_) => {
                let len = decoder.decode_constrained_length(Self::BITS_MIN, Self::BITS_MAX)?;
                decoder.align();
                let value = decoder.read_bits(len)? as u32;
                Ok(GnbId::GnbId { value, bit_length: len as u8 })
            }
            ChoiceIndex::Extension(ordinal) => {
                Ok(GnbId::ChoiceExtension(UnknownAlternative::decode(decoder, ordinal)?))
            }
        }
    }
}

/// GlobalGNB-ID
/// ASN.1: GlobalGNB-ID ::= SEQUENCE { pLMNIdentity, gNB-ID, iE-Extensions OPTIONAL, ... }
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalGnbId {
    pub plmn_identity: PlmnIdentity,
    pub gnb_id: GnbId,
    pub ie_exts: Option<ProtocolExtensionContainer>,
    pub ext_additions: ExtensionAdditions,
}

impl GlobalGnbId {
    pub fn new(plmn_identity: PlmnIdentity, gnb_id: GnbId) -> Self {
        Self { plmn_identity, gnb_id, ie_exts: None, ext_additions: ExtensionAdditions::default() }
    }
}

impl AperEncode for GlobalGnbId {
    fn encode_aper(&self, encoder: &mut AperEncoder) -> PerResult<()> {
        encode_seq_preamble(encoder, &self.ext_additions);
        encoder.write_bit(self.ie_exts.is_some());
        self.plmn_identity.encode_aper(encoder)?;
        self.gnb_id.encode_aper(encoder)?;
        encode_ie_exts(encoder, &self.ie_exts)?;
        if !self.ext_additions.is_empty() {
            self.ext_additions.encode(encoder)?;
        }
        Ok(())
    }
}

impl AperDecode for GlobalGnbId {
    fn decode_aper(decoder: &mut AperDecoder) -> PerResult<Self> {
        let marker = decoder.read_bit()?;
        let exts_present = decoder.read_bit()?;
        let plmn_identity = PlmnIdentity::decode_aper(decoder)?;
        let gnb_id = GnbId::decode_aper(decoder)?;
        let ie_exts = decode_ie_exts(decoder, exts_present)?;
        let ext_additions = decode_seq_additions(decoder, marker)?;
        Ok(Self { plmn_identity, gnb_id, ie_exts, ext_additions })
    }
}

/// GlobalRANNodeID
/// ASN.1: GlobalRANNodeID ::= CHOICE { globalGNB-ID, globalNgENB-ID, globalN3IWF-ID, choice-Extensions }
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GlobalRanNodeId {
    GlobalGnbId(GlobalGnbId),
    // TODO: globalNgENB-ID and globalN3IWF-ID root alternatives, needed
    // once ng-eNB / N3IWF peers are in scope; decoding them is refused
    // until then.
    ChoiceExtension(UnknownAlternative),
}

impl GlobalRanNodeId {
    pub const NUM_ALTERNATIVES: usize = 3;
    pub const EXTENSIBLE: bool = true;

    /// The gNB identity.
    ///
    /// # Panics
    /// Panics when another alternative is active.
    pub fn global_gnb_id(&self) -> &GlobalGnbId {
        match self {
            GlobalRanNodeId::GlobalGnbId(v) => v,
            other => panic!("global ran node id: global_gnb_id accessed but {other:?} is active"),
        }
    }
}

impl AperEncode for GlobalRanNodeId {
    fn encode_aper(&self, encoder: &mut AperEncoder) -> PerResult<()> {
        match self {
            GlobalRanNodeId::GlobalGnbId(v) => {
                encoder.encode_choice_index(0, Self::NUM_ALTERNATIVES, Self::EXTENSIBLE)?;
                v.encode_aper(encoder)
            }
            GlobalRanNodeId::ChoiceExtension(unknown) => unknown.encode(encoder),
        }
    }
}

impl AperDecode for GlobalRanNodeId {
    fn decode_aper(decoder: &mut AperDecoder) -> PerResult<Self> {
        match decoder.decode_choice_index(Self::NUM_ALTERNATIVES, Self::EXTENSIBLE)? {
            ChoiceIndex::Root(0) => {
                Ok(GlobalRanNodeId::GlobalGnbId(GlobalGnbId::decode_aper(decoder)?))
            }
            ChoiceIndex::Root(index) => Err(crate::per::PerError::InvalidChoiceIndex {
                index,
                max: 0,
            }),
            ChoiceIndex::Extension(ordinal) => {
                Ok(GlobalRanNodeId::ChoiceExtension(UnknownAlternative::decode(decoder, ordinal)?))
            }
        }
    }
}

// ============================================================================
// User location
// ============================================================================

/// TAI - tracking area identity
/// ASN.1: TAI ::= SEQUENCE { pLMNIdentity, tAC, iE-Extensions OPTIONAL, ... }
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tai {
    pub plmn_identity: PlmnIdentity,
    pub tac: Tac,
    pub ie_exts: Option<ProtocolExtensionContainer>,
    pub ext_additions: ExtensionAdditions,
}

impl Tai {
    pub fn new(plmn_identity: PlmnIdentity, tac: Tac) -> Self {
        Self { plmn_identity, tac, ie_exts: None, ext_additions: ExtensionAdditions::default() }
    }
}

impl AperEncode for Tai {
    fn encode_aper(&self, encoder: &mut AperEncoder) -> PerResult<()> {
        encode_seq_preamble(encoder, &self.ext_additions);
        encoder.write_bit(self.ie_exts.is_some());
        self.plmn_identity.encode_aper(encoder)?;
        self.tac.encode_aper(encoder)?;
        encode_ie_exts(encoder, &self.ie_exts)?;
        if !self.ext_additions.is_empty() {
            self.ext_additions.encode(encoder)?;
        }
        Ok(())
    }
}

impl AperDecode for Tai {
    fn decode_aper(decoder: &mut AperDecoder) -> PerResult<Self> {
        let marker = decoder.read_bit()?;
        let exts_present = decoder.read_bit()?;
        let plmn_identity = PlmnIdentity::decode_aper(decoder)?;
        let tac = Tac::decode_aper(decoder)?;
        let ie_exts = decode_ie_exts(decoder, exts_present)?;
        let ext_additions = decode_seq_additions(decoder, marker)?;
        Ok(Self { plmn_identity, tac, ie_exts, ext_additions })
    }
}

/// NR-CGI - NR cell global identity (36-bit cell identity)
/// ASN.1: NR-CGI ::= SEQUENCE { pLMNIdentity, nRCellIdentity BIT STRING (SIZE (36)), iE-Extensions OPTIONAL, ... }
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NrCgi {
    pub plmn_identity: PlmnIdentity,
    pub nr_cell_identity: u64,
    pub ie_exts: Option<ProtocolExtensionContainer>,
    pub ext_additions: ExtensionAdditions,
}

impl NrCgi {
    pub const CELL_IDENTITY_BITS: usize = 36;

    pub fn new(plmn_identity: PlmnIdentity, nr_cell_identity: u64) -> Self {
        Self {
            plmn_identity,
            nr_cell_identity,
            ie_exts: None,
            ext_additions: ExtensionAdditions::default(),
        }
    }
}

impl AperEncode for NrCgi {
    fn encode_aper(&self, encoder: &mut AperEncoder) -> PerResult<()> {
        encode_seq_preamble(encoder, &self.ext_additions);
        encoder.write_bit(self.ie_exts.is_some());
        self.plmn_identity.encode_aper(encoder)?;
        // Fixed bit string wider than 16 bits: contents are octet-aligned
        encoder.align();
        encoder.write_bits(self.nr_cell_identity, Self::CELL_IDENTITY_BITS)?;
        encode_ie_exts(encoder, &self.ie_exts)?;
        if !self.ext_additions.is_empty() {
            self.ext_additions.encode(encoder)?;
        }
        Ok(())
    }
}

impl AperDecode for NrCgi {
    fn decode_aper(decoder: &mut AperDecoder) -> PerResult<Self> {
        let marker = decoder.read_bit()?;
        let exts_present = decoder.read_bit()?;
        let plmn_identity = PlmnIdentity::decode_aper(decoder)?;
        decoder.align();
        let nr_cell_identity = decoder.read_bits(Self::CELL_IDENTITY_BITS)?;
        let ie_exts = decode_ie_exts(decoder, exts_present)?;
        let ext_additions = decode_seq_additions(decoder, marker)?;
        Ok(Self { plmn_identity, nr_cell_identity, ie_exts, ext_additions })
    }
}

/// UserLocationInformationNR
/// ASN.1: UserLocationInformationNR ::= SEQUENCE { nR-CGI, tAI, timeStamp OPTIONAL, iE-Extensions OPTIONAL, ... }
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserLocationInformationNr {
    pub nr_cgi: NrCgi,
    pub tai: Tai,
    pub time_stamp: Option<[u8; 4]>,
    pub ie_exts: Option<ProtocolExtensionContainer>,
    pub ext_additions: ExtensionAdditions,
}

impl UserLocationInformationNr {
    pub fn new(nr_cgi: NrCgi, tai: Tai) -> Self {
        Self {
            nr_cgi,
            tai,
            time_stamp: None,
            ie_exts: None,
            ext_additions: ExtensionAdditions::default(),
        }
    }
}

impl AperEncode for UserLocationInformationNr {
    fn encode_aper(&self, encoder: &mut AperEncoder) -> PerResult<()> {
        encode_seq_preamble(encoder, &self.ext_additions);
        encoder.write_bit(self.time_stamp.is_some());
        encoder.write_bit(self.ie_exts.is_some());
        self.nr_cgi.encode_aper(encoder)?;
        self.tai.encode_aper(encoder)?;
        if let Some(stamp) = &self.time_stamp {
            encoder.encode_octet_string(stamp, Some(4), Some(4), false)?;
        }
        encode_ie_exts(encoder, &self.ie_exts)?;
        if !self.ext_additions.is_empty() {
            self.ext_additions.encode(encoder)?;
        }
        Ok(())
    }
}

impl AperDecode for UserLocationInformationNr {
    fn decode_aper(decoder: &mut AperDecoder) -> PerResult<Self> {
        let marker = decoder.read_bit()?;
        let stamp_present = decoder.read_bit()?;
        let exts_present = decoder.read_bit()?;
        let nr_cgi = NrCgi::decode_aper(decoder)?;
        let tai = Tai::decode_aper(decoder)?;
        let time_stamp = if stamp_present {
            let data = decoder.decode_octet_string(Some(4), Some(4), false)?;
            let mut arr = [0u8; 4];
            arr.copy_from_slice(&data);
            Some(arr)
        } else {
            None
        };
        let ie_exts = decode_ie_exts(decoder, exts_present)?;
        let ext_additions = decode_seq_additions(decoder, marker)?;
        Ok(Self { nr_cgi, tai, time_stamp, ie_exts, ext_additions })
    }
}

/// UserLocationInformation
/// ASN.1: UserLocationInformation ::= CHOICE { userLocationInformationEUTRA,
///        userLocationInformationNR, userLocationInformationN3IWF, choice-Extensions }
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserLocationInformation {
    // EUTRA and N3IWF root alternatives are refused on decode; NR is the
    // alternative the supported procedures carry.
    Nr(UserLocationInformationNr),
    ChoiceExtension(UnknownAlternative),
}

impl UserLocationInformation {
    pub const NUM_ALTERNATIVES: usize = 3;
    pub const EXTENSIBLE: bool = true;
    const NR_INDEX: usize = 1;
}

impl AperEncode for UserLocationInformation {
    fn encode_aper(&self, encoder: &mut AperEncoder) -> PerResult<()> {
        match self {
            UserLocationInformation::Nr(v) => {
                encoder.encode_choice_index(
                    Self::NR_INDEX,
                    Self::NUM_ALTERNATIVES,
                    Self::EXTENSIBLE,
                )?;
                v.encode_aper(encoder)
            }
            UserLocationInformation::ChoiceExtension(unknown) => unknown.encode(encoder),
        }
    }
}

impl AperDecode for UserLocationInformation {
    fn decode_aper(decoder: &mut AperDecoder) -> PerResult<Self> {
        match decoder.decode_choice_index(Self::NUM_ALTERNATIVES, Self::EXTENSIBLE)? {
            ChoiceIndex::Root(Self::NR_INDEX) => {
                Ok(UserLocationInformation::Nr(UserLocationInformationNr::decode_aper(decoder)?))
            }
            ChoiceIndex::Root(index) => {
                Err(crate::per::PerError::InvalidChoiceIndex { index, max: Self::NR_INDEX })
            }
            ChoiceIndex::Extension(ordinal) => Ok(UserLocationInformation::ChoiceExtension(
                UnknownAlternative::decode(decoder, ordinal)?,
            )),
        }
    }
}

// ============================================================================
// Criticality diagnostics
// ============================================================================

/// TypeOfError
/// ASN.1: TypeOfError ::= ENUMERATED { not-understood, missing, ... }
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeOfError {
    NotUnderstood,
    Missing,
    Unrecognized(u64),
}

impl TypeOfError {
    pub const CONSTRAINT: Constraint = Constraint::extensible(0, 1);
}

impl AperEncode for TypeOfError {
    fn encode_aper(&self, encoder: &mut AperEncoder) -> PerResult<()> {
        let value = match self {
            TypeOfError::NotUnderstood => EnumValue::Root(0),
            TypeOfError::Missing => EnumValue::Root(1),
            TypeOfError::Unrecognized(n) => EnumValue::Extended(*n),
        };
        encoder.encode_enumerated(value, &Self::CONSTRAINT)
    }
}

impl AperDecode for TypeOfError {
    fn decode_aper(decoder: &mut AperDecoder) -> PerResult<Self> {
        Ok(match decoder.decode_enumerated(&Self::CONSTRAINT)? {
            EnumValue::Root(0) => TypeOfError::NotUnderstood,
            EnumValue::Root(_) => TypeOfError::Missing,
            EnumValue::Extended(n) => TypeOfError::Unrecognized(n),
        })
    }
}

/// CriticalityDiagnostics-IE-Item - one IE the receiver could not process
/// ASN.1: CriticalityDiagnostics-IE-Item ::= SEQUENCE { iECriticality, iE-ID, typeOfError, iE-Extensions OPTIONAL, ... }
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CriticalityDiagnosticsIeItem {
    pub ie_criticality: Criticality,
    pub ie_id: ProtocolIeId,
    pub type_of_error: TypeOfError,
    pub ie_exts: Option<ProtocolExtensionContainer>,
    pub ext_additions: ExtensionAdditions,
}

impl CriticalityDiagnosticsIeItem {
    pub const LIST_SIZE_MAX: usize = 256;

    pub fn new(criticality: Criticality, id: ProtocolIeId, error: TypeOfError) -> Self {
        Self {
            ie_criticality: criticality,
            ie_id: id,
            type_of_error: error,
            ie_exts: None,
            ext_additions: ExtensionAdditions::default(),
        }
    }
}

impl AperEncode for CriticalityDiagnosticsIeItem {
    fn encode_aper(&self, encoder: &mut AperEncoder) -> PerResult<()> {
        encode_seq_preamble(encoder, &self.ext_additions);
        encoder.write_bit(self.ie_exts.is_some());
        self.ie_criticality.encode_aper(encoder)?;
        self.ie_id.encode_aper(encoder)?;
        self.type_of_error.encode_aper(encoder)?;
        encode_ie_exts(encoder, &self.ie_exts)?;
        if !self.ext_additions.is_empty() {
            self.ext_additions.encode(encoder)?;
        }
        Ok(())
    }
}

impl AperDecode for CriticalityDiagnosticsIeItem {
    fn decode_aper(decoder: &mut AperDecoder) -> PerResult<Self> {
        let marker = decoder.read_bit()?;
        let exts_present = decoder.read_bit()?;
        let ie_criticality = Criticality::decode_aper(decoder)?;
        let ie_id = ProtocolIeId::decode_aper(decoder)?;
        let type_of_error = TypeOfError::decode_aper(decoder)?;
        let ie_exts = decode_ie_exts(decoder, exts_present)?;
        let ext_additions = decode_seq_additions(decoder, marker)?;
        Ok(Self { ie_criticality, ie_id, type_of_error, ie_exts, ext_additions })
    }
}

/// CriticalityDiagnostics - what the receiver could not process and why
/// ASN.1: CriticalityDiagnostics ::= SEQUENCE { procedureCode OPTIONAL,
///        triggeringMessage OPTIONAL, procedureCriticality OPTIONAL,
///        iEsCriticalityDiagnostics OPTIONAL, iE-Extensions OPTIONAL, ... }
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CriticalityDiagnostics {
    pub procedure_code: Option<ProcedureCode>,
    pub triggering_message: Option<TriggeringMessage>,
    pub procedure_criticality: Option<Criticality>,
    pub ies_criticality_diagnostics: Vec<CriticalityDiagnosticsIeItem>,
    pub ie_exts: Option<ProtocolExtensionContainer>,
    pub ext_additions: ExtensionAdditions,
}

impl AperEncode for CriticalityDiagnostics {
    fn encode_aper(&self, encoder: &mut AperEncoder) -> PerResult<()> {
        encode_seq_preamble(encoder, &self.ext_additions);
        encoder.write_bit(self.procedure_code.is_some());
        encoder.write_bit(self.triggering_message.is_some());
        encoder.write_bit(self.procedure_criticality.is_some());
        encoder.write_bit(!self.ies_criticality_diagnostics.is_empty());
        encoder.write_bit(self.ie_exts.is_some());
        if let Some(code) = &self.procedure_code {
            code.encode_aper(encoder)?;
        }
        if let Some(msg) = &self.triggering_message {
            msg.encode_aper(encoder)?;
        }
        if let Some(crit) = &self.procedure_criticality {
            crit.encode_aper(encoder)?;
        }
        if !self.ies_criticality_diagnostics.is_empty() {
            encode_seq_of(
                encoder,
                &self.ies_criticality_diagnostics,
                Some(1),
                Some(CriticalityDiagnosticsIeItem::LIST_SIZE_MAX),
                false,
            )?;
        }
        encode_ie_exts(encoder, &self.ie_exts)?;
        if !self.ext_additions.is_empty() {
            self.ext_additions.encode(encoder)?;
        }
        Ok(())
    }
}

impl AperDecode for CriticalityDiagnostics {
    fn decode_aper(decoder: &mut AperDecoder) -> PerResult<Self> {
        let marker = decoder.read_bit()?;
        let code_present = decoder.read_bit()?;
        let msg_present = decoder.read_bit()?;
        let crit_present = decoder.read_bit()?;
        let list_present = decoder.read_bit()?;
        let exts_present = decoder.read_bit()?;
        let procedure_code =
            if code_present { Some(ProcedureCode::decode_aper(decoder)?) } else { None };
        let triggering_message =
            if msg_present { Some(TriggeringMessage::decode_aper(decoder)?) } else { None };
        let procedure_criticality =
            if crit_present { Some(Criticality::decode_aper(decoder)?) } else { None };
        let ies_criticality_diagnostics = if list_present {
            decode_seq_of(
                decoder,
                Some(1),
                Some(CriticalityDiagnosticsIeItem::LIST_SIZE_MAX),
                false,
            )?
        } else {
            Vec::new()
        };
        let ie_exts = decode_ie_exts(decoder, exts_present)?;
        let ext_additions = decode_seq_additions(decoder, marker)?;
        Ok(Self {
            procedure_code,
            triggering_message,
            procedure_criticality,
            ies_criticality_diagnostics,
            ie_exts,
            ext_additions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip<T: AperEncode + AperDecode + PartialEq + core::fmt::Debug>(value: &T) {
        let mut encoder = AperEncoder::new();
        value.encode_aper(&mut encoder).unwrap();
        let bytes = encoder.into_bytes();
        let mut decoder = AperDecoder::new(&bytes);
        let decoded = T::decode_aper(&mut decoder).unwrap();
        assert_eq!(&decoded, value);
    }

    #[test]
    fn test_amf_ue_ngap_id_roundtrip() {
        roundtrip(&AmfUeNgapId(12345678));
        roundtrip(&AmfUeNgapId(0));
        roundtrip(&AmfUeNgapId(1099511627775));
    }

    #[test]
    fn test_ran_ue_ngap_id_roundtrip() {
        roundtrip(&RanUeNgapId(0xDEADBEEF));
    }

    #[test]
    fn test_guami_fixed_width_encoding() {
        // PLMN (3 octets) + 8 + 10 + 6 bits of identifiers: with the two
        // preamble bits this is always seven octets, no length determinant
        let guami = Guami::new([0x21, 0xF3, 0x54], 0xA5, 0x2C7, 0x1B);
        let mut encoder = AperEncoder::new();
        guami.encode_aper(&mut encoder).unwrap();
        assert_eq!(encoder.bit_position(), 2 + 6 + 24 + 8 + 10 + 6);
        let bytes = encoder.into_bytes();

        let mut decoder = AperDecoder::new(&bytes);
        let decoded = Guami::decode_aper(&mut decoder).unwrap();
        assert_eq!(decoded.plmn_identity.0, [0x21, 0xF3, 0x54]);
        assert_eq!(decoded.amf_region_id, 0xA5);
        assert_eq!(decoded.amf_set_id, 0x2C7);
        assert_eq!(decoded.amf_pointer, 0x1B);
    }

    #[test]
    fn test_served_guami_item_roundtrip() {
        let mut item = ServedGuamiItem::new(Guami::new([0x00, 0xF1, 0x10], 2, 1, 0));
        item.backup_amf_name = Some(AmfName::from("backup-amf"));
        roundtrip(&item);
    }

    #[test]
    fn test_snssai_optional_sd() {
        roundtrip(&SNssai::new(1));
        roundtrip(&SNssai::with_sd(1, [0x00, 0x00, 0x7B]));
    }

    #[test]
    fn test_supported_ta_item_roundtrip() {
        let item = SupportedTaItem::new(
            Tac::from_u24(0x75),
            vec![BroadcastPlmnItem::new(
                PlmnIdentity([0x00, 0xF1, 0x10]),
                vec![SliceSupportItem::new(SNssai::new(1))],
            )],
        );
        roundtrip(&item);
    }

    #[test]
    fn test_global_ran_node_id_roundtrip() {
        let id = GlobalRanNodeId::GlobalGnbId(GlobalGnbId::new(
            PlmnIdentity([0x00, 0xF1, 0x10]),
            GnbId::new(1, 32),
        ));
        roundtrip(&id);
        assert_eq!(id.global_gnb_id().plmn_identity.0, [0x00, 0xF1, 0x10]);
    }

    #[test]
    fn test_gnb_id_short_length_roundtrip() {
        roundtrip(&GnbId::new(0x3FFFFF, 22));
    }

    #[test]
    fn test_user_location_information_roundtrip() {
        let location = UserLocationInformation::Nr(UserLocationInformationNr::new(
            NrCgi::new(PlmnIdentity([0x00, 0xF1, 0x10]), 0x123456789),
            Tai::new(PlmnIdentity([0x00, 0xF1, 0x10]), Tac::from_u24(0x75)),
        ));
        roundtrip(&location);
    }

    #[test]
    fn test_ue_ngap_ids_roundtrip() {
        roundtrip(&UeNgapIds::Pair(UeNgapIdPair::new(1000, 500)));
        roundtrip(&UeNgapIds::AmfUeNgapId(AmfUeNgapId(42)));
    }

    #[test]
    fn test_criticality_diagnostics_roundtrip() {
        let diag = CriticalityDiagnostics {
            procedure_code: Some(ProcedureCode::NG_SETUP),
            triggering_message: Some(TriggeringMessage::InitiatingMessage),
            procedure_criticality: Some(Criticality::Reject),
            ies_criticality_diagnostics: vec![CriticalityDiagnosticsIeItem::new(
                Criticality::Reject,
                ProtocolIeId(9999),
                TypeOfError::NotUnderstood,
            )],
            ie_exts: None,
            ext_additions: ExtensionAdditions::default(),
        };
        roundtrip(&diag);
    }

    #[test]
    fn test_time_to_wait_seconds() {
        assert_eq!(TimeToWait::V20s.seconds(), Some(20));
        assert_eq!(TimeToWait::Unrecognized(9).seconds(), None);
    }

    #[test]
    fn test_plmn_from_mcc_mnc() {
        // MCC 001, MNC 01 => 00 F1 10
        assert_eq!(PlmnIdentity::from_mcc_mnc(1, 1, 2).0, [0x00, 0xF1, 0x10]);
    }
}
