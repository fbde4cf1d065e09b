//! IE and procedure registries (information object sets)
//!
//! Each container kind owns a read-only table mapping numeric IE ids to
//! {criticality, presence, value type}; a second table maps procedure codes
//! to the container kinds of their initiating/successful/unsuccessful
//! messages. The tables are `const` data built alongside the type
//! definitions they serve, never mutated, and safely shared across threads.
//! They are the single seam through which new IEs and procedures are added
//! without touching the generic container codec.

use crate::ngap::cause::Cause;
use crate::ngap::ies::{
    AmfName, AmfUeNgapId, CriticalityDiagnostics, GlobalRanNodeId, NasPdu, PagingDrx,
    PlmnSupportItem, RanNodeName, RanUeNgapId, RelativeAmfCapacity, RrcEstablishmentCause,
    ServedGuamiItem, SupportedTaItem, TimeToWait, UeContextRequest, UeNgapIds,
    UserLocationInformation,
};
use crate::ngap::types::{Criticality, Presence, ProcedureCode, ProtocolIeId};
use crate::open::OpenType;
use crate::per::{AperDecode, AperDecoder, AperEncode, AperEncoder, PerError, PerResult};
use crate::seq::{decode_seq_of, encode_seq_of};

/// Type tag selecting the concrete decoder for an IE value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IeValueKind {
    AmfUeNgapId,
    RanUeNgapId,
    NasPdu,
    Cause,
    TimeToWait,
    RelativeAmfCapacity,
    AmfName,
    RanNodeName,
    PagingDrx,
    GlobalRanNodeId,
    SupportedTaList,
    ServedGuamiList,
    PlmnSupportList,
    UserLocationInformation,
    RrcEstablishmentCause,
    UeContextRequest,
    UeNgapIds,
    CriticalityDiagnostics,
}

/// A decoded IE value: one closed alternative per registered value type,
/// plus an opaque variant for ids no registry in this build knows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IeValue {
    AmfUeNgapId(AmfUeNgapId),
    RanUeNgapId(RanUeNgapId),
    NasPdu(NasPdu),
    Cause(Cause),
    TimeToWait(TimeToWait),
    RelativeAmfCapacity(RelativeAmfCapacity),
    AmfName(AmfName),
    RanNodeName(RanNodeName),
    PagingDrx(PagingDrx),
    GlobalRanNodeId(GlobalRanNodeId),
    SupportedTaList(Vec<SupportedTaItem>),
    ServedGuamiList(Vec<ServedGuamiItem>),
    PlmnSupportList(Vec<PlmnSupportItem>),
    UserLocationInformation(UserLocationInformation),
    RrcEstablishmentCause(RrcEstablishmentCause),
    UeContextRequest(UeContextRequest),
    UeNgapIds(UeNgapIds),
    CriticalityDiagnostics(CriticalityDiagnostics),
    /// Raw octets of a value whose id no registry recognizes
    Unknown(OpenType),
}

impl IeValue {
    fn decode_as(kind: IeValueKind, decoder: &mut AperDecoder) -> PerResult<Self> {
        Ok(match kind {
            IeValueKind::AmfUeNgapId => IeValue::AmfUeNgapId(AmfUeNgapId::decode_aper(decoder)?),
            IeValueKind::RanUeNgapId => IeValue::RanUeNgapId(RanUeNgapId::decode_aper(decoder)?),
            IeValueKind::NasPdu => IeValue::NasPdu(NasPdu::decode_aper(decoder)?),
            IeValueKind::Cause => IeValue::Cause(Cause::decode_aper(decoder)?),
            IeValueKind::TimeToWait => IeValue::TimeToWait(TimeToWait::decode_aper(decoder)?),
            IeValueKind::RelativeAmfCapacity => {
                IeValue::RelativeAmfCapacity(RelativeAmfCapacity::decode_aper(decoder)?)
            }
            IeValueKind::AmfName => IeValue::AmfName(AmfName::decode_aper(decoder)?),
            IeValueKind::RanNodeName => IeValue::RanNodeName(RanNodeName::decode_aper(decoder)?),
            IeValueKind::PagingDrx => IeValue::PagingDrx(PagingDrx::decode_aper(decoder)?),
            IeValueKind::GlobalRanNodeId => {
                IeValue::GlobalRanNodeId(GlobalRanNodeId::decode_aper(decoder)?)
            }
            IeValueKind::SupportedTaList => IeValue::SupportedTaList(decode_seq_of(
                decoder,
                Some(1),
                Some(SupportedTaItem::LIST_SIZE_MAX),
                false,
            )?),
            IeValueKind::ServedGuamiList => IeValue::ServedGuamiList(decode_seq_of(
                decoder,
                Some(1),
                Some(ServedGuamiItem::LIST_SIZE_MAX),
                false,
            )?),
            IeValueKind::PlmnSupportList => IeValue::PlmnSupportList(decode_seq_of(
                decoder,
                Some(1),
                Some(PlmnSupportItem::LIST_SIZE_MAX),
                false,
            )?),
            IeValueKind::UserLocationInformation => {
                IeValue::UserLocationInformation(UserLocationInformation::decode_aper(decoder)?)
            }
            IeValueKind::RrcEstablishmentCause => {
                IeValue::RrcEstablishmentCause(RrcEstablishmentCause::decode_aper(decoder)?)
            }
            IeValueKind::UeContextRequest => {
                IeValue::UeContextRequest(UeContextRequest::decode_aper(decoder)?)
            }
            IeValueKind::UeNgapIds => IeValue::UeNgapIds(UeNgapIds::decode_aper(decoder)?),
            IeValueKind::CriticalityDiagnostics => {
                IeValue::CriticalityDiagnostics(CriticalityDiagnostics::decode_aper(decoder)?)
            }
        })
    }
}

impl AperEncode for IeValue {
    fn encode_aper(&self, encoder: &mut AperEncoder) -> PerResult<()> {
        match self {
            IeValue::AmfUeNgapId(v) => v.encode_aper(encoder),
            IeValue::RanUeNgapId(v) => v.encode_aper(encoder),
            IeValue::NasPdu(v) => v.encode_aper(encoder),
            IeValue::Cause(v) => v.encode_aper(encoder),
            IeValue::TimeToWait(v) => v.encode_aper(encoder),
            IeValue::RelativeAmfCapacity(v) => v.encode_aper(encoder),
            IeValue::AmfName(v) => v.encode_aper(encoder),
            IeValue::RanNodeName(v) => v.encode_aper(encoder),
            IeValue::PagingDrx(v) => v.encode_aper(encoder),
            IeValue::GlobalRanNodeId(v) => v.encode_aper(encoder),
            IeValue::SupportedTaList(v) => {
                encode_seq_of(encoder, v, Some(1), Some(SupportedTaItem::LIST_SIZE_MAX), false)
            }
            IeValue::ServedGuamiList(v) => {
                encode_seq_of(encoder, v, Some(1), Some(ServedGuamiItem::LIST_SIZE_MAX), false)
            }
            IeValue::PlmnSupportList(v) => {
                encode_seq_of(encoder, v, Some(1), Some(PlmnSupportItem::LIST_SIZE_MAX), false)
            }
            IeValue::UserLocationInformation(v) => v.encode_aper(encoder),
            IeValue::RrcEstablishmentCause(v) => v.encode_aper(encoder),
            IeValue::UeContextRequest(v) => v.encode_aper(encoder),
            IeValue::UeNgapIds(v) => v.encode_aper(encoder),
            IeValue::CriticalityDiagnostics(v) => v.encode_aper(encoder),
            IeValue::Unknown(open) => {
                encoder.write_bytes(open.as_bytes());
                Ok(())
            }
        }
    }
}

/// One registered IE: id, expected criticality, presence requirement, and
/// the value type to decode it as
#[derive(Debug, Clone, Copy)]
pub struct IeDef {
    pub id: ProtocolIeId,
    pub criticality: Criticality,
    pub presence: Presence,
    pub kind: IeValueKind,
}

const fn ie(id: ProtocolIeId, criticality: Criticality, presence: Presence, kind: IeValueKind) -> IeDef {
    IeDef { id, criticality, presence, kind }
}

/// Read-only object set of the IEs one container kind may carry, in
/// declared order
#[derive(Debug)]
pub struct IeRegistry {
    pub name: &'static str,
    pub defs: &'static [IeDef],
}

impl IeRegistry {
    pub fn is_id_valid(&self, id: ProtocolIeId) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: ProtocolIeId) -> Option<&IeDef> {
        self.defs.iter().find(|def| def.id == id)
    }

    pub fn criticality_of(&self, id: ProtocolIeId) -> Option<Criticality> {
        self.get(id).map(|def| def.criticality)
    }

    pub fn presence_of(&self, id: ProtocolIeId) -> Option<Presence> {
        self.get(id).map(|def| def.presence)
    }

    /// Decode an IE value from its open-field octets. Ids outside the set
    /// come back opaque; registered ids must consume the whole span.
    pub fn decode_value(&self, id: ProtocolIeId, octets: &[u8]) -> PerResult<IeValue> {
        let Some(def) = self.get(id) else {
            return Ok(IeValue::Unknown(OpenType::new(octets.to_vec())));
        };
        let mut decoder = AperDecoder::new(octets);
        let value = IeValue::decode_as(def.kind, &mut decoder)?;
        if decoder.byte_position() != octets.len() {
            return Err(PerError::OpenTypeMismatch {
                expected: octets.len(),
                consumed: decoder.byte_position(),
            });
        }
        Ok(value)
    }
}

/// Extension object set with no members: every extension id is retained
/// opaquely. Nested iE-Extensions containers in this build all use it.
pub static EMPTY_EXTENSIONS: IeRegistry = IeRegistry { name: "empty-extensions", defs: &[] };

// ============================================================================
// Per-container object sets (3GPP TS 38.413 section 9.2)
// ============================================================================

pub static NG_SETUP_REQUEST_IES: IeRegistry = IeRegistry {
    name: "NGSetupRequest",
    defs: &[
        ie(ProtocolIeId::GLOBAL_RAN_NODE_ID, Criticality::Reject, Presence::Mandatory, IeValueKind::GlobalRanNodeId),
        ie(ProtocolIeId::RAN_NODE_NAME, Criticality::Ignore, Presence::Optional, IeValueKind::RanNodeName),
        ie(ProtocolIeId::SUPPORTED_TA_LIST, Criticality::Reject, Presence::Mandatory, IeValueKind::SupportedTaList),
        ie(ProtocolIeId::DEFAULT_PAGING_DRX, Criticality::Ignore, Presence::Mandatory, IeValueKind::PagingDrx),
    ],
};

pub static NG_SETUP_RESPONSE_IES: IeRegistry = IeRegistry {
    name: "NGSetupResponse",
    defs: &[
        ie(ProtocolIeId::AMF_NAME, Criticality::Reject, Presence::Mandatory, IeValueKind::AmfName),
        ie(ProtocolIeId::SERVED_GUAMI_LIST, Criticality::Reject, Presence::Mandatory, IeValueKind::ServedGuamiList),
        ie(ProtocolIeId::RELATIVE_AMF_CAPACITY, Criticality::Ignore, Presence::Mandatory, IeValueKind::RelativeAmfCapacity),
        ie(ProtocolIeId::PLMN_SUPPORT_LIST, Criticality::Reject, Presence::Mandatory, IeValueKind::PlmnSupportList),
        ie(ProtocolIeId::CRITICALITY_DIAGNOSTICS, Criticality::Ignore, Presence::Optional, IeValueKind::CriticalityDiagnostics),
    ],
};

pub static NG_SETUP_FAILURE_IES: IeRegistry = IeRegistry {
    name: "NGSetupFailure",
    defs: &[
        ie(ProtocolIeId::CAUSE, Criticality::Ignore, Presence::Mandatory, IeValueKind::Cause),
        ie(ProtocolIeId::TIME_TO_WAIT, Criticality::Ignore, Presence::Optional, IeValueKind::TimeToWait),
        ie(ProtocolIeId::CRITICALITY_DIAGNOSTICS, Criticality::Ignore, Presence::Optional, IeValueKind::CriticalityDiagnostics),
    ],
};

pub static AMF_CONFIGURATION_UPDATE_IES: IeRegistry = IeRegistry {
    name: "AMFConfigurationUpdate",
    defs: &[
        ie(ProtocolIeId::AMF_NAME, Criticality::Reject, Presence::Optional, IeValueKind::AmfName),
        ie(ProtocolIeId::SERVED_GUAMI_LIST, Criticality::Reject, Presence::Optional, IeValueKind::ServedGuamiList),
        ie(ProtocolIeId::RELATIVE_AMF_CAPACITY, Criticality::Reject, Presence::Optional, IeValueKind::RelativeAmfCapacity),
        ie(ProtocolIeId::PLMN_SUPPORT_LIST, Criticality::Reject, Presence::Optional, IeValueKind::PlmnSupportList),
    ],
};

pub static INITIAL_UE_MESSAGE_IES: IeRegistry = IeRegistry {
    name: "InitialUEMessage",
    defs: &[
        ie(ProtocolIeId::RAN_UE_NGAP_ID, Criticality::Reject, Presence::Mandatory, IeValueKind::RanUeNgapId),
        ie(ProtocolIeId::NAS_PDU, Criticality::Reject, Presence::Mandatory, IeValueKind::NasPdu),
        ie(ProtocolIeId::USER_LOCATION_INFORMATION, Criticality::Reject, Presence::Mandatory, IeValueKind::UserLocationInformation),
        ie(ProtocolIeId::RRC_ESTABLISHMENT_CAUSE, Criticality::Ignore, Presence::Mandatory, IeValueKind::RrcEstablishmentCause),
        ie(ProtocolIeId::UE_CONTEXT_REQUEST, Criticality::Ignore, Presence::Optional, IeValueKind::UeContextRequest),
    ],
};

pub static DOWNLINK_NAS_TRANSPORT_IES: IeRegistry = IeRegistry {
    name: "DownlinkNASTransport",
    defs: &[
        ie(ProtocolIeId::AMF_UE_NGAP_ID, Criticality::Reject, Presence::Mandatory, IeValueKind::AmfUeNgapId),
        ie(ProtocolIeId::RAN_UE_NGAP_ID, Criticality::Reject, Presence::Mandatory, IeValueKind::RanUeNgapId),
        ie(ProtocolIeId::NAS_PDU, Criticality::Reject, Presence::Mandatory, IeValueKind::NasPdu),
    ],
};

pub static UPLINK_NAS_TRANSPORT_IES: IeRegistry = IeRegistry {
    name: "UplinkNASTransport",
    defs: &[
        ie(ProtocolIeId::AMF_UE_NGAP_ID, Criticality::Reject, Presence::Mandatory, IeValueKind::AmfUeNgapId),
        ie(ProtocolIeId::RAN_UE_NGAP_ID, Criticality::Reject, Presence::Mandatory, IeValueKind::RanUeNgapId),
        ie(ProtocolIeId::NAS_PDU, Criticality::Reject, Presence::Mandatory, IeValueKind::NasPdu),
        ie(ProtocolIeId::USER_LOCATION_INFORMATION, Criticality::Ignore, Presence::Mandatory, IeValueKind::UserLocationInformation),
    ],
};

pub static UE_CONTEXT_RELEASE_COMMAND_IES: IeRegistry = IeRegistry {
    name: "UEContextReleaseCommand",
    defs: &[
        ie(ProtocolIeId::UE_NGAP_IDS, Criticality::Reject, Presence::Mandatory, IeValueKind::UeNgapIds),
        ie(ProtocolIeId::CAUSE, Criticality::Ignore, Presence::Mandatory, IeValueKind::Cause),
    ],
};

pub static UE_CONTEXT_RELEASE_COMPLETE_IES: IeRegistry = IeRegistry {
    name: "UEContextReleaseComplete",
    defs: &[
        ie(ProtocolIeId::AMF_UE_NGAP_ID, Criticality::Ignore, Presence::Mandatory, IeValueKind::AmfUeNgapId),
        ie(ProtocolIeId::RAN_UE_NGAP_ID, Criticality::Ignore, Presence::Mandatory, IeValueKind::RanUeNgapId),
        ie(ProtocolIeId::USER_LOCATION_INFORMATION, Criticality::Ignore, Presence::Optional, IeValueKind::UserLocationInformation),
        ie(ProtocolIeId::CRITICALITY_DIAGNOSTICS, Criticality::Ignore, Presence::Optional, IeValueKind::CriticalityDiagnostics),
    ],
};

pub static ERROR_INDICATION_IES: IeRegistry = IeRegistry {
    name: "ErrorIndication",
    defs: &[
        ie(ProtocolIeId::AMF_UE_NGAP_ID, Criticality::Ignore, Presence::Optional, IeValueKind::AmfUeNgapId),
        ie(ProtocolIeId::RAN_UE_NGAP_ID, Criticality::Ignore, Presence::Optional, IeValueKind::RanUeNgapId),
        ie(ProtocolIeId::CAUSE, Criticality::Ignore, Presence::Optional, IeValueKind::Cause),
        ie(ProtocolIeId::CRITICALITY_DIAGNOSTICS, Criticality::Ignore, Presence::Optional, IeValueKind::CriticalityDiagnostics),
    ],
};

/// The message container kinds this build can decode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    NgSetupRequest,
    NgSetupResponse,
    NgSetupFailure,
    AmfConfigurationUpdate,
    InitialUeMessage,
    DownlinkNasTransport,
    UplinkNasTransport,
    UeContextReleaseCommand,
    UeContextReleaseComplete,
    ErrorIndication,
}

impl ContainerKind {
    pub fn registry(self) -> &'static IeRegistry {
        match self {
            ContainerKind::NgSetupRequest => &NG_SETUP_REQUEST_IES,
            ContainerKind::NgSetupResponse => &NG_SETUP_RESPONSE_IES,
            ContainerKind::NgSetupFailure => &NG_SETUP_FAILURE_IES,
            ContainerKind::AmfConfigurationUpdate => &AMF_CONFIGURATION_UPDATE_IES,
            ContainerKind::InitialUeMessage => &INITIAL_UE_MESSAGE_IES,
            ContainerKind::DownlinkNasTransport => &DOWNLINK_NAS_TRANSPORT_IES,
            ContainerKind::UplinkNasTransport => &UPLINK_NAS_TRANSPORT_IES,
            ContainerKind::UeContextReleaseCommand => &UE_CONTEXT_RELEASE_COMMAND_IES,
            ContainerKind::UeContextReleaseComplete => &UE_CONTEXT_RELEASE_COMPLETE_IES,
            ContainerKind::ErrorIndication => &ERROR_INDICATION_IES,
        }
    }
}

/// One registered elementary procedure: its PDU criticality and the
/// container kind of each message class it defines
#[derive(Debug, Clone, Copy)]
pub struct ProcedureDef {
    pub code: ProcedureCode,
    pub criticality: Criticality,
    pub initiating: ContainerKind,
    pub successful: Option<ContainerKind>,
    pub unsuccessful: Option<ContainerKind>,
}

/// Elementary procedure object set (3GPP TS 38.413 section 8)
pub static PROCEDURES: &[ProcedureDef] = &[
    ProcedureDef {
        code: ProcedureCode::AMF_CONFIGURATION_UPDATE,
        criticality: Criticality::Reject,
        initiating: ContainerKind::AmfConfigurationUpdate,
        successful: None,
        unsuccessful: None,
    },
    ProcedureDef {
        code: ProcedureCode::DOWNLINK_NAS_TRANSPORT,
        criticality: Criticality::Ignore,
        initiating: ContainerKind::DownlinkNasTransport,
        successful: None,
        unsuccessful: None,
    },
    ProcedureDef {
        code: ProcedureCode::ERROR_INDICATION,
        criticality: Criticality::Ignore,
        initiating: ContainerKind::ErrorIndication,
        successful: None,
        unsuccessful: None,
    },
    ProcedureDef {
        code: ProcedureCode::INITIAL_UE_MESSAGE,
        criticality: Criticality::Ignore,
        initiating: ContainerKind::InitialUeMessage,
        successful: None,
        unsuccessful: None,
    },
    ProcedureDef {
        code: ProcedureCode::NG_SETUP,
        criticality: Criticality::Reject,
        initiating: ContainerKind::NgSetupRequest,
        successful: Some(ContainerKind::NgSetupResponse),
        unsuccessful: Some(ContainerKind::NgSetupFailure),
    },
    ProcedureDef {
        code: ProcedureCode::UE_CONTEXT_RELEASE,
        criticality: Criticality::Reject,
        initiating: ContainerKind::UeContextReleaseCommand,
        successful: Some(ContainerKind::UeContextReleaseComplete),
        unsuccessful: None,
    },
    ProcedureDef {
        code: ProcedureCode::UPLINK_NAS_TRANSPORT,
        criticality: Criticality::Ignore,
        initiating: ContainerKind::UplinkNasTransport,
        successful: None,
        unsuccessful: None,
    },
];

/// Look up a procedure by code
pub fn procedure_def(code: ProcedureCode) -> Option<&'static ProcedureDef> {
    PROCEDURES.iter().find(|def| def.code == code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_lookups() {
        let registry = &NG_SETUP_REQUEST_IES;
        assert!(registry.is_id_valid(ProtocolIeId::GLOBAL_RAN_NODE_ID));
        assert!(!registry.is_id_valid(ProtocolIeId(9999)));
        assert_eq!(
            registry.criticality_of(ProtocolIeId::RAN_NODE_NAME),
            Some(Criticality::Ignore)
        );
        assert_eq!(
            registry.presence_of(ProtocolIeId::SUPPORTED_TA_LIST),
            Some(Presence::Mandatory)
        );
        assert_eq!(registry.criticality_of(ProtocolIeId(9999)), None);
    }

    #[test]
    fn test_decode_value_roundtrip() {
        let mut encoder = AperEncoder::new();
        RanUeNgapId(7).encode_aper(&mut encoder).unwrap();
        let bytes = encoder.into_bytes();

        let value = UPLINK_NAS_TRANSPORT_IES
            .decode_value(ProtocolIeId::RAN_UE_NGAP_ID, &bytes)
            .unwrap();
        assert_eq!(value, IeValue::RanUeNgapId(RanUeNgapId(7)));
    }

    #[test]
    fn test_decode_value_unknown_id_kept_opaque() {
        let value = UPLINK_NAS_TRANSPORT_IES
            .decode_value(ProtocolIeId(9999), &[0xAA, 0xBB])
            .unwrap();
        assert_eq!(value, IeValue::Unknown(OpenType::new(vec![0xAA, 0xBB])));
    }

    #[test]
    fn test_decode_value_must_consume_span() {
        // A RAN-UE-NGAP-ID of one content octet inside a three-octet span
        let err = UPLINK_NAS_TRANSPORT_IES
            .decode_value(ProtocolIeId::RAN_UE_NGAP_ID, &[0x00, 0x01, 0x99])
            .unwrap_err();
        assert!(matches!(err, PerError::OpenTypeMismatch { expected: 3, consumed: 2 }));
    }

    #[test]
    fn test_procedure_lookup() {
        let def = procedure_def(ProcedureCode::NG_SETUP).unwrap();
        assert_eq!(def.initiating, ContainerKind::NgSetupRequest);
        assert_eq!(def.successful, Some(ContainerKind::NgSetupResponse));
        assert!(procedure_def(ProcedureCode(200)).is_none());
    }
}
