//! NGAP Cause types
//!
//! Cause types from NGAP-IEs (3GPP TS 38.413). Every category enumeration
//! is extensible: values added by later protocol versions decode into an
//! `Unrecognized` placeholder carrying the extension ordinal, and the
//! `Cause` CHOICE itself carries unknown future alternatives opaquely.

use crate::open::UnknownAlternative;
use crate::per::{
    AperDecode, AperDecoder, AperEncode, AperEncoder, ChoiceIndex, Constraint, EnumValue,
    PerResult,
};

/// CauseRadioNetwork - radio network layer cause values
/// ASN.1: CauseRadioNetwork ::= ENUMERATED { unspecified, ..., ... }
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CauseRadioNetwork {
    Unspecified,
    TxnrelocoverallExpiry,
    SuccessfulHandover,
    ReleaseDueToNgranGeneratedReason,
    ReleaseDueTo5gcGeneratedReason,
    HandoverCancelled,
    PartialHandover,
    HoFailureInTarget5gcNgranNodeOrTargetSystem,
    HoTargetNotAllowed,
    TngrelocoverallExpiry,
    TngrelocprepExpiry,
    CellNotAvailable,
    UnknownTargetId,
    NoRadioResourcesAvailableInTargetCell,
    UnknownLocalUeNgapId,
    InconsistentRemoteUeNgapId,
    HandoverDesirableForRadioReason,
    TimeCriticalHandover,
    ResourceOptimisationHandover,
    ReduceLoadInServingCell,
    UserInactivity,
    RadioConnectionWithUeLost,
    RadioResourcesNotAvailable,
    InvalidQosCombination,
    FailureInRadioInterfaceProcedure,
    InteractionWithOtherProcedure,
    UnknownPduSessionId,
    UnknownQosFlowId,
    MultiplePduSessionIdInstances,
    MultipleQosFlowIdInstances,
    EncryptionAndOrIntegrityProtectionAlgorithmsNotSupported,
    NgIntraSystemHandoverTriggered,
    NgInterSystemHandoverTriggered,
    XnHandoverTriggered,
    NotSupported5qiValue,
    UeContextTransfer,
    ImsVoiceEpsFallbackOrRatFallbackTriggered,
    UpIntegrityProtectionNotPossible,
    UpConfidentialityProtectionNotPossible,
    SliceNotSupported,
    UeInRrcInactiveStateNotReachable,
    Redirection,
    ResourcesNotAvailableForTheSlice,
    UeMaxIntegrityProtectedDataRateReason,
    ReleaseDueToCnDetectedMobility,
    /// Extension value from a later protocol version, kept by ordinal
    Unrecognized(u64),
}

impl CauseRadioNetwork {
    // 45 values in the extension root (0..44)
    pub const CONSTRAINT: Constraint = Constraint::extensible(0, 44);

    fn index(&self) -> EnumValue {
        use CauseRadioNetwork::*;
        match self {
            Unspecified => EnumValue::Root(0),
            TxnrelocoverallExpiry => EnumValue::Root(1),
            SuccessfulHandover => EnumValue::Root(2),
            ReleaseDueToNgranGeneratedReason => EnumValue::Root(3),
            ReleaseDueTo5gcGeneratedReason => EnumValue::Root(4),
            HandoverCancelled => EnumValue::Root(5),
            PartialHandover => EnumValue::Root(6),
            HoFailureInTarget5gcNgranNodeOrTargetSystem => EnumValue::Root(7),
            HoTargetNotAllowed => EnumValue::Root(8),
            TngrelocoverallExpiry => EnumValue::Root(9),
            TngrelocprepExpiry => EnumValue::Root(10),
            CellNotAvailable => EnumValue::Root(11),
            UnknownTargetId => EnumValue::Root(12),
            NoRadioResourcesAvailableInTargetCell => EnumValue::Root(13),
            UnknownLocalUeNgapId => EnumValue::Root(14),
            InconsistentRemoteUeNgapId => EnumValue::Root(15),
            HandoverDesirableForRadioReason => EnumValue::Root(16),
            TimeCriticalHandover => EnumValue::Root(17),
            ResourceOptimisationHandover => EnumValue::Root(18),
            ReduceLoadInServingCell => EnumValue::Root(19),
            UserInactivity => EnumValue::Root(20),
            RadioConnectionWithUeLost => EnumValue::Root(21),
            RadioResourcesNotAvailable => EnumValue::Root(22),
            InvalidQosCombination => EnumValue::Root(23),
            FailureInRadioInterfaceProcedure => EnumValue::Root(24),
            InteractionWithOtherProcedure => EnumValue::Root(25),
            UnknownPduSessionId => EnumValue::Root(26),
            UnknownQosFlowId => EnumValue::Root(27),
            MultiplePduSessionIdInstances => EnumValue::Root(28),
            MultipleQosFlowIdInstances => EnumValue::Root(29),
            EncryptionAndOrIntegrityProtectionAlgorithmsNotSupported => EnumValue::Root(30),
            NgIntraSystemHandoverTriggered => EnumValue::Root(31),
            NgInterSystemHandoverTriggered => EnumValue::Root(32),
            XnHandoverTriggered => EnumValue::Root(33),
            NotSupported5qiValue => EnumValue::Root(34),
            UeContextTransfer => EnumValue::Root(35),
            ImsVoiceEpsFallbackOrRatFallbackTriggered => EnumValue::Root(36),
            UpIntegrityProtectionNotPossible => EnumValue::Root(37),
            UpConfidentialityProtectionNotPossible => EnumValue::Root(38),
            SliceNotSupported => EnumValue::Root(39),
            UeInRrcInactiveStateNotReachable => EnumValue::Root(40),
            Redirection => EnumValue::Root(41),
            ResourcesNotAvailableForTheSlice => EnumValue::Root(42),
            UeMaxIntegrityProtectedDataRateReason => EnumValue::Root(43),
            ReleaseDueToCnDetectedMobility => EnumValue::Root(44),
            Unrecognized(n) => EnumValue::Extended(*n),
        }
    }

    fn from_index(value: EnumValue) -> Self {
        use CauseRadioNetwork::*;
        match value {
            EnumValue::Root(0) => Unspecified,
            EnumValue::Root(1) => TxnrelocoverallExpiry,
            EnumValue::Root(2) => SuccessfulHandover,
            EnumValue::Root(3) => ReleaseDueToNgranGeneratedReason,
            EnumValue::Root(4) => ReleaseDueTo5gcGeneratedReason,
            EnumValue::Root(5) => HandoverCancelled,
            EnumValue::Root(6) => PartialHandover,
            EnumValue::Root(7) => HoFailureInTarget5gcNgranNodeOrTargetSystem,
            EnumValue::Root(8) => HoTargetNotAllowed,
            EnumValue::Root(9) => TngrelocoverallExpiry,
            EnumValue::Root(10) => TngrelocprepExpiry,
            EnumValue::Root(11) => CellNotAvailable,
            EnumValue::Root(12) => UnknownTargetId,
            EnumValue::Root(13) => NoRadioResourcesAvailableInTargetCell,
            EnumValue::Root(14) => UnknownLocalUeNgapId,
            EnumValue::Root(15) => InconsistentRemoteUeNgapId,
            EnumValue::Root(16) => HandoverDesirableForRadioReason,
            EnumValue::Root(17) => TimeCriticalHandover,
            EnumValue::Root(18) => ResourceOptimisationHandover,
            EnumValue::Root(19) => ReduceLoadInServingCell,
            EnumValue::Root(20) => UserInactivity,
            EnumValue::Root(21) => RadioConnectionWithUeLost,
            EnumValue::Root(22) => RadioResourcesNotAvailable,
            EnumValue::Root(23) => InvalidQosCombination,
            EnumValue::Root(24) => FailureInRadioInterfaceProcedure,
            EnumValue::Root(25) => InteractionWithOtherProcedure,
            EnumValue::Root(26) => UnknownPduSessionId,
            EnumValue::Root(27) => UnknownQosFlowId,
            EnumValue::Root(28) => MultiplePduSessionIdInstances,
            EnumValue::Root(29) => MultipleQosFlowIdInstances,
            EnumValue::Root(30) => EncryptionAndOrIntegrityProtectionAlgorithmsNotSupported,
            EnumValue::Root(31) => NgIntraSystemHandoverTriggered,
            EnumValue::Root(32) => NgInterSystemHandoverTriggered,
            EnumValue::Root(33) => XnHandoverTriggered,
            EnumValue::Root(34) => NotSupported5qiValue,
            EnumValue::Root(35) => UeContextTransfer,
            EnumValue::Root(36) => ImsVoiceEpsFallbackOrRatFallbackTriggered,
            EnumValue::Root(37) => UpIntegrityProtectionNotPossible,
            EnumValue::Root(38) => UpConfidentialityProtectionNotPossible,
            EnumValue::Root(39) => SliceNotSupported,
            EnumValue::Root(40) => UeInRrcInactiveStateNotReachable,
            EnumValue::Root(41) => Redirection,
            EnumValue::Root(42) => ResourcesNotAvailableForTheSlice,
            EnumValue::Root(43) => UeMaxIntegrityProtectedDataRateReason,
            EnumValue::Root(_) => ReleaseDueToCnDetectedMobility,
            EnumValue::Extended(n) => Unrecognized(n),
        }
    }
}

impl AperEncode for CauseRadioNetwork {
    fn encode_aper(&self, encoder: &mut AperEncoder) -> PerResult<()> {
        encoder.encode_enumerated(self.index(), &Self::CONSTRAINT)
    }
}

impl AperDecode for CauseRadioNetwork {
    fn decode_aper(decoder: &mut AperDecoder) -> PerResult<Self> {
        Ok(Self::from_index(decoder.decode_enumerated(&Self::CONSTRAINT)?))
    }
}

/// CauseTransport - transport layer cause values
/// ASN.1: CauseTransport ::= ENUMERATED { transport-resource-unavailable, unspecified, ... }
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CauseTransport {
    TransportResourceUnavailable,
    Unspecified,
    Unrecognized(u64),
}

impl CauseTransport {
    pub const CONSTRAINT: Constraint = Constraint::extensible(0, 1);
}

impl AperEncode for CauseTransport {
    fn encode_aper(&self, encoder: &mut AperEncoder) -> PerResult<()> {
        let value = match self {
            CauseTransport::TransportResourceUnavailable => EnumValue::Root(0),
            CauseTransport::Unspecified => EnumValue::Root(1),
            CauseTransport::Unrecognized(n) => EnumValue::Extended(*n),
        };
        encoder.encode_enumerated(value, &Self::CONSTRAINT)
    }
}

impl AperDecode for CauseTransport {
    fn decode_aper(decoder: &mut AperDecoder) -> PerResult<Self> {
        Ok(match decoder.decode_enumerated(&Self::CONSTRAINT)? {
            EnumValue::Root(0) => CauseTransport::TransportResourceUnavailable,
            EnumValue::Root(_) => CauseTransport::Unspecified,
            EnumValue::Extended(n) => CauseTransport::Unrecognized(n),
        })
    }
}

/// CauseNas - NAS layer cause values
/// ASN.1: CauseNas ::= ENUMERATED { normal-release, authentication-failure, deregister, unspecified, ... }
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CauseNas {
    NormalRelease,
    AuthenticationFailure,
    Deregister,
    Unspecified,
    Unrecognized(u64),
}

impl CauseNas {
    pub const CONSTRAINT: Constraint = Constraint::extensible(0, 3);
}

impl AperEncode for CauseNas {
    fn encode_aper(&self, encoder: &mut AperEncoder) -> PerResult<()> {
        let value = match self {
            CauseNas::NormalRelease => EnumValue::Root(0),
            CauseNas::AuthenticationFailure => EnumValue::Root(1),
            CauseNas::Deregister => EnumValue::Root(2),
            CauseNas::Unspecified => EnumValue::Root(3),
            CauseNas::Unrecognized(n) => EnumValue::Extended(*n),
        };
        encoder.encode_enumerated(value, &Self::CONSTRAINT)
    }
}

impl AperDecode for CauseNas {
    fn decode_aper(decoder: &mut AperDecoder) -> PerResult<Self> {
        Ok(match decoder.decode_enumerated(&Self::CONSTRAINT)? {
            EnumValue::Root(0) => CauseNas::NormalRelease,
            EnumValue::Root(1) => CauseNas::AuthenticationFailure,
            EnumValue::Root(2) => CauseNas::Deregister,
            EnumValue::Root(_) => CauseNas::Unspecified,
            EnumValue::Extended(n) => CauseNas::Unrecognized(n),
        })
    }
}

/// CauseProtocol - protocol layer cause values
/// ASN.1: CauseProtocol ::= ENUMERATED { transfer-syntax-error, ..., ... }
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CauseProtocol {
    TransferSyntaxError,
    AbstractSyntaxErrorReject,
    AbstractSyntaxErrorIgnoreAndNotify,
    MessageNotCompatibleWithReceiverState,
    SemanticError,
    AbstractSyntaxErrorFalselyConstructedMessage,
    Unspecified,
    Unrecognized(u64),
}

impl CauseProtocol {
    pub const CONSTRAINT: Constraint = Constraint::extensible(0, 6);
}

impl AperEncode for CauseProtocol {
    fn encode_aper(&self, encoder: &mut AperEncoder) -> PerResult<()> {
        use CauseProtocol::*;
        let value = match self {
            TransferSyntaxError => EnumValue::Root(0),
            AbstractSyntaxErrorReject => EnumValue::Root(1),
            AbstractSyntaxErrorIgnoreAndNotify => EnumValue::Root(2),
            MessageNotCompatibleWithReceiverState => EnumValue::Root(3),
            SemanticError => EnumValue::Root(4),
            AbstractSyntaxErrorFalselyConstructedMessage => EnumValue::Root(5),
            Unspecified => EnumValue::Root(6),
            Unrecognized(n) => EnumValue::Extended(*n),
        };
        encoder.encode_enumerated(value, &Self::CONSTRAINT)
    }
}

impl AperDecode for CauseProtocol {
    fn decode_aper(decoder: &mut AperDecoder) -> PerResult<Self> {
        use CauseProtocol::*;
        Ok(match decoder.decode_enumerated(&Self::CONSTRAINT)? {
            EnumValue::Root(0) => TransferSyntaxError,
            EnumValue::Root(1) => AbstractSyntaxErrorReject,
            EnumValue::Root(2) => AbstractSyntaxErrorIgnoreAndNotify,
            EnumValue::Root(3) => MessageNotCompatibleWithReceiverState,
            EnumValue::Root(4) => SemanticError,
            EnumValue::Root(5) => AbstractSyntaxErrorFalselyConstructedMessage,
            EnumValue::Root(_) => Unspecified,
            EnumValue::Extended(n) => Unrecognized(n),
        })
    }
}

/// CauseMisc - miscellaneous cause values
/// ASN.1: CauseMisc ::= ENUMERATED { control-processing-overload, ..., ... }
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CauseMisc {
    ControlProcessingOverload,
    NotEnoughUserPlaneProcessingResources,
    HardwareFailure,
    OmIntervention,
    UnknownPlmnOrSnpn,
    Unspecified,
    Unrecognized(u64),
}

impl CauseMisc {
    pub const CONSTRAINT: Constraint = Constraint::extensible(0, 5);
}

impl AperEncode for CauseMisc {
    fn encode_aper(&self, encoder: &mut AperEncoder) -> PerResult<()> {
        use CauseMisc::*;
        let value = match self {
            ControlProcessingOverload => EnumValue::Root(0),
            NotEnoughUserPlaneProcessingResources => EnumValue::Root(1),
            HardwareFailure => EnumValue::Root(2),
            OmIntervention => EnumValue::Root(3),
            UnknownPlmnOrSnpn => EnumValue::Root(4),
            Unspecified => EnumValue::Root(5),
            Unrecognized(n) => EnumValue::Extended(*n),
        };
        encoder.encode_enumerated(value, &Self::CONSTRAINT)
    }
}

impl AperDecode for CauseMisc {
    fn decode_aper(decoder: &mut AperDecoder) -> PerResult<Self> {
        use CauseMisc::*;
        Ok(match decoder.decode_enumerated(&Self::CONSTRAINT)? {
            EnumValue::Root(0) => ControlProcessingOverload,
            EnumValue::Root(1) => NotEnoughUserPlaneProcessingResources,
            EnumValue::Root(2) => HardwareFailure,
            EnumValue::Root(3) => OmIntervention,
            EnumValue::Root(4) => UnknownPlmnOrSnpn,
            EnumValue::Root(_) => Unspecified,
            EnumValue::Extended(n) => Unrecognized(n),
        })
    }
}

/// Cause - CHOICE over all cause categories
/// ASN.1: Cause ::= CHOICE { radioNetwork, transport, nas, protocol, misc, choice-Extensions }
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cause {
    RadioNetwork(CauseRadioNetwork),
    Transport(CauseTransport),
    Nas(CauseNas),
    Protocol(CauseProtocol),
    Misc(CauseMisc),
    /// A future alternative unknown to this version, carried opaquely
    ChoiceExtension(UnknownAlternative),
}

impl Cause {
    pub const NUM_ALTERNATIVES: usize = 5;
    pub const EXTENSIBLE: bool = true;

    /// The radio network cause.
    ///
    /// # Panics
    /// Panics when another alternative is active; accessing the wrong
    /// alternative is a logic error in the caller, not a decode failure.
    pub fn radio_network(&self) -> CauseRadioNetwork {
        match self {
            Cause::RadioNetwork(v) => *v,
            other => panic!("cause: radio_network accessed but {other:?} is active"),
        }
    }

    /// The miscellaneous cause.
    ///
    /// # Panics
    /// Panics when another alternative is active.
    pub fn misc(&self) -> CauseMisc {
        match self {
            Cause::Misc(v) => *v,
            other => panic!("cause: misc accessed but {other:?} is active"),
        }
    }
}

impl AperEncode for Cause {
    fn encode_aper(&self, encoder: &mut AperEncoder) -> PerResult<()> {
        match self {
            Cause::RadioNetwork(v) => {
                encoder.encode_choice_index(0, Self::NUM_ALTERNATIVES, Self::EXTENSIBLE)?;
                v.encode_aper(encoder)
            }
            Cause::Transport(v) => {
                encoder.encode_choice_index(1, Self::NUM_ALTERNATIVES, Self::EXTENSIBLE)?;
                v.encode_aper(encoder)
            }
            Cause::Nas(v) => {
                encoder.encode_choice_index(2, Self::NUM_ALTERNATIVES, Self::EXTENSIBLE)?;
                v.encode_aper(encoder)
            }
            Cause::Protocol(v) => {
                encoder.encode_choice_index(3, Self::NUM_ALTERNATIVES, Self::EXTENSIBLE)?;
                v.encode_aper(encoder)
            }
            Cause::Misc(v) => {
                encoder.encode_choice_index(4, Self::NUM_ALTERNATIVES, Self::EXTENSIBLE)?;
                v.encode_aper(encoder)
            }
            Cause::ChoiceExtension(unknown) => unknown.encode(encoder),
        }
    }
}

impl AperDecode for Cause {
    fn decode_aper(decoder: &mut AperDecoder) -> PerResult<Self> {
        match decoder.decode_choice_index(Self::NUM_ALTERNATIVES, Self::EXTENSIBLE)? {
            ChoiceIndex::Root(0) => Ok(Cause::RadioNetwork(CauseRadioNetwork::decode_aper(decoder)?)),
            ChoiceIndex::Root(1) => Ok(Cause::Transport(CauseTransport::decode_aper(decoder)?)),
            ChoiceIndex::Root(2) => Ok(Cause::Nas(CauseNas::decode_aper(decoder)?)),
            ChoiceIndex::Root(3) => Ok(Cause::Protocol(CauseProtocol::decode_aper(decoder)?)),
            ChoiceIndex::Root(_) => Ok(Cause::Misc(CauseMisc::decode_aper(decoder)?)),
            ChoiceIndex::Extension(ordinal) => {
                Ok(Cause::ChoiceExtension(UnknownAlternative::decode(decoder, ordinal)?))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::open::OpenType;

    fn roundtrip(cause: Cause) -> Cause {
        let mut encoder = AperEncoder::new();
        cause.encode_aper(&mut encoder).unwrap();
        let bytes = encoder.into_bytes();
        let mut decoder = AperDecoder::new(&bytes);
        Cause::decode_aper(&mut decoder).unwrap()
    }

    #[test]
    fn test_cause_radio_network_roundtrip() {
        let cause = Cause::RadioNetwork(CauseRadioNetwork::Unspecified);
        assert_eq!(roundtrip(cause.clone()), cause);
        assert_eq!(cause.radio_network(), CauseRadioNetwork::Unspecified);
    }

    #[test]
    fn test_cause_categories_roundtrip() {
        for cause in [
            Cause::RadioNetwork(CauseRadioNetwork::UserInactivity),
            Cause::Transport(CauseTransport::TransportResourceUnavailable),
            Cause::Nas(CauseNas::Deregister),
            Cause::Protocol(CauseProtocol::SemanticError),
            Cause::Misc(CauseMisc::HardwareFailure),
        ] {
            assert_eq!(roundtrip(cause.clone()), cause);
        }
    }

    #[test]
    fn test_extended_enum_value_preserved() {
        // A cause value added by a future protocol version survives a
        // decode/encode cycle by ordinal
        let cause = Cause::RadioNetwork(CauseRadioNetwork::Unrecognized(7));
        assert_eq!(roundtrip(cause.clone()), cause);
    }

    #[test]
    fn test_unknown_alternative_preserved() {
        let cause = Cause::ChoiceExtension(UnknownAlternative {
            ordinal: 0,
            value: OpenType::new(vec![0x00, 0x01]),
        });
        let mut encoder = AperEncoder::new();
        cause.encode_aper(&mut encoder).unwrap();
        let bytes = encoder.into_bytes();

        let mut decoder = AperDecoder::new(&bytes);
        let decoded = Cause::decode_aper(&mut decoder).unwrap();
        assert_eq!(decoded, cause);

        let mut encoder = AperEncoder::new();
        decoded.encode_aper(&mut encoder).unwrap();
        assert_eq!(encoder.into_bytes(), bytes);
    }

    #[test]
    #[should_panic(expected = "radio_network accessed")]
    fn test_wrong_alternative_access_panics() {
        Cause::Misc(CauseMisc::Unspecified).radio_network();
    }
}
