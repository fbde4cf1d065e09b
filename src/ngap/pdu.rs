//! NGAP PDU envelope
//!
//! Top-level PDU structures from NGAP-PDU-Descriptions (3GPP TS 38.413).
//! The envelope is a CHOICE over the three message classes, each wrapping a
//! procedure code, a criticality, and an open-type body whose container
//! kind the procedure registry selects at decode time.

use bytes::Bytes;
use log::warn;

use crate::ngap::container::ProtocolIeContainer;
use crate::ngap::error::{NgapError, NgapResult};
use crate::ngap::registry::{procedure_def, IeRegistry};
use crate::ngap::types::{Criticality, ProcedureCode};
use crate::per::{
    AperDecode, AperDecoder, AperEncode, AperEncoder, ChoiceIndex, PerError, PerResult,
};
use crate::seq::ExtensionAdditions;

/// NGAP-PDU - the top-level message envelope
/// ASN.1: NGAP-PDU ::= CHOICE { initiatingMessage, successfulOutcome, unsuccessfulOutcome, ... }
#[derive(Debug, Clone, PartialEq)]
pub enum NgapPdu {
    InitiatingMessage(InitiatingMessage),
    SuccessfulOutcome(SuccessfulOutcome),
    UnsuccessfulOutcome(UnsuccessfulOutcome),
}

impl NgapPdu {
    pub const NUM_ALTERNATIVES: usize = 3;
    pub const EXTENSIBLE: bool = true;

    pub fn procedure_code(&self) -> ProcedureCode {
        match self {
            NgapPdu::InitiatingMessage(msg) => msg.procedure_code,
            NgapPdu::SuccessfulOutcome(msg) => msg.procedure_code,
            NgapPdu::UnsuccessfulOutcome(msg) => msg.procedure_code,
        }
    }

    /// The initiating message.
    ///
    /// # Panics
    /// Panics when another alternative is active; accessing the wrong
    /// alternative is a logic error in the caller.
    pub fn init_msg(&self) -> &InitiatingMessage {
        match self {
            NgapPdu::InitiatingMessage(msg) => msg,
            other => panic!("ngap pdu: init_msg accessed but {} is active", other.class_name()),
        }
    }

    /// The successful outcome.
    ///
    /// # Panics
    /// Panics when another alternative is active.
    pub fn successful_outcome(&self) -> &SuccessfulOutcome {
        match self {
            NgapPdu::SuccessfulOutcome(msg) => msg,
            other => {
                panic!("ngap pdu: successful_outcome accessed but {} is active", other.class_name())
            }
        }
    }

    /// The unsuccessful outcome.
    ///
    /// # Panics
    /// Panics when another alternative is active.
    pub fn unsuccessful_outcome(&self) -> &UnsuccessfulOutcome {
        match self {
            NgapPdu::UnsuccessfulOutcome(msg) => msg,
            other => panic!(
                "ngap pdu: unsuccessful_outcome accessed but {} is active",
                other.class_name()
            ),
        }
    }

    fn class_name(&self) -> &'static str {
        match self {
            NgapPdu::InitiatingMessage(_) => "InitiatingMessage",
            NgapPdu::SuccessfulOutcome(_) => "SuccessfulOutcome",
            NgapPdu::UnsuccessfulOutcome(_) => "UnsuccessfulOutcome",
        }
    }
}

/// InitiatingMessage ::= SEQUENCE { procedureCode, criticality, value }
#[derive(Debug, Clone, PartialEq)]
pub struct InitiatingMessage {
    pub procedure_code: ProcedureCode,
    pub criticality: Criticality,
    pub protocol_ies: ProtocolIeContainer,
    pub ext_additions: ExtensionAdditions,
}

impl InitiatingMessage {
    pub fn new(
        procedure_code: ProcedureCode,
        criticality: Criticality,
        protocol_ies: ProtocolIeContainer,
    ) -> Self {
        Self {
            procedure_code,
            criticality,
            protocol_ies,
            ext_additions: ExtensionAdditions::default(),
        }
    }
}

/// SuccessfulOutcome ::= SEQUENCE { procedureCode, criticality, value }
#[derive(Debug, Clone, PartialEq)]
pub struct SuccessfulOutcome {
    pub procedure_code: ProcedureCode,
    pub criticality: Criticality,
    pub protocol_ies: ProtocolIeContainer,
    pub ext_additions: ExtensionAdditions,
}

impl SuccessfulOutcome {
    pub fn new(
        procedure_code: ProcedureCode,
        criticality: Criticality,
        protocol_ies: ProtocolIeContainer,
    ) -> Self {
        Self {
            procedure_code,
            criticality,
            protocol_ies,
            ext_additions: ExtensionAdditions::default(),
        }
    }
}

/// UnsuccessfulOutcome ::= SEQUENCE { procedureCode, criticality, value }
#[derive(Debug, Clone, PartialEq)]
pub struct UnsuccessfulOutcome {
    pub procedure_code: ProcedureCode,
    pub criticality: Criticality,
    pub protocol_ies: ProtocolIeContainer,
    pub ext_additions: ExtensionAdditions,
}

impl UnsuccessfulOutcome {
    pub fn new(
        procedure_code: ProcedureCode,
        criticality: Criticality,
        protocol_ies: ProtocolIeContainer,
    ) -> Self {
        Self {
            procedure_code,
            criticality,
            protocol_ies,
            ext_additions: ExtensionAdditions::default(),
        }
    }
}

/// Message body: extension marker bit, the IE container, extension
/// additions. Encoded as the PDU's open-type value.
fn encode_body(
    protocol_ies: &ProtocolIeContainer,
    ext_additions: &ExtensionAdditions,
) -> PerResult<Bytes> {
    let mut body = AperEncoder::new();
    body.write_bit(!ext_additions.is_empty());
    protocol_ies.encode_aper(&mut body)?;
    if !ext_additions.is_empty() {
        ext_additions.encode(&mut body)?;
    }
    Ok(body.into_bytes())
}

fn decode_body(
    octets: &[u8],
    registry: &IeRegistry,
) -> NgapResult<(ProtocolIeContainer, ExtensionAdditions)> {
    let mut decoder = AperDecoder::new(octets);
    let marker = decoder.read_bit()?;
    let protocol_ies = ProtocolIeContainer::decode(&mut decoder, registry)?;
    let ext_additions = if marker {
        ExtensionAdditions::decode(&mut decoder)?
    } else {
        ExtensionAdditions::default()
    };
    decoder.expect_end()?;
    Ok((protocol_ies, ext_additions))
}

fn encode_message(
    encoder: &mut AperEncoder,
    procedure_code: ProcedureCode,
    criticality: Criticality,
    protocol_ies: &ProtocolIeContainer,
    ext_additions: &ExtensionAdditions,
) -> PerResult<()> {
    procedure_code.encode_aper(encoder)?;
    criticality.encode_aper(encoder)?;
    encoder.encode_open_field(&encode_body(protocol_ies, ext_additions)?)
}

impl AperEncode for NgapPdu {
    fn encode_aper(&self, encoder: &mut AperEncoder) -> PerResult<()> {
        match self {
            NgapPdu::InitiatingMessage(msg) => {
                encoder.encode_choice_index(0, Self::NUM_ALTERNATIVES, Self::EXTENSIBLE)?;
                encode_message(
                    encoder,
                    msg.procedure_code,
                    msg.criticality,
                    &msg.protocol_ies,
                    &msg.ext_additions,
                )
            }
            NgapPdu::SuccessfulOutcome(msg) => {
                encoder.encode_choice_index(1, Self::NUM_ALTERNATIVES, Self::EXTENSIBLE)?;
                encode_message(
                    encoder,
                    msg.procedure_code,
                    msg.criticality,
                    &msg.protocol_ies,
                    &msg.ext_additions,
                )
            }
            NgapPdu::UnsuccessfulOutcome(msg) => {
                encoder.encode_choice_index(2, Self::NUM_ALTERNATIVES, Self::EXTENSIBLE)?;
                encode_message(
                    encoder,
                    msg.procedure_code,
                    msg.criticality,
                    &msg.protocol_ies,
                    &msg.ext_additions,
                )
            }
        }
    }
}

/// Encode an NGAP PDU to its wire octets
pub fn encode_ngap_pdu(pdu: &NgapPdu) -> NgapResult<Bytes> {
    let mut encoder = AperEncoder::new();
    pdu.encode_aper(&mut encoder)?;
    Ok(encoder.into_bytes())
}

/// Decode an NGAP PDU from wire octets.
///
/// The procedure registry selects the container kind of the body; an
/// unrecognized procedure code, or an outcome class the procedure does not
/// define, fails the whole decode (reject criticality is implicit at this
/// level). Trailing octets after the PDU are an error.
pub fn decode_ngap_pdu(octets: &[u8]) -> NgapResult<NgapPdu> {
    let mut decoder = AperDecoder::new(octets);

    let index = match decoder.decode_choice_index(NgapPdu::NUM_ALTERNATIVES, NgapPdu::EXTENSIBLE)? {
        ChoiceIndex::Root(index) => index,
        ChoiceIndex::Extension(_) => {
            return Err(NgapError::Per(PerError::InvalidChoiceIndex {
                index: NgapPdu::NUM_ALTERNATIVES,
                max: NgapPdu::NUM_ALTERNATIVES - 1,
            }));
        }
    };

    let code_offset = decoder.byte_position();
    let procedure_code = ProcedureCode::decode_aper(&mut decoder)?;
    let criticality = Criticality::decode_aper(&mut decoder)?;
    let body = decoder.decode_open_field()?;

    let def = procedure_def(procedure_code).ok_or(NgapError::UnknownProcedureCode {
        code: procedure_code.0,
        offset: code_offset,
    })?;
    if criticality != def.criticality {
        warn!(
            "procedure {}: PDU carries criticality {:?}, object set says {:?}",
            procedure_code.0, criticality, def.criticality
        );
    }

    let pdu = match index {
        0 => {
            let registry = def.initiating.registry();
            let (protocol_ies, ext_additions) = decode_body(&body, registry)?;
            NgapPdu::InitiatingMessage(InitiatingMessage {
                procedure_code,
                criticality,
                protocol_ies,
                ext_additions,
            })
        }
        1 => {
            let kind = def.successful.ok_or(NgapError::UnexpectedOutcome {
                code: procedure_code.0,
                outcome: "successful outcome",
                offset: code_offset,
            })?;
            let (protocol_ies, ext_additions) = decode_body(&body, kind.registry())?;
            NgapPdu::SuccessfulOutcome(SuccessfulOutcome {
                procedure_code,
                criticality,
                protocol_ies,
                ext_additions,
            })
        }
        _ => {
            let kind = def.unsuccessful.ok_or(NgapError::UnexpectedOutcome {
                code: procedure_code.0,
                outcome: "unsuccessful outcome",
                offset: code_offset,
            })?;
            let (protocol_ies, ext_additions) = decode_body(&body, kind.registry())?;
            NgapPdu::UnsuccessfulOutcome(UnsuccessfulOutcome {
                procedure_code,
                criticality,
                protocol_ies,
                ext_additions,
            })
        }
    };

    decoder.expect_end()?;
    Ok(pdu)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ngap::cause::{Cause, CauseMisc};
    use crate::ngap::ies::TimeToWait;
    use crate::ngap::registry::IeValue;
    use crate::ngap::types::ProtocolIeId;

    fn ng_setup_failure() -> NgapPdu {
        let mut ies = ProtocolIeContainer::new();
        ies.add(
            ProtocolIeId::CAUSE,
            Criticality::Ignore,
            IeValue::Cause(Cause::Misc(CauseMisc::Unspecified)),
        );
        ies.add(
            ProtocolIeId::TIME_TO_WAIT,
            Criticality::Ignore,
            IeValue::TimeToWait(TimeToWait::V5s),
        );
        NgapPdu::UnsuccessfulOutcome(UnsuccessfulOutcome::new(
            ProcedureCode::NG_SETUP,
            Criticality::Reject,
            ies,
        ))
    }

    #[test]
    fn test_pdu_roundtrip() {
        let pdu = ng_setup_failure();
        let bytes = encode_ngap_pdu(&pdu).unwrap();
        let decoded = decode_ngap_pdu(&bytes).unwrap();
        assert_eq!(decoded, pdu);

        let failure = decoded.unsuccessful_outcome();
        assert_eq!(
            failure.protocol_ies.find(ProtocolIeId::TIME_TO_WAIT),
            Some(&IeValue::TimeToWait(TimeToWait::V5s))
        );
    }

    #[test]
    fn test_unknown_procedure_code_rejected() {
        let pdu = NgapPdu::InitiatingMessage(InitiatingMessage::new(
            ProcedureCode(200),
            Criticality::Reject,
            ProtocolIeContainer::new(),
        ));
        let bytes = encode_ngap_pdu(&pdu).unwrap();
        let err = decode_ngap_pdu(&bytes).unwrap_err();
        assert!(matches!(err, NgapError::UnknownProcedureCode { code: 200, offset: 1 }));
    }

    #[test]
    fn test_outcome_the_procedure_lacks_is_rejected() {
        // INITIAL_UE_MESSAGE has no successful outcome
        let pdu = NgapPdu::SuccessfulOutcome(SuccessfulOutcome::new(
            ProcedureCode::INITIAL_UE_MESSAGE,
            Criticality::Ignore,
            ProtocolIeContainer::new(),
        ));
        let bytes = encode_ngap_pdu(&pdu).unwrap();
        let err = decode_ngap_pdu(&bytes).unwrap_err();
        assert!(matches!(err, NgapError::UnexpectedOutcome { code: 15, .. }));
    }

    #[test]
    fn test_trailing_data_rejected() {
        let mut bytes = encode_ngap_pdu(&ng_setup_failure()).unwrap().to_vec();
        bytes.extend_from_slice(&[0x00, 0x00]);
        let err = decode_ngap_pdu(&bytes).unwrap_err();
        assert!(matches!(err, NgapError::Per(PerError::TrailingData { .. })));
    }

    #[test]
    #[should_panic(expected = "init_msg accessed")]
    fn test_wrong_class_access_panics() {
        ng_setup_failure().init_msg();
    }
}
