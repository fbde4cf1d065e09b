//! NGAP ASN.1 wire-format core
//!
//! Aligned-PER encoding and decoding for the NGAP control-plane interface
//! (3GPP TS 38.413), built for forward compatibility: messages carrying
//! IEs, extension additions, enumeration values, or CHOICE alternatives
//! from newer protocol versions decode into placeholder values that
//! re-encode to the original bytes.
//!
//! # Modules
//!
//! - `per` - Packed Encoding Rules (APER) encoder/decoder and primitives
//! - `seq` - SEQUENCE-OF codec and extension-addition retention
//! - `open` - open-type envelope with late typed reinterpretation
//! - `ngap` - NGAP types, IE/procedure registries, containers, PDU envelope
//!
//! # Example
//!
//! ```
//! use ngap_asn1::ngap::cause::{Cause, CauseNas};
//! use ngap_asn1::ngap::ies::TimeToWait;
//! use ngap_asn1::ngap::pdu::{decode_ngap_pdu, encode_ngap_pdu, NgapPdu, UnsuccessfulOutcome};
//! use ngap_asn1::ngap::{Criticality, IeValue, ProcedureCode, ProtocolIeContainer, ProtocolIeId};
//!
//! let mut ies = ProtocolIeContainer::new();
//! ies.add(ProtocolIeId::CAUSE, Criticality::Ignore, IeValue::Cause(Cause::Nas(CauseNas::Unspecified)));
//! ies.add(ProtocolIeId::TIME_TO_WAIT, Criticality::Ignore, IeValue::TimeToWait(TimeToWait::V10s));
//! let pdu = NgapPdu::UnsuccessfulOutcome(UnsuccessfulOutcome::new(
//!     ProcedureCode::NG_SETUP,
//!     Criticality::Reject,
//!     ies,
//! ));
//!
//! let bytes = encode_ngap_pdu(&pdu).unwrap();
//! assert_eq!(decode_ngap_pdu(&bytes).unwrap(), pdu);
//! ```

pub mod ngap;
pub mod open;
pub mod per;
pub mod seq;


// Re-export commonly used types
pub use open::OpenType;
pub use per::{AperDecode, AperDecoder, AperEncode, AperEncoder, PerError, PerResult};
