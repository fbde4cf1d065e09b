//! NGAP protocol layer (3GPP TS 38.413)
//!
//! Common data types, cause values, concrete IE payloads, the IE and
//! procedure registries, the generic IE containers, and the PDU envelope.

pub mod cause;
pub mod container;
pub mod error;
pub mod ies;
pub mod pdu;
pub mod registry;
pub mod types;

pub use container::{ProtocolExtensionContainer, ProtocolIeContainer, ProtocolIeField};
pub use error::{NgapError, NgapResult};
pub use pdu::{decode_ngap_pdu, encode_ngap_pdu, NgapPdu};
pub use registry::{ContainerKind, IeRegistry, IeValue};
pub use types::{Criticality, Presence, ProcedureCode, ProtocolIeId, TriggeringMessage};
