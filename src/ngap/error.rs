//! NGAP protocol-level error types

use thiserror::Error;

use crate::per::PerError;

/// Errors raised while encoding or decoding NGAP messages. Decode-side
/// variants carry the byte offset at which the fault was detected so an
/// interoperability problem can be logged and diagnosed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NgapError {
    /// Bit-level codec error
    #[error("codec error: {0}")]
    Per(#[from] PerError),

    /// A mandatory IE was absent (or arrived after a later-declared field)
    #[error("missing mandatory IE {ie_id} in {container} at byte {offset}")]
    MissingMandatoryIe {
        container: &'static str,
        ie_id: u16,
        offset: usize,
    },

    /// An IE id outside the container's object set, marked reject
    #[error("unknown IE {ie_id} with reject criticality in {container} at byte {offset}")]
    UnknownIeId {
        container: &'static str,
        ie_id: u16,
        offset: usize,
    },

    /// A known IE arrived out of declared order (or twice)
    #[error("IE {ie_id} out of declared order in {container} at byte {offset}")]
    MisorderedIe {
        container: &'static str,
        ie_id: u16,
        offset: usize,
    },

    /// A reject-criticality IE value failed to decode
    #[error("IE {ie_id} in {container} undecodable at byte {offset}: {source}")]
    IeDecode {
        container: &'static str,
        ie_id: u16,
        offset: usize,
        source: PerError,
    },

    /// Procedure code outside the procedure object set
    #[error("unknown procedure code {code} at byte {offset}")]
    UnknownProcedureCode { code: u8, offset: usize },

    /// The procedure does not define the received outcome class
    #[error("procedure {code} has no {outcome} at byte {offset}")]
    UnexpectedOutcome {
        code: u8,
        outcome: &'static str,
        offset: usize,
    },
}

pub type NgapResult<T> = Result<T, NgapError>;
