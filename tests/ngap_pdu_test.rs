//! NGAP PDU decode/encode tests against captured traffic
//!
//! The byte strings below are NGAP messages recorded from a live gNB/AMF
//! interoperability run. Decoding must produce the expected field values
//! and re-encoding must reproduce the capture bit-for-bit.

use ngap_asn1::ngap::cause::{Cause, CauseMisc};
use ngap_asn1::ngap::ies::{GnbId, PagingDrx, TimeToWait};
use ngap_asn1::ngap::pdu::{decode_ngap_pdu, encode_ngap_pdu, NgapPdu, UnsuccessfulOutcome};
use ngap_asn1::ngap::registry::IeValue;
use ngap_asn1::ngap::{
    Criticality, NgapError, ProcedureCode, ProtocolIeContainer, ProtocolIeId,
};
use ngap_asn1::OpenType;

const NG_SETUP_REQUEST: &[u8] = &[
    0x00, 0x15, 0x00, 0x30, 0x00, 0x00, 0x04, 0x00, 0x1b, 0x00, 0x09, 0x00, 0x00, 0xf1, 0x10,
    0x50, 0x00, 0x00, 0x00, 0x01, 0x00, 0x52, 0x40, 0x06, 0x01, 0x80, 0x67, 0x6e, 0x62, 0x31,
    0x00, 0x66, 0x00, 0x0d, 0x00, 0x00, 0x00, 0x00, 0x75, 0x00, 0x00, 0xf1, 0x10, 0x00, 0x00,
    0x00, 0x08, 0x00, 0x15, 0x40, 0x01, 0x60,
];

const NG_SETUP_RESPONSE: &[u8] = &[
    0x20, 0x15, 0x00, 0x5e, 0x00, 0x00, 0x04, 0x00, 0x01, 0x00, 0x3a, 0x1b, 0x80, 0x61, 0x6d,
    0x66, 0x31, 0x2e, 0x63, 0x6c, 0x75, 0x73, 0x74, 0x65, 0x72, 0x31, 0x2e, 0x6e, 0x65, 0x74,
    0x32, 0x2e, 0x61, 0x6d, 0x66, 0x2e, 0x35, 0x67, 0x63, 0x2e, 0x6d, 0x6e, 0x63, 0x30, 0x30,
    0x31, 0x2e, 0x6d, 0x63, 0x63, 0x30, 0x30, 0x31, 0x2e, 0x33, 0x67, 0x70, 0x70, 0x6e, 0x65,
    0x74, 0x77, 0x6f, 0x72, 0x6b, 0x2e, 0x6f, 0x72, 0x67, 0x00, 0x60, 0x00, 0x08, 0x00, 0x00,
    0x00, 0xf1, 0x10, 0x38, 0x08, 0x97, 0x00, 0x56, 0x40, 0x01, 0x05, 0x00, 0x50, 0x00, 0x08,
    0x00, 0x00, 0xf1, 0x10, 0x00, 0x00, 0x00, 0x08,
];

const AMF_CONFIGURATION_UPDATE: &[u8] = &[
    0x00, 0x00, 0x00, 0x0a, 0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x03, 0x00, 0x00, 0x11,
];

#[test]
fn ng_setup_request_decodes_and_reencodes() {
    let pdu = decode_ngap_pdu(NG_SETUP_REQUEST).unwrap();

    let msg = pdu.init_msg();
    assert_eq!(msg.procedure_code, ProcedureCode::NG_SETUP);
    assert_eq!(msg.criticality, Criticality::Reject);
    assert_eq!(msg.protocol_ies.len(), 4);

    let Some(IeValue::GlobalRanNodeId(node_id)) =
        msg.protocol_ies.find(ProtocolIeId::GLOBAL_RAN_NODE_ID)
    else {
        panic!("GlobalRANNodeID missing");
    };
    let gnb = node_id.global_gnb_id();
    assert_eq!(gnb.plmn_identity.0, [0x00, 0xF1, 0x10]);
    assert_eq!(gnb.gnb_id, GnbId::new(1, 32));

    let Some(IeValue::RanNodeName(name)) = msg.protocol_ies.find(ProtocolIeId::RAN_NODE_NAME)
    else {
        panic!("RANNodeName missing");
    };
    assert_eq!(name.as_str(), Some("gnb1"));

    let Some(IeValue::SupportedTaList(tas)) =
        msg.protocol_ies.find(ProtocolIeId::SUPPORTED_TA_LIST)
    else {
        panic!("SupportedTAList missing");
    };
    assert_eq!(tas.len(), 1);
    assert_eq!(tas[0].tac.to_u24(), 0x75);
    assert_eq!(tas[0].broadcast_plmn_list.len(), 1);
    let bcast = &tas[0].broadcast_plmn_list[0];
    assert_eq!(bcast.plmn_identity.0, [0x00, 0xF1, 0x10]);
    assert_eq!(bcast.tai_slice_support_list.len(), 1);
    assert_eq!(bcast.tai_slice_support_list[0].s_nssai.sst, 1);
    assert_eq!(bcast.tai_slice_support_list[0].s_nssai.sd, None);

    assert_eq!(
        msg.protocol_ies.find(ProtocolIeId::DEFAULT_PAGING_DRX),
        Some(&IeValue::PagingDrx(PagingDrx::V256))
    );

    let reencoded = encode_ngap_pdu(&pdu).unwrap();
    assert_eq!(reencoded.as_ref(), NG_SETUP_REQUEST);
}

#[test]
fn ng_setup_response_decodes_and_reencodes() {
    let pdu = decode_ngap_pdu(NG_SETUP_RESPONSE).unwrap();

    let msg = pdu.successful_outcome();
    assert_eq!(msg.procedure_code, ProcedureCode::NG_SETUP);
    assert_eq!(msg.criticality, Criticality::Reject);
    assert_eq!(msg.protocol_ies.len(), 4);

    let Some(IeValue::AmfName(name)) = msg.protocol_ies.find(ProtocolIeId::AMF_NAME) else {
        panic!("AMFName missing");
    };
    assert_eq!(
        name.as_str(),
        Some("amf1.cluster1.net2.amf.5gc.mnc001.mcc001.3gppnetwork.org")
    );

    let Some(IeValue::ServedGuamiList(guamis)) =
        msg.protocol_ies.find(ProtocolIeId::SERVED_GUAMI_LIST)
    else {
        panic!("ServedGUAMIList missing");
    };
    assert_eq!(guamis.len(), 1);
    let guami = &guamis[0].guami;
    assert_eq!(guami.plmn_identity.0, [0x00, 0xF1, 0x10]);
    assert_eq!(guami.amf_region_id, 0x38);
    assert_eq!(guami.amf_set_id, 34);
    assert_eq!(guami.amf_pointer, 23);
    assert_eq!(guamis[0].backup_amf_name, None);

    assert_eq!(
        msg.protocol_ies.find(ProtocolIeId::RELATIVE_AMF_CAPACITY),
        Some(&IeValue::RelativeAmfCapacity(ngap_asn1::ngap::ies::RelativeAmfCapacity(5)))
    );

    let Some(IeValue::PlmnSupportList(plmns)) =
        msg.protocol_ies.find(ProtocolIeId::PLMN_SUPPORT_LIST)
    else {
        panic!("PLMNSupportList missing");
    };
    assert_eq!(plmns.len(), 1);
    assert_eq!(plmns[0].plmn_identity.0, [0x00, 0xF1, 0x10]);
    assert_eq!(plmns[0].slice_support_list.len(), 1);
    assert_eq!(plmns[0].slice_support_list[0].s_nssai.sst, 1);

    let reencoded = encode_ngap_pdu(&pdu).unwrap();
    assert_eq!(reencoded.as_ref(), NG_SETUP_RESPONSE);
}

#[test]
fn amf_configuration_update_decodes_and_reencodes() {
    let pdu = decode_ngap_pdu(AMF_CONFIGURATION_UPDATE).unwrap();

    let msg = pdu.init_msg();
    assert_eq!(msg.procedure_code, ProcedureCode::AMF_CONFIGURATION_UPDATE);
    assert_eq!(msg.criticality, Criticality::Reject);
    assert_eq!(msg.protocol_ies.len(), 1);

    let Some(IeValue::AmfName(name)) = msg.protocol_ies.find(ProtocolIeId::AMF_NAME) else {
        panic!("AMFName missing");
    };
    assert_eq!(name.as_bytes(), &[0x11]);

    let reencoded = encode_ngap_pdu(&pdu).unwrap();
    assert_eq!(reencoded.as_ref(), AMF_CONFIGURATION_UPDATE);
}

#[test]
fn ng_setup_failure_roundtrip() {
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
    let pdu = NgapPdu::UnsuccessfulOutcome(UnsuccessfulOutcome::new(
        ProcedureCode::NG_SETUP,
        Criticality::Reject,
        ies,
    ));

    let bytes = encode_ngap_pdu(&pdu).unwrap();
    let decoded = decode_ngap_pdu(&bytes).unwrap();
    assert_eq!(decoded, pdu);
}

#[test]
fn unknown_ie_with_ignore_criticality_is_dropped() {
    // Splice an unrecognized IE into an ErrorIndication body
    let mut ies = ProtocolIeContainer::new();
    ies.add(
        ProtocolIeId::CAUSE,
        Criticality::Ignore,
        IeValue::Cause(Cause::Misc(CauseMisc::HardwareFailure)),
    );
    ies.add(
        ProtocolIeId(61234),
        Criticality::Ignore,
        IeValue::Unknown(OpenType::new(vec![0xDE, 0xAD])),
    );
    let pdu = NgapPdu::InitiatingMessage(ngap_asn1::ngap::pdu::InitiatingMessage::new(
        ProcedureCode::ERROR_INDICATION,
        Criticality::Ignore,
        ies,
    ));

    let bytes = encode_ngap_pdu(&pdu).unwrap();
    let decoded = decode_ngap_pdu(&bytes).unwrap();
    let msg = decoded.init_msg();
    assert_eq!(msg.protocol_ies.len(), 1);
    assert!(msg.protocol_ies.find(ProtocolIeId(61234)).is_none());
}

#[test]
fn unknown_ie_with_reject_criticality_fails() {
    let mut ies = ProtocolIeContainer::new();
    ies.add(
        ProtocolIeId::CAUSE,
        Criticality::Ignore,
        IeValue::Cause(Cause::Misc(CauseMisc::HardwareFailure)),
    );
    ies.add(
        ProtocolIeId(61234),
        Criticality::Reject,
        IeValue::Unknown(OpenType::new(vec![0xDE, 0xAD])),
    );
    let pdu = NgapPdu::InitiatingMessage(ngap_asn1::ngap::pdu::InitiatingMessage::new(
        ProcedureCode::ERROR_INDICATION,
        Criticality::Ignore,
        ies,
    ));

    let bytes = encode_ngap_pdu(&pdu).unwrap();
    let err = decode_ngap_pdu(&bytes).unwrap_err();
    assert!(matches!(err, NgapError::UnknownIeId { ie_id: 61234, .. }));
}

#[test]
fn message_extension_additions_survive_reencode() {
    // A message extended by a future protocol version: the addition block
    // is retained opaquely and reproduced on encode
    let mut ies = ProtocolIeContainer::new();
    ies.add(
        ProtocolIeId::CAUSE,
        Criticality::Ignore,
        IeValue::Cause(Cause::Misc(CauseMisc::Unspecified)),
    );
    let mut msg = UnsuccessfulOutcome::new(ProcedureCode::NG_SETUP, Criticality::Reject, ies);
    msg.ext_additions = ngap_asn1::seq::ExtensionAdditions::new(vec![
        Some(OpenType::new(vec![0x01, 0x02, 0x03])),
        None,
        Some(OpenType::new(vec![0xFF])),
    ]);
    let pdu = NgapPdu::UnsuccessfulOutcome(msg);

    let bytes = encode_ngap_pdu(&pdu).unwrap();
    let decoded = decode_ngap_pdu(&bytes).unwrap();
    assert_eq!(decoded, pdu);
    assert_eq!(encode_ngap_pdu(&decoded).unwrap(), bytes);
}
