#[path = "../common/mod.rs"]
mod common;

use common::fixtures::{SMALL_NDEF_HEX, bytes, large_ndef, small_ndef};
use libsnep::protocol::NdefPushProtocol;
use libsnep::{Action, Error, ErrorKind};

#[test]
fn single_immediate_envelope_layout() {
    let envelope = NdefPushProtocol::new(small_ndef(), Action::IMMEDIATE);
    let ndef = bytes(SMALL_NDEF_HEX);

    let mut expected = vec![0x01, 0x00, 0x00, 0x00, 0x01, 0x01];
    expected.extend_from_slice(&(ndef.len() as u32).to_be_bytes());
    expected.extend_from_slice(&ndef);
    assert_eq!(envelope.to_bytes(), expected);
}

#[test]
fn immediate_is_first_immediate_entry() {
    let envelope = NdefPushProtocol::from_parts(
        &[Action::BACKGROUND, Action::IMMEDIATE],
        &[large_ndef(), small_ndef()],
    )
    .unwrap();
    let decoded = NdefPushProtocol::from_bytes(&envelope.to_bytes()).unwrap();
    assert_eq!(decoded.len(), 2);
    assert_eq!(decoded.immediate(), Some(&small_ndef()));
}

#[test]
fn mismatched_parts_are_rejected() {
    let res = NdefPushProtocol::from_parts(&[Action::IMMEDIATE], &[]);
    assert!(matches!(res, Err(Error::InvalidArgument(_))));

    let res = NdefPushProtocol::from_parts(&[], &[]);
    assert_eq!(res.unwrap_err().kind(), ErrorKind::Argument);
}

#[test]
fn malformed_envelopes() {
    // wrong version
    assert!(matches!(
        NdefPushProtocol::from_bytes(&[0x02, 0, 0, 0, 1]),
        Err(Error::Format(_))
    ));
    // no messages
    assert!(NdefPushProtocol::from_bytes(&[0x01, 0, 0, 0, 0]).is_err());
    // entry length beyond the buffer
    assert!(matches!(
        NdefPushProtocol::from_bytes(&[0x01, 0, 0, 0, 1, 0x01, 0, 0, 0, 9, 0xd0]),
        Err(Error::Format(_))
    ));
    assert!(NdefPushProtocol::from_bytes(&[]).is_err());
}
