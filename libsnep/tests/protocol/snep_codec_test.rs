#[path = "../common/mod.rs"]
mod common;

use common::fixtures::{SMALL_GET_HEX, SMALL_NDEF_HEX, SMALL_PUT_HEX, bytes, header, small_ndef};
use libsnep::protocol::SnepMessage;
use libsnep::{Error, ErrorKind, Field, Version};
use proptest::prelude::*;

#[test]
fn put_request_matches_capture() {
    let msg = SnepMessage::put_request(small_ndef());
    assert_eq!(msg.to_bytes(), bytes(SMALL_PUT_HEX));
    assert_eq!(msg.length() as usize, bytes(SMALL_NDEF_HEX).len());

    let decoded = SnepMessage::from_bytes(&bytes(SMALL_PUT_HEX)).unwrap();
    assert_eq!(decoded.field(), Field::REQUEST_PUT);
    assert_eq!(decoded.version(), Version::new(1, 0));
    assert_eq!(decoded.ndef_message(), Some(&small_ndef()));
}

#[test]
fn get_request_carries_acceptable_length() {
    let msg = SnepMessage::get_request(1024, small_ndef());
    assert_eq!(msg.to_bytes(), bytes(SMALL_GET_HEX));
    assert_eq!(msg.length() as usize, bytes(SMALL_NDEF_HEX).len() + 4);

    let decoded = SnepMessage::from_bytes(&bytes(SMALL_GET_HEX)).unwrap();
    assert_eq!(decoded.acceptable_length().unwrap(), 1024);
    assert_eq!(decoded, msg);
}

#[test]
fn acceptable_length_only_on_get() {
    let err = SnepMessage::put_request(small_ndef())
        .acceptable_length()
        .unwrap_err();
    assert!(matches!(err, Error::UnsupportedOperation(_)));
    assert_eq!(err.kind(), ErrorKind::Argument);
}

#[test]
fn header_only_messages() {
    assert_eq!(SnepMessage::message(Field::RESPONSE_CONTINUE).to_bytes(), header(0x80));
    assert_eq!(SnepMessage::message(Field::REQUEST_REJECT).to_bytes(), header(0x7f));
    assert_eq!(SnepMessage::success_response(None).to_bytes(), header(0x81));

    let decoded = SnepMessage::from_bytes(&header(0xc0)).unwrap();
    assert_eq!(decoded.field(), Field::RESPONSE_NOT_FOUND);
    assert!(decoded.ndef_message().is_none());
}

#[test]
fn truncated_input_is_rejected() {
    // header declares 0x22 bytes, only 3 follow
    let mut data = bytes(SMALL_PUT_HEX);
    data.truncate(9);
    assert_eq!(SnepMessage::from_bytes(&data).unwrap_err().kind(), ErrorKind::Format);

    // GET whose length cannot hold the acceptable length field
    let get = [0x10, 0x01, 0x00, 0x00, 0x00, 0x02, 0x00, 0x00, 0x04, 0x00];
    assert!(matches!(SnepMessage::from_bytes(&get), Err(Error::Format(_))));

    assert!(SnepMessage::from_bytes(&[0x10, 0x02]).is_err());
}

#[test]
fn minor_version_is_preserved() {
    let mut data = bytes(SMALL_PUT_HEX);
    data[0] = 0x13;
    let decoded = SnepMessage::from_bytes(&data).unwrap();
    assert_eq!(decoded.version().major(), 1);
    assert_eq!(decoded.version().minor(), 3);
    assert!(decoded.version().is_compatible());
    assert_eq!(decoded.to_bytes(), data);
}

proptest! {
    #[test]
    fn decode_never_panics(data in proptest::collection::vec(any::<u8>(), 0..64)) {
        let _ = SnepMessage::from_bytes(&data);
    }

    #[test]
    fn get_round_trip(acceptable in any::<u32>(), len in 0usize..600) {
        let msg = SnepMessage::get_request(acceptable, libsnep::test_support::ndef_of_size(len));
        let decoded = SnepMessage::from_bytes(&msg.to_bytes()).unwrap();
        prop_assert_eq!(decoded.acceptable_length().unwrap(), acceptable);
        prop_assert_eq!(decoded, msg);
    }
}
