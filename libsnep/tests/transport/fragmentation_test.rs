#[path = "../common/mod.rs"]
mod common;

use std::thread;

use common::fixtures::{header, large_ndef, small_ndef};
use libsnep::compliance::ComplianceProfile;
use libsnep::protocol::SnepMessage;
use libsnep::test_support::{messenger_pair, ndef_of_size};
use libsnep::transport::LlcpSocket;
use libsnep::{Error, Field};

#[test]
fn put_over_miu_128_is_reassembled() {
    common::init_logger();
    let (client, server, client_sock, _server_sock) =
        messenger_pair(128, 248, ComplianceProfile::Standard).unwrap();
    let request = SnepMessage::put_request(small_ndef());

    client.send_message(&request).unwrap();
    let received = server.get_message().unwrap();

    assert_eq!(received.field(), Field::REQUEST_PUT);
    assert_eq!(received.length(), small_ndef().encoded_len() as u32);
    assert_eq!(received.ndef_message(), Some(&small_ndef()));
    assert_eq!(client_sock.sent().len(), 1);
}

#[test]
fn fragment_count_is_ceil_of_length() {
    common::init_logger();
    for (size, fragment_length) in [(200usize, 128usize), (1000, 128), (1000, 250), (4000, 248)] {
        let (client, server, _client_sock, server_sock) =
            messenger_pair(fragment_length, fragment_length, ComplianceProfile::Standard).unwrap();
        let response = SnepMessage::success_response(Some(ndef_of_size(size)));
        let wire = response.to_bytes();

        let receiver = thread::spawn(move || client.get_message());
        server.send_message(&response).unwrap();
        let received = receiver.join().unwrap().unwrap();

        assert_eq!(received, response);
        let sent = server_sock.sent();
        assert_eq!(sent.len(), wire.len().div_ceil(fragment_length), "size {}", size);
        assert!(sent.iter().all(|f| f.len() <= fragment_length));
        assert_eq!(sent.concat(), wire);
    }
}

#[test]
fn large_get_response_is_fragmented_at_client_miu() {
    common::init_logger();
    let (client, server, client_sock, server_sock) =
        messenger_pair(128, 248, ComplianceProfile::Standard).unwrap();
    assert_eq!(server.fragment_length(), 128);

    let response = SnepMessage::success_response(Some(large_ndef()));
    let receiver = thread::spawn(move || client.get_message());
    server.send_message(&response).unwrap();
    let received = receiver.join().unwrap().unwrap();

    assert_eq!(received.ndef_message(), Some(&large_ndef()));
    assert_eq!(client_sock.sent(), vec![header(0x00)]);
    assert_eq!(server_sock.sent().len(), 4);
}

#[test]
fn reject_after_first_fragment() {
    let (client, _server, client_sock, server_sock) =
        messenger_pair(128, 128, ComplianceProfile::Standard).unwrap();

    let sender = thread::spawn(move || client.send_message(&SnepMessage::put_request(large_ndef())));
    let first = server_sock.receive(128, None).unwrap();
    assert_eq!(first.len(), 128);
    server_sock.send(&header(0xff)).unwrap();

    let err = sender.join().unwrap().unwrap_err();
    assert!(matches!(
        err,
        Error::UnexpectedResponse {
            expected: 0x80,
            actual: 0xff
        }
    ));
    assert_eq!(client_sock.sent().len(), 1);
}

#[test]
fn four_byte_header_is_rejected() {
    let (_client, server, client_sock, _server_sock) =
        messenger_pair(128, 128, ComplianceProfile::Standard).unwrap();
    client_sock.send(&[0x10, 0x02, 0x00, 0x00]).unwrap();

    let err = server.get_message().unwrap_err();
    assert!(matches!(err, Error::InvalidLength { expected: 6, actual: 4 }));
    assert_eq!(client_sock.receive(16, None).unwrap(), header(0xff));
}

#[test]
fn version_two_under_dta_closes() {
    let (_client, server, client_sock, server_sock) =
        messenger_pair(128, 128, ComplianceProfile::dta(1)).unwrap();
    client_sock.send(&[0x20, 0x02, 0x00, 0x00, 0x00, 0x00]).unwrap();

    assert!(matches!(server.get_message(), Err(Error::UnsupportedVersion { major: 2, .. })));
    assert_eq!(client_sock.receive(16, None).unwrap(), header(0xe1));
    assert!(server_sock.is_closed());
}

#[test]
fn dta_put_abort_on_second_continue() {
    let (client, _server, client_sock, server_sock) =
        messenger_pair(128, 128, ComplianceProfile::dta(6)).unwrap();

    let sender = thread::spawn(move || client.send_message(&SnepMessage::put_request(large_ndef())));
    server_sock.receive(128, None).unwrap();
    server_sock.send(&header(0x80)).unwrap();
    server_sock.receive(128, None).unwrap();
    server_sock.send(&header(0x80)).unwrap();

    sender.join().unwrap().unwrap();
    assert_eq!(client_sock.sent().len(), 2);
    assert!(client_sock.is_closed());
}
