#[path = "../common/mod.rs"]
mod common;

use std::sync::Arc;
use std::time::Duration;

use common::fixtures::{large_ndef, small_ndef};
use libsnep::config::{NdefPushClientConfig, NdefPushServerConfig};
use libsnep::server::NdefPushServer;
use libsnep::test_support::RecordingPushCallback;
use libsnep::transport::{LlcpLink, LlcpSocket, MockLlcpLink};
use libsnep::{ConnectionState, Error, NdefPushClient};

const NPP_SAP: u8 = 0x10;

#[test]
fn push_is_delivered_to_callback() {
    common::init_logger();
    let link = MockLlcpLink::new();
    let callback = Arc::new(RecordingPushCallback::default());
    let server = NdefPushServer::new(link.clone(), NdefPushServerConfig::new(NPP_SAP), callback.clone());
    server.start().unwrap();

    let client = NdefPushClient::new(link.clone(), NdefPushClientConfig::default());
    client.connect().unwrap();
    client.push(large_ndef()).unwrap();
    assert_eq!(client.state(), ConnectionState::Disconnected);

    assert!(common::wait_until(Duration::from_secs(2), || !callback.received().is_empty()));
    assert_eq!(callback.received(), vec![large_ndef()]);
}

#[test]
fn garbage_is_ignored() {
    let link = MockLlcpLink::new();
    let callback = Arc::new(RecordingPushCallback::default());
    let server = NdefPushServer::new(link.clone(), NdefPushServerConfig::new(NPP_SAP), callback.clone());
    server.start().unwrap();

    let socket = link
        .connect_to_service("com.android.npp", &Default::default())
        .unwrap();
    socket.send(&[0x07, 0x00, 0x00]).unwrap();
    socket.close().unwrap();
    assert!(common::wait_until(Duration::from_secs(2), || server.session_count() == 0));

    // server keeps accepting after a bad envelope
    let client = NdefPushClient::new(link.clone(), NdefPushClientConfig::default());
    client.connect().unwrap();
    client.push(small_ndef()).unwrap();
    assert!(common::wait_until(Duration::from_secs(2), || callback.received().len() == 1));
    assert_eq!(callback.received(), vec![small_ndef()]);
}

#[test]
fn push_requires_connect() {
    let client = NdefPushClient::new(MockLlcpLink::new(), NdefPushClientConfig::default());
    assert!(matches!(client.push(small_ndef()), Err(Error::NotConnected)));
    assert!(matches!(client.connect(), Err(Error::ServiceUnavailable(_))));
    assert_eq!(client.state(), ConnectionState::Disconnected);
}

#[test]
fn oversized_push_is_dropped() {
    common::init_logger();
    let link = MockLlcpLink::new();
    let callback = Arc::new(RecordingPushCallback::default());
    let config = NdefPushServerConfig::new(NPP_SAP).with_max_envelope_len(64);
    let server = NdefPushServer::new(link.clone(), config, callback.clone());
    server.start().unwrap();

    let client = NdefPushClient::new(link.clone(), NdefPushClientConfig::default());
    client.connect().unwrap();
    // the server may hang up before the last chunk goes out
    let _ = client.push(large_ndef());
    assert_eq!(client.state(), ConnectionState::Disconnected);

    let (_, server_sock) = link.connections()[0].clone();
    assert!(common::wait_until(Duration::from_secs(2), || {
        server_sock.is_closed() && server.session_count() == 0
    }));
    assert!(callback.received().is_empty());
}
