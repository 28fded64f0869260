#[path = "../common/mod.rs"]
mod common;

use std::thread;
use std::time::Duration;

use libsnep::config::SocketOptions;
use libsnep::transport::{LlcpLink, LlcpServerSocket, LlcpSocket, MockLlcpLink, MockLlcpSocket};
use libsnep::Error;

#[test]
fn pair_reports_crossed_miu() {
    let (a, b) = MockLlcpSocket::pair(128, 248);
    assert_eq!(a.local_miu(), 128);
    assert_eq!(a.remote_miu(), 248);
    assert_eq!(b.remote_miu(), 128);
}

#[test]
fn close_is_idempotent_and_fails_later_io() {
    let (a, b) = MockLlcpSocket::pair(128, 128);
    a.close().unwrap();
    a.close().unwrap();
    assert!(matches!(a.send(&[0x00]), Err(Error::ConnectionClosed)));
    assert!(matches!(a.receive(8, None), Err(Error::ConnectionClosed)));
    assert!(matches!(b.receive(8, None), Err(Error::ConnectionClosed)));
}

#[test]
fn closing_listener_unblocks_accept() {
    let link = MockLlcpLink::new();
    let listener = link
        .listen(4, "urn:nfc:sn:snep", &SocketOptions::default())
        .unwrap();
    let waiter = {
        let listener = listener.clone();
        thread::spawn(move || listener.accept())
    };
    thread::sleep(Duration::from_millis(20));
    listener.close().unwrap();
    assert!(matches!(waiter.join().unwrap(), Err(Error::ConnectionClosed)));
}

#[test]
fn deactivate_drops_everything() {
    let link = MockLlcpLink::new();
    let listener = link.listen(4, "a", &SocketOptions::default()).unwrap();
    let client = link.connect_to_sap(4, &SocketOptions::default()).unwrap();
    let server = listener.accept().unwrap();

    link.deactivate();
    assert_eq!(link.listener_count(), 0);
    assert!(matches!(client.send(&[0x01]), Err(Error::ConnectionClosed)));
    assert!(matches!(server.receive(8, None), Err(Error::ConnectionClosed)));
    assert!(link.connect_to_sap(4, &SocketOptions::default()).is_err());
}

#[test]
fn unknown_service_is_unavailable() {
    let link = MockLlcpLink::new();
    let err = link
        .connect_to_service("urn:nfc:sn:nothing", &SocketOptions::default())
        .err().unwrap();
    assert!(matches!(err, Error::ServiceUnavailable(_)));
}
