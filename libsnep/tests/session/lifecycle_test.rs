#[path = "../common/mod.rs"]
mod common;

use std::sync::Arc;
use std::time::{Duration, Instant};

use common::fixtures::small_ndef;
use libsnep::config::{SnepClientConfig, SnepServerConfig};
use libsnep::server::SnepServer;
use libsnep::test_support::AcceptingCallback;
use libsnep::transport::{LlcpLink, LlcpSocket, MockLlcpLink};
use libsnep::{Error, Field, SnepClient};
use serial_test::serial;

fn server_on(link: &Arc<MockLlcpLink>) -> SnepServer {
    SnepServer::new(
        link.clone(),
        SnepServerConfig::default(),
        Arc::new(AcceptingCallback::default()),
    )
}

#[test]
#[serial]
fn start_is_idempotent_and_restartable() {
    let link = MockLlcpLink::new();
    let server = server_on(&link);
    assert!(!server.is_running());

    server.start().unwrap();
    server.start().unwrap();
    assert!(server.is_running());
    assert_eq!(link.listener_count(), 1);

    server.stop();
    assert!(!server.is_running());
    assert_eq!(link.listener_count(), 0);
    server.stop();

    server.start().unwrap();
    let client = SnepClient::new(link.clone(), SnepClientConfig::default());
    client.connect().unwrap();
    assert_eq!(client.put(small_ndef()).unwrap().field(), Field::RESPONSE_SUCCESS);
}

#[test]
#[serial]
fn listen_error_is_returned_from_start() {
    let link = MockLlcpLink::new();
    let first = server_on(&link);
    first.start().unwrap();

    let second = server_on(&link);
    assert!(matches!(second.start(), Err(Error::ServiceUnavailable(_))));
    assert!(!second.is_running());
}

#[test]
#[serial]
fn stop_unblocks_silent_session() {
    common::init_logger();
    let link = MockLlcpLink::new();
    let server = server_on(&link);
    server.start().unwrap();

    // connected peer that never sends anything
    let silent = link.connect_to_sap(4, &Default::default()).unwrap();
    assert!(common::wait_until(Duration::from_secs(2), || server.session_count() == 1));

    let started = Instant::now();
    server.stop();
    assert!(started.elapsed() < Duration::from_secs(2));
    assert_eq!(server.session_count(), 0);
    assert!(matches!(silent.receive(16, None), Err(Error::ConnectionClosed)));
}

#[test]
#[serial]
fn session_ends_when_client_closes() {
    let link = MockLlcpLink::new();
    let server = server_on(&link);
    server.start().unwrap();

    let client = SnepClient::new(link.clone(), SnepClientConfig::default());
    client.connect().unwrap();
    client.put(small_ndef()).unwrap();
    assert_eq!(server.session_count(), 1);

    client.close();
    assert!(common::wait_until(Duration::from_secs(2), || server.session_count() == 0));
}

#[test]
#[serial]
fn receive_timeout_ends_idle_session() {
    let link = MockLlcpLink::new();
    let server = SnepServer::new(
        link.clone(),
        SnepServerConfig::default().with_receive_timeout(Duration::from_millis(30)),
        Arc::new(AcceptingCallback::default()),
    );
    server.start().unwrap();

    let idle = link.connect_to_sap(4, &Default::default()).unwrap();
    assert!(common::wait_until(Duration::from_secs(2), || server.session_count() == 0));
    // REJECT sent when the deadline hit
    assert_eq!(idle.receive(16, None).unwrap(), vec![0x10, 0xff, 0, 0, 0, 0]);
}

#[test]
#[serial]
fn acceptor_listens_again_after_link_loss() {
    common::init_logger();
    let link = MockLlcpLink::new();
    let server = server_on(&link);
    server.start().unwrap();

    link.deactivate();
    assert!(common::wait_until(Duration::from_secs(2), || link.listener_count() == 1));
    assert!(server.is_running());

    let client = SnepClient::new(link.clone(), SnepClientConfig::default());
    client.connect().unwrap();
    assert_eq!(client.put(small_ndef()).unwrap().field(), Field::RESPONSE_SUCCESS);
}
