#[path = "../common/mod.rs"]
mod common;

use std::sync::Arc;

use libsnep::client::dta::run_test_case;
use libsnep::config::{ServiceTarget, SnepClientConfig, SnepServerConfig};
use libsnep::constants::{DTA_SERVER_SAP, SNEP_TEST_SERVICE_NAME};
use libsnep::server::SnepServer;
use libsnep::server::dta::start_server;
use libsnep::test_support::{AcceptingCallback, large_ndef, small_ndef};
use libsnep::transport::MockLlcpLink;
use libsnep::{Field, SnepClient};

fn dta_setup(test_case: u8) -> (Arc<MockLlcpLink>, SnepServer, Arc<AcceptingCallback>, SnepClient) {
    let link = MockLlcpLink::new();
    let callback = Arc::new(AcceptingCallback::default());
    let server = SnepServer::new(link.clone(), SnepServerConfig::dta(0), callback.clone());
    server.start().unwrap();
    let client = SnepClient::new(
        link.clone(),
        SnepClientConfig::dta(test_case).with_target(ServiceTarget::Sap(DTA_SERVER_SAP)),
    );
    (link, server, callback, client)
}

#[test]
fn put_cases_send_small_or_large() {
    common::init_logger();
    let (_link, _server, callback, client) = dta_setup(1);
    assert_eq!(run_test_case(&client, 1).unwrap().field(), Field::RESPONSE_SUCCESS);

    let (_link, _server, large_callback, large_client) = dta_setup(5);
    assert_eq!(run_test_case(&large_client, 5).unwrap().field(), Field::RESPONSE_SUCCESS);

    assert_eq!(callback.received(), vec![small_ndef()]);
    assert_eq!(large_callback.received(), vec![large_ndef()]);
}

#[test]
fn get_case_returns_canned_message() {
    let (_link, _server, _callback, client) = dta_setup(7);
    let reply = run_test_case(&client, 7).unwrap();
    assert_eq!(reply.ndef_message(), Some(&small_ndef()));
    assert_eq!(client.state(), libsnep::ConnectionState::Disconnected);
}

#[test]
fn test_service_name_resolves() {
    let (link, _server, _callback, _) = dta_setup(1);
    let client = SnepClient::new(
        link.clone(),
        SnepClientConfig::dta(2).with_target(ServiceTarget::Name(SNEP_TEST_SERVICE_NAME.into())),
    );
    assert_eq!(run_test_case(&client, 2).unwrap().field(), Field::RESPONSE_SUCCESS);
}

fn dta_client(link: &Arc<MockLlcpLink>, test_case: u8) -> SnepClient {
    SnepClient::new(
        link.clone(),
        SnepClientConfig::dta(test_case).with_target(ServiceTarget::Sap(DTA_SERVER_SAP)),
    )
}

#[test]
fn dta_server_answers_get_by_put_history() {
    common::init_logger();
    let link = MockLlcpLink::new();
    let _server = start_server(link.clone(), 0).unwrap();
    let client = dta_client(&link, 7);

    assert_eq!(run_test_case(&client, 7).unwrap().field(), Field::RESPONSE_NOT_FOUND);

    assert_eq!(run_test_case(&client, 1).unwrap().field(), Field::RESPONSE_SUCCESS);
    let reply = run_test_case(&client, 7).unwrap();
    assert_eq!(reply.field(), Field::RESPONSE_SUCCESS);
    assert_eq!(reply.ndef_message(), Some(&large_ndef()));

    // the PUT was consumed by the previous GET
    assert_eq!(run_test_case(&client, 8).unwrap().field(), Field::RESPONSE_NOT_FOUND);
}

#[test]
fn dta_server_excess_data_and_not_implemented() {
    let link = MockLlcpLink::new();
    let server = start_server(link.clone(), 0).unwrap();
    assert_eq!(server.config().service_name, SNEP_TEST_SERVICE_NAME);
    assert_eq!(server.config().sap, DTA_SERVER_SAP);

    let excess = SnepClient::new(
        link.clone(),
        SnepClientConfig::dta(7)
            .with_target(ServiceTarget::Sap(DTA_SERVER_SAP))
            .with_acceptable_length(501),
    );
    excess.connect().unwrap();
    assert_eq!(excess.put(small_ndef()).unwrap().field(), Field::RESPONSE_SUCCESS);
    assert_eq!(excess.get(small_ndef()).unwrap().field(), Field::RESPONSE_EXCESS_DATA);

    let other = SnepClient::new(
        link.clone(),
        SnepClientConfig::dta(7)
            .with_target(ServiceTarget::Sap(DTA_SERVER_SAP))
            .with_acceptable_length(600),
    );
    other.connect().unwrap();
    assert_eq!(other.put(small_ndef()).unwrap().field(), Field::RESPONSE_SUCCESS);
    assert_eq!(other.get(small_ndef()).unwrap().field(), Field::RESPONSE_NOT_IMPLEMENTED);
    excess.close();
    other.close();
}
