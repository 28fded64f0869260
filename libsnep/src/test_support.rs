// libsnep-rs/libsnep/src/test_support.rs

//! Fixtures shared by unit tests and the tests/ directory.
#![allow(dead_code)]

use std::sync::Arc;

use parking_lot::Mutex;

use crate::compliance::ComplianceProfile;
use crate::messenger::SnepMessenger;
use crate::ndef::{NdefMessage, NdefRecord, Tnf};
use crate::protocol::SnepMessage;
use crate::server::{NdefPushCallback, SnepCallback};
use crate::transport::MockLlcpSocket;
use crate::types::Field;
use crate::Result;

pub use crate::client::dta::{large_ndef, small_ndef};

/// Acceptable length below which `AcceptingCallback` answers EXCESS_DATA.
pub const GET_THRESHOLD: u32 = 1024;

/// Single text/plain record with `size` payload bytes cycling through A-Z.
#[doc(hidden)]
pub fn ndef_of_size(size: usize) -> NdefMessage {
    let payload = (0..size).map(|i| b'A' + (i % 26) as u8).collect();
    NdefMessage::single(NdefRecord::from_raw(Tnf::MimeMedia, b"text/plain", &[], payload))
}

/// Bound client/server messengers over an in-memory socket pair, with the
/// sockets returned for inspection.
#[doc(hidden)]
pub fn messenger_pair(
    client_miu: usize,
    server_miu: usize,
    profile: ComplianceProfile,
) -> Result<(SnepMessenger, SnepMessenger, Arc<MockLlcpSocket>, Arc<MockLlcpSocket>)> {
    let (client_sock, server_sock) = MockLlcpSocket::pair(client_miu, server_miu);
    let client = SnepMessenger::new(true, client_sock.clone(), server_miu, profile, None)?;
    let server = SnepMessenger::new(
        false,
        server_sock.clone(),
        server_miu.min(client_miu),
        profile,
        None,
    )?;
    Ok((client, server, client_sock, server_sock))
}

/// SNEP callback that accepts every PUT and answers GET with a canned
/// message when the acceptable length reaches `GET_THRESHOLD`.
#[doc(hidden)]
pub struct AcceptingCallback {
    received: Mutex<Vec<NdefMessage>>,
    get_response: Option<NdefMessage>,
}

impl Default for AcceptingCallback {
    fn default() -> Self {
        Self::with_get_response(small_ndef())
    }
}

impl AcceptingCallback {
    pub fn with_get_response(msg: NdefMessage) -> Self {
        Self {
            received: Mutex::new(Vec::new()),
            get_response: Some(msg),
        }
    }

    /// GET requests are answered with NOT_FOUND.
    pub fn without_get_response() -> Self {
        Self {
            received: Mutex::new(Vec::new()),
            get_response: None,
        }
    }

    pub fn received(&self) -> Vec<NdefMessage> {
        self.received.lock().clone()
    }
}

impl SnepCallback for AcceptingCallback {
    fn do_put(&self, msg: Option<NdefMessage>) -> SnepMessage {
        if let Some(msg) = msg {
            self.received.lock().push(msg);
        }
        SnepMessage::success_response(None)
    }

    fn do_get(&self, acceptable_length: u32, _msg: Option<NdefMessage>) -> SnepMessage {
        if acceptable_length < GET_THRESHOLD {
            return SnepMessage::message(Field::RESPONSE_EXCESS_DATA);
        }
        match &self.get_response {
            Some(msg) => SnepMessage::success_response(Some(msg.clone())),
            None => SnepMessage::message(Field::RESPONSE_NOT_FOUND),
        }
    }
}

/// NDEF Push callback that records every delivered message.
#[doc(hidden)]
#[derive(Default)]
pub struct RecordingPushCallback {
    received: Mutex<Vec<NdefMessage>>,
}

impl RecordingPushCallback {
    pub fn received(&self) -> Vec<NdefMessage> {
        self.received.lock().clone()
    }
}

impl NdefPushCallback for RecordingPushCallback {
    fn on_message_received(&self, msg: NdefMessage) {
        self.received.lock().push(msg);
    }
}
