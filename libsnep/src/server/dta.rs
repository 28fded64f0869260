// libsnep-rs/libsnep/src/server/dta.rs

//! Server side of NFC Forum DTA conformance runs.
//!
//! The tester PUTs a message first and then issues GETs whose acceptable
//! length selects the expected answer.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use log::debug;

use crate::Result;
use crate::client::dta::large_ndef;
use crate::config::SnepServerConfig;
use crate::constants::{DTA_ACCEPTABLE_LENGTH, DTA_EXCESS_DATA_LENGTH};
use crate::ndef::NdefMessage;
use crate::protocol::SnepMessage;
use crate::server::snep::{SnepCallback, SnepServer};
use crate::transport::LlcpLink;
use crate::types::Field;

/// Callback expected by the DTA server test cases.
///
/// Every PUT is accepted and arms the next GET. A GET that was not
/// preceded by a PUT gets NOT_FOUND; otherwise the acceptable length picks
/// EXCESS_DATA (501), the large text message (1024) or NOT_IMPLEMENTED.
#[derive(Debug, Default)]
pub struct DtaSnepCallback {
    put_before_get: AtomicBool,
}

impl DtaSnepCallback {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a PUT has been received since the last GET.
    pub fn put_received(&self) -> bool {
        self.put_before_get.load(Ordering::SeqCst)
    }
}

impl SnepCallback for DtaSnepCallback {
    fn do_put(&self, _msg: Option<NdefMessage>) -> SnepMessage {
        self.put_before_get.store(true, Ordering::SeqCst);
        SnepMessage::message(Field::RESPONSE_SUCCESS)
    }

    fn do_get(&self, acceptable_length: u32, _msg: Option<NdefMessage>) -> SnepMessage {
        if !self.put_before_get.swap(false, Ordering::SeqCst) {
            debug!("dta get without preceding put");
            return SnepMessage::message(Field::RESPONSE_NOT_FOUND);
        }
        match acceptable_length {
            DTA_EXCESS_DATA_LENGTH => SnepMessage::message(Field::RESPONSE_EXCESS_DATA),
            DTA_ACCEPTABLE_LENGTH => SnepMessage::success_response(Some(large_ndef())),
            other => {
                debug!("dta get with acceptable length {}", other);
                SnepMessage::message(Field::RESPONSE_NOT_IMPLEMENTED)
            }
        }
    }
}

/// Start a conformance server for `test_case` on the compliance-test
/// service name and SAP.
pub fn start_server(link: Arc<dyn LlcpLink>, test_case: u8) -> Result<SnepServer> {
    let server = SnepServer::new(
        link,
        SnepServerConfig::dta(test_case),
        Arc::new(DtaSnepCallback::new()),
    );
    server.start()?;
    debug!("dta snep server started for test case {}", test_case);
    Ok(server)
}
