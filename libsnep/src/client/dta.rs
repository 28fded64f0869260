// libsnep-rs/libsnep/src/client/dta.rs

//! Canned client scenarios for NFC Forum DTA conformance runs.

use log::{debug, error};

use crate::client::SnepClient;
use crate::ndef::{NdefMessage, NdefRecord, RTD_TEXT, Tnf};
use crate::protocol::SnepMessage;
use crate::{Error, Result};

const SMALL_TEXT: &str = "Lorem ipsum dolor sit amet.";

const LARGE_TEXT: &str = "Lorem ipsum dolor sit amet, consectetur adipiscing elit. Phasellus at \
lorem nunc, ut venenatis quam. Etiam id dolor quam, at viverra dolor. \
Phasellus eu lacus ligula, quis euismod erat. Sed feugiat, ligula at \
mollis aliquet, justo lacus condimentum eros, non tincidunt neque \
ipsum eu risus. Sed adipiscing dui euismod tellus ullamcorper ornare. \
Phasellus mattis risus et lectus euismod eu fermentum sem cursus. \
Phasellus tristique consectetur mauris eu porttitor. Sed lobortis \
porttitor orci.";

fn latin_text(text: &str) -> NdefMessage {
    let mut payload = Vec::with_capacity(3 + text.len());
    payload.push(2);
    payload.extend_from_slice(b"la");
    payload.extend_from_slice(text.as_bytes());
    NdefMessage::single(NdefRecord::from_raw(Tnf::WellKnown, RTD_TEXT, &[], payload))
}

/// Single short text record used by the PUT and GET test cases.
pub fn small_ndef() -> NdefMessage {
    latin_text(SMALL_TEXT)
}

/// Text record large enough to need fragmentation at the default MIU.
pub fn large_ndef() -> NdefMessage {
    latin_text(LARGE_TEXT)
}

/// Connect, run the scenario for `test_case` and close again.
///
/// Cases 1-4 PUT the small message, 5-6 PUT the large one, 7-9 GET with
/// the small message. Other ids fail with `Error::InvalidArgument`.
pub fn run_test_case(client: &SnepClient, test_case: u8) -> Result<SnepMessage> {
    let request: fn(&SnepClient) -> Result<SnepMessage> = match test_case {
        1..=4 => |c| c.put(small_ndef()),
        5..=6 => |c| c.put(large_ndef()),
        7..=9 => |c| c.get(small_ndef()),
        other => {
            return Err(Error::InvalidArgument(format!(
                "unknown dta client test case {}",
                other
            )));
        }
    };

    debug!("running dta client test case {}", test_case);
    client.connect()?;
    let result = request(client);
    if let Err(e) = &result {
        error!("dta client test case {} failed: {}", test_case, e);
    }
    client.close();
    result
}
