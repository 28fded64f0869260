//! SNEP and NDEF Push round trips over the in-memory LLCP link.
//!
//! Usage:
//!   RUST_LOG=debug cargo run -p libsnep --example loopback

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use libsnep::prelude::*;
use libsnep::transport::MockLlcpLink;

struct Printer;

impl SnepCallback for Printer {
    fn do_put(&self, msg: Option<NdefMessage>) -> SnepMessage {
        if let Some(msg) = msg {
            println!("server: PUT with {} record(s)", msg.records().len());
        }
        SnepMessage::success_response(None)
    }

    fn do_get(&self, acceptable_length: u32, _msg: Option<NdefMessage>) -> SnepMessage {
        println!("server: GET, acceptable length {}", acceptable_length);
        SnepMessage::success_response(Some(libsnep::test_support::large_ndef()))
    }
}

impl NdefPushCallback for Printer {
    fn on_message_received(&self, msg: NdefMessage) {
        println!("npp server: received {} bytes", msg.encoded_len());
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let link = MockLlcpLink::new();
    let printer = Arc::new(Printer);

    let snep = SnepServer::new(link.clone(), SnepServerConfig::default(), printer.clone());
    snep.start().context("starting snep server")?;
    let npp = NdefPushServer::new(link.clone(), NdefPushServerConfig::new(0x10), printer);
    npp.start().context("starting ndef push server")?;

    let client = SnepClient::new(link.clone(), SnepClientConfig::default());
    client.connect().context("connecting snep client")?;

    let text = NdefMessage::single(NdefRecord::text("en", "hello from libsnep")?);
    let reply = client.put(text.clone())?;
    println!("client: PUT answered with {}", reply.field());

    let reply = client.get(text.clone())?;
    let size = reply.ndef_message().map_or(0, NdefMessage::encoded_len);
    println!("client: GET answered with {} ({} bytes of NDEF)", reply.field(), size);
    client.close();

    let push = NdefPushClient::new(link.clone(), NdefPushClientConfig::default());
    push.connect()?;
    push.push(text)?;

    // give the push session a moment to parse and dispatch
    std::thread::sleep(Duration::from_millis(50));
    snep.stop();
    npp.stop();
    Ok(())
}
