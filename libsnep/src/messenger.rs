// libsnep-rs/libsnep/src/messenger.rs

//! SNEP fragmentation and reassembly over one LLCP data link.
//!
//! Outgoing messages larger than the negotiated fragment length are split:
//! the first fragment goes out alone, the receiver answers with a CONTINUE
//! header, then the remaining fragments are streamed without further
//! acknowledgement. Incoming messages are reassembled the same way in
//! reverse.

use std::sync::Arc;
use std::time::Duration;

use log::{debug, trace, warn};

use crate::compliance::ComplianceProfile;
use crate::constants::SNEP_HEADER_LEN;
use crate::protocol::parser::ByteReader;
use crate::protocol::snep::SnepMessage;
use crate::transport::LlcpSocket;
use crate::types::{Field, Version};
use crate::utils::{Deadline, preview};
use crate::{Error, Result};

/// Sends and receives whole SNEP messages over one connected socket,
/// handling the CONTINUE handshake for fragmented messages.
pub struct SnepMessenger {
    socket: Arc<dyn LlcpSocket>,
    fragment_length: usize,
    is_client: bool,
    profile: ComplianceProfile,
    receive_timeout: Option<Duration>,
}

impl std::fmt::Debug for SnepMessenger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnepMessenger")
            .field("fragment_length", &self.fragment_length)
            .field("is_client", &self.is_client)
            .field("profile", &self.profile)
            .field("receive_timeout", &self.receive_timeout)
            .finish_non_exhaustive()
    }
}

impl SnepMessenger {
    /// `is_client` selects which CONTINUE/REJECT codes this side sends and
    /// expects. `receive_timeout` bounds each whole exchange (one
    /// `get_message`, or the handshake wait in `send_message`).
    pub fn new(
        is_client: bool,
        socket: Arc<dyn LlcpSocket>,
        fragment_length: usize,
        profile: ComplianceProfile,
        receive_timeout: Option<Duration>,
    ) -> Result<Self> {
        if fragment_length == 0 {
            return Err(Error::InvalidArgument(
                "fragment length must be positive".into(),
            ));
        }
        Ok(Self {
            socket,
            fragment_length,
            is_client,
            profile,
            receive_timeout,
        })
    }

    pub fn fragment_length(&self) -> usize {
        self.fragment_length
    }

    pub fn is_client(&self) -> bool {
        self.is_client
    }

    pub fn profile(&self) -> ComplianceProfile {
        self.profile
    }

    pub fn socket(&self) -> &Arc<dyn LlcpSocket> {
        &self.socket
    }

    /// Send `msg`, fragmenting it if needed.
    ///
    /// Fails with `Error::UnexpectedResponse` when the peer answers the first
    /// fragment with anything but its CONTINUE code; no further fragments
    /// are sent in that case.
    pub fn send_message(&self, msg: &SnepMessage) -> Result<()> {
        let buffer = msg.to_bytes();
        let peer_continue = Field::continue_for(!self.is_client);
        debug!(
            "sending {} ({} bytes, fragment length {})",
            msg.field(),
            buffer.len(),
            self.fragment_length
        );

        let mut offset = self.send_fragment(&buffer, 0)?;
        if offset == buffer.len() {
            return Ok(());
        }

        let deadline = Deadline::after(self.receive_timeout);
        let reply = self.read_control(&deadline)?;
        debug!("reply to first fragment: {}", reply);
        if reply != peer_continue {
            return Err(Error::UnexpectedResponse {
                expected: peer_continue.as_u8(),
                actual: reply.as_u8(),
            });
        }

        if self.profile.aborts_put_on_second_continue(self.is_client) {
            offset = self.send_fragment(&buffer, offset)?;
            let reply = self.read_control(&deadline)?;
            debug!("reply to second fragment: {}", reply);
            if reply == peer_continue {
                self.close_quietly();
                return Ok(());
            }
        }

        let per_fragment_ack = self.profile.expects_ack_per_fragment(self.is_client);
        while offset < buffer.len() {
            offset = self.send_fragment(&buffer, offset)?;
            if per_fragment_ack {
                let reply = self.read_control(&Deadline::after(self.receive_timeout))?;
                if reply == peer_continue {
                    debug!("peer acknowledged fragment with {}, disconnecting", reply);
                    self.close_quietly();
                    return Ok(());
                }
            }
        }
        Ok(())
    }

    /// Receive one complete message, reassembling fragments.
    ///
    /// A major version mismatch returns the bare header with a zero length
    /// so the caller can answer UNSUPPORTED_VERSION, unless the compliance
    /// profile asks for the connection to be closed instead.
    pub fn get_message(&self) -> Result<SnepMessage> {
        let deadline = Deadline::after(self.receive_timeout);
        let field_continue = Field::continue_for(self.is_client);
        let field_reject = Field::reject_for(self.is_client);

        let mut buffer = match self.receive_chunk(&deadline) {
            Ok(chunk) => chunk,
            Err(e) => {
                self.send_control_quietly(field_reject);
                return Err(e);
            }
        };

        if buffer.len() < SNEP_HEADER_LEN {
            debug!("short header ({} bytes)", buffer.len());
            if self.profile.closes_on_short_header(self.is_client) {
                self.close_quietly();
            } else {
                self.send_control_quietly(field_reject);
            }
            return Err(Error::InvalidLength {
                expected: SNEP_HEADER_LEN,
                actual: buffer.len(),
            });
        }

        let (version, field, length) = parse_header(&buffer)?;
        debug!(
            "received {} v{} declaring {} bytes, {} in first fragment",
            field,
            version,
            length,
            buffer.len() - SNEP_HEADER_LEN
        );

        if !version.is_compatible() {
            if self.profile.closes_on_unsupported_version() {
                if let Err(e) =
                    self.send_message(&SnepMessage::message(Field::RESPONSE_UNSUPPORTED_VERSION))
                {
                    debug!("failed to send UNSUPPORTED_VERSION: {}", e);
                }
                self.close_quietly();
                return Err(Error::UnsupportedVersion {
                    major: version.major(),
                    minor: version.minor(),
                });
            }
            return Ok(SnepMessage::header_only(version, field, 0));
        }

        if self.profile.is_dta() {
            if let Some(header) = self.check_compliance(version, field, length)? {
                return Ok(header);
            }
        }

        let total = SNEP_HEADER_LEN as u64 + u64::from(length);
        if (buffer.len() as u64) < total {
            debug!("requesting continuation");
            self.socket
                .send(&SnepMessage::message(field_continue).to_bytes())?;

            while (buffer.len() as u64) < total {
                match self.receive_chunk(&deadline) {
                    Ok(chunk) => buffer.extend_from_slice(&chunk),
                    Err(e) => {
                        self.send_control_quietly(field_reject);
                        return Err(e);
                    }
                }
            }
        }

        if buffer.len() as u64 > total {
            return Err(Error::Format(format!(
                "received {} bytes for a message declaring {}",
                buffer.len() - SNEP_HEADER_LEN,
                length
            )));
        }

        SnepMessage::from_bytes(&buffer).map_err(|e| match e {
            Error::Format(_) => e,
            other => Error::Format(other.to_string()),
        })
    }

    /// Close the underlying socket.
    pub fn close(&self) -> Result<()> {
        self.socket.close()
    }

    /// Compliance-mode reactions to a valid header. `Some` short-circuits
    /// reassembly and hands the bare header to the caller.
    fn check_compliance(
        &self,
        version: Version,
        field: Field,
        length: u32,
    ) -> Result<Option<SnepMessage>> {
        if !self.is_client
            && matches!(
                field,
                Field::RESPONSE_CONTINUE | Field::RESPONSE_SUCCESS | Field::RESPONSE_NOT_FOUND
            )
        {
            debug!("response code {} sent to server, disconnecting", field);
            self.close_quietly();
            return Err(Error::Format(format!("unexpected {} from client", field)));
        }
        if !self.is_client && field == Field::REQUEST_RFU {
            debug!("unknown request, disconnecting");
            if let Err(e) = self.send_message(&SnepMessage::message(Field::RESPONSE_BAD_REQUEST)) {
                debug!("failed to send BAD_REQUEST: {}", e);
            }
            self.close_quietly();
            return Err(Error::Format(format!("unknown request {}", field)));
        }
        if self.is_client && field == Field::REQUEST_PUT {
            debug!("PUT request sent to client, disconnecting");
            self.close_quietly();
            return Err(Error::Format(format!("unexpected {} from server", field)));
        }
        if self.profile.refuses_length(self.is_client, length) {
            debug!("declared length {} refused", length);
            return Ok(Some(SnepMessage::header_only(version, field, length)));
        }
        Ok(None)
    }

    fn send_fragment(&self, buffer: &[u8], offset: usize) -> Result<usize> {
        let end = buffer.len().min(offset + self.fragment_length);
        let fragment = &buffer[offset..end];
        trace!("-> [{}] {}", fragment.len(), preview(fragment));
        self.socket.send(fragment)?;
        Ok(end)
    }

    fn receive_chunk(&self, deadline: &Deadline) -> Result<Vec<u8>> {
        let chunk = self
            .socket
            .receive(self.fragment_length, deadline.remaining()?)?;
        trace!("<- [{}] {}", chunk.len(), preview(&chunk));
        Ok(chunk)
    }

    /// Read a header-only control message (CONTINUE/REJECT) and return its
    /// field code.
    fn read_control(&self, deadline: &Deadline) -> Result<Field> {
        let data = self
            .socket
            .receive(SNEP_HEADER_LEN, deadline.remaining()?)?;
        trace!("<- [{}] {}", data.len(), preview(&data));
        let (_, field, _) = parse_header(&data).map_err(|e| {
            Error::Format(format!("invalid snep message: {}", e))
        })?;
        Ok(field)
    }

    fn send_control_quietly(&self, field: Field) {
        if let Err(e) = self.socket.send(&SnepMessage::message(field).to_bytes()) {
            debug!("failed to send {}: {}", field, e);
        }
    }

    fn close_quietly(&self) {
        if let Err(e) = self.socket.close() {
            warn!("failed to close snep socket: {}", e);
        }
    }
}

fn parse_header(data: &[u8]) -> Result<(Version, Field, u32)> {
    let mut reader = ByteReader::new(data);
    let version = Version::from_byte(reader.u8()?);
    let field = Field::new(reader.u8()?);
    let length = reader.be_u32()?;
    Ok((version, field, length))
}
