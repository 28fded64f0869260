// libsnep-rs/libsnep/src/protocol/snep.rs

use crate::constants::{SNEP_GET_EXTRA_LEN, SNEP_HEADER_LEN};
use crate::ndef::NdefMessage;
use crate::protocol::parser::ByteReader;
use crate::types::{Field, Version};
use crate::{Error, Result};

/// A single SNEP protocol data unit.
///
/// Wire format: `[version:1][field:1][length:4 BE]`, then for GET requests
/// `[acceptable_length:4 BE]`, then the serialized NDEF message. `length`
/// counts everything after the 6-byte header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnepMessage {
    version: Version,
    field: Field,
    length: u32,
    acceptable_length: Option<u32>,
    ndef: Option<NdefMessage>,
}

impl SnepMessage {
    fn build(field: Field, acceptable_length: Option<u32>, ndef: Option<NdefMessage>) -> Self {
        let ndef_len = ndef.as_ref().map_or(0, NdefMessage::encoded_len) as u32;
        let length = if field == Field::REQUEST_GET {
            ndef_len + SNEP_GET_EXTRA_LEN as u32
        } else {
            ndef_len
        };
        Self {
            version: Version::CURRENT,
            field,
            length,
            acceptable_length,
            ndef,
        }
    }

    pub fn get_request(acceptable_length: u32, ndef: NdefMessage) -> Self {
        Self::build(Field::REQUEST_GET, Some(acceptable_length), Some(ndef))
    }

    pub fn put_request(ndef: NdefMessage) -> Self {
        Self::build(Field::REQUEST_PUT, None, Some(ndef))
    }

    pub fn success_response(ndef: Option<NdefMessage>) -> Self {
        Self::build(Field::RESPONSE_SUCCESS, None, ndef)
    }

    /// Header-only control message (CONTINUE, REJECT, BAD_REQUEST, ...).
    pub fn message(field: Field) -> Self {
        let acceptable = (field == Field::REQUEST_GET).then_some(0);
        Self::build(field, acceptable, None)
    }

    /// Header as received from the peer, without a body. Used when the
    /// body is deliberately not read (version mismatch, oversized length).
    pub(crate) fn header_only(version: Version, field: Field, length: u32) -> Self {
        Self {
            version,
            field,
            length,
            acceptable_length: (field == Field::REQUEST_GET).then_some(0),
            ndef: None,
        }
    }

    /// Replace the version byte, keeping every other field.
    pub fn with_version(mut self, version: Version) -> Self {
        self.version = version;
        self
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let mut reader = ByteReader::new(data);
        let version = Version::from_byte(reader.u8()?);
        let field = Field::new(reader.u8()?);
        let length = reader.be_u32()?;

        let (acceptable_length, ndef_len) = if field == Field::REQUEST_GET {
            let acceptable = reader.be_u32()?;
            let ndef_len = length.checked_sub(SNEP_GET_EXTRA_LEN as u32).ok_or_else(|| {
                Error::Format(format!("GET request length {} below 4", length))
            })?;
            (Some(acceptable), ndef_len)
        } else {
            (None, length)
        };

        let ndef = if ndef_len > 0 {
            let bytes = reader.take(ndef_len as usize)?;
            Some(NdefMessage::from_bytes(bytes)?)
        } else {
            None
        };

        Ok(Self {
            version,
            field,
            length,
            acceptable_length,
            ndef,
        })
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let ndef_bytes = self.ndef.as_ref().map(NdefMessage::to_bytes).unwrap_or_default();
        let is_get = self.field == Field::REQUEST_GET;

        let mut out = Vec::with_capacity(
            SNEP_HEADER_LEN + if is_get { SNEP_GET_EXTRA_LEN } else { 0 } + ndef_bytes.len(),
        );
        out.push(self.version.as_u8());
        out.push(self.field.as_u8());
        if is_get {
            out.extend_from_slice(&(ndef_bytes.len() as u32 + SNEP_GET_EXTRA_LEN as u32).to_be_bytes());
            out.extend_from_slice(&self.acceptable_length.unwrap_or(0).to_be_bytes());
        } else {
            out.extend_from_slice(&(ndef_bytes.len() as u32).to_be_bytes());
        }
        out.extend_from_slice(&ndef_bytes);
        out
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn field(&self) -> Field {
        self.field
    }

    pub fn length(&self) -> u32 {
        self.length
    }

    /// Maximum response length the requester accepts. Only GET requests
    /// carry this field.
    pub fn acceptable_length(&self) -> Result<u32> {
        match self.acceptable_length {
            Some(len) if self.field == Field::REQUEST_GET => Ok(len),
            _ => Err(Error::UnsupportedOperation(
                "acceptable length only available on get request messages".into(),
            )),
        }
    }

    pub fn ndef_message(&self) -> Option<&NdefMessage> {
        self.ndef.as_ref()
    }

    pub fn into_ndef_message(self) -> Option<NdefMessage> {
        self.ndef
    }
}
