// libsnep-rs/libsnep/src/ndef/message.rs

use super::record::{NdefRecord, parse_records};
use crate::protocol::parser::ByteReader;
use crate::{Error, Result};

/// Ordered, non-empty list of NDEF records.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NdefMessage {
    records: Vec<NdefRecord>,
}

impl NdefMessage {
    pub fn new(records: Vec<NdefRecord>) -> Result<Self> {
        if records.is_empty() {
            return Err(Error::InvalidArgument(
                "ndef message must contain at least one record".into(),
            ));
        }
        Ok(Self { records })
    }

    /// Convenience for the common single-record case.
    pub fn single(record: NdefRecord) -> Self {
        Self {
            records: vec![record],
        }
    }

    /// Decode a complete NDEF message. Trailing bytes after the record
    /// carrying ME are rejected.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let mut reader = ByteReader::new(data);
        let records = parse_records(&mut reader).map_err(|e| match e {
            Error::InvalidLength { .. } => Error::Ndef("expected more data".into()),
            other => other,
        })?;
        if reader.remaining() > 0 {
            return Err(Error::Ndef(format!(
                "trailing data: {} bytes after message end",
                reader.remaining()
            )));
        }
        Ok(Self { records })
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.encoded_len());
        let last = self.records.len() - 1;
        for (i, record) in self.records.iter().enumerate() {
            record.write_to(&mut out, i == 0, i == last);
        }
        out
    }

    pub fn encoded_len(&self) -> usize {
        self.records.iter().map(NdefRecord::encoded_len).sum()
    }

    pub fn records(&self) -> &[NdefRecord] {
        &self.records
    }
}

impl From<NdefRecord> for NdefMessage {
    fn from(record: NdefRecord) -> Self {
        Self::single(record)
    }
}

impl TryFrom<&[u8]> for NdefMessage {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        Self::from_bytes(bytes)
    }
}
