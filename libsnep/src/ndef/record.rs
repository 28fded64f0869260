// libsnep-rs/libsnep/src/ndef/record.rs

use crate::protocol::parser::ByteReader;
use crate::{Error, Result};

pub(crate) const FLAG_MB: u8 = 0x80;
pub(crate) const FLAG_ME: u8 = 0x40;
pub(crate) const FLAG_CF: u8 = 0x20;
pub(crate) const FLAG_SR: u8 = 0x10;
pub(crate) const FLAG_IL: u8 = 0x08;
const TNF_MASK: u8 = 0x07;

/// Upper bound on a single record payload accepted by the decoder.
pub const MAX_PAYLOAD_SIZE: usize = 10 * (1 << 20);

/// Type Name Format (3 bits)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tnf {
    Empty = 0x00,
    WellKnown = 0x01,
    MimeMedia = 0x02,
    AbsoluteUri = 0x03,
    External = 0x04,
    Unknown = 0x05,
    Unchanged = 0x06,
    Reserved = 0x07,
}

impl Tnf {
    pub fn from_bits(bits: u8) -> Self {
        match bits & TNF_MASK {
            0x00 => Tnf::Empty,
            0x01 => Tnf::WellKnown,
            0x02 => Tnf::MimeMedia,
            0x03 => Tnf::AbsoluteUri,
            0x04 => Tnf::External,
            0x05 => Tnf::Unknown,
            0x06 => Tnf::Unchanged,
            _ => Tnf::Reserved,
        }
    }

    pub fn bits(self) -> u8 {
        self as u8
    }
}

/// Well-known record type "T"
pub const RTD_TEXT: &[u8] = b"T";
/// Well-known record type "U"
pub const RTD_URI: &[u8] = b"U";

/// A single logical NDEF record. Chunked records are reassembled on decode
/// and never produced on encode.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NdefRecord {
    tnf: Tnf,
    record_type: Vec<u8>,
    id: Vec<u8>,
    payload: Vec<u8>,
}

impl NdefRecord {
    pub fn new(tnf: Tnf, record_type: &[u8], id: &[u8], payload: &[u8]) -> Result<Self> {
        if record_type.len() > 255 || id.len() > 255 {
            return Err(Error::InvalidArgument(
                "record type and id are limited to 255 bytes".into(),
            ));
        }
        validate_tnf(tnf, record_type, id, payload).map_err(Error::InvalidArgument)?;
        Ok(Self {
            tnf,
            record_type: record_type.to_vec(),
            id: id.to_vec(),
            payload: payload.to_vec(),
        })
    }

    /// Well-known text record: status byte (UTF-8, language length),
    /// language code, then the text itself.
    pub fn text(lang: &str, text: &str) -> Result<Self> {
        let lang = lang.as_bytes();
        if lang.len() > 0x3f {
            return Err(Error::InvalidArgument("language code too long".into()));
        }
        let mut payload = Vec::with_capacity(1 + lang.len() + text.len());
        payload.push(lang.len() as u8);
        payload.extend_from_slice(lang);
        payload.extend_from_slice(text.as_bytes());
        Self::new(Tnf::WellKnown, RTD_TEXT, &[], &payload)
    }

    /// Absolute URI record; the URI is carried in the type field.
    pub fn uri_absolute(uri: &str) -> Result<Self> {
        Self::new(Tnf::AbsoluteUri, uri.as_bytes(), &[], &[])
    }

    pub fn mime(mime_type: &str, payload: &[u8]) -> Result<Self> {
        if mime_type.is_empty() {
            return Err(Error::InvalidArgument("mime type must not be empty".into()));
        }
        Self::new(Tnf::MimeMedia, mime_type.as_bytes(), &[], payload)
    }

    /// Build without validation. Callers guarantee a consistent TNF and
    /// field sizes within the wire limits.
    pub(crate) fn from_raw(tnf: Tnf, record_type: &[u8], id: &[u8], payload: Vec<u8>) -> Self {
        Self {
            tnf,
            record_type: record_type.to_vec(),
            id: id.to_vec(),
            payload,
        }
    }

    pub fn empty() -> Self {
        Self {
            tnf: Tnf::Empty,
            record_type: Vec::new(),
            id: Vec::new(),
            payload: Vec::new(),
        }
    }

    pub fn tnf(&self) -> Tnf {
        self.tnf
    }

    pub fn record_type(&self) -> &[u8] {
        &self.record_type
    }

    pub fn id(&self) -> &[u8] {
        &self.id
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Encoded size of this record on the wire.
    pub fn encoded_len(&self) -> usize {
        let short = self.payload.len() < 256;
        let id_len_field = usize::from(!self.id.is_empty());
        1 + 1
            + if short { 1 } else { 4 }
            + id_len_field
            + self.record_type.len()
            + self.id.len()
            + self.payload.len()
    }

    pub(crate) fn write_to(&self, out: &mut Vec<u8>, mb: bool, me: bool) {
        let short = self.payload.len() < 256;
        let il = !self.id.is_empty();

        let mut flags = self.tnf.bits();
        if mb {
            flags |= FLAG_MB;
        }
        if me {
            flags |= FLAG_ME;
        }
        if short {
            flags |= FLAG_SR;
        }
        if il {
            flags |= FLAG_IL;
        }

        out.push(flags);
        out.push(self.record_type.len() as u8);
        if short {
            out.push(self.payload.len() as u8);
        } else {
            out.extend_from_slice(&(self.payload.len() as u32).to_be_bytes());
        }
        if il {
            out.push(self.id.len() as u8);
        }
        out.extend_from_slice(&self.record_type);
        out.extend_from_slice(&self.id);
        out.extend_from_slice(&self.payload);
    }
}

/// Check the TNF-specific constraints on type/id/payload. Returns a
/// human-readable reason on violation.
fn validate_tnf(
    tnf: Tnf,
    record_type: &[u8],
    id: &[u8],
    payload: &[u8],
) -> std::result::Result<(), String> {
    match tnf {
        Tnf::Empty => {
            if !record_type.is_empty() || !id.is_empty() || !payload.is_empty() {
                return Err("unexpected data in TNF_EMPTY record".into());
            }
        }
        Tnf::WellKnown | Tnf::MimeMedia | Tnf::AbsoluteUri | Tnf::External => {}
        Tnf::Unknown | Tnf::Reserved => {
            if !record_type.is_empty() {
                return Err("unexpected type field in TNF_UNKNOWN or TNF_RESERVED record".into());
            }
        }
        Tnf::Unchanged => {
            return Err("unexpected TNF_UNCHANGED in first chunk or logical record".into());
        }
    }
    Ok(())
}

fn ndef_err(reason: &str) -> Error {
    Error::Ndef(reason.to_string())
}

/// Parse records until one carrying ME is found. Chunk runs are folded
/// into a single logical record.
pub(crate) fn parse_records(reader: &mut ByteReader<'_>) -> Result<Vec<NdefRecord>> {
    let mut records = Vec::new();
    let mut chunks: Vec<u8> = Vec::new();
    let mut chunk_head: Option<(Tnf, Vec<u8>, Vec<u8>)> = None;

    loop {
        let flags = reader.u8()?;
        let mb = flags & FLAG_MB != 0;
        let me = flags & FLAG_ME != 0;
        let cf = flags & FLAG_CF != 0;
        let sr = flags & FLAG_SR != 0;
        let il = flags & FLAG_IL != 0;
        let tnf = Tnf::from_bits(flags);
        let in_chunk = chunk_head.is_some();

        if !mb && records.is_empty() && !in_chunk {
            return Err(ndef_err("expected MB flag"));
        } else if mb && (!records.is_empty() || in_chunk) {
            return Err(ndef_err("unexpected MB flag"));
        } else if in_chunk && il {
            return Err(ndef_err("unexpected IL flag in non-leading chunk"));
        } else if cf && me {
            return Err(ndef_err("unexpected ME flag in non-trailing chunk"));
        } else if in_chunk && tnf != Tnf::Unchanged {
            return Err(ndef_err("expected TNF_UNCHANGED in non-leading chunk"));
        } else if !in_chunk && tnf == Tnf::Unchanged {
            return Err(ndef_err(
                "unexpected TNF_UNCHANGED in first chunk or unchunked record",
            ));
        }

        let type_len = reader.u8()? as usize;
        let payload_len = if sr {
            reader.u8()? as usize
        } else {
            reader.be_u32()? as usize
        };
        let id_len = if il { reader.u8()? as usize } else { 0 };

        if in_chunk && type_len != 0 {
            return Err(ndef_err("expected zero-length type in non-leading chunk"));
        }

        let record_type = reader.take(type_len)?.to_vec();
        let id = reader.take(id_len)?.to_vec();

        if payload_len > MAX_PAYLOAD_SIZE {
            return Err(Error::Ndef(format!(
                "payload above max limit: {} > {}",
                payload_len, MAX_PAYLOAD_SIZE
            )));
        }
        let payload = reader.take(payload_len)?;

        if cf {
            if chunk_head.is_none() {
                chunks.clear();
                chunk_head = Some((tnf, record_type, id));
            }
            chunks.extend_from_slice(payload);
            if chunks.len() > MAX_PAYLOAD_SIZE {
                return Err(ndef_err("chunked payload above max limit"));
            }
            continue;
        }

        let record = match chunk_head.take() {
            Some((head_tnf, head_type, head_id)) => {
                chunks.extend_from_slice(payload);
                let payload = std::mem::take(&mut chunks);
                validate_tnf(head_tnf, &head_type, &head_id, &payload)
                    .map_err(Error::Ndef)?;
                NdefRecord {
                    tnf: head_tnf,
                    record_type: head_type,
                    id: head_id,
                    payload,
                }
            }
            None => {
                validate_tnf(tnf, &record_type, &id, payload).map_err(Error::Ndef)?;
                NdefRecord {
                    tnf,
                    record_type,
                    id,
                    payload: payload.to_vec(),
                }
            }
        };
        records.push(record);

        if me {
            break;
        }
    }

    Ok(records)
}
