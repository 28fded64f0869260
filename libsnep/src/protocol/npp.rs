// libsnep-rs/libsnep/src/protocol/npp.rs

use log::warn;

use crate::constants::NPP_VERSION;
use crate::ndef::NdefMessage;
use crate::protocol::parser::ByteReader;
use crate::types::Action;
use crate::{Error, Result};

/// Legacy NDEF Push envelope.
/// Format: [version(1)] [count(4)] { [action(1)] [len(4)] [ndef(len)] } * count
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NdefPushProtocol {
    entries: Vec<(Action, NdefMessage)>,
}

impl NdefPushProtocol {
    /// Envelope carrying a single message.
    pub fn new(message: NdefMessage, action: Action) -> Self {
        Self {
            entries: vec![(action, message)],
        }
    }

    /// Envelope from parallel action/message slices. Both must be
    /// non-empty and the same length.
    pub fn from_parts(actions: &[Action], messages: &[NdefMessage]) -> Result<Self> {
        if actions.len() != messages.len() || actions.is_empty() {
            return Err(Error::InvalidArgument(
                "actions and messages must be the same size and non-empty".into(),
            ));
        }
        Ok(Self {
            entries: actions.iter().copied().zip(messages.iter().cloned()).collect(),
        })
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let mut reader = ByteReader::new(data);

        let version = reader
            .u8()
            .map_err(|_| Error::Format("unable to read npp version".into()))?;
        if version != NPP_VERSION {
            warn!("got npp version {}, expected {}", version, NPP_VERSION);
            return Err(Error::Format(format!(
                "got npp version {}, expected {}",
                version, NPP_VERSION
            )));
        }

        let count = reader
            .be_u32()
            .map_err(|_| Error::Format("unable to read npp message count".into()))?;
        if count == 0 {
            return Err(Error::Format("no ndef message inside npp envelope".into()));
        }

        let mut entries = Vec::new();
        for i in 0..count {
            let action = reader
                .u8()
                .map_err(|_| Error::Format(format!("unable to read action for message {}", i)))?;
            let len = reader
                .be_u32()
                .map_err(|_| Error::Format(format!("unable to read length for message {}", i)))?;
            let available = reader.remaining();
            let bytes = reader.take(len as usize).map_err(|_| {
                Error::Format(format!(
                    "message {}: read {} bytes but expected {}",
                    i, available, len
                ))
            })?;
            entries.push((Action::new(action), NdefMessage::from_bytes(bytes)?));
        }

        Ok(Self { entries })
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(1024);
        out.push(NPP_VERSION);
        out.extend_from_slice(&(self.entries.len() as u32).to_be_bytes());
        for (action, message) in &self.entries {
            let bytes = message.to_bytes();
            out.push(action.as_u8());
            out.extend_from_slice(&(bytes.len() as u32).to_be_bytes());
            out.extend_from_slice(&bytes);
        }
        out
    }

    /// First message tagged IMMEDIATE, if any.
    pub fn immediate(&self) -> Option<&NdefMessage> {
        self.entries
            .iter()
            .find(|(action, _)| *action == Action::IMMEDIATE)
            .map(|(_, message)| message)
    }

    /// All (action, message) pairs in wire order.
    pub fn entries(&self) -> &[(Action, NdefMessage)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
