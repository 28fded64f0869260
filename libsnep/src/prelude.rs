// libsnep-rs/libsnep/src/prelude.rs

pub use crate::client::{NdefPushClient, SnepClient};
pub use crate::compliance::ComplianceProfile;
pub use crate::config::{
    NdefPushClientConfig, NdefPushServerConfig, ServiceTarget, SnepClientConfig, SnepServerConfig,
    SocketOptions,
};
pub use crate::messenger::SnepMessenger;
pub use crate::ndef::{NdefMessage, NdefRecord, Tnf};
pub use crate::protocol::{NdefPushProtocol, SnepMessage};
pub use crate::server::{NdefPushCallback, NdefPushServer, SnepCallback, SnepServer};
pub use crate::transport::{LlcpLink, LlcpServerSocket, LlcpSocket};
pub use crate::{Action, ConnectionState, Error, ErrorKind, Field, Result, Version};
