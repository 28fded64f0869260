// libsnep-rs/libsnep/src/config.rs

//! Client and server configuration.

use std::time::Duration;

use crate::compliance::ComplianceProfile;
use crate::constants::{
    DEFAULT_ACCEPTABLE_LENGTH, DEFAULT_CLIENT_MIU, DEFAULT_LINEAR_BUFFER_LEN, DEFAULT_RW_SIZE,
    DEFAULT_SERVER_MIU, DTA_ACCEPTABLE_LENGTH, DTA_CLIENT_SAP, DTA_SERVER_SAP, NPP_MAX_ENVELOPE_LEN,
    NPP_SERVICE_NAME, SNEP_DEFAULT_SAP, SNEP_SERVICE_NAME, SNEP_TEST_SERVICE_NAME,
};
use crate::{Error, Result};

/// Parameters for creating an LLCP socket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SocketOptions {
    pub miu: usize,
    pub rw_size: u8,
    pub linear_buffer_len: usize,
}

impl SocketOptions {
    pub fn with_miu(miu: usize) -> Self {
        Self {
            miu,
            ..Self::default()
        }
    }
}

impl Default for SocketOptions {
    fn default() -> Self {
        Self {
            miu: DEFAULT_CLIENT_MIU,
            rw_size: DEFAULT_RW_SIZE,
            linear_buffer_len: DEFAULT_LINEAR_BUFFER_LEN,
        }
    }
}

/// How a client finds the remote service.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ServiceTarget {
    /// Named rendezvous through the peer's SDP.
    Name(String),
    /// Fixed well-known SAP.
    Sap(u8),
}

impl std::fmt::Display for ServiceTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceTarget::Name(name) => write!(f, "service {}", name),
            ServiceTarget::Sap(sap) => write!(f, "sap {}", sap),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SnepClientConfig {
    pub target: ServiceTarget,
    pub acceptable_length: u32,
    /// Upper bound for outgoing fragments; `None` uses the remote MIU.
    pub fragment_length: Option<usize>,
    pub socket: SocketOptions,
    pub receive_timeout: Option<Duration>,
    pub compliance: ComplianceProfile,
}

impl Default for SnepClientConfig {
    fn default() -> Self {
        Self {
            target: ServiceTarget::Sap(SNEP_DEFAULT_SAP),
            acceptable_length: DEFAULT_ACCEPTABLE_LENGTH,
            fragment_length: None,
            socket: SocketOptions::default(),
            receive_timeout: None,
            compliance: ComplianceProfile::Standard,
        }
    }
}

impl SnepClientConfig {
    pub fn for_service(name: &str) -> Self {
        Self {
            target: ServiceTarget::Name(name.to_string()),
            ..Self::default()
        }
    }

    /// DTA conformance client: fixed SAP 63, 1 KiB acceptable length.
    pub fn dta(test_case: u8) -> Self {
        Self {
            target: ServiceTarget::Sap(DTA_CLIENT_SAP),
            acceptable_length: DTA_ACCEPTABLE_LENGTH,
            compliance: ComplianceProfile::dta(test_case),
            ..Self::default()
        }
    }

    pub fn with_target(mut self, target: ServiceTarget) -> Self {
        self.target = target;
        self
    }

    pub fn with_acceptable_length(mut self, len: u32) -> Self {
        self.acceptable_length = len;
        self
    }

    pub fn with_fragment_length(mut self, len: usize) -> Self {
        self.fragment_length = Some(len);
        self
    }

    pub fn with_miu(mut self, miu: usize) -> Self {
        self.socket.miu = miu;
        self
    }

    pub fn with_rw_size(mut self, rw_size: u8) -> Self {
        self.socket.rw_size = rw_size;
        self
    }

    pub fn with_receive_timeout(mut self, timeout: Duration) -> Self {
        self.receive_timeout = Some(timeout);
        self
    }

    pub fn with_compliance(mut self, profile: ComplianceProfile) -> Self {
        self.compliance = profile;
        self
    }

    /// Fragment length for a connection whose peer advertised `remote_miu`.
    pub fn negotiate_fragment_length(&self, remote_miu: usize) -> Result<usize> {
        negotiate(remote_miu, self.fragment_length.unwrap_or(remote_miu))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SnepServerConfig {
    pub service_name: String,
    pub sap: u8,
    pub fragment_length: Option<usize>,
    pub socket: SocketOptions,
    pub receive_timeout: Option<Duration>,
    pub compliance: ComplianceProfile,
}

impl Default for SnepServerConfig {
    fn default() -> Self {
        Self {
            service_name: SNEP_SERVICE_NAME.to_string(),
            sap: SNEP_DEFAULT_SAP,
            fragment_length: None,
            socket: SocketOptions::with_miu(DEFAULT_SERVER_MIU),
            receive_timeout: None,
            compliance: ComplianceProfile::Standard,
        }
    }
}

impl SnepServerConfig {
    pub fn new(service_name: &str, sap: u8) -> Self {
        Self {
            service_name: service_name.to_string(),
            sap,
            ..Self::default()
        }
    }

    /// DTA conformance server on the test service name and SAP 5.
    pub fn dta(test_case: u8) -> Self {
        Self {
            service_name: SNEP_TEST_SERVICE_NAME.to_string(),
            sap: DTA_SERVER_SAP,
            compliance: ComplianceProfile::dta(test_case),
            ..Self::default()
        }
    }

    pub fn with_fragment_length(mut self, len: usize) -> Self {
        self.fragment_length = Some(len);
        self
    }

    pub fn with_miu(mut self, miu: usize) -> Self {
        self.socket.miu = miu;
        self
    }

    pub fn with_rw_size(mut self, rw_size: u8) -> Self {
        self.socket.rw_size = rw_size;
        self
    }

    pub fn with_receive_timeout(mut self, timeout: Duration) -> Self {
        self.receive_timeout = Some(timeout);
        self
    }

    pub fn with_compliance(mut self, profile: ComplianceProfile) -> Self {
        self.compliance = profile;
        self
    }

    /// Fragment length for an accepted connection. Bounded by the peer's
    /// MIU and by the configured fragment length (or our own MIU).
    pub fn negotiate_fragment_length(&self, remote_miu: usize) -> Result<usize> {
        negotiate(remote_miu, self.fragment_length.unwrap_or(self.socket.miu))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NdefPushClientConfig {
    pub service_name: String,
    pub socket: SocketOptions,
}

impl Default for NdefPushClientConfig {
    fn default() -> Self {
        Self {
            service_name: NPP_SERVICE_NAME.to_string(),
            socket: SocketOptions::with_miu(DEFAULT_CLIENT_MIU),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NdefPushServerConfig {
    pub service_name: String,
    pub sap: u8,
    pub socket: SocketOptions,
    pub receive_timeout: Option<Duration>,
    /// Largest envelope a single connection may deliver before it is
    /// dropped.
    pub max_envelope_len: usize,
}

impl NdefPushServerConfig {
    pub fn new(sap: u8) -> Self {
        Self {
            service_name: NPP_SERVICE_NAME.to_string(),
            sap,
            socket: SocketOptions::with_miu(DEFAULT_SERVER_MIU),
            receive_timeout: None,
            max_envelope_len: NPP_MAX_ENVELOPE_LEN,
        }
    }

    pub fn with_receive_timeout(mut self, timeout: Duration) -> Self {
        self.receive_timeout = Some(timeout);
        self
    }

    pub fn with_max_envelope_len(mut self, len: usize) -> Self {
        self.max_envelope_len = len;
        self
    }
}

fn negotiate(remote_miu: usize, configured: usize) -> Result<usize> {
    let len = remote_miu.min(configured);
    if len == 0 {
        return Err(Error::InvalidArgument(
            "negotiated fragment length is zero".into(),
        ));
    }
    Ok(len)
}
