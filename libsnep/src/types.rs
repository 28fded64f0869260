// libsnep-rs/libsnep/src/types.rs

use derive_more::{Display, From, Into};

use crate::constants::{SNEP_VERSION_MAJOR, SNEP_VERSION_MINOR};

/// SNEP protocol version byte: major in the high nibble, minor in the low.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, From, Into)]
#[display(fmt = "{}.{}", "_0 >> 4", "_0 & 0x0f")]
pub struct Version(u8);

impl Version {
    /// Version implemented by this crate (1.0)
    pub const CURRENT: Self = Self::new(SNEP_VERSION_MAJOR, SNEP_VERSION_MINOR);

    pub const fn new(major: u8, minor: u8) -> Self {
        Self(((major & 0x0f) << 4) | (minor & 0x0f))
    }

    pub const fn from_byte(byte: u8) -> Self {
        Self(byte)
    }

    pub fn as_u8(&self) -> u8 {
        self.0
    }

    pub fn major(&self) -> u8 {
        self.0 >> 4
    }

    pub fn minor(&self) -> u8 {
        self.0 & 0x0f
    }

    /// Peers must agree on the major version; minor differences are accepted.
    pub fn is_compatible(&self) -> bool {
        self.major() == SNEP_VERSION_MAJOR
    }
}

impl Default for Version {
    fn default() -> Self {
        Self::CURRENT
    }
}

/// SNEP request/response field code.
///
/// Unknown codes are preserved so a server can answer them with
/// BAD_REQUEST instead of failing to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, From, Into)]
pub struct Field(u8);

impl Field {
    pub const REQUEST_CONTINUE: Self = Self(0x00);
    pub const REQUEST_GET: Self = Self(0x01);
    pub const REQUEST_PUT: Self = Self(0x02);
    pub const REQUEST_RFU: Self = Self(0x03);
    pub const REQUEST_REJECT: Self = Self(0x7f);

    pub const RESPONSE_CONTINUE: Self = Self(0x80);
    pub const RESPONSE_SUCCESS: Self = Self(0x81);
    pub const RESPONSE_NOT_FOUND: Self = Self(0xc0);
    pub const RESPONSE_EXCESS_DATA: Self = Self(0xc1);
    pub const RESPONSE_BAD_REQUEST: Self = Self(0xc2);
    pub const RESPONSE_NOT_IMPLEMENTED: Self = Self(0xe0);
    pub const RESPONSE_UNSUPPORTED_VERSION: Self = Self(0xe1);
    pub const RESPONSE_REJECT: Self = Self(0xff);

    pub const fn new(code: u8) -> Self {
        Self(code)
    }

    pub fn as_u8(&self) -> u8 {
        self.0
    }

    /// Response codes have the high bit set.
    pub fn is_response(&self) -> bool {
        self.0 & 0x80 != 0
    }

    /// CONTINUE code sent by the side that is receiving a fragmented
    /// message. A client receives responses, so it answers with the
    /// request-side code and vice versa.
    pub fn continue_for(is_client: bool) -> Self {
        if is_client {
            Self::REQUEST_CONTINUE
        } else {
            Self::RESPONSE_CONTINUE
        }
    }

    /// REJECT code sent by the receiving side, mirroring `continue_for`.
    pub fn reject_for(is_client: bool) -> Self {
        if is_client {
            Self::REQUEST_REJECT
        } else {
            Self::RESPONSE_REJECT
        }
    }

    pub fn name(&self) -> Option<&'static str> {
        let name = match *self {
            Self::REQUEST_CONTINUE => "CONTINUE",
            Self::REQUEST_GET => "GET",
            Self::REQUEST_PUT => "PUT",
            Self::REQUEST_RFU => "RFU",
            Self::REQUEST_REJECT => "REJECT",
            Self::RESPONSE_CONTINUE => "CONTINUE",
            Self::RESPONSE_SUCCESS => "SUCCESS",
            Self::RESPONSE_NOT_FOUND => "NOT_FOUND",
            Self::RESPONSE_EXCESS_DATA => "EXCESS_DATA",
            Self::RESPONSE_BAD_REQUEST => "BAD_REQUEST",
            Self::RESPONSE_NOT_IMPLEMENTED => "NOT_IMPLEMENTED",
            Self::RESPONSE_UNSUPPORTED_VERSION => "UNSUPPORTED_VERSION",
            Self::RESPONSE_REJECT => "REJECT",
            _ => return None,
        };
        Some(name)
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{}({:#04x})", name, self.0),
            None => write!(f, "UNKNOWN({:#04x})", self.0),
        }
    }
}

/// NDEF Push envelope action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, From, Into)]
pub struct Action(u8);

impl Action {
    pub const IMMEDIATE: Self = Self(0x01);
    pub const BACKGROUND: Self = Self(0x02);

    pub const fn new(code: u8) -> Self {
        Self(code)
    }

    pub fn as_u8(&self) -> u8 {
        self.0
    }
}

/// Client connection state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum ConnectionState {
    #[display(fmt = "disconnected")]
    Disconnected,
    #[display(fmt = "connecting")]
    Connecting,
    #[display(fmt = "connected")]
    Connected,
}
