// libsnep-rs/libsnep/src/compliance.rs

//! NFC Forum Device Test Application (DTA) behaviour.
//!
//! Conformance test cases require non-standard reactions to malformed
//! input (closing instead of rejecting, refusing oversized lengths, ...).
//! The active profile is passed explicitly to every messenger and server
//! so two sessions can run different profiles side by side.

use crate::constants::{MAL, MAL_IUT};

/// Client test case that expects the client to abort a fragmented PUT once
/// the peer answers the second fragment with another CONTINUE.
pub const CLIENT_CASE_PUT_ABORT: u8 = 6;

/// Server test case that acknowledges every response fragment and expects
/// the server to disconnect on the acknowledgement.
pub const SERVER_CASE_FRAGMENT_ACK: u8 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ComplianceProfile {
    /// Plain SNEP behaviour.
    #[default]
    Standard,
    /// DTA conformance behaviour for the given test case id.
    Dta { test_case: u8 },
}

impl ComplianceProfile {
    pub fn dta(test_case: u8) -> Self {
        ComplianceProfile::Dta { test_case }
    }

    pub fn is_dta(&self) -> bool {
        matches!(self, ComplianceProfile::Dta { .. })
    }

    pub fn test_case(&self) -> Option<u8> {
        match self {
            ComplianceProfile::Dta { test_case } => Some(*test_case),
            ComplianceProfile::Standard => None,
        }
    }

    /// Version mismatch closes the connection instead of returning a
    /// header-only message to the caller.
    pub fn closes_on_unsupported_version(&self) -> bool {
        self.is_dta()
    }

    /// Short header on the client side closes instead of sending REJECT.
    pub fn closes_on_short_header(&self, is_client: bool) -> bool {
        self.is_dta() && is_client
    }

    /// Declared length that should be refused without reading the body.
    pub fn refuses_length(&self, is_client: bool, length: u32) -> bool {
        if !self.is_dta() {
            return false;
        }
        if is_client {
            length > MAL_IUT
        } else {
            length > MAL_IUT || length == MAL
        }
    }

    pub fn aborts_put_on_second_continue(&self, is_client: bool) -> bool {
        is_client && self.test_case() == Some(CLIENT_CASE_PUT_ABORT)
    }

    pub fn expects_ack_per_fragment(&self, is_client: bool) -> bool {
        !is_client && self.test_case() == Some(SERVER_CASE_FRAGMENT_ACK)
    }
}
