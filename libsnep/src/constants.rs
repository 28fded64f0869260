// libsnep-rs/libsnep/src/constants.rs
//! Common protocol constants used across the crate

/// SNEP major version implemented by this crate
pub const SNEP_VERSION_MAJOR: u8 = 0x1;

/// SNEP minor version implemented by this crate
pub const SNEP_VERSION_MINOR: u8 = 0x0;

/// Fixed SNEP header: version(1) + field(1) + length(4)
pub const SNEP_HEADER_LEN: usize = 6;

/// Extra bytes carried by a GET request (acceptable length, BE u32)
pub const SNEP_GET_EXTRA_LEN: usize = 4;

/// Maximum acceptable length for an implementation under test (DTA)
pub const MAL_IUT: u32 = 0x0400;

/// Length sentinel treated as invalid/overflow
pub const MAL: u32 = 0xFFFF_FFFF;

/// Default SNEP service name and well-known SAP
pub const SNEP_SERVICE_NAME: &str = "urn:nfc:sn:snep";
pub const SNEP_DEFAULT_SAP: u8 = 4;

/// Compliance-test SNEP service name
pub const SNEP_TEST_SERVICE_NAME: &str = "urn:nfc:sn:sneptest";

/// Well-known ports used by the compliance client and server
pub const DTA_CLIENT_SAP: u8 = 63;
pub const DTA_SERVER_SAP: u8 = 5;

/// NDEF Push Protocol service name and envelope version
pub const NPP_SERVICE_NAME: &str = "com.android.npp";
pub const NPP_VERSION: u8 = 1;

/// Default MIU values for sockets created by clients and servers
pub const DEFAULT_CLIENT_MIU: usize = 128;
pub const DEFAULT_SERVER_MIU: usize = 248;

/// Default receive window and linear buffer length for new sockets
pub const DEFAULT_RW_SIZE: u8 = 1;
pub const DEFAULT_LINEAR_BUFFER_LEN: usize = 1024;

/// Acceptable length advertised by GET requests
pub const DEFAULT_ACCEPTABLE_LENGTH: u32 = 100 * 1024;
pub const DTA_ACCEPTABLE_LENGTH: u32 = 1024;

/// Acceptable length for which the DTA server answers EXCESS_DATA
pub const DTA_EXCESS_DATA_LENGTH: u32 = 501;

/// Receive chunk used by the NDEF Push server while draining a connection
pub const NPP_RECEIVE_CHUNK: usize = 1024;

/// Default cap on the bytes an NDEF Push connection may deliver
pub const NPP_MAX_ENVELOPE_LEN: usize = 100 * 1024;
