// libsnep-rs/libsnep/src/server/mod.rs

//! Request-handling side. Both servers share the accept loop and the
//! session registry that lets `stop()` tear down live connections.

pub(crate) mod acceptor;
pub mod dta;
pub mod npp;
pub mod session;
pub mod snep;

pub use dta::DtaSnepCallback;
pub use npp::{NdefPushCallback, NdefPushServer};
pub use session::SessionRegistry;
pub use snep::{SnepCallback, SnepServer, handle_request};
