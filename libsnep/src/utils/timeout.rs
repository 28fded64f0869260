// libsnep-rs/libsnep/src/utils/timeout.rs

//! Deadline bookkeeping for multi-step exchanges.

use std::time::{Duration, Instant};

use crate::{Error, Result};

/// Convert milliseconds to Duration.
pub fn ms(ms: u64) -> Duration {
    Duration::from_millis(ms)
}

/// Point in time by which a whole exchange (for example the reassembly of
/// one SNEP message) has to finish. `None` never expires.
#[derive(Debug, Clone, Copy)]
pub struct Deadline(Option<Instant>);

impl Deadline {
    pub fn after(timeout: Option<Duration>) -> Self {
        Self(timeout.map(|t| Instant::now() + t))
    }

    pub fn never() -> Self {
        Self(None)
    }

    /// Time left, suitable for a transport receive. Fails with
    /// `Error::Timeout` once the deadline has passed.
    pub fn remaining(&self) -> Result<Option<Duration>> {
        match self.0 {
            None => Ok(None),
            Some(at) => {
                let left = at.saturating_duration_since(Instant::now());
                if left.is_zero() {
                    Err(Error::Timeout)
                } else {
                    Ok(Some(left))
                }
            }
        }
    }
}
