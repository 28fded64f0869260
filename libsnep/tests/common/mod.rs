// Shared helpers for the integration test crates.
#![allow(dead_code)]

pub mod fixtures;

use std::time::{Duration, Instant};

/// Install env_logger once per test binary; RUST_LOG controls verbosity.
pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Poll `cond` every few milliseconds until it holds or `timeout` elapses.
pub fn wait_until(timeout: Duration, mut cond: impl FnMut() -> bool) -> bool {
    let start = Instant::now();
    while start.elapsed() < timeout {
        if cond() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
    cond()
}
