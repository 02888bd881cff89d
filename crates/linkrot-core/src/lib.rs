use std::time::Duration;

use thiserror::Error;

pub mod cache;
pub mod checker;
pub mod classify;
pub mod poll;
pub mod refs;
pub mod result;
pub mod rollup;
pub mod status;

// Re-export for convenience
pub use classify::{Bucket, CheckOutcome, classify, status_message};
pub use refs::{RefKind, Reference};
pub use result::{ResultItem, TaskStatus, TaskValue};
pub use rollup::Rollup;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("malformed task payload: {0}")]
    Payload(String),
}

/// Configuration for link checking and polling.
#[derive(Debug, Clone)]
pub struct Config {
    /// Per-URL timeout for status checks.
    pub check_timeout: Duration,
    /// Delay between task polls, and before the first one.
    pub poll_interval: Duration,
    /// Quantum that rollup redraws are aligned to.
    pub render_quantum: Duration,
    /// How long the completion check mark stays on the summary heading.
    pub flash_duration: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            check_timeout: Duration::from_secs(20),
            poll_interval: Duration::from_secs(2),
            render_quantum: Duration::from_millis(250),
            flash_duration: Duration::from_secs(2),
        }
    }
}
