pub mod fetch;
pub mod poll;
pub mod status;
pub mod submit;

pub use fetch::*;
pub use poll::*;
pub use status::*;
pub use submit::*;

use std::time::Duration;

use crate::config::PollSettings;

/// External tool a job was submitted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    Align,
    Tree,
    Mafft,
    Blast,
    Structure,
}

/// One in-flight external computation. Request-scoped only: created at
/// submission, mutated by the poll loop, discarded after the result
/// fetch or terminal failure. Never persisted.
#[derive(Debug, Clone)]
pub struct JobHandle {
    pub tool: Tool,
    pub external_id: String,
    pub attempts_made: u32,
}

impl JobHandle {
    pub fn new(tool: Tool, external_id: String) -> Self {
        Self {
            tool,
            external_id,
            attempts_made: 0,
        }
    }
}

/// Status of an external job as reported by one poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    Pending,
    Ready,
    Failed(String),
    /// Token the classifier did not recognize. Treated as a hard failure
    /// by the poll loop; never silently retried.
    Unknown(String),
}

#[derive(Debug, Clone, Copy)]
pub struct PollConfig {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl From<PollSettings> for PollConfig {
    fn from(settings: PollSettings) -> Self {
        Self {
            interval: settings.interval,
            max_attempts: settings.max_attempts,
        }
    }
}
