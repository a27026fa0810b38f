//! Execution trace produced by the engine.

use serde::Serialize;

/// One record per executed slice or idle jump, in chronological order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TraceEvent {
    /// Process `pid` ran its CPU burst `burst` (1-based) for `duration`
    /// units starting at `start`.
    Dispatch {
        start: u64,
        pid: usize,
        burst: usize,
        duration: u64,
    },
    /// Nothing was ready; the clock jumped from `from` to `to`.
    Idle { from: u64, to: u64 },
}

impl TraceEvent {
    /// CPU time consumed by this record.
    pub fn busy(&self) -> u64 {
        match self {
            Self::Dispatch { duration, .. } => *duration,
            Self::Idle { .. } => 0,
        }
    }
}
