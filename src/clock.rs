//! Virtual clock of the simulation.
//!
//! Time only moves when the engine runs a slice or jumps over an idle gap.

use crate::error::SimError;
use crate::process::{ProcState, ProcessTable};

/// Tick-based simulated clock.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SimClock {
    now: u64,
}

impl SimClock {
    /// Create a new clock at tick 0.
    pub fn new() -> Self {
        Self { now: 0 }
    }

    #[inline(always)]
    pub fn now(&self) -> u64 {
        self.now
    }

    /// Advance by the length of an executed slice.
    #[inline(always)]
    pub fn advance_by(&mut self, dt: u64) {
        self.now = self.now.saturating_add(dt);
    }

    /// Earliest future arrival or I/O completion among incomplete processes.
    pub fn next_event(&self, procs: &ProcessTable) -> Option<u64> {
        procs
            .iter()
            .filter_map(|p| match p.state {
                ProcState::Unarrived if p.arrival > self.now => Some(p.arrival),
                ProcState::Blocked { until } => Some(until),
                _ => None,
            })
            .min()
    }

    /// Jump to the next point where a process can become ready.
    ///
    /// Only meaningful when nothing is ready; fails with a stall when no
    /// such point exists while processes remain incomplete.
    pub fn advance_to_next_event(&mut self, procs: &ProcessTable) -> Result<u64, SimError> {
        match self.next_event(procs) {
            Some(t) => {
                debug_assert!(t >= self.now);
                self.now = t;
                Ok(t)
            }
            None => Err(SimError::Stall {
                time: self.now,
                pending: procs.pending(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::Process;

    #[test]
    fn jumps_to_earliest_arrival_or_io() {
        let mut procs = ProcessTable::new(vec![
            Process::new(1, 9, vec![1], vec![]).unwrap(),
            Process::new(2, 0, vec![1, 1], vec![3]).unwrap(),
            Process::new(3, 0, vec![1], vec![]).unwrap(),
        ]);
        procs[1].state = ProcState::Blocked { until: 7 };
        procs[2].state = ProcState::Completed { at: 1 };

        let mut clock = SimClock::new();
        clock.advance_by(2);
        assert_eq!(clock.advance_to_next_event(&procs), Ok(7));
        assert_eq!(clock.now(), 7);
    }

    #[test]
    fn stall_when_nothing_can_progress() {
        let mut procs = ProcessTable::new(vec![Process::new(1, 0, vec![1], vec![]).unwrap()]);
        procs[0].state = ProcState::Ready;
        let mut clock = SimClock::new();
        assert_eq!(
            clock.advance_to_next_event(&procs),
            Err(SimError::Stall { time: 0, pending: 1 })
        );
    }
}
