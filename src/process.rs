//! Process descriptors and the per-run process table.

use std::ops::{Index, IndexMut};

use crate::error::ProcessError;

/// Largest arrival time or burst length accepted. Keeping every value within
/// `u32` keeps all clock and metric sums within `u64`.
pub const MAX_TIME_VALUE: u64 = u32::MAX as u64;

/// Lifecycle of a process during one simulation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcState {
    /// Arrival time not reached yet.
    Unarrived,
    Ready,
    Running,
    /// Waiting on I/O until `until`.
    Blocked { until: u64 },
    /// Last CPU burst finished at `at`.
    Completed { at: u64 },
}

/// A process of the workload together with its simulation state.
///
/// Bursts alternate CPU, I/O, CPU, ... and always end on a CPU burst, so
/// `io_bursts.len() + 1 == cpu_bursts.len()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Process {
    pub id: usize,
    pub arrival: u64,
    pub cpu_bursts: Vec<u64>,
    pub io_bursts: Vec<u64>,

    pub state: ProcState,
    /// Index of the pending (or in-progress) CPU burst.
    pub burst: usize,
    /// Time left in the CPU burst at `burst`.
    pub remaining: u64,
    /// Time of the first dispatch, for response time.
    pub first_run: Option<u64>,
}

impl Process {
    /// Builds an unarrived process, rejecting burst lists that break the
    /// CPU/I/O alternation or exceed [`MAX_TIME_VALUE`].
    pub fn new(
        id: usize,
        arrival: u64,
        cpu_bursts: Vec<u64>,
        io_bursts: Vec<u64>,
    ) -> Result<Process, ProcessError> {
        let remaining = *cpu_bursts.first().ok_or(ProcessError::NoCpuBurst)?;
        if io_bursts.len() + 1 != cpu_bursts.len() {
            return Err(ProcessError::BurstMismatch {
                cpu: cpu_bursts.len(),
                io: io_bursts.len(),
            });
        }
        if cpu_bursts.contains(&0) {
            return Err(ProcessError::ZeroCpuBurst);
        }
        let too_large = std::iter::once(&arrival)
            .chain(&cpu_bursts)
            .chain(&io_bursts)
            .find(|&&v| v > MAX_TIME_VALUE);
        if let Some(&value) = too_large {
            return Err(ProcessError::ValueTooLarge { value });
        }

        Ok(Process {
            id,
            arrival,
            cpu_bursts,
            io_bursts,
            state: ProcState::Unarrived,
            burst: 0,
            remaining,
            first_run: None,
        })
    }

    /// Total CPU demand over all bursts.
    pub fn total_cpu(&self) -> u64 {
        self.cpu_bursts.iter().sum()
    }

    /// Full length of the pending CPU burst.
    pub fn current_burst(&self) -> u64 {
        self.cpu_bursts[self.burst]
    }

    pub fn is_complete(&self) -> bool {
        matches!(self.state, ProcState::Completed { .. })
    }

    pub fn completion_time(&self) -> Option<u64> {
        match self.state {
            ProcState::Completed { at } => Some(at),
            _ => None,
        }
    }

    /// Moves an unarrived process to `Ready` once its arrival time is reached.
    pub fn admit(&mut self, now: u64) -> bool {
        if self.state == ProcState::Unarrived && self.arrival <= now {
            self.state = ProcState::Ready;
            return true;
        }
        false
    }

    /// Moves a blocked process to `Ready` once its I/O has completed and
    /// loads the next CPU burst.
    pub fn wake(&mut self, now: u64) -> bool {
        match self.state {
            ProcState::Blocked { until } if until <= now => {
                self.burst += 1;
                self.remaining = self.cpu_bursts[self.burst];
                self.state = ProcState::Ready;
                true
            }
            _ => false,
        }
    }

    /// Marks the process as dispatched at `now`.
    pub fn dispatch(&mut self, now: u64) {
        self.state = ProcState::Running;
        self.first_run.get_or_insert(now);
    }

    /// Accounts for `slice` units of CPU ending at `now` and returns the
    /// resulting state.
    ///
    /// A finished burst blocks the process on the following I/O burst, or
    /// completes it when it was the last one.
    pub fn run(&mut self, slice: u64, now: u64) -> ProcState {
        debug_assert!(slice <= self.remaining);
        self.remaining -= slice;
        self.state = if self.remaining > 0 {
            ProcState::Ready
        } else if let Some(io) = self.io_bursts.get(self.burst) {
            ProcState::Blocked { until: now + io }
        } else {
            ProcState::Completed { at: now }
        };
        self.state
    }
}

/// Owns every process of one run. Processes are addressed by their index,
/// which is the id minus one.
#[derive(Debug, Clone, Default)]
pub struct ProcessTable {
    procs: Vec<Process>,
}

impl ProcessTable {
    pub fn new(procs: Vec<Process>) -> Self {
        Self { procs }
    }

    pub fn len(&self) -> usize {
        self.procs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.procs.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Process> {
        self.procs.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Process> {
        self.procs.iter_mut()
    }

    /// Number of processes not yet completed.
    pub fn pending(&self) -> usize {
        self.procs.iter().filter(|p| !p.is_complete()).count()
    }

    pub fn all_complete(&self) -> bool {
        self.procs.iter().all(Process::is_complete)
    }

    pub fn into_inner(self) -> Vec<Process> {
        self.procs
    }
}

impl Index<usize> for ProcessTable {
    type Output = Process;

    fn index(&self, idx: usize) -> &Process {
        &self.procs[idx]
    }
}

impl IndexMut<usize> for ProcessTable {
    fn index_mut(&mut self, idx: usize) -> &mut Process {
        &mut self.procs[idx]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admit_waits_for_arrival() {
        let mut p = Process::new(1, 3, vec![2], vec![]).unwrap();
        assert!(!p.admit(2));
        assert_eq!(p.state, ProcState::Unarrived);
        assert!(p.admit(3));
        assert_eq!(p.state, ProcState::Ready);
        assert!(!p.admit(4));
    }

    #[test]
    fn finished_burst_blocks_then_wakes_on_next_burst() {
        let mut p = Process::new(1, 0, vec![2, 3], vec![4]).unwrap();
        p.dispatch(0);
        assert_eq!(p.run(2, 2), ProcState::Blocked { until: 6 });
        assert!(!p.wake(5));
        assert!(p.wake(6));
        assert_eq!(p.burst, 1);
        assert_eq!(p.remaining, 3);
        assert_eq!(p.current_burst(), 3);
    }

    #[test]
    fn partial_slice_returns_to_ready() {
        let mut p = Process::new(1, 0, vec![5], vec![]).unwrap();
        p.dispatch(0);
        assert_eq!(p.run(2, 2), ProcState::Ready);
        assert_eq!(p.remaining, 3);
        assert_eq!(p.run(3, 5), ProcState::Completed { at: 5 });
        assert_eq!(p.completion_time(), Some(5));
    }

    #[test]
    fn first_dispatch_is_kept() {
        let mut p = Process::new(1, 0, vec![5], vec![]).unwrap();
        p.dispatch(1);
        p.run(1, 2);
        p.dispatch(7);
        assert_eq!(p.first_run, Some(1));
    }

    #[test]
    fn table_counts_pending() {
        let mut table = ProcessTable::new(vec![
            Process::new(1, 0, vec![1], vec![]).unwrap(),
            Process::new(2, 0, vec![1], vec![]).unwrap(),
        ]);
        assert_eq!(table.pending(), 2);
        table[0].state = ProcState::Completed { at: 1 };
        assert_eq!(table.pending(), 1);
        assert!(!table.all_complete());
    }

    #[test]
    fn new_rejects_malformed_bursts() {
        assert_eq!(
            Process::new(1, 0, vec![], vec![]),
            Err(ProcessError::NoCpuBurst)
        );
        assert_eq!(
            Process::new(1, 0, vec![2], vec![3]),
            Err(ProcessError::BurstMismatch { cpu: 1, io: 1 })
        );
        assert_eq!(
            Process::new(1, 0, vec![2, 0], vec![3]),
            Err(ProcessError::ZeroCpuBurst)
        );
        assert_eq!(
            Process::new(1, 0, vec![2], vec![3, 4]),
            Err(ProcessError::BurstMismatch { cpu: 1, io: 2 })
        );
    }

    #[test]
    fn new_rejects_values_beyond_u32() {
        let big = MAX_TIME_VALUE + 1;
        assert_eq!(
            Process::new(1, big, vec![1], vec![]),
            Err(ProcessError::ValueTooLarge { value: big })
        );
        assert_eq!(
            Process::new(1, 0, vec![1, 1], vec![big]),
            Err(ProcessError::ValueTooLarge { value: big })
        );
        assert!(Process::new(1, MAX_TIME_VALUE, vec![MAX_TIME_VALUE], vec![]).is_ok());
    }
}
