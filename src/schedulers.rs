//! Ready queue and the pluggable dispatch policies.
//!
//! The engine fills the ready queue; a [`Scheduler`] decides which queued
//! process runs next and for how long. Each policy owns removal and
//! reinsertion of what it picks, so preemptive policies can leave a process
//! queued or move it to the tail.

use std::collections::VecDeque;
use std::fmt;
use std::num::NonZeroU64;

use log::{log_enabled, trace, Level};

use crate::process::ProcessTable;

/// Ordered set of process indices eligible to run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadyQueue {
    queue: VecDeque<usize>,
}

impl ReadyQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `idx` unless it is already queued.
    pub fn push_back(&mut self, idx: usize) -> bool {
        if self.queue.contains(&idx) {
            return false;
        }
        self.queue.push_back(idx);
        true
    }

    pub fn pop_front(&mut self) -> Option<usize> {
        self.queue.pop_front()
    }

    pub fn get(&self, pos: usize) -> Option<usize> {
        self.queue.get(pos).copied()
    }

    pub fn remove(&mut self, pos: usize) -> Option<usize> {
        self.queue.remove(pos)
    }

    pub fn contains(&self, idx: usize) -> bool {
        self.queue.contains(&idx)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.queue.iter().copied()
    }

    /// Position of the first entry minimising `key`.
    fn position_min_by_key(&self, key: impl Fn(usize) -> u64) -> Option<usize> {
        let mut best: Option<(usize, u64)> = None;
        for (pos, idx) in self.queue.iter().enumerate() {
            let k = key(*idx);
            if best.map_or(true, |(_, b)| k < b) {
                best = Some((pos, k));
            }
        }
        best.map(|(pos, _)| pos)
    }
}

impl fmt::Display for ReadyQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for idx in &self.queue {
            if !first {
                f.write_str(" ")?;
            }
            write!(f, "P{}", idx + 1)?;
            first = false;
        }
        Ok(())
    }
}

/// A dispatch decision: run process `index` for `duration` time units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slice {
    pub index: usize,
    pub duration: u64,
}

pub trait Scheduler {
    /// Short name used in logs and reports.
    fn name(&self) -> &'static str;

    /// Picks the next process from `ready`, or `None` when nothing is ready.
    fn next(&mut self, ready: &mut ReadyQueue, procs: &ProcessTable, now: u64) -> Option<Slice>;
}

/// First come, first served.
#[derive(Debug, Default)]
pub struct FIFO;

impl FIFO {
    pub fn new() -> Self {
        FIFO
    }
}

impl Scheduler for FIFO {
    fn name(&self) -> &'static str {
        "FIFO"
    }

    fn next(&mut self, ready: &mut ReadyQueue, procs: &ProcessTable, now: u64) -> Option<Slice> {
        trace!("{now}: FIFO queue ({ready})");
        let index = ready.pop_front()?;
        Some(Slice {
            index,
            duration: procs[index].remaining,
        })
    }
}

/// Non-preemptive shortest job first, keyed on the pending CPU burst.
#[derive(Debug, Default)]
pub struct SJF;

impl SJF {
    pub fn new() -> Self {
        SJF
    }
}

impl Scheduler for SJF {
    fn name(&self) -> &'static str {
        "SJF"
    }

    fn next(&mut self, ready: &mut ReadyQueue, procs: &ProcessTable, now: u64) -> Option<Slice> {
        let pos = ready.position_min_by_key(|idx| procs[idx].current_burst())?;
        let index = ready.remove(pos)?;
        trace!(
            "{now}: SJF queue ({ready}) --> P{} burst {}",
            index + 1,
            procs[index].current_burst()
        );
        Some(Slice {
            index,
            duration: procs[index].remaining,
        })
    }
}

/// Preemptive shortest remaining time first.
///
/// Runs one time unit at a time so every arrival is considered before the
/// next unit. The chosen process stays queued until its burst is done.
#[derive(Debug, Default)]
pub struct SRTF;

impl SRTF {
    pub fn new() -> Self {
        SRTF
    }
}

impl Scheduler for SRTF {
    fn name(&self) -> &'static str {
        "SRTF"
    }

    fn next(&mut self, ready: &mut ReadyQueue, procs: &ProcessTable, now: u64) -> Option<Slice> {
        let pos = ready.position_min_by_key(|idx| procs[idx].remaining)?;
        let index = ready.get(pos)?;
        if log_enabled!(Level::Trace) {
            let queue_string = ready
                .iter()
                .map(|idx| format!("P{}:{}", idx + 1, procs[idx].remaining))
                .collect::<Vec<_>>()
                .join(" ");
            trace!("{now}: SRTF queue ({queue_string}) --> P{}", index + 1);
        }

        let duration = procs[index].remaining.min(1);
        if duration == procs[index].remaining {
            ready.remove(pos);
        }
        Some(Slice { index, duration })
    }
}

/// Round robin with a fixed quantum.
#[derive(Debug)]
pub struct RR {
    quantum: NonZeroU64,
}

impl RR {
    pub fn new(quantum: NonZeroU64) -> Self {
        RR { quantum }
    }

    pub fn quantum(&self) -> u64 {
        self.quantum.get()
    }

    fn rotate(&self, ready: &mut ReadyQueue, procs: &ProcessTable) -> Option<Slice> {
        let index = ready.pop_front()?;
        let remaining = procs[index].remaining;
        let duration = remaining.min(self.quantum.get());
        if duration < remaining {
            ready.push_back(index);
        }
        Some(Slice { index, duration })
    }
}

impl Scheduler for RR {
    fn name(&self) -> &'static str {
        "RR"
    }

    fn next(&mut self, ready: &mut ReadyQueue, procs: &ProcessTable, now: u64) -> Option<Slice> {
        trace!("{now}: RR{} queue ({ready})", self.quantum);
        self.rotate(ready, procs)
    }
}

/// The "fair share" policy: round robin with a quantum of one unit.
///
/// There is no virtual runtime or weighting; every ready process simply
/// gets one unit per turn.
#[derive(Debug)]
pub struct CFS {
    rr: RR,
}

impl CFS {
    pub fn new() -> Self {
        CFS {
            rr: RR::new(NonZeroU64::MIN),
        }
    }
}

impl Default for CFS {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler for CFS {
    fn name(&self) -> &'static str {
        "CFS"
    }

    fn next(&mut self, ready: &mut ReadyQueue, procs: &ProcessTable, now: u64) -> Option<Slice> {
        trace!("{now}: CFS queue ({ready})");
        self.rr.rotate(ready, procs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::{ProcState, Process};

    fn table(bursts: &[(u64, u64)]) -> ProcessTable {
        // (current burst, remaining)
        ProcessTable::new(
            bursts
                .iter()
                .enumerate()
                .map(|(i, &(burst, remaining))| {
                    let mut p = Process::new(i + 1, 0, vec![burst], vec![]).unwrap();
                    p.remaining = remaining;
                    p.state = ProcState::Ready;
                    p
                })
                .collect(),
        )
    }

    fn queue(indices: &[usize]) -> ReadyQueue {
        let mut q = ReadyQueue::new();
        for &i in indices {
            q.push_back(i);
        }
        q
    }

    #[test]
    fn ready_queue_rejects_duplicates() {
        let mut q = queue(&[0, 1]);
        assert!(!q.push_back(0));
        assert_eq!(q.len(), 2);
        assert_eq!(q.to_string(), "P1 P2");
    }

    #[test]
    fn fifo_takes_head_for_full_burst() {
        let procs = table(&[(8, 8), (4, 4)]);
        let mut q = queue(&[0, 1]);
        let slice = FIFO::new().next(&mut q, &procs, 0).unwrap();
        assert_eq!(slice, Slice { index: 0, duration: 8 });
        assert_eq!(q.iter().collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn sjf_picks_shortest_burst_first_on_tie() {
        let procs = table(&[(8, 8), (3, 3), (3, 3)]);
        let mut q = queue(&[0, 2, 1]);
        let slice = SJF::new().next(&mut q, &procs, 0).unwrap();
        assert_eq!(slice, Slice { index: 2, duration: 3 });
        assert_eq!(q.iter().collect::<Vec<_>>(), vec![0, 1]);
    }

    #[test]
    fn srtf_keeps_process_queued_until_burst_ends() {
        let procs = table(&[(8, 6), (4, 1)]);
        let mut sched = SRTF::new();

        let mut q = queue(&[0]);
        let slice = sched.next(&mut q, &procs, 0).unwrap();
        assert_eq!(slice, Slice { index: 0, duration: 1 });
        assert!(q.contains(0));

        let mut q = queue(&[0, 1]);
        let slice = sched.next(&mut q, &procs, 0).unwrap();
        assert_eq!(slice, Slice { index: 1, duration: 1 });
        assert!(!q.contains(1));
    }

    #[test]
    fn rr_requeues_unfinished_process() {
        let procs = table(&[(5, 5), (1, 1)]);
        let mut rr = RR::new(NonZeroU64::new(2).unwrap());

        let mut q = queue(&[0, 1]);
        assert_eq!(rr.next(&mut q, &procs, 0), Some(Slice { index: 0, duration: 2 }));
        assert_eq!(q.iter().collect::<Vec<_>>(), vec![1, 0]);
        assert_eq!(rr.next(&mut q, &procs, 2), Some(Slice { index: 1, duration: 1 }));
        assert_eq!(q.iter().collect::<Vec<_>>(), vec![0]);
    }

    #[test]
    fn cfs_is_unit_quantum_round_robin() {
        let procs = table(&[(3, 3), (2, 2)]);
        let mut q = queue(&[0, 1]);
        let slice = CFS::new().next(&mut q, &procs, 0).unwrap();
        assert_eq!(slice, Slice { index: 0, duration: 1 });
        assert_eq!(q.iter().collect::<Vec<_>>(), vec![1, 0]);
    }

    #[test]
    fn empty_queue_yields_nothing() {
        let procs = table(&[]);
        let mut q = ReadyQueue::new();
        assert_eq!(SJF::new().next(&mut q, &procs, 0), None);
        assert_eq!(SRTF::new().next(&mut q, &procs, 0), None);
        assert_eq!(CFS::new().next(&mut q, &procs, 0), None);
    }
}
