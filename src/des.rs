//! The discrete-event simulation loop shared by every policy.
//!
//! Each iteration admits arrivals and I/O completions into the ready queue,
//! asks the scheduler for a slice and applies it. When nothing is ready the
//! clock jumps to the next arrival or I/O completion instead.

use log::debug;

use crate::clock::SimClock;
use crate::error::SimError;
use crate::process::{ProcState, Process, ProcessTable};
use crate::schedulers::{ReadyQueue, Scheduler, Slice};
use crate::trace::TraceEvent;

/// Final state of a finished simulation.
#[derive(Debug, Clone)]
pub struct Run {
    pub algorithm: &'static str,
    pub processes: Vec<Process>,
    pub trace: Vec<TraceEvent>,
    /// Clock value when the last process completed.
    pub total_time: u64,
}

impl Run {
    /// Time the CPU spent executing slices.
    pub fn busy_time(&self) -> u64 {
        self.trace.iter().map(TraceEvent::busy).sum()
    }
}

pub struct DES {
    procs: ProcessTable,
    ready: ReadyQueue,
    clock: SimClock,
    scheduler: Box<dyn Scheduler>,
    trace: Vec<TraceEvent>,
    completed: usize,
}

impl DES {
    pub fn new(process_arr: Vec<Process>, scheduler: Box<dyn Scheduler>) -> Self {
        DES {
            procs: ProcessTable::new(process_arr),
            ready: ReadyQueue::new(),
            clock: SimClock::new(),
            scheduler,
            trace: Vec::new(),
            completed: 0,
        }
    }

    /// Runs until every process has completed.
    pub fn run(mut self) -> Result<Run, SimError> {
        debug!(
            "starting {} simulation of {} process(es)",
            self.scheduler.name(),
            self.procs.len()
        );
        while self.completed < self.procs.len() {
            self.admit();

            let now = self.clock.now();
            match self.scheduler.next(&mut self.ready, &self.procs, now) {
                Some(slice) => self.execute(slice),
                None => {
                    let to = self.clock.advance_to_next_event(&self.procs)?;
                    debug!("No process ready at time {now}. Advancing time to {to}.");
                    self.trace.push(TraceEvent::Idle { from: now, to });
                }
            }
        }

        Ok(Run {
            algorithm: self.scheduler.name(),
            total_time: self.clock.now(),
            processes: self.procs.into_inner(),
            trace: self.trace,
        })
    }

    /// Moves arrived and I/O-complete processes into the ready queue.
    ///
    /// Arrivals go first, then I/O completions; each pass is in id order.
    fn admit(&mut self) {
        let now = self.clock.now();
        for (idx, p) in self.procs.iter_mut().enumerate() {
            if p.admit(now) {
                debug!("{now}: P{} arrives", p.id);
                self.ready.push_back(idx);
            }
        }
        for (idx, p) in self.procs.iter_mut().enumerate() {
            if p.wake(now) {
                debug!("{now}: P{} finished I/O, CPU burst {} ready", p.id, p.burst + 1);
                self.ready.push_back(idx);
            }
        }
    }

    fn execute(&mut self, slice: Slice) {
        let start = self.clock.now();
        let p = &mut self.procs[slice.index];
        p.dispatch(start);
        let burst = p.burst + 1;

        self.clock.advance_by(slice.duration);
        let end = self.clock.now();
        debug!(
            "{start}: Executing Process {}, CPU Burst {burst} for {} unit(s)",
            p.id, slice.duration
        );

        match p.run(slice.duration, end) {
            ProcState::Blocked { until } => debug!("{end}: P{} blocks on I/O until {until}", p.id),
            ProcState::Completed { at } => {
                debug!("{at}: P{} completes", p.id);
                self.completed += 1;
            }
            _ => {}
        }

        self.trace.push(TraceEvent::Dispatch {
            start,
            pid: p.id,
            burst,
            duration: slice.duration,
        });
    }
}
