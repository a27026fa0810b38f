//! Discrete-event simulation of single-CPU scheduling policies.
//!
//! A workload is a list of processes, each with an arrival time and an
//! alternating sequence of CPU and I/O bursts. One engine ([`DES`]) drives
//! the run; the policy deciding what runs next and for how long is a
//! [`Scheduler`] (FIFO, SJF, SRTF, CFS or RR). The result is an execution
//! trace plus per-process completion, turnaround, waiting and response times.
//!
//! ```
//! use cpusched::{parse_workload, simulate, stats, Algorithm};
//!
//! let procs = parse_workload("0 8 -1\n0 4 -1\n".as_bytes()).unwrap();
//! let run = simulate(procs, Algorithm::SJF).unwrap();
//! let summary = stats::collect(&run);
//! assert_eq!(summary.processes[1].completion, 4);
//! assert_eq!(summary.processes[0].completion, 12);
//! ```

pub mod clock;
pub mod config;
pub mod des;
pub mod error;
pub mod process;
pub mod schedulers;
pub mod stats;
pub mod trace;
pub mod utils;

pub use config::{Algorithm, SimConfig};
pub use des::{Run, DES};
pub use error::{ConfigError, ProcessError, SimError, WorkloadError};
pub use process::{ProcState, Process, ProcessTable, MAX_TIME_VALUE};
pub use schedulers::{ReadyQueue, Scheduler, Slice};
pub use trace::TraceEvent;
pub use utils::{parse_workload, read_input_file};

/// Runs `processes` to completion under `algorithm`.
pub fn simulate(processes: Vec<Process>, algorithm: Algorithm) -> Result<Run, SimError> {
    DES::new(processes, algorithm.scheduler()).run()
}
