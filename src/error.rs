//! Error types for the three stages of a run.
//!
//! Loading, configuration and simulation each get their own enum so a
//! failure always names the stage that produced it. None of them are
//! retried: the binary reports the error once and exits with status 1.

use std::fmt;
use std::io;

/// Errors raised while reading a workload file.
///
/// Line numbers are 1-based and count blank and comment lines, so they
/// match what an editor shows.
#[derive(Debug)]
#[non_exhaustive]
pub enum WorkloadError {
    /// The file could not be read.
    Io(io::Error),
    /// A token is not an integer.
    NotAnInteger { line: usize, token: String },
    /// A value other than the `-1` sentinel is negative.
    NegativeValue { line: usize, value: i64 },
    /// The line ends without the `-1` sentinel.
    MissingSentinel { line: usize },
    /// Tokens follow the `-1` sentinel.
    TrailingTokens { line: usize },
    /// The line has an arrival time but no CPU burst.
    NoCpuBurst { line: usize },
    /// The burst sequence ends on an I/O burst.
    EndsOnIoBurst { line: usize },
    /// A CPU burst has zero length.
    ZeroCpuBurst { line: usize },
    /// A time value exceeds [`MAX_TIME_VALUE`](crate::process::MAX_TIME_VALUE).
    ValueTooLarge { line: usize, value: i64 },
    /// The values passed the line checks but do not form a valid process.
    InvalidProcess { line: usize, source: ProcessError },
    /// The file describes no process at all.
    Empty,
}

impl fmt::Display for WorkloadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "I/O error: {err}"),
            Self::NotAnInteger { line, token } => {
                write!(f, "line {line}: `{token}` is not an integer")
            }
            Self::NegativeValue { line, value } => {
                write!(f, "line {line}: negative value {value}")
            }
            Self::MissingSentinel { line } => write!(f, "line {line}: missing -1 terminator"),
            Self::TrailingTokens { line } => {
                write!(f, "line {line}: unexpected tokens after -1 terminator")
            }
            Self::NoCpuBurst { line } => write!(f, "line {line}: process has no CPU burst"),
            Self::EndsOnIoBurst { line } => {
                write!(f, "line {line}: burst sequence must end on a CPU burst")
            }
            Self::ZeroCpuBurst { line } => write!(f, "line {line}: CPU bursts must be positive"),
            Self::ValueTooLarge { line, value } => write!(
                f,
                "line {line}: value {value} exceeds the maximum of {}",
                crate::process::MAX_TIME_VALUE
            ),
            Self::InvalidProcess { line, source } => write!(f, "line {line}: {source}"),
            Self::Empty => write!(f, "workload contains no processes"),
        }
    }
}

impl std::error::Error for WorkloadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::InvalidProcess { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<io::Error> for WorkloadError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

/// Burst lists rejected by [`Process::new`](crate::process::Process::new).
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProcessError {
    /// No CPU burst at all.
    NoCpuBurst,
    /// I/O bursts must number exactly one fewer than CPU bursts.
    BurstMismatch { cpu: usize, io: usize },
    /// A CPU burst has zero length.
    ZeroCpuBurst,
    /// The arrival time or a burst exceeds
    /// [`MAX_TIME_VALUE`](crate::process::MAX_TIME_VALUE).
    ValueTooLarge { value: u64 },
}

impl fmt::Display for ProcessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoCpuBurst => write!(f, "process has no CPU burst"),
            Self::BurstMismatch { cpu, io } => write!(
                f,
                "{cpu} CPU burst(s) need {} I/O burst(s), got {io}",
                cpu.saturating_sub(1)
            ),
            Self::ZeroCpuBurst => write!(f, "CPU bursts must be positive"),
            Self::ValueTooLarge { value } => write!(
                f,
                "value {value} exceeds the maximum of {}",
                crate::process::MAX_TIME_VALUE
            ),
        }
    }
}

impl std::error::Error for ProcessError {}

/// Errors in the command-line configuration, raised before simulating.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    /// The algorithm name is not one of FIFO, SJF, SRTF, CFS, RR.
    UnknownAlgorithm(String),
    /// RR was requested without a quantum.
    MissingQuantum,
    /// A quantum was given for an algorithm other than RR.
    UnexpectedQuantum { algorithm: String },
    /// The quantum is not a positive integer.
    InvalidQuantum(String),
    /// Wrong argument count or an unknown flag; carries clap's message.
    Usage(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownAlgorithm(name) => write!(
                f,
                "unsupported scheduling algorithm `{name}` (expected FIFO, SJF, SRTF, CFS or RR)"
            ),
            Self::MissingQuantum => write!(f, "RR requires a time quantum"),
            Self::UnexpectedQuantum { algorithm } => {
                write!(f, "{algorithm} does not take a time quantum")
            }
            Self::InvalidQuantum(value) => {
                write!(f, "time quantum `{value}` must be a positive integer")
            }
            Self::Usage(msg) => f.write_str(msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Violations detected by the simulation engine.
///
/// These point at a defect in the workload or the engine and are fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SimError {
    /// Nothing is ready and no future arrival or I/O completion exists,
    /// yet `pending` processes have not completed.
    Stall { time: u64, pending: usize },
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stall { time, pending } => write!(
                f,
                "simulation stalled at time {time} with {pending} incomplete process(es)"
            ),
        }
    }
}

impl std::error::Error for SimError {}
