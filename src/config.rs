//! Command-line surface and run configuration.

use std::ffi::OsString;
use std::fmt;
use std::num::NonZeroU64;
use std::path::PathBuf;

use clap::{App, Arg, ArgMatches, ErrorKind};
use regex::Regex;

use crate::error::ConfigError;
use crate::schedulers::{Scheduler, CFS, FIFO, RR, SJF, SRTF};

pub const USAGE: &str = "cpusched [-v] [-q] [--json] <FIFO|SJF|SRTF|CFS|RR> <workload-file> [<quantum>]";

/// Scheduling policy selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    FIFO,
    SJF,
    SRTF,
    CFS,
    RR(NonZeroU64),
}

impl Algorithm {
    /// Resolves an algorithm name and optional quantum.
    ///
    /// RR requires a positive quantum; every other policy rejects one.
    pub fn from_args(name: &str, quantum: Option<&str>) -> Result<Self, ConfigError> {
        let algorithm = match name {
            "FIFO" => Algorithm::FIFO,
            "SJF" => Algorithm::SJF,
            "SRTF" => Algorithm::SRTF,
            "CFS" => Algorithm::CFS,
            "RR" => {
                let q = quantum.ok_or(ConfigError::MissingQuantum)?;
                let q = q
                    .parse::<NonZeroU64>()
                    .map_err(|_| ConfigError::InvalidQuantum(q.to_string()))?;
                return Ok(Algorithm::RR(q));
            }
            _ => return Err(ConfigError::UnknownAlgorithm(name.to_string())),
        };
        if quantum.is_some() {
            return Err(ConfigError::UnexpectedQuantum {
                algorithm: name.to_string(),
            });
        }
        Ok(algorithm)
    }

    pub fn scheduler(&self) -> Box<dyn Scheduler> {
        match *self {
            Algorithm::FIFO => Box::new(FIFO::new()),
            Algorithm::SJF => Box::new(SJF::new()),
            Algorithm::SRTF => Box::new(SRTF::new()),
            Algorithm::CFS => Box::new(CFS::new()),
            Algorithm::RR(q) => Box::new(RR::new(q)),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Algorithm::FIFO => f.write_str("FIFO"),
            Algorithm::SJF => f.write_str("SJF"),
            Algorithm::SRTF => f.write_str("SRTF"),
            Algorithm::CFS => f.write_str("CFS"),
            Algorithm::RR(q) => write!(f, "RR (quantum {q})"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimConfig {
    pub algorithm: Algorithm,
    pub inputfile: PathBuf,
    /// `-v`: log engine events.
    pub verbose: bool,
    /// `-q`: also log the ready queue at every dispatch.
    pub show_queue: bool,
    /// `--json`: print the report as JSON.
    pub json: bool,
}

impl SimConfig {
    /// Parses a full argument vector, program name included.
    ///
    /// `--help` and `--version` print and exit like any clap program.
    pub fn from_args<I, T>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = match build_cli().try_get_matches_from(args) {
            Ok(matches) => matches,
            Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
                e.exit()
            }
            Err(e) => return Err(ConfigError::Usage(e.to_string().trim_end().to_string())),
        };
        Self::from_matches(&matches)
    }

    pub fn from_matches(matches: &ArgMatches) -> Result<Self, ConfigError> {
        let name = matches.value_of("algorithm").unwrap_or_default();
        let algorithm = Algorithm::from_args(name, matches.value_of("quantum"))?;
        let inputfile = PathBuf::from(matches.value_of("inputfile").unwrap_or_default());

        Ok(SimConfig {
            algorithm,
            inputfile,
            verbose: matches.is_present("v_flag"),
            show_queue: matches.is_present("q_flag"),
            json: matches.is_present("json"),
        })
    }
}

pub fn build_cli() -> App<'static> {
    App::new("cpusched")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Discrete-event CPU scheduling simulator")
        .override_usage(USAGE)
        .arg(
            Arg::with_name("algorithm")
                .help("Scheduling algorithm: FIFO, SJF, SRTF, CFS or RR")
                .required(true)
                .validator(valid_algorithm)
                .index(1),
        )
        .arg(
            Arg::with_name("inputfile")
                .help("Workload description file")
                .required(true)
                .index(2),
        )
        .arg(
            Arg::with_name("quantum")
                .help("Time quantum, required for RR only")
                .validator(valid_quantum)
                .index(3),
        )
        .arg(
            Arg::with_name("v_flag")
                .short('v')
                .help("Log simulation events")
                .takes_value(false),
        )
        .arg(
            Arg::with_name("q_flag")
                .short('q')
                .help("Log the ready queue at every dispatch")
                .takes_value(false),
        )
        .arg(
            Arg::with_name("json")
                .long("json")
                .help("Print the report as JSON")
                .takes_value(false),
        )
}

fn valid_algorithm(value: &str) -> Result<(), String> {
    let re = Regex::new(r"^(FIFO|SJF|SRTF|CFS|RR)$").map_err(|e| e.to_string())?;
    if !re.is_match(value) {
        Err(format!(
            "Unsupported scheduling algorithm: {}. Must be one of FIFO, SJF, SRTF, CFS or RR",
            value
        ))
    } else {
        Ok(())
    }
}

fn valid_quantum(value: &str) -> Result<(), String> {
    let re = Regex::new(r"^\d+$").map_err(|e| e.to_string())?;
    if !re.is_match(value) {
        Err(format!("Invalid time quantum: {}. Must be an integer", value))
    } else {
        Ok(())
    }
}
