use crate::error::WorkloadError;
use crate::process::{Process, MAX_TIME_VALUE};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

// Each process is one line: `arrival cpu1 io1 cpu2 io2 ... cpuN -1`.
// Lines starting with '#' and blank lines are skipped. Process ids are
// assigned 1, 2, ... in file order.
pub fn read_input_file(filename: impl AsRef<Path>) -> Result<Vec<Process>, WorkloadError> {
    let file = File::open(filename)?;
    parse_workload(BufReader::new(file))
}

pub fn parse_workload<R: BufRead>(reader: R) -> Result<Vec<Process>, WorkloadError> {
    let mut processes = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let id = processes.len() + 1;
        processes.push(parse_line(id, i + 1, trimmed)?);
    }

    if processes.is_empty() {
        return Err(WorkloadError::Empty);
    }
    Ok(processes)
}

fn parse_line(id: usize, line_no: usize, line: &str) -> Result<Process, WorkloadError> {
    let mut tokens = line.split_whitespace();

    let arrival = match tokens.next() {
        Some(token) => non_negative(line_no, parse_int(line_no, token)?)?,
        None => return Err(WorkloadError::NoCpuBurst { line: line_no }),
    };

    let mut bursts = Vec::new();
    let mut terminated = false;
    for token in tokens.by_ref() {
        let value = parse_int(line_no, token)?;
        if value == -1 {
            terminated = true;
            break;
        }
        bursts.push(non_negative(line_no, value)?);
    }
    if !terminated {
        return Err(WorkloadError::MissingSentinel { line: line_no });
    }
    if tokens.next().is_some() {
        return Err(WorkloadError::TrailingTokens { line: line_no });
    }
    if bursts.is_empty() {
        return Err(WorkloadError::NoCpuBurst { line: line_no });
    }
    if bursts.len() % 2 == 0 {
        return Err(WorkloadError::EndsOnIoBurst { line: line_no });
    }

    // even positions are CPU bursts, odd positions I/O bursts
    let cpu_bursts: Vec<u64> = bursts.iter().step_by(2).copied().collect();
    let io_bursts: Vec<u64> = bursts.iter().skip(1).step_by(2).copied().collect();
    if cpu_bursts.contains(&0) {
        return Err(WorkloadError::ZeroCpuBurst { line: line_no });
    }

    Process::new(id, arrival, cpu_bursts, io_bursts).map_err(|source| {
        WorkloadError::InvalidProcess {
            line: line_no,
            source,
        }
    })
}

fn parse_int(line_no: usize, token: &str) -> Result<i64, WorkloadError> {
    token.parse().map_err(|_| WorkloadError::NotAnInteger {
        line: line_no,
        token: token.to_string(),
    })
}

// Values are capped at MAX_TIME_VALUE so clock and metric sums fit in u64.
fn non_negative(line_no: usize, value: i64) -> Result<u64, WorkloadError> {
    let value_u64 = u64::try_from(value).map_err(|_| WorkloadError::NegativeValue {
        line: line_no,
        value,
    })?;
    if value_u64 > MAX_TIME_VALUE {
        return Err(WorkloadError::ValueTooLarge {
            line: line_no,
            value,
        });
    }
    Ok(value_u64)
}
