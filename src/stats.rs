//! Per-process and aggregate metrics of a finished run.

use serde::Serialize;

use crate::des::Run;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessStats {
    pub pid: usize,
    pub arrival: u64,
    pub total_cpu: u64,
    pub completion: u64,
    /// completion - arrival
    pub turnaround: u64,
    /// turnaround - total_cpu
    pub waiting: u64,
    /// first dispatch - arrival
    pub response: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub algorithm: String,
    pub processes: Vec<ProcessStats>,
    pub avg_turnaround: f64,
    pub avg_waiting: f64,
    pub avg_response: f64,
    pub total_time: u64,
    pub cpu_busy: u64,
    pub cpu_utilization: f64,
}

/// Computes the metrics of every process in `run` and their averages.
pub fn collect(run: &Run) -> Summary {
    let processes: Vec<ProcessStats> = run
        .processes
        .iter()
        .map(|p| {
            debug_assert!(p.is_complete());
            let completion = p.completion_time().unwrap_or(run.total_time);
            let total_cpu = p.total_cpu();
            let turnaround = completion.saturating_sub(p.arrival);
            ProcessStats {
                pid: p.id,
                arrival: p.arrival,
                total_cpu,
                completion,
                turnaround,
                waiting: turnaround.saturating_sub(total_cpu),
                response: p.first_run.unwrap_or(completion).saturating_sub(p.arrival),
            }
        })
        .collect();

    let cpu_busy = run.busy_time();
    Summary {
        algorithm: run.algorithm.to_string(),
        avg_turnaround: average(processes.iter().map(|s| s.turnaround)),
        avg_waiting: average(processes.iter().map(|s| s.waiting)),
        avg_response: average(processes.iter().map(|s| s.response)),
        processes,
        total_time: run.total_time,
        cpu_busy,
        cpu_utilization: if run.total_time == 0 {
            0.0
        } else {
            cpu_busy as f64 / run.total_time as f64
        },
    }
}

fn average(values: impl Iterator<Item = u64>) -> f64 {
    let (sum, n) = values.fold((0u64, 0usize), |(sum, n), v| (sum + v, n + 1));
    if n == 0 {
        0.0
    } else {
        sum as f64 / n as f64
    }
}
