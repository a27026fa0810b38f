use std::io::Write;
use std::process;

use anyhow::Context;
use env_logger::Builder;
use log::LevelFilter;
use serde::Serialize;

use cpusched::config::USAGE;
use cpusched::stats::{self, Summary};
use cpusched::{read_input_file, simulate, ConfigError, SimConfig, TraceEvent};

#[derive(Serialize)]
struct Report<'a> {
    trace: &'a [TraceEvent],
    summary: &'a Summary,
}

fn print_trace(trace: &[TraceEvent]) {
    for event in trace {
        match event {
            TraceEvent::Dispatch {
                start,
                pid,
                burst,
                duration,
            } => println!(
                "{:5}: Executing Process {}, CPU Burst {} for {} unit(s)",
                start, pid, burst, duration
            ),
            TraceEvent::Idle { to, .. } => {
                println!("No process ready at time {}. Advancing time.", to)
            }
        }
    }
}

fn print_summary(summary: &Summary) {
    println!("\nAlgorithm: {}", summary.algorithm);
    println!("Process\tArrival\tCPU\tCompletion\tTAT\tWT\tRT");
    for p in &summary.processes {
        println!(
            "P{}\t{:5}\t{:5}\t{:10}\t{:5}\t{:5}\t{:5}",
            p.pid, p.arrival, p.total_cpu, p.completion, p.turnaround, p.waiting, p.response
        );
    }

    println!("\nAverage Turnaround Time (ATAT): {:.2}", summary.avg_turnaround);
    println!("Average Waiting Time (AWT): {:.2}", summary.avg_waiting);
    println!("Average Response Time (ART): {:.2}", summary.avg_response);
    println!(
        "SUM: {} {} {:.4}",
        summary.total_time, summary.cpu_busy, summary.cpu_utilization
    );
}

fn init_logging(config: &SimConfig) {
    let level = if config.show_queue {
        LevelFilter::Trace
    } else if config.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    Builder::new()
        .filter_level(level)
        .parse_env("RUST_LOG")
        .format(|buf, record| writeln!(buf, "{}", record.args()))
        .init();
}

fn actual_main_fn(config: &SimConfig) -> anyhow::Result<()> {
    let processes = read_input_file(&config.inputfile)
        .with_context(|| format!("failed to load workload {}", config.inputfile.display()))?;
    let run = simulate(processes, config.algorithm)
        .with_context(|| format!("{} simulation failed", config.algorithm))?;
    let summary = stats::collect(&run);

    if config.json {
        let report = Report {
            trace: &run.trace,
            summary: &summary,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_trace(&run.trace);
        print_summary(&summary);
    }
    Ok(())
}

fn main() {
    let config = match SimConfig::from_args(std::env::args_os()) {
        Ok(config) => config,
        Err(ConfigError::Usage(msg)) => {
            eprintln!("{}", msg);
            process::exit(1);
        }
        Err(e) => {
            eprintln!("error: {}\n\nUSAGE:\n    {}", e, USAGE);
            process::exit(1);
        }
    };
    init_logging(&config);

    if let Err(e) = actual_main_fn(&config) {
        eprintln!("error: {:#}", e);
        process::exit(1);
    }
}
