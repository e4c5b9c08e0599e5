use std::env;
use std::fs;
use std::num::NonZeroUsize;

use processor::{format_logs, parse_workload, Processor, Report};
use scheduler::{Config, Policy};

mod hrrn;
mod spn;

fn write_logs(folder: &str, name: &str, logs: &str) {
    fs::create_dir_all(format!("../outputs/{folder}")).unwrap();
    fs::write(format!("../outputs/{folder}/{name}.log"), logs).unwrap();
}

fn read_logs(folder: &str, name: &str) -> String {
    fs::read_to_string(format!("../outputs/{folder}/{name}.log")).unwrap()
}

fn run(folder: &str, name: &str, report: &Report) {
    let output = format_logs(&report.logs);

    if env::var("WRITE_OUTPUT").is_ok() {
        write_logs(folder, name, &output);
    } else {
        let reference = read_logs(folder, name);

        println!("\nleft = Correct Output\nright = Your Output\n");
        use pretty_assertions::assert_eq;
        assert_eq!(reference, output);
    }
}

/// Runs the workload in `text` and checks every process finished.
fn simulate(cpus: usize, policy: Policy, text: &str, interval: usize) -> Report {
    let config = Config {
        cpu_count: NonZeroUsize::new(cpus).unwrap(),
        policy,
    };
    let procs = parse_workload(text, interval).unwrap();
    let count = procs.len();
    let report = Processor::run(config, procs).unwrap();

    assert_eq!(report.stats.len(), count);
    for stats in &report.stats {
        assert_eq!(
            stats.turnaround_ticks,
            stats.service_ticks + stats.ready_or_blocked_ticks
        );
    }
    report
}
