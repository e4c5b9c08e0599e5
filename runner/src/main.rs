use std::fs::{self, File};
use std::io::{self, BufWriter, Read, Write};
use std::{env, process};

use anyhow::{Context, Result};
use log::info;
use processor::{format_stats, format_summary, parse_workload, Processor};
use scheduler::Config;

mod cli;
mod logger;

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err:#}");
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let Some(args) = cli::parse_args(env::args().skip(1))? else {
        print!("{}", cli::USAGE);
        return Ok(());
    };
    logger::init(args.log)?;

    let text = match &args.input {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("cannot read workload {}", path.display()))?,
        None => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("cannot read workload from stdin")?;
            text
        }
    };
    let procs = parse_workload(&text, args.interval)?;

    let mut trace = File::create(&args.output)
        .map(BufWriter::new)
        .with_context(|| format!("cannot create {}", args.output.display()))?;
    let mut stats_file = File::create(&args.stats)
        .with_context(|| format!("cannot create {}", args.stats.display()))?;

    let config = Config {
        cpu_count: args.cpus,
        policy: args.algorithm.policy(args.quantum),
    };
    info!("Scheduling {} processes with {}", procs.len(), args.algorithm);

    let mut write_error = None;
    let stats = Processor::run_with(config, procs, |snapshot| {
        if write_error.is_none() {
            write_error = writeln!(trace, "{snapshot}").err();
        }
    })?;
    if let Some(err) = write_error {
        return Err(err).with_context(|| format!("cannot write {}", args.output.display()));
    }
    trace
        .flush()
        .with_context(|| format!("cannot write {}", args.output.display()))?;

    writeln!(stats_file, "{}", format_stats(&stats))
        .and_then(|_| write!(stats_file, "{}", format_summary(&stats)))
        .with_context(|| format!("cannot write {}", args.stats.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests;
