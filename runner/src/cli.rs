//! Command line parsing.
//!
//! ```text
//! runner [--cpus N] [--input PATH] [--output PATH] [--stats PATH]
//!        [--algo fcfs|rr|rr1|rr4|spn|srt|hrrn] [--quantum N]
//!        [--interval N] [--log error|warn|info|debug|trace]
//! ```

use std::num::NonZeroUsize;
use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use log::LevelFilter;
use scheduler::Algorithm;

/// Everything `main` needs to know.
#[derive(Debug, Clone, PartialEq)]
pub struct Args {
    pub cpus: NonZeroUsize,
    /// Read the workload from stdin when missing.
    pub input: Option<PathBuf>,
    pub output: PathBuf,
    pub stats: PathBuf,
    pub algorithm: Algorithm,
    pub quantum: NonZeroUsize,
    pub interval: usize,
    pub log: LevelFilter,
}

impl Default for Args {
    fn default() -> Self {
        Args {
            cpus: NonZeroUsize::new(4).expect("non zero"),
            input: None,
            output: PathBuf::from("result.txt"),
            stats: PathBuf::from("procStats.txt"),
            algorithm: Algorithm::Fcfs,
            quantum: NonZeroUsize::new(4).expect("non zero"),
            interval: 2,
            log: LevelFilter::Info,
        }
    }
}

pub const USAGE: &str = "\
usage: runner [OPTIONS]

options:
  --cpus N         number of CPUs (default: 4)
  --input PATH     workload file (default: stdin)
  --output PATH    tick trace file (default: result.txt)
  --stats PATH     process statistics file (default: procStats.txt)
  --algo NAME      fcfs, rr, rr1, rr4, spn, srt, hrrn (default: fcfs)
  --quantum N      round robin quantum for --algo rr (default: 4)
  --interval N     ticks between process arrivals (default: 2)
  --log LEVEL      error, warn, info, debug, trace (default: info)
  -h, --help       print this message
";

/// Parses the arguments that follow the program name.
///
/// Returns `None` when help was requested.
pub fn parse_args<I>(args: I) -> Result<Option<Args>>
where
    I: IntoIterator<Item = String>,
{
    let mut parsed = Args::default();
    let mut args = args.into_iter();

    while let Some(flag) = args.next() {
        if flag == "-h" || flag == "--help" {
            return Ok(None);
        }
        let mut value = || {
            args.next()
                .ok_or_else(|| anyhow!("missing value for {flag}"))
        };
        match flag.as_str() {
            "--cpus" => parsed.cpus = non_zero(&flag, &value()?)?,
            "--input" => parsed.input = Some(PathBuf::from(value()?)),
            "--output" => parsed.output = PathBuf::from(value()?),
            "--stats" => parsed.stats = PathBuf::from(value()?),
            "--algo" => parsed.algorithm = value()?.parse()?,
            "--quantum" => parsed.quantum = non_zero(&flag, &value()?)?,
            "--interval" => {
                let interval = value()?;
                parsed.interval = interval
                    .parse()
                    .with_context(|| format!("invalid value {interval:?} for --interval"))?;
            }
            "--log" => {
                let level = value()?;
                parsed.log = level
                    .parse()
                    .with_context(|| format!("invalid log level {level:?}"))?;
            }
            _ => bail!("unknown argument {flag:?}\n\n{USAGE}"),
        }
    }

    Ok(Some(parsed))
}

fn non_zero(flag: &str, value: &str) -> Result<NonZeroUsize> {
    value
        .parse::<NonZeroUsize>()
        .with_context(|| format!("{flag} expects a positive number, got {value:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Option<Args>> {
        parse_args(args.iter().map(|arg| arg.to_string()))
    }

    #[test]
    fn defaults() {
        assert_eq!(parse(&[]).unwrap(), Some(Args::default()));
    }

    #[test]
    fn all_flags() {
        let args = parse(&[
            "--cpus", "2", "--input", "procs.txt", "--output", "out.txt", "--stats", "s.txt",
            "--algo", "rr", "--quantum", "3", "--interval", "0", "--log", "debug",
        ])
        .unwrap()
        .unwrap();

        assert_eq!(args.cpus.get(), 2);
        assert_eq!(args.input, Some(PathBuf::from("procs.txt")));
        assert_eq!(args.output, PathBuf::from("out.txt"));
        assert_eq!(args.stats, PathBuf::from("s.txt"));
        assert_eq!(args.algorithm, Algorithm::RoundRobin);
        assert_eq!(args.quantum.get(), 3);
        assert_eq!(args.interval, 0);
        assert_eq!(args.log, LevelFilter::Debug);
    }

    #[test]
    fn help() {
        assert_eq!(parse(&["--cpus", "2", "--help"]).unwrap(), None);
    }

    #[test]
    fn rejects_bad_input() {
        assert!(parse(&["--cpus", "0"]).is_err());
        assert!(parse(&["--algo", "lottery"]).is_err());
        assert!(parse(&["--quantum"]).is_err());
        assert!(parse(&["--verbose"]).is_err());
        assert!(parse(&["--log", "loud"]).is_err());
    }
}
