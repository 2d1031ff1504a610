// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Command-line entry point: query an NTP server and set the system clock.
//!
//! Exit status is 0 on success, 1 when the exchange or the clock set fails,
//! and 2 for a bad command line.

use log::{debug, error};
use std::env;
use std::fmt;
use std::process;
use std::time::Duration;

use ntpset::clock::SystemClock;

const USAGE: &str = "\
Usage: ntpset [OPTIONS] <server>

Query an NTP server and set the local system clock from its reply.
Setting the clock requires elevated privileges (root/admin).

Options:
  -t, --timeout <seconds>  Give up after this many seconds (default 5)
  -v, --verbose            Log the exchange in detail
  -h, --help               Print this help text";

/// A problem with the command line itself, reported before any network
/// activity.
#[derive(Debug, Eq, PartialEq)]
enum UsageError {
    MissingServer,
    MissingTimeoutValue,
    InvalidTimeout(String),
    UnknownOption(String),
    ExtraArgument(String),
}

impl fmt::Display for UsageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UsageError::MissingServer => write!(f, "no server given"),
            UsageError::MissingTimeoutValue => {
                write!(f, "the timeout option needs a value in seconds")
            }
            UsageError::InvalidTimeout(value) => write!(f, "bad timeout value: {}", value),
            UsageError::UnknownOption(option) => write!(f, "unknown option: {}", option),
            UsageError::ExtraArgument(arg) => write!(f, "unexpected argument: {}", arg),
        }
    }
}

#[derive(Debug, Eq, PartialEq)]
struct Options {
    server: String,
    timeout: Duration,
    verbose: bool,
}

fn parse_args(args: &[String]) -> Result<Options, UsageError> {
    let mut server = None;
    let mut timeout = ntpset::DEFAULT_TIMEOUT;
    let mut verbose = false;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-t" | "--timeout" => {
                let value = iter.next().ok_or(UsageError::MissingTimeoutValue)?;
                let secs: u64 = value
                    .parse()
                    .map_err(|_| UsageError::InvalidTimeout(value.clone()))?;
                if secs == 0 {
                    return Err(UsageError::InvalidTimeout(value.clone()));
                }
                timeout = Duration::from_secs(secs);
            }
            "-v" | "--verbose" => verbose = true,
            other if other.starts_with('-') => {
                return Err(UsageError::UnknownOption(other.to_string()));
            }
            other => {
                if server.is_some() {
                    return Err(UsageError::ExtraArgument(other.to_string()));
                }
                server = Some(other.to_string());
            }
        }
    }

    let server = server.ok_or(UsageError::MissingServer)?;
    Ok(Options {
        server,
        timeout,
        verbose,
    })
}

fn run(options: &Options) -> Result<(), ntpset::error::SyncError> {
    debug!(
        "querying {} with a {:?} timeout",
        options.server, options.timeout
    );
    let addr = ntpset::resolve_ipv4(&options.server)?;
    let time = ntpset::sync_clock_with_timeout(addr, options.timeout, &mut SystemClock)?;
    println!("{}", time);
    Ok(())
}

fn main() {
    let args: Vec<String> = env::args().skip(1).collect();

    if args.iter().any(|arg| arg == "-h" || arg == "--help") {
        println!("{}", USAGE);
        return;
    }

    let options = match parse_args(&args) {
        Ok(options) => options,
        Err(err) => {
            eprintln!("ntpset: {}", err);
            eprintln!("{}", USAGE);
            process::exit(2);
        }
    };

    let default_level = if options.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    if let Err(err) = run(&options) {
        error!("{}", err);
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_args_defaults() {
        let options = parse_args(&args(&["pool.ntp.org"])).unwrap();
        assert_eq!(
            options,
            Options {
                server: "pool.ntp.org".to_string(),
                timeout: ntpset::DEFAULT_TIMEOUT,
                verbose: false,
            }
        );
    }

    #[test]
    fn test_parse_args_missing_server() {
        assert_eq!(parse_args(&[]), Err(UsageError::MissingServer));
        assert_eq!(parse_args(&args(&["-v"])), Err(UsageError::MissingServer));
    }

    #[test]
    fn test_parse_args_timeout() {
        let options = parse_args(&args(&["-t", "10", "host"])).unwrap();
        assert_eq!(options.timeout, Duration::from_secs(10));

        let options = parse_args(&args(&["--timeout", "2", "host"])).unwrap();
        assert_eq!(options.timeout, Duration::from_secs(2));

        // Position does not matter.
        let options = parse_args(&args(&["host", "-t", "7"])).unwrap();
        assert_eq!(options.timeout, Duration::from_secs(7));
    }

    #[test]
    fn test_parse_args_timeout_missing_value() {
        assert_eq!(
            parse_args(&args(&["host", "-t"])),
            Err(UsageError::MissingTimeoutValue)
        );
    }

    #[test]
    fn test_parse_args_timeout_not_a_number() {
        assert_eq!(
            parse_args(&args(&["-t", "soon", "host"])),
            Err(UsageError::InvalidTimeout("soon".to_string()))
        );
    }

    #[test]
    fn test_parse_args_timeout_zero_rejected() {
        assert_eq!(
            parse_args(&args(&["-t", "0", "host"])),
            Err(UsageError::InvalidTimeout("0".to_string()))
        );
    }

    #[test]
    fn test_parse_args_verbose() {
        assert!(parse_args(&args(&["-v", "host"])).unwrap().verbose);
        assert!(parse_args(&args(&["host", "--verbose"])).unwrap().verbose);
        assert!(!parse_args(&args(&["host"])).unwrap().verbose);
    }

    #[test]
    fn test_parse_args_unknown_option() {
        assert_eq!(
            parse_args(&args(&["-x", "host"])),
            Err(UsageError::UnknownOption("-x".to_string()))
        );
    }

    #[test]
    fn test_parse_args_extra_argument() {
        assert_eq!(
            parse_args(&args(&["one.example.net", "two.example.net"])),
            Err(UsageError::ExtraArgument("two.example.net".to_string()))
        );
    }

    #[test]
    fn test_usage_error_display() {
        assert_eq!(UsageError::MissingServer.to_string(), "no server given");
        assert_eq!(
            UsageError::InvalidTimeout("x".to_string()).to_string(),
            "bad timeout value: x"
        );
        assert_eq!(
            UsageError::UnknownOption("--fast".to_string()).to_string(),
            "unknown option: --fast"
        );
    }
}
