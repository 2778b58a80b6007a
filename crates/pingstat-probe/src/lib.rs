//! Latency probing via an external ping facility.

mod system;

pub use system::SystemPinger;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use pingstat_ops::StatStore;
use pingstat_types::{config::ProbeConfig, measurement::Measurement, PingstatError, Result};
use regex::Regex;
use tokio::time::{sleep, Duration};
use tracing::{debug, error, info, warn};

static LATENCY_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"time=([0-9]{1,4}(?:[.,]?[0-9]{1,4})?)").expect("latency pattern is valid")
});

/// Raw result of one ping invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PingOutput {
    /// `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
    pub stdout: String,
}

impl PingOutput {
    pub fn no_reply() -> Self {
        Self {
            exit_code: Some(1),
            stdout: String::new(),
        }
    }
}

#[async_trait]
pub trait Pinger: Send + Sync {
    /// Sends a single echo request to `host`, waiting at most `timeout`.
    async fn ping(&self, host: &str, timeout: Duration) -> Result<PingOutput>;
}

#[async_trait]
impl<'a, T> Pinger for &'a T
where
    T: Pinger + ?Sized,
{
    async fn ping(&self, host: &str, timeout: Duration) -> Result<PingOutput> {
        (**self).ping(host, timeout).await
    }
}

/// How a single probe ended.
#[derive(Debug, Clone, PartialEq)]
pub enum ProbeOutcome {
    Reply(f64),
    /// Exit status 1: timeout or unreachable host.
    NoReply,
    /// Exit status 2, any other non-zero status, or a signal.
    Failed(Option<i32>),
    /// Successful exit but no `time=` in the output.
    Unparsable,
    /// The facility could not be started at all.
    Unavailable(String),
}

impl ProbeOutcome {
    pub fn latency_ms(&self) -> Option<f64> {
        match self {
            ProbeOutcome::Reply(latency) => Some(*latency),
            _ => None,
        }
    }
}

/// Extracts the round-trip time following `time=` from ping output.
pub fn extract_latency(output: &str) -> Option<f64> {
    let captures = LATENCY_PATTERN.captures(output)?;
    captures.get(1)?.as_str().replace(',', ".").parse().ok()
}

/// Pings `host` once and classifies the result, logging every failure.
pub async fn probe<P>(pinger: &P, host: &str, timeout: Duration) -> ProbeOutcome
where
    P: Pinger + ?Sized,
{
    let output = match pinger.ping(host, timeout).await {
        Ok(output) => output,
        Err(err) => {
            warn!("ping could not be run: {err}");
            return ProbeOutcome::Unavailable(err.to_string());
        }
    };

    match output.exit_code {
        Some(0) => match extract_latency(&output.stdout) {
            Some(latency) => {
                debug!("{host} replied in {latency} ms");
                ProbeOutcome::Reply(latency)
            }
            None => {
                error!("no latency found in ping output for {host}");
                ProbeOutcome::Unparsable
            }
        },
        Some(1) => {
            warn!("ping returned exit status \"1\", no reply from {host}");
            ProbeOutcome::NoReply
        }
        Some(2) => {
            warn!("ping returned exit status \"2\", unknown error");
            ProbeOutcome::Failed(Some(2))
        }
        code => {
            warn!("ping returned an unknown error (status {:?})", code);
            ProbeOutcome::Failed(code)
        }
    }
}

/// Counters for one probe run.
#[derive(Debug, Default, Clone)]
pub struct ProbeReport {
    pub measurements: Vec<Measurement>,
    pub replies: u32,
    pub lost: u32,
    pub write_failures: u32,
}

/// Probe-and-append loop bounded by `count` iterations.
pub struct Prober<P: Pinger> {
    pinger: P,
    store: StatStore,
    host: String,
    timeout: Duration,
    count: u32,
    interval: Duration,
}

impl<P: Pinger> Prober<P> {
    pub fn new(config: &ProbeConfig, store: StatStore, pinger: P) -> Self {
        Self {
            pinger,
            store,
            host: config.host.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
            count: config.count,
            interval: Duration::from_secs(config.interval_secs),
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Probes once and appends the result, an empty latency field for any
    /// failure.
    pub async fn probe_and_record(&self) -> (ProbeOutcome, Measurement, Result<()>) {
        let outcome = probe(&self.pinger, &self.host, self.timeout).await;
        let measurement = Measurement::now(outcome.latency_ms());
        let written = self.store.append(&measurement).map(|_| ());
        (outcome, measurement, written)
    }

    pub async fn run(&self) -> ProbeReport {
        info!(
            "Pinging {} {} time(s), {}s apart",
            self.host,
            self.count,
            self.interval.as_secs()
        );
        let mut report = ProbeReport::default();
        for iteration in 0..self.count {
            if iteration > 0 {
                sleep(self.interval).await;
            }
            let (outcome, measurement, written) = self.probe_and_record().await;
            if outcome.latency_ms().is_some() {
                report.replies += 1;
            } else {
                report.lost += 1;
            }
            if let Err(err) = written {
                error!("{err}");
                report.write_failures += 1;
            }
            report.measurements.push(measurement);
        }
        info!(
            "Probe run finished: {} replies, {} lost",
            report.replies, report.lost
        );
        report
    }
}

/// Generate an error aligned with probe semantics.
pub fn probe_error(message: impl Into<String>) -> PingstatError {
    PingstatError::Probe(message.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use pingstat_types::measurement::DateKey;

    const LINUX_REPLY: &str = "PING example.com (93.184.216.34) 56(84) bytes of data.\n\
        64 bytes from 93.184.216.34: icmp_seq=1 ttl=56 time=23.4 ms\n\n\
        --- example.com ping statistics ---\n\
        1 packets transmitted, 1 received, 0% packet loss, time 0ms\n";

    /// Replays canned ping results in order.
    struct ScriptedPinger {
        script: Mutex<Vec<Result<PingOutput>>>,
    }

    impl ScriptedPinger {
        fn new(mut script: Vec<Result<PingOutput>>) -> Self {
            script.reverse();
            Self {
                script: Mutex::new(script),
            }
        }
    }

    #[async_trait]
    impl Pinger for ScriptedPinger {
        async fn ping(&self, _host: &str, _timeout: Duration) -> Result<PingOutput> {
            self.script
                .lock()
                .map_err(|_| probe_error("script lock poisoned"))?
                .pop()
                .unwrap_or_else(|| Ok(PingOutput::no_reply()))
        }
    }

    fn exited(code: i32, stdout: &str) -> Result<PingOutput> {
        Ok(PingOutput {
            exit_code: Some(code),
            stdout: stdout.into(),
        })
    }

    #[test]
    fn extracts_latency_after_marker() {
        assert_eq!(extract_latency(LINUX_REPLY), Some(23.4));
        assert_eq!(extract_latency("time=0.045 ms"), Some(0.045));
        assert_eq!(extract_latency("time=12 ms"), Some(12.0));
        assert_eq!(extract_latency("time=1,5 ms"), Some(1.5));
        assert_eq!(extract_latency("Request timeout for icmp_seq 0"), None);
        assert_eq!(extract_latency(""), None);
    }

    #[tokio::test]
    async fn classifies_exit_statuses() {
        let pinger = ScriptedPinger::new(vec![
            exited(0, LINUX_REPLY),
            exited(1, ""),
            exited(2, ""),
            exited(68, ""),
            Ok(PingOutput {
                exit_code: None,
                stdout: String::new(),
            }),
            exited(0, "garbage"),
            Err(probe_error("not installed")),
        ]);
        let timeout = Duration::from_secs(1);
        let host = "example.com";

        assert_eq!(probe(&pinger, host, timeout).await, ProbeOutcome::Reply(23.4));
        assert_eq!(probe(&pinger, host, timeout).await, ProbeOutcome::NoReply);
        assert_eq!(probe(&pinger, host, timeout).await, ProbeOutcome::Failed(Some(2)));
        assert_eq!(probe(&pinger, host, timeout).await, ProbeOutcome::Failed(Some(68)));
        assert_eq!(probe(&pinger, host, timeout).await, ProbeOutcome::Failed(None));
        assert_eq!(probe(&pinger, host, timeout).await, ProbeOutcome::Unparsable);
        assert!(matches!(
            probe(&pinger, host, timeout).await,
            ProbeOutcome::Unavailable(_)
        ));
    }

    #[tokio::test]
    async fn run_appends_one_line_per_iteration() {
        let dir = tempfile::tempdir().expect("temp dir");
        let pinger = ScriptedPinger::new(vec![
            exited(0, LINUX_REPLY),
            exited(1, ""),
            exited(0, "no marker here"),
        ]);
        let config = ProbeConfig {
            count: 3,
            ..ProbeConfig::default()
        };
        let prober =
            Prober::new(&config, StatStore::new(dir.path()), pinger).with_interval(Duration::ZERO);

        let report = prober.run().await;
        assert_eq!(report.measurements.len(), 3);
        assert_eq!(report.replies, 1);
        assert_eq!(report.lost, 2);
        assert_eq!(report.write_failures, 0);

        let mut expected = String::new();
        let mut days: Vec<DateKey> = Vec::new();
        for measurement in &report.measurements {
            expected.push_str(&measurement.log_line());
            if !days.contains(&measurement.date_key()) {
                days.push(measurement.date_key());
            }
        }
        let mut written = String::new();
        for day in &days {
            written.push_str(&std::fs::read_to_string(dir.path().join(day.as_str())).unwrap());
        }
        assert_eq!(written, expected);
        assert!(expected.lines().next().unwrap().ends_with(" 23.4"));
        assert!(expected.lines().nth(1).unwrap().ends_with(' '));
    }

    #[tokio::test]
    async fn write_failures_are_counted_not_fatal() {
        let dir = tempfile::tempdir().expect("temp dir");
        let missing = dir.path().join("not-created");
        let pinger = ScriptedPinger::new(vec![exited(0, LINUX_REPLY), exited(0, LINUX_REPLY)]);
        let config = ProbeConfig {
            count: 2,
            ..ProbeConfig::default()
        };
        let prober =
            Prober::new(&config, StatStore::new(missing), pinger).with_interval(Duration::ZERO);

        let report = prober.run().await;
        assert_eq!(report.replies, 2);
        assert_eq!(report.write_failures, 2);
    }
}
