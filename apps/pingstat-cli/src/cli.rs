use std::{env, fmt::Display, ops::RangeInclusive, path::PathBuf, str::FromStr};

use clap::Parser;
use pingstat_orchestrator::RunPlan;
use pingstat_types::{
    config::{PingstatConfig, TIMEOUT_RANGE_SECS},
    Result,
};

pub const CONFIG_ENV: &str = "PINGSTAT_CONFIG";

/// Logs round-trip latency to a host and renders the collected statistics
/// as HTML charts.
#[derive(Debug, Parser)]
#[command(name = "pingstat", version, about)]
pub struct Cli {
    /// Generate the HTML reports.
    #[arg(long)]
    pub report: bool,

    /// Ping the host and append the result to today's stat file.
    #[arg(long)]
    pub ping: bool,

    /// Directory for the HTML reports.
    #[arg(long = "report_dir", value_name = "PATH")]
    pub report_dir: Option<String>,

    /// Directory for the per-day stat files.
    #[arg(long = "stat_dir", value_name = "PATH")]
    pub stat_dir: Option<String>,

    /// Host to ping.
    #[arg(long)]
    pub host: Option<String>,

    /// Seconds to wait for a reply (1-30).
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<String>,

    /// Number of pings per run.
    #[arg(long, value_name = "N")]
    pub count: Option<String>,

    /// Seconds between pings.
    #[arg(long, value_name = "SECONDS")]
    pub interval: Option<String>,

    /// Enable debug logging.
    #[arg(long)]
    pub debug: bool,

    /// TOML config file; defaults to $PINGSTAT_CONFIG when set.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Final configuration plus the warnings produced while building it. The
/// warnings are logged once tracing is up.
#[derive(Debug)]
pub struct Resolved {
    pub config: PingstatConfig,
    pub warnings: Vec<String>,
}

impl Cli {
    pub fn plan(&self) -> RunPlan {
        RunPlan {
            ping: self.ping,
            report: self.report,
        }
    }

    pub fn resolve(&self) -> Result<Resolved> {
        let config_path = self
            .config
            .clone()
            .or_else(|| env::var_os(CONFIG_ENV).map(PathBuf::from));
        self.resolve_with(config_path)
    }

    fn resolve_with(&self, config_path: Option<PathBuf>) -> Result<Resolved> {
        let mut warnings = Vec::new();
        let mut config = match config_path {
            Some(path) => {
                let loaded = PingstatConfig::from_file(&path)?;
                match loaded.validate() {
                    Ok(()) => loaded,
                    Err(err) => {
                        warnings.push(format!(
                            "invalid config in '{}': {err}; falling back to defaults",
                            path.display()
                        ));
                        PingstatConfig::default()
                    }
                }
            }
            None => PingstatConfig::default(),
        };

        if let Some(host) = &self.host {
            if host.trim().is_empty() {
                warnings.push(format!("empty --host; using {}", config.probe.host));
            } else {
                config.probe.host = host.trim().to_string();
            }
        }
        if let Some(raw) = &self.timeout {
            let expected = format!(
                "an integer between {} and {}",
                TIMEOUT_RANGE_SECS.start(),
                TIMEOUT_RANGE_SECS.end()
            );
            override_bounded(
                &mut config.probe.timeout_secs,
                raw,
                ("timeout", &expected),
                TIMEOUT_RANGE_SECS,
                &mut warnings,
            );
        }
        if let Some(raw) = &self.count {
            override_bounded(
                &mut config.probe.count,
                raw,
                ("count", "an integer greater than 0"),
                1..=u32::MAX,
                &mut warnings,
            );
        }
        if let Some(raw) = &self.interval {
            override_bounded(
                &mut config.probe.interval_secs,
                raw,
                ("interval", "an integer greater than 0"),
                1..=u64::MAX,
                &mut warnings,
            );
        }
        if let Some(dir) = &self.stat_dir {
            config.storage.stat_dir = dir.clone();
        }
        if let Some(dir) = &self.report_dir {
            config.report.report_dir = dir.clone();
        }
        if self.debug {
            config.ops.log_level = "debug".into();
        }

        Ok(Resolved { config, warnings })
    }
}

/// Replaces `target` with `raw` when it parses and lies in `range`;
/// otherwise keeps `target` and records a warning.
fn override_bounded<T>(
    target: &mut T,
    raw: &str,
    (flag, expected): (&str, &str),
    range: RangeInclusive<T>,
    warnings: &mut Vec<String>,
) where
    T: FromStr + PartialOrd + Display,
{
    match raw.trim().parse::<T>() {
        Ok(value) if range.contains(&value) => *target = value,
        _ => warnings.push(format!(
            "--{flag}={raw} ignored: {flag} must be {expected}; using {target}"
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pingstat_types::config::{DEFAULT_COUNT, DEFAULT_INTERVAL_SECS, DEFAULT_TIMEOUT_SECS};
    use std::fs;

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["pingstat"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).expect("valid arguments")
    }

    #[test]
    fn parses_original_flag_spellings() {
        let cli = cli(&[
            "--ping",
            "--report",
            "--report_dir=/tmp/reports",
            "--stat_dir=/tmp/stats",
            "--host=192.168.0.1",
            "--timeout=5",
            "--count=10",
            "--interval=6",
            "--debug",
        ]);
        assert_eq!(
            cli.plan(),
            RunPlan {
                ping: true,
                report: true
            }
        );

        let resolved = cli.resolve_with(None).expect("resolve");
        assert!(resolved.warnings.is_empty());
        let config = resolved.config;
        assert_eq!(config.report.report_dir, "/tmp/reports");
        assert_eq!(config.storage.stat_dir, "/tmp/stats");
        assert_eq!(config.probe.host, "192.168.0.1");
        assert_eq!(config.probe.timeout_secs, 5);
        assert_eq!(config.probe.count, 10);
        assert_eq!(config.probe.interval_secs, 6);
        assert_eq!(config.ops.log_level, "debug");
    }

    #[test]
    fn invalid_numbers_fall_back_with_warnings() {
        let cli = cli(&["--timeout=31", "--count=0", "--interval=soon"]);
        let resolved = cli.resolve_with(None).expect("resolve");
        assert_eq!(resolved.warnings.len(), 3);
        assert!(resolved.warnings[0].contains("between 1 and 30"));
        assert_eq!(resolved.config.probe.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(resolved.config.probe.count, DEFAULT_COUNT);
        assert_eq!(resolved.config.probe.interval_secs, DEFAULT_INTERVAL_SECS);
    }

    #[test]
    fn flags_override_config_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("pingstat.toml");
        fs::write(
            &path,
            "[probe]\nhost = \"10.0.0.1\"\ntimeout_secs = 7\ncount = 4\n",
        )
        .expect("write config");

        let cli = cli(&["--count=2", "--timeout=abc"]);
        let resolved = cli.resolve_with(Some(path)).expect("resolve");
        assert_eq!(resolved.config.probe.host, "10.0.0.1");
        assert_eq!(resolved.config.probe.count, 2);
        assert_eq!(resolved.config.probe.timeout_secs, 7);
        assert_eq!(resolved.warnings.len(), 1);
    }

    #[test]
    fn invalid_config_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("pingstat.toml");
        fs::write(&path, "[probe]\ntimeout_secs = 90\n").expect("write config");

        let resolved = cli(&[]).resolve_with(Some(path)).expect("resolve");
        assert_eq!(resolved.config, PingstatConfig::default());
        assert_eq!(resolved.warnings.len(), 1);
    }

    #[test]
    fn unreadable_config_file_is_fatal() {
        let dir = tempfile::tempdir().expect("temp dir");
        let result = cli(&[]).resolve_with(Some(dir.path().join("absent.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn no_mode_means_empty_plan() {
        assert!(cli(&["--host=example.org"]).plan().is_empty());
    }
}
