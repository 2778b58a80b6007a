use std::{
    fs,
    ops::RangeInclusive,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{PingstatError, Result};

pub const DEFAULT_HOST: &str = "example.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 3;
pub const TIMEOUT_RANGE_SECS: RangeInclusive<u64> = 1..=30;
pub const DEFAULT_COUNT: u32 = 1;
pub const DEFAULT_INTERVAL_SECS: u64 = 1;
pub const DEFAULT_PING_PATH: &str = "ping";
pub const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    pub host: String,
    pub timeout_secs: u64,
    pub count: u32,
    pub interval_secs: u64,
    pub ping_path: Option<String>,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            count: DEFAULT_COUNT,
            interval_secs: DEFAULT_INTERVAL_SECS,
            ping_path: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding one stat file per day.
    pub stat_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            stat_dir: base_dir().join("stats").to_string_lossy().into_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub report_dir: String,
    /// Name shown in chart titles; the machine hostname when unset.
    pub hostname: Option<String>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            report_dir: base_dir().join("reports").to_string_lossy().into_owned(),
            hostname: None,
        }
    }
}

impl ReportConfig {
    pub fn resolved_hostname(&self) -> String {
        self.hostname
            .clone()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(system_hostname)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpsConfig {
    pub log_level: String,
}

impl Default for OpsConfig {
    fn default() -> Self {
        Self {
            log_level: DEFAULT_LOG_LEVEL.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PingstatConfig {
    pub probe: ProbeConfig,
    pub storage: StorageConfig,
    pub report: ReportConfig,
    pub ops: OpsConfig,
}

impl PingstatConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref).map_err(|err| {
            PingstatError::Configuration(format!(
                "unable to read config file {}: {err}",
                path_ref.display()
            ))
        })?;
        toml::from_str(&contents).map_err(|err| {
            PingstatError::Configuration(format!(
                "failed to parse config file {}: {err}",
                path_ref.display()
            ))
        })
    }

    pub fn validate(&self) -> Result<()> {
        if self.probe.host.trim().is_empty() {
            return Err(PingstatError::Configuration(
                "probe.host must not be empty".into(),
            ));
        }
        if !TIMEOUT_RANGE_SECS.contains(&self.probe.timeout_secs) {
            return Err(PingstatError::Configuration(format!(
                "probe.timeout_secs must be between {} and {}",
                TIMEOUT_RANGE_SECS.start(),
                TIMEOUT_RANGE_SECS.end()
            )));
        }
        if self.probe.count == 0 {
            return Err(PingstatError::Configuration(
                "probe.count must be greater than zero".into(),
            ));
        }
        if self.probe.interval_secs == 0 {
            return Err(PingstatError::Configuration(
                "probe.interval_secs must be greater than zero".into(),
            ));
        }
        if self.storage.stat_dir.trim().is_empty() {
            return Err(PingstatError::Configuration(
                "storage.stat_dir must not be empty".into(),
            ));
        }
        if self.report.report_dir.trim().is_empty() {
            return Err(PingstatError::Configuration(
                "report.report_dir must not be empty".into(),
            ));
        }
        Ok(())
    }
}

/// Directory of the running executable, or the working directory when it
/// cannot be determined.
fn base_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Machine hostname, or `localhost` when it cannot be determined.
pub fn system_hostname() -> String {
    hostname::get()
        .ok()
        .map(|name| name.to_string_lossy().trim().to_string())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "localhost".into())
}
