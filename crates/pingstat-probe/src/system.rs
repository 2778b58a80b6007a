use std::path::PathBuf;

use async_trait::async_trait;
use pingstat_types::{
    config::{ProbeConfig, DEFAULT_PING_PATH},
    Result,
};
use tokio::{process::Command, time::Duration};

use crate::{probe_error, PingOutput, Pinger};

/// Extra wall-clock allowance on top of the ping's own wait.
const GUARD_SLACK: Duration = Duration::from_secs(2);

/// Runs the platform `ping` utility for a single echo request.
pub struct SystemPinger {
    ping_path: PathBuf,
}

impl SystemPinger {
    pub fn new(config: &ProbeConfig) -> Self {
        let ping_path = config
            .ping_path
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PING_PATH));
        Self { ping_path }
    }

    fn args(host: &str, timeout: Duration) -> Vec<String> {
        vec![
            "-c".into(),
            "1".into(),
            "-W".into(),
            timeout.as_secs().max(1).to_string(),
            host.into(),
        ]
    }
}

#[async_trait]
impl Pinger for SystemPinger {
    async fn ping(&self, host: &str, timeout: Duration) -> Result<PingOutput> {
        let args = Self::args(host, timeout);
        let mut command = Command::new(&self.ping_path);
        command.args(&args).kill_on_drop(true);

        let output = match tokio::time::timeout(timeout + GUARD_SLACK, command.output()).await {
            Ok(result) => result.map_err(|err| {
                probe_error(format!(
                    "failed to run {}({}): {err}",
                    self.ping_path.display(),
                    args.join(" ")
                ))
            })?,
            Err(_) => {
                tracing::debug!("{} did not exit in time", self.ping_path.display());
                return Ok(PingOutput::no_reply());
            }
        };

        Ok(PingOutput {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        })
    }
}
