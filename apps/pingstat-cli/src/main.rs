mod cli;

use anyhow::Result;
use clap::Parser;
use pingstat_ops::init_tracing;
use pingstat_orchestrator::{Orchestrator, Runner};
use pingstat_probe::SystemPinger;
use pingstat_types::config::PingstatConfig;
use tracing::{info, warn};

use crate::cli::Cli;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let resolved = cli.resolve()?;
    init_tracing(&resolved.config.ops)?;
    for warning in &resolved.warnings {
        warn!("{warning}");
    }

    let plan = cli.plan();
    if plan.is_empty() {
        println!("Nothing to do: pass --ping and/or --report (see --help).");
        return Ok(());
    }

    log_settings(&resolved.config);
    let pinger = SystemPinger::new(&resolved.config.probe);
    let orchestrator = Orchestrator::new(resolved.config, pinger);
    orchestrator.run(plan).await?;
    Ok(())
}

fn log_settings(config: &PingstatConfig) {
    info!("using host {} for ping", config.probe.host);
    info!(
        "timeout {}s, {} ping(s) {}s apart",
        config.probe.timeout_secs, config.probe.count, config.probe.interval_secs
    );
    info!("using stats directory {}", config.storage.stat_dir);
    info!("using report directory {}", config.report.report_dir);
}
