//! High-level orchestrator coordinating probing and report generation.

use std::collections::BTreeMap;

use async_trait::async_trait;
use pingstat_ops::{ensure_dir, StatStore};
use pingstat_probe::{Pinger, ProbeReport, Prober};
use pingstat_report::ReportWriter;
use pingstat_stats::{combine, summarize, Overview};
use pingstat_types::{config::PingstatConfig, measurement::DateKey, summary::FileSummary, Result};
use tracing::{error, info, warn};

/// Which modes to run, in order: probing first, then reporting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunPlan {
    pub ping: bool,
    pub report: bool,
}

impl RunPlan {
    pub fn is_empty(&self) -> bool {
        !self.ping && !self.report
    }
}

/// Result of one report generation pass.
#[derive(Debug, Clone, Default)]
pub struct ReportOutcome {
    pub summaries: BTreeMap<DateKey, FileSummary>,
    pub overview: Overview,
    pub pages_written: usize,
    pub failures: usize,
}

#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub probes: Option<ProbeReport>,
    pub report: Option<ReportOutcome>,
}

pub struct Orchestrator<P>
where
    P: Pinger,
{
    config: PingstatConfig,
    pinger: P,
}

impl<P> Orchestrator<P>
where
    P: Pinger,
{
    pub fn new(config: PingstatConfig, pinger: P) -> Self {
        Self { config, pinger }
    }

    pub fn config(&self) -> &PingstatConfig {
        &self.config
    }

    /// Runs the configured number of probes. Only a stat directory that
    /// cannot be created is fatal.
    pub async fn run_probes(&self) -> Result<ProbeReport> {
        let stat_dir = ensure_dir(&self.config.storage.stat_dir)?;
        let prober = Prober::new(&self.config.probe, StatStore::new(stat_dir), &self.pinger);
        Ok(prober.run().await)
    }

    /// Renders every stat file plus the overview, menu and index pages.
    /// Per-file failures are logged and skipped.
    pub fn generate_report(&self) -> Result<ReportOutcome> {
        ensure_dir(&self.config.report.report_dir)?;
        let store = StatStore::new(ensure_dir(&self.config.storage.stat_dir)?);
        let writer = ReportWriter::new(&self.config.report);
        let names = store.list()?;
        info!(
            "Generating reports for {} stat file(s) from {}",
            names.len(),
            store.dir().display()
        );

        let mut outcome = ReportOutcome::default();
        for key in &names {
            let contents = match store.read(key) {
                Ok(contents) => contents,
                Err(err) => {
                    error!("{err}");
                    outcome.failures += 1;
                    continue;
                }
            };
            let day = summarize(key.clone(), &contents);
            match writer.write_day(&day) {
                Ok(_) => outcome.pages_written += 1,
                Err(err) => {
                    error!("{err}");
                    outcome.failures += 1;
                }
            }
            outcome.summaries.insert(key.clone(), day.summary);
        }

        let overview = combine(&outcome.summaries, &names);
        let shared_pages = [
            writer.write_overview(&overview),
            writer.write_menu(&overview),
            writer.write_index(),
        ];
        for written in shared_pages {
            match written {
                Ok(_) => outcome.pages_written += 1,
                Err(err) => {
                    error!("{err}");
                    outcome.failures += 1;
                }
            }
        }
        outcome.overview = overview;

        if outcome.failures > 0 {
            warn!(
                "Report generation finished with {} failure(s)",
                outcome.failures
            );
        } else {
            info!("Wrote {} report page(s)", outcome.pages_written);
        }
        Ok(outcome)
    }
}

#[async_trait]
pub trait Runner {
    async fn run(&self, plan: RunPlan) -> Result<RunSummary>;
}

#[async_trait]
impl<P> Runner for Orchestrator<P>
where
    P: Pinger + Send + Sync,
{
    async fn run(&self, plan: RunPlan) -> Result<RunSummary> {
        let mut summary = RunSummary::default();
        if plan.ping {
            summary.probes = Some(self.run_probes().await?);
        }
        if plan.report {
            summary.report = Some(self.generate_report()?);
        }
        Ok(summary)
    }
}
