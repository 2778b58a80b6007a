//! HTML report rendering: per-day charts, the overview, and the frameset
//! navigation.

pub mod pages;
pub mod template;

use std::{fs, path::PathBuf};

use pingstat_stats::{DaySeries, Overview};
use pingstat_types::{config::ReportConfig, PingstatError, Result};
use tracing::debug;

pub const OVERVIEW_PAGE: &str = "overview.html";
pub const MENU_PAGE: &str = "menu.html";
pub const INDEX_PAGE: &str = "index.html";

/// Writes rendered pages into the report directory.
pub struct ReportWriter {
    dir: PathBuf,
    hostname: String,
}

impl ReportWriter {
    pub fn new(config: &ReportConfig) -> Self {
        Self::with_hostname(&config.report_dir, config.resolved_hostname())
    }

    pub fn with_hostname(dir: impl Into<PathBuf>, hostname: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            hostname: hostname.into(),
        }
    }

    pub fn write_day(&self, day: &DaySeries) -> Result<PathBuf> {
        let html = pages::day_page(day, &self.hostname)?;
        self.write_page(&format!("{}.html", day.summary.key), &html)
    }

    pub fn write_overview(&self, overview: &Overview) -> Result<PathBuf> {
        let html = pages::overview_page(overview, &self.hostname)?;
        self.write_page(OVERVIEW_PAGE, &html)
    }

    pub fn write_menu(&self, overview: &Overview) -> Result<PathBuf> {
        let html = pages::menu_page(overview)?;
        self.write_page(MENU_PAGE, &html)
    }

    pub fn write_index(&self) -> Result<PathBuf> {
        let html = pages::index_page()?;
        self.write_page(INDEX_PAGE, &html)
    }

    fn write_page(&self, file_name: &str, html: &str) -> Result<PathBuf> {
        let path = self.dir.join(file_name);
        fs::write(&path, html).map_err(|err| {
            PingstatError::Persistence(format!("can't write file {}: {err}", path.display()))
        })?;
        debug!("Wrote {}", path.display());
        Ok(path)
    }
}

pub fn report_error(message: impl Into<String>) -> PingstatError {
    PingstatError::Report(message.into())
}
