//! Operational helpers: logging, directory preparation, stat-file storage.

use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};

use pingstat_types::{
    config::OpsConfig,
    measurement::{DateKey, Measurement},
    PingstatError, Result,
};
use tracing::{debug, info};
use tracing_subscriber::{fmt, EnvFilter};

pub fn init_tracing(config: &OpsConfig) -> Result<()> {
    let filter = EnvFilter::try_new(config.log_level.clone())
        .or_else(|_| EnvFilter::try_new("info"))
        .map_err(|err| ops_error(format!("failed to create log filter: {err}")))?;

    fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|err| ops_error(format!("tracing init error: {err}")))?;
    Ok(())
}

/// Creates `path` (and parents) unless it already exists.
pub fn ensure_dir(path: impl AsRef<Path>) -> Result<PathBuf> {
    let dir = path.as_ref().to_path_buf();
    if dir.is_dir() {
        return Ok(dir);
    }
    fs::create_dir_all(&dir)
        .map_err(|err| ops_error(format!("failed to create directory {:?}: {err}", dir)))?;
    info!("Created directory {:?}", dir);
    Ok(dir)
}

/// Append-only store of per-day stat files.
#[derive(Debug, Clone)]
pub struct StatStore {
    dir: PathBuf,
}

impl StatStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &DateKey) -> PathBuf {
        self.dir.join(key.as_str())
    }

    /// Appends one line to the stat file of the measurement's day.
    pub fn append(&self, measurement: &Measurement) -> Result<PathBuf> {
        let path = self.path_for(&measurement.date_key());
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|err| {
                persistence_error(format!("can't open {} for appending: {err}", path.display()))
            })?;
        file.write_all(measurement.log_line().as_bytes())
            .map_err(|err| persistence_error(format!("can't write to {}: {err}", path.display())))?;
        debug!("Appended measurement to {}", path.display());
        Ok(path)
    }

    /// Names of the regular files in the store, ascending.
    pub fn list(&self) -> Result<Vec<DateKey>> {
        let entries = fs::read_dir(&self.dir).map_err(|err| {
            persistence_error(format!("can't list {}: {err}", self.dir.display()))
        })?;

        let mut keys = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|err| {
                persistence_error(format!("can't list {}: {err}", self.dir.display()))
            })?;
            let is_file = entry.file_type().map(|t| t.is_file()).unwrap_or(false);
            if !is_file {
                debug!("Ignoring non-file entry {:?}", entry.path());
                continue;
            }
            match entry.file_name().into_string() {
                Ok(name) => keys.push(DateKey::new(name)),
                Err(name) => debug!("Ignoring non UTF-8 file name {:?}", name),
            }
        }
        keys.sort();
        Ok(keys)
    }

    /// Contents of a stat file. Invalid UTF-8 is replaced so that one
    /// damaged line does not cost the rest of the day.
    pub fn read(&self, key: &DateKey) -> Result<String> {
        let path = self.path_for(key);
        let bytes = fs::read(&path)
            .map_err(|err| persistence_error(format!("can't read {}: {err}", path.display())))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

pub fn ops_error(message: impl Into<String>) -> PingstatError {
    PingstatError::Ops(message.into())
}

pub fn persistence_error(message: impl Into<String>) -> PingstatError {
    PingstatError::Persistence(message.into())
}
