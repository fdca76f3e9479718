//! JSON configuration and report files.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use log::LevelFilter;
use serde::{Deserialize, Serialize};

use crate::{PageOutcome, RecoveryIoError, TimeSigParams, TimeSignatureRetriever};

/// Settings of a recovery run.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecoveryConfig {
    pub time_signature: TimeSigParams,
    /// `error`, `warn`, `info`, `debug` or `trace`. Unset leaves the
    /// environment in charge.
    pub log_level: Option<String>,
}

impl RecoveryConfig {
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, RecoveryIoError> {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), RecoveryIoError> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        Ok(())
    }

    pub fn build_retriever(&self) -> TimeSignatureRetriever {
        TimeSignatureRetriever::new(self.time_signature.clone())
    }

    /// Parsed `log_level`; unknown names are ignored.
    pub fn log_level_filter(&self) -> Option<LevelFilter> {
        self.log_level.as_deref().and_then(|s| s.parse().ok())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PageReport {
    pub page: u32,
    pub outcome: PageOutcome,
}

/// Outcomes of a run, one entry per page.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RecoveryReport {
    pub pages: Vec<PageReport>,
}

impl RecoveryReport {
    pub fn push(&mut self, page: u32, outcome: PageOutcome) {
        self.pages.push(PageReport { page, outcome });
    }

    pub fn recovered_count(&self) -> usize {
        self.pages.iter().map(|p| p.outcome.recovered_count()).sum()
    }

    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, RecoveryIoError> {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), RecoveryIoError> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        Ok(())
    }
}
