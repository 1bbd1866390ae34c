#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::collections::BTreeMap;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Mutex;

use seta_core::{HistorySummary, JobCatalog, JobRecord, OptionalJobs};

use crate::backend::SetaBackend;
use crate::error::SetaError;

/// In-memory backend with one recorded day, 2015-01-03.
#[derive(Debug, Clone, Default)]
pub struct MockSetaBackend {
    pub catalog: Vec<JobRecord>,
    pub optional: BTreeMap<String, Vec<JobRecord>>,
    pub summary: BTreeMap<String, serde_json::Value>,
    pub fail_catalog: bool,
    pub fail_optional: bool,
}

impl MockSetaBackend {
    pub fn standard() -> Self {
        let mut backend = Self::default();
        backend.add_active("linux64", "opt", "mochitest-browser-chrome-1");
        backend.add_active("linux64", "opt", "mochitest-browser-chrome-2");
        backend.add_active("linux64", "opt", "reftest-1");
        backend.optional.insert(
            "2015-01-03".to_string(),
            vec![JobRecord::new("linux64", "opt", "mochitest-browser-chrome-2")],
        );
        for (stamp, signature) in [
            ("2015-01-01 00:00:00", 5),
            ("2015-01-02 00:00:00", 5),
            ("2015-01-03 00:00:00", 7),
        ] {
            backend
                .summary
                .insert(stamp.to_string(), serde_json::json!(signature));
        }
        backend
    }

    pub fn add_active(&mut self, platform: &str, build_type: &str, job_name: &str) {
        self.catalog
            .push(JobRecord::new(platform, build_type, job_name));
    }

    /// Wrap this backend so catalog fetches block until `release` fires.
    pub fn gated(&self, release: Receiver<()>) -> GatedBackend {
        let (entered_tx, entered_rx) = channel();
        GatedBackend {
            inner: self.clone(),
            release: Mutex::new(release),
            entered_tx: Mutex::new(entered_tx),
            entered_rx: Mutex::new(entered_rx),
        }
    }
}

impl SetaBackend for MockSetaBackend {
    fn job_catalog(&self, _date: &str) -> Result<JobCatalog, SetaError> {
        if self.fail_catalog {
            return Err(SetaError::fetch("/data/jobtypes/", "connection refused"));
        }
        Ok(JobCatalog {
            jobtypes: self.catalog.clone(),
        })
    }

    fn optional_jobs(&self, date: &str) -> Result<OptionalJobs, SetaError> {
        if self.fail_optional {
            return Err(SetaError::fetch("/data/setadetails/", "connection refused"));
        }
        let mut jobtypes = BTreeMap::new();
        if let Some(records) = self.optional.get(date) {
            jobtypes.insert(date.to_string(), records.clone());
        }
        Ok(OptionalJobs { jobtypes })
    }

    fn history_summary(&self) -> Result<HistorySummary, SetaError> {
        Ok(HistorySummary {
            dates: self.summary.clone(),
        })
    }
}

pub struct GatedBackend {
    inner: MockSetaBackend,
    release: Mutex<Receiver<()>>,
    entered_tx: Mutex<Sender<()>>,
    entered_rx: Mutex<Receiver<()>>,
}

impl GatedBackend {
    /// Block until a catalog fetch is in progress.
    pub fn wait_until_entered(&self) {
        self.entered_rx.lock().unwrap().recv().unwrap();
    }
}

impl SetaBackend for GatedBackend {
    fn job_catalog(&self, date: &str) -> Result<JobCatalog, SetaError> {
        self.entered_tx.lock().unwrap().send(()).unwrap();
        self.release.lock().unwrap().recv().unwrap();
        self.inner.job_catalog(date)
    }

    fn optional_jobs(&self, date: &str) -> Result<OptionalJobs, SetaError> {
        self.inner.optional_jobs(date)
    }

    fn history_summary(&self) -> Result<HistorySummary, SetaError> {
        self.inner.history_summary()
    }
}
