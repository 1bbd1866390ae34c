//! Data sources for the job catalog, optional jobs and history summary.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::de::DeserializeOwned;
use seta_core::{HistorySummary, JobCatalog, OptionalJobs};

use crate::error::SetaError;

pub const JOBTYPES_ENDPOINT: &str = "/data/jobtypes/";
pub const SETADETAILS_ENDPOINT: &str = "/data/setadetails/";
pub const SETASUMMARY_ENDPOINT: &str = "/data/setasummary/";

/// Read-only access to the three endpoints. Implementations are shared
/// across the concurrent per-day fetches, hence `Sync`.
pub trait SetaBackend: Sync {
    /// Every job type active on `date`.
    fn job_catalog(&self, date: &str) -> Result<JobCatalog, SetaError>;
    /// Jobs marked optional, keyed by day; only `date` is of interest.
    fn optional_jobs(&self, date: &str) -> Result<OptionalJobs, SetaError>;
    /// Optional-job signature per recorded timestamp.
    fn history_summary(&self) -> Result<HistorySummary, SetaError>;
}

/// JSON service reached over HTTP.
pub struct HttpSetaBackend {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl HttpSetaBackend {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, SetaError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .gzip(true)
            .build()
            .map_err(|err| SetaError::fetch(base_url, err))?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
    ) -> Result<T, SetaError> {
        let url = format!("{}{endpoint}", self.base_url);
        tracing::debug!(%url, ?query, "fetching");
        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .map_err(|err| SetaError::fetch(endpoint, err))?;
        let status = response.status();
        if !status.is_success() {
            return Err(SetaError::fetch(endpoint, format!("status {status}")));
        }
        let body = response
            .text()
            .map_err(|err| SetaError::fetch(endpoint, err))?;
        serde_json::from_str(&body).map_err(|err| SetaError::decode(endpoint, err))
    }
}

impl SetaBackend for HttpSetaBackend {
    fn job_catalog(&self, _date: &str) -> Result<JobCatalog, SetaError> {
        self.get_json(JOBTYPES_ENDPOINT, &[])
    }

    fn optional_jobs(&self, date: &str) -> Result<OptionalJobs, SetaError> {
        self.get_json(SETADETAILS_ENDPOINT, &[("date", date)])
    }

    fn history_summary(&self) -> Result<HistorySummary, SetaError> {
        self.get_json(SETASUMMARY_ENDPOINT, &[])
    }
}

/// Snapshots of the endpoints stored as files:
///
/// ```text
/// <data_dir>/jobtypes.json
/// <data_dir>/setasummary.json
/// <data_dir>/setadetails/<YYYY-MM-DD>.json
/// ```
pub struct FilesystemSetaBackend {
    data_dir: PathBuf,
}

impl FilesystemSetaBackend {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn read_json<T: DeserializeOwned>(&self, path: &Path) -> Result<Option<T>, SetaError> {
        let endpoint = path.display().to_string();
        tracing::debug!(path = %endpoint, "reading snapshot");
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(SetaError::fetch(&endpoint, err)),
        };
        serde_json::from_str(&text)
            .map(Some)
            .map_err(|err| SetaError::decode(&endpoint, err))
    }

    fn require_json<T: DeserializeOwned>(&self, path: &Path) -> Result<T, SetaError> {
        self.read_json(path)?
            .ok_or_else(|| SetaError::fetch(&path.display().to_string(), "file not found"))
    }
}

impl SetaBackend for FilesystemSetaBackend {
    fn job_catalog(&self, _date: &str) -> Result<JobCatalog, SetaError> {
        self.require_json(&self.data_dir.join("jobtypes.json"))
    }

    /// A missing day file means the service has nothing for that day.
    fn optional_jobs(&self, date: &str) -> Result<OptionalJobs, SetaError> {
        let path = self
            .data_dir
            .join("setadetails")
            .join(format!("{date}.json"));
        Ok(self.read_json(&path)?.unwrap_or_default())
    }

    fn history_summary(&self) -> Result<HistorySummary, SetaError> {
        self.require_json(&self.data_dir.join("setasummary.json"))
    }
}
