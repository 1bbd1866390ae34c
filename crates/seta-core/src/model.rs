//! Wire payloads for the three data endpoints.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One `[platform, buildtype, jobname]` triple from the job catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(String, String, String)", into = "(String, String, String)")]
pub struct JobRecord {
    pub platform: String,
    pub build_type: String,
    pub job_name: String,
}

impl JobRecord {
    pub fn new(platform: &str, build_type: &str, job_name: &str) -> Self {
        Self {
            platform: platform.to_string(),
            build_type: build_type.to_string(),
            job_name: job_name.to_string(),
        }
    }
}

impl From<(String, String, String)> for JobRecord {
    fn from((platform, build_type, job_name): (String, String, String)) -> Self {
        Self {
            platform,
            build_type,
            job_name,
        }
    }
}

impl From<JobRecord> for (String, String, String) {
    fn from(record: JobRecord) -> Self {
        (record.platform, record.build_type, record.job_name)
    }
}

/// `/data/jobtypes/`: every job type active on the tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobCatalog {
    #[serde(default)]
    pub jobtypes: Vec<JobRecord>,
}

/// `/data/setadetails/?date=`: optional jobs keyed by `YYYY-MM-DD`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionalJobs {
    #[serde(default)]
    pub jobtypes: BTreeMap<String, Vec<JobRecord>>,
}

impl OptionalJobs {
    /// Entry for `date`, if the service reported one.
    pub fn for_date(&self, date: &str) -> Option<&[JobRecord]> {
        self.jobtypes.get(date).map(Vec::as_slice)
    }
}

/// `/data/setasummary/`: optional-job signature per timestamp.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistorySummary {
    #[serde(default)]
    pub dates: BTreeMap<String, serde_json::Value>,
}
