//! Per-platform job lists.

use std::collections::BTreeMap;

use crate::model::JobRecord;
use crate::platform::PlatformKey;

/// Raw job names grouped by platform key.
///
/// Names keep their first-seen order and duplicates are preserved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobIndex {
    jobs: BTreeMap<PlatformKey, Vec<String>>,
}

impl JobIndex {
    pub fn build(records: &[JobRecord]) -> Self {
        let mut jobs: BTreeMap<PlatformKey, Vec<String>> = BTreeMap::new();
        for record in records {
            jobs.entry(PlatformKey::new(&record.platform, &record.build_type))
                .or_default()
                .push(record.job_name.clone());
        }
        Self { jobs }
    }

    /// Job names recorded for `key`; empty when the key never appeared.
    pub fn jobs(&self, key: &PlatformKey) -> &[String] {
        self.jobs.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn keys(&self) -> impl Iterator<Item = &PlatformKey> {
        self.jobs.keys()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Number of job names across all keys.
    pub fn job_count(&self) -> usize {
        self.jobs.values().map(Vec::len).sum()
    }
}
