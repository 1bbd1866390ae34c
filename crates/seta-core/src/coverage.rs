//! Reconciles active and optional jobs into the per-platform coverage
//! table.

use std::collections::HashSet;

use serde::Serialize;

use crate::classify::{NameClassifier, TopGroup};
use crate::error::ClassificationError;
use crate::job_index::JobIndex;
use crate::model::JobRecord;
use crate::platform::PlatformKey;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassifiedJob {
    pub raw_name: String,
    pub group: String,
    pub short_code: String,
    pub is_optional: bool,
}

/// Jobs sharing one group tag within a row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupBucket {
    pub top: TopGroup,
    pub group: String,
    pub jobs: Vec<ClassifiedJob>,
}

impl GroupBucket {
    /// Group with its top-level tag replaced by the display label
    /// (`Me10s-bc` becomes `M-e10s-bc`, `WPT` becomes `W`).
    pub fn label(&self) -> String {
        match self.group.split_once('-') {
            Some((_, family)) => format!("{}-{family}", self.top.label()),
            None => self.top.label().to_string(),
        }
    }

    /// `O` buckets are printed without label or parentheses.
    pub fn is_unwrapped(&self) -> bool {
        self.top == TopGroup::Other
    }

    /// Code shown for `job`. Unwrapped buckets have no label to carry the
    /// family, so it is prefixed to the code (`X1`, `Mn`).
    pub fn display_code(&self, job: &ClassifiedJob) -> String {
        if !self.is_unwrapped() {
            return job.short_code.clone();
        }
        let family = job
            .group
            .split_once('-')
            .map(|(_, family)| family)
            .unwrap_or_default();
        format!("{family}{}", job.short_code)
    }

    pub fn optional_count(&self) -> usize {
        self.jobs.iter().filter(|job| job.is_optional).count()
    }
}

/// One platform row.
///
/// `total_job_count` and `optional_job_count` are running totals over the
/// rows up to and including this one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoverageRow {
    pub platform_key: PlatformKey,
    pub buckets: Vec<GroupBucket>,
    pub active_count: usize,
    pub optional_count: usize,
    pub total_job_count: usize,
    pub optional_job_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ClassificationError>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoverageReport {
    pub date: String,
    pub rows: Vec<CoverageRow>,
    pub total_job_count: usize,
    pub optional_job_count: usize,
}

impl CoverageReport {
    /// Jobs that can be skipped.
    pub fn ignore_count(&self) -> usize {
        self.optional_job_count
    }

    /// Jobs that still have to run. Negative when the optional list names
    /// more jobs than the catalog has on the fixed rows.
    pub fn run_count(&self) -> i64 {
        let run = to_signed(self.total_job_count) - to_signed(self.optional_job_count);
        if run < 0 {
            tracing::warn!(
                date = %self.date,
                total = self.total_job_count,
                optional = self.optional_job_count,
                "more optional jobs than active jobs"
            );
        }
        run
    }

    pub fn errors(&self) -> impl Iterator<Item = &ClassificationError> {
        self.rows.iter().filter_map(|row| row.error.as_ref())
    }

    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }
}

/// Coverage for one selected day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DayCoverage {
    /// The service has no optional-job data for the day.
    NoData { date: String },
    Report(CoverageReport),
}

/// Build the coverage table for `platforms`.
///
/// Keys missing from either index count as empty. A job that fails to
/// classify halts its row: the row keeps its counts but carries the error
/// instead of buckets.
pub fn aggregate(
    classifier: &NameClassifier,
    date: &str,
    active: &JobIndex,
    optional: &JobIndex,
    platforms: &[PlatformKey],
) -> CoverageReport {
    let (rows, total_job_count, optional_job_count) = platforms.iter().fold(
        (Vec::with_capacity(platforms.len()), 0, 0),
        |(mut rows, total, optional_total), key| {
            let row = build_row(classifier, key, active, optional, total, optional_total);
            let totals = (row.total_job_count, row.optional_job_count);
            rows.push(row);
            (rows, totals.0, totals.1)
        },
    );

    CoverageReport {
        date: date.to_string(),
        rows,
        total_job_count,
        optional_job_count,
    }
}

/// Index both job lists and aggregate, or report that the day has no
/// optional-job data.
pub fn coverage_for_day(
    classifier: &NameClassifier,
    date: &str,
    catalog: &[JobRecord],
    optional: Option<&[JobRecord]>,
    platforms: &[PlatformKey],
) -> DayCoverage {
    let optional = JobIndex::build(optional.unwrap_or_default());
    if optional.is_empty() {
        tracing::info!(date, "no optional job data");
        return DayCoverage::NoData {
            date: date.to_string(),
        };
    }
    let active = JobIndex::build(catalog);
    DayCoverage::Report(aggregate(classifier, date, &active, &optional, platforms))
}

fn to_signed(count: usize) -> i64 {
    i64::try_from(count).unwrap_or(i64::MAX)
}

fn build_row(
    classifier: &NameClassifier,
    key: &PlatformKey,
    active: &JobIndex,
    optional: &JobIndex,
    total_before: usize,
    optional_before: usize,
) -> CoverageRow {
    let mut active_jobs: Vec<&str> = active.jobs(key).iter().map(String::as_str).collect();
    active_jobs.sort_unstable();
    let optional_jobs = optional.jobs(key);
    let optional_set: HashSet<&str> = optional_jobs.iter().map(String::as_str).collect();

    let (buckets, error) = match classify_row(classifier, &active_jobs, &optional_set) {
        Ok(buckets) => (buckets, None),
        Err(err) => {
            tracing::warn!(platform = %key, job = %err.raw_name, "{err}");
            (Vec::new(), Some(err))
        }
    };

    tracing::debug!(
        platform = %key,
        active = active_jobs.len(),
        optional = optional_jobs.len(),
        buckets = buckets.len(),
        "aggregated row"
    );

    CoverageRow {
        platform_key: key.clone(),
        buckets,
        active_count: active_jobs.len(),
        optional_count: optional_jobs.len(),
        total_job_count: total_before + active_jobs.len(),
        optional_job_count: optional_before + optional_jobs.len(),
        error,
    }
}

fn classify_row(
    classifier: &NameClassifier,
    sorted_jobs: &[&str],
    optional: &HashSet<&str>,
) -> Result<Vec<GroupBucket>, ClassificationError> {
    let mut buckets: Vec<GroupBucket> = Vec::new();
    for raw_name in sorted_jobs {
        let class = classifier.classify(raw_name)?;
        let job = ClassifiedJob {
            raw_name: (*raw_name).to_string(),
            group: class.group.clone(),
            short_code: class.short_code,
            is_optional: optional.contains(raw_name),
        };
        match buckets.iter_mut().find(|bucket| bucket.group == class.group) {
            Some(bucket) => bucket.jobs.push(job),
            None => buckets.push(GroupBucket {
                top: class.top,
                group: class.group,
                jobs: vec![job],
            }),
        }
    }
    // Stable: buckets of one top-level group keep first-appearance order.
    buckets.sort_by_key(|bucket| bucket.top);
    Ok(buckets)
}
