use serde::Serialize;

/// A job name that does not belong to any known test group.
///
/// Treated as a defect in the upstream catalog: the row it appears in
/// stops being processed and the error is handed back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("couldn't find matching group: {group}, with code: {code} (job {raw_name:?})")]
pub struct ClassificationError {
    pub raw_name: String,
    pub group: String,
    pub code: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ClassifierError {
    #[error("compile rule {pattern:?}: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("rule {pattern:?} maps to unknown group {group:?}")]
    UnknownGroup { pattern: String, group: String },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HistoryError {
    #[error("invalid history timestamp: {0:?}")]
    Timestamp(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DateError {
    #[error("invalid date {0:?}: expected YYYY-MM-DD or MM/DD/YYYY")]
    Format(String),
    #[error("date {date} is before the earliest recorded date {earliest}")]
    TooEarly { date: String, earliest: String },
}
