//! seta-core: classification and aggregation of required versus optional
//! CI jobs.
//!
//! Given the job catalog active on a day and the subset marked optional for
//! that day, this crate builds the per-platform coverage table: job names
//! classified into groups and short codes, annotated with their optional
//! status, plus the run/ignore totals. It also derives the annotated dates
//! shown on the calendar from the history summary.

pub mod classify;
pub mod coverage;
pub mod dates;
pub mod error;
pub mod job_index;
pub mod model;
pub mod platform;
pub mod render;
pub mod selection;

pub use classify::{JobClass, NameClassifier, TopGroup};
pub use coverage::{aggregate, coverage_for_day, CoverageReport, CoverageRow, DayCoverage};
pub use dates::{compute_annotated_dates, AnnotatedDates};
pub use error::{ClassificationError, ClassifierError, DateError, HistoryError};
pub use job_index::JobIndex;
pub use model::{HistorySummary, JobCatalog, JobRecord, OptionalJobs};
pub use platform::{active_platform_keys, normalize_platform, PlatformKey};
pub use render::{DisplayMode, TextStyle};
pub use selection::{SelectionTicket, SelectionTracker};

/// Crate identity label used by smoke tests.
pub fn crate_label() -> &'static str {
    "seta-core"
}
