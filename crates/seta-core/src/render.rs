//! Text and JSON views of a coverage report.
//!
//! Rendering only reads the report, so switching [`DisplayMode`] never
//! requires fetching or aggregating again.

use serde::Serialize;

use crate::coverage::{ClassifiedJob, CoverageReport, CoverageRow, GroupBucket};

pub const COVERAGE_DESCRIPTION: &str = "This is the list of jobs that would be required to run in order to catch every regression in the last 6 months";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayMode {
    /// Optional jobs look like any other job; required jobs stand out.
    #[default]
    ShowAll,
    /// Optional jobs stay listed but are struck through.
    HideOptional,
}

impl DisplayMode {
    pub fn toggled(self) -> Self {
        match self {
            DisplayMode::ShowAll => DisplayMode::HideOptional,
            DisplayMode::HideOptional => DisplayMode::ShowAll,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextStyle {
    /// Struck codes are written as `~code~`.
    #[default]
    Plain,
    /// Bold for required codes, dim strikethrough for hidden optional ones.
    Ansi,
}

const ANSI_BOLD: &str = "\x1b[1m";
const ANSI_STRUCK: &str = "\x1b[2;9m";
const ANSI_RESET: &str = "\x1b[0m";

fn render_code(code: &str, job: &ClassifiedJob, mode: DisplayMode, style: TextStyle) -> String {
    match (style, job.is_optional, mode) {
        (TextStyle::Plain, true, DisplayMode::HideOptional) => format!("~{code}~"),
        (TextStyle::Plain, _, _) => code.to_string(),
        (TextStyle::Ansi, false, _) => format!("{ANSI_BOLD}{code}{ANSI_RESET}"),
        (TextStyle::Ansi, true, DisplayMode::HideOptional) => {
            format!("{ANSI_STRUCK}{code}{ANSI_RESET}")
        }
        (TextStyle::Ansi, true, DisplayMode::ShowAll) => code.to_string(),
    }
}

/// `LABEL(c1 c2) ` for labelled buckets, `c1 c2 ` for `O` buckets.
pub fn render_bucket(bucket: &GroupBucket, mode: DisplayMode, style: TextStyle) -> String {
    let codes: Vec<String> = bucket
        .jobs
        .iter()
        .map(|job| render_code(&bucket.display_code(job), job, mode, style))
        .collect();
    if codes.is_empty() {
        return String::new();
    }
    if bucket.is_unwrapped() {
        format!("{} ", codes.join(" "))
    } else {
        format!("{}({}) ", bucket.label(), codes.join(" "))
    }
}

/// All buckets of a row on one line.
pub fn render_row(row: &CoverageRow, mode: DisplayMode, style: TextStyle) -> String {
    let line: String = row
        .buckets
        .iter()
        .map(|bucket| render_bucket(bucket, mode, style))
        .collect();
    line.trim_end().to_string()
}

pub fn render_header(date: &str) -> String {
    format!("{date} - {COVERAGE_DESCRIPTION}")
}

pub fn no_data_message(date: &str) -> String {
    format!("Sorry, there is no data for the day {date}")
}

/// `Jobs to ignore`, `Jobs to run` and `Total number of jobs` lines.
pub fn summary_lines(report: &CoverageReport) -> [String; 3] {
    [
        format!("Jobs to ignore: {}", report.ignore_count()),
        format!("Jobs to run: {}", report.run_count()),
        format!("Total number of jobs: {}", report.total_job_count),
    ]
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportView<'a> {
    pub date: &'a str,
    pub display_mode: DisplayMode,
    pub rows: Vec<RowView<'a>>,
    pub ignore_count: usize,
    pub run_count: i64,
    pub total_job_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct RowView<'a> {
    pub platform: &'a str,
    pub rendered: String,
    #[serde(flatten)]
    pub row: &'a CoverageRow,
}

/// Serializable view with each row's rendered line next to its data.
pub fn report_view(report: &CoverageReport, mode: DisplayMode) -> ReportView<'_> {
    ReportView {
        date: &report.date,
        display_mode: mode,
        rows: report
            .rows
            .iter()
            .map(|row| RowView {
                platform: row.platform_key.as_str(),
                rendered: render_row(row, mode, TextStyle::Plain),
                row,
            })
            .collect(),
        ignore_count: report.ignore_count(),
        run_count: report.run_count(),
        total_job_count: report.total_job_count,
    }
}
