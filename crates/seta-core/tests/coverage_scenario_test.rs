#![allow(clippy::expect_used, clippy::unwrap_used)]

use seta_core::render::{render_row, summary_lines};
use seta_core::{
    active_platform_keys, compute_annotated_dates, coverage_for_day, DayCoverage, DisplayMode,
    HistorySummary, JobCatalog, NameClassifier, OptionalJobs, TextStyle,
};

const CATALOG: &str = r#"{
  "jobtypes": [
    ["linux64", "opt", "mochitest-browser-chrome-1"],
    ["linux64", "opt", "mochitest-browser-chrome-2"],
    ["linux64", "opt", "reftest-1"],
    ["osx10.6", "debug", "xpcshell"],
    ["osx10.6", "debug", "mochitest-e10s-1"],
    ["win7", "opt", "web-platform-tests-1"],
    ["win7", "opt", "reftest-e10s"],
    ["winxp", "debug", "jittest-1"]
  ]
}"#;

const OPTIONAL: &str = r#"{
  "jobtypes": {
    "2015-01-03": [
      ["linux64", "opt", "mochitest-browser-chrome-2"],
      ["win7", "opt", "reftest-e10s"]
    ]
  }
}"#;

const SUMMARY: &str = r#"{
  "dates": {
    "2015-01-01 00:00:00": 5,
    "2015-01-02 00:00:00": 5,
    "2015-01-03 00:00:00": 7
  }
}"#;

fn rendered(report: &seta_core::CoverageReport, key: &str, mode: DisplayMode) -> String {
    let row = report
        .rows
        .iter()
        .find(|row| row.platform_key.as_str() == key)
        .expect("row present");
    render_row(row, mode, TextStyle::Plain)
}

#[test]
fn day_view_from_wire_payloads() {
    let catalog: JobCatalog = serde_json::from_str(CATALOG).unwrap();
    let optional: OptionalJobs = serde_json::from_str(OPTIONAL).unwrap();
    let summary: HistorySummary = serde_json::from_str(SUMMARY).unwrap();

    let annotated = compute_annotated_dates(&summary.dates).unwrap();
    let latest = annotated.latest.expect("history has a latest date");
    let date = latest.format("%Y-%m-%d").to_string();
    assert_eq!(date, "2015-01-03");
    assert_eq!(annotated.dates.len(), 1);

    let classifier = NameClassifier::standard().unwrap();
    let day = coverage_for_day(
        &classifier,
        &date,
        &catalog.jobtypes,
        optional.for_date(&date),
        &active_platform_keys(),
    );
    let DayCoverage::Report(report) = day else {
        panic!("expected a report for {date}");
    };

    assert_eq!(
        rendered(&report, "linux64 opt", DisplayMode::HideOptional),
        "M-bc(1 ~2~) R-R(1)"
    );
    assert_eq!(
        rendered(&report, "osx-10-6 debug", DisplayMode::ShowAll),
        "X M-e10s(1)"
    );
    assert_eq!(
        rendered(&report, "windows7-32 opt", DisplayMode::HideOptional),
        "R-e10s-R(~~) W(1)"
    );
    assert_eq!(rendered(&report, "windowsxp debug", DisplayMode::ShowAll), "Jit1");
    assert_eq!(rendered(&report, "linux32 opt", DisplayMode::ShowAll), "");

    assert_eq!(report.total_job_count, 8);
    assert_eq!(report.optional_job_count, 2);
    assert_eq!(
        summary_lines(&report),
        [
            "Jobs to ignore: 2".to_string(),
            "Jobs to run: 6".to_string(),
            "Total number of jobs: 8".to_string(),
        ]
    );
    assert!(!report.has_errors());
}

#[test]
fn day_without_optional_data_is_not_an_error() {
    let catalog: JobCatalog = serde_json::from_str(CATALOG).unwrap();
    let optional: OptionalJobs = serde_json::from_str(OPTIONAL).unwrap();
    let classifier = NameClassifier::standard().unwrap();

    let day = coverage_for_day(
        &classifier,
        "2015-01-04",
        &catalog.jobtypes,
        optional.for_date("2015-01-04"),
        &active_platform_keys(),
    );
    assert_eq!(
        day,
        DayCoverage::NoData {
            date: "2015-01-04".to_string()
        }
    );
}

#[test]
fn unknown_job_surfaces_without_losing_counts() {
    let catalog: JobCatalog = serde_json::from_str(
        r#"{"jobtypes": [["linux64", "opt", "unknowntest-1"], ["linux64", "opt", "reftest-1"]]}"#,
    )
    .unwrap();
    let optional: OptionalJobs = serde_json::from_str(
        r#"{"jobtypes": {"2015-01-03": [["linux64", "opt", "reftest-1"]]}}"#,
    )
    .unwrap();
    let classifier = NameClassifier::standard().unwrap();

    let DayCoverage::Report(report) = coverage_for_day(
        &classifier,
        "2015-01-03",
        &catalog.jobtypes,
        optional.for_date("2015-01-03"),
        &active_platform_keys(),
    ) else {
        panic!("expected report");
    };
    let errors: Vec<_> = report.errors().collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].raw_name, "unknowntest-1");
    assert_eq!(report.total_job_count, 2);
    assert_eq!(rendered(&report, "linux64 opt", DisplayMode::ShowAll), "");
}
