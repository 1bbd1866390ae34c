//! `seta show`: coverage table for one day.

use std::io::Write;

use chrono::NaiveDate;
use seta_core::dates::{check_selectable, compute_annotated_dates, parse_selected_date, DATE_FORMAT};
use seta_core::render::{
    no_data_message, render_header, render_row, report_view, summary_lines,
};
use seta_core::{
    active_platform_keys, coverage_for_day, CoverageReport, DayCoverage, DisplayMode,
    JobCatalog, NameClassifier, OptionalJobs, PlatformKey, SelectionTracker, TextStyle,
};
use tabwriter::TabWriter;

use crate::backend::SetaBackend;
use crate::error::SetaError;
use crate::{CommandOutput, RunContext};

/// Loads and aggregates days; a load that finishes after a newer one was
/// started is discarded.
pub struct DayLoader {
    classifier: NameClassifier,
    platforms: Vec<PlatformKey>,
    tracker: SelectionTracker,
}

impl DayLoader {
    pub fn new() -> Result<Self, SetaError> {
        Ok(Self {
            classifier: NameClassifier::standard()?,
            platforms: active_platform_keys(),
            tracker: SelectionTracker::new(),
        })
    }

    /// Fetch and aggregate `date`. Returns `Ok(None)` when another load
    /// was started before this one completed.
    pub fn load(
        &self,
        backend: &dyn SetaBackend,
        date: NaiveDate,
    ) -> Result<Option<DayCoverage>, SetaError> {
        let ticket = self.tracker.begin();
        let date = date.format(DATE_FORMAT).to_string();
        let (catalog, optional) = fetch_day(backend, &date)?;
        let coverage = coverage_for_day(
            &self.classifier,
            &date,
            &catalog.jobtypes,
            optional.for_date(&date),
            &self.platforms,
        );
        Ok(self.tracker.deliver(ticket, coverage))
    }
}

/// Both per-day fetches run concurrently; either failing aborts the day.
fn fetch_day(backend: &dyn SetaBackend, date: &str) -> Result<(JobCatalog, OptionalJobs), SetaError> {
    std::thread::scope(|scope| {
        let optional = scope.spawn(|| backend.optional_jobs(date));
        let catalog = backend.job_catalog(date);
        let optional = optional
            .join()
            .map_err(|_| SetaError::fetch("optional jobs", "fetch thread panicked"))?;
        Ok((catalog?, optional?))
    })
}

#[derive(Debug, Default, PartialEq, Eq)]
struct ShowArgs {
    date: Option<String>,
    display_mode: Option<DisplayMode>,
    json: bool,
    color: Option<bool>,
}

fn show_help() -> String {
    concat!(
        "Usage: seta show [flags]\n",
        "\n",
        "Print the coverage table for a day\n",
        "\n",
        "Flags:\n",
        "  --date string      Day as YYYY-MM-DD or MM/DD/YYYY (default: latest recorded day)\n",
        "  --hide-optional    Strike through optional jobs\n",
        "  --show-all         Show optional jobs like any other job\n",
        "  --json             Output as JSON\n",
        "  --color            Highlight required jobs with ANSI styles\n",
        "  --no-color         Plain text output\n",
    )
    .to_string()
}

fn parse_show_args(args: &[String]) -> Result<ShowArgs, (i32, String)> {
    let mut parsed = ShowArgs::default();
    let mut i = 0;

    while i < args.len() {
        let arg = &args[i];
        match arg.as_str() {
            "--help" | "-h" => return Err((0, show_help())),
            "--date" => {
                i += 1;
                let value = args
                    .get(i)
                    .ok_or_else(|| (2, "flag --date requires a value".to_string()))?;
                parsed.date = Some(value.clone());
            }
            v if v.starts_with("--date=") => {
                parsed.date = Some(v.trim_start_matches("--date=").to_string());
            }
            "--hide-optional" => parsed.display_mode = Some(DisplayMode::HideOptional),
            "--show-all" => parsed.display_mode = Some(DisplayMode::ShowAll),
            "--json" => parsed.json = true,
            "--color" => parsed.color = Some(true),
            "--no-color" => parsed.color = Some(false),
            v if v.starts_with('-') => return Err((2, format!("unknown flag: {v}"))),
            // A bare positional is taken as the date, as in `seta show 2015-01-03`.
            v if parsed.date.is_none() => parsed.date = Some(v.to_string()),
            _ => return Err((2, "expected at most 1 argument".to_string())),
        }
        i += 1;
    }

    Ok(parsed)
}

pub fn run_show(args: &[String], backend: &dyn SetaBackend, ctx: &RunContext) -> CommandOutput {
    match execute_show(args, backend, ctx) {
        Ok(output) => output,
        Err((exit_code, message)) => CommandOutput::failure(exit_code, &message),
    }
}

fn execute_show(
    args: &[String],
    backend: &dyn SetaBackend,
    ctx: &RunContext,
) -> Result<CommandOutput, (i32, String)> {
    let parsed = match parse_show_args(args) {
        Ok(parsed) => parsed,
        Err((0, help)) => return Ok(CommandOutput::ok(help)),
        Err(err) => return Err(err),
    };
    let mode = parsed.display_mode.unwrap_or(ctx.display_mode);
    let style = match parsed.color {
        Some(true) => TextStyle::Ansi,
        Some(false) => TextStyle::Plain,
        None => ctx.style,
    };

    let date = resolve_date(parsed.date.as_deref(), backend, ctx).map_err(|e| (1, e.to_string()))?;
    let loader = DayLoader::new().map_err(|e| (1, e.to_string()))?;
    let coverage = loader
        .load(backend, date)
        .map_err(|e| (1, e.to_string()))?
        .ok_or_else(|| (1, "selection superseded".to_string()))?;

    let report = match coverage {
        DayCoverage::NoData { date } => {
            let stdout = if parsed.json {
                format!("{}\n", serde_json::json!({ "date": date, "no_data": true }))
            } else {
                format!("{}\n", no_data_message(&date))
            };
            return Ok(CommandOutput::ok(stdout));
        }
        DayCoverage::Report(report) => report,
    };

    let stdout = if parsed.json {
        let mut text = serde_json::to_string_pretty(&report_view(&report, mode))
            .map_err(|e| (1, format!("encode json: {e}")))?;
        text.push('\n');
        text
    } else {
        render_table(&report, mode, style).map_err(|e| (1, e))?
    };

    let errors: Vec<String> = report.errors().map(ToString::to_string).collect();
    Ok(CommandOutput {
        stdout,
        stderr: errors.iter().map(|e| format!("{e}\n")).collect(),
        exit_code: if errors.is_empty() { 0 } else { 1 },
    })
}

/// Explicit date, or the latest day in the history summary.
fn resolve_date(
    requested: Option<&str>,
    backend: &dyn SetaBackend,
    ctx: &RunContext,
) -> Result<NaiveDate, SetaError> {
    let date = match requested {
        Some(raw) => parse_selected_date(raw)?,
        None => {
            let summary = backend.history_summary()?;
            compute_annotated_dates(&summary.dates)?
                .latest
                .ok_or_else(|| SetaError::fetch("history summary", "no recorded dates"))?
        }
    };
    Ok(check_selectable(date, ctx.earliest_date)?)
}

fn render_table(
    report: &CoverageReport,
    mode: DisplayMode,
    style: TextStyle,
) -> Result<String, String> {
    let mut tw = TabWriter::new(Vec::new()).padding(2);
    if style == TextStyle::Ansi {
        tw = tw.ansi(true);
    }
    for row in &report.rows {
        let line = match &row.error {
            Some(_) => "(classification error)".to_string(),
            None => render_row(row, mode, style),
        };
        writeln!(tw, "{}\t{}", row.platform_key, line).map_err(|e| format!("render: {e}"))?;
    }
    let table = tw
        .into_inner()
        .map_err(|e| format!("render: {e}"))
        .and_then(|bytes| String::from_utf8(bytes).map_err(|e| format!("render: {e}")))?;

    let mut out = String::new();
    out.push_str(&render_header(&report.date));
    out.push_str("\n\n");
    out.push_str(&table);
    out.push('\n');
    for line in summary_lines(report) {
        out.push_str(&line);
        out.push('\n');
    }
    Ok(out)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::tests_common::MockSetaBackend;

    fn owned(args: &[&str]) -> Vec<String> {
        args.iter().map(|a| (*a).to_string()).collect()
    }

    #[test]
    fn parse_defaults() {
        assert_eq!(parse_show_args(&[]).unwrap(), ShowArgs::default());
    }

    #[test]
    fn parse_flags_and_positional_date() {
        let parsed =
            parse_show_args(&owned(&["01/03/2015", "--hide-optional", "--json"])).unwrap();
        assert_eq!(parsed.date.as_deref(), Some("01/03/2015"));
        assert_eq!(parsed.display_mode, Some(DisplayMode::HideOptional));
        assert!(parsed.json);

        let parsed = parse_show_args(&owned(&["--date=2015-01-03", "--no-color"])).unwrap();
        assert_eq!(parsed.date.as_deref(), Some("2015-01-03"));
        assert_eq!(parsed.color, Some(false));
    }

    #[test]
    fn parse_rejects_unknown_flag_and_extra_args() {
        assert_eq!(parse_show_args(&owned(&["--bogus"])).unwrap_err().0, 2);
        assert_eq!(parse_show_args(&owned(&["a", "b"])).unwrap_err().0, 2);
        assert_eq!(parse_show_args(&owned(&["--date"])).unwrap_err().0, 2);
    }

    #[test]
    fn defaults_to_latest_history_date() {
        let backend = MockSetaBackend::standard();
        let out = run_show(&[], &backend, &RunContext::default());
        assert_eq!(out.exit_code, 0, "stderr: {}", out.stderr);
        assert!(out.stdout.starts_with("2015-01-03 - This is the list of jobs"));
        assert!(out.stdout.contains("M-bc(1 2) R-R(1)"));
        assert!(out.stdout.contains("Jobs to ignore: 1\nJobs to run: 2\nTotal number of jobs: 3\n"));
    }

    #[test]
    fn hide_optional_strikes_codes() {
        let backend = MockSetaBackend::standard();
        let out = run_show(
            &owned(&["--date", "2015-01-03", "--hide-optional"]),
            &backend,
            &RunContext::default(),
        );
        assert!(out.stdout.contains("M-bc(1 ~2~) R-R(1)"));
    }

    #[test]
    fn every_fixed_platform_gets_a_line() {
        let backend = MockSetaBackend::standard();
        let out = run_show(&owned(&["2015-01-03"]), &backend, &RunContext::default());
        for key in seta_core::platform::ACTIVE_PLATFORMS {
            assert!(out.stdout.contains(key), "missing row {key}");
        }
    }

    #[test]
    fn day_without_data_prints_message() {
        let backend = MockSetaBackend::standard();
        let out = run_show(&owned(&["2015-01-02"]), &backend, &RunContext::default());
        assert_eq!(out.exit_code, 0);
        assert_eq!(out.stdout, "Sorry, there is no data for the day 2015-01-02\n");
    }

    #[test]
    fn date_before_earliest_is_rejected() {
        let backend = MockSetaBackend::standard();
        let out = run_show(&owned(&["2014-01-01"]), &backend, &RunContext::default());
        assert_eq!(out.exit_code, 1);
        assert!(out.stderr.contains("before the earliest recorded date"));
    }

    #[test]
    fn fetch_failure_aborts_without_partial_output() {
        let mut backend = MockSetaBackend::standard();
        backend.fail_catalog = true;
        let out = run_show(&owned(&["2015-01-03"]), &backend, &RunContext::default());
        assert_eq!(out.exit_code, 1);
        assert!(out.stdout.is_empty());
        assert!(out.stderr.contains("fetch"));
    }

    #[test]
    fn optional_fetch_failure_aborts_without_partial_output() {
        let mut backend = MockSetaBackend::standard();
        backend.fail_optional = true;
        let out = run_show(&owned(&["2015-01-03"]), &backend, &RunContext::default());
        assert_eq!(out.exit_code, 1);
        assert!(out.stdout.is_empty());
        assert!(out.stderr.contains("fetch /data/setadetails/"));
    }

    #[test]
    fn classification_error_is_reported() {
        let mut backend = MockSetaBackend::standard();
        backend.add_active("linux64", "opt", "unknowntest-1");
        let out = run_show(&owned(&["2015-01-03"]), &backend, &RunContext::default());
        assert_eq!(out.exit_code, 1);
        assert!(out.stdout.contains("(classification error)"));
        assert!(out
            .stderr
            .contains("couldn't find matching group: unknowntest, with code: 1"));
        assert!(out.stdout.contains("Total number of jobs: 4"));
    }

    #[test]
    fn json_output_is_parseable() {
        let backend = MockSetaBackend::standard();
        let out = run_show(&owned(&["2015-01-03", "--json"]), &backend, &RunContext::default());
        let value: serde_json::Value = serde_json::from_str(&out.stdout).unwrap();
        assert_eq!(value["date"], "2015-01-03");
        assert_eq!(value["ignore_count"], 1);
        assert_eq!(value["run_count"], 2);
    }

    #[test]
    fn loader_discards_superseded_load() {
        let backend = MockSetaBackend::standard();
        let loader = DayLoader::new().unwrap();
        let day = NaiveDate::from_ymd_opt(2015, 1, 3).unwrap();
        // Holding the first load open while a second one is started.
        let (release_tx, release_rx) = std::sync::mpsc::channel::<()>();
        let gated = backend.gated(release_rx);
        let results = std::thread::scope(|scope| {
            let first = scope.spawn(|| loader.load(&gated, day));
            gated.wait_until_entered();
            let second = loader.load(&backend, day);
            release_tx.send(()).unwrap();
            (first.join().unwrap(), second)
        });
        assert!(results.0.unwrap().is_none());
        assert!(matches!(results.1.unwrap(), Some(DayCoverage::Report(_))));
    }
}
