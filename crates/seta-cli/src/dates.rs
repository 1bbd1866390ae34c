//! `seta dates`: days where the optional job set changed.

use seta_core::compute_annotated_dates;
use seta_core::dates::DATE_FORMAT;

use crate::backend::SetaBackend;
use crate::CommandOutput;

fn dates_help() -> String {
    concat!(
        "Usage: seta dates [flags]\n",
        "\n",
        "List days whose optional job set differs from the previous record\n",
        "\n",
        "Flags:\n",
        "  --json    Output as JSON\n",
    )
    .to_string()
}

pub fn run_dates(args: &[String], backend: &dyn SetaBackend) -> CommandOutput {
    let mut json = false;
    for arg in args {
        match arg.as_str() {
            "--help" | "-h" => return CommandOutput::ok(dates_help()),
            "--json" => json = true,
            other => return CommandOutput::failure(2, &format!("unknown argument: {other}")),
        }
    }

    let annotated = match backend
        .history_summary()
        .map_err(|e| e.to_string())
        .and_then(|summary| compute_annotated_dates(&summary.dates).map_err(|e| e.to_string()))
    {
        Ok(annotated) => annotated,
        Err(err) => return CommandOutput::failure(1, &err),
    };

    if json {
        return match serde_json::to_string_pretty(&annotated) {
            Ok(text) => CommandOutput::ok(format!("{text}\n")),
            Err(err) => CommandOutput::failure(1, &format!("encode json: {err}")),
        };
    }

    let mut out = String::new();
    for date in &annotated.dates {
        out.push_str(&date.format(DATE_FORMAT).to_string());
        out.push('\n');
    }
    if let Some(latest) = annotated.latest {
        out.push_str(&format!("latest: {}\n", latest.format(DATE_FORMAT)));
    }
    CommandOutput::ok(out)
}
