//! `seta classify`: group and short code of job names.

use std::io::Write;

use seta_core::NameClassifier;
use tabwriter::TabWriter;

use crate::CommandOutput;

fn classify_help() -> String {
    concat!(
        "Usage: seta classify <job-name>...\n",
        "\n",
        "Print the group and short code each job name is shown under\n",
    )
    .to_string()
}

pub fn run_classify(args: &[String]) -> CommandOutput {
    if args.iter().any(|a| a == "--help" || a == "-h") {
        return CommandOutput::ok(classify_help());
    }
    if args.is_empty() {
        return CommandOutput::failure(2, "requires at least 1 job name");
    }

    let classifier = match NameClassifier::standard() {
        Ok(classifier) => classifier,
        Err(err) => return CommandOutput::failure(1, &err.to_string()),
    };

    let mut tw = TabWriter::new(Vec::new()).padding(2);
    let mut stderr = String::new();
    for name in args {
        match classifier.classify(name) {
            Ok(class) => {
                let code = if class.short_code.is_empty() {
                    "-"
                } else {
                    class.short_code.as_str()
                };
                if let Err(err) = writeln!(tw, "{name}\t{}\t{code}", class.group) {
                    return CommandOutput::failure(1, &format!("render: {err}"));
                }
            }
            Err(err) => stderr.push_str(&format!("{err}\n")),
        }
    }

    let stdout = match tw.into_inner() {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(err) => return CommandOutput::failure(1, &format!("render: {err}")),
    };
    let exit_code = if stderr.is_empty() { 0 } else { 1 };
    CommandOutput {
        stdout,
        stderr,
        exit_code,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn run(args: &[&str]) -> CommandOutput {
        let owned: Vec<String> = args.iter().map(|a| (*a).to_string()).collect();
        run_classify(&owned)
    }

    #[test]
    fn prints_group_and_code_columns() {
        let out = run(&["mochitest-e10s-browser-chrome-3", "xpcshell"]);
        assert_eq!(out.exit_code, 0);
        let lines: Vec<Vec<&str>> = out
            .stdout
            .lines()
            .map(|l| l.split_whitespace().collect())
            .collect();
        assert_eq!(lines[0], vec!["mochitest-e10s-browser-chrome-3", "Me10s-bc", "3"]);
        assert_eq!(lines[1], vec!["xpcshell", "O-X", "-"]);
    }

    #[test]
    fn unknown_name_goes_to_stderr() {
        let out = run(&["reftest-2", "gaia-ui-test-1"]);
        assert_eq!(out.exit_code, 1);
        assert!(out.stdout.contains("R-R"));
        assert!(out
            .stderr
            .contains("couldn't find matching group: gaia, with code: ui"));
    }

    #[test]
    fn no_names_is_usage_error() {
        assert_eq!(run(&[]).exit_code, 2);
    }
}
