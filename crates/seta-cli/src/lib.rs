//! seta-cli: command-line surface for the SETA coverage view.

use std::sync::OnceLock;

use chrono::NaiveDate;
use seta_core::dates::default_earliest_date;
use seta_core::{DisplayMode, TextStyle};

pub mod backend;
pub mod classify;
pub mod config;
pub mod dates;
pub mod error;
pub mod logging;
pub mod show;

#[cfg(test)]
pub(crate) mod tests_common;

pub use backend::{FilesystemSetaBackend, HttpSetaBackend, SetaBackend};
pub use error::SetaError;

/// Stable crate label used by smoke tests.
pub fn crate_label() -> &'static str {
    "seta-cli"
}

static VERSION: OnceLock<String> = OnceLock::new();

/// Set the version string for `--version` output.
pub fn set_version(version: &str) {
    let _ = VERSION.set(version.to_string());
}

fn get_version() -> &'static str {
    VERSION.get().map(|s| s.as_str()).unwrap_or("dev")
}

fn help_text() -> String {
    "\
seta shows which CI jobs were required and which were optional on a day.

Usage:
  seta [global flags] [command]

Available Commands:
  classify    Show the group and short code of job names
  dates       List days where the optional job set changed
  help        Help about any command
  show        Print the coverage table for a day

Global Flags:
      --base-url string    Service URL (env SETA_BASE_URL)
      --config string      Config file (default $XDG_CONFIG_HOME/seta/config.yaml)
      --data-dir string    Read endpoint snapshots from a directory (env SETA_DATA_DIR)
      --log-format string  console or json
      --log-level string   debug, info, warn or error
  -h, --help               help for seta
  -v, --version            version for seta

Use \"seta [command] --help\" for more information about a command.\n"
        .to_string()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

impl CommandOutput {
    pub(crate) fn ok(stdout: String) -> Self {
        Self {
            stdout,
            stderr: String::new(),
            exit_code: 0,
        }
    }

    pub(crate) fn failure(exit_code: i32, message: &str) -> Self {
        Self {
            stdout: String::new(),
            stderr: format!("{message}\n"),
            exit_code,
        }
    }
}

/// Settings shared by all commands, resolved from config and flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunContext {
    pub earliest_date: NaiveDate,
    pub display_mode: DisplayMode,
    pub style: TextStyle,
}

impl Default for RunContext {
    fn default() -> Self {
        Self {
            earliest_date: default_earliest_date(),
            display_mode: DisplayMode::ShowAll,
            style: TextStyle::Plain,
        }
    }
}

impl RunContext {
    pub fn from_config(cfg: &config::Config) -> Self {
        Self {
            earliest_date: cfg.earliest_date,
            display_mode: if cfg.display.hide_optional {
                DisplayMode::HideOptional
            } else {
                DisplayMode::ShowAll
            },
            style: if cfg.display.color {
                TextStyle::Ansi
            } else {
                TextStyle::Plain
            },
        }
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
struct GlobalArgs {
    config_file: Option<String>,
    base_url: Option<String>,
    data_dir: Option<String>,
    log_level: Option<String>,
    log_format: Option<String>,
}

/// Split global flags from the command and its arguments.
fn parse_global_args(args: &[String]) -> Result<(GlobalArgs, Vec<String>), String> {
    let mut globals = GlobalArgs::default();
    let mut rest = Vec::new();
    let mut i = 0;

    while i < args.len() {
        let arg = args[i].as_str();
        let (name, inline) = match arg.split_once('=') {
            Some((name, value)) if name.starts_with("--") => (name, Some(value.to_string())),
            _ => (arg, None),
        };
        let slot = match name {
            "--config" => &mut globals.config_file,
            "--base-url" => &mut globals.base_url,
            "--data-dir" => &mut globals.data_dir,
            "--log-level" => &mut globals.log_level,
            "--log-format" => &mut globals.log_format,
            _ => {
                rest.push(args[i].clone());
                i += 1;
                continue;
            }
        };
        let value = match inline {
            Some(value) => value,
            None => {
                i += 1;
                args.get(i)
                    .cloned()
                    .ok_or_else(|| format!("flag {name} requires a value"))?
            }
        };
        *slot = Some(value);
        i += 1;
    }

    Ok((globals, rest))
}

/// Run from process arguments; returns the exit code.
pub fn run_from_env() -> i32 {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let out = run_with_args(&args);
    if !out.stdout.is_empty() {
        print!("{}", out.stdout);
    }
    if !out.stderr.is_empty() {
        eprint!("{}", out.stderr);
    }
    out.exit_code
}

/// Resolve config, logging and backend, then dispatch the command.
pub fn run_with_args(args: &[String]) -> CommandOutput {
    let (globals, rest) = match parse_global_args(args) {
        Ok(value) => value,
        Err(err) => return CommandOutput::failure(2, &err),
    };

    match rest.first().map(String::as_str) {
        None | Some("help" | "-h" | "--help") => return CommandOutput::ok(help_text()),
        Some("-v" | "--version") => {
            return CommandOutput::ok(format!("seta version {}\n", get_version()))
        }
        _ => {}
    }

    let (mut cfg, used_path) = match config::load_config(globals.config_file.as_deref()) {
        Ok(value) => value,
        Err(err) => return CommandOutput::failure(1, &format!("Error loading config: {err}")),
    };
    if let Some(url) = globals.base_url {
        cfg.source.base_url = url;
    }
    if let Some(dir) = globals.data_dir {
        cfg.source.data_dir = Some(dir.into());
    }
    if let Some(level) = globals.log_level {
        cfg.logging.level = level;
    }
    if let Some(format) = globals.log_format {
        cfg.logging.format = format;
    }
    if let Err(err) = cfg.validate() {
        return CommandOutput::failure(1, &format!("Error loading config: {err}"));
    }

    let warning = logging::init_logging(&cfg.logging)
        .err()
        .map(|err| format!("Warning: {err}\n"));
    if let Some(path) = used_path {
        tracing::debug!(path = %path.display(), "loaded config");
    }

    let backend: Box<dyn SetaBackend> = match &cfg.source.data_dir {
        Some(dir) => Box::new(FilesystemSetaBackend::new(dir.clone())),
        None => match HttpSetaBackend::new(&cfg.source.base_url, cfg.source.timeout) {
            Ok(backend) => Box::new(backend),
            Err(err) => return CommandOutput::failure(1, &err.to_string()),
        },
    };

    let mut out = run_command(&rest, backend.as_ref(), &RunContext::from_config(&cfg));
    if let Some(warning) = warning {
        out.stderr.insert_str(0, &warning);
    }
    out
}

/// Dispatch `args` (command first) against `backend`.
pub fn run_command(args: &[String], backend: &dyn SetaBackend, ctx: &RunContext) -> CommandOutput {
    let Some((cmd, rest)) = args.split_first() else {
        return CommandOutput::ok(help_text());
    };

    match cmd.as_str() {
        "show" => show::run_show(rest, backend, ctx),
        "dates" => dates::run_dates(rest, backend),
        "classify" => classify::run_classify(rest),
        "help" | "-h" | "--help" => CommandOutput::ok(help_text()),
        other => CommandOutput::failure(
            2,
            &format!("unknown command \"{other}\" for \"seta\"\nRun 'seta --help' for usage."),
        ),
    }
}

pub fn run_cli_for_test(args: &[&str], backend: &dyn SetaBackend) -> CommandOutput {
    let owned: Vec<String> = args.iter().map(|a| (*a).to_string()).collect();
    run_command(&owned, backend, &RunContext::default())
}
