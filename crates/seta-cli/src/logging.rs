use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Overrides the configured level with a full filter directive.
pub const ENV_LOG: &str = "SETA_LOG";

const CRATES: &[&str] = &["seta_core", "seta_cli"];

/// Filter for `level`: our crates at `level`, everything else at warn.
pub fn filter_directive(level: &str) -> String {
    let level = level.trim().to_lowercase();
    let allowlist: Vec<String> = CRATES.iter().map(|c| format!("{c}={level}")).collect();
    format!("warn,{}", allowlist.join(","))
}

/// Install the global subscriber, writing to stderr so stdout stays
/// clean for tables and JSON.
pub fn init_logging(cfg: &LoggingConfig) -> Result<(), String> {
    let directive = match std::env::var(ENV_LOG) {
        Ok(value) if !value.trim().is_empty() => value.trim().to_string(),
        _ => filter_directive(&cfg.level),
    };
    let filter =
        EnvFilter::try_new(&directive).map_err(|err| format!("invalid log filter: {err}"))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);
    let result = if cfg.format.trim().eq_ignore_ascii_case("json") {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    result.map_err(|err| format!("init logging: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directive_scopes_level_to_our_crates() {
        assert_eq!(
            filter_directive(" DEBUG "),
            "warn,seta_core=debug,seta_cli=debug"
        );
    }

    #[test]
    fn directive_parses() {
        assert!(EnvFilter::try_new(filter_directive("info")).is_ok());
    }
}
