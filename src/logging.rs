//! Tracing setup. The terminal is owned by the UI, so events go to a file.
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the filter directives (`info` when unset).
pub const LOG_ENV: &str = "USER_CONSOLE_LOG";

const QUIET_TARGETS: &[&str] = &["reqwest", "hyper", "hyper_util", "rustls", "h2", "tower"];

/// Build the filter from `USER_CONSOLE_LOG`, keeping HTTP internals at `warn`.
pub fn env_filter() -> anyhow::Result<EnvFilter> {
    let mut filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    for target in QUIET_TARGETS {
        filter = filter.add_directive(format!("{target}=warn").parse()?);
    }
    Ok(filter)
}

/// Install the global subscriber, appending to `log_file`.
pub fn init_tracing(log_file: &Path) -> anyhow::Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .with_context(|| format!("open log file {}", log_file.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter()?)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|e| anyhow::anyhow!("install tracing subscriber: {e}"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_keeps_http_crates_quiet() {
        let filter = env_filter().unwrap();
        let rendered = filter.to_string();
        assert!(rendered.contains("reqwest=warn"));
        assert!(rendered.contains("hyper=warn"));
    }
}
