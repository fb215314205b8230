//! Dashboard configuration.
//!
//! Built from environment variables at startup, then overridden by
//! command-line flags. The resulting [`AppConfig`] is constructed once in
//! `main` and passed down explicitly.

use std::path::PathBuf;
use std::time::Duration;

use clap::Args;

/// Command-line overrides for [`AppConfig`].
#[derive(Args, Debug, Default, Clone)]
pub struct ConfigOverrides {
    /// Backend base URL (overrides TRIAGE_BACKEND_URL)
    #[arg(long, global = true)]
    pub backend_url: Option<String>,

    /// Per-request timeout in seconds (overrides TRIAGE_REQUEST_TIMEOUT_SECS)
    #[arg(long, global = true, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_secs: Option<u64>,

    /// Dashboard log file (overrides TRIAGE_LOG_FILE)
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Initial dashboard location, e.g. "/tickets?tab=resolved&page=2"
    #[arg(long)]
    pub location: Option<String>,

    /// UI refresh interval in milliseconds
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub tick_rate_ms: Option<u64>,
}

/// Global configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Base URL of the triage backend.
    pub backend_url: String,
    /// Request timeout; `None` waits indefinitely.
    pub request_timeout: Option<Duration>,
    /// Where the dashboard writes its logs.
    pub log_file: PathBuf,
    /// UI refresh interval.
    pub tick_rate: Duration,
    /// Location requested on startup, resolved once counts are known.
    pub location: Option<String>,
}

impl AppConfig {
    /// Build the configuration from environment variables.
    ///
    /// | Variable                      | Default                          |
    /// |-------------------------------|----------------------------------|
    /// | `TRIAGE_BACKEND_URL`          | `http://127.0.0.1:5001`          |
    /// | `TRIAGE_REQUEST_TIMEOUT_SECS` | unset (no timeout)               |
    /// | `TRIAGE_LOG_FILE`             | `<local data dir>/triage/triage.log` |
    /// | `TRIAGE_TICK_RATE_MS`         | `250`                            |
    ///
    /// Zero or unparsable numbers fall back to the default.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let backend_url =
            lookup("TRIAGE_BACKEND_URL").unwrap_or_else(|| "http://127.0.0.1:5001".to_string());

        let request_timeout = lookup("TRIAGE_REQUEST_TIMEOUT_SECS")
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);

        let log_file = lookup("TRIAGE_LOG_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(default_log_file);

        let tick_rate = Duration::from_millis(
            lookup("TRIAGE_TICK_RATE_MS")
                .and_then(|v| v.parse::<u64>().ok())
                .filter(|ms| *ms > 0)
                .unwrap_or(250),
        );

        Self {
            backend_url,
            request_timeout,
            log_file,
            tick_rate,
            location: None,
        }
    }

    /// Apply command-line overrides on top of the environment.
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(url) = overrides.backend_url {
            self.backend_url = url;
        }
        if let Some(secs) = overrides.timeout_secs {
            self.request_timeout = Some(Duration::from_secs(secs));
        }
        if let Some(path) = overrides.log_file {
            self.log_file = path;
        }
        if let Some(ms) = overrides.tick_rate_ms {
            self.tick_rate = Duration::from_millis(ms);
        }
        if overrides.location.is_some() {
            self.location = overrides.location;
        }
        self
    }
}

fn default_log_file() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("triage")
        .join("triage.log")
}
