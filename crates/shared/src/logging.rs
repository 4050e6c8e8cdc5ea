use std::str::FromStr;

use tracing::warn;
use tracing_subscriber::EnvFilter;

use crate::env::optional_var;

pub const LOG_FILTER_ENV: &str = "RUST_LOG";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";
pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl LogFormat {
    /// Unknown values fall back to text
    pub fn parse(s: &str) -> LogFormat {
        if s.trim().eq_ignore_ascii_case("json") {
            LogFormat::Json
        } else {
            LogFormat::Text
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    pub filter: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_LOG_FILTER.to_string(),
            format: LogFormat::default(),
        }
    }
}

impl LoggingConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        Ok(Self {
            filter: optional_var(LOG_FILTER_ENV)?
                .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
            format: optional_var(LOG_FORMAT_ENV)?
                .map(|format| LogFormat::parse(&format))
                .unwrap_or_default(),
        })
    }
}

/// Install the process-wide `tracing` subscriber from `RUST_LOG` and `LOG_FORMAT`.
pub fn configure_logging() -> Result<(), anyhow::Error> {
    configure_logging_with(&LoggingConfig::from_env()?)
}

/// Install the subscriber for `config`. A subscriber already being installed
/// is only logged, so tests and hosts may both call this.
pub fn configure_logging_with(config: &LoggingConfig) -> Result<(), anyhow::Error> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_str(&config.filter)?)
        .with_file(true)
        .with_line_number(true)
        .with_writer(std::io::stdout);

    let installed = match config.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Text => builder.try_init(),
    };

    if let Err(e) = installed {
        warn!("Logging subscriber already installed: {e}");
    }

    Ok(())
}
