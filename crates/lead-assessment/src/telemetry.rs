use crate::config::TelemetryConfig;
use std::fmt;
use tracing::info;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

/// Where the active log filter came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterSource {
    /// `RUST_LOG` was set and parsed.
    RustLog,
    /// Fell back to `APP_LOG_LEVEL` (or its `info` default).
    AppLogLevel,
}

impl FilterSource {
    pub const fn env_var(self) -> &'static str {
        match self {
            Self::RustLog => "RUST_LOG",
            Self::AppLogLevel => "APP_LOG_LEVEL",
        }
    }
}

#[derive(Debug)]
pub enum TelemetryError {
    EnvFilter { value: String, source: ParseError },
    Subscriber(Box<dyn std::error::Error + Send + Sync>),
}

impl fmt::Display for TelemetryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TelemetryError::EnvFilter { value, .. } => {
                write!(f, "APP_LOG_LEVEL '{value}' is not a valid tracing filter")
            }
            TelemetryError::Subscriber(err) => write!(f, "unable to install log subscriber: {err}"),
        }
    }
}

impl std::error::Error for TelemetryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TelemetryError::EnvFilter { source, .. } => Some(source),
            TelemetryError::Subscriber(err) => Some(&**err),
        }
    }
}

/// `RUST_LOG` when it parses, otherwise the configured level.
pub fn build_filter(
    rust_log: Option<&str>,
    config: &TelemetryConfig,
) -> Result<(EnvFilter, FilterSource), TelemetryError> {
    if let Some(filter) = rust_log.and_then(|value| EnvFilter::try_new(value).ok()) {
        return Ok((filter, FilterSource::RustLog));
    }

    EnvFilter::try_new(&config.log_level)
        .map(|filter| (filter, FilterSource::AppLogLevel))
        .map_err(|source| TelemetryError::EnvFilter {
            value: config.log_level.clone(),
            source,
        })
}

/// Installs the global compact subscriber and logs which filter won.
pub fn init(config: &TelemetryConfig) -> Result<FilterSource, TelemetryError> {
    let rust_log = std::env::var("RUST_LOG").ok();
    let (env_filter, source) = build_filter(rust_log.as_deref(), config)?;
    let active = env_filter.to_string();

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .with_ansi(false)
        .try_init()
        .map_err(TelemetryError::Subscriber)?;

    info!(filter = %active, from = source.env_var(), "logging initialised");
    Ok(source)
}
