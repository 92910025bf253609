//! Pipeline configuration loaded from environment variables.

use std::time::Duration;

use pitlane_research::gemini::{DEFAULT_API_URL, DEFAULT_MODEL};

/// A configuration value could not be parsed.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} must be {expected}, got {value:?}")]
    Invalid {
        var: &'static str,
        value: String,
        expected: &'static str,
    },
}

/// Everything the composition root needs to wire the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub database_url: String,
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub gemini_api_url: String,
    /// Deadline for one AI round trip.
    pub ai_timeout: Duration,
    /// Deadline for one background provider fetch.
    pub fetch_timeout: Duration,
    /// Rows per page handed out by [`SetupPager`](crate::paging::SetupPager).
    pub page_size: u64,
    pub event_bus_capacity: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite://pitlane.db".to_string(),
            gemini_api_key: String::new(),
            gemini_model: DEFAULT_MODEL.to_string(),
            gemini_api_url: DEFAULT_API_URL.to_string(),
            ai_timeout: Duration::from_secs(60),
            fetch_timeout: Duration::from_secs(60),
            page_size: 20,
            event_bus_capacity: pitlane_events::bus::DEFAULT_CAPACITY,
        }
    }
}

impl PipelineConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var              | Default                                     |
    /// |----------------------|---------------------------------------------|
    /// | `DATABASE_URL`       | `sqlite://pitlane.db`                       |
    /// | `GEMINI_API_KEY`     | empty                                       |
    /// | `GEMINI_MODEL`       | `gemini-1.5-flash`                          |
    /// | `GEMINI_API_URL`     | `https://generativelanguage.googleapis.com` |
    /// | `AI_TIMEOUT_SECS`    | `60`                                        |
    /// | `FETCH_TIMEOUT_SECS` | `60`                                        |
    /// | `SETUP_PAGE_SIZE`    | `20`                                        |
    /// | `EVENT_BUS_CAPACITY` | `1024`                                      |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Apply a `.env` file if one exists, then [`from_env`](Self::from_env).
    pub fn load() -> Result<Self, ConfigError> {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                tracing::warn!(error = %e, "Ignoring unreadable .env file");
            }
        }
        Self::from_env()
    }

    /// Build a configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let text = |var: &str, default: String| lookup(var).unwrap_or(default);

        Ok(Self {
            database_url: text("DATABASE_URL", defaults.database_url),
            gemini_api_key: text("GEMINI_API_KEY", defaults.gemini_api_key),
            gemini_model: text("GEMINI_MODEL", defaults.gemini_model),
            gemini_api_url: text("GEMINI_API_URL", defaults.gemini_api_url),
            ai_timeout: Duration::from_secs(positive(
                &lookup,
                "AI_TIMEOUT_SECS",
                defaults.ai_timeout.as_secs(),
            )?),
            fetch_timeout: Duration::from_secs(positive(
                &lookup,
                "FETCH_TIMEOUT_SECS",
                defaults.fetch_timeout.as_secs(),
            )?),
            page_size: positive(&lookup, "SETUP_PAGE_SIZE", defaults.page_size)?,
            event_bus_capacity: positive(
                &lookup,
                "EVENT_BUS_CAPACITY",
                defaults.event_bus_capacity as u64,
            )? as usize,
        })
    }
}

/// Parse a strictly positive integer, falling back to `default` when unset.
fn positive<F>(lookup: &F, var: &'static str, default: u64) -> Result<u64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(value) = lookup(var) else {
        return Ok(default);
    };
    match value.trim().parse::<u64>() {
        Ok(parsed) if parsed > 0 => Ok(parsed),
        _ => Err(ConfigError::Invalid {
            var,
            value,
            expected: "a positive integer",
        }),
    }
}
