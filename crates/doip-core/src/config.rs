//! Configuration for the updater
//!
//! All values are read once at startup from environment variables:
//!
//! - `DO_TOKEN`: DigitalOcean API token (required)
//! - `DO_DOMAIN`: domain whose apex "A" record is managed (required)
//! - `IP_TOKEN`: ipinfo.io token (optional)
//! - `POLL_INTERVAL`: seconds between passes (optional, default 3600)
//! - `LOG_LEVEL`: trace, debug, info, warn or error (optional, default info)

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{Error, Result};

/// Default number of seconds between passes
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 3600;

/// Environment variable names
pub mod vars {
    pub const DO_TOKEN: &str = "DO_TOKEN";
    pub const DO_DOMAIN: &str = "DO_DOMAIN";
    pub const IP_TOKEN: &str = "IP_TOKEN";
    pub const POLL_INTERVAL: &str = "POLL_INTERVAL";
    pub const LOG_LEVEL: &str = "LOG_LEVEL";
}

/// Process-wide configuration, immutable after startup
#[derive(Clone, PartialEq, Eq)]
pub struct UpdaterConfig {
    /// DigitalOcean API token
    /// ⚠️ NEVER log this value
    pub do_token: String,

    /// Target domain name
    pub domain: String,

    /// ipinfo.io token, if any
    /// ⚠️ NEVER log this value
    pub ip_token: Option<String>,

    /// Seconds between passes (always > 0)
    pub poll_interval_secs: u64,

    /// Maximum log level
    pub log_level: LogLevel,
}

impl UpdaterConfig {
    /// Create a configuration with defaults for the optional values
    pub fn new(do_token: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            do_token: do_token.into(),
            domain: domain.into(),
            ip_token: None,
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            log_level: LogLevel::default(),
        }
    }

    /// Set the poll interval
    pub fn with_poll_interval_secs(mut self, secs: u64) -> Self {
        self.poll_interval_secs = secs;
        self
    }

    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    ///
    /// `from_env` is this function over `std::env::var`. Tests pass a map
    /// lookup instead of touching the process environment.
    pub fn from_vars<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.is_empty());

        let (Some(do_token), Some(domain)) = (non_empty(vars::DO_TOKEN), non_empty(vars::DO_DOMAIN))
        else {
            return Err(Error::config(
                "DO_TOKEN and DO_DOMAIN environment variables are required",
            ));
        };

        let poll_interval_secs = match lookup(vars::POLL_INTERVAL) {
            Some(raw) => parse_poll_interval(&raw)?,
            None => DEFAULT_POLL_INTERVAL_SECS,
        };

        let log_level = match non_empty(vars::LOG_LEVEL) {
            Some(raw) => raw.parse()?,
            None => LogLevel::default(),
        };

        let config = Self {
            do_token,
            domain,
            ip_token: non_empty(vars::IP_TOKEN),
            poll_interval_secs,
            log_level,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.do_token.is_empty() || self.domain.is_empty() {
            return Err(Error::config(
                "DO_TOKEN and DO_DOMAIN environment variables are required",
            ));
        }
        if self.poll_interval_secs == 0 {
            return Err(Error::config("POLL_INTERVAL must be a positive integer"));
        }
        Ok(())
    }

    /// Time to wait between passes
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}

// Custom Debug implementation that hides the tokens
impl fmt::Debug for UpdaterConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpdaterConfig")
            .field("do_token", &"<REDACTED>")
            .field("domain", &self.domain)
            .field("ip_token", &self.ip_token.as_ref().map(|_| "<REDACTED>"))
            .field("poll_interval_secs", &self.poll_interval_secs)
            .field("log_level", &self.log_level)
            .finish()
    }
}

fn parse_poll_interval(raw: &str) -> Result<u64> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(secs),
        Ok(_) => Err(Error::config("POLL_INTERVAL must be a positive integer")),
        Err(_) => Err(Error::config("POLL_INTERVAL must be a valid integer")),
    }
}

/// Log verbosity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// The matching `tracing` level
    pub fn as_tracing_level(self) -> tracing::Level {
        match self {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

impl FromStr for LogLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(Error::config(format!(
                "LOG_LEVEL '{s}' is not valid. Valid levels: trace, debug, info, warn, error"
            ))),
        }
    }
}
