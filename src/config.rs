//! Runtime configuration for board sessions.
//!
//! Values come from `SPRINTBOARD_*` environment variables, falling back to
//! defaults when a variable is unset.

use std::fmt;
use thiserror::Error;

/// Environment variable holding the log filter directive.
pub const LOG_FILTER_VAR: &str = "SPRINTBOARD_LOG";
/// Environment variable holding the preselected sprint close target.
pub const CLOSE_TARGET_VAR: &str = "SPRINTBOARD_DEFAULT_CLOSE_TARGET";
/// Environment variable toggling success notices.
pub const NOTIFY_SUCCESS_VAR: &str = "SPRINTBOARD_NOTIFY_SUCCESS";

const DEFAULT_LOG_FILTER: &str = "info";

/// Migration target preselected when an operator closes a sprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CloseTarget {
    /// Send unfinished tasks to the backlog.
    #[default]
    Backlog,
    /// Move unfinished tasks to the earliest-starting open sprint, falling
    /// back to the backlog when none exists.
    NextSprint,
}

impl CloseTarget {
    /// Returns the configuration spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Backlog => "backlog",
            Self::NextSprint => "next_sprint",
        }
    }
}

impl fmt::Display for CloseTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for CloseTarget {
    type Error = ConfigError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "backlog" => Ok(Self::Backlog),
            "next_sprint" | "next-sprint" => Ok(Self::NextSprint),
            _ => Err(ConfigError::InvalidValue {
                key: CLOSE_TARGET_VAR,
                value: value.to_owned(),
            }),
        }
    }
}

/// Errors raised while reading configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable holds a value outside its accepted set.
    #[error("invalid value {value:?} for {key}")]
    InvalidValue {
        /// Offending variable.
        key: &'static str,
        /// Raw value found.
        value: String,
    },
    /// The log filter is blank.
    #[error("SPRINTBOARD_LOG must not be empty")]
    EmptyLogFilter,
}

/// Board session configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardConfig {
    log_filter: String,
    default_close_target: CloseTarget,
    notify_success: bool,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            log_filter: DEFAULT_LOG_FILTER.to_owned(),
            default_close_target: CloseTarget::default(),
            notify_success: true,
        }
    }
}

impl BoardConfig {
    /// Reads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`, which maps a variable name to
    /// its value.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a variable is set to an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let log_filter = match lookup(LOG_FILTER_VAR) {
            Some(raw) if raw.trim().is_empty() => return Err(ConfigError::EmptyLogFilter),
            Some(raw) => raw.trim().to_owned(),
            None => defaults.log_filter,
        };
        let default_close_target = lookup(CLOSE_TARGET_VAR)
            .map(|raw| CloseTarget::try_from(raw.as_str()))
            .transpose()?
            .unwrap_or(defaults.default_close_target);
        let notify_success = lookup(NOTIFY_SUCCESS_VAR)
            .map(|raw| parse_flag(NOTIFY_SUCCESS_VAR, &raw))
            .transpose()?
            .unwrap_or(defaults.notify_success);
        Ok(Self {
            log_filter,
            default_close_target,
            notify_success,
        })
    }

    /// Returns the log filter directive.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }

    /// Returns the preselected sprint close target.
    #[must_use]
    pub const fn default_close_target(&self) -> CloseTarget {
        self.default_close_target
    }

    /// Returns whether success notices are emitted.
    #[must_use]
    pub const fn notify_success(&self) -> bool {
        self.notify_success
    }

    /// Overrides the preselected sprint close target.
    #[must_use]
    pub const fn with_default_close_target(mut self, target: CloseTarget) -> Self {
        self.default_close_target = target;
        self
    }

    /// Enables or disables success notices.
    #[must_use]
    pub const fn with_notify_success(mut self, enabled: bool) -> Self {
        self.notify_success = enabled;
        self
    }
}

fn parse_flag(key: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key,
            value: raw.to_owned(),
        }),
    }
}
