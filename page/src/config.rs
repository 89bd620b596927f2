//! Configuration for the booking page components.
//!
//! Loads timings and feature switches from `EVENTDESK_*` environment variables
//! with the defaults the page ships with. Unset variables fall back to the
//! default; set but unparseable variables are rejected.

use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use thiserror::Error;

/// Configuration error
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable is set but its value cannot be used
    #[error("Invalid value for {var}: {value:?} ({reason})")]
    InvalidValue {
        /// Variable name
        var: &'static str,
        /// Raw value found in the environment
        value: String,
        /// What was expected instead
        reason: &'static str,
    },
}

/// Which card text the search box matches against
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchMode {
    /// Title or description contains the query
    #[default]
    TitleAndDescription,
    /// Only the title is matched
    TitleOnly,
}

impl SearchMode {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "title_and_description" | "full" => Some(Self::TitleAndDescription),
            "title_only" | "title" => Some(Self::TitleOnly),
            _ => None,
        }
    }
}

/// Page component configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageConfig {
    /// How long a toast stays visible before it starts hiding (default: 5000)
    pub toast_lifetime_ms: u64,
    /// Hide transition before a toast element is removed (default: 150)
    pub toast_transition_ms: u64,
    /// Delay between a booking click and the redirect (default: 1500)
    pub redirect_delay_ms: u64,
    /// Countdown refresh period (default: 1000)
    pub countdown_period_ms: u64,
    /// Search matching mode (default: title and description)
    pub search_mode: SearchMode,
    /// Whether images can be observed for intersection (default: true)
    pub lazy_images: bool,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            toast_lifetime_ms: 5000,
            toast_transition_ms: 150,
            redirect_delay_ms: 1500,
            countdown_period_ms: 1000,
            search_mode: SearchMode::default(),
            lazy_images: true,
        }
    }
}

impl PageConfig {
    /// Load configuration from the process environment
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if a variable is set to a value
    /// that cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if a variable is set to a value
    /// that cannot be parsed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let config = Self {
            toast_lifetime_ms: millis(&lookup, "EVENTDESK_TOAST_LIFETIME_MS", defaults.toast_lifetime_ms)?,
            toast_transition_ms: millis(
                &lookup,
                "EVENTDESK_TOAST_TRANSITION_MS",
                defaults.toast_transition_ms,
            )?,
            redirect_delay_ms: millis(&lookup, "EVENTDESK_REDIRECT_DELAY_MS", defaults.redirect_delay_ms)?,
            countdown_period_ms: millis(
                &lookup,
                "EVENTDESK_COUNTDOWN_PERIOD_MS",
                defaults.countdown_period_ms,
            )?,
            search_mode: match lookup("EVENTDESK_SEARCH_MODE") {
                Some(value) => SearchMode::parse(&value).ok_or(ConfigError::InvalidValue {
                    var: "EVENTDESK_SEARCH_MODE",
                    value,
                    reason: "expected title_and_description or title_only",
                })?,
                None => defaults.search_mode,
            },
            lazy_images: match lookup("EVENTDESK_LAZY_IMAGES") {
                Some(value) => parse_bool(&value).ok_or(ConfigError::InvalidValue {
                    var: "EVENTDESK_LAZY_IMAGES",
                    value,
                    reason: "expected true or false",
                })?,
                None => defaults.lazy_images,
            },
        };

        if config.countdown_period_ms == 0 {
            return Err(ConfigError::InvalidValue {
                var: "EVENTDESK_COUNTDOWN_PERIOD_MS",
                value: "0".to_string(),
                reason: "period must be positive",
            });
        }

        Ok(config)
    }

    /// Toast lifetime as a [`Duration`]
    #[must_use]
    pub const fn toast_lifetime(&self) -> Duration {
        Duration::from_millis(self.toast_lifetime_ms)
    }

    /// Toast hide transition as a [`Duration`]
    #[must_use]
    pub const fn toast_transition(&self) -> Duration {
        Duration::from_millis(self.toast_transition_ms)
    }

    /// Redirect delay as a [`Duration`]
    #[must_use]
    pub const fn redirect_delay(&self) -> Duration {
        Duration::from_millis(self.redirect_delay_ms)
    }

    /// Countdown period as a [`Duration`]
    #[must_use]
    pub const fn countdown_period(&self) -> Duration {
        Duration::from_millis(self.countdown_period_ms)
    }
}

fn millis<F>(lookup: &F, var: &'static str, default: u64) -> Result<u64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        Some(value) => value.trim().parse().map_err(|_| ConfigError::InvalidValue {
            var,
            value,
            reason: "expected milliseconds as a non-negative integer",
        }),
        None => Ok(default),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
