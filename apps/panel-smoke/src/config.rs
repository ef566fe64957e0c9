//! Environment-backed runtime configuration for `panel-smoke`.

use std::{env, error::Error, fmt};

use panel_core::MentionMode;

const DEFAULT_LAYOUT_HEIGHT: f32 = 320.0;
const DEFAULT_LAYOUT_WIDTH: f32 = 390.0;
const DEFAULT_EVENT_TIMEOUT_MS: u64 = 2_000;

/// Runtime configuration used by the smoke binary.
#[derive(Debug, Clone, PartialEq)]
pub struct SmokeConfig {
    /// Panel mode to drive.
    pub mode: MentionMode,
    /// Panel height reported with the scripted layout.
    pub layout_height: f32,
    /// Panel width reported with the scripted layout.
    pub layout_width: f32,
    /// How long to wait for each runtime event before giving up.
    pub event_timeout_ms: u64,
}

impl SmokeConfig {
    /// Parse configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(mut lookup: F) -> Result<Self, ConfigError>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let mode = match optional_trimmed_env("PANEL_SMOKE_MODE", &mut lookup) {
            None => MentionMode::Input,
            Some(value) => match value.to_ascii_lowercase().as_str() {
                "input" => MentionMode::Input,
                "search" => MentionMode::Search,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        key: "PANEL_SMOKE_MODE",
                        value,
                        reason: "expected input|search".to_owned(),
                    });
                }
            },
        };

        let layout_height =
            parse_optional_f32("PANEL_SMOKE_LAYOUT_HEIGHT", DEFAULT_LAYOUT_HEIGHT, &mut lookup)?;
        let layout_width =
            parse_optional_f32("PANEL_SMOKE_LAYOUT_WIDTH", DEFAULT_LAYOUT_WIDTH, &mut lookup)?;
        let event_timeout_ms = parse_optional_u64(
            "PANEL_SMOKE_EVENT_TIMEOUT_MS",
            DEFAULT_EVENT_TIMEOUT_MS,
            &mut lookup,
        )?;

        if layout_height <= 0.0 {
            return Err(ConfigError::InvalidValue {
                key: "PANEL_SMOKE_LAYOUT_HEIGHT",
                value: layout_height.to_string(),
                reason: "must be greater than 0".to_owned(),
            });
        }
        if layout_width <= 0.0 {
            return Err(ConfigError::InvalidValue {
                key: "PANEL_SMOKE_LAYOUT_WIDTH",
                value: layout_width.to_string(),
                reason: "must be greater than 0".to_owned(),
            });
        }

        Ok(Self {
            mode,
            layout_height,
            layout_width,
            event_timeout_ms,
        })
    }
}

/// Errors produced while parsing runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// An environment variable could not be parsed.
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidValue { key, value, reason } => {
                write!(f, "invalid {key}='{value}': {reason}")
            }
        }
    }
}

impl Error for ConfigError {}

fn optional_trimmed_env<F>(key: &'static str, lookup: &mut F) -> Option<String>
where
    F: FnMut(&str) -> Option<String>,
{
    lookup(key)
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

fn parse_optional_u64<F>(key: &'static str, default: u64, lookup: &mut F) -> Result<u64, ConfigError>
where
    F: FnMut(&str) -> Option<String>,
{
    let Some(value) = lookup(key) else {
        return Ok(default);
    };
    value
        .parse::<u64>()
        .map_err(|err| ConfigError::InvalidValue {
            key,
            value,
            reason: err.to_string(),
        })
}

fn parse_optional_f32<F>(key: &'static str, default: f32, lookup: &mut F) -> Result<f32, ConfigError>
where
    F: FnMut(&str) -> Option<String>,
{
    let Some(value) = lookup(key) else {
        return Ok(default);
    };
    value
        .parse::<f32>()
        .map_err(|err| ConfigError::InvalidValue {
            key,
            value,
            reason: err.to_string(),
        })
}
