//! Beacon configuration
//!
//! Layered: built-in defaults, then an optional TOML file, then `BEACON_*`
//! environment variables. The CLI applies its flags on top.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_URL: &str = "https://ci.chromium.org/p/chromium/g/chromium.gpu/console";
pub const DEFAULT_INTERVAL_MINUTES: u64 = 5;

/// One week.
pub const MAX_INTERVAL_MINUTES: u64 = 7 * 24 * 60;
/// Upper bound for every fade duration and for the device timeout.
pub const MAX_FADE_MS: u64 = 60 * 60 * 1000;
pub const MAX_FETCH_TIMEOUT_SECS: u64 = 60 * 60;

pub const ENV_URL: &str = "BEACON_URL";
pub const ENV_INTERVAL_MINUTES: &str = "BEACON_INTERVAL_MINUTES";
pub const ENV_DEVICE: &str = "BEACON_DEVICE";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BeaconConfig {
    pub url: String,
    pub interval_minutes: u64,
    /// Steady-state fade, milliseconds.
    pub fade_ms: u64,
    /// One half-cycle of the emergency pulse, milliseconds.
    pub emergency_fade_ms: u64,
    /// Each step of the startup flash, milliseconds.
    pub attention_fade_ms: u64,
    pub fetch_timeout_secs: Option<u64>,
    pub device_timeout_ms: Option<u64>,
    pub layout: LayoutConfig,
    pub device: DeviceConfig,
}

impl Default for BeaconConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            interval_minutes: DEFAULT_INTERVAL_MINUTES,
            fade_ms: 500,
            emergency_fade_ms: 1500,
            attention_fade_ms: 500,
            fetch_timeout_secs: None,
            device_timeout_ms: None,
            layout: LayoutConfig::default(),
            device: DeviceConfig::default(),
        }
    }
}

/// CSS selectors describing the console page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutConfig {
    /// One element per builder.
    pub column: String,
    pub success: String,
    pub failure: String,
    pub infra_failure: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            column: ".console-builder-column".to_string(),
            success: ".console-Success".to_string(),
            failure: ".console-Failure".to_string(),
            infra_failure: ".console-InfraFailure".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceKind {
    /// Linux LED class device under `/sys/class/leds`.
    #[default]
    Sysfs,
    /// No hardware; fades are only logged.
    Log,
    /// ThingM blink(1) over USB HID.
    Blink1,
}

impl FromStr for DeviceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sysfs" => Ok(Self::Sysfs),
            "log" => Ok(Self::Log),
            "blink1" => Ok(Self::Blink1),
            other => Err(format!("unknown device kind `{other}` (expected sysfs, log or blink1)")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DeviceConfig {
    pub kind: DeviceKind,
    /// LED name for sysfs, serial number for blink(1). Ignored by `log`.
    pub name: Option<String>,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            kind: DeviceKind::Sysfs,
            name: Some("beacon".to_string()),
        }
    }
}

impl BeaconConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Load the optional file, then apply process environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.with_env(|key| std::env::var(key).ok())
    }

    /// Apply `BEACON_*` overrides read through `lookup`.
    pub fn with_env<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_URL) {
            self.url = url;
        }
        if let Some(raw) = lookup(ENV_INTERVAL_MINUTES) {
            self.interval_minutes = raw.trim().parse().map_err(|e| ConfigError::Invalid {
                key: ENV_INTERVAL_MINUTES,
                reason: format!("`{raw}`: {e}"),
            })?;
        }
        if let Some(raw) = lookup(ENV_DEVICE) {
            self.device.kind = raw
                .parse()
                .map_err(|reason| ConfigError::Invalid { key: ENV_DEVICE, reason })?;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.interval_minutes == 0 {
            return Err(ConfigError::Invalid {
                key: "interval_minutes",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.url.trim().is_empty() {
            return Err(ConfigError::Invalid {
                key: "url",
                reason: "must not be empty".to_string(),
            });
        }
        if self.interval_minutes > MAX_INTERVAL_MINUTES {
            return Err(ConfigError::Invalid {
                key: "interval_minutes",
                reason: format!("must be at most {MAX_INTERVAL_MINUTES}"),
            });
        }
        if self.emergency_fade_ms == 0 {
            return Err(ConfigError::Invalid {
                key: "emergency_fade_ms",
                reason: "must be at least 1".to_string(),
            });
        }
        for (key, value) in [
            ("fade_ms", Some(self.fade_ms)),
            ("emergency_fade_ms", Some(self.emergency_fade_ms)),
            ("attention_fade_ms", Some(self.attention_fade_ms)),
            ("device_timeout_ms", self.device_timeout_ms),
        ] {
            if value.is_some_and(|ms| ms > MAX_FADE_MS) {
                return Err(ConfigError::Invalid {
                    key,
                    reason: format!("must be at most {MAX_FADE_MS}"),
                });
            }
        }
        if self
            .fetch_timeout_secs
            .is_some_and(|secs| secs > MAX_FETCH_TIMEOUT_SECS)
        {
            return Err(ConfigError::Invalid {
                key: "fetch_timeout_secs",
                reason: format!("must be at most {MAX_FETCH_TIMEOUT_SECS}"),
            });
        }
        Ok(())
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_minutes.saturating_mul(60))
    }

    pub fn fetch_timeout(&self) -> Option<Duration> {
        self.fetch_timeout_secs.map(Duration::from_secs)
    }

    pub fn device_timeout(&self) -> Option<Duration> {
        self.device_timeout_ms.map(Duration::from_millis)
    }
}
