use beacon_core::{BeaconConfig, ConfigError, DeviceKind};
use clap::Parser;
use std::path::PathBuf;

/// Watch a CI console and show its health on a status light
#[derive(Debug, Parser)]
#[command(name = "beacon", author, version)]
pub struct Cli {
    /// TOML config file
    #[arg(short, long, env = "BEACON_CONFIG")]
    pub config: Option<PathBuf>,

    /// Console page to watch
    #[arg(long)]
    pub url: Option<String>,

    /// Minutes between polls
    #[arg(short, long, value_name = "MINUTES")]
    pub interval: Option<u64>,

    /// Light driver: sysfs, log or blink1
    #[arg(short, long, value_name = "KIND")]
    pub device: Option<DeviceKind>,

    /// LED name (sysfs) or serial number (blink1)
    #[arg(long, value_name = "NAME")]
    pub led: Option<String>,

    /// Poll once, then exit
    #[arg(long)]
    pub once: bool,
}

impl Cli {
    /// Flags win over the file and the environment.
    pub fn apply(&self, mut config: BeaconConfig) -> Result<BeaconConfig, ConfigError> {
        if let Some(url) = &self.url {
            config.url = url.clone();
        }
        if let Some(minutes) = self.interval {
            config.interval_minutes = minutes;
        }
        if let Some(kind) = self.device {
            config.device.kind = kind;
        }
        if let Some(led) = &self.led {
            config.device.name = Some(led.clone());
        }
        config.validate()?;
        Ok(config)
    }
}
