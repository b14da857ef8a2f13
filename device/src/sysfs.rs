//! Linux LED class driver
//!
//! Drives `/sys/class/leds/<name>`. Multicolor LEDs (`multi_intensity`
//! present) take the color directly; single-color LEDs get the color's
//! luminance as brightness. The kernel has no notion of a fade, so fades are
//! stepped in software at [`FRAME`] intervals.

use async_trait::async_trait;
use beacon_core::color::{self, Color};
use beacon_core::{DeviceError, LightDevice};
use parking_lot::Mutex;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

pub const LED_CLASS_ROOT: &str = "/sys/class/leds";

/// Interval between software fade steps.
pub const FRAME: Duration = Duration::from_millis(20);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Channels {
    Multicolor,
    Single,
}

#[derive(Debug)]
pub struct SysfsLight {
    dir: PathBuf,
    channels: Channels,
    max_brightness: u32,
    shown: Mutex<Color>,
}

impl SysfsLight {
    /// Open `/sys/class/leds/<name>`.
    pub fn open(name: &str) -> Result<Self, DeviceError> {
        Self::open_at(Path::new(LED_CLASS_ROOT).join(name))
    }

    /// Open an LED class directory at an explicit path.
    pub fn open_at(dir: impl Into<PathBuf>) -> Result<Self, DeviceError> {
        let dir = dir.into();
        if !dir.join("brightness").is_file() {
            return Err(DeviceError::Unavailable(format!(
                "{} is not an LED class device",
                dir.display()
            )));
        }

        let channels = if dir.join("multi_intensity").is_file() {
            Channels::Multicolor
        } else {
            Channels::Single
        };
        let max_brightness = std::fs::read_to_string(dir.join("max_brightness"))
            .ok()
            .and_then(|raw| raw.trim().parse().ok())
            .unwrap_or(255);

        debug!(path = %dir.display(), ?channels, max_brightness, "Opened LED");
        Ok(Self {
            dir,
            channels,
            max_brightness,
            shown: Mutex::new(color::OFF),
        })
    }

    async fn write(&self, target: Color) -> Result<(), DeviceError> {
        match self.channels {
            Channels::Multicolor => {
                let intensity = format!("{} {} {}\n", target.r, target.g, target.b);
                self.write_attr("multi_intensity", intensity).await?;
                self.write_attr("brightness", format!("{}\n", self.max_brightness))
                    .await
            }
            Channels::Single => {
                let level = u32::from(luminance(target)) * self.max_brightness / 255;
                self.write_attr("brightness", format!("{level}\n")).await
            }
        }?;
        *self.shown.lock() = target;
        Ok(())
    }

    async fn write_attr(&self, attr: &str, value: String) -> Result<(), DeviceError> {
        tokio::fs::write(self.dir.join(attr), value)
            .await
            .map_err(|err| match err.kind() {
                io::ErrorKind::NotFound => {
                    DeviceError::Lost(format!("{} disappeared", self.dir.display()))
                }
                _ => DeviceError::Io(err),
            })
    }
}

/// Rec. 601 luma, good enough for a single-channel LED.
fn luminance(c: Color) -> u8 {
    ((299 * u32::from(c.r) + 587 * u32::from(c.g) + 114 * u32::from(c.b)) / 1000) as u8
}

/// Blend amount for `step` of `steps`, reaching 255 on the last one.
fn fade_amount(step: u32, steps: u32) -> u8 {
    (u64::from(step) * 255 / u64::from(steps)) as u8
}

#[async_trait]
impl LightDevice for SysfsLight {
    async fn fade_to(&self, target: Color, duration: Duration) -> Result<(), DeviceError> {
        let from = *self.shown.lock();
        let steps = (duration.as_millis() / FRAME.as_millis()).clamp(1, u128::from(u32::MAX)) as u32;
        let frame = duration / steps;

        for step in 1..=steps {
            self.write(color::blend(from, target, fade_amount(step, steps)))
                .await?;
            if step < steps {
                tokio::time::sleep(frame).await;
            }
        }
        tokio::time::sleep(frame).await;
        Ok(())
    }

    fn describe(&self) -> String {
        self.dir.display().to_string()
    }
}
