//! ThingM blink(1) over USB HID
//!
//! The device fades on its own: one `c` (fade to RGB) feature report carries
//! the target color and the fade time in 10 ms units. We then wait out the
//! fade locally, since the device does not report completion.

use async_trait::async_trait;
use beacon_core::{Color, DeviceError, LightDevice};
use hidapi::{HidApi, HidDevice};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

pub const VENDOR_ID: u16 = 0x27b8;
pub const PRODUCT_ID: u16 = 0x01ed;

const REPORT_ID: u8 = 0x01;
const FADE_TO_RGB: u8 = b'c';

pub struct Blink1Light {
    device: Arc<Mutex<HidDevice>>,
    serial: Option<String>,
}

impl Blink1Light {
    /// Open the first blink(1), or the one with `serial`.
    pub fn open(serial: Option<&str>) -> Result<Self, DeviceError> {
        let api = HidApi::new().map_err(|e| DeviceError::Unavailable(e.to_string()))?;
        let device = match serial {
            Some(serial) => api.open_serial(VENDOR_ID, PRODUCT_ID, serial),
            None => api.open(VENDOR_ID, PRODUCT_ID),
        }
        .map_err(|e| DeviceError::Unavailable(format!("blink(1): {e}")))?;

        debug!(serial, "Opened blink(1)");
        Ok(Self {
            device: Arc::new(Mutex::new(device)),
            serial: serial.map(str::to_string),
        })
    }
}

/// Build the 9-byte `fade to RGB` feature report. Fade time saturates at
/// `u16::MAX` ticks of 10 ms.
pub fn fade_report(color: Color, duration: Duration) -> [u8; 9] {
    let ticks = u16::try_from(duration.as_millis() / 10).unwrap_or(u16::MAX);
    let [hi, lo] = ticks.to_be_bytes();
    [REPORT_ID, FADE_TO_RGB, color.r, color.g, color.b, hi, lo, 0, 0]
}

#[async_trait]
impl LightDevice for Blink1Light {
    async fn fade_to(&self, color: Color, duration: Duration) -> Result<(), DeviceError> {
        let report = fade_report(color, duration);
        let device = self.device.clone();

        tokio::task::spawn_blocking(move || device.lock().send_feature_report(&report))
            .await
            .map_err(|e| DeviceError::Lost(e.to_string()))?
            .map_err(|e| DeviceError::Lost(format!("blink(1): {e}")))?;

        tokio::time::sleep(duration).await;
        Ok(())
    }

    fn describe(&self) -> String {
        match &self.serial {
            Some(serial) => format!("blink(1) {serial}"),
            None => "blink(1)".to_string(),
        }
    }
}
