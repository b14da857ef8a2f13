//! # Beacon Device
//!
//! Concrete [`LightDevice`] drivers and [`open`], which picks one from a
//! [`DeviceConfig`].
//!
//! * [`SysfsLight`]: Linux LED class device, software fades
//! * [`LogLight`]: no hardware, fades are logged
//! * `Blink1Light`: ThingM blink(1), behind the `blink1` feature

#[cfg(feature = "blink1")]
pub mod blink1;
pub mod log;
pub mod sysfs;

#[cfg(feature = "blink1")]
pub use blink1::Blink1Light;
pub use log::LogLight;
pub use sysfs::SysfsLight;

use beacon_core::{DeviceConfig, DeviceError, DeviceKind, LightDevice};

pub type BoxedLight = Box<dyn LightDevice>;

const DEFAULT_NAME: &str = "beacon";

/// Open the light described by `config`.
///
/// Fails with [`DeviceError::Unavailable`] when no such light is attached.
pub fn open(config: &DeviceConfig) -> Result<BoxedLight, DeviceError> {
    let name = config.name.as_deref();
    match config.kind {
        DeviceKind::Sysfs => Ok(Box::new(SysfsLight::open(
            name.unwrap_or(DEFAULT_NAME),
        )?)),
        DeviceKind::Log => Ok(Box::new(LogLight::new(name.unwrap_or(DEFAULT_NAME)))),
        DeviceKind::Blink1 => open_blink1(name),
    }
}

#[cfg(feature = "blink1")]
fn open_blink1(serial: Option<&str>) -> Result<BoxedLight, DeviceError> {
    Ok(Box::new(Blink1Light::open(serial)?))
}

#[cfg(not(feature = "blink1"))]
fn open_blink1(_serial: Option<&str>) -> Result<BoxedLight, DeviceError> {
    Err(DeviceError::Unavailable(
        "built without blink(1) support (enable the `blink1` feature)".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_device_always_opens() {
        let config = DeviceConfig {
            kind: DeviceKind::Log,
            name: None,
        };
        let light = open(&config).unwrap();
        assert_eq!(light.describe(), "log:beacon");
    }

    #[test]
    fn missing_sysfs_led_is_unavailable() {
        let config = DeviceConfig {
            kind: DeviceKind::Sysfs,
            name: Some("no-such-beacon-led".to_string()),
        };
        let err = open(&config).err().unwrap();
        assert!(matches!(err, DeviceError::Unavailable(_)));
        assert!(err.to_string().starts_with("No light device found"));
    }

    #[cfg(not(feature = "blink1"))]
    #[test]
    fn blink1_needs_the_feature() {
        let config = DeviceConfig {
            kind: DeviceKind::Blink1,
            name: None,
        };
        assert!(matches!(open(&config), Err(DeviceError::Unavailable(_))));
    }
}
