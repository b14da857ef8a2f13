use crate::color::Color;
use crate::error::DeviceError;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// The single light the beacon drives.
///
/// `fade_to` resolves once the device reports the fade as finished; awaiting
/// it is the completion continuation. Implementations may fail immediately,
/// fail later (device lost), or never resolve at all.
#[async_trait]
pub trait LightDevice: Send + Sync + 'static {
    /// Fade from whatever is showing to `color` over `duration`.
    async fn fade_to(&self, color: Color, duration: Duration) -> Result<(), DeviceError>;

    /// Short name for logs, e.g. the LED or HID path.
    fn describe(&self) -> String {
        std::any::type_name::<Self>()
            .rsplit("::")
            .next()
            .unwrap_or("light")
            .to_string()
    }
}

#[async_trait]
impl<D: LightDevice + ?Sized> LightDevice for Arc<D> {
    async fn fade_to(&self, color: Color, duration: Duration) -> Result<(), DeviceError> {
        (**self).fade_to(color, duration).await
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

#[async_trait]
impl<D: LightDevice + ?Sized> LightDevice for Box<D> {
    async fn fade_to(&self, color: Color, duration: Duration) -> Result<(), DeviceError> {
        (**self).fade_to(color, duration).await
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}
