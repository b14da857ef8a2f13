use async_trait::async_trait;
use beacon_core::{Color, DeviceError, LightDevice};
use std::time::Duration;
use tracing::info;

/// Dry-run light: logs each fade and takes as long as a real one would.
#[derive(Debug, Clone, Default)]
pub struct LogLight {
    label: String,
}

impl LogLight {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

#[async_trait]
impl LightDevice for LogLight {
    async fn fade_to(&self, color: Color, duration: Duration) -> Result<(), DeviceError> {
        info!(
            light = %self.label,
            "Fade to #{:02x}{:02x}{:02x} over {}ms",
            color.r,
            color.g,
            color.b,
            duration.as_millis()
        );
        tokio::time::sleep(duration).await;
        Ok(())
    }

    fn describe(&self) -> String {
        format!("log:{}", self.label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use beacon_core::color;
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn fade_takes_its_duration() {
        let light = LogLight::new("desk");
        let started = Instant::now();

        light
            .fade_to(color::EXCEPTION, Duration::from_millis(1500))
            .await
            .unwrap();

        assert!(started.elapsed() >= Duration::from_millis(1500));
        assert_eq!(light.describe(), "log:desk");
    }
}
