//! Fake lights for controller and pipeline tests.

use async_trait::async_trait;
use beacon_core::{Color, DeviceError, LightDevice};
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

/// Records every fade it is asked to perform and takes `duration` to finish it.
#[derive(Default)]
pub(crate) struct RecordingLight {
    issued: Mutex<Vec<(Color, Duration)>>,
    completed: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    failing: AtomicBool,
}

impl RecordingLight {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn failing() -> Arc<Self> {
        let light = Self::new();
        light.set_failing(true);
        light
    }

    pub(crate) fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub(crate) fn issued(&self) -> Vec<(Color, Duration)> {
        self.issued.lock().clone()
    }

    pub(crate) fn colors(&self) -> Vec<Color> {
        self.issued.lock().iter().map(|(color, _)| *color).collect()
    }

    pub(crate) fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    /// Highest number of fades ever running at the same time.
    pub(crate) fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LightDevice for RecordingLight {
    async fn fade_to(&self, color: Color, duration: Duration) -> Result<(), DeviceError> {
        self.issued.lock().push((color, duration));
        if self.failing.load(Ordering::SeqCst) {
            return Err(DeviceError::Lost("usb disconnected".to_string()));
        }

        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(running, Ordering::SeqCst);
        tokio::time::sleep(duration).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.completed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Accepts fades and never reports them finished.
#[derive(Default)]
pub(crate) struct StuckLight {
    pub(crate) attempts: AtomicUsize,
}

#[async_trait]
impl LightDevice for StuckLight {
    async fn fade_to(&self, _color: Color, _duration: Duration) -> Result<(), DeviceError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        std::future::pending::<()>().await;
        Ok(())
    }
}
