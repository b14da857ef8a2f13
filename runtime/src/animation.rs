//! Emergency pulse
//!
//! The pulse is a spawned task that alternates the light between the
//! emergency color and off. Each fade is awaited before the next one is
//! issued, so a slow device slows the pulse instead of queueing commands.
//! Stopping is cooperative: the fade already sent to the device finishes,
//! and the task checks its [`CancellationToken`] before sending another.

use beacon_core::color::{self, Color};
use beacon_core::{DeviceError, LightDevice};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

const PHASES: [(Color, &str); 2] = [
    (color::EMERGENCY, "Hair Still on Fire! Wee!"),
    (color::OFF, "Ooo!"),
];

/// Ownership of the running pulse. At most one exists per controller.
///
/// Dropping the handle cancels the pulse without waiting for it.
pub struct AnimationHandle {
    token: CancellationToken,
    task: JoinHandle<()>,
}

impl AnimationHandle {
    /// Start pulsing `device`, one half-cycle every `step`.
    pub(crate) fn spawn<D: LightDevice>(
        device: Arc<D>,
        step: Duration,
        grace: Option<Duration>,
    ) -> Self {
        let token = CancellationToken::new();
        let task = tokio::spawn(pulse(device, step, grace, token.clone()));
        Self { token, task }
    }

    /// True once the task has exited, whether cancelled or not.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Cancel and wait until the task has exited.
    ///
    /// Returns after at most one in-flight fade completes (or times out).
    pub async fn stop(mut self) {
        self.token.cancel();
        if let Err(err) = (&mut self.task).await {
            if err.is_panic() {
                error!("Emergency animation panicked: {err}");
            }
        }
    }
}

impl Drop for AnimationHandle {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

impl std::fmt::Debug for AnimationHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnimationHandle")
            .field("cancelled", &self.token.is_cancelled())
            .field("finished", &self.task.is_finished())
            .finish()
    }
}

async fn pulse<D: LightDevice>(
    device: Arc<D>,
    step: Duration,
    grace: Option<Duration>,
    token: CancellationToken,
) {
    for (color, cry) in PHASES.iter().cycle() {
        if token.is_cancelled() {
            debug!("Emergency animation cancelled");
            return;
        }
        info!("{cry}");
        if let Err(err) = fade(device.as_ref(), *color, step, grace).await {
            warn!(error = %err, "Emergency fade failed");
            // Back off one step so a dead device cannot spin the loop.
            tokio::select! {
                _ = token.cancelled() => {
                    debug!("Emergency animation cancelled");
                    return;
                }
                _ = tokio::time::sleep(step) => {}
            }
        }
    }
}

/// One device call, optionally bounded by `duration + grace`.
pub(crate) async fn fade<D: LightDevice + ?Sized>(
    device: &D,
    color: Color,
    duration: Duration,
    grace: Option<Duration>,
) -> Result<(), DeviceError> {
    match grace {
        Some(grace) => {
            let limit = duration.saturating_add(grace);
            tokio::time::timeout(limit, device.fade_to(color, duration))
                .await
                .map_err(|_| DeviceError::Timeout(limit))?
        }
        None => device.fade_to(color, duration).await,
    }
}
