//! # Beacon Controller
//!
//! Sole writer of the light. Every change of output goes through
//! [`BeaconController::apply_state`], which decides between a single steady
//! fade and the emergency pulse, and makes sure the two never overlap.

use crate::animation::{AnimationHandle, fade};
use beacon_core::color;
use beacon_core::{BeaconConfig, DisplayState, LightDevice};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Fade durations used by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FadeTimings {
    /// Steady-state color changes.
    pub fade: Duration,
    /// Each half-cycle of the emergency pulse.
    pub emergency: Duration,
    /// Each step of the startup flash.
    pub attention: Duration,
}

impl Default for FadeTimings {
    fn default() -> Self {
        Self {
            fade: Duration::from_millis(500),
            emergency: Duration::from_millis(1500),
            attention: Duration::from_millis(500),
        }
    }
}

impl From<&BeaconConfig> for FadeTimings {
    fn from(config: &BeaconConfig) -> Self {
        Self {
            fade: Duration::from_millis(config.fade_ms),
            emergency: Duration::from_millis(config.emergency_fade_ms),
            attention: Duration::from_millis(config.attention_fade_ms),
        }
    }
}

pub struct BeaconController<D: LightDevice> {
    device: Arc<D>,
    timings: FadeTimings,
    /// Extra time a device call may take beyond its fade before it counts as hung.
    device_grace: Option<Duration>,
    current: Option<DisplayState>,
    animation: Option<AnimationHandle>,
}

impl<D: LightDevice> BeaconController<D> {
    pub fn new(device: D) -> Self {
        Self::from_shared(Arc::new(device))
    }

    pub fn from_shared(device: Arc<D>) -> Self {
        Self {
            device,
            timings: FadeTimings::default(),
            device_grace: None,
            current: None,
            animation: None,
        }
    }

    pub fn with_timings(mut self, timings: FadeTimings) -> Self {
        self.timings = timings;
        self
    }

    /// Bound every device call to its fade duration plus `grace`.
    pub fn with_device_timeout(mut self, grace: Option<Duration>) -> Self {
        self.device_grace = grace;
        self
    }

    /// The state most recently requested, if any.
    pub fn current_state(&self) -> Option<&DisplayState> {
        self.current.as_ref()
    }

    /// True while an emergency pulse task is alive.
    pub fn is_animating(&self) -> bool {
        self.animation
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Render `state` on the light.
    ///
    /// Never fails: device errors are logged and the state is still recorded
    /// as current, so the next tick simply tries again.
    pub async fn apply_state(&mut self, state: DisplayState) {
        match state.color() {
            None => self.start_emergency(),
            Some(target) => {
                self.stop_animation().await;
                match &state {
                    DisplayState::TransientError(reason) => warn!("{reason}"),
                    other => info!(state = %other, "{}", other.reason()),
                }
                if let Err(err) = fade(
                    self.device.as_ref(),
                    target,
                    self.timings.fade,
                    self.device_grace,
                )
                .await
                {
                    warn!(error = %err, state = %state, "Failed to set light color");
                }
            }
        }
        self.current = Some(state);
    }

    /// Brief flash to show the daemon is alive. Used once at startup.
    pub async fn pulse_attention(&mut self) {
        self.stop_animation().await;
        for target in [color::ATTENTION, color::OFF] {
            if let Err(err) = fade(
                self.device.as_ref(),
                target,
                self.timings.attention,
                self.device_grace,
            )
            .await
            {
                warn!(error = %err, "Attention pulse failed");
                return;
            }
        }
    }

    /// Stop any pulse and wait for it to exit.
    pub async fn shutdown(&mut self) {
        self.stop_animation().await;
    }

    fn start_emergency(&mut self) {
        if self.is_animating() {
            debug!("Emergency animation already running");
            return;
        }
        info!("Declaring emergency on {}", self.device.describe());
        self.animation = Some(AnimationHandle::spawn(
            self.device.clone(),
            self.timings.emergency,
            self.device_grace,
        ));
    }

    async fn stop_animation(&mut self) {
        if let Some(handle) = self.animation.take() {
            handle.stop().await;
        }
    }
}

impl<D: LightDevice> std::fmt::Debug for BeaconController<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BeaconController")
            .field("device", &self.device.describe())
            .field("current", &self.current)
            .field("animating", &self.is_animating())
            .finish()
    }
}
