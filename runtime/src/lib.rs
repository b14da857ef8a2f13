//! # Beacon Runtime
//!
//! The async half of the beacon: the [`BeaconController`] that owns the
//! light, the emergency [`AnimationHandle`], the [`PollScheduler`] and the
//! per-tick [`Beacon`] pipeline that ties them to a fetcher and classifier.

pub mod animation;
pub mod beacon;
pub mod controller;
pub mod scheduler;

#[cfg(test)]
mod test_support;

pub use animation::AnimationHandle;
pub use beacon::{Beacon, resolve};
pub use controller::{BeaconController, FadeTimings};
pub use scheduler::{PollScheduler, PollTask, TickFn, tick_fn};

pub mod prelude {
    pub use crate::beacon::Beacon;
    pub use crate::controller::{BeaconController, FadeTimings};
    pub use crate::scheduler::PollScheduler;
    pub use tokio_util::sync::CancellationToken;
}
