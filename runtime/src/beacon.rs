//! # Beacon: one poll of the dashboard, end to end
//!
//! `fetch → classify → apply_state`, strictly in that order within a tick.
//! Nothing escapes a tick: fetch and parse problems become a
//! [`DisplayState::TransientError`], device problems are logged by the
//! controller.

use crate::controller::BeaconController;
use crate::scheduler::{PollScheduler, PollTask};
use async_trait::async_trait;
use beacon_core::{
    BuildCounts, DisplayState, LightDevice, PollError, StatusClassifier, StatusFetcher, classify,
};
use std::error::Error;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, info, info_span, warn};

/// Map the result of one poll to what the light should show.
pub fn resolve(outcome: &Result<BuildCounts, PollError>) -> DisplayState {
    match outcome {
        Ok(counts) => classify(counts),
        Err(err) => DisplayState::TransientError(err.to_string()),
    }
}

/// `err` followed by each of its sources, `: `-separated.
fn failure_chain(err: &dyn Error) -> String {
    let mut chain = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        chain.push_str(": ");
        chain.push_str(&cause.to_string());
        source = cause.source();
    }
    chain
}

/// Startup line naming the target and the poll period.
fn watch_banner(target: &str, interval: Duration) -> String {
    let secs = interval.as_secs();
    if secs >= 60 && secs % 60 == 0 && interval.subsec_nanos() == 0 {
        format!("Watching {target} every {} minute(s).", secs / 60)
    } else {
        format!("Watching {target} every {}ms.", interval.as_millis())
    }
}

pub struct Beacon<F, C, D: LightDevice> {
    fetcher: F,
    classifier: C,
    controller: BeaconController<D>,
}

impl<F, C, D> Beacon<F, C, D>
where
    F: StatusFetcher,
    C: StatusClassifier,
    D: LightDevice,
{
    pub fn new(fetcher: F, classifier: C, controller: BeaconController<D>) -> Self {
        Self {
            fetcher,
            classifier,
            controller,
        }
    }

    pub fn controller(&self) -> &BeaconController<D> {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut BeaconController<D> {
        &mut self.controller
    }

    /// Fetch and classify without touching the light.
    pub async fn poll(&self) -> Result<BuildCounts, PollError> {
        let body = self.fetcher.fetch().await?;
        let counts = self.classifier.classify(&body)?;
        Ok(counts)
    }

    /// One full tick. Returns the state that was applied.
    pub async fn tick(&mut self) -> DisplayState {
        let span = info_span!("tick", id = %uuid::Uuid::new_v4());
        async {
            info!("Pinging...");
            let outcome = self.poll().await;
            match &outcome {
                Ok(counts) => {
                    info!("Done");
                    for line in counts.to_string().lines() {
                        info!("{line}");
                    }
                }
                Err(err) => warn!(cause = %failure_chain(err), "Poll failed"),
            }
            let state = resolve(&outcome);
            self.controller.apply_state(state.clone()).await;
            state
        }
        .instrument(span)
        .await
    }

    /// Startup flash followed by a single tick.
    pub async fn run_once(&mut self) -> DisplayState {
        self.controller.pulse_attention().await;
        let state = self.tick().await;
        self.controller.shutdown().await;
        state
    }

    /// Startup flash, then poll on `scheduler` until `shutdown` fires.
    pub async fn run(&mut self, scheduler: &PollScheduler, shutdown: &CancellationToken) {
        info!("{}", watch_banner(self.fetcher.target(), scheduler.interval()));
        self.controller.pulse_attention().await;
        scheduler.run(shutdown, self).await;
        self.controller.shutdown().await;
    }
}

#[async_trait]
impl<F, C, D> PollTask for Beacon<F, C, D>
where
    F: StatusFetcher,
    C: StatusClassifier,
    D: LightDevice,
{
    async fn tick(&mut self) {
        Beacon::tick(self).await;
    }
}
