//! Poll Scheduler
//!
//! Fires a [`PollTask`] once immediately and then on a fixed period until
//! shut down. A tick that overruns delays the following ones instead of
//! causing a burst of catch-up ticks. Each tick runs behind an unwind
//! boundary, so a panic ends that tick only.

use async_trait::async_trait;
use futures_util::FutureExt;
use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

/// Smallest period the scheduler accepts; shorter values are clamped.
pub const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Work performed on every scheduler tick.
#[async_trait]
pub trait PollTask: Send {
    async fn tick(&mut self);
}

/// Adapter turning an async closure into a [`PollTask`].
pub struct TickFn<F>(F);

pub fn tick_fn<F, Fut>(f: F) -> TickFn<F>
where
    F: FnMut() -> Fut + Send,
    Fut: Future<Output = ()> + Send + 'static,
{
    TickFn(f)
}

#[async_trait]
impl<F, Fut> PollTask for TickFn<F>
where
    F: FnMut() -> Fut + Send,
    Fut: Future<Output = ()> + Send + 'static,
{
    async fn tick(&mut self) {
        (self.0)().await;
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PollScheduler {
    interval: Duration,
}

impl PollScheduler {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval: interval.max(MIN_INTERVAL),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Run `task` forever.
    pub async fn start<T: PollTask + ?Sized>(&self, task: &mut T) {
        self.run(&CancellationToken::new(), task).await;
    }

    /// Run `task` until `shutdown` fires. Returns the number of ticks started.
    ///
    /// A tick still running when `shutdown` fires is dropped at its next
    /// suspension point.
    pub async fn run<T: PollTask + ?Sized>(&self, shutdown: &CancellationToken, task: &mut T) -> u64 {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut ticks = 0u64;

        loop {
            tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                _ = ticker.tick() => {}
            }

            ticks += 1;
            debug!(tick = ticks, "Scheduler tick");
            let outcome = AssertUnwindSafe(task.tick()).catch_unwind();
            tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                result = outcome => {
                    if let Err(panic) = result {
                        error!(tick = ticks, "Tick panicked: {}", panic_message(panic.as_ref()));
                    }
                }
            }
        }

        debug!(ticks, "Scheduler stopped");
        ticks
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(message) = panic.downcast_ref::<&'static str>() {
        message
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.as_str()
    } else {
        "non-string panic payload"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    const FIVE_MINUTES: Duration = Duration::from_secs(300);

    struct Counter {
        ticks: Arc<AtomicU32>,
        panic_on: Option<u32>,
    }

    #[async_trait]
    impl PollTask for Counter {
        async fn tick(&mut self) {
            let n = self.ticks.fetch_add(1, Ordering::SeqCst) + 1;
            if self.panic_on == Some(n) {
                panic!("tick {n} exploded");
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn fires_immediately_then_every_interval() {
        let ticks = Arc::new(AtomicU32::new(0));
        let shutdown = CancellationToken::new();
        let mut counter = Counter {
            ticks: ticks.clone(),
            panic_on: None,
        };

        let token = shutdown.clone();
        let runner = tokio::spawn(async move {
            PollScheduler::new(FIVE_MINUTES).run(&token, &mut counter).await
        });

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), 1);

        tokio::time::sleep(FIVE_MINUTES * 2).await;
        assert_eq!(ticks.load(Ordering::SeqCst), 3);

        shutdown.cancel();
        assert_eq!(runner.await.unwrap(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn start_keeps_ticking_until_dropped() {
        let ticks = Arc::new(AtomicU32::new(0));
        let mut counter = Counter {
            ticks: ticks.clone(),
            panic_on: None,
        };
        let scheduler = PollScheduler::new(FIVE_MINUTES);

        let elapsed = tokio::time::timeout(
            FIVE_MINUTES * 2 + Duration::from_millis(10),
            scheduler.start(&mut counter),
        )
        .await;

        assert!(elapsed.is_err());
        assert_eq!(ticks.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn panicking_tick_does_not_stop_the_scheduler() {
        let ticks = Arc::new(AtomicU32::new(0));
        let shutdown = CancellationToken::new();
        let mut counter = Counter {
            ticks: ticks.clone(),
            panic_on: Some(1),
        };

        let token = shutdown.clone();
        let runner = tokio::spawn(async move {
            PollScheduler::new(FIVE_MINUTES).run(&token, &mut counter).await
        });

        tokio::time::sleep(FIVE_MINUTES + Duration::from_millis(10)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), 2);

        shutdown.cancel();
        assert_eq!(runner.await.unwrap(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_tick_delays_instead_of_bursting() {
        let ticks = Arc::new(AtomicU32::new(0));
        let seen = ticks.clone();
        let shutdown = CancellationToken::new();
        let token = shutdown.clone();

        let runner = tokio::spawn(async move {
            let mut task = tick_fn(move || {
                let ticks = seen.clone();
                async move {
                    ticks.fetch_add(1, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_secs(25)).await;
                }
            });
            PollScheduler::new(Duration::from_secs(10)).run(&token, &mut task).await
        });

        // Ticks start at 0s, 25s and 50s; the missed 10s slots are not replayed.
        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), 3);

        shutdown.cancel();
        assert_eq!(runner.await.unwrap(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_before_start_runs_nothing() {
        let ticks = Arc::new(AtomicU32::new(0));
        let shutdown = CancellationToken::new();
        shutdown.cancel();
        let mut counter = Counter {
            ticks: ticks.clone(),
            panic_on: None,
        };

        let ran = PollScheduler::new(FIVE_MINUTES).run(&shutdown, &mut counter).await;

        assert_eq!(ran, 0);
        assert_eq!(ticks.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn zero_interval_is_clamped() {
        assert_eq!(PollScheduler::new(Duration::ZERO).interval(), MIN_INTERVAL);
    }
}
