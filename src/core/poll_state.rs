//! Shared run state for the watch loop and the interrupt handler.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use tokio::sync::Notify;

/// Run flag plus the next scheduled fetch.
///
/// The interrupt handler is the only caller of [`PollState::request_stop`];
/// the watch loop owns scheduling.
#[derive(Debug)]
pub struct PollState {
    running: AtomicBool,
    next_update: Mutex<Option<Instant>>,
    stop: Notify,
}

impl Default for PollState {
    fn default() -> Self {
        Self::new()
    }
}

impl PollState {
    /// A running state with nothing scheduled.
    #[must_use]
    pub fn new() -> Self {
        Self {
            running: AtomicBool::new(true),
            next_update: Mutex::new(None),
            stop: Notify::new(),
        }
    }

    /// Whether the loop should keep going.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Stop the loop and wake everything waiting in [`Self::stopped`].
    pub fn request_stop(&self) {
        self.running.store(false, Ordering::SeqCst);
        self.stop.notify_waiters();
    }

    /// Record that the next fetch is due `interval` from now.
    pub fn schedule_next(&self, interval: Duration) {
        if let Ok(mut next) = self.next_update.lock() {
            *next = Some(Instant::now() + interval);
        }
    }

    /// Time left until the next fetch; zero when due or unscheduled.
    #[must_use]
    pub fn time_until_next(&self) -> Duration {
        self.next_update
            .lock()
            .ok()
            .and_then(|next| *next)
            .map_or(Duration::ZERO, |at| {
                at.saturating_duration_since(Instant::now())
            })
    }

    /// Resolve once a stop has been requested.
    pub async fn stopped(&self) {
        loop {
            let notified = self.stop.notified();
            if !self.is_running() {
                return;
            }
            notified.await;
        }
    }
}
