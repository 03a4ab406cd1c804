//! Presentation state for the stateful nodes.
//!
//! The parsed tree never changes. A viewer keeps one [`SpoilerState`] per
//! spoiler it shows and one [`CountdownTicker`] per countdown.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDateTime;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::countdown::{Countdown, Reading};

const TICK: Duration = Duration::from_secs(1);

/// Whether one spoiler is revealed. Spoilers start hidden.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpoilerState {
    revealed: bool,
}

impl SpoilerState {
    pub fn toggle(&mut self) {
        self.revealed = !self.revealed;
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed
    }
}

/// Source of "now" for countdowns.
pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> NaiveDateTime;
}

/// Local wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        chrono::Local::now().naive_local()
    }
}

/// Re-evaluates a countdown once a second and publishes its text.
///
/// A countdown to a target stops ticking after it has published
/// [`EXPIRED_TEXT`](crate::countdown::EXPIRED_TEXT). Dropping the ticker
/// stops its task.
pub struct CountdownTicker {
    clock: Arc<dyn Clock>,
    sender: watch::Sender<String>,
    task: JoinHandle<()>,
}

impl CountdownTicker {
    /// Starts ticking on the current tokio runtime.
    pub fn spawn(countdown: Countdown, clock: Arc<dyn Clock>) -> Self {
        let (sender, _) = watch::channel(countdown.text_at(clock.now()));
        let task = start(countdown, Arc::clone(&clock), sender.clone());
        Self {
            clock,
            sender,
            task,
        }
    }

    /// The most recently published text.
    pub fn text(&self) -> String {
        self.sender.borrow().clone()
    }

    /// A receiver that is notified on every published change.
    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.sender.subscribe()
    }

    /// Replaces the countdown: the old task is cancelled and a new one
    /// starts from the new parameters.
    pub fn rearm(&mut self, countdown: Countdown) {
        self.task.abort();
        self.sender.send_replace(countdown.text_at(self.clock.now()));
        self.task = start(countdown, Arc::clone(&self.clock), self.sender.clone());
        log::debug!("Countdown rearmed for {}", countdown.target);
    }

    /// True once the ticking task has ended.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for CountdownTicker {
    fn drop(&mut self) {
        self.task.abort();
    }
}

fn start(
    countdown: Countdown,
    clock: Arc<dyn Clock>,
    sender: watch::Sender<String>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        if countdown.reading(clock.now()) == Reading::Expired {
            return;
        }
        let mut interval = tokio::time::interval(TICK);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately.
        interval.tick().await;
        loop {
            interval.tick().await;
            let now = clock.now();
            sender.send_replace(countdown.text_at(now));
            if countdown.reading(now) == Reading::Expired {
                log::debug!("Countdown to {} expired", countdown.target);
                break;
            }
        }
    })
}
