//! Cancellable deferred action for click-vs-drag disambiguation.
//!
//! The controller never sleeps or polls. Arming the [`DragTimer`] asks the
//! host's [`Scheduler`] to deliver `InputEvent::TimerElapsed(token)` after
//! a delay. The timer has one slot: arming again cancels the previous
//! request, and a token that is no longer live is ignored when it arrives.

use std::time::Duration;

/// Identifies one scheduled firing. Tokens are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerToken(u64);

/// Host-side timer service (a `setTimeout` wrapper, an event-loop timer
/// wheel, or [`ManualScheduler`]).
pub trait Scheduler {
    /// Deliver `TimerElapsed(token)` once `delay` has passed.
    fn schedule(&mut self, token: TimerToken, delay: Duration);

    /// Withdraw a pending delivery. Unknown or already-fired tokens are a
    /// no-op.
    fn cancel(&mut self, token: TimerToken);
}

/// Single-slot timer handle owned by the controller.
#[derive(Debug, Default)]
pub struct DragTimer {
    live: Option<TimerToken>,
    issued: u64,
}

impl DragTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new countdown, cancelling any live one.
    pub fn arm(&mut self, scheduler: &mut dyn Scheduler, delay: Duration) -> TimerToken {
        self.cancel(scheduler);
        let token = TimerToken(self.issued);
        self.issued += 1;
        scheduler.schedule(token, delay);
        self.live = Some(token);
        token
    }

    /// Cancel the live countdown. Returns whether one was live.
    pub fn cancel(&mut self, scheduler: &mut dyn Scheduler) -> bool {
        match self.live.take() {
            Some(token) => {
                scheduler.cancel(token);
                true
            }
            None => false,
        }
    }

    /// Consume an elapsed token. True only for the live one.
    pub fn fire(&mut self, token: TimerToken) -> bool {
        if self.live == Some(token) {
            self.live = None;
            true
        } else {
            false
        }
    }

    pub fn is_armed(&self) -> bool {
        self.live.is_some()
    }
}

// ─── Manual scheduler ────────────────────────────────────────────────────

/// Deadline queue driven by explicit clock advances. Suits hosts that
/// already run their own frame loop, and tests.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    now: Duration,
    pending: Vec<(Duration, TimerToken)>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Time elapsed since creation.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Number of scheduled, not yet delivered tokens.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Move the clock forward and return the tokens now due, earliest
    /// deadline first.
    pub fn advance(&mut self, elapsed: Duration) -> Vec<TimerToken> {
        self.now += elapsed;
        let now = self.now;
        let mut due: Vec<(Duration, TimerToken)> = Vec::new();
        self.pending.retain(|&entry| {
            if entry.0 <= now {
                due.push(entry);
                false
            } else {
                true
            }
        });
        due.sort();
        due.into_iter().map(|(_, token)| token).collect()
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&mut self, token: TimerToken, delay: Duration) {
        self.pending.push((self.now + delay, token));
    }

    fn cancel(&mut self, token: TimerToken) {
        self.pending.retain(|&(_, t)| t != token);
    }
}
