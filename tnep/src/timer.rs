// tnep/src/timer.rs

//! Waiting-time derivation and the deadline-driven protocol timer.
//!
//! The timer never runs on its own thread: the dispatch loop asks it how long
//! it may block (`remaining_wait`) and polls it after waking up.

use std::time::{Duration, Instant};

use log::trace;

use crate::constants::{MAX_WAIT_TIME_CODE, MAX_WAIT_TIME_EXT_CODE};
use crate::types::ServiceParam;

/// Minimum waiting time for a WT code: 2^(WT/4 - 1) ms.
pub fn min_wait_time(code: u8) -> Duration {
    let wt = code.min(MAX_WAIT_TIME_CODE) as f64;
    // 2^(WT/4 - 1) ms == 500_000 * 2^(WT/4) ns
    let nanos = (500_000f64 * 2f64.powf(wt / 4.0)).round();
    Duration::from_nanos(nanos as u64)
}

/// Number of waiting periods for an N_wait code: the first wait plus every
/// allowed extension.
pub fn max_retries(code: u8) -> u8 {
    code.min(MAX_WAIT_TIME_EXT_CODE) + 1
}

/// Poll cadence of one service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitTiming {
    pub interval: Duration,
    pub max_retries: u8,
}

impl WaitTiming {
    pub fn new(interval: Duration, max_retries: u8) -> Self {
        Self {
            interval,
            max_retries: max_retries.max(1),
        }
    }

    pub fn from_param(param: &ServiceParam) -> Self {
        Self::new(
            min_wait_time(param.min_waiting_time),
            max_retries(param.max_waiting_time_ext),
        )
    }
}

/// What a timer expiry means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// One waiting period elapsed; budget left.
    Tick,
    /// The last waiting period elapsed; the timer stopped.
    Expired,
}

#[derive(Debug, Clone)]
pub struct ProtocolTimer {
    timing: WaitTiming,
    remaining: u8,
    deadline: Option<Instant>,
}

impl Default for ProtocolTimer {
    fn default() -> Self {
        Self::new(WaitTiming::new(Duration::ZERO, 1))
    }
}

impl ProtocolTimer {
    pub fn new(timing: WaitTiming) -> Self {
        Self {
            timing,
            remaining: timing.max_retries,
            deadline: None,
        }
    }

    /// Set the cadence used by the next `start`.
    pub fn configure(&mut self, timing: WaitTiming) {
        self.timing = timing;
    }

    pub fn timing(&self) -> WaitTiming {
        self.timing
    }

    /// Arm from `now`, discarding any countdown in flight.
    pub fn start_at(&mut self, now: Instant) {
        self.remaining = self.timing.max_retries;
        self.deadline = Some(now + self.timing.interval);
        trace!(
            "timer armed: {:?} x{}",
            self.timing.interval, self.timing.max_retries
        );
    }

    pub fn start(&mut self) {
        self.start_at(Instant::now());
    }

    pub fn stop(&mut self) {
        self.deadline = None;
    }

    pub fn is_running(&self) -> bool {
        self.deadline.is_some()
    }

    /// Waiting periods left, including the one in progress.
    pub fn remaining(&self) -> u8 {
        self.remaining
    }

    /// Time until the next expiry, `None` when stopped.
    pub fn remaining_wait(&self, now: Instant) -> Option<Duration> {
        self.deadline.map(|d| d.saturating_duration_since(now))
    }

    /// Report an expiry if the deadline has passed and re-arm for the next
    /// waiting period while budget is left.
    pub fn poll(&mut self, now: Instant) -> Option<TimerEvent> {
        let deadline = self.deadline?;
        if now < deadline {
            return None;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.deadline = None;
            Some(TimerEvent::Expired)
        } else {
            self.deadline = Some(now + self.timing.interval);
            Some(TimerEvent::Tick)
        }
    }
}
