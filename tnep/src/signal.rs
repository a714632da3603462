// tnep/src/signal.rs

//! Pending event set: one slot per signal kind.
//!
//! Raising only sets a slot and wakes the waiter, so it may happen from any
//! thread while the engine sits in `process()`. Consumption and every state
//! transition happen inside `process()`.

use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use crate::timer::{ProtocolTimer, TimerEvent};

/// Value carried by the service signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceSignal {
    Select(usize),
    Deselect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Service(ServiceSignal),
    /// Tag role: the reader finished writing a message.
    MessageRx,
    /// Queued outbound records are ready to be sent.
    MessageTx,
    Timer(TimerEvent),
}

/// Slot index of each signal; also the fixed dispatch order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalKind {
    Service = 0,
    MessageRx = 1,
    MessageTx = 2,
    Timer = 3,
}

const SLOTS: usize = 4;

impl Signal {
    pub fn kind(&self) -> SignalKind {
        match self {
            Self::Service(_) => SignalKind::Service,
            Self::MessageRx => SignalKind::MessageRx,
            Self::MessageTx => SignalKind::MessageTx,
            Self::Timer(_) => SignalKind::Timer,
        }
    }
}

#[derive(Debug, Default)]
pub struct Signals {
    slots: Mutex<[Option<Signal>; SLOTS]>,
    ready: Condvar,
}

impl Signals {
    pub fn new() -> Self {
        Self::default()
    }

    fn slots(&self) -> MutexGuard<'_, [Option<Signal>; SLOTS]> {
        // Slots hold plain values, a panicking holder cannot leave them torn.
        self.slots.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Set the slot of `signal`'s kind unless it is already pending.
    /// Returns false when the raise coalesced into a pending one.
    pub fn raise(&self, signal: Signal) -> bool {
        let mut slots = self.slots();
        let slot = &mut slots[signal.kind() as usize];
        if slot.is_some() {
            return false;
        }
        *slot = Some(signal);
        drop(slots);
        self.ready.notify_all();
        true
    }

    pub fn is_pending(&self, kind: SignalKind) -> bool {
        self.slots()[kind as usize].is_some()
    }

    /// Block until any slot is set or `timeout` elapses. Returns whether a
    /// signal is pending.
    pub fn wait(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut slots = self.slots();
        loop {
            if slots.iter().any(Option::is_some) {
                return true;
            }
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            slots = match self.ready.wait_timeout(slots, deadline - now) {
                Ok((guard, _)) => guard,
                Err(poisoned) => poisoned.into_inner().0,
            };
        }
    }

    /// Take and clear every pending slot, in dispatch order.
    pub fn take_all(&self) -> Vec<Signal> {
        let mut slots = self.slots();
        slots.iter_mut().filter_map(Option::take).collect()
    }

    pub fn clear(&self) {
        *self.slots() = [None; SLOTS];
    }
}

/// One bounded wait of a dispatch loop: block for at most `timeout`, waking
/// early at the timer deadline, then return every pending signal in
/// dispatch order. An expired timer is raised before the slots are taken.
pub fn next_signals(
    signals: &Signals,
    timer: &mut ProtocolTimer,
    timeout: Duration,
) -> Vec<Signal> {
    let wait = match timer.remaining_wait(Instant::now()) {
        Some(remaining) => remaining.min(timeout),
        None => timeout,
    };
    signals.wait(wait);
    if let Some(event) = timer.poll(Instant::now()) {
        signals.raise(Signal::Timer(event));
    }
    signals.take_all()
}

/// Cloneable handle for raising signals from other threads or callbacks.
#[derive(Debug, Clone)]
pub struct Signaller {
    signals: Arc<Signals>,
}

impl Signaller {
    pub(crate) fn new(signals: Arc<Signals>) -> Self {
        Self { signals }
    }

    pub fn raise(&self, signal: Signal) -> bool {
        self.signals.raise(signal)
    }

    pub fn deselect(&self) -> bool {
        self.raise(Signal::Service(ServiceSignal::Deselect))
    }

    pub fn message_ready(&self) -> bool {
        self.raise(Signal::MessageTx)
    }
}
