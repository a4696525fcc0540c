//! Submit gate.
//!
//! One editing session has at most one request in flight. [`SubmitGate::try_begin`] hands out
//! an [`InFlight`] guard; while it is alive every other attempt gets `None` and must not
//! dispatch anything. Dropping the guard, on any outcome, re-opens the gate.

use std::sync::atomic::{AtomicBool, Ordering};

/// In-flight flag for one editing session.
///
/// Shared by reference between concurrent submit attempts; only one of them can hold the
/// [`InFlight`] guard at a time.
#[derive(Debug, Default)]
pub struct SubmitGate {
    in_flight: AtomicBool,
}

impl SubmitGate {
    /// Creates an open gate.
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims the gate for one submission.
    ///
    /// # Returns
    ///
    /// `Some(InFlight)` if no submission was in flight; the gate stays closed until the guard
    /// is dropped. `None` if another submission holds the gate, in which case the caller must
    /// not send anything.
    pub fn try_begin(&self) -> Option<InFlight<'_>> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlight { gate: self })
    }

    /// Whether a guard is currently held.
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }
}

/// Held for the duration of one submission.
#[derive(Debug)]
#[must_use = "the gate re-opens as soon as the guard is dropped"]
pub struct InFlight<'a> {
    gate: &'a SubmitGate,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.gate.in_flight.store(false, Ordering::Release);
    }
}
