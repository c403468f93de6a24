//! # Circuit Breaker
//!
//! Counts consecutive failures of an upstream. Once `failure_threshold` is
//! reached the circuit opens and calls are refused until `open_for` has
//! elapsed. After that a single trial call is let through: its success closes
//! the circuit and its failure re-opens it. Other calls are refused while the
//! trial is in flight.

use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    Closed,
    Open,
    HalfOpen,
}

#[derive(Debug)]
struct BreakerInner {
    consecutive_failures: u32,
    opened_at: Option<Instant>,
    trial_in_flight: bool,
}

#[derive(Debug)]
pub struct CircuitBreaker {
    name: &'static str,
    failure_threshold: u32,
    open_for: Duration,
    inner: Mutex<BreakerInner>,
}

/// Admission for one call, obtained from [`CircuitBreaker::acquire`].
///
/// Dropping it without recording an outcome (e.g. when the request is
/// cancelled) frees the half-open trial slot it may hold.
#[derive(Debug)]
pub struct CallPermit<'a> {
    breaker: &'a CircuitBreaker,
    trial: bool,
    settled: bool,
}

impl CallPermit<'_> {
    pub fn record_success(mut self) {
        self.settled = true;
        self.breaker.record_success();
    }

    pub fn record_failure(mut self) {
        self.settled = true;
        self.breaker.record_failure();
    }
}

impl Drop for CallPermit<'_> {
    fn drop(&mut self) {
        if self.trial && !self.settled {
            self.breaker.lock().trial_in_flight = false;
        }
    }
}

impl CircuitBreaker {
    pub fn new(name: &'static str, failure_threshold: u32, open_for: Duration) -> Self {
        Self {
            name,
            failure_threshold: failure_threshold.max(1),
            open_for,
            inner: Mutex::new(BreakerInner {
                consecutive_failures: 0,
                opened_at: None,
                trial_in_flight: false,
            }),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BreakerInner> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn state(&self) -> CircuitState {
        let inner = self.lock();
        match inner.opened_at {
            None => CircuitState::Closed,
            Some(at) if at.elapsed() < self.open_for => CircuitState::Open,
            Some(_) => CircuitState::HalfOpen,
        }
    }

    // Some(true) when the admitted call is the half-open trial.
    fn admit(&self) -> Option<bool> {
        let mut inner = self.lock();
        match inner.opened_at {
            None => Some(false),
            Some(at) if at.elapsed() < self.open_for => None,
            Some(_) if inner.trial_in_flight => None,
            Some(_) => {
                info!(upstream = self.name, "Circuit breaker half-open; allowing a trial call");
                inner.trial_in_flight = true;
                Some(true)
            }
        }
    }

    /// Whether a call may be attempted right now.
    ///
    /// In the half-open state this claims the single trial slot, which stays
    /// taken until an outcome is recorded.
    pub fn allows_request(&self) -> bool {
        self.admit().is_some()
    }

    /// Like [`allows_request`](Self::allows_request), but returns a permit
    /// that releases the trial slot if it is dropped without an outcome.
    pub fn acquire(&self) -> Option<CallPermit<'_>> {
        self.admit().map(|trial| CallPermit {
            breaker: self,
            trial,
            settled: false,
        })
    }

    pub fn record_success(&self) {
        let mut inner = self.lock();
        if inner.opened_at.is_some() {
            info!(upstream = self.name, "Circuit breaker closed");
        }
        inner.consecutive_failures = 0;
        inner.opened_at = None;
        inner.trial_in_flight = false;
    }

    pub fn record_failure(&self) {
        let mut inner = self.lock();
        inner.consecutive_failures = inner.consecutive_failures.saturating_add(1);
        inner.trial_in_flight = false;
        if inner.consecutive_failures >= self.failure_threshold {
            warn!(
                upstream = self.name,
                failures = inner.consecutive_failures,
                "Circuit breaker opened"
            );
            inner.opened_at = Some(Instant::now());
        }
    }
}
