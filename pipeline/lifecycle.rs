use std::sync::{
    atomic::{AtomicU8, Ordering},
    Arc,
};

const IDLE: u8 = 0;
const RUNNING: u8 = 1;
const TERMINATION_REQUESTED: u8 = 2;

/// Lifecycle states of one pipeline instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// No call in flight.
    Idle,
    /// Exactly one `generate_plan` call is executing.
    Running,
    /// A call is executing and termination has been requested.
    TerminationRequested,
}

impl LifecycleState {
    const fn from_raw(raw: u8) -> Self {
        match raw {
            RUNNING => Self::Running,
            TERMINATION_REQUESTED => Self::TerminationRequested,
            _ => Self::Idle,
        }
    }
}

/// Lock-free tri-state lifecycle flag shared across threads.
///
/// The idle→running transition is a compare-and-swap, so at most one call
/// can own the running state at a time.
#[derive(Debug, Clone, Default)]
pub struct LifecycleFlag {
    state: Arc<AtomicU8>,
}

impl LifecycleFlag {
    /// Creates a flag in the idle state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    #[must_use]
    pub fn current(&self) -> LifecycleState {
        LifecycleState::from_raw(self.state.load(Ordering::Acquire))
    }

    /// Attempts the idle→running transition; false when a call is in flight.
    #[must_use]
    pub fn try_begin(&self) -> bool {
        self.state
            .compare_exchange(IDLE, RUNNING, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Requests cooperative termination of the in-flight call.
    ///
    /// Advisory only; returns false (no-op) when no call is running.
    pub fn request_termination(&self) -> bool {
        self.state
            .compare_exchange(
                RUNNING,
                TERMINATION_REQUESTED,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok()
    }

    /// Unconditionally returns the flag to idle.
    pub fn finish(&self) {
        self.state.store(IDLE, Ordering::Release);
    }

    /// Whether a call is in flight (running or termination-requested).
    #[must_use]
    pub fn is_engaged(&self) -> bool {
        self.state.load(Ordering::Acquire) != IDLE
    }

    /// Returns a token observing this flag's termination requests.
    #[must_use]
    pub fn cancellation_token(&self) -> CancellationToken {
        CancellationToken {
            state: Arc::clone(&self.state),
        }
    }
}

/// Cooperative cancellation token polled by solvers and adapters.
///
/// Cancellation is observed, never enforced: a capability that does not poll
/// runs to completion regardless.
#[derive(Debug, Clone)]
pub struct CancellationToken {
    state: Arc<AtomicU8>,
}

impl CancellationToken {
    /// Creates a token that can never be cancelled, for standalone use.
    #[must_use]
    pub fn inert() -> Self {
        Self {
            state: Arc::new(AtomicU8::new(RUNNING)),
        }
    }

    /// Whether termination has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.state.load(Ordering::Acquire) == TERMINATION_REQUESTED
    }
}

/// RAII guard restoring the flag to idle on every exit path.
#[derive(Debug)]
pub struct LifecycleResetGuard {
    flag: LifecycleFlag,
}

impl LifecycleResetGuard {
    /// Arms a guard over a flag that was just moved to running.
    #[must_use]
    pub const fn new(flag: LifecycleFlag) -> Self {
        Self { flag }
    }
}

impl Drop for LifecycleResetGuard {
    fn drop(&mut self) {
        self.flag.finish();
    }
}
