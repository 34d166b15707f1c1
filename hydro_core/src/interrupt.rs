//! # Cooperative Cancellation
//!
//! Long sweeps (many drafts, fine heel grids) poll an [`Interrupt`] between
//! iterations. When it fires the sweep stops and returns
//! [`HydroError::Cancelled`](crate::errors::HydroError::Cancelled); no partial
//! curve or table is ever returned.
//!
//! ```rust
//! use hydro_core::interrupt::{CancelToken, Interrupt};
//!
//! let token = CancelToken::new();
//! let handle = token.clone();
//! assert!(!token.is_interrupted());
//! handle.cancel();
//! assert!(token.is_interrupted());
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Polled between sweep iterations.
pub trait Interrupt: Sync {
    fn is_interrupted(&self) -> bool;
}

/// Never fires.
#[derive(Debug, Clone, Copy, Default)]
pub struct Never;

impl Interrupt for Never {
    fn is_interrupted(&self) -> bool {
        false
    }
}

/// Shared flag another thread can raise.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        CancelToken::default()
    }

    /// Request cancellation; every clone observes it
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }
}

impl Interrupt for CancelToken {
    fn is_interrupted(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// Fires once a wall-clock deadline has passed.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    /// `None` when the deadline lies beyond what `Instant` can represent
    at: Option<Instant>,
}

impl Deadline {
    /// Deadline `timeout` from now; a timeout too large for the clock never fires
    pub fn after(timeout: Duration) -> Self {
        Deadline {
            at: Instant::now().checked_add(timeout),
        }
    }

    pub fn at(at: Instant) -> Self {
        Deadline { at: Some(at) }
    }
}

impl Interrupt for Deadline {
    fn is_interrupted(&self) -> bool {
        self.at.is_some_and(|at| Instant::now() >= at)
    }
}

/// Fires on every poll after the first `polls`.
#[cfg(test)]
pub(crate) struct AfterPolls {
    remaining: std::sync::atomic::AtomicUsize,
}

#[cfg(test)]
impl AfterPolls {
    pub(crate) fn new(polls: usize) -> Self {
        AfterPolls {
            remaining: std::sync::atomic::AtomicUsize::new(polls),
        }
    }
}

#[cfg(test)]
impl Interrupt for AfterPolls {
    fn is_interrupted(&self) -> bool {
        self.remaining
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| n.checked_sub(1))
            .is_err()
    }
}

impl<T: Interrupt + ?Sized> Interrupt for &T {
    fn is_interrupted(&self) -> bool {
        (**self).is_interrupted()
    }
}
