//! Probe deadline
//!
//! The only cancellation source in the system: a one-shot timer armed per
//! probe. It transitions from armed to fired exactly once, unless released
//! first, in which case it never fires. Dropping a [`Deadline`] frees the
//! timer on every exit path.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::time::{sleep, Sleep};

/// One-shot deadline armed for a single probe.
#[derive(Debug)]
pub struct Deadline {
    sleep: Pin<Box<Sleep>>,
    released: bool,
}

impl Deadline {
    /// Arm a deadline that fires after `timeout`.
    pub fn arm(timeout: Duration) -> Self {
        Self {
            sleep: Box::pin(sleep(timeout)),
            released: false,
        }
    }

    /// Resolves when the deadline fires. A released deadline never fires:
    /// the returned future stays pending so a racing `select!` always
    /// takes the other branch.
    pub fn fired(&mut self) -> Fired<'_> {
        Fired { deadline: self }
    }

    /// Disarm the timer. Idempotent; safe to call after firing.
    pub fn release(&mut self) {
        self.released = true;
    }

    /// Whether the timer has been disarmed.
    pub fn is_released(&self) -> bool {
        self.released
    }
}

/// Future returned by [`Deadline::fired`].
#[derive(Debug)]
pub struct Fired<'a> {
    deadline: &'a mut Deadline,
}

impl Future for Fired<'_> {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        if this.deadline.released {
            return Poll::Pending;
        }
        this.deadline.sleep.as_mut().poll(cx)
    }
}
