use std::{future, pin::Pin, time::Duration};

use tokio::time::{Instant, Sleep, sleep_until};

/// Deadline timer that can be pushed back.
///
/// The timer is owned by the task that awaits it, so there is no race between
/// a reset and a firing: a [`reset`](Self::reset) made before
/// [`fired`](Self::fired) completes postpones it, and a firing that was already
/// observed stays observed.
///
/// No task is spawned; dropping the timer is all the cleanup there is.
#[derive(Debug)]
pub struct ResetTimer {
    duration: Duration,
    sleep: Pin<Box<Sleep>>,
    armed: bool,
}

impl ResetTimer {
    /// Creates a running timer that first fires `duration` from now.
    #[must_use]
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            sleep: Box::pin(sleep_until(Instant::now() + duration)),
            armed: true,
        }
    }

    /// Creates a timer that does not fire until [`start`](Self::start) is called.
    #[must_use]
    pub fn stopped(duration: Duration) -> Self {
        Self {
            armed: false,
            ..Self::new(duration)
        }
    }

    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }

    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Returns when the timer fires next, or `None` if it is stopped.
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.armed.then(|| self.sleep.deadline())
    }

    /// Arms the timer to fire one duration from now.
    pub fn start(&mut self) {
        self.armed = true;
        self.rearm();
    }

    /// Pushes the next firing out to one duration from now.
    ///
    /// Has no effect on a stopped timer.
    pub fn reset(&mut self) {
        if self.armed {
            self.rearm();
        }
    }

    /// Changes the interval used from the next re-arm on.
    ///
    /// The firing already scheduled keeps its deadline.
    pub fn set_duration(&mut self, duration: Duration) {
        self.duration = duration;
    }

    pub fn stop(&mut self) {
        self.armed = false;
    }

    /// Completes when the deadline passes, then re-arms for one duration later.
    ///
    /// Never completes while the timer is stopped. Dropping the future before
    /// it completes leaves the deadline untouched, so it is safe to use in
    /// `tokio::select!`.
    pub async fn fired(&mut self) {
        if !self.armed {
            future::pending::<()>().await;
        }
        self.sleep.as_mut().await;
        self.rearm();
    }

    fn rearm(&mut self) {
        let deadline = Instant::now() + self.duration;
        self.sleep.as_mut().reset(deadline);
    }
}
