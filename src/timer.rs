use std::time::{Duration, Instant};

/// How long a removed cell keeps fading before another removal is accepted.
pub const REMOVAL_WINDOW: Duration = Duration::from_millis(300);
/// Delay between the deciding attempt and the round outcome dialog.
pub const OUTCOME_DELAY: Duration = Duration::from_millis(300);
/// Delay before the rules dialog is shown on startup.
pub const ONBOARDING_DELAY: Duration = Duration::from_millis(600);

#[derive(Clone, Copy, Debug)]
pub struct Timer {
    start_time: Instant,
}

impl Timer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
        }
    }

    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

/// A value that becomes available once, after a fixed delay.
#[derive(Debug)]
pub struct Deferred<T> {
    timer: Timer,
    delay: Duration,
    value: Option<T>,
}

impl<T> Deferred<T> {
    #[must_use]
    pub fn new(value: T, delay: Duration) -> Self {
        Self {
            timer: Timer::new(),
            delay,
            value: Some(value),
        }
    }

    #[must_use]
    pub fn is_due(&self) -> bool {
        self.value.is_some() && self.timer.elapsed() >= self.delay
    }

    /// The value still waiting to fire, if any.
    #[must_use]
    pub fn peek(&self) -> Option<&T> {
        self.value.as_ref()
    }

    /// Fraction of the delay that has elapsed, clamped to `0.0..=1.0`.
    #[must_use]
    pub fn progress(&self) -> f32 {
        if self.delay.is_zero() {
            return 1.0;
        }
        (self.timer.elapsed().as_secs_f32() / self.delay.as_secs_f32()).min(1.0)
    }

    /// Returns the value the first time this is called after the delay.
    pub fn poll(&mut self) -> Option<T> {
        if self.is_due() { self.value.take() } else { None }
    }
}
