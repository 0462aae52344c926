use std::time::Instant;

/// Frame timing handed to per-frame callbacks.
///
/// Wall-clock by default. [`Clock::advance`] steps it by a fixed amount
/// instead, which headless runs use for reproducible output.
#[derive(Debug, Clone)]
pub struct Clock {
    start: Instant,
    last: Instant,
    elapsed: f32,
    delta: f32,
}

impl Clock {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last: now,
            elapsed: 0.0,
            delta: 0.0,
        }
    }

    /// Seconds since the clock started.
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Seconds between the two most recent frames.
    pub fn delta(&self) -> f32 {
        self.delta
    }

    /// Sample the wall clock.
    pub fn tick(&mut self) {
        let now = Instant::now();
        self.delta = now.duration_since(self.last).as_secs_f32();
        self.elapsed = now.duration_since(self.start).as_secs_f32();
        self.last = now;
    }

    pub fn advance(&mut self, seconds: f32) {
        self.delta = seconds;
        self.elapsed += seconds;
        self.last = Instant::now();
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_zero() {
        let clock = Clock::new();
        assert_eq!(clock.elapsed(), 0.0);
        assert_eq!(clock.delta(), 0.0);
    }

    #[test]
    fn tick_is_monotonic() {
        let mut clock = Clock::new();
        clock.tick();
        let first = clock.elapsed();
        clock.tick();
        assert!(clock.elapsed() >= first);
        assert!(clock.delta() >= 0.0);
    }

    #[test]
    fn fixed_steps_accumulate() {
        let mut clock = Clock::new();
        for _ in 0..4 {
            clock.advance(0.25);
        }
        assert!((clock.elapsed() - 1.0).abs() < 1e-6);
        assert_eq!(clock.delta(), 0.25);
    }
}
