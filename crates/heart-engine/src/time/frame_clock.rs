use std::time::{Duration, Instant};

/// Timing snapshot for one loop iteration.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Wall-clock time since the previous tick.
    pub elapsed: Duration,

    /// Monotonic timestamp taken at the tick.
    pub now: Instant,

    /// Monotonic tick counter.
    pub frame_index: u64,
}

impl FrameTime {
    /// Elapsed time in seconds.
    pub fn dt(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }
}

/// Monotonic clock producing `FrameTime` snapshots.
///
/// The scheduler owns one per loop run. By default elapsed time is reported
/// raw, since the accumulator has to see every nanosecond that passed; hosts
/// that want a bounded dt for their own simulation can build one
/// `with_clamps`.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Instant,
    frame_index: u64,
    dt_min: Duration,
    dt_max: Duration,
}

impl FrameClock {
    /// Creates an unclamped clock whose baseline is now.
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    /// Creates an unclamped clock with an explicit baseline.
    pub fn starting_at(last: Instant) -> Self {
        Self {
            last,
            frame_index: 0,
            dt_min: Duration::ZERO,
            dt_max: Duration::MAX,
        }
    }

    /// Creates a clock with custom elapsed-time clamps.
    ///
    /// - minimum prevents zero-dt behavior from tight loops on some platforms
    /// - maximum prevents simulation explosions after long stalls
    pub fn with_clamps(dt_min: Duration, dt_max: Duration) -> Self {
        debug_assert!(dt_min <= dt_max);
        Self {
            dt_min,
            dt_max,
            ..Self::new()
        }
    }

    /// Moves the baseline to now, so the next tick only measures time from
    /// this call onwards.
    pub fn reset(&mut self) {
        self.last = Instant::now();
    }

    /// Advances the clock to now.
    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    /// Advances the clock to `now`.
    pub fn tick_at(&mut self, now: Instant) -> FrameTime {
        let elapsed = now
            .saturating_duration_since(self.last)
            .clamp(self.dt_min, self.dt_max);

        self.last = now;

        let ft = FrameTime {
            elapsed,
            now,
            frame_index: self.frame_index,
        };

        self.frame_index = self.frame_index.wrapping_add(1);

        ft
    }

    /// Timestamp of the last tick (or the baseline).
    pub fn last(&self) -> Instant {
        self.last
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn tick_reports_elapsed_since_baseline() {
        let t0 = Instant::now();
        let mut clock = FrameClock::starting_at(t0);

        let a = clock.tick_at(t0 + ms(5));
        assert_eq!(a.elapsed, ms(5));
        assert_eq!(a.frame_index, 0);

        let b = clock.tick_at(t0 + ms(12));
        assert_eq!(b.elapsed, ms(7));
        assert_eq!(b.frame_index, 1);
        assert_eq!(clock.last(), t0 + ms(12));
    }

    #[test]
    fn going_backwards_saturates_to_zero() {
        let t0 = Instant::now() + ms(50);
        let mut clock = FrameClock::starting_at(t0);
        let ft = clock.tick_at(t0 - ms(10));
        assert_eq!(ft.elapsed, Duration::ZERO);
    }

    #[test]
    fn clamps_apply_both_ways() {
        let mut clock = FrameClock::with_clamps(ms(1), ms(100));
        let t0 = clock.last();

        assert_eq!(clock.tick_at(t0).elapsed, ms(1));
        assert_eq!(clock.tick_at(t0 + ms(1_000)).elapsed, ms(100));
    }

    #[test]
    fn reset_moves_baseline_to_now() {
        let t0 = Instant::now() - ms(500);
        let mut clock = FrameClock::starting_at(t0);
        clock.reset();
        assert!(clock.last() > t0);
        assert!(clock.tick().elapsed < ms(500));
    }

    #[test]
    fn dt_is_seconds() {
        let t0 = Instant::now();
        let mut clock = FrameClock::starting_at(t0);
        let ft = clock.tick_at(t0 + ms(250));
        assert!((ft.dt() - 0.25).abs() < 1e-6);
    }
}
