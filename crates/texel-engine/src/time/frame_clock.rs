use std::time::{Duration, Instant};

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Time since the previous tick in seconds, clamped.
    pub dt: f32,

    /// Seconds since the clock was created. Not clamped.
    pub elapsed: f32,

    /// Monotonic timestamp taken at the tick.
    pub now: Instant,

    /// Monotonic frame counter, starting at 0.
    pub frame_index: u64,
}

/// Frame clock producing `FrameTime` snapshots.
///
/// Delta time is clamped to avoid pathological values when the application is paused
/// by the debugger, minimized, or stalls. Elapsed time follows the wall clock so
/// time-driven animation stays in sync with it.
#[derive(Debug, Clone)]
pub struct FrameClock {
    start: Instant,
    last: Instant,
    frame_index: u64,
    dt_min: Duration,
    dt_max: Duration,
}

impl FrameClock {
    /// Creates a clock clamping `dt` to `[100µs, 250ms]`.
    pub fn new() -> Self {
        Self::with_clamps(Duration::from_micros(100), Duration::from_millis(250))
    }

    /// Creates a clock with custom delta-time clamps.
    pub fn with_clamps(dt_min: Duration, dt_max: Duration) -> Self {
        debug_assert!(dt_min <= dt_max);
        let now = Instant::now();
        Self {
            start: now,
            last: now,
            frame_index: 0,
            dt_min,
            dt_max,
        }
    }

    /// Resets the delta baseline without touching elapsed time.
    ///
    /// Useful after the event loop resumes from suspension.
    pub fn reset(&mut self) {
        self.last = Instant::now();
    }

    /// Advances the clock and returns a new `FrameTime`.
    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    fn tick_at(&mut self, now: Instant) -> FrameTime {
        let dt = now
            .saturating_duration_since(self.last)
            .clamp(self.dt_min, self.dt_max);

        self.last = now;

        let ft = FrameTime {
            dt: dt.as_secs_f32(),
            elapsed: now.saturating_duration_since(self.start).as_secs_f32(),
            now,
            frame_index: self.frame_index,
        };

        self.frame_index = self.frame_index.wrapping_add(1);

        ft
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

    fn clock() -> FrameClock {
        FrameClock::with_clamps(Duration::from_millis(1), Duration::from_millis(100))
    }

    #[test]
    fn frame_index_counts_from_zero() {
        let mut c = clock();
        let base = c.start;
        assert_eq!(c.tick_at(base + Duration::from_millis(10)).frame_index, 0);
        assert_eq!(c.tick_at(base + Duration::from_millis(20)).frame_index, 1);
        assert_eq!(c.tick_at(base + Duration::from_millis(30)).frame_index, 2);
    }

    #[test]
    fn dt_is_time_between_ticks() {
        let mut c = clock();
        let base = c.start;
        c.tick_at(base + Duration::from_millis(10));
        let ft = c.tick_at(base + Duration::from_millis(26));
        assert!((ft.dt - 0.016).abs() < 1e-6);
    }

    #[test]
    fn dt_clamped_to_max_after_stall() {
        let mut c = clock();
        let ft = c.tick_at(c.start + Duration::from_secs(5));
        assert!((ft.dt - 0.1).abs() < 1e-6);
    }

    #[test]
    fn dt_clamped_to_min_for_repeated_instant() {
        let mut c = clock();
        let t = c.start + Duration::from_millis(10);
        c.tick_at(t);
        let ft = c.tick_at(t);
        assert!((ft.dt - 0.001).abs() < 1e-6);
    }

    #[test]
    fn elapsed_is_not_clamped() {
        let mut c = clock();
        let ft = c.tick_at(c.start + Duration::from_secs(5));
        assert!((ft.elapsed - 5.0).abs() < 1e-4);
    }

    #[test]
    fn reset_keeps_elapsed_origin() {
        let mut c = clock();
        let start = c.start;
        c.reset();
        assert_eq!(c.start, start);
    }
}
