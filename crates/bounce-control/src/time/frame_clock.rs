use std::time::{Duration, Instant};

/// Timing of one animation tick.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Seconds since the previous tick, clamped.
    pub dt: f32,

    /// Monotonic timestamp taken at the tick.
    pub now: Instant,

    /// 1-based tick counter. Never decreases, not even across `reset`.
    pub frame_index: u64,
}

/// Produces `FrameTime` snapshots for one animation loop.
///
/// Delta time is clamped so a loop resumed after a long pause (or a debugger
/// stop) does not report a huge step.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Instant,
    frame_index: u64,
    dt_min: Duration,
    dt_max: Duration,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::with_clamps(Duration::from_micros(100), Duration::from_millis(250))
    }

    pub fn with_clamps(dt_min: Duration, dt_max: Duration) -> Self {
        debug_assert!(dt_min <= dt_max);
        Self {
            last: Instant::now(),
            frame_index: 0,
            dt_min,
            dt_max,
        }
    }

    /// Moves the delta-time baseline to now. Called when the loop (re)starts.
    pub fn reset(&mut self) {
        self.last = Instant::now();
    }

    /// Number of ticks produced so far.
    pub fn frames(&self) -> u64 {
        self.frame_index
    }

    /// Advances the clock.
    pub fn tick(&mut self) -> FrameTime {
        let now = Instant::now();
        let dt = now
            .saturating_duration_since(self.last)
            .clamp(self.dt_min, self.dt_max);

        self.last = now;
        self.frame_index += 1;

        FrameTime {
            dt: dt.as_secs_f32(),
            now,
            frame_index: self.frame_index,
        }
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
