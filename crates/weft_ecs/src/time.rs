//! Fixed-rate tick clock
//!
//! The ECS core never reads the clock; the external driver owns the tick.
//! `TickClock` turns wall-clock elapsed time into a whole number of
//! fixed-duration simulation ticks via an accumulator, so the simulation
//! advances at the same rate regardless of frame timing.

use std::time::Duration;

/// Default simulation tick rate (60 Hz = 16.666ms per tick)
pub const TICK_RATE_HZ: u32 = 60;
pub const TICK_DURATION: Duration = Duration::from_micros(16_666); // ~16.666ms

/// Upper bound on ticks returned by a single [`TickClock::advance`] call.
///
/// Caps catch-up work after a long stall so one slow frame cannot trigger
/// a spiral of ever-longer updates.
pub const MAX_TICKS_PER_ADVANCE: u32 = 8;

/// Accumulator-based fixed-timestep clock.
pub struct TickClock {
    tick: Duration,
    accumulator: Duration,
    tick_count: u64,
    simulated: Duration,
}

impl TickClock {
    /// Clock at the default 60 Hz rate.
    pub fn new() -> Self {
        Self::with_tick(TICK_DURATION)
    }

    /// Clock with a caller-chosen tick duration.
    pub fn with_tick(tick: Duration) -> Self {
        Self {
            tick,
            accumulator: Duration::ZERO,
            tick_count: 0,
            simulated: Duration::ZERO,
        }
    }

    /// Feed elapsed wall-clock time; returns how many fixed ticks to run.
    ///
    /// Unconsumed remainder stays in the accumulator for the next call.
    /// The return value is capped at [`MAX_TICKS_PER_ADVANCE`]; time beyond
    /// the cap is dropped rather than carried, which trades a momentary
    /// slowdown for a bounded frame.
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        self.accumulator += elapsed;

        let mut ticks = 0u32;
        while self.accumulator >= self.tick && ticks < MAX_TICKS_PER_ADVANCE {
            self.accumulator -= self.tick;
            ticks += 1;
        }
        if ticks == MAX_TICKS_PER_ADVANCE {
            self.accumulator = Duration::ZERO;
        }

        self.tick_count += u64::from(ticks);
        self.simulated += self.tick * ticks;
        ticks
    }

    /// Duration of one tick.
    pub fn tick_duration(&self) -> Duration {
        self.tick
    }

    /// Total ticks handed out so far.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Total simulated time (tick count times tick duration).
    pub fn total_time(&self) -> Duration {
        self.simulated
    }
}

impl Default for TickClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulates_partial_frames() {
        let mut clock = TickClock::with_tick(Duration::from_millis(10));

        assert_eq!(clock.advance(Duration::from_millis(4)), 0);
        assert_eq!(clock.advance(Duration::from_millis(4)), 0);
        // 12ms accumulated: one tick, 2ms remainder.
        assert_eq!(clock.advance(Duration::from_millis(4)), 1);
        assert_eq!(clock.advance(Duration::from_millis(8)), 1);
        assert_eq!(clock.tick_count(), 2);
    }

    #[test]
    fn long_stall_is_capped() {
        let mut clock = TickClock::with_tick(Duration::from_millis(10));

        let ticks = clock.advance(Duration::from_secs(5));
        assert_eq!(ticks, MAX_TICKS_PER_ADVANCE);
        // Excess time was dropped, not carried into the next frame.
        assert_eq!(clock.advance(Duration::from_millis(1)), 0);
    }

    #[test]
    fn total_time_tracks_ticks() {
        let mut clock = TickClock::with_tick(Duration::from_millis(10));
        clock.advance(Duration::from_millis(35));
        assert_eq!(clock.tick_count(), 3);
        assert_eq!(clock.total_time(), Duration::from_millis(30));
    }
}
