//! Passive income + buff expiry on a fixed 1 Hz tick.
//!
//! `tick` is the whole per-second transition: countdown, credit, interval
//! reset, high-water-mark, sweep. `TickDriver` converts wall-clock timestamps
//! into a whole number of those ticks (fixed-timestep accumulator).

use tracing::debug;

use crate::config::EconomyConfig;
use crate::state::EconomyState;

pub const MS_PER_TICK: u64 = 1_000;

/// One clock tick at `now_ms`. Never rejected.
pub fn tick(state: &EconomyState, cfg: &EconomyConfig, now_ms: u64) -> EconomyState {
    let mut next = state.clone();

    next.countdown_secs = next.countdown_secs.saturating_sub(1);
    if next.countdown_secs == 0 {
        next.balance += 1;
        next.refresh_high_water_mark();
        next.countdown_secs = next.free_draw_interval(cfg);
        next.last_free_draw_ms = now_ms;
        debug!(balance = next.balance, next_in = next.countdown_secs, "Free draw");
    }

    next.ledger.sweep(now_ms);
    next
}

/// Wall clock → whole ticks. Leftover milliseconds carry into the next call.
#[derive(Clone, Debug)]
pub struct TickDriver {
    ms_per_tick: u64,
    max_ticks: u32,
    accumulator: u64,
    last_ms: Option<u64>,
    pub total_ticks: u64,
}

impl TickDriver {
    pub fn new(max_ticks: u32) -> Self {
        Self::with_period(MS_PER_TICK, max_ticks)
    }

    pub fn with_period(ms_per_tick: u64, max_ticks: u32) -> Self {
        Self {
            ms_per_tick: ms_per_tick.max(1),
            max_ticks,
            accumulator: 0,
            last_ms: None,
            total_ticks: 0,
        }
    }

    /// Ticks owed since the previous call. The first call only anchors the clock.
    pub fn due_ticks(&mut self, now_ms: u64) -> u32 {
        let delta = match self.last_ms {
            Some(prev) => now_ms.saturating_sub(prev),
            None => 0,
        };
        self.last_ms = Some(now_ms);

        self.accumulator += delta;
        let owed = self.accumulator / self.ms_per_tick;
        self.accumulator -= owed * self.ms_per_tick;

        let ticks = u32::try_from(owed).unwrap_or(u32::MAX).min(self.max_ticks);
        if u64::from(ticks) < owed {
            debug!(owed, replayed = ticks, "Catch-up capped");
        }
        self.total_ticks += u64::from(ticks);
        ticks
    }

    /// Tick timestamps for a batch ending at `now_ms`, oldest first.
    pub fn stamps(&self, ticks: u32, now_ms: u64) -> impl Iterator<Item = u64> {
        let period = self.ms_per_tick;
        (0..u64::from(ticks))
            .rev()
            .map(move |back| now_ms.saturating_sub(back * period))
    }
}
