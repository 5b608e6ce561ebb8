//! The persisted, observable economy state.
//!
//! A plain value: every transaction takes `&EconomyState` and hands back a
//! complete replacement, so a half-applied transition is never observable.

use serde::{Deserialize, Serialize};

use crate::config::EconomyConfig;
use crate::mechanics::pacing;
use crate::systems::buff_ledger::BuffLedger;
use crate::systems::pull_resolver::DrawResult;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Totals {
    pub pulls_performed: u64,
    pub resource_earned: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyState {
    pub balance: u64,
    /// Highest balance ever reached; never decreases.
    pub high_water_mark: u64,
    /// Most recent first, capped at `history_cap`.
    pub history: Vec<DrawResult>,
    #[serde(rename = "active_buffs")]
    pub ledger: BuffLedger,
    pub speed_level: u32,
    pub countdown_secs: u32,
    pub last_free_draw_ms: u64,
    pub totals: Totals,
}

impl EconomyState {
    /// Fresh session: starting grant, empty ledger, full countdown.
    pub fn initial(cfg: &EconomyConfig, now_ms: u64) -> Self {
        Self {
            balance: cfg.initial_balance,
            high_water_mark: cfg.initial_balance,
            history: Vec::new(),
            ledger: BuffLedger::new(),
            speed_level: 0,
            countdown_secs: cfg.base_interval_secs,
            last_free_draw_ms: now_ms,
            totals: Totals { pulls_performed: 0, resource_earned: cfg.initial_balance },
        }
    }

    pub fn free_draw_interval(&self, cfg: &EconomyConfig) -> u32 {
        pacing::free_draw_interval(
            cfg.base_interval_secs,
            cfg.min_interval_secs,
            self.speed_level,
            cfg.seconds_per_speed_level(),
        )
    }

    pub fn countdown_progress(&self, cfg: &EconomyConfig) -> f64 {
        pacing::countdown_progress(self.countdown_secs, self.free_draw_interval(cfg))
    }

    /// Raise the high-water-mark to the current balance if needed.
    pub(crate) fn refresh_high_water_mark(&mut self) {
        self.high_water_mark = self.high_water_mark.max(self.balance);
    }

    /// Prepend a batch (given oldest first) and keep at most `cap` entries.
    pub(crate) fn record_history(&mut self, batch: &[DrawResult], cap: usize) {
        let mut next = Vec::with_capacity((batch.len() + self.history.len()).min(cap));
        next.extend(batch.iter().rev().take(cap).cloned());
        let room = cap - next.len();
        next.extend(self.history.iter().take(room).cloned());
        self.history = next;
    }
}
