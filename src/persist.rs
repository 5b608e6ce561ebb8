//! Save/load of [`EconomyState`] as one versioned JSON record.
//!
//! ## Versioning
//! - `SAVE_VERSION`: current format. Bump when fields are added.
//! - `MIN_COMPATIBLE_VERSION`: oldest format still readable. Bump only when a
//!   field changes meaning or disappears; additions are covered by
//!   `#[serde(default)]` on the state.
//!
//! Where the record lives (browser storage, a file, a server) is the caller's
//! business.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::EconomyConfig;
use crate::error::{EconomyError, EconomyResult};
use crate::state::EconomyState;

pub const SAVE_VERSION: u32 = 1;
pub const MIN_COMPATIBLE_VERSION: u32 = 1;

#[derive(Serialize)]
struct SaveRef<'a> {
    version: u32,
    state: &'a EconomyState,
}

#[derive(Deserialize)]
struct SaveData {
    version: u32,
    #[serde(default)]
    state: EconomyState,
}

pub fn to_json(state: &EconomyState) -> EconomyResult<String> {
    Ok(serde_json::to_string(&SaveRef { version: SAVE_VERSION, state })?)
}

/// Parse a save and bring it back inside the config's invariants.
pub fn from_json(json: &str, cfg: &EconomyConfig) -> EconomyResult<EconomyState> {
    let data: SaveData = serde_json::from_str(json)?;
    if !(MIN_COMPATIBLE_VERSION..=SAVE_VERSION).contains(&data.version) {
        warn!(found = data.version, "Rejected save");
        return Err(EconomyError::IncompatibleSave {
            found: data.version,
            min: MIN_COMPATIBLE_VERSION,
            max: SAVE_VERSION,
        });
    }
    let state = normalize(data.state, cfg);
    debug!(balance = state.balance, history = state.history.len(), "Loaded save");
    Ok(state)
}

pub(crate) fn normalize(mut state: EconomyState, cfg: &EconomyConfig) -> EconomyState {
    state.history.truncate(cfg.history_cap);
    state.speed_level = state.speed_level.min(cfg.speed_level_cap);
    state.refresh_high_water_mark();
    // A countdown above the current interval is legal right after a SPEED purchase.
    if state.countdown_secs == 0 || state.countdown_secs > cfg.base_interval_secs {
        state.countdown_secs = state.free_draw_interval(cfg);
    }
    state
}
