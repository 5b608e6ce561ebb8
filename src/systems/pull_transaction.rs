//! Two-phase pull: `compute_outcome` rolls everything up front (pure apart
//! from the random source); `commit_outcome` folds it into the state later,
//! after whatever presentation delay the caller wants.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::{BuffKind, EconomyConfig};
use crate::error::Rejection;
use crate::mechanics::RandomSource;
use crate::state::EconomyState;
use crate::systems::probability_table::build_distribution;
use crate::systems::pull_resolver::{self, PullOutcome};

/// Price and size of one pull transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequest {
    pub cost: u64,
    pub count: u32,
}

impl PullRequest {
    pub const fn single() -> Self {
        Self { cost: 1, count: 1 }
    }

    pub const fn multi() -> Self {
        Self { cost: 10, count: 10 }
    }
}

/// A resolved pull waiting to be committed.
#[derive(Clone, Debug, PartialEq)]
pub struct PendingPull {
    pub request: PullRequest,
    pub target_ev: f64,
    /// Shield charges the batch started with.
    pub shield_before: u32,
    pub outcome: PullOutcome,
}

impl PendingPull {
    pub fn shield_consumed(&self) -> u32 {
        self.shield_before.saturating_sub(self.outcome.shield_charges)
    }
}

/// Phase 1. Guards run before any randomness is consumed.
pub fn compute_outcome<R: RandomSource + ?Sized>(
    state: &EconomyState,
    cfg: &EconomyConfig,
    request: PullRequest,
    rng: &mut R,
    now_ms: u64,
) -> Result<PendingPull, Rejection> {
    if request.count == 0 {
        return Err(Rejection::EmptyPull);
    }
    if state.balance < request.cost {
        return Err(Rejection::InsufficientBalance { needed: request.cost, available: state.balance });
    }

    // LUCK reshapes the table; SHIELD/DOUBLE act per pull.
    let target_ev = state.ledger.target_ev(cfg.base_target_ev);
    let dist = build_distribution(target_ev, cfg.rarity_skew, &cfg.reward_ladder);
    let mods = state.ledger.modifiers();
    let outcome = pull_resolver::resolve(request.count, &dist, mods, rng, now_ms);

    Ok(PendingPull { request, target_ev, shield_before: mods.shield_charges, outcome })
}

/// Phase 2. Applies the batch as a delta on top of `state` as it is now, so
/// ticks landing in between are kept. The owner must keep `request.cost`
/// unspent until here (see `store::purchase_reserving`).
pub fn commit_outcome(state: &EconomyState, cfg: &EconomyConfig, pending: &PendingPull) -> EconomyState {
    let out = &pending.outcome;
    let mut next = state.clone();

    next.balance = next
        .balance
        .saturating_sub(pending.request.cost)
        .saturating_add(out.total_earned);
    next.refresh_high_water_mark();
    next.totals.pulls_performed += u64::from(pending.request.count);
    next.totals.resource_earned += out.total_earned;
    next.record_history(&out.results, cfg.history_cap);
    if pending.shield_consumed() > 0 {
        // Consumed charges come off the live ledger, not the snapshot.
        let live = next.ledger.charges_remaining(BuffKind::Shield);
        next.ledger = next.ledger.with_shield_charges(live.saturating_sub(pending.shield_consumed()));
    }

    info!(
        pulls = pending.request.count,
        cost = pending.request.cost,
        earned = out.total_earned,
        balance = next.balance,
        best = out.best_tier.as_str(),
        "Pull committed"
    );
    next
}
