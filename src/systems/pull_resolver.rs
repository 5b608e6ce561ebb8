//! Pull resolution: sample the table, then apply buff modifiers.
//!
//! Order per pull (this order *is* the stacking rule):
//! 1. inverse-CDF sample of the distribution
//! 2. SHIELD: spend a charge if any remain; a natural 0 becomes 1
//! 3. DOUBLE: independent roll on a positive amount, so a shielded 1 can become 2
//! 4. derive tier, stamp id + time
//!
//! The resolver is side-effect free apart from the random source: it reports
//! the shield charges left instead of touching the ledger.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::mechanics::{RandomSource, Tier, stoch};
use crate::systems::probability_table::{Distribution, sample_cumulative};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DrawId(pub u64);

impl fmt::Display for DrawId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawResult {
    pub id: DrawId,
    pub amount: u32,
    pub tier: Tier,
    pub timestamp_ms: u64,
    #[serde(default)]
    pub was_doubled: bool,
    #[serde(default)]
    pub was_shielded: bool,
}

/// Buff effects that act per pull (LUCK acts on the table instead).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PullModifiers {
    pub shield_charges: u32,
    pub double_chance: Option<f64>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PullOutcome {
    /// Generation order (oldest first).
    pub results: Vec<DrawResult>,
    pub total_earned: u64,
    /// Shield charges left after the batch.
    pub shield_charges: u32,
    /// Highest tier seen, for the reveal.
    pub best_tier: Tier,
}

/// Resolve `pull_count` independent pulls. Affordability is the caller's job.
pub fn resolve<R: RandomSource + ?Sized>(
    pull_count: u32,
    dist: &Distribution,
    mods: PullModifiers,
    rng: &mut R,
    now_ms: u64,
) -> PullOutcome {
    let buckets = dist.cumulative();
    let mut shield = mods.shield_charges;
    let mut results = Vec::with_capacity(pull_count as usize);
    let mut total_earned = 0u64;
    let mut best_tier = Tier::Common;

    for _ in 0..pull_count {
        let mut amount = sample_cumulative(&buckets, rng.draw_unit());

        let mut was_shielded = false;
        if shield > 0 {
            // Charge goes even when the natural roll already paid out.
            if amount == 0 {
                amount = 1;
                was_shielded = true;
            }
            shield -= 1;
        }

        let mut was_doubled = false;
        if let Some(chance) = mods.double_chance {
            if amount > 0 && stoch::bernoulli(rng, chance) {
                amount *= 2;
                was_doubled = true;
            }
        }

        let tier = Tier::from_amount(amount);
        best_tier = best_tier.max(tier);
        total_earned += u64::from(amount);
        results.push(DrawResult {
            id: DrawId(rng.draw_u64()),
            amount,
            tier,
            timestamp_ms: now_ms,
            was_doubled,
            was_shielded,
        });
    }

    PullOutcome { results, total_earned, shield_charges: shield, best_tier }
}
