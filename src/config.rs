//! # Economy Configuration
//!
//! Static input data: pacing constants, the reward ladder, the buff catalog and
//! the rank ladder. Every field has a default matching the shipped game, so a
//! partial file (or `EconomyConfig::default()`) is always usable.

use serde::{Deserialize, Serialize};

use crate::error::{EconomyError, EconomyResult};

/// Kind tag shared by catalog entries and ledger entries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BuffKind {
    Luck,
    Speed,
    Double,
    Shield,
}

/// What a catalog buff does once bought. One variant per kind, each carrying
/// only its own magnitude.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BuffEffect {
    /// Raises the table's target EV while active. `duration_secs == 0` never expires.
    Luck { duration_secs: u32, target_ev: f64 },
    /// Permanent: one more speed level, shaving `seconds_per_level` off the interval.
    Speed { seconds_per_level: u32 },
    /// `chance` to double each positive pull while active.
    Double { duration_secs: u32, chance: f64 },
    /// Next `charges` pulls return at least 1.
    Shield { charges: u32 },
}

impl BuffEffect {
    pub fn kind(&self) -> BuffKind {
        match self {
            BuffEffect::Luck { .. } => BuffKind::Luck,
            BuffEffect::Speed { .. } => BuffKind::Speed,
            BuffEffect::Double { .. } => BuffKind::Double,
            BuffEffect::Shield { .. } => BuffKind::Shield,
        }
    }
}

/// A purchasable catalog entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BuffDefinition {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub cost: u64,
    pub effect: BuffEffect,
}

/// One step of the cosmetic rank ladder.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rank {
    pub threshold: u64,
    pub title: String,
}

impl Rank {
    pub fn new(threshold: u64, title: impl Into<String>) -> Self {
        Self { threshold, title: title.into() }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyConfig {
    /// Passive income interval with no speed upgrades.
    pub base_interval_secs: u32,
    /// Floor the interval never drops below.
    pub min_interval_secs: u32,
    /// Positive rewards, ascending. Zero is implicit.
    pub reward_ladder: Vec<u32>,
    /// Exponent of the `1 / r^skew` rarity weighting.
    pub rarity_skew: f64,
    /// Mean return per pull without LUCK.
    pub base_target_ev: f64,
    pub speed_level_cap: u32,
    pub history_cap: usize,
    pub initial_balance: u64,
    /// Presentation delay between computing and committing a pull.
    pub pull_delay_ms: u64,
    /// Same, when the player skips animations.
    pub quick_pull_delay_ms: u64,
    /// Upper bound on ticks replayed by one `advance_to`.
    pub max_catch_up_ticks: u32,
    pub catalog: Vec<BuffDefinition>,
    pub ranks: Vec<Rank>,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            base_interval_secs: 60,
            min_interval_secs: 10,
            reward_ladder: vec![1, 3, 5, 10],
            rarity_skew: 1.8,
            base_target_ev: 1.0,
            speed_level_cap: 50,
            history_cap: 50,
            initial_balance: 10,
            pull_delay_ms: 1_500,
            quick_pull_delay_ms: 100,
            max_catch_up_ticks: 86_400,
            catalog: default_catalog(),
            ranks: default_ranks(),
        }
    }
}

impl EconomyConfig {
    pub fn buff(&self, id: &str) -> Option<&BuffDefinition> {
        self.catalog.iter().find(|b| b.id == id)
    }

    /// Seconds shaved per speed level (first SPEED entry in the catalog, else 1).
    pub fn seconds_per_speed_level(&self) -> u32 {
        self.catalog
            .iter()
            .find_map(|b| match b.effect {
                BuffEffect::Speed { seconds_per_level } => Some(seconds_per_level),
                _ => None,
            })
            .unwrap_or(1)
    }

    /// Reject configurations the engine cannot run on.
    pub fn validate(&self) -> EconomyResult<()> {
        let invalid = |msg: String| Err(EconomyError::InvalidConfig(msg));

        if self.reward_ladder.is_empty() {
            return invalid("reward ladder is empty".into());
        }
        if self.reward_ladder.contains(&0) {
            return invalid("reward ladder must not contain 0 (it is implicit)".into());
        }
        if self.reward_ladder.windows(2).any(|w| w[0] >= w[1]) {
            return invalid(format!("reward ladder not strictly ascending: {:?}", self.reward_ladder));
        }
        if self.ranks.is_empty() {
            return invalid("rank ladder is empty".into());
        }
        if self.ranks.windows(2).any(|w| w[0].threshold >= w[1].threshold) {
            return invalid("rank thresholds not strictly ascending".into());
        }
        if self.min_interval_secs == 0 || self.min_interval_secs > self.base_interval_secs {
            return invalid(format!(
                "interval floor {} must be in 1..={}",
                self.min_interval_secs, self.base_interval_secs
            ));
        }
        if !self.rarity_skew.is_finite() || self.rarity_skew < 0.0 {
            return invalid(format!("rarity skew {} must be finite and >= 0", self.rarity_skew));
        }
        if !self.base_target_ev.is_finite() || self.base_target_ev < 0.0 {
            return invalid(format!("base target EV {} must be finite and >= 0", self.base_target_ev));
        }
        if self.history_cap == 0 {
            return invalid("history cap must be at least 1".into());
        }
        for (i, b) in self.catalog.iter().enumerate() {
            if self.catalog[..i].iter().any(|o| o.id == b.id) {
                return invalid(format!("duplicate buff id: {}", b.id));
            }
            match b.effect {
                BuffEffect::Double { chance, .. } if !(0.0..=1.0).contains(&chance) => {
                    return invalid(format!("buff {}: double chance {chance} outside [0, 1]", b.id));
                }
                BuffEffect::Luck { target_ev, .. } if !target_ev.is_finite() || target_ev < 0.0 => {
                    return invalid(format!("buff {}: target EV {target_ev} must be finite and >= 0", b.id));
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Parse and validate a TOML document; absent keys keep their defaults.
    #[cfg(feature = "config-toml")]
    pub fn from_toml_str(src: &str) -> EconomyResult<Self> {
        let cfg: Self = toml::from_str(src)?;
        cfg.validate()?;
        Ok(cfg)
    }
}

pub fn default_catalog() -> Vec<BuffDefinition> {
    vec![
        BuffDefinition {
            id: "luck_boost".into(),
            name: "Fortune's Favor".into(),
            description: "Increases EV to 1.1 (more wins) for 30 seconds.".into(),
            cost: 50,
            effect: BuffEffect::Luck { duration_secs: 30, target_ev: 1.1 },
        },
        BuffDefinition {
            id: "speed_upgrade".into(),
            name: "Time Warp".into(),
            description: "Permanently reduce time for free draw by 1s (max -50s).".into(),
            cost: 10,
            effect: BuffEffect::Speed { seconds_per_level: 1 },
        },
        BuffDefinition {
            id: "double_reward".into(),
            name: "Double Down".into(),
            description: "10% chance to double any positive draw reward for 30 seconds.".into(),
            cost: 30,
            effect: BuffEffect::Double { duration_secs: 30, chance: 0.10 },
        },
        BuffDefinition {
            id: "streak_shield".into(),
            name: "Safety Net".into(),
            description: "Guarantees at least 1 draw return for the next 5 spins.".into(),
            cost: 25,
            effect: BuffEffect::Shield { charges: 5 },
        },
    ]
}

pub fn default_ranks() -> Vec<Rank> {
    [
        (0, "Beggar"),
        (10, "Rookie Roller"),
        (25, "Coin Flipper"),
        (50, "Slot Squire"),
        (100, "Dice Dealer"),
        (200, "Pit Boss"),
        (350, "High Roller"),
        (500, "Jackpot Baron"),
        (750, "Royal Gambler"),
        (1000, "Immortal Draw King"),
        (1500, "Mythic House"),
        (2500, "Gacha God"),
        (5000, "Entropy Master"),
    ]
    .into_iter()
    .map(|(t, title)| Rank::new(t, title))
    .collect()
}
