//! Active buff bookkeeping.
//!
//! At most one entry per catalog id; buying again replaces the entry (fresh
//! expiry, full charges) instead of stacking. SPEED never lands here: it is a
//! counter on the economy state.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::config::{BuffDefinition, BuffEffect, BuffKind};
use crate::systems::pull_resolver::PullModifiers;

/// A live buff. Each variant keeps only what its kind needs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActiveBuff {
    Luck { id: String, expires_at_ms: Option<u64>, target_ev: f64 },
    Double { id: String, expires_at_ms: Option<u64>, chance: f64 },
    Shield { id: String, charges: u32 },
}

impl ActiveBuff {
    pub fn id(&self) -> &str {
        match self {
            ActiveBuff::Luck { id, .. } | ActiveBuff::Double { id, .. } | ActiveBuff::Shield { id, .. } => id,
        }
    }

    pub fn kind(&self) -> BuffKind {
        match self {
            ActiveBuff::Luck { .. } => BuffKind::Luck,
            ActiveBuff::Double { .. } => BuffKind::Double,
            ActiveBuff::Shield { .. } => BuffKind::Shield,
        }
    }

    pub fn expires_at_ms(&self) -> Option<u64> {
        match self {
            ActiveBuff::Luck { expires_at_ms, .. } | ActiveBuff::Double { expires_at_ms, .. } => *expires_at_ms,
            ActiveBuff::Shield { .. } => None,
        }
    }

    /// Fresh entry for a purchase at `now_ms`; `None` for SPEED.
    pub fn from_definition(def: &BuffDefinition, now_ms: u64) -> Option<Self> {
        let expiry = |secs: u32| (secs > 0).then(|| now_ms.saturating_add(u64::from(secs) * 1_000));
        match def.effect {
            BuffEffect::Luck { duration_secs, target_ev } => Some(ActiveBuff::Luck {
                id: def.id.clone(),
                expires_at_ms: expiry(duration_secs),
                target_ev,
            }),
            BuffEffect::Double { duration_secs, chance } => Some(ActiveBuff::Double {
                id: def.id.clone(),
                expires_at_ms: expiry(duration_secs),
                chance,
            }),
            BuffEffect::Shield { charges } => Some(ActiveBuff::Shield { id: def.id.clone(), charges }),
            BuffEffect::Speed { .. } => None,
        }
    }

    fn is_spent(&self, now_ms: u64) -> bool {
        match self {
            ActiveBuff::Shield { charges, .. } => *charges == 0,
            _ => self.expires_at_ms().is_some_and(|at| at <= now_ms),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BuffLedger {
    entries: Vec<ActiveBuff>,
}

impl BuffLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[ActiveBuff] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert or refresh the entry for `def.id`. Returns false for SPEED.
    pub fn grant(&mut self, def: &BuffDefinition, now_ms: u64) -> bool {
        let Some(fresh) = ActiveBuff::from_definition(def, now_ms) else {
            return false;
        };
        match self.entries.iter_mut().find(|e| e.id() == def.id) {
            Some(slot) => *slot = fresh,
            None => self.entries.push(fresh),
        }
        true
    }

    /// Drop expired time buffs and exhausted charge buffs. Returns how many went.
    pub fn sweep(&mut self, now_ms: u64) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| !e.is_spent(now_ms));
        let removed = before - self.entries.len();
        if removed > 0 {
            trace!(removed, now_ms, "Swept buffs");
        }
        removed
    }

    pub fn is_active(&self, kind: BuffKind) -> bool {
        self.entries.iter().any(|e| e.kind() == kind)
    }

    pub fn is_owned(&self, id: &str) -> bool {
        self.entries.iter().any(|e| e.id() == id)
    }

    /// Charges left on SHIELD entries of this kind (0 for every other kind).
    pub fn charges_remaining(&self, kind: BuffKind) -> u32 {
        self.entries
            .iter()
            .filter(|e| e.kind() == kind)
            .map(|e| match e {
                ActiveBuff::Shield { charges, .. } => *charges,
                _ => 0,
            })
            .sum()
    }

    /// Target EV the caller should build the table with.
    pub fn target_ev(&self, baseline: f64) -> f64 {
        self.entries
            .iter()
            .filter_map(|e| match e {
                ActiveBuff::Luck { target_ev, .. } => Some(*target_ev),
                _ => None,
            })
            .reduce(f64::max)
            .unwrap_or(baseline)
    }

    /// Highest doubling chance among active DOUBLE entries.
    pub fn double_chance(&self) -> Option<f64> {
        self.entries
            .iter()
            .filter_map(|e| match e {
                ActiveBuff::Double { chance, .. } => Some(*chance),
                _ => None,
            })
            .reduce(f64::max)
    }

    /// Per-pull modifiers handed to the resolver.
    pub fn modifiers(&self) -> PullModifiers {
        PullModifiers {
            shield_charges: self.charges_remaining(BuffKind::Shield),
            double_chance: self.double_chance(),
        }
    }

    /// Whole seconds until `id` expires, rounded up; `None` if absent or untimed.
    pub fn seconds_left(&self, id: &str, now_ms: u64) -> Option<u64> {
        let at = self.entries.iter().find(|e| e.id() == id)?.expires_at_ms()?;
        Some(at.saturating_sub(now_ms).div_ceil(1_000))
    }

    /// Write back the charge count a resolver reported, then drop exhausted shields.
    pub fn with_shield_charges(mut self, charges: u32) -> Self {
        let mut left = charges;
        for e in &mut self.entries {
            if let ActiveBuff::Shield { charges, .. } = e {
                // Several shield ids share one pool; fill them in order.
                let keep = left.min(*charges);
                *charges = keep;
                left -= keep;
            }
        }
        self.entries
            .retain(|e| !matches!(e, ActiveBuff::Shield { charges: 0, .. }));
        self
    }
}
