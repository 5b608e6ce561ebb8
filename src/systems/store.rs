//! Buff purchases and the store front's view of them.

use serde::Serialize;
use tracing::info;

use crate::config::{BuffEffect, EconomyConfig};
use crate::error::Rejection;
use crate::state::EconomyState;

/// What the store front should show for one catalog entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OfferStatus {
    Available,
    /// Already running; buying again refreshes it.
    Active,
    Unaffordable,
    /// Speed upgrade at its cap.
    Maxed,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Offer {
    pub id: String,
    pub name: String,
    pub cost: u64,
    pub status: OfferStatus,
}

/// Buy `buff_id` at `now_ms`. On rejection nothing is deducted.
pub fn purchase(
    state: &EconomyState,
    cfg: &EconomyConfig,
    buff_id: &str,
    now_ms: u64,
) -> Result<EconomyState, Rejection> {
    purchase_reserving(state, cfg, buff_id, now_ms, 0)
}

/// Same as [`purchase`], but `reserved` units of the balance are already
/// promised (a pull waiting to commit) and cannot be spent here.
pub fn purchase_reserving(
    state: &EconomyState,
    cfg: &EconomyConfig,
    buff_id: &str,
    now_ms: u64,
    reserved: u64,
) -> Result<EconomyState, Rejection> {
    let def = cfg
        .buff(buff_id)
        .ok_or_else(|| Rejection::UnknownBuff(buff_id.to_owned()))?;

    let spendable = state.balance.saturating_sub(reserved);
    if spendable < def.cost {
        return Err(Rejection::InsufficientBalance { needed: def.cost, available: spendable });
    }

    let mut next = state.clone();
    match def.effect {
        BuffEffect::Speed { .. } => {
            if next.speed_level >= cfg.speed_level_cap {
                return Err(Rejection::SpeedCapReached { cap: cfg.speed_level_cap });
            }
            next.speed_level += 1;
        }
        _ => {
            next.ledger.grant(def, now_ms);
        }
    }
    next.balance -= def.cost;

    info!(buff = %def.id, cost = def.cost, balance = next.balance, "Purchased");
    Ok(next)
}

pub fn offers(state: &EconomyState, cfg: &EconomyConfig) -> Vec<Offer> {
    offers_reserving(state, cfg, 0)
}

/// Store front while `reserved` units are held for a pull in flight.
pub fn offers_reserving(state: &EconomyState, cfg: &EconomyConfig, reserved: u64) -> Vec<Offer> {
    let spendable = state.balance.saturating_sub(reserved);
    cfg.catalog
        .iter()
        .map(|def| {
            let status = match def.effect {
                BuffEffect::Speed { .. } if state.speed_level >= cfg.speed_level_cap => OfferStatus::Maxed,
                _ if spendable < def.cost => OfferStatus::Unaffordable,
                BuffEffect::Speed { .. } => OfferStatus::Available,
                _ if state.ledger.is_owned(&def.id) => OfferStatus::Active,
                _ => OfferStatus::Available,
            };
            Offer { id: def.id.clone(), name: def.name.clone(), cost: def.cost, status }
        })
        .collect()
}
