// src/systems/sdk.rs

//! # Transactions SDK
//!
//! Every change to [`EconomyState`] goes through a **transaction**: a pure
//! function `(&State, &Config) -> Result<State, Rejection>`. The owner applies
//! the returned state wholesale or, on `Err`, keeps the old one untouched.
//!
//! ## The built-in transactions
//! - [`Tick`]: one second of the economy clock (passive income + expiry).
//!   Never rejected.
//! - [`Purchase`]: buy a catalog buff (SPEED bumps the speed level, everything
//!   else goes into the ledger). `reserved` is balance already promised to a
//!   pull in flight; it is not spendable.
//! - [`CommitPull`]: phase 2 of a pull; folds a [`PendingPull`] into the state.
//!
//! Phase 1 of a pull (`compute_outcome`) is *not* a transaction: it reads the
//! state and the random source but produces an outcome, not a state.
//!
//! ## Writing a new transaction
//! 1) Check every guard first and return a [`Rejection`] before cloning.
//! 2) Clone the state, mutate the clone, return it.
//! 3) If the balance can go up, call `refresh_high_water_mark` on the clone.
//!
//! ## Determinism & purity
//! - Transactions never read wall-clock time; `now_ms` is an input.
//! - Randomness only enters through a `RandomSource` passed to phase 1.

use crate::config::EconomyConfig;
use crate::error::Rejection;
use crate::state::EconomyState;
use crate::systems::pull_transaction::{PendingPull, commit_outcome};
use crate::systems::{economy_clock, store};

/// Result of applying a transaction.
pub type Transition = Result<EconomyState, Rejection>;

pub trait Transaction {
    fn apply(&self, state: &EconomyState, cfg: &EconomyConfig) -> Transition;
}

#[derive(Clone, Copy, Debug)]
pub struct Tick {
    pub now_ms: u64,
}

impl Transaction for Tick {
    fn apply(&self, state: &EconomyState, cfg: &EconomyConfig) -> Transition {
        Ok(economy_clock::tick(state, cfg, self.now_ms))
    }
}

#[derive(Clone, Debug)]
pub struct Purchase<'a> {
    pub buff_id: &'a str,
    pub now_ms: u64,
    pub reserved: u64,
}

impl Transaction for Purchase<'_> {
    fn apply(&self, state: &EconomyState, cfg: &EconomyConfig) -> Transition {
        store::purchase_reserving(state, cfg, self.buff_id, self.now_ms, self.reserved)
    }
}

#[derive(Clone, Debug)]
pub struct CommitPull<'a> {
    pub pending: &'a PendingPull,
}

impl Transaction for CommitPull<'_> {
    fn apply(&self, state: &EconomyState, cfg: &EconomyConfig) -> Transition {
        Ok(commit_outcome(state, cfg, self.pending))
    }
}
