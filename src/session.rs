//! Session: the single owner of an economy.
//!
//! Holds the state, the config, the random source and the "pull in flight"
//! gate. Every transition takes `&mut self`, so ticks, purchases and pull
//! commits are serialized by construction.
//!
//! A pull is two calls: `request_pull` resolves it immediately and parks the
//! outcome; `commit_pull` folds it in once the caller's reveal is over (see
//! [`Session::commit_delay`]). Headless callers use [`Session::pull_now`].

use tracing::debug;

use crate::config::EconomyConfig;
use crate::error::{EconomyResult, Rejection};
use crate::mechanics::RandomSource;
use crate::persist;
use crate::state::EconomyState;
use crate::systems::economy_clock::{self, TickDriver};
use crate::systems::pull_transaction::{PendingPull, PullRequest, compute_outcome};
use crate::systems::rank::{self, RankStanding};
use crate::systems::sdk::{CommitPull, Purchase, Transaction};
use crate::systems::store::{self, Offer};

pub struct Session<R> {
    config: EconomyConfig,
    state: EconomyState,
    rng: R,
    pending: Option<PendingPull>,
    driver: TickDriver,
    skip_animation: bool,
}

impl<R: RandomSource> Session<R> {
    /// New player: validated config, initial state.
    pub fn new(config: EconomyConfig, rng: R, now_ms: u64) -> EconomyResult<Self> {
        config.validate()?;
        let state = EconomyState::initial(&config, now_ms);
        Ok(Self::assemble(config, state, rng))
    }

    /// Continue from an already-loaded state, brought inside the config's caps.
    pub fn resume(config: EconomyConfig, state: EconomyState, rng: R) -> EconomyResult<Self> {
        config.validate()?;
        let state = persist::normalize(state, &config);
        Ok(Self::assemble(config, state, rng))
    }

    /// Continue from a save produced by [`Session::save`].
    pub fn load(config: EconomyConfig, json: &str, rng: R) -> EconomyResult<Self> {
        let state = persist::from_json(json, &config)?;
        Self::resume(config, state, rng)
    }

    fn assemble(config: EconomyConfig, state: EconomyState, rng: R) -> Self {
        let driver = TickDriver::new(config.max_catch_up_ticks);
        Self { config, state, rng, pending: None, driver, skip_animation: false }
    }

    pub fn save(&self) -> EconomyResult<String> {
        persist::to_json(&self.state)
    }

    pub fn state(&self) -> &EconomyState {
        &self.state
    }

    pub fn config(&self) -> &EconomyConfig {
        &self.config
    }

    pub fn is_pulling(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending(&self) -> Option<&PendingPull> {
        self.pending.as_ref()
    }

    pub fn set_skip_animation(&mut self, skip: bool) {
        self.skip_animation = skip;
    }

    /// How long the caller should wait between request and commit.
    pub fn commit_delay(&self) -> std::time::Duration {
        let ms = if self.skip_animation {
            self.config.quick_pull_delay_ms
        } else {
            self.config.pull_delay_ms
        };
        std::time::Duration::from_millis(ms)
    }

    fn apply(&mut self, tx: &impl Transaction) -> Result<(), Rejection> {
        let next = tx.apply(&self.state, &self.config).inspect_err(|why| {
            debug!(%why, "Rejected");
        })?;
        self.state = next;
        Ok(())
    }

    /// Phase 1: resolve now, commit later. The gate stays closed until `commit_pull`.
    pub fn request_pull(&mut self, request: PullRequest, now_ms: u64) -> Result<&PendingPull, Rejection> {
        if self.pending.is_some() {
            debug!("Rejected: pull in flight");
            return Err(Rejection::PullInFlight);
        }
        let pending = compute_outcome(&self.state, &self.config, request, &mut self.rng, now_ms)
            .inspect_err(|why| debug!(%why, "Rejected"))?;
        Ok(self.pending.insert(pending))
    }

    /// Phase 2: fold the parked outcome into the state and reopen the gate.
    pub fn commit_pull(&mut self) -> Result<PendingPull, Rejection> {
        let pending = self.pending.take().ok_or(Rejection::NothingPending)?;
        self.apply(&CommitPull { pending: &pending })?;
        Ok(pending)
    }

    /// Both phases back to back.
    pub fn pull_now(&mut self, request: PullRequest, now_ms: u64) -> Result<PendingPull, Rejection> {
        self.request_pull(request, now_ms)?;
        self.commit_pull()
    }

    /// Buy a catalog buff. The cost of a pull in flight is held back, so the
    /// commit can always pay for it.
    pub fn purchase(&mut self, buff_id: &str, now_ms: u64) -> Result<(), Rejection> {
        let reserved = self.reserved();
        self.apply(&Purchase { buff_id, now_ms, reserved })
    }

    /// Balance held back for the pull in flight.
    fn reserved(&self) -> u64 {
        self.pending.as_ref().map_or(0, |p| p.request.cost)
    }

    /// Exactly one clock tick. Ticks are never rejected.
    pub fn tick(&mut self, now_ms: u64) {
        self.state = economy_clock::tick(&self.state, &self.config, now_ms);
    }

    /// Replay every whole second elapsed since the last call. Returns ticks applied.
    pub fn advance_to(&mut self, now_ms: u64) -> u32 {
        let ticks = self.driver.due_ticks(now_ms);
        let stamps: Vec<u64> = self.driver.stamps(ticks, now_ms).collect();
        for at in stamps {
            self.tick(at);
        }
        ticks
    }

    pub fn standing(&self) -> Option<RankStanding> {
        rank::standing(self.state.high_water_mark, &self.config.ranks)
    }

    pub fn free_draw_interval(&self) -> u32 {
        self.state.free_draw_interval(&self.config)
    }

    pub fn countdown_progress(&self) -> f64 {
        self.state.countdown_progress(&self.config)
    }

    pub fn offers(&self) -> Vec<Offer> {
        store::offers_reserving(&self.state, &self.config, self.reserved())
    }
}
