/*!
`gacha_economy`: a pure, seedable reward engine and tick-driven economy for
incremental gacha games.

What it does
- Builds a reward table calibrated to a target expected value
  (`systems::probability_table::build_distribution`).
- Resolves batches of pulls against that table, applying SHIELD then DOUBLE
  per pull (`systems::pull_resolver::resolve`). LUCK raises the table's EV.
- Advances passive income and expires buffs once per second
  (`systems::economy_clock::tick`).
- Maps the high-water-mark onto a cosmetic rank ladder (`systems::rank`).

How to use (call surface only)
- Build an `EconomyConfig` (defaults match the shipped game) and a random
  source (any `rand_core::RngCore`, e.g. seeded `bevy_prng::WyRand`).
- `Session::new(config, rng, now_ms)`; then drive it with
  `advance_to(now_ms)`, `purchase(id, now_ms)` and
  `request_pull(..)` / `commit_pull()` (or `pull_now(..)` when headless).
- Persist with `Session::save()` / `Session::load(..)`.

What it does NOT do
- No rendering, no timers, no storage. Time and randomness are inputs.
*/

pub mod config;
pub mod error;
pub mod mechanics;
pub mod persist;
pub mod session;
pub mod state;
pub mod systems;

pub use config::{BuffDefinition, BuffEffect, BuffKind, EconomyConfig, Rank};
pub use error::{EconomyError, EconomyResult, Rejection};
pub use mechanics::{RandomSource, Tier};
pub use session::Session;
pub use state::{EconomyState, Totals};
pub use systems::buff_ledger::{ActiveBuff, BuffLedger};
pub use systems::probability_table::{Distribution, ProbabilityRow, build_distribution};
pub use systems::pull_resolver::{DrawId, DrawResult, PullModifiers, PullOutcome};
pub use systems::pull_transaction::{PendingPull, PullRequest, commit_outcome, compute_outcome};
pub use systems::rank::RankStanding;
pub use systems::store::{Offer, OfferStatus};
