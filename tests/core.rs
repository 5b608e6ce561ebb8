// tests/core.rs
use bevy_prng::WyRand;
use gacha_economy::systems::sdk::{CommitPull, Purchase, Tick, Transaction};
use gacha_economy::systems::{economy_clock, pull_resolver, rank, store};
use gacha_economy::{
    BuffKind, EconomyConfig, EconomyState, PullModifiers, PullRequest, Rejection, Tier,
    build_distribution, commit_outcome, compute_outcome,
};
use rand_core::SeedableRng;

fn rng(seed: u64) -> WyRand {
    WyRand::from_seed(seed.to_le_bytes())
}

/* ──────────────────────────────────────────────────────────────────────────
1) Probability table — normalization, floor, fixed point
────────────────────────────────────────────────────────────────────────── */

#[test]
fn default_table_sums_to_one_and_keeps_zero_floor() {
    let cfg = EconomyConfig::default();
    let dist = build_distribution(1.0, 1.8, &cfg.reward_ladder);

    let sum: f64 = dist.rows().iter().map(|r| r.probability).sum();
    assert!((sum - 1.0).abs() < 1e-9, "sum = {sum}");
    assert!(dist.rows().iter().all(|r| r.probability >= 0.0));

    let p0 = dist.zero_probability();
    assert!(p0 < 1.0 && p0 >= 0.01, "p0 = {p0}");
}

#[test]
fn default_table_zero_probability_matches_closed_form() {
    let ladder = [1u32, 3, 5, 10];
    let w: Vec<f64> = ladder.iter().map(|&r| 1.0 / f64::from(r).powf(1.8)).collect();
    let sw: f64 = w.iter().sum();
    let mean: f64 = ladder.iter().zip(&w).map(|(&r, wi)| f64::from(r) * wi / sw).sum();

    let dist = build_distribution(1.0, 1.8, &ladder);
    assert!((dist.zero_probability() - (1.0 - 1.0 / mean)).abs() < 1e-12);
    assert!((dist.zero_probability() - 0.3461).abs() < 1e-3, "p0 = {}", dist.zero_probability());
    assert!((dist.expected_value() - 1.0).abs() < 1e-9);
    assert_eq!(dist.rows().iter().map(|r| r.reward).collect::<Vec<_>>(), vec![0, 1, 3, 5, 10]);
}

#[test]
fn oversized_target_ev_is_clamped_to_one_percent_zero() {
    let dist = build_distribution(1_000.0, 1.8, &[1, 3, 5, 10]);
    assert!((dist.zero_probability() - 0.01).abs() < 1e-12);
    let sum: f64 = dist.rows().iter().map(|r| r.probability).sum();
    assert!((sum - 1.0).abs() < 1e-9);
}

#[test]
fn luck_target_raises_positive_mass() {
    let base = build_distribution(1.0, 1.8, &[1, 3, 5, 10]);
    let lucky = build_distribution(1.1, 1.8, &[1, 3, 5, 10]);
    assert!(lucky.zero_probability() < base.zero_probability());
    assert!((lucky.expected_value() - 1.1).abs() < 1e-9);
}

#[test]
fn sampling_follows_cumulative_buckets() {
    let dist = build_distribution(1.0, 1.8, &[1, 3, 5, 10]);
    let p0 = dist.zero_probability();
    assert_eq!(dist.sample(0.0), 0);
    assert_eq!(dist.sample(p0 - 1e-9), 0);
    assert_eq!(dist.sample(p0 + 1e-9), 1);
    assert_eq!(dist.sample(0.999_999), 10);
    // Past the last bound (rounding) falls through to zero.
    assert_eq!(dist.sample(1.5), 0);
}

/* ──────────────────────────────────────────────────────────────────────────
2) Pull resolver — law of large numbers, shield, double
────────────────────────────────────────────────────────────────────────── */

#[test]
fn hundred_thousand_pulls_converge_to_table_ev() {
    let dist = build_distribution(1.0, 1.8, &[1, 3, 5, 10]);
    let mut r = rng(0xD1CE);
    let out = pull_resolver::resolve(100_000, &dist, PullModifiers::default(), &mut r, 0);

    assert_eq!(out.results.len(), 100_000);
    let mean = out.total_earned as f64 / 100_000.0;
    assert!((mean - 1.0).abs() < 0.03, "empirical EV {mean}");
    assert!(out.results.iter().all(|d| !d.was_doubled && !d.was_shielded));
}

#[test]
fn shield_guarantees_one_and_spends_every_charge() {
    // Near-certain wins: charges still drain one per pull.
    let rich = build_distribution(1_000.0, 1.8, &[1, 3, 5, 10]);
    let mods = PullModifiers { shield_charges: 5, double_chance: None };
    let out = pull_resolver::resolve(5, &rich, mods, &mut rng(7), 0);
    assert_eq!(out.shield_charges, 0);
    assert!(out.results.iter().all(|d| d.amount >= 1));

    // Certain losses: every pull is lifted to exactly 1.
    let empty = build_distribution(0.0, 1.8, &[1, 3, 5, 10]);
    let out = pull_resolver::resolve(8, &empty, mods, &mut rng(7), 0);
    assert_eq!(out.shield_charges, 0);
    let amounts: Vec<u32> = out.results.iter().map(|d| d.amount).collect();
    assert_eq!(amounts, vec![1, 1, 1, 1, 1, 0, 0, 0]);
    assert!(out.results[..5].iter().all(|d| d.was_shielded));
    assert!(out.results[5..].iter().all(|d| !d.was_shielded));
    assert_eq!(out.total_earned, 5);
}

#[test]
fn double_never_touches_zero_and_hits_ten_percent_of_positives() {
    let dist = build_distribution(1.0, 1.8, &[1, 3, 5, 10]);
    let mods = PullModifiers { shield_charges: 0, double_chance: Some(0.10) };
    let out = pull_resolver::resolve(100_000, &dist, mods, &mut rng(42), 0);

    assert!(out.results.iter().filter(|d| d.amount == 0).all(|d| !d.was_doubled));
    let positives = out.results.iter().filter(|d| d.amount > 0).count();
    let doubled = out.results.iter().filter(|d| d.was_doubled).count();
    let frac = doubled as f64 / positives as f64;
    assert!((frac - 0.10).abs() < 0.01, "doubled fraction {frac}");
    assert!(out.results.iter().filter(|d| d.was_doubled).all(|d| d.amount % 2 == 0));
}

#[test]
fn shielded_one_can_be_doubled() {
    let empty = build_distribution(0.0, 1.8, &[1, 3, 5, 10]);
    let mods = PullModifiers { shield_charges: 1, double_chance: Some(1.0) };
    let out = pull_resolver::resolve(1, &empty, mods, &mut rng(3), 0);
    let d = &out.results[0];
    assert_eq!(d.amount, 2);
    assert!(d.was_shielded && d.was_doubled);
}

#[test]
fn tier_is_derived_from_final_amount() {
    assert_eq!(Tier::from_amount(0), Tier::Common);
    assert_eq!(Tier::from_amount(3), Tier::Common);
    assert_eq!(Tier::from_amount(5), Tier::Rare);
    assert_eq!(Tier::from_amount(6), Tier::Rare);
    assert_eq!(Tier::from_amount(10), Tier::Legendary);
    assert_eq!(Tier::from_amount(20), Tier::Legendary);

    let dist = build_distribution(1.0, 1.8, &[1, 3, 5, 10]);
    let mods = PullModifiers { shield_charges: 0, double_chance: Some(0.5) };
    let out = pull_resolver::resolve(5_000, &dist, mods, &mut rng(11), 0);
    assert!(out.results.iter().all(|d| d.tier == Tier::from_amount(d.amount)));
    let best = out.results.iter().map(|d| d.tier).max().unwrap();
    assert_eq!(out.best_tier, best);
}

/* ──────────────────────────────────────────────────────────────────────────
3) Rank ladder
────────────────────────────────────────────────────────────────────────── */

#[test]
fn rank_lookup_matches_ladder() {
    let ranks = EconomyConfig::default().ranks;

    let bottom = rank::standing(0, &ranks).unwrap();
    assert_eq!(bottom.title, "Beggar");
    assert_eq!(bottom.progress, 0.0);

    let king = rank::standing(1000, &ranks).unwrap();
    assert_eq!(king.title, "Immortal Draw King");
    assert_eq!(king.threshold, 1000);
    assert_eq!(king.next_threshold, Some(1500));

    let mid = rank::standing(1250, &ranks).unwrap();
    assert!((mid.progress - 0.5).abs() < 1e-12);

    let top = rank::standing(1_000_000, &ranks).unwrap();
    assert_eq!(top.title, "Entropy Master");
    assert_eq!(top.progress, 0.0);

    assert!(rank::standing(5, &[]).is_none());
}

/* ──────────────────────────────────────────────────────────────────────────
4) Store — speed cap, refresh instead of stack
────────────────────────────────────────────────────────────────────────── */

#[test]
fn fifty_speed_upgrades_hit_floor_and_fifty_first_is_rejected() {
    let cfg = EconomyConfig::default();
    let mut st = EconomyState::initial(&cfg, 0);
    st.balance = 1_000;
    assert_eq!(st.free_draw_interval(&cfg), 60);

    for _ in 0..50 {
        st = store::purchase(&st, &cfg, "speed_upgrade", 0).unwrap();
    }
    assert_eq!(st.speed_level, 50);
    assert_eq!(st.free_draw_interval(&cfg), 10);
    assert_eq!(st.balance, 500);
    assert!(st.ledger.is_empty());

    let err = store::purchase(&st, &cfg, "speed_upgrade", 0).unwrap_err();
    assert_eq!(err, Rejection::SpeedCapReached { cap: 50 });
    assert_eq!(st.speed_level, 50);
    assert_eq!(st.balance, 500);
}

#[test]
fn rebuying_a_timed_buff_resets_expiry_without_stacking() {
    let cfg = EconomyConfig::default();
    let mut st = EconomyState::initial(&cfg, 0);
    st.balance = 100;

    st = store::purchase(&st, &cfg, "luck_boost", 1_000).unwrap();
    assert_eq!(st.ledger.seconds_left("luck_boost", 1_000), Some(30));
    st = store::purchase(&st, &cfg, "luck_boost", 20_000).unwrap();
    assert_eq!(st.ledger.len(), 1);
    assert_eq!(st.ledger.seconds_left("luck_boost", 20_000), Some(30));
    assert_eq!(st.balance, 0);

    let err = store::purchase(&st, &cfg, "double_reward", 20_000).unwrap_err();
    assert_eq!(err, Rejection::InsufficientBalance { needed: 30, available: 0 });
}

/* ──────────────────────────────────────────────────────────────────────────
5) Clock — passive income and expiry
────────────────────────────────────────────────────────────────────────── */

#[test]
fn sixty_ticks_credit_exactly_once_at_the_last_tick() {
    let cfg = EconomyConfig::default();
    let mut st = EconomyState::initial(&cfg, 0);
    assert_eq!(st.countdown_secs, 60);

    for t in 1..=59u64 {
        st = economy_clock::tick(&st, &cfg, t * 1_000);
        assert_eq!(st.balance, 10, "credited early at tick {t}");
    }
    st = economy_clock::tick(&st, &cfg, 60_000);
    assert_eq!(st.balance, 11);
    assert_eq!(st.high_water_mark, 11);
    assert_eq!(st.countdown_secs, 60);
    assert_eq!(st.last_free_draw_ms, 60_000);
}

#[test]
fn tick_sweeps_expired_buffs_in_the_same_step() {
    let cfg = EconomyConfig::default();
    let mut st = EconomyState::initial(&cfg, 0);
    st.balance = 200;
    st = store::purchase(&st, &cfg, "double_reward", 0).unwrap();
    st = store::purchase(&st, &cfg, "streak_shield", 0).unwrap();

    st = economy_clock::tick(&st, &cfg, 29_999);
    assert!(st.ledger.is_active(BuffKind::Double));
    st = economy_clock::tick(&st, &cfg, 30_000);
    assert!(!st.ledger.is_active(BuffKind::Double));
    // Charge buffs do not expire with time.
    assert_eq!(st.ledger.charges_remaining(BuffKind::Shield), 5);
}

/* ──────────────────────────────────────────────────────────────────────────
6) Two-phase pull — history bound, totals, high-water-mark
────────────────────────────────────────────────────────────────────────── */

#[test]
fn history_stays_bounded_and_newest_first() {
    let cfg = EconomyConfig::default();
    let mut st = EconomyState::initial(&cfg, 0);
    st.balance = 10_000;
    let mut r = rng(99);

    let mut last_id = None;
    for batch in 0..12u64 {
        let pending = compute_outcome(&st, &cfg, PullRequest::multi(), &mut r, batch * 1_000).unwrap();
        last_id = pending.outcome.results.last().map(|d| d.id);
        st = commit_outcome(&st, &cfg, &pending);
        assert!(st.history.len() <= 50);
    }
    assert_eq!(st.history.len(), 50);
    assert_eq!(Some(st.history[0].id), last_id);
    assert!(st.history.windows(2).all(|w| w[0].timestamp_ms >= w[1].timestamp_ms));
    assert_eq!(st.totals.pulls_performed, 120);
}

#[test]
fn commit_moves_balance_and_never_lowers_high_water_mark() {
    let cfg = EconomyConfig::default();
    let st = EconomyState::initial(&cfg, 0);
    let pending = compute_outcome(&st, &cfg, PullRequest::multi(), &mut rng(5), 0).unwrap();
    let next = commit_outcome(&st, &cfg, &pending);

    assert_eq!(next.balance, 10 - 10 + pending.outcome.total_earned);
    assert_eq!(next.high_water_mark, next.balance.max(10));
    assert_eq!(next.totals.resource_earned, 10 + pending.outcome.total_earned);
}

/* ──────────────────────────────────────────────────────────────────────────
7) Transactions — one protocol for every state change
────────────────────────────────────────────────────────────────────────── */

#[test]
fn transactions_compose_and_respect_reserve() {
    let cfg = EconomyConfig::default();
    let mut st = EconomyState::initial(&cfg, 0);
    st.countdown_secs = 1;

    st = Tick { now_ms: 1_000 }.apply(&st, &cfg).unwrap();
    assert_eq!(st.balance, 11);

    let pending = compute_outcome(&st, &cfg, PullRequest::multi(), &mut rng(8), 1_000).unwrap();
    let held = Purchase { buff_id: "speed_upgrade", now_ms: 1_000, reserved: pending.request.cost };
    assert_eq!(
        held.apply(&st, &cfg).unwrap_err(),
        Rejection::InsufficientBalance { needed: 10, available: 1 }
    );

    st = CommitPull { pending: &pending }.apply(&st, &cfg).unwrap();
    assert_eq!(st.balance, 1 + pending.outcome.total_earned);
    assert_eq!(st.totals.pulls_performed, 10);
}
