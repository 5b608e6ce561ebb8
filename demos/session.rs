// demos/session.rs
// Run with:
//   RUST_LOG=gacha_economy=debug cargo run --example session

use bevy_prng::WyRand;
use gacha_economy::{EconomyConfig, PullRequest, Rejection, Session};
use rand_core::SeedableRng;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let seed = 0xC0FFEE_u64;
    let mut session = Session::new(EconomyConfig::default(), WyRand::from_seed(seed.to_le_bytes()), 0)
        .expect("default config is valid");
    session.set_skip_animation(true);

    // Ten simulated minutes, one decision per second.
    let mut now = 0u64;
    session.advance_to(now);
    for second in 1..=600u64 {
        now = second * 1_000;
        session.advance_to(now);

        let bought = ["streak_shield", "speed_upgrade", "luck_boost"]
            .into_iter()
            .find(|id| session.purchase(id, now).is_ok());
        if bought.is_some() {
            continue;
        }

        let req = if session.state().balance >= 20 { PullRequest::multi() } else { PullRequest::single() };
        match session.request_pull(req, now) {
            Ok(_) => {
                // Reveal would run here for `commit_delay()`.
                let p = session.commit_pull().expect("pull was pending");
                if p.outcome.best_tier > gacha_economy::Tier::Common {
                    println!(
                        "[{:>3}s] x{} -> +{} ({})",
                        second,
                        p.request.count,
                        p.outcome.total_earned,
                        p.outcome.best_tier.as_str()
                    );
                }
            }
            Err(Rejection::InsufficientBalance { .. }) => {}
            Err(other) => println!("[{second:>3}s] rejected: {other}"),
        }
    }

    let st = session.state();
    let rank = session.standing().map(|r| r.title).unwrap_or_default();
    println!("== Session after {}s ==", now / 1_000);
    println!("balance         {}", st.balance);
    println!("high-water-mark {} ({rank})", st.high_water_mark);
    println!("pulls           {}", st.totals.pulls_performed);
    println!("earned          {}", st.totals.resource_earned);
    println!("speed level     {} (interval {}s)", st.speed_level, session.free_draw_interval());
    for offer in session.offers() {
        println!("  {:<14} {:>4}  {:?}", offer.id, offer.cost, offer.status);
    }
    println!("save: {} bytes", session.save().map(|s| s.len()).unwrap_or(0));
}
