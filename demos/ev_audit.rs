// demos/ev_audit.rs
// Run with:
//   cargo run --example ev_audit

use bevy_prng::WyRand;
use gacha_economy::systems::pull_resolver;
use gacha_economy::{EconomyConfig, PullModifiers, build_distribution};
use rand_core::SeedableRng;

const PULLS: u32 = 1_000_000;

fn main() {
    let cfg = EconomyConfig::default();

    for (label, target) in [("base", cfg.base_target_ev), ("luck", 1.1)] {
        let dist = build_distribution(target, cfg.rarity_skew, &cfg.reward_ladder);
        println!("== {label}: target EV {target:.2} ==");
        for row in dist.rows() {
            println!("  {:>3}  {:>8.4}%", row.reward, row.probability * 100.0);
        }
        println!("  analytic EV {:.6}", dist.expected_value());

        for (name, mods) in [
            ("plain", PullModifiers::default()),
            ("double", PullModifiers { shield_charges: 0, double_chance: Some(0.10) }),
        ] {
            let mut rng = WyRand::from_seed(7u64.to_le_bytes());
            let out = pull_resolver::resolve(PULLS, &dist, mods, &mut rng, 0);
            let ev = out.total_earned as f64 / f64::from(PULLS);
            println!("  empirical EV ({name:<6}) {ev:.6}");
        }
    }
}
