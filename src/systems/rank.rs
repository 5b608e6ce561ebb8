use serde::Serialize;

use crate::config::Rank;

/// Where a high-water-mark sits on the rank ladder.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RankStanding {
    pub index: usize,
    pub title: String,
    pub threshold: u64,
    pub next_threshold: Option<u64>,
    /// Fraction of the way to the next threshold; 0 at the top rank.
    pub progress: f64,
}

/// Greatest threshold <= `high_water_mark` (lowest rank if none). `None` only
/// for an empty ladder. `ladder` must be ascending.
pub fn standing(high_water_mark: u64, ladder: &[Rank]) -> Option<RankStanding> {
    let index = ladder
        .iter()
        .rposition(|r| r.threshold <= high_water_mark)
        .unwrap_or(0);
    let rank = ladder.get(index)?;
    let next_threshold = ladder.get(index + 1).map(|r| r.threshold);

    let progress = match next_threshold {
        Some(next) if next > rank.threshold => {
            let span = (next - rank.threshold) as f64;
            (high_water_mark.saturating_sub(rank.threshold) as f64 / span).clamp(0.0, 1.0)
        }
        _ => 0.0,
    };

    Some(RankStanding {
        index,
        title: rank.title.clone(),
        threshold: rank.threshold,
        next_threshold,
        progress,
    })
}
