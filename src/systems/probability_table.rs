//! Reward distribution calibrated to a target expected value.
//!
//! Positive rewards are weighted `1 / r^skew`, normalized, and then scaled so
//! that the mean return per pull hits `target_ev`. Whatever mass is left goes
//! to the zero reward, which always keeps at least 1%.

use serde::{Deserialize, Serialize};

/// Share of probability that may go to positive outcomes.
pub const MAX_POSITIVE_MASS: f64 = 0.99;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProbabilityRow {
    pub reward: u32,
    pub probability: f64,
}

/// Rows ordered zero first, then the ladder ascending.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Distribution {
    rows: Vec<ProbabilityRow>,
}

impl Distribution {
    pub fn rows(&self) -> &[ProbabilityRow] {
        &self.rows
    }

    pub fn zero_probability(&self) -> f64 {
        self.rows
            .iter()
            .filter(|r| r.reward == 0)
            .map(|r| r.probability)
            .sum()
    }

    pub fn expected_value(&self) -> f64 {
        self.rows.iter().map(|r| f64::from(r.reward) * r.probability).sum()
    }

    /// `(upper_bound, reward)` buckets for inverse-CDF sampling.
    pub fn cumulative(&self) -> Vec<(f64, u32)> {
        let mut acc = 0.0;
        self.rows
            .iter()
            .map(|r| {
                acc += r.probability;
                (acc, r.reward)
            })
            .collect()
    }

    /// Reward of the first bucket whose upper bound exceeds `u`.
    /// A `u` past the last bound (rounding) falls through to zero.
    pub fn sample(&self, u: f64) -> u32 {
        sample_cumulative(&self.cumulative(), u)
    }
}

#[inline]
pub(crate) fn sample_cumulative(buckets: &[(f64, u32)], u: f64) -> u32 {
    buckets
        .iter()
        .find(|(limit, _)| u < *limit)
        .map_or(0, |&(_, reward)| reward)
}

/// Build the table for one `target_ev` / `skew` pair over a positive ladder.
pub fn build_distribution(target_ev: f64, skew: f64, ladder: &[u32]) -> Distribution {
    let weights: Vec<f64> = ladder
        .iter()
        .map(|&r| 1.0 / f64::from(r.max(1)).powf(skew))
        .collect();
    let sum_w: f64 = weights.iter().sum();

    if ladder.is_empty() || !(sum_w > 0.0) {
        return Distribution {
            rows: vec![ProbabilityRow { reward: 0, probability: 1.0 }],
        };
    }

    let conditional: Vec<f64> = weights.iter().map(|w| w / sum_w).collect();
    let mean_positive: f64 = ladder
        .iter()
        .zip(&conditional)
        .map(|(&r, q)| f64::from(r) * q)
        .sum();

    let s = target_ev / mean_positive;
    // NaN or negative EV collapses to an all-zero table.
    let s = if s.is_nan() { 0.0 } else { s.clamp(0.0, MAX_POSITIVE_MASS) };

    let mut rows = Vec::with_capacity(ladder.len() + 1);
    rows.push(ProbabilityRow { reward: 0, probability: 1.0 - s });
    rows.extend(ladder.iter().zip(&conditional).map(|(&reward, q)| ProbabilityRow {
        reward,
        probability: q * s,
    }));
    Distribution { rows }
}
