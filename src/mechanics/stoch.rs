/// Stochastic mechanics: the injected random source plus Bernoulli helpers.
/// Note: any `rand_core::RngCore` (e.g. seeded `bevy_prng::WyRand`) is a
/// `RandomSource`, so tests can pin a seed and replay a batch exactly.
use rand_core::RngCore;

/// Random capability consumed by the pull resolver.
pub trait RandomSource {
    /// Uniform sample in [0, 1).
    fn draw_unit(&mut self) -> f64;
    /// Raw 64 bits (used for result identifiers).
    fn draw_u64(&mut self) -> u64;
}

impl<R: RngCore + ?Sized> RandomSource for R {
    #[inline]
    fn draw_unit(&mut self) -> f64 {
        unit_from_bits(self.next_u64())
    }

    #[inline]
    fn draw_u64(&mut self) -> u64 {
        self.next_u64()
    }
}

/// Top 53 bits → [0, 1).
#[inline]
pub fn unit_from_bits(bits: u64) -> f64 {
    ((bits >> 11) as f64) / ((1u64 << 53) as f64)
}

/// Bernoulli(p) against the injected source.
#[inline]
pub fn bernoulli<R: RandomSource + ?Sized>(rng: &mut R, p: f64) -> bool {
    rng.draw_unit() < p.clamp(0.0, 1.0)
}
