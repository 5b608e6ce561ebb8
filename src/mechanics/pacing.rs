/// Pacing mechanics: passive-income interval and countdown display.

/// Free-draw interval: max(min, base - level * step).
#[inline]
pub fn free_draw_interval(base_secs: u32, min_secs: u32, speed_level: u32, secs_per_level: u32) -> u32 {
    base_secs
        .saturating_sub(speed_level.saturating_mul(secs_per_level))
        .max(min_secs)
}

/// Fraction of the current interval already elapsed (0..1).
#[inline]
pub fn countdown_progress(countdown_secs: u32, interval_secs: u32) -> f64 {
    if interval_secs == 0 {
        return 1.0;
    }
    let remaining = f64::from(countdown_secs.min(interval_secs)) / f64::from(interval_secs);
    (1.0 - remaining).clamp(0.0, 1.0)
}
