//! Entrance reveal: nodes fade and grow in tier by tier.
//!
//! Purely a function of elapsed time; layout and viewport never see it.

use std::time::Duration;

pub const TIER_STAGGER: Duration = Duration::from_millis(80);
pub const REVEAL_DURATION: Duration = Duration::from_millis(360);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reveal {
    enabled: bool,
}

impl Reveal {
    pub fn new(reduce_motion: bool) -> Self {
        Self {
            enabled: !reduce_motion,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// 0.0 (hidden) ..= 1.0 (fully shown) for a node in `tier`, `elapsed` after mount.
    pub fn progress(&self, tier: u32, elapsed: Duration) -> f32 {
        if !self.enabled {
            return 1.0;
        }
        let delay = TIER_STAGGER.saturating_mul(tier);
        let Some(local) = elapsed.checked_sub(delay) else {
            return 0.0;
        };
        let t = (local.as_secs_f32() / REVEAL_DURATION.as_secs_f32()).min(1.0);
        ease_out_cubic(t)
    }

    /// True once every tier up to `max_tier` has finished revealing.
    pub fn is_settled(&self, max_tier: u32, elapsed: Duration) -> bool {
        !self.enabled || elapsed >= TIER_STAGGER.saturating_mul(max_tier) + REVEAL_DURATION
    }
}

pub fn ease_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reduced_motion_shows_everything_immediately() {
        let reveal = Reveal::new(true);
        assert_eq!(reveal.progress(7, Duration::ZERO), 1.0);
        assert!(reveal.is_settled(7, Duration::ZERO));
    }

    #[test]
    fn later_tiers_start_later() {
        let reveal = Reveal::new(false);
        let at = Duration::from_millis(100);
        assert!(reveal.progress(0, at) > reveal.progress(1, at));
        assert_eq!(reveal.progress(2, at), 0.0);
    }

    #[test]
    fn reveal_completes_after_stagger_plus_duration() {
        let reveal = Reveal::new(false);
        let done = Duration::from_millis(3 * 80 + 360);
        assert_eq!(reveal.progress(3, done), 1.0);
        assert!(reveal.is_settled(3, done));
        assert!(!reveal.is_settled(3, done - Duration::from_millis(1)));
    }

    #[test]
    fn ease_out_is_monotonic_with_fixed_ends() {
        assert_eq!(ease_out_cubic(0.0), 0.0);
        assert_eq!(ease_out_cubic(1.0), 1.0);
        assert!(ease_out_cubic(0.5) > 0.5);
    }
}
