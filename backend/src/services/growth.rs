use serde::Serialize;

/// Growth points needed for one level-up.
pub const LEVEL_UP_THRESHOLD: i64 = 100;

/// A plant's progression: level starts at 1, points stay below the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Growth {
    pub level: i64,
    pub growth_points: i64,
}

impl Default for Growth {
    fn default() -> Self {
        Self {
            level: 1,
            growth_points: 0,
        }
    }
}

impl Growth {
    pub fn new(level: i64, growth_points: i64) -> Self {
        Self {
            level,
            growth_points,
        }
    }

    /// Add `award` points, carrying every full threshold into a level.
    pub fn accrue(self, award: i64) -> Self {
        let mut next = self;
        next.growth_points += award.max(0);
        while next.growth_points >= LEVEL_UP_THRESHOLD {
            next.level += 1;
            next.growth_points -= LEVEL_UP_THRESHOLD;
        }
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accrue_below_threshold() {
        assert_eq!(Growth::default().accrue(20), Growth::new(1, 20));
    }

    #[test]
    fn test_accrue_exact_threshold_levels_up() {
        assert_eq!(Growth::new(1, 80).accrue(20), Growth::new(2, 0));
    }

    #[test]
    fn test_accrue_carries_multiple_levels() {
        assert_eq!(Growth::new(3, 95).accrue(250), Growth::new(6, 45));
    }

    #[test]
    fn test_accrue_zero_is_noop() {
        assert_eq!(Growth::new(4, 99).accrue(0), Growth::new(4, 99));
    }

    #[test]
    fn test_accrue_is_not_idempotent() {
        let once = Growth::default().accrue(20);
        assert_ne!(once.accrue(20), once);
    }

    #[test]
    fn test_repeated_accrual_matches_closed_form() {
        let awards = [20, 5, 0, 20, 20, 5, 20, 20, 20, 5, 0, 20, 20, 20, 5, 5];
        for start_points in [0, 1, 50, 99] {
            for take in 0..=awards.len() {
                let start = Growth::new(2, start_points);
                let end = awards[..take].iter().fold(start, |g, a| g.accrue(*a));
                let total = start_points + awards[..take].iter().sum::<i64>();
                assert_eq!(end.level, 2 + total / LEVEL_UP_THRESHOLD);
                assert_eq!(end.growth_points, total % LEVEL_UP_THRESHOLD);
            }
        }
    }
}
