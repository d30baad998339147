//! Accuracy-based fix filtering
//!
//! Decides whether a candidate fix replaces the current best one. Pure:
//! no side effects, identical results for identical inputs.

use crate::fix::Fix;
use chrono::{DateTime, Duration, Utc};

/// Filter deciding whether a candidate fix is worth keeping
///
/// Rejection rules, checked in order:
/// 1. Stale: the candidate is older than `max_age` (a cached reading
///    replayed by the source).
/// 2. Invalid: negative horizontal accuracy.
/// 3. Comparative: with no current fix any fresh, valid candidate wins;
///    otherwise the candidate must be strictly more accurate. Ties lose.
#[derive(Debug, Clone)]
pub struct FixFilter {
    max_age: Duration,
}

impl FixFilter {
    /// Create a filter that rejects fixes older than `max_age`
    pub fn new(max_age: Duration) -> Self {
        Self { max_age }
    }

    /// Decide whether `candidate` should replace `current`
    pub fn accept(&self, current: Option<&Fix>, candidate: &Fix, now: DateTime<Utc>) -> bool {
        if now - candidate.timestamp > self.max_age {
            return false;
        }
        if !candidate.is_valid() {
            return false;
        }
        match current {
            None => true,
            Some(current) => candidate.horizontal_accuracy < current.horizontal_accuracy,
        }
    }
}

impl Default for FixFilter {
    fn default() -> Self {
        Self::new(Duration::seconds(
            crate::config::defaults::DEFAULT_MAX_FIX_AGE_SECS as i64,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::Coordinates;

    fn fix(accuracy: f64, age_secs: i64, now: DateTime<Utc>) -> Fix {
        Fix::new(
            Coordinates::new(40.7128, -74.0060),
            accuracy,
            now - Duration::seconds(age_secs),
        )
    }

    #[test]
    fn test_first_fresh_valid_fix_accepted() {
        let filter = FixFilter::default();
        let now = Utc::now();
        assert!(filter.accept(None, &fix(165.0, 0, now), now));
    }

    #[test]
    fn test_stale_fix_rejected() {
        let filter = FixFilter::default();
        let now = Utc::now();

        // 8 s old: rejected regardless of accuracy, even with no current fix
        assert!(!filter.accept(None, &fix(1.0, 8, now), now));

        let current = fix(165.0, 0, now);
        assert!(!filter.accept(Some(&current), &fix(1.0, 8, now), now));
    }

    #[test]
    fn test_age_boundary() {
        let filter = FixFilter::default();
        let now = Utc::now();

        // Exactly 5 s old is not stale; just over is
        assert!(filter.accept(None, &fix(50.0, 5, now), now));
        assert!(!filter.accept(None, &fix(50.0, 6, now), now));
    }

    #[test]
    fn test_invalid_accuracy_rejected() {
        let filter = FixFilter::default();
        let now = Utc::now();
        assert!(!filter.accept(None, &fix(-1.0, 0, now), now));
    }

    #[test]
    fn test_strictly_more_accurate_accepted() {
        let filter = FixFilter::default();
        let now = Utc::now();
        let current = fix(76.0, 2, now);

        assert!(filter.accept(Some(&current), &fix(31.0, 0, now), now));
        assert!(!filter.accept(Some(&current), &fix(80.0, 0, now), now));
    }

    #[test]
    fn test_equal_accuracy_rejected() {
        let filter = FixFilter::default();
        let now = Utc::now();
        let current = fix(50.0, 1, now);
        assert!(!filter.accept(Some(&current), &fix(50.0, 0, now), now));
    }

    #[test]
    fn test_pure_and_repeatable() {
        let filter = FixFilter::default();
        let now = Utc::now();
        let current = fix(76.0, 2, now);
        let candidate = fix(31.0, 0, now);

        for _ in 0..3 {
            assert!(filter.accept(Some(&current), &candidate, now));
        }
    }
}
