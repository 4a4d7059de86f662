//! Predicted emotion intervals and their (start, end) keys.

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// An expert-labeled span of video time during which `emotion` is expected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictedInterval {
    pub emotion: String,
    pub start: f64,
    pub end: f64,
}

impl PredictedInterval {
    pub fn new(emotion: impl Into<String>, start: f64, end: f64) -> Self {
        Self {
            emotion: emotion.into(),
            start,
            end,
        }
    }

    pub fn key(&self) -> IntervalKey {
        IntervalKey::new(self.start, self.end)
    }

    /// Closed-interval containment: both endpoints count as active.
    pub fn is_active_at(&self, t: f64) -> bool {
        self.key().contains(t)
    }
}

/// The (start, end) span shared by a scoring group and used as the coloring key.
///
/// Equality and hashing compare the bit patterns of both bounds, with `-0.0`
/// folded into `0.0`. Parsed bounds are always finite.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntervalKey {
    pub start: f64,
    pub end: f64,
}

impl IntervalKey {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, t: f64) -> bool {
        t >= self.start && t <= self.end
    }

    /// Open-interval overlap. Spans that only touch at an endpoint do not overlap.
    pub fn strictly_overlaps(&self, other: &IntervalKey) -> bool {
        self.start < other.end && other.start < self.end
    }

    fn bits(value: f64) -> u64 {
        if value == 0.0 {
            0
        } else {
            value.to_bits()
        }
    }
}

impl PartialEq for IntervalKey {
    fn eq(&self, other: &Self) -> bool {
        Self::bits(self.start) == Self::bits(other.start)
            && Self::bits(self.end) == Self::bits(other.end)
    }
}

impl Eq for IntervalKey {}

impl Hash for IntervalKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Self::bits(self.start).hash(state);
        Self::bits(self.end).hash(state);
    }
}

impl PartialOrd for IntervalKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for IntervalKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.start
            .total_cmp(&other.start)
            .then_with(|| self.end.total_cmp(&other.end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn keys_with_signed_zero_are_equal() {
        let mut keys = HashSet::new();
        keys.insert(IntervalKey::new(0.0, 5.0));
        keys.insert(IntervalKey::new(-0.0, 5.0));
        assert_eq!(keys.len(), 1);
    }

    #[test]
    fn touching_spans_do_not_strictly_overlap() {
        let a = IntervalKey::new(0.0, 10.0);
        let b = IntervalKey::new(10.0, 20.0);
        assert!(!a.strictly_overlaps(&b));
        assert!(!b.strictly_overlaps(&a));
        assert!(a.strictly_overlaps(&IntervalKey::new(9.5, 12.0)));
    }

    #[test]
    fn containment_is_closed() {
        let interval = PredictedInterval::new("happy", 10.0, 20.0);
        assert!(interval.is_active_at(10.0));
        assert!(interval.is_active_at(20.0));
        assert!(!interval.is_active_at(20.01));
    }

    #[test]
    fn keys_order_by_start_then_end() {
        let mut keys = vec![
            IntervalKey::new(5.0, 9.0),
            IntervalKey::new(1.0, 8.0),
            IntervalKey::new(1.0, 3.0),
        ];
        keys.sort();
        assert_eq!(
            keys,
            vec![
                IntervalKey::new(1.0, 3.0),
                IntervalKey::new(1.0, 8.0),
                IntervalKey::new(5.0, 9.0),
            ]
        );
    }
}
