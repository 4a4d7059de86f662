//! Greedy coloring of predicted intervals for collision-free rendering.
//!
//! Keys are visited in (start, end) order and each takes the smallest color
//! index not used by an already-colored key that strictly overlaps it. This is
//! order-dependent and may use more colors than an optimal interval coloring;
//! the rendered colors depend on it, so it stays greedy.

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::models::{ColoredInterval, IntervalKey, PredictedInterval};

/// Color index per distinct (start, end) key. Immutable once computed.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorAssignment {
    indices: HashMap<IntervalKey, usize>,
    palette_size: usize,
}

impl ColorAssignment {
    /// Raw greedy index, before wrapping around the palette.
    pub fn index_of(&self, key: &IntervalKey) -> Option<usize> {
        self.indices.get(key).copied()
    }

    /// Palette slot for a key. Indices beyond the palette wrap around.
    pub fn palette_slot(&self, key: &IntervalKey) -> Option<usize> {
        if self.palette_size == 0 {
            return None;
        }
        self.index_of(key).map(|idx| idx % self.palette_size)
    }

    pub fn color_for<'a>(&self, key: &IntervalKey, palette: &'a [String]) -> Option<&'a str> {
        self.palette_slot(key)
            .and_then(|slot| palette.get(slot))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Number of distinct raw indices in use.
    pub fn distinct_colors(&self) -> usize {
        self.indices.values().collect::<HashSet<_>>().len()
    }

    /// Assignments ordered by key.
    pub fn entries(&self) -> Vec<(IntervalKey, usize)> {
        let mut entries: Vec<(IntervalKey, usize)> =
            self.indices.iter().map(|(key, idx)| (*key, *idx)).collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }

    /// Resolve every key to a palette color for rendering, falling back to `fallback`.
    pub fn colored_intervals(&self, palette: &[String], fallback: &str) -> Vec<ColoredInterval> {
        self.entries()
            .into_iter()
            .map(|(key, color_index)| ColoredInterval {
                key,
                color_index,
                color: self
                    .color_for(&key, palette)
                    .unwrap_or(fallback)
                    .to_string(),
            })
            .collect()
    }
}

/// Assign greedy color indices to the distinct spans of `predicted`.
pub fn color_assign(predicted: &[PredictedInterval], palette_size: usize) -> ColorAssignment {
    let keys: BTreeSet<IntervalKey> = predicted.iter().map(PredictedInterval::key).collect();

    let mut indices: HashMap<IntervalKey, usize> = HashMap::with_capacity(keys.len());
    for key in keys {
        let used: HashSet<usize> = indices
            .iter()
            .filter(|(colored, _)| colored.strictly_overlaps(&key))
            .map(|(_, idx)| *idx)
            .collect();

        let color_index = (0..).find(|idx| !used.contains(idx)).unwrap_or_default();
        indices.insert(key, color_index);
    }

    ColorAssignment {
        indices,
        palette_size,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interval(start: f64, end: f64) -> PredictedInterval {
        PredictedInterval::new("happy", start, end)
    }

    fn assert_safe(predicted: &[PredictedInterval], colors: &ColorAssignment) {
        for a in predicted {
            for b in predicted {
                let (ka, kb) = (a.key(), b.key());
                if ka != kb && ka.strictly_overlaps(&kb) {
                    assert_ne!(colors.index_of(&ka), colors.index_of(&kb));
                }
            }
        }
    }

    #[test]
    fn duplicate_spans_share_one_decision() {
        let predicted = vec![
            PredictedInterval::new("happy", 10.0, 20.0),
            PredictedInterval::new("sad", 10.0, 20.0),
        ];

        let colors = color_assign(&predicted, 7);
        assert_eq!(colors.len(), 1);
        assert_eq!(colors.index_of(&IntervalKey::new(10.0, 20.0)), Some(0));
    }

    #[test]
    fn overlapping_spans_get_distinct_colors() {
        let predicted = vec![interval(0.0, 10.0), interval(5.0, 15.0), interval(8.0, 9.0)];

        let colors = color_assign(&predicted, 7);
        assert_eq!(colors.index_of(&IntervalKey::new(0.0, 10.0)), Some(0));
        assert_eq!(colors.index_of(&IntervalKey::new(5.0, 15.0)), Some(1));
        assert_eq!(colors.index_of(&IntervalKey::new(8.0, 9.0)), Some(2));
        assert_safe(&predicted, &colors);
    }

    #[test]
    fn touching_spans_reuse_colors() {
        let predicted = vec![interval(10.0, 20.0), interval(0.0, 10.0), interval(20.0, 30.0)];

        let colors = color_assign(&predicted, 7);
        assert_eq!(colors.distinct_colors(), 1);
    }

    #[test]
    fn freed_colors_are_reused_greedily() {
        let predicted = vec![
            interval(0.0, 10.0),
            interval(2.0, 4.0),
            interval(5.0, 12.0),
            interval(11.0, 14.0),
        ];

        let colors = color_assign(&predicted, 7);
        assert_eq!(colors.index_of(&IntervalKey::new(2.0, 4.0)), Some(1));
        assert_eq!(colors.index_of(&IntervalKey::new(5.0, 12.0)), Some(1));
        assert_eq!(colors.index_of(&IntervalKey::new(11.0, 14.0)), Some(0));
        assert_safe(&predicted, &colors);
    }

    #[test]
    fn palette_wraps_around() {
        let predicted: Vec<PredictedInterval> =
            (0..4).map(|offset| interval(offset as f64, 100.0)).collect();

        let colors = color_assign(&predicted, 3);
        let key = IntervalKey::new(3.0, 100.0);
        assert_eq!(colors.index_of(&key), Some(3));
        assert_eq!(colors.palette_slot(&key), Some(0));

        let palette: Vec<String> = vec!["#000000".into(), "#111111".into(), "#222222".into()];
        assert_eq!(colors.color_for(&key, &palette), Some("#000000"));
    }

    #[test]
    fn empty_palette_has_no_slots() {
        let colors = color_assign(&[interval(0.0, 1.0)], 0);
        assert_eq!(colors.palette_slot(&IntervalKey::new(0.0, 1.0)), None);
    }

    #[test]
    fn crowded_layout_stays_safe() {
        let predicted: Vec<PredictedInterval> = (0..40)
            .map(|i| {
                let start = (i * 7 % 23) as f64;
                interval(start, start + (i % 5) as f64 + 0.5)
            })
            .collect();

        let colors = color_assign(&predicted, 7);
        assert_safe(&predicted, &colors);
    }
}
