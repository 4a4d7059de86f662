//! Live "currently satisfied" value at a playback position.

use crate::analysis::coloring::ColorAssignment;
use crate::analysis::scoring::{group_by_span, score_group};
use crate::models::{
    ActiveGroupScore, IntervalHighlight, LiveReading, PredictedInterval, ScoreGroup, UserTimeline,
};

/// Groups whose closed span contains `t`, in order of first appearance.
pub fn active_groups(t: f64, predicted: &[PredictedInterval]) -> Vec<ScoreGroup> {
    let active: Vec<PredictedInterval> = predicted
        .iter()
        .filter(|interval| interval.is_active_at(t))
        .cloned()
        .collect();
    group_by_span(&active)
}

/// Per-group aggregate of every active group at `t`.
pub fn active_group_scores(
    t: f64,
    predicted: &[PredictedInterval],
    timelines: &[UserTimeline],
) -> LiveReading {
    let groups = active_groups(t, predicted);
    if groups.is_empty() {
        return LiveReading::NoActiveSegment;
    }

    LiveReading::Segments(
        groups
            .iter()
            .map(|group| ActiveGroupScore {
                percent: score_group(group, timelines).percent,
                key: group.key,
            })
            .collect(),
    )
}

/// Highlight state of every predicted interval at `t`, in parser order.
///
/// Active intervals take their assigned palette color; inactive ones, and keys
/// without an assignment, take `inactive_color`.
pub fn interval_highlights(
    t: f64,
    predicted: &[PredictedInterval],
    colors: &ColorAssignment,
    palette: &[String],
    inactive_color: &str,
) -> Vec<IntervalHighlight> {
    predicted
        .iter()
        .map(|interval| {
            let key = interval.key();
            let active = interval.is_active_at(t);
            let color = if active {
                colors.color_for(&key, palette).unwrap_or(inactive_color)
            } else {
                inactive_color
            };

            IntervalHighlight {
                key,
                emotion: interval.emotion.clone(),
                active,
                color: color.to_string(),
            }
        })
        .collect()
}
