//! Group scoring across users.
//!
//! Predicted intervals are grouped by exact (start, end) equality. Two
//! intervals that overlap in time with different bounds land in different
//! groups; the wider notion of overlap is only used for coloring.

use std::collections::HashMap;

use crate::analysis::matcher::timeline_matches;
use crate::models::{
    GroupScore, IntervalKey, PredictedInterval, ScoreGroup, UserEvent, UserTimeline, VideoSummary,
};

/// Partition intervals by exact span, in order of first appearance.
pub fn group_by_span(predicted: &[PredictedInterval]) -> Vec<ScoreGroup> {
    let mut groups: Vec<ScoreGroup> = Vec::new();
    let mut index_by_key: HashMap<IntervalKey, usize> = HashMap::new();

    for interval in predicted {
        let key = interval.key();
        match index_by_key.get(&key) {
            Some(&idx) => groups[idx].intervals.push(interval.clone()),
            None => {
                index_by_key.insert(key, groups.len());
                groups.push(ScoreGroup {
                    key,
                    intervals: vec![interval.clone()],
                });
            }
        }
    }

    groups
}

/// A group is hit when any of its intervals is matched by any event (OR).
pub fn group_hit(group: &ScoreGroup, events: &[UserEvent]) -> bool {
    group
        .intervals
        .iter()
        .any(|interval| timeline_matches(events, interval))
}

/// Score one group across every user with data.
pub fn score_group(group: &ScoreGroup, timelines: &[UserTimeline]) -> GroupScore {
    let contributing: Vec<&UserTimeline> = timelines.iter().filter(|t| t.has_data()).collect();
    let hits = contributing
        .iter()
        .filter(|timeline| group_hit(group, &timeline.events))
        .count();

    let percent = if contributing.is_empty() {
        0.0
    } else {
        round_percent(hits as f64 / contributing.len() as f64)
    };

    GroupScore {
        key: group.key,
        emotions: group.emotions(),
        hits,
        users: contributing.len(),
        percent,
    }
}

/// Per-group aggregates for a whole predicted set. Empty when nothing was predicted.
pub fn score_groups(
    predicted: &[PredictedInterval],
    timelines: &[UserTimeline],
) -> Vec<GroupScore> {
    group_by_span(predicted)
        .iter()
        .map(|group| score_group(group, timelines))
        .collect()
}

/// Matched and total group counts for one user.
pub fn user_group_matches(groups: &[ScoreGroup], events: &[UserEvent]) -> (usize, usize) {
    let matched = groups
        .iter()
        .filter(|group| group_hit(group, events))
        .count();
    (matched, groups.len())
}

/// Fraction of groups a user matched; `0.0` for a video without groups.
pub fn user_ratio(groups: &[ScoreGroup], events: &[UserEvent]) -> f64 {
    let (matched, total) = user_group_matches(groups, events);
    if total == 0 {
        0.0
    } else {
        matched as f64 / total as f64
    }
}

/// Average of every user's matched/total ratio across all groups of the video.
pub fn score_video(predicted: &[PredictedInterval], timelines: &[UserTimeline]) -> VideoSummary {
    let groups = group_by_span(predicted);
    let ratios: Vec<f64> = timelines
        .iter()
        .filter(|timeline| timeline.has_data())
        .map(|timeline| user_ratio(&groups, &timeline.events))
        .collect();

    if ratios.is_empty() {
        return VideoSummary::NoData;
    }

    let mean = ratios.iter().sum::<f64>() / ratios.len() as f64;
    VideoSummary::Percent(round_percent(mean))
}

/// Convert a fraction to a whole percent in `[0, 100]`, ties to even.
pub fn round_percent(fraction: f64) -> f64 {
    (fraction * 100.0).round_ties_even().clamp(0.0, 100.0)
}
