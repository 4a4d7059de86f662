//! Result of a top-level analysis call, handed to the presentation layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{
    issue::AnalysisIssue,
    predicted::{IntervalKey, PredictedInterval},
    score::{GroupScore, VideoSummary},
    video::VideoDescriptor,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColoredInterval {
    pub key: IntervalKey,
    /// Greedy color index before the palette wrap.
    pub color_index: usize,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntervalHighlight {
    pub key: IntervalKey,
    pub emotion: String,
    pub active: bool,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserReport {
    pub user: String,
    pub display_name: String,
    pub matched_groups: usize,
    pub total_groups: usize,
    pub score_percent: f64,
    pub watch_percent: f64,
    /// Charted; at most `max_selected_users` users are selected at once.
    pub selected: bool,
    /// Step series for the chart. Filled for selected users only.
    #[serde(default)]
    pub emotion_series: Vec<EmotionSample>,
}

/// One step of a user's emotion chart: `emotion` held from `start` to `end`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmotionSample {
    pub start: f64,
    pub end: f64,
    pub emotion: String,
    /// Row of the emotion on the chart axis.
    pub level: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoAnalysis {
    pub id: String,
    pub analyzed_at: DateTime<Utc>,
    pub video: VideoDescriptor,
    pub predicted: Vec<PredictedInterval>,
    pub groups: Vec<GroupScore>,
    pub colors: Vec<ColoredInterval>,
    pub summary: VideoSummary,
    pub users: Vec<UserReport>,
    pub issues: Vec<AnalysisIssue>,
}
