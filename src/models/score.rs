use std::fmt;

use serde::{Deserialize, Serialize};

use super::predicted::{IntervalKey, PredictedInterval};

/// Predicted intervals sharing one exact (start, end) span, scored with OR semantics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreGroup {
    pub key: IntervalKey,
    pub intervals: Vec<PredictedInterval>,
}

impl ScoreGroup {
    pub fn emotions(&self) -> Vec<String> {
        self.intervals
            .iter()
            .map(|interval| interval.emotion.clone())
            .collect()
    }
}

/// Per-group aggregate across every user with data for the video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupScore {
    pub key: IntervalKey,
    pub emotions: Vec<String>,
    /// Users whose timeline hit the group.
    pub hits: usize,
    /// Users that contributed to the average.
    pub users: usize,
    /// Whole percent in `[0, 100]`; `0.0` when no user contributed.
    pub percent: f64,
}

/// Per-video aggregate used for the summary label.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "percent")]
pub enum VideoSummary {
    Percent(f64),
    NoData,
}

impl fmt::Display for VideoSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VideoSummary::Percent(value) => write!(f, "{value}%"),
            VideoSummary::NoData => write!(f, "no data"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveGroupScore {
    pub percent: f64,
    pub key: IntervalKey,
}

/// Live "currently satisfied" value at one playback position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "groups")]
pub enum LiveReading {
    NoActiveSegment,
    Segments(Vec<ActiveGroupScore>),
}

impl Default for LiveReading {
    fn default() -> Self {
        LiveReading::NoActiveSegment
    }
}

impl fmt::Display for LiveReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LiveReading::NoActiveSegment => write!(f, "none"),
            LiveReading::Segments(groups) => {
                let rendered: Vec<String> = groups
                    .iter()
                    .map(|group| format!("{}%", group.percent))
                    .collect();
                write!(f, "{}", rendered.join(", "))
            }
        }
    }
}
