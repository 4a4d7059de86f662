//! Detection rows and the per-user emotion timeline derived from them.
//!
//! Rows come from a viewer's detection log; a timeline is rebuilt from those
//! rows on every analysis call and never persisted.

use serde::{Deserialize, Serialize};

/// One parsed detection sample: `user; emotion; videoFile; elapsedSeconds; ...`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionRow {
    pub user: String,
    /// Trimmed and lowercased.
    pub emotion: String,
    pub video_file: String,
    pub elapsed_secs: f64,
}

/// A span during which the viewer's detected emotion stayed constant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserEvent {
    pub start: f64,
    pub end: f64,
    pub emotion: String,
}

impl UserEvent {
    pub fn new(start: f64, end: f64, emotion: impl Into<String>) -> Self {
        Self {
            start,
            end,
            emotion: emotion.into(),
        }
    }
}

/// Where the final event of a timeline is closed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum ClosingBoundary {
    /// The last detected emotion lasts until the end of the video.
    VideoLength,
    /// The last event ends at the last observed sample, capped by the video length.
    LastSample,
}

impl Default for ClosingBoundary {
    fn default() -> Self {
        ClosingBoundary::VideoLength
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserTimeline {
    pub user: String,
    pub events: Vec<UserEvent>,
    /// Elapsed time of the last sample that contributed to `events`.
    pub last_sample_secs: Option<f64>,
}

impl UserTimeline {
    pub fn new(user: impl Into<String>, events: Vec<UserEvent>) -> Self {
        let last_sample_secs = events.last().map(|event| event.start);
        Self {
            user: user.into(),
            events,
            last_sample_secs,
        }
    }

    /// Users without events are excluded from every aggregate.
    pub fn has_data(&self) -> bool {
        !self.events.is_empty()
    }
}
