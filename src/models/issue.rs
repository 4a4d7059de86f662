//! Non-fatal conditions met while analysing a video.
//!
//! None of these abort an analysis. They are logged where they happen and
//! collected into the report so the caller can see what was dropped.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum AnalysisIssue {
    /// A detection row had too few fields or an unparsable elapsed time. The row is dropped.
    MalformedRow { line: String },
    /// A predicted item lacked parentheses or two numeric bounds. The item is dropped.
    MalformedPredictionItem { item: String },
    /// The user has no rows for the video and is left out of every aggregate.
    MissingUserData { user: String },
    /// The video carries no usable predicted intervals.
    NoPredictedIntervals,
    /// A user's log could not be read. The user is skipped.
    StorageUnavailable { source: String, reason: String },
}

impl fmt::Display for AnalysisIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedRow { line } => write!(f, "malformed detection row '{line}'"),
            Self::MalformedPredictionItem { item } => {
                write!(f, "malformed predicted item '{item}'")
            }
            Self::MissingUserData { user } => write!(f, "no rows for this video from {user}"),
            Self::NoPredictedIntervals => write!(f, "video has no predicted intervals"),
            Self::StorageUnavailable { source, reason } => {
                write!(f, "could not read {source}: {reason}")
            }
        }
    }
}
