pub mod issue;
pub mod predicted;
pub mod report;
pub mod score;
pub mod timeline;
pub mod video;

pub use issue::AnalysisIssue;
pub use predicted::{IntervalKey, PredictedInterval};
pub use report::{ColoredInterval, EmotionSample, IntervalHighlight, UserReport, VideoAnalysis};
pub use score::{ActiveGroupScore, GroupScore, LiveReading, ScoreGroup, VideoSummary};
pub use timeline::{ClosingBoundary, DetectionRow, UserEvent, UserTimeline};
pub use video::VideoDescriptor;
