pub mod coloring;
pub mod config;
pub mod live;
pub mod matcher;
pub mod predicted;
pub mod report;
pub mod scoring;
pub mod series;
pub mod timeline;

pub use coloring::{color_assign, ColorAssignment};
pub use config::AnalysisConfig;
pub use live::{active_group_scores, interval_highlights};
pub use matcher::matches;
pub use predicted::{parse_predicted, render_predicted};
pub use report::{analyze_video, select_user};
pub use scoring::{score_groups, score_video};
pub use series::user_emotion_series;
pub use timeline::{build_user_timeline, parse_row, TimelineBuilder};
