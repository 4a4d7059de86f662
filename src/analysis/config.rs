use crate::models::ClosingBoundary;

/// Default rendering palette for predicted intervals.
pub const DEFAULT_PALETTE: [&str; 7] = [
    "#FF6DC7", "#B4A7FF", "#84F5FF", "#ACFF9C", "#FCFF9A", "#FFCC8E", "#FF9191",
];

/// Color of predicted intervals that are not active at the playback position.
pub const DEFAULT_INACTIVE_COLOR: &str = "#FF1FA9";

/// Configuration for one analysis call.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    /// Where the final event of every user timeline is closed.
    pub closing_boundary: ClosingBoundary,

    /// Palette that greedy color indices wrap around.
    pub palette: Vec<String>,
    pub inactive_color: String,

    /// Users pre-selected for charting, in listing order.
    pub max_selected_users: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            closing_boundary: ClosingBoundary::VideoLength,
            palette: DEFAULT_PALETTE.iter().map(|color| color.to_string()).collect(),
            inactive_color: DEFAULT_INACTIVE_COLOR.to_string(),
            max_selected_users: 5,
        }
    }
}
