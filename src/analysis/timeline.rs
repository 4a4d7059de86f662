//! Turns a viewer's detection rows into contiguous emotion events.

use crate::models::{
    video::same_video_file, AnalysisIssue, ClosingBoundary, DetectionRow, UserEvent,
};
use crate::utils::parse_decimal;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::log_debug;

/// Minimum number of `;`-separated fields a detection row needs.
const MIN_ROW_FIELDS: usize = 4;

/// Parse one semicolon-delimited detection row.
///
/// Rows with fewer than four fields or an unparsable elapsed time are rejected.
pub fn parse_row(line: &str) -> Result<DetectionRow, AnalysisIssue> {
    let malformed = || AnalysisIssue::MalformedRow {
        line: line.to_string(),
    };

    let fields: Vec<&str> = line.split(';').collect();
    if fields.len() < MIN_ROW_FIELDS {
        return Err(malformed());
    }

    let elapsed_secs = parse_decimal(fields[3]).ok_or_else(malformed)?;

    Ok(DetectionRow {
        user: fields[0].trim().to_string(),
        emotion: fields[1].trim().to_lowercase(),
        video_file: fields[2].trim().to_string(),
        elapsed_secs,
    })
}

/// Parse every non-blank line, recording the dropped ones in `issues`.
pub fn parse_rows<'a, I>(lines: I, issues: &mut Vec<AnalysisIssue>) -> Vec<DetectionRow>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut rows = Vec::new();
    for line in lines {
        if line.trim().is_empty() {
            continue;
        }

        match parse_row(line) {
            Ok(row) => rows.push(row),
            Err(issue) => {
                log_debug!("dropping detection row: {issue}");
                issues.push(issue);
            }
        }
    }
    rows
}

/// Build a timeline closing the final event at the video length.
pub fn build_user_timeline(
    rows: &[DetectionRow],
    video_file: &str,
    video_length: f64,
) -> Vec<UserEvent> {
    TimelineBuilder::new(ClosingBoundary::VideoLength).build(rows, video_file, video_length)
}

/// Builds contiguous [`UserEvent`]s from rows in file order.
///
/// Rows are not re-sorted. Each row closes the event opened by the previous
/// row, so consecutive events always share a boundary. When the video length is
/// known, elapsed times past it are capped to it. A length of zero or less
/// means unknown.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimelineBuilder {
    boundary: ClosingBoundary,
}

impl TimelineBuilder {
    pub fn new(boundary: ClosingBoundary) -> Self {
        Self { boundary }
    }

    pub fn build(
        &self,
        rows: &[DetectionRow],
        video_file: &str,
        video_length: f64,
    ) -> Vec<UserEvent> {
        let horizon = (video_length > 0.0).then_some(video_length);
        let cap = |secs: f64| match horizon {
            Some(length) => secs.min(length),
            None => secs,
        };

        let mut events = Vec::new();
        let mut last_time = 0.0;
        let mut last_emotion: Option<&str> = None;

        for row in rows
            .iter()
            .filter(|row| same_video_file(video_file, &row.video_file))
        {
            let elapsed = cap(row.elapsed_secs);
            if let Some(emotion) = last_emotion {
                events.push(UserEvent::new(last_time, elapsed, emotion));
            }

            last_time = elapsed;
            last_emotion = Some(row.emotion.as_str());
        }

        if let Some(emotion) = last_emotion {
            let end = match self.boundary {
                ClosingBoundary::VideoLength => horizon.unwrap_or(last_time),
                // `last_time` is already capped by the video length.
                ClosingBoundary::LastSample => last_time,
            };
            events.push(UserEvent::new(last_time, end, emotion));
        }

        events
    }
}
