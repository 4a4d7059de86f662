use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::analysis::{
    active_group_scores, color_assign, interval_highlights, parse_predicted, AnalysisConfig,
    ColorAssignment,
};
use crate::models::{IntervalHighlight, LiveReading, PredictedInterval, VideoDescriptor};
use crate::storage::TimelineSource;

/// Live accuracy at one playback position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveSnapshot {
    pub session_id: String,
    /// Tick number; a snapshot only replaces one with a smaller sequence.
    pub sequence: u64,
    pub position_secs: f64,
    pub reading: LiveReading,
    pub highlights: Vec<IntervalHighlight>,
    pub computed_at: DateTime<Utc>,
}

/// Read-only state shared by every tick of one live run.
///
/// The predicted set and its color assignment are computed once; timelines are
/// pulled from the source on each tick so log changes show up while playing.
#[derive(Clone)]
pub struct LiveSession {
    id: String,
    video: Arc<VideoDescriptor>,
    predicted: Arc<Vec<PredictedInterval>>,
    colors: Arc<ColorAssignment>,
    config: Arc<AnalysisConfig>,
    source: Arc<dyn TimelineSource>,
}

impl LiveSession {
    pub fn new(
        video: VideoDescriptor,
        config: AnalysisConfig,
        source: Arc<dyn TimelineSource>,
    ) -> Self {
        let predicted = parse_predicted(&video.predicted_emotions_raw);
        let colors = color_assign(&predicted, config.palette.len());

        Self {
            id: Uuid::new_v4().to_string(),
            video: Arc::new(video),
            predicted: Arc::new(predicted),
            colors: Arc::new(colors),
            config: Arc::new(config),
            source,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn video(&self) -> &VideoDescriptor {
        &self.video
    }

    /// Revision of the timeline source; unchanged means the timelines are unchanged.
    pub fn source_revision(&self) -> u64 {
        self.source.revision()
    }

    pub fn snapshot(&self, sequence: u64, position_secs: f64) -> LiveSnapshot {
        let timelines = self
            .source
            .timelines_for(&self.video, self.config.closing_boundary);

        LiveSnapshot {
            session_id: self.id.clone(),
            sequence,
            position_secs,
            reading: active_group_scores(position_secs, &self.predicted, &timelines),
            highlights: interval_highlights(
                position_secs,
                &self.predicted,
                &self.colors,
                &self.config.palette,
                &self.config.inactive_color,
            ),
            computed_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{IntervalKey, UserEvent, UserTimeline};
    use crate::storage::StaticTimelines;

    fn session() -> LiveSession {
        let video = VideoDescriptor::new("clip.mp4", "happy(10-20),sad(10-20),angry(25-30)", 30.0);
        let timelines = StaticTimelines(vec![
            UserTimeline::new(
                "User1",
                vec![UserEvent::new(0.0, 15.0, "happy"), UserEvent::new(15.0, 30.0, "sad")],
            ),
            UserTimeline::new("User2", vec![UserEvent::new(0.0, 30.0, "angry")]),
        ]);
        LiveSession::new(video, AnalysisConfig::default(), Arc::new(timelines))
    }

    #[test]
    fn snapshot_scores_active_groups() {
        let session = session();
        let snapshot = session.snapshot(3, 12.0);

        assert_eq!(snapshot.sequence, 3);
        assert_eq!(snapshot.session_id, session.id());
        assert_eq!(snapshot.reading.to_string(), "50%");
        assert_eq!(snapshot.highlights.len(), 3);
        assert!(snapshot.highlights[0].active);
        assert_eq!(snapshot.highlights[0].color, "#FF6DC7");
        assert!(!snapshot.highlights[2].active);
        assert_eq!(snapshot.highlights[2].color, "#FF1FA9");
    }

    #[test]
    fn snapshot_outside_every_interval() {
        let snapshot = session().snapshot(1, 22.0);
        assert_eq!(snapshot.reading, LiveReading::NoActiveSegment);
        assert!(snapshot.highlights.iter().all(|highlight| !highlight.active));
    }

    #[test]
    fn end_of_video_is_active() {
        let snapshot = session().snapshot(1, 30.0);
        match snapshot.reading {
            LiveReading::Segments(groups) => {
                assert_eq!(groups.len(), 1);
                assert_eq!(groups[0].key, IntervalKey::new(25.0, 30.0));
                assert_eq!(groups[0].percent, 50.0);
            }
            other => panic!("expected an active segment, got {other:?}"),
        }
    }
}
