//! Per-user emotion step series for the charting collaborator.

use crate::models::{DetectionRow, EmotionSample, VideoDescriptor};

/// Chart axis, bottom to top.
pub const CHART_EMOTIONS: [&str; 7] = [
    "angry", "scared", "sad", "confused", "neutral", "surprised", "happy",
];

/// Detector status labels that never reach the chart.
pub const IGNORED_LABELS: [&str; 4] = ["no_face", "too_many_faces", "start", "stop"];

/// Axis row of a chartable emotion.
pub fn chart_level(emotion: &str) -> Option<usize> {
    if IGNORED_LABELS.contains(&emotion) {
        return None;
    }
    CHART_EMOTIONS.iter().position(|axis| *axis == emotion)
}

/// Build the step series of one user for `video`.
///
/// Unlike the scoring timeline, samples are sorted by elapsed time (stable for
/// ties) and samples past a known video length are dropped rather than capped.
/// Status labels and emotions outside the chart axis are skipped without
/// closing the current step. The last step runs to the video length, or ends
/// at its own start when the length is unknown.
pub fn user_emotion_series(rows: &[DetectionRow], video: &VideoDescriptor) -> Vec<EmotionSample> {
    let mut samples: Vec<(f64, &str, usize)> = rows
        .iter()
        .filter(|row| video.matches_file(&row.video_file))
        .filter(|row| !video.has_known_length() || row.elapsed_secs <= video.length_secs)
        .filter_map(|row| {
            chart_level(&row.emotion).map(|level| (row.elapsed_secs, row.emotion.as_str(), level))
        })
        .collect();
    samples.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut series = Vec::with_capacity(samples.len());
    let mut current: Option<(f64, &str, usize)> = None;

    for sample in samples {
        if let Some((start, emotion, level)) = current {
            series.push(EmotionSample {
                start,
                end: sample.0,
                emotion: emotion.to_string(),
                level,
            });
        }
        current = Some(sample);
    }

    if let Some((start, emotion, level)) = current {
        let end = if video.has_known_length() {
            video.length_secs
        } else {
            start
        };
        series.push(EmotionSample {
            start,
            end,
            emotion: emotion.to_string(),
            level,
        });
    }

    series
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(emotion: &str, video: &str, elapsed: f64) -> DetectionRow {
        DetectionRow {
            user: "User1".into(),
            emotion: emotion.into(),
            video_file: video.into(),
            elapsed_secs: elapsed,
        }
    }

    fn step(start: f64, end: f64, emotion: &str) -> (f64, f64, String) {
        (start, end, emotion.to_string())
    }

    fn steps(series: &[EmotionSample]) -> Vec<(f64, f64, String)> {
        series
            .iter()
            .map(|sample| (sample.start, sample.end, sample.emotion.clone()))
            .collect()
    }

    #[test]
    fn status_labels_are_skipped() {
        let video = VideoDescriptor::new("clip.mp4", "", 30.0);
        let rows = vec![
            row("start", "clip.mp4", 0.0),
            row("happy", "clip.mp4", 1.0),
            row("no_face", "clip.mp4", 4.0),
            row("too_many_faces", "clip.mp4", 6.0),
            row("disgust", "clip.mp4", 7.0),
            row("sad", "clip.mp4", 9.0),
            row("stop", "clip.mp4", 20.0),
        ];

        let series = user_emotion_series(&rows, &video);
        assert_eq!(
            steps(&series),
            vec![step(1.0, 9.0, "happy"), step(9.0, 30.0, "sad")]
        );
        assert_eq!(series[0].level, 6);
        assert_eq!(series[1].level, 2);
    }

    #[test]
    fn samples_past_the_video_are_dropped_and_rest_sorted() {
        let video = VideoDescriptor::new("clip.mp4", "", 30.0);
        let rows = vec![
            row("neutral", "clip.mp4", 12.0),
            row("angry", "CLIP.mp4", 3.0),
            row("happy", "clip.mp4", 30.0),
            row("sad", "clip.mp4", 31.5),
            row("scared", "other.mp4", 5.0),
        ];

        let series = user_emotion_series(&rows, &video);
        assert_eq!(
            steps(&series),
            vec![
                step(3.0, 12.0, "angry"),
                step(12.0, 30.0, "neutral"),
                step(30.0, 30.0, "happy"),
            ]
        );
    }

    #[test]
    fn unknown_length_keeps_every_sample() {
        let video = VideoDescriptor::new("clip.mp4", "", 0.0);
        let rows = vec![row("happy", "clip.mp4", 2.0), row("sad", "clip.mp4", 40.0)];

        let series = user_emotion_series(&rows, &video);
        assert_eq!(
            steps(&series),
            vec![step(2.0, 40.0, "happy"), step(40.0, 40.0, "sad")]
        );
    }

    #[test]
    fn chart_levels() {
        assert_eq!(chart_level("angry"), Some(0));
        assert_eq!(chart_level("happy"), Some(6));
        assert_eq!(chart_level("no_face"), None);
        assert_eq!(chart_level("disgust"), None);
    }
}
