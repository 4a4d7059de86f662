//! Top-level analysis call: everything the presentation layer needs for one video.

use chrono::Utc;
use uuid::Uuid;

use crate::analysis::{
    coloring::color_assign,
    config::AnalysisConfig,
    predicted::parse_predicted_collecting,
    scoring::{
        group_by_span, round_percent, score_group, score_video, user_group_matches, user_ratio,
    },
};
use crate::models::{AnalysisIssue, UserReport, UserTimeline, VideoAnalysis, VideoDescriptor};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::log_info;

/// Analyse one video against the timelines of every user.
///
/// Users whose timeline is empty are reported as [`AnalysisIssue::MissingUserData`]
/// and left out of both the group aggregates and the video summary.
pub fn analyze_video(
    video: &VideoDescriptor,
    timelines: &[UserTimeline],
    config: &AnalysisConfig,
) -> VideoAnalysis {
    let mut issues = Vec::new();

    let predicted = parse_predicted_collecting(&video.predicted_emotions_raw, &mut issues);
    if predicted.is_empty() {
        issues.push(AnalysisIssue::NoPredictedIntervals);
    }

    let contributing: Vec<UserTimeline> = timelines
        .iter()
        .filter(|timeline| {
            if timeline.has_data() {
                true
            } else {
                issues.push(AnalysisIssue::MissingUserData {
                    user: timeline.user.clone(),
                });
                false
            }
        })
        .cloned()
        .collect();

    let groups = group_by_span(&predicted);
    let group_scores = groups
        .iter()
        .map(|group| score_group(group, &contributing))
        .collect();

    let colors = color_assign(&predicted, config.palette.len());

    let users: Vec<UserReport> = contributing
        .iter()
        .enumerate()
        .map(|(idx, timeline)| {
            let (matched_groups, total_groups) = user_group_matches(&groups, &timeline.events);
            UserReport {
                user: timeline.user.clone(),
                display_name: display_name(&timeline.user),
                matched_groups,
                total_groups,
                score_percent: round_percent(user_ratio(&groups, &timeline.events)),
                watch_percent: watch_percent(timeline, video.length_secs),
                selected: idx < config.max_selected_users,
                emotion_series: Vec::new(),
            }
        })
        .collect();

    let summary = score_video(&predicted, &contributing);

    log_info!(
        "analyzed {}: {} predicted intervals in {} groups, {} users, summary {}",
        video.file_name,
        predicted.len(),
        groups.len(),
        users.len(),
        summary
    );

    VideoAnalysis {
        id: Uuid::new_v4().to_string(),
        analyzed_at: Utc::now(),
        video: video.clone(),
        colors: colors.colored_intervals(&config.palette, &config.inactive_color),
        predicted,
        groups: group_scores,
        summary,
        users,
        issues,
    }
}

/// Select or deselect `user` for charting.
///
/// Selecting is refused once `max_selected` users are already selected.
/// Returns whether the user's flag now matches `selected`.
pub fn select_user(
    users: &mut [UserReport],
    user: &str,
    selected: bool,
    max_selected: usize,
) -> bool {
    let already_selected = users.iter().filter(|report| report.selected).count();
    let Some(report) = users.iter_mut().find(|report| report.user == user) else {
        return false;
    };

    if selected && !report.selected && already_selected >= max_selected {
        log_info!("not selecting {user}: {max_selected} users already selected");
        return false;
    }

    report.selected = selected;
    if !selected {
        report.emotion_series.clear();
    }
    true
}

/// `User3` becomes `User 3`; other folder names are kept as they are.
pub fn display_name(user: &str) -> String {
    match user.strip_prefix("User") {
        Some(rest) if !rest.trim().is_empty() => format!("User {}", rest.trim()),
        _ => user.to_string(),
    }
}

/// Share of the video covered by the user's samples, in `[0, 100]`.
pub fn watch_percent(timeline: &UserTimeline, video_length: f64) -> f64 {
    if video_length <= 0.0 {
        return 0.0;
    }

    timeline
        .last_sample_secs
        .map(|last| (last / video_length * 100.0).clamp(0.0, 100.0))
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{UserEvent, VideoSummary};

    fn video() -> VideoDescriptor {
        VideoDescriptor::new("clip.mp4", "happy(10-20),sad(10-20),angry(25-30),broken", 30.0)
    }

    fn timelines() -> Vec<UserTimeline> {
        vec![
            UserTimeline::new(
                "User1",
                vec![UserEvent::new(0.0, 15.0, "happy"), UserEvent::new(15.0, 30.0, "sad")],
            ),
            UserTimeline::new("User2", vec![UserEvent::new(0.0, 30.0, "angry")]),
            UserTimeline::new("User3", Vec::new()),
        ]
    }

    #[test]
    fn reports_groups_users_and_issues() {
        let analysis = analyze_video(&video(), &timelines(), &AnalysisConfig::default());

        assert_eq!(analysis.predicted.len(), 3);
        assert_eq!(analysis.groups.len(), 2);
        assert!(analysis.groups.iter().all(|group| group.percent == 50.0));
        assert_eq!(analysis.summary, VideoSummary::Percent(50.0));
        assert_eq!(analysis.users.len(), 2);
        assert_eq!(analysis.users[0].display_name, "User 1");
        assert_eq!(analysis.users[0].matched_groups, 1);
        assert_eq!(analysis.users[0].total_groups, 2);
        assert_eq!(analysis.colors.len(), 2);
        assert_eq!(analysis.colors[0].color, "#FF6DC7");

        assert!(analysis
            .issues
            .contains(&AnalysisIssue::MalformedPredictionItem { item: "broken".into() }));
        assert!(analysis
            .issues
            .contains(&AnalysisIssue::MissingUserData { user: "User3".into() }));
    }

    #[test]
    fn no_users_yields_no_data() {
        let analysis = analyze_video(&video(), &[], &AnalysisConfig::default());
        assert_eq!(analysis.summary, VideoSummary::NoData);
        assert!(analysis.groups.iter().all(|group| group.percent == 0.0));
    }

    #[test]
    fn selection_is_capped() {
        let config = AnalysisConfig {
            max_selected_users: 1,
            ..AnalysisConfig::default()
        };
        let analysis = analyze_video(&video(), &timelines(), &config);
        assert!(analysis.users[0].selected);
        assert!(!analysis.users[1].selected);
    }

    #[test]
    fn selection_never_exceeds_the_cap() {
        let mut users = analyze_video(&video(), &timelines(), &AnalysisConfig::default()).users;
        assert!(users.iter().all(|user| user.selected));

        assert!(select_user(&mut users, "User1", false, 1));
        assert!(!select_user(&mut users, "User1", true, 1));
        assert!(!users[0].selected);

        assert!(select_user(&mut users, "User2", true, 1));
        assert!(select_user(&mut users, "User2", false, 1));
        assert!(select_user(&mut users, "User1", true, 1));
        assert!(users[0].selected);
        assert!(!select_user(&mut users, "User9", true, 5));
    }

    #[test]
    fn display_names() {
        assert_eq!(display_name("User12"), "User 12");
        assert_eq!(display_name("alice"), "alice");
        assert_eq!(display_name("User"), "User");
    }

    #[test]
    fn watch_percent_uses_last_sample() {
        let timeline = UserTimeline::new(
            "User1",
            vec![UserEvent::new(0.0, 15.0, "happy"), UserEvent::new(15.0, 30.0, "sad")],
        );
        assert_eq!(watch_percent(&timeline, 30.0), 50.0);
        assert_eq!(watch_percent(&timeline, 0.0), 0.0);
    }
}
