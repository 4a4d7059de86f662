//! Filesystem access to the catalog and the per-user detection logs.
//!
//! Layout under the data root:
//! ```text
//! Users/<user>/<log>.csv     header row, then `user;emotion;videoFile;elapsed;...`
//! Video/VideoLabels.csv      video catalog
//! ```
//! Read failures for one user never abort an analysis: the user is skipped
//! and the failure is logged.

pub mod cache;
pub mod catalog;

use std::collections::hash_map::DefaultHasher;
use std::fs;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::analysis::series::user_emotion_series;
use crate::analysis::timeline::{parse_rows, TimelineBuilder};
use crate::models::{
    AnalysisIssue, ClosingBoundary, DetectionRow, EmotionSample, UserTimeline, VideoAnalysis,
    VideoDescriptor,
};

pub use cache::{LogFingerprint, TimelineCache};
pub use catalog::{load_video_catalog, resolve_video_file};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_warn};

/// Supplies the per-user timelines for a video.
pub trait TimelineSource: Send + Sync {
    fn timelines_for(
        &self,
        video: &VideoDescriptor,
        boundary: ClosingBoundary,
    ) -> Vec<UserTimeline>;

    /// Changes whenever a timeline returned by `timelines_for` may have changed.
    fn revision(&self) -> u64 {
        0
    }
}

/// Timelines computed up front, for callers that already hold them.
#[derive(Debug, Clone, Default)]
pub struct StaticTimelines(pub Vec<UserTimeline>);

impl TimelineSource for StaticTimelines {
    fn timelines_for(
        &self,
        _video: &VideoDescriptor,
        _boundary: ClosingBoundary,
    ) -> Vec<UserTimeline> {
        self.0.clone()
    }
}

pub struct UserStore {
    users_dir: PathBuf,
    cache: TimelineCache,
}

impl UserStore {
    pub fn new(users_dir: PathBuf) -> Self {
        Self {
            users_dir,
            cache: TimelineCache::new(),
        }
    }

    pub fn cache(&self) -> &TimelineCache {
        &self.cache
    }

    /// User folder names, sorted.
    pub fn list_users(&self) -> Result<Vec<String>> {
        let entries = fs::read_dir(&self.users_dir).with_context(|| {
            format!("Failed to list users in {}", self.users_dir.display())
        })?;

        let mut users = Vec::new();
        for entry in entries {
            let entry = entry.context("failed to read users directory entry")?;
            if entry.file_type().map(|kind| kind.is_dir()).unwrap_or(false) {
                users.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        users.sort();
        Ok(users)
    }

    /// Users with at least one data row for `video_file` in any of their logs.
    pub fn users_who_watched(&self, video_file: &str) -> Result<Vec<String>> {
        let mut watched = Vec::new();
        for user in self.list_users()? {
            for log_file in self.log_files(&user)? {
                let contents = match fs::read_to_string(&log_file) {
                    Ok(contents) => contents,
                    Err(err) => {
                        log_warn!("skipping unreadable log {}: {err}", log_file.display());
                        continue;
                    }
                };

                let has_entry = contents.lines().skip(1).any(|line| {
                    line.split(';')
                        .nth(2)
                        .map(|field| crate::models::video::same_video_file(video_file, field))
                        .unwrap_or(false)
                });

                if has_entry {
                    watched.push(user.clone());
                    break;
                }
            }
        }
        Ok(watched)
    }

    /// The log a user's timeline is read from: the first `*.csv` in their folder.
    pub fn primary_log(&self, user: &str) -> Result<Option<PathBuf>> {
        Ok(self.log_files(user)?.into_iter().next())
    }

    /// Data rows of the user's primary log, header skipped, malformed rows dropped.
    pub fn read_rows(&self, user: &str) -> Result<Vec<DetectionRow>> {
        let Some(log_file) = self.primary_log(user)? else {
            return Ok(Vec::new());
        };

        let mut issues = Vec::new();
        let rows = read_log_rows(&log_file, &mut issues)?;
        if !issues.is_empty() {
            log_debug!("{} malformed rows dropped from {}", issues.len(), log_file.display());
        }
        Ok(rows)
    }

    /// Timeline of one user for one video, served from the cache while the log is unchanged.
    ///
    /// `Ok(None)` means the user has no log at all.
    pub fn timeline_for(
        &self,
        user: &str,
        video: &VideoDescriptor,
        boundary: ClosingBoundary,
    ) -> Result<Option<UserTimeline>> {
        let Some(log_file) = self.primary_log(user)? else {
            return Ok(None);
        };

        let metadata = fs::metadata(&log_file)
            .with_context(|| format!("Failed to stat {}", log_file.display()))?;
        let fingerprint = LogFingerprint::from_metadata(&log_file, &metadata);

        if let Some(timeline) = self.cache.get(user, &video.file_name, boundary, &fingerprint) {
            return Ok(Some(timeline));
        }

        let mut issues = Vec::new();
        let rows = read_log_rows(&log_file, &mut issues)?;
        let events =
            TimelineBuilder::new(boundary).build(&rows, &video.file_name, video.length_secs);
        let timeline = UserTimeline::new(user, events);

        self.cache
            .insert(user, &video.file_name, boundary, fingerprint, timeline.clone());
        Ok(Some(timeline))
    }

    /// Every user with data for the video. Unreadable users are skipped.
    pub fn load_timelines(
        &self,
        video: &VideoDescriptor,
        boundary: ClosingBoundary,
        issues: &mut Vec<AnalysisIssue>,
    ) -> Vec<UserTimeline> {
        let users = match self.list_users() {
            Ok(users) => users,
            Err(err) => {
                log_warn!("user logs unavailable: {err:#}");
                issues.push(AnalysisIssue::StorageUnavailable {
                    source: self.users_dir.display().to_string(),
                    reason: format!("{err:#}"),
                });
                return Vec::new();
            }
        };

        let mut timelines = Vec::new();
        for user in users {
            match self.timeline_for(&user, video, boundary) {
                Ok(Some(timeline)) if timeline.has_data() => timelines.push(timeline),
                Ok(_) => {
                    log_debug!("{user} has no rows for {}", video.file_name);
                    issues.push(AnalysisIssue::MissingUserData { user });
                }
                Err(err) => {
                    log_warn!("skipping {user}: {err:#}");
                    issues.push(AnalysisIssue::StorageUnavailable {
                        source: user,
                        reason: format!("{err:#}"),
                    });
                }
            }
        }
        timelines
    }

    /// Chart series of one user, read from their primary log.
    pub fn emotion_series(
        &self,
        user: &str,
        video: &VideoDescriptor,
    ) -> Result<Vec<EmotionSample>> {
        Ok(user_emotion_series(&self.read_rows(user)?, video))
    }

    /// Fill the chart series of every selected user and clear the others.
    pub fn attach_emotion_series(&self, analysis: &mut VideoAnalysis) {
        for report in analysis.users.iter_mut() {
            if !report.selected {
                report.emotion_series.clear();
                continue;
            }

            report.emotion_series = match self.emotion_series(&report.user, &analysis.video) {
                Ok(series) => series,
                Err(err) => {
                    log_warn!("no chart series for {}: {err:#}", report.user);
                    Vec::new()
                }
            };
        }
    }

    /// Hash over the user folders and the fingerprint of each primary log.
    pub fn logs_revision(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        let users = match self.list_users() {
            Ok(users) => users,
            Err(_) => return hasher.finish(),
        };

        for user in users {
            user.hash(&mut hasher);
            if let Ok(Some(log_file)) = self.primary_log(&user) {
                if let Ok(metadata) = fs::metadata(&log_file) {
                    LogFingerprint::from_metadata(&log_file, &metadata).hash(&mut hasher);
                }
            }
        }
        hasher.finish()
    }

    fn log_files(&self, user: &str) -> Result<Vec<PathBuf>> {
        let user_dir = self.users_dir.join(user);
        let entries = fs::read_dir(&user_dir)
            .with_context(|| format!("Failed to list logs in {}", user_dir.display()))?;

        let mut files = Vec::new();
        for entry in entries {
            let path = entry.context("failed to read user directory entry")?.path();
            let is_csv = path
                .extension()
                .map(|ext| ext.eq_ignore_ascii_case("csv"))
                .unwrap_or(false);
            if is_csv && path.is_file() {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }
}

impl TimelineSource for UserStore {
    fn timelines_for(
        &self,
        video: &VideoDescriptor,
        boundary: ClosingBoundary,
    ) -> Vec<UserTimeline> {
        let mut issues = Vec::new();
        self.load_timelines(video, boundary, &mut issues)
    }

    fn revision(&self) -> u64 {
        self.logs_revision()
    }
}

fn read_log_rows(path: &Path, issues: &mut Vec<AnalysisIssue>) -> Result<Vec<DetectionRow>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read user log {}", path.display()))?;
    Ok(parse_rows(contents.lines().skip(1), issues))
}
