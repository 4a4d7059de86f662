use std::collections::HashMap;
use std::fs::Metadata;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::SystemTime;

use crate::models::{ClosingBoundary, UserTimeline};

/// Identifies the state of a user's log file; a change invalidates the cache entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LogFingerprint {
    pub path: PathBuf,
    pub len: u64,
    pub modified: Option<SystemTime>,
}

impl LogFingerprint {
    pub fn from_metadata(path: &Path, metadata: &Metadata) -> Self {
        Self {
            path: path.to_path_buf(),
            len: metadata.len(),
            modified: metadata.modified().ok(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    user: String,
    video_file: String,
    boundary: ClosingBoundary,
}

struct CachedTimeline {
    fingerprint: LogFingerprint,
    timeline: UserTimeline,
}

/// Derived timelines keyed by (user, video, closing boundary).
///
/// The live ticker asks for every user's timeline several times per second;
/// entries are reused until the underlying log file changes.
#[derive(Default)]
pub struct TimelineCache {
    entries: Mutex<HashMap<CacheKey, CachedTimeline>>,
}

impl TimelineCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(
        &self,
        user: &str,
        video_file: &str,
        boundary: ClosingBoundary,
        fingerprint: &LogFingerprint,
    ) -> Option<UserTimeline> {
        let entries = self.lock();
        entries
            .get(&Self::key(user, video_file, boundary))
            .filter(|cached| &cached.fingerprint == fingerprint)
            .map(|cached| cached.timeline.clone())
    }

    pub fn insert(
        &self,
        user: &str,
        video_file: &str,
        boundary: ClosingBoundary,
        fingerprint: LogFingerprint,
        timeline: UserTimeline,
    ) {
        self.lock().insert(
            Self::key(user, video_file, boundary),
            CachedTimeline {
                fingerprint,
                timeline,
            },
        );
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.lock().clear();
        log::debug!("Cleared timeline cache");
    }

    fn key(user: &str, video_file: &str, boundary: ClosingBoundary) -> CacheKey {
        CacheKey {
            user: user.to_string(),
            video_file: video_file.trim().to_ascii_lowercase(),
            boundary,
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<CacheKey, CachedTimeline>> {
        match self.entries.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserEvent;

    fn fingerprint(len: u64) -> LogFingerprint {
        LogFingerprint {
            path: PathBuf::from("Users/User1/log.csv"),
            len,
            modified: None,
        }
    }

    #[test]
    fn hit_requires_matching_fingerprint() {
        let cache = TimelineCache::new();
        let timeline = UserTimeline::new("User1", vec![UserEvent::new(0.0, 5.0, "happy")]);
        cache.insert(
            "User1",
            "clip.mp4",
            ClosingBoundary::VideoLength,
            fingerprint(10),
            timeline.clone(),
        );

        assert_eq!(
            cache.get("User1", "CLIP.mp4", ClosingBoundary::VideoLength, &fingerprint(10)),
            Some(timeline)
        );
        assert_eq!(
            cache.get("User1", "clip.mp4", ClosingBoundary::VideoLength, &fingerprint(11)),
            None
        );
        assert_eq!(
            cache.get("User1", "clip.mp4", ClosingBoundary::LastSample, &fingerprint(10)),
            None
        );

        cache.clear();
        assert!(cache.is_empty());
    }
}
