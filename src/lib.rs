pub mod analysis;
pub mod models;
pub mod playback;
pub mod settings;
pub mod storage;
mod utils;

use std::{
    env,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{Context, Result};
use log::{info, warn};
use tokio::time::Duration;

use analysis::analyze_video;
use models::{VideoAnalysis, VideoDescriptor};
use playback::{LiveAccuracyController, LiveSession, PlaybackClock, SimulatedClock};
use settings::{Settings, SettingsStore};
use storage::{load_video_catalog, resolve_video_file, TimelineSource, UserStore};

pub use utils::parse_decimal;

const DATA_DIR_ENV: &str = "MOODSCAN_DATA_DIR";
const SETTINGS_ENV: &str = "MOODSCAN_SETTINGS";
const PLAYBACK_ENV: &str = "MOODSCAN_PLAYBACK";
const SETTINGS_FILE: &str = "moodscan.json";

/// Simulated playback compresses the whole video into about this many seconds.
const PLAYBACK_PREVIEW_SECS: f64 = 10.0;

pub fn run() -> Result<()> {
    // Initialize logging (reads RUST_LOG env var)
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    info!("MoodScan starting up...");

    let root = data_root();
    let settings_path = env::var_os(SETTINGS_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| root.join(SETTINGS_FILE));
    let settings_store = SettingsStore::new(settings_path)?;
    let settings = settings_store.settings();

    let video = load_video_catalog(&settings.catalog_file(&root))?;
    if let Err(err) = resolve_video_file(&root, &video) {
        warn!("{err:#}");
    }

    let store = Arc::new(UserStore::new(settings.users_path(&root)));
    let analysis = analyze_from_store(&store, &video, &settings);

    let rendered =
        serde_json::to_string_pretty(&analysis).context("failed to serialize the analysis")?;
    println!("{rendered}");

    if playback_requested() {
        run_playback(video, &settings, store)?;
    }

    Ok(())
}

/// Full analysis of `video` against every user under the store, with chart
/// series for the selected users.
pub fn analyze_from_store(
    store: &UserStore,
    video: &VideoDescriptor,
    settings: &Settings,
) -> VideoAnalysis {
    let mut storage_issues = Vec::new();
    let timelines = store.load_timelines(video, settings.closing_boundary, &mut storage_issues);

    let mut analysis = analyze_video(video, &timelines, &settings.analysis_config());
    analysis.issues.extend(storage_issues);
    store.attach_emotion_series(&mut analysis);
    analysis
}

fn data_root() -> PathBuf {
    env::args_os()
        .nth(1)
        .or_else(|| env::var_os(DATA_DIR_ENV))
        .map(PathBuf::from)
        .unwrap_or_else(|| Path::new(".").to_path_buf())
}

fn playback_requested() -> bool {
    env::var(PLAYBACK_ENV)
        .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

fn run_playback(video: VideoDescriptor, settings: &Settings, store: Arc<UserStore>) -> Result<()> {
    if !video.has_known_length() {
        warn!("{} has no known length; skipping playback", video.file_name);
        return Ok(());
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to build the tokio runtime")?;

    let rate = (video.length_secs / PLAYBACK_PREVIEW_SECS).max(1.0);
    let clock = Arc::new(SimulatedClock::with_rate(video.length_secs, rate));
    let source: Arc<dyn TimelineSource> = store;
    let session = LiveSession::new(video, settings.analysis_config(), source);
    let mut controller = LiveAccuracyController::new(session, settings.poll_interval());

    runtime.block_on(async move {
        let mut snapshots = controller.subscribe();
        clock.play();
        controller.start(clock.clone())?;

        while clock.is_playing() {
            match tokio::time::timeout(Duration::from_secs(5), snapshots.changed()).await {
                Ok(Ok(())) => {}
                Ok(Err(_)) => break,
                Err(_) => {
                    warn!("no live snapshot within 5s; stopping playback");
                    break;
                }
            }

            let latest = snapshots.borrow_and_update().clone();
            if let Some(snapshot) = latest {
                println!("{:>8.2}s  {}", snapshot.position_secs, snapshot.reading);
            }
        }

        controller.stop().await
    })
}
