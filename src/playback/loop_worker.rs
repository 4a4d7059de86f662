use std::sync::Arc;

use tokio::sync::watch;
use tokio::time::{Duration, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use super::clock::PlaybackClock;
use super::session::{LiveSession, LiveSnapshot};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

// Import the logging macros (exported at crate root)
use crate::{log_debug, log_error, log_info};

pub async fn live_loop(
    session: LiveSession,
    clock: Arc<dyn PlaybackClock>,
    tick_interval: Duration,
    snapshot_tx: watch::Sender<Option<LiveSnapshot>>,
    cancel_token: CancellationToken,
) {
    let mut ticker = tokio::time::interval(tick_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut sequence: u64 = 0;
    let mut last_position: Option<f64> = None;
    let mut last_revision: Option<u64> = None;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let position = clock.position_secs();
                // A paused clock at the same position only needs a new reading when a log changed.
                let unchanged_position = !clock.is_playing() && last_position == Some(position);
                let previous_revision = last_revision;
                let tick = sequence + 1;

                let worker_session = session.clone();
                let outcome = tokio::task::spawn_blocking(move || {
                    let revision = worker_session.source_revision();
                    if unchanged_position && previous_revision == Some(revision) {
                        return (revision, None);
                    }
                    (revision, Some(worker_session.snapshot(tick, position)))
                })
                .await;

                let (revision, snapshot) = match outcome {
                    Ok(outcome) => outcome,
                    Err(err) => {
                        log_error!("live tick {tick} failed for session {}: {err:?}", session.id());
                        continue;
                    }
                };
                last_revision = Some(revision);

                let Some(snapshot) = snapshot else {
                    continue;
                };
                last_position = Some(position);
                sequence = tick;

                if cancel_token.is_cancelled() {
                    break;
                }

                log_debug!("tick {tick} at {position:.2}s: {}", snapshot.reading);
                publish_if_newer(&snapshot_tx, snapshot);
            }
            _ = cancel_token.cancelled() => {
                log_info!("live loop shutting down for session {}", session.id());
                break;
            }
        }
    }
}

/// Replace the published snapshot unless it already comes from a later tick.
pub fn publish_if_newer(
    snapshot_tx: &watch::Sender<Option<LiveSnapshot>>,
    snapshot: LiveSnapshot,
) -> bool {
    snapshot_tx.send_if_modified(|current| {
        let is_newer = current
            .as_ref()
            .map(|published| snapshot.sequence > published.sequence)
            .unwrap_or(true);
        if is_newer {
            *current = Some(snapshot);
        }
        is_newer
    })
}
