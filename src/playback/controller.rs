use std::sync::Arc;

use anyhow::{bail, Context, Result};
use log::info;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Duration;
use tokio_util::sync::CancellationToken;

use super::clock::PlaybackClock;
use super::loop_worker::live_loop;
use super::session::{LiveSession, LiveSnapshot};

/// Default live tick cadence.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(200);

/// Runs the live accuracy ticker for one session and publishes its snapshots.
pub struct LiveAccuracyController {
    session: LiveSession,
    tick_interval: Duration,
    handle: Option<JoinHandle<()>>,
    cancel_token: Option<CancellationToken>,
    snapshot_tx: watch::Sender<Option<LiveSnapshot>>,
}

impl LiveAccuracyController {
    pub fn new(session: LiveSession, tick_interval: Duration) -> Self {
        let (snapshot_tx, _) = watch::channel(None);
        let tick_interval = if tick_interval.is_zero() {
            DEFAULT_TICK_INTERVAL
        } else {
            tick_interval
        };

        Self {
            session,
            tick_interval,
            handle: None,
            cancel_token: None,
            snapshot_tx,
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    /// Receiver that always holds the most recent snapshot (or `None` before the first tick).
    pub fn subscribe(&self) -> watch::Receiver<Option<LiveSnapshot>> {
        self.snapshot_tx.subscribe()
    }

    pub fn latest(&self) -> Option<LiveSnapshot> {
        self.snapshot_tx.borrow().clone()
    }

    pub fn start(&mut self, clock: Arc<dyn PlaybackClock>) -> Result<()> {
        if self.handle.is_some() {
            bail!("live accuracy already active");
        }

        let cancel_token = CancellationToken::new();
        let handle = tokio::spawn(live_loop(
            self.session.clone(),
            clock,
            self.tick_interval,
            self.snapshot_tx.clone(),
            cancel_token.clone(),
        ));

        info!(
            "Live accuracy started for {} (session {}, every {}ms)",
            self.session.video().file_name,
            self.session.id(),
            self.tick_interval.as_millis()
        );

        self.handle = Some(handle);
        self.cancel_token = Some(cancel_token);
        Ok(())
    }

    pub async fn stop(&mut self) -> Result<()> {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }

        if let Some(handle) = self.handle.take() {
            handle
                .await
                .context("live accuracy loop task failed to join")
                .map(|_| ())
        } else {
            Ok(())
        }
    }
}
