use std::sync::Mutex;
use std::time::Instant;

use serde::{Deserialize, Serialize};

/// The transport the live controller samples on every tick.
pub trait PlaybackClock: Send + Sync {
    fn position_secs(&self) -> f64;
    fn is_playing(&self) -> bool;
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum PlaybackStatus {
    Paused,
    Playing,
}

impl Default for PlaybackStatus {
    fn default() -> Self {
        PlaybackStatus::Paused
    }
}

#[derive(Debug, Clone)]
struct ClockState {
    status: PlaybackStatus,
    /// Position accumulated from earlier playing windows; combines with
    /// `running_anchor` to compute the current position.
    baseline_secs: f64,
    running_anchor: Option<Instant>,
}

impl ClockState {
    fn position_at(&self, now: Instant, rate: f64, length_secs: f64) -> f64 {
        let raw = match (self.status, self.running_anchor) {
            (PlaybackStatus::Playing, Some(anchor)) => {
                self.baseline_secs + now.saturating_duration_since(anchor).as_secs_f64() * rate
            }
            _ => self.baseline_secs,
        };
        clamp_position(raw, length_secs)
    }
}

/// Anchor-based clock that advances in real time while playing.
///
/// Positions never exceed the video length when it is known; playback stops
/// reporting `is_playing` once the end is reached.
pub struct SimulatedClock {
    state: Mutex<ClockState>,
    length_secs: f64,
    rate: f64,
}

impl SimulatedClock {
    pub fn new(length_secs: f64) -> Self {
        Self::with_rate(length_secs, 1.0)
    }

    /// `rate` seconds of video per wall-clock second.
    pub fn with_rate(length_secs: f64, rate: f64) -> Self {
        Self {
            state: Mutex::new(ClockState {
                status: PlaybackStatus::Paused,
                baseline_secs: 0.0,
                running_anchor: None,
            }),
            length_secs,
            rate: if rate.is_finite() && rate > 0.0 { rate } else { 1.0 },
        }
    }

    pub fn status(&self) -> PlaybackStatus {
        self.lock().status
    }

    pub fn play(&self) {
        let mut state = self.lock();
        if state.status == PlaybackStatus::Playing {
            return;
        }
        state.status = PlaybackStatus::Playing;
        state.running_anchor = Some(Instant::now());
    }

    pub fn pause(&self) {
        let mut state = self.lock();
        let now = Instant::now();
        state.baseline_secs = state.position_at(now, self.rate, self.length_secs);
        state.status = PlaybackStatus::Paused;
        state.running_anchor = None;
    }

    pub fn seek(&self, position_secs: f64) {
        let mut state = self.lock();
        state.baseline_secs = clamp_position(position_secs, self.length_secs);
        if state.status == PlaybackStatus::Playing {
            state.running_anchor = Some(Instant::now());
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ClockState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl PlaybackClock for SimulatedClock {
    fn position_secs(&self) -> f64 {
        self.lock().position_at(Instant::now(), self.rate, self.length_secs)
    }

    fn is_playing(&self) -> bool {
        let state = self.lock();
        if state.status != PlaybackStatus::Playing {
            return false;
        }
        self.length_secs <= 0.0
            || state.position_at(Instant::now(), self.rate, self.length_secs) < self.length_secs
    }
}

fn clamp_position(position: f64, length_secs: f64) -> f64 {
    if !position.is_finite() || position < 0.0 {
        return 0.0;
    }
    if length_secs > 0.0 {
        position.min(length_secs)
    } else {
        position
    }
}
