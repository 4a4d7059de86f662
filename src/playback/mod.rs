pub mod clock;
pub mod controller;
pub mod loop_worker;
pub mod session;

pub use clock::{PlaybackClock, PlaybackStatus, SimulatedClock};
pub use controller::{LiveAccuracyController, DEFAULT_TICK_INTERVAL};
pub use session::{LiveSession, LiveSnapshot};
