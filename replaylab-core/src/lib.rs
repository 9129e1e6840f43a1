//! ReplayLab Core — dataset model, prefix slicing, trailing metrics, signal latch, playback.
//!
//! This crate contains the heart of the replay engine:
//! - Domain types (price, sentiment and performance series, the dataset)
//! - Slicer producing zero-copy prefix views that never reveal future data
//! - Trailing metrics computed from those prefixes
//! - Signal resolution with a wall-clock display latch
//! - Single-ticker playback state machine emitting frames to a sink
//! - Indicators and long/flat strategy rules used to build datasets

pub mod clock;
pub mod domain;
pub mod frame;
pub mod indicators;
pub mod metrics;
pub mod playback;
pub mod signal;
pub mod sink;
pub mod slicer;
pub mod strategy;
pub mod ticker;

#[cfg(test)]
mod test_support;

pub use clock::{Clock, ManualClock, SystemClock};
pub use domain::{Dataset, DatasetError};
pub use frame::{FrameCause, PlaybackFrame, Quote};
pub use metrics::KpiSet;
pub use playback::{PlaybackConfig, PlaybackController, PlaybackError, PlaybackStatus};
pub use signal::{SignalKind, SignalResolver, SignalState};
pub use sink::FrameSink;
