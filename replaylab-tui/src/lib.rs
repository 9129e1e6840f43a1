//! ReplayLab TUI — terminal dashboard for dataset playback.
//!
//! Layout:
//! - Header — live ticker, date, progress and playback badge
//! - Charts — price with bands/SMAs/markers, Fear & Greed, strategy vs benchmark
//! - Cards — trailing KPIs, current signal (or build error), strategy parameters
//! - Status bar — key hints and the last status message

pub mod app;
pub mod input;
pub mod logging;
pub mod persistence;
pub mod theme;
pub mod ui;
pub mod worker;

pub use app::App;

#[cfg(test)]
mod test_helpers;
