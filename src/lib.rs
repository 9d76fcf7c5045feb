//! Micro-seismic event location core.
//!
//! Two coupled numerical engines, each designed to execute embarrassingly
//! parallel per output cell:
//!
//! - [`delay::estimate_delays`], the Delay Estimator: windowed Pearson
//!   correlation scan that turns a multi-channel waveform block into
//!   per-time-index, per-station integer sample delays.
//! - [`locate::locate_events`], the Localization Engine: a layered-earth
//!   ray-traced grid search that turns those delays into 3-D source
//!   coordinates.
//!
//! Ingress of raw waveform blobs, station metadata, and velocity-model
//! tables, and any transport in front of this crate, are someone else's
//! job. This crate's public API takes and returns plain flat arrays,
//! callable in-process.

pub mod cli;
pub mod config;
pub mod delay;
pub mod error;
pub mod io;
pub mod locate;
pub mod types;

pub use delay::estimate_delays;
pub use locate::locate_events;
