//! Delay Estimator: the signal-segment qualifier and the windowed
//! cross-correlation scan that turns a multi-channel waveform block
//! into per-time-index, per-station integer sample delays.

pub mod estimator;
pub mod qualifier;

pub use estimator::estimate_delays;
