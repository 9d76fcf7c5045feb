//! Delay Estimator.
//!
//! One independent unit of work per time index `t`; `rayon` assigns each
//! `t` to a worker, mirroring a data-parallel work-item grid. Every unit
//! of work writes a disjoint row of `real_delays`, and no unit of work
//! ever observes another's output.

use rayon::prelude::*;

use super::qualifier::is_window_qualified;
use crate::config::{EstimatorConfig, Precision};
use crate::error::LocatorError;
use crate::types::{encode_i32, MIN_STATIONS_COUNT};

/// Scan `signals[S, T]` and compute, at every time index, the optimal
/// integer sample delay of each non-base station relative to the base
/// station via windowed Pearson correlation.
///
/// Returns `real_delays[T, S+1]` flattened row-major: column 0 is a
/// `0`/`1` validity flag, columns `1..=S` hold per-station delays or the
/// `NULL` sentinel. Rows the kernel never visits (either because `t` is
/// out of the scanned range, or because the base window at `t` failed
/// qualification) are left at their pre-zeroed value, per the data
/// model's invariant.
pub fn estimate_delays(
    signals: &[f32],
    station_count: usize,
    sample_count: usize,
    config: &EstimatorConfig,
) -> Result<Vec<i32>, LocatorError> {
    config.validate(station_count)?;
    if signals.len() != station_count * sample_count {
        return Err(LocatorError::ValidationError {
            message: format!(
                "signals length {} does not match station_count * sample_count ({} * {})",
                signals.len(),
                station_count,
                sample_count
            ),
        });
    }

    let stride = station_count + 1;
    let mut real_delays = vec![0_i32; sample_count * stride];

    let max_t = match (sample_count as i64)
        .checked_sub(config.window_size as i64)
        .and_then(|v| v.checked_sub(config.scanner_size as i64))
        .map(|v| v - 1)
    {
        Some(v) if v >= 0 => v as usize,
        _ => {
            log::debug!("no valid time indices for this job (sample_count too small)");
            return Ok(real_delays);
        }
    };

    log::info!(
        "estimate_delays: scanning t in [0, {}] over {} stations",
        max_t,
        station_count
    );

    let rows: Vec<Option<Vec<i32>>> = (0..=max_t)
        .into_par_iter()
        .map(|t| match config.precision {
            Precision::F32 => row_for_time_index_f32(signals, station_count, sample_count, t, config),
            Precision::F64 => row_for_time_index_f64(signals, station_count, sample_count, t, config),
        })
        .collect();

    let mut qualified_count = 0usize;
    for (t, row) in rows.into_iter().enumerate() {
        if let Some(row) = row {
            qualified_count += 1;
            let start = t * stride;
            real_delays[start..start + stride].copy_from_slice(&row);
        }
    }
    log::debug!(
        "estimate_delays: {}/{} time indices produced a row",
        qualified_count,
        max_t + 1
    );

    Ok(real_delays)
}

/// Expands to a time-index worker generic over the accumulation type
/// (`f32` matches the reference device default; `f64` trades that
/// fidelity for numerical stability on large windows).
macro_rules! row_for_time_index_impl {
    ($name:ident, $ty:ty) => {
        fn $name(
            signals: &[f32],
            station_count: usize,
            sample_count: usize,
            t: usize,
            config: &EstimatorConfig,
        ) -> Option<Vec<i32>> {
            let window_size = config.window_size;
            let scanner_size = config.scanner_size;
            let base = config.base_station_index;
            let w = window_size as $ty;

            let b = base * sample_count + t;
            if !is_window_qualified(signals, b, window_size) {
                return None;
            }

            let base_window = &signals[b..b + window_size];
            let mut sum_a: $ty = 0.0;
            let mut sum_a2: $ty = 0.0;
            let mut min = base_window[0];
            let mut max = base_window[0];
            for &v in base_window {
                let v_acc = v as $ty;
                sum_a += v_acc;
                sum_a2 += v_acc * v_acc;
                if v < min {
                    min = v;
                }
                if v > max {
                    max = v;
                }
            }
            if min == max {
                return None;
            }

            let mut row = vec![0_i32; station_count + 1];
            let mut selected = 0usize;

            for s in 0..station_count {
                if s == base {
                    continue;
                }

                let mut best_r: $ty = <$ty>::NEG_INFINITY;
                let mut best_lag: Option<i32> = None;

                for d in 0..scanner_size {
                    let c = s * sample_count + t + d;
                    if !is_window_qualified(signals, c, window_size) {
                        continue;
                    }

                    let candidate_window = &signals[c..c + window_size];
                    let mut sum_b: $ty = 0.0;
                    let mut sum_b2: $ty = 0.0;
                    let mut sum_ab: $ty = 0.0;
                    for (i, &bv) in candidate_window.iter().enumerate() {
                        let av = base_window[i] as $ty;
                        let bv = bv as $ty;
                        sum_b += bv;
                        sum_b2 += bv * bv;
                        sum_ab += av * bv;
                    }

                    let numerator = w * sum_ab - sum_a * sum_b;
                    if numerator < 0.0 {
                        continue;
                    }

                    let denom_sq = (w * sum_a2 - sum_a * sum_a) * (w * sum_b2 - sum_b * sum_b);
                    if denom_sq <= 0.0 {
                        continue;
                    }
                    let denom = denom_sq.sqrt();
                    if denom == 0.0 {
                        continue;
                    }

                    let r = numerator / denom;
                    if r >= config.min_correlation as $ty && r > best_r {
                        best_r = r;
                        best_lag = Some(d as i32);
                    }
                }

                row[s + 1] = encode_i32(best_lag);
                if best_lag.is_some() {
                    selected += 1;
                }
            }

            row[0] = if selected > MIN_STATIONS_COUNT { 1 } else { 0 };
            Some(row)
        }
    };
}

row_for_time_index_impl!(row_for_time_index_f32, f32);
row_for_time_index_impl!(row_for_time_index_f64, f64);
