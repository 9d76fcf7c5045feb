//! Residual-cube evaluation.
//!
//! One independent unit of work per `(event, node)` pair, parallelized
//! with `rayon` over the flattened id space `g = event_id * N +
//! node_id`. Every unit of work writes its own `diff_cube` cell; none
//! observes another's output.
//!
//! `real_delays` is read with the same `S+1` stride the delay estimator
//! writes: column `0` is unused here (the per-time-index validity gate
//! belongs to the delay estimator's own output, not this evaluation),
//! columns `1..=S` hold per-station delays, indexed `[i+1]`.

use rayon::prelude::*;

use super::model::VelocityModel;
use super::solver::ray_time;
use crate::config::GridSpec;
use crate::types::{decode_i32, encode_f32, MIN_RESIDUAL_STATIONS};

/// Evaluate the residual cube for every `(event, node)` pair.
///
/// `real_delays` is `[E, S+1]` flat (validity column + per-station
/// delays, the same layout `estimate_delays` produces). `coords` is
/// `[S, 2]`. `origins` is `[E, 3]`.
#[allow(clippy::too_many_arguments)]
pub fn residual_cube(
    model_rows: &[f32],
    layer_count: usize,
    real_delays: &[i32],
    event_count: usize,
    coords: &[f32],
    station_count: usize,
    stations_altitude: f32,
    origins: &[f32],
    grid: &GridSpec,
    accuracy: f32,
    frequency: i32,
    base_station_index: usize,
) -> Vec<f32> {
    let model = VelocityModel::new(model_rows, layer_count);
    let node_count = grid.node_count();
    let z_min = model.z_min();
    let z_max = model.z_max();
    let delay_stride = station_count + 1;

    (0..event_count * node_count)
        .into_par_iter()
        .map(|g| {
            let event_id = g / node_count;
            let node_id = g % node_count;
            let (ix, iy, iz) = grid.decode_node(node_id);

            let x = ix as f32 * grid.dx + origins[event_id * 3];
            let y = iy as f32 * grid.dy + origins[event_id * 3 + 1];
            let z = iz as f32 * grid.dz + origins[event_id * 3 + 2];

            if z < z_min || z > z_max {
                return encode_f32(None);
            }

            let row = &real_delays[event_id * delay_stride..(event_id + 1) * delay_stride];
            let diff = diff_for_node(
                &model,
                row,
                coords,
                station_count,
                stations_altitude,
                base_station_index,
                x,
                y,
                z,
                accuracy,
                frequency,
            );
            encode_f32(diff)
        })
        .collect()
}

/// `diff(event, node)`: residual between theoretical and measured
/// differential travel times at one candidate node.
#[allow(clippy::too_many_arguments)]
fn diff_for_node(
    model: &VelocityModel,
    real_delays_row: &[i32],
    coords: &[f32],
    station_count: usize,
    stations_altitude: f32,
    base_station_index: usize,
    x: f32,
    y: f32,
    z: f32,
    accuracy: f32,
    frequency: i32,
) -> Option<f32> {
    let base_x = coords[base_station_index * 2];
    let base_y = coords[base_station_index * 2 + 1];
    let rho_b = ((base_x - x).powi(2) + (base_y - y).powi(2)).sqrt();
    let tau_b = ray_time(model, z, stations_altitude, rho_b, accuracy, frequency)?;

    let mut sum_sq = 0.0_f32;
    let mut count = 0usize;

    for i in 0..station_count {
        let xi = coords[i * 2];
        let yi = coords[i * 2 + 1];
        let rho_i = ((xi - x).powi(2) + (yi - y).powi(2)).sqrt();

        let tau_i = match ray_time(model, z, stations_altitude, rho_i, accuracy, frequency) {
            Some(t) => t,
            None => continue,
        };

        let theoretical_diff = (tau_i - tau_b) as f32;
        if theoretical_diff < 0.0 {
            continue;
        }

        let measured_diff = match decode_i32(real_delays_row[i + 1]) {
            Some(v) => v,
            None => continue,
        };

        let d = theoretical_diff - measured_diff as f32;
        sum_sq += d * d;
        count += 1;
    }

    if count < MIN_RESIDUAL_STATIONS {
        None
    } else {
        Some(sum_sq.sqrt() / count as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::decode_f32;

    fn two_layer() -> Vec<f32> {
        vec![0.0, 1000.0, 2000.0, -1000.0, 0.0, 3000.0]
    }

    fn grid() -> GridSpec {
        GridSpec {
            dx: 100.0,
            dy: 100.0,
            dz: 100.0,
            nx: 3,
            ny: 3,
            nz: 3,
        }
    }

    /// A node below `z_min` is always gated to NULL.
    #[test]
    fn altitude_gate_rejects_nodes_below_z_min() {
        let model = two_layer();
        let coords = vec![0.0, 0.0, 100.0, 0.0, 0.0, 100.0, 100.0, 100.0];
        let delays = vec![1, 0, 0, 0, 0];
        let origins = vec![0.0, 0.0, -2000.0]; // entirely below z_min=-1000
        let g = grid();

        let cube = residual_cube(
            &model, 2, &delays, 1, &coords, 4, 0.0, &origins, &g, 1.0, 1000, 0,
        );

        assert!(cube.iter().all(|&v| decode_f32(v).is_none()));
    }

    #[test]
    fn node_within_model_can_produce_a_value() {
        let model = two_layer();
        // four stations in a square around the origin
        let coords = vec![-200.0, -200.0, 200.0, -200.0, -200.0, 200.0, 200.0, 200.0];
        // validity=1, base delay unused-but-reserved=0, three plausible lags
        let delays = vec![1, 0, 2, 3, 4];
        let origins = vec![-100.0, -100.0, -600.0];
        let g = GridSpec {
            dx: 50.0,
            dy: 50.0,
            dz: 50.0,
            nx: 5,
            ny: 5,
            nz: 5,
        };

        let cube = residual_cube(
            &model, 2, &delays, 1, &coords, 4, 500.0, &origins, &g, 1.0, 1000, 0,
        );

        assert!(cube.iter().any(|&v| decode_f32(v).is_some()));
    }
}
