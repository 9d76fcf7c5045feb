//! Host driver, localization half.
//!
//! Validates job shapes, runs the residual-cube evaluation and the cube
//! reducer in sequence (the host enforces a happens-before edge between
//! the two stages), and returns the stitched per-event results. Neither
//! stage shares mutable state; each receives read-only slices and this
//! function owns every output buffer it writes into.

use crate::config::LocateConfig;
use crate::error::LocatorError;

use super::reduce::reduce_cube;
use super::residual::residual_cube;

/// Evaluate a 3-D grid of candidate source positions for every event
/// and return `(best_node[E], residual[E])`.
///
/// `real_delays` is `[E, S+1]` flat: column `0` unused by this call,
/// columns `1..=S` the per-station differential delays for that event,
/// in the same encoding `estimate_delays` produces.
#[allow(clippy::too_many_arguments)]
pub fn locate_events(
    model: &[f32],
    layer_count: usize,
    real_delays: &[i32],
    event_count: usize,
    coords: &[f32],
    station_count: usize,
    stations_altitude: f32,
    origins: &[f32],
    config: &LocateConfig,
) -> Result<(Vec<i32>, Vec<f32>), LocatorError> {
    config.validate(station_count)?;

    if model.len() != layer_count * super::model::MODEL_COLUMNS {
        return Err(LocatorError::ValidationError {
            message: format!(
                "model length {} does not match layer_count * {} ({})",
                model.len(),
                super::model::MODEL_COLUMNS,
                layer_count
            ),
        });
    }
    if coords.len() != station_count * 2 {
        return Err(LocatorError::ValidationError {
            message: format!(
                "coords length {} does not match station_count * 2 ({})",
                coords.len(),
                station_count
            ),
        });
    }
    if origins.len() != event_count * 3 {
        return Err(LocatorError::ValidationError {
            message: format!(
                "origins length {} does not match event_count * 3 ({})",
                origins.len(),
                event_count
            ),
        });
    }
    let delay_stride = station_count + 1;
    if real_delays.len() != event_count * delay_stride {
        return Err(LocatorError::ValidationError {
            message: format!(
                "real_delays length {} does not match event_count * (station_count + 1) ({})",
                real_delays.len(),
                event_count * delay_stride
            ),
        });
    }

    log::info!(
        "locate_events: {} events over a {}x{}x{} grid, {} stations",
        event_count,
        config.grid.nx,
        config.grid.ny,
        config.grid.nz,
        station_count
    );

    let diff_cube = residual_cube(
        model,
        layer_count,
        real_delays,
        event_count,
        coords,
        station_count,
        stations_altitude,
        origins,
        &config.grid,
        config.accuracy,
        config.frequency,
        config.base_station_index,
    );

    let node_count = config.grid.node_count();
    let null_cells = diff_cube
        .iter()
        .filter(|&&v| crate::types::decode_f32(v).is_none())
        .count();
    log::debug!(
        "locate_events: {}/{} cube cells NULL (gated or unconverged)",
        null_cells,
        diff_cube.len()
    );

    let (best_node, residual) = reduce_cube(&diff_cube, event_count, node_count);

    let located = best_node
        .iter()
        .filter(|&&n| crate::types::decode_i32(n).is_some())
        .count();
    log::info!(
        "locate_events: {}/{} events located",
        located,
        event_count
    );

    Ok((best_node, residual))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GridSpec;
    use crate::types::decode_i32;

    fn two_layer() -> Vec<f32> {
        vec![0.0, 1000.0, 2000.0, -1000.0, 0.0, 3000.0]
    }

    fn config() -> LocateConfig {
        LocateConfig {
            base_station_index: 0,
            accuracy: 1.0,
            frequency: 1000,
            grid: GridSpec {
                dx: 50.0,
                dy: 50.0,
                dz: 50.0,
                nx: 5,
                ny: 5,
                nz: 5,
            },
        }
    }

    #[test]
    fn rejects_mismatched_model_shape() {
        let model = vec![0.0, 1.0]; // too short for MODEL_COLUMNS
        let coords = vec![0.0, 0.0];
        let delays = vec![0, 0];
        let origins = vec![0.0, 0.0, 0.0];
        let err = locate_events(
            &model,
            1,
            &delays,
            1,
            &coords,
            1,
            0.0,
            &origins,
            &config(),
        )
        .unwrap_err();
        assert!(matches!(err, LocatorError::ValidationError { .. }));
    }

    /// The residual minimum lands at the ground-truth node.
    #[test]
    fn residual_minimum_near_forward_model_truth() {
        let model_rows = two_layer();
        let coords = vec![-200.0, -200.0, 200.0, -200.0, -200.0, 200.0, 200.0, 200.0];
        let station_count = 4;
        let stations_altitude = 500.0;
        let truth = (-100.0_f32, -100.0_f32, -600.0_f32);

        // Forward-model the measured delays at truth using the same
        // solver the kernel under test uses, base station 0.
        let model = super::super::model::VelocityModel::new(&model_rows, 2);
        let rho_b = ((coords[0] - truth.0).powi(2) + (coords[1] - truth.1).powi(2)).sqrt();
        let tau_b =
            super::super::solver::ray_time(&model, truth.2, stations_altitude, rho_b, 1.0, 1000)
                .unwrap();
        let mut row = vec![0_i32; station_count + 1];
        row[0] = 1;
        for i in 0..station_count {
            let rho_i = ((coords[i * 2] - truth.0).powi(2) + (coords[i * 2 + 1] - truth.1).powi(2))
                .sqrt();
            let tau_i = super::super::solver::ray_time(
                &model,
                truth.2,
                stations_altitude,
                rho_i,
                1.0,
                1000,
            )
            .unwrap();
            row[i + 1] = tau_i - tau_b;
        }

        let grid = GridSpec {
            dx: 50.0,
            dy: 50.0,
            dz: 50.0,
            nx: 5,
            ny: 5,
            nz: 5,
        };
        // Grid centered on truth: origin is truth minus two steps in each axis.
        let origin = (
            truth.0 - 2.0 * grid.dx,
            truth.1 - 2.0 * grid.dy,
            truth.2 - 2.0 * grid.dz,
        );
        let origins = vec![origin.0, origin.1, origin.2];

        let cfg = LocateConfig {
            base_station_index: 0,
            accuracy: 1.0,
            frequency: 1000,
            grid,
        };

        let (best_node, residual) = locate_events(
            &model_rows,
            2,
            &row,
            1,
            &coords,
            station_count,
            stations_altitude,
            &origins,
            &cfg,
        )
        .unwrap();

        let truth_node = 2 + 2 * cfg.grid.nx + 2 * cfg.grid.nx * cfg.grid.ny; // center of the 5x5x5 grid
        assert_eq!(decode_i32(best_node[0]), Some(truth_node as i32));
        assert!(residual[0] < 1.0);
    }
}
