//! Ray-tracer: single-incidence trace through a layered model.
//!
//! Marches from the source layer to the target layer, layer by layer,
//! accumulating lateral offset and travel time via Snell's law. Reports
//! a reflection (`None`) rather than a result when the ray constant
//! cannot be honored by some traversed layer, or when either endpoint
//! altitude falls outside the model.

use super::model::{ray_constant, VelocityModel};

/// End point of a traced ray: lateral offset, altitude, and travel time
/// (already scaled to sample-count units via `frequency`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayEndpoint {
    pub r: f32,
    pub z: f32,
    pub tau: f32,
}

/// Trace a single ray from `(source_r, source_z)` at incidence `theta`
/// to `target_z`, in the `lateral_direction` (`+1.0`/`-1.0`) sense.
///
/// `frequency` is an integer multiplier converting seconds to samples,
/// applied per layer (`Δτ_i · frequency`) rather than once at the end;
/// this only matters for rounding, but it keeps the accumulation order
/// consistent layer by layer.
///
/// Returns `None` (a reflection) if either altitude has no containing
/// layer, or if `ray_constant · v_i > 1` for any layer the ray crosses.
pub fn trace_ray(
    model: &VelocityModel,
    source_r: f32,
    source_z: f32,
    target_z: f32,
    theta: f32,
    lateral_direction: f32,
    frequency: i32,
) -> Option<RayEndpoint> {
    let source_layer = model.layer_of(source_z)?;
    let target_layer = model.layer_of(target_z)?;

    let p = ray_constant(theta, model.vp(source_layer));

    let step: i64 = match target_layer.cmp(&source_layer) {
        std::cmp::Ordering::Greater => 1,
        std::cmp::Ordering::Less => -1,
        std::cmp::Ordering::Equal => 0,
    };

    // Precondition: every layer between source and target must honor
    // the ray constant, else the ray reflects before reaching the target.
    let mut i = source_layer as i64;
    loop {
        if p * model.vp(i as usize) > 1.0 {
            return None;
        }
        if i as usize == target_layer {
            break;
        }
        i += step;
    }

    let mut r = source_r;
    let mut tau = 0.0_f32;
    let mut i = source_layer as i64;
    loop {
        let idx = i as usize;
        let thickness = if source_layer == target_layer {
            (target_z - source_z).abs()
        } else if idx == source_layer {
            model.z_top(idx) - source_z
        } else if idx == target_layer {
            target_z - model.z_bottom(idx)
        } else {
            model.z_top(idx) - model.z_bottom(idx)
        };

        let v = model.vp(idx);
        let phi = (p * v).asin();
        let dr = thickness * phi.tan() * lateral_direction;
        let dl = (dr * dr + thickness * thickness).sqrt();

        r += dr;
        tau += (dl / v) * frequency as f32;

        if idx == target_layer {
            break;
        }
        i += step;
    }

    Some(RayEndpoint {
        r,
        z: target_z,
        tau,
    })
}
