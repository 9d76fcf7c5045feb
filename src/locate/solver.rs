//! Ray-time solver: bisection over incidence angle.
//!
//! Finds the integer travel time for a ray from `(0, source_z)` that
//! lands within `accuracy` of `receiver_r` at altitude `target_z`. The
//! source lateral coordinate is always `0`; horizontal symmetry is
//! exploited via `receiver_r` instead.
//!
//! The negative-lateral-direction branch mirrors the positive-direction
//! bracket logic sign-consistently: each iteration narrows `[min_angle,
//! max_angle]` toward whichever half still brackets `receiver_r`, with
//! the inequalities flipped for a receiver on the negative side.

use super::model::VelocityModel;
use super::ray::trace_ray;

const MAX_ITERATIONS: usize = 10;

/// Solve for the integer travel time (sample units) of a ray from
/// `(0, source_z)` to `(receiver_r, target_z)`, or `None` if no
/// incidence angle lands within `accuracy` of `receiver_r` within
/// `MAX_ITERATIONS` bisection steps, or if any traced ray reflects.
pub fn ray_time(
    model: &VelocityModel,
    source_z: f32,
    target_z: f32,
    receiver_r: f32,
    accuracy: f32,
    frequency: i32,
) -> Option<i32> {
    let source_r = 0.0_f32;

    let delta_z = (source_z - target_z).abs();
    let mut min_angle = (0.5 * accuracy).atan2(delta_z);

    let source_layer = model.layer_of(source_z)?;
    let layer_dz_at_source = model.z_top(source_layer) - source_z;
    let r_offset = (source_r - receiver_r).abs();
    let mut max_angle = r_offset.atan2(layer_dz_at_source);

    let lateral = if receiver_r >= 0.0 { 1.0 } else { -1.0 };

    for _ in 0..MAX_ITERATIONS {
        let min_ray = trace_ray(model, source_r, source_z, target_z, min_angle, lateral, frequency)?;
        if (min_ray.r - receiver_r).abs() < accuracy {
            return Some(min_ray.tau.round() as i32);
        }

        let mid_angle = (min_angle + max_angle) / 2.0;
        let mid_ray = trace_ray(model, source_r, source_z, target_z, mid_angle, lateral, frequency)?;
        if (mid_ray.r - receiver_r).abs() < accuracy {
            return Some(mid_ray.tau.round() as i32);
        }

        let max_ray = trace_ray(model, source_r, source_z, target_z, max_angle, lateral, frequency)?;
        if (max_ray.r - receiver_r).abs() < accuracy {
            return Some(max_ray.tau.round() as i32);
        }

        if lateral > 0.0 {
            if min_ray.r < receiver_r && receiver_r < mid_ray.r {
                max_angle = mid_angle;
            } else if mid_ray.r < receiver_r && receiver_r < max_ray.r {
                min_angle = mid_angle;
            } else {
                break;
            }
        } else if min_ray.r > receiver_r && receiver_r > mid_ray.r {
            max_angle = mid_angle;
        } else if mid_ray.r > receiver_r && receiver_r > max_ray.r {
            min_angle = mid_angle;
        } else {
            break;
        }
    }

    None
}
