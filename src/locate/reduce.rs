//! Cube reducer.
//!
//! One independent unit of work per event, parallelized with `rayon`
//! over the event axis. Scans `diff_cube[event, 0..N)`, ignores `NULL`
//! entries, and records the smallest value and its node index. Ties
//! keep the first-seen node (strict `<` comparison), matching the
//! delay estimator's own tie-break convention.

use rayon::prelude::*;

use crate::types::{decode_f32, encode_i32};

/// Reduce a `diff_cube[E, N]` to per-event `(best_node, residual)`.
///
/// `best_node[e]` is `NULL` and `residual[e]` is `+inf` when every node
/// for that event is `NULL` (e.g. the whole candidate grid sits outside
/// the velocity model).
pub fn reduce_cube(diff_cube: &[f32], event_count: usize, node_count: usize) -> (Vec<i32>, Vec<f32>) {
    let reduced: Vec<(Option<usize>, f32)> = (0..event_count)
        .into_par_iter()
        .map(|event_id| {
            let row = &diff_cube[event_id * node_count..(event_id + 1) * node_count];
            let mut best: Option<(usize, f32)> = None;
            for (node_id, &cell) in row.iter().enumerate() {
                if let Some(value) = decode_f32(cell) {
                    match best {
                        Some((_, best_value)) if !(value < best_value) => {}
                        _ => best = Some((node_id, value)),
                    }
                }
            }
            match best {
                Some((node_id, value)) => (Some(node_id), value),
                None => (None, f32::INFINITY),
            }
        })
        .collect();

    let mut best_node = Vec::with_capacity(event_count);
    let mut residual = Vec::with_capacity(event_count);
    for (node_id, value) in reduced {
        best_node.push(encode_i32(node_id.map(|n| n as i32)));
        residual.push(value);
    }
    (best_node, residual)
}
