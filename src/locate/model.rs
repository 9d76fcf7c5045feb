//! Layered-model utilities.
//!
//! `model[L, 3]` rows are `(z_bottom, z_top, vp)`, stored top-down: row
//! `L-1` has the smallest bottom altitude, row `0` the largest top
//! altitude. Rows form a non-overlapping partition over `[z_min, z_max]`.

/// Columns per velocity-model row: `(z_bottom, z_top, vp)`.
pub const MODEL_COLUMNS: usize = 3;

/// Read-only view over a flat `model[L, 3]` array.
#[derive(Debug, Clone, Copy)]
pub struct VelocityModel<'a> {
    rows: &'a [f32],
    layer_count: usize,
}

impl<'a> VelocityModel<'a> {
    /// Wrap a flat `model[L, MODEL_COLUMNS]` array.
    pub fn new(rows: &'a [f32], layer_count: usize) -> Self {
        debug_assert_eq!(rows.len(), layer_count * MODEL_COLUMNS);
        Self { rows, layer_count }
    }

    pub fn layer_count(&self) -> usize {
        self.layer_count
    }

    pub fn z_bottom(&self, layer: usize) -> f32 {
        self.rows[layer * MODEL_COLUMNS]
    }

    pub fn z_top(&self, layer: usize) -> f32 {
        self.rows[layer * MODEL_COLUMNS + 1]
    }

    pub fn vp(&self, layer: usize) -> f32 {
        self.rows[layer * MODEL_COLUMNS + 2]
    }

    /// Lowest bottom altitude across all layers (row `L-1`, per the
    /// data model's top-down storage order).
    pub fn z_min(&self) -> f32 {
        self.z_bottom(self.layer_count - 1)
    }

    /// Highest top altitude across all layers (row `0`).
    pub fn z_max(&self) -> f32 {
        self.z_top(0)
    }

    /// Returns the layer index `i` such that `z_bottom_i <= z < z_top_i`,
    /// or `None` if `z` falls outside every layer. A linear scan; the
    /// layer count is small enough that a binary search would not pay
    /// for itself.
    pub fn layer_of(&self, z: f32) -> Option<usize> {
        (0..self.layer_count).find(|&i| self.z_bottom(i) <= z && z < self.z_top(i))
    }
}

/// Snell's-law ray constant `p = sin(theta) / vp`, invariant along a ray
/// through a layered medium.
#[inline]
pub fn ray_constant(theta: f32, vp: f32) -> f32 {
    theta.sin() / vp
}
