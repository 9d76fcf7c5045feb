//! Job configuration for the two engines.
//!
//! Plain, `serde`-derived, `camelCase`-on-the-wire structs with a
//! fallible constructor-side validation step rather than panics.

use serde::{Deserialize, Serialize};

use crate::error::LocatorError;

/// Accumulation precision used by the Delay Estimator's running sums.
///
/// Default is `F32`. `F64` trades that speed for numerical stability:
/// sums of squares accumulated over a large window can lose precision
/// in `f32`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Precision {
    F32,
    F64,
}

impl Default for Precision {
    fn default() -> Self {
        Precision::F32
    }
}

/// Configuration for `estimate_delays`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimatorConfig {
    /// Samples per correlation window.
    pub window_size: usize,
    /// Maximum lag searched, in samples.
    pub scanner_size: usize,
    /// Lower bound for accepted Pearson `r`, in `[0, 1]`.
    pub min_correlation: f32,
    /// Reference station for differential delays.
    pub base_station_index: usize,
    /// Running-sum accumulation precision.
    #[serde(default)]
    pub precision: Precision,
}

impl EstimatorConfig {
    /// Validate the configuration against a known station count.
    ///
    /// Checks the invariants from the data model: `window_size >= 2`,
    /// `scanner_size >= 1`, `0 <= base_station_index < station_count`.
    pub fn validate(&self, station_count: usize) -> Result<(), LocatorError> {
        if self.window_size < 2 {
            return Err(LocatorError::ValidationError {
                message: format!("window_size must be >= 2, got {}", self.window_size),
            });
        }
        if self.scanner_size < 1 {
            return Err(LocatorError::ValidationError {
                message: format!("scanner_size must be >= 1, got {}", self.scanner_size),
            });
        }
        if self.base_station_index >= station_count {
            return Err(LocatorError::ValidationError {
                message: format!(
                    "base_station_index {} out of range (station_count {})",
                    self.base_station_index, station_count
                ),
            });
        }
        if !(0.0..=1.0).contains(&self.min_correlation) {
            return Err(LocatorError::ValidationError {
                message: format!(
                    "min_correlation must be in [0, 1], got {}",
                    self.min_correlation
                ),
            });
        }
        Ok(())
    }
}

/// Search-grid spacing and dimensions, shared by every event in a job.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridSpec {
    pub dx: f32,
    pub dy: f32,
    pub dz: f32,
    pub nx: usize,
    pub ny: usize,
    pub nz: usize,
}

impl GridSpec {
    /// Total node count `N = nx * ny * nz`.
    pub fn node_count(&self) -> usize {
        self.nx * self.ny * self.nz
    }

    /// Decode a linear node index into `(ix, iy, iz)`, per the data
    /// model's `(k % nx, (k / nx) % ny, k / (nx*ny))` rule.
    pub fn decode_node(&self, k: usize) -> (usize, usize, usize) {
        let ix = k % self.nx;
        let iy = (k / self.nx) % self.ny;
        let iz = k / (self.nx * self.ny);
        (ix, iy, iz)
    }

    fn validate(&self) -> Result<(), LocatorError> {
        if self.nx == 0 || self.ny == 0 || self.nz == 0 {
            return Err(LocatorError::ValidationError {
                message: "grid dimensions must all be non-zero".to_string(),
            });
        }
        Ok(())
    }
}

/// Configuration for `locate_events`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocateConfig {
    /// Reference station for differential delays (must match the
    /// `base_station_index` used to produce `real_delays`).
    pub base_station_index: usize,
    /// Lateral-position tolerance for the ray-time bisection.
    pub accuracy: f32,
    /// Integer multiplier converting seconds to samples in travel times.
    pub frequency: i32,
    /// Candidate-grid spacing/dimensions, shared across all events.
    pub grid: GridSpec,
}

impl LocateConfig {
    /// Validate the configuration against a known station count.
    pub fn validate(&self, station_count: usize) -> Result<(), LocatorError> {
        if self.base_station_index >= station_count {
            return Err(LocatorError::ValidationError {
                message: format!(
                    "base_station_index {} out of range (station_count {})",
                    self.base_station_index, station_count
                ),
            });
        }
        if self.accuracy <= 0.0 {
            return Err(LocatorError::ValidationError {
                message: format!("accuracy must be > 0, got {}", self.accuracy),
            });
        }
        if self.frequency <= 0 {
            return Err(LocatorError::ValidationError {
                message: format!("frequency must be > 0, got {}", self.frequency),
            });
        }
        self.grid.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> EstimatorConfig {
        EstimatorConfig {
            window_size: 4,
            scanner_size: 2,
            min_correlation: 0.5,
            base_station_index: 0,
            precision: Precision::default(),
        }
    }

    #[test]
    fn rejects_small_window() {
        let mut cfg = config();
        cfg.window_size = 1;
        assert!(cfg.validate(2).is_err());
    }

    #[test]
    fn rejects_out_of_range_base() {
        let mut cfg = config();
        cfg.base_station_index = 5;
        assert!(cfg.validate(2).is_err());
    }

    #[test]
    fn grid_node_decode_matches_row_major_layout() {
        let grid = GridSpec {
            dx: 1.0,
            dy: 1.0,
            dz: 1.0,
            nx: 3,
            ny: 4,
            nz: 5,
        };
        assert_eq!(grid.node_count(), 60);
        assert_eq!(grid.decode_node(0), (0, 0, 0));
        assert_eq!(grid.decode_node(1), (1, 0, 0));
        assert_eq!(grid.decode_node(3), (0, 1, 0));
        assert_eq!(grid.decode_node(3 * 4), (0, 0, 1));
    }
}
