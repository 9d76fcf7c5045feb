//! Localization Engine: layered-model utilities, the ray-tracer and
//! ray-time solver built on them, the residual-cube evaluation, the
//! per-event reduction, and the host driver that sequences them.

pub mod driver;
pub mod model;
pub mod reduce;
pub mod residual;
pub mod ray;
pub mod solver;

pub use driver::locate_events;
