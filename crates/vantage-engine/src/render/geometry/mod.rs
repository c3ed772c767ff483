//! CPU geometry generators.
//!
//! Each generator turns the settings snapshot (plus the per-frame camera
//! sample) into flat [`VertexPositionColor`] streams. Pure code; the driver
//! owns the upload and draw.
//!
//! Depth layering, far to near: background polygons, grid, axes, then scene
//! layers. Vertices store `z = -depth` because the projection maps depth as
//! the negated z (0 near, 1 far).

mod axes;
mod grid;
mod scene;

pub use axes::generate_axes;
pub use grid::{adaptive_spacing, generate_grid};
pub use scene::{line_segments, point_markers, polygon_fills, polygon_outlines, RangedGeometry};

use super::vertex::VertexPositionColor;

/// Indexed line-list stream (grid, axes).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexedGeometry {
    pub vertices: Vec<VertexPositionColor>,
    pub indices: Vec<u32>,
}

// Depth constants; see the module docs for the layering order.
pub(crate) const BG_POLY_DEPTH: f32 = 0.99;
pub(crate) const GRID_DEPTH: f32 = 0.95;
pub(crate) const AXIS_DEPTH: f32 = 0.94;

/// Depth for a foreground scene layer; higher layers draw nearer.
pub(crate) fn layer_depth(z: i32) -> f32 {
    (0.5 - z as f32 * 1.0e-3).clamp(0.0, 0.9)
}

/// World z for a given depth under the viewport projection.
#[inline]
pub(crate) fn depth_to_z(depth: f32) -> f32 {
    -depth
}
