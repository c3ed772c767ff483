//! Coordinate and color value types shared across the engine.
//!
//! Two coordinate spaces exist:
//! - World units: the CAD scene space (polygons, grid, axes). +X right,
//!   +Y down under the viewport projection.
//! - Device pixels: the render-surface space ([`Viewport`]).
//!
//! The camera module owns the conversion between the two.

mod color;
mod vec2;
mod viewport;

pub use color::ColorRgba;
pub use vec2::Vec2;
pub use viewport::Viewport;
