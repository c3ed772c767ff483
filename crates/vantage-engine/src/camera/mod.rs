//! Camera/projection model and viewport navigation.
//!
//! Two distinct transforms live here on purpose:
//! - [`CameraView::world_to_screen`] divides the camera offset by the zoom
//!   (integer screen coordinates, used for grid density decisions);
//! - [`CameraView::view_matrix`] scales the viewport half-extents by the zoom
//!   (the orthographic projection the GPU actually draws with).
//!
//! The two disagree about zoom handling; each is load-bearing and tested
//! separately. Do not unify them.

mod controller;
mod projection;

pub use controller::PanZoomController;
pub use projection::{CameraView, ClipCorrection};
