//! Viewport settings: camera, grid policy, colors, and scene primitives.
//!
//! [`ViewSettings`] is the single object external callers configure and the
//! renderer consumes. It may be mutated from a different thread than the one
//! driving draw calls (a UI update overlapping a timer redraw), so the shared
//! form is [`SharedSettings`]: one coarse lock around every mutation, and a
//! consistent snapshot taken under the same lock at the start of each frame.

mod primitives;
mod shared;
mod view;

pub use primitives::{SceneLine, ScenePoint, ScenePolygon};
pub use shared::{SettingsSnapshot, SharedSettings};
pub use view::{ViewSettings, POINT_WIDTH};
