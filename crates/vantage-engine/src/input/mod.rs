//! Input subsystem.
//!
//! Platform-agnostic input state for a single viewport window: pointer
//! position/buttons, wheel deltas, modifiers, and the handful of keys the
//! viewport navigation cares about. The window runtime translates winit
//! events into [`InputEvent`]s; nothing here exposes winit types.

mod state;
mod types;

pub use state::{InputFrame, InputState};
pub use types::{
    InputEvent,
    Key,
    KeyState,
    Modifiers,
    MouseButton,
    MouseButtonState,
    MouseWheelDelta,
    PointerButtonEvent,
    PointerMoveEvent,
};
