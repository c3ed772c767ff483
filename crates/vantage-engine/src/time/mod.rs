//! Frame timing.
//!
//! One [`FrameClock`] per render loop; `tick()` once per presented frame.
//! The viewport redraws continuously (the runtime requests a redraw every
//! loop pass), so the clock doubles as the frame pacing reference.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
