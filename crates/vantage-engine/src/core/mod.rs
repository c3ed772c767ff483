//! Core engine-facing contracts.
//!
//! The stable interface between the window runtime and the application:
//! the per-frame callback contract and the context handed to it.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::{FrameCtx, WindowCtx};
