//! Vantage engine crate.
//!
//! A pannable/zoomable 2D CAD viewport renderer on wgpu, plus the platform
//! runtime pieces (window, device, input, timing) it runs on.

pub mod device;
pub mod window;
pub mod input;
pub mod time;
pub mod core;

pub mod logging;
pub mod coords;
pub mod camera;
pub mod settings;
pub mod render;
