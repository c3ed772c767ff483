//! The viewport rendering core.
//!
//! Pipeline of one frame: settings snapshot → geometry generators produce
//! vertex/index streams → category slots upload them to GPU buffers → the
//! driver binds pipelines + uniform sets and issues the draw calls.
//!
//! Concurrency discipline:
//! - each drawable category's buffer pair sits behind its own lock, held
//!   across both upload (dispose + create + write) and bind + draw;
//! - one submission lock serializes the whole begin→submit→present cycle;
//! - the settings object has its own coarse lock (see [`crate::settings`]).

mod buffers;
mod driver;
mod pipelines;
mod shaders;
mod vertex;

pub mod geometry;

pub use buffers::{plan_upload, update_buffer, CategorySlot, SlotDraw, UploadPlan};
pub use driver::{DrawCategory, FramePlan, PlannedDraw, RenderState, ViewportRenderer};
pub use pipelines::{PipelineSet, RenderResources};
pub use shaders::{stage_source, ShaderStage};
pub use vertex::VertexPositionColor;
