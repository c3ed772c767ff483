use std::ops::Range;
use std::sync::{Mutex, MutexGuard, PoisonError};

use bytemuck::Pod;

/// Upload decision for one `update_buffer` call.
///
/// Kept separate from the GPU calls so the sizing policy is testable: a
/// replacement buffer is always exactly `element size × element count` bytes,
/// and empty input keeps the previous buffer.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum UploadPlan {
    /// Empty input: the previous buffer, if any, is left untouched.
    Keep,
    /// Dispose the previous buffer and allocate `bytes` exactly.
    Replace { bytes: u64 },
}

pub fn plan_upload(len: usize, element_size: usize) -> UploadPlan {
    if len == 0 {
        UploadPlan::Keep
    } else {
        UploadPlan::Replace {
            bytes: (len * element_size) as u64,
        }
    }
}

/// Replaces `buffer` with a freshly allocated, exactly-sized copy of `data`.
///
/// Empty `data` leaves the previous buffer untouched rather than clearing
/// it. Callers that need "empty means hidden" must drop the handle
/// and the slot's live flag themselves (the category slots below do).
pub fn update_buffer<T: Pod>(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    buffer: &mut Option<wgpu::Buffer>,
    data: &[T],
    usage: wgpu::BufferUsages,
    label: &str,
) {
    let UploadPlan::Replace { bytes } = plan_upload(data.len(), std::mem::size_of::<T>()) else {
        return;
    };

    if let Some(old) = buffer.take() {
        old.destroy();
    }

    let new = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size: bytes,
        usage: usage | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });
    queue.write_buffer(&new, 0, bytemuck::cast_slice(data));

    *buffer = Some(new);
}

/// How a category's current geometry is drawn.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SlotDraw {
    #[default]
    Empty,
    /// One indexed draw over exactly this many indices.
    Indexed(u32),
    /// One non-indexed draw over the full vertex count.
    Full(u32),
    /// One non-indexed draw per primitive range (strip batches).
    Ranged(Vec<Range<u32>>),
}

/// Buffer pair + draw shape for one drawable category.
#[derive(Debug, Default)]
pub struct SlotState {
    pub vertex: Option<wgpu::Buffer>,
    pub index: Option<wgpu::Buffer>,
    pub draw: SlotDraw,
    /// Gates drawing. A stale buffer handle can outlive its geometry (see
    /// `update_buffer`); the driver draws only live slots, so the draw shape
    /// always matches the uploaded data.
    pub live: bool,
}

impl SlotState {
    pub fn drawable(&self) -> bool {
        self.live && self.vertex.is_some()
    }

    /// Pure draw decision for the current state: `None` when nothing should
    /// be issued, otherwise the kind/count to draw. The frame executor and
    /// the frame planner both go through this, so the tested decision is the
    /// one that runs.
    pub fn plan(&self) -> Option<SlotDraw> {
        if !self.drawable() {
            return None;
        }
        match &self.draw {
            SlotDraw::Empty => None,
            draw => Some(draw.clone()),
        }
    }

    fn teardown(&mut self) {
        if let Some(old) = self.vertex.take() {
            old.destroy();
        }
        if let Some(old) = self.index.take() {
            old.destroy();
        }
        self.draw = SlotDraw::Empty;
        self.live = false;
    }
}

/// One drawable category (grid, axes, polygons, …) behind its own lock.
///
/// Upload (dispose + create + write) and bind + draw both run under this
/// lock, so a draw never observes a half-replaced buffer pair.
#[derive(Debug, Default)]
pub struct CategorySlot {
    state: Mutex<SlotState>,
}

impl CategorySlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lock(&self) -> MutexGuard<'_, SlotState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Uploads an indexed vertex/index stream (grid, axes).
    ///
    /// An empty stream tears the slot down: handles dropped, draw shape
    /// emptied, live flag cleared.
    pub fn upload_indexed<T: Pod>(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        vertices: &[T],
        indices: &[u32],
        label: &str,
    ) {
        let mut state = self.lock();

        if vertices.is_empty() {
            state.teardown();
            return;
        }

        update_buffer(
            device,
            queue,
            &mut state.vertex,
            vertices,
            wgpu::BufferUsages::VERTEX,
            label,
        );
        update_buffer(
            device,
            queue,
            &mut state.index,
            indices,
            wgpu::BufferUsages::INDEX,
            label,
        );
        state.draw = SlotDraw::Indexed(indices.len() as u32);
        state.live = true;
    }

    /// Uploads a non-indexed stream drawn in one call (line lists).
    pub fn upload_full<T: Pod>(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        vertices: &[T],
        label: &str,
    ) {
        let mut state = self.lock();

        if vertices.is_empty() {
            state.teardown();
            return;
        }

        update_buffer(
            device,
            queue,
            &mut state.vertex,
            vertices,
            wgpu::BufferUsages::VERTEX,
            label,
        );
        state.draw = SlotDraw::Full(vertices.len() as u32);
        state.live = true;
    }

    /// Uploads a non-indexed stream drawn per primitive range (strips).
    pub fn upload_ranged<T: Pod>(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        vertices: &[T],
        ranges: Vec<Range<u32>>,
        label: &str,
    ) {
        let mut state = self.lock();

        if vertices.is_empty() {
            state.teardown();
            return;
        }

        update_buffer(
            device,
            queue,
            &mut state.vertex,
            vertices,
            wgpu::BufferUsages::VERTEX,
            label,
        );
        state.draw = SlotDraw::Ranged(ranges);
        state.live = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── upload plan ───────────────────────────────────────────────────────

    #[test]
    fn empty_data_keeps_previous_buffer() {
        assert_eq!(plan_upload(0, 28), UploadPlan::Keep);
    }

    #[test]
    fn replacement_is_exactly_sized() {
        assert_eq!(plan_upload(7, 28), UploadPlan::Replace { bytes: 196 });
        assert_eq!(plan_upload(4, 4), UploadPlan::Replace { bytes: 16 });
    }

    // ── slot gating ───────────────────────────────────────────────────────

    #[test]
    fn default_slot_is_not_drawable() {
        let slot = CategorySlot::new();
        let state = slot.lock();
        assert!(!state.drawable());
        assert_eq!(state.draw, SlotDraw::Empty);
    }

    #[test]
    fn dead_slot_with_stale_handle_is_not_drawable() {
        // A live flag cleared while a handle lingers must still gate the
        // draw; only the flag plus a vertex buffer make a slot drawable.
        let state = SlotState {
            vertex: None,
            index: None,
            draw: SlotDraw::Indexed(42),
            live: false,
        };
        assert!(!state.drawable());
    }

    #[test]
    fn dead_or_empty_slots_plan_no_draw() {
        let mut state = SlotState::default();
        assert_eq!(state.plan(), None);

        // A stale draw shape on a dead slot must not be planned either.
        state.draw = SlotDraw::Full(12);
        state.live = false;
        assert_eq!(state.plan(), None);
    }
}
