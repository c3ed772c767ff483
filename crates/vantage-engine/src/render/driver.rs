use std::sync::Mutex;

use anyhow::{bail, Result};
use glam::Mat4;

use crate::camera::CameraView;
use crate::coords::ColorRgba;
use crate::device::{Gpu, SurfaceErrorAction};
use crate::settings::{SharedSettings, ViewSettings};

use super::buffers::{CategorySlot, SlotDraw};
use super::geometry;
use super::pipelines::{self, RenderResources};

/// Readiness of the viewport renderer.
///
/// `draw` is a silent no-op until `setup` succeeds; the window can pump
/// frames before the pipelines exist without tripping anything.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum RenderState {
    NotReady,
    Ready,
}

/// Drawable categories, in the order the frame issues them.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum DrawCategory {
    Fills,
    Points,
    Grid,
    Axes,
    Outlines,
    Lines,
}

/// One planned draw: a category and its kind/count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedDraw {
    pub category: DrawCategory,
    pub draw: SlotDraw,
}

/// Pure description of the next frame: clear color plus the per-category
/// draws in issue order, decided from the same `SlotState::plan` calls the
/// executor makes. Scenario tests run against this without a GPU.
#[derive(Debug, Clone, PartialEq)]
pub struct FramePlan {
    pub clear_color: ColorRgba,
    pub draws: Vec<PlannedDraw>,
}

impl FramePlan {
    /// Number of indexed draw calls the frame will issue.
    pub fn indexed_draw_calls(&self) -> usize {
        self.draws
            .iter()
            .filter(|d| matches!(d.draw, SlotDraw::Indexed(_)))
            .count()
    }
}

/// The viewport frame driver.
///
/// Owns the render resources and one buffer slot per drawable category.
/// Grid and axes depend on the camera, so their geometry is regenerated
/// every frame; scene categories are regenerated only when the settings
/// generation changes.
pub struct ViewportRenderer {
    resources: Option<RenderResources>,

    /// Extra model rotation in degrees. Applied to every category; zero by
    /// default, kept as the hook for view rotation.
    model_rotation_deg: f32,

    /// Settings generation the scene slots were last built from.
    scene_generation: Option<u64>,

    grid: CategorySlot,
    axes: CategorySlot,
    fills: CategorySlot,
    outlines: CategorySlot,
    lines: CategorySlot,
    points: CategorySlot,

    /// Serializes the whole begin → record → submit → present cycle.
    submit_lock: Mutex<()>,
}

impl Default for ViewportRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewportRenderer {
    pub fn new() -> Self {
        Self {
            resources: None,
            model_rotation_deg: 0.0,
            scene_generation: None,
            grid: CategorySlot::new(),
            axes: CategorySlot::new(),
            fills: CategorySlot::new(),
            outlines: CategorySlot::new(),
            lines: CategorySlot::new(),
            points: CategorySlot::new(),
            submit_lock: Mutex::new(()),
        }
    }

    pub fn state(&self) -> RenderState {
        if self.resources.is_some() {
            RenderState::Ready
        } else {
            RenderState::NotReady
        }
    }

    pub fn is_ready(&self) -> bool {
        self.state() == RenderState::Ready
    }

    pub fn set_model_rotation_deg(&mut self, degrees: f32) {
        self.model_rotation_deg = degrees;
    }

    /// Creates pipelines, uniforms and the depth target for `gpu`.
    ///
    /// Failure (a missing shader stage) leaves the renderer not ready, so
    /// subsequent `draw` calls stay no-ops.
    pub fn setup(&mut self, gpu: &Gpu<'_>) -> Result<()> {
        let resources = pipelines::create_resources(
            gpu.device(),
            gpu.surface_format(),
            gpu.backend(),
            gpu.viewport(),
        )?;
        self.resources = Some(resources);
        Ok(())
    }

    /// Forces the scene slots to re-upload on the next frame.
    ///
    /// Needed when the shared settings *handle* is replaced wholesale (the
    /// new object's generation counter restarts and may collide with the
    /// cached one); ordinary mutations bump the generation and need no call.
    pub fn invalidate_scene(&mut self) {
        self.scene_generation = None;
    }

    fn slots_in_draw_order(&self) -> [(DrawCategory, &CategorySlot); 6] {
        [
            (DrawCategory::Fills, &self.fills),
            (DrawCategory::Points, &self.points),
            (DrawCategory::Grid, &self.grid),
            (DrawCategory::Axes, &self.axes),
            (DrawCategory::Outlines, &self.outlines),
            (DrawCategory::Lines, &self.lines),
        ]
    }

    /// Plans the next frame from the current slot states: clear color plus
    /// the draws `draw` will issue, nothing GPU-side touched.
    pub fn plan_frame(&self, settings: &ViewSettings) -> FramePlan {
        let mut draws = Vec::new();
        for (category, slot) in self.slots_in_draw_order() {
            if let Some(draw) = slot.lock().plan() {
                draws.push(PlannedDraw { category, draw });
            }
        }
        FramePlan {
            clear_color: settings.background_color,
            draws,
        }
    }

    /// Draws one frame from the current settings snapshot.
    ///
    /// No-op while not ready or while the surface has no area. Transient
    /// surface errors skip the frame; only a fatal error (out of memory)
    /// is returned.
    pub fn draw(&mut self, gpu: &mut Gpu<'_>, shared: &SharedSettings) -> Result<()> {
        let Some(resources) = self.resources.as_mut() else {
            return Ok(());
        };

        let viewport = gpu.viewport();
        if !viewport.is_valid() {
            return Ok(());
        }

        let snapshot = shared.snapshot();
        let settings = &snapshot.settings;
        let view = CameraView::new(settings, viewport);

        resources.depth.resize(gpu.device(), viewport);

        // Camera-dependent categories regenerate every frame.
        let grid = geometry::generate_grid(&view, settings);
        self.grid.upload_indexed(
            gpu.device(),
            gpu.queue(),
            &grid.vertices,
            &grid.indices,
            "vantage grid",
        );
        let axes = geometry::generate_axes(&view, settings);
        self.axes.upload_indexed(
            gpu.device(),
            gpu.queue(),
            &axes.vertices,
            &axes.indices,
            "vantage axes",
        );

        // Scene categories re-upload only when the settings changed.
        if self.scene_generation != Some(snapshot.generation) {
            let fills = geometry::polygon_fills(settings);
            self.fills.upload_ranged(
                gpu.device(),
                gpu.queue(),
                &fills.vertices,
                fills.ranges,
                "vantage polygon fills",
            );

            let points = geometry::point_markers(settings);
            self.points.upload_ranged(
                gpu.device(),
                gpu.queue(),
                &points.vertices,
                points.ranges,
                "vantage point markers",
            );

            self.outlines.upload_full(
                gpu.device(),
                gpu.queue(),
                &geometry::polygon_outlines(settings),
                "vantage polygon outlines",
            );
            self.lines.upload_full(
                gpu.device(),
                gpu.queue(),
                &geometry::line_segments(settings),
                "vantage lines",
            );

            self.scene_generation = Some(snapshot.generation);
        }

        let model = Mat4::from_rotation_z(self.model_rotation_deg.to_radians());
        let view_matrix = resources.correction.matrix() * view.view_matrix();
        resources.uniforms.write_model(gpu.queue(), model);
        resources.uniforms.write_view(gpu.queue(), view_matrix);

        // One submission at a time, from acquire to present.
        let _submit = self
            .submit_lock
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        let mut frame = match gpu.begin_frame() {
            Ok(frame) => frame,
            Err(err) => {
                let action = gpu.handle_surface_error(err.clone());
                if action == SurfaceErrorAction::Fatal {
                    bail!("surface error: {err}");
                }
                log::warn!("skipping frame after surface error: {err} ({action:?})");
                return Ok(());
            }
        };

        // Pass dropped before the encoder moves into submit().
        {
            let bg = settings.background_color;
            let mut rpass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("vantage viewport pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &frame.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: f64::from(bg.r),
                            g: f64::from(bg.g),
                            b: f64::from(bg.b),
                            a: f64::from(bg.a),
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &resources.depth.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            rpass.set_bind_group(0, &resources.uniforms.view_bind_group, &[]);
            rpass.set_bind_group(1, &resources.uniforms.model_bind_group, &[]);

            rpass.set_pipeline(&resources.pipelines.filled);
            draw_slot(&mut rpass, &self.fills);
            draw_slot(&mut rpass, &self.points);

            rpass.set_pipeline(&resources.pipelines.line);
            draw_slot(&mut rpass, &self.grid);
            draw_slot(&mut rpass, &self.axes);
            draw_slot(&mut rpass, &self.outlines);
            draw_slot(&mut rpass, &self.lines);
        }

        gpu.submit(frame);
        Ok(())
    }
}

/// Executes one category's planned draw under the slot lock, so an upload
/// cannot interleave. The decision comes from the same `SlotState::plan`
/// the frame planner uses; this function only fetches handles and issues.
fn draw_slot(rpass: &mut wgpu::RenderPass<'_>, slot: &CategorySlot) {
    let state = slot.lock();
    let Some(planned) = state.plan() else {
        return;
    };
    let Some(vertex) = state.vertex.as_ref() else {
        return;
    };

    rpass.set_vertex_buffer(0, vertex.slice(..));

    match planned {
        SlotDraw::Empty => {}
        SlotDraw::Indexed(count) => {
            let Some(index) = state.index.as_ref() else {
                return;
            };
            rpass.set_index_buffer(index.slice(..), wgpu::IndexFormat::Uint32);
            rpass.draw_indexed(0..count, 0, 0..1);
        }
        SlotDraw::Full(count) => {
            rpass.draw(0..count, 0..1);
        }
        SlotDraw::Ranged(ranges) => {
            for range in ranges {
                rpass.draw(range, 0..1);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renderer_starts_not_ready() {
        let r = ViewportRenderer::new();
        assert_eq!(r.state(), RenderState::NotReady);
        assert!(!r.is_ready());
    }

    #[test]
    fn disabled_grid_and_axes_plan_a_clear_only_frame() {
        // Grid and axes off, empty scene: the frame must issue zero draw
        // calls (indexed or otherwise) while still clearing to the
        // configured background color.
        let r = ViewportRenderer::new();
        let mut s = ViewSettings::default();
        s.draw_grid = false;
        s.draw_axes = false;
        s.background_color = ColorRgba::new(0.2, 0.3, 0.4, 1.0);

        let plan = r.plan_frame(&s);

        assert!(plan.draws.is_empty());
        assert_eq!(plan.indexed_draw_calls(), 0);
        assert_eq!(plan.clear_color, s.background_color);
    }

    #[test]
    fn dead_slot_with_stale_shape_is_not_planned() {
        let r = ViewportRenderer::new();
        {
            let mut state = r.grid.lock();
            state.draw = SlotDraw::Indexed(42);
            state.live = false;
        }

        let plan = r.plan_frame(&ViewSettings::default());
        assert_eq!(plan.indexed_draw_calls(), 0);
        assert!(plan.draws.is_empty());
    }

    #[test]
    fn invalidate_scene_drops_the_cached_generation() {
        let mut r = ViewportRenderer::new();
        r.scene_generation = Some(7);

        r.invalidate_scene();

        assert_eq!(r.scene_generation, None);
    }
}
