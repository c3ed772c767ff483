//! Interactive viewport demo.
//!
//! Opens a window over a small CAD-style test scene. Left-drag pans, the
//! wheel zooms, arrow keys pan, `-`/`=` zoom, Home/`R` resets the camera.
//! Toggles: `G` grid, `A` axes, `F` polygon fills, `P` point markers.
//! Space swaps between the two test scenes.

use anyhow::Result;

use vantage_engine::camera::PanZoomController;
use vantage_engine::coords::{ColorRgba, Vec2};
use vantage_engine::core::{App, AppControl, FrameCtx};
use vantage_engine::device::GpuInit;
use vantage_engine::input::Key;
use vantage_engine::logging::{init_logging, LoggingConfig};
use vantage_engine::render::ViewportRenderer;
use vantage_engine::settings::SharedSettings;
use vantage_engine::window::{Runtime, RuntimeConfig};

struct ViewportDemo {
    settings: SharedSettings,
    renderer: ViewportRenderer,
    controller: PanZoomController,
    detail_scene: bool,
}

impl ViewportDemo {
    fn new(settings: SharedSettings) -> Self {
        Self {
            settings,
            renderer: ViewportRenderer::new(),
            controller: PanZoomController::new(),
            detail_scene: false,
        }
    }

    fn apply_toggles(&mut self, ctx: &FrameCtx<'_, '_>) {
        for key in &ctx.input_frame.keys_pressed {
            match key {
                Key::G => self.settings.mutate(|s| s.draw_grid = !s.draw_grid),
                Key::A => self.settings.mutate(|s| s.draw_axes = !s.draw_axes),
                Key::F => self.settings.mutate(|s| s.draw_filled = !s.draw_filled),
                Key::P => self.settings.mutate(|s| s.draw_points = !s.draw_points),
                Key::Space => self.swap_scene(),
                _ => {}
            }
        }
    }

    /// Replaces the settings handle with the other test scene. The new
    /// handle's generation counter starts over, so the renderer's cached
    /// generation must be invalidated.
    fn swap_scene(&mut self) {
        self.detail_scene = !self.detail_scene;
        self.settings = if self.detail_scene {
            build_detail_scene()
        } else {
            build_scene()
        };
        self.renderer.invalidate_scene();
    }
}

impl App for ViewportDemo {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        // Pipelines are built lazily on the first frame, once the surface
        // format and backend are known.
        if !self.renderer.is_ready() {
            if let Err(e) = self.renderer.setup(ctx.gpu) {
                log::error!("viewport setup failed: {e:#}");
                return AppControl::Exit;
            }
        }

        if ctx.input_frame.keys_pressed.contains(&Key::Escape) {
            return AppControl::Exit;
        }

        self.apply_toggles(ctx);
        self.controller
            .handle(ctx.input, ctx.input_frame, ctx.gpu.viewport(), &self.settings);

        if let Err(e) = self.renderer.draw(ctx.gpu, &self.settings) {
            log::error!("frame failed: {e:#}");
            return AppControl::Exit;
        }

        AppControl::Continue
    }
}

/// Builds the test scene. Polygon rims wind counter-clockwise in world
/// coordinates (y up); clockwise rims would be culled as back faces.
fn build_scene() -> SharedSettings {
    let settings = SharedSettings::default();

    settings.mutate(|s| {
        // Sheet outline behind everything.
        s.add_bg_polygon(
            vec![
                Vec2::new(-60.0, -40.0),
                Vec2::new(60.0, -40.0),
                Vec2::new(60.0, 40.0),
                Vec2::new(-60.0, 40.0),
            ],
            ColorRgba::new(0.96, 0.96, 0.92, 1.0),
            1.0,
            0,
        );

        // A filled part body.
        s.add_polygon(
            vec![
                Vec2::new(-30.0, -15.0),
                Vec2::new(10.0, -15.0),
                Vec2::new(10.0, 15.0),
                Vec2::new(-30.0, 15.0),
            ],
            ColorRgba::from_rgb8(70, 130, 180),
            1.0,
            true,
            1,
        );

        // An outline-only cutout sketch, drawn nearer.
        s.add_polygon(
            vec![
                Vec2::new(20.0, -10.0),
                Vec2::new(40.0, -10.0),
                Vec2::new(30.0, 10.0),
            ],
            ColorRgba::from_rgb8(180, 60, 60),
            1.0,
            false,
            2,
        );

        // A dimension-style polyline.
        s.add_line(
            vec![
                Vec2::new(-30.0, 22.0),
                Vec2::new(10.0, 22.0),
                Vec2::new(10.0, 18.0),
            ],
            ColorRgba::from_rgb8(40, 120, 40),
            1.0,
            3,
        );

        // Snap points on the part corners.
        for &(x, y) in &[(-30.0, -15.0), (10.0, -15.0), (10.0, 15.0), (-30.0, 15.0)] {
            s.add_point(Vec2::new(x, y), ColorRgba::black(), 4);
        }
    });

    settings
}

/// Builds the alternate scene, a zoomed-in detail of a flanged joint.
fn build_detail_scene() -> SharedSettings {
    let settings = SharedSettings::default();

    settings.mutate(|s| {
        s.zoom_factor = 4.0;

        // Flange plate.
        s.add_polygon(
            vec![
                Vec2::new(-12.0, -8.0),
                Vec2::new(12.0, -8.0),
                Vec2::new(12.0, 8.0),
                Vec2::new(-12.0, 8.0),
            ],
            ColorRgba::from_rgb8(150, 150, 160),
            1.0,
            true,
            0,
        );

        // Bolt circle, outline only.
        let mut rim = Vec::with_capacity(16);
        for i in 0..16 {
            let a = std::f32::consts::TAU * i as f32 / 16.0;
            rim.push(Vec2::new(6.0 * a.cos(), 6.0 * a.sin()));
        }
        s.add_polygon(rim, ColorRgba::from_rgb8(180, 60, 60), 1.0, false, 1);

        // Center marks on the bolt holes.
        for &(x, y) in &[(6.0, 0.0), (0.0, 6.0), (-6.0, 0.0), (0.0, -6.0)] {
            s.add_point(Vec2::new(x, y), ColorRgba::black(), 2);
            s.add_line(
                vec![Vec2::new(x - 1.5, y), Vec2::new(x + 1.5, y)],
                ColorRgba::from_rgb8(40, 120, 40),
                1.0,
                2,
            );
        }
    });

    settings
}

fn main() -> Result<()> {
    init_logging(LoggingConfig {
        env_filter: Some("info,vantage_engine=debug,wgpu=warn".to_string()),
        ..Default::default()
    });

    let app = ViewportDemo::new(build_scene());

    Runtime::run(
        RuntimeConfig {
            title: "vantage viewport".to_string(),
            ..Default::default()
        },
        GpuInit::default(),
        app,
    )
}
