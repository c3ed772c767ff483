use glam::{Mat4, Vec3, Vec4};

use crate::coords::Viewport;
use crate::settings::ViewSettings;

/// Immutable camera sample for one frame: camera position/zoom plus the
/// current render-surface size in device pixels.
#[derive(Debug, Copy, Clone)]
pub struct CameraView {
    pub camera_x: f32,
    pub camera_y: f32,
    pub zoom_factor: f32,
    pub base_zoom: f32,
    pub viewport: Viewport,
}

impl CameraView {
    pub fn new(settings: &ViewSettings, viewport: Viewport) -> Self {
        Self {
            camera_x: settings.camera_x,
            camera_y: settings.camera_y,
            zoom_factor: settings.zoom_factor,
            base_zoom: settings.base_zoom,
            viewport,
        }
    }

    /// Effective zoom: world units per device pixel.
    #[inline]
    pub fn zoom(&self) -> f32 {
        self.zoom_factor * self.base_zoom
    }

    /// World position to integer screen pixels.
    ///
    /// Note the camera offset is divided by the zoom while the world
    /// coordinate is not scaled at all; this deliberately differs from the
    /// drawn projection's zoom handling (see the module docs). The integer
    /// truncation is also part of the contract: the adaptive grid compares
    /// these values against pixel thresholds.
    pub fn world_to_screen(&self, x: f32, y: f32) -> (i32, i32) {
        let zoom = f64::from(self.zoom());

        let sx = f64::from(x) - f64::from(self.camera_x) / zoom + f64::from(self.viewport.width) / 2.0;
        let sy =
            f64::from(y) - f64::from(self.camera_y) / zoom + f64::from(self.viewport.height) / 2.0;

        (sx as i32, sy as i32)
    }

    /// Screen-pixel extent of a world-space vector, as the difference of two
    /// [`Self::world_to_screen`] samples.
    pub fn world_to_screen_extent(&self, dx: f32, dy: f32) -> (i32, i32) {
        let (x0, y0) = self.world_to_screen(0.0, 0.0);
        let (x1, y1) = self.world_to_screen(dx, dy);
        (x1 - x0, y1 - y0)
    }

    /// Orthographic off-center projection for the current frame.
    ///
    /// Half the viewport, scaled by the zoom, extends from the camera in each
    /// direction; near/far span [0, 1]. Laid out column-major for direct
    /// upload to the view-matrix uniform.
    pub fn view_matrix(&self) -> Mat4 {
        let zoom = self.zoom();

        let left = self.camera_x - self.viewport.half_width() * zoom;
        let right = self.camera_x + self.viewport.half_width() * zoom;
        let bottom = self.camera_y + self.viewport.half_height() * zoom;
        let top = self.camera_y - self.viewport.half_height() * zoom;

        orthographic_off_center(left, right, bottom, top, 0.0, 1.0)
    }
}

/// Off-center orthographic projection with [0, 1] depth.
fn orthographic_off_center(
    left: f32,
    right: f32,
    bottom: f32,
    top: f32,
    near: f32,
    far: f32,
) -> Mat4 {
    Mat4::from_cols(
        Vec4::new(2.0 / (right - left), 0.0, 0.0, 0.0),
        Vec4::new(0.0, 2.0 / (top - bottom), 0.0, 0.0),
        Vec4::new(0.0, 0.0, 1.0 / (near - far), 0.0),
        Vec4::new(
            (left + right) / (left - right),
            (top + bottom) / (bottom - top),
            near / (near - far),
            1.0,
        ),
    )
}

/// Coordinate-convention correction folded into the projection.
///
/// The projection above targets the engine's native clip convention
/// (+Y down, [0, 1] depth). wgpu presents a single clip space (+Y up,
/// [0, 1] depth) on every backend, so today each backend needs the same
/// vertical flip and none needs a depth remap; the per-backend selection
/// stays because it is decided once at setup, from the adapter's backend.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct ClipCorrection {
    pub flip_y: bool,
    pub remap_z: bool,
}

impl ClipCorrection {
    pub fn for_backend(backend: wgpu::Backend) -> Self {
        match backend {
            // wgpu remaps GL's [-1, 1] depth itself; no remap on top.
            wgpu::Backend::Gl => Self {
                flip_y: true,
                remap_z: false,
            },
            _ => Self {
                flip_y: true,
                remap_z: false,
            },
        }
    }

    /// Matrix form, premultiplied onto the view matrix each frame.
    pub fn matrix(&self) -> Mat4 {
        let mut m = Mat4::IDENTITY;
        if self.flip_y {
            m = Mat4::from_scale(Vec3::new(1.0, -1.0, 1.0)) * m;
        }
        if self.remap_z {
            // [0, 1] depth to [-1, 1].
            m = Mat4::from_translation(Vec3::new(0.0, 0.0, -1.0))
                * Mat4::from_scale(Vec3::new(1.0, 1.0, 2.0))
                * m;
        }
        m
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(camera_x: f32, camera_y: f32, zoom_factor: f32, w: f32, h: f32) -> CameraView {
        CameraView {
            camera_x,
            camera_y,
            zoom_factor,
            base_zoom: 1.0,
            viewport: Viewport::new(w, h),
        }
    }

    // ── world_to_screen ───────────────────────────────────────────────────

    #[test]
    fn origin_maps_to_viewport_center_with_centered_camera() {
        let v = view(0.0, 0.0, 1.0, 100.0, 100.0);
        assert_eq!(v.world_to_screen(0.0, 0.0), (50, 50));
    }

    #[test]
    fn camera_offset_is_divided_by_zoom() {
        // The screen transform divides the camera offset by the zoom
        // instead of scaling the coordinate.
        let v = view(20.0, 0.0, 2.0, 100.0, 100.0);
        // 0 - 20/2 + 50 = 40
        assert_eq!(v.world_to_screen(0.0, 0.0), (40, 50));
    }

    #[test]
    fn extent_is_self_consistent_with_point_transform() {
        let v = view(13.0, -7.0, 0.5, 640.0, 480.0);
        for (dx, dy) in [(10.0, 0.0), (0.0, 25.0), (3.5, -4.5), (123.0, 456.0)] {
            let (x0, y0) = v.world_to_screen(0.0, 0.0);
            let (x1, y1) = v.world_to_screen(dx, dy);
            assert_eq!(v.world_to_screen_extent(dx, dy), (x1 - x0, y1 - y0));
        }
    }

    #[test]
    fn extent_of_one_spacing_unit_at_unit_zoom() {
        let v = view(0.0, 0.0, 1.0, 100.0, 100.0);
        assert_eq!(v.world_to_screen_extent(10.0, 0.0), (10, 0));
    }

    // ── view matrix ───────────────────────────────────────────────────────

    #[test]
    fn view_matrix_maps_camera_to_clip_origin() {
        let v = view(12.0, -3.0, 2.0, 200.0, 100.0);
        let clip = v.view_matrix() * Vec4::new(12.0, -3.0, 0.0, 1.0);
        assert!(clip.x.abs() < 1e-6);
        assert!(clip.y.abs() < 1e-6);
        assert!((clip.w - 1.0).abs() < 1e-6);
    }

    #[test]
    fn view_matrix_maps_visible_extents_to_clip_edges() {
        let v = view(0.0, 0.0, 1.0, 100.0, 100.0);
        let m = v.view_matrix();

        let right = m * Vec4::new(50.0, 0.0, 0.0, 1.0);
        assert!((right.x - 1.0).abs() < 1e-6);

        // +Y world maps to -Y clip here; the per-backend flip then turns it
        // into +Y clip, i.e. the top of the surface under wgpu conventions.
        let down = m * Vec4::new(0.0, 50.0, 0.0, 1.0);
        assert!((down.y + 1.0).abs() < 1e-6);
    }

    #[test]
    fn view_matrix_depth_range_is_zero_to_one() {
        let v = view(0.0, 0.0, 1.0, 100.0, 100.0);
        let m = v.view_matrix();

        let near = m * Vec4::new(0.0, 0.0, 0.0, 1.0);
        let far = m * Vec4::new(0.0, 0.0, -1.0, 1.0);
        assert!(near.z.abs() < 1e-6);
        assert!((far.z - 1.0).abs() < 1e-6);
    }

    // ── clip correction ───────────────────────────────────────────────────

    #[test]
    fn correction_flips_y_only() {
        let c = ClipCorrection::for_backend(wgpu::Backend::Vulkan);
        let p = c.matrix() * Vec4::new(0.25, 0.5, 0.75, 1.0);
        assert_eq!(p, Vec4::new(0.25, -0.5, 0.75, 1.0));
    }

    #[test]
    fn depth_remap_covers_signed_clip_range() {
        let c = ClipCorrection {
            flip_y: false,
            remap_z: true,
        };
        let near = c.matrix() * Vec4::new(0.0, 0.0, 0.0, 1.0);
        let far = c.matrix() * Vec4::new(0.0, 0.0, 1.0, 1.0);
        assert!((near.z + 1.0).abs() < 1e-6);
        assert!((far.z - 1.0).abs() < 1e-6);
    }
}
