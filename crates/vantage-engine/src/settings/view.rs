use crate::coords::{ColorRgba, Vec2};

use super::primitives::{SceneLine, ScenePoint, ScenePolygon};

/// World-space width of a point marker's square.
pub const POINT_WIDTH: f32 = 0.5;

/// Everything the viewport renderer consumes: camera, grid/axis policy,
/// colors, and the scene primitive collections.
///
/// Plain data; cross-thread sharing is [`super::SharedSettings`]' concern.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewSettings {
    // Camera.
    pub camera_x: f32,
    pub camera_y: f32,
    pub zoom_factor: f32,
    pub base_zoom: f32,

    // Grid.
    pub draw_grid: bool,
    pub grid_spacing: f32,
    pub grid_dynamic: bool,
    pub minor_grid_color: ColorRgba,
    pub major_grid_color: ColorRgba,

    // Axes.
    pub draw_axes: bool,
    pub axis_color: ColorRgba,

    // Frame.
    pub background_color: ColorRgba,

    // Scene toggles.
    pub draw_filled: bool,
    pub draw_points: bool,

    // Scene content. Background polygons render behind everything else.
    pub polygons: Vec<ScenePolygon>,
    pub bg_polygons: Vec<ScenePolygon>,
    pub lines: Vec<SceneLine>,
    pub points: Vec<ScenePoint>,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            camera_x: 0.0,
            camera_y: 0.0,
            zoom_factor: 1.0,
            base_zoom: 1.0,

            draw_grid: true,
            grid_spacing: 10.0,
            grid_dynamic: true,
            minor_grid_color: ColorRgba::new(0.8, 0.8, 0.8, 1.0),
            major_grid_color: ColorRgba::new(0.5, 0.5, 0.5, 1.0),

            draw_axes: true,
            axis_color: ColorRgba::black(),

            background_color: ColorRgba::white(),

            draw_filled: true,
            draw_points: true,

            polygons: Vec::new(),
            bg_polygons: Vec::new(),
            lines: Vec::new(),
            points: Vec::new(),
        }
    }
}

impl ViewSettings {
    /// Effective zoom: world units per device pixel.
    #[inline]
    pub fn zoom(&self) -> f32 {
        self.zoom_factor * self.base_zoom
    }

    pub fn add_polygon(
        &mut self,
        points: Vec<Vec2>,
        color: ColorRgba,
        alpha: f32,
        filled: bool,
        z: i32,
    ) {
        self.polygons.push(ScenePolygon {
            points,
            color,
            alpha,
            filled,
            z,
        });
    }

    pub fn add_bg_polygon(&mut self, points: Vec<Vec2>, color: ColorRgba, alpha: f32, z: i32) {
        self.bg_polygons.push(ScenePolygon {
            points,
            color,
            alpha,
            filled: true,
            z,
        });
    }

    pub fn add_line(&mut self, points: Vec<Vec2>, color: ColorRgba, alpha: f32, z: i32) {
        self.lines.push(SceneLine {
            points,
            color,
            alpha,
            z,
        });
    }

    pub fn add_point(&mut self, position: Vec2, color: ColorRgba, z: i32) {
        self.points.push(ScenePoint { position, color, z });
    }

    /// Removes all scene primitives; camera and policy are untouched.
    pub fn clear(&mut self) {
        self.polygons.clear();
        self.bg_polygons.clear();
        self.lines.clear();
        self.points.clear();
    }

    pub fn reset_camera(&mut self) {
        self.camera_x = 0.0;
        self.camera_y = 0.0;
        self.zoom_factor = 1.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_keeps_camera() {
        let mut s = ViewSettings::default();
        s.camera_x = 42.0;
        s.add_polygon(vec![Vec2::zero()], ColorRgba::black(), 1.0, true, 1);
        s.add_point(Vec2::new(1.0, 1.0), ColorRgba::black(), 1);

        s.clear();

        assert!(s.polygons.is_empty());
        assert!(s.points.is_empty());
        assert_eq!(s.camera_x, 42.0);
    }

    #[test]
    fn zoom_is_product_of_factor_and_base() {
        let mut s = ViewSettings::default();
        s.zoom_factor = 2.0;
        s.base_zoom = 0.5;
        assert_eq!(s.zoom(), 1.0);
    }
}
