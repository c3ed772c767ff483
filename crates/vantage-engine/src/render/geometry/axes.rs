use crate::camera::CameraView;
use crate::settings::ViewSettings;

use super::{depth_to_z, IndexedGeometry, AXIS_DEPTH};
use crate::render::vertex::VertexPositionColor;

/// Generates the X/Y axis cross as an indexed line list.
///
/// Two lines through the world origin, each extended one full zoomed
/// viewport dimension past the camera position on both sides so they never
/// end on-screen. Empty when the axes are disabled.
pub fn generate_axes(view: &CameraView, settings: &ViewSettings) -> IndexedGeometry {
    if !settings.draw_axes {
        return IndexedGeometry::default();
    }

    let zoom = view.zoom();
    let x = view.camera_x;
    let y = view.camera_y;
    let w = view.viewport.width;
    let h = view.viewport.height;
    let z = depth_to_z(AXIS_DEPTH);
    let color = settings.axis_color.with_alpha(1.0);

    let vertices = vec![
        VertexPositionColor::new(0.0, y + h * zoom, z, color),
        VertexPositionColor::new(0.0, y - h * zoom, z, color),
        VertexPositionColor::new(x + w * zoom, 0.0, z, color),
        VertexPositionColor::new(x - w * zoom, 0.0, z, color),
    ];

    IndexedGeometry {
        vertices,
        indices: vec![0, 1, 2, 3],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Viewport;

    fn view() -> CameraView {
        CameraView {
            camera_x: 30.0,
            camera_y: -10.0,
            zoom_factor: 2.0,
            base_zoom: 1.0,
            viewport: Viewport::new(100.0, 50.0),
        }
    }

    #[test]
    fn disabled_axes_produce_empty_stream() {
        let mut s = ViewSettings::default();
        s.draw_axes = false;
        assert_eq!(generate_axes(&view(), &s), IndexedGeometry::default());
    }

    #[test]
    fn axes_pass_through_the_origin_and_overshoot_the_viewport() {
        let g = generate_axes(&view(), &ViewSettings::default());

        assert_eq!(g.indices, vec![0, 1, 2, 3]);

        // Vertical axis at x = 0, spanning camera_y ± height * zoom.
        assert_eq!(g.vertices[0].position[..2], [0.0, 90.0]);
        assert_eq!(g.vertices[1].position[..2], [0.0, -110.0]);
        // Horizontal axis at y = 0, spanning camera_x ± width * zoom.
        assert_eq!(g.vertices[2].position[..2], [230.0, 0.0]);
        assert_eq!(g.vertices[3].position[..2], [-170.0, 0.0]);
    }
}
