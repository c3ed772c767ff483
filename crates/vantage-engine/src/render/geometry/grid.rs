use crate::camera::CameraView;
use crate::coords::ColorRgba;
use crate::settings::ViewSettings;

use super::{depth_to_z, IndexedGeometry, GRID_DEPTH};
use crate::render::vertex::VertexPositionColor;

// Screen-pixel band the adaptive spacing keeps one grid unit inside.
const MAX_UNIT_PX: i32 = 12;
const MIN_UNIT_PX: i32 = 4;

// Spacing rescale iteration cap; only degenerate inputs ever reach it.
const MAX_RESCALE_STEPS: u32 = 64;

/// Grid spacing after the dynamic power-of-ten adjustment.
///
/// While one spacing unit measures more than 12 screen pixels, divide by 10;
/// while it measures fewer than 4, multiply by 10. The rescaling is
/// exponential, so the visible spacing jumps by decades as the zoom crosses
/// a threshold. Note the pixel measure goes through `world_to_screen_extent`
/// with its integer truncation.
pub fn adaptive_spacing(view: &CameraView, settings: &ViewSettings) -> f32 {
    let mut spacing = settings.grid_spacing;
    if !settings.grid_dynamic {
        return spacing;
    }

    for _ in 0..MAX_RESCALE_STEPS {
        if view.world_to_screen_extent(spacing, 0.0).0 > MAX_UNIT_PX {
            spacing /= 10.0;
        } else {
            break;
        }
    }
    for _ in 0..MAX_RESCALE_STEPS {
        if view.world_to_screen_extent(spacing, 0.0).0 < MIN_UNIT_PX {
            spacing *= 10.0;
        } else {
            break;
        }
    }

    spacing
}

/// Generates the coordinate grid as an indexed line list.
///
/// Empty when the grid is disabled, when the adjusted spacing still measures
/// under 4 px (possible with the dynamic flag off), or when the spacing is
/// degenerate. Lines step outward along each half-axis from the world origin
/// to the visible extent; every line spans the full perpendicular extent.
/// The line counter `k` runs 0..=10 per half-axis: counts 0..=9 take the
/// minor color, 10 takes the major color and resets.
pub fn generate_grid(view: &CameraView, settings: &ViewSettings) -> IndexedGeometry {
    if !settings.draw_grid {
        return IndexedGeometry::default();
    }

    let spacing = adaptive_spacing(view, settings);
    if !spacing.is_finite() || spacing <= 0.0 {
        return IndexedGeometry::default();
    }
    if view.world_to_screen_extent(spacing, 0.0).0 < MIN_UNIT_PX {
        return IndexedGeometry::default();
    }

    let zoom = view.zoom();
    let x = view.camera_x;
    let y = view.camera_y;
    let w = view.viewport.width;
    let h = view.viewport.height;
    let z = depth_to_z(GRID_DEPTH);

    let minor = settings.minor_grid_color;
    let major = settings.major_grid_color;

    let mut vertices: Vec<VertexPositionColor> = Vec::new();

    // Vertical lines, -X half-axis.
    let mut k = 0u32;
    let mut i = 0.0f32;
    while i > -(w * zoom) + x {
        let color = step_color(&mut k, minor, major);
        vertices.push(VertexPositionColor::new(i, y + zoom * h, z, color));
        vertices.push(VertexPositionColor::new(i, y - zoom * h, z, color));
        i -= spacing;
    }

    // Vertical lines, +X half-axis.
    let mut k = 0u32;
    let mut i = 0.0f32;
    while i < w * zoom + x {
        let color = step_color(&mut k, minor, major);
        vertices.push(VertexPositionColor::new(i, y + zoom * h, z, color));
        vertices.push(VertexPositionColor::new(i, y - zoom * h, z, color));
        i += spacing;
    }

    // Horizontal lines, -Y half-axis.
    let mut k = 0u32;
    let mut i = 0.0f32;
    while i > -(h * zoom) + y {
        let color = step_color(&mut k, minor, major);
        vertices.push(VertexPositionColor::new(x + zoom * w, i, z, color));
        vertices.push(VertexPositionColor::new(x - zoom * w, i, z, color));
        i -= spacing;
    }

    // Horizontal lines, +Y half-axis.
    let mut k = 0u32;
    let mut i = 0.0f32;
    while i < h * zoom + y {
        let color = step_color(&mut k, minor, major);
        vertices.push(VertexPositionColor::new(x + zoom * w, i, z, color));
        vertices.push(VertexPositionColor::new(x - zoom * w, i, z, color));
        i += spacing;
    }

    // Trivial monotone index list; no vertex reuse.
    let indices = (0..vertices.len() as u32).collect();

    IndexedGeometry { vertices, indices }
}

fn step_color(k: &mut u32, minor: ColorRgba, major: ColorRgba) -> ColorRgba {
    let c = if *k == 10 {
        *k = 0;
        major
    } else {
        minor
    };
    *k += 1;
    ColorRgba::new(c.r, c.g, c.b, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Viewport;

    fn view(camera_x: f32, camera_y: f32, zoom_factor: f32, w: f32, h: f32) -> CameraView {
        CameraView {
            camera_x,
            camera_y,
            zoom_factor,
            base_zoom: 1.0,
            viewport: Viewport::new(w, h),
        }
    }

    fn settings(spacing: f32) -> ViewSettings {
        ViewSettings {
            grid_spacing: spacing,
            ..ViewSettings::default()
        }
    }

    // ── adaptive spacing ──────────────────────────────────────────────────

    #[test]
    fn spacing_inside_band_is_unchanged() {
        let v = view(0.0, 0.0, 1.0, 100.0, 100.0);
        assert_eq!(adaptive_spacing(&v, &settings(10.0)), 10.0);
        assert_eq!(adaptive_spacing(&v, &settings(5.0)), 5.0);
    }

    #[test]
    fn decade_spacings_land_in_the_pixel_band() {
        // The pixel measure goes through the asymmetric world_to_screen, so
        // it depends on the spacing value alone, not the zoom.
        let v = view(0.0, 0.0, 1.0, 100.0, 100.0);
        for spacing in [0.005f32, 0.05, 0.5, 5.0, 50.0, 500.0, 5000.0] {
            let adjusted = adaptive_spacing(&v, &settings(spacing));
            let px = v.world_to_screen_extent(adjusted, 0.0).0;
            assert!((4..=12).contains(&px), "spacing {spacing} -> {px} px");
        }
    }

    #[test]
    fn static_spacing_is_never_adjusted() {
        let v = view(0.0, 0.0, 1.0, 100.0, 100.0);
        let mut s = settings(1000.0);
        s.grid_dynamic = false;
        assert_eq!(adaptive_spacing(&v, &s), 1000.0);
    }

    // ── generation ────────────────────────────────────────────────────────

    #[test]
    fn disabled_grid_produces_empty_stream() {
        let v = view(0.0, 0.0, 1.0, 100.0, 100.0);
        let mut s = settings(10.0);
        s.draw_grid = false;
        assert_eq!(generate_grid(&v, &s), IndexedGeometry::default());
    }

    #[test]
    fn sub_band_static_spacing_produces_empty_stream() {
        let v = view(0.0, 0.0, 1.0, 100.0, 100.0);
        let mut s = settings(2.0);
        s.grid_dynamic = false;
        assert!(generate_grid(&v, &s).vertices.is_empty());
    }

    #[test]
    fn degenerate_spacing_produces_empty_stream() {
        let v = view(0.0, 0.0, 1.0, 100.0, 100.0);
        let mut s = settings(0.0);
        s.grid_dynamic = false;
        assert!(generate_grid(&v, &s).vertices.is_empty());
    }

    #[test]
    fn line_count_and_indices_for_square_window() {
        // spacing 10, zoom 1, camera at origin, 100x100 surface:
        // each half-axis emits floor(extent / spacing) lines starting at the
        // origin line, extent being the full surface dimension times zoom.
        let v = view(0.0, 0.0, 1.0, 100.0, 100.0);
        let g = generate_grid(&v, &settings(10.0));

        // 10 lines per half-axis, 4 half-axes, 2 vertices per line.
        assert_eq!(g.vertices.len(), 80);
        assert_eq!(g.indices.len(), 80);
        assert!(g.indices.iter().enumerate().all(|(i, &ix)| ix == i as u32));

        // Vertical lines sit at multiples of the spacing.
        for pair in g.vertices[..20].chunks(2) {
            assert_eq!(pair[0].position[0], pair[1].position[0]);
            assert_eq!(pair[0].position[0] % 10.0, 0.0);
        }
    }

    #[test]
    fn tiny_window_emits_exactly_the_origin_line() {
        let v = view(0.0, 0.0, 1.0, 5.0, 5.0);
        let g = generate_grid(&v, &settings(10.0));
        // One line per half-axis, all through the origin.
        assert_eq!(g.vertices.len(), 8);
    }

    #[test]
    fn every_tenth_line_after_the_first_run_is_major() {
        let v = view(0.0, 0.0, 1.0, 300.0, 300.0);
        let s = settings(10.0);
        let g = generate_grid(&v, &s);

        // First half-axis emits 30 lines; the counter yields minor for
        // counts 0..=9 and major at count 10.
        let line_color = |line: usize| g.vertices[line * 2].color;
        for line in 0..10 {
            assert_eq!(line_color(line)[..3], s.minor_grid_color.to_array()[..3]);
        }
        assert_eq!(line_color(10)[..3], s.major_grid_color.to_array()[..3]);
        assert_eq!(line_color(11)[..3], s.minor_grid_color.to_array()[..3]);
    }

    #[test]
    fn lines_span_the_full_perpendicular_extent() {
        let v = view(0.0, 0.0, 2.0, 100.0, 100.0);
        let g = generate_grid(&v, &settings(10.0));
        // Vertical line endpoints at y ± zoom * height.
        assert_eq!(g.vertices[0].position[1], 200.0);
        assert_eq!(g.vertices[1].position[1], -200.0);
    }
}
