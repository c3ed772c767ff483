use std::ops::Range;

use crate::settings::{ScenePolygon, ViewSettings, POINT_WIDTH};

use super::{depth_to_z, layer_depth, BG_POLY_DEPTH};
use crate::render::vertex::VertexPositionColor;

/// Triangle-strip stream drawn as one strip per `ranges` entry.
///
/// Strips for distinct primitives cannot share a draw call (the connecting
/// triangles would bridge them), so the driver issues one draw per range
/// over the shared vertex buffer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RangedGeometry {
    pub vertices: Vec<VertexPositionColor>,
    pub ranges: Vec<Range<u32>>,
}

impl RangedGeometry {
    fn push_strip(&mut self, strip: impl IntoIterator<Item = VertexPositionColor>) {
        let start = self.vertices.len() as u32;
        self.vertices.extend(strip);
        let end = self.vertices.len() as u32;
        if end > start {
            self.ranges.push(start..end);
        }
    }
}

/// Filled-polygon strips: background polygons always, foreground polygons
/// only when filling is enabled and the polygon asks for it.
///
/// Polygons are assumed convex; each becomes one triangle strip in the
/// alternating rim order `p0, p1, p(n-1), p2, p(n-2), ...`. Counter-clockwise
/// input winding yields front faces after the projection's vertical flip.
pub fn polygon_fills(settings: &ViewSettings) -> RangedGeometry {
    let mut out = RangedGeometry::default();

    for poly in &settings.bg_polygons {
        push_polygon_strip(&mut out, poly, depth_to_z(BG_POLY_DEPTH));
    }
    if settings.draw_filled {
        for poly in settings.polygons.iter().filter(|p| p.filled) {
            push_polygon_strip(&mut out, poly, depth_to_z(layer_depth(poly.z)));
        }
    }

    out
}

fn push_polygon_strip(out: &mut RangedGeometry, poly: &ScenePolygon, z: f32) {
    let n = poly.points.len();
    if n < 3 {
        return;
    }
    let color = poly.color.with_alpha(poly.alpha);

    // Walk the rim from both ends toward the middle.
    out.push_strip((0..n).map(|i| {
        let rim = match i {
            0 => 0,
            i if i % 2 == 1 => i.div_ceil(2),
            i => n - i / 2,
        };
        let p = poly.points[rim];
        VertexPositionColor::new(p.x, p.y, z, color)
    }));
}

/// Foreground polygon rims as a flat line list, two vertices per edge.
/// Emitted for every foreground polygon, filled or not.
pub fn polygon_outlines(settings: &ViewSettings) -> Vec<VertexPositionColor> {
    let mut out = Vec::new();

    for poly in &settings.polygons {
        let n = poly.points.len();
        if n < 2 {
            continue;
        }
        let z = depth_to_z(layer_depth(poly.z));
        let color = poly.color.with_alpha(poly.alpha);

        for i in 0..n {
            let a = poly.points[i];
            let b = poly.points[(i + 1) % n];
            out.push(VertexPositionColor::new(a.x, a.y, z, color));
            out.push(VertexPositionColor::new(b.x, b.y, z, color));
        }
    }

    out
}

/// Polylines as a flat line list, two vertices per segment (open, not
/// closed back to the start).
pub fn line_segments(settings: &ViewSettings) -> Vec<VertexPositionColor> {
    let mut out = Vec::new();

    for line in &settings.lines {
        if line.points.len() < 2 {
            continue;
        }
        let z = depth_to_z(layer_depth(line.z));
        let color = line.color.with_alpha(line.alpha);

        for pair in line.points.windows(2) {
            out.push(VertexPositionColor::new(pair[0].x, pair[0].y, z, color));
            out.push(VertexPositionColor::new(pair[1].x, pair[1].y, z, color));
        }
    }

    out
}

/// Point markers as one small square strip per point, gated by the points
/// toggle. Strip order BL, BR, TL, TR keeps the winding consistent with the
/// polygon strips.
pub fn point_markers(settings: &ViewSettings) -> RangedGeometry {
    let mut out = RangedGeometry::default();
    if !settings.draw_points {
        return out;
    }

    let half = POINT_WIDTH / 2.0;
    for point in &settings.points {
        let (x, y) = (point.position.x, point.position.y);
        let z = depth_to_z(layer_depth(point.z));
        let c = point.color;

        out.push_strip([
            VertexPositionColor::new(x - half, y - half, z, c),
            VertexPositionColor::new(x + half, y - half, z, c),
            VertexPositionColor::new(x - half, y + half, z, c),
            VertexPositionColor::new(x + half, y + half, z, c),
        ]);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::{ColorRgba, Vec2};

    fn square() -> Vec<Vec2> {
        // Counter-clockwise in world coordinates (y up).
        vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(2.0, 0.0),
            Vec2::new(2.0, 2.0),
            Vec2::new(0.0, 2.0),
        ]
    }

    // ── fills ─────────────────────────────────────────────────────────────

    #[test]
    fn strip_order_alternates_around_the_rim() {
        let mut s = ViewSettings::default();
        s.add_polygon(square(), ColorRgba::black(), 1.0, true, 0);

        let g = polygon_fills(&s);
        assert_eq!(g.ranges, vec![0..4]);

        let xs: Vec<[f32; 2]> = g
            .vertices
            .iter()
            .map(|v| [v.position[0], v.position[1]])
            .collect();
        // p0, p1, p3, p2
        assert_eq!(xs, vec![[0.0, 0.0], [2.0, 0.0], [0.0, 2.0], [2.0, 2.0]]);
    }

    #[test]
    fn background_polygons_ignore_the_fill_toggle() {
        let mut s = ViewSettings::default();
        s.draw_filled = false;
        s.add_bg_polygon(square(), ColorRgba::white(), 1.0, 0);
        s.add_polygon(square(), ColorRgba::black(), 1.0, true, 0);

        let g = polygon_fills(&s);
        assert_eq!(g.ranges.len(), 1);
        // Background sits at the far plane end.
        assert_eq!(g.vertices[0].position[2], -0.99);
    }

    #[test]
    fn unfilled_polygons_never_produce_fill_strips() {
        let mut s = ViewSettings::default();
        s.add_polygon(square(), ColorRgba::black(), 1.0, false, 0);
        assert_eq!(polygon_fills(&s), RangedGeometry::default());
    }

    #[test]
    fn degenerate_polygons_are_skipped() {
        let mut s = ViewSettings::default();
        s.add_polygon(vec![Vec2::zero(), Vec2::new(1.0, 0.0)], ColorRgba::black(), 1.0, true, 0);
        assert!(polygon_fills(&s).vertices.is_empty());
    }

    #[test]
    fn layer_index_moves_polygons_nearer() {
        let mut s = ViewSettings::default();
        s.add_polygon(square(), ColorRgba::black(), 1.0, true, 0);
        s.add_polygon(square(), ColorRgba::black(), 1.0, true, 5);

        let g = polygon_fills(&s);
        let z0 = g.vertices[0].position[2];
        let z5 = g.vertices[4].position[2];
        // z stores the negated depth, so nearer layers have larger z.
        assert!(z5 > z0);
    }

    // ── outlines / lines ──────────────────────────────────────────────────

    #[test]
    fn outlines_close_the_rim() {
        let mut s = ViewSettings::default();
        s.add_polygon(square(), ColorRgba::black(), 1.0, false, 0);

        let out = polygon_outlines(&s);
        // 4 edges, 2 vertices each; last segment returns to the start.
        assert_eq!(out.len(), 8);
        assert_eq!(out[7].position[..2], out[0].position[..2]);
    }

    #[test]
    fn polylines_stay_open() {
        let mut s = ViewSettings::default();
        s.add_line(
            vec![Vec2::zero(), Vec2::new(1.0, 0.0), Vec2::new(1.0, 1.0)],
            ColorRgba::black(),
            0.5,
            0,
        );

        let out = line_segments(&s);
        // 2 segments from 3 points.
        assert_eq!(out.len(), 4);
        assert_ne!(out[3].position[..2], out[0].position[..2]);
        assert_eq!(out[0].color[3], 0.5);
    }

    // ── points ────────────────────────────────────────────────────────────

    #[test]
    fn points_toggle_gates_markers() {
        let mut s = ViewSettings::default();
        s.add_point(Vec2::new(3.0, 4.0), ColorRgba::black(), 0);

        let g = point_markers(&s);
        assert_eq!(g.ranges, vec![0..4]);
        assert_eq!(g.vertices[0].position[..2], [2.75, 3.75]);
        assert_eq!(g.vertices[3].position[..2], [3.25, 4.25]);

        s.draw_points = false;
        assert_eq!(point_markers(&s), RangedGeometry::default());
    }
}
