use crate::coords::{ColorRgba, Vec2};

/// Polygon primitive.
///
/// `filled` selects tessellated rendering (convex outline assumed); otherwise
/// only the outline is drawn. `z` is a layer index; higher layers draw nearer
/// to the viewer.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenePolygon {
    pub points: Vec<Vec2>,
    pub color: ColorRgba,
    pub alpha: f32,
    pub filled: bool,
    pub z: i32,
}

/// Polyline primitive.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneLine {
    pub points: Vec<Vec2>,
    pub color: ColorRgba,
    pub alpha: f32,
    pub z: i32,
}

/// Point marker primitive, drawn as a small world-space square.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScenePoint {
    pub position: Vec2,
    pub color: ColorRgba,
    pub z: i32,
}
