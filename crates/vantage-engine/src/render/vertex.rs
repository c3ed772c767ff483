use bytemuck::{Pod, Zeroable};

use crate::coords::ColorRgba;

/// Interleaved vertex consumed by every viewport pipeline: world position
/// (z carries the depth layer) plus linear RGBA.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct VertexPositionColor {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

impl VertexPositionColor {
    pub const SIZE: u64 = std::mem::size_of::<Self>() as u64;

    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x3, // position
        1 => Float32x4  // color
    ];

    #[inline]
    pub fn new(x: f32, y: f32, z: f32, color: ColorRgba) -> Self {
        Self {
            position: [x, y, z],
            color: color.to_array(),
        }
    }

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: Self::SIZE,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stride_is_seven_floats() {
        assert_eq!(VertexPositionColor::SIZE, 28);
        assert_eq!(VertexPositionColor::layout().array_stride, 28);
    }
}
