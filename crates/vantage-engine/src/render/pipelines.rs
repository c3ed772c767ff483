use anyhow::Result;
use glam::Mat4;

use crate::camera::ClipCorrection;
use crate::coords::Viewport;

use super::shaders::{self, ShaderStage};
use super::vertex::VertexPositionColor;

pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

const MAT4_SIZE: u64 = std::mem::size_of::<[f32; 16]>() as u64;

/// Everything created once at setup: uniforms, the two pipelines, the depth
/// target, and the clip-space correction picked for the adapter's backend.
pub struct RenderResources {
    pub uniforms: UniformSet,
    pub pipelines: PipelineSet,
    pub depth: DepthTarget,
    pub correction: ClipCorrection,
}

/// View and model matrix uniforms, one bind group each.
///
/// Group 0 carries the view (projection) matrix, group 1 the model matrix;
/// both pipelines bind both groups.
pub struct UniformSet {
    view_ubo: wgpu::Buffer,
    model_ubo: wgpu::Buffer,
    view_bgl: wgpu::BindGroupLayout,
    model_bgl: wgpu::BindGroupLayout,
    pub view_bind_group: wgpu::BindGroup,
    pub model_bind_group: wgpu::BindGroup,
}

/// The two viewport pipelines over the shared vertex format: triangle strips
/// for filled geometry, line lists for everything stroked.
pub struct PipelineSet {
    pub filled: wgpu::RenderPipeline,
    pub line: wgpu::RenderPipeline,
}

/// Owned depth buffer matching the surface size; recreated on resize.
pub struct DepthTarget {
    pub view: wgpu::TextureView,
    size: (u32, u32),
}

pub fn create_resources(
    device: &wgpu::Device,
    surface_format: wgpu::TextureFormat,
    backend: wgpu::Backend,
    viewport: Viewport,
) -> Result<RenderResources> {
    // Shader lookup failure is fatal; nothing can draw without the pair.
    let vertex = shaders::create_module(device, ShaderStage::Vertex)?;
    let fragment = shaders::create_module(device, ShaderStage::Fragment)?;

    let uniforms = UniformSet::new(device);
    let pipelines = PipelineSet::new(device, surface_format, &uniforms, &vertex, &fragment);
    let depth = DepthTarget::new(device, viewport);
    let correction = ClipCorrection::for_backend(backend);

    log::debug!(
        "viewport render resources ready (format {surface_format:?}, backend {backend:?}, \
         correction {correction:?})"
    );

    Ok(RenderResources {
        uniforms,
        pipelines,
        depth,
        correction,
    })
}

impl UniformSet {
    fn new(device: &wgpu::Device) -> Self {
        let view_ubo = matrix_ubo(device, "vantage view ubo");
        let model_ubo = matrix_ubo(device, "vantage model ubo");

        let view_bgl = matrix_bgl(device, "vantage view bgl");
        let model_bgl = matrix_bgl(device, "vantage model bgl");

        let view_bind_group = matrix_bind_group(device, "vantage view bind group", &view_bgl, &view_ubo);
        let model_bind_group =
            matrix_bind_group(device, "vantage model bind group", &model_bgl, &model_ubo);

        Self {
            view_ubo,
            model_ubo,
            view_bgl,
            model_bgl,
            view_bind_group,
            model_bind_group,
        }
    }

    pub fn write_view(&self, queue: &wgpu::Queue, matrix: Mat4) {
        queue.write_buffer(&self.view_ubo, 0, bytemuck::cast_slice(&matrix.to_cols_array()));
    }

    pub fn write_model(&self, queue: &wgpu::Queue, matrix: Mat4) {
        queue.write_buffer(&self.model_ubo, 0, bytemuck::cast_slice(&matrix.to_cols_array()));
    }
}

fn matrix_ubo(device: &wgpu::Device, label: &str) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size: MAT4_SIZE,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn matrix_bgl(device: &wgpu::Device, label: &str) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: Some(std::num::NonZeroU64::new(MAT4_SIZE).unwrap()),
            },
            count: None,
        }],
    })
}

fn matrix_bind_group(
    device: &wgpu::Device,
    label: &str,
    layout: &wgpu::BindGroupLayout,
    ubo: &wgpu::Buffer,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(label),
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: ubo.as_entire_binding(),
        }],
    })
}

impl PipelineSet {
    fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        uniforms: &UniformSet,
        vertex: &wgpu::ShaderModule,
        fragment: &wgpu::ShaderModule,
    ) -> Self {
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("vantage viewport pipeline layout"),
            bind_group_layouts: &[&uniforms.view_bgl, &uniforms.model_bgl],
            // Newer wgpu uses immediate constants; keep disabled for now.
            immediate_size: 0,
        });

        let filled = viewport_pipeline(
            device,
            "vantage filled pipeline",
            &layout,
            surface_format,
            vertex,
            fragment,
            wgpu::PrimitiveTopology::TriangleStrip,
        );
        let line = viewport_pipeline(
            device,
            "vantage line pipeline",
            &layout,
            surface_format,
            vertex,
            fragment,
            wgpu::PrimitiveTopology::LineList,
        );

        Self { filled, line }
    }
}

fn viewport_pipeline(
    device: &wgpu::Device,
    label: &str,
    layout: &wgpu::PipelineLayout,
    surface_format: wgpu::TextureFormat,
    vertex: &wgpu::ShaderModule,
    fragment: &wgpu::ShaderModule,
    topology: wgpu::PrimitiveTopology,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),

        vertex: wgpu::VertexState {
            module: vertex,
            entry_point: Some(ShaderStage::Vertex.entry_point()),
            compilation_options: Default::default(),
            buffers: &[VertexPositionColor::layout()],
        },

        fragment: Some(wgpu::FragmentState {
            module: fragment,
            entry_point: Some(ShaderStage::Fragment.entry_point()),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format: surface_format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),

        primitive: wgpu::PrimitiveState {
            topology,
            strip_index_format: None,
            // Clockwise front faces in clip space; world-space winding is
            // counter-clockwise and the projection's vertical flip inverts it.
            front_face: wgpu::FrontFace::Cw,
            cull_mode: Some(wgpu::Face::Back),
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },

        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::LessEqual,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),

        // Newer wgpu field names:
        multiview_mask: None,
        cache: None,
    })
}

impl DepthTarget {
    fn new(device: &wgpu::Device, viewport: Viewport) -> Self {
        let size = clamped_size(viewport);
        Self {
            view: create_depth_view(device, size),
            size,
        }
    }

    /// Recreates the depth texture when the surface size changed.
    pub fn resize(&mut self, device: &wgpu::Device, viewport: Viewport) {
        let size = clamped_size(viewport);
        if size != self.size {
            self.view = create_depth_view(device, size);
            self.size = size;
        }
    }
}

fn clamped_size(viewport: Viewport) -> (u32, u32) {
    (
        (viewport.width as u32).max(1),
        (viewport.height as u32).max(1),
    )
}

fn create_depth_view(device: &wgpu::Device, (width, height): (u32, u32)) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("vantage depth texture"),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}
