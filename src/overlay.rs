//! Batched 2D drawing of coloured shapes in pixel coordinates.
//!
//! Shapes are tessellated on the CPU into one vertex list and drawn with a
//! single pipeline at the end of the frame.

use crate::gpu::GpuContext;
use crate::ui::{Color, Rect};
use glam::Vec2;

const SHADER: &str = r#"
struct Uniforms {
    resolution: vec2<f32>,
    _padding: vec2<f32>,
};

@group(0) @binding(0) var<uniform> uniforms: Uniforms;

struct VertexOutput {
    @builtin(position) position: vec4<f32>,
    @location(0) color: vec4<f32>,
};

@vertex
fn vs(@location(0) position: vec2<f32>, @location(1) color: vec4<f32>) -> VertexOutput {
    let ndc = position / uniforms.resolution * 2.0 - 1.0;
    var out: VertexOutput;
    out.position = vec4<f32>(ndc.x, -ndc.y, 0.0, 1.0);
    out.color = color;
    return out;
}

@fragment
fn fs(in: VertexOutput) -> @location(0) vec4<f32> {
    return in.color;
}
"#;

/// Vertex of a coloured overlay shape, in pixels.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct OverlayVertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl OverlayVertex {
    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<OverlayVertex>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[
            wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x2,
            },
            wgpu::VertexAttribute {
                offset: 8,
                shader_location: 1,
                format: wgpu::VertexFormat::Float32x4,
            },
        ],
    };
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct OverlayUniforms {
    resolution: [f32; 2],
    _padding: [f32; 2],
}

const MAX_VERTICES: usize = 16384;
const DISC_SEGMENTS: usize = 48;

/// CPU-side vertex list. Kept apart from the GPU objects so shapes can be
/// built and inspected without a device.
#[derive(Debug, Default)]
pub struct ShapeBatch {
    vertices: Vec<OverlayVertex>,
}

impl ShapeBatch {
    /// Drop every queued shape.
    pub fn clear(&mut self) {
        self.vertices.clear();
    }

    /// Queued vertices, three per triangle.
    pub fn vertices(&self) -> &[OverlayVertex] {
        &self.vertices
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Queue a filled rectangle.
    pub fn rect(&mut self, rect: Rect, color: Color) {
        let c = color.to_array();
        let (x, y, w, h) = (rect.x, rect.y, rect.width, rect.height);
        for position in [
            [x, y],
            [x + w, y],
            [x, y + h],
            [x + w, y],
            [x + w, y + h],
            [x, y + h],
        ] {
            self.vertices.push(OverlayVertex { position, color: c });
        }
    }

    /// Queue a filled circle. Non-positive radii draw nothing.
    pub fn disc(&mut self, center: Vec2, radius: f32, color: Color) {
        if radius <= 0.0 {
            return;
        }
        let c = color.to_array();
        let step = std::f32::consts::TAU / DISC_SEGMENTS as f32;
        for i in 0..DISC_SEGMENTS {
            let a0 = step * i as f32;
            let a1 = step * (i + 1) as f32;
            let p0 = center + Vec2::new(a0.cos(), a0.sin()) * radius;
            let p1 = center + Vec2::new(a1.cos(), a1.sin()) * radius;
            for p in [center, p0, p1] {
                self.vertices.push(OverlayVertex {
                    position: p.to_array(),
                    color: c,
                });
            }
        }
    }

    /// An indeterminate progress bar along the bottom edge of the viewport.
    ///
    /// `phase` is any time value; the highlighted segment sweeps once per unit.
    pub fn loading_bar(&mut self, viewport: Vec2, phase: f32) {
        let height = (viewport.y * 0.008).max(3.0);
        let track = Rect::new(0.0, viewport.y - height, viewport.x, height);
        self.rect(track, Color::WHITE.scaled(0.15));

        let width = viewport.x * 0.25;
        let sweep = phase.rem_euclid(1.0) * (viewport.x + width) - width;
        let left = sweep.max(0.0);
        let right = (sweep + width).min(viewport.x);
        if right > left {
            self.rect(
                Rect::new(left, track.y, right - left, height),
                Color::WHITE.scaled(0.8),
            );
        }
    }
}

/// GPU side of the overlay: pipeline, buffers and the current batch.
pub struct Overlay {
    pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    batch: ShapeBatch,
}

impl Overlay {
    /// Build the pipeline and buffers for `gpu`'s surface format.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # fn demo(gpu: &stagehand::GpuContext, pass: &mut wgpu::RenderPass) {
    /// use stagehand::{Color, Overlay, Rect};
    ///
    /// let mut overlay = Overlay::new(gpu);
    /// overlay.clear();
    /// overlay.batch().rect(Rect::new(10.0, 10.0, 200.0, 40.0), Color::BUTTON_BG);
    /// overlay.render(gpu, pass);
    /// # }
    /// ```
    pub fn new(gpu: &GpuContext) -> Self {
        let device = &gpu.device;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Overlay Shader"),
            source: wgpu::ShaderSource::Wgsl(SHADER.into()),
        });

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Overlay Uniforms"),
            size: std::mem::size_of::<OverlayUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Overlay Uniform Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Overlay Uniform Bind Group"),
            layout: &uniform_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Overlay Pipeline Layout"),
            bind_group_layouts: &[&uniform_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Overlay Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs"),
                buffers: &[OverlayVertex::LAYOUT],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: gpu.config.format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let vertex_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Overlay Vertex Buffer"),
            size: (MAX_VERTICES * std::mem::size_of::<OverlayVertex>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Self {
            pipeline,
            vertex_buffer,
            uniform_buffer,
            uniform_bind_group,
            batch: ShapeBatch::default(),
        }
    }

    /// Start a new frame.
    pub fn clear(&mut self) {
        self.batch.clear();
    }

    /// The shapes drawn by the next [`Overlay::render`].
    pub fn batch(&mut self) -> &mut ShapeBatch {
        &mut self.batch
    }

    /// Draw the batched shapes into `pass`.
    pub fn render(&self, gpu: &GpuContext, pass: &mut wgpu::RenderPass) {
        if self.batch.is_empty() {
            return;
        }

        let uniforms = OverlayUniforms {
            resolution: [gpu.width() as f32, gpu.height() as f32],
            _padding: [0.0, 0.0],
        };
        gpu.queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[uniforms]));

        let vertices = self.batch.vertices();
        let count = vertices.len().min(MAX_VERTICES);
        if count < vertices.len() {
            log::warn!(
                "overlay batch truncated: {} of {} vertices drawn",
                count,
                vertices.len()
            );
        }
        gpu.queue.write_buffer(
            &self.vertex_buffer,
            0,
            bytemuck::cast_slice(&vertices[..count]),
        );

        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.uniform_bind_group, &[]);
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.draw(0..count as u32, 0..1);
    }
}
