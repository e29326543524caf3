use std::marker::PhantomData;

use bytemuck::Pod;
use wgpu::util::DeviceExt;

use super::{RenderCtx, Texture};

/// Uniform buffer holding exactly one `T`.
pub struct UniformBuffer<T: Pod> {
    buffer: wgpu::Buffer,
    _marker: PhantomData<T>,
}

impl<T: Pod> UniformBuffer<T> {
    pub fn new(ctx: &RenderCtx<'_>, label: &str, initial: &T) -> Self {
        let buffer = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::bytes_of(initial),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        Self {
            buffer,
            _marker: PhantomData,
        }
    }

    /// Queues a write; it lands before the next submitted command buffer.
    pub fn write(&self, queue: &wgpu::Queue, value: &T) {
        queue.write_buffer(&self.buffer, 0, bytemuck::bytes_of(value));
    }

    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }
}

/// Per-draw shader inputs: a uniform block and a sampled texture.
///
/// Bound at group 0 following [`material_bind_group_layout`].
pub struct Material<T: Pod> {
    uniforms: UniformBuffer<T>,
    _texture: Texture,
    bind_group: wgpu::BindGroup,
}

impl<T: Pod> Material<T> {
    pub fn new(
        ctx: &RenderCtx<'_>,
        label: &str,
        layout: &wgpu::BindGroupLayout,
        initial: &T,
        texture: Texture,
    ) -> Self {
        let uniforms = UniformBuffer::new(ctx, label, initial);

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniforms.buffer().as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(texture.view()),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(texture.sampler()),
                },
            ],
        });

        Self {
            uniforms,
            _texture: texture,
            bind_group,
        }
    }

    pub fn write(&self, queue: &wgpu::Queue, value: &T) {
        self.uniforms.write(queue, value);
    }

    pub fn bind(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_bind_group(0, &self.bind_group, &[]);
    }
}

/// Group 0 layout shared by every program and material:
/// - binding 0: uniform block (vertex + fragment)
/// - binding 1: `texture_2d<f32>`
/// - binding 2: filtering sampler
pub fn material_bind_group_layout(device: &wgpu::Device, label: &str) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    view_dimension: wgpu::TextureViewDimension::D2,
                    multisampled: false,
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 2,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
        ],
    })
}
