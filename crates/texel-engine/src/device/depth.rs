use winit::dpi::PhysicalSize;

/// Depth attachment sized to the surface.
///
/// Recreated whenever the surface is resized; a zero-sized request is clamped to 1x1.
pub struct DepthTarget {
    format: wgpu::TextureFormat,
    size: PhysicalSize<u32>,
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
}

impl DepthTarget {
    pub fn new(device: &wgpu::Device, format: wgpu::TextureFormat, size: PhysicalSize<u32>) -> Self {
        let size = PhysicalSize::new(size.width.max(1), size.height.max(1));

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("texel depth target"),
            size: wgpu::Extent3d {
                width: size.width,
                height: size.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        log::debug!("depth target {}x{} ({format:?})", size.width, size.height);

        Self {
            format,
            size,
            _texture: texture,
            view,
        }
    }

    /// Recreates the attachment if `size` differs from the current one.
    pub fn resize(&mut self, device: &wgpu::Device, size: PhysicalSize<u32>) {
        if size.width == 0 || size.height == 0 || size == self.size {
            return;
        }
        *self = Self::new(device, self.format, size);
    }

    pub fn format(&self) -> wgpu::TextureFormat {
        self.format
    }

    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }
}
