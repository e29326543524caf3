/// How `Gpu::new` sets up the device, surface and optional depth target.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Pick an `*Srgb` swapchain format if the surface offers one, so linear
    /// shader output is gamma encoded on store.
    pub prefer_srgb: bool,

    /// `Fifo` is vsync and always supported.
    pub present_mode: wgpu::PresentMode,

    /// Window compositing mode. Falls back to the first supported mode when
    /// unset or unavailable.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,

    pub required_features: wgpu::Features,

    pub required_limits: wgpu::Limits,

    /// Frames the presentation engine may queue. Backends treat it as a hint.
    pub desired_maximum_frame_latency: u32,

    /// Depth buffer format. `None` renders without a depth attachment.
    pub depth_format: Option<wgpu::TextureFormat>,
}

impl GpuInit {
    /// Default parameters plus a `Depth32Float` depth target.
    pub fn with_depth() -> Self {
        Self {
            depth_format: Some(wgpu::TextureFormat::Depth32Float),
            ..Self::default()
        }
    }
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            prefer_srgb: true,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: None,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            desired_maximum_frame_latency: 2,
            depth_format: None,
        }
    }
}
