use std::path::Path;

use anyhow::{Context, Result};
use image::imageops::{self, FilterType};
use image::RgbaImage;

use super::RenderCtx;

/// Decoded RGBA8 image, ready for upload.
#[derive(Debug, Clone)]
pub struct TextureImage {
    pixels: RgbaImage,
}

impl TextureImage {
    /// Decodes an image file (format picked from its contents/extension) into RGBA8.
    ///
    /// Rows are kept in file order: the first row maps to `v = 0`.
    pub fn decode(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let img = image::open(path)
            .with_context(|| format!("failed to load texture {}", path.display()))?;

        let pixels = img.to_rgba8();
        log::debug!(
            "decoded {} ({}x{}, {:?})",
            path.display(),
            pixels.width(),
            pixels.height(),
            img.color()
        );

        Ok(Self { pixels })
    }

    pub fn from_rgba(pixels: RgbaImage) -> Self {
        Self { pixels }
    }

    /// 1x1 image of a single color.
    pub fn solid(rgba: [u8; 4]) -> Self {
        Self::from_rgba(RgbaImage::from_pixel(1, 1, image::Rgba(rgba)))
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Errors when either side exceeds `max_dimension` (the device's
    /// `max_texture_dimension_2d`).
    pub fn check_fits(&self, max_dimension: u32) -> Result<()> {
        let (w, h) = (self.width(), self.height());
        anyhow::ensure!(
            w <= max_dimension && h <= max_dimension,
            "image is {w}x{h}, larger than the device limit of {max_dimension}"
        );
        Ok(())
    }
}

/// Number of levels in a full mip chain: `floor(log2(max(w, h))) + 1`.
pub fn mip_level_count(width: u32, height: u32) -> u32 {
    u32::BITS - width.max(height).max(1).leading_zeros()
}

/// Builds every mip level, level 0 first.
///
/// Each level halves both dimensions (never below 1) with a triangle filter,
/// ending at 1x1.
pub fn build_mip_chain(base: &RgbaImage) -> Vec<RgbaImage> {
    let count = mip_level_count(base.width(), base.height()) as usize;
    let mut levels = Vec::with_capacity(count);
    levels.push(base.clone());

    while levels.len() < count {
        let Some(prev) = levels.last() else { break };
        let w = (prev.width() / 2).max(1);
        let h = (prev.height() / 2).max(1);
        let next = imageops::resize(prev, w, h, FilterType::Triangle);
        levels.push(next);
    }

    levels
}

/// Sampled 2D texture with a full mip chain and its sampler.
///
/// Format is `Rgba8UnormSrgb`: texel values are decoded to linear when sampled.
pub struct Texture {
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
    sampler: wgpu::Sampler,
}

impl Texture {
    pub const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

    /// Decodes `path` and uploads it.
    pub fn from_path(ctx: &RenderCtx<'_>, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let image = TextureImage::decode(path)?;
        image
            .check_fits(ctx.device.limits().max_texture_dimension_2d)
            .with_context(|| format!("failed to load texture {}", path.display()))?;
        let label = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "texture".to_string());
        Ok(Self::upload(ctx, &label, &image))
    }

    /// Opaque magenta 1x1 texture used where an image failed to load.
    pub fn placeholder(ctx: &RenderCtx<'_>, label: &str) -> Self {
        Self::upload(ctx, label, &TextureImage::solid([255, 0, 255, 255]))
    }

    /// Creates the texture, writes every mip level and creates the sampler.
    pub fn upload(ctx: &RenderCtx<'_>, label: &str, image: &TextureImage) -> Self {
        let levels = build_mip_chain(image.pixels());
        let (width, height) = (image.width(), image.height());
        let mip_levels = levels.len() as u32;

        let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: mip_levels,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        for (level, pixels) in levels.iter().enumerate() {
            ctx.queue.write_texture(
                wgpu::TexelCopyTextureInfo {
                    texture: &texture,
                    mip_level: level as u32,
                    origin: wgpu::Origin3d::ZERO,
                    aspect: wgpu::TextureAspect::All,
                },
                pixels.as_raw(),
                wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(4 * pixels.width()),
                    rows_per_image: Some(pixels.height()),
                },
                wgpu::Extent3d {
                    width: pixels.width(),
                    height: pixels.height(),
                    depth_or_array_layers: 1,
                },
            );
        }

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = ctx.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(label),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Linear,
            ..Default::default()
        });

        log::debug!("texture {label:?}: {width}x{height}, {mip_levels} mip levels");

        Self {
            _texture: texture,
            view,
            sampler,
        }
    }

    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    pub fn sampler(&self) -> &wgpu::Sampler {
        &self.sampler
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("texel-{}-{name}", std::process::id()))
    }

    // ── mip math ─────────────────────────────────────────────────────────

    #[test]
    fn mip_count_single_texel() {
        assert_eq!(mip_level_count(1, 1), 1);
    }

    #[test]
    fn mip_count_uses_largest_side() {
        assert_eq!(mip_level_count(2, 2), 2);
        assert_eq!(mip_level_count(1024, 1), 11);
        assert_eq!(mip_level_count(800, 600), 10);
    }

    #[test]
    fn mip_count_zero_sized_is_one() {
        assert_eq!(mip_level_count(0, 0), 1);
    }

    // ── mip chain ────────────────────────────────────────────────────────

    #[test]
    fn chain_halves_down_to_one() {
        let base = RgbaImage::from_pixel(8, 4, image::Rgba([10, 20, 30, 255]));
        let sizes: Vec<_> = build_mip_chain(&base)
            .iter()
            .map(|l| (l.width(), l.height()))
            .collect();
        assert_eq!(sizes, vec![(8, 4), (4, 2), (2, 1), (1, 1)]);
    }

    #[test]
    fn chain_of_uniform_image_keeps_color() {
        let base = RgbaImage::from_pixel(16, 16, image::Rgba([200, 100, 50, 128]));
        let chain = build_mip_chain(&base);
        let last = chain.last().expect("chain is never empty");
        assert_eq!(last.get_pixel(0, 0).0, [200, 100, 50, 128]);
    }

    #[test]
    fn chain_of_non_power_of_two() {
        let base = RgbaImage::new(5, 3);
        let chain = build_mip_chain(&base);
        assert_eq!(chain.len() as u32, mip_level_count(5, 3));
        assert_eq!((chain[1].width(), chain[1].height()), (2, 1));
    }

    // ── decoding ─────────────────────────────────────────────────────────

    #[test]
    fn decode_png_to_rgba() {
        let path = temp_path("decode.png");
        let mut img = RgbaImage::new(3, 2);
        img.put_pixel(2, 1, image::Rgba([1, 2, 3, 4]));
        img.save(&path).expect("write test png");

        let decoded = TextureImage::decode(&path).expect("decode test png");
        let _ = std::fs::remove_file(&path);

        assert_eq!((decoded.width(), decoded.height()), (3, 2));
        assert_eq!(decoded.pixels().get_pixel(2, 1).0, [1, 2, 3, 4]);
    }

    #[test]
    fn decode_rgb_gains_opaque_alpha() {
        let path = temp_path("rgb.png");
        image::RgbImage::from_pixel(2, 2, image::Rgb([9, 8, 7]))
            .save(&path)
            .expect("write test png");

        let decoded = TextureImage::decode(&path).expect("decode test png");
        let _ = std::fs::remove_file(&path);

        assert_eq!(decoded.pixels().get_pixel(0, 0).0, [9, 8, 7, 255]);
    }

    #[test]
    fn decode_missing_file_names_path() {
        let path = temp_path("missing.jpg");
        let err = TextureImage::decode(&path).unwrap_err();
        assert!(format!("{err:#}").contains("missing.jpg"));
    }

    // ── limits ───────────────────────────────────────────────────────────

    #[test]
    fn image_within_limit_fits() {
        let img = TextureImage::from_rgba(RgbaImage::new(64, 32));
        img.check_fits(64).unwrap();
    }

    #[test]
    fn oversized_side_is_rejected() {
        let wide = TextureImage::from_rgba(RgbaImage::new(65, 8));
        let tall = TextureImage::from_rgba(RgbaImage::new(8, 65));
        assert!(wide.check_fits(64).is_err());
        let err = tall.check_fits(64).unwrap_err();
        assert!(err.to_string().contains("8x65"));
    }

    #[test]
    fn solid_is_single_texel() {
        let img = TextureImage::solid([255, 0, 255, 255]);
        assert_eq!((img.width(), img.height()), (1, 1));
    }
}
