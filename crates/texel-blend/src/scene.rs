use std::path::Path;

use anyhow::Result;
use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use texel_engine::core::{App, AppControl, FrameCtx};
use texel_engine::input::Key;
use texel_engine::paint::Color;
use texel_engine::render::{
    Material, Mesh, ProgramDesc, RenderCtx, ShaderProgram, Texture, TexturedVertex, alpha_blend,
};

use crate::controls::BlendControls;
use crate::geometry::{BACK_TRIANGLE, FRONT_TRIANGLE};
use crate::{BACK_TEXTURE, FRAGMENT_SHADER, FRONT_TEXTURE, VERTEX_SHADER};

/// Matches `Layer` in the blend shaders. WGSL rounds the struct up to 80 bytes.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct LayerUniforms {
    pub transform: Mat4,
    pub opacity: f32,
    _pad: [f32; 3],
}

impl LayerUniforms {
    pub fn new(transform: Mat4, opacity: f32) -> Self {
        Self {
            transform,
            opacity,
            _pad: [0.0; 3],
        }
    }

    pub fn opaque() -> Self {
        Self::new(Mat4::IDENTITY, 1.0)
    }
}

impl From<&BlendControls> for LayerUniforms {
    fn from(controls: &BlendControls) -> Self {
        Self::new(controls.transform(), controls.opacity)
    }
}

fn clear_color() -> Color {
    Color::from_srgb_u8(20, 20, 26, 255)
}

/// One triangle with its own buffer, texture and uniforms.
struct Layer {
    mesh: Mesh,
    material: Material<LayerUniforms>,
}

impl Layer {
    fn new(
        ctx: &RenderCtx<'_>,
        program: &ShaderProgram,
        name: &str,
        vertices: &[TexturedVertex],
        texture_path: &str,
        uniforms: &LayerUniforms,
    ) -> Self {
        let mesh = Mesh::new(ctx, &format!("{name} vertices"), vertices);

        let texture = Texture::from_path(ctx, texture_path).unwrap_or_else(|e| {
            log::error!("{e:#}");
            Texture::placeholder(ctx, &format!("{name} placeholder"))
        });

        let material = Material::new(
            ctx,
            &format!("{name} material"),
            program.material_layout(),
            uniforms,
            texture,
        );

        Self { mesh, material }
    }

    fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        self.material.bind(pass);
        self.mesh.draw(pass);
    }
}

struct BlendScene {
    program: ShaderProgram,
    back: Layer,
    front: Layer,
}

impl BlendScene {
    fn new(ctx: &RenderCtx<'_>, controls: &BlendControls) -> Result<Self> {
        let program = ShaderProgram::link(
            ctx,
            &ProgramDesc {
                label: "blend program",
                vertex: Path::new(VERTEX_SHADER),
                fragment: Path::new(FRAGMENT_SHADER),
                blend: Some(alpha_blend()),
                depth_test: false,
            },
        )?;

        let back = Layer::new(
            ctx,
            &program,
            "back",
            &BACK_TRIANGLE,
            BACK_TEXTURE,
            &LayerUniforms::opaque(),
        );
        let front = Layer::new(
            ctx,
            &program,
            "front",
            &FRONT_TRIANGLE,
            FRONT_TEXTURE,
            &LayerUniforms::from(controls),
        );

        log::info!("blend scene ready");

        Ok(Self {
            program,
            back,
            front,
        })
    }

    fn update(&self, queue: &wgpu::Queue, controls: &BlendControls) {
        self.front.material.write(queue, &LayerUniforms::from(controls));
    }

    /// Back first so the front triangle blends over it.
    fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        self.program.bind(pass);
        self.back.draw(pass);
        self.front.draw(pass);
    }
}

/// Demo state. Controls persist across frames; GPU resources exist between
/// `on_start` and `on_exit`.
#[derive(Default)]
pub struct BlendDemo {
    controls: BlendControls,
    scene: Option<BlendScene>,
}

impl App for BlendDemo {
    fn on_start(&mut self, ctx: &RenderCtx<'_>) -> Result<()> {
        self.scene = Some(BlendScene::new(ctx, &self.controls)?);
        Ok(())
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if ctx.input_frame.pressed(Key::Escape) {
            ctx.runtime.exit();
            return AppControl::Continue;
        }

        self.controls.update(ctx.input, ctx.input_frame, ctx.time.dt);

        let Some(scene) = self.scene.as_ref() else {
            return AppControl::Continue;
        };

        let controls = self.controls;
        ctx.render(clear_color(), |rctx, pass| {
            scene.update(rctx.queue, &controls);
            scene.draw(pass);
        })
    }

    fn on_exit(&mut self) {
        if self.scene.take().is_some() {
            log::debug!("blend resources released");
        }
    }
}
