use std::path::Path;

use anyhow::Result;
use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use texel_engine::core::{App, AppControl, FrameCtx};
use texel_engine::input::Key;
use texel_engine::paint::Color;
use texel_engine::render::{Material, Mesh, ProgramDesc, RenderCtx, ShaderProgram, Texture};

use crate::geometry::CUBE_VERTICES;
use crate::{BRICK_TEXTURE, FRAGMENT_SHADER, VERTEX_SHADER};

const FOV_Y_DEGREES: f32 = 45.0;
const Z_NEAR: f32 = 0.1;
const Z_FAR: f32 = 100.0;
const CAMERA_DISTANCE: f32 = 3.0;
const ROTATION_AXIS: Vec3 = Vec3::new(0.5, 1.0, 0.0);

/// Matches `Transforms` in `cube.vert.wgsl`.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct CubeUniforms {
    pub projection: Mat4,
    pub view: Mat4,
    pub model: Mat4,
}

impl CubeUniforms {
    pub fn new(aspect: f32) -> Self {
        Self {
            projection: projection(aspect),
            view: view(),
            model: Mat4::IDENTITY,
        }
    }
}

pub fn projection(aspect: f32) -> Mat4 {
    Mat4::perspective_rh(FOV_Y_DEGREES.to_radians(), aspect, Z_NEAR, Z_FAR)
}

/// Camera pulled back along +Z, looking at the origin.
pub fn view() -> Mat4 {
    Mat4::from_translation(Vec3::new(0.0, 0.0, -CAMERA_DISTANCE))
}

/// Rotation by `seconds` radians about the fixed tilted axis.
pub fn model(seconds: f32) -> Mat4 {
    Mat4::from_axis_angle(ROTATION_AXIS.normalize(), seconds)
}

const CLEAR_COLOR: Color = Color::BLACK;

struct CubeScene {
    program: ShaderProgram,
    mesh: Mesh,
    material: Material<CubeUniforms>,
    uniforms: CubeUniforms,
    aspect: f32,
}

impl CubeScene {
    fn new(ctx: &RenderCtx<'_>) -> Result<Self> {
        let program = ShaderProgram::link(
            ctx,
            &ProgramDesc {
                label: "cube program",
                vertex: Path::new(VERTEX_SHADER),
                fragment: Path::new(FRAGMENT_SHADER),
                blend: None,
                depth_test: true,
            },
        )?;

        let mesh = Mesh::new(ctx, "cube vertices", &CUBE_VERTICES);

        let texture = Texture::from_path(ctx, BRICK_TEXTURE).unwrap_or_else(|e| {
            log::error!("{e:#}");
            Texture::placeholder(ctx, "brick placeholder")
        });

        let aspect = ctx.viewport.aspect();
        let uniforms = CubeUniforms::new(aspect);
        let material = Material::new(ctx, "cube material", program.material_layout(), &uniforms, texture);

        log::info!("cube scene ready");

        Ok(Self {
            program,
            mesh,
            material,
            uniforms,
            aspect,
        })
    }

    fn update(&mut self, ctx: &RenderCtx<'_>, elapsed: f32) {
        let aspect = ctx.viewport.aspect();
        if aspect != self.aspect {
            self.aspect = aspect;
            self.uniforms.projection = projection(aspect);
        }

        self.uniforms.model = model(elapsed);
        self.material.write(ctx.queue, &self.uniforms);
    }

    fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        self.program.bind(pass);
        self.material.bind(pass);
        self.mesh.draw(pass);
    }
}

/// Demo state. GPU resources exist between `on_start` and `on_exit`.
#[derive(Default)]
pub struct CubeDemo {
    scene: Option<CubeScene>,
}

impl App for CubeDemo {
    fn on_start(&mut self, ctx: &RenderCtx<'_>) -> Result<()> {
        self.scene = Some(CubeScene::new(ctx)?);
        Ok(())
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if ctx.input_frame.pressed(Key::Escape) {
            return AppControl::Exit;
        }

        let Some(scene) = self.scene.as_mut() else {
            return AppControl::Continue;
        };

        let elapsed = ctx.time.elapsed;
        ctx.render(CLEAR_COLOR, |rctx, pass| {
            scene.update(rctx, elapsed);
            scene.draw(pass);
        })
    }

    fn on_exit(&mut self) {
        if self.scene.take().is_some() {
            log::debug!("cube resources released");
        }
    }
}
