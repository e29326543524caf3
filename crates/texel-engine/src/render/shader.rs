//! Shader loading, validation and program linking.
//!
//! Each stage lives in its own WGSL file. Sources are parsed and validated with
//! `naga` before reaching the device so that a broken shader produces a readable
//! diagnostic in the log instead of a device validation panic.

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

use super::uniform::material_bind_group_layout;
use super::{RenderCtx, TexturedVertex};

/// Programmable pipeline stage.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    /// Entry point every stage file must define.
    pub const fn entry_point(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vs_main",
            ShaderStage::Fragment => "fs_main",
        }
    }

    fn naga(self) -> naga::ShaderStage {
        match self {
            ShaderStage::Vertex => naga::ShaderStage::Vertex,
            ShaderStage::Fragment => naga::ShaderStage::Fragment,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

/// WGSL source for a single stage.
#[derive(Debug, Clone)]
pub struct ShaderSource {
    path: PathBuf,
    stage: ShaderStage,
    code: String,
}

impl ShaderSource {
    /// Reads a stage file from disk.
    pub fn load(path: impl AsRef<Path>, stage: ShaderStage) -> Result<Self> {
        let path = path.as_ref();
        let code = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {stage} shader {}", path.display()))?;

        Ok(Self {
            path: path.to_path_buf(),
            stage,
            code,
        })
    }

    /// Wraps in-memory source. `name` is only used in diagnostics.
    pub fn from_code(name: impl Into<PathBuf>, stage: ShaderStage, code: impl Into<String>) -> Self {
        Self {
            path: name.into(),
            stage,
            code: code.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn stage(&self) -> ShaderStage {
        self.stage
    }

    /// Parses and validates the source against a device with no optional
    /// features, checking the entry point and the material bindings.
    ///
    /// Failures are logged with the full diagnostic before being returned.
    pub fn check(&self) -> Result<()> {
        self.check_with(wgpu::Features::empty())
    }

    /// Like [`ShaderSource::check`], allowing what `features` enable.
    pub fn check_with(&self, features: wgpu::Features) -> Result<()> {
        self.interface(features).map(|_| ())
    }

    fn interface(&self, features: wgpu::Features) -> Result<StageInterface> {
        let module = match naga::front::wgsl::parse_str(&self.code) {
            Ok(m) => m,
            Err(e) => return self.fail(e.emit_to_string(&self.code)),
        };

        let mut validator = naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            shader_capabilities(features),
        );
        if let Err(e) = validator.validate(&module) {
            return self.fail(e.emit_to_string(&self.code));
        }

        let entry = self.stage.entry_point();
        let Some(ep) = module
            .entry_points
            .iter()
            .find(|ep| ep.name == entry && ep.stage == self.stage.naga())
        else {
            return self.fail(format!("no @{} entry point named `{entry}`", self.stage));
        };

        for (_, var) in module.global_variables.iter() {
            if let Some(slot) = &var.binding {
                if let Err(problem) = check_material_slot(&module, var, slot) {
                    return self.fail(problem);
                }
            }
        }

        let mut io = StageInterface::default();
        for arg in &ep.function.arguments {
            collect_locations(&module, arg.ty, arg.binding.as_ref(), &mut io.inputs);
        }
        if let Some(result) = &ep.function.result {
            collect_locations(&module, result.ty, result.binding.as_ref(), &mut io.outputs);
        }

        let allowed = match self.stage {
            ShaderStage::Vertex => io.check_inputs(&vertex_inputs()),
            ShaderStage::Fragment => io.check_outputs(&[0]),
        };
        if let Err(problem) = allowed {
            return self.fail(problem);
        }

        Ok(io)
    }

    fn fail<T>(&self, diagnostic: impl fmt::Display) -> Result<T> {
        log::error!(
            "{} shader compilation failed ({}):\n{diagnostic}",
            self.stage,
            self.path.display()
        );
        bail!("{} shader {} failed to compile", self.stage, self.path.display())
    }

    fn compile(&self, device: &wgpu::Device) -> wgpu::ShaderModule {
        let label = self.path.display().to_string();
        device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(&label),
            source: wgpu::ShaderSource::Wgsl(self.code.as_str().into()),
        })
    }
}

/// Naga capabilities unlocked by the device features a shader may rely on.
pub fn shader_capabilities(features: wgpu::Features) -> naga::valid::Capabilities {
    use naga::valid::Capabilities as Caps;

    let mut caps = Caps::default();
    for (feature, cap) in [
        (wgpu::Features::IMMEDIATES, Caps::IMMEDIATES),
        (wgpu::Features::SHADER_F64, Caps::FLOAT64),
        (wgpu::Features::SHADER_F16, Caps::SHADER_FLOAT16),
        (wgpu::Features::SHADER_INT64, Caps::SHADER_INT64),
        (wgpu::Features::SHADER_PRIMITIVE_INDEX, Caps::PRIMITIVE_INDEX),
        (wgpu::Features::SHADER_EARLY_DEPTH_TEST, Caps::EARLY_DEPTH_TEST),
        (wgpu::Features::MULTIVIEW, Caps::MULTIVIEW),
        (wgpu::Features::DUAL_SOURCE_BLENDING, Caps::DUAL_SOURCE_BLENDING),
        (wgpu::Features::CLIP_DISTANCES, Caps::CLIP_DISTANCE),
    ] {
        caps.set(cap, features.contains(feature));
    }
    caps
}

/// User-defined `@location` values a stage reads and writes.
#[derive(Debug, Default)]
struct StageInterface {
    inputs: Vec<(u32, naga::TypeInner)>,
    outputs: Vec<(u32, naga::TypeInner)>,
}

impl StageInterface {
    fn check_inputs(&self, expected: &[(u32, naga::TypeInner)]) -> std::result::Result<(), String> {
        for (location, ty) in &self.inputs {
            match expected.iter().find(|(l, _)| l == location) {
                Some((_, want)) if want == ty => {}
                Some(_) => return Err(format!("input @location({location}) has the wrong type")),
                None => return Err(format!("input @location({location}) is not provided")),
            }
        }
        Ok(())
    }

    fn check_outputs(&self, allowed: &[u32]) -> std::result::Result<(), String> {
        match self.outputs.iter().find(|(l, _)| !allowed.contains(l)) {
            Some((location, _)) => Err(format!("output @location({location}) has no target")),
            None => Ok(()),
        }
    }
}

/// What the vertex buffer layout feeds: `vec3<f32>` at 0, `vec2<f32>` at 1.
fn vertex_inputs() -> [(u32, naga::TypeInner); 2] {
    let vec = |size| naga::TypeInner::Vector {
        size,
        scalar: naga::Scalar::F32,
    };
    [
        (0, vec(naga::VectorSize::Tri)),
        (1, vec(naga::VectorSize::Bi)),
    ]
}

fn collect_locations(
    module: &naga::Module,
    ty: naga::Handle<naga::Type>,
    binding: Option<&naga::Binding>,
    out: &mut Vec<(u32, naga::TypeInner)>,
) {
    match binding {
        Some(naga::Binding::Location { location, .. }) => {
            out.push((*location, module.types[ty].inner.clone()));
        }
        Some(naga::Binding::BuiltIn(_)) => {}
        None => {
            if let naga::TypeInner::Struct { members, .. } = &module.types[ty].inner {
                for member in members {
                    collect_locations(module, member.ty, member.binding.as_ref(), out);
                }
            }
        }
    }
}

/// Resource slots must match [`material_bind_group_layout`].
fn check_material_slot(
    module: &naga::Module,
    var: &naga::GlobalVariable,
    slot: &naga::ResourceBinding,
) -> std::result::Result<(), String> {
    let name = var.name.as_deref().unwrap_or("<unnamed>");
    if slot.group != 0 {
        return Err(format!("`{name}` is in @group({}); only group 0 is bound", slot.group));
    }

    let inner = &module.types[var.ty].inner;
    let fits = match slot.binding {
        0 => var.space == naga::AddressSpace::Uniform,
        1 => matches!(
            inner,
            naga::TypeInner::Image {
                dim: naga::ImageDimension::D2,
                arrayed: false,
                class: naga::ImageClass::Sampled {
                    kind: naga::ScalarKind::Float,
                    multi: false,
                },
            }
        ),
        2 => matches!(inner, naga::TypeInner::Sampler { comparison: false }),
        other => {
            return Err(format!("`{name}` uses @binding({other}); the material has bindings 0..=2"));
        }
    };

    if fits {
        Ok(())
    } else {
        Err(format!(
            "`{name}` at @binding({}) does not match the material layout \
             (0 = uniform, 1 = texture_2d<f32>, 2 = sampler)",
            slot.binding
        ))
    }
}

/// Everything needed to link a program.
#[derive(Debug, Clone)]
pub struct ProgramDesc<'a> {
    pub label: &'a str,
    pub vertex: &'a Path,
    pub fragment: &'a Path,
    /// `None` writes fragments opaquely.
    pub blend: Option<wgpu::BlendState>,
    /// Requires the GPU to have been created with a depth format.
    pub depth_test: bool,
}

/// Linked vertex + fragment stages: a render pipeline drawing [`TexturedVertex`]
/// triangle lists with one [`Material`](super::Material) bound at group 0.
pub struct ShaderProgram {
    pipeline: wgpu::RenderPipeline,
    material_layout: wgpu::BindGroupLayout,
}

impl ShaderProgram {
    /// Loads both stage files, validates them, and links the pipeline.
    ///
    /// The intermediate shader modules are dropped once the pipeline exists.
    pub fn link(ctx: &RenderCtx<'_>, desc: &ProgramDesc<'_>) -> Result<Self> {
        let vertex = ShaderSource::load(desc.vertex, ShaderStage::Vertex)?;
        let fragment = ShaderSource::load(desc.fragment, ShaderStage::Fragment)?;
        Self::link_sources(ctx, desc, &vertex, &fragment)
    }

    pub fn link_sources(
        ctx: &RenderCtx<'_>,
        desc: &ProgramDesc<'_>,
        vertex: &ShaderSource,
        fragment: &ShaderSource,
    ) -> Result<Self> {
        Self::check_sources(vertex, fragment, ctx.device.features())
            .with_context(|| format!("failed to link program {:?}", desc.label))?;

        let depth_stencil = if desc.depth_test {
            let format = ctx
                .depth_format
                .with_context(|| format!("program {:?} needs a depth target", desc.label))?;
            Some(depth_state(format))
        } else {
            None
        };

        // Device-side rejections are returned as errors instead of panicking.
        let scope = ctx.device.push_error_scope(wgpu::ErrorFilter::Validation);

        let vs = vertex.compile(ctx.device);
        let fs = fragment.compile(ctx.device);

        let material_layout = material_bind_group_layout(ctx.device, desc.label);

        let pipeline_layout = ctx
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some(desc.label),
                bind_group_layouts: &[&material_layout],
                immediate_size: 0,
            });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(desc.label),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: &vs,
                entry_point: Some(ShaderStage::Vertex.entry_point()),
                compilation_options: Default::default(),
                buffers: &[TexturedVertex::layout()],
            },

            fragment: Some(wgpu::FragmentState {
                module: &fs,
                entry_point: Some(ShaderStage::Fragment.entry_point()),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: desc.blend,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        drop((vs, fs));
        if let Some(err) = pollster::block_on(scope.pop()) {
            log::error!("program {:?} rejected by the device:\n{err}", desc.label);
            bail!("failed to link program {:?}: {err}", desc.label);
        }

        log::debug!(
            "linked program {:?} ({} + {})",
            desc.label,
            vertex.path().display(),
            fragment.path().display()
        );

        Ok(Self {
            pipeline,
            material_layout,
        })
    }

    /// Validates both stages for a device with `features` and checks that
    /// every fragment input is written by the vertex stage with the same type.
    ///
    /// Both stages are checked before returning so every diagnostic is logged.
    pub fn check_sources(
        vertex: &ShaderSource,
        fragment: &ShaderSource,
        features: wgpu::Features,
    ) -> Result<()> {
        anyhow::ensure!(vertex.stage() == ShaderStage::Vertex, "expected a vertex stage source");
        anyhow::ensure!(fragment.stage() == ShaderStage::Fragment, "expected a fragment stage source");

        let vs = vertex.interface(features);
        let fs = fragment.interface(features);
        let (vs, fs) = (vs?, fs?);

        if let Err(problem) = fs.check_inputs(&vs.outputs) {
            return fragment.fail(format!(
                "{problem} (checked against the outputs of {})",
                vertex.path().display()
            ));
        }
        Ok(())
    }

    /// Layout materials drawn with this program must be created against.
    pub fn material_layout(&self) -> &wgpu::BindGroupLayout {
        &self.material_layout
    }

    pub fn bind(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_pipeline(&self.pipeline);
    }
}

/// Straight-alpha "over" blending.
pub fn alpha_blend() -> wgpu::BlendState {
    wgpu::BlendState::ALPHA_BLENDING
}

fn depth_state(format: wgpu::TextureFormat) -> wgpu::DepthStencilState {
    wgpu::DepthStencilState {
        format,
        depth_write_enabled: true,
        depth_compare: wgpu::CompareFunction::Less,
        stencil: wgpu::StencilState::default(),
        bias: wgpu::DepthBiasState::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VS: &str = r#"
        struct Out { @builtin(position) pos: vec4<f32>, @location(0) uv: vec2<f32> };
        @vertex
        fn vs_main(@location(0) p: vec3<f32>, @location(1) uv: vec2<f32>) -> Out {
            return Out(vec4<f32>(p, 1.0), uv);
        }
    "#;

    const FS: &str = r#"
        @fragment
        fn fs_main(@location(0) uv: vec2<f32>) -> @location(0) vec4<f32> {
            return vec4<f32>(uv, 0.0, 1.0);
        }
    "#;

    // ── check ────────────────────────────────────────────────────────────

    #[test]
    fn valid_stages_pass() {
        ShaderSource::from_code("vs.wgsl", ShaderStage::Vertex, VS).check().unwrap();
        ShaderSource::from_code("fs.wgsl", ShaderStage::Fragment, FS).check().unwrap();
    }

    #[test]
    fn syntax_error_is_reported_with_file_name() {
        let src = ShaderSource::from_code("broken.wgsl", ShaderStage::Vertex, "fn vs_main( {");
        let err = src.check().unwrap_err();
        assert!(err.to_string().contains("broken.wgsl"));
    }

    #[test]
    fn type_error_fails_validation() {
        let code = r#"
            @fragment
            fn fs_main() -> @location(0) vec4<f32> {
                let x: f32 = vec2<f32>(1.0, 2.0);
                return vec4<f32>(x);
            }
        "#;
        let src = ShaderSource::from_code("types.wgsl", ShaderStage::Fragment, code);
        assert!(src.check().is_err());
    }

    #[test]
    fn wrong_stage_entry_point_is_rejected() {
        // A fragment file checked as the vertex stage has no `vs_main`.
        let src = ShaderSource::from_code("fs.wgsl", ShaderStage::Vertex, FS);
        assert!(src.check().is_err());
    }

    #[test]
    fn binding_outside_material_layout_is_rejected() {
        let code = r#"
            struct Extra { tint: vec4<f32> };
            @group(0) @binding(5) var<uniform> extra: Extra;
            @fragment
            fn fs_main(@location(0) uv: vec2<f32>) -> @location(0) vec4<f32> {
                return extra.tint * vec4<f32>(uv, 0.0, 1.0);
            }
        "#;
        let src = ShaderSource::from_code("extra.wgsl", ShaderStage::Fragment, code);
        assert!(src.check().is_err());
    }

    #[test]
    fn second_bind_group_is_rejected() {
        let code = r#"
            @group(1) @binding(0) var<uniform> tint: vec4<f32>;
            @fragment
            fn fs_main() -> @location(0) vec4<f32> {
                return tint;
            }
        "#;
        let src = ShaderSource::from_code("group1.wgsl", ShaderStage::Fragment, code);
        assert!(src.check().is_err());
    }

    #[test]
    fn wrong_resource_kind_at_texture_slot_is_rejected() {
        let code = r#"
            @group(0) @binding(1) var<uniform> not_a_texture: vec4<f32>;
            @fragment
            fn fs_main() -> @location(0) vec4<f32> {
                return not_a_texture;
            }
        "#;
        let src = ShaderSource::from_code("slot1.wgsl", ShaderStage::Fragment, code);
        assert!(src.check().is_err());
    }

    #[test]
    fn material_bindings_pass() {
        let code = r#"
            struct Params { tint: vec4<f32> };
            @group(0) @binding(0) var<uniform> params: Params;
            @group(0) @binding(1) var tex: texture_2d<f32>;
            @group(0) @binding(2) var samp: sampler;
            @fragment
            fn fs_main(@location(0) uv: vec2<f32>) -> @location(0) vec4<f32> {
                return textureSample(tex, samp, uv) * params.tint;
            }
        "#;
        ShaderSource::from_code("material.wgsl", ShaderStage::Fragment, code)
            .check()
            .unwrap();
    }

    #[test]
    fn vertex_input_outside_buffer_layout_is_rejected() {
        let code = r#"
            @vertex
            fn vs_main(@location(2) normal: vec3<f32>) -> @builtin(position) vec4<f32> {
                return vec4<f32>(normal, 1.0);
            }
        "#;
        let src = ShaderSource::from_code("normal.wgsl", ShaderStage::Vertex, code);
        assert!(src.check().is_err());
    }

    #[test]
    fn extra_fragment_target_is_rejected() {
        let code = r#"
            struct Targets { @location(0) color: vec4<f32>, @location(1) glow: vec4<f32> };
            @fragment
            fn fs_main() -> Targets {
                return Targets(vec4<f32>(1.0), vec4<f32>(0.0));
            }
        "#;
        let src = ShaderSource::from_code("mrt.wgsl", ShaderStage::Fragment, code);
        assert!(src.check().is_err());
    }

    // ── features ─────────────────────────────────────────────────────────

    const F64_FS: &str = r#"
        @fragment
        fn fs_main(@location(0) uv: vec2<f32>) -> @location(0) vec4<f32> {
            let scale: f64 = 0.5lf;
            return vec4<f32>(uv * f32(scale), 0.0, 1.0);
        }
    "#;

    #[test]
    fn f64_needs_the_device_feature() {
        let src = ShaderSource::from_code("f64.wgsl", ShaderStage::Fragment, F64_FS);
        assert!(src.check().is_err());
        src.check_with(wgpu::Features::SHADER_F64).unwrap();
    }

    #[test]
    fn capabilities_follow_features() {
        use naga::valid::Capabilities as Caps;
        assert!(!shader_capabilities(wgpu::Features::empty()).contains(Caps::FLOAT64));
        assert!(shader_capabilities(wgpu::Features::SHADER_F64).contains(Caps::FLOAT64));
        assert!(shader_capabilities(wgpu::Features::SHADER_F16).contains(Caps::SHADER_FLOAT16));
    }

    // ── stage pairing ────────────────────────────────────────────────────

    #[test]
    fn matching_stages_pass() {
        let vs = ShaderSource::from_code("vs.wgsl", ShaderStage::Vertex, VS);
        let fs = ShaderSource::from_code("fs.wgsl", ShaderStage::Fragment, FS);
        ShaderProgram::check_sources(&vs, &fs, wgpu::Features::empty()).unwrap();
    }

    #[test]
    fn fragment_input_not_written_by_vertex_is_rejected() {
        let code = r#"
            @fragment
            fn fs_main(@location(3) uv: vec2<f32>) -> @location(0) vec4<f32> {
                return vec4<f32>(uv, 0.0, 1.0);
            }
        "#;
        let vs = ShaderSource::from_code("vs.wgsl", ShaderStage::Vertex, VS);
        let fs = ShaderSource::from_code("loc3.wgsl", ShaderStage::Fragment, code);
        fs.check().unwrap();
        let err = ShaderProgram::check_sources(&vs, &fs, wgpu::Features::empty()).unwrap_err();
        assert!(format!("{err:#}").contains("loc3.wgsl"));
    }

    #[test]
    fn fragment_input_type_mismatch_is_rejected() {
        let code = r#"
            @fragment
            fn fs_main(@location(0) uv: vec4<f32>) -> @location(0) vec4<f32> {
                return uv;
            }
        "#;
        let vs = ShaderSource::from_code("vs.wgsl", ShaderStage::Vertex, VS);
        let fs = ShaderSource::from_code("vec4.wgsl", ShaderStage::Fragment, code);
        assert!(ShaderProgram::check_sources(&vs, &fs, wgpu::Features::empty()).is_err());
    }

    #[test]
    fn swapped_stages_are_rejected() {
        let vs = ShaderSource::from_code("vs.wgsl", ShaderStage::Vertex, VS);
        let fs = ShaderSource::from_code("fs.wgsl", ShaderStage::Fragment, FS);
        assert!(ShaderProgram::check_sources(&fs, &vs, wgpu::Features::empty()).is_err());
    }

    // ── load ─────────────────────────────────────────────────────────────

    #[test]
    fn load_missing_file_names_path_and_stage() {
        let err = ShaderSource::load("does/not/exist.wgsl", ShaderStage::Fragment).unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("fragment"));
        assert!(msg.contains("exist.wgsl"));
    }

    #[test]
    fn load_reads_file_contents() {
        let path = std::env::temp_dir().join(format!("texel-{}-vs.wgsl", std::process::id()));
        std::fs::write(&path, VS).unwrap();
        let src = ShaderSource::load(&path, ShaderStage::Vertex).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(src.stage(), ShaderStage::Vertex);
        src.check().unwrap();
    }

    #[test]
    fn entry_points_are_stable() {
        assert_eq!(ShaderStage::Vertex.entry_point(), "vs_main");
        assert_eq!(ShaderStage::Fragment.entry_point(), "fs_main");
        assert_eq!(ShaderStage::Vertex.to_string(), "vertex");
    }
}
