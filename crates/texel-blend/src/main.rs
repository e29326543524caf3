//! Two textured triangles composited with alpha blending.
//!
//! The back triangle is static and opaque. The front one is translucent and
//! steered from the keyboard:
//!
//! | keys          | effect                 |
//! |---------------|------------------------|
//! | arrows        | move                   |
//! | Q / E         | rotate                 |
//! | W / S         | raise / lower opacity  |
//! | R             | reset                  |
//! | Escape        | quit                   |

mod controls;
mod geometry;
mod scene;

use anyhow::Result;
use texel_engine::device::GpuInit;
use texel_engine::logging::{LoggingConfig, init_logging};
use texel_engine::window::{Runtime, RuntimeConfig};
use winit::dpi::LogicalSize;

use crate::scene::BlendDemo;

const WIDTH: f64 = 800.0;
const HEIGHT: f64 = 600.0;
const TITLE: &str = "texel blend";

const VERTEX_SHADER: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/shaders/blend.vert.wgsl");
const FRAGMENT_SHADER: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/shaders/blend.frag.wgsl");
const BACK_TEXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/textures/brick.png");
const FRONT_TEXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/textures/glass.png");

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let config = RuntimeConfig {
        title: TITLE.to_string(),
        initial_size: LogicalSize::new(WIDTH, HEIGHT),
        ..Default::default()
    };

    Runtime::run(config, GpuInit::default(), BlendDemo::default())
}
