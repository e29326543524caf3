//! Rotating textured cube.
//!
//! Setup: window + depth-tested GPU context, one program from two WGSL stage
//! files, one vertex buffer, one texture. Each frame rotates the model by the
//! elapsed time and draws 36 vertices.

mod geometry;
mod scene;

use anyhow::Result;
use texel_engine::device::GpuInit;
use texel_engine::logging::{LoggingConfig, init_logging};
use texel_engine::window::{Runtime, RuntimeConfig};
use winit::dpi::LogicalSize;

use crate::scene::CubeDemo;

const WIDTH: f64 = 800.0;
const HEIGHT: f64 = 600.0;
const TITLE: &str = "texel cube";

const VERTEX_SHADER: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/shaders/cube.vert.wgsl");
const FRAGMENT_SHADER: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/shaders/cube.frag.wgsl");
const BRICK_TEXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/textures/brick.png");

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let config = RuntimeConfig {
        title: TITLE.to_string(),
        initial_size: LogicalSize::new(WIDTH, HEIGHT),
        ..Default::default()
    };

    Runtime::run(config, GpuInit::with_depth(), CubeDemo::default())
}
