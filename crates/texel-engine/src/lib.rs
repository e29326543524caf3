//! Texel engine crate.
//!
//! This crate owns the platform + GPU runtime pieces shared by the demo programs:
//! the window loop, the wgpu device, input and timing, and the small set of
//! render helpers (shaders, meshes, textures, uniforms) the demos build on.

pub mod device;
pub mod window;
pub mod input;
pub mod time;
pub mod core;

pub mod logging;
pub mod coords;
pub mod render;
pub mod paint;
