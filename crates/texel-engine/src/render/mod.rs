//! GPU rendering helpers.
//!
//! The demos follow one setup sequence: link a [`ShaderProgram`] from two WGSL
//! stage files, upload [`Mesh`]es of [`TexturedVertex`], load [`Texture`]s, and
//! pair each texture with a [`UniformBuffer`] in a [`Material`]. Each helper owns
//! its GPU objects; dropping it releases them.

mod ctx;
pub mod mesh;
pub mod shader;
pub mod texture;
pub mod uniform;

pub use ctx::RenderCtx;
pub use mesh::{Mesh, TexturedVertex};
pub use shader::{alpha_blend, ProgramDesc, ShaderProgram, ShaderSource, ShaderStage};
pub use texture::{Texture, TextureImage};
pub use uniform::{material_bind_group_layout, Material, UniformBuffer};
