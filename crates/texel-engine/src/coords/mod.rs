//! Surface-space helpers.

mod viewport;

pub use viewport::Viewport;
