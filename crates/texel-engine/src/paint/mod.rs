//! Color representation shared by the frame loop and the demos.

pub mod color;

pub use color::Color;
