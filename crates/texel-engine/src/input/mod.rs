//! Input subsystem.
//!
//! Public API is platform-agnostic and does not expose winit types. Only what the
//! demos steer with is modelled: physical keys, modifiers and window focus.
//! The runtime translates platform events into `InputEvent`s via [`platform`].

mod frame;
pub(crate) mod platform;
mod state;
mod types;

pub use frame::InputFrame;
pub use state::InputState;
pub use types::{InputEvent, Key, KeyState, Modifiers};
