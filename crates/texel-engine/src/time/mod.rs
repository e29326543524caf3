//! Time subsystem.
//!
//! One `FrameClock` per render loop; call `tick()` once per presented frame to
//! obtain a `FrameTime` carrying both the clamped frame delta and the unclamped
//! time since startup.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
